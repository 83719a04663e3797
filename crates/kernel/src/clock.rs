/// Floor for a single frame's delta, also used for the very first frame.
pub const MIN_FRAME_DT: f64 = 1e-4;
/// Ceiling for a single frame's delta; a stalled frame cannot skip ticks.
pub const MAX_FRAME_DT: f64 = 0.25;
/// Bounds of the interval multiplier.
pub const MIN_SPEED_FACTOR: f32 = 0.25;
pub const MAX_SPEED_FACTOR: f32 = 4.0;

/// Weight of the newest frame in the smoothed delta.
const DT_SMOOTHING: f64 = 0.1;
/// Interval multiplier per scroll notch.
const SPEED_STEP: f32 = 1.25;

/// Tick timing for the game loop.
///
/// Wall-clock time is fed in once per frame. While the game is running the
/// clock accumulates real elapsed time and a frame counter; a tick is due
/// once the accumulated time exceeds the tick interval, after which the
/// accumulator restarts from zero. The tick interval is
/// `speed_factor / ln(size)` seconds: the interval shrinks as the board
/// grows, and the factor multiplies it directly.
#[derive(Debug, Clone)]
pub struct GameClock {
    base_interval: f64,
    speed_factor: f32,
    last_time: Option<f64>,
    dt: f64,
    elapsed_since_tick: f64,
    frames_since_tick: u32,
    tick_count: u64,
}

impl GameClock {
    pub fn new(size: u32, speed_factor: f32) -> Self {
        Self {
            base_interval: Self::base_interval_for(size),
            speed_factor: speed_factor.clamp(MIN_SPEED_FACTOR, MAX_SPEED_FACTOR),
            last_time: None,
            dt: MIN_FRAME_DT,
            elapsed_since_tick: 0.0,
            frames_since_tick: 0,
            tick_count: 0,
        }
    }

    /// Tick interval at speed factor 1 for a board of `size` cells.
    pub fn base_interval_for(size: u32) -> f64 {
        1.0 / (size as f64).ln()
    }

    /// Seconds between ticks at the current speed factor.
    pub fn tick_interval(&self) -> f64 {
        self.base_interval * self.speed_factor as f64
    }

    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    /// Set the interval multiplier, clamped to its bounds. Returns the value stored.
    pub fn set_speed_factor(&mut self, factor: f32) -> f32 {
        self.speed_factor = factor.clamp(MIN_SPEED_FACTOR, MAX_SPEED_FACTOR);
        self.speed_factor
    }

    /// Scroll-style adjustment: each positive notch makes the game faster
    /// (shorter interval), each negative notch slower.
    pub fn adjust_speed(&mut self, notches: i32) -> f32 {
        self.set_speed_factor(self.speed_factor / SPEED_STEP.powi(notches))
    }

    /// Feed the current wall-clock time. Updates the smoothed delta and,
    /// when `running`, the tick accumulator. Returns the clamped raw delta.
    pub fn advance(&mut self, now: f64, running: bool) -> f64 {
        let raw = match self.last_time {
            Some(prev) => (now - prev).clamp(MIN_FRAME_DT, MAX_FRAME_DT),
            None => MIN_FRAME_DT,
        };
        if self.last_time.is_some() {
            self.dt += DT_SMOOTHING * (raw - self.dt);
        } else {
            self.dt = raw;
        }
        self.last_time = Some(now);

        if running {
            self.elapsed_since_tick += raw;
            self.frames_since_tick += 1;
        }
        raw
    }

    /// True once per elapsed tick interval. Resets the accumulator when it fires.
    pub fn take_due_tick(&mut self) -> bool {
        if self.elapsed_since_tick > self.tick_interval() {
            self.reset_tick();
            true
        } else {
            false
        }
    }

    /// Count one performed tick. Called exactly once per due tick.
    pub fn record_tick(&mut self) {
        self.tick_count += 1;
    }

    /// Restart the accumulator without counting a tick.
    pub fn reset_tick(&mut self) {
        self.elapsed_since_tick = 0.0;
        self.frames_since_tick = 0;
    }

    /// Fraction of the current tick interval already elapsed, in [0, 1].
    pub fn progress(&self) -> f32 {
        (self.elapsed_since_tick / self.tick_interval()).clamp(0.0, 1.0) as f32
    }

    /// Estimated frames per tick at the smoothed frame rate.
    pub fn frames_per_tick(&self) -> f64 {
        self.tick_interval() / self.dt
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn frames_since_tick(&self) -> u32 {
        self.frames_since_tick
    }

    pub fn elapsed_since_tick(&self) -> f64 {
        self.elapsed_since_tick
    }
}
