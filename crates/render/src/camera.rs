use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use snake3d_kernel::GamePhase;

const DEFAULT_ASPECT: f32 = 16.0 / 9.0;
const TOP_DOWN_EYE: Vec3 = Vec3::new(0.0, 0.0, 10.0);
const FIXED_EYE: Vec3 = Vec3::new(2.0, -2.0, 2.0);

/// Viewpoint selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Perspective, behind and above the head, following its heading.
    #[default]
    Chase,
    /// Orthographic, straight down onto the board.
    TopDown,
    /// Perspective from a fixed corner toward the board centre.
    Fixed,
}

impl CameraMode {
    pub fn next(self) -> Self {
        match self {
            CameraMode::Chase => CameraMode::TopDown,
            CameraMode::TopDown => CameraMode::Fixed,
            CameraMode::Fixed => CameraMode::Chase,
        }
    }
}

/// Unit forward vector in the XY plane for a heading in degrees, with
/// 0 along +Y and angles growing counter-clockwise.
pub fn heading_forward(degrees: f32) -> Vec3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec3::new(-sin, cos, 0.0)
}

/// Multi-mode game camera. Projections are rebuilt only when the aspect
/// changes. Camera motion lives outside the kernel and is not logged.
#[derive(Debug, Clone)]
pub struct Camera {
    mode: CameraMode,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Distance behind the head in chase mode.
    pub chase_radius: f32,
    /// Height above the head in chase mode.
    pub chase_height: f32,
    aspect: f32,
    perspective: Mat4,
    orthographic: Mat4,
    last_eye: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_ASPECT)
    }
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            mode: CameraMode::default(),
            fov: 60.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            chase_radius: 0.6,
            chase_height: 0.4,
            aspect,
            perspective: Mat4::IDENTITY,
            orthographic: Mat4::IDENTITY,
            last_eye: Vec3::ZERO,
        };
        camera.rebuild_projections();
        camera
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        if mode != self.mode {
            tracing::debug!(?mode, "camera mode");
        }
        self.mode = mode;
    }

    pub fn cycle_mode(&mut self) -> CameraMode {
        self.set_mode(self.mode.next());
        self.mode
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            self.rebuild_projections();
        }
    }

    /// Follow the game's phase: a dead snake is always seen from behind.
    pub fn observe(&mut self, phase: GamePhase) {
        if phase == GamePhase::Dead {
            self.set_mode(CameraMode::Chase);
        }
    }

    /// Eye position of the most recent `projection_and_view`.
    pub fn last_eye(&self) -> Vec3 {
        self.last_eye
    }

    /// Projection and view matrices for a head at `head` (world space)
    /// facing `heading_degrees`.
    pub fn projection_and_view(&mut self, head: Vec3, heading_degrees: f32) -> (Mat4, Mat4) {
        let (projection, eye, view) = match self.mode {
            CameraMode::Chase => {
                let eye = head - heading_forward(heading_degrees) * self.chase_radius
                    + Vec3::Z * self.chase_height;
                (self.perspective, eye, Mat4::look_at_rh(eye, head, Vec3::Z))
            }
            CameraMode::TopDown => (
                self.orthographic,
                TOP_DOWN_EYE,
                Mat4::look_at_rh(TOP_DOWN_EYE, Vec3::ZERO, Vec3::Y),
            ),
            CameraMode::Fixed => (
                self.perspective,
                FIXED_EYE,
                Mat4::look_at_rh(FIXED_EYE, Vec3::ZERO, Vec3::Z),
            ),
        };
        self.last_eye = eye;
        (projection, view)
    }

    fn rebuild_projections(&mut self) {
        self.perspective = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        self.orthographic =
            Mat4::orthographic_rh(-self.aspect, self.aspect, -1.0, 1.0, self.near, self.far);
    }
}
