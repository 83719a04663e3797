use glam::{Mat4, Vec3};
use snake3d_kernel::{GameError, GamePhase};

use crate::camera::CameraMode;

/// Capacity of the per-frame light array.
pub const MAX_LIGHTS: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("light array is full ({max} lights)", max = MAX_LIGHTS)]
    LightArrayFull,
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Point light parameters handed to the shading collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant_attenuation: f32,
    pub linear_attenuation: f32,
    pub quadratic_attenuation: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
            constant_attenuation: 1.0,
            linear_attenuation: 0.1,
            quadratic_attenuation: 0.05,
        }
    }
}

impl LightParams {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Fixed-capacity list of active lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightArray {
    lights: [LightParams; MAX_LIGHTS],
    count: usize,
}

impl Default for LightArray {
    fn default() -> Self {
        Self {
            lights: [LightParams::default(); MAX_LIGHTS],
            count: 0,
        }
    }
}

impl LightArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a light and return its slot.
    pub fn push(&mut self, light: LightParams) -> Result<usize, RenderError> {
        if self.count == MAX_LIGHTS {
            return Err(RenderError::LightArrayFull);
        }
        self.lights[self.count] = light;
        self.count += 1;
        Ok(self.count - 1)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// The active lights, in slot order.
    pub fn as_slice(&self) -> &[LightParams] {
        &self.lights[..self.count]
    }
}

/// Everything the shading collaborator needs for one frame besides the
/// draw list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    pub projection: Mat4,
    pub view: Mat4,
    pub eye: Vec3,
    pub head: Vec3,
    pub heading_degrees: f32,
    pub food: Vec3,
    pub lights: LightArray,
    pub mode: CameraMode,
    pub phase: GamePhase,
    pub time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_until_full() {
        let mut lights = LightArray::new();
        assert!(lights.is_empty());
        for i in 0..MAX_LIGHTS {
            assert_eq!(lights.push(LightParams::at(Vec3::X * i as f32)).unwrap(), i);
        }
        assert!(matches!(
            lights.push(LightParams::default()),
            Err(RenderError::LightArrayFull)
        ));
        assert_eq!(lights.len(), MAX_LIGHTS);
        assert_eq!(lights.as_slice()[3].position, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut lights = LightArray::new();
        lights.push(LightParams::default()).unwrap();
        lights.clear();
        assert!(lights.as_slice().is_empty());
        assert!(lights.push(LightParams::default()).is_ok());
    }
}
