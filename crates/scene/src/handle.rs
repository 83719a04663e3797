use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Opaque handle to geometry uploaded by the rendering collaborator.
///
/// The scene graph never looks inside; it only carries the handle to the
/// leaf that draws it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DrawableHandle(pub u64);

/// One entry of a frame's draw list: a composed world transform and the
/// geometry to draw with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub transform: Mat4,
    pub drawable: DrawableHandle,
}

impl DrawItem {
    /// World-space origin of the drawable after composition.
    pub fn origin(&self) -> glam::Vec3 {
        self.transform.w_axis.truncate()
    }
}
