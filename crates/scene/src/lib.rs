//! Scene graph: named transform nodes with opaque drawable leaves.
//!
//! # Invariants
//! - The graph is a tree by construction; shared sub-graphs are immutable.
//! - Traversal composes `parent * local` and visits leaves in child order.

mod graph;
mod handle;

pub use graph::{SceneChild, SceneError, SceneNode};
pub use handle::{DrawItem, DrawableHandle};
