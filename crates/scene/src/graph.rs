use glam::Mat4;
use std::sync::Arc;

use crate::handle::{DrawItem, DrawableHandle};

/// A child slot of a [`SceneNode`].
#[derive(Debug, Clone)]
pub enum SceneChild {
    /// Exclusively owned sub-graph; mutable through its parent.
    Node(SceneNode),
    /// Immutable sub-graph shared between several parents, e.g. one lamp
    /// model placed at four corners.
    Shared(Arc<SceneNode>),
    /// Geometry leaf.
    Drawable(DrawableHandle),
}

/// Errors from indexed child access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("node '{node}' has no child at index {index} ({len} children)")]
    ChildOutOfRange {
        node: String,
        index: usize,
        len: usize,
    },
    #[error("child {index} of node '{node}' is not an owned transform node")]
    NotAnOwnedNode { node: String, index: usize },
}

/// A named transform node.
///
/// Children are owned by value or shared through `Arc`, so the structure is
/// always a tree: a node cannot become its own ancestor. The name is only
/// used for diagnostics.
#[derive(Debug, Clone)]
pub struct SceneNode {
    name: String,
    transform: Mat4,
    children: Vec<SceneChild>,
}

impl SceneNode {
    /// Create an empty node with an identity transform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            children: Vec::new(),
        }
    }

    /// Convenience for a transform node holding a single drawable.
    pub fn leaf(name: impl Into<String>, transform: Mat4, drawable: DrawableHandle) -> Self {
        let mut node = Self::new(name).with_transform(transform);
        node.add_drawable(drawable);
        node
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.add_child(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(SceneChild::Node(child));
    }

    pub fn add_shared(&mut self, child: Arc<SceneNode>) {
        self.children.push(SceneChild::Shared(child));
    }

    pub fn add_drawable(&mut self, drawable: DrawableHandle) {
        self.children.push(SceneChild::Drawable(drawable));
    }

    pub fn children(&self) -> &[SceneChild] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [SceneChild] {
        &mut self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Drop every child past `len`.
    pub fn truncate_children(&mut self, len: usize) {
        self.children.truncate(len);
    }

    /// Borrow the transform node at `index` (owned or shared).
    pub fn child_node(&self, index: usize) -> Result<&SceneNode, SceneError> {
        match self.children.get(index) {
            Some(SceneChild::Node(node)) => Ok(node),
            Some(SceneChild::Shared(node)) => Ok(node.as_ref()),
            Some(SceneChild::Drawable(_)) => Err(SceneError::NotAnOwnedNode {
                node: self.name.clone(),
                index,
            }),
            None => Err(self.out_of_range(index)),
        }
    }

    /// Mutably borrow the owned transform node at `index`. Shared children
    /// are immutable and rejected.
    pub fn child_node_mut(&mut self, index: usize) -> Result<&mut SceneNode, SceneError> {
        let len = self.children.len();
        match self.children.get_mut(index) {
            Some(SceneChild::Node(node)) => Ok(node),
            Some(_) => Err(SceneError::NotAnOwnedNode {
                node: self.name.clone(),
                index,
            }),
            None => Err(SceneError::ChildOutOfRange {
                node: self.name.clone(),
                index,
                len,
            }),
        }
    }

    fn out_of_range(&self, index: usize) -> SceneError {
        SceneError::ChildOutOfRange {
            node: self.name.clone(),
            index,
            len: self.children.len(),
        }
    }

    /// Number of transform nodes in this sub-graph, counting shared
    /// sub-graphs once per placement.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| match child {
                SceneChild::Node(node) => node.node_count(),
                SceneChild::Shared(node) => node.node_count(),
                SceneChild::Drawable(_) => 0,
            })
            .sum::<usize>()
    }

    /// Depth-first traversal. Each node's transform is composed as
    /// `parent * local`; `visit` is called once per drawable leaf in child
    /// order.
    pub fn traverse<F>(&self, parent: Mat4, visit: &mut F)
    where
        F: FnMut(Mat4, DrawableHandle),
    {
        let composed = parent * self.transform;
        for child in &self.children {
            match child {
                SceneChild::Node(node) => node.traverse(composed, visit),
                SceneChild::Shared(node) => node.traverse(composed, visit),
                SceneChild::Drawable(drawable) => visit(composed, *drawable),
            }
        }
    }

    /// Flatten the sub-graph into a draw list.
    pub fn collect_draws(&self, parent: Mat4) -> Vec<DrawItem> {
        let mut out = Vec::new();
        self.append_draws(parent, &mut out);
        out
    }

    /// Append this sub-graph's draws to an existing list.
    pub fn append_draws(&self, parent: Mat4, out: &mut Vec<DrawItem>) {
        let before = out.len();
        self.traverse(parent, &mut |transform, drawable| {
            out.push(DrawItem {
                transform,
                drawable,
            });
        });
        tracing::trace!(node = %self.name, draws = out.len() - before, "collected draws");
    }
}
