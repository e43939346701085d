//! Scene graph node types and the incremental tree builder.
//!
//! MagicaVoxel writes `nTRN`/`nGRP`/`nSHP` chunks in a streaming order that
//! is not strictly pre-order, and node ids are not guaranteed contiguous, so
//! parent/child edges cannot be resolved with a direct id lookup. The
//! builder instead fills open child slots incrementally: each arriving chunk
//! is placed in the first spot (depth-first from the root) that can legally
//! accept it.
//!
//! During decode the nodes live in a flat arena addressed by index; the
//! arena is frozen into an immutable owned tree once the chunk stream ends.

use crate::error::{DecodeError, DecodeResult};
use crate::reader::Dict;

/// What a transform node points at.
///
/// A transform is either an interior group pointer or a leaf shape pointer,
/// never both. `Unset` only exists while the chunk stream is still being
/// consumed.
#[derive(Debug, Clone, Default)]
pub enum NodeContent {
    /// No `nGRP`/`nSHP` chunk has claimed this transform yet.
    #[default]
    Unset,
    /// Interior node: a group of child transforms.
    Group(GroupNode),
    /// Leaf node: a reference to a voxel model.
    Shape(ShapeNode),
}

/// An `nTRN` chunk: a placement in the scene tree.
#[derive(Debug, Clone, Default)]
pub struct TransformNode {
    pub node_id: u32,
    pub attributes: Dict,
    pub child_node_id: u32,
    pub reserved_id: u32,
    pub layer_id: u32,
    /// One attribute map per animation frame; frame 0 carries the `_t`
    /// translation and `_r` rotation used for static placement.
    pub frames: Vec<Dict>,
    pub content: NodeContent,
}

/// An `nGRP` chunk: an ordered set of child transforms.
#[derive(Debug, Clone, Default)]
pub struct GroupNode {
    pub node_id: u32,
    pub attributes: Dict,
    /// Declared child ids; the length is the number of open slots.
    pub child_node_ids: Vec<u32>,
    /// Resolved children in arrival order. Populated by
    /// [`SceneGraphBuilder::finish`].
    pub children: Vec<TransformNode>,
}

/// An `nSHP` chunk: a reference to one or more models.
///
/// Only the first model is materialized; the rest are unused animation
/// alternatives.
#[derive(Debug, Clone, Default)]
pub struct ShapeNode {
    pub node_id: u32,
    pub attributes: Dict,
    pub models: Vec<ShapeModel>,
}

/// One `(model id, attributes)` entry of a shape node.
#[derive(Debug, Clone, Default)]
pub struct ShapeModel {
    pub model_id: u32,
    pub attributes: Dict,
}

/// A `LAYR` chunk. Used purely as a bucketing key for placed items.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub node_id: u32,
    pub attributes: Dict,
    pub reserved: [u32; 2],
}

/// A `MATL` chunk, stored opaquely.
#[derive(Debug, Clone, Default)]
pub struct Material {
    pub material_id: u32,
    pub attributes: Dict,
}

/// An `rOBJ` chunk, stored opaquely.
#[derive(Debug, Clone, Default)]
pub struct RenderObject {
    pub attributes: Dict,
}

/// Incremental scene tree assembly over the flat chunk stream.
#[derive(Debug, Default)]
pub struct SceneGraphBuilder {
    nodes: Vec<TransformNode>,
    /// Resolved child indices per arena node; only group nodes acquire any.
    children: Vec<Vec<usize>>,
    root: Option<usize>,
}

impl SceneGraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transform nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arena index of the root transform, if one has arrived.
    #[must_use]
    pub fn root_index(&self) -> Option<usize> {
        self.root
    }

    /// Borrow an arena node. Lets tests probe the tree mid-construction.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&TransformNode> {
        self.nodes.get(index)
    }

    /// Resolved child indices of an arena node, in arrival order.
    #[must_use]
    pub fn resolved_children(&self, index: usize) -> &[usize] {
        self.children.get(index).map_or(&[], Vec::as_slice)
    }

    /// Accept an `nTRN` node.
    ///
    /// The first transform becomes the root; every later one fills the first
    /// open group slot found depth-first from the root.
    pub fn push_transform(&mut self, node: TransformNode) -> DecodeResult<()> {
        let node_id = node.node_id;
        let index = self.nodes.len();
        self.nodes.push(node);
        self.children.push(Vec::new());

        let Some(root) = self.root else {
            self.root = Some(index);
            return Ok(());
        };
        if self.attach_transform(root, index) {
            Ok(())
        } else {
            Err(DecodeError::InvalidFormat {
                context: "scene graph",
                detail: format!("no open slot for transform node {node_id}"),
            })
        }
    }

    /// Try to attach `child` under the subtree rooted at `index`.
    ///
    /// Slots are visited in declared order; an occupied slot is descended
    /// into before the next slot is considered.
    fn attach_transform(&mut self, index: usize, child: usize) -> bool {
        let NodeContent::Group(group) = &self.nodes[index].content else {
            return false;
        };
        let declared = group.child_node_ids.len();
        for slot in 0..declared {
            if self.children[index].len() <= slot {
                self.children[index].push(child);
                return true;
            }
            let occupant = self.children[index][slot];
            if self.attach_transform(occupant, child) {
                return true;
            }
        }
        false
    }

    /// Accept an `nGRP` node: claim the first unset transform.
    pub fn push_group(&mut self, group: GroupNode) -> DecodeResult<()> {
        let node_id = group.node_id;
        let index = self.find_unset_transform(node_id, "group")?;
        self.nodes[index].content = NodeContent::Group(group);
        Ok(())
    }

    /// Accept an `nSHP` node: claim the first unset transform.
    pub fn push_shape(&mut self, shape: ShapeNode) -> DecodeResult<()> {
        let node_id = shape.node_id;
        let index = self.find_unset_transform(node_id, "shape")?;
        self.nodes[index].content = NodeContent::Shape(shape);
        Ok(())
    }

    fn find_unset_transform(&self, node_id: u32, kind: &str) -> DecodeResult<usize> {
        let root = self.root.ok_or_else(|| DecodeError::InvalidFormat {
            context: "scene graph",
            detail: format!("{kind} node {node_id} arrived before any transform node"),
        })?;
        self.find_unset(root).ok_or_else(|| DecodeError::InvalidFormat {
            context: "scene graph",
            detail: format!("no unresolved transform for {kind} node {node_id}"),
        })
    }

    fn find_unset(&self, index: usize) -> Option<usize> {
        match &self.nodes[index].content {
            NodeContent::Unset => Some(index),
            NodeContent::Group(_) => self.children[index]
                .iter()
                .find_map(|&child| self.find_unset(child)),
            NodeContent::Shape(_) => None,
        }
    }

    /// Freeze the arena into an owned tree rooted at the first transform.
    ///
    /// Returns `None` when the document carried no `nTRN` chunk at all
    /// (legal for old single-model files).
    #[must_use]
    pub fn finish(self) -> Option<TransformNode> {
        let root = self.root?;
        let Self {
            nodes, children, ..
        } = self;
        let mut built: Vec<Option<TransformNode>> = nodes.into_iter().map(Some).collect();

        // A child is always pushed after its parent, so its arena index is
        // strictly greater; a reverse walk sees every child completed before
        // the parent that owns it.
        for index in (0..built.len()).rev() {
            if children[index].is_empty() {
                continue;
            }
            let mut resolved = Vec::with_capacity(children[index].len());
            for &child in &children[index] {
                if let Some(node) = built[child].take() {
                    resolved.push(node);
                }
            }
            if let Some(node) = built[index].as_mut() {
                if let NodeContent::Group(group) = &mut node.content {
                    group.children = resolved;
                }
            }
        }
        built[root].take()
    }
}
