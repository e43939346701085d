//! High-level types for meshed and materialized `.vox` content.
//!
//! These are the structures handed to external collaborators: raw vertex
//! buffers for the GPU upload layer, a tile grid for board logic, and
//! layer-bucketed placed items for the scene layer.

use std::collections::HashMap;

use glam::Vec3;
use voxtree_decode::Layer;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

impl Aabb {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box from the origin to the given extents.
    #[must_use]
    pub fn from_extents(width: f32, height: f32, depth: f32) -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::new(width, height, depth),
        }
    }
}

/// Geometry buffers for one meshed voxel volume.
///
/// Every face contributes 4 vertices and 6 indices; vertices are never
/// shared between faces. Layout per vertex: 3 position floats, 3 normal
/// floats, 2 texture coordinate floats, and (when occlusion is enabled) one
/// float in each occlusion buffer.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    /// Palette-strip coordinates: `(color_coord, 0.5)` per vertex.
    pub tex_coords: Vec<f32>,
    /// Orthogonal neighbor occupancy, one flag per vertex.
    pub occlusion: Vec<f32>,
    /// Diagonal neighbor occupancy, one flag per vertex.
    pub occlusion_diag: Vec<f32>,
    pub indices: Vec<u32>,
    pub bounds: Aabb,
}

impl MeshBuffers {
    /// Number of emitted faces (quads).
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Number of emitted vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// One fixed-size tile column of a board.
#[derive(Debug, Clone)]
pub struct Tile {
    pub mesh: MeshBuffers,
    /// Tile grid coordinate along X.
    pub tile_x: i32,
    /// Max occupied voxel height in this column, plus one.
    pub tile_y: i32,
    /// Tile grid coordinate along Z.
    pub tile_z: i32,
    /// World-space origin of the tile mesh.
    pub position: Vec3,
}

/// A voxel model partitioned into a navigable grid of tiles.
#[derive(Debug, Clone)]
pub struct Board {
    pub tiles: Vec<Tile>,
    /// Source model extent along X.
    pub width: i32,
    /// Source model extent along Y.
    pub height: i32,
    /// Source model extent along Z.
    pub depth: i32,
    /// Edge length of each tile along X and Z.
    pub tile_size: i32,
}

/// One placed instance of a meshed model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneItem {
    /// Index into [`Scene::meshes`] (equals the model id).
    pub mesh_index: usize,
    /// Accumulated translation down the transform chain.
    pub position: Vec3,
    /// Accumulated ZYX Euler angles (radians) down the transform chain.
    pub rotation: Vec3,
}

/// The free-placement materialization of a document.
#[derive(Debug, Clone)]
pub struct Scene {
    /// One mesh per voxel model, in model-id order.
    pub meshes: Vec<MeshBuffers>,
    /// Layers in file order.
    pub layers: Vec<Layer>,
    /// Placed items keyed by layer node id.
    pub items: HashMap<u32, Vec<SceneItem>>,
}
