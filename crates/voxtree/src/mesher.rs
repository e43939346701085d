//! Face-culling voxel meshing with ambient-occlusion neighbor masks.
//!
//! Every filled cell contributes up to six axis-aligned quads; a quad is
//! emitted only when the cell sits on the grid boundary in that direction or
//! the neighboring cell is empty. No vertices are shared and no quads are
//! merged — the consuming shader depends on the fixed 4-vertices-per-face
//! layout and on the per-vertex occupancy flags emitted alongside.

use std::ops::Range;

use glam::{IVec3, Vec3};
use voxtree_decode::VoxelModel;

use crate::types::{Aabb, MeshBuffers};

/// Index pattern for one quad: two triangles over vertices 0..4.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// The six axis-aligned face directions of a unit cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceDirection {
    /// +X
    Right,
    /// -X
    Left,
    /// +Y
    Top,
    /// -Y
    Bottom,
    /// +Z
    Front,
    /// -Z
    Back,
}

impl FaceDirection {
    /// All directions, in emission order.
    pub const ALL: [FaceDirection; 6] = [
        FaceDirection::Right,
        FaceDirection::Left,
        FaceDirection::Top,
        FaceDirection::Bottom,
        FaceDirection::Front,
        FaceDirection::Back,
    ];

    /// Outward unit normal.
    #[must_use]
    pub fn normal(self) -> IVec3 {
        match self {
            FaceDirection::Right => IVec3::X,
            FaceDirection::Left => IVec3::NEG_X,
            FaceDirection::Top => IVec3::Y,
            FaceDirection::Bottom => IVec3::NEG_Y,
            FaceDirection::Front => IVec3::Z,
            FaceDirection::Back => IVec3::NEG_Z,
        }
    }

    /// Quad corners relative to the cell origin, wound for outward facing.
    #[must_use]
    pub fn corners(self) -> [[f32; 3]; 4] {
        match self {
            FaceDirection::Right => [
                [1.0, 0.0, 1.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 1.0, 1.0],
            ],
            FaceDirection::Left => [
                [0.0, 1.0, 1.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            FaceDirection::Top => [
                [0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            FaceDirection::Bottom => [
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0],
            ],
            FaceDirection::Front => [
                [1.0, 0.0, 1.0],
                [1.0, 1.0, 1.0],
                [0.0, 1.0, 1.0],
                [0.0, 0.0, 1.0],
            ],
            FaceDirection::Back => [
                [0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
            ],
        }
    }

    /// True when the face of cell `(x, y, z)` is exposed: on the boundary or
    /// next to an empty cell.
    #[must_use]
    pub fn visible(self, model: &VoxelModel, x: i32, y: i32, z: i32) -> bool {
        let n = self.normal();
        !model.is_filled(x + n.x, y + n.y, z + n.z)
    }

    /// Orthogonal neighbor offsets for the occlusion mask, relative to the
    /// cell one step along the face normal. One offset per quad vertex.
    fn occlusion_offsets(self) -> [IVec3; 4] {
        let n = self.normal();
        if n.x != 0 {
            [
                IVec3::new(0, -1, 0),
                IVec3::new(0, 0, -1),
                IVec3::new(0, 1, 0),
                IVec3::new(0, 0, 1),
            ]
        } else if n.y != 0 {
            [
                IVec3::new(-1, 0, 0),
                IVec3::new(0, 0, -1),
                IVec3::new(1, 0, 0),
                IVec3::new(0, 0, 1),
            ]
        } else {
            [
                IVec3::new(-1, 0, 0),
                IVec3::new(0, -1, 0),
                IVec3::new(1, 0, 0),
                IVec3::new(0, 1, 0),
            ]
        }
    }

    /// Diagonal neighbor offsets for the occlusion mask. One per vertex.
    fn occlusion_diag_offsets(self) -> [IVec3; 4] {
        let n = self.normal();
        if n.x != 0 {
            [
                IVec3::new(0, -1, -1),
                IVec3::new(0, -1, 1),
                IVec3::new(0, 1, 1),
                IVec3::new(0, 1, -1),
            ]
        } else if n.y != 0 {
            [
                IVec3::new(-1, 0, -1),
                IVec3::new(-1, 0, 1),
                IVec3::new(1, 0, 1),
                IVec3::new(1, 0, -1),
            ]
        } else {
            [
                IVec3::new(-1, -1, 0),
                IVec3::new(-1, 1, 0),
                IVec3::new(1, 1, 0),
                IVec3::new(1, -1, 0),
            ]
        }
    }
}

/// Configuration for one meshing pass.
#[derive(Debug, Clone)]
pub struct MeshOptions {
    /// Compute the per-vertex occlusion buffers. Disable for consumers that
    /// do not shade with ambient occlusion.
    pub occlusion: bool,
    /// Added to every emitted position. Board tiling and model centering
    /// both reduce to a constant offset.
    pub offset: Vec3,
    /// Bounds override; defaults to `[0,0,0]..[width,height,depth]`.
    pub bounds: Option<Aabb>,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            occlusion: true,
            offset: Vec3::ZERO,
            bounds: None,
        }
    }
}

/// Palette-strip texture coordinate for a color byte.
///
/// The palette texture is a 256x1 strip; this centers the sample within the
/// texel for palette slot `color - 1`. The arithmetic must stay exactly
/// `(1 + color/256 - 1/512) mod 1` in f32 for correct color reproduction.
#[must_use]
pub fn color_coord(color: u8) -> f32 {
    (1.0 + (1.0 / 256.0) * f32::from(color) - 1.0 / 512.0) % 1.0
}

/// Mesh an entire voxel model.
#[must_use]
pub fn mesh_model(model: &VoxelModel, options: &MeshOptions) -> MeshBuffers {
    let bounds = options.bounds.unwrap_or_else(|| {
        Aabb::from_extents(model.width as f32, model.height as f32, model.depth as f32)
    });
    mesh_region(
        model,
        0..model.width,
        0..model.height,
        0..model.depth,
        options.offset,
        options.occlusion,
        bounds,
    )
}

/// Mesh a sub-volume of a model.
///
/// Face culling and occlusion probes still consult the *full* grid, so a
/// region sharing a border with filled cells outside it emits no wall there.
pub(crate) fn mesh_region(
    model: &VoxelModel,
    xs: Range<i32>,
    ys: Range<i32>,
    zs: Range<i32>,
    offset: Vec3,
    occlusion: bool,
    bounds: Aabb,
) -> MeshBuffers {
    let mut builder = MeshBuilder::new(occlusion);
    for x in xs {
        for y in ys.clone() {
            for z in zs.clone() {
                if model.is_filled(x, y, z) {
                    builder.add_voxel(model, x, y, z, offset);
                }
            }
        }
    }
    builder.finish(bounds)
}

/// Accumulates geometry buffers face by face.
struct MeshBuilder {
    positions: Vec<f32>,
    normals: Vec<f32>,
    tex_coords: Vec<f32>,
    occlusion: Vec<f32>,
    occlusion_diag: Vec<f32>,
    indices: Vec<u32>,
    with_occlusion: bool,
}

impl MeshBuilder {
    fn new(with_occlusion: bool) -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
            occlusion: Vec::new(),
            occlusion_diag: Vec::new(),
            indices: Vec::new(),
            with_occlusion,
        }
    }

    fn add_voxel(&mut self, model: &VoxelModel, x: i32, y: i32, z: i32, offset: Vec3) {
        let Some(color) = model.get(x, y, z) else {
            return;
        };
        let coord = color_coord(color);
        for face in FaceDirection::ALL {
            if face.visible(model, x, y, z) {
                self.add_face(model, face, x, y, z, offset, coord);
            }
        }
    }

    fn add_face(
        &mut self,
        model: &VoxelModel,
        face: FaceDirection,
        x: i32,
        y: i32,
        z: i32,
        offset: Vec3,
        coord: f32,
    ) {
        let base = (self.indices.len() / 6 * 4) as u32;
        for local in QUAD_INDICES {
            self.indices.push(base + local);
        }

        let cell = Vec3::new(x as f32, y as f32, z as f32) + offset;
        for corner in face.corners() {
            self.positions.push(corner[0] + cell.x);
            self.positions.push(corner[1] + cell.y);
            self.positions.push(corner[2] + cell.z);
        }

        let normal = face.normal();
        for _ in 0..4 {
            self.normals.push(normal.x as f32);
            self.normals.push(normal.y as f32);
            self.normals.push(normal.z as f32);
            self.tex_coords.push(coord);
            self.tex_coords.push(0.5);
        }

        if self.with_occlusion {
            // All probes hang off the cell one step along the normal; when
            // that base cell is already outside the grid every sample is 0.
            let n = face.normal();
            let base_cell = IVec3::new(x + n.x, y + n.y, z + n.z);
            let in_boundary = model.contains(base_cell.x, base_cell.y, base_cell.z);
            for off in face.occlusion_offsets() {
                self.occlusion.push(sample(model, in_boundary, base_cell, off));
            }
            for off in face.occlusion_diag_offsets() {
                self.occlusion_diag
                    .push(sample(model, in_boundary, base_cell, off));
            }
        }
    }

    fn finish(self, bounds: Aabb) -> MeshBuffers {
        MeshBuffers {
            positions: self.positions,
            normals: self.normals,
            tex_coords: self.tex_coords,
            occlusion: self.occlusion,
            occlusion_diag: self.occlusion_diag,
            indices: self.indices,
            bounds,
        }
    }
}

fn sample(model: &VoxelModel, in_boundary: bool, base: IVec3, offset: IVec3) -> f32 {
    if in_boundary && model.is_filled(base.x + offset.x, base.y + offset.y, base.z + offset.z) {
        1.0
    } else {
        0.0
    }
}
