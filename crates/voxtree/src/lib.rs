//! Meshing and materialization for MagicaVoxel `.vox` documents.
//!
//! Built on top of [`voxtree_decode`], this crate turns decoded voxel grids
//! into renderable geometry and placed scenes:
//!
//! - [`mesher`]: face-culled quad meshes with per-vertex occlusion hints
//! - [`board`]: one model cut into a grid of fixed-size tiles
//! - [`scene`]: the transform tree walked into layer-bucketed placed items
//! - [`texture`]: the shared palette rendered as a 256x1 strip
//!
//! # Example
//!
//! ```no_run
//! let scene = voxtree::load_scene("castle.vox")?;
//! for (layer, items) in &scene.items {
//!     println!("layer {layer}: {} items", items.len());
//! }
//! # Ok::<(), voxtree::Error>(())
//! ```

pub mod board;
mod error;
pub mod loader;
pub mod mesher;
pub mod scene;
pub mod texture;
pub mod types;

pub use board::build_board;
pub use error::{Error, Result};
pub use loader::{load_board, load_scene, load_vox};
pub use mesher::{FaceDirection, MeshOptions, color_coord, mesh_model};
pub use scene::build_scene;
pub use texture::palette_image;
pub use types::{Aabb, Board, MeshBuffers, Scene, SceneItem, Tile};
