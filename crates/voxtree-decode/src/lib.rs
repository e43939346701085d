//! Decoder for the MagicaVoxel `.vox` binary scene format.
//!
//! A `.vox` file is a chunk-based container: voxel grids (`SIZE`/`XYZI`), a
//! shared 256-entry palette (`RGBA`), and a transform/group/shape scene tree
//! (`nTRN`/`nGRP`/`nSHP`) plus flat layer/material tables. This crate turns
//! the raw bytes into an owned, immutable [`Vox`] document.
//!
//! # Design principles
//!
//! - **Pure and synchronous**: one call over an in-memory buffer, no I/O
//! - **All-or-nothing**: any structural error aborts the decode; there is no
//!   partial document
//! - **Forward-compatible**: unknown chunk tags are skipped, never fatal
//!
//! # Example
//!
//! ```no_run
//! let bytes = std::fs::read("castle.vox")?;
//! let vox = voxtree_decode::read_document(&bytes)?;
//! for model in &vox.models {
//!     println!("{}x{}x{}", model.width, model.height, model.depth);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod document;
mod error;
pub mod model;
pub mod palette;
pub mod reader;
pub mod scene;

pub use document::{MAGIC, MIN_VERSION, Vox, read_document};
pub use error::{DecodeError, DecodeResult};
pub use model::VoxelModel;
pub use palette::{PALETTE_SIZE, Palette};
pub use reader::{ChunkHeader, Dict, Reader};
pub use scene::{
    GroupNode, Layer, Material, NodeContent, RenderObject, SceneGraphBuilder, ShapeModel,
    ShapeNode, TransformNode,
};
