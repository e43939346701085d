//! File-level entry points: read a `.vox` file and materialize it.

use std::path::Path;

use voxtree_decode::Vox;

use crate::board::build_board;
use crate::error::{Error, Result};
use crate::scene::build_scene;
use crate::types::{Board, MeshBuffers, Scene};

/// Read and decode a `.vox` file.
///
/// # Errors
///
/// [`Error::Io`] when the file cannot be read, [`Error::Decode`] when the
/// bytes are not a valid document.
pub fn load_vox(path: impl AsRef<Path>) -> Result<Vox> {
    let path = path.as_ref();
    let start = std::time::Instant::now();
    let bytes = std::fs::read(path).map_err(|e| Error::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let vox = voxtree_decode::read_document(&bytes)?;
    tracing::info!(
        path = %path.display(),
        models = vox.models.len(),
        layers = vox.layers.len(),
        materials = vox.materials.len(),
        elapsed = ?start.elapsed(),
        "loaded document"
    );
    Ok(vox)
}

/// Load a `.vox` file and cut its first model into a tile grid.
pub fn load_board(path: impl AsRef<Path>, tile_size: i32) -> Result<Board> {
    let vox = load_vox(path)?;
    let start = std::time::Instant::now();
    let board = build_board(&vox, tile_size)?;
    tracing::info!(
        tiles = board.tiles.len(),
        tile_size = board.tile_size,
        faces = board.tiles.iter().map(|t| t.mesh.face_count()).sum::<usize>(),
        elapsed = ?start.elapsed(),
        "built board"
    );
    Ok(board)
}

/// Load a `.vox` file and materialize its scene tree as placed items.
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let vox = load_vox(path)?;
    let start = std::time::Instant::now();
    let scene = build_scene(&vox)?;
    tracing::info!(
        meshes = scene.meshes.len(),
        items = scene.items.values().map(Vec::len).sum::<usize>(),
        faces = scene.meshes.iter().map(MeshBuffers::face_count).sum::<usize>(),
        elapsed = ?start.elapsed(),
        "built scene"
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_vox_missing_file() {
        let result = load_vox("/definitely/not/here.vox");
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_vox_decode_error_passthrough() {
        // A real file with garbage content must surface as a decode error.
        let dir = std::env::temp_dir();
        let path = dir.join("voxtree-loader-garbage.vox");
        std::fs::write(&path, b"not a vox file").unwrap();
        let result = load_vox(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
