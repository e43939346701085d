//! Command-line inspector for `.vox` documents.
//!
//! Decodes a file, prints per-model and scene statistics, and (with a tile
//! size) reports the board partition. Useful for sanity-checking exported
//! files before handing them to a renderer.

use std::process::ExitCode;

use voxtree::{Result, build_board, build_scene, load_vox};

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: voxtree-inspect <file.vox> [tile-size]");
        return ExitCode::FAILURE;
    };
    let tile_size = args.next().and_then(|raw| raw.parse::<i32>().ok());

    match inspect(&path, tile_size) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn inspect(path: &str, tile_size: Option<i32>) -> Result<()> {
    let vox = load_vox(path)?;

    for (id, model) in vox.models.iter().enumerate() {
        println!(
            "model {id}: {}x{}x{}, {} voxels",
            model.width, model.height, model.depth, model.voxel_count
        );
    }
    for layer in &vox.layers {
        let name = layer
            .attributes
            .get("_name")
            .map_or("(unnamed)", String::as_str);
        println!("layer {}: {name}", layer.node_id);
    }
    println!("materials: {}", vox.materials.len());
    let has_palette = vox.palette.colors.iter().any(|&c| c != 0);
    println!("palette: {}", if has_palette { "present" } else { "absent" });

    if vox.root.is_some() {
        let scene = build_scene(&vox)?;
        let placed: usize = scene.items.values().map(Vec::len).sum();
        let faces: usize = scene.meshes.iter().map(voxtree::MeshBuffers::face_count).sum();
        println!("scene: {placed} placed items, {faces} faces across {} meshes", scene.meshes.len());
    }

    if let Some(tile_size) = tile_size {
        let board = build_board(&vox, tile_size)?;
        println!(
            "board: {} tiles of edge {} over {}x{}",
            board.tiles.len(),
            board.tile_size,
            board.width,
            board.depth
        );
        for tile in &board.tiles {
            println!(
                "  tile ({}, {}): height {}, {} faces",
                tile.tile_x,
                tile.tile_z,
                tile.tile_y,
                tile.mesh.face_count()
            );
        }
    }
    Ok(())
}
