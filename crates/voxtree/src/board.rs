//! Board-mode materialization: one model cut into a grid of tiles.
//!
//! The first model of the document is partitioned along X and Z into
//! `tile_size`-edged columns. Each column is meshed independently with its
//! positions rebased to the tile origin, so every tile mesh lives in the
//! same local space and is placed by its world-space `position`. Culling
//! still sees the whole grid: no walls appear between adjacent tiles.

use glam::Vec3;
use voxtree_decode::Vox;

use crate::error::{Error, Result};
use crate::mesher::mesh_region;
use crate::types::{Aabb, Board, Tile};

/// Partition the document's first model into a tile grid.
///
/// # Errors
///
/// [`Error::InvalidData`] when the document has no models or `tile_size` is
/// not positive.
pub fn build_board(vox: &Vox, tile_size: i32) -> Result<Board> {
    if tile_size <= 0 {
        return Err(Error::InvalidData {
            context: "board",
            detail: format!("tile size {tile_size} must be positive"),
        });
    }
    let model = vox.models.first().ok_or_else(|| Error::InvalidData {
        context: "board",
        detail: String::from("document has no models"),
    })?;

    let mut tiles = Vec::new();
    let mut x_start = 0;
    while x_start < model.width {
        let x_end = (x_start + tile_size).min(model.width);
        let mut z_start = 0;
        while z_start < model.depth {
            let z_end = (z_start + tile_size).min(model.depth);

            // Max occupied height in this column; 0 when the column is
            // empty, so an empty tile still stands one unit tall.
            let mut max_height = 0;
            for x in x_start..x_end {
                for y in 0..model.height {
                    for z in z_start..z_end {
                        if model.is_filled(x, y, z) && y > max_height {
                            max_height = y;
                        }
                    }
                }
            }

            let bounds = Aabb::from_extents(
                tile_size as f32,
                (max_height + 1) as f32,
                tile_size as f32,
            );
            let mesh = mesh_region(
                model,
                x_start..x_end,
                0..model.height,
                z_start..z_end,
                Vec3::new(-(x_start as f32), 0.0, -(z_start as f32)),
                true,
                bounds,
            );

            // The tile origin is anchored to the band's last Z row, which
            // matches the rebased positions whenever the model depth is a
            // multiple of the tile size.
            let origin_z = (z_end - 1) - (tile_size - 1);
            tiles.push(Tile {
                mesh,
                tile_x: x_start / tile_size,
                tile_y: max_height + 1,
                tile_z: origin_z / tile_size,
                position: Vec3::new(x_start as f32, 0.0, origin_z as f32),
            });
            z_start += tile_size;
        }
        x_start += tile_size;
    }

    Ok(Board {
        tiles,
        width: model.width,
        height: model.height,
        depth: model.depth,
        tile_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxtree_decode::VoxelModel;

    /// 4x2x2 slab, fully filled, as the document's only model.
    fn slab_document() -> Vox {
        let mut model = VoxelModel::new(4, 2, 2);
        for x in 0..4 {
            for y in 0..2 {
                for z in 0..2 {
                    model.set(x, y, z, 1);
                }
            }
        }
        Vox {
            models: vec![model],
            ..Vox::default()
        }
    }

    #[test]
    fn test_board_rejects_bad_input() {
        let vox = Vox::default();
        assert!(matches!(
            build_board(&vox, 2),
            Err(Error::InvalidData { context: "board", .. })
        ));
        assert!(matches!(
            build_board(&slab_document(), 0),
            Err(Error::InvalidData { context: "board", .. })
        ));
    }

    #[test]
    fn test_board_tile_layout() {
        let board = build_board(&slab_document(), 2).unwrap();
        assert_eq!(board.tile_size, 2);
        assert_eq!((board.width, board.height, board.depth), (4, 2, 2));
        // 4x2 footprint with 2x2 tiles -> 2 tiles along X, 1 along Z.
        assert_eq!(board.tiles.len(), 2);

        let first = &board.tiles[0];
        assert_eq!((first.tile_x, first.tile_y, first.tile_z), (0, 2, 0));
        assert_eq!(first.position, Vec3::ZERO);

        let second = &board.tiles[1];
        assert_eq!((second.tile_x, second.tile_y, second.tile_z), (1, 2, 0));
        assert_eq!(second.position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_no_walls_between_tiles() {
        // The slab is solid: each 2x2x2 tile half exposes its outer shell
        // (5 sides of 4 quads each) and none toward the other half.
        let board = build_board(&slab_document(), 2).unwrap();
        for tile in &board.tiles {
            assert_eq!(tile.mesh.face_count(), 20);
        }
    }

    #[test]
    fn test_tile_positions_are_rebased() {
        let board = build_board(&slab_document(), 2).unwrap();
        for tile in &board.tiles {
            // Local coordinates stay within the tile box regardless of
            // which column the tile came from.
            for vertex in tile.mesh.positions.chunks(3) {
                assert!((0.0..=2.0).contains(&vertex[0]), "x = {}", vertex[0]);
                assert!((0.0..=2.0).contains(&vertex[2]), "z = {}", vertex[2]);
            }
        }
    }

    #[test]
    fn test_tile_bounds_follow_max_height() {
        // One lone voxel at height 1 in the first column.
        let mut model = VoxelModel::new(2, 4, 2);
        model.set(0, 1, 0, 1);
        let vox = Vox {
            models: vec![model],
            ..Vox::default()
        };
        let board = build_board(&vox, 2).unwrap();
        assert_eq!(board.tiles.len(), 1);
        let tile = &board.tiles[0];
        assert_eq!(tile.tile_y, 2);
        assert_eq!(tile.mesh.bounds, Aabb::from_extents(2.0, 2.0, 2.0));
        assert_eq!(tile.mesh.face_count(), 6);
    }
}
