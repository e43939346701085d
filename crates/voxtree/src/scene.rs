//! Free-placement materialization: the scene tree becomes positioned items.
//!
//! Every model is meshed once (centered on its half-extent, the convention
//! the original tooling renders with), then the transform tree is walked
//! depth-first. Translations add and rotations compose down each chain;
//! shape leaves become [`SceneItem`]s bucketed by their transform's layer.

use std::collections::HashMap;

use glam::{Mat3, Vec3};
use voxtree_decode::{NodeContent, TransformNode, Vox};

use crate::error::{Error, Result};
use crate::mesher::{MeshOptions, mesh_model};
use crate::types::{Aabb, Scene, SceneItem};

/// Decode a packed `_r` rotation byte into its 3x3 matrix.
///
/// The byte holds a signed row permutation: bits 0-1 index the 1 in row 0,
/// bits 2-3 index row 1 (row 2 takes the remaining axis), and bits 4-6 are
/// the sign bits for rows 0, 1, 2.
#[must_use]
pub fn decode_rotation(packed: u8) -> Mat3 {
    let row0 = usize::from(packed & 0b11);
    let row1 = usize::from((packed >> 2) & 0b11);
    if row0 > 2 || row1 > 2 || row0 == row1 {
        // Degenerate encoding; treat as unrotated.
        return Mat3::IDENTITY;
    }
    let row2 = 3 - row0 - row1;

    let mut rows = [Vec3::ZERO; 3];
    rows[0][row0] = if packed & 0x10 != 0 { -1.0 } else { 1.0 };
    rows[1][row1] = if packed & 0x20 != 0 { -1.0 } else { 1.0 };
    rows[2][row2] = if packed & 0x40 != 0 { -1.0 } else { 1.0 };
    Mat3::from_cols(rows[0], rows[1], rows[2]).transpose()
}

/// Extract ZYX Euler angles (radians) from a rotation matrix, returned as
/// `(x, y, z)` angles. Same extraction the original renderer's math library
/// performs.
#[must_use]
pub fn euler_zyx(m: &Mat3) -> Vec3 {
    let x = m.y_axis.z.atan2(m.z_axis.z);
    let y = (-m.x_axis.z).atan2((1.0 - m.x_axis.z * m.x_axis.z).max(0.0).sqrt());
    let z = m.x_axis.y.atan2(m.x_axis.x);
    Vec3::new(x, y, z)
}

/// Translation of a transform node's first frame.
///
/// `_t` is a space-separated "x y z" integer triple in raw axis order; a
/// missing or malformed attribute yields a zero vector (non-fatal).
#[must_use]
pub fn frame_translation(node: &TransformNode) -> Vec3 {
    let Some(value) = node.frames.first().and_then(|frame| frame.get("_t")) else {
        return Vec3::ZERO;
    };
    let mut parts = value.split_whitespace().map(str::parse::<f32>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), Some(Ok(z))) => Vec3::new(x, y, z),
        _ => Vec3::ZERO,
    }
}

/// Rotation of a transform node's first frame, as ZYX Euler angles.
#[must_use]
pub fn frame_rotation(node: &TransformNode) -> Vec3 {
    node.frames
        .first()
        .and_then(|frame| frame.get("_r"))
        .and_then(|value| value.parse::<i32>().ok())
        .map_or(Vec3::ZERO, |raw| euler_zyx(&decode_rotation(raw as u8)))
}

/// Offset that centers a model's mesh on its half-extent.
fn center_offset(width: i32, height: i32, depth: i32) -> Vec3 {
    Vec3::new(
        -((width / 2) as f32),
        -((height / 2) as f32),
        -((depth / 2) as f32),
    )
}

/// Materialize the scene tree into layer-bucketed placed items.
///
/// # Errors
///
/// [`Error::InvalidData`] when the document has no scene graph, a shape
/// references no or an out-of-range model, or a transform names a layer the
/// document does not declare.
pub fn build_scene(vox: &Vox) -> Result<Scene> {
    let root = vox.root.as_ref().ok_or_else(|| Error::InvalidData {
        context: "scene",
        detail: String::from("document has no scene graph"),
    })?;

    let meshes = vox
        .models
        .iter()
        .map(|model| {
            // Positions are rebased around the half-extent, so the default
            // origin-anchored bounds would not contain them; a symmetric box
            // does for any parity of the extents.
            let extents = Vec3::new(
                model.width as f32,
                model.height as f32,
                model.depth as f32,
            );
            let options = MeshOptions {
                offset: center_offset(model.width, model.height, model.depth),
                bounds: Some(Aabb::new(-extents, extents)),
                ..MeshOptions::default()
            };
            mesh_model(model, &options)
        })
        .collect();

    let mut items: HashMap<u32, Vec<SceneItem>> = vox
        .layers
        .iter()
        .map(|layer| (layer.node_id, Vec::new()))
        .collect();
    place_items(root, vox, &mut items, Vec3::ZERO, Vec3::ZERO)?;

    Ok(Scene {
        meshes,
        layers: vox.layers.clone(),
        items,
    })
}

fn place_items(
    node: &TransformNode,
    vox: &Vox,
    items: &mut HashMap<u32, Vec<SceneItem>>,
    translation: Vec3,
    rotation: Vec3,
) -> Result<()> {
    let translation = frame_translation(node) + translation;
    let rotation = frame_rotation(node) + rotation;

    match &node.content {
        NodeContent::Shape(shape) => {
            let model = shape.models.first().ok_or_else(|| Error::InvalidData {
                context: "scene",
                detail: format!("shape node {} lists no models", shape.node_id),
            })?;
            let mesh_index = model.model_id as usize;
            if mesh_index >= vox.models.len() {
                return Err(Error::InvalidData {
                    context: "scene",
                    detail: format!(
                        "shape node {} references model {} of {}",
                        shape.node_id,
                        model.model_id,
                        vox.models.len()
                    ),
                });
            }
            let bucket = items
                .get_mut(&node.layer_id)
                .ok_or_else(|| Error::InvalidData {
                    context: "scene",
                    detail: format!("transform node {} names unknown layer {}", node.node_id, node.layer_id),
                })?;
            bucket.push(SceneItem {
                mesh_index,
                position: translation,
                rotation,
            });
        }
        NodeContent::Group(group) => {
            for child in &group.children {
                place_items(child, vox, items, translation, rotation)?;
            }
        }
        NodeContent::Unset => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use voxtree_decode::{Dict, GroupNode, Layer, ShapeModel, ShapeNode, VoxelModel};

    fn frame(pairs: &[(&str, &str)]) -> Dict {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn shape_leaf(node_id: u32, model_id: u32, layer_id: u32, frames: Vec<Dict>) -> TransformNode {
        TransformNode {
            node_id,
            layer_id,
            frames,
            content: NodeContent::Shape(ShapeNode {
                node_id: node_id + 1,
                attributes: Dict::new(),
                models: vec![ShapeModel {
                    model_id,
                    attributes: Dict::new(),
                }],
            }),
            ..TransformNode::default()
        }
    }

    fn single_model_document(root: TransformNode) -> Vox {
        let mut model = VoxelModel::new(1, 1, 1);
        model.set(0, 0, 0, 1);
        Vox {
            models: vec![model],
            root: Some(root),
            layers: vec![Layer {
                node_id: 0,
                ..Layer::default()
            }],
            ..Vox::default()
        }
    }

    #[test]
    fn test_decode_rotation_identity() {
        // Row 0 -> X, row 1 -> Y: the encoding MagicaVoxel writes for an
        // unrotated node.
        let m = decode_rotation(0b0000_0100);
        assert_eq!(m, Mat3::IDENTITY);
        assert_eq!(euler_zyx(&m), Vec3::ZERO);
    }

    #[test]
    fn test_decode_rotation_quarter_turn() {
        // Row 0 picks Y, row 1 picks X negated: a -90 degree turn about Z.
        let m = decode_rotation(0b0010_0001);
        assert_eq!(m * Vec3::X, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(m * Vec3::Y, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(m * Vec3::Z, Vec3::Z);
        let euler = euler_zyx(&m);
        assert!((euler.z + FRAC_PI_2).abs() < 1e-6);
        assert!(euler.x.abs() < 1e-6 && euler.y.abs() < 1e-6);
    }

    #[test]
    fn test_decode_rotation_degenerate_byte() {
        // Rows claiming the same axis cannot form a permutation.
        assert_eq!(decode_rotation(0b0000_0000), Mat3::IDENTITY);
        assert_eq!(decode_rotation(0b0000_1111), Mat3::IDENTITY);
    }

    #[test]
    fn test_frame_translation_raw_axis_order() {
        let node = TransformNode {
            frames: vec![frame(&[("_t", "1 -2 3")])],
            ..TransformNode::default()
        };
        assert_eq!(frame_translation(&node), Vec3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn test_frame_translation_fallbacks() {
        let missing = TransformNode::default();
        assert_eq!(frame_translation(&missing), Vec3::ZERO);

        let malformed = TransformNode {
            frames: vec![frame(&[("_t", "1 two 3")])],
            ..TransformNode::default()
        };
        assert_eq!(frame_translation(&malformed), Vec3::ZERO);

        let short = TransformNode {
            frames: vec![frame(&[("_t", "1 2")])],
            ..TransformNode::default()
        };
        assert_eq!(frame_translation(&short), Vec3::ZERO);
    }

    #[test]
    fn test_build_scene_requires_scene_graph() {
        let vox = Vox::default();
        assert!(matches!(
            build_scene(&vox),
            Err(Error::InvalidData { context: "scene", .. })
        ));
    }

    #[test]
    fn test_build_scene_places_leaf_item() {
        let root = shape_leaf(0, 0, 0, vec![frame(&[("_t", "4 5 6")])]);
        let scene = build_scene(&single_model_document(root)).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        let placed = &scene.items[&0];
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].mesh_index, 0);
        assert_eq!(placed[0].position, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(placed[0].rotation, Vec3::ZERO);
    }

    #[test]
    fn test_build_scene_accumulates_translation_down_the_tree() {
        let leaf = shape_leaf(2, 0, 0, vec![frame(&[("_t", "10 0 0")])]);
        let root = TransformNode {
            node_id: 0,
            frames: vec![frame(&[("_t", "1 2 3")])],
            content: NodeContent::Group(GroupNode {
                node_id: 1,
                attributes: Dict::new(),
                child_node_ids: vec![2],
                children: vec![leaf],
            }),
            ..TransformNode::default()
        };
        let scene = build_scene(&single_model_document(root)).unwrap();
        let placed = &scene.items[&0];
        assert_eq!(placed[0].position, Vec3::new(11.0, 2.0, 3.0));
    }

    #[test]
    fn test_build_scene_unknown_layer_is_an_error() {
        let root = shape_leaf(0, 0, 9, Vec::new());
        assert!(matches!(
            build_scene(&single_model_document(root)),
            Err(Error::InvalidData { context: "scene", .. })
        ));
    }

    #[test]
    fn test_build_scene_model_out_of_range_is_an_error() {
        let root = shape_leaf(0, 5, 0, Vec::new());
        assert!(matches!(
            build_scene(&single_model_document(root)),
            Err(Error::InvalidData { context: "scene", .. })
        ));
    }

    #[test]
    fn test_scene_meshes_are_centered() {
        // 2x2x2 model centered on (1,1,1): vertex coordinates span [-1, 1].
        let mut model = VoxelModel::new(2, 2, 2);
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..2 {
                    model.set(x, y, z, 1);
                }
            }
        }
        let vox = Vox {
            models: vec![model],
            root: Some(shape_leaf(0, 0, 0, Vec::new())),
            layers: vec![Layer::default()],
            ..Vox::default()
        };
        let scene = build_scene(&vox).unwrap();
        for value in &scene.meshes[0].positions {
            assert!((-1.0..=1.0).contains(value), "coordinate {value}");
        }
    }

    #[test]
    fn test_scene_mesh_bounds_enclose_positions() {
        // 4x4x4 shell: plenty of vertices on every side of the center.
        let mut model = VoxelModel::new(4, 4, 4);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    model.set(x, y, z, 1);
                }
            }
        }
        let vox = Vox {
            models: vec![model],
            root: Some(shape_leaf(0, 0, 0, Vec::new())),
            layers: vec![Layer::default()],
            ..Vox::default()
        };
        let scene = build_scene(&vox).unwrap();
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.bounds, Aabb::new(Vec3::splat(-4.0), Vec3::splat(4.0)));
        for vertex in mesh.positions.chunks(3) {
            for (axis, &value) in vertex.iter().enumerate() {
                assert!(
                    (mesh.bounds.min[axis]..=mesh.bounds.max[axis]).contains(&value),
                    "axis {axis} value {value} outside {:?}",
                    mesh.bounds
                );
            }
        }
    }
}
