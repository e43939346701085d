//! The `.vox` document root and the chunk dispatch loop.

use crate::error::{DecodeError, DecodeResult};
use crate::model::VoxelModel;
use crate::palette::{PALETTE_SIZE, Palette, patch_color};
use crate::reader::Reader;
use crate::scene::{
    GroupNode, Layer, Material, RenderObject, SceneGraphBuilder, ShapeModel, ShapeNode,
    TransformNode,
};

/// File magic, always the first four bytes of a `.vox` document.
pub const MAGIC: [u8; 4] = *b"VOX ";

/// Lowest format version this decoder accepts.
pub const MIN_VERSION: u32 = 150;

/// A fully decoded `.vox` document.
///
/// Immutable once [`read_document`] returns; meshing and materialization
/// only ever borrow it.
#[derive(Debug, Clone, Default)]
pub struct Vox {
    /// Voxel models in file order; `nSHP` model ids index this list.
    pub models: Vec<VoxelModel>,
    /// Shared color table. Zero-filled when the file has no `RGBA` chunk.
    pub palette: Palette,
    /// Root of the transform/group/shape tree, when the file has one.
    pub root: Option<TransformNode>,
    /// `LAYR` chunks in file order.
    pub layers: Vec<Layer>,
    /// `MATL` chunks in file order, stored opaquely.
    pub materials: Vec<Material>,
    /// `rOBJ` chunks in file order, stored opaquely.
    pub render_objects: Vec<RenderObject>,
}

/// Decode a `.vox` document from raw bytes.
///
/// Unknown chunk tags are skipped wholesale (forward compatibility); every
/// other failure is terminal and no partial document is returned.
///
/// # Errors
///
/// [`DecodeError::InvalidFormat`] for a bad magic, an unsupported version, a
/// missing `MAIN` chunk, an out-of-range voxel, or an unplaceable scene
/// node; [`DecodeError::UnexpectedEof`] whenever a field declares more bytes
/// than remain.
pub fn read_document(bytes: &[u8]) -> DecodeResult<Vox> {
    if bytes.len() < 8 {
        return Err(DecodeError::BufferTooSmall {
            expected: 8,
            actual: bytes.len(),
        });
    }
    let mut reader = Reader::new(bytes);

    let magic = reader.read_bytes(4, "magic")?;
    if magic != MAGIC {
        return Err(DecodeError::InvalidFormat {
            context: "header",
            detail: format!("bad magic {magic:?}, expected {MAGIC:?}"),
        });
    }
    let version = reader.read_u32("version")?;
    if version < MIN_VERSION {
        return Err(DecodeError::InvalidFormat {
            context: "header",
            detail: format!("unsupported version {version}, need at least {MIN_VERSION}"),
        });
    }

    // MAIN is mandatory and carries no content of its own; only the
    // children that follow matter, so its declared content bytes are
    // skipped.
    let main = reader.read_chunk_header()?;
    if main.tag != *b"MAIN" {
        return Err(DecodeError::InvalidFormat {
            context: "header",
            detail: format!("expected MAIN chunk, got {:?}", main.tag),
        });
    }
    reader.skip(main.content_size as usize, "MAIN content")?;

    let mut vox = Vox::default();
    let mut builder = SceneGraphBuilder::new();

    // Clean end-of-stream at a header boundary is the normal end of the
    // document; truncation inside any chunk is not.
    while !reader.is_empty() {
        let header = reader.read_chunk_header()?;
        match &header.tag {
            b"SIZE" => read_size(&mut reader, &mut vox)?,
            b"XYZI" => read_voxels(&mut reader, &mut vox)?,
            b"RGBA" => read_palette(&mut reader, &mut vox)?,
            b"nTRN" => builder.push_transform(read_transform(&mut reader)?)?,
            b"nGRP" => builder.push_group(read_group(&mut reader)?)?,
            b"nSHP" => builder.push_shape(read_shape(&mut reader)?)?,
            b"LAYR" => read_layer(&mut reader, &mut vox)?,
            b"MATL" => read_material(&mut reader, &mut vox)?,
            b"rOBJ" => read_render_object(&mut reader, &mut vox)?,
            _ => reader.skip(header.total_size(), "unknown chunk")?,
        }
    }

    vox.root = builder.finish();
    Ok(vox)
}

/// `SIZE`: append a new model. The file stores the extents in z, x, y
/// order (depth first), a quirk the `XYZI` layout depends on.
fn read_size(reader: &mut Reader<'_>, vox: &mut Vox) -> DecodeResult<()> {
    let depth = reader.read_u32("SIZE")? as i32;
    let width = reader.read_u32("SIZE")? as i32;
    let height = reader.read_u32("SIZE")? as i32;
    vox.models.push(VoxelModel::new(width, height, depth));
    Ok(())
}

/// `XYZI`: fill the most recently appended model. Each voxel is four raw
/// bytes in z, x, y, color order.
fn read_voxels(reader: &mut Reader<'_>, vox: &mut Vox) -> DecodeResult<()> {
    let model = vox.models.last_mut().ok_or(DecodeError::InvalidFormat {
        context: "XYZI",
        detail: String::from("voxel data before any SIZE chunk"),
    })?;
    let count = reader.read_u32("XYZI")?;
    model.voxel_count = count;
    for _ in 0..count {
        let bytes = reader.read_bytes(4, "XYZI")?;
        let (z, x, y, color) = (
            i32::from(bytes[0]),
            i32::from(bytes[1]),
            i32::from(bytes[2]),
            bytes[3],
        );
        if !model.set(x, y, z, color) {
            return Err(DecodeError::InvalidFormat {
                context: "XYZI",
                detail: format!(
                    "voxel ({x}, {y}, {z}) outside {}x{}x{} grid",
                    model.width, model.height, model.depth
                ),
            });
        }
    }
    Ok(())
}

/// `RGBA`: 255 colors for palette slots 0..=254, then 4 reserved bytes.
///
/// The slot for color byte `c` is `c - 1`, so the first color read lands in
/// slot 0. Together with the reserved tail this consumes the chunk's full
/// 1024 content bytes.
fn read_palette(reader: &mut Reader<'_>, vox: &mut Vox) -> DecodeResult<()> {
    let mut palette = Palette::default();
    for slot in 0..PALETTE_SIZE - 1 {
        palette.colors[slot] = patch_color(reader.read_u32("RGBA")?);
    }
    reader.skip(4, "RGBA reserved bytes")?;
    vox.palette = palette;
    Ok(())
}

fn read_transform(reader: &mut Reader<'_>) -> DecodeResult<TransformNode> {
    let node_id = reader.read_u32("nTRN")?;
    let attributes = reader.read_dict("nTRN")?;
    let child_node_id = reader.read_u32("nTRN")?;
    let reserved_id = reader.read_u32("nTRN")?;
    let layer_id = reader.read_u32("nTRN")?;
    let frame_count = reader.read_u32("nTRN")? as usize;
    let mut frames = Vec::with_capacity(frame_count);
    for _ in 0..frame_count {
        frames.push(reader.read_dict("nTRN frame")?);
    }
    Ok(TransformNode {
        node_id,
        attributes,
        child_node_id,
        reserved_id,
        layer_id,
        frames,
        ..TransformNode::default()
    })
}

fn read_group(reader: &mut Reader<'_>) -> DecodeResult<GroupNode> {
    let node_id = reader.read_u32("nGRP")?;
    let attributes = reader.read_dict("nGRP")?;
    let child_node_ids = reader.read_u32_list("nGRP")?;
    Ok(GroupNode {
        node_id,
        attributes,
        child_node_ids,
        children: Vec::new(),
    })
}

fn read_shape(reader: &mut Reader<'_>) -> DecodeResult<ShapeNode> {
    let node_id = reader.read_u32("nSHP")?;
    let attributes = reader.read_dict("nSHP")?;
    let model_count = reader.read_u32("nSHP")? as usize;
    let mut models = Vec::with_capacity(model_count);
    for _ in 0..model_count {
        let model_id = reader.read_u32("nSHP model")?;
        let attributes = reader.read_dict("nSHP model")?;
        models.push(ShapeModel {
            model_id,
            attributes,
        });
    }
    Ok(ShapeNode {
        node_id,
        attributes,
        models,
    })
}

fn read_layer(reader: &mut Reader<'_>, vox: &mut Vox) -> DecodeResult<()> {
    let node_id = reader.read_u32("LAYR")?;
    let attributes = reader.read_dict("LAYR")?;
    let reserved = [reader.read_u32("LAYR")?, reader.read_u32("LAYR")?];
    vox.layers.push(Layer {
        node_id,
        attributes,
        reserved,
    });
    Ok(())
}

fn read_material(reader: &mut Reader<'_>, vox: &mut Vox) -> DecodeResult<()> {
    let material_id = reader.read_u32("MATL")?;
    let attributes = reader.read_dict("MATL")?;
    vox.materials.push(Material {
        material_id,
        attributes,
    });
    Ok(())
}

fn read_render_object(reader: &mut Reader<'_>, vox: &mut Vox) -> DecodeResult<()> {
    let attributes = reader.read_dict("rOBJ")?;
    vox.render_objects.push(RenderObject { attributes });
    Ok(())
}
