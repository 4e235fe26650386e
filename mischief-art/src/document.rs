//! Parser for the decompressed `.art` payload.
//!
//! The payload is a flat little-endian record stream: a preamble with
//! global drawing state, the layer table, embedded images, and then the
//! recorded action stream in creation order. Several preamble fields have
//! no known meaning and are kept by their payload offsets so dumps stay
//! comparable with the reference tooling.

use mischief_core::error::{MischiefError, Result};
use mischief_core::reader::{ByteReader, Matrix4};
use serde::Serialize;

/// Width of the fixed layer-name field.
const LAYER_NAME_LEN: usize = 256;

/// Pen configuration stored in the preamble.
#[derive(Debug, Clone, Serialize)]
pub struct PenInfo {
    /// Pen/brush type id.
    pub kind: u32,
    /// RGB pen color.
    pub color: [u8; 3],
    /// Stroke noise amount.
    pub noise: f32,
    /// Pen size.
    pub size: f32,
    /// Minimum pen size under low pressure.
    pub size_min: f32,
    /// Pen opacity.
    pub opacity: f32,
    /// Minimum opacity under low pressure.
    pub opacity_min: f32,
    /// Whether the pen erases.
    pub is_eraser: bool,
}

impl PenInfo {
    fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            kind: reader.read_u32()?,
            color: reader.read_color()?,
            noise: reader.read_f32()?,
            size: reader.read_f32()?,
            size_min: reader.read_f32()?,
            opacity: reader.read_f32()?,
            opacity_min: reader.read_f32()?,
            is_eraser: reader.read_u32()? != 0,
        })
    }
}

/// One entry of the layer table.
#[derive(Debug, Clone, Serialize)]
pub struct LayerInfo {
    /// Layer visibility flag.
    pub visible: bool,
    /// Layer opacity.
    pub opacity: f32,
    /// Layer name (fixed 256-byte NUL-padded field).
    pub name: String,
    /// Number of actions recorded against this layer.
    pub action_count: u32,
    /// Layer transform.
    pub matrix: Matrix4,
    /// Layer zoom factor.
    pub zoom: f32,
}

impl LayerInfo {
    fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            visible: reader.read_u32()? != 0,
            opacity: reader.read_f32()?,
            name: reader.read_string(LAYER_NAME_LEN)?,
            action_count: reader.read_u32()?,
            matrix: reader.read_matrix()?,
            zoom: reader.read_f32()?,
        })
    }
}

/// An embedded image blob.
#[derive(Debug, Clone, Serialize)]
pub struct Image {
    /// Image type id.
    pub kind: u32,
    /// Raw image bytes.
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
    /// Size of the raw image bytes.
    pub size: usize,
}

impl Image {
    fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        let kind = reader.read_u32()?;
        let size = reader.read_u32()? as usize;
        let data = reader.read_bytes(size)?.to_vec();
        Ok(Self { kind, data, size })
    }
}

/// One point of a stroke, pressure in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StrokePoint {
    /// Canvas x coordinate.
    pub x: f32,
    /// Canvas y coordinate.
    pub y: f32,
    /// Pen pressure.
    pub pressure: f32,
}

/// A recorded action, tagged with the layer it applies to.
#[derive(Debug, Clone, Serialize)]
pub struct Action {
    /// Index of the layer the action belongs to.
    pub layer: u32,
    /// What the action does.
    #[serde(flatten)]
    pub kind: ActionKind,
}

/// Action payload by action id.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionKind {
    /// `0x01`: a pen stroke.
    Stroke {
        /// Stroke points, delta-decoded to absolute coordinates.
        points: Vec<StrokePoint>,
    },
    /// `0x07`: stamp an embedded image onto the canvas.
    DrawImage {
        /// Destination center.
        dst_center: [f32; 2],
        /// Destination size.
        dst_size: [f32; 2],
        /// Unidentified field.
        unknown: u32,
        /// Source pixel size.
        src_size: [u32; 2],
        /// Index into the image table.
        image_id: u32,
    },
    /// `0x08`: unidentified action with a single argument.
    Unknown08 {
        /// Unidentified argument.
        argument: u32,
    },
    /// `0x0c`: merge another layer into this one.
    MergeLayer {
        /// Source layer index.
        from_layer: u32,
        /// Source opacity.
        opacity_src: f32,
        /// Destination opacity.
        opacity_dst: f32,
        /// Merge transform.
        matrix: Matrix4,
        /// Merge zoom factor.
        zoom: f32,
    },
    /// `0x0d`: set the layer transform.
    LayerMatrix {
        /// New layer transform.
        matrix: Matrix4,
        /// New zoom factor.
        zoom: f32,
    },
    /// `0x0e`: cut a rectangle.
    Cut {
        /// Cut rectangle.
        rect: [f32; 4],
    },
    /// `0x0f`: paste a region from another layer.
    PasteLayer {
        /// Source layer index.
        from_layer: u32,
        /// Source rectangle.
        rect: [f32; 4],
        /// Source transform.
        matrix_1: Matrix4,
        /// Source zoom.
        zoom_1: f32,
        /// Destination transform.
        matrix_2: Matrix4,
        /// Destination zoom.
        zoom_2: f32,
    },
    /// `0x33`: set the pen transform.
    PenMatrix {
        /// New pen transform.
        matrix: Matrix4,
        /// New zoom factor.
        zoom: f32,
    },
    /// `0x34`: set pen properties.
    PenProperties {
        /// Pen/brush type id.
        kind: u32,
        /// Stroke noise amount.
        noise: f32,
        /// Pen size.
        size: f32,
        /// Minimum pen size.
        size_min: f32,
        /// Pen opacity.
        opacity: f32,
        /// Minimum opacity.
        opacity_min: f32,
    },
    /// `0x35`: set the pen color.
    PenColor {
        /// New RGB pen color.
        color: [u8; 3],
    },
    /// `0x36`: toggle eraser mode.
    IsEraser {
        /// Whether the pen now erases.
        is_eraser: bool,
    },
}

impl Action {
    fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        let record_start = reader.position();
        let layer = reader.read_u32()?;
        let id = reader.read_u32()?;

        let kind = match id {
            0x01 => ActionKind::Stroke {
                points: parse_stroke_points(reader)?,
            },
            0x07 => ActionKind::DrawImage {
                dst_center: [reader.read_f32()?, reader.read_f32()?],
                dst_size: [reader.read_f32()?, reader.read_f32()?],
                unknown: reader.read_u32()?,
                src_size: [reader.read_u32()?, reader.read_u32()?],
                image_id: reader.read_u32()?,
            },
            0x08 => ActionKind::Unknown08 {
                argument: reader.read_u32()?,
            },
            0x0c => ActionKind::MergeLayer {
                from_layer: reader.read_u32()?,
                opacity_src: reader.read_f32()?,
                opacity_dst: reader.read_f32()?,
                matrix: reader.read_matrix()?,
                zoom: reader.read_f32()?,
            },
            0x0d => ActionKind::LayerMatrix {
                matrix: reader.read_matrix()?,
                zoom: reader.read_f32()?,
            },
            0x0e => ActionKind::Cut {
                rect: read_rect(reader)?,
            },
            0x0f => ActionKind::PasteLayer {
                from_layer: reader.read_u32()?,
                rect: read_rect(reader)?,
                matrix_1: reader.read_matrix()?,
                zoom_1: reader.read_f32()?,
                matrix_2: reader.read_matrix()?,
                zoom_2: reader.read_f32()?,
            },
            0x33 => ActionKind::PenMatrix {
                matrix: reader.read_matrix()?,
                zoom: reader.read_f32()?,
            },
            0x34 => ActionKind::PenProperties {
                kind: reader.read_u32()?,
                noise: reader.read_f32()?,
                size: reader.read_f32()?,
                size_min: reader.read_f32()?,
                opacity: reader.read_f32()?,
                opacity_min: reader.read_f32()?,
            },
            0x35 => ActionKind::PenColor {
                color: reader.read_color()?,
            },
            0x36 => ActionKind::IsEraser {
                is_eraser: reader.read_u32()? != 0,
            },
            _ => return Err(MischiefError::unknown_action(id, record_start)),
        };

        Ok(Self { layer, kind })
    }
}

/// Decode a stroke's point list.
///
/// The first point is three plain floats. Each following point packs
/// signed 14-bit x/y deltas in 1/32 canvas units and a 10-bit pressure
/// split across the trailing byte.
fn parse_stroke_points(reader: &mut ByteReader<'_>) -> Result<Vec<StrokePoint>> {
    let point_count = reader.read_u32()? as usize;
    let mut points = Vec::with_capacity(point_count.min(1 << 20));

    let mut x = reader.read_f32()?;
    let mut y = reader.read_f32()?;
    let pressure = reader.read_f32()?;
    points.push(StrokePoint { x, y, pressure });

    for _ in 1..point_count {
        let packed = reader.read_u32()?;
        let tail = reader.read_u8()?;

        let mut dx = (packed & 0x3FFF) as f32;
        if packed & (1 << 14) != 0 {
            dx = -dx;
        }
        let mut dy = ((packed >> 15) & 0x3FFF) as f32;
        if packed & (1 << 29) != 0 {
            dy = -dy;
        }
        let pressure_bits = (packed >> 30) | (u32::from(tail) << 2);

        x += dx / 32.0;
        y += dy / 32.0;
        points.push(StrokePoint {
            x,
            y,
            pressure: pressure_bits as f32 / 0x3FF as f32,
        });
    }

    Ok(points)
}

fn read_rect(reader: &mut ByteReader<'_>) -> Result<[f32; 4]> {
    Ok([
        reader.read_f32()?,
        reader.read_f32()?,
        reader.read_f32()?,
        reader.read_f32()?,
    ])
}

/// A fully parsed `.art` document.
#[derive(Debug, Clone, Serialize)]
pub struct ArtDocument {
    /// Document format version.
    pub version: u32,
    /// Index of the active layer.
    pub active_layer: u32,
    /// Unidentified field at payload offset 0x08.
    pub unknown_08: u32,
    /// Canvas background color.
    pub background_color: [u8; 3],
    /// Canvas background alpha.
    pub background_alpha: f32,
    /// Unidentified field at payload offset 0x13.
    pub unknown_13: u32,
    /// Unidentified field at payload offset 0x17.
    pub unknown_17: u32,
    /// Unidentified field at payload offset 0x1b.
    pub unknown_1b: u32,
    /// Unidentified field at payload offset 0x1f.
    pub unknown_1f: u32,
    /// Pen configuration.
    pub pen_info: PenInfo,
    /// Unidentified field at payload offset 0x42.
    pub unknown_42: u32,
    /// Unidentified field at payload offset 0x46.
    pub unknown_46: f32,
    /// View transform.
    pub view_matrix: Matrix4,
    /// View zoom factor.
    pub view_zoom: f32,
    /// Z-order of layers, bottom to top.
    pub layer_order: Vec<u32>,
    /// Layer table.
    pub layers: Vec<LayerInfo>,
    /// Embedded images.
    pub images: Vec<Image>,
    /// Recorded actions in creation order.
    pub actions: Vec<Action>,
    /// Unidentified trailing field.
    pub unknown_eof: u32,
}

impl ArtDocument {
    /// Parse a decompressed payload.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);

        let version = reader.read_u32()?;
        let active_layer = reader.read_u32()?;
        let unknown_08 = reader.read_u32()?;
        let background_color = reader.read_color()?;
        let background_alpha = reader.read_f32()?;
        let unknown_13 = reader.read_u32()?;
        let unknown_17 = reader.read_u32()?;
        let unknown_1b = reader.read_u32()?;
        let unknown_1f = reader.read_u32()?;
        let pen_info = PenInfo::parse(&mut reader)?;
        let unknown_42 = reader.read_u32()?;
        let unknown_46 = reader.read_f32()?;
        let view_matrix = reader.read_matrix()?;
        let view_zoom = reader.read_f32()?;

        let order_count = reader.read_u32()? as usize;
        let layer_order = reader.read_u32_array(order_count)?;

        let layer_count = reader.read_u32()? as usize;
        let mut layers = Vec::with_capacity(layer_count.min(1 << 16));
        for _ in 0..layer_count {
            layers.push(LayerInfo::parse(&mut reader)?);
        }

        let image_count = reader.read_u32()? as usize;
        let mut images = Vec::with_capacity(image_count.min(1 << 16));
        for _ in 0..image_count {
            images.push(Image::parse(&mut reader)?);
        }

        let action_count = reader.read_u32()? as usize;
        let mut actions = Vec::with_capacity(action_count.min(1 << 20));
        for _ in 0..action_count {
            actions.push(Action::parse(&mut reader)?);
        }

        let unknown_eof = reader.read_u32()?;

        Ok(Self {
            version,
            active_layer,
            unknown_08,
            background_color,
            background_alpha,
            unknown_13,
            unknown_17,
            unknown_1b,
            unknown_1f,
            pen_info,
            unknown_42,
            unknown_46,
            view_matrix,
            view_zoom,
            layer_order,
            layers,
            images,
            actions,
            unknown_eof,
        })
    }
}
