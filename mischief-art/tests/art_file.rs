//! Full-file integration: container -> decompression -> document -> SVG.
//!
//! The fixture document is assembled byte-by-byte, compressed with the
//! token encoder as an all-literal stream, and wrapped in a container.

use mischief_art::{ActionKind, ArtFile, ArtVersion, header};
use mischief_pack::ArtEncoder;

struct PayloadBuilder {
    bytes: Vec<u8>,
}

impl PayloadBuilder {
    fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    fn u32(&mut self, value: u32) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn f32(&mut self, value: f32) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn color(&mut self, rgb: [u8; 3]) -> &mut Self {
        self.bytes.extend_from_slice(&rgb);
        self
    }

    fn identity_matrix(&mut self) -> &mut Self {
        for row in 0..4 {
            for col in 0..4 {
                self.f32(if row == col { 1.0 } else { 0.0 });
            }
        }
        self
    }

    fn name(&mut self, name: &str) -> &mut Self {
        let mut field = name.as_bytes().to_vec();
        field.resize(256, 0);
        self.bytes.extend_from_slice(&field);
        self
    }
}

fn fixture_document_bytes() -> Vec<u8> {
    let mut b = PayloadBuilder::new();

    // Preamble.
    b.u32(21) // version
        .u32(0) // active layer
        .u32(0) // unknown_08
        .color([200, 100, 50])
        .f32(1.0) // background alpha
        .u32(0) // unknown_13
        .u32(0) // unknown_17
        .u32(0) // unknown_1b
        .u32(0); // unknown_1f

    // Pen info.
    b.u32(2) // kind
        .color([10, 20, 30])
        .f32(0.0) // noise
        .f32(4.0) // size
        .f32(1.0) // size_min
        .f32(0.8) // opacity
        .f32(0.1) // opacity_min
        .u32(0); // is_eraser

    b.u32(0) // unknown_42
        .f32(0.0) // unknown_46
        .identity_matrix() // view matrix
        .f32(1.0); // view zoom

    // Layer order and table.
    b.u32(1).u32(0); // order
    b.u32(1); // layer count
    b.u32(1) // visible
        .f32(0.9)
        .name("sketch")
        .u32(2) // action count
        .identity_matrix()
        .f32(1.0);

    // No embedded images.
    b.u32(0);

    // Actions: set pen color, then draw one two-point stroke.
    b.u32(2);
    b.u32(0).u32(0x35).color([255, 0, 0]);
    b.u32(0).u32(0x01).u32(2);
    b.f32(16.0).f32(-8.0).f32(1.0);
    // Second point: dx = +64 (2.0), dy = -32 (-1.0), full pressure.
    let packed: u32 = 64 | (32 << 15) | (1 << 29) | (0b11 << 30);
    b.u32(packed);
    b.bytes.push(0xFF);

    b.u32(0); // unknown_eof
    b.bytes
}

fn fixture_container(version_byte: u8) -> Vec<u8> {
    let mut encoder = ArtEncoder::new();
    for &byte in &fixture_document_bytes() {
        encoder.literal(byte);
    }
    let payload = encoder.finish_payload();

    let mut file = Vec::new();
    file.extend_from_slice(&header::ART_MAGIC);
    file.push(version_byte);
    file.resize(header::PREAMBLE_LEN, 0);
    file.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    file.extend_from_slice(&payload);
    file
}

#[test]
fn full_file_round_trip() {
    let file = fixture_container(0x81);
    let art = ArtFile::from_bytes(&file).unwrap();

    assert_eq!(art.header.version, ArtVersion::V81);
    assert_eq!(art.document.version, 21);
    assert_eq!(art.document.background_color, [200, 100, 50]);
    assert_eq!(art.document.pen_info.kind, 2);
    assert_eq!(art.document.pen_info.size, 4.0);
    assert_eq!(art.document.layer_order, vec![0]);

    assert_eq!(art.document.layers.len(), 1);
    let layer = &art.document.layers[0];
    assert_eq!(layer.name, "sketch");
    assert!(layer.visible);
    assert_eq!(layer.action_count, 2);

    assert_eq!(art.document.actions.len(), 2);
    assert!(matches!(
        art.document.actions[0].kind,
        ActionKind::PenColor { color: [255, 0, 0] }
    ));
    let ActionKind::Stroke { points } = &art.document.actions[1].kind else {
        panic!("expected a stroke action");
    };
    assert_eq!(points.len(), 2);
    assert_eq!((points[0].x, points[0].y), (16.0, -8.0));
    assert_eq!((points[1].x, points[1].y), (18.0, -9.0));
    assert_eq!(points[1].pressure, 1.0);
}

#[test]
fn unpack_payload_matches_document_bytes() {
    let file = fixture_container(0x00);
    let payload = ArtFile::unpack_payload(&file).unwrap();
    assert_eq!(payload, fixture_document_bytes());
}

#[test]
fn svg_export_contains_stroke_and_background() {
    let file = fixture_container(0x81);
    let art = ArtFile::from_bytes(&file).unwrap();
    let svg = mischief_art::render_svg(&art.document);

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("id=\"mischiefBg\""));
    assert!(svg.contains("rgb(200, 100, 50)"));
    assert!(svg.contains("id=\"sketch\""));
    assert!(svg.contains("<polyline"));
    assert!(svg.contains("stroke: rgb(255, 0, 0)"));
    assert!(svg.contains("16,-8 18,-9"));
    assert!(svg.ends_with("</svg>\n"));
}

#[test]
fn document_serializes_to_json() {
    let file = fixture_container(0x81);
    let art = ArtFile::from_bytes(&file).unwrap();
    let json = serde_json::to_value(&art.document).unwrap();

    assert_eq!(json["version"], 21);
    assert_eq!(json["layers"][0]["name"], "sketch");
    assert_eq!(json["actions"][0]["action"], "pen_color");
    assert_eq!(json["actions"][1]["action"], "stroke");
}
