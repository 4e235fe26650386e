//! Info command implementation.

use mischief_art::{ActionKind, ArtFile};
use std::collections::BTreeMap;
use std::path::Path;

fn action_name(kind: &ActionKind) -> &'static str {
    match kind {
        ActionKind::Stroke { .. } => "stroke",
        ActionKind::DrawImage { .. } => "draw_image",
        ActionKind::Unknown08 { .. } => "unknown_08",
        ActionKind::MergeLayer { .. } => "merge_layer",
        ActionKind::LayerMatrix { .. } => "layer_matrix",
        ActionKind::Cut { .. } => "cut",
        ActionKind::PasteLayer { .. } => "paste_layer",
        ActionKind::PenMatrix { .. } => "pen_matrix",
        ActionKind::PenProperties { .. } => "pen_properties",
        ActionKind::PenColor { .. } => "pen_color",
        ActionKind::IsEraser { .. } => "is_eraser",
    }
}

pub fn cmd_info(file: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let art = ArtFile::open(file)?;
    let metadata = std::fs::metadata(file)?;
    let doc = &art.document;

    println!("Art File Information");
    println!("====================");
    println!("File: {}", file.display());
    println!("Size: {} bytes", metadata.len());
    println!("Container version: {:?} ({:#04x})", art.header.version, art.header.version_byte);
    if let Some(pins) = &art.header.pins {
        println!("Pins block: {} bytes", pins.len());
    }
    println!("Compressed payload: {} bytes", art.header.raw_size);
    println!("Document version: {}", doc.version);

    println!();
    println!("Canvas:");
    let [r, g, b] = doc.background_color;
    println!("  Background: rgb({r}, {g}, {b}), alpha {}", doc.background_alpha);
    println!("  View zoom: {}", doc.view_zoom);

    println!();
    println!("Pen:");
    let [r, g, b] = doc.pen_info.color;
    println!("  Type: {}", doc.pen_info.kind);
    println!("  Color: rgb({r}, {g}, {b})");
    println!("  Size: {} (min {})", doc.pen_info.size, doc.pen_info.size_min);
    println!(
        "  Opacity: {} (min {})",
        doc.pen_info.opacity, doc.pen_info.opacity_min
    );
    println!("  Eraser: {}", doc.pen_info.is_eraser);

    println!();
    println!("Layers ({}, active {}):", doc.layers.len(), doc.active_layer);
    for (index, layer) in doc.layers.iter().enumerate() {
        println!(
            "  [{index}] {:?}: {} actions, opacity {}, {}",
            layer.name,
            layer.action_count,
            layer.opacity,
            if layer.visible { "visible" } else { "hidden" }
        );
    }

    if !doc.images.is_empty() {
        println!();
        println!("Images:");
        for (index, image) in doc.images.iter().enumerate() {
            println!("  [{index}] type {}, {} bytes", image.kind, image.size);
        }
    }

    println!();
    println!("Actions: {} total", doc.actions.len());
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for action in &doc.actions {
        *counts.entry(action_name(&action.kind)).or_default() += 1;
    }
    for (name, count) in counts {
        println!("  {name}: {count}");
    }

    if verbose {
        println!();
        for (index, action) in doc.actions.iter().enumerate() {
            match &action.kind {
                ActionKind::Stroke { points } => println!(
                    "  [{index}] layer {} stroke, {} points",
                    action.layer,
                    points.len()
                ),
                other => println!("  [{index}] layer {} {}", action.layer, action_name(other)),
            }
        }
    }

    Ok(())
}
