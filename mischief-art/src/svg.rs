//! SVG export of the recorded drawing.
//!
//! Actions are stored in creation order, not per layer, so rendering
//! replays the whole action stream while tracking pen state and the
//! current layer-times-pen transform, appending each stroke to the SVG
//! group of its layer. Only stroke geometry is exported; embedded images
//! and layer merges are out of scope for the vector export.

use crate::document::{ActionKind, ArtDocument};
use mischief_core::reader::{MATRIX4_IDENTITY, Matrix4};
use std::fmt::Write;

/// Comparison tolerance for "is this the default value" checks; finer
/// differences do not survive the number formatting anyway.
const EPSILON: f32 = 1.0e-5;

fn is_one(value: f32) -> bool {
    (value - 1.0).abs() < EPSILON
}

fn matrix_multiply(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    let mut out = [[0.0f32; 4]; 4];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..4).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

fn matrix_flat(matrix: &Matrix4) -> String {
    matrix
        .iter()
        .flatten()
        .map(f32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the document's strokes to an SVG string.
pub fn render_svg(document: &ArtDocument) -> String {
    let mut svg = String::from("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n");

    // Non-white backgrounds get a full-size backing rectangle.
    if document.background_color != [0xFF, 0xFF, 0xFF] {
        let [r, g, b] = document.background_color;
        let _ = writeln!(
            svg,
            "\t<rect id=\"mischiefBg\" width=\"100%\" height=\"100%\" \
             style=\"stroke: none; fill: rgb({r}, {g}, {b});\"/>"
        );
    }

    // One group per layer; the y-flip matches the canvas orientation.
    let mut layer_code: Vec<String> = document
        .layers
        .iter()
        .map(|layer| {
            format!(
                "\t<g id=\"{}\" transform-origin=\"50% 50%\" transform=\"scale(1.0 -1.0)\" \
                 opacity=\"{}\" visibility=\"{}\" \
                 style=\"fill: none; stroke: black; stroke-width:1px;\">\n",
                layer.name,
                layer.opacity,
                if layer.visible { "visible" } else { "hidden" }
            )
        })
        .collect();

    let mut transform = matrix_flat(&MATRIX4_IDENTITY);
    let mut pen_color = [0u8, 0, 0];
    let mut pen_alpha = 1.0f32;
    let mut pen_size = 1.0f32;
    let mut is_eraser = false;

    for action in &document.actions {
        match &action.kind {
            ActionKind::PenMatrix { matrix, .. } => {
                let Some(layer) = document.layers.get(action.layer as usize) else {
                    continue;
                };
                transform = matrix_flat(&matrix_multiply(&layer.matrix, matrix));
            }
            ActionKind::Stroke { points } => {
                let Some(code) = layer_code.get_mut(action.layer as usize) else {
                    continue;
                };

                let mut css = String::new();
                if is_eraser {
                    css.push_str("stroke: white; ");
                } else {
                    let [r, g, b] = pen_color;
                    let _ = write!(css, "stroke: rgb({r}, {g}, {b}); ");
                }
                if !is_one(pen_size) {
                    let _ = write!(css, "stroke-width: {pen_size}px; ");
                }
                if !is_one(pen_alpha) {
                    let _ = write!(css, "stroke-opacity: {pen_alpha}; ");
                }
                css.push_str("stroke-linejoin: round; ");
                css.push_str("stroke-linecap: round; ");
                let _ = write!(css, "transform: matrix3d({transform}); ");

                let _ = write!(code, "\t\t<polyline style=\"{css}\" points=\"");
                for point in points {
                    let _ = write!(code, "{},{} ", point.x, point.y);
                }
                code.push_str("\" />\n");
            }
            ActionKind::PenColor { color } => pen_color = *color,
            ActionKind::PenProperties { size, opacity, .. } => {
                pen_size = *size;
                pen_alpha = *opacity;
            }
            ActionKind::IsEraser { is_eraser: flag } => is_eraser = *flag,
            ActionKind::PasteLayer { .. } => {
                svg.push_str("<!-- paste layer used, the result may be invalid -->\n");
            }
            _ => {}
        }
    }

    for code in layer_code {
        svg.push_str(&code);
        svg.push_str("\t</g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_multiply_identity() {
        let m: Matrix4 = [
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ];
        assert_eq!(matrix_multiply(&m, &MATRIX4_IDENTITY), m);
        assert_eq!(matrix_multiply(&MATRIX4_IDENTITY, &m), m);
    }

    #[test]
    fn test_matrix_flat_format() {
        let flat = matrix_flat(&MATRIX4_IDENTITY);
        assert!(flat.starts_with("1, 0, 0, 0, 0, 1"));
        assert_eq!(flat.split(", ").count(), 16);
    }
}
