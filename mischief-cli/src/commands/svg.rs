//! SVG export command implementation.

use mischief_art::{ArtFile, render_svg};
use std::path::Path;

pub fn cmd_svg(file: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let art = ArtFile::open(file)?;
    let svg = render_svg(&art.document);

    match output {
        Some(path) => {
            std::fs::write(path, &svg)?;
            eprintln!("Wrote {} ({} bytes)", path.display(), svg.len());
        }
        None => print!("{svg}"),
    }

    Ok(())
}
