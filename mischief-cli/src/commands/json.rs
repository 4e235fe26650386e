//! JSON dump command implementation.

use mischief_art::ArtFile;
use std::path::Path;

pub fn cmd_json(file: &Path, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let art = ArtFile::open(file)?;

    let json = if pretty {
        serde_json::to_string_pretty(&art.document)?
    } else {
        serde_json::to_string(&art.document)?
    };
    println!("{json}");

    Ok(())
}
