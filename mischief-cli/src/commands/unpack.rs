//! Unpack command implementation.

use mischief_art::ArtFile;
use std::io::Write;
use std::path::Path;

pub fn cmd_unpack(file: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(file)?;
    let payload = ArtFile::unpack_payload(&data)?;

    match output {
        Some(path) => {
            std::fs::write(path, &payload)?;
            eprintln!(
                "Unpacked {} compressed bytes to {} ({} bytes)",
                data.len(),
                path.display(),
                payload.len()
            );
        }
        None => std::io::stdout().write_all(&payload)?,
    }

    Ok(())
}
