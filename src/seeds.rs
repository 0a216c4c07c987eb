use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

/// One seed URL with its 1-based line number in the input file.
#[derive(Debug, Clone)]
pub struct Seed {
    pub url: String,
    pub line: usize,
}

/// Load seed URLs from a text file: one URL per line, trimmed.
/// Blank lines and lines starting with '#' are skipped.
pub fn load(path: &Path) -> Result<Vec<Seed>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;

    let seeds: Vec<Seed> = text
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            Some(Seed {
                url: trimmed.to_string(),
                line: i + 1,
            })
        })
        .collect();

    if seeds.is_empty() {
        bail!("Seed file {} contains no URLs", path.display());
    }

    info!("Loaded {} seed URLs from {}", seeds.len(), path.display());
    Ok(seeds)
}
