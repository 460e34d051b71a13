//! CLI command implementations

pub mod encode;
pub mod info;
pub mod predict;

use anyhow::{Context, Result};
use nutrition_engine::PetProfileInput;
use std::io::Read;
use std::path::Path;

/// Read a pet profile from a JSON file, or from stdin when the path is `-`
pub fn load_profile(path: &Path) -> Result<PetProfileInput> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read profile from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile from {}", path.display()))?
    };

    serde_json::from_str(&raw).context("Profile is not valid JSON for a pet profile")
}
