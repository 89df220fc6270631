use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::imaging;
use crate::trend::ResultGroup;

/// Write every image of every group as
/// `<dir>/<venue_id>/<group>-<trend>-<image>.png`.
pub fn export_groups(dir: &Path, venue_id: &str, groups: &[ResultGroup]) -> Result<Vec<PathBuf>> {
    let target = dir.join(slug(venue_id));
    fs::create_dir_all(&target)?;

    let mut written = Vec::new();
    for (g, group) in groups.iter().enumerate() {
        let trend = slug(group.trend());
        for (i, payload) in group.images().iter().enumerate() {
            let img = imaging::decode_base64_image(payload)?;
            let path = target.join(format!("{:02}-{}-{:02}.png", g + 1, trend, i + 1));
            fs::write(&path, imaging::encode_png(&img)?)?;
            written.push(path);
        }
    }
    info!(dir = %target.display(), files = written.len(), "exported results");
    Ok(written)
}

/// Lowercase, with anything that is not alphanumeric collapsed to `-`.
fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
