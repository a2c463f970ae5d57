//! Option resolution: defaults, then the `--config` file, then flags.

use std::path::Path;

use glyphscan::ScanOptions;
use serde::Deserialize;

use crate::cli::DetectionArgs;

/// Layout of a config file. Only the `[scan]` table is read.
///
/// ```toml
/// [scan]
/// union_threshold = 10.0
/// trim_whitespace = true
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    scan: ScanOptions,
}

/// Parse config file text into scan options.
pub fn parse_config(text: &str) -> Result<ScanOptions, String> {
    toml::from_str::<ConfigFile>(text)
        .map(|c| c.scan)
        .map_err(|e| e.to_string())
}

/// Load scan options from a TOML file.
///
/// Prints the error and returns `Err(1)` if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<ScanOptions, i32> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: cannot read config {}: {e}", path.display());
        1
    })?;
    parse_config(&text).map_err(|e| {
        eprintln!("Error: invalid config {}: {e}", path.display());
        1
    })
}

impl DetectionArgs {
    /// Effective options: the config file (or defaults) with flags applied.
    pub fn resolve(&self) -> Result<ScanOptions, i32> {
        let mut options = match &self.config {
            Some(path) => load_config(path)?,
            None => ScanOptions::default(),
        };
        self.apply(&mut options);
        tracing::debug!(?options, "resolved scan options");
        Ok(options)
    }

    fn apply(&self, options: &mut ScanOptions) {
        if self.include_watermarks {
            options.filter_watermarks = false;
        }
        if self.trim_whitespace {
            options.trim_whitespace = true;
        }
        if let Some(size) = self.watermark_font_size {
            options.watermark_font_size = size;
        }
        if let Some(scale) = self.trim_scale {
            options.trim_scale = scale;
        }
        if let Some(pct) = self.union_threshold {
            options.union_threshold = pct;
        }
    }
}
