use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Find overlapping glyphs in PDF documents and mark them in a copy.
#[derive(Debug, Parser)]
#[command(name = "glyphscan", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). Overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan PDFs for overlapping glyphs and write marked copies
    Scan {
        /// PDF file or glob pattern, repeatable. Default: pdfs/*.pdf
        #[arg(short, long, value_name = "FILE_OR_PATTERN")]
        input: Vec<String>,

        /// Do not draw per-region overlap counts on marked pages
        #[arg(long)]
        no_labels: bool,

        /// Export overlaps to <stem>_overlaps.json next to each PDF
        #[arg(long)]
        json: bool,

        /// Write a marked PDF only when the overlap count exceeds N
        #[arg(long, value_name = "N")]
        threshold: Option<usize>,

        #[command(flatten)]
        detection: DetectionArgs,
    },

    /// Print the glyphs extracted from a PDF
    Glyphs {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run overlap detection over a JSON glyph dump
    Analyze {
        /// Glyph JSON as written by `glyphs --format json`
        #[arg(value_name = "GLYPHS")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        #[command(flatten)]
        detection: DetectionArgs,
    },
}

/// Detection settings shared by `scan` and `analyze`.
///
/// Flags override values loaded from `--config`.
#[derive(Debug, Clone, Default, Args)]
pub struct DetectionArgs {
    /// Keep large-font watermark glyphs in the scan
    #[arg(long)]
    pub include_watermarks: bool,

    /// Font size at or above which a glyph counts as a watermark (default: 40)
    #[arg(long, value_name = "PT", value_parser = non_negative)]
    pub watermark_font_size: Option<f64>,

    /// Shrink glyph boxes by character category before the scan
    #[arg(long)]
    pub trim_whitespace: bool,

    /// Multiplier for the trim amounts (default: 1.0)
    #[arg(long, value_name = "S", value_parser = non_negative)]
    pub trim_scale: Option<f64>,

    /// Keep only overlaps above this percentage of the union area (default: 0)
    #[arg(long, value_name = "PCT", value_parser = percentage)]
    pub union_threshold: Option<f64>,

    /// TOML file whose [scan] table provides default options
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Output format for the glyphs subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (tab-separated)
    Text,
    /// JSON glyph dump, readable by `analyze`
    Json,
    /// CSV output
    Csv,
}

/// Output format for the analyze subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary with statistics
    Text,
    /// Overlap export document
    Json,
}

fn non_negative(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} must be a non-negative number"))
    }
}

fn percentage(s: &str) -> Result<f64, String> {
    let value = non_negative(s)?;
    if value <= 100.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not a percentage (0-100)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scan_defaults() {
        let cli = Cli::parse_from(["glyphscan", "scan"]);
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Scan {
                ref input,
                no_labels,
                json,
                threshold,
                ref detection,
            } => {
                assert!(input.is_empty());
                assert!(!no_labels);
                assert!(!json);
                assert_eq!(threshold, None);
                assert!(!detection.include_watermarks);
                assert_eq!(detection.union_threshold, None);
                assert!(detection.config.is_none());
            }
            _ => panic!("expected Scan subcommand"),
        }
    }

    #[test]
    fn parse_scan_with_all_flags() {
        let cli = Cli::parse_from([
            "glyphscan",
            "-vv",
            "scan",
            "-i",
            "a.pdf",
            "--input",
            "docs/*.pdf",
            "--no-labels",
            "--json",
            "--threshold",
            "5",
            "--union-threshold",
            "12.5",
            "--include-watermarks",
            "--trim-whitespace",
            "--trim-scale",
            "0.5",
            "--watermark-font-size",
            "30",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Scan {
                ref input,
                no_labels,
                json,
                threshold,
                ref detection,
            } => {
                assert_eq!(input, &["a.pdf", "docs/*.pdf"]);
                assert!(no_labels);
                assert!(json);
                assert_eq!(threshold, Some(5));
                assert_eq!(detection.union_threshold, Some(12.5));
                assert!(detection.include_watermarks);
                assert!(detection.trim_whitespace);
                assert_eq!(detection.trim_scale, Some(0.5));
                assert_eq!(detection.watermark_font_size, Some(30.0));
            }
            _ => panic!("expected Scan subcommand"),
        }
    }

    #[test]
    fn union_threshold_must_be_a_percentage() {
        assert!(Cli::try_parse_from(["glyphscan", "scan", "--union-threshold", "150"]).is_err());
        assert!(Cli::try_parse_from(["glyphscan", "scan", "--union-threshold", "-1"]).is_err());
        assert!(Cli::try_parse_from(["glyphscan", "scan", "--union-threshold", "abc"]).is_err());
    }

    #[test]
    fn parse_glyphs_with_pages_and_format() {
        let cli = Cli::parse_from([
            "glyphscan", "glyphs", "test.pdf", "--pages", "1,3-5", "--format", "csv",
        ]);
        match cli.command {
            Commands::Glyphs {
                ref file,
                ref pages,
                ref format,
            } => {
                assert_eq!(file, &PathBuf::from("test.pdf"));
                assert_eq!(pages.as_deref(), Some("1,3-5"));
                assert!(matches!(format, OutputFormat::Csv));
            }
            _ => panic!("expected Glyphs subcommand"),
        }
    }

    #[test]
    fn parse_analyze_with_config() {
        let cli = Cli::parse_from([
            "glyphscan",
            "analyze",
            "glyphs.json",
            "--config",
            "scan.toml",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Analyze {
                ref file,
                ref format,
                ref detection,
            } => {
                assert_eq!(file, &PathBuf::from("glyphs.json"));
                assert!(matches!(format, ReportFormat::Json));
                assert_eq!(detection.config, Some(PathBuf::from("scan.toml")));
            }
            _ => panic!("expected Analyze subcommand"),
        }
    }

    #[test]
    fn glyphs_requires_file() {
        assert!(Cli::try_parse_from(["glyphscan", "glyphs"]).is_err());
    }
}
