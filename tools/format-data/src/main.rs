use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

use transit_map_data::schema::{config_schema, data_schema, validate, Schema};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SchemaKind {
    /// A line or yard file
    Data,
    /// The agency/region config
    Config,
}

impl SchemaKind {
    fn schema(self) -> &'static Schema {
        match self {
            Self::Data => data_schema(),
            Self::Config => config_schema(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "format-data",
    author,
    version,
    about = "Validate and normalize the formatting of map data files"
)]
struct Args {
    /// File to validate and format
    file: PathBuf,

    /// Schema to validate against
    #[arg(short, long, value_enum, default_value_t = SchemaKind::Data)]
    schema: SchemaKind,

    /// Rewrite the file in place instead of printing it
    #[arg(short, long, conflicts_with = "check")]
    write: bool,

    /// Only report whether the file is valid and already formatted
    #[arg(long)]
    check: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let formatted = format_document(&content, args.schema.schema())
        .with_context(|| format!("{} is not valid", args.file.display()))?;

    if args.check {
        if formatted != content {
            bail!("{} is not formatted; rerun with --write", args.file.display());
        }
        log::info!("{} is valid and formatted", args.file.display());
    } else if args.write {
        if formatted == content {
            log::debug!("{} is already formatted", args.file.display());
        } else {
            std::fs::write(&args.file, &formatted)
                .with_context(|| format!("Failed to write {}", args.file.display()))?;
            log::info!("Formatted {}", args.file.display());
        }
    } else {
        print!("{formatted}");
    }

    Ok(())
}

/// Validate `content` and render it with two-space indentation and a trailing
/// newline, keeping the authored key order.
fn format_document(content: &str, schema: &Schema) -> Result<String> {
    let document: Value = serde_json::from_str(content).context("Invalid JSON")?;

    let report = validate(&document, schema);
    if !report.is_valid() {
        for error in &report.errors {
            log::error!("  {error}");
        }
        bail!("{} schema violations", report.errors.len());
    }

    let mut formatted = serde_json::to_string_pretty(&document)?;
    formatted.push('\n');
    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YARD: &str = r##"{"type":"FeatureCollection","metadata":{"id":"oc-belfast-yard","name":"Belfast Yard","type":"rail-yard","color":"#888888"},
        "features":[{"type":"Feature","geometry":{"type":"LineString","coordinates":[[-75.645,45.415],[-75.63,45.425]]},"properties":{"type":"tracks"}}]}"##;

    #[test]
    fn test_format_keeps_key_order() {
        let formatted = format_document(YARD, data_schema()).unwrap();

        assert!(formatted.starts_with("{\n  \"type\": \"FeatureCollection\",\n  \"metadata\": {\n    \"id\""));
        assert!(formatted.ends_with("}\n"));
        assert_eq!(format_document(&formatted, data_schema()).unwrap(), formatted);
    }

    #[test]
    fn test_format_rejects_invalid_documents() {
        let err = format_document(YARD, config_schema()).unwrap_err();
        assert!(err.to_string().contains("schema violations"));

        assert!(format_document("{", data_schema()).is_err());
    }

    #[test]
    fn test_sample_data_is_formatted() {
        let data = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
        let config = std::fs::read_to_string(data.join("config.json")).unwrap();
        assert_eq!(format_document(&config, config_schema()).unwrap(), config);

        let line = std::fs::read_to_string(data.join("oc-transpo/line-1.json")).unwrap();
        assert_eq!(format_document(&line, data_schema()).unwrap(), line);
    }

    #[test]
    fn test_write_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yard.json");
        std::fs::write(&path, YARD).unwrap();

        let formatted = format_document(&std::fs::read_to_string(&path).unwrap(), data_schema()).unwrap();
        std::fs::write(&path, &formatted).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), formatted);
    }
}
