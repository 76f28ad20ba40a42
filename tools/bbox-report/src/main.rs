use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use transit_map_data::prelude::*;
use transit_map_data::spatial::containment::{agency_data_bbox, region_agencies_bbox};

#[derive(Parser, Debug)]
#[command(
    name = "bbox-report",
    author,
    version,
    about = "Print computed bounding boxes and check declared ones",
    long_about = "With a file reference, prints the bbox computed from that line or yard file's \
                  features, ready to paste into the config or the file itself.\n\n\
                  With `config`, prints the computed bbox of every agency and region and fails \
                  if any declared bbox does not contain its data."
)]
struct Args {
    /// A data file reference (relative to the data directory) or `config`
    target: String,

    /// Data directory that file references are relative to
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Config file (defaults to <data-dir>/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

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

    let source = DirectorySource::new(&args.data_dir);

    if args.target == "config" {
        let config_path = args.config.clone().unwrap_or_else(|| args.data_dir.join("config.json"));
        let config = Config::load(&config_path).context("Failed to load config")?;
        report_config(&config, &source)
    } else {
        report_file(&args.target, &source)
    }
}

fn report_file(file_ref: &str, source: &DirectorySource) -> Result<()> {
    let computed = file_bbox(file_ref, source)?;
    println!("{}", computed.to_json_string());
    Ok(())
}

/// Computed bbox of one file, failing if the file declares a bbox that does not contain it.
fn file_bbox(file_ref: &str, source: &DirectorySource) -> Result<BBox> {
    let dataset = source
        .load_dataset(file_ref)
        .with_context(|| format!("Failed to load {} from {}", file_ref, source.root().display()))?;

    let Some(computed) = compute_bbox(&dataset.features) else {
        bail!("{file_ref} has no features with a bounding box");
    };

    if let Some(declared) = dataset.bbox {
        if !declared.contains(&computed) {
            bail!("{file_ref} declares bbox {declared} which does not contain its data bbox {computed}");
        }
    }
    Ok(computed)
}

fn report_config(config: &Config, source: &DirectorySource) -> Result<()> {
    for agency in &config.agencies {
        let computed = agency_data_bbox(agency, source)
            .with_context(|| format!("Failed to compute bbox of agency '{}'", agency.id))?;
        match computed {
            Some(computed) => println!("agency {}: {}", agency.id, computed.to_json_string()),
            None => println!("agency {}: (no data)", agency.id),
        }
    }

    for region in &config.regions {
        let computed = region_agencies_bbox(region, config)
            .with_context(|| format!("Failed to compute bbox of region '{}'", region.id))?;
        match computed {
            Some(computed) => println!("region {}: {}", region.id, computed.to_json_string()),
            None => println!("region {}: (no agencies)", region.id),
        }
    }

    let violations = check_bounds(config, source)
        .with_context(|| format!("Failed to check bounds of {}", source.root().display()))?;
    if !violations.is_empty() {
        bail!("{} declared bboxes do not contain their data", violations.len());
    }
    log::info!("All declared bounds contain their data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn sample() -> DirectorySource {
        DirectorySource::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data"))
    }

    #[test]
    fn test_file_bbox_of_sample_line() {
        let bbox = file_bbox("oc-transpo/line-1.json", &sample()).unwrap();
        assert_eq!(bbox.to_json_string(), "[-75.7356,45.4036,-75.665,45.4265]");
    }

    #[test]
    fn test_file_bbox_rejects_narrow_declared_bbox() {
        let dir = tempfile::tempdir().unwrap();
        let line = r##"{
            "type": "FeatureCollection",
            "metadata": { "id": "stm-green", "name": "Green Line", "type": "rail-line", "color": "#008e4f" },
            "bbox": [-73.58, 45.48, -73.56, 45.52],
            "features": [{
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[-73.5861, 45.4897], [-73.5637, 45.5152]] },
                "properties": { "type": "tracks" }
            }]
        }"##;
        std::fs::write(dir.path().join("green.json"), line).unwrap();

        let err = file_bbox("green.json", &DirectorySource::new(dir.path())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "green.json declares bbox [-73.58, 45.48, -73.56, 45.52] which does not contain its data bbox \
             [-73.5861, 45.4897, -73.5637, 45.5152]"
        );
    }

    #[test]
    fn test_missing_file_names_the_data_directory() {
        let err = file_bbox("absent.json", &sample()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load absent.json from "));
    }

    #[test]
    fn test_sample_config_is_consistent() {
        let source = sample();
        let config = Config::load(&source.root().join("config.json")).unwrap();
        assert!(report_config(&config, &source).is_ok());
    }
}
