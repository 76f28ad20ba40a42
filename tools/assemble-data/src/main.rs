use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use transit_map_data::output::{render_artifacts, write_artifacts, Artifacts};
use transit_map_data::prelude::*;
use transit_map_data::source::preload;

#[derive(Parser, Debug)]
#[command(
    name = "assemble-data",
    author,
    version,
    about = "Merge per-line GeoJSON into the map's build artifacts",
    long_about = "Reads the agency/region config and every line or yard file it references, \
                  validates each file, attaches agency/region/line properties to every feature \
                  and writes three artifacts:\n\n\
                  features.json  one FeatureCollection with every feature, in config order\n\
                  metadata.json  line metadata keyed by line id, with computed bboxes\n\
                  search.json    deduplicated station records and line/yard bounds records"
)]
struct Args {
    /// Data directory that file references in the config are relative to
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Config file (defaults to <data-dir>/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to write the artifacts into
    #[arg(short, long)]
    out_dir: PathBuf,

    /// Fail if any declared bbox does not contain its data
    #[arg(long)]
    check_bounds: bool,

    /// Pretty-print the artifacts
    #[arg(long)]
    pretty: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let config_path = args.config.clone().unwrap_or_else(|| args.data_dir.join("config.json"));

    log::info!("=== Map Data Assembler ===");
    log::info!("Data: {}", args.data_dir.display());
    log::info!("Config: {}", config_path.display());
    log::info!("Output: {}", args.out_dir.display());

    if !args.data_dir.is_dir() {
        bail!("Data directory does not exist: {}", args.data_dir.display());
    }

    let config = Config::load(&config_path).context("Failed to load config")?;
    log::info!(
        "  {} agencies, {} regions",
        config.agencies.len(),
        config.regions.len()
    );

    // Phase 1: Read every referenced file
    log::info!("");
    log::info!("Phase 1: Reading data files...");
    let files = preload(&config, &args.data_dir)
        .await
        .context("Failed to read data files")?;

    let (assembly, seed, artifacts) = build(&config, &files, args.check_bounds, args.pretty)?;

    // Phase 5: Write
    log::info!("");
    log::info!("Phase 5: Writing artifacts...");
    let written = write_artifacts(&artifacts, &args.out_dir).context("Failed to write artifacts")?;

    log::info!("");
    log::info!("=== Complete ===");
    log::info!("  {} features", assembly.collection.features.len());
    log::info!("  {} lines and yards", assembly.metadata.len());
    log::info!("  {} stations", seed.stations.len());
    log::info!("  {} files written", written.len());

    Ok(())
}

/// Assemble, optionally check bounds, and render the artifacts without writing them.
fn build(
    config: &Config,
    source: &impl DatasetSource,
    check: bool,
    pretty: bool,
) -> Result<(Assembly, SearchSeed, Artifacts)> {
    // Phase 2: Validate, enrich and merge
    log::info!("");
    log::info!("Phase 2: Assembling...");
    let assembly = assemble(config, source).context("Failed to assemble map data")?;
    if !assembly.duplicate_ids.is_empty() {
        log::warn!(
            "  {} line ids were defined more than once; the last definition was kept",
            assembly.duplicate_ids.len()
        );
    }

    // Phase 3: Bounds
    if check {
        log::info!("");
        log::info!("Phase 3: Checking declared bounds...");
        let violations = check_bounds(config, source).context("Failed to check bounds")?;
        if !violations.is_empty() {
            bail!("{} declared bboxes do not contain their data", violations.len());
        }
        log::info!("  All declared bounds contain their data");
    }

    // Phase 4: Search seed
    log::info!("");
    log::info!("Phase 4: Building search records...");
    let seed = build_search_seed(&assembly, config).context("Failed to build search records")?;
    let artifacts = render_artifacts(&assembly, &seed, pretty).context("Failed to serialize artifacts")?;

    Ok((assembly, seed, artifacts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use transit_map_data::output::{FEATURES_FILE, METADATA_FILE, SEARCH_FILE};

    fn sample() -> (Config, DirectorySource) {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
        (Config::load(&data.join("config.json")).unwrap(), DirectorySource::new(data))
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["assemble-data", "--out-dir", "build"]).unwrap();

        assert_eq!(args.data_dir, PathBuf::from("data"));
        assert_eq!(args.config, None);
        assert_eq!(args.out_dir, PathBuf::from("build"));
        assert!(!args.check_bounds && !args.pretty && !args.verbose);

        assert!(Args::try_parse_from(["assemble-data"]).is_err());
    }

    #[test]
    fn test_build_sample_data() {
        let (config, source) = sample();
        let (assembly, seed, artifacts) = build(&config, &source, true, false).unwrap();

        assert_eq!(assembly.metadata.len(), 5);
        assert_eq!(seed.stations.len(), 18);

        let names: Vec<_> = artifacts.files.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec![FEATURES_FILE, METADATA_FILE, SEARCH_FILE]);
    }

    #[test]
    fn test_build_fails_on_bounds_violation() {
        let (mut config, source) = sample();
        // Line 1 reaches west of -75.70
        config.agencies[0].bbox = BBox::new(-75.70, 45.30, -75.55, 45.50);

        let err = build(&config, &source, true, false).unwrap_err();
        assert_eq!(err.to_string(), "1 declared bboxes do not contain their data");

        // Without the check the same data still assembles
        assert!(build(&config, &source, false, false).is_ok());
    }
}
