//! TransitLab CLI: search light curves for transiting planets.
//!
//! Commands:
//! - `search`: run the iterative transit search on a CSV or synthetic light curve
//! - `synth`: write a synthetic light curve with injected transits to CSV
//! - `show`: print the summary table and schematic of a saved `result.json`
//!
//! Logging goes to stderr; `RUST_LOG` sets the level (default `info`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use transitlab_core::LogProgress;
use transitlab_runner::{
    export_series_csv, generate, import_json, load_csv, render_schematic, render_summary_table,
    run_search, save_artifacts, BoxSearch, DataSource, LoadedSeries, SearchConfig, SearchResult,
    SyntheticSpec,
};

#[derive(Parser)]
#[command(
    name = "transitlab",
    about = "TransitLab CLI: iterative transit search and planet characterization"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the iterative transit search.
    Search {
        /// Light curve CSV with `time` and `flux` columns.
        #[arg(long, conflicts_with = "synthetic")]
        input: Option<PathBuf>,

        /// Search the named synthetic demo curve instead of a file.
        #[arg(long)]
        synthetic: Option<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Stellar mass in solar masses (overrides config).
        #[arg(long)]
        stellar_mass: Option<f64>,

        /// Maximum number of planets to search for (overrides config).
        #[arg(long)]
        max_planets: Option<usize>,

        /// Minimum SDE to accept a detection (overrides config).
        #[arg(long)]
        min_sde: Option<f64>,

        /// Shortest trial period in days (overrides config).
        #[arg(long)]
        period_min: Option<f64>,

        /// Longest trial period in days (overrides config).
        #[arg(long)]
        period_max: Option<f64>,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Print results only; do not write artifacts.
        #[arg(long, default_value_t = false)]
        no_save: bool,
    },
    /// Write a synthetic demo light curve to CSV.
    Synth {
        /// Seed name; the same name always yields the same curve.
        #[arg(long, default_value = "demo")]
        name: String,

        /// Destination CSV path.
        #[arg(long)]
        output: PathBuf,
    },
    /// Print a saved search result.
    Show {
        /// Path to a `result.json` artifact.
        path: PathBuf,
    },
}

/// CLI overrides applied on top of the config file.
struct Overrides {
    stellar_mass: Option<f64>,
    max_planets: Option<usize>,
    min_sde: Option<f64>,
    period_min: Option<f64>,
    period_max: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            input,
            synthetic,
            config,
            stellar_mass,
            max_planets,
            min_sde,
            period_min,
            period_max,
            output_dir,
            no_save,
        } => run_search_cmd(
            input,
            synthetic,
            config,
            Overrides {
                stellar_mass,
                max_planets,
                min_sde,
                period_min,
                period_max,
            },
            &output_dir,
            no_save,
        ),
        Commands::Synth { name, output } => run_synth(&name, &output),
        Commands::Show { path } => run_show(&path),
    }
}

fn run_search_cmd(
    input: Option<PathBuf>,
    synthetic: Option<String>,
    config_path: Option<PathBuf>,
    overrides: Overrides,
    output_dir: &Path,
    no_save: bool,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => SearchConfig::from_file(path)?,
        None => SearchConfig::default(),
    };
    apply_overrides(&mut config, &overrides);
    config.validate()?;

    let (loaded, name) = match (input, synthetic) {
        (Some(path), None) => {
            let loaded = load_csv(&path, &config.ingest)?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "lightcurve".into());
            (loaded, name)
        }
        (None, Some(name)) => {
            let series = generate(&SyntheticSpec::demo(&name))?;
            let loaded = LoadedSeries::from_series(
                series,
                DataSource::Synthetic { name: name.clone() },
            );
            (loaded, name)
        }
        (None, None) => bail!("one of --input or --synthetic is required"),
        (Some(_), Some(_)) => bail!("--input and --synthetic are mutually exclusive"),
    };

    info!(
        samples = loaded.series.len(),
        dropped_nonfinite = loaded.dropped_nonfinite,
        dropped_outliers = loaded.dropped_outliers,
        "light curve loaded"
    );

    let engine = BoxSearch::new(&config.engine);
    let result = run_search(&config, &loaded, &engine, Some(&LogProgress))?;

    print_result(&result);

    if !no_save {
        let run_dir = save_artifacts(&result, &name, output_dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn apply_overrides(config: &mut SearchConfig, o: &Overrides) {
    if let Some(mass) = o.stellar_mass {
        config.star.mass = Some(mass);
    }
    if let Some(n) = o.max_planets {
        config.search.max_planets = n;
    }
    if let Some(sde) = o.min_sde {
        config.search.min_sde = sde;
    }
    if let Some(p) = o.period_min {
        config.search.period_min = p;
    }
    if let Some(p) = o.period_max {
        config.search.period_max = p;
    }
}

fn run_synth(name: &str, output: &Path) -> Result<()> {
    let spec = SyntheticSpec::demo(name);
    let series = generate(&spec)?;
    let csv = export_series_csv(&series)?;
    std::fs::write(output, csv)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Wrote {} samples over {:.1} days to {}",
        series.len(),
        series.baseline_days(),
        output.display()
    );
    for (i, t) in spec.transits.iter().enumerate() {
        println!(
            "  injected {}: P = {} d, T0 = {}, duration = {} h, depth = {} ppm",
            i + 1,
            t.period,
            t.epoch,
            t.duration_hours,
            t.depth * 1e6
        );
    }
    Ok(())
}

fn run_show(path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let result = import_json(&json)?;
    print_result(&result);
    Ok(())
}

fn print_result(result: &SearchResult) {
    println!();
    println!("=== Transit Search ===");
    println!("Engine:         {}", result.engine);
    println!("Samples:        {}", result.sample_count);
    println!(
        "Stellar mass:   {:.3} M_sun{}",
        result.stellar.mass,
        if result.stellar_mass_assumed {
            " (assumed)"
        } else {
            ""
        }
    );
    if let DataSource::Synthetic { name } = &result.source {
        println!("WARNING: Results based on SYNTHETIC data ({name})");
    }
    println!();

    if !result.has_detections() {
        println!("No significant transit signals found.");
        println!();
        return;
    }

    println!("Detected {} candidate(s)!", result.planets.len());
    println!();
    print!("{}", render_summary_table(&result.planets));
    if let Some(points) = &result.schematic {
        println!();
        print!("{}", render_schematic(points));
    }
    println!();
}
