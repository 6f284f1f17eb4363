//! Reporting and export: JSON and CSV artifact generation.
//!
//! - **JSON**: full round-trip serialization of `SearchResult` with schema versioning
//! - **CSV**: the planet summary table and the schematic positions
//! - **Text**: the summary table as printed by the CLI
//!
//! Unknown (newer) schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use transitlab_core::physics::axis_extent_au;
use transitlab_core::{PlanetCandidate, SchematicPoint, TimeSeries};

use crate::runner::{SearchResult, SCHEMA_VERSION};

/// Summary table columns, in order.
pub const SUMMARY_COLUMNS: [&str; 6] = [
    "Planet",
    "Period[d]",
    "Depth[ppm]",
    "Duration[h]",
    "Radius[R_earth]",
    "SDE",
];

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `SearchResult` to pretty JSON.
pub fn export_json(result: &SearchResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize SearchResult to JSON")
}

/// Deserialize a `SearchResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<SearchResult> {
    let result: SearchResult =
        serde_json::from_str(json).context("failed to deserialize SearchResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn summary_cells(p: &PlanetCandidate) -> [String; 6] {
    [
        p.label.clone(),
        format!("{:.4}", p.period),
        format!("{:.2}", p.depth_ppm),
        format!("{:.3}", p.duration_hours),
        format!("{:.2}", p.radius_earth),
        format!("{:.2}", p.significance),
    ]
}

/// Export the planet summary table as CSV with fixed decimal places.
pub fn export_summary_csv(planets: &[PlanetCandidate]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(SUMMARY_COLUMNS)?;
    for p in planets {
        wtr.write_record(summary_cells(p))?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export schematic positions as CSV, star first at distance 0.
pub fn export_schematic_csv(points: &[SchematicPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["label", "semi_major_axis_au", "vertical_offset"])?;
    wtr.write_record(["Star", "0.000000", "0.000000"])?;
    for p in points {
        wtr.write_record([
            p.label.clone(),
            format!("{:.6}", p.semi_major_axis_au),
            format!("{:.6}", p.vertical_offset),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export a light curve as `time,flux` CSV, readable by `load_csv`.
pub fn export_series_csv(series: &TimeSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["time", "flux"])?;
    for (t, f) in series.time().iter().zip(series.flux()) {
        wtr.write_record([format!("{t:.8}"), format!("{f:.8}")])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Text table ─────────────────────────────────────────────────────

/// Render the summary table as aligned text.
pub fn render_summary_table(planets: &[PlanetCandidate]) -> String {
    let mut out = format!(
        "{:<10} {:>12} {:>12} {:>12} {:>16} {:>8}\n",
        SUMMARY_COLUMNS[0],
        SUMMARY_COLUMNS[1],
        SUMMARY_COLUMNS[2],
        SUMMARY_COLUMNS[3],
        SUMMARY_COLUMNS[4],
        SUMMARY_COLUMNS[5],
    );
    out.push_str(&"-".repeat(75));
    out.push('\n');
    for p in planets {
        let [label, period, depth, duration, radius, sde] = summary_cells(p);
        out.push_str(&format!(
            "{label:<10} {period:>12} {depth:>12} {duration:>12} {radius:>16} {sde:>8}\n"
        ));
    }
    out
}

/// Render the schematic as text lines: one per body, with the axis extent.
pub fn render_schematic(points: &[SchematicPoint]) -> String {
    let mut out = format!("Star at 0 AU (axis to {:.2} AU)\n", axis_extent_au(points));
    for (i, p) in points.iter().enumerate() {
        out.push_str(&format!(
            "  {:<10} {:<18} y = {:+.3}\n",
            p.label,
            p.annotation(i + 1),
            p.vertical_offset
        ));
    }
    out
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one search run.
///
/// Creates `{name}_{timestamp}/` under `output_dir` containing:
/// - `result.json`: the full `SearchResult`
/// - `summary.csv`: the planet summary table
/// - `schematic.csv`: schematic positions (only when something was detected)
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &SearchResult, name: &str, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!("{}_{}", name, chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("result.json"), export_json(result)?)?;
    std::fs::write(
        run_dir.join("summary.csv"),
        export_summary_csv(&result.planets)?,
    )?;
    if let Some(points) = &result.schematic {
        std::fs::write(run_dir.join("schematic.csv"), export_schematic_csv(points)?)?;
    }

    Ok(run_dir)
}
