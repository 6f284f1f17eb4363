//! TransitLab Runner: search orchestration around `transitlab-core`.
//!
//! This crate builds on the core to provide:
//! - TOML search configuration with documented defaults
//! - Light-curve loading from CSV (NaN removal, outlier clipping, normalization, detrending)
//! - Deterministic synthetic light curves with injected transits
//! - A reference box-least-squares search engine
//! - The end-to-end detect → derive → layout pipeline
//! - JSON and CSV artifact export

pub mod box_search;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod synthetic;

pub use box_search::BoxSearch;
pub use config::{
    ConfigError, EngineConfig, IngestConfig, SearchConfig, SearchSection, StarConfig,
};
pub use data_loader::{detrend, load_csv, parse_csv, DataSource, LoadError, LoadedSeries};
pub use export::{
    export_json, export_schematic_csv, export_series_csv, export_summary_csv, import_json,
    render_schematic, render_summary_table, save_artifacts,
};
pub use runner::{run_search, RunError, SearchResult, SCHEMA_VERSION};
pub use synthetic::{generate, InjectedTransit, SyntheticSpec};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<SearchConfig>();
        assert_sync::<SearchConfig>();
    }

    #[test]
    fn search_result_is_send_sync() {
        assert_send::<SearchResult>();
        assert_sync::<SearchResult>();
    }

    #[test]
    fn loaded_series_is_send_sync() {
        assert_send::<LoadedSeries>();
        assert_sync::<LoadedSeries>();
    }

    #[test]
    fn box_search_is_send_sync() {
        assert_send::<BoxSearch>();
        assert_sync::<BoxSearch>();
    }
}
