pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::geocoder::NominatimGeocoder;
pub use config::{cli::LocalStorage, MapSettings, RunConfig};
pub use core::{
    etl::{MapEngine, RunReport},
    pipeline::JobMapPipeline,
};
pub use domain::model::Variant;
pub use utils::error::{JobMapError, Result};
