pub mod cli;
pub mod toml_config;

use crate::domain::model::Variant;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_at_least, validate_endpoint, validate_extension, validate_latitude,
    validate_longitude, validate_non_empty, validate_path, validate_range, validate_tile_template,
    validate_zoom, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;

pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";
pub const SUPPORTED_INPUTS: [&str; 3] = ["csv", "xlsx", "xlsm"];

const ACCESS_TOKEN_PLACEHOLDER: &str = "{accessToken}";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "job-map")]
#[command(about = "Generate a map from a CSV or XLSX file of job postings and locations")]
pub struct CliConfig {
    #[arg(
        help = "Path to the job list (defaults to ./jobs.csv, or ./jobs.xlsx for --variant structured)"
    )]
    pub input: Option<String>,

    #[arg(long, default_value = "map.html")]
    pub output: String,

    #[arg(long, value_enum, default_value_t = Variant::Freeform)]
    pub variant: Variant,

    #[arg(long, help = "TOML file with [map], [tiles] and [geocoder] overrides")]
    pub config: Option<String>,

    #[arg(long)]
    pub geocoder_endpoint: Option<String>,

    #[arg(long, help = "Country used for structured lookups")]
    pub country: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileSettings {
    pub url_template: String,
    pub attribution: String,
    pub name: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub access_token: Option<String>,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            url_template: "https://tile.jawg.io/jawg-dark/{z}/{x}/{y}{r}.png?access-token={accessToken}"
                .to_string(),
            attribution: concat!(
                r#"<a href="https://jawg.io" title="Tiles Courtesy of Jawg Maps" target="_blank">&copy; <b>Jawg</b>Maps</a> "#,
                r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#
            )
            .to_string(),
            name: "Jawg_Dark".to_string(),
            min_zoom: 0,
            max_zoom: 22,
            access_token: None,
        }
    }
}

impl TileSettings {
    /// Tile URL with the access token filled in.
    pub fn resolved_url(&self) -> String {
        self.url_template.replace(
            ACCESS_TOKEN_PLACEHOLDER,
            self.access_token.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderSettings {
    pub endpoint: String,
    pub user_agent: String,
    pub country: String,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:134.0) Gecko/20100101 Firefox/134.0"
                .to_string(),
            country: "United States".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub focus_zoom: u8,
    pub marker_radius: u32,
    pub tiles: TileSettings,
    pub geocoder: GeocoderSettings,
}

impl Default for MapSettings {
    fn default() -> Self {
        // Center of the western half of the U.S.
        Self {
            center_lat: 39.8283,
            center_lon: -115.5795,
            zoom: 5,
            focus_zoom: 12,
            marker_radius: 5,
            tiles: TileSettings::default(),
            geocoder: GeocoderSettings::default(),
        }
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: String,
    pub output_path: String,
    pub variant: Variant,
    pub settings: MapSettings,
}

impl RunConfig {
    pub fn new(variant: Variant) -> Self {
        Self {
            input_path: variant.default_input().to_string(),
            output_path: "map.html".to_string(),
            variant,
            settings: MapSettings::default(),
        }
    }

    /// Merges CLI flags, the optional TOML file and `.env` into one config.
    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::new(cli.variant);
        if let Some(input) = &cli.input {
            config.input_path = input.clone();
        }
        config.output_path = cli.output.clone();

        if let Some(path) = &cli.config {
            tracing::debug!("Loading map settings from {}", path);
            toml_config::MapFileConfig::from_file(path)?.apply(&mut config.settings);
        }

        if let Some(endpoint) = &cli.geocoder_endpoint {
            config.settings.geocoder.endpoint = endpoint.clone();
        }
        if let Some(country) = &cli.country {
            config.settings.geocoder.country = country.clone();
        }

        config.resolve_access_token();
        Ok(config)
    }

    /// Falls back to the `ACCESS_TOKEN` environment variable when no token was configured.
    pub fn resolve_access_token(&mut self) {
        let tiles = &mut self.settings.tiles;
        if tiles.access_token.as_deref().is_some_and(|t| !t.is_empty()) {
            return;
        }

        tiles.access_token = std::env::var(ACCESS_TOKEN_VAR)
            .ok()
            .filter(|token| !token.trim().is_empty());

        if tiles.access_token.is_none() && tiles.url_template.contains(ACCESS_TOKEN_PLACEHOLDER) {
            tracing::warn!(
                "{} is not set; map tiles from {} will fail to load",
                ACCESS_TOKEN_VAR,
                tiles.name
            );
        }
    }
}

impl ConfigProvider for RunConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn variant(&self) -> Variant {
        self.variant
    }

    fn map_settings(&self) -> &MapSettings {
        &self.settings
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input_path)?;
        validate_extension("input", &self.input_path, &SUPPORTED_INPUTS)?;
        validate_path("output", &self.output_path)?;

        let settings = &self.settings;
        validate_latitude("map.center_lat", settings.center_lat)?;
        validate_longitude("map.center_lon", settings.center_lon)?;
        validate_zoom("map.zoom", settings.zoom)?;
        validate_zoom("map.focus_zoom", settings.focus_zoom)?;
        validate_at_least("map.marker_radius", settings.marker_radius, 1)?;

        let tiles = &settings.tiles;
        validate_tile_template("tiles.url_template", &tiles.url_template)?;
        validate_zoom("tiles.max_zoom", tiles.max_zoom)?;
        validate_range("tiles.min_zoom", tiles.min_zoom, 0, tiles.max_zoom)?;

        validate_endpoint("geocoder.endpoint", &settings.geocoder.endpoint)?;
        validate_non_empty("geocoder.user_agent", &settings.geocoder.user_agent)?;
        if self.variant == Variant::Structured {
            validate_non_empty("geocoder.country", &settings.geocoder.country)?;
        }

        Ok(())
    }
}
