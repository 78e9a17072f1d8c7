use crate::config::MapSettings;
use crate::utils::error::{JobMapError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Optional overrides read from a TOML file. Every field may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapFileConfig {
    pub map: Option<MapSection>,
    pub tiles: Option<TilesSection>,
    pub geocoder: Option<GeocoderSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapSection {
    pub center_lat: Option<f64>,
    pub center_lon: Option<f64>,
    pub zoom: Option<u8>,
    pub focus_zoom: Option<u8>,
    pub marker_radius: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TilesSection {
    pub url_template: Option<String>,
    pub attribution: Option<String>,
    pub name: Option<String>,
    pub min_zoom: Option<u8>,
    pub max_zoom: Option<u8>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocoderSection {
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
    pub country: Option<String>,
}

impl MapFileConfig {
    /// Loads overrides from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(JobMapError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses overrides from TOML text after environment substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| JobMapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| JobMapError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Overlays the values present in the file onto `settings`.
    pub fn apply(self, settings: &mut MapSettings) {
        if let Some(map) = self.map {
            overlay(&mut settings.center_lat, map.center_lat);
            overlay(&mut settings.center_lon, map.center_lon);
            overlay(&mut settings.zoom, map.zoom);
            overlay(&mut settings.focus_zoom, map.focus_zoom);
            overlay(&mut settings.marker_radius, map.marker_radius);
        }

        if let Some(tiles) = self.tiles {
            overlay(&mut settings.tiles.url_template, tiles.url_template);
            overlay(&mut settings.tiles.attribution, tiles.attribution);
            overlay(&mut settings.tiles.name, tiles.name);
            overlay(&mut settings.tiles.min_zoom, tiles.min_zoom);
            overlay(&mut settings.tiles.max_zoom, tiles.max_zoom);
            // Unresolved placeholders mean the variable was not set.
            if let Some(token) = tiles.access_token.filter(|t| !t.starts_with("${")) {
                settings.tiles.access_token = Some(token);
            }
        }

        if let Some(geocoder) = self.geocoder {
            overlay(&mut settings.geocoder.endpoint, geocoder.endpoint);
            overlay(&mut settings.geocoder.user_agent, geocoder.user_agent);
            overlay(&mut settings.geocoder.country, geocoder.country);
        }
    }
}

fn overlay<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[map]
center_lat = 47.6
center_lon = -122.3
zoom = 7

[geocoder]
endpoint = "http://localhost:9000/search"
"#;

        let mut settings = MapSettings::default();
        MapFileConfig::from_toml_str(toml_content)
            .unwrap()
            .apply(&mut settings);

        assert_eq!(settings.center_lat, 47.6);
        assert_eq!(settings.center_lon, -122.3);
        assert_eq!(settings.zoom, 7);
        assert_eq!(settings.marker_radius, 5);
        assert_eq!(settings.geocoder.endpoint, "http://localhost:9000/search");
        assert_eq!(settings.tiles.name, "Jawg_Dark");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("JOB_MAP_TEST_TILE_TOKEN", "secret-token");

        let toml_content = r#"
[tiles]
access_token = "${JOB_MAP_TEST_TILE_TOKEN}"
"#;

        let mut settings = MapSettings::default();
        MapFileConfig::from_toml_str(toml_content)
            .unwrap()
            .apply(&mut settings);
        assert_eq!(settings.tiles.access_token.as_deref(), Some("secret-token"));

        std::env::remove_var("JOB_MAP_TEST_TILE_TOKEN");
    }

    #[test]
    fn test_unset_env_var_leaves_token_empty() {
        let toml_content = r#"
[tiles]
access_token = "${JOB_MAP_TEST_UNSET_VARIABLE}"
"#;

        let mut settings = MapSettings::default();
        MapFileConfig::from_toml_str(toml_content)
            .unwrap()
            .apply(&mut settings);
        assert_eq!(settings.tiles.access_token, None);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = MapFileConfig::from_toml_str("[map\nzoom = ");
        assert!(matches!(
            result,
            Err(JobMapError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[map]\nmarker_radius = 8\n")
            .unwrap();

        let mut settings = MapSettings::default();
        MapFileConfig::from_file(temp_file.path())
            .unwrap()
            .apply(&mut settings);
        assert_eq!(settings.marker_radius, 8);
    }
}
