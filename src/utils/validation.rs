use crate::utils::error::{JobMapError, Result};
use std::fmt::Display;
use std::path::Path;
use url::Url;

/// Highest zoom level any Leaflet tile provider serves.
pub const MAX_ZOOM: u8 = 22;

const TILE_PLACEHOLDERS: [&str; 3] = ["{z}", "{x}", "{y}"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> JobMapError {
    JobMapError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The geocoder is queried over plain HTTP(S) and needs a host to talk to.
pub fn validate_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url =
        Url::parse(endpoint).map_err(|e| invalid(field, endpoint, format!("not a URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            endpoint,
            format!("unsupported scheme {:?}, expected http or https", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field, endpoint, "URL has no host"));
    }

    Ok(())
}

pub fn validate_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path.escape_debug(), "path contains a NUL byte"));
    }
    Ok(())
}

/// Extension match is case-insensitive, so `Jobs.XLSX` is accepted.
pub fn validate_extension(field: &str, path: &str, allowed: &[&str]) -> Result<()> {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| invalid(field, path, "file has no extension"))?;

    if allowed.iter().any(|candidate| candidate.eq_ignore_ascii_case(extension)) {
        Ok(())
    } else {
        Err(invalid(field, path, format!("expected one of: {}", allowed.join(", "))))
    }
}

pub fn validate_latitude(field: &str, lat: f64) -> Result<()> {
    validate_range(field, lat, -90.0, 90.0)
}

pub fn validate_longitude(field: &str, lon: f64) -> Result<()> {
    validate_range(field, lon, -180.0, 180.0)
}

pub fn validate_zoom(field: &str, zoom: u8) -> Result<()> {
    validate_range(field, zoom, 0, MAX_ZOOM)
}

/// Rejects NaN as well as values outside `[min, max]`.
pub fn validate_range<T: PartialOrd + Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(invalid(field, value, format!("must be between {} and {}", min, max)))
    }
}

pub fn validate_at_least(field: &str, value: u32, min: u32) -> Result<()> {
    if value < min {
        return Err(invalid(field, value, format!("must be at least {}", min)));
    }
    Ok(())
}

pub fn validate_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "cannot be empty"));
    }
    Ok(())
}

/// Leaflet fills `{z}`, `{x}` and `{y}` per tile; a template without them
/// requests the same image for every tile.
pub fn validate_tile_template(field: &str, template: &str) -> Result<()> {
    validate_non_empty(field, template)?;

    let missing: Vec<&str> = TILE_PLACEHOLDERS
        .iter()
        .copied()
        .filter(|placeholder| !template.contains(placeholder))
        .collect();
    if !missing.is_empty() {
        return Err(invalid(
            field,
            template,
            format!("missing placeholders {}", missing.join(" ")),
        ));
    }

    Ok(())
}
