use crate::utils::error::GeocodeError;
use serde::Serialize;
use thiserror::Error;

/// Selects how rows are geocoded, classified and sized on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Variant {
    /// Free-text address lookup, substring status matching, fixed radius,
    /// pending-jobs sidebar.
    #[default]
    Freeform,
    /// City/state lookup qualified by company name, exact status matching,
    /// radius sized by how often a location repeats.
    Structured,
}

impl Variant {
    pub fn default_input(&self) -> &'static str {
        match self {
            Variant::Freeform => "./jobs.csv",
            Variant::Structured => "./jobs.xlsx",
        }
    }

    pub fn match_mode(&self) -> MatchMode {
        match self {
            Variant::Freeform => MatchMode::Substring,
            Variant::Structured => MatchMode::Exact,
        }
    }

    pub fn shows_pending_list(&self) -> bool {
        matches!(self, Variant::Freeform)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Substring,
    Exact,
}

/// One row of the job application log.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationRecord {
    /// 1-based position in the input, header excluded.
    pub row: usize,
    pub date_applied: String,
    pub company: String,
    pub title: String,
    pub location: String,
    pub status: String,
    pub posting: String,
}

impl ApplicationRecord {
    /// Date with any time-of-day suffix removed.
    pub fn display_date(&self) -> &str {
        self.date_applied.split(' ').next().unwrap_or_default()
    }

    pub fn popup_text(&self) -> String {
        format!(
            "{} - {} - {} - {}",
            self.company,
            self.title,
            self.status,
            self.display_date()
        )
    }

    pub fn pending_text(&self) -> String {
        format!("{} - {}", self.company, self.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Grouping key: two points merge only when both coordinates are bit-identical.
    pub fn key(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lon.to_bits())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeQuery {
    Freeform(String),
    Structured {
        venue: Option<String>,
        city: String,
        state: String,
        country: String,
    },
}

/// Serializes to the Leaflet color name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Blue,
    Green,
    Red,
    #[serde(rename = "lightgray")]
    LightGray,
}

impl StatusColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusColor::Blue => "blue",
            StatusColor::Green => "green",
            StatusColor::Red => "red",
            StatusColor::LightGray => "lightgray",
        }
    }

    /// Applied and interviewing jobs are still awaiting an outcome.
    pub fn is_pending(&self) -> bool {
        matches!(self, StatusColor::Blue | StatusColor::Green)
    }
}

impl std::fmt::Display for StatusColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupEntry {
    pub text: String,
    pub link: String,
    pub color: StatusColor,
}

/// Every record that resolved to the same coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerGroup {
    pub point: GeoPoint,
    pub entries: Vec<PopupEntry>,
    pub radius: u32,
}

impl MarkerGroup {
    /// Color of the most recently appended entry. Mixed-status groups show
    /// only that one.
    pub fn color(&self) -> StatusColor {
        self.entries
            .last()
            .map(|entry| entry.color)
            .unwrap_or(StatusColor::LightGray)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingJob {
    pub text: String,
    pub color: StatusColor,
    pub point: GeoPoint,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("unable to get coordinates: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("missing value for {0}")]
    MissingField(&'static str),

    #[error("malformed location: {0:?}")]
    MalformedLocation(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row: usize,
    pub company: String,
    pub title: String,
    pub location: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Plotted(GeoPoint),
    Skipped(SkipReason),
}

/// Everything the renderer needs, plus what was dropped along the way.
#[derive(Debug, Clone, Default)]
pub struct MapPlan {
    pub groups: Vec<MarkerGroup>,
    pub pending: Vec<PendingJob>,
    pub skipped: Vec<SkippedRow>,
    pub total_rows: usize,
}

impl MapPlan {
    pub fn plotted_rows(&self) -> usize {
        self.total_rows - self.skipped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> ApplicationRecord {
        ApplicationRecord {
            row: 1,
            date_applied: date.to_string(),
            company: "Acme Co".to_string(),
            title: "Engineer".to_string(),
            location: "Reno, NV".to_string(),
            status: "Applied".to_string(),
            posting: "http://x/1".to_string(),
        }
    }

    #[test]
    fn test_popup_text_drops_time_of_day() {
        let rec = record("2024-01-05 00:00:00");
        assert_eq!(rec.popup_text(), "Acme Co - Engineer - Applied - 2024-01-05");
        assert_eq!(rec.pending_text(), "Acme Co - Engineer");
    }

    #[test]
    fn test_geo_point_key_is_bit_exact() {
        let a = GeoPoint::new(39.53, -119.81);
        let b = GeoPoint::new(39.53, -119.81);
        let c = GeoPoint::new(39.530000001, -119.81);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_marker_group_color_is_last_entry() {
        let group = MarkerGroup {
            point: GeoPoint::new(1.0, 2.0),
            entries: vec![
                PopupEntry {
                    text: "a".to_string(),
                    link: String::new(),
                    color: StatusColor::Blue,
                },
                PopupEntry {
                    text: "b".to_string(),
                    link: String::new(),
                    color: StatusColor::Red,
                },
            ],
            radius: 5,
        };
        assert_eq!(group.color(), StatusColor::Red);
    }

    #[test]
    fn test_variant_defaults() {
        assert_eq!(Variant::default(), Variant::Freeform);
        assert_eq!(Variant::Freeform.default_input(), "./jobs.csv");
        assert_eq!(Variant::Structured.default_input(), "./jobs.xlsx");
        assert!(!Variant::Structured.shows_pending_list());
    }
}
