use crate::domain::model::{
    ApplicationRecord, GeoPoint, MarkerGroup, PendingJob, PopupEntry, StatusColor,
};
use std::collections::HashMap;

/// Folds geocoded records into one marker group per distinct coordinate.
///
/// Groups keep the order in which their coordinate was first seen, entries
/// keep input order. The group's radius is overwritten by every append, the
/// same way its color follows the last entry.
#[derive(Debug, Default)]
pub struct MarkerGroupBuilder {
    groups: Vec<MarkerGroup>,
    index: HashMap<(u64, u64), usize>,
    pending: Vec<PendingJob>,
    track_pending: bool,
}

impl MarkerGroupBuilder {
    pub fn new(track_pending: bool) -> Self {
        Self {
            track_pending,
            ..Self::default()
        }
    }

    pub fn add(
        &mut self,
        point: GeoPoint,
        record: &ApplicationRecord,
        color: StatusColor,
        radius: u32,
    ) {
        let entry = PopupEntry {
            text: record.popup_text(),
            link: record.posting.clone(),
            color,
        };

        let groups = &mut self.groups;
        let slot = *self.index.entry(point.key()).or_insert_with(|| {
            groups.push(MarkerGroup {
                point,
                entries: Vec::new(),
                radius,
            });
            groups.len() - 1
        });

        let group = &mut self.groups[slot];
        group.entries.push(entry);
        group.radius = radius;

        if self.track_pending && color.is_pending() {
            self.pending.push(PendingJob {
                text: record.pending_text(),
                color,
                point,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn finish(self) -> (Vec<MarkerGroup>, Vec<PendingJob>) {
        (self.groups, self.pending)
    }
}

/// How many input rows carry each raw location string.
#[derive(Debug, Default)]
pub struct LocationTally {
    counts: HashMap<String, u32>,
}

impl LocationTally {
    pub fn from_records(records: &[ApplicationRecord]) -> Self {
        let mut counts = HashMap::new();
        for record in records {
            *counts.entry(record.location.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Counts string duplicates, not records merged into a marker, so it
    /// diverges from the popup entry count when different strings geocode
    /// to the same point.
    pub fn occurrences(&self, location: &str) -> u32 {
        self.counts.get(location).copied().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, company: &str, location: &str) -> ApplicationRecord {
        ApplicationRecord {
            row,
            date_applied: "2024-01-05".to_string(),
            company: company.to_string(),
            title: "Engineer".to_string(),
            location: location.to_string(),
            status: "Applied".to_string(),
            posting: format!("http://x/{}", row),
        }
    }

    #[test]
    fn test_identical_points_merge_in_input_order() {
        let reno = GeoPoint::new(39.53, -119.81);
        let mut builder = MarkerGroupBuilder::new(false);

        builder.add(reno, &record(1, "Acme Co", "Reno, NV"), StatusColor::Blue, 5);
        builder.add(reno, &record(2, "Globex", "Reno"), StatusColor::Red, 5);

        let (groups, pending) = builder.finish();
        assert_eq!(groups.len(), 1);
        assert!(pending.is_empty());
        let texts: Vec<&str> = groups[0].entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Acme Co - Engineer - Applied - 2024-01-05",
                "Globex - Engineer - Applied - 2024-01-05"
            ]
        );
        assert_eq!(groups[0].color(), StatusColor::Red);
    }

    #[test]
    fn test_near_duplicates_stay_separate() {
        let mut builder = MarkerGroupBuilder::new(false);
        let blue = StatusColor::Blue;
        builder.add(GeoPoint::new(39.53, -119.81), &record(1, "A", "Reno"), blue, 5);
        builder.add(GeoPoint::new(39.5300001, -119.81), &record(2, "B", "Reno"), blue, 5);
        builder.add(GeoPoint::new(43.61, -116.2), &record(3, "C", "Boise"), blue, 5);

        assert_eq!(builder.len(), 3);
        let (groups, _) = builder.finish();
        assert_eq!(groups[2].point, GeoPoint::new(43.61, -116.2));
    }

    #[test]
    fn test_pending_jobs_only_applied_or_interview() {
        let point = GeoPoint::new(1.0, 1.0);
        let mut builder = MarkerGroupBuilder::new(true);
        builder.add(point, &record(1, "A", "X"), StatusColor::Blue, 5);
        builder.add(point, &record(2, "B", "X"), StatusColor::Red, 5);
        builder.add(point, &record(3, "C", "X"), StatusColor::Green, 5);
        builder.add(point, &record(4, "D", "X"), StatusColor::LightGray, 5);

        let (_, pending) = builder.finish();
        let texts: Vec<&str> = pending.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["A - Engineer", "C - Engineer"]);
        assert_eq!(pending[1].color, StatusColor::Green);
    }

    #[test]
    fn test_radius_follows_last_entry() {
        let point = GeoPoint::new(1.0, 1.0);
        let mut builder = MarkerGroupBuilder::new(false);
        builder.add(point, &record(1, "A", "Reno, NV"), StatusColor::Blue, 3);
        builder.add(point, &record(2, "B", "Reno"), StatusColor::Blue, 1);

        let (groups, _) = builder.finish();
        assert_eq!(groups[0].radius, 1);
        assert_eq!(groups[0].entries.len(), 2);
    }

    #[test]
    fn test_location_tally_counts_raw_strings() {
        let records = vec![
            record(1, "A", "Reno, NV"),
            record(2, "B", "Reno, NV"),
            record(3, "C", "Reno,NV"),
        ];
        let tally = LocationTally::from_records(&records);

        assert_eq!(tally.occurrences("Reno, NV"), 2);
        assert_eq!(tally.occurrences("Reno,NV"), 1);
    }
}
