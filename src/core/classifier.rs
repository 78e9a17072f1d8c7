use crate::domain::model::{MatchMode, StatusColor};

/// Maps a free-text application status to its marker color.
///
/// Rules are checked in order and the first match wins. In substring mode a
/// status such as `"Rejected after Interview"` is green, because the
/// interview check runs first.
pub fn classify(status: &str, mode: MatchMode) -> StatusColor {
    match mode {
        MatchMode::Substring => {
            if status.contains("Applied") {
                StatusColor::Blue
            } else if status.contains("Interview") {
                StatusColor::Green
            } else if status.contains("Rejected") {
                StatusColor::Red
            } else {
                StatusColor::LightGray
            }
        }
        MatchMode::Exact => match status.trim() {
            "Applied" => StatusColor::Blue,
            "Interview" | "Interview Pending" => StatusColor::Green,
            "Rejected" => StatusColor::Red,
            _ => StatusColor::LightGray,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_rules() {
        let mode = MatchMode::Substring;
        assert_eq!(classify("Applied", mode), StatusColor::Blue);
        assert_eq!(classify("Applied - referral", mode), StatusColor::Blue);
        assert_eq!(classify("Interview Pending", mode), StatusColor::Green);
        assert_eq!(classify("Phone Interview", mode), StatusColor::Green);
        assert_eq!(classify("Rejected", mode), StatusColor::Red);
        assert_eq!(classify("Withdrawn", mode), StatusColor::LightGray);
        assert_eq!(classify("", mode), StatusColor::LightGray);
    }

    #[test]
    fn test_substring_rule_order_and_case() {
        let mode = MatchMode::Substring;
        assert_eq!(classify("Rejected after Interview", mode), StatusColor::Green);
        assert_eq!(classify("Applied, Interview scheduled", mode), StatusColor::Blue);
        assert_eq!(classify("applied", mode), StatusColor::LightGray);
        assert_eq!(classify("REJECTED", mode), StatusColor::LightGray);
    }

    #[test]
    fn test_exact_rules() {
        let mode = MatchMode::Exact;
        assert_eq!(classify("Applied", mode), StatusColor::Blue);
        assert_eq!(classify(" Applied ", mode), StatusColor::Blue);
        assert_eq!(classify("Interview Pending", mode), StatusColor::Green);
        assert_eq!(classify("Interview", mode), StatusColor::Green);
        assert_eq!(classify("Rejected", mode), StatusColor::Red);
        assert_eq!(classify("Applied - referral", mode), StatusColor::LightGray);
        assert_eq!(classify("Phone Interview", mode), StatusColor::LightGray);
    }
}
