use serde::{Deserialize, Serialize};

/// One titled section of a generated document summary.
///
/// Sections are ordered the way the summarization collaborator returned
/// them and are reproduced verbatim in the exported report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySection {
    pub title: String,
    pub points: Vec<String>,
}

impl SummarySection {
    #[must_use]
    pub fn new(title: impl Into<String>, points: Vec<String>) -> Self {
        Self {
            title: title.into(),
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_round_trips_through_json() {
        let section = SummarySection::new("Key Ideas", vec!["first".into(), "second".into()]);
        let json = serde_json::to_string(&section).unwrap();
        let back: SummarySection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, section);
    }
}
