use serde::{Deserialize, Serialize};

/// Whether a meeting is still ahead of us or already happened.
/// Serialized as `type` for compatibility with the persisted cache blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingKind {
    Upcoming,
    Past,
}

impl std::fmt::Display for MeetingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingKind::Upcoming => write!(f, "upcoming"),
            MeetingKind::Past => write!(f, "past"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub date: String,
    pub time: String,
    pub title: String,
    /// Display label, e.g. "Mesa, AZ"
    pub location: String,
    #[serde(rename = "locationId")]
    pub location_id: String,
    #[serde(rename = "type")]
    pub kind: MeetingKind,
    #[serde(rename = "hasMatches", default)]
    pub has_matches: bool,
}

impl Meeting {
    pub fn is_upcoming(&self) -> bool {
        self.kind == MeetingKind::Upcoming
    }

    /// Category label shown in search results
    pub fn category_label(&self) -> &'static str {
        match self.kind {
            MeetingKind::Upcoming => "Upcoming Meeting",
            MeetingKind::Past => "Past Meeting",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MeetingKind::Upcoming).unwrap();
        assert_eq!(json, "\"upcoming\"");
        let back: MeetingKind = serde_json::from_str("\"past\"").unwrap();
        assert_eq!(back, MeetingKind::Past);
    }

    #[test]
    fn test_meeting_roundtrip_uses_camel_case() {
        let meeting = Meeting {
            id: "mesa-m1".to_string(),
            date: "Mon 2/3".to_string(),
            time: "6:00PM".to_string(),
            title: "Mesa City Council".to_string(),
            location: "Mesa, AZ".to_string(),
            location_id: "mesa".to_string(),
            kind: MeetingKind::Upcoming,
            has_matches: true,
        };
        let json = serde_json::to_string(&meeting).unwrap();
        assert!(json.contains("\"locationId\""));
        assert!(json.contains("\"hasMatches\""));
        assert!(json.contains("\"type\":\"upcoming\""));
    }
}
