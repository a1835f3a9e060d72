use serde::{Deserialize, Serialize};

/// A topic hit inside a published agenda document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaMatch {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agenda {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default)]
    pub pages: u32,
    #[serde(rename = "hasAttachments", default)]
    pub has_attachments: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<AgendaMatch>>,
    #[serde(rename = "locationId")]
    pub location_id: String,
    #[serde(rename = "locationName")]
    pub location_name: String,
}

impl Agenda {
    /// Title for display, falling back to a generic label when none was published.
    pub fn display_title(&self, location_label: &str) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("{} Meeting Agenda", location_label),
        }
    }

    pub fn match_labels(&self) -> Vec<&str> {
        self.matches
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|m| m.label.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Agenda {
        Agenda {
            id: "mesa-a1".to_string(),
            title: None,
            date: Some("March 4, 2026".to_string()),
            time: None,
            pages: 24,
            has_attachments: true,
            matches: Some(vec![AgendaMatch {
                label: "zoning".to_string(),
                snippet: None,
            }]),
            location_id: "mesa".to_string(),
            location_name: "Mesa, AZ".to_string(),
        }
    }

    #[test]
    fn test_display_title_falls_back() {
        assert_eq!(sample().display_title("Mesa, AZ"), "Mesa, AZ Meeting Agenda");
    }

    #[test]
    fn test_match_labels() {
        assert_eq!(sample().match_labels(), vec!["zoning"]);
        let mut agenda = sample();
        agenda.matches = None;
        assert!(agenda.match_labels().is_empty());
    }

    #[test]
    fn test_tolerates_missing_optionals() {
        let json = r#"{"id":"x-a1","locationId":"x","locationName":"X"}"#;
        let agenda: Agenda = serde_json::from_str(json).unwrap();
        assert_eq!(agenda.pages, 0);
        assert!(!agenda.has_attachments);
        assert!(agenda.title.is_none());
    }
}
