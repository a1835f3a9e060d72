use serde::{Deserialize, Serialize};

/// Review status of a project before its governing body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Pending,
    UnderReview,
    Approved,
    Denied,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Pending => write!(f, "pending"),
            ProjectStatus::UnderReview => write!(f, "under-review"),
            ProjectStatus::Approved => write!(f, "approved"),
            ProjectStatus::Denied => write!(f, "denied"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    /// Governing body, e.g. "City Council", "Planning Commission", "Zoning Board".
    /// Kept as a string because the set is open.
    #[serde(rename = "type")]
    pub category: String,
    pub title: String,
    pub date: String,
    #[serde(rename = "locationId")]
    pub location_id: String,
    #[serde(rename = "locationName")]
    pub location_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl Project {
    pub fn is_approved(&self) -> bool {
        self.status == Some(ProjectStatus::Approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_kebab_case() {
        let json = serde_json::to_string(&ProjectStatus::UnderReview).unwrap();
        assert_eq!(json, "\"under-review\"");
    }

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let project = Project {
            id: "mesa-p1".to_string(),
            category: "Zoning Board".to_string(),
            title: "Rezoning Request - Mesa Heights".to_string(),
            date: "2026-03-01".to_string(),
            location_id: "mesa".to_string(),
            location_name: "Mesa, AZ".to_string(),
            address: None,
            status: None,
        };
        let json = serde_json::to_string(&project).unwrap();
        assert!(!json.contains("address"));
        assert!(!json.contains("status"));
        assert!(json.contains("\"type\":\"Zoning Board\""));
    }
}
