//! User model and the projects a user owns

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{StudioSubmission, Tier};

/// Kind of saved project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    SavedImage,
    StudioProject,
}

/// Payload of a project. Unrecognised payloads are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectContent {
    SavedImage {
        #[serde(rename = "imageUrl")]
        image_url: String,
        prompt: String,
    },
    StudioProject(Box<StudioSubmission>),
    Raw(serde_json::Value),
}

/// A project saved to a user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub content: ProjectContent,
}

impl UserProject {
    /// Create a saved-image project with a fresh id
    pub fn saved_image(title: impl Into<String>, image_url: String, prompt: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: ProjectKind::SavedImage,
            title: title.into(),
            description: String::new(),
            timestamp: Utc::now(),
            content: ProjectContent::SavedImage { image_url, prompt },
        }
    }

    /// Create a studio-project snapshot with a fresh id
    pub fn studio_project(title: impl Into<String>, submission: StudioSubmission) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: ProjectKind::StudioProject,
            title: title.into(),
            description: submission.prompt.clone(),
            timestamp: Utc::now(),
            content: ProjectContent::StudioProject(Box::new(submission)),
        }
    }
}

/// A registered fan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity key. Compared case-insensitively.
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub vanity_name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub points: u32,
    pub member_since: DateTime<Utc>,
    /// Date the daily allowance was last granted
    #[serde(default)]
    pub last_login: Option<NaiveDate>,
    /// Stored separately from the roster; always empty in the roster blob
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<UserProject>,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            email: email.into(),
            vanity_name: name.clone(),
            name,
            avatar_url: String::new(),
            tier: Tier::Free,
            points: 0,
            member_since: Utc::now(),
            last_login: None,
            projects: Vec::new(),
        }
    }

    /// Case-insensitive identity check
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    /// Normalised form used as the key in the project map
    pub fn email_key(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_case_insensitive() {
        let user = User::new("Fan@Example.com", "Fan");
        assert!(user.has_email("fan@example.com"));
        assert!(user.has_email("  FAN@EXAMPLE.COM "));
        assert!(!user.has_email("other@example.com"));
        assert_eq!(User::email_key(" Fan@Example.com"), "fan@example.com");
    }

    #[test]
    fn test_roster_entry_omits_projects() {
        let user = User::new("fan@example.com", "Fan");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("projects").is_none());
        assert_eq!(json["tier"], "Free");
    }

    #[test]
    fn test_saved_image_content_round_trip() {
        let project = UserProject::saved_image("Cover", "data:image/png;base64,AA".into(), "neon city".into());
        let json = serde_json::to_string(&project).unwrap();
        let back: UserProject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, project);
        assert!(matches!(back.content, ProjectContent::SavedImage { .. }));
    }
}
