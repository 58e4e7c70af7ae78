use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::status::Status;

/// A tracked job application (a card on the board)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Stable unique ID like `APP-007`
    pub id: String,
    pub company: String,
    pub role: String,
    /// Pipeline stage; decides which column the card shows in
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Date the application was sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied: Option<NaiveDate>,
    /// Tags (without the `#` prefix)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Application {
    /// Create an application with only the required fields set
    pub fn new(id: impl Into<String>, company: impl Into<String>, role: impl Into<String>, status: Status) -> Self {
        Application {
            id: id.into(),
            company: company.into(),
            role: role.into(),
            status,
            location: None,
            url: None,
            applied: None,
            tags: Vec::new(),
            note: None,
        }
    }
}
