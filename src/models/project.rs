use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{parse_date, Id, Snapshot};
use crate::error::ClientError;

pub type Project = Snapshot<ProjectData>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Project lifecycle status
///
/// The service may grow new states; unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    InProgress,
    Completed,
    Other(String),
}

impl ProjectStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProjectStatus::InProgress => "IN_PROGRESS",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "IN_PROGRESS" => ProjectStatus::InProgress,
            "COMPLETED" => ProjectStatus::Completed,
            _ => ProjectStatus::Other(value),
        }
    }
}

impl From<ProjectStatus> for String {
    fn from(value: ProjectStatus) -> Self {
        match value {
            ProjectStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ProjectStatus::from(s.to_uppercase()))
    }
}

impl ProjectData {
    pub fn start(&self) -> Option<NaiveDate> {
        self.start_date.as_deref().and_then(parse_date)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end_date.as_deref().and_then(parse_date)
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == Some(ProjectStatus::InProgress)
    }

    pub fn is_completed(&self) -> bool {
        self.status == Some(ProjectStatus::Completed)
    }
}

/// Writable project fields, used for both create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl ProjectInput {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() {
            return Err(ClientError::required("name"));
        }
        if self.start_date.trim().is_empty() {
            return Err(ClientError::required("startDate"));
        }
        if self.end_date.trim().is_empty() {
            return Err(ClientError::required("endDate"));
        }
        Ok(())
    }

    /// Edit form prefilled from a loaded project
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            start_date: project.start_date.clone().unwrap_or_default(),
            end_date: project.end_date.clone().unwrap_or_default(),
            status: None,
        }
    }
}
