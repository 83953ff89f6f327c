use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ParseEnumError;
use crate::database::entity::Entity;
use crate::filter::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ComplaintStatus::Pending),
            "in_progress" => Ok(ComplaintStatus::InProgress),
            "resolved" => Ok(ComplaintStatus::Resolved),
            "closed" => Ok(ComplaintStatus::Closed),
            other => Err(ParseEnumError::new("status", other)),
        }
    }
}

pub const MIN_PRIORITY: i32 = 1;
pub const MAX_PRIORITY: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub agency_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: Option<String>,
    pub priority: i32,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Complaint payload as submitted. Ownership and workflow fields are accepted
/// but never trusted; filing always overrides them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub agency_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<ComplaintStatus>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Partial update to an existing complaint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub priority: Option<i32>,
    pub status: Option<ComplaintStatus>,
}

impl Complaint {
    /// Applies content edits and an optional status transition.
    pub fn apply(mut self, changes: ComplaintChanges, now: DateTime<Utc>) -> Self {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(location) = changes.location {
            self.location = Some(location);
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        self.updated_at = now;
        match changes.status {
            Some(status) => self.with_status(status, now),
            None => self,
        }
    }

    /// Moves to `status`. Only a transition to resolved stamps `resolved_at`.
    pub fn with_status(mut self, status: ComplaintStatus, now: DateTime<Utc>) -> Self {
        if status == ComplaintStatus::Resolved {
            self.resolved_at = Some(now);
        }
        self.status = status;
        self.updated_at = now;
        self
    }

    /// Hands the complaint to an agency; work on it starts immediately.
    pub fn assigned_to(mut self, agency_id: Uuid, now: DateTime<Utc>) -> Self {
        self.agency_id = Some(agency_id);
        self.status = ComplaintStatus::InProgress;
        self.updated_at = now;
        self
    }

    pub fn unassigned(mut self, now: DateTime<Utc>) -> Self {
        self.agency_id = None;
        self.updated_at = now;
        self
    }
}

impl<'r> FromRow<'r, PgRow> for Complaint {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            agency_id: row.try_get("agency_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            location: row.try_get("location")?,
            priority: row.try_get("priority")?,
            status: status.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            resolved_at: row.try_get("resolved_at")?,
        })
    }
}

impl Entity for Complaint {
    const TABLE: &'static str = "complaints";
    const KIND: &'static str = "Complaint";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "owner_id",
        "agency_id",
        "title",
        "description",
        "category",
        "location",
        "priority",
        "status",
        "created_at",
        "updated_at",
        "resolved_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.owner_id.into(),
            self.agency_id.into(),
            self.title.clone().into(),
            self.description.clone().into(),
            self.category.clone().into(),
            self.location.clone().into(),
            self.priority.into(),
            self.status.as_str().into(),
            self.created_at.into(),
            self.updated_at.into(),
            self.resolved_at.into(),
        ]
    }
}
