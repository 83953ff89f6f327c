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
pub enum Role {
    Citizen,
    AgencyAdmin,
    SystemAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::AgencyAdmin => "agency_admin",
            Role::SystemAdmin => "system_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citizen" => Ok(Role::Citizen),
            "agency_admin" => Ok(Role::AgencyAdmin),
            "system_admin" => Ok(Role::SystemAdmin),
            other => Err(ParseEnumError::new("role", other)),
        }
    }
}

/// A registered user of any role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub national_id: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_agency_admin(&self) -> bool {
        self.role == Role::AgencyAdmin
    }
}

impl<'r> FromRow<'r, PgRow> for Account {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            phone_number: row.try_get("phone_number")?,
            national_id: row.try_get("national_id")?,
            password_hash: row.try_get("password_hash")?,
            role: role.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl Entity for Account {
    const TABLE: &'static str = "accounts";
    const KIND: &'static str = "Account";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "email",
        "full_name",
        "phone_number",
        "national_id",
        "password_hash",
        "role",
        "is_active",
        "created_at",
        "updated_at",
    ];
    const UNIQUE: &'static [&'static str] = &["email", "national_id"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.email.clone().into(),
            self.full_name.clone().into(),
            self.phone_number.clone().into(),
            self.national_id.clone().into(),
            self.password_hash.clone().into(),
            self.role.as_str().into(),
            self.is_active.into(),
            self.created_at.into(),
            self.updated_at.into(),
        ]
    }
}
