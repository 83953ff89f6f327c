use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::entity::Entity;
use crate::filter::Value;

/// Organisational unit complaints are assigned to; administered by one agency admin.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Agency {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub admin_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Agency {
    const TABLE: &'static str = "agencies";
    const KIND: &'static str = "Agency";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "contact_email",
        "contact_phone",
        "admin_id",
        "created_at",
        "updated_at",
    ];
    const UNIQUE: &'static [&'static str] = &["name"];
    const DEFAULT_ORDER: &'static str = "name asc";

    fn id(&self) -> Uuid {
        self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.name.clone().into(),
            self.description.clone().into(),
            self.contact_email.clone().into(),
            self.contact_phone.clone().into(),
            self.admin_id.into(),
            self.created_at.into(),
            self.updated_at.into(),
        ]
    }
}
