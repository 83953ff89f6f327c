use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::entity::Entity;
use crate::filter::Value;

/// A message posted against a complaint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Response {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub responder_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Response {
    const TABLE: &'static str = "responses";
    const KIND: &'static str = "Response";
    const COLUMNS: &'static [&'static str] = &["id", "complaint_id", "responder_id", "message", "created_at"];
    const DEFAULT_ORDER: &'static str = "created_at asc";

    fn id(&self) -> Uuid {
        self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.complaint_id.into(),
            self.responder_id.into(),
            self.message.clone().into(),
            self.created_at.into(),
        ]
    }
}
