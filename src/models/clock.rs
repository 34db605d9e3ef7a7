// src/models/clock.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Registro de ponto. clock_out nulo = ponto aberto.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeClock {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub work_shift_id: Option<Uuid>,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TimeClock {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}
