// src/models/schedule.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::auth::display_name;

// Turno planejado: intervalo [start_at, end_at) de um usuário numa filial.
// Pode atravessar a meia-noite.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkShift {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub notes: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl WorkShift {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start_at <= instant && instant <= self.end_at
    }
}

// Linha do JOIN work_shifts + users usada nas listagens
#[derive(Debug, Clone, FromRow)]
pub struct ShiftRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub notes: String,
}

impl ShiftRow {
    pub fn assignee_display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name, &self.username)
    }
}

// O que o calendário recebe
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftView {
    pub id: Uuid,
    pub assignee_id: Uuid,
    #[schema(example = "Ana Souza")]
    pub assignee_display_name: String,
    #[schema(example = "2026-02-24T09:00:00Z")]
    pub start: DateTime<Utc>,
    #[schema(example = "2026-02-24T17:00:00Z")]
    pub end: DateTime<Utc>,
    pub notes: String,
}

impl From<ShiftRow> for ShiftView {
    fn from(row: ShiftRow) -> Self {
        Self {
            id: row.id,
            assignee_id: row.user_id,
            assignee_display_name: row.assignee_display_name(),
            start: row.start_at,
            end: row.end_at,
            notes: row.notes,
        }
    }
}

fn validate_window(payload: &CreateShiftPayload) -> Result<(), ValidationError> {
    if payload.end <= payload.start {
        let mut err = ValidationError::new("shift_window");
        err.message = Some("O fim do turno deve ser posterior ao início.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_window", skip_on_field_errors = false))]
pub struct CreateShiftPayload {
    pub assignee_id: Uuid,
    #[schema(example = "2026-02-24T09:00:00Z")]
    pub start: DateTime<Utc>,
    #[schema(example = "2026-02-24T17:00:00Z")]
    pub end: DateTime<Utc>,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Observações muito longas."))]
    pub notes: String,
}

// Filtros opcionais das listagens (?start=..&end=..&mine=true)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShiftListQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mine: bool,
}
