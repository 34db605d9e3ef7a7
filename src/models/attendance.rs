// src/models/attendance.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftWindow {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffIn {
    pub user_id: Uuid,
    pub display_name: String,
    pub clock_in: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffLate {
    pub user_id: Uuid,
    pub display_name: String,
    pub shift: ShiftWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffOut {
    pub user_id: Uuid,
    pub display_name: String,
    pub shift: Option<ShiftWindow>,
}

// Foto do momento: quem está dentro, atrasado ou fora
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct AttendanceSnapshot {
    #[serde(rename = "in")]
    pub in_: Vec<StaffIn>,
    pub late: Vec<StaffLate>,
    pub out: Vec<StaffOut>,
}
