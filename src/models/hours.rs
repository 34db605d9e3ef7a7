// src/models/hours.rs

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct HoursPair {
    pub hours: i64,
    pub minutes: i64,
}

impl HoursPair {
    pub fn from_minutes(total: i64) -> Self {
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HoursSummary {
    pub week_worked: HoursPair,
    pub week_scheduled: HoursPair,
    pub month_worked: HoursPair,
    pub month_scheduled: HoursPair,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
}
