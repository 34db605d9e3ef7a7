// src/handlers/reports.rs

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        access::{AnyMember, BusinessAccess, Owner},
        i18n::Locale,
    },
    models::{attendance::AttendanceSnapshot, hours::HoursSummary},
};

// GET /api/businesses/{business_id}/attendance
#[utoipa::path(
    get,
    path = "/api/businesses/{business_id}/attendance",
    tag = "Reports",
    responses(
        (status = 200, description = "Quem está dentro, atrasado ou fora agora", body = AttendanceSnapshot),
        (status = 403, description = "Apenas o dono")
    ),
    params(("business_id" = Uuid, Path, description = "ID da Filial")),
    security(("api_jwt" = []))
)]
pub async fn staff_status(
    State(app_state): State<AppState>,
    locale: Locale,
    access: BusinessAccess<Owner>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = app_state
        .attendance_service
        .snapshot(access.business.id, Utc::now())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(snapshot))
}

// GET /api/businesses/{business_id}/my-hours
#[utoipa::path(
    get,
    path = "/api/businesses/{business_id}/my-hours",
    tag = "Reports",
    responses(
        (status = 200, description = "Horas trabalhadas e planejadas na semana e no mês", body = HoursSummary),
        (status = 403, description = "Sem vínculo com a filial")
    ),
    params(("business_id" = Uuid, Path, description = "ID da Filial")),
    security(("api_jwt" = []))
)]
pub async fn my_hours(
    State(app_state): State<AppState>,
    locale: Locale,
    access: BusinessAccess<AnyMember>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .hours_service
        .aggregate(&access.business, access.user.id, Utc::now())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}
