// src/handlers/clock.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        access::{AnyMember, BusinessAccess},
        i18n::Locale,
    },
    models::clock::TimeClock,
};

// POST /api/businesses/{business_id}/clock-in
#[utoipa::path(
    post,
    path = "/api/businesses/{business_id}/clock-in",
    tag = "Time Clock",
    responses(
        (status = 201, description = "Entrada registrada no turno ativo", body = TimeClock),
        (status = 409, description = "Ponto já aberto, sem turno ativo ou turno já batido")
    ),
    params(("business_id" = Uuid, Path, description = "ID da Filial")),
    security(("api_jwt" = []))
)]
pub async fn clock_in(
    State(app_state): State<AppState>,
    locale: Locale,
    access: BusinessAccess<AnyMember>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = app_state
        .clock_service
        .clock_in(access.business.id, access.user.id, Utc::now())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(entry)))
}

// POST /api/businesses/{business_id}/clock-out
#[utoipa::path(
    post,
    path = "/api/businesses/{business_id}/clock-out",
    tag = "Time Clock",
    responses(
        (status = 200, description = "Saída registrada", body = TimeClock),
        (status = 409, description = "Nenhum ponto aberto")
    ),
    params(("business_id" = Uuid, Path, description = "ID da Filial")),
    security(("api_jwt" = []))
)]
pub async fn clock_out(
    State(app_state): State<AppState>,
    locale: Locale,
    access: BusinessAccess<AnyMember>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = app_state
        .clock_service
        .clock_out(access.business.id, access.user.id, Utc::now())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(entry))
}
