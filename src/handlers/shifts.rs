// src/handlers/shifts.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        access::{AnyMember, BusinessAccess, Owner},
        i18n::Locale,
    },
    models::schedule::{CreateShiftPayload, ShiftListQuery, ShiftView, WorkShift},
};

// GET /api/businesses/{business_id}/shifts
#[utoipa::path(
    get,
    path = "/api/businesses/{business_id}/shifts",
    tag = "Shifts",
    responses(
        (status = 200, description = "Escala da filial (visão do dono)", body = [ShiftView]),
        (status = 403, description = "Apenas o dono")
    ),
    params(
        ("business_id" = Uuid, Path, description = "ID da Filial"),
        ShiftListQuery
    ),
    security(("api_jwt" = []))
)]
pub async fn list_owner_shifts(
    State(app_state): State<AppState>,
    locale: Locale,
    access: BusinessAccess<Owner>,
    Query(query): Query<ShiftListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let shifts = app_state
        .shift_service
        .list_shifts(access.business.id, query.start, query.end, None)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(shifts))
}

// GET /api/businesses/{business_id}/schedule
#[utoipa::path(
    get,
    path = "/api/businesses/{business_id}/schedule",
    tag = "Shifts",
    responses(
        (status = 200, description = "Escala da filial (visão do funcionário)", body = [ShiftView]),
        (status = 403, description = "Sem vínculo com a filial")
    ),
    params(
        ("business_id" = Uuid, Path, description = "ID da Filial"),
        ShiftListQuery
    ),
    security(("api_jwt" = []))
)]
pub async fn list_staff_shifts(
    State(app_state): State<AppState>,
    locale: Locale,
    access: BusinessAccess<AnyMember>,
    Query(query): Query<ShiftListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let assignee = query.mine.then_some(access.user.id);

    let shifts = app_state
        .shift_service
        .list_shifts(access.business.id, query.start, query.end, assignee)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(shifts))
}

// POST /api/businesses/{business_id}/shifts
#[utoipa::path(
    post,
    path = "/api/businesses/{business_id}/shifts",
    tag = "Shifts",
    request_body = CreateShiftPayload,
    responses(
        (status = 201, description = "Turno criado", body = WorkShift),
        (status = 400, description = "Janela inválida ou responsável fora da filial"),
        (status = 403, description = "Apenas o dono")
    ),
    params(("business_id" = Uuid, Path, description = "ID da Filial")),
    security(("api_jwt" = []))
)]
pub async fn create_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    access: BusinessAccess<Owner>,
    Json(payload): Json<CreateShiftPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let shift = app_state
        .shift_service
        .create_shift(
            access.business.id,
            access.user.id,
            payload.assignee_id,
            payload.start,
            payload.end,
            payload.notes.trim(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(shift)))
}

// DELETE /api/businesses/{business_id}/shifts/{shift_id}
#[utoipa::path(
    delete,
    path = "/api/businesses/{business_id}/shifts/{shift_id}",
    tag = "Shifts",
    responses(
        (status = 204, description = "Turno removido"),
        (status = 404, description = "Turno não encontrado nesta filial")
    ),
    params(
        ("business_id" = Uuid, Path, description = "ID da Filial"),
        ("shift_id" = Uuid, Path, description = "ID do Turno")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: BusinessAccess<Owner>,
    Path((business_id, shift_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .shift_service
        .delete_shift(business_id, shift_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
