// src/handlers/business.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        access::{BusinessAccess, OwnerPage},
        auth::AuthenticatedUser,
        i18n::Locale,
    },
    models::business::{
        Business, CreateBranchPayload, InvitationResponse, InviteStaffPayload, StaffMemberView,
    },
};

// POST /api/businesses
#[utoipa::path(
    post,
    path = "/api/businesses",
    tag = "Businesses",
    request_body = CreateBranchPayload,
    responses(
        (status = 201, description = "Filial criada; o criador vira dono", body = Business),
        (status = 400, description = "Fuso horário inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateBranchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let business = app_state
        .business_service
        .create_branch(user.id, &payload.name, payload.time_zone.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(business)))
}

// POST /api/businesses/{business_id}/staff
#[utoipa::path(
    post,
    path = "/api/businesses/{business_id}/staff",
    tag = "Businesses",
    request_body = InviteStaffPayload,
    responses(
        (status = 201, description = "Funcionário convidado", body = InvitationResponse),
        (status = 303, description = "Não é dono da filial: volta ao painel"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    params(("business_id" = Uuid, Path, description = "ID da Filial")),
    security(("api_jwt" = []))
)]
pub async fn invite_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    access: BusinessAccess<OwnerPage>,
    Json(payload): Json<InviteStaffPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let invitation = app_state
        .business_service
        .invite_staff(
            &access.business,
            &payload.email,
            payload.first_name.trim(),
            payload.last_name.trim(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(invitation)))
}

// GET /api/businesses/{business_id}/staff
#[utoipa::path(
    get,
    path = "/api/businesses/{business_id}/staff",
    tag = "Businesses",
    responses(
        (status = 200, description = "Funcionários por nome de exibição", body = [StaffMemberView]),
        (status = 303, description = "Não é dono da filial: volta ao painel")
    ),
    params(("business_id" = Uuid, Path, description = "ID da Filial")),
    security(("api_jwt" = []))
)]
pub async fn list_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    access: BusinessAccess<OwnerPage>,
) -> Result<impl IntoResponse, ApiError> {
    let staff = app_state
        .business_service
        .list_staff(access.business.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let views: Vec<StaffMemberView> = staff.into_iter().map(StaffMemberView::from).collect();
    Ok(Json(views))
}
