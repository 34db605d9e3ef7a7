// src/middleware/access.rs
//
// Guardião de filial: lê o `business_id` do caminho e pergunta à autoridade de vínculos.

use axum::extract::{FromRef, FromRequestParts, Path};
use axum::http::request::Parts;
use serde::Deserialize;
use std::marker::PhantomData;
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError, DenialStyle},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::User,
        business::{Business, MemberRole},
    },
};

/// 1. O que uma rota exige do vínculo, e como a negação deve ser apresentada
pub trait RoleRequirement: Send + Sync + 'static {
    const ROLE: Option<MemberRole>;
    const DENIAL: DenialStyle;
}

/// Telas do dono (equipe, convites): negação redireciona para o painel
pub struct OwnerPage;
impl RoleRequirement for OwnerPage {
    const ROLE: Option<MemberRole> = Some(MemberRole::Owner);
    const DENIAL: DenialStyle = DenialStyle::Redirect;
}

/// Ações do dono via API (turnos, presença): 403 estruturado
pub struct Owner;
impl RoleRequirement for Owner {
    const ROLE: Option<MemberRole> = Some(MemberRole::Owner);
    const DENIAL: DenialStyle = DenialStyle::Structured;
}

/// Qualquer vínculo com a filial (ponto, horas, escala)
pub struct AnyMember;
impl RoleRequirement for AnyMember {
    const ROLE: Option<MemberRole> = None;
    const DENIAL: DenialStyle = DenialStyle::Structured;
}

#[derive(Debug, Deserialize)]
struct BusinessPath {
    business_id: Uuid,
}

/// 2. O Extractor: usuário + filial, com o vínculo já verificado
pub struct BusinessAccess<R> {
    pub user: User,
    pub business: Business,
    _requirement: PhantomData<fn() -> R>,
}

impl<R, S> FromRequestParts<S> for BusinessAccess<R>
where
    R: RoleRequirement,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);
        let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

        // A. Usuário (auth_guard já rodou)
        let AuthenticatedUser(user) = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
            .map_err(to_api)?;

        // B. Filial do caminho
        let Path(path) = Path::<BusinessPath>::from_request_parts(parts, state)
            .await
            .map_err(|_| to_api(AppError::ResourceNotFound("business".to_string())))?;

        // C. Verifica no banco, sempre (sem cache)
        let (_, business) = app_state
            .membership_service
            .find_membership(user.id, path.business_id, R::ROLE, R::DENIAL)
            .await
            .map_err(to_api)?;

        Ok(BusinessAccess {
            user,
            business,
            _requirement: PhantomData,
        })
    }
}
