// src/common/error.rs

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;
use crate::models::business::MemberRole;

/// Como a negação de acesso deve chegar ao cliente.
/// A decisão é da autoridade de vínculos, a apresentação é de quem chama.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialStyle {
    /// 303 para o painel, no estilo das telas do dono
    Redirect,
    /// 403 com corpo JSON
    Structured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NotMember,
    RoleRequired(MemberRole),
}

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("O fim do turno deve ser posterior ao início")]
    InvalidShiftWindow,

    #[error("O responsável não faz parte da filial")]
    AssigneeNotMember,

    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Troca de senha obrigatória")]
    PasswordChangeRequired,

    #[error("Acesso negado: {reason:?}")]
    Forbidden {
        reason: DenialReason,
        style: DenialStyle,
    },

    #[error("Não encontrado: {0}")]
    ResourceNotFound(String),

    // --- Conflitos de estado do ponto ---
    #[error("Já existe um ponto aberto")]
    AlreadyClockedIn,

    #[error("Nenhum ponto aberto")]
    NotClockedIn,

    #[error("Nenhum turno ativo agora")]
    NoActiveShift,

    #[error("Este turno já foi batido")]
    ShiftAlreadyClocked,

    #[error("Expressão de data inválida: {0}")]
    InvalidDateExpression(String),

    #[error("Serviço de extração indisponível: {0}")]
    UpstreamDegraded(String),

    #[error("Fuso horário inválido: {0}")]
    InvalidTimeZone(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
    pub redirect_to: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
            redirect_to: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.error });
        if let Some(details) = self.details {
            body["details"] = details;
        }

        match self.redirect_to {
            Some(location) => (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, location)],
                Json(body),
            )
                .into_response(),
            None => (self.status, Json(body)).into_response(),
        }
    }
}

impl AppError {
    /// Chave do catálogo de mensagens e status HTTP de cada variante.
    fn message_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation.invalid_fields"),
            AppError::InvalidShiftWindow => (StatusCode::BAD_REQUEST, "shift.invalid_window"),
            AppError::AssigneeNotMember => (StatusCode::BAD_REQUEST, "shift.assignee_not_member"),
            AppError::UsernameAlreadyExists => (StatusCode::CONFLICT, "auth.username_taken"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "auth.email_taken"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "auth.invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "auth.invalid_token"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "auth.user_not_found"),
            AppError::PasswordChangeRequired => (StatusCode::FORBIDDEN, "auth.password_change_required"),
            AppError::Forbidden { reason, .. } => (
                StatusCode::FORBIDDEN,
                match reason {
                    DenialReason::NotMember => "membership.not_member",
                    DenialReason::RoleRequired(MemberRole::Owner) => "membership.owner_required",
                    DenialReason::RoleRequired(MemberRole::Employee) => "membership.employee_required",
                },
            ),
            AppError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "resource.not_found"),
            AppError::AlreadyClockedIn => (StatusCode::CONFLICT, "clock.already_clocked_in"),
            AppError::NotClockedIn => (StatusCode::CONFLICT, "clock.not_clocked_in"),
            AppError::NoActiveShift => (StatusCode::CONFLICT, "clock.no_active_shift"),
            AppError::ShiftAlreadyClocked => (StatusCode::CONFLICT, "clock.shift_already_clocked"),
            AppError::InvalidDateExpression(_) => (StatusCode::BAD_REQUEST, "assistant.invalid_date"),
            AppError::UpstreamDegraded(_) => (StatusCode::BAD_GATEWAY, "assistant.not_understood"),
            AppError::InvalidTimeZone(_) => (StatusCode::BAD_REQUEST, "business.invalid_time_zone"),
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal.unexpected"),
        }
    }

    /// Converte o erro de domínio na resposta traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let (status, key) = self.message_key();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let error = match self {
            AppError::ResourceNotFound(what) => i18n.format(&locale.0, key, &[what]),
            _ => i18n.translate(&locale.0, key),
        };

        let mut api_error = ApiError::new(status, error);

        match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                api_error.details = Some(serde_json::Value::Object(details));
            }
            AppError::Forbidden {
                style: DenialStyle::Redirect,
                ..
            } => {
                api_error.redirect_to = Some("/api/users/me/businesses".to_string());
            }
            _ => {}
        }

        api_error
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), I18nStore::shared())
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Locale {
        Locale("en".to_string())
    }

    #[test]
    fn state_conflicts_are_409() {
        let i18n = I18nStore::shared();
        for err in [
            AppError::AlreadyClockedIn,
            AppError::NotClockedIn,
            AppError::NoActiveShift,
            AppError::ShiftAlreadyClocked,
        ] {
            assert_eq!(err.to_api_error(&en(), i18n).status, StatusCode::CONFLICT);
        }
    }

    #[test]
    fn structured_denial_is_403_without_redirect() {
        let err = AppError::Forbidden {
            reason: DenialReason::RoleRequired(MemberRole::Owner),
            style: DenialStyle::Structured,
        };
        let api = err.to_api_error(&en(), I18nStore::shared());
        assert_eq!(api.status, StatusCode::FORBIDDEN);
        assert!(api.redirect_to.is_none());
        assert_eq!(api.error, "Only the branch owner can do this.");
    }

    #[test]
    fn redirect_denial_becomes_see_other() {
        let err = AppError::Forbidden {
            reason: DenialReason::NotMember,
            style: DenialStyle::Redirect,
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().contains_key(header::LOCATION));
    }

    #[test]
    fn not_found_message_is_localized_with_subject() {
        let err = AppError::ResourceNotFound("shift".to_string());
        let api = err.to_api_error(&Locale("pt".to_string()), I18nStore::shared());
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Recurso não encontrado: shift.");
    }
}
