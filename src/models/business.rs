// src/models/business.rs

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::auth::display_name;

// ---
// 1. Business (A "Filial")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: Uuid,
    #[schema(example = "Luigi's - Centro")]
    pub name: String,
    #[schema(example = "Europe/Dublin")]
    pub time_zone: String,
    pub created_at: DateTime<Utc>,
}

impl Business {
    /// Fuso horário local da filial (janelas de semana/mês e exibição).
    pub fn tz(&self) -> Result<Tz, AppError> {
        parse_time_zone(&self.time_zone)
    }
}

pub fn parse_time_zone(name: &str) -> Result<Tz, AppError> {
    name.parse::<Tz>()
        .map_err(|_| AppError::InvalidTimeZone(name.to_string()))
}

// ---
// 2. Papel do membro (enum fechado, sem comparação de strings)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "member_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Owner,
    Employee,
}

// ---
// 3. Membership (A "Ponte" Usuário-Filial)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub role: MemberRole,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
}

// Funcionário listado para o dono (JOIN memberships + users)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub first_name: String,
    #[serde(skip_serializing)]
    pub last_name: String,
    pub must_change_password: bool,
}

impl StaffMember {
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name, &self.username)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffMemberView {
    #[serde(flatten)]
    pub member: StaffMember,
    pub display_name: String,
}

impl From<StaffMember> for StaffMemberView {
    fn from(member: StaffMember) -> Self {
        let display_name = member.display_name();
        Self { member, display_name }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchPayload {
    #[validate(length(min = 1, max = 255, message = "O nome da filial é obrigatório."))]
    #[schema(example = "Luigi's - Praia")]
    pub name: String,
    /// Padrão: DEFAULT_TIME_ZONE
    #[schema(example = "Europe/Dublin")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteStaffPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}
