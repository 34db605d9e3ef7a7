// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::get_my_businesses,
        handlers::auth::change_password,

        // --- Businesses ---
        handlers::business::create_branch,
        handlers::business::invite_staff,
        handlers::business::list_staff,

        // --- Shifts ---
        handlers::shifts::list_owner_shifts,
        handlers::shifts::list_staff_shifts,
        handlers::shifts::create_shift,
        handlers::shifts::delete_shift,

        // --- Time Clock ---
        handlers::clock::clock_in,
        handlers::clock::clock_out,

        // --- Reports ---
        handlers::reports::staff_status,
        handlers::reports::my_hours,

        // --- Assistant ---
        handlers::assistant::ask_schedule,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::UserBusiness,
            models::auth::RegisterOwnerPayload,
            models::auth::LoginUserPayload,
            models::auth::ChangePasswordPayload,
            models::auth::AuthResponse,

            // --- Businesses ---
            models::business::Business,
            models::business::MemberRole,
            models::business::Membership,
            models::business::StaffMember,
            models::business::StaffMemberView,
            models::business::CreateBranchPayload,
            models::business::InviteStaffPayload,
            models::business::InvitationResponse,

            // --- Shifts ---
            models::schedule::WorkShift,
            models::schedule::ShiftView,
            models::schedule::CreateShiftPayload,

            // --- Time Clock ---
            models::clock::TimeClock,

            // --- Reports ---
            models::attendance::ShiftWindow,
            models::attendance::StaffIn,
            models::attendance::StaffLate,
            models::attendance::StaffOut,
            models::attendance::AttendanceSnapshot,
            models::hours::HoursPair,
            models::hours::HoursSummary,

            // --- Assistant ---
            models::assistant::ScheduleQuestionPayload,
            models::assistant::ScheduleAnswer,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro do dono"),
        (name = "Users", description = "Dados do Usuário, filiais e troca de senha"),
        (name = "Businesses", description = "Filiais, convites e equipe"),
        (name = "Shifts", description = "Escala de turnos"),
        (name = "Time Clock", description = "Entrada e saída do ponto"),
        (name = "Reports", description = "Presença e horas"),
        (name = "Assistant", description = "Perguntas sobre a escala em texto livre")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/register",
            "/api/users/me/password",
            "/api/businesses/{business_id}/clock-in",
            "/api/businesses/{business_id}/my-hours",
            "/api/assistant/schedule-question",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltando {path}");
        }
    }
}
