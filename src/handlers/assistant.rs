// src/handlers/assistant.rs

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::assistant::{ScheduleAnswer, ScheduleQuestionPayload},
};

// POST /api/assistant/schedule-question
// Sempre 200: falhas viram mensagens de orientação no próprio texto
#[utoipa::path(
    post,
    path = "/api/assistant/schedule-question",
    tag = "Assistant",
    request_body = ScheduleQuestionPayload,
    responses((status = 200, description = "Resposta em linguagem natural", body = ScheduleAnswer)),
    security(("api_jwt" = []))
)]
pub async fn ask_schedule(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ScheduleQuestionPayload>,
) -> Json<ScheduleAnswer> {
    let answer = app_state
        .assistant_service
        .answer(user.id, &payload.question, Utc::now())
        .await;

    Json(ScheduleAnswer { answer })
}
