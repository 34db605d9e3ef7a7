// src/models/assistant.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleQuestionPayload {
    #[schema(example = "Who is working next Friday at Centro?")]
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleAnswer {
    pub answer: String,
}

// Resposta do serviço externo de extração (melhor esforço)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub branch_name_hint: Option<String>,
}
