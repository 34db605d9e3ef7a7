// src/services/assistant_service.rs
//
// Responde "quem trabalha quando" em texto livre. Passo único, sem novas tentativas:
// toda falha vira uma mensagem de orientação, nunca um erro para o chamador.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BusinessRepository, ShiftRepository},
    models::{business::Business, schedule::ShiftView},
    services::{extraction::ScheduleExtractor, hours_service::local_midnight, temporal},
};

/// Quantos nomes a mensagem de desambiguação lista.
pub const MAX_LISTED_BRANCHES: usize = 8;

pub const EMPTY_QUESTION: &str =
    "Ask me who is working on a given day, for example \"Who is working next Friday?\"";
pub const NOT_UNDERSTOOD: &str =
    "Sorry, I couldn't understand which day you meant. Try something like \"next Monday\" or \"2026-03-06\".";
pub const INVALID_DATE: &str =
    "I couldn't work out which date you meant. Try rephrasing with a specific day.";
pub const NO_BRANCHES: &str = "You don't own any branches yet.";
pub const LOOKUP_FAILED: &str = "Something went wrong while reading the schedule. Please try again.";

/// Leituras de que o assistente precisa: filiais do dono e turnos de um intervalo.
#[async_trait]
pub trait ScheduleDirectory: Send + Sync {
    async fn owned_businesses(&self, user_id: Uuid) -> Result<Vec<Business>, AppError>;

    async fn shifts_between(
        &self,
        business_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ShiftView>, AppError>;
}

#[derive(Clone)]
pub struct PgScheduleDirectory {
    business_repo: BusinessRepository,
    shift_repo: ShiftRepository,
}

impl PgScheduleDirectory {
    pub fn new(business_repo: BusinessRepository, shift_repo: ShiftRepository) -> Self {
        Self {
            business_repo,
            shift_repo,
        }
    }
}

#[async_trait]
impl ScheduleDirectory for PgScheduleDirectory {
    async fn owned_businesses(&self, user_id: Uuid) -> Result<Vec<Business>, AppError> {
        self.business_repo.owned_businesses(user_id).await
    }

    async fn shifts_between(
        &self,
        business_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ShiftView>, AppError> {
        let rows = self
            .shift_repo
            .list_shifts(business_id, Some(start), Some(end), None)
            .await?;
        Ok(rows.into_iter().map(ShiftView::from).collect())
    }
}

#[derive(Clone)]
pub struct AssistantService {
    extractor: Arc<dyn ScheduleExtractor>,
    directory: Arc<dyn ScheduleDirectory>,
    default_time_zone: Tz,
}

/// Resultado da escolha da filial.
#[derive(Debug)]
pub enum BranchChoice<'a> {
    Found(&'a Business),
    NotFound,
    Ambiguous(Vec<&'a str>),
}

/// Com dica: substring sem diferenciar maiúsculas. Sem dica: todas as filiais do dono.
pub fn choose_branch<'a>(owned: &'a [Business], hint: Option<&str>) -> BranchChoice<'a> {
    let hint = hint.map(str::trim).filter(|h| !h.is_empty());
    let candidates: Vec<&Business> = match hint {
        Some(hint) => {
            let needle = hint.to_lowercase();
            owned
                .iter()
                .filter(|b| b.name.to_lowercase().contains(&needle))
                .collect()
        }
        None => owned.iter().collect(),
    };

    match candidates.as_slice() {
        [] => BranchChoice::NotFound,
        [only] => BranchChoice::Found(*only),
        many => BranchChoice::Ambiguous(
            many.iter()
                .copied()
                .take(MAX_LISTED_BRANCHES)
                .map(|b| b.name.as_str())
                .collect(),
        ),
    }
}

/// Uma linha por turno, `nome: HH:MM–HH:MM` no fuso da filial, ordenadas pelo início.
pub fn render_shifts(shifts: &[ShiftView], tz: &Tz) -> Vec<String> {
    let mut ordered: Vec<&ShiftView> = shifts.iter().collect();
    ordered.sort_by_key(|s| (s.start, s.id));
    ordered
        .into_iter()
        .map(|s| {
            format!(
                "{}: {}–{}",
                s.assignee_display_name,
                s.start.with_timezone(tz).format("%H:%M"),
                s.end.with_timezone(tz).format("%H:%M"),
            )
        })
        .collect()
}

fn human_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

impl AssistantService {
    pub fn new(
        extractor: Arc<dyn ScheduleExtractor>,
        directory: Arc<dyn ScheduleDirectory>,
        default_time_zone: Tz,
    ) -> Self {
        Self {
            extractor,
            directory,
            default_time_zone,
        }
    }

    pub async fn answer(&self, user_id: Uuid, question: &str, now: DateTime<Utc>) -> String {
        let question = question.trim();
        if question.is_empty() {
            return EMPTY_QUESTION.to_string();
        }

        let today = now.with_timezone(&self.default_time_zone).date_naive();

        let extraction = match self.extractor.extract(question, today).await {
            Ok(extraction) => extraction,
            Err(e) => {
                tracing::info!(error = %e, "extração degradada");
                return NOT_UNDERSTOOD.to_string();
            }
        };
        let Some(extracted_date) = extraction.date.as_deref() else {
            return NOT_UNDERSTOOD.to_string();
        };
        if temporal::parse_iso_date(extracted_date).is_err() {
            return INVALID_DATE.to_string();
        }
        let target = match temporal::resolve(question, today, Some(extracted_date)) {
            Ok(date) => date,
            Err(_) => return INVALID_DATE.to_string(),
        };

        let owned = match self.directory.owned_businesses(user_id).await {
            Ok(owned) => owned,
            Err(e) => {
                tracing::error!(error = ?e, %user_id, "falha ao carregar filiais");
                return LOOKUP_FAILED.to_string();
            }
        };

        let hint = extraction.branch_name_hint.as_deref();
        let business = match choose_branch(&owned, hint) {
            BranchChoice::Found(business) => business,
            BranchChoice::NotFound => {
                return match hint.map(str::trim).filter(|h| !h.is_empty()) {
                    Some(hint) => format!("I couldn't find a branch matching \"{}\".", hint),
                    None => NO_BRANCHES.to_string(),
                };
            }
            BranchChoice::Ambiguous(names) => {
                return format!("Which branch do you mean? {}", names.join(", "));
            }
        };

        self.shifts_on(business, target).await
    }

    async fn shifts_on(&self, business: &Business, day: NaiveDate) -> String {
        let tz = match business.tz() {
            Ok(tz) => tz,
            Err(e) => {
                tracing::error!(error = ?e, business_id = %business.id, "fuso inválido");
                return LOOKUP_FAILED.to_string();
            }
        };
        let day_start = local_midnight(&tz, day);
        let day_end = local_midnight(&tz, day + Duration::days(1));

        let shifts = match self
            .directory
            .shifts_between(business.id, day_start, day_end)
            .await
        {
            Ok(shifts) => shifts,
            Err(e) => {
                tracing::error!(error = ?e, business_id = %business.id, "falha ao ler turnos");
                return LOOKUP_FAILED.to_string();
            }
        };

        // Sobreposição estrita com [00:00, 24:00) do dia local
        let overlapping: Vec<ShiftView> = shifts
            .into_iter()
            .filter(|s| s.start < day_end && s.end > day_start)
            .collect();

        if overlapping.is_empty() {
            return format!(
                "Nobody is scheduled at {} on {}.",
                business.name,
                human_date(day)
            );
        }

        let mut answer = format!("Scheduled at {} on {}:", business.name, human_date(day));
        for line in render_shifts(&overlapping, &tz) {
            answer.push('\n');
            answer.push_str(&line);
        }
        answer
    }
}
