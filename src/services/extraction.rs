// src/services/extraction.rs
//
// Cliente do serviço externo que extrai (data, nome da filial) de texto livre.
// Melhor esforço: qualquer falha vira `UpstreamDegraded`, nunca um erro fatal.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::{common::error::AppError, models::assistant::Extraction};

#[async_trait]
pub trait ScheduleExtractor: Send + Sync {
    async fn extract(&self, text: &str, today: NaiveDate) -> Result<Extraction, AppError>;
}

#[derive(Serialize)]
struct ExtractionRequest<'a> {
    text: &'a str,
    today: NaiveDate,
}

pub struct HttpScheduleExtractor {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpScheduleExtractor {
    pub fn new(url: String, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            api_key,
            timeout,
        })
    }

    async fn call(&self, text: &str, today: NaiveDate) -> Result<Extraction, reqwest::Error> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&ExtractionRequest { text, today });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        request
            .send()
            .await?
            .error_for_status()?
            .json::<Extraction>()
            .await
    }
}

#[async_trait]
impl ScheduleExtractor for HttpScheduleExtractor {
    async fn extract(&self, text: &str, today: NaiveDate) -> Result<Extraction, AppError> {
        match tokio::time::timeout(self.timeout, self.call(text, today)).await {
            Ok(Ok(extraction)) => Ok(extraction),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "falha no serviço de extração");
                Err(AppError::UpstreamDegraded(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "serviço de extração expirou");
                Err(AppError::UpstreamDegraded("timeout".into()))
            }
        }
    }
}

/// Usado quando EXTRACTION_URL não está configurada.
pub struct DisabledExtractor;

#[async_trait]
impl ScheduleExtractor for DisabledExtractor {
    async fn extract(&self, _text: &str, _today: NaiveDate) -> Result<Extraction, AppError> {
        Err(AppError::UpstreamDegraded("extraction disabled".into()))
    }
}
