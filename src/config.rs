// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{BusinessRepository, ClockRepository, ShiftRepository, UserRepository},
    models::business::parse_time_zone,
    services::{
        assistant_service::{AssistantService, PgScheduleDirectory},
        attendance_service::AttendanceService,
        auth::AuthService,
        business_service::BusinessService,
        clock_service::ClockService,
        extraction::{DisabledExtractor, HttpScheduleExtractor, ScheduleExtractor},
        hours_service::HoursService,
        mailer::{LogMailer, Mailer},
        membership_service::MembershipService,
        shift_service::ShiftService,
    },
};

// Configurações lidas do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub default_time_zone: String,
    pub extraction_url: Option<String>,
    pub extraction_api_key: Option<String>,
    pub extraction_timeout: Duration,
    pub mail_from: String,
    pub db_max_connections: u32,
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match optional(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ({}): {}", name, raw, e)),
        None => Ok(default),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let default_time_zone = optional("DEFAULT_TIME_ZONE").unwrap_or_else(|| "UTC".to_string());
        parse_time_zone(&default_time_zone)
            .map_err(|_| anyhow::anyhow!("DEFAULT_TIME_ZONE inválido: {}", default_time_zone))?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            default_time_zone,
            extraction_url: optional("EXTRACTION_URL"),
            extraction_api_key: optional("EXTRACTION_API_KEY"),
            extraction_timeout: Duration::from_secs(parsed_or("EXTRACTION_TIMEOUT_SECS", 8u64)?),
            mail_from: optional("MAIL_FROM")
                .unwrap_or_else(|| "no-reply@checkpoint.local".to_string()),
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 5u32)?,
        })
    }

    pub fn default_tz(&self) -> Tz {
        self.default_time_zone.parse().unwrap_or(Tz::UTC)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Arc<Settings>,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub membership_service: MembershipService,
    pub business_service: BusinessService,
    pub shift_service: ShiftService,
    pub clock_service: ClockService,
    pub attendance_service: AttendanceService,
    pub hours_service: HoursService,
    pub assistant_service: AssistantService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let settings = Settings::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new(settings.mail_from.clone()));

        let extractor: Arc<dyn ScheduleExtractor> = match &settings.extraction_url {
            Some(url) => Arc::new(HttpScheduleExtractor::new(
                url.clone(),
                settings.extraction_api_key.clone(),
                settings.extraction_timeout,
            )?),
            None => {
                tracing::warn!("EXTRACTION_URL ausente: o assistente de escala vai responder só com orientações");
                Arc::new(DisabledExtractor)
            }
        };

        Ok(Self::from_parts(db_pool, settings, mailer, extractor))
    }

    /// Monta o gráfico de dependências a partir do pool e dos colaboradores externos.
    pub fn from_parts(
        db_pool: PgPool,
        settings: Settings,
        mailer: Arc<dyn Mailer>,
        extractor: Arc<dyn ScheduleExtractor>,
    ) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let business_repo = BusinessRepository::new(db_pool.clone());
        let shift_repo = ShiftRepository::new(db_pool.clone());
        let clock_repo = ClockRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            business_repo.clone(),
            settings.jwt_secret.clone(),
            settings.default_time_zone.clone(),
            db_pool.clone(),
        );
        let membership_service = MembershipService::new(business_repo.clone());
        let business_service = BusinessService::new(
            business_repo.clone(),
            user_repo,
            mailer,
            settings.default_time_zone.clone(),
            db_pool.clone(),
        );
        let shift_service =
            ShiftService::new(shift_repo.clone(), business_repo.clone(), db_pool.clone());
        let clock_service = ClockService::new(
            clock_repo.clone(),
            shift_repo.clone(),
            business_repo.clone(),
            db_pool.clone(),
        );
        let attendance_service =
            AttendanceService::new(business_repo.clone(), clock_repo.clone(), shift_repo.clone());
        let hours_service = HoursService::new(clock_repo, shift_repo.clone());
        let assistant_service = AssistantService::new(
            extractor,
            Arc::new(PgScheduleDirectory::new(business_repo, shift_repo)),
            settings.default_tz(),
        );

        Self {
            db_pool,
            settings: Arc::new(settings),
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            membership_service,
            business_service,
            shift_service,
            clock_service,
            attendance_service,
            hours_service,
            assistant_service,
        }
    }
}
