// src/test_support.rs
//
// Dados de apoio para os testes que rodam contra o Postgres do `#[sqlx::test]`.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::{AppState, Settings},
    db::{BusinessRepository, ShiftRepository, UserRepository},
    models::{
        auth::User,
        business::{Business, MemberRole},
        schedule::WorkShift,
    },
    services::{extraction::DisabledExtractor, mailer::LogMailer},
};

pub const TEST_TIME_ZONE: &str = "Europe/Dublin";

pub async fn seed_user(pool: &PgPool, username: &str) -> User {
    UserRepository::new(pool.clone())
        .create_user(
            pool,
            username,
            &format!("{}@example.com", username),
            username,
            "",
            "hash-que-nunca-confere",
        )
        .await
        .unwrap()
}

pub async fn seed_business(pool: &PgPool, name: &str) -> Business {
    BusinessRepository::new(pool.clone())
        .create_business(pool, name, TEST_TIME_ZONE)
        .await
        .unwrap()
}

pub async fn seed_member(
    pool: &PgPool,
    business_id: Uuid,
    user_id: Uuid,
    role: MemberRole,
    must_change_password: bool,
) {
    BusinessRepository::new(pool.clone())
        .add_member(pool, business_id, user_id, role, must_change_password)
        .await
        .unwrap();
}

pub async fn seed_shift(
    pool: &PgPool,
    business_id: Uuid,
    user_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> WorkShift {
    ShiftRepository::new(pool.clone())
        .create_shift(pool, business_id, user_id, start, end, "", user_id)
        .await
        .unwrap()
}

pub fn test_settings() -> Settings {
    Settings {
        database_url: String::new(),
        jwt_secret: "segredo-de-teste".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        default_time_zone: TEST_TIME_ZONE.to_string(),
        extraction_url: None,
        extraction_api_key: None,
        extraction_timeout: Duration::from_secs(1),
        mail_from: "no-reply@checkpoint.local".to_string(),
        db_max_connections: 1,
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    AppState::from_parts(
        pool,
        test_settings(),
        Arc::new(LogMailer::new("no-reply@checkpoint.local")),
        Arc::new(DisabledExtractor),
    )
}
