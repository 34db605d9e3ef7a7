// src/common/db_utils.rs

/// Nome da constraint violada quando o erro é de unicidade.
/// Os invariantes de vínculo e de ponto aberto moram no banco, não na aplicação.
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }
    Some(db_err.constraint().unwrap_or_default().to_string())
}

pub(crate) const OPEN_CLOCK_INDEX: &str = "time_clocks_one_open_idx";
pub(crate) const CLOCKED_SHIFT_INDEX: &str = "time_clocks_one_per_shift_idx";
pub(crate) const MEMBERSHIP_UNIQUE: &str = "unique_membership";
pub(crate) const USERNAME_UNIQUE: &str = "users_username_key";
pub(crate) const EMAIL_UNIQUE: &str = "users_email_key";
