use crate::error::AppError;

const MAX_ID_LEN: usize = 128;
const MAX_TTL_MINUTES: i64 = 7 * 24 * 60;

pub fn validate_id(field: &str, value: &str) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AppError::BadRequest(format!("{} is required", field)))
    } else if trimmed.len() > MAX_ID_LEN {
        Err(AppError::BadRequest(format!("{} is too long", field)))
    } else {
        Ok(())
    }
}

pub fn validate_ttl_minutes(ttl: i64) -> Result<(), AppError> {
    if ttl < 1 || ttl > MAX_TTL_MINUTES {
        Err(AppError::BadRequest(format!(
            "Ticket TTL must be 1-{} minutes",
            MAX_TTL_MINUTES
        )))
    } else {
        Ok(())
    }
}

pub fn validate_score(score: f64) -> Result<(), AppError> {
    if !score.is_finite() {
        Err(AppError::BadRequest("Score must be a number".into()))
    } else {
        Ok(())
    }
}

/// Codes are issued upper-case; accept whatever casing the player typed.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
