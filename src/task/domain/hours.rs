//! Checks shared by the floating-point hour fields.

use super::TaskDomainError;
use serde::{Deserialize, Deserializer, de};

/// Accepts any finite value.
pub(super) fn finite(field: &'static str, value: f64) -> Result<f64, TaskDomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TaskDomainError::NonFiniteHours { field })
    }
}

/// Accepts finite values of zero or more.
pub(super) fn non_negative(field: &'static str, value: f64) -> Result<f64, TaskDomainError> {
    let checked = finite(field, value)?;
    if checked < 0.0 {
        return Err(TaskDomainError::NegativeHours {
            field,
            value: checked,
        });
    }
    Ok(checked)
}

/// Reads an hours estimate, applying the same check as the setter.
pub(super) fn deserialize_estimate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    non_negative("hours_estimate", value).map_err(de::Error::custom)
}
