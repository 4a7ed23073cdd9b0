//! Cross-field checks for records spanning a time interval.

use chrono::{DateTime, Utc};

use crate::domain::foundation::{Field, ValidationError};

use super::validate_non_negative;

/// Checks `start_time`/`end_time`/`duration` consistency.
///
/// With both times present: `end_time` must not precede `start_time`, and a
/// present `duration` must equal the span in milliseconds exactly. With a
/// lone `duration` it only has to be non-negative. Malformed values are left
/// to the format checks.
pub fn validate_time_range(
    start_time: &Field<DateTime<Utc>>,
    end_time: &Field<DateTime<Utc>>,
    duration: &Field<i64>,
    resource: &str,
) -> Result<(), ValidationError> {
    match (start_time.value(), end_time.value()) {
        (Some(start), Some(end)) => {
            if end < start {
                return Err(ValidationError::invalid_fields(
                    "Date field is invalid...",
                    "Date validation failed: The end_time parameter can not contain an older date \
                     than that the start_time parameter!",
                ));
            }
            let span = (*end - *start).num_milliseconds();
            if let Some(duration) = duration.value() {
                if *duration != span {
                    return Err(ValidationError::invalid_fields(
                        "Duration field is invalid...",
                        "Duration validation failed: Activity duration value does not match values \
                         passed in start_time and end_time parameters!",
                    ));
                }
            }
            Ok(())
        }
        _ => match duration.value() {
            Some(duration) => {
                validate_non_negative(*duration, "Duration field is invalid...", resource)
            }
            None => Ok(()),
        },
    }
}
