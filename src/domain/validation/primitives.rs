//! Atomic field checks shared by every record validator.

use serde_json::Value as JsonValue;

use crate::domain::foundation::{
    is_record_id, Field, ValidationError, INVALID_FIELDS_MESSAGE, NEGATIVE_VALUE,
    REQUIRED_FIELDS_MESSAGE,
};

/// Closed set of string values with a fixed declaration order.
///
/// The order of `ALL` is the order used when listing allowed values in error
/// descriptions, so it must match the order the values were declared in.
pub trait DeclaredEnum: Sized + Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Exact, case-sensitive lookup.
    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == value)
    }

    fn parse_ignore_case(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(value))
    }

    /// Allowed values joined by `", "` in declaration order.
    fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Collects missing field names so that one error can name all of them.
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` as missing when the field is absent.
    pub fn check<T>(&mut self, field: &Field<T>, name: &'static str) -> &mut Self {
        self.require(field.is_present(), name)
    }

    /// Records `name` as missing unless `present`; each name is listed once.
    pub fn require(&mut self, present: bool, name: &'static str) -> &mut Self {
        if !present && !self.missing.contains(&name) {
            self.missing.push(name);
        }
        self
    }

    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    /// `"<Resource> validation failed: a, b is required!"` if anything is missing.
    pub fn finish(self, resource: &str) -> Result<(), ValidationError> {
        self.finish_with(
            REQUIRED_FIELDS_MESSAGE,
            &format!("{} validation failed", resource),
        )
    }

    /// Same as [`finish`](Self::finish) with caller-provided wording.
    pub fn finish_with(self, message: &str, context: &str) -> Result<(), ValidationError> {
        self.finish_described(message, |missing| format!("{}: {} is required!", context, missing))
    }

    /// Builds the description from the comma-joined missing names.
    pub fn finish_described(
        self,
        message: &str,
        describe: impl FnOnce(&str) -> String,
    ) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            return Ok(());
        }
        Err(ValidationError::required(
            message,
            describe(&self.missing.join(", ")),
        ))
    }
}

/// Fails when `value` is not a 24-character hexadecimal identifier.
///
/// `param` is the name clients know the identifier by, e.g. `child_id`.
pub fn validate_identifier_format(value: &str, param: &str) -> Result<(), ValidationError> {
    if is_record_id(value) {
        Ok(())
    } else {
        Err(identifier_error(param))
    }
}

/// Identifier check over a [`Field`]; absent fields pass.
pub fn validate_identifier_field(
    field: &Field<String>,
    param: &str,
) -> Result<(), ValidationError> {
    match field {
        Field::Absent => Ok(()),
        Field::Present(value) => validate_identifier_format(value, param),
        Field::Malformed(_) => Err(identifier_error(param)),
    }
}

fn identifier_error(param: &str) -> ValidationError {
    ValidationError::invalid_format(
        format!("Parameter {{{}}} is not in valid format!", param),
        "A 24-byte hex ID similar to this: 507f191e810c19729de860ea is expected.",
    )
}

/// Fails when a present field could not be decoded as its declared type.
pub fn validate_well_formed<T>(field: &Field<T>, name: &str) -> Result<(), ValidationError> {
    match field.malformed() {
        None => Ok(()),
        Some(raw) => Err(ValidationError::invalid_format(
            INVALID_FIELDS_MESSAGE,
            format!("The value '{}' of {} field is invalid.", display_raw(raw), name),
        )),
    }
}

fn display_raw(raw: &JsonValue) -> String {
    match raw {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Fails with `"<context> validation failed: The value provided has a negative value!"`.
///
/// Zero is accepted.
pub fn validate_non_negative<N>(
    value: N,
    message: &str,
    context: &str,
) -> Result<(), ValidationError>
where
    N: PartialOrd + Default,
{
    if value < N::default() {
        return Err(negative_value_error(message, context));
    }
    Ok(())
}

fn negative_value_error(message: &str, context: &str) -> ValidationError {
    ValidationError::invalid_fields(
        message,
        format!("{} validation failed: {}", context, NEGATIVE_VALUE),
    )
}

/// Exact membership check.
///
/// Error: `The <subject> provided "<value>" is not supported...` /
/// `<allowed_label>: a, b, c.`
pub fn validate_enum_membership<E: DeclaredEnum>(
    value: &str,
    subject: &str,
    allowed_label: &str,
) -> Result<E, ValidationError> {
    E::parse(value).ok_or_else(|| enum_error::<E>(value, subject, allowed_label))
}

/// Case-insensitive membership check; the echoed value is lowercased.
pub fn validate_enum_membership_ignore_case<E: DeclaredEnum>(
    value: &str,
    subject: &str,
    allowed_label: &str,
) -> Result<E, ValidationError> {
    E::parse_ignore_case(value)
        .ok_or_else(|| enum_error::<E>(&value.to_lowercase(), subject, allowed_label))
}

fn enum_error<E: DeclaredEnum>(value: &str, subject: &str, allowed_label: &str) -> ValidationError {
    ValidationError::invalid_fields(
        format!("The {} provided \"{}\" is not supported...", subject, value),
        format!("{}: {}.", allowed_label, E::allowed()),
    )
}
