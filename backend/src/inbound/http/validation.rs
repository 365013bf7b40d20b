//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose details carry the
//! offending `field`, the rejected `value` where useful, and a stable `code`.

use std::str::FromStr;

use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::{DiscoveryMethod, Error, GeoPoint, GeoValidationError, UserValidationError, Username};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    OutOfRange,
    InvalidDiscoveryMethod,
    InvalidUsername,
    MalformedRequest,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidDiscoveryMethod => "invalid_discovery_method",
            ErrorCode::InvalidUsername => "invalid_username",
            ErrorCode::MalformedRequest => "malformed_request",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(
    field: FieldName,
    message: String,
    code: ErrorCode,
    value: serde_json::Value,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        format!("missing required field: {}", field.as_str()),
        ErrorCode::MissingField,
    )
}

/// Parse an identifier newtype from its string form.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value.parse().map_err(|_| {
        field_value_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            json!(value),
        )
    })
}

/// Parse an optional identifier, treating an empty string as absent.
pub(crate) fn parse_optional_id<T: FromStr>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error> {
    value
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_id(raw, field))
        .transpose()
}

/// Validate a coordinate pair supplied as two separate fields.
pub(crate) fn parse_point(latitude: f64, longitude: f64) -> Result<GeoPoint, Error> {
    GeoPoint::new(latitude, longitude).map_err(|err| {
        let (field, value) = match err {
            GeoValidationError::LatitudeOutOfRange { value } => {
                (FieldName::new("latitude"), value)
            }
            GeoValidationError::LongitudeOutOfRange { value } => {
                (FieldName::new("longitude"), value)
            }
        };
        field_value_error(field, err.to_string(), ErrorCode::OutOfRange, json!(value))
    })
}

/// Validate an optional coordinate pair; both halves must be present or absent.
pub(crate) fn parse_optional_point(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<GeoPoint>, Error> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => parse_point(latitude, longitude).map(Some),
        (None, None) => Ok(None),
        (Some(_), None) => Err(missing_field_error(FieldName::new("longitude"))),
        (None, Some(_)) => Err(missing_field_error(FieldName::new("latitude"))),
    }
}

pub(crate) fn parse_discovery_method(
    value: Option<&str>,
    default: DiscoveryMethod,
) -> Result<DiscoveryMethod, Error> {
    let Some(raw) = value else {
        return Ok(default);
    };
    raw.parse().map_err(|_| {
        field_value_error(
            FieldName::new("method"),
            "method must be one of gps, ar_scan, manual".to_owned(),
            ErrorCode::InvalidDiscoveryMethod,
            json!(raw),
        )
    })
}

pub(crate) fn parse_username(value: String) -> Result<Username, Error> {
    Username::new(value.clone()).map_err(|err: UserValidationError| {
        field_value_error(
            FieldName::new("username"),
            err.to_string(),
            ErrorCode::InvalidUsername,
            json!(value),
        )
    })
}

fn malformed(message: String) -> actix_web::Error {
    Error::invalid_request(message)
        .with_details(json!({ "code": ErrorCode::MalformedRequest.as_str() }))
        .into()
}

/// JSON body extractor settings that report failures in the error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| malformed(format!("invalid JSON body: {err}")))
}

/// Query string extractor settings that report failures in the error envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| malformed(format!("invalid query string: {err}")))
}
