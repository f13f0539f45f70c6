//! Format detection for string and mapping values

use chrono::DateTime;
use uuid::Uuid;

use crate::models::{PropertyMap, PropertyValue, Reference};

/// Key holding the beacon of a reference-like mapping
pub const BEACON_KEY: &str = "beacon";

/// Detected string format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// RFC3339 timestamp
    Date,
    /// UUID in any of its textual forms
    Uuid,
    /// No specific format detected
    Plain,
}

/// Detected mapping format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFormat {
    /// `{latitude, longitude}`
    GeoCoordinates,
    /// `{input}` or `{input, defaultCountry}`
    PhoneNumber,
    /// Plain nested object
    Plain,
}

/// Detect the format of a string value
///
/// Timestamps win over UUIDs.
pub fn detect_string_format(value: &str) -> StringFormat {
    if is_rfc3339(value) {
        return StringFormat::Date;
    }
    if Uuid::parse_str(value).is_ok() {
        return StringFormat::Uuid;
    }
    StringFormat::Plain
}

/// Detect the format of a mapping value
///
/// Geo coordinates win over phone numbers.
pub fn detect_object_format(value: &PropertyMap) -> ObjectFormat {
    if is_geo_coordinates(value) {
        return ObjectFormat::GeoCoordinates;
    }
    if is_phone_number(value) {
        return ObjectFormat::PhoneNumber;
    }
    ObjectFormat::Plain
}

/// Exactly the keys `latitude` and `longitude`, both non-null
pub fn is_geo_coordinates(value: &PropertyMap) -> bool {
    value.len() == 2 && is_present(value, "latitude") && is_present(value, "longitude")
}

/// Key `input` non-null, optionally accompanied by `defaultCountry`
pub fn is_phone_number(value: &PropertyMap) -> bool {
    if !is_present(value, "input") {
        return false;
    }
    match value.len() {
        1 => true,
        2 => value.contains_key("defaultCountry"),
        _ => false,
    }
}

/// Parse the beacon of a reference-like mapping
///
/// Returns `None` when there is no `beacon` string or it does not parse.
pub fn beacon_reference(value: &PropertyMap) -> Option<Reference> {
    value
        .get(BEACON_KEY)
        .and_then(PropertyValue::as_str)
        .and_then(|beacon| Reference::parse(beacon).ok())
}

/// Strict RFC3339 layout: uppercase `T` separator and uppercase `Z`
fn is_rfc3339(value: &str) -> bool {
    value.as_bytes().get(10) == Some(&b'T')
        && !value.contains(['t', 'z'])
        && DateTime::parse_from_rfc3339(value).is_ok()
}

fn is_present(value: &PropertyMap, key: &str) -> bool {
    value.get(key).is_some_and(|v| !v.is_null())
}
