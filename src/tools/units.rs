//! Unit conversion.
//!
//! Length and weight go through a base unit (metre, gram) using fixed factor
//! tables; temperature goes through Celsius with explicit formulas.

use serde::Serialize;
use strum_macros::{AsRefStr, EnumString};

use crate::error_handling::ApiError;

/// Conversion family selected by the `type` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UnitKind {
    #[strum(to_string = "temp", serialize = "temperature")]
    Temp,
    Length,
    Weight,
}

/// Metres per unit
const LENGTH_FACTORS: &[(&str, f64)] = &[
    ("m", 1.0),
    ("km", 1000.0),
    ("cm", 0.01),
    ("mm", 0.001),
    ("mi", 1609.344),
    ("yd", 0.9144),
    ("ft", 0.3048),
    ("in", 0.0254),
];

/// Grams per unit
const WEIGHT_FACTORS: &[(&str, f64)] = &[
    ("kg", 1000.0),
    ("g", 1.0),
    ("mg", 0.001),
    ("lb", 453.592_37),
    ("oz", 28.349_523_125),
    ("t", 1_000_000.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub value: f64,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub result: f64,
}

fn unsupported_unit(unit: &str) -> ApiError {
    ApiError::bad_request(format!("Unsupported unit: {}", unit))
}

fn factor(table: &[(&str, f64)], unit: &str) -> Result<f64, ApiError> {
    table
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, factor)| *factor)
        .ok_or_else(|| unsupported_unit(unit))
}

fn to_celsius(value: f64, unit: &str) -> Result<f64, ApiError> {
    match unit {
        "c" => Ok(value),
        "f" => Ok((value - 32.0) * 5.0 / 9.0),
        "k" => Ok(value - 273.15),
        _ => Err(unsupported_unit(unit)),
    }
}

fn from_celsius(celsius: f64, unit: &str) -> Result<f64, ApiError> {
    match unit {
        "c" => Ok(celsius),
        "f" => Ok(celsius * 9.0 / 5.0 + 32.0),
        "k" => Ok(celsius + 273.15),
        _ => Err(unsupported_unit(unit)),
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Converts `value` from one unit to another. Unit names are case-insensitive;
/// the result is rounded to 6 decimal places.
///
/// # Examples
///
/// ```
/// use ginkohub_tools::tools::units::{convert, UnitKind};
///
/// assert_eq!(convert(0.0, "C", "F", UnitKind::Temp).unwrap(), 32.0);
/// assert_eq!(convert(1.0, "km", "m", UnitKind::Length).unwrap(), 1000.0);
/// ```
pub fn convert(value: f64, from: &str, to: &str, kind: UnitKind) -> Result<f64, ApiError> {
    if !value.is_finite() {
        return Err(ApiError::bad_request("Value must be a finite number"));
    }
    let from = from.trim().to_ascii_lowercase();
    let to = to.trim().to_ascii_lowercase();

    let result = match kind {
        UnitKind::Temp => from_celsius(to_celsius(value, &from)?, &to)?,
        UnitKind::Length => value * factor(LENGTH_FACTORS, &from)? / factor(LENGTH_FACTORS, &to)?,
        UnitKind::Weight => value * factor(WEIGHT_FACTORS, &from)? / factor(WEIGHT_FACTORS, &to)?,
    };
    Ok(round6(result))
}

/// Parses the raw query values and converts, echoing the inputs back.
pub fn convert_request(
    value: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    kind: Option<&str>,
) -> Result<Conversion, ApiError> {
    let (Some(raw_value), Some(from), Some(to), Some(raw_kind)) = (value, from, to, kind) else {
        return Err(ApiError::bad_request("Missing value, from, to or type"));
    };
    let value: f64 = raw_value
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("Value must be a number"))?;
    let kind: UnitKind = raw_kind
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Unsupported conversion type: {}", raw_kind)))?;

    Ok(Conversion {
        value,
        from: from.to_string(),
        to: to.to_string(),
        kind: kind.as_ref().to_string(),
        result: convert(value, from, to, kind)?,
    })
}
