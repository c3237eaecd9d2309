//! Request validation from field definitions. Produces the values to bind.

use crate::config::{EntityDef, FieldDef, FieldDefault, FieldKind, ValidationRule};
use crate::error::AppError;
use crate::sql::SqlValue;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// Storage format of datetime columns (the Chinook data uses it).
pub const STORED_DATETIME: &str = "%Y-%m-%d %H:%M:%S";
/// Format datetimes are rendered with in responses.
pub const RENDERED_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

const ACCEPTED_DATETIMES: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Validated field values in declaration order.
pub type FieldValues = Vec<(&'static FieldDef, SqlValue)>;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a full body (POST/PUT). Absent fields take their default; required fields must be present.
    /// Keys that are not fields of the entity are ignored.
    pub fn validate(entity: &'static EntityDef, body: &Map<String, Value>) -> Result<FieldValues, AppError> {
        let mut out = Vec::with_capacity(entity.fields.len());
        for f in entity.fields {
            let value = match body.get(f.name) {
                Some(Value::Null) if f.nullable => SqlValue::Null,
                Some(Value::Null) => {
                    return Err(AppError::Validation(format!("{} may not be null", f.name)));
                }
                Some(v) => validate_field(f, v)?,
                None => match f.default {
                    FieldDefault::Required => {
                        return Err(AppError::Validation(format!("{} is required", f.name)));
                    }
                    FieldDefault::Null => SqlValue::Null,
                    FieldDefault::EmptyText => SqlValue::Text(String::new()),
                },
            };
            out.push((f, value));
        }
        Ok(out)
    }

    /// Validate only the fields present in body (PATCH). Explicit nulls are skipped.
    pub fn validate_partial(
        entity: &'static EntityDef,
        body: &Map<String, Value>,
    ) -> Result<FieldValues, AppError> {
        let mut out = Vec::new();
        for f in entity.fields {
            match body.get(f.name) {
                None | Some(Value::Null) => {}
                Some(v) => out.push((f, validate_field(f, v)?)),
            }
        }
        Ok(out)
    }
}

fn validate_field(f: &FieldDef, v: &Value) -> Result<SqlValue, AppError> {
    let name = f.name;
    match f.kind {
        FieldKind::Text => {
            let s = v
                .as_str()
                .ok_or_else(|| AppError::Validation(format!("{} must be a string", name)))?;
            check_length(name, s, &f.rule)?;
            Ok(SqlValue::Text(s.to_string()))
        }
        FieldKind::Integer => {
            let n = v
                .as_i64()
                .ok_or_else(|| AppError::Validation(format!("{} must be an integer", name)))?;
            check_range(name, n as f64, &f.rule)?;
            Ok(SqlValue::Integer(n))
        }
        FieldKind::Decimal => {
            let n = match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .filter(|n| n.is_finite())
            .ok_or_else(|| AppError::Validation(format!("{} must be a decimal number", name)))?;
            check_range(name, n, &f.rule)?;
            Ok(SqlValue::Real(check_decimal(name, n, &f.rule)?))
        }
        FieldKind::DateTime => {
            let s = v
                .as_str()
                .ok_or_else(|| AppError::Validation(format!("{} must be a datetime string", name)))?;
            let dt = parse_datetime(s)
                .ok_or_else(|| AppError::Validation(format!("{} must be a valid datetime", name)))?;
            Ok(SqlValue::Text(dt.format(STORED_DATETIME).to_string()))
        }
    }
}

fn check_length(name: &str, s: &str, rule: &ValidationRule) -> Result<(), AppError> {
    let len = s.chars().count();
    if let Some(max) = rule.max_length {
        if len > max {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                name, max
            )));
        }
    }
    if let Some(min) = rule.min_length {
        if len < min {
            return Err(AppError::Validation(format!(
                "{} must be at least {} characters",
                name, min
            )));
        }
    }
    Ok(())
}

fn check_range(name: &str, n: f64, rule: &ValidationRule) -> Result<(), AppError> {
    if let Some(min) = rule.minimum {
        if n < min {
            return Err(AppError::Validation(format!("{} must be at least {}", name, min)));
        }
    }
    if let Some(max) = rule.maximum {
        if n > max {
            return Err(AppError::Validation(format!("{} must be at most {}", name, max)));
        }
    }
    Ok(())
}

/// Enforces scale and precision; returns the value rounded to its scale.
fn check_decimal(name: &str, n: f64, rule: &ValidationRule) -> Result<f64, AppError> {
    let Some(places) = rule.decimal_places else {
        return Ok(n);
    };
    let factor = 10f64.powi(places as i32);
    let scaled = n * factor;
    if (scaled - scaled.round()).abs() > 1e-6 {
        return Err(AppError::Validation(format!(
            "{} must have at most {} decimal places",
            name, places
        )));
    }
    if let Some(digits) = rule.max_digits {
        let whole_digits = digits.saturating_sub(places) as i32;
        if n.abs() >= 10f64.powi(whole_digits) {
            return Err(AppError::Validation(format!(
                "{} must have at most {} digits",
                name, digits
            )));
        }
    }
    Ok(scaled.round() / factor)
}

/// Accepts `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or a bare date (midnight).
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ACCEPTED_DATETIMES
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedModel;
    use serde_json::json;

    fn entity(path: &str) -> &'static EntityDef {
        ResolvedModel::chinook().unwrap().entity_by_path(path).unwrap()
    }

    fn body(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    fn value_of(values: &FieldValues, name: &str) -> SqlValue {
        values.iter().find(|(f, _)| f.name == name).map(|(_, v)| v.clone()).unwrap()
    }

    #[test]
    fn absent_fields_take_defaults() {
        let values = RequestValidator::validate(entity("artists"), &body(json!({}))).unwrap();
        assert_eq!(value_of(&values, "name"), SqlValue::Text(String::new()));

        let values = RequestValidator::validate(
            entity("tracks"),
            &body(json!({"media_type_id": 1, "milliseconds": 1000, "unit_price": 0.99})),
        )
        .unwrap();
        assert_eq!(value_of(&values, "album_id"), SqlValue::Null);
        assert_eq!(value_of(&values, "composer"), SqlValue::Text(String::new()));
        assert_eq!(value_of(&values, "unit_price"), SqlValue::Real(0.99));
    }

    #[test]
    fn required_field_missing_is_rejected() {
        let err = RequestValidator::validate(entity("albums"), &body(json!({"title": "x"}))).unwrap_err();
        assert_eq!(err.to_string(), "artist_id is required");
    }

    #[test]
    fn null_only_accepted_on_optional_fields() {
        let ok = RequestValidator::validate(entity("playlists"), &body(json!({"name": null}))).unwrap();
        assert_eq!(value_of(&ok, "name"), SqlValue::Null);

        let err = RequestValidator::validate(entity("artists"), &body(json!({"name": null}))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn text_length_counts_characters() {
        let e = entity("customers");
        let postal = "é".repeat(10);
        let ok = RequestValidator::validate_partial(e, &body(json!({ "postal_code": postal }))).unwrap();
        assert_eq!(ok.len(), 1);
        let err = RequestValidator::validate_partial(e, &body(json!({"postal_code": "12345678901"}))).unwrap_err();
        assert_eq!(err.to_string(), "postal_code must be at most 10 characters");
    }

    #[test]
    fn decimal_rules() {
        let e = entity("tracks");
        let check = |v: Value| RequestValidator::validate_partial(e, &body(json!({ "unit_price": v })));
        assert_eq!(value_of(&check(json!("1.5")).unwrap(), "unit_price"), SqlValue::Real(1.5));
        assert!(check(json!(0.999)).is_err());
        assert!(check(json!(10.01)).is_err());
        assert!(check(json!(-1)).is_err());
        assert!(check(json!("cheap")).is_err());
    }

    #[test]
    fn integer_rejects_fractions_and_negatives_where_bounded() {
        let e = entity("tracks");
        assert!(RequestValidator::validate_partial(e, &body(json!({"milliseconds": 1.5}))).is_err());
        assert!(RequestValidator::validate_partial(e, &body(json!({"milliseconds": -1}))).is_err());
        assert!(RequestValidator::validate_partial(e, &body(json!({"bytes": -1}))).is_ok());
    }

    #[test]
    fn datetimes_are_normalized() {
        let e = entity("employees");
        for input in ["2003-10-17T00:00:00", "2003-10-17 00:00:00", "2003-10-17"] {
            let values = RequestValidator::validate_partial(e, &body(json!({ "hire_date": input }))).unwrap();
            assert_eq!(value_of(&values, "hire_date"), SqlValue::Text("2003-10-17 00:00:00".into()));
        }
        assert!(RequestValidator::validate_partial(e, &body(json!({"hire_date": "last week"}))).is_err());
    }

    #[test]
    fn partial_skips_nulls_and_unknown_keys() {
        let values = RequestValidator::validate_partial(
            entity("employees"),
            &body(json!({"title": null, "nickname": "boss", "city": "Calgary"})),
        )
        .unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].0.name, "city");
    }
}
