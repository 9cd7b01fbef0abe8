use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::field::FieldKind;
use crate::outcome::FieldValue;

/// Whether a raw value counts as empty for the pre-coercion check.
///
/// Empty values never reach kind coercion: required fields fail on them,
/// defaulted fields pass them through, everything else drops them.
pub(crate) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Coerce a non-empty raw value to its declared kind.
///
/// `Err(())` means the field failed validation; the caller records the
/// field name, this layer has nothing more to say about it.
pub(crate) fn coerce(kind: FieldKind, value: &Value) -> Result<FieldValue, ()> {
    match kind {
        FieldKind::String => match value {
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            _ => Err(()),
        },
        FieldKind::Number => coerce_number(value),
        FieldKind::Date => coerce_date(value),
        FieldKind::Array => match value {
            Value::Array(items) => Ok(FieldValue::List(items.clone())),
            _ => Err(()),
        },
        FieldKind::Object => match value {
            // Arrays are a distinct variant and do not satisfy Object.
            Value::Object(map) => Ok(FieldValue::Map(map.clone())),
            _ => Err(()),
        },
    }
}

fn coerce_number(value: &Value) -> Result<FieldValue, ()> {
    match value {
        Value::Number(n) => n.as_f64().map(FieldValue::Number).ok_or(()),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => Ok(FieldValue::Number(parsed)),
            _ => Err(()),
        },
        _ => Err(()),
    }
}

fn coerce_date(value: &Value) -> Result<FieldValue, ()> {
    match value {
        Value::String(s) => OffsetDateTime::parse(s, &Rfc3339)
            .map(FieldValue::Timestamp)
            .map_err(|_| ()),
        // Numeric dates are epoch milliseconds.
        Value::Number(n) => {
            let millis = n.as_i64().ok_or(())?;
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
                .map(FieldValue::Timestamp)
                .map_err(|_| ())
        }
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;

    #[test]
    fn empty_detection() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&json!("")));
        assert!(is_empty(&json!(false)));
        assert!(is_empty(&json!(0)));
        assert!(!is_empty(&json!("0")));
        assert!(!is_empty(&json!(" ")));
        assert!(!is_empty(&json!(true)));
        assert!(!is_empty(&json!(1)));
        assert!(!is_empty(&json!([])));
        assert!(!is_empty(&json!({})));
    }

    #[test]
    fn string_requires_string_typed_value() {
        assert_eq!(
            coerce(FieldKind::String, &json!("hi")),
            Ok(FieldValue::Text("hi".into()))
        );
        assert_eq!(coerce(FieldKind::String, &json!(7)), Err(()));
        assert_eq!(coerce(FieldKind::String, &json!(["a"])), Err(()));
    }

    #[test]
    fn number_coerces_numeric_strings() {
        assert_eq!(
            coerce(FieldKind::Number, &json!("10")),
            Ok(FieldValue::Number(10.0))
        );
        assert_eq!(
            coerce(FieldKind::Number, &json!(" -5.5 ")),
            Ok(FieldValue::Number(-5.5))
        );
        assert_eq!(
            coerce(FieldKind::Number, &json!(42)),
            Ok(FieldValue::Number(42.0))
        );
        assert_eq!(coerce(FieldKind::Number, &json!("abc")), Err(()));
        assert_eq!(coerce(FieldKind::Number, &json!("NaN")), Err(()));
        assert_eq!(coerce(FieldKind::Number, &json!("inf")), Err(()));
        assert_eq!(coerce(FieldKind::Number, &json!([1])), Err(()));
    }

    #[test]
    fn date_accepts_rfc3339_and_epoch_millis() {
        assert_eq!(
            coerce(FieldKind::Date, &json!("2024-03-01T12:00:00Z")),
            Ok(FieldValue::Timestamp(datetime!(2024-03-01 12:00:00 UTC)))
        );
        assert_eq!(
            coerce(FieldKind::Date, &json!(1_000)),
            Ok(FieldValue::Timestamp(datetime!(1970-01-01 00:00:01 UTC)))
        );
        assert_eq!(coerce(FieldKind::Date, &json!("yesterday")), Err(()));
        assert_eq!(coerce(FieldKind::Date, &json!("2024-03-01")), Err(()));
    }

    #[test]
    fn array_passes_through_arrays_only() {
        assert_eq!(
            coerce(FieldKind::Array, &json!([1, "two"])),
            Ok(FieldValue::List(vec![json!(1), json!("two")]))
        );
        assert_eq!(coerce(FieldKind::Array, &json!("not-an-array")), Err(()));
        assert_eq!(coerce(FieldKind::Array, &json!({})), Err(()));
    }

    #[test]
    fn object_rejects_arrays() {
        let map = match coerce(FieldKind::Object, &json!({"a": 1})) {
            Ok(FieldValue::Map(map)) => map,
            other => panic!("expected map, got {other:?}"),
        };
        assert_eq!(map.get("a"), Some(&json!(1)));

        assert_eq!(coerce(FieldKind::Object, &json!([])), Err(()));
        assert_eq!(coerce(FieldKind::Object, &json!("{}")), Err(()));
    }
}
