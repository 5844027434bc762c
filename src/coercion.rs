//! Conversion of operator text into typed values.
//!
//! Nothing here fails: text that cannot be read as the requested type
//! coerces to that type's default, so bad input never blocks the operator.
//! The functions are pure, the same `(type, text)` always gives the same
//! value.

use crate::datatypes::{ColumnType, Value};

/// The canonical value a column of `column_type` takes when left blank.
pub fn default_value(column_type: ColumnType) -> Value {
    match column_type {
        ColumnType::Integer => Value::Integer(0),
        ColumnType::Real => Value::Real(0.0),
        ColumnType::Char => Value::Char(String::new()),
        ColumnType::String => Value::String(String::new()),
        ColumnType::Money => Value::Money(0.0),
        ColumnType::MoneyRange => Value::MoneyRange(0.0, 0.0),
    }
}

/// Parses `text` as a value of `column_type`.
///
/// - empty text gives [`default_value`]
/// - `Integer` reads the leading optionally-signed digits (`"42abc"` is 42);
///   no digits or an out of range number give 0
/// - `Real` and `Money` read the whole trimmed text as a finite decimal,
///   else 0.0; `"NaN"`, `"inf"` and overflows such as `"1e400"` give 0.0
/// - `Char` keeps the first character
/// - `String` is kept verbatim, surrounding whitespace included
/// - `MoneyRange` reads `"min,max"`; a missing or unreadable side is 0.0.
///   The two fields are the first two comma-separated ones: `"1,2,3"` is
///   `(1, 2)`, not `(1, 0)` with `"2,3"` as an unreadable max. Extra fields
///   are dropped on purpose. `min <= max` is not enforced.
pub fn parse(column_type: ColumnType, text: &str) -> Value {
    if text.is_empty() {
        return default_value(column_type);
    }

    match column_type {
        ColumnType::Integer => Value::Integer(parse_leading_integer(text).unwrap_or(0)),
        ColumnType::Real => Value::Real(parse_decimal(text)),
        ColumnType::Char => Value::Char(text.chars().take(1).collect()),
        ColumnType::String => Value::String(text.to_string()),
        ColumnType::Money => Value::Money(parse_decimal(text)),
        ColumnType::MoneyRange => {
            let mut fields = text.split(',').map(parse_decimal);
            let min = fields.next().unwrap_or(0.0);
            let max = fields.next().unwrap_or(0.0);
            Value::MoneyRange(min, max)
        }
    }
}

/// Parses one cell per column, pairing `texts` with `types` positionally.
/// Only as many values as the shorter side are produced; arity is checked
/// by the orchestrator, not here.
pub fn parse_row(types: impl IntoIterator<Item = ColumnType>, texts: &[&str]) -> Vec<Value> {
    types
        .into_iter()
        .zip(texts)
        .map(|(column_type, text)| parse(column_type, text))
        .collect()
}

fn parse_decimal(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    if digits_len == 0 {
        return None;
    }

    trimmed[..sign_len + digits_len].parse().ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_text_gives_default() {
        for column_type in ColumnType::ALL {
            assert_eq!(parse(column_type, ""), default_value(column_type));
        }
    }

    #[test]
    fn test_default_renderings() {
        assert_eq!(default_value(ColumnType::Integer).format(), "0");
        assert_eq!(default_value(ColumnType::Real).format(), "0");
        assert_eq!(default_value(ColumnType::Char).format(), "");
        assert_eq!(default_value(ColumnType::String).format(), "");
        assert_eq!(default_value(ColumnType::Money).format(), "0.00");
        assert_eq!(default_value(ColumnType::MoneyRange).format(), "0.00,0.00");
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse(ColumnType::Integer, "42"), Value::Integer(42));
        assert_eq!(parse(ColumnType::Integer, "abc"), Value::Integer(0));
        assert_eq!(parse(ColumnType::Integer, " -17 "), Value::Integer(-17));
        assert_eq!(parse(ColumnType::Integer, "+8"), Value::Integer(8));
        assert_eq!(parse(ColumnType::Integer, "12.9"), Value::Integer(12));
        assert_eq!(parse(ColumnType::Integer, "30kg"), Value::Integer(30));
        assert_eq!(parse(ColumnType::Integer, "-"), Value::Integer(0));
        assert_eq!(
            parse(ColumnType::Integer, "99999999999999999999"),
            Value::Integer(0)
        );
    }

    #[test]
    fn test_parse_decimals() {
        assert_eq!(parse(ColumnType::Real, "3.25"), Value::Real(3.25));
        assert_eq!(parse(ColumnType::Real, " 1e3 "), Value::Real(1000.0));
        assert_eq!(parse(ColumnType::Real, "x1"), Value::Real(0.0));
        assert_eq!(parse(ColumnType::Money, "19.99"), Value::Money(19.99));
        assert_eq!(parse(ColumnType::Money, "$5"), Value::Money(0.0));
    }

    #[test]
    fn test_non_finite_text_gives_zero() {
        for text in ["NaN", "nan", "inf", "-infinity", "1e400", "-1e400"] {
            assert_eq!(parse(ColumnType::Real, text), Value::Real(0.0), "{text}");
            assert_eq!(parse(ColumnType::Money, text), Value::Money(0.0), "{text}");
        }
        assert_eq!(
            parse(ColumnType::MoneyRange, "nan,inf"),
            Value::MoneyRange(0.0, 0.0)
        );
        assert_eq!(
            parse(ColumnType::MoneyRange, "5,1e400"),
            Value::MoneyRange(5.0, 0.0)
        );

        // stays decodable on the wire
        let json = serde_json::to_string(&parse(ColumnType::Real, "inf")).unwrap();
        assert_eq!(json, r#"{"Real":0.0}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Real(0.0));
    }

    #[test]
    fn test_parse_char_and_string() {
        assert_eq!(parse(ColumnType::Char, "xyz"), Value::Char("x".to_string()));
        assert_eq!(parse(ColumnType::Char, "é!"), Value::Char("é".to_string()));
        assert_eq!(
            parse(ColumnType::String, "  keep me "),
            Value::String("  keep me ".to_string())
        );
    }

    #[test]
    fn test_parse_money_range() {
        assert_eq!(
            parse(ColumnType::MoneyRange, "10.5, 20"),
            Value::MoneyRange(10.5, 20.0)
        );
        assert_eq!(
            parse(ColumnType::MoneyRange, "10.5"),
            Value::MoneyRange(10.5, 0.0)
        );
        assert_eq!(
            parse(ColumnType::MoneyRange, ",7"),
            Value::MoneyRange(0.0, 7.0)
        );
        assert_eq!(
            parse(ColumnType::MoneyRange, "abc,2,3"),
            Value::MoneyRange(0.0, 2.0)
        );
        // no ordering between the ends
        assert_eq!(
            parse(ColumnType::MoneyRange, "9,1"),
            Value::MoneyRange(9.0, 1.0)
        );
    }

    #[test]
    fn test_parse_row() {
        let values = parse_row(
            [ColumnType::String, ColumnType::Integer],
            &["", "abc"],
        );
        assert_eq!(
            values,
            vec![Value::String(String::new()), Value::Integer(0)]
        );
    }
}
