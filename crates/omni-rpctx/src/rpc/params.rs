//! Positional JSON-RPC parameter parsing.
//!
//! Turns raw `serde_json::Value`s into typed fields. Failures here are
//! `ParameterError`s and never reach the command pipeline.

use crate::domain::{DexAction, MetaDexAction, ParameterError, PropertyDescriptor};
use crate::ports::outbound::PropertyRegistry;
use omni_types::{
    parse_amount as parse_decimal, parse_amount_unchecked as parse_decimal_unchecked, Address,
    Ecosystem, PropertyId, PropertyType, MAX_TEXT_LENGTH,
};
use serde_json::Value;

pub type ParamResult<T> = Result<T, ParameterError>;

fn as_str<'a>(value: &'a Value, field: &'static str) -> ParamResult<&'a str> {
    value.as_str().ok_or(ParameterError::WrongType {
        field,
        expected: "string",
    })
}

fn as_integer(value: &Value, field: &'static str) -> ParamResult<i64> {
    value.as_i64().ok_or(ParameterError::WrongType {
        field,
        expected: "integer",
    })
}

fn integer_in_range(value: &Value, field: &'static str, min: i64, max: i64) -> ParamResult<i64> {
    let n = as_integer(value, field)?;
    if n < min || n > max {
        return Err(ParameterError::OutOfRange {
            field,
            detail: format!("expected {}..={}, got {}", min, max, n),
        });
    }
    Ok(n)
}

pub fn parse_address(value: &Value) -> ParamResult<Address> {
    let s = value.as_str().ok_or(ParameterError::InvalidAddress)?.trim();
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return Err(ParameterError::InvalidAddress);
    }
    Ok(Address::new(s))
}

/// Optional address: absent or empty string means none.
pub fn parse_optional_address(value: Option<&Value>) -> ParamResult<Option<Address>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(v) => parse_address(v).map(Some),
    }
}

/// Property id in `1..=u32::MAX`.
pub fn parse_property_id(value: &Value) -> ParamResult<PropertyId> {
    let id = as_integer(value, "property id")?;
    if id < 1 || id > i64::from(u32::MAX) {
        return Err(ParameterError::PropertyIdOutOfRange);
    }
    Ok(PropertyId(id as u32))
}

/// Property id in `0..=u32::MAX`; existence is left to the rule set.
pub fn parse_property_id_unchecked(value: &Value) -> ParamResult<PropertyId> {
    let id = as_integer(value, "property id")?;
    u32::try_from(id)
        .map(PropertyId)
        .map_err(|_| ParameterError::PropertyIdOutOfRange)
}

/// Property id of a registered property, with its descriptor.
pub fn parse_existing_property(
    value: &Value,
    registry: &dyn PropertyRegistry,
) -> ParamResult<PropertyDescriptor> {
    let id = parse_property_id(value)?;
    registry
        .property(id)
        .ok_or(ParameterError::PropertyDoesNotExist)
}

pub fn parse_previous_property_id(value: &Value) -> ParamResult<PropertyId> {
    let id = as_integer(value, "previous property id")?;
    if id != 0 {
        return Err(ParameterError::PreviousIdNotSupported);
    }
    Ok(PropertyId(0))
}

/// Positive decimal amount in minor units.
pub fn parse_amount(value: &Value, divisible: bool, field: &'static str) -> ParamResult<i64> {
    let amount = parse_decimal(as_str(value, field)?, divisible)
        .map_err(|source| ParameterError::Amount { field, source })?;
    if amount <= 0 {
        return Err(ParameterError::NonPositiveAmount { field });
    }
    Ok(amount)
}

/// Decimal amount without positivity or protocol-range checks.
pub fn parse_amount_unchecked(
    value: &Value,
    divisible: bool,
    field: &'static str,
) -> ParamResult<u64> {
    parse_decimal_unchecked(as_str(value, field)?, divisible)
        .map_err(|source| ParameterError::Amount { field, source })
}

pub fn parse_text(value: &Value, field: &'static str) -> ParamResult<String> {
    let s = as_str(value, field)?;
    if s.chars().count() > MAX_TEXT_LENGTH {
        return Err(ParameterError::TextTooLong {
            field,
            max: MAX_TEXT_LENGTH,
        });
    }
    Ok(s.to_string())
}

pub fn parse_optional_text(value: Option<&Value>, field: &'static str) -> ParamResult<String> {
    value.map_or(Ok(String::new()), |v| parse_text(v, field))
}

pub fn parse_ecosystem(value: &Value) -> ParamResult<Ecosystem> {
    let code = integer_in_range(value, "ecosystem", 1, 2)?;
    Ecosystem::from_code(code as u8).ok_or(ParameterError::OutOfRange {
        field: "ecosystem",
        detail: code.to_string(),
    })
}

pub fn parse_property_type(value: &Value) -> ParamResult<PropertyType> {
    let code = integer_in_range(value, "property type", 1, 2)?;
    PropertyType::from_code(code as u16).ok_or(ParameterError::OutOfRange {
        field: "property type",
        detail: code.to_string(),
    })
}

pub fn parse_dex_action(value: &Value) -> ParamResult<DexAction> {
    let code = integer_in_range(value, "action", 1, 3)?;
    DexAction::from_code(code as u8).ok_or(ParameterError::OutOfRange {
        field: "action",
        detail: code.to_string(),
    })
}

pub fn parse_metadex_action(value: &Value) -> ParamResult<MetaDexAction> {
    let code = integer_in_range(value, "action", 1, 4)?;
    MetaDexAction::from_code(code as u8).ok_or(ParameterError::OutOfRange {
        field: "action",
        detail: code.to_string(),
    })
}

/// Payment window in blocks.
pub fn parse_payment_window(value: &Value) -> ParamResult<u8> {
    integer_in_range(value, "payment window", 1, 255).map(|n| n as u8)
}

/// Minimum accept fee of a sell offer; zero is allowed.
pub fn parse_commitment_fee(value: &Value) -> ParamResult<i64> {
    let field = "commitment fee";
    parse_decimal(as_str(value, field)?, true)
        .map_err(|source| ParameterError::Amount { field, source })
}

pub fn parse_deadline(value: &Value) -> ParamResult<i64> {
    integer_in_range(value, "deadline", 0, i64::MAX)
}

pub fn parse_early_bird_bonus(value: &Value) -> ParamResult<u8> {
    integer_in_range(value, "early bird bonus", 0, 255).map(|n| n as u8)
}

pub fn parse_issuer_bonus(value: &Value) -> ParamResult<u8> {
    integer_in_range(value, "issuer bonus", 0, 255).map(|n| n as u8)
}

pub fn parse_bool(value: Option<&Value>, field: &'static str) -> ParamResult<bool> {
    match value {
        None => Ok(false),
        Some(v) => v.as_bool().ok_or(ParameterError::WrongType {
            field,
            expected: "boolean",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omni_types::AmountError;
    use serde_json::json;

    struct OneProperty(PropertyDescriptor);

    impl PropertyRegistry for OneProperty {
        fn property(&self, id: PropertyId) -> Option<PropertyDescriptor> {
            (id == self.0.id).then(|| self.0.clone())
        }
    }

    #[test]
    fn test_address() {
        assert_eq!(parse_address(&json!("1Alice")).unwrap().as_str(), "1Alice");
        assert_eq!(parse_address(&json!("")), Err(ParameterError::InvalidAddress));
        assert_eq!(parse_address(&json!(42)), Err(ParameterError::InvalidAddress));
        assert_eq!(parse_optional_address(Some(&json!(""))).unwrap(), None);
        assert_eq!(parse_optional_address(None).unwrap(), None);
    }

    #[test]
    fn test_property_id_range() {
        assert_eq!(parse_property_id(&json!(3)).unwrap(), PropertyId(3));
        assert_eq!(
            parse_property_id(&json!(0)),
            Err(ParameterError::PropertyIdOutOfRange)
        );
        assert_eq!(
            parse_property_id(&json!(4_294_967_296u64)),
            Err(ParameterError::PropertyIdOutOfRange)
        );
        assert_eq!(parse_property_id_unchecked(&json!(0)).unwrap(), PropertyId(0));
        assert!(matches!(
            parse_property_id(&json!("3")),
            Err(ParameterError::WrongType { .. })
        ));
    }

    #[test]
    fn test_existing_property() {
        let registry = OneProperty(PropertyDescriptor::new(
            PropertyId(3),
            "Quantum",
            false,
            Address::from("1Issuer"),
        ));
        assert_eq!(parse_existing_property(&json!(3), &registry).unwrap().name, "Quantum");
        assert_eq!(
            parse_existing_property(&json!(4), &registry),
            Err(ParameterError::PropertyDoesNotExist)
        );
    }

    #[test]
    fn test_previous_id_must_be_zero() {
        assert!(parse_previous_property_id(&json!(0)).is_ok());
        assert_eq!(
            parse_previous_property_id(&json!(5)),
            Err(ParameterError::PreviousIdNotSupported)
        );
    }

    #[test]
    fn test_amounts_follow_divisibility() {
        assert_eq!(parse_amount(&json!("1.5"), true, "amount").unwrap(), 150_000_000);
        assert_eq!(parse_amount(&json!("15"), false, "amount").unwrap(), 15);
        assert!(matches!(
            parse_amount(&json!("1.5"), false, "amount"),
            Err(ParameterError::Amount {
                source: AmountError::TooManyDecimals { .. },
                ..
            })
        ));
        assert_eq!(
            parse_amount(&json!("0"), true, "amount"),
            Err(ParameterError::NonPositiveAmount { field: "amount" })
        );
        assert_eq!(parse_amount_unchecked(&json!("0"), true, "amount").unwrap(), 0);
    }

    #[test]
    fn test_text_length() {
        assert_eq!(parse_text(&json!("name"), "name").unwrap(), "name");
        let long = "x".repeat(256);
        assert_eq!(
            parse_text(&json!(long), "name"),
            Err(ParameterError::TextTooLong {
                field: "name",
                max: 255
            })
        );
        assert_eq!(parse_optional_text(None, "memo").unwrap(), "");
    }

    #[test]
    fn test_enumerations() {
        assert_eq!(parse_ecosystem(&json!(2)).unwrap(), Ecosystem::Test);
        assert!(parse_ecosystem(&json!(3)).is_err());
        assert_eq!(parse_property_type(&json!(1)).unwrap(), PropertyType::Indivisible);
        assert_eq!(parse_dex_action(&json!(3)).unwrap(), DexAction::Cancel);
        assert!(parse_dex_action(&json!(4)).is_err());
        assert_eq!(
            parse_metadex_action(&json!(4)).unwrap(),
            MetaDexAction::CancelEverything
        );
    }

    #[test]
    fn test_offer_and_crowdsale_numbers() {
        assert_eq!(parse_payment_window(&json!(10)).unwrap(), 10);
        assert!(parse_payment_window(&json!(0)).is_err());
        assert!(parse_payment_window(&json!(256)).is_err());
        assert_eq!(parse_commitment_fee(&json!("0.0001")).unwrap(), 10_000);
        assert_eq!(parse_commitment_fee(&json!("0")).unwrap(), 0);
        assert!(parse_deadline(&json!(-1)).is_err());
        assert_eq!(parse_early_bird_bonus(&json!(255)).unwrap(), 255);
        assert!(parse_issuer_bonus(&json!(256)).is_err());
    }

    #[test]
    fn test_bool_flag() {
        assert!(!parse_bool(None, "override").unwrap());
        assert!(parse_bool(Some(&json!(true)), "override").unwrap());
        assert!(parse_bool(Some(&json!("yes")), "override").is_err());
    }
}
