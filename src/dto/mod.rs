//! Request payloads and the conversions that turn them into active models.

pub mod catalog;
pub mod parties;
pub mod service_order;
pub mod staff;

use rust_decimal::Decimal;
use sea_orm::{ActiveValue, Value};
use validator::ValidationError;

/// Rejects strings that are empty once trimmed.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Rejects negative money and stock amounts.
pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Overwrites `slot` when the patch carries a value.
pub(crate) fn patch_field<T>(slot: &mut ActiveValue<T>, value: Option<T>)
where
    T: Into<Value>,
{
    if let Some(value) = value {
        *slot = ActiveValue::Set(value);
    }
}

/// Same as [`patch_field`] for nullable columns.
pub(crate) fn patch_nullable<T>(slot: &mut ActiveValue<Option<T>>, value: Option<T>)
where
    Option<T>: Into<Value>,
{
    if let Some(value) = value {
        *slot = ActiveValue::Set(Some(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
        assert!(not_blank("pz").is_ok());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(non_negative(&Decimal::new(-5, 1)).is_err());
        assert!(non_negative(&Decimal::ZERO).is_ok());
        assert!(non_negative(&Decimal::new(1999, 2)).is_ok());
    }

    #[test]
    fn patch_field_only_touches_present_values() {
        let mut slot: ActiveValue<String> = ActiveValue::Unchanged("old".into());
        patch_field(&mut slot, None);
        assert!(matches!(&slot, ActiveValue::Unchanged(v) if v == "old"));

        patch_field(&mut slot, Some("new".to_string()));
        assert!(matches!(&slot, ActiveValue::Set(v) if v == "new"));
    }
}
