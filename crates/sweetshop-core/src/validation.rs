//! # Validation Module
//!
//! Client-side checks run before any request leaves the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: View (storefront)                                            │
//! │  └── THIS MODULE: required fields, restock quantity, password rules    │
//! │           │  rejected? → notice shown, NO request issued               │
//! │           ▼                                                             │
//! │  Layer 2: Inventory API (external)                                     │
//! │  └── Authoritative rules, reported back as HTTP errors                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sweetshop_core::validation::validate_restock_quantity;
//!
//! assert_eq!(validate_restock_quantity("5").unwrap(), 5);
//! assert!(validate_restock_quantity("0").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{SweetDraft, SweetForm};
use crate::MIN_PASSWORD_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Sweet Form
// =============================================================================

/// Validates the add/edit form and builds the request body.
///
/// ## Rules
/// - name, category, price and quantity must be non-empty (checked in that
///   order, first failure wins)
/// - price must be a decimal with at most two fractional digits, not negative
/// - quantity must be a whole number, not negative
/// - description is optional; blank becomes `None`
pub fn validate_sweet_form(form: &SweetForm) -> ValidationResult<SweetDraft> {
    let name = required("name", &form.name)?;
    let category = required("category", &form.category)?;
    let price_raw = required("price", &form.price)?;
    let quantity_raw = required("quantity", &form.quantity)?;

    let price = Money::from_decimal_str(price_raw).ok_or_else(|| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: "must be a number with at most two decimals".to_string(),
    })?;
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    let quantity = parse_whole("quantity", quantity_raw)?;
    if quantity < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    let description = form.description.trim();

    Ok(SweetDraft {
        name: name.to_string(),
        category: category.to_string(),
        price,
        quantity,
        description: (!description.is_empty()).then(|| description.to_string()),
    })
}

// =============================================================================
// Restock
// =============================================================================

/// Validates the "quantity to add" field of the restock modal.
///
/// ## Rules
/// - Must be present
/// - Must be a whole number of at least 1
pub fn validate_restock_quantity(input: &str) -> ValidationResult<i64> {
    let raw = required("quantity", input)?;
    let qty = parse_whole("quantity", raw)?;
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(qty)
}

/// Validates a purchase quantity.
pub fn validate_purchase_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Password Change
// =============================================================================

/// Validates the password pair of the profile form.
///
/// ## Rules
/// - Both blank: no password change, returns `Ok(None)`
/// - Otherwise they must be equal and at least [`MIN_PASSWORD_LEN`] long
///
/// ## Example
/// ```rust
/// use sweetshop_core::validation::validate_password_change;
///
/// assert_eq!(validate_password_change("", "").unwrap(), None);
/// assert!(validate_password_change("secret1", "secret2").is_err());
/// assert!(validate_password_change("abc", "abc").is_err());
/// assert_eq!(
///     validate_password_change("secret1", "secret1").unwrap().as_deref(),
///     Some("secret1")
/// );
/// ```
pub fn validate_password_change(
    password: &str,
    confirm_password: &str,
) -> ValidationResult<Option<String>> {
    if password.is_empty() && confirm_password.is_empty() {
        return Ok(None);
    }

    if password != confirm_password {
        return Err(ValidationError::Mismatch {
            field: "Passwords".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "Password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    // Whitespace-only passwords count as "not changing it"
    if password.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(password.to_string()))
}

// =============================================================================
// Helpers
// =============================================================================

fn required<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value)
}

fn parse_whole(field: &str, raw: &str) -> ValidationResult<i64> {
    raw.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a whole number".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
