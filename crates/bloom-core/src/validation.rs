//! # Validation Module
//!
//! Input validation for Bloom Florist records.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI forms                                                     │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Runs before any transaction opens                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (quantity >= 0)                                  │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_SHORT_TEXT_LEN: usize = 100;
const MAX_FRESHNESS_DAYS: i64 = 3_650;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

fn validate_optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(v) if v.trim().chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        _ => Ok(()),
    }
}

/// Trims optional text and maps blank values to `None`.
///
/// ```rust
/// use bloom_core::validation::normalize_optional;
///
/// assert_eq!(normalize_optional(Some("  Roses ")), Some("Roses".to_string()));
/// assert_eq!(normalize_optional(Some("   ")), None);
/// assert_eq!(normalize_optional(None), None);
/// ```
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Flower name: required, at most 200 characters.
pub fn validate_flower_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, MAX_NAME_LEN)
}

/// Supplier name: required, at most 200 characters.
pub fn validate_supplier_name(name: &str) -> ValidationResult<()> {
    validate_required_text("supplier name", name, MAX_NAME_LEN)
}

/// Color may be empty (no color picked).
pub fn validate_color(color: &str) -> ValidationResult<()> {
    validate_optional_text("color", Some(color), MAX_SHORT_TEXT_LEN)
}

pub fn validate_category(category: Option<&str>) -> ValidationResult<()> {
    validate_optional_text("category", category, MAX_SHORT_TEXT_LEN)
}

pub fn validate_customer_name(name: Option<&str>) -> ValidationResult<()> {
    validate_optional_text("customer name", name, MAX_NAME_LEN)
}

/// Phone numbers: digits plus common separators.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    validate_required_text("phone", phone, 30)?;

    let ok = phone
        .trim()
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.'));
    if !ok {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces and + - ( ) .".to_string(),
        });
    }

    Ok(())
}

/// Minimal shape check: `local@domain` with a dot in the domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_required_text("email", email, MAX_NAME_LEN)?;

    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Quantity in a sale request.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// The upper limit is the stock on hand, checked against the flower record.
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity_sold".to_string(),
        });
    }

    Ok(())
}

/// Stock on hand may be zero but never negative.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Prices may be zero (giveaways) but never negative.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Shelf-life window, 1 to 3650 days.
pub fn validate_freshness_days(days: i64) -> ValidationResult<()> {
    if days <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "freshness_days".to_string(),
        });
    }

    if days > MAX_FRESHNESS_DAYS {
        return Err(ValidationError::OutOfRange {
            field: "freshness_days".to_string(),
            min: 1,
            max: MAX_FRESHNESS_DAYS,
        });
    }

    Ok(())
}

/// Low-stock threshold from configuration. Zero disables alerts.
pub fn validate_low_stock_threshold(threshold: i64) -> ValidationResult<()> {
    if threshold < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "low_stock_threshold".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names() {
        assert!(validate_flower_name("Red Rose").is_ok());
        assert!(validate_flower_name("").is_err());
        assert!(validate_flower_name("   ").is_err());
        assert!(validate_flower_name(&"A".repeat(201)).is_err());

        assert!(validate_supplier_name("Dutch Growers").is_ok());
        assert_eq!(
            validate_supplier_name(" ").unwrap_err(),
            ValidationError::required("supplier name")
        );
    }

    #[test]
    fn test_validate_sale_quantity() {
        assert!(validate_sale_quantity(1).is_ok());
        assert!(validate_sale_quantity(10_000).is_ok());
        assert!(validate_sale_quantity(i64::MAX).is_ok());

        assert!(validate_sale_quantity(0).is_err());
        assert!(validate_sale_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_stock_and_price() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_freshness_days() {
        assert!(validate_freshness_days(1).is_ok());
        assert!(validate_freshness_days(14).is_ok());
        assert!(validate_freshness_days(0).is_err());
        assert!(validate_freshness_days(-5).is_err());
        assert!(validate_freshness_days(10_000).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("orders@dutchgrowers.nl").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@nodot").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+31 (0)20 555-0199").is_ok());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_validate_low_stock_threshold() {
        assert!(validate_low_stock_threshold(0).is_ok());
        assert!(validate_low_stock_threshold(10).is_ok());
        assert!(validate_low_stock_threshold(-1).is_err());
    }
}
