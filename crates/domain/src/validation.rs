//! Validation predicates over primitive fields.
//!
//! These are deliberately small and side-effect free so that every entity
//! applies the same rule the same way.

/// Returns true if the string is empty or contains only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns true if the string looks like an email address.
///
/// This only checks that both `@` and `.` appear somewhere in the value.
/// It accepts addresses such as `a@b.c@d`; callers must not rely on it for
/// anything stricter than catching obvious typos.
pub fn has_email_shape(value: &str) -> bool {
    value.contains('@') && value.contains('.')
}

/// Returns true if the quantity is strictly positive.
pub fn is_positive_quantity(quantity: i32) -> bool {
    quantity > 0
}

/// Returns true if the price is zero or greater.
///
/// NaN is not a valid price.
pub fn is_non_negative_price(price: f64) -> bool {
    price >= 0.0
}
