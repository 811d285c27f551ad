//! Order-identity validation (C1). Pure and synchronous: no I/O, no state.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("incorrect order id: {0}")]
pub struct IncorrectId(pub String);

/// Validate an order id: every character must be a decimal digit and the
/// digit sequence must pass the Luhn checksum (§4.1).
///
/// The rightmost digit is the check digit (index 0 from the right). Every
/// digit at an even index is taken as-is; every digit at an odd index is
/// doubled, subtracting 9 if that exceeds 9. The id is valid iff the total
/// sum modulo 10 is zero.
pub fn validate(order_id: &str) -> Result<(), IncorrectId> {
    if order_id.is_empty() || !order_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IncorrectId(order_id.to_string()));
    }

    let mut sum = 0u32;
    for (i, ch) in order_id.bytes().rev().enumerate() {
        let mut digit = (ch - b'0') as u32;
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }

    if sum.is_multiple_of(10) {
        Ok(())
    } else {
        Err(IncorrectId(order_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_digit_zero_is_valid() {
        assert!(validate("0").is_ok());
    }

    #[test]
    fn known_valid_number() {
        assert!(validate("79927398713").is_ok());
    }

    #[test]
    fn checksum_off_by_one_is_rejected() {
        assert_eq!(
            validate("79927398714"),
            Err(IncorrectId("79927398714".to_string()))
        );
    }

    #[test]
    fn non_digits_are_rejected() {
        assert!(validate("abc").is_err());
    }

    #[test]
    fn empty_string_is_rejected() {
        assert!(validate("").is_err());
    }
}
