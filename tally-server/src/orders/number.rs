//! Order Number Generation
//!
//! Format: `ORD-<UTC yyyymmddHHMMSS>-<8-char uppercase alphanumeric>`.
//! Uniqueness relies on the timestamp plus random suffix; the unique index
//! on `order.order_number` is the backstop for the negligible collision case.

use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;

pub fn generate_order_number() -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();
    format!("ORD-{}-{}", timestamp, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[1].len(), 14);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 8);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_order_numbers_differ() {
        let a = generate_order_number();
        let b = generate_order_number();
        assert_ne!(a, b);
    }
}
