//! Money helpers
//!
//! Monetary amounts are plain f64 rounded to 2 decimals at every boundary
//! (line totals, sub totals, tax, grand totals).

/// Round to 2 decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.006), 10.01);
        assert_eq!(round2(10.004), 10.0);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(-2.0 / 3.0), -0.67);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_round2_sum_law() {
        // sub_total of rounded line totals stays 2-decimal exact
        let lines = [round2(3.0 * 4.99), round2(2.0 * 1.335)];
        let sub_total = round2(lines.iter().sum());
        assert_eq!(sub_total, 17.64);
    }
}
