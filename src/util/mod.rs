//! Formatting and arithmetic helpers used by the views

pub mod rules;
mod time;

pub use time::*;

/// Round to two decimal places, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Anything with a quantity and a price per unit
pub trait Priced {
    fn amount(&self) -> f64;
    fn unit_price(&self) -> f64;
}

/// Sum of `amount * unit_price`, rounded to two decimals. No items is zero.
pub fn total_price<T: Priced>(items: Option<&[T]>) -> f64 {
    round2(
        items
            .unwrap_or_default()
            .iter()
            .map(|item| item.amount() * item.unit_price())
            .sum(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line(f64, f64);

    impl Priced for Line {
        fn amount(&self) -> f64 {
            self.0
        }

        fn unit_price(&self) -> f64 {
            self.1
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.1 + 0.2), 0.3);
        assert_eq!(round2(2.675_1), 2.68);
        assert_eq!(round2(-1.005_1), -1.01);
    }

    #[test]
    fn test_total_price() {
        let lines = [Line(3.0, 12.5), Line(0.5, 10.0)];
        assert_eq!(total_price(Some(&lines[..])), 42.5);
        assert_eq!(total_price::<Line>(None), 0.0);
        assert_eq!(total_price::<Line>(Some(&[])), 0.0);
    }
}
