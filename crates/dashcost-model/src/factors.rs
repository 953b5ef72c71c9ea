//! Page-count and status multipliers

use dashcost_core::DashboardStatus;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Page counts above this are charged as this many pages
pub const MAX_PAGES: u32 = 10;

/// Multiplier for a dashboard's page count
///
/// Pages are floored and capped at [`MAX_PAGES`]. Each page past the first
/// adds 5%. Missing counts, and counts that floor below 1, get 1.0.
pub fn page_factor(pages: Option<f64>) -> Decimal {
    let Some(pages) = pages.filter(|p| p.is_finite()) else {
        return Decimal::ONE;
    };

    let effective = pages.floor().min(f64::from(MAX_PAGES));
    if effective < 1.0 {
        return Decimal::ONE;
    }

    page_scale(effective as u32).unwrap_or(Decimal::ONE)
}

fn page_scale(pages: u32) -> Option<Decimal> {
    let factor = match pages {
        1 => dec!(1.00),
        2 => dec!(1.05),
        3 => dec!(1.10),
        4 => dec!(1.15),
        5 => dec!(1.20),
        6 => dec!(1.25),
        7 => dec!(1.30),
        8 => dec!(1.35),
        9 => dec!(1.40),
        10 => dec!(1.45),
        _ => return None,
    };
    Some(factor)
}

/// Multiplier for a known status
pub fn status_multiplier(status: DashboardStatus) -> Decimal {
    match status {
        DashboardStatus::Active => dec!(1.0),
        DashboardStatus::InProgress => dec!(1.1),
        DashboardStatus::Broken => dec!(1.3),
    }
}

/// Multiplier for a status cell; `None` for anything unrecognized
pub fn status_factor(status: &str) -> Option<Decimal> {
    DashboardStatus::parse(status).map(status_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn page_factor_missing_is_one() {
        assert_eq!(page_factor(None), Decimal::ONE);
    }

    #[test]
    fn page_factor_linear_in_range() {
        for p in 1..=10 {
            let expected = Decimal::ONE + dec!(0.05) * Decimal::from(p - 1);
            assert_eq!(page_factor(Some(f64::from(p))), expected, "pages = {p}");
        }
    }

    #[test]
    fn page_factor_is_non_decreasing() {
        let factors: Vec<_> = (0..=20).map(|p| page_factor(Some(f64::from(p)))).collect();
        assert!(factors.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn page_factor_caps_at_ten() {
        assert_eq!(page_factor(Some(15.0)), dec!(1.45));
        assert_eq!(page_factor(Some(1_000_000.0)), dec!(1.45));
    }

    #[test]
    fn page_factor_floors_fractions() {
        assert_eq!(page_factor(Some(3.9)), dec!(1.10));
        assert_eq!(page_factor(Some(10.5)), dec!(1.45));
    }

    #[test]
    fn page_factor_out_of_range_falls_back() {
        assert_eq!(page_factor(Some(0.0)), Decimal::ONE);
        assert_eq!(page_factor(Some(0.9)), Decimal::ONE);
        assert_eq!(page_factor(Some(-3.0)), Decimal::ONE);
        assert_eq!(page_factor(Some(f64::NAN)), Decimal::ONE);
        assert_eq!(page_factor(Some(f64::INFINITY)), Decimal::ONE);
    }

    #[test]
    fn status_factor_known_values() {
        assert_eq!(status_factor("active"), Some(dec!(1.0)));
        assert_eq!(status_factor("in progress"), Some(dec!(1.1)));
        assert_eq!(status_factor("broken"), Some(dec!(1.3)));
    }

    #[test]
    fn status_factor_unknown_is_undefined() {
        assert_eq!(status_factor("unknown"), None);
        assert_eq!(status_factor("retired"), None);
        assert_eq!(status_factor(""), None);
    }
}
