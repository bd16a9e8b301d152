//! Whole-package purchase resolution.

use thiserror::Error;

/// Catalog data that cannot be turned into a purchase.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PackageError {
    #[error("package weight must be positive, got {0}g")]
    NonPositiveWeight(i64),

    #[error("invalid unit price {0}")]
    InvalidPrice(f64),

    #[error("{deficit}g cannot be covered with {package_grams}g packages")]
    TooManyPackages { deficit: i64, package_grams: i64 },
}

/// Smallest package count `k >= 1` with `k * package_grams >= deficit`.
pub fn packages_needed(deficit: i64, package_grams: i64) -> Result<u32, PackageError> {
    if package_grams <= 0 {
        return Err(PackageError::NonPositiveWeight(package_grams));
    }
    let count = if deficit <= package_grams {
        1
    } else {
        (deficit - 1) / package_grams + 1
    };
    u32::try_from(count).map_err(|_| PackageError::TooManyPackages {
        deficit,
        package_grams,
    })
}

/// Reject prices that would poison cart totals.
pub fn check_unit_price(unit_price: f64) -> Result<f64, PackageError> {
    if unit_price.is_finite() && unit_price >= 0.0 {
        Ok(unit_price)
    } else {
        Err(PackageError::InvalidPrice(unit_price))
    }
}

/// Human-readable package weight: grams below a kilogram, otherwise
/// kilograms with one decimal and no trailing `.0`.
pub fn format_weight(grams: i64) -> String {
    if grams < 1000 {
        return format!("{grams}g");
    }
    let kg = format!("{:.1}", grams as f64 / 1000.0);
    match kg.strip_suffix(".0") {
        Some(whole) => format!("{whole}kg"),
        None => format!("{kg}kg"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_up_to_whole_packages() {
        assert_eq!(packages_needed(250, 200), Ok(2));
        assert_eq!(packages_needed(400, 200), Ok(2));
        assert_eq!(packages_needed(401, 200), Ok(3));
    }

    #[test]
    fn at_least_one_package() {
        assert_eq!(packages_needed(1, 1000), Ok(1));
        assert_eq!(packages_needed(0, 1000), Ok(1));
        assert_eq!(packages_needed(1000, 1000), Ok(1));
    }

    #[test]
    fn zero_or_negative_weight_is_rejected() {
        assert_eq!(packages_needed(250, 0), Err(PackageError::NonPositiveWeight(0)));
        assert_eq!(packages_needed(250, -5), Err(PackageError::NonPositiveWeight(-5)));
    }

    #[test]
    fn absurd_counts_are_rejected() {
        let err = packages_needed(i64::MAX / 2, 1).unwrap_err();
        assert!(matches!(err, PackageError::TooManyPackages { .. }));
    }

    #[test]
    fn unit_price_validation() {
        assert_eq!(check_unit_price(1.25), Ok(1.25));
        assert_eq!(check_unit_price(0.0), Ok(0.0));
        assert!(check_unit_price(-0.5).is_err());
        assert!(check_unit_price(f64::NAN).is_err());
    }

    #[test]
    fn weight_formatting() {
        assert_eq!(format_weight(250), "250g");
        assert_eq!(format_weight(999), "999g");
        assert_eq!(format_weight(1000), "1kg");
        assert_eq!(format_weight(1500), "1.5kg");
        assert_eq!(format_weight(2000), "2kg");
        assert_eq!(format_weight(5000), "5kg");
    }
}
