//! Derived ratios.

/// Click-through rate as a percentage, rounded to two decimals.
///
/// Zero impressions yields `0.0` rather than a division fault.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn click_through_rate(clicks: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    let pct = clicks as f64 / impressions as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Interactions (likes, comments, shares...) per impression, as a percentage.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn engagement_rate(interactions: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    interactions as f64 / impressions as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctr_with_zero_impressions_is_zero() {
        assert!(click_through_rate(10, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn ctr_is_a_percentage() {
        assert!((click_through_rate(50, 200) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ctr_rounds_to_two_places() {
        assert!((click_through_rate(1, 3) - 33.33).abs() < 1e-9);
    }

    #[test]
    fn engagement_rate_with_zero_impressions_is_zero() {
        assert!(engagement_rate(5, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn engagement_rate_is_unrounded() {
        assert!((engagement_rate(1, 3) - 100.0 / 3.0).abs() < 1e-9);
    }
}
