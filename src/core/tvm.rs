//! Time-value-of-money engine.
//!
//! Rates are annual percentages converted to a simple monthly rate
//! (`rate / 100 / 12`); durations are years, possibly fractional, converted to
//! `years * 12` months. Contributions follow an ordinary annuity (deposited at
//! the end of each month). Every function is pure.

use super::error::CalcResult;
use super::solver::{BisectionConfig, bisect_non_decreasing};
use super::types::{DurationSolution, RateSolution, TvmParams, TvmResult};

/// Monthly rates below this magnitude are treated as zero.
pub const ZERO_RATE_TOLERANCE: f64 = 1e-10;
/// Upper bound of both bisection searches (percent for rate, years for duration).
pub const SEARCH_CEILING: f64 = 100.0;
/// Durations at or above this are reported as exceeding the search ceiling.
pub const DURATION_LIMIT_THRESHOLD: f64 = 99.99;

pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

pub fn months(years: f64) -> f64 {
    years * 12.0
}

fn growth_factor(monthly_rate: f64, months: f64) -> f64 {
    (1.0 + monthly_rate).powf(months)
}

/// Future value of one unit deposited at the end of each month.
pub fn annuity_factor(monthly_rate: f64, months: f64) -> f64 {
    if monthly_rate.abs() < ZERO_RATE_TOLERANCE {
        months
    } else {
        (growth_factor(monthly_rate, months) - 1.0) / monthly_rate
    }
}

pub fn future_value(
    principal: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    years: f64,
) -> f64 {
    let r = monthly_rate(annual_rate_percent);
    let n = months(years);
    principal * growth_factor(r, n) + monthly_contribution * annuity_factor(r, n)
}

/// Monthly contribution needed to reach `target_amount`.
///
/// Clamped at zero when the principal alone already reaches the target.
/// Returns `None` for a zero-length horizon that still leaves a shortfall,
/// since no number of deposits fits in zero months.
pub fn required_contribution(
    principal: f64,
    target_amount: f64,
    annual_rate_percent: f64,
    years: f64,
) -> Option<f64> {
    let r = monthly_rate(annual_rate_percent);
    let n = months(years);
    let shortfall = target_amount - principal * growth_factor(r, n);
    let factor = annuity_factor(r, n);
    if factor.abs() < ZERO_RATE_TOLERANCE {
        return if shortfall > 0.0 { None } else { Some(0.0) };
    }
    Some((shortfall / factor).max(0.0))
}

/// Starting principal needed to reach `target_amount`, clamped at zero when the
/// contributions alone already get there.
pub fn required_principal(
    monthly_contribution: f64,
    target_amount: f64,
    annual_rate_percent: f64,
    years: f64,
) -> f64 {
    let r = monthly_rate(annual_rate_percent);
    let n = months(years);
    let shortfall = target_amount - monthly_contribution * annuity_factor(r, n);
    (shortfall / growth_factor(r, n)).max(0.0)
}

/// Annual rate (percent, within 0.01) at which the plan reaches the target.
pub fn required_rate(
    principal: f64,
    monthly_contribution: f64,
    target_amount: f64,
    years: f64,
) -> CalcResult<RateSolution> {
    let best_case = future_value(principal, monthly_contribution, SEARCH_CEILING, years);
    if best_case < target_amount {
        return Ok(RateSolution::Unreachable);
    }

    let result = bisect_non_decreasing(
        |rate| future_value(principal, monthly_contribution, rate, years),
        target_amount,
        BisectionConfig::percent_range(),
    )?;
    Ok(RateSolution::Solved(result.solved_value))
}

/// Years (within 0.01) needed to reach the target, searched up to 100 years.
pub fn required_duration(
    principal: f64,
    monthly_contribution: f64,
    target_amount: f64,
    annual_rate_percent: f64,
) -> CalcResult<DurationSolution> {
    let solved = bisect_non_decreasing(
        |years| future_value(principal, monthly_contribution, annual_rate_percent, years),
        target_amount,
        BisectionConfig::years_range(),
    )?
    .solved_value;

    if solved >= DURATION_LIMIT_THRESHOLD {
        Ok(DurationSolution::ExceedsLimit)
    } else {
        Ok(DurationSolution::Solved(solved))
    }
}

pub fn project(params: TvmParams) -> TvmResult {
    let future_value = future_value(
        params.principal,
        params.monthly_contribution,
        params.annual_rate_percent,
        params.years,
    );
    let total_contributions = params.monthly_contribution * months(params.years);
    TvmResult {
        future_value,
        total_contributions,
        total_interest: future_value - params.principal - total_contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assume, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn closed_form(principal: f64, contribution: f64, rate_percent: f64, years: f64) -> f64 {
        let r = rate_percent / 1200.0;
        let n = years * 12.0;
        principal * (1.0 + r).powf(n) + contribution * ((1.0 + r).powf(n) - 1.0) / r
    }

    #[test]
    fn future_value_matches_closed_form_for_twenty_years_at_seven_percent() {
        let fv = future_value(10_000.0, 500.0, 7.0, 20.0);
        assert_close(fv, closed_form(10_000.0, 500.0, 7.0, 20.0), 1e-6);
        assert!((300_000.0..301_500.0).contains(&fv), "got {fv}");
    }

    #[test]
    fn zero_rate_future_value_is_plain_sum() {
        assert_eq!(future_value(1_000.0, 250.0, 0.0, 3.0), 1_000.0 + 250.0 * 36.0);
        assert_eq!(future_value(0.0, 100.0, 0.0, 0.5), 600.0);
    }

    #[test]
    fn zero_duration_future_value_is_principal() {
        assert_eq!(future_value(5_000.0, 300.0, 6.0, 0.0), 5_000.0);
    }

    #[test]
    fn required_contribution_for_a_million_in_thirty_years() {
        let contribution = required_contribution(0.0, 1_000_000.0, 8.0, 30.0).expect("reachable");
        assert!(contribution > 600.0 && contribution < 700.0, "got {contribution}");
        assert_close(future_value(0.0, contribution, 8.0, 30.0), 1_000_000.0, 1e-6);
    }

    #[test]
    fn required_contribution_clamps_to_zero_when_principal_suffices() {
        let contribution = required_contribution(500_000.0, 100_000.0, 5.0, 10.0);
        assert_eq!(contribution, Some(0.0));
    }

    #[test]
    fn required_contribution_at_zero_rate_divides_by_months() {
        let contribution = required_contribution(1_000.0, 13_000.0, 0.0, 1.0).expect("reachable");
        assert_close(contribution, 1_000.0, 1e-12);
    }

    #[test]
    fn required_contribution_with_zero_duration_is_unreachable_when_short() {
        assert_eq!(required_contribution(1_000.0, 2_000.0, 5.0, 0.0), None);
        assert_eq!(required_contribution(3_000.0, 2_000.0, 5.0, 0.0), Some(0.0));
    }

    #[test]
    fn required_principal_inverts_future_value() {
        let principal = required_principal(200.0, 150_000.0, 6.0, 15.0);
        assert_close(future_value(principal, 200.0, 6.0, 15.0), 150_000.0, 1e-6);
    }

    #[test]
    fn required_principal_clamps_to_zero_when_contributions_suffice() {
        assert_eq!(required_principal(5_000.0, 10_000.0, 4.0, 10.0), 0.0);
    }

    #[test]
    fn required_rate_reports_unreachable_targets() {
        assert_eq!(
            required_rate(100.0, 0.0, 1_000_000_000_000.0, 1.0),
            Ok(RateSolution::Unreachable)
        );
    }

    #[test]
    fn required_rate_reproduces_target() {
        let target = future_value(10_000.0, 500.0, 7.0, 20.0);
        let rate = required_rate(10_000.0, 500.0, target, 20.0)
            .expect("constant search bracket")
            .rate()
            .expect("reachable");
        assert_close(rate, 7.0, 0.01);
    }

    #[test]
    fn required_duration_at_zero_rate_is_exact_ratio() {
        let years = required_duration(0.0, 1_000.0, 100_000.0, 0.0)
            .expect("constant search bracket")
            .years()
            .expect("within limit");
        assert_close(years, 100_000.0 / 1_000.0 / 12.0, 0.01);
    }

    #[test]
    fn required_duration_flags_targets_beyond_a_century() {
        assert_eq!(
            required_duration(0.0, 10.0, 1_000_000.0, 0.0),
            Ok(DurationSolution::ExceedsLimit)
        );
    }

    #[test]
    fn required_duration_for_already_met_target_is_near_zero() {
        let years = required_duration(50_000.0, 0.0, 10_000.0, 5.0)
            .expect("constant search bracket")
            .years()
            .expect("within limit");
        assert!(years < 0.01, "got {years}");
    }

    #[test]
    fn project_splits_future_value() {
        let result = project(TvmParams {
            principal: 10_000.0,
            monthly_contribution: 500.0,
            annual_rate_percent: 7.0,
            years: 20.0,
        });
        assert_close(result.total_contributions, 120_000.0, 1e-9);
        assert_close(
            10_000.0 + result.total_contributions + result.total_interest,
            result.future_value,
            1e-6,
        );
        assert!(result.total_interest > 0.0);
    }

    #[test]
    fn negative_rate_gives_negative_interest() {
        let result = project(TvmParams {
            principal: 10_000.0,
            monthly_contribution: 0.0,
            annual_rate_percent: -5.0,
            years: 5.0,
        });
        assert!(result.total_interest < 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_future_value_is_monotone_in_each_input(
            principal in 0u32..1_000_000,
            contribution in 0u32..10_000,
            rate_bp in 0u32..2_000,
            months in 0u32..600,
            bump in 1u32..500,
        ) {
            let p = principal as f64;
            let c = contribution as f64;
            let rate = rate_bp as f64 / 100.0;
            let years = months as f64 / 12.0;
            let base = future_value(p, c, rate, years);
            let slack = base.abs() * 1e-12 + 1e-9;

            prop_assert!(future_value(p + bump as f64, c, rate, years) + slack >= base);
            prop_assert!(future_value(p, c + bump as f64, rate, years) + slack >= base);
            prop_assert!(future_value(p, c, rate + bump as f64 / 100.0, years) + slack >= base);
            prop_assert!(future_value(p, c, rate, years + bump as f64 / 12.0) + slack >= base);
        }

        #[test]
        fn prop_required_contribution_inverts_future_value(
            principal in 0u32..500_000,
            contribution in 0u32..5_000,
            rate_bp in 0u32..1_500,
            months in 1u32..480,
        ) {
            let p = principal as f64;
            let c = contribution as f64;
            let rate = rate_bp as f64 / 100.0;
            let years = months as f64 / 12.0;
            let target = future_value(p, c, rate, years);
            let solved = required_contribution(p, target, rate, years);
            prop_assert!(solved.is_some());
            let solved = solved.unwrap_or_default();
            prop_assert!((solved - c).abs() <= 1e-6 * c.max(1.0));
        }

        #[test]
        fn prop_zero_rate_future_value_is_exact(
            principal in 0u32..1_000_000,
            contribution in 0u32..10_000,
            whole_years in 0u32..100,
        ) {
            let p = principal as f64;
            let c = contribution as f64;
            let y = whole_years as f64;
            prop_assert!(future_value(p, c, 0.0, y) == p + c * y * 12.0);
        }

        #[test]
        fn prop_solved_rate_reproduces_target(
            principal in 1_000u32..200_000,
            contribution in 0u32..3_000,
            rate_bp in 10u32..3_000,
            whole_years in 1u32..40,
        ) {
            let p = principal as f64;
            let c = contribution as f64;
            let rate = rate_bp as f64 / 100.0;
            let years = whole_years as f64;
            let target = future_value(p, c, rate, years);
            let solved = required_rate(p, c, target, years).ok().and_then(RateSolution::rate);
            prop_assert!(solved.is_some());
            let solved = solved.unwrap_or_default();
            let low = future_value(p, c, solved - 0.01, years);
            let high = future_value(p, c, solved + 0.01, years);
            prop_assert!(low <= target && target <= high);
        }

        #[test]
        fn prop_solved_duration_reproduces_target(
            principal in 0u32..200_000,
            contribution in 100u32..3_000,
            rate_bp in 0u32..1_200,
            whole_years in 1u32..60,
        ) {
            let p = principal as f64;
            let c = contribution as f64;
            let rate = rate_bp as f64 / 100.0;
            let target = future_value(p, c, rate, whole_years as f64);
            let solved = required_duration(p, c, target, rate)
                .ok()
                .and_then(DurationSolution::years);
            prop_assume!(solved.is_some());
            let solved = solved.unwrap_or_default();
            let low = future_value(p, c, rate, (solved - 0.01).max(0.0));
            let high = future_value(p, c, rate, solved + 0.01);
            prop_assert!(low <= target && target <= high);
        }
    }
}
