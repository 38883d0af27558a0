//! Retirement nest-egg planning.
//!
//! Current assets compound annually at `annual_return`; new monthly
//! investments compound at the simple monthly rate `annual_return / 12`.
//! Rates are fractions (0.07 for 7%).

use super::error::{CalcError, CalcResult};
use super::tvm::{ZERO_RATE_TOLERANCE, annuity_factor};
use super::types::{ChartPoint, RetirementPlan};

/// Horizon of both chart series, in years.
pub const CHART_YEARS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetirementInputs {
    pub desired_annual_income: f64,
    pub current_assets: f64,
    pub years_to_retirement: u32,
    pub annual_return: f64,
    pub withdrawal_rate: f64,
}

impl Default for RetirementInputs {
    fn default() -> Self {
        Self {
            desired_annual_income: 80_000.0,
            current_assets: 50_000.0,
            years_to_retirement: 25,
            annual_return: 0.07,
            withdrawal_rate: 0.04,
        }
    }
}

pub fn plan_retirement(inputs: &RetirementInputs) -> CalcResult<RetirementPlan> {
    if inputs.withdrawal_rate <= 0.0 {
        return Err(CalcError::invalid("withdrawal rate must be > 0"));
    }

    let total_needed = inputs.desired_annual_income / inputs.withdrawal_rate;
    let years = f64::from(inputs.years_to_retirement);
    let future_current_assets = inputs.current_assets * (1.0 + inputs.annual_return).powf(years);
    let adjusted_target = (total_needed - future_current_assets).max(0.0);

    let monthly_return = inputs.annual_return / 12.0;
    let total_months = years * 12.0;
    let monthly_investment = if adjusted_target > 0.0 && total_months > 0.0 {
        if monthly_return > 0.0 {
            adjusted_target / annuity_factor(monthly_return, total_months)
        } else {
            adjusted_target / total_months
        }
    } else {
        0.0
    };

    let total_invested = monthly_investment * total_months;
    let total_future_value = future_current_assets
        + if monthly_investment > 0.0 {
            adjusted_target
        } else {
            0.0
        };

    Ok(RetirementPlan {
        total_needed,
        future_current_assets,
        monthly_investment,
        total_invested,
        investment_growth: total_future_value - inputs.current_assets - total_invested,
    })
}

/// Monthly investment that, with the current assets, reaches `target_amount`
/// in `years`.
///
/// `None` marks an impossible plan: with a negative return the deposits may
/// never accumulate to the shortfall.
pub fn monthly_investment_needed(
    target_amount: f64,
    years: u32,
    annual_return: f64,
    current_assets: f64,
) -> Option<f64> {
    if target_amount <= 0.0 || years == 0 {
        return Some(0.0);
    }

    let years = f64::from(years);
    let future_current_assets = current_assets * (1.0 + annual_return).powf(years);
    let adjusted_target = target_amount - future_current_assets;
    if adjusted_target <= 0.0 {
        return Some(0.0);
    }

    let monthly_return = annual_return / 12.0;
    let total_months = years * 12.0;
    if monthly_return.abs() < ZERO_RATE_TOLERANCE {
        return Some(adjusted_target / total_months);
    }

    let compound = (1.0 + monthly_return).powf(total_months);
    if monthly_return < 0.0 && compound <= 0.0 {
        return None;
    }
    let denominator = (compound - 1.0) / monthly_return;
    if denominator.abs() < ZERO_RATE_TOLERANCE {
        return Some(adjusted_target / total_months);
    }

    let payment = adjusted_target / denominator;
    if monthly_return < 0.0 && payment <= 0.0 {
        return None;
    }
    Some(payment)
}

/// Monthly investment needed for each retirement horizon from 1 to 50 years.
/// Impossible horizons are left out of the series.
pub fn investment_curve(
    target_amount: f64,
    annual_return: f64,
    current_assets: f64,
) -> Vec<ChartPoint> {
    (1..=CHART_YEARS)
        .filter_map(|year| {
            monthly_investment_needed(target_amount, year, annual_return, current_assets)
                .filter(|value| value.is_finite() && *value >= 0.0)
                .map(|value| ChartPoint { year, value })
        })
        .collect()
}

/// Capital reached after each horizon when investing that horizon's required
/// monthly amount.
pub fn capital_growth_curve(
    target_amount: f64,
    annual_return: f64,
    current_assets: f64,
) -> Vec<ChartPoint> {
    (1..=CHART_YEARS)
        .map(|year| {
            let years = f64::from(year);
            let fv_current = current_assets * (1.0 + annual_return).powf(years);
            let monthly =
                monthly_investment_needed(target_amount, year, annual_return, current_assets)
                    .unwrap_or(0.0);
            let fv_investments = if monthly > 0.0 {
                monthly * annuity_factor(annual_return / 12.0, years * 12.0)
            } else {
                0.0
            };
            ChartPoint {
                year,
                value: fv_current + fv_investments,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn plan_targets_income_over_withdrawal_rate() {
        let plan = plan_retirement(&RetirementInputs::default()).expect("valid inputs");
        assert_close(plan.total_needed, 2_000_000.0, 1e-6);
        assert_close(
            plan.future_current_assets,
            50_000.0 * 1.07_f64.powi(25),
            1e-6,
        );
        let shortfall = plan.total_needed - plan.future_current_assets;
        assert_close(
            plan.monthly_investment * annuity_factor(0.07 / 12.0, 300.0),
            shortfall,
            1e-6,
        );
        assert_close(plan.total_invested, plan.monthly_investment * 300.0, 1e-9);
        assert_close(
            plan.investment_growth,
            plan.total_needed - 50_000.0 - plan.total_invested,
            1e-6,
        );
    }

    #[test]
    fn plan_needs_no_investment_when_assets_already_cover_target() {
        let inputs = RetirementInputs {
            current_assets: 5_000_000.0,
            ..RetirementInputs::default()
        };
        let plan = plan_retirement(&inputs).expect("valid inputs");
        assert_eq!(plan.monthly_investment, 0.0);
        assert_eq!(plan.total_invested, 0.0);
        assert_close(
            plan.investment_growth,
            plan.future_current_assets - 5_000_000.0,
            1e-6,
        );
    }

    #[test]
    fn plan_at_zero_return_spreads_shortfall_evenly() {
        let inputs = RetirementInputs {
            desired_annual_income: 40_000.0,
            current_assets: 100_000.0,
            years_to_retirement: 10,
            annual_return: 0.0,
            withdrawal_rate: 0.04,
        };
        let plan = plan_retirement(&inputs).expect("valid inputs");
        assert_close(plan.monthly_investment, 900_000.0 / 120.0, 1e-9);
        assert_close(plan.investment_growth, 0.0, 1e-6);
    }

    #[test]
    fn plan_rejects_zero_withdrawal_rate() {
        let inputs = RetirementInputs {
            withdrawal_rate: 0.0,
            ..RetirementInputs::default()
        };
        let err = plan_retirement(&inputs).expect_err("must reject");
        assert!(err.to_string().contains("withdrawal rate"));
    }

    #[test]
    fn monthly_investment_is_zero_for_degenerate_inputs() {
        assert_eq!(monthly_investment_needed(0.0, 10, 0.05, 0.0), Some(0.0));
        assert_eq!(monthly_investment_needed(100_000.0, 0, 0.05, 0.0), Some(0.0));
        assert_eq!(monthly_investment_needed(100_000.0, 10, 0.05, 1_000_000.0), Some(0.0));
    }

    #[test]
    fn monthly_investment_handles_negative_returns() {
        let payment = monthly_investment_needed(100_000.0, 10, -0.02, 0.0).expect("possible");
        assert!(payment > 100_000.0 / 120.0);
    }

    #[test]
    fn investment_curve_falls_as_horizon_lengthens() {
        let curve = investment_curve(1_000_000.0, 0.06, 10_000.0);
        assert_eq!(curve.len(), CHART_YEARS as usize);
        assert_eq!(curve[0].year, 1);
        assert!(curve.windows(2).all(|w| w[1].value <= w[0].value));
    }

    #[test]
    fn capital_curve_reaches_target_while_investing() {
        let curve = capital_growth_curve(1_000_000.0, 0.06, 10_000.0);
        assert_eq!(curve.len(), CHART_YEARS as usize);
        for point in curve.iter().take(20) {
            assert_close(point.value, 1_000_000.0, 1e-3);
        }
    }
}
