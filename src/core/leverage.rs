//! Buy-borrow-die leverage math.
//!
//! Annual rates here are fractions (0.06 for 6%) and are converted to monthly
//! rates by compounding, `(1 + r)^(1/12) - 1`, not by dividing by twelve.

use super::error::{CalcError, CalcResult};
use super::types::{IncomeStrategy, LeverageScenario, LeverageSummary, StrategyProjection};

/// Loan-to-value tiers shown in the scenario table, in percent.
pub const LTV_TIERS: [u32; 6] = [30, 40, 50, 60, 70, 80];
pub const SAFE_WITHDRAWAL_RATE: f64 = 0.04;
pub const DIVIDEND_YIELD: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeverageInputs {
    pub asset_value: f64,
    pub loan_to_value: f64,
    pub annual_interest_rate: f64,
    pub asset_growth_rate: f64,
    pub desired_monthly_income: f64,
    pub years_to_project: u32,
}

impl Default for LeverageInputs {
    fn default() -> Self {
        Self {
            asset_value: 1_000_000.0,
            loan_to_value: 0.50,
            annual_interest_rate: 0.06,
            asset_growth_rate: 0.07,
            desired_monthly_income: 5_000.0,
            years_to_project: 30,
        }
    }
}

pub fn compound_monthly_rate(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

pub fn scenario_for_ltv(
    asset_value: f64,
    loan_to_value: f64,
    annual_interest_rate: f64,
) -> LeverageScenario {
    let loan_amount = asset_value * loan_to_value;
    let monthly_interest = loan_amount * compound_monthly_rate(annual_interest_rate);
    LeverageScenario {
        loan_to_value,
        loan_amount,
        monthly_interest,
        net_monthly_income: loan_amount - monthly_interest,
    }
}

/// Interest-only loan whose monthly interest equals `desired_monthly_income`.
///
/// `None` when the borrowing rate is not positive, since no finite loan then
/// produces the income.
pub fn loan_for_income(desired_monthly_income: f64, annual_interest_rate: f64) -> Option<f64> {
    let monthly_rate = compound_monthly_rate(annual_interest_rate);
    if monthly_rate <= 0.0 {
        return None;
    }
    Some(desired_monthly_income / monthly_rate)
}

pub fn summarize(inputs: &LeverageInputs) -> LeverageSummary {
    let scenario = scenario_for_ltv(
        inputs.asset_value,
        inputs.loan_to_value,
        inputs.annual_interest_rate,
    );
    let future_asset_value = grow(
        inputs.asset_value,
        inputs.asset_growth_rate,
        inputs.years_to_project,
    );
    let future_ltv_percent = if future_asset_value.abs() > 0.0 {
        scenario.loan_amount / future_asset_value * 100.0
    } else {
        0.0
    };

    LeverageSummary {
        max_loan_amount: scenario.loan_amount,
        monthly_interest: scenario.monthly_interest,
        net_monthly_income: scenario.net_monthly_income,
        future_asset_value,
        future_ltv_percent,
    }
}

pub fn ltv_scenarios(asset_value: f64, annual_interest_rate: f64) -> Vec<LeverageScenario> {
    LTV_TIERS
        .iter()
        .map(|&tier| {
            scenario_for_ltv(asset_value, f64::from(tier) / 100.0, annual_interest_rate)
        })
        .collect()
}

/// Projects the three income strategies to `years_to_project`.
pub fn compare_strategies(inputs: &LeverageInputs) -> CalcResult<Vec<StrategyProjection>> {
    let income = inputs.desired_monthly_income;
    let years = inputs.years_to_project;

    let loan = loan_for_income(income, inputs.annual_interest_rate).ok_or_else(|| {
        CalcError::invalid("interest rate must be > 0 to size an interest-only loan")
    })?;
    let bbd_asset_value = grow(inputs.asset_value, inputs.asset_growth_rate, years);
    let buy_borrow_die = StrategyProjection {
        strategy: IncomeStrategy::BuyBorrowDie,
        monthly_income: income,
        asset_value: bbd_asset_value,
        net_worth: bbd_asset_value - loan,
        loan_amount: Some(loan),
        depleted_after_months: None,
    };

    let (remaining, depleted_after_months) = simulate_withdrawals(
        income * 12.0 / SAFE_WITHDRAWAL_RATE,
        income,
        compound_monthly_rate(inputs.asset_growth_rate),
        years * 12,
    );
    let four_percent = StrategyProjection {
        strategy: IncomeStrategy::FourPercentRule,
        monthly_income: income,
        asset_value: remaining,
        net_worth: remaining,
        loan_amount: None,
        depleted_after_months,
    };

    let dividend_value = grow(
        income * 12.0 / DIVIDEND_YIELD,
        inputs.asset_growth_rate,
        years,
    );
    let dividend = StrategyProjection {
        strategy: IncomeStrategy::Dividend,
        monthly_income: income,
        asset_value: dividend_value,
        net_worth: dividend_value,
        loan_amount: None,
        depleted_after_months: None,
    };

    Ok(vec![buy_borrow_die, four_percent, dividend])
}

fn grow(value: f64, annual_rate: f64, years: u32) -> f64 {
    value * (1.0 + annual_rate).powf(f64::from(years))
}

/// Monthly growth followed by a withdrawal; stops once the balance runs out.
fn simulate_withdrawals(
    initial: f64,
    monthly_withdrawal: f64,
    monthly_return: f64,
    months: u32,
) -> (f64, Option<u32>) {
    let mut balance = initial;
    for month in 1..=months {
        balance = balance * (1.0 + monthly_return) - monthly_withdrawal;
        if balance <= 0.0 {
            return (0.0, Some(month));
        }
    }
    (balance, None)
}
