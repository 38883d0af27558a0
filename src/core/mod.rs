mod breakdown;
mod error;
mod format;
mod leverage;
mod modes;
mod retirement;
mod solver;
mod tvm;
mod types;

pub use breakdown::{YearlyBreakdown, generate_breakdown, generate_breakdown_with_timing};
pub use error::{CalcError, CalcResult};
pub use format::{format_compact_currency, format_currency, format_percentage, format_years};
pub use leverage::{
    DIVIDEND_YIELD, LTV_TIERS, LeverageInputs, SAFE_WITHDRAWAL_RATE, compare_strategies,
    compound_monthly_rate, loan_for_income, ltv_scenarios, scenario_for_ltv, summarize,
};
pub use modes::{InvestmentInputs, run_investment};
pub use retirement::{
    CHART_YEARS, RetirementInputs, capital_growth_curve, investment_curve,
    monthly_investment_needed, plan_retirement,
};
pub use solver::{BisectionConfig, BisectionIteration, BisectionResult, bisect_non_decreasing};
pub use tvm::{
    DURATION_LIMIT_THRESHOLD, SEARCH_CEILING, ZERO_RATE_TOLERANCE, annuity_factor, future_value,
    monthly_rate, months, project, required_contribution, required_duration, required_principal,
    required_rate,
};
pub use types::{
    BalanceSummary, ChartPoint, ContributionTiming, DurationSolution, Headline, IncomeStrategy,
    InvestmentMode, InvestmentOutcome, LeverageScenario, LeverageSummary, RateSolution,
    RetirementPlan, StrategyProjection, TvmParams, TvmResult, YearlyBreakdownRow,
};
