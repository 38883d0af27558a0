use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TvmParams {
    pub principal: f64,
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TvmResult {
    pub future_value: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyBreakdownRow {
    pub year: u32,
    pub opening_balance: f64,
    pub contributions: f64,
    pub interest: f64,
    pub closing_balance: f64,
}

/// When the monthly deposit lands relative to that month's interest credit.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContributionTiming {
    /// Deposit first, then credit interest on the enlarged balance.
    #[default]
    StartOfMonth,
    /// Credit interest first, then deposit (ordinary annuity).
    EndOfMonth,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateSolution {
    Solved(f64),
    Unreachable,
}

impl RateSolution {
    pub fn rate(self) -> Option<f64> {
        match self {
            RateSolution::Solved(rate) => Some(rate),
            RateSolution::Unreachable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationSolution {
    Solved(f64),
    ExceedsLimit,
}

impl DurationSolution {
    pub fn years(self) -> Option<f64> {
        match self {
            DurationSolution::Solved(years) => Some(years),
            DurationSolution::ExceedsLimit => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeverageScenario {
    pub loan_to_value: f64,
    pub loan_amount: f64,
    pub monthly_interest: f64,
    pub net_monthly_income: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeverageSummary {
    pub max_loan_amount: f64,
    pub monthly_interest: f64,
    pub net_monthly_income: f64,
    pub future_asset_value: f64,
    pub future_ltv_percent: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncomeStrategy {
    BuyBorrowDie,
    FourPercentRule,
    Dividend,
}

impl IncomeStrategy {
    pub fn label(self) -> &'static str {
        match self {
            IncomeStrategy::BuyBorrowDie => "Buy, Borrow, Die",
            IncomeStrategy::FourPercentRule => "4% Withdrawal Rule",
            IncomeStrategy::Dividend => "Dividend Strategy (3%)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyProjection {
    pub strategy: IncomeStrategy,
    pub monthly_income: f64,
    pub asset_value: f64,
    pub net_worth: f64,
    pub loan_amount: Option<f64>,
    pub depleted_after_months: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementPlan {
    pub total_needed: f64,
    pub future_current_assets: f64,
    pub monthly_investment: f64,
    pub total_invested: f64,
    pub investment_growth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub year: u32,
    pub value: f64,
}

/// Composition of an ending balance, the data behind the balance pie chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub end_amount: f64,
    pub starting_amount: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
}

impl BalanceSummary {
    /// Percent shares of starting amount, contributions and interest.
    pub fn shares(&self) -> [f64; 3] {
        let parts = [
            self.starting_amount,
            self.total_contributions,
            self.total_interest,
        ];
        let total: f64 = parts.iter().sum();
        if total.abs() <= 1e-12 {
            return [0.0; 3];
        }
        parts.map(|part| part / total * 100.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentMode {
    EndAmount,
    AdditionalContribution,
    ReturnRate,
    StartingAmount,
    InvestmentLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Headline {
    Amount(f64),
    RatePercent(f64),
    Years(f64),
    Unreachable,
    ExceedsLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentOutcome {
    pub mode: InvestmentMode,
    pub headline: Headline,
    pub headline_text: String,
    pub summary: Option<BalanceSummary>,
    pub breakdown: Vec<YearlyBreakdownRow>,
}
