use super::breakdown::generate_breakdown;
use super::error::{CalcError, CalcResult};
use super::format::{format_currency, format_percentage, format_years};
use super::tvm::{
    SEARCH_CEILING, future_value, months, required_contribution, required_duration,
    required_principal, required_rate,
};
use super::types::{
    BalanceSummary, DurationSolution, Headline, InvestmentMode, InvestmentOutcome, RateSolution,
};

/// Form values for the investment calculator. Each mode ignores the field it
/// solves for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentInputs {
    pub starting_amount: f64,
    pub monthly_contribution: f64,
    pub target_amount: f64,
    pub return_rate: f64,
    pub years: f64,
}

impl Default for InvestmentInputs {
    fn default() -> Self {
        Self {
            starting_amount: 10_000.0,
            monthly_contribution: 500.0,
            target_amount: 1_000_000.0,
            return_rate: 7.0,
            years: 20.0,
        }
    }
}

pub fn run_investment(
    mode: InvestmentMode,
    inputs: &InvestmentInputs,
) -> CalcResult<InvestmentOutcome> {
    validate(mode, inputs)?;

    let outcome = match mode {
        InvestmentMode::EndAmount => end_amount(inputs),
        InvestmentMode::AdditionalContribution => additional_contribution(inputs),
        InvestmentMode::ReturnRate => return_rate(inputs)?,
        InvestmentMode::StartingAmount => starting_amount(inputs),
        InvestmentMode::InvestmentLength => investment_length(inputs)?,
    };
    Ok(outcome)
}

fn validate(mode: InvestmentMode, inputs: &InvestmentInputs) -> CalcResult<()> {
    let used: [f64; 4] = match mode {
        InvestmentMode::EndAmount => [
            inputs.starting_amount,
            inputs.monthly_contribution,
            inputs.return_rate,
            inputs.years,
        ],
        InvestmentMode::AdditionalContribution => [
            inputs.starting_amount,
            inputs.target_amount,
            inputs.return_rate,
            inputs.years,
        ],
        InvestmentMode::ReturnRate => [
            inputs.starting_amount,
            inputs.monthly_contribution,
            inputs.target_amount,
            inputs.years,
        ],
        InvestmentMode::StartingAmount => [
            inputs.monthly_contribution,
            inputs.target_amount,
            inputs.return_rate,
            inputs.years,
        ],
        InvestmentMode::InvestmentLength => [
            inputs.starting_amount,
            inputs.monthly_contribution,
            inputs.target_amount,
            inputs.return_rate,
        ],
    };

    if used.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(CalcError::invalid("Please enter valid positive values."));
    }
    if mode != InvestmentMode::ReturnRate && inputs.return_rate > 100.0 {
        return Err(CalcError::invalid("Return rate cannot exceed 100%."));
    }
    if mode != InvestmentMode::InvestmentLength && inputs.years > SEARCH_CEILING {
        return Err(CalcError::invalid("Investment length cannot exceed 100 years."));
    }
    Ok(())
}

fn summary(
    end_amount: f64,
    starting_amount: f64,
    monthly_contribution: f64,
    interest_end_amount: f64,
    years: f64,
) -> BalanceSummary {
    let total_contributions = monthly_contribution * months(years);
    BalanceSummary {
        end_amount,
        starting_amount,
        total_contributions,
        total_interest: interest_end_amount - starting_amount - total_contributions,
    }
}

fn end_amount(inputs: &InvestmentInputs) -> InvestmentOutcome {
    let fv = future_value(
        inputs.starting_amount,
        inputs.monthly_contribution,
        inputs.return_rate,
        inputs.years,
    );
    InvestmentOutcome {
        mode: InvestmentMode::EndAmount,
        headline: Headline::Amount(fv),
        headline_text: format_currency(fv),
        summary: Some(summary(
            fv,
            inputs.starting_amount,
            inputs.monthly_contribution,
            fv,
            inputs.years,
        )),
        breakdown: generate_breakdown(
            inputs.starting_amount,
            inputs.monthly_contribution,
            inputs.return_rate,
            inputs.years,
        )
        .collect(),
    }
}

fn additional_contribution(inputs: &InvestmentInputs) -> InvestmentOutcome {
    let Some(contribution) = required_contribution(
        inputs.starting_amount,
        inputs.target_amount,
        inputs.return_rate,
        inputs.years,
    ) else {
        return unresolved(
            InvestmentMode::AdditionalContribution,
            Headline::Unreachable,
            "Target amount cannot be reached in zero years.",
        );
    };

    InvestmentOutcome {
        mode: InvestmentMode::AdditionalContribution,
        headline: Headline::Amount(contribution),
        headline_text: format_currency(contribution),
        summary: Some(summary(
            inputs.target_amount,
            inputs.starting_amount,
            contribution,
            inputs.target_amount,
            inputs.years,
        )),
        breakdown: generate_breakdown(
            inputs.starting_amount,
            contribution,
            inputs.return_rate,
            inputs.years,
        )
        .collect(),
    }
}

fn return_rate(inputs: &InvestmentInputs) -> CalcResult<InvestmentOutcome> {
    let rate = match required_rate(
        inputs.starting_amount,
        inputs.monthly_contribution,
        inputs.target_amount,
        inputs.years,
    )? {
        RateSolution::Solved(rate) => rate,
        RateSolution::Unreachable => {
            return Ok(unresolved(
                InvestmentMode::ReturnRate,
                Headline::Unreachable,
                "Target amount is not reachable with a return rate up to 100%.",
            ));
        }
    };

    let fv = future_value(
        inputs.starting_amount,
        inputs.monthly_contribution,
        rate,
        inputs.years,
    );
    Ok(InvestmentOutcome {
        mode: InvestmentMode::ReturnRate,
        headline: Headline::RatePercent(rate),
        headline_text: format_percentage(rate),
        summary: Some(summary(
            fv,
            inputs.starting_amount,
            inputs.monthly_contribution,
            fv,
            inputs.years,
        )),
        breakdown: generate_breakdown(
            inputs.starting_amount,
            inputs.monthly_contribution,
            rate,
            inputs.years,
        )
        .collect(),
    })
}

fn starting_amount(inputs: &InvestmentInputs) -> InvestmentOutcome {
    let principal = required_principal(
        inputs.monthly_contribution,
        inputs.target_amount,
        inputs.return_rate,
        inputs.years,
    );
    let fv = future_value(
        principal,
        inputs.monthly_contribution,
        inputs.return_rate,
        inputs.years,
    );
    InvestmentOutcome {
        mode: InvestmentMode::StartingAmount,
        headline: Headline::Amount(principal),
        headline_text: format_currency(principal),
        summary: Some(summary(
            fv,
            principal,
            inputs.monthly_contribution,
            fv,
            inputs.years,
        )),
        breakdown: generate_breakdown(
            principal,
            inputs.monthly_contribution,
            inputs.return_rate,
            inputs.years,
        )
        .collect(),
    }
}

fn investment_length(inputs: &InvestmentInputs) -> CalcResult<InvestmentOutcome> {
    let years = match required_duration(
        inputs.starting_amount,
        inputs.monthly_contribution,
        inputs.target_amount,
        inputs.return_rate,
    )? {
        DurationSolution::Solved(years) => years,
        DurationSolution::ExceedsLimit => {
            return Ok(unresolved(
                InvestmentMode::InvestmentLength,
                Headline::ExceedsLimit,
                "It will take more than 100 years to reach the target.",
            ));
        }
    };

    let fv = future_value(
        inputs.starting_amount,
        inputs.monthly_contribution,
        inputs.return_rate,
        years,
    );
    Ok(InvestmentOutcome {
        mode: InvestmentMode::InvestmentLength,
        headline: Headline::Years(years),
        headline_text: format_years(years),
        summary: Some(summary(
            inputs.target_amount,
            inputs.starting_amount,
            inputs.monthly_contribution,
            fv,
            years,
        )),
        breakdown: generate_breakdown(
            inputs.starting_amount,
            inputs.monthly_contribution,
            inputs.return_rate,
            years,
        )
        .collect(),
    })
}

fn unresolved(mode: InvestmentMode, headline: Headline, text: &str) -> InvestmentOutcome {
    InvestmentOutcome {
        mode,
        headline,
        headline_text: text.to_string(),
        summary: None,
        breakdown: Vec::new(),
    }
}
