use super::error::{CalcError, CalcResult};

#[derive(Debug, Clone, Copy)]
pub struct BisectionConfig {
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl BisectionConfig {
    /// Annual rates from 0% to 100%, halved until the bracket is no wider than
    /// 0.01 (14 halvings).
    pub const fn percent_range() -> Self {
        Self {
            search_min: 0.0,
            search_max: 100.0,
            tolerance: 0.01,
            max_iterations: 64,
        }
    }

    /// Horizons from 0 to 100 years at the same 0.01 resolution.
    pub const fn years_range() -> Self {
        Self {
            search_min: 0.0,
            search_max: 100.0,
            tolerance: 0.01,
            max_iterations: 64,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BisectionIteration {
    pub iteration: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub candidate_value: f64,
    pub achieved: f64,
}

#[derive(Debug, Clone)]
pub struct BisectionResult {
    pub solved_value: f64,
    pub iterations: Vec<BisectionIteration>,
    pub converged: bool,
}

/// Bisection for a function assumed non-decreasing over the bracket.
///
/// Candidates whose value falls short of `target` raise the lower bound,
/// everything else lowers the upper bound. The midpoint of the final bracket
/// is returned, so an unreachable target converges onto `search_max`.
pub fn bisect_non_decreasing<F>(
    evaluate: F,
    target: f64,
    config: BisectionConfig,
) -> CalcResult<BisectionResult>
where
    F: Fn(f64) -> f64,
{
    validate_config(config)?;

    let mut iterations = Vec::new();
    let mut lo = config.search_min;
    let mut hi = config.search_max;
    let mut it = 0;
    while hi - lo > config.tolerance && it < config.max_iterations {
        it += 1;
        let mid = (lo + hi) * 0.5;
        let achieved = evaluate(mid);
        iterations.push(BisectionIteration {
            iteration: it,
            lower_bound: lo,
            upper_bound: hi,
            candidate_value: mid,
            achieved,
        });

        if achieved < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let converged = hi - lo <= config.tolerance;
    if !converged {
        tracing::debug!(
            iterations = it,
            width = hi - lo,
            "bisection stopped before reaching tolerance"
        );
    }

    Ok(BisectionResult {
        solved_value: (lo + hi) * 0.5,
        iterations,
        converged,
    })
}

fn validate_config(config: BisectionConfig) -> CalcResult<()> {
    if !config.search_min.is_finite() || !config.search_max.is_finite() {
        return Err(CalcError::invalid("search bounds must be finite"));
    }
    if config.search_max <= config.search_min {
        return Err(CalcError::invalid(
            "search_max must be greater than search_min",
        ));
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err(CalcError::invalid("tolerance must be > 0"));
    }
    if config.max_iterations == 0 {
        return Err(CalcError::invalid("max_iterations must be > 0"));
    }
    Ok(())
}
