use super::tvm::monthly_rate;
use super::types::{ContributionTiming, YearlyBreakdownRow};

/// Lazy year-by-year replay of a savings plan.
///
/// Clone the iterator (or call [`generate_breakdown`] again) to restart it;
/// nothing is shared between runs.
#[derive(Debug, Clone)]
pub struct YearlyBreakdown {
    monthly_contribution: f64,
    monthly_rate: f64,
    years: f64,
    total_years: u32,
    timing: ContributionTiming,
    next_year: u32,
    balance: f64,
}

pub fn generate_breakdown(
    starting_amount: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    years: f64,
) -> YearlyBreakdown {
    generate_breakdown_with_timing(
        starting_amount,
        monthly_contribution,
        annual_rate_percent,
        years,
        ContributionTiming::StartOfMonth,
    )
}

pub fn generate_breakdown_with_timing(
    starting_amount: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    years: f64,
    timing: ContributionTiming,
) -> YearlyBreakdown {
    let years = if years.is_finite() { years.max(0.0) } else { 0.0 };
    YearlyBreakdown {
        monthly_contribution,
        monthly_rate: monthly_rate(annual_rate_percent),
        years,
        total_years: years.ceil() as u32,
        timing,
        next_year: 1,
        balance: starting_amount,
    }
}

impl YearlyBreakdown {
    fn months_in_year(&self, year: u32) -> u32 {
        let elapsed = f64::from(year - 1);
        if f64::from(year) > self.years {
            ((self.years - elapsed) * 12.0).round() as u32
        } else {
            12
        }
    }
}

impl Iterator for YearlyBreakdown {
    type Item = YearlyBreakdownRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_year > self.total_years {
            return None;
        }
        let year = self.next_year;
        self.next_year += 1;

        let opening_balance = self.balance;
        let mut contributions = 0.0;
        let mut interest = 0.0;
        for _ in 0..self.months_in_year(year) {
            match self.timing {
                ContributionTiming::StartOfMonth => {
                    self.balance += self.monthly_contribution;
                    let earned = self.balance * self.monthly_rate;
                    self.balance += earned;
                    interest += earned;
                }
                ContributionTiming::EndOfMonth => {
                    let earned = self.balance * self.monthly_rate;
                    self.balance += earned + self.monthly_contribution;
                    interest += earned;
                }
            }
            contributions += self.monthly_contribution;
        }

        Some(YearlyBreakdownRow {
            year,
            opening_balance,
            contributions,
            interest,
            closing_balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total_years as usize + 1).saturating_sub(self.next_year as usize);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for YearlyBreakdown {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tvm::future_value;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn whole_years_produce_one_row_each() {
        let rows: Vec<_> = generate_breakdown(10_000.0, 500.0, 7.0, 20.0).collect();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].year, 1);
        assert_eq!(rows[19].year, 20);
        assert_close(rows[0].opening_balance, 10_000.0, 1e-12);
        assert!(rows.iter().all(|row| (row.contributions - 6_000.0).abs() < 1e-9));
    }

    #[test]
    fn rows_chain_opening_to_previous_closing() {
        let rows: Vec<_> = generate_breakdown(2_500.0, 125.0, 5.5, 12.0).collect();
        for pair in rows.windows(2) {
            assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        }
    }

    #[test]
    fn fractional_duration_ends_with_partial_year() {
        let rows: Vec<_> = generate_breakdown(0.0, 100.0, 0.0, 2.5).collect();
        assert_eq!(rows.len(), 3);
        assert_close(rows[2].contributions, 600.0, 1e-12);
        assert_close(rows[2].closing_balance, 3_000.0, 1e-9);
    }

    #[test]
    fn zero_duration_yields_nothing() {
        assert_eq!(generate_breakdown(1_000.0, 100.0, 5.0, 0.0).count(), 0);
    }

    #[test]
    fn restarting_by_clone_repeats_rows() {
        let breakdown = generate_breakdown(1_000.0, 50.0, 4.0, 3.0);
        let first: Vec<_> = breakdown.clone().collect();
        let second: Vec<_> = breakdown.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn size_hint_counts_remaining_rows() {
        let mut breakdown = generate_breakdown(1_000.0, 50.0, 4.0, 3.5);
        assert_eq!(breakdown.len(), 4);
        breakdown.next();
        assert_eq!(breakdown.len(), 3);
    }

    #[test]
    fn end_of_month_timing_reconciles_with_closed_form() {
        let rows: Vec<_> = generate_breakdown_with_timing(
            10_000.0,
            500.0,
            7.0,
            20.0,
            ContributionTiming::EndOfMonth,
        )
        .collect();
        let closing = rows.last().map(|row| row.closing_balance).unwrap_or_default();
        let fv = future_value(10_000.0, 500.0, 7.0, 20.0);
        assert_close(closing, fv, fv * 1e-9);
    }

    #[test]
    fn start_of_month_timing_earns_one_extra_month_on_deposits() {
        let rows: Vec<_> = generate_breakdown(0.0, 500.0, 6.0, 10.0).collect();
        let closing = rows.last().map(|row| row.closing_balance).unwrap_or_default();
        let ordinary = future_value(0.0, 500.0, 6.0, 10.0);
        assert_close(closing, ordinary * 1.005, ordinary * 1e-9);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_rows_reconcile_with_totals(
            starting in 0u32..500_000,
            contribution in 0u32..5_000,
            rate_bp in 0u32..1_500,
            months in 0u32..600,
            end_of_month in proptest::bool::ANY,
        ) {
            let start = starting as f64;
            let c = contribution as f64;
            let rate = rate_bp as f64 / 100.0;
            let years = months as f64 / 12.0;
            let timing = if end_of_month {
                ContributionTiming::EndOfMonth
            } else {
                ContributionTiming::StartOfMonth
            };
            let rows: Vec<_> =
                generate_breakdown_with_timing(start, c, rate, years, timing).collect();

            let contributions: f64 = rows.iter().map(|row| row.contributions).sum();
            let interest: f64 = rows.iter().map(|row| row.interest).sum();
            let closing = rows.last().map(|row| row.closing_balance).unwrap_or(start);
            let scale = closing.abs().max(1.0);

            prop_assert!((contributions - c * months as f64).abs() <= 1e-6 * scale);
            prop_assert!((start + contributions + interest - closing).abs() <= 1e-6 * scale);
            if end_of_month {
                let fv = future_value(start, c, rate, years);
                prop_assert!((closing - fv).abs() <= 1e-6 * scale);
            }
        }
    }
}
