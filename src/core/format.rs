//! Display formatting shared by every calculator (en-US dollars).

/// Whole-dollar currency with thousands separators, e.g. `$1,234,567`.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "NaN".to_string();
    }
    if amount.is_infinite() {
        return if amount > 0.0 { "$∞" } else { "-$∞" }.to_string();
    }

    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits);
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Short currency for chart axes and scenario tables: `$2.5M`, `$45k`, `$999`.
pub fn format_compact_currency(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("${:.1}M", (amount / 1_000_000.0 * 10.0).round() / 10.0)
    } else if amount >= 1_000.0 {
        format!("${:.0}k", (amount / 1_000.0).round())
    } else {
        format!("${:.0}", amount.round())
    }
}

pub fn format_percentage(rate_percent: f64) -> String {
    format!("{rate_percent:.2}%")
}

/// Human duration such as `8 years and 4 months`; under a year only months
/// are shown, rounded up.
pub fn format_years(years: f64) -> String {
    if years < 1.0 {
        let months = (years * 12.0).ceil().max(0.0) as u64;
        return plural(months, "month");
    }

    let whole_years = years.floor();
    let remaining_months = ((years - whole_years) * 12.0).round() as u64;
    let whole_years = whole_years as u64;
    if remaining_months == 0 {
        plural(whole_years, "year")
    } else {
        format!(
            "{} and {}",
            plural(whole_years, "year"),
            plural(remaining_months, "month")
        )
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
