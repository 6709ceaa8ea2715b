use std::fmt::Write;

use crate::core::{ComparisonResult, YearSnapshot};

const RULE_WIDTH: usize = 100;

/// `$1,234,567.89`, with the sign ahead of the dollar symbol.
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

pub fn insufficient_savings_line(percent: f64, required: f64) -> String {
    format!(
        "You need at least {percent}% of the house purchase price as savings to buy a house ({} NZD)",
        format_money(required)
    )
}

pub fn year_line(snapshot: &YearSnapshot) -> String {
    format!(
        "year {}: rent savings {}, buy savings {}, house value: {}",
        snapshot.year,
        format_money(snapshot.rent_savings),
        format_money(snapshot.buy_savings),
        format_money(snapshot.house_value)
    )
}

pub fn render_report(result: &ComparisonResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Loan amount: {}, monthly payments: {}",
        format_money(result.loan_amount),
        format_money(result.monthly_mortgage_payment)
    );
    for snapshot in &result.years {
        let _ = writeln!(out, "{}", year_line(snapshot));
    }

    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "Net worth for renting scenario: {}",
        format_money(result.rent_net_worth)
    );
    let _ = writeln!(
        out,
        "Net worth for buying scenario: {} + house value {}, which is now owned outright with a CGT of {}",
        format_money(result.buy_savings),
        format_money(result.house_value),
        format_money(result.capital_gains_liability)
    );
    let _ = writeln!(
        out,
        "Including house value in net worth, you'll be {} better off {} over a {} year period",
        format_money(result.margin),
        result.winner.label(),
        result.period_years
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Scenario;

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(999.999), "$1,000.00");
        assert_eq!(format_money(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_money(140_000.0), "$140,000.00");
        assert_eq!(format_money(-2_500.5), "-$2,500.50");
    }

    #[test]
    fn render_report_names_winner_and_margin() {
        let result = ComparisonResult {
            period_years: 2,
            loan_amount: 551_500.0,
            monthly_mortgage_payment: 2_890.12,
            years: vec![
                YearSnapshot {
                    year: 1,
                    rent_savings: 160_000.0,
                    buy_savings: 0.0,
                    house_value: 714_000.0,
                    weekly_rental_price: 624.0,
                },
                YearSnapshot {
                    year: 2,
                    rent_savings: 170_000.0,
                    buy_savings: 0.0,
                    house_value: 728_280.0,
                    weekly_rental_price: 648.96,
                },
            ],
            rent_net_worth: 170_000.0,
            buy_savings: 0.0,
            house_value: 728_280.0,
            capital_gains_liability: 0.0,
            buy_net_worth: 728_280.0,
            winner: Scenario::Buying,
            margin: 558_280.0,
        };

        let report = render_report(&result);
        let lines = report.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Loan amount: $551,500.00, monthly payments: $2,890.12");
        assert_eq!(
            lines[2],
            "year 2: rent savings $170,000.00, buy savings $0.00, house value: $728,280.00"
        );
        assert_eq!(
            lines.last().copied(),
            Some(
                "Including house value in net worth, you'll be $558,280.00 better off buying over a 2 year period"
            )
        );
    }

    #[test]
    fn insufficient_savings_line_states_threshold() {
        assert_eq!(
            insufficient_savings_line(20.0, 140_000.0),
            "You need at least 20% of the house purchase price as savings to buy a house ($140,000.00 NZD)"
        );
    }
}
