use tracing::{debug, info};

use super::error::ComparisonError;
use super::loan::{deposit_surplus, loan_principal, monthly_payment};
use super::types::{
    ComparisonResult, Inputs, MONTHS_PER_YEAR, MonthOutcome, Scenario, SimulationState,
    WEEKS_PER_YEAR, YearSnapshot,
};

pub const MAX_PERIOD_YEARS: u32 = 100;

impl SimulationState {
    /// The renter keeps every dollar liquid; the buyer's savings go into the deposit.
    pub fn new(inputs: &Inputs) -> Self {
        Self {
            weekly_rental_price: inputs.rental_price,
            weekly_boarder_contribution: inputs.boarders_contributions,
            house_value: inputs.house_purchase_price,
            house_rates: inputs.house_rates,
            rent_savings: inputs.current_savings,
            buy_savings: deposit_surplus(inputs),
        }
    }

    pub fn rent_cost(&self) -> f64 {
        weekly_to_monthly(self.weekly_rental_price)
    }

    pub fn buy_cost(&self, inputs: &Inputs, monthly_mortgage_payment: f64) -> f64 {
        monthly_mortgage_payment
            + (inputs.house_insurance + inputs.house_maintenance + self.house_rates)
                / MONTHS_PER_YEAR as f64
    }

    fn snapshot(&self, year: u32) -> YearSnapshot {
        YearSnapshot {
            year,
            rent_savings: self.rent_savings,
            buy_savings: self.buy_savings,
            house_value: self.house_value,
            weekly_rental_price: self.weekly_rental_price,
        }
    }
}

pub fn validate_inputs(inputs: &Inputs) -> Result<(), ComparisonError> {
    if inputs.period_years == 0 || inputs.period_years > MAX_PERIOD_YEARS {
        return Err(ComparisonError::InvalidConfiguration(format!(
            "period_years must be between 1 and {MAX_PERIOD_YEARS}"
        )));
    }

    for (name, value) in [
        ("current_savings", inputs.current_savings),
        ("house_purchase_price", inputs.house_purchase_price),
        ("rental_price", inputs.rental_price),
        ("transfer_cost", inputs.transfer_cost),
        ("house_insurance", inputs.house_insurance),
        ("house_maintenance", inputs.house_maintenance),
        ("house_rates", inputs.house_rates),
        ("boarders_contributions", inputs.boarders_contributions),
        ("rental_increase", inputs.rental_increase),
        ("mortgage_interest_rate", inputs.mortgage_interest_rate),
        ("savings_interest_rate", inputs.savings_interest_rate),
        ("capital_gains_rate", inputs.capital_gains_rate),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ComparisonError::InvalidConfiguration(format!(
                "{name} must be >= 0"
            )));
        }
    }

    for (name, fraction) in [
        ("minimum_deposit", inputs.minimum_deposit),
        ("savings_interest_tax", inputs.savings_interest_tax),
        ("capital_gains_tax", inputs.capital_gains_tax),
        ("boarders_contributions_tax", inputs.boarders_contributions_tax),
    ] {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ComparisonError::InvalidConfiguration(format!(
                "{name} must be between 0 and 1"
            )));
        }
    }

    Ok(())
}

/// Guard run before any simulation: savings must cover the minimum deposit.
pub fn check_deposit(inputs: &Inputs) -> Result<(), ComparisonError> {
    let required = inputs.minimum_deposit * inputs.house_purchase_price;
    if inputs.current_savings < required {
        return Err(ComparisonError::InsufficientSavings {
            percent: (inputs.minimum_deposit * 10_000.0).round() / 100.0,
            required,
            available: inputs.current_savings,
        });
    }
    Ok(())
}

/// One month of both scenarios. Interest is credited to both pools first, then
/// the cost difference goes to the cheaper scenario and boarder income to the buyer.
pub fn advance_month(
    state: &mut SimulationState,
    inputs: &Inputs,
    monthly_mortgage_payment: f64,
) -> MonthOutcome {
    let rent_cost = state.rent_cost();
    let buy_cost = state.buy_cost(inputs, monthly_mortgage_payment);

    let monthly_rate = inputs.savings_interest_rate / MONTHS_PER_YEAR as f64;
    state.rent_savings = invest_savings(state.rent_savings, monthly_rate, inputs.savings_interest_tax);
    state.buy_savings = invest_savings(state.buy_savings, monthly_rate, inputs.savings_interest_tax);

    // Ties bank with the renter.
    let leftover_cash = (rent_cost - buy_cost).abs();
    let cheaper = if rent_cost < buy_cost {
        state.rent_savings += leftover_cash;
        Scenario::Renting
    } else if buy_cost < rent_cost {
        state.buy_savings += leftover_cash;
        Scenario::Buying
    } else {
        state.rent_savings += leftover_cash;
        Scenario::Renting
    };

    let boarder_income = weekly_to_monthly(state.weekly_boarder_contribution)
        * (1.0 - inputs.boarders_contributions_tax);
    state.buy_savings += boarder_income;

    MonthOutcome {
        rent_cost,
        buy_cost,
        leftover_cash,
        cheaper,
        boarder_income,
    }
}

/// Annual escalation: boarders track the rental market, rates track the house value.
pub fn advance_year(state: &mut SimulationState, inputs: &Inputs) {
    state.weekly_rental_price *= 1.0 + inputs.rental_increase;
    state.weekly_boarder_contribution *= 1.0 + inputs.rental_increase;
    state.house_value *= 1.0 + inputs.capital_gains_rate;
    state.house_rates *= 1.0 + inputs.capital_gains_rate;
}

/// Larger net worth wins; an exact tie goes to buying.
pub fn compare_net_worth(rent_net_worth: f64, buy_net_worth: f64) -> (Scenario, f64) {
    if rent_net_worth > buy_net_worth {
        (Scenario::Renting, rent_net_worth - buy_net_worth)
    } else {
        (Scenario::Buying, buy_net_worth - rent_net_worth)
    }
}

pub fn run_simulation(inputs: &Inputs) -> Result<ComparisonResult, ComparisonError> {
    validate_inputs(inputs)?;
    check_deposit(inputs)?;

    let loan_amount = loan_principal(inputs);
    let monthly_mortgage_payment =
        monthly_payment(loan_amount, inputs.mortgage_interest_rate, inputs.period_years)?;
    info!(loan_amount, monthly_mortgage_payment, "sized mortgage");

    let mut state = SimulationState::new(inputs);
    let mut years = Vec::with_capacity(inputs.period_years as usize);
    for year in 1..=inputs.period_years {
        for _ in 0..MONTHS_PER_YEAR {
            advance_month(&mut state, inputs, monthly_mortgage_payment);
        }
        advance_year(&mut state, inputs);

        let snapshot = state.snapshot(year);
        debug!(
            year,
            rent_savings = snapshot.rent_savings,
            buy_savings = snapshot.buy_savings,
            house_value = snapshot.house_value,
            "simulated year"
        );
        years.push(snapshot);
    }

    let capital_gains_liability = state.house_value * inputs.capital_gains_tax;
    let buy_net_worth = state.buy_savings + state.house_value - capital_gains_liability;
    let (winner, margin) = compare_net_worth(state.rent_savings, buy_net_worth);

    Ok(ComparisonResult {
        period_years: inputs.period_years,
        loan_amount,
        monthly_mortgage_payment,
        years,
        rent_net_worth: state.rent_savings,
        buy_savings: state.buy_savings,
        house_value: state.house_value,
        capital_gains_liability,
        buy_net_worth,
        winner,
        margin,
    })
}

fn invest_savings(savings: f64, monthly_rate: f64, tax_rate: f64) -> f64 {
    let savings_yield = savings * monthly_rate;
    savings + savings_yield * (1.0 - tax_rate)
}

fn weekly_to_monthly(weekly: f64) -> f64 {
    weekly * WEEKS_PER_YEAR / MONTHS_PER_YEAR as f64
}
