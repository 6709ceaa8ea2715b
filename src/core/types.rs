use serde::Serialize;

pub const MONTHS_PER_YEAR: u32 = 12;
pub const WEEKS_PER_YEAR: f64 = 52.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Renting,
    Buying,
}

impl Scenario {
    pub fn label(self) -> &'static str {
        match self {
            Scenario::Renting => "renting",
            Scenario::Buying => "buying",
        }
    }
}

/// Economic assumptions for one comparison. Rates and tax rates are fractions.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub current_savings: f64,
    pub house_purchase_price: f64,
    pub rental_price: f64,
    pub minimum_deposit: f64,
    pub transfer_cost: f64,
    pub house_insurance: f64,
    pub house_maintenance: f64,
    pub house_rates: f64,
    pub rental_increase: f64,
    pub mortgage_interest_rate: f64,
    pub savings_interest_rate: f64,
    pub savings_interest_tax: f64,
    pub capital_gains_rate: f64,
    pub capital_gains_tax: f64,
    pub boarders_contributions: f64,
    pub boarders_contributions_tax: f64,
    pub period_years: u32,
}

/// Running totals threaded through every monthly and yearly step.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub weekly_rental_price: f64,
    pub weekly_boarder_contribution: f64,
    pub house_value: f64,
    pub house_rates: f64,
    pub rent_savings: f64,
    pub buy_savings: f64,
}

/// What a single month moved between the two pools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthOutcome {
    pub rent_cost: f64,
    pub buy_cost: f64,
    pub leftover_cash: f64,
    pub cheaper: Scenario,
    pub boarder_income: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSnapshot {
    pub year: u32,
    pub rent_savings: f64,
    pub buy_savings: f64,
    pub house_value: f64,
    pub weekly_rental_price: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub period_years: u32,
    pub loan_amount: f64,
    pub monthly_mortgage_payment: f64,
    pub years: Vec<YearSnapshot>,
    pub rent_net_worth: f64,
    pub buy_savings: f64,
    pub house_value: f64,
    pub capital_gains_liability: f64,
    pub buy_net_worth: f64,
    pub winner: Scenario,
    pub margin: f64,
}
