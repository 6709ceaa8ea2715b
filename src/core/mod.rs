mod engine;
mod error;
mod loan;
mod types;

pub use engine::{
    MAX_PERIOD_YEARS, advance_month, advance_year, check_deposit, compare_net_worth,
    run_simulation, validate_inputs,
};
pub use error::ComparisonError;
pub use loan::{loan_principal, monthly_payment};
pub use types::{
    ComparisonResult, Inputs, MonthOutcome, Scenario, SimulationState, YearSnapshot,
};
