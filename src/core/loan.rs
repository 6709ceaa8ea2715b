use super::error::ComparisonError;
use super::types::{Inputs, MONTHS_PER_YEAR};

/// Level monthly payment that amortizes `principal` to zero over `term_years`
/// with monthly compounding of `annual_rate / 12`.
pub fn monthly_payment(
    principal: f64,
    annual_rate: f64,
    term_years: u32,
) -> Result<f64, ComparisonError> {
    if term_years == 0 {
        return Err(ComparisonError::InvalidLoanTerm);
    }

    let periods = (term_years * MONTHS_PER_YEAR) as f64;
    let monthly_rate = annual_rate / MONTHS_PER_YEAR as f64;
    if monthly_rate.abs() < 1e-12 {
        return Ok(principal / periods);
    }

    let growth = (1.0 + monthly_rate).powf(periods);
    Ok(principal * monthly_rate * growth / (growth - 1.0))
}

/// Amount borrowed once the savings have gone into the deposit. Savings beyond
/// the price plus transfer cost leave nothing to borrow.
pub fn loan_principal(inputs: &Inputs) -> f64 {
    (inputs.house_purchase_price + inputs.transfer_cost - inputs.current_savings).max(0.0)
}

/// Savings left over after paying for the house outright, if any.
pub fn deposit_surplus(inputs: &Inputs) -> f64 {
    (inputs.current_savings - inputs.house_purchase_price - inputs.transfer_cost).max(0.0)
}
