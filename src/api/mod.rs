pub mod report;

use axum::{
    Router,
    extract::{Json, Query},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::process::ExitCode;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{ComparisonError, ComparisonResult, Inputs, MAX_PERIOD_YEARS, run_simulation};
use report::{insufficient_savings_line, render_report};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    current_savings: Option<f64>,
    house_purchase_price: Option<f64>,
    rental_price: Option<f64>,
    minimum_deposit: Option<f64>,
    transfer_cost: Option<f64>,
    house_insurance: Option<f64>,
    house_maintenance: Option<f64>,
    house_rates: Option<f64>,
    rental_increase: Option<f64>,
    mortgage_interest_rate: Option<f64>,
    savings_interest_rate: Option<f64>,
    savings_interest_tax: Option<f64>,
    capital_gains_rate: Option<f64>,
    capital_gains_tax: Option<f64>,
    boarders_contributions: Option<f64>,
    boarders_contributions_tax: Option<f64>,
    period_years: Option<u32>,
}

#[derive(Parser, Debug)]
#[command(
    name = "buy-vs-rent",
    about = "Compare renting vs buying a house over a multi-year period"
)]
pub struct Cli {
    #[arg(long, help = "Current savings in NZD")]
    current_savings: f64,
    #[arg(long, help = "House purchase price in NZD")]
    house_purchase_price: f64,
    #[arg(long, help = "Weekly rental price in NZD")]
    rental_price: f64,
    #[arg(
        long,
        default_value_t = 0.2,
        help = "Minimum deposit required to buy a house, as a fraction of the price"
    )]
    minimum_deposit: f64,
    #[arg(
        long,
        default_value_t = 1500.0,
        help = "Cost of house transfer in NZD, such as legal fees"
    )]
    transfer_cost: f64,
    #[arg(long, default_value_t = 1000.0, help = "Annual house insurance in NZD")]
    house_insurance: f64,
    #[arg(long, default_value_t = 1000.0, help = "Annual house maintenance in NZD")]
    house_maintenance: f64,
    #[arg(long, default_value_t = 2000.0, help = "Annual house rates in NZD")]
    house_rates: f64,
    #[arg(long, default_value_t = 0.04, help = "Annual rental price increase")]
    rental_increase: f64,
    #[arg(long, default_value_t = 0.0479, help = "Annual mortgage interest rate")]
    mortgage_interest_rate: f64,
    #[arg(long, default_value_t = 0.06, help = "Annual savings interest rate")]
    savings_interest_rate: f64,
    #[arg(long, default_value_t = 0.33, help = "Tax rate for savings interest")]
    savings_interest_tax: f64,
    #[arg(long, default_value_t = 0.02, help = "Annual capital gains rate")]
    capital_gains_rate: f64,
    #[arg(long, default_value_t = 0.0, help = "Tax rate for capital gains")]
    capital_gains_tax: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Weekly contributions from boarders in NZD"
    )]
    boarders_contributions: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Tax rate for boarders contributions"
    )]
    boarders_contributions_tax: f64,
    #[arg(long, default_value_t = 30, help = "Period to compare in years")]
    period_years: u32,
    #[arg(long, help = "Print the comparison as JSON instead of a text report")]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsufficientSavingsResponse {
    error: String,
    required_savings: f64,
    current_savings: f64,
}

#[derive(Debug)]
enum SimulateFailure {
    BadRequest(String),
    InsufficientSavings {
        message: String,
        required: f64,
        available: f64,
    },
}

fn build_inputs(cli: Cli) -> Result<Inputs, String> {
    if cli.period_years == 0 || cli.period_years > MAX_PERIOD_YEARS {
        return Err(format!(
            "--period-years must be between 1 and {MAX_PERIOD_YEARS}"
        ));
    }

    if !cli.house_purchase_price.is_finite() || cli.house_purchase_price <= 0.0 {
        return Err("--house-purchase-price must be > 0".to_string());
    }

    for (name, amount) in [
        ("--current-savings", cli.current_savings),
        ("--rental-price", cli.rental_price),
        ("--transfer-cost", cli.transfer_cost),
        ("--house-insurance", cli.house_insurance),
        ("--house-maintenance", cli.house_maintenance),
        ("--house-rates", cli.house_rates),
        ("--boarders-contributions", cli.boarders_contributions),
    ] {
        if !amount.is_finite() || amount < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    for (name, rate) in [
        ("--rental-increase", cli.rental_increase),
        ("--mortgage-interest-rate", cli.mortgage_interest_rate),
        ("--savings-interest-rate", cli.savings_interest_rate),
        ("--capital-gains-rate", cli.capital_gains_rate),
    ] {
        if !rate.is_finite() || rate < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    for (name, fraction) in [
        ("--minimum-deposit", cli.minimum_deposit),
        ("--savings-interest-tax", cli.savings_interest_tax),
        ("--capital-gains-tax", cli.capital_gains_tax),
        ("--boarders-contributions-tax", cli.boarders_contributions_tax),
    ] {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(format!("{name} must be between 0 and 1"));
        }
    }

    Ok(Inputs {
        current_savings: cli.current_savings,
        house_purchase_price: cli.house_purchase_price,
        rental_price: cli.rental_price,
        minimum_deposit: cli.minimum_deposit,
        transfer_cost: cli.transfer_cost,
        house_insurance: cli.house_insurance,
        house_maintenance: cli.house_maintenance,
        house_rates: cli.house_rates,
        rental_increase: cli.rental_increase,
        mortgage_interest_rate: cli.mortgage_interest_rate,
        savings_interest_rate: cli.savings_interest_rate,
        savings_interest_tax: cli.savings_interest_tax,
        capital_gains_rate: cli.capital_gains_rate,
        capital_gains_tax: cli.capital_gains_tax,
        boarders_contributions: cli.boarders_contributions,
        boarders_contributions_tax: cli.boarders_contributions_tax,
        period_years: cli.period_years,
    })
}

/// Runs a single comparison from the command line and prints the report.
pub fn run_cli(cli: Cli) -> ExitCode {
    match render_comparison(cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::FAILURE
        }
    }
}

fn render_comparison(cli: Cli) -> Result<String, String> {
    let as_json = cli.json;
    let inputs = build_inputs(cli)?;
    match run_simulation(&inputs) {
        Ok(result) if as_json => serde_json::to_string_pretty(&result)
            .map(|json| format!("{json}\n"))
            .map_err(|e| format!("failed to serialize comparison: {e}")),
        Ok(result) => Ok(render_report(&result)),
        Err(ComparisonError::InsufficientSavings {
            percent, required, ..
        }) => Ok(format!("{}\n", insufficient_savings_line(percent, required))),
        Err(e) => Err(e.to_string()),
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "buy-vs-rent HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/api/simulate");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    match simulate_payload(payload) {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(SimulateFailure::BadRequest(msg)) => {
            warn!(%msg, "rejected simulation request");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
        Err(SimulateFailure::InsufficientSavings {
            message,
            required,
            available,
        }) => json_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            InsufficientSavingsResponse {
                error: message,
                required_savings: required,
                current_savings: available,
            },
        ),
    }
}

fn simulate_payload(payload: SimulatePayload) -> Result<ComparisonResult, SimulateFailure> {
    let inputs = inputs_from_payload(payload).map_err(SimulateFailure::BadRequest)?;
    run_simulation(&inputs).map_err(|e| match e {
        ComparisonError::InsufficientSavings {
            percent,
            required,
            available,
        } => SimulateFailure::InsufficientSavings {
            message: insufficient_savings_line(percent, required),
            required,
            available,
        },
        other => SimulateFailure::BadRequest(other.to_string()),
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: SimulatePayload) -> Result<Inputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.current_savings {
        cli.current_savings = v;
    }
    if let Some(v) = payload.house_purchase_price {
        cli.house_purchase_price = v;
    }
    if let Some(v) = payload.rental_price {
        cli.rental_price = v;
    }
    if let Some(v) = payload.minimum_deposit {
        cli.minimum_deposit = v;
    }
    if let Some(v) = payload.transfer_cost {
        cli.transfer_cost = v;
    }
    if let Some(v) = payload.house_insurance {
        cli.house_insurance = v;
    }
    if let Some(v) = payload.house_maintenance {
        cli.house_maintenance = v;
    }
    if let Some(v) = payload.house_rates {
        cli.house_rates = v;
    }
    if let Some(v) = payload.rental_increase {
        cli.rental_increase = v;
    }
    if let Some(v) = payload.mortgage_interest_rate {
        cli.mortgage_interest_rate = v;
    }
    if let Some(v) = payload.savings_interest_rate {
        cli.savings_interest_rate = v;
    }
    if let Some(v) = payload.savings_interest_tax {
        cli.savings_interest_tax = v;
    }
    if let Some(v) = payload.capital_gains_rate {
        cli.capital_gains_rate = v;
    }
    if let Some(v) = payload.capital_gains_tax {
        cli.capital_gains_tax = v;
    }
    if let Some(v) = payload.boarders_contributions {
        cli.boarders_contributions = v;
    }
    if let Some(v) = payload.boarders_contributions_tax {
        cli.boarders_contributions_tax = v;
    }
    if let Some(v) = payload.period_years {
        cli.period_years = v;
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        current_savings: 150_000.0,
        house_purchase_price: 700_000.0,
        rental_price: 600.0,
        minimum_deposit: 0.2,
        transfer_cost: 1_500.0,
        house_insurance: 1_000.0,
        house_maintenance: 1_000.0,
        house_rates: 2_000.0,
        rental_increase: 0.04,
        mortgage_interest_rate: 0.0479,
        savings_interest_rate: 0.06,
        savings_interest_tax: 0.33,
        capital_gains_rate: 0.02,
        capital_gains_tax: 0.0,
        boarders_contributions: 0.0,
        boarders_contributions_tax: 0.0,
        period_years: 30,
        json: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Scenario;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    #[test]
    fn cli_parses_required_flags_and_defaults() {
        let cli = Cli::try_parse_from([
            "buy-vs-rent",
            "--current-savings",
            "150000",
            "--house-purchase-price",
            "700000",
            "--rental-price",
            "600",
        ])
        .expect("required flags present");
        let inputs = build_inputs(cli).expect("valid inputs");

        assert_approx(inputs.current_savings, 150_000.0);
        assert_approx(inputs.minimum_deposit, 0.2);
        assert_approx(inputs.transfer_cost, 1_500.0);
        assert_approx(inputs.mortgage_interest_rate, 0.0479);
        assert_approx(inputs.savings_interest_tax, 0.33);
        assert_approx(inputs.capital_gains_tax, 0.0);
        assert_eq!(inputs.period_years, 30);
    }

    #[test]
    fn cli_requires_rental_price() {
        let err = Cli::try_parse_from([
            "buy-vs-rent",
            "--current-savings",
            "150000",
            "--house-purchase-price",
            "700000",
        ])
        .expect_err("rental price is required");
        assert!(err.to_string().contains("--rental-price"));
    }

    #[test]
    fn build_inputs_rejects_zero_period() {
        let mut cli = sample_cli();
        cli.period_years = 0;
        let err = build_inputs(cli).expect_err("must reject zero period");
        assert!(err.contains("--period-years"));
    }

    #[test]
    fn build_inputs_rejects_negative_money() {
        let mut cli = sample_cli();
        cli.house_rates = -10.0;
        let err = build_inputs(cli).expect_err("must reject negative rates bill");
        assert!(err.contains("--house-rates"));
    }

    #[test]
    fn build_inputs_rejects_tax_above_one() {
        let mut cli = sample_cli();
        cli.savings_interest_tax = 33.0;
        let err = build_inputs(cli).expect_err("must reject percent-style tax");
        assert!(err.contains("--savings-interest-tax"));
    }

    #[test]
    fn inputs_from_json_overrides_defaults() {
        let json = r#"{
          "currentSavings": 200000,
          "housePurchasePrice": 850000,
          "rentalPrice": 720,
          "boardersContributions": 150,
          "boardersContributionsTax": 0.17,
          "capitalGainsTax": 0.1,
          "periodYears": 25
        }"#;
        let inputs = inputs_from_json(json).expect("json should parse");

        assert_approx(inputs.current_savings, 200_000.0);
        assert_approx(inputs.house_purchase_price, 850_000.0);
        assert_approx(inputs.rental_price, 720.0);
        assert_approx(inputs.boarders_contributions, 150.0);
        assert_approx(inputs.boarders_contributions_tax, 0.17);
        assert_approx(inputs.capital_gains_tax, 0.1);
        assert_eq!(inputs.period_years, 25);
        assert_approx(inputs.house_insurance, 1_000.0);
    }

    #[test]
    fn simulate_payload_reports_insufficient_savings() {
        let payload = SimulatePayload {
            current_savings: Some(50_000.0),
            ..SimulatePayload::default()
        };
        match simulate_payload(payload) {
            Err(SimulateFailure::InsufficientSavings {
                message,
                required,
                available,
            }) => {
                assert_approx(required, 140_000.0);
                assert_approx(available, 50_000.0);
                assert!(message.contains("$140,000.00"));
            }
            other => panic!("expected insufficient savings, got {other:?}"),
        }
    }

    #[test]
    fn simulate_payload_rejects_invalid_configuration() {
        let payload = SimulatePayload {
            period_years: Some(0),
            ..SimulatePayload::default()
        };
        assert!(matches!(
            simulate_payload(payload),
            Err(SimulateFailure::BadRequest(_))
        ));
    }

    #[test]
    fn simulate_response_serialization_contains_expected_fields() {
        let payload = SimulatePayload {
            period_years: Some(2),
            ..SimulatePayload::default()
        };
        let result = simulate_payload(payload).expect("default payload is valid");
        assert_eq!(result.years.len(), 2);
        assert!(matches!(result.winner, Scenario::Renting | Scenario::Buying));

        let json = serde_json::to_string(&result).expect("response should serialize");
        assert!(json.contains("\"years\""));
        assert!(json.contains("\"rentSavings\""));
        assert!(json.contains("\"buyNetWorth\""));
        assert!(json.contains("\"capitalGainsLiability\""));
        assert!(json.contains("\"monthlyMortgagePayment\""));
        assert!(json.contains("\"winner\":\""));
    }

    #[test]
    fn render_comparison_prints_guard_message_without_figures() {
        let mut cli = sample_cli();
        cli.current_savings = 100_000.0;
        let output = render_comparison(cli).expect("guard failure is not an error");
        assert_eq!(
            output,
            "You need at least 20% of the house purchase price as savings to buy a house ($140,000.00 NZD)\n"
        );
    }

    #[test]
    fn render_comparison_text_report_has_one_line_per_year() {
        let mut cli = sample_cli();
        cli.period_years = 3;
        let output = render_comparison(cli).expect("valid comparison");
        let year_lines = output.lines().filter(|l| l.starts_with("year ")).count();
        assert_eq!(year_lines, 3);
        assert!(output.starts_with("Loan amount: $551,500.00"));
        assert!(output.contains("better off"));
    }

    #[test]
    fn render_comparison_json_mode_emits_parseable_json() {
        let mut cli = sample_cli();
        cli.period_years = 1;
        cli.json = true;
        let output = render_comparison(cli).expect("valid comparison");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["periodYears"], 1);
        assert_eq!(value["years"].as_array().map(Vec::len), Some(1));
    }
}
