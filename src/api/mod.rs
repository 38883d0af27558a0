use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    BalanceSummary, CalcError, CalcResult, ChartPoint, InvestmentInputs, InvestmentMode,
    InvestmentOutcome, LeverageInputs, LeverageScenario, LeverageSummary, RetirementInputs,
    RetirementPlan, StrategyProjection, capital_growth_curve, compare_strategies,
    format_compact_currency, format_currency, format_percentage, investment_curve, ltv_scenarios,
    plan_retirement, run_investment, summarize,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliInvestmentMode {
    EndAmount,
    AdditionalContribution,
    ReturnRate,
    StartingAmount,
    InvestmentLength,
}

impl From<CliInvestmentMode> for InvestmentMode {
    fn from(value: CliInvestmentMode) -> Self {
        match value {
            CliInvestmentMode::EndAmount => InvestmentMode::EndAmount,
            CliInvestmentMode::AdditionalContribution => InvestmentMode::AdditionalContribution,
            CliInvestmentMode::ReturnRate => InvestmentMode::ReturnRate,
            CliInvestmentMode::StartingAmount => InvestmentMode::StartingAmount,
            CliInvestmentMode::InvestmentLength => InvestmentMode::InvestmentLength,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiInvestmentMode {
    #[serde(alias = "endAmount", alias = "end_amount", alias = "end")]
    EndAmount,
    #[serde(
        alias = "additionalContribution",
        alias = "additional_contribution",
        alias = "contribution"
    )]
    AdditionalContribution,
    #[serde(alias = "returnRate", alias = "return_rate", alias = "rate")]
    ReturnRate,
    #[serde(alias = "startingAmount", alias = "starting_amount", alias = "start")]
    StartingAmount,
    #[serde(alias = "investmentLength", alias = "investment_length", alias = "length")]
    InvestmentLength,
}

impl From<ApiInvestmentMode> for CliInvestmentMode {
    fn from(value: ApiInvestmentMode) -> Self {
        match value {
            ApiInvestmentMode::EndAmount => CliInvestmentMode::EndAmount,
            ApiInvestmentMode::AdditionalContribution => CliInvestmentMode::AdditionalContribution,
            ApiInvestmentMode::ReturnRate => CliInvestmentMode::ReturnRate,
            ApiInvestmentMode::StartingAmount => CliInvestmentMode::StartingAmount,
            ApiInvestmentMode::InvestmentLength => CliInvestmentMode::InvestmentLength,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InvestmentPayload {
    mode: Option<ApiInvestmentMode>,
    starting_amount: Option<f64>,
    monthly_contribution: Option<f64>,
    target_amount: Option<f64>,
    return_rate: Option<f64>,
    years: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementPayload {
    desired_income: Option<f64>,
    current_assets: Option<f64>,
    years_to_retirement: Option<u32>,
    interest_rate: Option<f64>,
    withdrawal_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BuyBorrowDiePayload {
    asset_value: Option<f64>,
    loan_to_value: Option<f64>,
    interest_rate: Option<f64>,
    asset_growth_rate: Option<f64>,
    desired_monthly_income: Option<f64>,
    years_to_project: Option<u32>,
}

/// Investment calculator flags. Rates are in percent.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct InvestmentArgs {
    #[arg(long, value_enum, default_value_t = CliInvestmentMode::EndAmount)]
    pub mode: CliInvestmentMode,
    #[arg(long, default_value_t = 10_000.0)]
    pub starting_amount: f64,
    #[arg(long, default_value_t = 500.0)]
    pub monthly_contribution: f64,
    #[arg(long, default_value_t = 1_000_000.0)]
    pub target_amount: f64,
    #[arg(long, default_value_t = 7.0, help = "Expected annual return in percent, e.g. 7")]
    pub return_rate: f64,
    #[arg(long, default_value_t = 20.0)]
    pub years: f64,
}

impl Default for InvestmentArgs {
    fn default() -> Self {
        Self {
            mode: CliInvestmentMode::EndAmount,
            starting_amount: 10_000.0,
            monthly_contribution: 500.0,
            target_amount: 1_000_000.0,
            return_rate: 7.0,
            years: 20.0,
        }
    }
}

/// Retirement planner flags. Rates are in percent.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct RetirementArgs {
    #[arg(long, default_value_t = 80_000.0, help = "Desired annual income in retirement")]
    pub desired_income: f64,
    #[arg(long, default_value_t = 50_000.0)]
    pub current_assets: f64,
    #[arg(long, default_value_t = 25)]
    pub years_to_retirement: u32,
    #[arg(long, default_value_t = 7.0, help = "Expected annual return in percent")]
    pub interest_rate: f64,
    #[arg(long, default_value_t = 4.0, help = "Safe withdrawal rate in percent")]
    pub withdrawal_rate: f64,
}

impl Default for RetirementArgs {
    fn default() -> Self {
        Self {
            desired_income: 80_000.0,
            current_assets: 50_000.0,
            years_to_retirement: 25,
            interest_rate: 7.0,
            withdrawal_rate: 4.0,
        }
    }
}

/// Buy-borrow-die flags. Rates and loan-to-value are in percent.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct BuyBorrowDieArgs {
    #[arg(long, default_value_t = 1_000_000.0)]
    pub asset_value: f64,
    #[arg(long, default_value_t = 50.0)]
    pub loan_to_value: f64,
    #[arg(long, default_value_t = 6.0, help = "Annual borrowing rate in percent")]
    pub interest_rate: f64,
    #[arg(long, default_value_t = 7.0, help = "Annual asset growth in percent")]
    pub asset_growth_rate: f64,
    #[arg(long, default_value_t = 5_000.0)]
    pub desired_monthly_income: f64,
    #[arg(long, default_value_t = 30)]
    pub years_to_project: u32,
}

impl Default for BuyBorrowDieArgs {
    fn default() -> Self {
        Self {
            asset_value: 1_000_000.0,
            loan_to_value: 50.0,
            interest_rate: 6.0,
            asset_growth_rate: 7.0,
            desired_monthly_income: 5_000.0,
            years_to_project: 30,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedSummary {
    end_amount: String,
    starting_amount: String,
    total_contributions: String,
    total_interest: String,
    shares: [String; 3],
}

impl From<&BalanceSummary> for FormattedSummary {
    fn from(summary: &BalanceSummary) -> Self {
        Self {
            end_amount: format_currency(summary.end_amount),
            starting_amount: format_currency(summary.starting_amount),
            total_contributions: format_currency(summary.total_contributions),
            total_interest: format_currency(summary.total_interest),
            shares: summary.shares().map(format_percentage),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentResponse {
    #[serde(flatten)]
    outcome: InvestmentOutcome,
    formatted: Option<FormattedSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedRetirementPlan {
    total_needed: String,
    future_current_assets: String,
    monthly_investment: String,
    total_invested: String,
    investment_growth: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementResponse {
    plan: RetirementPlan,
    formatted: FormattedRetirementPlan,
    investment_curve: Vec<ChartPoint>,
    capital_growth_curve: Vec<ChartPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRow {
    #[serde(flatten)]
    scenario: LeverageScenario,
    loan_amount_text: String,
    monthly_interest_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRow {
    #[serde(flatten)]
    projection: StrategyProjection,
    label: &'static str,
    net_worth_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyBorrowDieResponse {
    summary: LeverageSummary,
    scenarios: Vec<ScenarioRow>,
    strategies: Vec<StrategyRow>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn build_investment_inputs(args: &InvestmentArgs) -> (InvestmentMode, InvestmentInputs) {
    (
        args.mode.into(),
        InvestmentInputs {
            starting_amount: args.starting_amount,
            monthly_contribution: args.monthly_contribution,
            target_amount: args.target_amount,
            return_rate: args.return_rate,
            years: args.years,
        },
    )
}

fn build_retirement_inputs(args: &RetirementArgs) -> CalcResult<RetirementInputs> {
    if !args.desired_income.is_finite() || args.desired_income < 0.0 {
        return Err(CalcError::invalid("--desired-income must be >= 0"));
    }
    if !args.current_assets.is_finite() || args.current_assets < 0.0 {
        return Err(CalcError::invalid("--current-assets must be >= 0"));
    }
    if !args.interest_rate.is_finite() || args.interest_rate <= -100.0 {
        return Err(CalcError::invalid("--interest-rate must be > -100"));
    }
    if !args.withdrawal_rate.is_finite() || args.withdrawal_rate <= 0.0 {
        return Err(CalcError::invalid("--withdrawal-rate must be > 0"));
    }

    Ok(RetirementInputs {
        desired_annual_income: args.desired_income,
        current_assets: args.current_assets,
        years_to_retirement: args.years_to_retirement,
        annual_return: args.interest_rate / 100.0,
        withdrawal_rate: args.withdrawal_rate / 100.0,
    })
}

fn build_leverage_inputs(args: &BuyBorrowDieArgs) -> CalcResult<LeverageInputs> {
    if !args.asset_value.is_finite() || args.asset_value < 0.0 {
        return Err(CalcError::invalid("--asset-value must be >= 0"));
    }
    if !(args.loan_to_value > 0.0 && args.loan_to_value <= 100.0) {
        return Err(CalcError::invalid("--loan-to-value must be > 0 and <= 100"));
    }
    if !args.interest_rate.is_finite() || args.interest_rate <= 0.0 {
        return Err(CalcError::invalid("--interest-rate must be > 0"));
    }
    if !args.asset_growth_rate.is_finite() || args.asset_growth_rate <= -100.0 {
        return Err(CalcError::invalid("--asset-growth-rate must be > -100"));
    }
    if !args.desired_monthly_income.is_finite() || args.desired_monthly_income < 0.0 {
        return Err(CalcError::invalid("--desired-monthly-income must be >= 0"));
    }

    Ok(LeverageInputs {
        asset_value: args.asset_value,
        loan_to_value: args.loan_to_value / 100.0,
        annual_interest_rate: args.interest_rate / 100.0,
        asset_growth_rate: args.asset_growth_rate / 100.0,
        desired_monthly_income: args.desired_monthly_income,
        years_to_project: args.years_to_project,
    })
}

pub fn investment_response(args: &InvestmentArgs) -> CalcResult<InvestmentResponse> {
    let (mode, inputs) = build_investment_inputs(args);
    let outcome = run_investment(mode, &inputs)?;
    info!(?mode, headline = %outcome.headline_text, "investment calculated");
    let formatted = outcome.summary.as_ref().map(FormattedSummary::from);
    Ok(InvestmentResponse { outcome, formatted })
}

pub fn retirement_response(args: &RetirementArgs) -> CalcResult<RetirementResponse> {
    let inputs = build_retirement_inputs(args)?;
    let plan = plan_retirement(&inputs)?;
    info!(
        total_needed = plan.total_needed,
        monthly_investment = plan.monthly_investment,
        "retirement plan calculated"
    );

    let formatted = FormattedRetirementPlan {
        total_needed: format_currency(plan.total_needed),
        future_current_assets: format_currency(plan.future_current_assets),
        monthly_investment: format_currency(plan.monthly_investment),
        total_invested: format_currency(plan.total_invested),
        investment_growth: format_currency(plan.investment_growth),
    };
    Ok(RetirementResponse {
        investment_curve: investment_curve(
            plan.total_needed,
            inputs.annual_return,
            inputs.current_assets,
        ),
        capital_growth_curve: capital_growth_curve(
            plan.total_needed,
            inputs.annual_return,
            inputs.current_assets,
        ),
        plan,
        formatted,
    })
}

pub fn buy_borrow_die_response(args: &BuyBorrowDieArgs) -> CalcResult<BuyBorrowDieResponse> {
    let inputs = build_leverage_inputs(args)?;
    let strategies = compare_strategies(&inputs)?;
    let summary = summarize(&inputs);
    info!(
        max_loan_amount = summary.max_loan_amount,
        years = inputs.years_to_project,
        "buy-borrow-die projection calculated"
    );

    let scenarios = ltv_scenarios(inputs.asset_value, inputs.annual_interest_rate)
        .into_iter()
        .map(|scenario| ScenarioRow {
            loan_amount_text: format_compact_currency(scenario.loan_amount),
            monthly_interest_text: format_currency(scenario.monthly_interest),
            scenario,
        })
        .collect();
    let strategies = strategies
        .into_iter()
        .map(|projection| StrategyRow {
            label: projection.strategy.label(),
            net_worth_text: format_compact_currency(projection.net_worth),
            projection,
        })
        .collect();

    Ok(BuyBorrowDieResponse {
        summary,
        scenarios,
        strategies,
    })
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/investment",
            get(investment_get_handler).post(investment_post_handler),
        )
        .route(
            "/api/retirement",
            get(retirement_get_handler).post(retirement_post_handler),
        )
        .route(
            "/api/buy-borrow-die",
            get(buy_borrow_die_get_handler).post(buy_borrow_die_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("finplan HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/health");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn investment_get_handler(
    payload: Result<Query<InvestmentPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => investment_handler_impl(payload).await,
        Err(rejection) => rejected_payload(&rejection.body_text()),
    }
}

async fn investment_post_handler(
    payload: Result<Json<InvestmentPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => investment_handler_impl(payload).await,
        Err(rejection) => rejected_payload(&rejection.body_text()),
    }
}

async fn investment_handler_impl(payload: InvestmentPayload) -> Response {
    respond(investment_response(&investment_args_from_payload(payload)))
}

async fn retirement_get_handler(
    payload: Result<Query<RetirementPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => retirement_handler_impl(payload).await,
        Err(rejection) => rejected_payload(&rejection.body_text()),
    }
}

async fn retirement_post_handler(
    payload: Result<Json<RetirementPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => retirement_handler_impl(payload).await,
        Err(rejection) => rejected_payload(&rejection.body_text()),
    }
}

async fn retirement_handler_impl(payload: RetirementPayload) -> Response {
    respond(retirement_response(&retirement_args_from_payload(payload)))
}

async fn buy_borrow_die_get_handler(
    payload: Result<Query<BuyBorrowDiePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => buy_borrow_die_handler_impl(payload).await,
        Err(rejection) => rejected_payload(&rejection.body_text()),
    }
}

async fn buy_borrow_die_post_handler(
    payload: Result<Json<BuyBorrowDiePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => buy_borrow_die_handler_impl(payload).await,
        Err(rejection) => rejected_payload(&rejection.body_text()),
    }
}

async fn buy_borrow_die_handler_impl(payload: BuyBorrowDiePayload) -> Response {
    respond(buy_borrow_die_response(&buy_borrow_die_args_from_payload(
        payload,
    )))
}

fn rejected_payload(msg: &str) -> Response {
    warn!(error = %msg, "malformed calculator payload");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn respond<T: Serialize>(result: CalcResult<T>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => {
            warn!(error = %err, "rejected calculator request");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
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

fn investment_args_from_payload(payload: InvestmentPayload) -> InvestmentArgs {
    let mut args = InvestmentArgs::default();
    if let Some(v) = payload.mode {
        args.mode = v.into();
    }
    if let Some(v) = payload.starting_amount {
        args.starting_amount = v;
    }
    if let Some(v) = payload.monthly_contribution {
        args.monthly_contribution = v;
    }
    if let Some(v) = payload.target_amount {
        args.target_amount = v;
    }
    if let Some(v) = payload.return_rate {
        args.return_rate = v;
    }
    if let Some(v) = payload.years {
        args.years = v;
    }
    args
}

fn retirement_args_from_payload(payload: RetirementPayload) -> RetirementArgs {
    let mut args = RetirementArgs::default();
    if let Some(v) = payload.desired_income {
        args.desired_income = v;
    }
    if let Some(v) = payload.current_assets {
        args.current_assets = v;
    }
    if let Some(v) = payload.years_to_retirement {
        args.years_to_retirement = v;
    }
    if let Some(v) = payload.interest_rate {
        args.interest_rate = v;
    }
    if let Some(v) = payload.withdrawal_rate {
        args.withdrawal_rate = v;
    }
    args
}

fn buy_borrow_die_args_from_payload(payload: BuyBorrowDiePayload) -> BuyBorrowDieArgs {
    let mut args = BuyBorrowDieArgs::default();
    if let Some(v) = payload.asset_value {
        args.asset_value = v;
    }
    if let Some(v) = payload.loan_to_value {
        args.loan_to_value = v;
    }
    if let Some(v) = payload.interest_rate {
        args.interest_rate = v;
    }
    if let Some(v) = payload.asset_growth_rate {
        args.asset_growth_rate = v;
    }
    if let Some(v) = payload.desired_monthly_income {
        args.desired_monthly_income = v;
    }
    if let Some(v) = payload.years_to_project {
        args.years_to_project = v;
    }
    args
}
