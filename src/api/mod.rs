use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Outcome, Outlook, RawFields, RawValue, RetirementParameters, project, validate,
};
use crate::format::outcome_message;
use crate::suggest::{SuggestError, SuggestionLine, SuggestionRequest, fetch_suggestions};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Retirement corpus projection (two growth buckets, escalating contributions, inflation-adjusted drawdown)"
)]
struct Cli {
    /// Present lumpsum amount already invested
    #[arg(long)]
    present_lumpsum: String,
    /// Monthly investable money
    #[arg(long)]
    monthly_investable: String,
    /// Present provident fund balance
    #[arg(long)]
    present_pf_value: String,
    /// Monthly provident fund contribution
    #[arg(long)]
    monthly_pf_investment: String,
    /// Expected CAGR on invested amount in percent, e.g. 12
    #[arg(long)]
    cagr_invested: String,
    /// Expected CAGR on the provident fund in percent, e.g. 7.5
    #[arg(long)]
    cagr_pf: String,
    /// Expected CAGR after retirement in percent, e.g. 6
    #[arg(long)]
    cagr_after_retirement: String,
    #[arg(long)]
    current_age: String,
    #[arg(long)]
    retirement_age: String,
    /// Expected annual inflation in percent, e.g. 5
    #[arg(long)]
    inflation_rate: String,
    /// Annual step-up of the investable contribution in percent
    #[arg(long)]
    annual_investment_increase: String,
    /// Annual step-up of the provident fund contribution in percent
    #[arg(long)]
    annual_pf_increase: String,
    /// Desired annual retirement income in today's money
    #[arg(long)]
    desired_annual_income: String,
    /// Years the income must last after retirement
    #[arg(long)]
    life_expectancy: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookResponse {
    current_age: i32,
    retirement_age: i32,
    years_to_retirement: i32,
    accumulated_corpus: f64,
    required_corpus: f64,
    surplus_or_deficit: f64,
    outcome: Outcome,
    advisory_flag: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    advisory: Option<&'static str>,
    message: String,
}

#[derive(Debug, Serialize)]
struct SuggestionsResponse {
    suggestions: Vec<SuggestionLine>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/outlook",
            get(outlook_get_handler).post(outlook_post_handler),
        )
        .route("/api/suggestions", post(suggestions_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    log::info!("retirement outlook API listening on http://{addr}");
    log::info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

/// One-shot projection from the command line. The flags stay raw strings so
/// the validator remains the only gate between text and the typed model.
pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let raw = raw_fields_from_cli(cli);
    let params = validate(&raw).map_err(|e| e.to_string())?;
    let outlook = project(&params);
    let response = build_outlook_response(&params, &outlook);
    let json = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn raw_fields_from_cli(cli: Cli) -> RawFields {
    RawFields {
        present_lumpsum: Some(RawValue::Text(cli.present_lumpsum)),
        monthly_investable: Some(RawValue::Text(cli.monthly_investable)),
        present_pf_value: Some(RawValue::Text(cli.present_pf_value)),
        monthly_pf_investment: Some(RawValue::Text(cli.monthly_pf_investment)),
        cagr_invested: Some(RawValue::Text(cli.cagr_invested)),
        cagr_pf: Some(RawValue::Text(cli.cagr_pf)),
        cagr_after_retirement: Some(RawValue::Text(cli.cagr_after_retirement)),
        current_age: Some(RawValue::Text(cli.current_age)),
        retirement_age: Some(RawValue::Text(cli.retirement_age)),
        inflation_rate: Some(RawValue::Text(cli.inflation_rate)),
        annual_investment_increase: Some(RawValue::Text(cli.annual_investment_increase)),
        annual_pf_increase: Some(RawValue::Text(cli.annual_pf_increase)),
        desired_annual_income: Some(RawValue::Text(cli.desired_annual_income)),
        life_expectancy: Some(RawValue::Text(cli.life_expectancy)),
    }
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn outlook_get_handler(Query(payload): Query<RawFields>) -> Response {
    outlook_handler_impl(payload)
}

async fn outlook_post_handler(Json(payload): Json<RawFields>) -> Response {
    outlook_handler_impl(payload)
}

fn outlook_handler_impl(payload: RawFields) -> Response {
    let params = match validate(&payload) {
        Ok(params) => params,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    let outlook = project(&params);
    json_response(StatusCode::OK, build_outlook_response(&params, &outlook))
}

async fn suggestions_handler(Json(payload): Json<RawFields>) -> Response {
    let params = match validate(&payload) {
        Ok(params) => params,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    let outlook = project(&params);
    let request = SuggestionRequest::new(&params, &outlook, outcome_message(&outlook));

    match fetch_suggestions(&request).await {
        Ok(suggestions) => json_response(StatusCode::OK, SuggestionsResponse { suggestions }),
        Err(e) => {
            log::warn!("suggestion request failed: {e}");
            let status = match e {
                SuggestError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
                SuggestError::Http(_) | SuggestError::EmptyResponse => StatusCode::BAD_GATEWAY,
            };
            error_response(status, &e.to_string())
        }
    }
}

fn build_outlook_response(params: &RetirementParameters, outlook: &Outlook) -> OutlookResponse {
    OutlookResponse {
        current_age: params.current_age,
        retirement_age: params.retirement_age,
        years_to_retirement: params.years_to_retirement(),
        accumulated_corpus: outlook.accumulated_corpus,
        required_corpus: outlook.required_corpus,
        surplus_or_deficit: outlook.surplus_or_deficit,
        outcome: outlook.outcome,
        advisory_flag: outlook.advisory_flag,
        advisory: outlook.advisory_note(),
        message: outcome_message(outlook),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
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
