mod params;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{ModelKind, SimulationParameters, YearlyRecord, simulate};
use crate::report::{
    CSV_FILE_NAME, ChartData, DisplayRow, display_rows, records_to_csv, render_svg,
};

pub use params::{ParamError, ProjectionArgs, SimulatePayload, build_params};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub parameters: SimulationParameters,
    pub model: ModelKind,
    pub years: Vec<YearlyRecord>,
    pub display: Vec<DisplayRow>,
    pub chart: ChartData,
}

pub fn build_simulate_response(parameters: SimulationParameters) -> SimulateResponse {
    let years = simulate(&parameters);
    SimulateResponse {
        model: parameters.model().kind(),
        display: display_rows(&years),
        chart: ChartData::from_records(&years),
        parameters,
        years,
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "retire-sim HTTP API listening");
    tracing::info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route("/api/simulate.csv", get(csv_handler))
        .route("/api/chart.svg", get(chart_handler))
        .fallback(not_found_handler)
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

async fn simulate_get_handler(query: Result<Query<SimulatePayload>, QueryRejection>) -> Response {
    match query {
        Ok(Query(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => rejected_payload(&rejection.body_text()),
    }
}

async fn simulate_post_handler(body: Result<Json<SimulatePayload>, JsonRejection>) -> Response {
    match body {
        Ok(Json(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => rejected_payload(&rejection.body_text()),
    }
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let parameters = match params_from_payload(payload) {
        Ok(parameters) => parameters,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };

    let response = build_simulate_response(parameters);
    tracing::debug!(
        model = ?response.model,
        years = response.years.len(),
        "projection served"
    );
    json_response(StatusCode::OK, response)
}

async fn csv_handler(query: Result<Query<SimulatePayload>, QueryRejection>) -> Response {
    let parameters = match params_from_query(query) {
        Ok(parameters) => parameters,
        Err(response) => return response,
    };

    let records = simulate(&parameters);
    match records_to_csv(&records) {
        Ok(bytes) => with_cache_control((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, csv_content_disposition()),
            ],
            bytes,
        )),
        Err(err) => {
            tracing::error!(error = %err, "CSV export failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

async fn chart_handler(query: Result<Query<SimulatePayload>, QueryRejection>) -> Response {
    let parameters = match params_from_query(query) {
        Ok(parameters) => parameters,
        Err(response) => return response,
    };

    let records = simulate(&parameters);
    let svg = render_svg(&ChartData::from_records(&records));
    with_cache_control(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

fn csv_content_disposition() -> String {
    format!("attachment; filename=\"{CSV_FILE_NAME}\"")
}

/// Undecodable fields (`years=-1`, `seedMoney=abc`) answer like validation
/// failures so clients always get a JSON error body.
fn rejected_payload(msg: &str) -> Response {
    tracing::warn!(error = %msg, "undecodable projection request");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn params_from_query(
    query: Result<Query<SimulatePayload>, QueryRejection>,
) -> Result<SimulationParameters, Response> {
    let Query(payload) = query.map_err(|rejection| rejected_payload(&rejection.body_text()))?;
    params_from_payload(payload)
        .map_err(|err| error_response(StatusCode::BAD_REQUEST, &err.to_string()))
}

fn params_from_payload(payload: SimulatePayload) -> Result<SimulationParameters, ParamError> {
    build_params(&payload.into_args()).inspect_err(|err| {
        tracing::warn!(error = %err, "rejected projection request");
    })
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
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
mod tests {
    use super::*;
    use crate::report::CSV_HEADERS;
    use axum::body::{Body, to_bytes};
    use axum::extract::FromRequest;
    use axum::http::{Request, Uri};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn payload_from_json(json: &str) -> SimulatePayload {
        serde_json::from_str(json).expect("valid payload JSON")
    }

    fn query_from_uri(uri: &str) -> Result<Query<SimulatePayload>, QueryRejection> {
        let uri: Uri = uri.parse().expect("valid uri");
        Query::try_from_uri(&uri)
    }

    async fn assert_json_bad_request(response: Response, expected_fragment: &str) {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).expect("json error body");
        let message = body["error"].as_str().expect("error message");
        assert!(
            message.contains(expected_fragment),
            "expected {expected_fragment:?} in {message:?}"
        );
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects")
            .to_vec()
    }

    #[test]
    fn simulate_response_serialization_contains_expected_fields() {
        let parameters = params_from_payload(payload_from_json(
            r#"{"reinvestDividend": false, "years": 1, "annualReturn": 10}"#,
        ))
        .expect("valid payload");
        let response = build_simulate_response(parameters);
        let json = serde_json::to_value(&response).expect("serializes");

        assert_eq!(json["model"], "growth");
        assert_eq!(json["parameters"]["seedMoney"], 50_000_000.0);
        assert_eq!(json["years"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["display"][0]["totalAsset"], "8,140 만");
        assert_eq!(json["chart"]["years"][0], 1);

        let first = &json["years"][0];
        assert_approx(first["cumulativePrincipal"].as_f64().unwrap(), 74_000_000.0);
        assert_approx(first["totalAsset"].as_f64().unwrap(), 81_400_000.0);
        assert_approx(first["annualWithdrawal4pct"].as_f64().unwrap(), 3_256_000.0);
    }

    #[test]
    fn default_request_runs_the_reinvestment_model_for_twenty_years() {
        let parameters = params_from_payload(SimulatePayload::default()).expect("defaults");
        let response = build_simulate_response(parameters);
        assert_eq!(response.model, ModelKind::DividendReinvestment);
        assert_eq!(response.years.len(), 20);
        assert_eq!(response.display.len(), 20);
        assert_eq!(response.chart.total_asset.len(), 20);
        assert!(response.years.iter().all(|r| r.annual_dividend_after_tax > 0.0));
    }

    #[test]
    fn csv_disposition_names_the_download_file() {
        assert_eq!(
            csv_content_disposition(),
            "attachment; filename=\"retirement_simulation.csv\""
        );
    }

    #[tokio::test]
    async fn undecodable_query_values_get_a_json_bad_request() {
        for uri in [
            "/api/simulate?years=-1",
            "/api/simulate?years=1.5",
            "/api/simulate?seedMoney=abc",
        ] {
            let response = simulate_get_handler(query_from_uri(uri)).await;
            assert_json_bad_request(response, "Failed to deserialize query string").await;
        }

        let response = csv_handler(query_from_uri("/api/simulate.csv?years=-1")).await;
        assert_json_bad_request(response, "Failed to deserialize").await;

        let response = chart_handler(query_from_uri("/api/chart.svg?reinvestDividend=maybe")).await;
        assert_json_bad_request(response, "Failed to deserialize").await;
    }

    #[tokio::test]
    async fn undecodable_json_body_gets_a_json_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/simulate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"years": -1}"#))
            .expect("valid request");
        let body = Json::<SimulatePayload>::from_request(request, &()).await;
        assert!(body.is_err());

        let response = simulate_post_handler(body).await;
        assert_json_bad_request(response, "Failed to deserialize the JSON body").await;
    }

    #[tokio::test]
    async fn out_of_range_query_values_share_the_same_error_shape() {
        let response = csv_handler(query_from_uri("/api/simulate.csv?taxRate=75")).await;
        assert_json_bad_request(response, "--tax-rate must be between 0 and 50").await;
    }

    #[tokio::test]
    async fn invalid_request_returns_bad_request_with_message() {
        let response = simulate_handler_impl(payload_from_json(r#"{"years": 0}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).expect("json error body");
        assert_eq!(body["error"], "--years must be between 1 and 50");
    }

    #[tokio::test]
    async fn valid_request_returns_projection_json() {
        let response = simulate_handler_impl(payload_from_json(r#"{"years": 3}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).expect("json body");
        assert_eq!(body["years"].as_array().map(Vec::len), Some(3));
        assert_eq!(body["model"], "dividend-reinvestment");
    }

    #[tokio::test]
    async fn csv_handler_serves_bom_prefixed_attachment() {
        let response = csv_handler(query_from_uri("/api/simulate.csv?years=2")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            csv_content_disposition().as_str()
        );

        let bytes = body_bytes(response).await;
        assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
        let text = String::from_utf8(bytes[3..].to_vec()).expect("utf-8");
        assert!(text.starts_with(&CSV_HEADERS.join(",")));
        assert_eq!(text.lines().count(), 3);
    }

    #[tokio::test]
    async fn chart_handler_serves_svg() {
        let response = chart_handler(Ok(Query(SimulatePayload::default()))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
        let text = String::from_utf8(body_bytes(response).await).expect("utf-8");
        assert!(text.starts_with("<svg"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = not_found_handler().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
