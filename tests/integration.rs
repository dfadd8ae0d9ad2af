//! End-to-end tests for the Rotation Indicator Engine.
//!
//! Requests go through the HTTP router, the rotation service and the OData
//! snapshot adapter, which is backed by a fixture transport serving SAP-style
//! JSON payloads per reference date. This covers:
//! - Mixed date wire formats inside one payload
//! - Monthly classification and rounding
//! - Annual roll-up with a failing month
//! - Filter pushdown and client-side filtering
//! - Error mapping to HTTP statuses

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use rotation_engine::api::{AppState, create_router};
use rotation_engine::config::{ConfigLoader, EngineConfig, ROTATION_REPORT};
use rotation_engine::fetcher::{
    Credentials, ODataRequest, ODataSnapshotFetcher, SnapshotTransport, StaticCredentials,
    TransportError, TransportResponse,
};
use rotation_engine::service::RotationService;

// =============================================================================
// Test Helpers
// =============================================================================

/// Serves canned OData responses keyed by the reference date in `$filter`.
#[derive(Default)]
struct FixtureTransport {
    payloads: HashMap<String, Value>,
    statuses: HashMap<String, u16>,
    filters_seen: Mutex<Vec<String>>,
}

impl FixtureTransport {
    fn with_rows(mut self, date: &str, rows: Vec<Value>) -> Self {
        self.payloads
            .insert(date.to_string(), json!({ "d": { "results": rows } }));
        self
    }

    fn with_status(mut self, date: &str, status: u16) -> Self {
        self.statuses.insert(date.to_string(), status);
        self
    }
}

fn reference_date_of(request: &ODataRequest) -> String {
    let filter = request
        .query
        .iter()
        .find(|(key, _)| key == "$filter")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default();
    filter
        .split("datetime'")
        .nth(1)
        .map(|rest| rest.chars().take(10).collect())
        .unwrap_or_default()
}

#[async_trait]
impl SnapshotTransport for FixtureTransport {
    async fn get(
        &self,
        request: &ODataRequest,
        _credentials: &Credentials,
    ) -> Result<TransportResponse, TransportError> {
        let date = reference_date_of(request);
        if let Some((_, filter)) = request.query.iter().find(|(key, _)| key == "$filter") {
            self.filters_seen.lock().unwrap().push(filter.clone());
        }

        if let Some(status) = self.statuses.get(&date) {
            return Ok(TransportResponse {
                status: *status,
                body: String::new(),
            });
        }

        let body = self
            .payloads
            .get(&date)
            .cloned()
            .unwrap_or_else(|| json!({ "d": { "results": [] } }));
        Ok(TransportResponse {
            status: 200,
            body: body.to_string(),
        })
    }
}

fn load_config() -> EngineConfig {
    ConfigLoader::load("./config/rotation")
        .expect("Failed to load config")
        .into_config()
}

fn router_with(transport: FixtureTransport) -> Router {
    let config = load_config();
    let fetcher = ODataSnapshotFetcher::new(
        &config,
        ROTATION_REPORT,
        transport,
        StaticCredentials::new(Credentials::new("rrhh", "secret")),
    );
    let service = RotationService::new(Arc::new(fetcher), config);
    create_router(AppState::new(service))
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn row(id: &str, company: &str, area: &str, start: Value, end: Value) -> Value {
    json!({
        "Employeeid": id,
        "Employeeename": format!("Empleado {}", id),
        "Jobcode": "50001234",
        "Jobdescription": "Auxiliar de enfermería",
        "Orgunitcode": "60000010",
        "Orgunitdescription": "Hospitalización",
        "Personnelareacode": area,
        "Personnelareadescr": format!("Sede {}", area),
        "Costcentercode": "C100",
        "Costcenterdescr": "Urgencias",
        "Companycode": company,
        "Contractedhours": "47.00",
        "Contractstartdate": start,
        "Contractenddate": end
    })
}

/// Five workers for September 2025, each end date in a different wire format.
fn september_rows() -> Vec<Value> {
    vec![
        // Ends 2025-09-02: retired.
        row("A", "1000", "P001", json!("/Date(1577836800000)/"), json!("20250902")),
        // Ends 2025-10-01: retired.
        row("B", "1000", "P001", json!("2020-01-01"), json!("/Date(1759276800000)/")),
        // Open-ended via the epoch sentinel.
        row("C", "2000", "P002", json!(20200101), json!("/Date(253402214400000)/")),
        // Ended before the month started.
        row("D", "2000", "P002", json!("2020-01-01T00:00:00"), json!(20250815)),
        // Ends on the last day of the month: same-day exit.
        row("E", "2000", "P002", json!("2020-01-01"), json!({ "value": "2025-09-30" })),
    ]
}

fn decimal_str(value: &Value) -> &str {
    value.as_str().expect("decimal should serialize as a string")
}

// =============================================================================
// SECTION 1: Monthly Indicators
// =============================================================================

#[tokio::test]
async fn test_monthly_september_scenario_over_odata() {
    let transport = FixtureTransport::default().with_rows("2025-09-01", september_rows());
    let (status, result) = get_json(
        router_with(transport),
        "/rotation/monthly?year=2025&month=9",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["month_name"], "September");
    assert_eq!(result["retired_count"], 2);
    let retired: Vec<&str> = result["retired_workers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_str().unwrap())
        .collect();
    assert_eq!(retired, vec!["A", "B"]);
    assert_eq!(result["same_day_exit_count"], 1);

    // The previous snapshot is empty, so the start cohort comes from the
    // current one: everyone but D.
    assert_eq!(result["start_count"], 4);
    // B, C and E are still employed on 09-30.
    assert_eq!(result["end_count"], 3);
    assert_eq!(decimal_str(&result["average_workers"]), "3.50");
    assert_eq!(decimal_str(&result["rotation_percentage"]), "50.00");
    assert_eq!(result["reference_dates"]["prev_month_end"], "2025-08-31");
    assert!(result.get("error").is_none());
}

#[tokio::test]
async fn test_monthly_uses_previous_snapshot_for_start_cohort() {
    let previous: Vec<Value> = (0..10)
        .map(|i| {
            row(
                &format!("P{}", i),
                "1000",
                "P001",
                json!("2019-06-01"),
                json!("99991231"),
            )
        })
        .collect();
    let mut current = previous.clone();
    current[0]["Contractenddate"] = json!("20250905");
    current[1]["Contractenddate"] = json!("20250920");

    let transport = FixtureTransport::default()
        .with_rows("2025-08-31", previous)
        .with_rows("2025-09-01", current);
    let (status, result) = get_json(
        router_with(transport),
        "/rotation/monthly?year=2025&month=9",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["start_count"], 10);
    assert_eq!(result["end_count"], 8);
    assert_eq!(decimal_str(&result["average_workers"]), "9.00");
    assert_eq!(decimal_str(&result["rotation_percentage"]), "20.00");
}

#[tokio::test]
async fn test_monthly_filter_is_pushed_down_and_enforced() {
    let transport = Arc::new(FixtureTransport::default().with_rows("2025-09-01", september_rows()));
    let config = load_config();
    let fetcher = ODataSnapshotFetcher::new(
        &config,
        ROTATION_REPORT,
        SharedTransport(Arc::clone(&transport)),
        StaticCredentials::new(Credentials::new("rrhh", "secret")),
    );
    let router = create_router(AppState::new(RotationService::new(Arc::new(fetcher), config)));

    let (status, result) = get_json(
        router,
        "/rotation/monthly?year=2025&month=9&company_code=1000&personnel_area=P001,P003",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Only A and B belong to company 1000, and both retire.
    assert_eq!(result["retired_count"], 2);
    assert_eq!(result["start_count"], 2);
    assert_eq!(decimal_str(&result["rotation_percentage"]), "100.00");

    let filters = transport.filters_seen.lock().unwrap();
    assert_eq!(filters.len(), 2);
    assert!(filters.iter().all(|f| f.contains("(Companycode eq '1000')")));
    assert!(
        filters
            .iter()
            .all(|f| f.contains("(Personnelareacode eq 'P001' or Personnelareacode eq 'P003')"))
    );
}

struct SharedTransport(Arc<FixtureTransport>);

#[async_trait]
impl SnapshotTransport for SharedTransport {
    async fn get(
        &self,
        request: &ODataRequest,
        credentials: &Credentials,
    ) -> Result<TransportResponse, TransportError> {
        self.0.get(request, credentials).await
    }
}

// =============================================================================
// SECTION 2: Annual Indicators
// =============================================================================

#[tokio::test]
async fn test_annual_with_failed_june_is_degraded() {
    let transport = FixtureTransport::default()
        .with_rows("2025-09-01", september_rows())
        .with_status("2025-06-01", 503);
    let (status, result) = get_json(router_with(transport), "/rotation/annual?year=2025").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["year"], 2025);

    let months = result["months"].as_object().unwrap();
    assert_eq!(months.len(), 12);

    let june = &result["months"]["6"];
    assert_eq!(june["retired_count"], 0);
    assert_eq!(june["start_count"], 0);
    assert!(june["retired_workers"].as_array().unwrap().is_empty());
    assert!(june["error"].as_str().unwrap().contains("HTTP 503"));

    assert_eq!(result["degraded_months"], json!([6]));
    assert_eq!(result["successful_months"], 11);
    assert_eq!(result["totals"]["total_retired"], 2);
    // September averages 3.50; 3.50 / 12 = 0.29.
    assert_eq!(
        decimal_str(&result["totals"]["average_workers_per_month"]),
        "0.29"
    );
    // 2 / (3.50 / 12) * 100 = 685.714...
    assert_eq!(
        decimal_str(&result["totals"]["annual_rotation_percentage"]),
        "685.71"
    );
}

#[tokio::test]
async fn test_annual_with_no_data_is_all_zero() {
    let (status, result) =
        get_json(router_with(FixtureTransport::default()), "/rotation/annual?year=2024").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["totals"]["total_retired"], 0);
    assert_eq!(
        decimal_str(&result["totals"]["annual_rotation_percentage"]),
        "0"
    );
    assert_eq!(result["successful_months"], 12);
}

// =============================================================================
// SECTION 3: Personnel and Filter Options
// =============================================================================

#[tokio::test]
async fn test_filter_options_are_sorted_and_deduplicated() {
    let transport = FixtureTransport::default().with_rows("2025-09-01", september_rows());
    let (status, result) = get_json(
        router_with(transport),
        "/rotation/filter-options?date=2025-09-01",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["companies"], json!(["1000", "2000"]));
    assert_eq!(
        result["personnel_areas"],
        json!([
            { "code": "P001", "description": "Sede P001" },
            { "code": "P002", "description": "Sede P002" }
        ])
    );
    assert_eq!(result["jobs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_personnel_listing_normalizes_dates() {
    let transport = FixtureTransport::default().with_rows("2025-09-01", september_rows());
    let (status, result) = get_json(
        router_with(transport),
        "/rotation/personnel?date=2025-09-01&company_code=2000",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["count"], 3);
    let c = &result["personnel"][0];
    assert_eq!(c["id"], "C");
    assert_eq!(c["contract_start"], json!({ "kind": "date", "date": "2020-01-01" }));
    assert_eq!(c["contract_end"], json!({ "kind": "open_ended" }));
}

// =============================================================================
// SECTION 4: Error Cases
// =============================================================================

#[tokio::test]
async fn test_monthly_unauthorized_source_returns_401() {
    let transport = FixtureTransport::default().with_status("2025-09-01", 401);
    let (status, result) = get_json(
        router_with(transport),
        "/rotation/monthly?year=2025&month=9",
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(result["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_monthly_source_error_returns_502() {
    let transport = FixtureTransport::default().with_status("2025-08-31", 500);
    let (status, result) = get_json(
        router_with(transport),
        "/rotation/monthly?year=2025&month=9",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(result["code"], "FETCH_FAILED");
}

#[tokio::test]
async fn test_year_outside_policy_returns_400() {
    let (status, result) = get_json(
        router_with(FixtureTransport::default()),
        "/rotation/monthly?year=2035&month=1",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "YEAR_OUT_OF_RANGE");
}

#[tokio::test]
async fn test_non_numeric_month_returns_400() {
    let (status, result) = get_json(
        router_with(FixtureTransport::default()),
        "/rotation/monthly?year=2025&month=sept",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_QUERY");
}
