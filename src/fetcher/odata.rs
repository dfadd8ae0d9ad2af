//! SAP OData snapshot adapter.
//!
//! Builds the OData v2 query for a snapshot (reference date plus pushed-down
//! filter), sends it through a [`SnapshotTransport`] and decodes the
//! `{"d": {"results": [...]}}` envelope into [`EmployeeSnapshotRecord`]s,
//! normalizing contract dates on the way.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::calculation::{normalize_contract_end, normalize_contract_start};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeSnapshotRecord, OrgDimension, RotationFilter};

use super::{CredentialProvider, SnapshotFetcher, SnapshotTransport};

const UNNAMED_EMPLOYEE: &str = "Sin nombre";

/// A GET request against an OData service.
///
/// Query values are unencoded; the transport encodes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ODataRequest {
    /// The absolute resource URL.
    pub url: String,
    /// Query parameters in order.
    pub query: Vec<(String, String)>,
}

/// Builds the OData `$filter` expression for a snapshot.
///
/// The reference date predicate comes first; each restricted filter field
/// follows as a parenthesized `or` group, and all clauses are joined by
/// `and`.
///
/// # Example
///
/// ```
/// use rotation_engine::fetcher::build_filter_expression;
/// use rotation_engine::models::RotationFilter;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
/// let filter = RotationFilter::from_csv_fields(Some("1000,2000"), None, None, Some("J1"));
/// assert_eq!(
///     build_filter_expression("Keydate", date, &filter),
///     "Keydate eq datetime'2025-09-01T00:00:00' \
///      and (Companycode eq '1000' or Companycode eq '2000') \
///      and (Jobcode eq 'J1')"
/// );
/// ```
pub fn build_filter_expression(
    reference_date_field: &str,
    reference_date: NaiveDate,
    filter: &RotationFilter,
) -> String {
    let mut clauses = vec![format!(
        "{} eq datetime'{}T00:00:00'",
        reference_date_field,
        reference_date.format("%Y-%m-%d")
    )];

    let fields = [
        ("Companycode", &filter.company_codes),
        ("Personnelareacode", &filter.personnel_areas),
        ("Costcentercode", &filter.cost_centers),
        ("Jobcode", &filter.job_codes),
    ];

    for (property, values) in fields {
        if values.is_empty() {
            continue;
        }
        let alternatives: Vec<String> = values
            .iter()
            .map(|v| format!("{} eq '{}'", property, v.replace('\'', "''")))
            .collect();
        clauses.push(format!("({})", alternatives.join(" or ")));
    }

    clauses.join(" and ")
}

/// One employee row as the OData service sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ODataEmployeeRow {
    /// `Employeeid`.
    #[serde(rename = "Employeeid", default, deserialize_with = "lenient_text")]
    pub employee_id: String,
    /// `Employeeename`.
    #[serde(rename = "Employeeename", default, deserialize_with = "lenient_text")]
    pub name: String,
    /// `Jobcode`.
    #[serde(rename = "Jobcode", default, deserialize_with = "lenient_text")]
    pub job_code: String,
    /// `Jobdescription`.
    #[serde(rename = "Jobdescription", default, deserialize_with = "lenient_text")]
    pub job_description: String,
    /// `Orgunitcode`.
    #[serde(rename = "Orgunitcode", default, deserialize_with = "lenient_text")]
    pub org_unit_code: String,
    /// `Orgunitdescription`.
    #[serde(rename = "Orgunitdescription", default, deserialize_with = "lenient_text")]
    pub org_unit_description: String,
    /// `Personnelareacode`.
    #[serde(rename = "Personnelareacode", default, deserialize_with = "lenient_text")]
    pub personnel_area_code: String,
    /// `Personnelareadescr`.
    #[serde(rename = "Personnelareadescr", default, deserialize_with = "lenient_text")]
    pub personnel_area_description: String,
    /// `Costcentercode`.
    #[serde(rename = "Costcentercode", default, deserialize_with = "lenient_text")]
    pub cost_center_code: String,
    /// `Costcenterdescr`.
    #[serde(rename = "Costcenterdescr", default, deserialize_with = "lenient_text")]
    pub cost_center_description: String,
    /// `Companycode`.
    #[serde(rename = "Companycode", default, deserialize_with = "lenient_text")]
    pub company_code: String,
    /// `Contractedhours`, as a number or numeric string.
    #[serde(rename = "Contractedhours", default)]
    pub contracted_hours: Value,
    /// `Contractstartdate`, in any supported date wire format.
    #[serde(rename = "Contractstartdate", default)]
    pub contract_start: Value,
    /// `Contractenddate`, in any supported date wire format.
    #[serde(rename = "Contractenddate", default)]
    pub contract_end: Value,
}

impl ODataEmployeeRow {
    /// Converts the wire row into a snapshot record.
    pub fn into_record(self) -> EmployeeSnapshotRecord {
        let name = if self.name.trim().is_empty() {
            UNNAMED_EMPLOYEE.to_string()
        } else {
            self.name
        };

        EmployeeSnapshotRecord {
            id: self.employee_id,
            name,
            job_code: self.job_code,
            job_description: self.job_description,
            organizational_unit: OrgDimension::new(self.org_unit_code, self.org_unit_description),
            personnel_area: OrgDimension::new(
                self.personnel_area_code,
                self.personnel_area_description,
            ),
            cost_center: OrgDimension::new(self.cost_center_code, self.cost_center_description),
            company_code: self.company_code,
            contracted_hours: lenient_decimal(&self.contracted_hours),
            contract_start: normalize_contract_start(&self.contract_start),
            contract_end: normalize_contract_end(&self.contract_end),
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    d: EnvelopeBody,
}

#[derive(Deserialize)]
struct EnvelopeBody {
    results: Vec<ODataEmployeeRow>,
}

/// Decodes an OData response body into snapshot records.
///
/// Returns `MalformedPayload` if the body is not a `{"d": {"results": [...]}}`
/// envelope.
pub fn parse_odata_payload(body: &str) -> EngineResult<Vec<EmployeeSnapshotRecord>> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| EngineError::MalformedPayload {
            message: e.to_string(),
        })?;

    Ok(envelope
        .d
        .results
        .into_iter()
        .map(ODataEmployeeRow::into_record)
        .collect())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_decimal(value: &Value) -> Decimal {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Decimal::ZERO,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .unwrap_or(Decimal::ZERO)
}

/// Fetches snapshots from a SAP OData service.
///
/// # Example
///
/// ```no_run
/// use rotation_engine::config::{EngineConfig, ROTATION_REPORT};
/// use rotation_engine::fetcher::{
///     Credentials, ODataRequest, ODataSnapshotFetcher, SnapshotTransport, StaticCredentials,
///     TransportError, TransportResponse,
/// };
///
/// struct MyHttpClient;
///
/// #[async_trait::async_trait]
/// impl SnapshotTransport for MyHttpClient {
///     async fn get(
///         &self,
///         _request: &ODataRequest,
///         _credentials: &Credentials,
///     ) -> Result<TransportResponse, TransportError> {
///         unimplemented!()
///     }
/// }
///
/// let fetcher = ODataSnapshotFetcher::new(
///     &EngineConfig::default(),
///     ROTATION_REPORT,
///     MyHttpClient,
///     StaticCredentials::new(Credentials::new("rrhh", "secret")),
/// );
/// ```
#[derive(Debug)]
pub struct ODataSnapshotFetcher<T, C> {
    transport: T,
    credentials: C,
    base_url: String,
    entity_set: String,
    reference_date_field: String,
}

impl<T, C> ODataSnapshotFetcher<T, C>
where
    T: SnapshotTransport,
    C: CredentialProvider,
{
    /// Creates a fetcher for the given report type's endpoint.
    pub fn new(config: &EngineConfig, report: &str, transport: T, credentials: C) -> Self {
        Self {
            transport,
            credentials,
            base_url: config.base_url(report).trim_end_matches('/').to_string(),
            entity_set: config.endpoints().entity_set.clone(),
            reference_date_field: config.endpoints().reference_date_field.clone(),
        }
    }

    /// Returns the service base URL this fetcher targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the request for a snapshot.
    pub fn snapshot_request(&self, reference_date: NaiveDate, filter: &RotationFilter) -> ODataRequest {
        ODataRequest {
            url: format!("{}/{}", self.base_url, self.entity_set),
            query: vec![
                ("$format".to_string(), "json".to_string()),
                (
                    "$filter".to_string(),
                    build_filter_expression(&self.reference_date_field, reference_date, filter),
                ),
            ],
        }
    }

    /// Probes the service's `$metadata` document.
    ///
    /// Returns true only for an HTTP 200 answer; any error is logged and
    /// reported as false.
    pub async fn test_connection(&self) -> bool {
        let credentials = match self.credentials.credentials().await {
            Ok(credentials) => credentials,
            Err(err) => {
                warn!(error = %err, "No credentials for connection check");
                return false;
            }
        };

        let request = ODataRequest {
            url: format!("{}/$metadata", self.base_url),
            query: Vec::new(),
        };

        match self.transport.get(&request, &credentials).await {
            Ok(response) => response.status == 200,
            Err(err) => {
                warn!(url = %request.url, error = %err, "Connection check failed");
                false
            }
        }
    }
}

#[async_trait]
impl<T, C> SnapshotFetcher for ODataSnapshotFetcher<T, C>
where
    T: SnapshotTransport,
    C: CredentialProvider,
{
    async fn fetch(
        &self,
        reference_date: NaiveDate,
        filter: &RotationFilter,
    ) -> EngineResult<Vec<EmployeeSnapshotRecord>> {
        let credentials = self.credentials.credentials().await?;
        let request = self.snapshot_request(reference_date, filter);

        debug!(url = %request.url, %reference_date, "Fetching snapshot");

        let response = self
            .transport
            .get(&request, &credentials)
            .await
            .map_err(|e| EngineError::FetchFailed {
                reference_date,
                message: e.to_string(),
            })?;

        match response.status {
            200..=299 => {}
            401 | 403 => {
                return Err(EngineError::Unauthorized {
                    message: format!(
                        "HR source rejected user '{}' (HTTP {})",
                        credentials.username, response.status
                    ),
                });
            }
            status => {
                return Err(EngineError::FetchFailed {
                    reference_date,
                    message: format!("HTTP {}", status),
                });
            }
        }

        let records = parse_odata_payload(&response.body)?;
        debug!(%reference_date, records = records.len(), "Snapshot decoded");

        // The service may ignore part of the $filter; keep the semantics exact.
        Ok(filter.apply(records))
    }
}
