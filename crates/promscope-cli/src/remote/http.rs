//! Async HTTP client for the Prometheus query API.

use chrono::{DateTime, Utc};
use promscope_core::{LabelSet, RangeSeries, RemoteError, RemoteResult, Sample, METRIC_NAME_LABEL};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::error::Error as _;
use std::time::Duration;
use tracing::debug;

/// Default server address when nothing else is configured.
pub const DEFAULT_URL: &str = "http://localhost:9090";

/// Connection settings for [`PromClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Server root, without the `/api/v1` suffix.
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            username: None,
            password: None,
            insecure: false,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Time window and resolution of a range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step: Duration,
}

/// Client for the `/api/v1` endpoints used by the shell.
#[derive(Debug, Clone)]
pub struct PromClient {
    http: Client,
    api_url: String,
    auth: Option<(String, String)>,
}

impl PromClient {
    pub fn new(options: &ClientOptions) -> RemoteResult<Self> {
        let http = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.insecure)
            .build()
            .map_err(transport_error)?;

        // Basic auth is only sent when both halves are present.
        let auth = match (&options.username, &options.password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some((user.clone(), pass.clone()))
            }
            _ => None,
        };

        Ok(Self {
            http,
            api_url: format!("{}/api/v1", options.url.trim_end_matches('/')),
            auth,
        })
    }

    /// Base URL of the query API, e.g. `http://localhost:9090/api/v1`.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// All metric names known to the server.
    pub async fn metric_names(&self) -> RemoteResult<Vec<String>> {
        self.label_values(METRIC_NAME_LABEL).await
    }

    /// Every value `label` takes across all series on the server.
    pub async fn label_values(&self, label: &str) -> RemoteResult<Vec<String>> {
        self.get(&format!("label/{label}/values"), &[]).await
    }

    /// Evaluate `expr` at the current time.
    ///
    /// Vector results map one-to-one to samples. A scalar or string result
    /// becomes a single sample without labels, and a matrix result keeps the
    /// last point of each series.
    pub async fn query_instant(&self, expr: &str) -> RemoteResult<Vec<Sample>> {
        let data: QueryData = self.get("query", &[("query", expr.to_string())]).await?;

        Ok(match data {
            QueryData::Vector(entries) => entries
                .into_iter()
                .map(|entry| Sample::new(entry.metric, entry.value.0, entry.value.1))
                .collect(),
            QueryData::Scalar((ts, value)) | QueryData::Text((ts, value)) => {
                vec![Sample::new(LabelSet::new(), ts, value)]
            }
            QueryData::Matrix(series) => series
                .into_iter()
                .filter_map(|entry| {
                    let (ts, value) = entry.values.last()?.clone();
                    Some(Sample::new(entry.metric, ts, value))
                })
                .collect(),
        })
    }

    /// Evaluate `expr` over `range`.
    pub async fn query_range(&self, expr: &str, range: &QueryRange) -> RemoteResult<Vec<RangeSeries>> {
        let params = [
            ("query", expr.to_string()),
            ("start", range.start.timestamp().to_string()),
            ("end", range.end.timestamp().to_string()),
            ("step", range.step.as_secs_f64().to_string()),
        ];
        let data: QueryData = self.get("query_range", &params).await?;

        match data {
            QueryData::Matrix(series) => Ok(series
                .into_iter()
                .map(|entry| RangeSeries {
                    labels: entry.metric,
                    values: entry.values,
                })
                .collect()),
            other => Err(RemoteError::Decode(format!(
                "expected a matrix from a range query, got {}",
                other.kind()
            ))),
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> RemoteResult<T> {
        let url = format!("{}/{endpoint}", self.api_url);
        debug!(%url, ?params, "GET");

        let mut request = self.http.get(&url).query(params);
        if let Some((user, pass)) = &self.auth {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        decode_envelope(status, &body)
    }
}

/// Interpret a response body against the API envelope.
///
/// An error envelope wins over the HTTP status, since the server reports
/// rejected queries as 4xx with a JSON body.
fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> RemoteResult<T> {
    let envelope = match serde_json::from_str::<ApiResponse<T>>(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            })
        }
        Err(err) => return Err(RemoteError::Decode(err.to_string())),
    };

    if envelope.status != "success" {
        return Err(RemoteError::api(
            envelope.error_type.unwrap_or_else(|| "unknown".to_string()),
            envelope.error.unwrap_or_default(),
        ));
    }

    if !status.is_success() {
        return Err(RemoteError::Status {
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    envelope
        .data
        .ok_or_else(|| RemoteError::Decode("response has no data field".to_string()))
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    RemoteError::Transport(message)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse<T> {
    status: String,
    data: Option<T>,
    error_type: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
enum QueryData {
    Vector(Vec<VectorEntry>),
    Matrix(Vec<MatrixEntry>),
    Scalar((f64, String)),
    #[serde(rename = "string")]
    Text((f64, String)),
}

impl QueryData {
    fn kind(&self) -> &'static str {
        match self {
            Self::Vector(_) => "vector",
            Self::Matrix(_) => "matrix",
            Self::Scalar(_) => "scalar",
            Self::Text(_) => "string",
        }
    }
}

#[derive(Debug, Deserialize)]
struct VectorEntry {
    #[serde(default)]
    metric: LabelSet,
    value: (f64, String),
}

#[derive(Debug, Deserialize)]
struct MatrixEntry {
    #[serde(default)]
    metric: LabelSet,
    values: Vec<(f64, String)>,
}
