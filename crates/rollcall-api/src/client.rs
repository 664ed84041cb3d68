// Async HTTP client for the rollcall attendance backend.
//
// Base path: <base>/api (supplied already-suffixed by the config store)
// Payloads: opaque JSON: the backend owns the entity shapes, this client
// only transports them.

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;

// ── Error response shape from the backend ────────────────────────────

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

// ── Health ───────────────────────────────────────────────────────────

/// Rich health-check response.
///
/// Unlike the probe (which only looks at the status code), this surfaces the
/// backend's component statuses so callers can show degraded-mode warnings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub ai_status: String,
    #[serde(default)]
    pub ai_provider: Option<String>,
    pub mongodb_status: String,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the attendance backend REST API.
///
/// One request per operation, a fixed per-request timeout (default 30 s),
/// JSON bodies, and uniform error translation. No retry and no caching;
/// both are caller concerns.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL (e.g. `http://localhost:5001/api`) and
    /// transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            timeout: transport.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages its settings).
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            timeout,
        })
    }

    /// Parse and normalize so the base path always ends with a single `/`,
    /// making relative joins well-behaved.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw.trim())?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The resolved base URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"students"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining `students/…` works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.send(self.http.get(url)).await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let resp = self.send(self.http.get(url).query(params)).await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(body)).await?;
        self.handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let resp = self.send(self.http.put(url).json(body)).await?;
        self.handle_response(resp).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let resp = self.send(self.http.delete(url)).await?;
        self.handle_response(resp).await
    }

    /// Send a request, mapping deadline expiry to the distinct timeout error.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(self.timeout)
            } else {
                Error::Transport(e)
            }
        })
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = truncate_on_char_boundary(&body, 200);
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Surface the server's `{"error": "..."}` message verbatim when the
    /// body parses; otherwise fall back to a generic status-based message.
    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .map_or_else(|_| format!("HTTP error {}", status.as_u16()), |e| e.error);

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Students ─────────────────────────────────────────────────────

    pub async fn list_students(&self) -> Result<Vec<serde_json::Value>, Error> {
        self.get("students").await
    }

    pub async fn create_student(
        &self,
        student: &serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        self.post("students", student).await
    }

    pub async fn update_student(
        &self,
        student_id: &str,
        update: &serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        self.put(&format!("students/{student_id}"), update).await
    }

    pub async fn delete_student(&self, student_id: &str) -> Result<serde_json::Value, Error> {
        self.delete(&format!("students/{student_id}")).await
    }

    // ── Courses ──────────────────────────────────────────────────────

    pub async fn list_courses(&self) -> Result<Vec<serde_json::Value>, Error> {
        self.get("courses").await
    }

    pub async fn create_course(
        &self,
        course: &serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        self.post("courses", course).await
    }

    pub async fn update_course(
        &self,
        course_id: &str,
        update: &serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        self.put(&format!("courses/{course_id}"), update).await
    }

    pub async fn delete_course(&self, course_id: &str) -> Result<serde_json::Value, Error> {
        self.delete(&format!("courses/{course_id}")).await
    }

    // ── Attendance ───────────────────────────────────────────────────

    /// List attendance records, optionally filtered to one course.
    pub async fn list_attendance(
        &self,
        course_id: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, Error> {
        match course_id {
            Some(id) => {
                self.get_with_params("attendance", &[("courseId", id.to_owned())])
                    .await
            }
            None => self.get("attendance").await,
        }
    }

    pub async fn create_attendance(
        &self,
        record: &serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        self.post("attendance", record).await
    }

    pub async fn update_attendance(
        &self,
        record_id: &str,
        update: &serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        self.put(&format!("attendance/{record_id}"), update).await
    }

    pub async fn delete_attendance(&self, record_id: &str) -> Result<serde_json::Value, Error> {
        self.delete(&format!("attendance/{record_id}")).await
    }

    // ── Health ───────────────────────────────────────────────────────

    pub async fn health(&self) -> Result<HealthStatus, Error> {
        self.get("health").await
    }
}

/// Truncate a body preview without splitting a multibyte character.
fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
