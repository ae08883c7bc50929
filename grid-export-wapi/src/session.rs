//! Authenticated WAPI session.
//!
//! Login probes `GET /grid` with HTTP basic auth; the grid answers with a
//! session cookie that the client's cookie jar replays on every later
//! request. The session is shared read-only after login — nothing mutates
//! credential state until logout invalidates it server-side.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{Result, WapiError};
use crate::paging::{Page, PageFetcher, PageQuery};

/// Connect timeout applied to every request (seconds).
const CONNECT_TIMEOUT_SECS: u64 = 30;
/// Read timeout applied to every request (seconds).
const READ_TIMEOUT_SECS: u64 = 60;

/// Connection settings resolved once at startup and passed in explicitly.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Hostname or IP address of the Grid Master.
    pub host: String,
    /// WAPI version to address, with or without a leading `v`.
    pub wapi_version: String,
    /// Username for basic auth.
    pub username: String,
    /// Password for basic auth.
    pub password: String,
    /// Page size for paged queries. Must be >= 1; the CLI rejects anything
    /// smaller at parse time.
    pub max_results: u32,
    /// Skip TLS certificate verification (lab grids with self-signed certs).
    pub insecure_tls: bool,
}

impl SessionConfig {
    /// Versioned base URL, e.g. `https://gm.lab/wapi/v2.12.2`.
    pub fn base_url(&self) -> String {
        format!(
            "https://{}/wapi/v{}",
            self.host,
            self.wapi_version.trim_start_matches('v')
        )
    }
}

/// Application-level error payload, returned by the grid with `Error` and
/// `text` fields set (usually on a 4xx status).
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "Error")]
    error: String,
    #[serde(default)]
    text: Option<String>,
}

/// An authenticated session against a Grid Master.
///
/// Implements [`PageFetcher`], so zone and record retrieval run through the
/// same cursor loop the tests drive with scripted pages.
pub struct WapiSession {
    client: Client,
    base_url: String,
    host: String,
    max_results: u32,
}

impl WapiSession {
    /// Probe `GET /grid` with basic auth and keep the session cookie.
    ///
    /// A non-success status is an [`WapiError::AuthFailed`]; the caller is
    /// expected to abort the run on it.
    pub async fn login(config: &SessionConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .read_timeout(Duration::from_secs(READ_TIMEOUT_SECS));
        if config.insecure_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build().map_err(|e| WapiError::Network {
            object: "grid".to_string(),
            detail: e.to_string(),
        })?;

        let base_url = config.base_url();
        debug!("GET {base_url}/grid");
        let response = client
            .get(format!("{base_url}/grid"))
            .basic_auth(&config.username, Some(&config.password))
            .send()
            .await
            .map_err(|e| send_error("grid", &e))?;

        let status = response.status();
        debug!("[grid] response status: {status}");
        if !status.is_success() {
            return Err(WapiError::AuthFailed {
                host: config.host.clone(),
                user: config.username.clone(),
                status: status.as_u16(),
            });
        }

        Ok(Self {
            client,
            base_url,
            host: config.host.clone(),
            max_results: config.max_results,
        })
    }

    /// Grid Master this session is bound to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Invalidate the server-side session.
    ///
    /// Failure is [`WapiError::Logout`]; collected data is unaffected and
    /// callers log it at warn without failing the run.
    pub async fn logout(&self) -> Result<()> {
        let url = format!("{}/logout", self.base_url);
        debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| send_error("logout", &e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(WapiError::Logout {
                status: status.as_u16(),
            })
        }
    }

    async fn get_page(&self, object: &str, params: &[(String, String)]) -> Result<Page> {
        let url = format!("{}/{}", self.base_url, object);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| send_error(object, &e))?;

        let status = response.status();
        debug!("[{object}] response status: {status}");

        let body = response.text().await.map_err(|e| WapiError::Network {
            object: object.to_string(),
            detail: format!("failed to read response body: {e}"),
        })?;

        parse_page_body(object, status, &body)
    }
}

#[async_trait]
impl PageFetcher for WapiSession {
    async fn first_page(&self, object: &str, query: &PageQuery) -> Result<Page> {
        let mut params: Vec<(String, String)> = vec![
            ("_paging".to_string(), "1".to_string()),
            ("_max_results".to_string(), self.max_results.to_string()),
            ("_return_as_object".to_string(), "1".to_string()),
        ];
        if !query.return_fields.is_empty() {
            params.push(("_return_fields".to_string(), query.return_fields.clone()));
        }
        params.extend(query.filters.iter().cloned());
        self.get_page(object, &params).await
    }

    async fn next_page(&self, object: &str, page_id: &str) -> Result<Page> {
        // Follow-ups carry only the cursor.
        let params = [("_page_id".to_string(), page_id.to_string())];
        self.get_page(object, &params).await
    }
}

fn send_error(object: &str, e: &reqwest::Error) -> WapiError {
    if e.is_timeout() {
        WapiError::Timeout {
            object: object.to_string(),
            detail: e.to_string(),
        }
    } else {
        WapiError::Network {
            object: object.to_string(),
            detail: e.to_string(),
        }
    }
}

/// Turn a response body into a [`Page`].
///
/// An application error payload wins over the HTTP status: the grid reports
/// bad filters and similar conditions as `{"Error", "text"}` on a 4xx.
fn parse_page_body(object: &str, status: StatusCode, body: &str) -> Result<Page> {
    if let Ok(api_err) = serde_json::from_str::<ApiErrorBody>(body) {
        let text = api_err.text.unwrap_or(api_err.error);
        warn!("[{object}] API error: {text}");
        return Err(WapiError::Api {
            object: object.to_string(),
            text,
        });
    }

    if !status.is_success() {
        return Err(WapiError::HttpStatus {
            object: object.to_string(),
            status: status.as_u16(),
        });
    }

    serde_json::from_str(body).map_err(|e| {
        error!("[{object}] failed to parse page: {e}");
        WapiError::Parse {
            object: object.to_string(),
            detail: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            host: "gm.lab".to_string(),
            wapi_version: "2.12.2".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            max_results: 1000,
            insecure_tls: false,
        }
    }

    #[test]
    fn base_url_embeds_version() {
        assert_eq!(config().base_url(), "https://gm.lab/wapi/v2.12.2");
    }

    #[test]
    fn base_url_strips_leading_v() {
        let mut cfg = config();
        cfg.wapi_version = "v2.10".to_string();
        assert_eq!(cfg.base_url(), "https://gm.lab/wapi/v2.10");
    }

    #[test]
    fn page_body_parses_result_and_cursor() {
        let result = parse_page_body(
            "zone_auth",
            StatusCode::OK,
            r#"{"result":[{"dns_fqdn":"a.com"}],"next_page_id":"789"}"#,
        );
        assert!(result.is_ok(), "unexpected failure: {result:?}");
        let Ok(page) = result else { return };
        assert_eq!(page.result.len(), 1);
        assert_eq!(page.next_page_id.as_deref(), Some("789"));
    }

    #[test]
    fn page_body_final_page_has_no_cursor() {
        let result = parse_page_body("zone_auth", StatusCode::OK, r#"{"result":[]}"#);
        assert!(result.is_ok(), "unexpected failure: {result:?}");
        let Ok(page) = result else { return };
        assert!(page.result.is_empty());
        assert!(page.next_page_id.is_none());
    }

    #[test]
    fn error_payload_beats_status() {
        let result = parse_page_body(
            "allrecords",
            StatusCode::BAD_REQUEST,
            r#"{"Error":"AdmConProtoError: view not found","code":"Client.Ibap.Proto","text":"View 'x' not found"}"#,
        );
        assert!(
            matches!(&result, Err(WapiError::Api { text, .. }) if text == "View 'x' not found"),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn error_payload_without_text_falls_back_to_error_field() {
        let result = parse_page_body(
            "allrecords",
            StatusCode::BAD_REQUEST,
            r#"{"Error":"AdmConProtoError: bad filter"}"#,
        );
        assert!(
            matches!(&result, Err(WapiError::Api { text, .. }) if text == "AdmConProtoError: bad filter"),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn bare_failure_status_maps_to_http_status() {
        let result = parse_page_body("zone_auth", StatusCode::BAD_GATEWAY, "upstream died");
        assert!(
            matches!(
                &result,
                Err(WapiError::HttpStatus { status: 502, object }) if object == "zone_auth"
            ),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn garbage_success_body_is_a_parse_error() {
        let result = parse_page_body("zone_auth", StatusCode::OK, "not json");
        assert!(
            matches!(&result, Err(WapiError::Parse { .. })),
            "unexpected result: {result:?}"
        );
    }
}
