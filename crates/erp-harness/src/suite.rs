//! Sequential integration test suite against a running backend
//!
//! Cases run one after another and share a [`Harness`], so a case that signs
//! in leaves its token for the cases that follow. A failed case is recorded
//! and the run continues.

use crate::error::HarnessResult;
use erp_client::{ApiClient, ClientError, LOGIN_PATH};
use erp_core::Config;
use futures::future::BoxFuture;
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use std::{fmt, fmt::Write as _, time::Duration};
use tokio::time::Instant;
use tracing::{info, warn};

/// Health endpoints every deployment exposes
pub const HEALTH_PATHS: [&str; 3] = ["/health", "/api/health/db", "/api/health/redis"];

/// Outcome of one case: a detail line on success, the reason on failure
pub type CaseOutcome = Result<String, String>;

/// A test case body
pub type CaseFn = for<'a> fn(&'a Harness) -> BoxFuture<'a, CaseOutcome>;

/// Group a case belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Liveness and dependency checks
    Health,
    /// Sign-in flow
    Auth,
    /// Record endpoints
    Api,
    /// Front-end availability
    Frontend,
    /// Access control and input handling
    Security,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Health => "health",
            Self::Auth => "auth",
            Self::Api => "api",
            Self::Frontend => "frontend",
            Self::Security => "security",
        })
    }
}

/// A named test case
#[derive(Clone, Copy)]
pub struct TestCase {
    /// Name printed in the report
    pub name: &'static str,
    /// Group
    pub category: Category,
    /// Body
    pub run: CaseFn,
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Shared state of a run
pub struct Harness {
    api: ApiClient,
    http: reqwest::Client,
    base_url: String,
    frontend_url: String,
    timeout: Duration,
    username: String,
    password: String,
    resources: Vec<String>,
}

impl Harness {
    /// Harness for the backend at `base_url` and the front end at `frontend_url`
    ///
    /// # Errors
    ///
    /// Returns an error if either URL is invalid.
    pub fn new(base_url: &str, frontend_url: &str, config: &Config) -> HarnessResult<Self> {
        let timeout = Duration::from_secs(config.harness.request_timeout);
        let api = ApiClient::new(base_url, timeout)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            base_url: api.base_url().to_string(),
            api,
            http,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
            timeout,
            username: config.api.username.clone(),
            password: config.api.password.clone(),
            resources: config.harness.resources.clone(),
        })
    }

    /// Harness for the `api.base_url` backend and `api.frontend_url` front end
    ///
    /// # Errors
    ///
    /// Returns an error if either URL is invalid.
    pub fn from_config(config: &Config) -> HarnessResult<Self> {
        Self::new(&config.api.base_url, &config.api.frontend_url, config)
    }

    /// Backend base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Front-end URL
    pub fn frontend_url(&self) -> &str {
        &self.frontend_url
    }

    async fn ensure_login(&self) -> Result<(), String> {
        if self.api.token().is_some() {
            return Ok(());
        }
        self.api
            .login(&self.username, &self.password)
            .await
            .map(drop)
            .map_err(|e| format!("login failed: {e}"))
    }

    async fn login_is_rejected(&self, username: &str, password: &str) -> CaseOutcome {
        let probe = ApiClient::new(self.base_url.as_str(), self.timeout).map_err(|e| e.to_string())?;
        match probe.login(username, password).await {
            Ok(_) => Err(format!("login accepted for username {username:?}")),
            Err(e) => Ok(format!("rejected: {e}")),
        }
    }

    fn protected_path(&self) -> String {
        let resource = self.resources.first().map_or("users", String::as_str);
        format!("/api/{resource}")
    }
}

impl fmt::Debug for Harness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("base_url", &self.base_url)
            .field("frontend_url", &self.frontend_url)
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

fn health_endpoints(h: &Harness) -> BoxFuture<'_, CaseOutcome> {
    Box::pin(async move {
        let mut checked = Vec::new();
        for path in HEALTH_PATHS {
            h.api
                .health(path)
                .await
                .map_err(|e| format!("{path}: {e}"))?;
            checked.push(path);
        }
        Ok(format!("{} endpoints healthy", checked.len()))
    })
}

fn login_succeeds(h: &Harness) -> BoxFuture<'_, CaseOutcome> {
    Box::pin(async move {
        let session = h
            .api
            .login(&h.username, &h.password)
            .await
            .map_err(|e| e.to_string())?;
        if session.token.is_empty() {
            return Err("login returned an empty token".to_string());
        }
        Ok(format!("signed in as {} ({})", session.user.username, session.user.role))
    })
}

fn wrong_password_rejected(h: &Harness) -> BoxFuture<'_, CaseOutcome> {
    Box::pin(async move {
        h.login_is_rejected(&h.username, "definitely-not-the-password")
            .await
    })
}

fn list_endpoints(h: &Harness) -> BoxFuture<'_, CaseOutcome> {
    Box::pin(async move {
        h.ensure_login().await?;
        let mut counts = Vec::with_capacity(h.resources.len());
        for resource in &h.resources {
            let path = format!("/api/{resource}");
            let data: Value = h.api.get(&path).await.map_err(|e| format!("{path}: {e}"))?;
            let count = data
                .as_array()
                .map(Vec::len)
                .ok_or_else(|| format!("{path}: data is not a list"))?;
            counts.push(format!("{resource}={count}"));
        }
        Ok(counts.join(", "))
    })
}

fn frontend_serves_html(h: &Harness) -> BoxFuture<'_, CaseOutcome> {
    Box::pin(async move {
        let response = h
            .http
            .get(&h.frontend_url)
            .send()
            .await
            .map_err(|e| format!("{}: {e}", h.frontend_url))?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("{}: HTTP {status}", h.frontend_url));
        }
        let body = response.text().await.map_err(|e| e.to_string())?;
        let lower = body.to_lowercase();
        if lower.contains("<html") || lower.contains("<!doctype html") {
            Ok(format!("{} bytes of HTML", body.len()))
        } else {
            Err("response is not an HTML document".to_string())
        }
    })
}

fn anonymous_request_rejected(h: &Harness) -> BoxFuture<'_, CaseOutcome> {
    Box::pin(async move {
        let path = h.protected_path();
        let status = h
            .api
            .probe::<()>(Method::GET, &path, None, true)
            .await
            .map_err(|e| e.to_string())?;
        expect_denied(&path, status)
    })
}

fn forged_token_rejected(h: &Harness) -> BoxFuture<'_, CaseOutcome> {
    Box::pin(async move {
        let path = h.protected_path();
        let status = h
            .http
            .get(format!("{}{path}", h.base_url))
            .bearer_auth("forged.token.value")
            .send()
            .await
            .map_err(|e| e.to_string())?
            .status();
        expect_denied(&path, status)
    })
}

fn sql_injection_rejected(h: &Harness) -> BoxFuture<'_, CaseOutcome> {
    Box::pin(async move { h.login_is_rejected("admin' OR '1'='1", "' OR '1'='1").await })
}

fn script_injection_rejected(h: &Harness) -> BoxFuture<'_, CaseOutcome> {
    Box::pin(async move {
        h.login_is_rejected("<script>alert('xss')</script>", "password")
            .await
    })
}

fn malformed_body_rejected(h: &Harness) -> BoxFuture<'_, CaseOutcome> {
    Box::pin(async move {
        let body = json!({"username": ["not", "a", "string"], "password": 42});
        let status = h
            .api
            .probe(Method::POST, LOGIN_PATH, Some(&body), true)
            .await
            .map_err(|e| e.to_string())?;
        if status.is_client_error() {
            Ok(format!("HTTP {status}"))
        } else {
            Err(format!("expected a 4xx status, got {status}"))
        }
    })
}

fn expect_denied(path: &str, status: StatusCode) -> CaseOutcome {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Ok(format!("{path}: HTTP {status}"))
    } else {
        Err(format!("{path}: expected 401 or 403, got {status}"))
    }
}

/// Every case, in run order
pub fn all_cases() -> Vec<TestCase> {
    vec![
        TestCase {
            name: "health endpoints respond",
            category: Category::Health,
            run: health_endpoints,
        },
        TestCase {
            name: "login with valid credentials",
            category: Category::Auth,
            run: login_succeeds,
        },
        TestCase {
            name: "login with wrong password is rejected",
            category: Category::Auth,
            run: wrong_password_rejected,
        },
        TestCase {
            name: "record lists are reachable",
            category: Category::Api,
            run: list_endpoints,
        },
        TestCase {
            name: "front end serves HTML",
            category: Category::Frontend,
            run: frontend_serves_html,
        },
        TestCase {
            name: "anonymous request is rejected",
            category: Category::Security,
            run: anonymous_request_rejected,
        },
        TestCase {
            name: "forged token is rejected",
            category: Category::Security,
            run: forged_token_rejected,
        },
        TestCase {
            name: "SQL injection in login is rejected",
            category: Category::Security,
            run: sql_injection_rejected,
        },
        TestCase {
            name: "script injection in login is rejected",
            category: Category::Security,
            run: script_injection_rejected,
        },
        TestCase {
            name: "malformed login body is rejected",
            category: Category::Security,
            run: malformed_body_rejected,
        },
    ]
}

/// Cases to run, optionally restricted to the security group
pub fn select_cases(security_only: bool) -> Vec<TestCase> {
    all_cases()
        .into_iter()
        .filter(|case| !security_only || case.category == Category::Security)
        .collect()
}

/// Result of one case
#[derive(Debug, Clone)]
pub struct CaseResult {
    /// Case name
    pub name: &'static str,
    /// Group
    pub category: Category,
    /// Detail or failure reason
    pub outcome: CaseOutcome,
    /// Wall time
    pub elapsed: Duration,
}

impl CaseResult {
    /// Whether the case passed
    pub const fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Results of a run
#[derive(Debug, Clone, Default)]
pub struct Summary {
    /// Per-case results, in run order
    pub results: Vec<CaseResult>,
}

impl Summary {
    /// Number of passed cases
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|result| result.passed()).count()
    }

    /// Number of failed cases
    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    /// Process exit code: 0 when every case passed
    pub fn exit_code(&self) -> u8 {
        u8::from(self.failed() > 0)
    }

    /// Text report; details of passed cases only when `verbose`
    pub fn report(&self, verbose: bool) -> String {
        let mut out = String::new();
        for result in &self.results {
            let millis = result.elapsed.as_millis();
            match &result.outcome {
                Ok(detail) if verbose => {
                    let _ = writeln!(out, "✅ [{}] {} ({millis} ms): {detail}", result.category, result.name);
                }
                Ok(_) => {
                    let _ = writeln!(out, "✅ [{}] {}", result.category, result.name);
                }
                Err(reason) => {
                    let _ = writeln!(out, "❌ [{}] {}: {reason}", result.category, result.name);
                }
            }
        }
        let _ = writeln!(
            out,
            "\nPassed: {}, Failed: {}, Total: {}",
            self.passed(),
            self.failed(),
            self.results.len()
        );
        out
    }
}

/// Run `cases` one after another
pub async fn run_suite(harness: &Harness, cases: &[TestCase]) -> Summary {
    let mut summary = Summary::default();
    for case in cases {
        let started = Instant::now();
        let outcome = (case.run)(harness).await;
        let elapsed = started.elapsed();

        match &outcome {
            Ok(detail) => info!(case = case.name, %detail, "case passed"),
            Err(reason) => warn!(case = case.name, %reason, "case failed"),
        }

        summary.results.push(CaseResult {
            name: case.name,
            category: case.category,
            outcome,
            elapsed,
        });
    }
    summary
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(name: &'static str, outcome: CaseOutcome) -> CaseResult {
        CaseResult {
            name,
            category: Category::Api,
            outcome,
            elapsed: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_security_only_selection() {
        let cases = select_cases(true);
        assert_eq!(cases.len(), 5);
        assert!(cases.iter().all(|case| case.category == Category::Security));
        assert_eq!(select_cases(false).len(), all_cases().len());
    }

    #[test]
    fn test_exit_code() {
        let mut summary = Summary::default();
        assert_eq!(summary.exit_code(), 0);

        summary.results.push(result("lists", Ok("users=2".to_string())));
        assert_eq!(summary.exit_code(), 0);

        summary.results.push(result("health", Err("/health: HTTP 503".to_string())));
        assert_eq!(summary.exit_code(), 1);
        assert_eq!((summary.passed(), summary.failed()), (1, 1));
    }

    #[test]
    fn test_report_verbosity() {
        let summary = Summary {
            results: vec![
                result("lists", Ok("users=2".to_string())),
                result("health", Err("/health: HTTP 503".to_string())),
            ],
        };

        let quiet = summary.report(false);
        assert!(quiet.contains("✅ [api] lists\n"));
        assert!(quiet.contains("❌ [api] health: /health: HTTP 503"));
        assert!(quiet.ends_with("Passed: 1, Failed: 1, Total: 2\n"));

        let verbose = summary.report(true);
        assert!(verbose.contains("✅ [api] lists (12 ms): users=2"));
    }

    #[test]
    fn test_expect_denied() {
        assert!(expect_denied("/api/users", StatusCode::UNAUTHORIZED).is_ok());
        assert!(expect_denied("/api/users", StatusCode::FORBIDDEN).is_ok());
        assert_eq!(
            expect_denied("/api/users", StatusCode::OK).unwrap_err(),
            "/api/users: expected 401 or 403, got 200 OK"
        );
    }
}
