use std::collections::{BTreeMap, HashMap};
use std::io::{self, BufRead, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::time::Duration;

use parking_lot::Mutex;
use rigfit_catalog::{Catalog, CatalogError};
use rigfit_core::{
    map_ordinal_to_100, AllocationTable, BuildAdvisor, Category, ScoringConfig, ScoringError,
    UserPreference,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::protocol::{
    ErrorBody, PartPick, PreferenceProfile, Rankings, RecommendRequest, RecommendResponse,
};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8790";

/// Largest request body accepted; a recommendation request is a few dozen bytes.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

const ROUTES: [&str; 4] = ["/health", "/catalog", "/metrics/summary", "/recommend"];
const UNMATCHED_ROUTE: &str = "unmatched";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("scoring configuration rejected: {0}")]
    Scoring(#[from] ScoringError),
}

/// Process-level settings read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: String,
    pub catalog_path: Option<PathBuf>,
    pub allocation: AllocationTable,
    pub read_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            catalog_path: None,
            allocation: AllocationTable::default(),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Reads `RIGFITD_ADDR`, `RIGFIT_CATALOG`, `RIGFITD_READ_TIMEOUT_MS` and the
    /// `RIGFIT_*_RATIO` overrides.
    pub fn from_env() -> Self {
        let defaults = AllocationTable::default();
        Self {
            addr: std::env::var("RIGFITD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
            catalog_path: std::env::var("RIGFIT_CATALOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            allocation: AllocationTable::new(
                env_f64("RIGFIT_GPU_RATIO", defaults.gpu, 0.0, 1.0),
                env_f64("RIGFIT_CPU_RATIO", defaults.cpu, 0.0, 1.0),
                env_f64("RIGFIT_MOTHERBOARD_RATIO", defaults.motherboard, 0.0, 1.0),
            ),
            read_timeout: Duration::from_millis(env_u64(
                "RIGFITD_READ_TIMEOUT_MS",
                5_000,
                10,
                120_000,
            )),
        }
    }
}

#[derive(Debug, Default)]
struct MetricsRegistry {
    requests: u64,
    recommendations: u64,
    rejected: u64,
    not_found: u64,
    failures: u64,
    routes: HashMap<&'static str, u64>,
}

impl MetricsRegistry {
    /// Unknown paths share one counter so the label set stays fixed.
    fn record(&mut self, route: &str, status: u16) {
        self.requests += 1;
        let label = ROUTES
            .into_iter()
            .find(|known| *known == route)
            .unwrap_or(UNMATCHED_ROUTE);
        *self.routes.entry(label).or_insert(0) += 1;
        match status {
            200 if route == "/recommend" => self.recommendations += 1,
            400 | 405 | 413 => self.rejected += 1,
            404 => self.not_found += 1,
            500.. => self.failures += 1,
            _ => {}
        }
    }
}

pub struct RecommendServer {
    advisor: BuildAdvisor,
    catalog: Catalog,
    metrics: Mutex<MetricsRegistry>,
    read_timeout: Duration,
}

impl RecommendServer {
    pub fn new(advisor: BuildAdvisor, catalog: Catalog) -> Self {
        Self {
            advisor,
            catalog,
            metrics: Mutex::new(MetricsRegistry::default()),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Builds a server from [`ServerConfig`], loading the catalog file when one is named.
    ///
    /// Every part must score under the configured tables, so a catalog with an
    /// unknown chipset fails here rather than on each request.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                let catalog = Catalog::load(path)?;
                info!(path = %path.display(), parts = catalog.len(), "loaded catalog");
                catalog
            }
            None => Catalog::builtin(),
        };
        let scoring = ScoringConfig::default().with_allocation(config.allocation);
        let advisor = BuildAdvisor::new(scoring)?;
        advisor.validate_catalog(catalog.view())?;
        Ok(Self::new(advisor, catalog).with_read_timeout(config.read_timeout))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn serve_http(&self, addr: &str) -> io::Result<()> {
        let listener = TcpListener::bind(addr)?;
        info!(addr = %listener.local_addr()?, "rigfitd http listening");
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(err) = self.handle_http_connection(stream) {
                        warn!(error = %err, "http request error");
                    }
                }
                Err(err) => {
                    warn!(error = %err, "http accept error");
                }
            }
        }
        Ok(())
    }

    fn handle_http_connection(&self, mut stream: TcpStream) -> io::Result<()> {
        stream.set_read_timeout(Some(self.read_timeout))?;
        let req = match read_http_request(&stream) {
            Ok(Some(req)) => req,
            Ok(None) => return Ok(()),
            Err(RequestError::Io(err)) => return Err(err),
            Err(err) => {
                warn!(error = %err, "rejected http request");
                let response =
                    HttpResponse::serialized(err.status(), &ErrorBody::new(err.to_string()));
                self.metrics.lock().record(UNMATCHED_ROUTE, response.status);
                return write_http_response(&mut stream, response);
            }
        };
        let response = self.respond(&req.method, &req.path, &req.body);
        write_http_response(&mut stream, response)
    }

    /// Routes one request. Exposed so handlers can be driven without a socket.
    pub fn respond(&self, method: &str, path: &str, body: &[u8]) -> HttpResponse {
        let response = self.dispatch(method, path, body);
        debug!(method, path, status = response.status, "handled request");
        self.metrics.lock().record(path, response.status);
        response
    }

    fn dispatch(&self, method: &str, path: &str, body: &[u8]) -> HttpResponse {
        match (method, path) {
            ("GET", "/health") => HttpResponse::json(200, json!({"status":"ok"})),
            ("GET", "/catalog") => HttpResponse::serialized(200, &self.catalog),
            ("GET", "/metrics/summary") => HttpResponse::json(200, self.render_metrics_summary()),
            ("POST", "/recommend") => self.handle_recommend(body),
            (_, route) if ROUTES.contains(&route) => {
                HttpResponse::serialized(405, &ErrorBody::new(format!("method {method} not allowed")))
            }
            _ => HttpResponse::serialized(404, &ErrorBody::new(format!("no route for {path}"))),
        }
    }

    fn handle_recommend(&self, body: &[u8]) -> HttpResponse {
        let request: RecommendRequest = if body.iter().all(u8::is_ascii_whitespace) {
            RecommendRequest::default()
        } else {
            match serde_json::from_slice(body) {
                Ok(v) => v,
                Err(err) => {
                    return HttpResponse::serialized(
                        400,
                        &ErrorBody::new(format!("invalid request body: {err}")),
                    )
                }
            }
        };
        let range = self.advisor.ranker().config().budget;
        let preference = match request.validate(&range) {
            Ok(v) => v,
            Err(err) => {
                warn!(error = %err, "rejected recommendation request");
                return HttpResponse::serialized(400, &ErrorBody::new(err.to_string()));
            }
        };
        match self.recommend(&preference) {
            Ok(response) => HttpResponse::serialized(200, &response),
            Err(err) => {
                warn!(error = %err, "recommendation failed");
                HttpResponse::serialized(500, &ErrorBody::new(err.to_string()))
            }
        }
    }

    pub fn recommend(&self, preference: &UserPreference) -> Result<RecommendResponse, ScoringError> {
        let ranker = self.advisor.ranker();
        let build = self.advisor.recommend(preference, self.catalog.view())?;
        let mut allocations = BTreeMap::new();
        for category in Category::ALL {
            allocations.insert(
                category.as_str().to_string(),
                ranker.allocated_budget(preference.total_budget, category)?,
            );
        }
        info!(
            budget = preference.total_budget,
            performance = preference.performance_priority,
            resolution = preference.resolution_level,
            gpu = build.gpu.as_ref().map(|r| r.name.as_str()),
            cpu = build.cpu.as_ref().map(|r| r.name.as_str()),
            motherboard = build.motherboard.as_ref().map(|r| r.name.as_str()),
            "recommended build"
        );
        Ok(RecommendResponse {
            preference: PreferenceProfile {
                budget: preference.total_budget,
                performance_priority: preference.performance_priority,
                resolution_level: preference.resolution_level,
                budget_score: ranker.config().budget.normalize(preference.total_budget),
                performance_score: map_ordinal_to_100(
                    preference.performance_priority,
                    UserPreference::PERFORMANCE_SCALE,
                ),
                resolution_score: map_ordinal_to_100(
                    preference.resolution_level,
                    UserPreference::RESOLUTION_SCALE,
                ),
            },
            allocations,
            gpu: build.gpu.map(PartPick::from),
            cpu: build.cpu.map(PartPick::from),
            motherboard: build.motherboard.map(PartPick::from),
            rankings: Rankings {
                gpus: build.gpus,
                cpus: build.cpus,
                motherboards: build.motherboards,
            },
        })
    }

    fn render_metrics_summary(&self) -> Value {
        let locked = self.metrics.lock();
        let rejection_ratio = if locked.requests == 0 {
            0.0
        } else {
            locked.rejected as f64 / locked.requests as f64
        };
        let routes = locked.routes.iter().collect::<BTreeMap<_, _>>();
        json!({
            "status": "ok",
            "requests_total": locked.requests,
            "recommendations_total": locked.recommendations,
            "rejected_total": locked.rejected,
            "not_found_total": locked.not_found,
            "failures_total": locked.failures,
            "rejection_ratio": rejection_ratio,
            "routes": routes,
            "catalog": {
                "gpus": self.catalog.gpus.len(),
                "cpus": self.catalog.cpus.len(),
                "motherboards": self.catalog.motherboards.len()
            }
        })
    }
}

#[derive(Debug, Error)]
enum RequestError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid http request: {0}")]
    Malformed(&'static str),

    #[error("request body of {0} bytes exceeds the {MAX_BODY_BYTES} byte limit")]
    TooLarge(u64),
}

impl RequestError {
    const fn status(&self) -> u16 {
        match self {
            Self::TooLarge(_) => 413,
            Self::Io(_) | Self::Malformed(_) => 400,
        }
    }
}

#[derive(Debug)]
struct HttpRequest {
    method: String,
    path: String,
    body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl HttpResponse {
    fn json(status: u16, value: Value) -> Self {
        Self::serialized(status, &value)
    }

    fn serialized<T: Serialize + ?Sized>(status: u16, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec());
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

fn read_http_request(stream: &TcpStream) -> Result<Option<HttpRequest>, RequestError> {
    let mut reader = io::BufReader::new(stream.try_clone()?);
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let first = line.trim_end_matches(['\r', '\n']);
    if first.is_empty() {
        return Ok(None);
    }

    let mut parts = first.split_whitespace();
    let Some(method) = parts.next() else {
        return Err(RequestError::Malformed("missing method"));
    };
    let Some(target) = parts.next() else {
        return Err(RequestError::Malformed("missing path"));
    };
    let path = target.split_once('?').map_or(target, |(p, _)| p);

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        let header = header.trim_end_matches(['\r', '\n']);
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                let declared = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| RequestError::Malformed("invalid content-length"))?;
                content_length = usize::try_from(declared)
                    .ok()
                    .filter(|len| *len <= MAX_BODY_BYTES)
                    .ok_or(RequestError::TooLarge(declared))?;
            }
        }
    }

    let mut body = vec![0_u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body)?;
    }
    Ok(Some(HttpRequest {
        method: method.to_string(),
        path: path.to_string(),
        body,
    }))
}

fn write_http_response(stream: &mut TcpStream, response: HttpResponse) -> io::Result<()> {
    let reason = http_reason_phrase(response.status);
    let headers = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        reason,
        response.content_type,
        response.body.len()
    );
    stream.write_all(headers.as_bytes())?;
    stream.write_all(&response.body)?;
    stream.flush()
}

fn http_reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

fn env_u64(name: &str, default: u64, min: u64, max: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
        .clamp(min, max)
}

fn env_f64(name: &str, default: f64, min: f64, max: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
        .clamp(min, max)
}
