//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching, preflight handling,
//! CORS and server headers, and access logging.

use crate::api::{self, Route};
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Request fields the router needs after the request itself is dropped
struct RequestInfo {
    method: Method,
    path: String,
    query: Option<String>,
    version: Version,
    referer: Option<String>,
    user_agent: Option<String>,
}

impl RequestInfo {
    fn capture<B>(req: &Request<B>) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            version: req.version(),
            referer: header("referer"),
            user_agent: header("user-agent"),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Generic over the request body: no endpoint reads it.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let info = RequestInfo::capture(&req);
    drop(req);

    let mut response = match Route::match_path(&info.path) {
        Some(route) => {
            logger::log_debug(&format!("{} {} -> {}", info.method, info.path, route.name()));
            let mut resp = if info.method == Method::OPTIONS {
                http::build_options_response()
            } else {
                api::dispatch(route, &state.content, &info.path, info.query.as_deref()).await
            };
            if state.config.http.enable_cors {
                http::apply_cors(resp.headers_mut());
            }
            resp
        }
        None => http::build_404_response(),
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.cached_access_log.load(Ordering::Relaxed) {
        log_access(info, &response, &state, remote_addr, started);
    }

    Ok(response)
}

fn log_access(
    info: RequestInfo,
    response: &Response<Full<Bytes>>,
    state: &AppState,
    remote_addr: SocketAddr,
    started: Instant,
) {
    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        info.method.to_string(),
        info.path,
    );
    entry.query = info.query;
    entry.http_version = version_label(info.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or_default();
    entry.referer = info.referer;
    entry.user_agent = info.user_agent;
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
