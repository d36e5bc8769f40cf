use std::{sync::Arc, time::Instant};

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::{
    exposition::{self, CONTENT_TYPE},
    metrics_server,
    scrape::{scrape, StatusSource},
};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn StatusSource>,
    pub metrics: PrometheusHandle,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/apcupsd", get(scrape_handler))
        .route("/metrics", get(metrics_server::metrics_handler))
        .with_state(state)
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("'{0}' parameter must be specified once")]
pub struct ParamError(&'static str);

fn single_param<'a>(params: &'a [(String, String)], name: &'static str) -> Result<&'a str, ParamError> {
    let mut values = params.iter().filter(|(k, _)| k == name).map(|(_, v)| v.as_str());
    match (values.next(), values.next()) {
        (Some(v), None) if !v.is_empty() => Ok(v),
        _ => Err(ParamError(name)),
    }
}

/// `host:port` for the daemon named by the `target` and `port` query
/// parameters. IPv6 literals are bracketed.
pub fn target_address(params: &[(String, String)]) -> Result<String, ParamError> {
    let host = single_param(params, "target")?;
    let port = single_param(params, "port")?;

    if host.contains(':') && !host.starts_with('[') {
        Ok(format!("[{host}]:{port}"))
    } else {
        Ok(format!("{host}:{port}"))
    }
}

pub async fn scrape_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let addr = match target_address(&params) {
        Ok(addr) => addr,
        Err(e) => {
            metrics_server::record_rejected();
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    tracing::info!(%addr, "scraping UPS");
    let started = Instant::now();

    let set = match scrape(state.source.as_ref(), &addr).await {
        Ok(set) => set,
        Err(e) => {
            tracing::warn!(%addr, error = %e, kind = e.kind(), "scrape failed");
            metrics_server::record_scrape(e.kind(), started.elapsed());
            return (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response();
        }
    };

    match exposition::render(&set) {
        Ok(body) => {
            let elapsed = started.elapsed();
            metrics_server::record_scrape("success", elapsed);
            tracing::info!(%addr, duration_seconds = elapsed.as_secs_f64(), "finished scrape");
            ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
        }
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to render metrics");
            metrics_server::record_scrape("exposition", started.elapsed());
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<html>
<head>
<title>apcupsd Exporter</title>
<style>
label {
  display: inline-block;
  width: 75px;
}
form label, form input {
  margin: 10px;
}
</style>
</head>
<body>
<h1>apcupsd Exporter</h1>
<form action="/apcupsd">
<label>Target:</label> <input type="text" name="target" placeholder="X.X.X.X" value="1.2.3.4"><br>
<label>Port:</label> <input type="text" name="port" placeholder="3551" value="3551"><br>
<input type="submit" value="Submit">
</form>
<p><a href="/metrics">Exporter metrics</a></p>
</body>
</html>
"#;
