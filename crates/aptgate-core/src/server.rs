//! HTTP host: runs the gatekeeper in front of a static file tree.
//!
//! Every request passes through the gatekeeper middleware. Requests it lets
//! through fall back to `ServeDir` over the configured site root.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::GateConfig;
use crate::gate::{GateRequest, Gatekeeper, Outcome};
use crate::response::GateResponse;

/// Builds the router: gatekeeper middleware over static serving of `site_root`.
pub fn router(gate: Arc<Gatekeeper>, site_root: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(site_root))
        .layer(middleware::from_fn_with_state(gate, gatekeeper))
        .layer(TraceLayer::new_for_http())
}

async fn gatekeeper(
    State(gate): State<Arc<Gatekeeper>>,
    request: Request,
    next: Next,
) -> Response {
    let req = GateRequest::new(request.method().as_str(), request.uri().path());
    match gate.handle(&req) {
        Outcome::Continue => next.run(request).await,
        Outcome::Respond(resp) => into_response(resp),
    }
}

/// Converts a core response descriptor into an axum response.
pub fn into_response(resp: GateResponse) -> Response {
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut out = Response::new(Body::from(resp.body));
    *out.status_mut() = status;
    for (name, value) in &resp.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(n), Ok(v)) => {
                out.headers_mut().insert(n, v);
            }
            _ => tracing::warn!(header = %name, "dropping header that is not valid HTTP"),
        }
    }
    out
}

/// Serves on an already bound listener until the task is dropped.
pub async fn serve_listener(
    listener: TcpListener,
    gate: Arc<Gatekeeper>,
    site_root: &Path,
) -> Result<()> {
    let app = router(gate, site_root);
    axum::serve(listener, app).await.context("http server")?;
    Ok(())
}

/// Binds `cfg.listen` and serves until Ctrl-C.
pub async fn serve(cfg: &GateConfig) -> Result<()> {
    let gate = Arc::new(Gatekeeper::from_config(cfg).context("invalid gatekeeper config")?);
    let addr: SocketAddr = cfg
        .listen
        .parse()
        .with_context(|| format!("invalid listen address {:?}", cfg.listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(
        "listening on http://{} serving {} ({} redirected package(s))",
        listener.local_addr()?,
        cfg.site_root.display(),
        gate.redirectors().len()
    );

    let app = router(gate, &cfg.site_root);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
