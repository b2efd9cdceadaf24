use std::{net::SocketAddr, path::Path, sync::Arc};

use access_gate::{cookie_value, session_present, AccessGate};
use anyhow::{bail, Context};
use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use catalog::OrderCatalog;
use server_api::{
    dashboard_overview, identity::decode_profile, landing, list_orders, not_found, ApiContext,
    OrdersQuery,
};
use shared::{
    domain::StatusStyles,
    error::ApiError,
    protocol::{
        DashboardView, LandingView, NotFoundView, OrdersView, DASHBOARD_PATH, LANDING_PATH,
        ORDERS_PATH, SIGN_OUT_PATH,
    },
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings, DEV_SESSION_SECRET};

#[derive(Clone)]
struct AppState {
    api: ApiContext,
    gate: AccessGate,
    session_cookie: String,
    session_secret: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings()?;
    let state = build_state(&settings)?;
    info!(
        orders = state.api.catalog.len(),
        public_paths = ?settings.gate.public_paths,
        "order catalog loaded"
    );
    if settings.session_secret == DEV_SESSION_SECRET {
        warn!("using the development session secret; set NEXTAUTH_SECRET in production");
    }

    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    let catalog = match settings.catalog_path.as_deref() {
        Some(path) => OrderCatalog::load(Path::new(path))
            .with_context(|| format!("failed to load order catalog from '{path}'"))?,
        None => OrderCatalog::sample().context("bundled order catalog is invalid")?,
    };

    let mut styles = StatusStyles::default();
    styles
        .apply_overrides(
            settings
                .status_styles
                .iter()
                .map(|(status, style)| (status.as_str(), style.as_str())),
        )
        .context("invalid status style override")?;

    let gate = AccessGate::new(settings.gate.clone()).context("invalid gate configuration")?;
    if ![DASHBOARD_PATH, ORDERS_PATH].contains(&gate.protected_home()) {
        bail!(
            "protected home '{}' is not a dashboard page",
            gate.protected_home()
        );
    }

    Ok(AppState {
        api: ApiContext { catalog, styles },
        gate,
        session_cookie: settings.session_cookie.clone(),
        session_secret: settings.session_secret.clone(),
    })
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(LANDING_PATH, get(http_landing))
        .route(DASHBOARD_PATH, get(http_dashboard))
        .route(ORDERS_PATH, get(http_list_orders))
        .route("/healthz", get(healthz))
        .route(SIGN_OUT_PATH, post(sign_out))
        .fallback(http_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), gate_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn gate_requests(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let has_session = session_present(session_token(request.headers(), &state.session_cookie));

    let redirect = state.gate.evaluate(path, has_session).and_then(|decision| {
        state
            .gate
            .redirect_target(decision)
            .map(|target| (decision, target))
    });
    if let Some((decision, target)) = redirect {
        debug!(path, ?decision, redirect = target, "gate redirect");
        return Redirect::temporary(target).into_response();
    }
    next.run(request).await
}

fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|raw| cookie_value(raw, cookie_name))
        .last()
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_landing() -> Json<LandingView> {
    Json(landing())
}

async fn http_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<DashboardView> {
    let profile = session_token(&headers, &state.session_cookie)
        .and_then(|token| decode_profile(&state.session_secret, token));
    Json(dashboard_overview(&state.api, profile.as_ref(), DASHBOARD_PATH))
}

async fn http_list_orders(
    State(state): State<Arc<AppState>>,
    query: Result<Query<OrdersQuery>, QueryRejection>,
) -> Result<Json<OrdersView>, (StatusCode, Json<ApiError>)> {
    let Query(q) = query.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation(rejection.body_text())),
        )
    })?;
    let view = list_orders(&state.api, &q).map_err(|e| (StatusCode::BAD_REQUEST, Json(e)))?;
    Ok(Json(view))
}

async fn sign_out(State(state): State<Arc<AppState>>) -> Response {
    let expired = format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=Lax",
        state.session_cookie
    );
    let mut response = Redirect::to(state.gate.public_landing()).into_response();
    match HeaderValue::from_str(&expired) {
        Ok(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        Err(error) => warn!(%error, "session cookie name is not a valid header value"),
    }
    response
}

async fn http_not_found(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> (StatusCode, Json<NotFoundView>) {
    (
        StatusCode::NOT_FOUND,
        Json(not_found(uri.path(), state.gate.protected_home())),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        info!("received ctrl-c, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(error) => {
                warn!(%error, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
