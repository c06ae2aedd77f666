use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    config::Config,
    db::{DbPool, OfficerStore, TableStore},
    services::{session_service::SESSION_COOKIE, ReportService, SessionStore},
};

pub mod auth;
pub mod reports;
pub mod tables;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub officers: OfficerStore,
    pub tables: TableStore,
    pub reports: ReportService,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config, pool: DbPool) -> Self {
        Self {
            config: Arc::new(config),
            officers: OfficerStore::new(pool.clone()),
            tables: TableStore::new(pool.clone()),
            reports: ReportService::new(pool),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

/// Per-request authenticated identity, resolved from the session cookie.
///
/// Handlers take this by value; there is no global session state. Requests
/// without a live session are redirected to the login form.
pub struct CurrentOfficer {
    pub token: String,
    pub batch_number: String,
}

impl FromRequestParts<AppState> for CurrentOfficer {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/login"))?;

        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_owned())
            .ok_or_else(|| Redirect::to("/login"))?;

        let batch_number = state
            .sessions
            .batch_number(&token)
            .await
            .ok_or_else(|| Redirect::to("/login"))?;

        Ok(Self { token, batch_number })
    }
}

/// Build the application router: one service, one session mechanism.
pub fn router(state: AppState) -> Router {
    let charts_dir = state.config.charts_dir.clone();

    Router::new()
        .route("/", get(auth::index))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(auth::dashboard))
        .route("/view/tables/{table_name}", get(tables::view_table))
        .route("/insert/{table_name}", post(tables::insert_record))
        .route("/update/{table_name}", post(tables::update_record))
        .route("/delete/{table_name}", post(tables::delete_record))
        .route("/cost_savings_analysis", get(reports::cost_savings_analysis))
        .nest_service("/static", ServeDir::new(charts_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
