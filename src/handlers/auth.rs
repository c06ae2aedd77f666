use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::{
    error::Result,
    handlers::{AppState, CurrentOfficer},
    models::officer::LoginForm,
    services::session_service::SESSION_COOKIE,
    views,
};

const INVALID_LOGIN: &str = "Invalid login. Please try again.";

/// Home/landing page
pub async fn index() -> Html<String> {
    Html(views::pages::index_page())
}

/// Render the login form
pub async fn login_form() -> Html<String> {
    Html(views::pages::login_page(None))
}

/// Attempt authentication; on success establish a session and redirect to
/// the dashboard. Any failure re-renders the form with one generic message.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state
        .officers
        .authenticate(&form.batch_number, &form.password)
        .await?
    {
        Some(officer) => {
            let token = state.sessions.create(&officer.batch_number).await;
            tracing::info!(batch_number = %officer.batch_number, "officer logged in");

            let cookie = Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .build();

            Ok((jar.add(cookie), Redirect::to("/dashboard")).into_response())
        }
        None => {
            tracing::info!("rejected login attempt");
            Ok(Html(views::pages::login_page(Some(INVALID_LOGIN))).into_response())
        }
    }
}

/// Clear the session and cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value()).await;
    }

    let removal = Cookie::build(SESSION_COOKIE).path("/").build();
    (jar.remove(removal), Redirect::to("/"))
}

/// Dashboard greeting; requires an active session
pub async fn dashboard(
    officer: CurrentOfficer,
    State(state): State<AppState>,
) -> Html<String> {
    let flashes = state.sessions.take_flashes(&officer.token).await;
    Html(views::pages::dashboard_page(&officer.batch_number, &flashes))
}
