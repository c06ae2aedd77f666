use std::path::Path;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    handlers::{AppState, CurrentOfficer},
    services::report_service,
    services::session_service::Flash,
    views,
};

/// Compute the savings projection, render the four charts to disk, and
/// display the results.
pub async fn cost_savings_analysis(
    officer: CurrentOfficer,
    State(state): State<AppState>,
) -> Response {
    let report = match state.reports.build_report().await {
        Ok(report) => report,
        Err(e) => {
            state
                .sessions
                .push_flash(&officer.token, Flash::danger(format!("An error occurred: {e}")))
                .await;
            return Redirect::to("/dashboard").into_response();
        }
    };

    if let Err(e) = report_service::render_charts(&report, Path::new(&state.config.charts_dir)) {
        state
            .sessions
            .push_flash(
                &officer.token,
                Flash::danger(format!("Error rendering charts: {e}")),
            )
            .await;
        return Redirect::to("/dashboard").into_response();
    }

    Html(views::pages::report_page(&officer.batch_number, &report)).into_response()
}
