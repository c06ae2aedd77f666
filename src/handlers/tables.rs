use std::collections::HashMap;

use axum::{
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    error::AppError,
    handlers::{AppState, CurrentOfficer},
    models::table::KnownTable,
    services::session_service::Flash,
    views,
};

/// Resolve a request-supplied table name, flashing and redirecting to the
/// dashboard when it is not in the registry.
async fn resolve_table(
    state: &AppState,
    officer: &CurrentOfficer,
    table_name: &str,
) -> Result<KnownTable, Redirect> {
    match KnownTable::from_name(table_name) {
        Some(table) => Ok(table),
        None => {
            state
                .sessions
                .push_flash(
                    &officer.token,
                    Flash::danger(format!("Table \"{table_name}\" not found.")),
                )
                .await;
            Err(Redirect::to("/dashboard"))
        }
    }
}

fn view_url(table: KnownTable) -> String {
    format!("/view/tables/{}", table.name())
}

/// List every row of the named table
pub async fn view_table(
    officer: CurrentOfficer,
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> Response {
    let table = match resolve_table(&state, &officer, &table_name).await {
        Ok(table) => table,
        Err(redirect) => return redirect.into_response(),
    };

    match state.tables.fetch_all(table).await {
        Ok(data) => {
            let flashes = state.sessions.take_flashes(&officer.token).await;
            Html(views::pages::table_page(&officer.batch_number, &data, &flashes)).into_response()
        }
        Err(e) => {
            state
                .sessions
                .push_flash(&officer.token, Flash::danger(format!("An error occurred: {e}")))
                .await;
            Redirect::to("/dashboard").into_response()
        }
    }
}

/// Insert a record built from the submitted form fields
pub async fn insert_record(
    officer: CurrentOfficer,
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let table = match resolve_table(&state, &officer, &table_name).await {
        Ok(table) => table,
        Err(redirect) => return redirect.into_response(),
    };

    let flash = match state.tables.insert(table, &fields).await {
        Ok(()) => Flash::success(format!("Record inserted into {}", table.name())),
        Err(AppError::RecordExists { table }) => Flash::danger(format!(
            "Error: A record with the same value already exists in {table}."
        )),
        Err(e @ AppError::UnknownColumn { .. }) => Flash::danger(e.to_string()),
        Err(e) => Flash::danger(format!("Error inserting record: {e}")),
    };

    state.sessions.push_flash(&officer.token, flash).await;
    Redirect::to(&view_url(table)).into_response()
}

/// Update a record; the submitted fields must include the primary key
pub async fn update_record(
    officer: CurrentOfficer,
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let table = match resolve_table(&state, &officer, &table_name).await {
        Ok(table) => table,
        Err(redirect) => return redirect.into_response(),
    };

    let key = table.primary_key();
    let key_value = fields.get(key).cloned().unwrap_or_default();

    let flash = match state.tables.update(table, &fields).await {
        Ok(0) => Flash::danger(format!("No record found with {key} = {key_value}")),
        Ok(_) => Flash::success(format!(
            "Record with {key} = {key_value} updated in {}",
            table.name()
        )),
        Err(e @ (AppError::MissingKey { .. } | AppError::UnknownColumn { .. })) => {
            Flash::danger(e.to_string())
        }
        Err(e) => Flash::danger(format!("Error updating record: {e}")),
    };

    state.sessions.push_flash(&officer.token, flash).await;
    Redirect::to(&view_url(table)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub id: String,
}

/// Delete a record by its primary key
pub async fn delete_record(
    officer: CurrentOfficer,
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let table = match resolve_table(&state, &officer, &table_name).await {
        Ok(table) => table,
        Err(redirect) => return redirect.into_response(),
    };

    let key = table.primary_key();
    let flash = match state.tables.delete(table, &form.id).await {
        Ok(0) => Flash::danger(format!("No record found with {key} = {}", form.id)),
        Ok(_) => Flash::success(format!(
            "Record with {key} = {} deleted from {}",
            form.id,
            table.name()
        )),
        Err(e) => Flash::danger(format!("Error deleting record: {e}")),
    };

    state.sessions.push_flash(&officer.token, flash).await;
    Redirect::to(&view_url(table)).into_response()
}
