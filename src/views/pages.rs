use serde_json::Value;

use crate::models::report::SavingsReport;
use crate::models::table::TableRows;
use crate::services::report_service::CHART_FILES;
use crate::services::session_service::Flash;
use crate::views::{escape, layout};

/// Public landing page.
pub fn index_page() -> String {
    let body = r#"<h1>Inventory Management</h1>
        <p>Internal inventory dashboard for authorized officers.</p>
        <p><a href="/login">Log in</a> with your batch number to continue.</p>"#;
    layout("Home", None, &[], body)
}

/// Login form; `error` re-renders the form with the generic failure message.
pub fn login_page(error: Option<&str>) -> String {
    let message = match error {
        Some(text) => format!(r#"<div class="banner danger">{}</div>"#, escape(text)),
        None => String::new(),
    };

    let body = format!(
        r#"<h1>Officer Login</h1>
        {message}
        <form method="post" action="/login">
            <label>Batch number <input type="text" name="batch_number" required></label><br>
            <label>Password <input type="password" name="password" required></label><br>
            <button type="submit">Log in</button>
        </form>"#,
    );
    layout("Login", None, &[], &body)
}

pub fn dashboard_page(batch_number: &str, flashes: &[Flash]) -> String {
    let body = format!(
        r#"<h1>Welcome, officer {}</h1>
        <p>Select a table to browse, or open the cost savings report.</p>
        <ul>
            <li><a href="/view/tables/weapons">Weapons</a></li>
            <li><a href="/view/tables/items">Items</a></li>
            <li><a href="/view/tables/technical_items">Technical Items</a></li>
            <li><a href="/view/tables/history">History</a></li>
            <li><a href="/cost_savings_analysis">Cost Savings Analysis</a></li>
        </ul>"#,
        escape(batch_number)
    );
    layout("Dashboard", Some(batch_number), flashes, &body)
}

/// Table browser: all rows plus insert/update/delete forms.
pub fn table_page(batch_number: &str, data: &TableRows, flashes: &[Flash]) -> String {
    let table_name = data.table.name();

    let header: String = data
        .columns
        .iter()
        .map(|c| format!("<th>{}</th>", escape(c)))
        .collect();

    let rows: String = data
        .rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|v| format!("<td>{}</td>", render_value(v)))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    let insert_inputs: String = data
        .columns
        .iter()
        .map(|c| {
            format!(
                r#"<label>{name} <input type="text" name="{name}"></label>"#,
                name = escape(c)
            )
        })
        .collect();

    let update_inputs = insert_inputs.clone();
    let primary_key = data.table.primary_key();

    let body = format!(
        r#"<h1>Table: {table}</h1>
        <table>
            <thead><tr>{header}</tr></thead>
            <tbody>{rows}</tbody>
        </table>
        <fieldset>
            <legend>Insert record</legend>
            <form method="post" action="/insert/{table}">
                {insert_inputs}
                <button type="submit">Insert</button>
            </form>
        </fieldset>
        <fieldset>
            <legend>Update record (requires {pk})</legend>
            <form method="post" action="/update/{table}">
                {update_inputs}
                <button type="submit">Update</button>
            </form>
        </fieldset>
        <fieldset>
            <legend>Delete record</legend>
            <form method="post" action="/delete/{table}" class="inline">
                <label>{pk} <input type="text" name="id" required></label>
                <button type="submit">Delete</button>
            </form>
        </fieldset>"#,
        table = table_name,
        header = header,
        rows = rows,
        insert_inputs = insert_inputs,
        update_inputs = update_inputs,
        pk = primary_key,
    );

    layout(table_name, Some(batch_number), flashes, &body)
}

/// Cost savings report: computed figures plus the four rendered charts.
pub fn report_page(batch_number: &str, report: &SavingsReport) -> String {
    let rows: String = report
        .entries
        .iter()
        .map(|e| {
            format!(
                "<tr><td>{}</td><td>{:.0}%</td><td>{:.2}</td></tr>",
                escape(e.model),
                e.percentage * 100.0,
                e.amount
            )
        })
        .collect();

    let charts: String = CHART_FILES
        .iter()
        .map(|file| format!(r#"<img src="/static/{file}" alt="{file}">"#))
        .collect();

    let body = format!(
        r#"<h1>Cost Savings Analysis</h1>
        <p>Total inventory value: {total:.2} INR &middot; generated {generated}</p>
        <table>
            <thead><tr><th>Model</th><th>Percentage</th><th>Savings (INR)</th></tr></thead>
            <tbody>{rows}</tbody>
        </table>
        <div class="charts">{charts}</div>"#,
        total = report.total_inventory_value,
        generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        rows = rows,
        charts = charts,
    );

    layout("Cost Savings Analysis", Some(batch_number), &[], &body)
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => escape(s),
        other => escape(&other.to_string()),
    }
}
