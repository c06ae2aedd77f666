//! Server-rendered HTML views (string-built, no client-side logic).

pub mod pages;

use crate::services::session_service::Flash;

/// Escape text interpolated into HTML.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shared page frame: nav bar, flash banners, body.
pub fn layout(title: &str, batch_number: Option<&str>, flashes: &[Flash], body: &str) -> String {
    let nav = match batch_number {
        Some(batch) => format!(
            r#"<a href="/dashboard">Dashboard</a>
            <a href="/view/tables/weapons">Weapons</a>
            <a href="/view/tables/items">Items</a>
            <a href="/view/tables/technical_items">Technical Items</a>
            <a href="/view/tables/history">History</a>
            <a href="/cost_savings_analysis">Cost Savings</a>
            <span class="officer">Officer {}</span>
            <a href="/logout">Logout</a>"#,
            escape(batch)
        ),
        None => r#"<a href="/login">Login</a>"#.to_string(),
    };

    let banners: String = flashes
        .iter()
        .map(|f| {
            format!(
                r#"<div class="banner {}">{}</div>"#,
                f.level.css_class(),
                escape(&f.message)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Inventory</title>
    <style>{css}</style>
</head>
<body>
    <nav><a href="/">Home</a> {nav}</nav>
    <div class="container">
        {banners}
        {body}
    </div>
</body>
</html>"#,
        title = escape(title),
        css = inline_css(),
        nav = nav,
        banners = banners,
        body = body,
    )
}

/// Standalone error page used by the fallback error responder.
pub fn error_page(status: u16, message: &str) -> String {
    let body = format!(
        r#"<h1>Error {status}</h1>
        <p>{}</p>
        <p><a href="/dashboard">Back to dashboard</a></p>"#,
        escape(message)
    );
    layout("Error", None, &[], &body)
}

fn inline_css() -> &'static str {
    r#"
    body { font-family: sans-serif; margin: 0; background: #F2E9D8; color: #051940; }
    nav { background: #092C73; padding: 0.7em 1em; }
    nav a { color: #F2CD88; margin-right: 1em; text-decoration: none; }
    nav .officer { color: #F2E9D8; margin-right: 1em; }
    .container { padding: 1em 2em; }
    .banner { padding: 0.6em 1em; margin: 0.5em 0; border-radius: 4px; }
    .banner.success { background: #d8f2dc; border: 1px solid #2c7344; }
    .banner.danger { background: #f2d8d8; border: 1px solid #732c2c; }
    table { border-collapse: collapse; margin: 1em 0; background: white; }
    th, td { border: 1px solid #594031; padding: 0.4em 0.8em; text-align: left; }
    th { background: #092C73; color: #F2E9D8; }
    form.inline { display: inline; }
    fieldset { margin: 1em 0; border: 1px solid #594031; background: white; }
    input[type=text], input[type=password] { margin: 0.2em 0.4em 0.2em 0; }
    .charts img { max-width: 100%; margin: 1em 0; display: block; }
    "#
}
