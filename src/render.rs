//! Server-side rendering of the page shell.
//!
//! The page carries the serialized layout in a JSON script element; `assets/dashboard.js` reads it
//! and draws the components. Bootstrap (Flatly theme) and plotly.js come from public CDNs.

use crate::layout::Layout;
use crate::Result;
use anyhow::Context;

pub const STYLESHEET_URL: &str =
    "https://cdn.jsdelivr.net/npm/bootswatch@5.3.3/dist/flatly/bootstrap.min.css";
pub const PLOTLY_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// The route the page script is served from.
pub const SCRIPT_PATH: &str = "/assets/dashboard.js";

/// The page script.
pub const SCRIPT: &str = include_str!("assets/dashboard.js");

/// Renders the HTML page for `layout`.
pub fn page(layout: &Layout) -> Result<String> {
    let json = serde_json::to_string(layout).context("Unable to serialize the page layout")?;
    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{STYLESHEET_URL}">
<script src="{PLOTLY_URL}"></script>
</head>
<body>
<div id="app"></div>
<script id="layout" type="application/json">{layout}</script>
<script src="{SCRIPT_PATH}"></script>
</body>
</html>
"#,
        title = escape_html(layout.title()),
        layout = escape_script(&json),
    ))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `<` only ever appears inside JSON strings, where `\u003c` reads back as the same character and
/// can no longer close the script element.
fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
}
