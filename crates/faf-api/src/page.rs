//! Landing page.
//!
//! Renders an Askama template with a form per transform. The page's
//! script posts to `/api/dfaf` and `/api/pfaf` and shows the result.

use askama::Template;
use axum::response::Html;

use faf_core::transform::{DEFAULT_A, DEFAULT_N_ITERATIONS, DEFAULT_NOISE_LEVEL};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    default_a: f64,
    default_n_iterations: u32,
    default_noise_level: f64,
}

fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(tmpl.render().unwrap_or_else(|e| {
        format!("<pre>Template error: {e}</pre>")
    }))
}

/// GET /
pub async fn index() -> Html<String> {
    render(IndexTemplate {
        default_a: DEFAULT_A,
        default_n_iterations: DEFAULT_N_ITERATIONS,
        default_noise_level: DEFAULT_NOISE_LEVEL,
    })
}
