//! `fafd eval` — run a single transform request outside the server.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;
use tracing::info;

use faf_core::{LimitsConfig, TransformKind, TransformRequest};

/// Read a request body from `input` (stdin when `None` or `-`), run it and
/// write `{"result": ...}` followed by a newline to `out`.
pub fn run(
    kind: TransformKind,
    input: Option<&Path>,
    limits: &LimitsConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let raw = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let response = evaluate(kind, &raw, limits)?;
    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    Ok(())
}

/// Decode and run one request body.
pub fn evaluate(
    kind: TransformKind,
    raw: &str,
    limits: &LimitsConfig,
) -> anyhow::Result<serde_json::Value> {
    let body: serde_json::Value = serde_json::from_str(raw).context("request body is not JSON")?;
    let req = TransformRequest::decode(kind, &body, limits)?;
    info!(
        transform = %kind,
        elements = req.x.len(),
        n_iterations = req.n_iterations,
        "evaluating"
    );
    let result = req.run()?;
    Ok(serde_json::json!({ "result": result }))
}
