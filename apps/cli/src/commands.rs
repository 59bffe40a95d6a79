//! # Command Handlers
//!
//! One function per subcommand. Each writes to the given sink so tests can
//! capture output without touching stdout.

use std::io::{Read, Write};

use margin_core::{ModeKind, PricingRequest, PricingResolver, SolveMode};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::ResolveArgs;
use crate::config::{CliConfig, OutputFormat, OutputSettings};
use crate::error::{CliResult, ErrorCode, ErrorReport};
use crate::render::{render_text, BatchBody, BatchEntry, ResolveReport};

// =============================================================================
// margin resolve
// =============================================================================

/// Resolves one cost structure and prints the outcome.
///
/// Invalid input is returned as an error. An infeasible structure prints
/// normally.
pub fn resolve<W: Write>(
    resolver: &PricingResolver,
    settings: OutputSettings,
    args: &ResolveArgs,
    out: &mut W,
) -> CliResult<()> {
    let structure = args.cost_structure();
    let mode = args.solve_mode();
    let format = args.format.unwrap_or(settings.format);
    let explain = args.explain || settings.explain;

    let outcome = resolver.resolve(&structure, mode)?;
    debug!(feasible = outcome.is_feasible(), %format, "Resolved");

    match format {
        OutputFormat::Text => out.write_all(render_text(&mode, &outcome, explain).as_bytes())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &ResolveReport::new(&outcome, explain))?;
            writeln!(out)?;
        }
    }

    Ok(())
}

// =============================================================================
// margin batch
// =============================================================================

/// Counts reported after a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub resolved: usize,
    pub infeasible: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.resolved + self.infeasible + self.failed
    }

    fn record(&mut self, body: &BatchBody) {
        match body {
            BatchBody::Resolved(_) => self.resolved += 1,
            BatchBody::Infeasible(_) => self.infeasible += 1,
            BatchBody::Error(_) => self.failed += 1,
        }
    }
}

/// Resolves a JSON array of requests, one output entry per input element.
///
/// Only a document that is not a JSON array fails the whole run. A
/// malformed or invalid element becomes an `error` entry.
pub fn batch<R: Read, W: Write>(
    resolver: &PricingResolver,
    input: R,
    pretty: bool,
    out: &mut W,
) -> CliResult<BatchSummary> {
    let elements: Vec<Value> = serde_json::from_reader(input)?;
    let mut summary = BatchSummary::default();

    let entries: Vec<BatchEntry> = elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            let id = element.get("id").and_then(Value::as_str).map(str::to_string);
            let mut element = element;
            normalize_request(&mut element);
            let body = match serde_json::from_value::<PricingRequest>(element) {
                Ok(request) => BatchBody::from(resolver.resolve_request(&request)),
                Err(err) => {
                    BatchBody::Error(ErrorReport::new(ErrorCode::ParseError, err.to_string()))
                }
            };
            debug!(index, status = body.status(), "Batch entry");
            summary.record(&body);
            BatchEntry { index, id, body }
        })
        .collect();

    if pretty {
        serde_json::to_writer_pretty(&mut *out, &entries)?;
    } else {
        serde_json::to_writer(&mut *out, &entries)?;
    }
    writeln!(out)?;

    info!(
        total = summary.total(),
        resolved = summary.resolved,
        infeasible = summary.infeasible,
        failed = summary.failed,
        "Batch complete"
    );
    Ok(summary)
}

/// Accepts the shorthand a spreadsheet export produces.
///
/// `"mode"` may use any name [`ModeKind`] parses (`by_margin`, `MARGIN`...)
/// and the target may be given as a generic `"value"`. Both are rewritten to
/// the canonical request fields. Anything unrecognised is left alone for the
/// request parser to report.
fn normalize_request(element: &mut Value) {
    let Some(object) = element.as_object_mut() else {
        return;
    };
    let Some(kind) = object
        .get("mode")
        .and_then(Value::as_str)
        .and_then(|mode| mode.parse::<ModeKind>().ok())
    else {
        return;
    };

    object.insert("mode".to_string(), Value::String(kind.to_string()));

    let target_field = SolveMode::from_parts(kind, Decimal::ZERO).target_field();
    if !object.contains_key(target_field) {
        if let Some(value) = object.remove("value") {
            object.insert(target_field.to_string(), value);
        }
    }
}

// =============================================================================
// margin config
// =============================================================================

/// Prints the effective configuration as TOML.
pub fn show_config<W: Write>(config: &CliConfig, out: &mut W) -> CliResult<()> {
    out.write_all(config.to_toml()?.as_bytes())?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
