//! REST API endpoint handlers.
//!
//! All handlers read the immutable rule table out of the shared
//! [`AppState`] and hand validated configurations to the engine through
//! `vivarium-core`.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/new_single_sim` | Validated single run |
//! | `GET` | `/api/new_random_sim` | Randomized single run |
//! | `GET` | `/api/new_multiple_sim/{iterations}` | Concurrent randomized batch |
//!
//! Every simulation endpoint accepts an optional `data` query parameter
//! selecting the projected tally: `alive` (default), `killed`, or
//! `spawned`.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use tracing::info;
use vivarium_core::{BatchOutcome, EngineError, project_rounds, run_batch};
use vivarium_rules::{RawValueMap, sample_config, validate};
use vivarium_types::{RoundSummary, SimulationConfig, SummaryKind};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page listing the API endpoints.
pub async fn index() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Vivarium API</title>
</head>
<body>
    <h1>Vivarium API</h1>
    <p>Creature simulation runs as a service.</p>
    <ul>
        <li><a href="/api/new_single_sim">/api/new_single_sim</a> -- validated single run (?rows=..&amp;cols=..&amp;draw=..&amp;foods=..&amp;creature1=..&amp;creature2=..)</li>
        <li><a href="/api/new_random_sim">/api/new_random_sim</a> -- randomized single run</li>
        <li><a href="/api/new_multiple_sim/10">/api/new_multiple_sim/{iterations}</a> -- concurrent randomized batch (1-100)</li>
    </ul>
    <p>All endpoints accept <code>?data=alive|killed|spawned</code>.</p>
</body>
</html>"#,
    )
}

// ---------------------------------------------------------------------------
// GET /api/new_single_sim -- validated single run
// ---------------------------------------------------------------------------

/// Validate query parameters against the rule table and run one
/// simulation.
///
/// Recognized keys: `rows`, `cols`, `draw`, `foods`, `creature1`,
/// `creature2`, `maxrounds`, `gamelogsize`. Unrecognized keys are
/// ignored; absent keys take their standard values.
pub async fn new_single_sim(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Vec<RoundSummary>>, ApiError> {
    let kind = summary_kind(&params)?;
    let raw = RawValueMap::from_query(&params);
    let config = validate(&raw, &state.rules)?;

    info!(
        rows = config.rows,
        cols = config.cols,
        creature1 = config.creature1,
        creature2 = config.creature2,
        "starting single simulation"
    );

    let rounds = run_one(&state, config, kind).await?;
    Ok(Json(rounds))
}

// ---------------------------------------------------------------------------
// GET /api/new_random_sim -- randomized single run
// ---------------------------------------------------------------------------

/// Draw a random configuration from the standard intervals and run one
/// simulation.
pub async fn new_random_sim(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Vec<RoundSummary>>, ApiError> {
    let kind = summary_kind(&params)?;
    let config = {
        let mut rng = rand::rng();
        sample_config(&state.rules, &state.intervals, &mut rng)?
    };

    info!(
        rows = config.rows,
        cols = config.cols,
        creature1 = config.creature1,
        creature2 = config.creature2,
        "starting random simulation"
    );

    let rounds = run_one(&state, config, kind).await?;
    Ok(Json(rounds))
}

// ---------------------------------------------------------------------------
// GET /api/new_multiple_sim/{iterations} -- concurrent batch
// ---------------------------------------------------------------------------

/// Run a concurrent batch of randomized simulations.
///
/// `iterations` must be an integer in `[1, 100]`. Each unit samples its
/// own configuration; a failed unit is reported in the response instead
/// of aborting its siblings.
pub async fn new_multiple_sim(
    State(state): State<Arc<AppState>>,
    Path(iterations): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<BatchOutcome>, ApiError> {
    let kind = summary_kind(&params)?;
    let iterations: u32 = iterations
        .parse()
        .map_err(|_parse_error| ApiError::InvalidIterations { raw: iterations })?;

    info!(iterations, "starting concurrent batch");

    let outcome = run_batch(
        Arc::clone(&state.engine),
        Arc::clone(&state.rules),
        Arc::clone(&state.intervals),
        iterations,
        kind,
        state.request_timeout,
    )
    .await?;

    info!(
        succeeded = outcome.runs.len(),
        failed = outcome.failures.len(),
        "batch converged"
    );

    Ok(Json(outcome))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the `data` query parameter into a summary kind.
fn summary_kind(params: &BTreeMap<String, String>) -> Result<SummaryKind, ApiError> {
    match params.get("data") {
        None => Ok(SummaryKind::AliveAtEnd),
        Some(raw) => Ok(raw.parse()?),
    }
}

/// Run one simulation on the blocking pool under the request deadline.
async fn run_one(
    state: &AppState,
    config: SimulationConfig,
    kind: SummaryKind,
) -> Result<Vec<RoundSummary>, ApiError> {
    let engine = Arc::clone(&state.engine);
    let task = tokio::task::spawn_blocking(move || engine.run(&config));

    let board = match tokio::time::timeout(state.request_timeout, task).await {
        Err(_elapsed) => return Err(ApiError::Timeout),
        Ok(Err(join_error)) => {
            return Err(ApiError::from(EngineError::new(join_error.to_string())));
        }
        Ok(Ok(result)) => result?,
    };

    Ok(project_rounds(&board, kind))
}
