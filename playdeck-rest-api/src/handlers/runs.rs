//! Run endpoints: start and stream a run, list runs, read run logs

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use playdeck_api_types::{CheckRequest, CheckResponse, RecordId, Run, RunLogEntry, RunRequest};
use playdeck_execution::{EventStream, ExecutionError};
use playdeck_web::JsonBody;
use serde::Deserialize;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::{
    context::RunsContext,
    errors::{RestError, RestResult},
};

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// `?task_id=` selector
#[derive(Debug, Default, Deserialize)]
pub struct TaskIdQuery {
    pub task_id: Option<String>,
}

impl TaskIdQuery {
    fn require(&self) -> RestResult<RecordId> {
        let raw = self
            .task_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RestError::bad_request("Missing task_id parameter"))?;
        raw.parse()
            .map_err(|_| RestError::bad_request(format!("Invalid task_id: '{raw}'")))
    }
}

/// Turn a run's events into a server-sent event response
///
/// One SSE message per event. Carriage returns cannot be carried in an SSE
/// data field and are dropped.
fn into_sse(events: EventStream) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = events.map(|event| Ok(Event::default().data(event.to_line().replace('\r', ""))));
    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL).text("keep-alive"))
}

/// Start a run and stream its output until it finishes
///
/// An invalid request is rejected with 400 before any run exists. Once the
/// stream is open every failure arrives as an `ERROR:` line. Disconnecting
/// does not stop the run.
pub async fn start_run(
    State(ctx): State<RunsContext>,
    JsonBody(request): JsonBody<RunRequest>,
) -> RestResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let handle = ctx.runner.start(request)?;
    info!(run_id = handle.run.id, "Streaming run output");
    Ok(into_sse(handle.events))
}

/// Attach another subscriber to a run that is still streaming
pub async fn stream_run(
    State(ctx): State<RunsContext>,
    Query(query): Query<TaskIdQuery>,
) -> RestResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let run_id = query.require()?;
    ctx.runs.get(run_id)?;

    let events = ctx
        .events
        .attach(run_id)
        .ok_or(ExecutionError::NotStreaming(run_id))?;
    info!(
        run_id,
        subscribers = ctx.events.subscriber_count(run_id),
        "Subscriber attached to live run"
    );
    Ok(into_sse(events))
}

/// All runs in creation order, including those still in flight
pub async fn list_runs(State(ctx): State<RunsContext>) -> Json<Vec<Run>> {
    Json(ctx.runs.list())
}

/// Log entries of one run in the order they were recorded
///
/// Unknown runs have no entries, so they yield an empty list.
pub async fn get_run_logs(
    State(ctx): State<RunsContext>,
    Query(query): Query<TaskIdQuery>,
) -> RestResult<Json<Vec<RunLogEntry>>> {
    let run_id = query.require()?;
    Ok(Json(ctx.logs.query(run_id)))
}

/// Dry-run a playbook; every registered host counts as affected when it passes
pub async fn check_playbook(
    State(ctx): State<RunsContext>,
    JsonBody(request): JsonBody<CheckRequest>,
) -> RestResult<Json<CheckResponse>> {
    let outcome = ctx.checker.check(&request).await?;
    let affected_hosts = if outcome.valid { ctx.hosts.list() } else { Vec::new() };

    Ok(Json(CheckResponse {
        valid: outcome.valid,
        affected_hosts,
        message: outcome.message,
    }))
}
