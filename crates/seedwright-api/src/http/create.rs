//! Torrent authoring endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use seedwright_jobs::{JobOutcome, TorrentJobResult};
use seedwright_telemetry::JobOutcomeLabel;
use tracing::{Instrument, error, info, warn};

use crate::http::constants::CREATE_MESSAGE;
use crate::http::errors::ApiError;
use crate::models::{CreateTorrentFailure, CreateTorrentRequest, CreateTorrentResponse};
use crate::state::ApiState;

pub(crate) async fn create_torrent(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateTorrentRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let request = body.into_job_request().map_err(|err| {
        let fields: Vec<_> = err
            .violations()
            .iter()
            .map(|violation| violation.field.as_str())
            .collect();
        warn!(?fields, "rejected torrent job request");
        ApiError::from_job(&err)
    })?;

    let command = state.commands.build(&request);
    info!(
        source = request.source_path(),
        output = %command.output_path().display(),
        piece_size = request.piece_size().get(),
        "torrent job accepted"
    );

    // Detached so accounting completes even if the client goes away mid-job.
    state.telemetry.job_started();
    let started = Instant::now();
    let executor = Arc::clone(&state.executor);
    let telemetry = state.telemetry.clone();
    let job = tokio::spawn(
        async move {
            let result = executor.execute(command).await;
            telemetry.job_finished(outcome_label(result.outcome), result.elapsed);
            info!(job_id = %result.job_id, outcome = ?result.outcome, "torrent job finished");
            result
        }
        .in_current_span(),
    );
    let result = job.await.map_err(|err| {
        state
            .telemetry
            .job_finished(JobOutcomeLabel::Failed, started.elapsed());
        error!(error = %err, "torrent job task did not complete");
        ApiError::internal("torrent job aborted")
    })?;

    Ok(render_result(result))
}

const fn outcome_label(outcome: JobOutcome) -> JobOutcomeLabel {
    match outcome {
        JobOutcome::Succeeded => JobOutcomeLabel::Succeeded,
        JobOutcome::ExitedNonZero | JobOutcome::Signalled => JobOutcomeLabel::Failed,
        JobOutcome::LaunchFailed => JobOutcomeLabel::LaunchFailed,
    }
}

fn render_result(result: TorrentJobResult) -> Response {
    if result.succeeded {
        let body = CreateTorrentResponse {
            success: true,
            message: CREATE_MESSAGE.to_string(),
            output_path: result.output_path.to_string_lossy().into_owned(),
            logs: result.combined_log,
            job_id: result.job_id,
        };
        (StatusCode::OK, Json(body)).into_response()
    } else {
        let body = CreateTorrentFailure {
            success: false,
            error: result.failure_reason.unwrap_or_default(),
            code: result.exit_code,
            logs: result.combined_log,
            job_id: result.job_id,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
