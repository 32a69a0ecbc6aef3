//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::projection::{EntityKind, QueryError, RenderSession, time_series};

use super::AppState;
use super::types::{ErrorResponse, GraphQuery, GraphResponse, NetworkInfo, SeriesResponse};

/// Returns dataset metadata and timestep labels.
///
/// `GET /network` → 200 + `NetworkInfo` JSON
pub async fn get_network(State(state): State<Arc<AppState>>) -> Json<NetworkInfo> {
    Json(NetworkInfo::from(&state.snapshot))
}

/// Returns the full projected view at a timestep.
///
/// `GET /graph?t=N` → 200 + `GraphResponse` JSON
/// `GET /graph?t=<out of range>` → 400 + `ErrorResponse`
///
/// An empty snapshot has no valid timestep, but still serves `t=0` as an
/// empty view so clients render the fallback without a special case.
pub async fn get_graph(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GraphQuery>,
) -> impl IntoResponse {
    let t = query.t.unwrap_or(0);
    let count = state.snapshot.timestep_count();
    if t >= count && !(t == 0 && count == 0) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("timestep {t} out of range (0..{count})"),
            }),
        ));
    }

    let mut session = RenderSession::new();
    let view = session.build_initial(&state.snapshot, t);
    Ok(Json(GraphResponse::from(view)))
}

/// Returns the chart payload for a selected element.
///
/// `GET /series/{kind}/{id}` → 200 + `SeriesResponse` JSON
/// Unknown kind → 400; unknown id → 404.
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, String)>,
) -> impl IntoResponse {
    let Ok(kind) = kind.parse::<EntityKind>() else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("unknown entity kind `{kind}` (expected bus, generator, load, or storage)"),
            }),
        ));
    };

    match time_series(&state.snapshot, &id, kind) {
        Ok(chart) => Ok(Json(SeriesResponse::from(&chart))),
        Err(err @ QueryError::NotFound { .. }) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )),
    }
}
