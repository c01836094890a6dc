use axum::{
    extract::{Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::Recommendation,
    routes::AppState,
    services::{
        recommender,
        resolver::{self, Resolution},
        suggestions,
    },
};

/// First value of `name` in the query string
///
/// Repeated parameters are allowed; later values are ignored.
fn first_param(params: Vec<(String, String)>, name: &str) -> Option<String> {
    params
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

/// Handler for `GET /recommend?movie=<title>`
///
/// An exact title match yields the most similar movies; otherwise the
/// response is a 404 carrying close title suggestions.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let movie = match first_param(params, "movie") {
        Some(movie) if !movie.is_empty() => movie,
        _ => return Err(AppError::MissingParameter("movie")),
    };
    tracing::Span::current().record("movie", movie.as_str());

    let dataset = &state.dataset;

    match resolver::resolve(dataset.title_index(), &movie) {
        Resolution::Found(index) => {
            let recommendations = recommender::recommend(dataset, index, &state.poster_url)?;

            tracing::info!(
                request_id = %request_id,
                movie = %movie,
                row = index,
                results = recommendations.len(),
                "Recommendations served"
            );

            Ok(Json(recommendations))
        }
        Resolution::NotFound => {
            let suggestions = suggestions::suggest(&movie, dataset.titles());

            tracing::info!(
                request_id = %request_id,
                movie = %movie,
                suggestions = suggestions.len(),
                "Movie not found"
            );

            Err(AppError::MovieNotFound { suggestions })
        }
    }
}
