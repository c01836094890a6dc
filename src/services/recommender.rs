use std::cmp::Ordering;

use crate::{
    dataset::Dataset,
    error::{AppError, AppResult},
    models::Recommendation,
};

/// Number of recommendations returned per movie
pub const RECOMMENDATION_COUNT: usize = 5;

/// Ranks every other column of a similarity row by descending score
///
/// The sort is stable, so equal scores keep ascending column order. `exclude`
/// (the row's own column) never appears in the output.
pub fn rank_row(row: &[f64], exclude: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(column, _)| *column != exclude)
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
}

/// Returns the movies most similar to row `index`
///
/// Yields fewer than `RECOMMENDATION_COUNT` entries when the table is too
/// small; an index outside the dataset is an internal error.
pub fn recommend(
    dataset: &Dataset,
    index: usize,
    poster_url: &str,
) -> AppResult<Vec<Recommendation>> {
    let row = dataset.similarity().row(index).ok_or_else(|| {
        AppError::Internal(format!(
            "row {} is outside the similarity matrix ({} rows)",
            index,
            dataset.similarity().size()
        ))
    })?;

    rank_row(row, index)
        .into_iter()
        .take(RECOMMENDATION_COUNT)
        .map(|(column, score)| -> AppResult<Recommendation> {
            let title = dataset.title(column).ok_or_else(|| {
                AppError::Internal(format!("no movie at row {}", column))
            })?;
            tracing::trace!(row = index, column, score, "Selected recommendation");
            Ok(Recommendation {
                title: title.to_string(),
                poster: poster_url.to_string(),
            })
        })
        .collect()
}
