/// Precomputed recommendation dataset
///
/// The movie table and its similarity matrix are produced offline and loaded
/// once at startup. Nothing here is mutated after `Dataset::load` returns.
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::{models::MovieRecord, services::resolver::TitleIndex};

pub mod files;

pub use files::FileArtifactSource;

/// Errors raised while loading or validating the dataset
///
/// All of them are fatal: the service must not start serving without a
/// consistent dataset.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid movie table {}: {reason}", .path.display())]
    InvalidTable { path: PathBuf, reason: String },

    #[error("Similarity matrix row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Similarity matrix entry ({row}, {column}) is not a finite number")]
    NonFinite { row: usize, column: usize },

    #[error("Movie table has {movies} rows but similarity matrix has {rows}")]
    DimensionMismatch { movies: usize, rows: usize },
}

/// Source of the two startup artifacts
///
/// `Dataset::load` always asks for the movie table first, then the matrix.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactSource {
    fn load_movies(&self) -> Result<Vec<MovieRecord>, DatasetError>;

    fn load_similarity(&self) -> Result<SimilarityMatrix, DatasetError>;
}

/// Square matrix of pairwise similarity scores, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Builds the matrix from its rows, rejecting ragged or non-finite input
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, DatasetError> {
        let size = rows.len();
        let mut scores = Vec::with_capacity(size * size);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(DatasetError::NotSquare {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            if let Some(column) = values.iter().position(|score| !score.is_finite()) {
                return Err(DatasetError::NonFinite { row, column });
            }
            scores.extend(values);
        }

        Ok(Self { size, scores })
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        self.scores.get(start..start + self.size)
    }
}

/// The loaded movie table, its title index and similarity matrix
#[derive(Debug)]
pub struct Dataset {
    movies: Vec<MovieRecord>,
    title_index: TitleIndex,
    similarity: SimilarityMatrix,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Assembles a dataset, checking that the matrix matches the table length
    pub fn new(
        movies: Vec<MovieRecord>,
        similarity: SimilarityMatrix,
    ) -> Result<Self, DatasetError> {
        if movies.len() != similarity.size() {
            return Err(DatasetError::DimensionMismatch {
                movies: movies.len(),
                rows: similarity.size(),
            });
        }

        let title_index = TitleIndex::build(&movies);

        Ok(Self {
            movies,
            title_index,
            similarity,
            loaded_at: Utc::now(),
        })
    }

    /// Loads both artifacts from `source` and validates them
    pub fn load<S>(source: &S) -> Result<Self, DatasetError>
    where
        S: ArtifactSource + ?Sized,
    {
        let movies = source.load_movies()?;
        tracing::debug!(movies = movies.len(), "Movie table loaded");

        let similarity = source.load_similarity()?;
        tracing::debug!(rows = similarity.size(), "Similarity matrix loaded");

        let dataset = Self::new(movies, similarity)?;

        tracing::info!(
            movies = dataset.len(),
            distinct_titles = dataset.title_index.len(),
            "Dataset ready"
        );

        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn title(&self, index: usize) -> Option<&str> {
        self.movies.get(index).map(|movie| movie.title.as_str())
    }

    /// All titles in table order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|movie| movie.title.as_str())
    }

    pub fn title_index(&self) -> &TitleIndex {
        &self.title_index
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
