use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize};

use super::{ArtifactSource, DatasetError, SimilarityMatrix};
use crate::models::MovieRecord;

/// On-disk layouts accepted for the movie table
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MovieTableFile {
    /// `[{"title": "Avatar", ...}, ...]`
    Records(Vec<MovieRecord>),
    /// Column-oriented dump keyed by row label: `{"title": {"0": "Avatar", ...}, ...}`
    Columns { title: BTreeMap<String, String> },
}

impl MovieTableFile {
    /// Flattens either layout into table order
    ///
    /// Column dumps are ordered by their numeric row label; labels may have
    /// gaps, only their relative order matters.
    fn into_records(self) -> Result<Vec<MovieRecord>, String> {
        match self {
            MovieTableFile::Records(records) => Ok(records),
            MovieTableFile::Columns { title } => {
                let mut rows = title
                    .into_iter()
                    .map(|(label, title)| {
                        label
                            .parse::<u64>()
                            .map(|position| (position, title))
                            .map_err(|_| format!("row label {:?} is not an integer", label))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                rows.sort_by_key(|(position, _)| *position);
                Ok(rows
                    .into_iter()
                    .map(|(_, title)| MovieRecord::new(title))
                    .collect())
            }
        }
    }
}

/// Loads the artifacts from two JSON files on disk
#[derive(Debug, Clone)]
pub struct FileArtifactSource {
    movies_path: PathBuf,
    similarity_path: PathBuf,
}

impl FileArtifactSource {
    pub fn new(movies_path: impl Into<PathBuf>, similarity_path: impl Into<PathBuf>) -> Self {
        Self {
            movies_path: movies_path.into(),
            similarity_path: similarity_path.into(),
        }
    }

    pub fn movies_path(&self) -> &Path {
        &self.movies_path
    }

    pub fn similarity_path(&self) -> &Path {
        &self.similarity_path
    }
}

impl ArtifactSource for FileArtifactSource {
    fn load_movies(&self) -> Result<Vec<MovieRecord>, DatasetError> {
        let table: MovieTableFile = read_json(&self.movies_path)?;
        table
            .into_records()
            .map_err(|reason| DatasetError::InvalidTable {
                path: self.movies_path.clone(),
                reason,
            })
    }

    fn load_similarity(&self) -> Result<SimilarityMatrix, DatasetError> {
        let rows: Vec<Vec<f64>> = read_json(&self.similarity_path)?;
        SimilarityMatrix::from_rows(rows)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
