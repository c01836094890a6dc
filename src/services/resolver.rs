use std::collections::HashMap;

use crate::models::MovieRecord;

/// Outcome of resolving a user-supplied title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Row index of the matching movie
    Found(usize),
    NotFound,
}

/// Normalized title -> row index
///
/// When several rows normalize to the same title the first row wins, so a
/// lookup returns the same row a scan in table order would.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    rows: HashMap<String, usize>,
}

impl TitleIndex {
    pub fn build(movies: &[MovieRecord]) -> Self {
        let mut rows = HashMap::with_capacity(movies.len());
        for (index, movie) in movies.iter().enumerate() {
            rows.entry(normalize_title(&movie.title)).or_insert(index);
        }
        Self { rows }
    }

    /// Number of distinct normalized titles
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trims surrounding whitespace and lowercases
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Resolves a title by exact, case- and whitespace-insensitive match
pub fn resolve(index: &TitleIndex, title: &str) -> Resolution {
    match index.rows.get(&normalize_title(title)) {
        Some(&row) => Resolution::Found(row),
        None => Resolution::NotFound,
    }
}
