pub mod parse;

use crate::features::FeatureVector;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed record on line {line}: {message}")]
    Malformed { line: u64, message: String },
}

/// One (track, genre) pair.
///
/// A track tagged with three genres becomes three rows, all carrying the
/// same uri, year, popularity, and features. Genre filtering is then a
/// plain equality test. Labels are stored lowercased.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    pub uri: String,
    pub release_year: i32,
    pub popularity: f64,
    pub genre: String,
    pub features: FeatureVector,
}

/// The full queryable catalog, loaded once and immutable afterwards.
pub struct Catalog {
    rows: Vec<CatalogRow>,
    tracks: usize,
}

/// Raw CSV record, one per track, before the genre explode.
#[derive(Debug, Deserialize)]
struct RawRecord {
    uri: String,
    release_year: i32,
    popularity: f64,
    acousticness: f64,
    danceability: f64,
    energy: f64,
    instrumentalness: f64,
    valence: f64,
    tempo: f64,
    genres: String,
}

/// Summary counts for the `stats` command.
pub struct CatalogStats {
    pub tracks: usize,
    pub rows: usize,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub genres: Vec<(String, usize)>,
}

impl Catalog {
    /// Load the catalog CSV and explode each track into per-genre rows.
    ///
    /// Fails on the first unreadable or malformed record — a partially
    /// loaded catalog is never returned.
    pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
        let mut reader = csv::Reader::from_path(path)?;

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {pos} tracks {msg}")
                .unwrap()
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message("loading catalog...");

        let mut rows = Vec::new();
        let mut tracks = 0usize;

        for (index, record) in reader.deserialize::<RawRecord>().enumerate() {
            let record = record?;
            // +2: one for the header, one because lines are 1-based
            let line = index as u64 + 2;

            let genres = parse::genre_list(&record.genres).map_err(|e| {
                CatalogError::Malformed {
                    line,
                    message: e.message,
                }
            })?;

            let features = FeatureVector {
                acousticness: record.acousticness,
                danceability: record.danceability,
                energy: record.energy,
                instrumentalness: record.instrumentalness,
                valence: record.valence,
                tempo: record.tempo,
            };

            for genre in genres {
                rows.push(CatalogRow {
                    uri: record.uri.clone(),
                    release_year: record.release_year,
                    popularity: record.popularity,
                    genre,
                    features,
                });
            }

            tracks += 1;
            pb.inc(1);
        }

        pb.finish_and_clear();
        log::info!(
            "Loaded {} catalog rows from {} tracks ({})",
            rows.len(),
            tracks,
            path.display()
        );

        Ok(Catalog { rows, tracks })
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// Number of source tracks before the genre explode.
    pub fn track_count(&self) -> usize {
        self.tracks
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        let mut genres: BTreeMap<String, usize> = BTreeMap::new();
        for row in &self.rows {
            *genres.entry(row.genre.clone()).or_insert(0) += 1;
        }
        CatalogStats {
            tracks: self.tracks,
            rows: self.rows.len(),
            year_min: self.rows.iter().map(|r| r.release_year).min(),
            year_max: self.rows.iter().map(|r| r.release_year).max(),
            genres: genres.into_iter().collect(),
        }
    }

    /// Build a catalog directly from rows. Test seam; `load` is the real path.
    #[doc(hidden)]
    pub fn from_rows(rows: Vec<CatalogRow>, tracks: usize) -> Catalog {
        Catalog { rows, tracks }
    }
}
