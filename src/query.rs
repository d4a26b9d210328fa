use std::str::FromStr;

use clap::ValueEnum;
use thiserror::Error;

use crate::features::{FeatureVector, OutOfBounds};

#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    #[error("unrecognized genre: {0:?}")]
    UnknownGenre(String),
    #[error("year range is inverted: {start} > {end}")]
    InvertedYearRange { start: i32, end: i32 },
    #[error("feature out of bounds: {0}")]
    FeatureOutOfBounds(#[from] OutOfBounds),
}

/// The recognized genre set. Queries outside this set are rejected;
/// catalog rows outside it are simply never matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Genre {
    DancePop,
    Electronic,
    Electropop,
    HipHop,
    Jazz,
    #[value(name = "k-pop", alias = "kpop")]
    KPop,
    Latin,
    Pop,
    PopRap,
    #[value(name = "r&b", alias = "rnb")]
    RnB,
    Rock,
}

impl Genre {
    pub const ALL: [Genre; 11] = [
        Genre::DancePop,
        Genre::Electronic,
        Genre::Electropop,
        Genre::HipHop,
        Genre::Jazz,
        Genre::KPop,
        Genre::Latin,
        Genre::Pop,
        Genre::PopRap,
        Genre::RnB,
        Genre::Rock,
    ];

    /// Lowercase form used by catalog rows.
    pub fn catalog_label(&self) -> &'static str {
        match self {
            Self::DancePop => "dance pop",
            Self::Electronic => "electronic",
            Self::Electropop => "electropop",
            Self::HipHop => "hip hop",
            Self::Jazz => "jazz",
            Self::KPop => "k-pop",
            Self::Latin => "latin",
            Self::Pop => "pop",
            Self::PopRap => "pop rap",
            Self::RnB => "r&b",
            Self::Rock => "rock",
        }
    }

    /// Display form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DancePop => "Dance Pop",
            Self::Electronic => "Electronic",
            Self::Electropop => "Electropop",
            Self::HipHop => "Hip Hop",
            Self::Jazz => "Jazz",
            Self::KPop => "K-pop",
            Self::Latin => "Latin",
            Self::Pop => "Pop",
            Self::PopRap => "Pop Rap",
            Self::RnB => "R&B",
            Self::Rock => "Rock",
        }
    }
}

impl FromStr for Genre {
    type Err = QueryError;

    /// Case-insensitive lookup against the recognized set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Genre::ALL
            .into_iter()
            .find(|g| g.catalog_label() == lowered)
            .ok_or_else(|| QueryError::UnknownGenre(s.to_string()))
    }
}

/// A validated recommendation query.
///
/// Construction is the validation boundary: a `Query` that exists has a
/// recognized genre, an ordered year range, and in-bounds features, so the
/// retriever never re-checks. Full-tuple equality (`PartialEq`) is what the
/// pagination controller uses to detect a changed query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub genre: Genre,
    pub year_start: i32,
    pub year_end: i32,
    pub features: FeatureVector,
}

impl Query {
    pub fn new(
        genre: Genre,
        year_start: i32,
        year_end: i32,
        features: FeatureVector,
    ) -> Result<Query, QueryError> {
        if year_start > year_end {
            return Err(QueryError::InvertedYearRange {
                start: year_start,
                end: year_end,
            });
        }
        features.check_bounds()?;
        Ok(Query {
            genre,
            year_start,
            year_end,
            features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_features() -> FeatureVector {
        FeatureVector {
            acousticness: 0.5,
            danceability: 0.5,
            energy: 0.5,
            instrumentalness: 0.0,
            valence: 0.45,
            tempo: 118.0,
        }
    }

    #[test]
    fn test_genre_case_insensitive() {
        assert_eq!("Pop".parse::<Genre>().unwrap(), Genre::Pop);
        assert_eq!("POP RAP".parse::<Genre>().unwrap(), Genre::PopRap);
        assert_eq!("k-Pop".parse::<Genre>().unwrap(), Genre::KPop);
        assert_eq!("r&b".parse::<Genre>().unwrap(), Genre::RnB);
    }

    #[test]
    fn test_unrecognized_genre_rejected() {
        assert_eq!(
            "Opera".parse::<Genre>(),
            Err(QueryError::UnknownGenre("Opera".to_string()))
        );
    }

    #[test]
    fn test_all_labels_round_trip() {
        for genre in Genre::ALL {
            assert_eq!(genre.label().parse::<Genre>().unwrap(), genre);
            assert_eq!(genre.catalog_label().parse::<Genre>().unwrap(), genre);
        }
    }

    #[test]
    fn test_inverted_year_range_rejected() {
        let err = Query::new(Genre::Pop, 2020, 2010, default_features()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvertedYearRange {
                start: 2020,
                end: 2010
            }
        );
    }

    #[test]
    fn test_out_of_bounds_feature_rejected() {
        let mut features = default_features();
        features.tempo = 260.0;
        assert!(matches!(
            Query::new(Genre::Pop, 2015, 2019, features),
            Err(QueryError::FeatureOutOfBounds(_))
        ));
    }

    #[test]
    fn test_valid_query() {
        let query = Query::new(Genre::Pop, 2015, 2019, default_features()).unwrap();
        assert_eq!(query.genre, Genre::Pop);
        assert_eq!(query.year_start, 2015);
    }

    #[test]
    fn test_single_year_range_allowed() {
        assert!(Query::new(Genre::Jazz, 2018, 2018, default_features()).is_ok());
    }

    #[test]
    fn test_equality_is_full_tuple() {
        let a = Query::new(Genre::Pop, 2015, 2019, default_features()).unwrap();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.features.tempo = 119.0;
        assert_ne!(a, b);
    }
}
