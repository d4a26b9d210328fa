use std::cmp::Ordering;

use crate::catalog::{Catalog, CatalogRow};
use crate::features::{FEATURE_DIM, FeatureVector, euclidean};
use crate::query::Query;

/// Candidate pool cap. Only the most popular tracks survive into the
/// neighbor index, which bounds its size and biases results toward
/// well-known tracks — an obscure track never surfaces even when it is a
/// closer feature match. Intentional trade-off.
pub const MAX_CANDIDATES: usize = 500;

/// One ranked result: an opaque playback URI plus the track's features.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub uri: String,
    pub features: FeatureVector,
}

/// An ordered result set, ascending by distance from the query vector.
/// Recomputed per query; never persisted.
#[derive(Debug, Default, PartialEq)]
pub struct Ranking {
    entries: Vec<Recommendation>,
}

impl Ranking {
    pub fn entries(&self) -> &[Recommendation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flat nearest-neighbor index over candidate feature vectors.
///
/// With at most `MAX_CANDIDATES` entries a linear scan beats anything
/// fancier; `rank` returns a full ordering, not a top-k cutoff.
pub struct NeighborIndex {
    vectors: Vec<[f64; FEATURE_DIM]>,
}

impl NeighborIndex {
    pub fn fit(vectors: Vec<[f64; FEATURE_DIM]>) -> NeighborIndex {
        NeighborIndex { vectors }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Indices of every fitted vector, ascending by Euclidean distance to
    /// the probe. The sort is stable, so equal distances keep insertion
    /// order — deterministic for identical inputs.
    pub fn rank(&self, probe: &[f64; FEATURE_DIM]) -> Vec<usize> {
        let mut order: Vec<(usize, f64)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, euclidean(probe, v)))
            .collect();
        order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        order.into_iter().map(|(i, _)| i).collect()
    }
}

/// Rank catalog tracks for a query.
///
/// Filters rows to the query's genre and inclusive year range, keeps the
/// `MAX_CANDIDATES` most popular, then orders them by feature distance.
/// Pure function of catalog + query; an empty candidate set is an empty
/// ranking, not an error.
pub fn recommend(catalog: &Catalog, query: &Query) -> Ranking {
    let genre = query.genre.catalog_label();

    let mut candidates: Vec<&CatalogRow> = catalog
        .rows()
        .iter()
        .filter(|row| {
            row.genre == genre
                && row.release_year >= query.year_start
                && row.release_year <= query.year_end
        })
        .collect();

    // Stable sort: ties in popularity keep catalog order
    candidates.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(Ordering::Equal)
    });
    candidates.truncate(MAX_CANDIDATES);

    log::debug!(
        "{} candidates for {} [{}-{}]",
        candidates.len(),
        query.genre.label(),
        query.year_start,
        query.year_end
    );

    let index = NeighborIndex::fit(candidates.iter().map(|r| r.features.as_array()).collect());
    let order = index.rank(&query.features.as_array());

    Ranking {
        entries: order
            .into_iter()
            .map(|i| Recommendation {
                uri: candidates[i].uri.clone(),
                features: candidates[i].features,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Genre;

    fn features(tempo: f64) -> FeatureVector {
        FeatureVector {
            acousticness: 0.5,
            danceability: 0.5,
            energy: 0.5,
            instrumentalness: 0.0,
            valence: 0.45,
            tempo,
        }
    }

    fn row(uri: &str, year: i32, popularity: f64, genre: &str, tempo: f64) -> CatalogRow {
        CatalogRow {
            uri: uri.to_string(),
            release_year: year,
            popularity,
            genre: genre.to_string(),
            features: features(tempo),
        }
    }

    fn catalog(rows: Vec<CatalogRow>) -> Catalog {
        let tracks = rows.len();
        Catalog::from_rows(rows, tracks)
    }

    fn pop_query(year_start: i32, year_end: i32, tempo: f64) -> Query {
        Query::new(Genre::Pop, year_start, year_end, features(tempo)).unwrap()
    }

    fn uris(ranking: &Ranking) -> Vec<&str> {
        ranking.entries().iter().map(|r| r.uri.as_str()).collect()
    }

    #[test]
    fn test_year_range_inclusive() {
        let catalog = catalog(vec![
            row("uri:2016", 2016, 50.0, "pop", 118.0),
            row("uri:2018", 2018, 50.0, "pop", 118.0),
            row("uri:2020", 2020, 50.0, "pop", 118.0),
        ]);
        let ranking = recommend(&catalog, &pop_query(2015, 2019, 118.0));
        let mut got = uris(&ranking);
        got.sort();
        assert_eq!(got, vec!["uri:2016", "uri:2018"]);
    }

    #[test]
    fn test_genre_filter() {
        let catalog = catalog(vec![
            row("uri:pop", 2018, 50.0, "pop", 118.0),
            row("uri:rock", 2018, 90.0, "rock", 118.0),
            row("uri:dance", 2018, 90.0, "dance pop", 118.0),
        ]);
        let ranking = recommend(&catalog, &pop_query(2015, 2019, 118.0));
        assert_eq!(uris(&ranking), vec!["uri:pop"]);
    }

    #[test]
    fn test_ordered_by_ascending_distance() {
        let catalog = catalog(vec![
            row("uri:far", 2018, 50.0, "pop", 180.0),
            row("uri:near", 2018, 50.0, "pop", 120.0),
            row("uri:mid", 2018, 50.0, "pop", 140.0),
        ]);
        let ranking = recommend(&catalog, &pop_query(2015, 2019, 118.0));
        assert_eq!(uris(&ranking), vec!["uri:near", "uri:mid", "uri:far"]);

        let probe = features(118.0).as_array();
        let distances: Vec<f64> = ranking
            .entries()
            .iter()
            .map(|r| euclidean(&probe, &r.features.as_array()))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_empty_candidate_set_is_empty_ranking() {
        let catalog = catalog(vec![row("uri:a", 1980, 50.0, "pop", 118.0)]);
        let ranking = recommend(&catalog, &pop_query(2015, 2019, 118.0));
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_single_candidate_ranking() {
        let catalog = catalog(vec![row("uri:only", 2018, 50.0, "pop", 90.0)]);
        let ranking = recommend(&catalog, &pop_query(2015, 2019, 118.0));
        assert_eq!(uris(&ranking), vec!["uri:only"]);
    }

    #[test]
    fn test_truncated_to_most_popular() {
        // 510 candidates; the 10 least popular never reach the index,
        // even the one with a perfect feature match.
        let mut rows = Vec::new();
        for i in 0..510 {
            rows.push(row(&format!("uri:{i}"), 2018, i as f64, "pop", 200.0));
        }
        rows.push(row("uri:obscure-match", 2018, -1.0, "pop", 118.0));
        let ranking = recommend(&catalog(rows), &pop_query(2015, 2019, 118.0));

        assert_eq!(ranking.len(), MAX_CANDIDATES);
        assert!(!uris(&ranking).contains(&"uri:obscure-match"));
    }

    #[test]
    fn test_ties_keep_popularity_order() {
        // Identical features → equal distance; popularity decides
        let catalog = catalog(vec![
            row("uri:b-pop60", 2018, 60.0, "pop", 130.0),
            row("uri:a-pop90", 2018, 90.0, "pop", 130.0),
            row("uri:c-pop30", 2018, 30.0, "pop", 130.0),
        ]);
        let ranking = recommend(&catalog, &pop_query(2015, 2019, 118.0));
        assert_eq!(uris(&ranking), vec!["uri:a-pop90", "uri:b-pop60", "uri:c-pop30"]);
    }

    #[test]
    fn test_idempotent() {
        let catalog = catalog(vec![
            row("uri:a", 2016, 40.0, "pop", 100.0),
            row("uri:b", 2017, 80.0, "pop", 140.0),
            row("uri:c", 2018, 60.0, "pop", 118.0),
        ]);
        let query = pop_query(2015, 2019, 118.0);
        let first = recommend(&catalog, &query);
        let second = recommend(&catalog, &query);
        assert_eq!(first, second);
    }

    #[test]
    fn test_neighbor_index_degenerate() {
        let empty = NeighborIndex::fit(Vec::new());
        assert!(empty.rank(&features(118.0).as_array()).is_empty());

        let single = NeighborIndex::fit(vec![features(90.0).as_array()]);
        assert_eq!(single.rank(&features(118.0).as_array()), vec![0]);
    }

    #[test]
    fn test_tempo_dominates_unscaled_distance() {
        // No feature scaling: a few BPM of tempo gap outweighs maximal
        // differences across every unit-range feature.
        let near_tempo = CatalogRow {
            uri: "uri:near-tempo".to_string(),
            release_year: 2018,
            popularity: 50.0,
            genre: "pop".to_string(),
            features: FeatureVector {
                acousticness: 1.0,
                danceability: 1.0,
                energy: 1.0,
                instrumentalness: 1.0,
                valence: 1.0,
                tempo: 119.0,
            },
        };
        let near_ratios = row("uri:near-ratios", 2018, 50.0, "pop", 124.0);
        let ranking = recommend(
            &catalog(vec![near_ratios, near_tempo]),
            &pop_query(2015, 2019, 118.0),
        );
        assert_eq!(uris(&ranking), vec!["uri:near-tempo", "uri:near-ratios"]);
    }
}
