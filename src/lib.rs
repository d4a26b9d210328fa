pub mod catalog;
pub mod config;
pub mod features;
pub mod paging;
pub mod query;
pub mod recommend;

/// Audio feature columns, in the order they appear in feature vectors
pub const AUDIO_FEATURES: &[&str] = &[
    "acousticness",
    "danceability",
    "energy",
    "instrumentalness",
    "valence",
    "tempo",
];

/// Application name for XDG paths
pub const APP_NAME: &str = "needledrop";
