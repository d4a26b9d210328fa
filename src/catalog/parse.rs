//! Parsing for the serialized `genres` column.
//!
//! The catalog CSV carries genres as a bracket-delimited, quoted,
//! comma-separated list, e.g. `['dance pop', 'pop']`. One track can carry
//! any number of labels, including none (`[]`).

/// A genres field that doesn't follow the list serialization.
#[derive(Debug, PartialEq)]
pub struct GenreFieldError {
    pub message: String,
}

/// Parse a serialized genre list into its labels, lowercased.
///
/// Accepts single or double quotes around each label. An empty list yields
/// an empty vec. Anything not wrapped in brackets, or an unquoted element,
/// is rejected — a malformed field means a malformed record, and the loader
/// admits no partial rows.
pub fn genre_list(field: &str) -> Result<Vec<String>, GenreFieldError> {
    let trimmed = field.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| GenreFieldError {
            message: format!("genres field is not bracket-delimited: {trimmed:?}"),
        })?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut labels = Vec::new();
    for element in inner.split(", ") {
        let element = element.trim();
        let unquoted = strip_quotes(element).ok_or_else(|| GenreFieldError {
            message: format!("genre label is not quoted: {element:?}"),
        })?;
        labels.push(unquoted.to_lowercase());
    }
    Ok(labels)
}

/// Strip one matching pair of surrounding quotes, if present.
fn strip_quotes(s: &str) -> Option<&str> {
    for quote in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return Some(inner);
        }
    }
    None
}
