use serde::{Deserialize, Serialize};

use super::PosterInfo;

/// A title the user picked, or a candidate offered for picking
///
/// `value` goes to the backend verbatim; it is percent-encoded only when the
/// request URL is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub label: String,
    pub value: String,
}

impl Selection {
    /// Selection whose label and value are both the title
    pub fn from_title(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            label: title.clone(),
            value: title,
        }
    }
}

/// Titles recommended for a selection, in backend order
pub type RecommendationResult = Vec<String>;

/// A title paired with the poster to render for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PosterCard {
    pub title: String,
    #[serde(flatten)]
    pub poster: PosterInfo,
}
