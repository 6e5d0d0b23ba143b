use serde::{Deserialize, Serialize};

/// A playable unit: an opaque source reference plus a display title.
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    source_ref: String,
    title: String,
}

impl Track {
    pub fn new(source_ref: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_ref: source_ref.into(),
            title: title.into(),
        }
    }

    /// Reference the resolver turns into a playable stream.
    pub fn source_ref(&self) -> &str {
        &self.source_ref
    }

    /// Display-only title.
    pub fn title(&self) -> &str {
        &self.title
    }
}
