//! Identifies the queue a writer targets.

use crate::error::WriterError;

/// Either the symbolic name of a queue, its resolved URL, or both.
///
/// When only the name is known the URL is looked up on first use.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueueIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl QueueIdentifier {
    /// A queue known only by name.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: None,
        }
    }

    /// A queue whose URL is already known.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            name: None,
            url: Some(url.into()),
        }
    }

    /// Checks that at least one field is set and that every set field is non-empty.
    pub fn validate(&self) -> Result<(), WriterError> {
        if self.name.is_none() && self.url.is_none() {
            return Err(WriterError::validation(
                "queue identifier needs a name or a url",
            ));
        }
        if matches!(self.name.as_deref(), Some("")) {
            return Err(WriterError::validation("queue name cannot be empty"));
        }
        if matches!(self.url.as_deref(), Some("")) {
            return Err(WriterError::validation("queue url cannot be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Display for QueueIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.url, &self.name) {
            (Some(url), _) => write!(f, "{}", url),
            (None, Some(name)) => write!(f, "{}", name),
            (None, None) => write!(f, "<unidentified queue>"),
        }
    }
}
