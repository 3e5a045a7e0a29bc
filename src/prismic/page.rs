use std::fmt;

use serde::{Deserialize, Serialize};

use super::RawDocument;

/// Continuation token handed out by the repository.
///
/// It is an opaque URL: it can only come out of a response, and it is only
/// ever replayed as is.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub(crate) fn as_url(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cursor(..)")
    }
}

/// Search response. Continuation fetches answer with the same shape.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RawPage {
    pub results: Vec<RawDocument>,
    pub next_page: Option<Cursor>,
}
