use serde::{Deserialize, Serialize};

/// A document as the repository sends it. Everything is optional so that a
/// partially filled document still deserializes; the normalizer decides what
/// is actually required.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    pub uid: Option<String>,
    pub first_publication_date: Option<String>,
    pub data: Option<RawData>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RawData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub banner: Option<RawBanner>,
    pub content: Option<Vec<RawContentBlock>>,
}

/// Image field. An empty image field is sent as `{}`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RawBanner {
    pub url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RawContentBlock {
    pub heading: Option<String>,
    pub body: Option<Vec<RawRichText>>,
}

/// One rich text node. Only the text survives normalization, spans and
/// node types are dropped.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RawRichText {
    pub text: Option<String>,
}
