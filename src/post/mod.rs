pub mod detail;

pub use detail::*;

use serde::{Deserialize, Serialize};

use crate::{
    error::NormalizeError,
    prismic::{Cursor, RawDocument, RawPage},
};

/// Summary of an article, as shown in listings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub uid: String,
    pub first_publication_date: Option<String>,
    pub data: PostData,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct PostData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
}

/// One step of a listing: the posts fetched so far and where to continue.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct PostPage {
    pub next_page: Option<Cursor>,
    pub results: Vec<Post>,
}

impl PostPage {
    pub fn is_last(&self) -> bool {
        self.next_page.is_none()
    }
}

pub fn normalize_summary(raw: RawDocument) -> Result<Post, NormalizeError> {
    let uid = raw.uid.ok_or(NormalizeError::MissingUid)?;
    let Some(data) = raw.data else {
        return Err(NormalizeError::MissingData(uid));
    };

    Ok(Post {
        uid,
        first_publication_date: raw.first_publication_date,
        data: PostData {
            title: data.title,
            subtitle: data.subtitle,
            author: data.author,
        },
    })
}

/// Normalize every document of a page. A single bad document rejects the
/// whole page, so callers never see a partial one.
pub fn normalize_page(raw: RawPage) -> Result<PostPage, NormalizeError> {
    let results = raw
        .results
        .into_iter()
        .map(normalize_summary)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PostPage {
        next_page: raw.next_page,
        results,
    })
}
