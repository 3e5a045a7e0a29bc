//! In-memory stand-ins for the repository, shared by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use serde_json::{json, Value};

use crate::{
    api::{CmsBackend, QueryOptions},
    error::{CmsError, LoadMoreError},
    paginate::ContinuationFetcher,
    prismic::{Cursor, RawDocument, RawPage},
};

pub fn cursor(url: &str) -> Cursor {
    serde_json::from_value(json!(url)).unwrap()
}

pub fn document(uid: &str) -> RawDocument {
    serde_json::from_value(json!({
        "uid": uid,
        "first_publication_date": "2021-03-15T19:25:28+0000",
        "data": {
            "title": format!("Título {}", uid),
            "subtitle": format!("Subtítulo {}", uid),
            "author": "Joseph Oliveira",
            "banner": { "url": format!("https://images.prismic.io/{}.png", uid) },
            "content": [
                { "heading": "Introdução", "body": [{ "type": "paragraph", "text": "Lorem ipsum", "spans": [] }] }
            ]
        }
    }))
    .unwrap()
}

/// Repository of `posts` documents. `query_by_type` only serves the first page.
#[derive(Debug, Clone, Default)]
pub struct FakeCms {
    documents: Vec<RawDocument>,
    pub unavailable: bool,
    pub queries: Arc<Mutex<Vec<(String, QueryOptions)>>>,
}

impl FakeCms {
    pub fn new(uids: &[&str]) -> Self {
        Self {
            documents: uids.iter().map(|uid| document(uid)).collect(),
            ..Default::default()
        }
    }

    pub fn with_documents(documents: Vec<RawDocument>) -> Self {
        Self {
            documents,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), CmsError> {
        if self.unavailable {
            return Err(CmsError::RemoteUnavailable("connection refused".into()));
        }
        Ok(())
    }
}

impl CmsBackend for FakeCms {
    async fn query_by_type(
        &self,
        type_name: &str,
        options: &QueryOptions,
    ) -> Result<RawPage, CmsError> {
        self.check()?;
        self.queries
            .lock()
            .unwrap()
            .push((type_name.to_string(), options.clone()));

        let size = options.page_size.unwrap_or(20) as usize;
        let results: Vec<_> = self.documents.iter().take(size).cloned().collect();
        let next_page = (self.documents.len() > size).then(|| cursor("https://fake/page/2"));
        Ok(RawPage { results, next_page })
    }

    async fn query_all_by_type(&self, _type_name: &str) -> Result<Vec<RawDocument>, CmsError> {
        self.check()?;
        Ok(self.documents.clone())
    }

    async fn query_by_uid(&self, type_name: &str, uid: &str) -> Result<RawDocument, CmsError> {
        self.check()?;
        self.documents
            .iter()
            .find(|d| d.uid.as_deref() == Some(uid))
            .cloned()
            .ok_or_else(|| CmsError::NotFound {
                type_name: type_name.to_string(),
                uid: uid.to_string(),
            })
    }
}

/// Continuation endpoint answering from a table of cursor url -> body.
#[derive(Debug, Default)]
pub struct FakeContinuation {
    pages: HashMap<String, Value>,
    fail: AtomicUsize,
    pub requested: Mutex<Vec<String>>,
}

impl FakeContinuation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: Value) -> Self {
        self.pages.insert(url.to_string(), body);
        self
    }

    /// Make the next `count` requests fail like a dropped connection.
    pub fn fail_next(&self, count: usize) {
        self.fail.store(count, Ordering::SeqCst);
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl ContinuationFetcher for FakeContinuation {
    async fn fetch_page(&self, cursor: &Cursor) -> Result<RawPage, LoadMoreError> {
        let url = cursor.as_url().to_string();
        self.requested.lock().unwrap().push(url.clone());
        tokio::task::yield_now().await;

        let failing = self
            .fail
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(LoadMoreError::Remote("connection reset".into()));
        }

        let body = self
            .pages
            .get(&url)
            .cloned()
            .ok_or_else(|| LoadMoreError::Malformed(format!("no page at {}", url)))?;
        Ok(serde_json::from_value(body)?)
    }
}
