use std::{
    collections::HashSet,
    future::Future,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use log::{debug, warn};
use reqwest::Client;

use crate::{
    api::{get_json, http_client},
    error::LoadMoreError,
    post::{normalize_page, Post, PostPage},
    prismic::{Cursor, RawPage},
};

/// Fetches the page behind a continuation cursor.
pub trait ContinuationFetcher: Sync {
    fn fetch_page(
        &self,
        cursor: &Cursor,
    ) -> impl Future<Output = Result<RawPage, LoadMoreError>> + Send;
}

/// Plain GET on the cursor url, without going through the CMS client.
#[derive(Debug, Clone)]
pub struct HttpContinuation {
    client: Client,
}

impl HttpContinuation {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = http_client(timeout)?;
        Ok(Self { client })
    }
}

impl ContinuationFetcher for HttpContinuation {
    async fn fetch_page(&self, cursor: &Cursor) -> Result<RawPage, LoadMoreError> {
        get_json(&self.client, cursor.as_url()).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
}

#[derive(Debug)]
struct State {
    posts: Vec<Post>,
    cursor: Option<Cursor>,
    phase: Phase,
}

/// "Load more" over one listing.
///
/// Starts idle on the first page. `load_more` appends the next page and
/// moves the cursor forward; a failure leaves posts and cursor as they were.
/// Only one request runs at a time, a second call while one is pending is
/// refused with [`LoadMoreError::InFlight`]. Once the cursor is gone the
/// listing is complete and every call is refused with
/// [`LoadMoreError::Exhausted`].
#[derive(Debug)]
pub struct Paginator {
    state: Mutex<State>,
}

/// Marks the paginator as loading for as long as it lives, so a dropped
/// request cannot leave it stuck.
struct InFlight<'a> {
    paginator: &'a Paginator,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.paginator.lock().phase = Phase::Idle;
    }
}

impl Paginator {
    pub fn new(initial: PostPage) -> Self {
        Self {
            state: Mutex::new(State {
                posts: initial.results,
                cursor: initial.next_page,
                phase: Phase::Idle,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn posts(&self) -> Vec<Post> {
        self.lock().posts.clone()
    }

    pub fn count(&self) -> usize {
        self.lock().posts.len()
    }

    pub fn is_complete(&self) -> bool {
        self.lock().cursor.is_none()
    }

    pub fn can_load_more(&self) -> bool {
        let state = self.lock();
        state.cursor.is_some() && state.phase == Phase::Idle
    }

    fn begin(&self) -> Result<(InFlight<'_>, Cursor), LoadMoreError> {
        let mut state = self.lock();
        if state.phase == Phase::Loading {
            return Err(LoadMoreError::InFlight);
        }
        let cursor = state.cursor.clone().ok_or(LoadMoreError::Exhausted)?;
        state.phase = Phase::Loading;
        Ok((InFlight { paginator: self }, cursor))
    }

    fn commit(&self, page: PostPage) -> usize {
        let mut state = self.lock();

        let seen: HashSet<&str> = state.posts.iter().map(|p| p.uid.as_str()).collect();
        for post in page.results.iter().filter(|p| seen.contains(p.uid.as_str())) {
            warn!("Post `{}` was already listed", post.uid);
        }

        let added = page.results.len();
        state.posts.extend(page.results);
        state.cursor = page.next_page;
        added
    }

    /// Fetch the next page and append it. Returns how many posts were added.
    pub async fn load_more(
        &self,
        fetcher: &impl ContinuationFetcher,
    ) -> Result<usize, LoadMoreError> {
        let (_in_flight, cursor) = self.begin()?;

        let raw = fetcher.fetch_page(&cursor).await?;
        let page = normalize_page(raw)?;
        let added = self.commit(page);
        debug!("{} posts loaded, {} listed", added, self.count());
        Ok(added)
    }
}
