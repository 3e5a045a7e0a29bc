pub mod store;

pub use store::PageStore;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::{
    api::{CmsBackend, QueryOptions},
    error::PageError,
    post::{normalize_detail, normalize_page, PostDetail, PostPage},
};

pub const POSTS_TYPE: &str = "posts";
pub const LISTING_FIELDS: [&str; 3] = ["title", "subtitle", "author"];
pub const LISTING_PAGE_SIZE: u32 = 2;
/// Seconds a listing is served before it may be regenerated (30 min).
pub const LISTING_REVALIDATE: u64 = 60 * 30;

/// Data of a generated page plus its refresh policy.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GeneratedPage<P> {
    pub props: P,
    pub revalidate: Option<u64>,
    pub generated_at: DateTime<Utc>,
}

impl<P> GeneratedPage<P> {
    pub fn new(props: P, revalidate: Option<u64>) -> Self {
        Self {
            props,
            revalidate,
            generated_at: Utc::now(),
        }
    }

    /// A stale page is still served, it only becomes eligible for a
    /// regeneration in the background.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.revalidate {
            Some(seconds) => (now - self.generated_at).num_seconds() >= seconds as i64,
            None => false,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HomeProps {
    pub posts_pagination: PostPage,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PostProps {
    pub post: PostDetail,
}

/// Uids generated at build time. Other uids are generated on first request.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StaticPaths {
    pub paths: Vec<String>,
    pub fallback: bool,
}

/// What a detail request gets: the page, or the signal that it is still
/// being generated and a loading state has to be shown meanwhile.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    Fallback,
    Ready(GeneratedPage<PostProps>),
}

pub async fn listing_props(
    backend: &impl CmsBackend,
) -> Result<GeneratedPage<HomeProps>, PageError> {
    let options = QueryOptions::default()
        .fetch(&LISTING_FIELDS)
        .page_size(LISTING_PAGE_SIZE);
    let raw = backend.query_by_type(POSTS_TYPE, &options).await?;
    let posts_pagination = normalize_page(raw)?;

    Ok(GeneratedPage::new(
        HomeProps { posts_pagination },
        Some(LISTING_REVALIDATE),
    ))
}

pub async fn static_paths(backend: &impl CmsBackend) -> Result<StaticPaths, PageError> {
    let documents = backend.query_all_by_type(POSTS_TYPE).await?;
    let paths = documents
        .into_iter()
        .filter_map(|document| {
            if document.uid.is_none() {
                warn!("Skipping a `{}` document without uid", POSTS_TYPE);
            }
            document.uid
        })
        .collect();

    Ok(StaticPaths {
        paths,
        fallback: true,
    })
}

pub async fn post_props(
    backend: &impl CmsBackend,
    uid: &str,
) -> Result<GeneratedPage<PostProps>, PageError> {
    let raw = backend.query_by_uid(POSTS_TYPE, uid).await?;
    let post = normalize_detail(raw)?;
    Ok(GeneratedPage::new(PostProps { post }, None))
}

/// Generate the listing and every statically known post into `store`.
/// The first failing page aborts the build.
pub async fn build_site(
    backend: &impl CmsBackend,
    store: &PageStore,
) -> Result<StaticPaths, PageError> {
    info!("Generating listing");
    let listing = listing_props(backend).await?;
    let first_page = &listing.props.posts_pagination;
    info!(
        " + {} posts, {}",
        first_page.results.len(),
        if first_page.is_last() { "no more pages" } else { "more pages available" }
    );
    store.save_listing(&listing)?;

    info!("Generating posts");
    let paths = static_paths(backend).await?;
    for uid in &paths.paths {
        info!(" + {}", uid);
        let page = post_props(backend, uid).await?;
        store.save_post(uid, &page)?;
    }
    info!("{} posts generated", paths.paths.len());

    Ok(paths)
}

/// Serve the listing from `store`. A missing listing is generated right away,
/// a stale one is served as is and regenerated by the returned task.
pub async fn request_listing<B>(
    backend: &B,
    store: &PageStore,
) -> Result<(GeneratedPage<HomeProps>, Option<JoinHandle<Result<(), PageError>>>), PageError>
where
    B: CmsBackend + Clone + Send + 'static,
{
    let Some(page) = store.load_listing()? else {
        info!("No listing generated yet");
        let page = listing_props(backend).await?;
        store.save_listing(&page)?;
        return Ok((page, None));
    };

    if !page.is_stale(Utc::now()) {
        return Ok((page, None));
    }

    info!("Listing is stale, regenerating in the background");
    let backend = backend.clone();
    let store = store.clone();
    let task = tokio::spawn(async move {
        let page = listing_props(&backend).await?;
        store.save_listing(&page)
    });

    Ok((page, Some(task)))
}

pub fn lookup_post(store: &PageStore, uid: &str) -> Result<DetailView, PageError> {
    Ok(match store.load_post(uid)? {
        Some(page) => DetailView::Ready(page),
        None => DetailView::Fallback,
    })
}

/// First-request generation of a post that was not known at build time.
pub async fn generate_post(
    backend: &impl CmsBackend,
    store: &PageStore,
    uid: &str,
) -> Result<GeneratedPage<PostProps>, PageError> {
    let page = post_props(backend, uid).await?;
    store.save_post(uid, &page)?;
    Ok(page)
}
