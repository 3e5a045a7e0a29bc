pub mod prismic;

use std::{future::Future, time::Duration};

use log::{debug, log_enabled, trace};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;

use crate::{
    config::CmsConfig,
    error::CmsError,
    prismic::{RawDocument, RawPage},
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// What a listing query should bring back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Field names to restrict documents to. Only a projection hint.
    pub fetch: Vec<String>,
    pub page_size: Option<u32>,
}

impl QueryOptions {
    pub fn fetch(mut self, fields: &[&str]) -> Self {
        self.fetch = fields.iter().map(|f| f.to_string()).collect();
        self
    }
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Read access to the content repository.
pub trait CmsBackend: Sync {
    /// First page of the documents of one type.
    fn query_by_type(
        &self,
        type_name: &str,
        options: &QueryOptions,
    ) -> impl Future<Output = Result<RawPage, CmsError>> + Send;

    /// Every document of one type, following continuation cursors.
    fn query_all_by_type(
        &self,
        type_name: &str,
    ) -> impl Future<Output = Result<Vec<RawDocument>, CmsError>> + Send;

    /// The document of `type_name` with `uid`, or `CmsError::NotFound`.
    fn query_by_uid(
        &self,
        type_name: &str,
        uid: &str,
    ) -> impl Future<Output = Result<RawDocument, CmsError>> + Send;
}

/// reqwest client shared by the CMS client and the continuation fetcher.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// GET `url` and decode its JSON body.
pub async fn get_json<T, E>(client: &Client, url: &str) -> Result<T, E>
where
    T: DeserializeOwned,
    E: From<reqwest::Error> + From<serde_json::Error>,
{
    debug!("GET {}", url);
    let response = client
        .get(url)
        .header(header::ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()?;
    let body = response.bytes().await?;

    if log_enabled!(log::Level::Trace) {
        trace!("{}", String::from_utf8_lossy(&body));
    }

    Ok(serde_json::from_slice(&body)?)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        let client = http_client(config.timeout)?;
        Ok(Self { client })
    }

    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, CmsError> {
        get_json(&self.client, url).await
    }
}
