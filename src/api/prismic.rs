use log::{debug, info};
use url::Url;

use crate::{
    config::CmsConfig,
    error::CmsError,
    prismic::{RawDocument, RawPage, Repository},
};

use super::{ApiClient, CmsBackend, QueryOptions};

/// Page size used when walking a whole document type.
const ALL_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct PrismicClient {
    inner: ApiClient,
    endpoint: Url,
    access_token: Option<String>,
}

impl PrismicClient {
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        let inner = ApiClient::new(config)?;
        let endpoint = Url::parse(&config.endpoint)?;
        let access_token = config.access_token.clone();
        Ok(Self {
            inner,
            endpoint,
            access_token,
        })
    }

    fn repository_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }
        url
    }

    /// Build a search url against `reference`. Pure, so it can be checked
    /// without a repository.
    pub fn search_url(
        &self,
        reference: &str,
        predicate: &str,
        options: &QueryOptions,
        type_name: &str,
    ) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("documents").push("search");
        }

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ref", reference);
            query.append_pair("q", &format!("[{}]", predicate));
            if let Some(page_size) = options.page_size {
                query.append_pair("pageSize", &page_size.to_string());
            }
            if !options.fetch.is_empty() {
                let fields: Vec<String> = options
                    .fetch
                    .iter()
                    .map(|field| format!("{}.{}", type_name, field))
                    .collect();
                query.append_pair("fetch", &fields.join(","));
            }
            if let Some(token) = &self.access_token {
                query.append_pair("access_token", token);
            }
        }
        url
    }

    async fn master_ref(&self) -> Result<String, CmsError> {
        let url = self.repository_url();
        let repository: Repository = self.inner.fetch(url.as_str()).await?;
        repository
            .master_ref()
            .map(str::to_string)
            .ok_or_else(|| CmsError::MalformedResponse("repository has no master ref".into()))
    }

    async fn search(
        &self,
        predicate: &str,
        options: &QueryOptions,
        type_name: &str,
    ) -> Result<RawPage, CmsError> {
        let reference = self.master_ref().await?;
        let url = self.search_url(&reference, predicate, options, type_name);
        self.inner.fetch(url.as_str()).await
    }
}

fn type_predicate(type_name: &str) -> String {
    format!("[at(document.type,\"{}\")]", type_name)
}

fn uid_predicate(type_name: &str, uid: &str) -> String {
    let uid = uid.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[at(my.{}.uid,\"{}\")]", type_name, uid)
}

impl CmsBackend for PrismicClient {
    async fn query_by_type(
        &self,
        type_name: &str,
        options: &QueryOptions,
    ) -> Result<RawPage, CmsError> {
        let page = self
            .search(&type_predicate(type_name), options, type_name)
            .await?;
        debug!(
            "{} `{}` documents on the first page",
            page.results.len(),
            type_name
        );
        Ok(page)
    }

    async fn query_all_by_type(&self, type_name: &str) -> Result<Vec<RawDocument>, CmsError> {
        let options = QueryOptions::default().page_size(ALL_PAGE_SIZE);
        let page = self
            .search(&type_predicate(type_name), &options, type_name)
            .await?;

        let mut next_page = page.next_page;
        let mut list = page.results;
        while let Some(cursor) = next_page {
            let page: RawPage = self.inner.fetch(cursor.as_url()).await?;
            list.extend(page.results);
            next_page = page.next_page;
        }

        info!("{} `{}` documents in the repository", list.len(), type_name);
        Ok(list)
    }

    async fn query_by_uid(&self, type_name: &str, uid: &str) -> Result<RawDocument, CmsError> {
        let options = QueryOptions::default().page_size(1);
        let page = self
            .search(&uid_predicate(type_name, uid), &options, type_name)
            .await?;

        page.results
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::NotFound {
                type_name: type_name.to_string(),
                uid: uid.to_string(),
            })
    }
}
