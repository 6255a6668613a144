//! Document-service boundary and the per-feature upsert contract.
//!
//! [`DocumentStore`] is the trait seam over the workspace API: title-equality
//! page lookup, page creation, property updates, child-block listing,
//! per-block deletion and block append. [`NotionClient`] is the concrete
//! implementation; it holds the database id and credentials, so the trait
//! stays agnostic of authentication and addressing.
//!
//! [`publish_feature`] implements the upsert: an existing page (matched by
//! exact title) gets its properties refreshed, every existing content block
//! deleted one call at a time, and the new block list appended; otherwise a
//! new page is created with the same properties and blocks. There is no
//! rollback: a failure after deletion can leave a page without content.

use async_trait::async_trait;
use mockall::automock;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::blocks::build_page_blocks;
use crate::collect::SourceFile;
use crate::parse::FeatureAnalysis;

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Properties written to a feature page on create and update.
#[derive(Debug, Clone)]
pub struct PageProperties<'a> {
    /// Page title; also the upsert key.
    pub title: &'a str,
    /// ISO-8601 date of this publication.
    pub updated: &'a str,
    /// Free-text list of the analyzed files' relative paths.
    pub file_list: &'a str,
}

/// A page handle returned by the document service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
}

/// Async interface to the document workspace. Implemented by the real API
/// client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Look up a page whose title property exactly equals `title`.
    async fn find_page_by_title(&self, title: &str) -> Result<Option<Page>, StoreError>;

    /// Create a new page under the target database with the given properties
    /// and initial content blocks.
    async fn create_page<'a>(
        &self,
        props: PageProperties<'a>,
        children: Vec<Value>,
    ) -> Result<Page, StoreError>;

    /// Update the title/date/file-list properties of an existing page.
    async fn update_page_properties<'a>(
        &self,
        page_id: &str,
        props: PageProperties<'a>,
    ) -> Result<(), StoreError>;

    /// List the ids of all existing content blocks under a page.
    async fn list_block_ids(&self, page_id: &str) -> Result<Vec<String>, StoreError>;

    /// Delete a single content block by id.
    async fn delete_block(&self, block_id: &str) -> Result<(), StoreError>;

    /// Append a block list to a page.
    async fn append_blocks(&self, page_id: &str, blocks: Vec<Value>) -> Result<(), StoreError>;
}

/// Publishes one feature's analysis: builds the block list and upserts the
/// page keyed by the feature name.
pub async fn publish_feature<S>(
    store: &S,
    feature_name: &str,
    analysis: &FeatureAnalysis,
    files: &[SourceFile],
) -> Result<Page, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let blocks = build_page_blocks(analysis);
    let updated = chrono::Local::now().format("%Y-%m-%d").to_string();
    let file_list = files
        .iter()
        .map(|f| f.rel_path.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let props = PageProperties {
        title: feature_name,
        updated: &updated,
        file_list: &file_list,
    };

    match store.find_page_by_title(feature_name).await? {
        Some(page) => {
            info!(page_id = %page.id, feature = feature_name, "Existing page found, replacing content");
            store.update_page_properties(&page.id, props).await?;
            let block_ids = store.list_block_ids(&page.id).await?;
            info!(count = block_ids.len(), page_id = %page.id, "Deleting existing content blocks");
            for block_id in &block_ids {
                store.delete_block(block_id).await?;
            }
            store.append_blocks(&page.id, blocks).await?;
            info!(page_id = %page.id, feature = feature_name, "Page content replaced");
            Ok(page)
        }
        None => {
            info!(feature = feature_name, "No existing page, creating one");
            let page = store.create_page(props, blocks).await?;
            info!(page_id = %page.id, feature = feature_name, "Page created");
            Ok(page)
        }
    }
}

const NOTION_BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Concrete client for the Notion API. Holds the integration token and the
/// target database id.
pub struct NotionClient {
    http: reqwest::Client,
    api_key: String,
    database_id: String,
}

impl NotionClient {
    pub fn new(api_key: String, database_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            database_id,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{NOTION_BASE_URL}{path}"))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn check(response: reqwest::Response) -> Result<Value, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to decode response body>"));
            error!(status = %status, "Document service returned error: {text}");
            return Err(format!("document service error ({status}): {text}").into());
        }
        Ok(response.json::<Value>().await?)
    }

    fn properties_json(props: &PageProperties<'_>) -> Value {
        json!({
            "Name": { "title": [{ "text": { "content": props.title } }] },
            "Last Updated": { "date": { "start": props.updated } },
            "Files Analyzed": { "rich_text": [{ "text": { "content": props.file_list } }] },
        })
    }
}

#[async_trait]
impl DocumentStore for NotionClient {
    async fn find_page_by_title(&self, title: &str) -> Result<Option<Page>, StoreError> {
        let body = json!({
            "filter": { "property": "Name", "title": { "equals": title } },
            "page_size": 1,
        });
        let path = format!("/databases/{}/query", self.database_id);
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(&body)
            .send()
            .await?;
        let json_val = Self::check(response).await?;
        let page = json_val
            .get("results")
            .and_then(|v| v.as_array())
            .and_then(|results| results.first())
            .and_then(|page| page.get("id"))
            .and_then(|id| id.as_str())
            .map(|id| Page { id: id.to_string() });
        Ok(page)
    }

    async fn create_page<'a>(
        &self,
        props: PageProperties<'a>,
        children: Vec<Value>,
    ) -> Result<Page, StoreError> {
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": Self::properties_json(&props),
            "children": children,
        });
        let response = self
            .request(reqwest::Method::POST, "/pages")
            .json(&body)
            .send()
            .await?;
        let json_val = Self::check(response).await?;
        let id = json_val
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or("create page response missing id")?;
        Ok(Page { id: id.to_string() })
    }

    async fn update_page_properties<'a>(
        &self,
        page_id: &str,
        props: PageProperties<'a>,
    ) -> Result<(), StoreError> {
        let body = json!({ "properties": Self::properties_json(&props) });
        let path = format!("/pages/{page_id}");
        let response = self
            .request(reqwest::Method::PATCH, &path)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_block_ids(&self, page_id: &str) -> Result<Vec<String>, StoreError> {
        let mut block_ids = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut path = format!("/blocks/{page_id}/children?page_size=100");
            if let Some(c) = &cursor {
                path.push_str(&format!("&start_cursor={c}"));
            }
            let response = self.request(reqwest::Method::GET, &path).send().await?;
            let json_val = Self::check(response).await?;

            if let Some(results) = json_val.get("results").and_then(|v| v.as_array()) {
                for block in results {
                    if let Some(id) = block.get("id").and_then(|id| id.as_str()) {
                        block_ids.push(id.to_string());
                    }
                }
            }

            let has_more = json_val
                .get("has_more")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if !has_more {
                break;
            }
            cursor = json_val
                .get("next_cursor")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            if cursor.is_none() {
                break;
            }
        }
        Ok(block_ids)
    }

    async fn delete_block(&self, block_id: &str) -> Result<(), StoreError> {
        let path = format!("/blocks/{block_id}");
        let response = self.request(reqwest::Method::DELETE, &path).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn append_blocks(&self, page_id: &str, blocks: Vec<Value>) -> Result<(), StoreError> {
        let body = json!({ "children": blocks });
        let path = format!("/blocks/{page_id}/children");
        let response = self
            .request(reqwest::Method::PATCH, &path)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
