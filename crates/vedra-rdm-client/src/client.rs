//! Repository API client using reqwest

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use vedra_domain::Record;
use vedra_editor::{
    ApiConfig, DraftReceipt, Identity, MetadataRepository, PublishReceipt, RepositoryError,
};

use crate::error::{check_status, HttpError};
use crate::types::{
    DraftPayload, DraftResponse, FileListing, SearchResponse, UploadRequest, UploadSlot,
};

pub struct RdmClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl RdmClient {
    pub fn new(config: &ApiConfig) -> Result<Self, HttpError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| HttpError::InvalidUrl {
            url: config.base_url.clone(),
        })?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| HttpError::RequestFailed {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            user_agent: config.user_agent.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/api/records`
    pub fn url(&self, path: &str) -> Result<Url, HttpError> {
        let url = format!("{}{}", self.base_url, path);
        Url::parse(&url).map_err(|_| HttpError::InvalidUrl { url })
    }

    fn url_with_params(&self, path: &str, params: &[(&str, String)]) -> Result<Url, HttpError> {
        let url = format!("{}{}", self.base_url, path);
        Url::parse_with_params(&url, params).map_err(|_| HttpError::InvalidUrl { url })
    }

    fn authorized(&self, request: RequestBuilder, identity: Option<&Identity>) -> RequestBuilder {
        let request = request.header("User-Agent", &self.user_agent);
        match identity.and_then(|i| i.access_token.as_deref()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<String, HttpError> {
        let response = request.send().await.map_err(HttpError::from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(HttpError::from_reqwest)?;
        debug!(status, what, "repository response");
        check_status(status, &body, what)?;
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, HttpError> {
        let body = self.send(request, what).await?;
        serde_json::from_str(&body).map_err(HttpError::parse)
    }

    // =========================================================================
    // Browsing
    // =========================================================================

    /// Search published records. An empty query lists everything.
    pub async fn search_records(
        &self,
        query: &str,
        size: u32,
        page: u32,
    ) -> Result<SearchResponse, HttpError> {
        let mut params = Vec::new();
        if !query.is_empty() {
            params.push(("q", query.to_string()));
        }
        params.push(("size", size.to_string()));
        params.push(("page", page.to_string()));
        let url = self.url_with_params("/api/records", &params)?;
        self.send_json(self.authorized(self.client.get(url), None), "record search")
            .await
    }

    /// A published record, as returned by the repository
    pub async fn get_record(&self, id: &str) -> Result<serde_json::Value, HttpError> {
        let url = self.url(&format!("/api/records/{}", urlencoding::encode(id)))?;
        self.send_json(self.authorized(self.client.get(url), None), &format!("record {}", id))
            .await
    }

    pub async fn get_record_files(&self, id: &str) -> Result<FileListing, HttpError> {
        let url = self.url(&format!("/api/records/{}/files", urlencoding::encode(id)))?;
        self.send_json(
            self.authorized(self.client.get(url), None),
            &format!("files of record {}", id),
        )
        .await
    }

    pub async fn download_file(&self, id: &str, filename: &str) -> Result<Vec<u8>, HttpError> {
        let url = self.url(&format!(
            "/api/records/{}/files/{}/content",
            urlencoding::encode(id),
            urlencoding::encode(filename)
        ))?;
        let what = format!("file {} of record {}", filename, id);
        let response = self
            .authorized(self.client.get(url), None)
            .send()
            .await
            .map_err(HttpError::from_reqwest)?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            check_status(status, &body, &what)?;
            return Err(HttpError::Status { status, body });
        }
        let bytes = response.bytes().await.map_err(HttpError::from_reqwest)?;
        Ok(bytes.to_vec())
    }

    /// Facet counts for the search page
    pub async fn search_facets(&self) -> Result<serde_json::Value, HttpError> {
        let url = self.url("/api/records/facets")?;
        self.send_json(self.authorized(self.client.get(url), None), "facets")
            .await
    }

    /// Ask for a pre-signed upload slot
    pub async fn create_upload(
        &self,
        filename: &str,
        content_type: &str,
        identity: &Identity,
    ) -> Result<UploadSlot, HttpError> {
        let url = self.url("/papers/uploads")?;
        let body = UploadRequest {
            filename,
            content_type,
        };
        let request = self.authorized(self.client.post(url), Some(identity)).json(&body);
        self.send_json(request, "upload slot").await
    }

    // =========================================================================
    // Drafts
    // =========================================================================

    pub async fn create_draft(
        &self,
        record: &Record,
        identity: &Identity,
    ) -> Result<DraftResponse, HttpError> {
        let url = self.url("/api/records")?;
        let request = self
            .authorized(self.client.post(url), Some(identity))
            .json(&DraftPayload::new(record));
        let draft: DraftResponse = self.send_json(request, "new draft").await?;
        info!(draft_id = %draft.id, "created draft");
        Ok(draft)
    }

    pub async fn update_draft(
        &self,
        draft_id: &str,
        record: &Record,
        identity: &Identity,
    ) -> Result<DraftResponse, HttpError> {
        let url = self.url(&format!("/api/records/{}/draft", urlencoding::encode(draft_id)))?;
        let request = self
            .authorized(self.client.put(url), Some(identity))
            .json(&DraftPayload::new(record));
        self.send_json(request, &format!("draft {}", draft_id)).await
    }

    pub async fn publish_draft(
        &self,
        draft_id: &str,
        identity: &Identity,
    ) -> Result<DraftResponse, HttpError> {
        let url = self.url(&format!(
            "/api/records/{}/draft/actions/publish",
            urlencoding::encode(draft_id)
        ))?;
        let request = self.authorized(self.client.post(url), Some(identity));
        let record: DraftResponse = self
            .send_json(request, &format!("draft {}", draft_id))
            .await?;
        info!(record_id = %record.id, doi = ?record.doi(), "published draft");
        Ok(record)
    }
}

impl MetadataRepository for RdmClient {
    async fn save_draft(
        &self,
        record: &Record,
        draft_id: Option<&str>,
        identity: &Identity,
    ) -> Result<DraftReceipt, RepositoryError> {
        let draft = match draft_id {
            Some(id) => self.update_draft(id, record, identity).await?,
            None => self.create_draft(record, identity).await?,
        };
        Ok(DraftReceipt { draft_id: draft.id })
    }

    /// Bring the draft up to date (creating it if needed), then publish it
    async fn publish(
        &self,
        record: &Record,
        draft_id: Option<&str>,
        identity: &Identity,
    ) -> Result<PublishReceipt, RepositoryError> {
        let draft = match draft_id {
            Some(id) => self.update_draft(id, record, identity).await?,
            None => self.create_draft(record, identity).await?,
        };
        let published = self.publish_draft(&draft.id, identity).await?;
        let receipt = PublishReceipt::new(published.id.clone());
        Ok(match published.doi() {
            Some(doi) => receipt.with_doi(doi),
            None => receipt,
        })
    }
}

impl std::fmt::Debug for RdmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdmClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
