//! Cloudinary asset backend.
//!
//! Uploads go through the signed upload API with a `format` parameter so the
//! CDN normalises every image to one canonical format. Deletes use the signed
//! destroy API. Signatures are SHA-256 over the alphabetically sorted
//! parameters followed by the API secret.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

use super::backend::AssetStore;
use super::public_id::PublicId;
use super::types::{ImagePayload, StoredAsset};
use super::validation::validate_segment;
use crate::config::CloudinaryConfig;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    #[serde(default)]
    bytes: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Cloudinary-backed asset store.
#[derive(Clone)]
pub struct CloudinaryAssetStore {
    client: reqwest::Client,
    api_base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
    format: String,
}

impl std::fmt::Debug for CloudinaryAssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryAssetStore")
            .field("api_base_url", &self.api_base_url)
            .field("cloud_name", &self.cloud_name)
            .field("folder", &self.folder)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl CloudinaryAssetStore {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing, the folder is unsafe, or
    /// the HTTP client cannot be constructed.
    pub fn new(config: &CloudinaryConfig, folder: &str) -> Result<Self> {
        validate_segment(folder)?;
        if config.cloud_name.is_empty() || config.api_key.is_empty() || config.api_secret.is_empty()
        {
            bail!("Cloudinary credentials are incomplete");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build Cloudinary HTTP client")?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: folder.to_string(),
            format: config.format.clone(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{action}",
            self.api_base_url, self.cloud_name
        )
    }

    /// Builds the canonical `k=v&k=v<secret>` string for signing.
    fn string_to_sign(params: &[(&str, String)], secret: &str) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let joined = sorted
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        format!("{joined}{secret}")
    }

    fn sign(&self, params: &[(&str, String)]) -> String {
        let digest = Sha256::digest(Self::string_to_sign(params, &self.api_secret).as_bytes());
        hex::encode(digest)
    }

    /// Signed form fields shared by upload and destroy.
    fn signed_form(&self, params: Vec<(&'static str, String)>) -> Form {
        let signature = self.sign(&params);
        let mut form = Form::new()
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }
        form
    }

    async fn read_error(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        format!("{status}: {}", body.chars().take(200).collect::<String>())
    }
}

#[async_trait]
impl AssetStore for CloudinaryAssetStore {
    fn name(&self) -> &'static str {
        "cloudinary"
    }

    async fn store(&self, payload: &ImagePayload) -> Result<StoredAsset> {
        let timestamp = Utc::now().timestamp().to_string();
        let params = vec![
            ("folder", self.folder.clone()),
            ("format", self.format.clone()),
            ("timestamp", timestamp),
        ];

        let file_name = payload
            .file_name
            .clone()
            .unwrap_or_else(|| format!("upload.{}", payload.extension()));
        let part = Part::bytes(payload.bytes.to_vec())
            .file_name(file_name)
            .mime_str(&payload.resolved_content_type())
            .context("Invalid content type for upload")?;
        let form = self.signed_form(params).part("file", part);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .context("Cloudinary upload request failed")?;

        if !response.status().is_success() {
            bail!("Cloudinary upload rejected ({})", Self::read_error(response).await);
        }

        let body: UploadResponse = response
            .json()
            .await
            .context("Failed to parse Cloudinary upload response")?;
        let public_id = PublicId::from_url(&body.secure_url)?;

        Ok(StoredAsset {
            url: body.secure_url,
            public_id,
            size: body.bytes.unwrap_or(payload.len() as u64),
        })
    }

    async fn remove(&self, id: &PublicId) -> Result<bool> {
        let timestamp = Utc::now().timestamp().to_string();
        let params = vec![("public_id", id.to_string()), ("timestamp", timestamp)];

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .multipart(self.signed_form(params))
            .send()
            .await
            .context("Cloudinary destroy request failed")?;

        if !response.status().is_success() {
            bail!("Cloudinary destroy rejected ({})", Self::read_error(response).await);
        }

        let body: DestroyResponse = response
            .json()
            .await
            .context("Failed to parse Cloudinary destroy response")?;

        match body.result.as_str() {
            "ok" => Ok(true),
            "not found" => Ok(false),
            other => bail!("Cloudinary destroy returned '{other}'"),
        }
    }
}
