//! Azure Blob Storage backend.

mod connection;
mod shared_key;

pub use connection::ConnectionInfo;

use crate::naming::encode_blob_name;
use crate::traits::{BlobStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use reqwest::header::{HeaderValue, CONTENT_LENGTH};
use reqwest::{Method, StatusCode};
use shared_key::SharedKeyCredential;

const API_VERSION: &str = "2021-08-06";
/// Anonymous read of individual blobs, but no container listing.
const PUBLIC_ACCESS_LEVEL: &str = "blob";

/// Azure Blob Storage implementation
pub struct AzureBlobStore {
    store: MicrosoftAzure,
    container: String,
    blob_endpoint: String,
}

impl AzureBlobStore {
    /// Connect to the container, creating it if needed and granting public
    /// read access to its blobs.
    ///
    /// # Arguments
    /// * `connection_string` - Azure Storage connection string (account key or `UseDevelopmentStorage=true`)
    /// * `container` - Container name
    pub async fn connect(connection_string: &str, container: &str) -> StorageResult<Self> {
        if connection_string.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "Azure Storage connection string is required".to_string(),
            ));
        }
        let info = ConnectionInfo::parse(connection_string)?;
        let credential = SharedKeyCredential::new(&info.account_name, &info.account_key)?;

        ensure_public_container(&credential, &info.blob_endpoint, container).await?;

        let store = MicrosoftAzureBuilder::new()
            .with_account(info.account_name.clone())
            .with_access_key(info.account_key.clone())
            .with_container_name(container.to_string())
            .with_endpoint(info.blob_endpoint.clone())
            .with_allow_http(info.blob_endpoint.starts_with("http://"))
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        tracing::info!(
            account = %info.account_name,
            container = %container,
            endpoint = %info.blob_endpoint,
            emulator = info.is_emulator,
            "Azure blob container ready"
        );

        Ok(AzureBlobStore {
            store,
            container: container.to_string(),
            blob_endpoint: info.blob_endpoint,
        })
    }
}

/// Create the container with blob-level public access, or apply that access
/// level if the container already exists.
async fn ensure_public_container(
    credential: &SharedKeyCredential,
    blob_endpoint: &str,
    container: &str,
) -> StorageResult<()> {
    let client = reqwest::Client::new();
    let container_url = format!("{}/{}?restype=container", blob_endpoint, container);

    let response = send_container_request(&client, credential, &container_url).await?;
    match response.status() {
        StatusCode::CREATED => {
            tracing::info!(container = %container, "Created blob container");
            return Ok(());
        }
        StatusCode::CONFLICT if error_code(&response) == Some("ContainerAlreadyExists") => {
            tracing::debug!(container = %container, "Blob container already exists");
        }
        _ => return Err(backend_error("create container", response).await),
    }

    let acl_url = format!("{}&comp=acl", container_url);
    let response = send_container_request(&client, credential, &acl_url).await?;
    if !response.status().is_success() {
        return Err(backend_error("set container access policy", response).await);
    }
    Ok(())
}

async fn send_container_request(
    client: &reqwest::Client,
    credential: &SharedKeyCredential,
    url: &str,
) -> StorageResult<reqwest::Response> {
    let date = chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();
    let mut request = client
        .request(Method::PUT, url)
        .header(CONTENT_LENGTH, HeaderValue::from_static("0"))
        .header("x-ms-version", API_VERSION)
        .header("x-ms-date", date)
        .header("x-ms-blob-public-access", PUBLIC_ACCESS_LEVEL)
        .body(Vec::new())
        .build()
        .map_err(|e| StorageError::ConfigError(format!("Invalid container URL: {}", e)))?;
    credential.authorize(&mut request)?;

    client.execute(request).await.map_err(|e| {
        StorageError::BackendError(format!("Blob service unreachable at {}: {}", url, e))
    })
}

fn error_code(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get("x-ms-error-code")
        .and_then(|v| v.to_str().ok())
}

async fn backend_error(action: &str, response: reqwest::Response) -> StorageError {
    let status = response.status();
    let code = error_code(&response).unwrap_or("unknown").to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(status = %status, code = %code, body = %body, "Failed to {}", action);
    StorageError::BackendError(format!("Failed to {}: {} {}", action, status, code))
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn exists(&self, name: &str) -> StorageResult<bool> {
        let location = Path::from(name);
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn put(&self, name: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        let size = data.len() as u64;
        let location = Path::from(name);
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                container = %self.container,
                name = %name,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Azure upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            container = %self.container,
            name = %name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Azure upload successful"
        );

        Ok(self.url_for(name))
    }

    fn url_for(&self, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.blob_endpoint,
            self.container,
            encode_blob_name(name)
        )
    }

    fn container_name(&self) -> &str {
        &self.container
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Azure
    }
}
