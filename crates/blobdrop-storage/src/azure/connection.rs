//! Azure Storage connection string parsing.

use crate::traits::{StorageError, StorageResult};

/// Account used by the Azurite emulator.
pub const EMULATOR_ACCOUNT: &str = "devstoreaccount1";
/// Published, fixed key of the Azurite emulator account.
pub const EMULATOR_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const EMULATOR_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

/// The parts of a connection string the blob store needs.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub account_name: String,
    /// Base64 account key, as it appears in the connection string
    pub account_key: String,
    /// Blob service URL without trailing slash
    pub blob_endpoint: String,
    pub is_emulator: bool,
}

impl std::fmt::Debug for ConnectionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionInfo")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .field("blob_endpoint", &self.blob_endpoint)
            .field("is_emulator", &self.is_emulator)
            .finish()
    }
}

impl ConnectionInfo {
    /// Parse `Key=Value;Key=Value` pairs. Keys are matched case-insensitively;
    /// values may themselves contain `=` (base64 padding).
    pub fn parse(connection_string: &str) -> StorageResult<Self> {
        let mut protocol = None;
        let mut account_name = None;
        let mut account_key = None;
        let mut endpoint_suffix = None;
        let mut blob_endpoint = None;
        let mut development = false;

        for pair in connection_string.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                StorageError::ConfigError(format!(
                    "Malformed connection string segment '{}'",
                    pair.split('=').next().unwrap_or_default()
                ))
            })?;
            let value = value.trim().to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "defaultendpointsprotocol" => protocol = Some(value),
                "accountname" => account_name = Some(value),
                "accountkey" => account_key = Some(value),
                "endpointsuffix" => endpoint_suffix = Some(value),
                "blobendpoint" => blob_endpoint = Some(value),
                "usedevelopmentstorage" => development = value.eq_ignore_ascii_case("true"),
                "sharedaccesssignature" => {
                    return Err(StorageError::ConfigError(
                        "SAS connection strings are not supported; use an account key".to_string(),
                    ))
                }
                // QueueEndpoint, TableEndpoint, FileEndpoint, ...
                _ => {}
            }
        }

        if development {
            return Ok(ConnectionInfo {
                account_name: EMULATOR_ACCOUNT.to_string(),
                account_key: EMULATOR_KEY.to_string(),
                blob_endpoint: blob_endpoint
                    .unwrap_or_else(|| EMULATOR_BLOB_ENDPOINT.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                is_emulator: true,
            });
        }

        let account_name = account_name.ok_or_else(|| {
            StorageError::ConfigError("Connection string is missing AccountName".to_string())
        })?;
        let account_key = account_key.ok_or_else(|| {
            StorageError::ConfigError("Connection string is missing AccountKey".to_string())
        })?;

        let blob_endpoint = match blob_endpoint {
            Some(endpoint) => endpoint,
            None => format!(
                "{}://{}.blob.{}",
                protocol.as_deref().unwrap_or("https"),
                account_name,
                endpoint_suffix.as_deref().unwrap_or("core.windows.net")
            ),
        };

        Ok(ConnectionInfo {
            account_name,
            account_key,
            blob_endpoint: blob_endpoint.trim_end_matches('/').to_string(),
            is_emulator: false,
        })
    }
}
