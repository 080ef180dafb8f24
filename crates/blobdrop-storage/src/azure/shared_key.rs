//! SharedKey request signing for the Blob service REST API.
//!
//! Only used for container management; object reads and writes go through
//! `object_store`, which signs its own requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::header::{
    HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_ENCODING, CONTENT_LANGUAGE, CONTENT_LENGTH,
    CONTENT_TYPE, IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_UNMODIFIED_SINCE, RANGE,
};
use reqwest::{Method, Request, Url};
use sha2::Sha256;

use crate::traits::{StorageError, StorageResult};

type HmacSha256 = Hmac<Sha256>;

pub struct SharedKeyCredential {
    account: String,
    key: Vec<u8>,
}

impl SharedKeyCredential {
    pub fn new(account: &str, base64_key: &str) -> StorageResult<Self> {
        let key = STANDARD.decode(base64_key).map_err(|e| {
            StorageError::ConfigError(format!("AccountKey is not valid base64: {}", e))
        })?;
        Ok(Self {
            account: account.to_string(),
            key,
        })
    }

    /// Add the `Authorization` header. `x-ms-date` and `x-ms-version` must already be set.
    pub fn authorize(&self, request: &mut Request) -> StorageResult<()> {
        let to_sign = string_to_sign(
            request.method(),
            request.headers(),
            request.url(),
            &self.account,
        );
        let value = format!("SharedKey {}:{}", self.account, self.sign(&to_sign)?);
        let value = HeaderValue::from_str(&value)
            .map_err(|e| StorageError::ConfigError(format!("Invalid authorization: {}", e)))?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }

    fn sign(&self, string_to_sign: &str) -> StorageResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| StorageError::ConfigError(format!("Invalid account key: {}", e)))?;
        mac.update(string_to_sign.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &reqwest::header::HeaderName) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

pub(crate) fn string_to_sign(
    method: &Method,
    headers: &HeaderMap,
    url: &Url,
    account: &str,
) -> String {
    // Zero length is signed as an empty string.
    let content_length = match header(headers, &CONTENT_LENGTH) {
        "0" => "",
        other => other,
    };

    let mut ms_headers: Vec<(String, String)> = headers
        .iter()
        .filter(|(name, _)| name.as_str().starts_with("x-ms-"))
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or("").trim().to_string(),
            )
        })
        .collect();
    ms_headers.sort();
    let canonical_headers: String = ms_headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect();

    let mut query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.to_lowercase(), v.into_owned()))
        .collect();
    query.sort();
    let mut canonical_resource = format!("/{}{}", account, url.path());
    for (key, value) in query {
        canonical_resource.push_str(&format!("\n{}:{}", key, value));
    }

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}{}",
        method.as_str(),
        header(headers, &CONTENT_ENCODING),
        header(headers, &CONTENT_LANGUAGE),
        content_length,
        header(headers, &reqwest::header::HeaderName::from_static("content-md5")),
        header(headers, &CONTENT_TYPE),
        "", // Date: x-ms-date is used instead
        header(headers, &IF_MODIFIED_SINCE),
        header(headers, &IF_MATCH),
        header(headers, &IF_NONE_MATCH),
        header(headers, &IF_UNMODIFIED_SINCE),
        header(headers, &RANGE),
        canonical_headers,
        canonical_resource
    )
}
