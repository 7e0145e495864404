use std::time::Duration;

use reqwest::{
    header::USER_AGENT,
    Client,
    Response,
};

use crate::core::LectioError;

pub fn http_client() -> Result<Client, LectioError> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| LectioError::Custom(format!("HTTP client build failed: {e}")))
}

/// Single GET, no retry. Callers surface the failure and let the user reload.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, LectioError> {
    let resp = client
        .get(url)
        .header(USER_AGENT, "lectio/0.1 (+reqwest)")
        .send()
        .await
        .map_err(|e| LectioError::ContentFetchFailed(format!("GET {}: {}", url, e)))?;

    ensure_success(&resp)?;

    resp.text()
        .await
        .map_err(|e| LectioError::ContentFetchFailed(format!("Reading body of {}: {}", url, e)))
}

fn ensure_success(resp: &Response) -> Result<(), LectioError> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(LectioError::ContentFetchFailed(format!("HTTP {} for {}", status, resp.url())))
    }
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
