//! GCE HTTP 请求方法

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::Result;
use crate::http_client::{HttpMethod, HttpRequest, HttpUtils};
use crate::traits::ProviderErrorMapper;
use crate::utils::log_sanitizer::truncate_for_log;

use super::{GceClient, PROVIDER};

impl GceClient {
    /// `{base}/{project}/{path}` with `query` appended.
    pub(crate) fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let raw = format!("{}/{}/{path}", self.base_url, self.project);
        let mut url = Url::parse(&raw)
            .map_err(|e| self.configuration_error(format!("invalid URL '{raw}': {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.url(path, query)?;
        self.send(HttpRequest::new(HttpMethod::Get, url.as_str())).await
    }

    /// 执行 POST 请求 (JSON body)
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path, &[])?;
        let body = serde_json::to_string(body)
            .map_err(|e| self.parse_error(format!("failed to encode request body: {e}")))?;
        log::debug!("[{PROVIDER}] Request Body: {}", truncate_for_log(&body));
        self.send(
            HttpRequest::new(HttpMethod::Post, url.as_str())
                .header("Content-Type", "application/json")
                .body(body),
        )
        .await
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path, &[])?;
        self.send(HttpRequest::new(HttpMethod::Delete, url.as_str()))
            .await
    }

    async fn send<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let request = request.header("Authorization", format!("Bearer {}", self.access_token));

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            let err = self.build_error(&response);
            if err.is_expected() {
                log::warn!("{err}");
            } else {
                log::error!("{err}");
            }
            return Err(err);
        }

        HttpUtils::parse_json(&response.body, self.provider_name())
    }
}
