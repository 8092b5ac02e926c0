//! EC2 request dispatch: sign, send one GET, decode.

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::error::{ProviderError, Result};
use crate::http_client::{HttpRequest, HttpUtils};
use crate::traits::ProviderErrorMapper;

use super::params::ParameterSet;
use super::{Ec2Client, PROVIDER};

impl Ec2Client {
    /// Signs `params`, sends them and decodes a 200 response into `T`.
    ///
    /// Any other status is decoded as the XML error envelope. Transport
    /// failures are returned unchanged; nothing is retried here.
    pub async fn query<T: DeserializeOwned>(&self, params: ParameterSet) -> Result<T> {
        self.query_with_cancel(params, &CancellationToken::new())
            .await
    }

    /// Like [`query`](Self::query), aborting with `Cancelled` once `cancel` fires.
    pub async fn query_with_cancel<T: DeserializeOwned>(
        &self,
        mut params: ParameterSet,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let host = self.host()?;
        let path = match self.endpoint.path() {
            "" => "/",
            path => path,
        };
        self.signer.sign("GET", &host, path, &mut params)?;

        let mut url = self.endpoint.clone();
        url.set_path(path);
        url.set_query(Some(&params.canonical_query()));

        let action = params.get("Action").unwrap_or_default().to_string();
        log::debug!("[{PROVIDER}] Action: {action}");

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                log::debug!("[{PROVIDER}] {action} cancelled");
                return Err(ProviderError::Cancelled {
                    provider: PROVIDER.to_string(),
                });
            }
            response = self.transport.execute(HttpRequest::get(url.as_str())) => response?,
        };

        if response.status != 200 {
            let err = self.build_error(&response);
            if err.is_expected() {
                log::warn!("{err}");
            } else {
                log::error!("{err}");
            }
            return Err(err);
        }

        HttpUtils::parse_xml(&response.body, self.provider_name())
    }

    /// Endpoint host, with the port when it is not the scheme's default.
    fn host(&self) -> Result<String> {
        let host = self
            .endpoint
            .host_str()
            .ok_or_else(|| self.configuration_error("endpoint has no host"))?;
        Ok(match self.endpoint.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }
}
