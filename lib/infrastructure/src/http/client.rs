use anyhow::Context as _;
use reqwest::header::{self, HeaderMap};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpClientConfig {
    user_agent: Option<String>,
}

impl HttpClientConfig {
    pub fn new(user_agent: Option<String>) -> Self {
        Self { user_agent }
    }

    //Vendor API expects plain query-string requests, no auth header. Credentials travel in the query.
    pub fn new_tracing_client(&self) -> anyhow::Result<ClientWithMiddleware> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/xml, text/xml"));

        if let Some(agent) = &self.user_agent {
            let value = header::HeaderValue::from_str(agent)
                .with_context(|| format!("Invalid user agent {}", agent))?;
            headers.insert(header::USER_AGENT, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(reqwest_middleware::ClientBuilder::new(client)
            .with(TracingMiddleware::default())
            .build())
    }
}
