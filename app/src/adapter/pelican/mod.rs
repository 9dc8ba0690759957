mod client;
mod request;
mod response;

pub use client::PelicanClient;

use infrastructure::HttpClientConfig;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://{site}.officeclimatecontrol.net/api.cgi";

#[derive(Debug, Clone, Deserialize)]
pub struct Pelican {
    pub site: String,
    pub username: String,
    pub password: String,
    //`{site}` is replaced by the site name
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

impl Pelican {
    pub fn endpoint(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .replace("{site}", &self.site)
    }

    pub fn new_client(&self) -> anyhow::Result<PelicanClient> {
        let http_client = HttpClientConfig::new(self.user_agent.clone()).new_tracing_client()?;

        Ok(PelicanClient::new(
            http_client,
            self.endpoint(),
            self.username.clone(),
            self.password.clone(),
        ))
    }
}
