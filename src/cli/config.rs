use crate::client::{ClientError, HttpGroupApi};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Where the CLI talks to and with which token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: String,
    pub token: Option<String>,
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self::from_values(std::env::var("SOKOL_API_URL").ok(), std::env::var("SOKOL_TOKEN").ok())
    }

    fn from_values(api_url: Option<String>, token: Option<String>) -> Self {
        Self {
            api_url: api_url
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn api(&self) -> Result<HttpGroupApi, ClientError> {
        HttpGroupApi::new(&self.api_url, self.token.clone())
    }
}
