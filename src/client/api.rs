use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use url::Url;

use crate::database::models::{BatchPayload, Group, GroupWithMembers, Location, Member, Program};
use crate::handlers::protected::groups::{CreateGroupRequest, UpdateGroupRequest};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Transport used by the group form. `HttpGroupApi` is the real one.
#[async_trait]
pub trait GroupApi: Send + Sync {
    async fn list_groups(&self) -> Result<Vec<Group>, ClientError>;
    async fn get_group(&self, id: &str) -> Result<GroupWithMembers, ClientError>;
    async fn create_group(&self, payload: &CreateGroupRequest) -> Result<GroupWithMembers, ClientError>;
    async fn update_group(&self, id: &str, payload: &UpdateGroupRequest) -> Result<BatchPayload, ClientError>;
    async fn delete_group(&self, id: &str) -> Result<BatchPayload, ClientError>;
    async fn list_members(&self) -> Result<Vec<Member>, ClientError>;
    async fn list_programs(&self) -> Result<Vec<Program>, ClientError>;
    async fn list_locations(&self) -> Result<Vec<Location>, ClientError>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct HttpGroupApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpGroupApi {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Build `<base>/<segments...>` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope = response
            .json::<Envelope<T>>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl GroupApi for HttpGroupApi {
    async fn list_groups(&self) -> Result<Vec<Group>, ClientError> {
        let url = self.endpoint(&["groups"])?;
        self.send(self.client.get(url)).await
    }

    async fn get_group(&self, id: &str) -> Result<GroupWithMembers, ClientError> {
        let url = self.endpoint(&["groups", id])?;
        self.send(self.client.get(url)).await
    }

    async fn create_group(&self, payload: &CreateGroupRequest) -> Result<GroupWithMembers, ClientError> {
        let url = self.endpoint(&["groups"])?;
        self.send(self.client.post(url).json(payload)).await
    }

    async fn update_group(&self, id: &str, payload: &UpdateGroupRequest) -> Result<BatchPayload, ClientError> {
        let url = self.endpoint(&["groups", id])?;
        self.send(self.client.patch(url).json(payload)).await
    }

    async fn delete_group(&self, id: &str) -> Result<BatchPayload, ClientError> {
        let url = self.endpoint(&["groups", id])?;
        self.send(self.client.delete(url)).await
    }

    async fn list_members(&self) -> Result<Vec<Member>, ClientError> {
        let url = self.endpoint(&["members"])?;
        self.send(self.client.get(url)).await
    }

    async fn list_programs(&self) -> Result<Vec<Program>, ClientError> {
        let url = self.endpoint(&["programs"])?;
        self.send(self.client.get(url)).await
    }

    async fn list_locations(&self) -> Result<Vec<Location>, ClientError> {
        let url = self.endpoint(&["locations"])?;
        self.send(self.client.get(url)).await
    }
}

/// Everything the group edit page needs before rendering the form
#[derive(Debug, Clone)]
pub struct FormContext {
    pub group: Option<GroupWithMembers>,
    pub programs: Vec<Program>,
    pub locations: Vec<Location>,
    pub members: Vec<Member>,
}

/// Load the group (if any) and the lookup lists concurrently. A missing group
/// means the page opens in create mode.
pub async fn load_form_context<A>(api: &A, group_id: Option<&str>) -> Result<FormContext, ClientError>
where
    A: GroupApi + ?Sized,
{
    let group = async {
        match group_id {
            Some(id) => match api.get_group(id).await {
                Ok(group) => Ok(Some(group)),
                Err(e) if e.status() == Some(404) => Ok(None),
                Err(e) => Err(e),
            },
            None => Ok(None),
        }
    };

    let (group, programs, locations, members) = futures::try_join!(
        group,
        api.list_programs(),
        api.list_locations(),
        api.list_members()
    )?;

    Ok(FormContext {
        group,
        programs,
        locations,
        members,
    })
}
