use reqwest::{Client, StatusCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    /// Nothing to check: the input was blank.
    Empty,
    /// The authenticated probe succeeded.
    Valid,
    /// The API rejected the key outright (HTTP 401).
    Invalid,
    /// Some other non-success status.
    Failed,
    /// The API could not be reached at all.
    Network,
}

impl KeyStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, KeyStatus::Valid)
    }
}

/// Outcome of a credential check: always a status plus a user-facing
/// message, never an error.
#[derive(Debug, Clone)]
pub struct KeyCheck {
    pub status: KeyStatus,
    pub message: String,
}

impl KeyCheck {
    fn new(status: KeyStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn from_status(status: StatusCode) -> Self {
        if status.is_success() {
            KeyCheck::new(KeyStatus::Valid, "API key is valid.")
        } else if status == StatusCode::UNAUTHORIZED {
            KeyCheck::new(KeyStatus::Invalid, "API key was rejected (401).")
        } else {
            KeyCheck::new(
                KeyStatus::Failed,
                format!("Key check failed with HTTP {}.", status.as_u16()),
            )
        }
    }
}

/// Validates a credential with a minimal authenticated read. This client
/// never propagates an error past its own boundary.
#[derive(Clone)]
pub struct KeyClient {
    client: Client,
    base_url: String,
}

impl KeyClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub async fn check(&self, api_key: &str) -> KeyCheck {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return KeyCheck::new(KeyStatus::Empty, "Enter an API key first.");
        }

        log::debug!("Checking API key against {}/models", self.base_url);

        match self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(api_key)
            .send()
            .await
        {
            Ok(response) => KeyCheck::from_status(response.status()),
            Err(e) => KeyCheck::new(
                KeyStatus::Network,
                format!("Could not reach the API: {}.", e),
            ),
        }
    }
}
