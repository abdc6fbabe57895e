use serde::Deserialize;

/// Body of the refresh and access token RPCs
#[derive(Deserialize)]
pub struct TokenRequest {
    pub refresh_token: String,
}
