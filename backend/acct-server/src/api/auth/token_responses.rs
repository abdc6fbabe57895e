use serde::Serialize;

#[derive(Serialize)]
pub struct RefreshTokenResponse {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}
