use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CheckUsersExistRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}
