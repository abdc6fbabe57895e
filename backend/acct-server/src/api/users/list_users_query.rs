use serde::Deserialize;

/// `?limit=&offset=`; zero or missing limit means the default page size.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub limit: Option<i64>,

    #[serde(default)]
    pub offset: Option<i64>,
}
