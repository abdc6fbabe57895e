use serde::Serialize;

/// `{}` for RPCs with no result payload
#[derive(Debug, Default, Serialize)]
pub struct EmptyResponse {}
