use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] acct_config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] acct_db::DbError),

    #[error("Cache error: {0}")]
    Cache(#[from] acct_cache::CacheError),

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("Metrics recorder error: {message}")]
    Metrics { message: String },
}

pub type Result<T> = std::result::Result<T, ServerError>;
