use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Spreadsheet error: {0}")]
    Sheet(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
