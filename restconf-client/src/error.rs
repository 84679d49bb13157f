use std::path::PathBuf;
use thiserror::Error;

pub type RestconfResult<T> = Result<T, RestconfError>;

#[derive(Debug, Error)]
pub enum RestconfError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error(
        "cannot detect file format of '{}' - expected XML or JSON",
        path.display()
    )]
    UnknownFormat { path: PathBuf },
    #[error("malformed XML at byte {position}: {message}")]
    MalformedXml { position: usize, message: String },
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl RestconfError {
    pub fn new(msg: String) -> Self {
        RestconfError::Anyhow(anyhow::Error::msg(msg))
    }

    pub(crate) fn malformed(position: usize, message: impl Into<String>) -> Self {
        RestconfError::MalformedXml {
            position,
            message: message.into(),
        }
    }
}
