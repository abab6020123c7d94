// Error taxonomy shared by the data clients and the HTTP surface
use thiserror::Error;

/// The only failure a data client ever surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("no data for {subject}")]
    NoData { subject: String },
}

impl ErrorKind {
    pub fn no_data(subject: impl Into<String>) -> Self {
        ErrorKind::NoData {
            subject: subject.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown panel: {0}")]
pub struct UnknownPanel(pub String);
