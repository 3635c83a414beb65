use reqwest::StatusCode;
use thiserror::Error;

pub type CouchResult<T> = Result<T, CouchDaoError>;

/// Failures talking to CouchDB. `target` is the database or document URL path
/// the request was aimed at.
#[derive(Debug, Error)]
pub enum CouchDaoError {
    #[error("failed to build CouchDB HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    #[error("CouchDB request to `{target}` could not be sent")]
    Transport {
        target: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("CouchDB answered {status} for `{target}`")]
    UnexpectedStatus { target: String, status: StatusCode },
    #[error("CouchDB response for `{target}` is not a roster document")]
    Decode {
        target: String,
        #[source]
        source: reqwest::Error,
    },
}

impl CouchDaoError {
    pub(super) fn transport(target: &str) -> impl FnOnce(reqwest::Error) -> Self + '_ {
        move |source| CouchDaoError::Transport {
            target: target.to_owned(),
            source,
        }
    }

    pub(super) fn decode(target: &str) -> impl FnOnce(reqwest::Error) -> Self + '_ {
        move |source| CouchDaoError::Decode {
            target: target.to_owned(),
            source,
        }
    }

    pub(super) fn status(target: &str, status: StatusCode) -> Self {
        CouchDaoError::UnexpectedStatus {
            target: target.to_owned(),
            status,
        }
    }
}
