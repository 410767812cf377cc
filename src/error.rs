use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure listing a bucket, classified by what the caller can do about it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("bucket `{bucket}` does not exist")]
    BucketNotFound {
        bucket: String,
        #[source]
        source: BoxError,
    },

    #[error("access to bucket `{bucket}` was denied ({code})")]
    AccessDenied {
        bucket: String,
        code: String,
        #[source]
        source: BoxError,
    },

    /// Timeouts, network failures, throttling and 5xx responses.
    #[error("transient failure listing bucket `{bucket}`")]
    Transient {
        bucket: String,
        #[source]
        source: BoxError,
    },

    #[error("service error listing bucket `{bucket}` ({code})")]
    Service {
        bucket: String,
        code: String,
        #[source]
        source: BoxError,
    },

    /// The request never reached the service, e.g. no region or credentials.
    #[error("could not send list request for bucket `{bucket}`")]
    Request {
        bucket: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to write listing output")]
    Output(#[from] std::io::Error),
}

impl Error {
    /// True for failures that may succeed if the same request is repeated.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transient { .. })
    }

    /// The bucket the failed request targeted, if any.
    pub fn bucket(&self) -> Option<&str> {
        match self {
            Error::BucketNotFound { bucket, .. }
            | Error::AccessDenied { bucket, .. }
            | Error::Transient { bucket, .. }
            | Error::Service { bucket, .. }
            | Error::Request { bucket, .. } => Some(bucket),
            Error::Output(_) => None,
        }
    }
}
