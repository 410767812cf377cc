//! The seam between the lister and the storage service.

use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::list_objects_v2::{ListObjectsV2Error, ListObjectsV2Output};
use aws_smithy_runtime_api::http::Response as HttpResponse;
use tracing::{debug, debug_span, Instrument};

use crate::error::{Error, Result};

const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AllAccessDisabled",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
];

const TRANSIENT_CODES: &[&str] = &[
    "SlowDown",
    "Throttling",
    "ThrottlingException",
    "RequestTimeout",
    "InternalError",
    "ServiceUnavailable",
];

/// One page of a bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Object keys in the order the service returned them.
    pub keys: Vec<String>,
    /// More objects exist after this page.
    pub is_truncated: bool,
    /// Token to pass back to fetch the next page.
    pub next_continuation_token: Option<String>,
}

impl ListingPage {
    /// A final page holding `keys`.
    pub fn last<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            is_truncated: false,
            next_continuation_token: None,
        }
    }

    /// A truncated page holding `keys`, continued by `token`.
    pub fn truncated<I, K>(keys: I, token: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            is_truncated: true,
            next_continuation_token: Some(token.into()),
        }
    }
}

impl From<ListObjectsV2Output> for ListingPage {
    fn from(output: ListObjectsV2Output) -> Self {
        let keys = output
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|object| object.key)
            .collect();

        Self {
            keys,
            is_truncated: output.is_truncated.unwrap_or_default(),
            next_continuation_token: output.next_continuation_token,
        }
    }
}

/// Anything that can return one page of a bucket listing.
///
/// Implemented for [`aws_sdk_s3::Client`]; tests substitute their own.
#[async_trait]
pub trait ListObjects: Send + Sync {
    /// Fetch the page that starts at `continuation_token`, or the first page when `None`.
    async fn list_page(&self, bucket: &str, continuation_token: Option<&str>)
        -> Result<ListingPage>;
}

#[async_trait]
impl ListObjects for aws_sdk_s3::Client {
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListingPage> {
        let span = debug_span!("list_objects_v2", bucket, continued = continuation_token.is_some());
        async {
            let output = self
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(continuation_token.map(str::to_owned))
                .send()
                .await
                .map_err(|err| classify(bucket, err))?;

            let page = ListingPage::from(output);
            debug!(
                keys = page.keys.len(),
                truncated = page.is_truncated,
                "received listing page"
            );
            Ok::<_, Error>(page)
        }
        .instrument(span)
        .await
    }
}

/// Map a `ListObjectsV2` failure onto an [`Error`] kind.
pub(crate) fn classify(bucket: &str, err: SdkError<ListObjectsV2Error, HttpResponse>) -> Error {
    let bucket = bucket.to_owned();
    let status = err.raw_response().map(|raw| raw.status().as_u16());

    let service = err
        .as_service_error()
        .map(|service| (service.is_no_such_bucket(), service.code().map(str::to_owned)));

    let Some((no_such_bucket, code)) = service else {
        let transient = match &err {
            SdkError::TimeoutError(_) | SdkError::ResponseError(_) => true,
            // A user connector error (e.g. a bad endpoint) fails the same way on every attempt.
            SdkError::DispatchFailure(failure) => failure.is_io() || failure.is_timeout(),
            _ => false,
        };
        return if transient {
            Error::Transient {
                bucket,
                source: err.into(),
            }
        } else {
            Error::Request {
                bucket,
                source: err.into(),
            }
        };
    };

    let code_is = |candidates: &[&str]| code.as_deref().is_some_and(|c| candidates.contains(&c));

    if no_such_bucket || code_is(&["NoSuchBucket"]) || status == Some(404) {
        Error::BucketNotFound {
            bucket,
            source: err.into(),
        }
    } else if code_is(ACCESS_DENIED_CODES) || status == Some(403) {
        Error::AccessDenied {
            bucket,
            code: code.unwrap_or_else(|| "Forbidden".to_owned()),
            source: err.into(),
        }
    } else if code_is(TRANSIENT_CODES) || status.is_some_and(|s| s == 429 || s >= 500) {
        Error::Transient {
            bucket,
            source: err.into(),
        }
    } else {
        Error::Service {
            bucket,
            code: code.unwrap_or_else(|| "Unknown".to_owned()),
            source: err.into(),
        }
    }
}
