use std::io::Write;

use tracing::{debug, info, warn};

use crate::client::{ListObjects, ListingPage};
use crate::error::Result;

/// How far to follow a truncated listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pagination {
    /// Follow continuation tokens until the service reports the listing is complete.
    #[default]
    All,
    /// Read only the first page and drop anything after it.
    FirstPage,
}

/// Totals for one completed listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListSummary {
    pub keys: usize,
    pub pages: usize,
    /// Pages were left unread because of [`Pagination::FirstPage`].
    pub truncated: bool,
}

/// Pulls object keys out of a bucket one at a time, fetching pages as needed.
pub struct KeyIter<'a, C: ?Sized> {
    bucket: &'a str,
    client: &'a C,
    pagination: Pagination,

    next_continuation_token: Option<String>,
    keys: Vec<String>,
    truncated: Truncation,
    pages: usize,
    skipped_pages: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Truncation {
    NotYetKnown,
    Truncated,
    NotTruncated,
}

impl<'a, C> KeyIter<'a, C>
where
    C: ListObjects + ?Sized,
{
    pub fn new(client: &'a C, bucket: &'a str) -> Self {
        KeyIter {
            bucket,
            client,
            pagination: Pagination::default(),
            next_continuation_token: None,
            keys: Vec::new(),
            truncated: Truncation::NotYetKnown,
            pages: 0,
            skipped_pages: false,
        }
    }

    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Number of pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// No buffered keys remain and no further page will be requested.
    pub fn is_exhausted(&self) -> bool {
        self.keys.is_empty() && self.truncated == Truncation::NotTruncated
    }

    async fn fetch(&mut self) -> Result<()> {
        let ListingPage {
            mut keys,
            is_truncated,
            next_continuation_token,
        } = self
            .client
            .list_page(self.bucket, self.next_continuation_token.as_deref())
            .await?;
        self.pages += 1;

        self.truncated = match (is_truncated, &next_continuation_token, self.pagination) {
            (false, _, _) => Truncation::NotTruncated,
            (true, None, _) => {
                warn!(
                    bucket = self.bucket,
                    page = self.pages,
                    "listing is truncated but has no continuation token, stopping"
                );
                Truncation::NotTruncated
            }
            (true, Some(_), Pagination::FirstPage) => {
                warn!(
                    bucket = self.bucket,
                    "listing is truncated, objects after the first page are omitted"
                );
                self.skipped_pages = true;
                Truncation::NotTruncated
            }
            (true, Some(_), Pagination::All) => Truncation::Truncated,
        };
        self.next_continuation_token = next_continuation_token;

        debug!(bucket = self.bucket, page = self.pages, keys = keys.len(), "fetched page");

        // Keys are popped from the back, so store them reversed to emit them in order.
        keys.reverse();
        self.keys = keys;

        Ok(())
    }

    /// The next key, or `None` once every requested page has been drained.
    pub async fn next(&mut self) -> Result<Option<String>> {
        loop {
            match (self.keys.pop(), self.truncated) {
                (Some(key), _) => return Ok(Some(key)),

                // A truncated page may still be empty, so keep fetching until keys
                // show up or the service says it is done.
                (None, Truncation::Truncated | Truncation::NotYetKnown) => self.fetch().await?,

                (None, Truncation::NotTruncated) => return Ok(None),
            }
        }
    }

    fn summary(&self, keys: usize) -> ListSummary {
        ListSummary {
            keys,
            pages: self.pages,
            truncated: self.skipped_pages,
        }
    }
}

/// Write every key in `bucket` to `out`, one per line, in listing order.
pub async fn list_bucket<C, W>(
    client: &C,
    bucket: &str,
    pagination: Pagination,
    out: &mut W,
) -> Result<ListSummary>
where
    C: ListObjects + ?Sized,
    W: Write + ?Sized,
{
    let mut iter = KeyIter::new(client, bucket).pagination(pagination);

    let mut count = 0;
    while let Some(key) = iter.next().await? {
        writeln!(out, "{key}")?;
        count += 1;
    }

    let summary = iter.summary(count);
    info!(
        bucket,
        keys = summary.keys,
        pages = summary.pages,
        truncated = summary.truncated,
        "listed bucket"
    );
    Ok(summary)
}

/// Collect every key in `bucket` instead of printing it.
pub async fn collect_keys<C>(client: &C, bucket: &str, pagination: Pagination) -> Result<Vec<String>>
where
    C: ListObjects + ?Sized,
{
    let mut iter = KeyIter::new(client, bucket).pagination(pagination);

    let mut keys = Vec::new();
    while let Some(key) = iter.next().await? {
        keys.push(key);
    }
    Ok(keys)
}
