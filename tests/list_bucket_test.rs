use async_trait::async_trait;
use s3_lister::{collect_keys, list_bucket, Error, ListObjects, ListingPage, Pagination, Result};

/// An in-memory bucket split into fixed pages. Page `n > 0` is reached with token `page-n`.
#[derive(Debug, Default)]
struct MockBucket {
    pages: Vec<Vec<&'static str>>,
    missing: bool,
}

impl MockBucket {
    fn with_pages(pages: Vec<Vec<&'static str>>) -> Self {
        Self {
            pages,
            missing: false,
        }
    }

    fn missing() -> Self {
        Self {
            pages: Vec::new(),
            missing: true,
        }
    }
}

#[async_trait]
impl ListObjects for MockBucket {
    async fn list_page(&self, bucket: &str, token: Option<&str>) -> Result<ListingPage> {
        if self.missing {
            return Err(Error::BucketNotFound {
                bucket: bucket.to_owned(),
                source: "The specified bucket does not exist".into(),
            });
        }

        let index = match token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .expect("token issued by this bucket"),
        };

        let keys = self.pages.get(index).cloned().unwrap_or_default();
        let page = if index + 1 < self.pages.len() {
            ListingPage::truncated(keys, format!("page-{}", index + 1))
        } else {
            ListingPage::last(keys)
        };
        Ok(page)
    }
}

async fn run(client: &MockBucket, pagination: Pagination) -> Result<String> {
    let mut out = Vec::new();
    list_bucket(client, "john-01-12-2024", pagination, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_prints_keys_in_order() {
    let bucket = MockBucket::with_pages(vec![vec!["a.txt", "b.txt", "c.txt"]]);

    let output = run(&bucket, Pagination::All).await.unwrap();

    assert_eq!(output, "a.txt\nb.txt\nc.txt\n");
}

#[tokio::test]
async fn test_empty_bucket_prints_nothing() {
    let bucket = MockBucket::with_pages(vec![]);

    let output = run(&bucket, Pagination::All).await.unwrap();

    assert_eq!(output, "");
}

#[tokio::test]
async fn test_first_page_only_omits_later_pages() {
    let bucket = MockBucket::with_pages(vec![vec!["a.txt", "b.txt"], vec!["c.txt"]]);

    let mut out = Vec::new();
    let summary = list_bucket(&bucket, "john-01-12-2024", Pagination::FirstPage, &mut out)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "a.txt\nb.txt\n");
    assert!(summary.truncated);
    assert_eq!(summary.pages, 1);
}

#[tokio::test]
async fn test_follows_every_page() {
    let bucket = MockBucket::with_pages(vec![
        vec!["a.txt", "b.txt"],
        vec!["c.txt"],
        vec!["d.txt", "e.txt"],
    ]);

    let mut out = Vec::new();
    let summary = list_bucket(&bucket, "john-01-12-2024", Pagination::All, &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "a.txt\nb.txt\nc.txt\nd.txt\ne.txt\n"
    );
    assert_eq!(summary.keys, 5);
    assert_eq!(summary.pages, 3);
    assert!(!summary.truncated);
}

#[tokio::test]
async fn test_missing_bucket_prints_nothing_and_fails() {
    let bucket = MockBucket::missing();

    let mut out = Vec::new();
    let err = list_bucket(&bucket, "john-01-12-2024", Pagination::All, &mut out)
        .await
        .unwrap_err();

    assert!(out.is_empty());
    assert!(matches!(err, Error::BucketNotFound { ref bucket, .. } if bucket == "john-01-12-2024"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_listing_is_idempotent() {
    let bucket = MockBucket::with_pages(vec![vec!["a.txt", "b.txt"], vec!["c.txt"]]);

    let first = run(&bucket, Pagination::All).await.unwrap();
    let second = run(&bucket, Pagination::All).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        collect_keys(&bucket, "john-01-12-2024", Pagination::All)
            .await
            .unwrap(),
        vec!["a.txt", "b.txt", "c.txt"]
    );
}
