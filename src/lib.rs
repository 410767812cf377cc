//! List the object keys in an S3 bucket.
//!
//! ```no_run
//! # async fn run() -> s3_lister::Result<()> {
//! use s3_lister::{list_bucket, ClientOptions, Pagination};
//!
//! let client = ClientOptions::new().build_client().await;
//! let mut stdout = std::io::stdout().lock();
//! list_bucket(&client, "my-bucket", Pagination::All, &mut stdout).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod lister;

pub use client::{ListObjects, ListingPage};
pub use config::ClientOptions;
pub use error::{Error, Result};
pub use lister::{collect_keys, list_bucket, KeyIter, ListSummary, Pagination};
