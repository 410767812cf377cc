use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use s3_lister::{list_bucket, ClientOptions, ListObjects, Pagination};
use tracing_subscriber::EnvFilter;

/// Print the key of every object in an S3 bucket, one per line.
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    #[clap(short, long, env = "S3_LISTER_BUCKET")]
    bucket: String,

    /// Overrides the region from the environment or AWS profile.
    #[clap(long)]
    region: Option<String>,

    /// Send requests to this endpoint instead of AWS.
    #[clap(long)]
    endpoint_url: Option<String>,

    /// Address the bucket in the path instead of the host name.
    #[clap(long)]
    path_style: bool,

    /// Stop after the first page of results.
    #[clap(long)]
    first_page_only: bool,
}

impl Args {
    fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::new().with_force_path_style(self.path_style);
        if let Some(region) = &self.region {
            options = options.with_region(region);
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            options = options.with_endpoint_url(endpoint_url);
        }
        options
    }

    fn pagination(&self) -> Pagination {
        if self.first_page_only {
            Pagination::FirstPage
        } else {
            Pagination::All
        }
    }
}

/// List the bucket named in `args` into `out`, flushing it once every key is written.
async fn run<C, W>(args: &Args, client: &C, out: &mut W) -> Result<()>
where
    C: ListObjects + ?Sized,
    W: Write,
{
    list_bucket(client, &args.bucket, args.pagination(), out)
        .await
        .with_context(|| format!("failed to list bucket {}", args.bucket))?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let client = args.client_options().build_client().await;

    let mut out = BufWriter::new(io::stdout().lock());
    run(&args, &client, &mut out).await
}
