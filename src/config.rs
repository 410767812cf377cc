use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use tracing::debug;

/// Region used when neither the options nor the environment name one.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Settings for the S3 client. Credentials always come from the default provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub region: Option<String>,
    /// Alternate endpoint, e.g. a local S3-compatible server.
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn with_force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }

    fn region_provider(&self) -> RegionProviderChain {
        RegionProviderChain::first_try(self.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(FALLBACK_REGION)
    }

    /// Load the shared AWS config and build an S3 client from it.
    pub async fn build_client(&self) -> aws_sdk_s3::Client {
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(self.region_provider());
        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;

        debug!(
            region = ?sdk_config.region(),
            endpoint_url = ?self.endpoint_url,
            force_path_style = self.force_path_style,
            "loaded client configuration"
        );

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(self.force_path_style)
            .build();
        aws_sdk_s3::Client::from_conf(s3_config)
    }
}
