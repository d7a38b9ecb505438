use leadflow_config::ServerConfig;

#[cfg(feature = "metrics")]
use leadflow_metrics::MetricsHandle;

/// Shared, read-only server state.
#[derive(Debug, Clone)]
pub struct UtilsState {
    pub service_name: String,
    pub public_url: Option<String>,
    #[cfg(feature = "metrics")]
    pub metrics_handle: Option<MetricsHandle>,
}

impl UtilsState {
    pub fn new(service_name: impl Into<String>, public_url: Option<String>) -> Self {
        Self {
            service_name: service_name.into(),
            public_url,
            #[cfg(feature = "metrics")]
            metrics_handle: None,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.service_name.clone(),
            leadflow_config::meaningful(config.public_url.as_deref()).map(str::to_owned),
        )
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, handle: MetricsHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
