use crate::error::ConfigFetchError;
use async_trait::async_trait;
use tandem_core::IceServerConfig;
use tandem_core::utils::default_ice_servers;

/// Source of STUN/TURN configuration, consulted once per connection object.
#[async_trait]
pub trait IceServerProvider: Send + Sync {
    async fn fetch_ice_servers(&self) -> Result<Vec<IceServerConfig>, ConfigFetchError>;
}

#[derive(Debug, Clone)]
pub struct StaticIceServers(pub Vec<IceServerConfig>);

impl Default for StaticIceServers {
    fn default() -> Self {
        Self(default_ice_servers())
    }
}

#[async_trait]
impl IceServerProvider for StaticIceServers {
    async fn fetch_ice_servers(&self) -> Result<Vec<IceServerConfig>, ConfigFetchError> {
        Ok(self.0.clone())
    }
}
