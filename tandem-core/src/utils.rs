use crate::model::IceServerConfig;

pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_3: &str = "stun:stun2.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_4: &str = "stun:stun.cloudflare.com:3478";

/// Public STUN servers used when no relay credentials are available.
pub fn default_ice_servers() -> Vec<IceServerConfig> {
    vec![IceServerConfig {
        urls: vec![
            DEFAULT_STUN_ADDR.to_string(),
            DEFAULT_STUN_ADDR_2.to_string(),
            DEFAULT_STUN_ADDR_3.to_string(),
            DEFAULT_STUN_ADDR_4.to_string(),
        ],
        username: None,
        credential: None,
    }]
}
