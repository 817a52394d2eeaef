use std::fmt;
use uuid::Uuid;

/// Local handle for one session. Never sent over the wire.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct SessionKey(pub Uuid);

impl SessionKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sess-{}", &self.0.simple().to_string()[..8])
    }
}
