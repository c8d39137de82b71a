use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one geometry allocation. Render backends key GPU buffers by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeometryId(pub Uuid);

impl GeometryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for logs and debug output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for GeometryId {
    fn default() -> Self {
        Self::new()
    }
}
