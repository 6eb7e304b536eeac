// In crates/store/src/types.rs

use serde::{Deserialize, Serialize};

/// Display metadata for one user, as held by the identity directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayProfile {
    pub username: String,
    pub image_url: String,
}
