use log::debug;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_OPEN_ANNOUNCED_BUFFERS;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Whether a buffer announced by the remote session is opened in the
    /// host when it isn't open yet.
    #[serde(default = "default_open_announced_buffers")]
    pub open_announced_buffers: bool,
}

fn default_open_announced_buffers() -> bool {
    debug!("Using default for opening announced buffers: {DEFAULT_OPEN_ANNOUNCED_BUFFERS}");
    DEFAULT_OPEN_ANNOUNCED_BUFFERS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            open_announced_buffers: default_open_announced_buffers(),
        }
    }
}
