//! Social platform settings

use serde::{Deserialize, Serialize};

use crate::platform::PlatformKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSettings {
    /// Platform service the build talks to
    #[serde(default)]
    pub kind: PlatformKind,

    /// Log in at launch unless the previous login failed.
    /// When false, only log in at launch if the previous login succeeded.
    #[serde(default = "default_login_on_start")]
    pub login_on_start: bool,
}

fn default_login_on_start() -> bool {
    true
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            kind: PlatformKind::default(),
            login_on_start: default_login_on_start(),
        }
    }
}
