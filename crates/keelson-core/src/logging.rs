//! Tracing subscriber setup.
//!
//! `init` is called once at startup by whatever binary embeds the
//! library; later calls do nothing. `RUST_LOG` always wins over the
//! profile's default filter.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output profile for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output, debug level
    Development,
    /// JSON lines, info level
    Production,
    /// Bare registry; tests assert on behavior, not on log output
    Test,
}

impl Profile {
    /// Filter directive applied when `RUST_LOG` is not set
    fn default_filter(self) -> &'static str {
        match self {
            Profile::Development => "keelson=debug",
            Profile::Production => "keelson=info",
            Profile::Test => "off",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for the given profile
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));

        match profile {
            Profile::Development => {
                tracing_subscriber::fmt().with_env_filter(filter).init();
            }
            Profile::Production => {
                tracing_subscriber::fmt().json().with_env_filter(filter).init();
            }
            Profile::Test => {
                tracing_subscriber::registry().init();
            }
        }
    });
}
