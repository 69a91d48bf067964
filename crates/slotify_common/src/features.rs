//! Runtime feature flags derived from the configuration.
//!
//! A feature counts as enabled only when its `use_*` flag is set AND its
//! configuration section is present; a flag pointing at nothing is
//! treated as off rather than as a startup error.

use slotify_config::AppConfig;
use std::sync::Arc;

/// Whether the outbound webhook notifier should be used.
pub fn is_notifier_enabled(config: &Arc<AppConfig>) -> bool {
    config.use_notifier && config.notifier.is_some()
}
