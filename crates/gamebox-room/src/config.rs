//! Directory configuration.

use std::time::Duration;

/// Tunables for the room directory.
///
/// Embedding apps can override the defaults field by field:
///
/// ```rust
/// use gamebox_room::DirectoryConfig;
/// use std::time::Duration;
///
/// let config = DirectoryConfig {
///     waiting_timeout: Duration::from_secs(60),
///     ..DirectoryConfig::default()
/// };
/// assert_eq!(config.join_retry_limit, 8);
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// How long a room may sit in `Waiting` before `sweep` removes it.
    pub waiting_timeout: Duration,

    /// How long a finished room's final board stays readable before
    /// `sweep` removes it, measured from the first sweep that saw it
    /// finished.
    pub finished_linger: Duration,

    /// How many conditional-write attempts a join makes before giving
    /// up with `Contended`.
    pub join_retry_limit: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            waiting_timeout: Duration::from_secs(10 * 60),
            finished_linger: Duration::from_secs(5 * 60),
            join_retry_limit: 8,
        }
    }
}
