//! Time source used for document timestamps.

use chrono::{DateTime, Utc};

/// Supplies the current instant.
///
/// Injected so that tests can order creation times deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
