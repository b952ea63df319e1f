use chrono::{DateTime, Utc};

/// Source of the current time, used to stamp records on save.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as Unix seconds, the resolution posts are stamped with.
    fn timestamp(&self) -> i64 {
        self.now().timestamp()
    }
}
