//! Time helpers
//!
//! All timestamps in the system are `i64` Unix millis; conversion happens
//! once here.

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
