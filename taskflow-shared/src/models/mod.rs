/// Domain models for TaskFlow
///
/// # Models
///
/// - `task`: Tasks, their enums, request structures and filters
/// - `user`: Users and creation input

use chrono::{DateTime, SubsecRound, Utc};

pub mod task;
pub mod user;

/// Current time, truncated to the microsecond precision kept in storage
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
