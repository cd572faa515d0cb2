use chrono::Utc;

/// Clock seam. Tests swap in a fixed clock to control which reminders
/// count as due.
pub trait ISys: Send + Sync {
    /// Current unix timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// Wall clock, used everywhere outside of tests
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
