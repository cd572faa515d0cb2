use chrono::TimeZone;
use chrono::Utc;
use chrono_tz::Tz;

/// Renders the body of an SMS notification for a reminder.
///
/// The due timestamp is converted from UTC to the recipient's timezone using
/// the offset in effect at that instant, so reminders on either side of a
/// daylight-saving transition render with the correct local time.
pub fn sms_body(sender_name: &str, action: &str, due: i64, timezone: Tz) -> String {
    format!(
        "Reminder from {}:\n{} at {}",
        sender_name,
        action,
        local_due_time(due, timezone)
    )
}

/// 12-hour clock with AM/PM and no leading zero on the hour, e.g. "9:05 AM"
fn local_due_time(due: i64, timezone: Tz) -> String {
    Utc.timestamp_millis(due)
        .with_timezone(&timezone)
        .format("%-I:%M %p")
        .to_string()
}
