//! Identifier and token generation

use chrono::Utc;

/// Time-derived identifier: `prefix` followed by the current unix time in
/// milliseconds. When that id is already `taken` (two records created within
/// the same millisecond) the timestamp is bumped until it is free.
pub fn next_time_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut millis = Utc::now().timestamp_millis();
    loop {
        let id = format!("{}{}", prefix, millis);
        if !taken(&id) {
            return id;
        }
        millis += 1;
    }
}

/// Opaque session token: prefix, random base36 part and base36 millis.
///
/// Not cryptographically secure; good enough to tell sessions apart.
pub fn generate_token(prefix: &str) -> String {
    let random = to_base36(fastrand::u64(..));
    let time = to_base36(Utc::now().timestamp_millis().unsigned_abs());
    format!("{}{}{}", prefix, random, time)
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
