/// Parse a DeaDBeeF timestamp (`SS`, `MM:SS` or `HH:MM:SS`) into seconds.
///
/// Returns `None` for anything else. The player prints `--nowplaying`
/// output with a trailing newline, so surrounding whitespace is ignored.
pub fn parse_timestamp(s: &str) -> Option<u64> {
    let s = s.trim();
    let fields: Vec<&str> = s.split(':').collect();
    if fields.len() > 3 {
        return None;
    }

    let mut total: u64 = 0;
    for field in fields {
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u64 = field.parse().ok()?;
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}
