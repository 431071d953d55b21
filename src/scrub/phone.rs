/// Strips a phone number down to its digits and drops one leading `1`.
///
/// Assumes North American numbering. The result is not length-checked, so
/// short or malformed numbers pass through once punctuation is removed.
/// Only ASCII `0`-`9` count as digits; other Unicode digits are dropped.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.strip_prefix('1') {
        Some(rest) => rest.to_owned(),
        None => digits,
    }
}
