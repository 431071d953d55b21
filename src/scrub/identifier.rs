use uuid::Uuid;

/// Length of the canonical `8-4-4-4-12` hyphenated form.
const HYPHENATED_LEN: usize = 36;

/// Returns true when `value` is a UUID written in hyphenated hex form.
///
/// Any version or variant is accepted, in either letter case. The simple,
/// braced and URN encodings are rejected even though `uuid` can parse them.
pub fn is_valid_person_id(value: &str) -> bool {
    value.len() == HYPHENATED_LEN && Uuid::try_parse(value).is_ok()
}
