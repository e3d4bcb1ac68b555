//! Phone number normalization for WhatsApp delivery.

/// Country calling code prepended to local numbers (Pakistan).
pub const COUNTRY_CODE: &str = "92";

/// Longest digit string still treated as a local number.
const MAX_LOCAL_DIGITS: usize = 11;

/// Normalize a raw phone number into bare international digits.
///
/// Non-digits are stripped. A number of at most 11 digits that does not
/// already carry the country code loses its leading zeros and gets `92`
/// prepended. The result never contains `+`; callers add it at dispatch.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() || digits.len() > MAX_LOCAL_DIGITS || digits.starts_with(COUNTRY_CODE) {
        return digits;
    }
    format!("{COUNTRY_CODE}{}", digits.trim_start_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_number_gets_country_code() {
        assert_eq!(normalize_phone("03001234567"), "923001234567");
    }

    #[test]
    fn punctuation_is_stripped() {
        assert_eq!(normalize_phone("0300-123 (4567)"), "923001234567");
        assert_eq!(normalize_phone("+92 300 1234567"), "923001234567");
    }

    #[test]
    fn multiple_leading_zeros_are_removed() {
        assert_eq!(normalize_phone("00300123456"), "92300123456");
    }

    #[test]
    fn twelve_digit_number_with_leading_zeros_is_only_stripped() {
        assert_eq!(normalize_phone("003001234567"), "003001234567");
    }

    #[test]
    fn already_prefixed_number_is_untouched() {
        assert_eq!(normalize_phone("923001234567"), "923001234567");
        assert_eq!(normalize_phone("92300"), "92300");
    }

    #[test]
    fn long_foreign_number_is_only_stripped() {
        assert_eq!(normalize_phone("+44 7911 123456 78"), "44791112345678");
    }

    #[test]
    fn empty_and_digitless_input_stays_empty() {
        assert_eq!(normalize_phone(""), "");
        assert_eq!(normalize_phone("call me"), "");
    }

    #[test]
    fn all_zero_input_reduces_to_country_code() {
        assert_eq!(normalize_phone("000"), "92");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["03001234567", "3001234567", "+1 (415) 555-1212", "92300", "0", "441234567890"] {
            let once = normalize_phone(raw);
            assert_eq!(normalize_phone(&once), once, "input {raw}");
        }
    }

    #[test]
    fn short_local_numbers_follow_the_prefix_rule() {
        for raw in ["1", "0123", "3001234567", "00000000001"] {
            let expected = format!("92{}", raw.trim_start_matches('0'));
            assert_eq!(normalize_phone(raw), expected, "input {raw}");
        }
    }
}
