//! Casing and digit helpers.

/// Upper-case the first letter of each word, lower-case the rest.
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Proper-case an address: house numbers upper-cased, words title-cased.
///
/// `"28/c4, KHU PHỐ 3, PHƯỜNG AN PHÚ"` becomes `"28/C4, Khu Phố 3, Phường An Phú"`.
pub fn format_address(raw: &str) -> String {
    raw.split(',')
        .map(|part| {
            part.split_whitespace()
                .map(|word| {
                    if word.chars().any(|c| c.is_ascii_digit()) {
                        word.to_uppercase()
                    } else {
                        capitalize(word)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Keep ASCII digits only.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_vietnamese_names() {
        assert_eq!(title_case("NGUYỄN VĂN A"), "Nguyễn Văn A");
        assert_eq!(title_case("  trương   thị b "), "Trương Thị B");
    }

    #[test]
    fn proper_cases_addresses() {
        assert_eq!(
            format_address("28/c4, KHU PHỐ 3, PHƯỜNG AN PHÚ, , TP.HCM"),
            "28/C4, Khu Phố 3, Phường An Phú, Tp.hcm"
        );
        assert_eq!(format_address("hà nội"), "Hà Nội");
    }

    #[test]
    fn strips_everything_but_digits() {
        assert_eq!(digits_only("090 123-4567"), "0901234567");
        assert_eq!(digits_only("+84 (90) 1234"), "84901234");
    }
}
