//! Header text normalization for comparison.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Leading filler words ("number of", "code of", "name of").
const FILLER_PREFIXES: &[&str] = &["so ", "ma ", "ten "];
/// Trailing filler words ("of resident", "of citizen", "of person").
const FILLER_SUFFIXES: &[&str] = &[" cu dan", " cong dan", " nguoi"];

/// Fold a raw header into lowercase ASCII-like words separated by single spaces.
///
/// Decomposes to NFD, drops combining marks, folds `đ` to `d`, turns
/// punctuation into spaces and strips filler prefixes and suffixes until
/// none apply. The result is a fixpoint: normalizing it again is a no-op.
pub fn normalize_header(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut folded = String::with_capacity(lowered.len());
    for ch in lowered.nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        let ch = if ch == 'đ' { 'd' } else { ch };
        folded.push(if ch.is_alphanumeric() { ch } else { ' ' });
    }
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    strip_fillers(collapsed)
}

fn strip_fillers(mut text: String) -> String {
    loop {
        let before = text.len();
        for prefix in FILLER_PREFIXES {
            if let Some(rest) = text.strip_prefix(prefix)
                && !rest.is_empty()
            {
                text = rest.to_string();
            }
        }
        for suffix in FILLER_SUFFIXES {
            if let Some(rest) = text.strip_suffix(suffix)
                && !rest.is_empty()
            {
                text = rest.to_string();
            }
        }
        if text.len() == before {
            return text;
        }
    }
}

/// Normalized header with spaces removed, used for keyword containment.
pub fn compact(normalized: &str) -> String {
    normalized.chars().filter(|c| *c != ' ').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_vietnamese_headers() {
        assert_eq!(normalize_header("HỌ TÊN"), "ho ten");
        assert_eq!(normalize_header("  Ngày   sinh "), "ngay sinh");
        assert_eq!(normalize_header("SĐT"), "sdt");
        assert_eq!(normalize_header("Đảng viên"), "dang vien");
        assert_eq!(normalize_header("CMND/CCCD"), "cmnd cccd");
    }

    #[test]
    fn strips_filler_words() {
        assert_eq!(normalize_header("Số điện thoại"), "dien thoai");
        assert_eq!(normalize_header("Mã hộ khẩu"), "ho khau");
        assert_eq!(normalize_header("Họ tên cư dân"), "ho ten");
        assert_eq!(normalize_header("Tên"), "ten");
        assert_eq!(normalize_header("Số"), "so");
    }

    #[test]
    fn empty_and_punctuation_only_headers_normalize_to_empty() {
        assert_eq!(normalize_header(""), "");
        assert_eq!(normalize_header(" -/- "), "");
    }

    #[test]
    fn compact_drops_spaces() {
        assert_eq!(compact("dien thoai"), "dienthoai");
    }
}
