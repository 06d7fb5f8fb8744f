//! Pull percentages out of free-text oracle answers.

use regex::Regex;
use std::sync::LazyLock;

static PERCENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*%?(?:\s*(?:-|–|to)\s*(\d+(?:\.\d+)?))?\s*%").unwrap()
});

/// ASCII lower-cased with hyphens as spaces, so "10-Year" matches "10 Year".
/// Byte offsets stay aligned with the input.
fn normalize(text: &str) -> String {
    text.to_ascii_lowercase().replace('-', " ")
}

/// Byte offset just past the first whole-word mention of `label` in `line`.
fn mention_end(line: &str, label: &str) -> Option<usize> {
    let needle = normalize(label);
    let bytes = line.as_bytes();
    let mut from = 0;
    while let Some(pos) = line[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        let boundary_before = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let boundary_after = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if boundary_before && boundary_after {
            return Some(end);
        }
        from = start + 1;
        while from < line.len() && !line.is_char_boundary(from) {
            from += 1;
        }
    }
    None
}

fn format_match(caps: &regex::Captures<'_>) -> String {
    match caps.get(2) {
        Some(upper) => format!("{}-{}%", &caps[1], upper.as_str()),
        None => format!("{}%", &caps[1]),
    }
}

/// First percentage stated on a line naming `label`, preferring one that
/// follows the mention. Ranges keep their form: "4.25 - 4.50%" → "4.25-4.50%".
pub(crate) fn percentage_for(answer: &str, label: &str) -> Option<String> {
    answer.lines().find_map(|raw| {
        let end = mention_end(&normalize(raw), label)?;
        PERCENT
            .captures(&raw[end..])
            .or_else(|| PERCENT.captures(raw))
            .map(|caps| format_match(&caps))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_after_label() {
        let answer = "Current policy rates:\n- United States (Federal Reserve): 4.25% - 4.50%\n- Japan (Bank of Japan): 0.5%";
        assert_eq!(percentage_for(answer, "United States").as_deref(), Some("4.25-4.50%"));
        assert_eq!(percentage_for(answer, "Japan").as_deref(), Some("0.5%"));
        assert_eq!(percentage_for(answer, "China"), None);
    }

    #[test]
    fn test_maturities_do_not_collide() {
        let answer = "The 1-Year bill is at 3.61%\n10-year note: 4.02%, 30-year bond 4.61%";
        assert_eq!(percentage_for(answer, "1 Year").as_deref(), Some("3.61%"));
        assert_eq!(percentage_for(answer, "10 Year").as_deref(), Some("4.02%"));
        assert_eq!(percentage_for(answer, "30 Year").as_deref(), Some("4.61%"));
        assert_eq!(percentage_for(answer, "5 Year"), None);
    }

    #[test]
    fn test_line_without_percentage_is_skipped() {
        let answer = "France is part of the euro area.\nFrance: 1.1%";
        assert_eq!(percentage_for(answer, "France").as_deref(), Some("1.1%"));
    }

    #[test]
    fn test_label_must_be_whole_word() {
        assert_eq!(percentage_for("Chinatown index 9%", "China"), None);
    }
}
