use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// URL-friendly slug: accents folded to ASCII, punctuation dropped, runs of spaces and
/// hyphens collapsed to one hyphen, lowercase.
pub fn generate_slug(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    let cleaned = NON_WORD.replace_all(&ascii, "");
    let lowered = cleaned.trim().to_lowercase();
    SEPARATORS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::generate_slug;

    #[test]
    fn basic_titles() {
        assert_eq!(generate_slug("Pizza Hut Franchise"), "pizza-hut-franchise");
        assert_eq!(generate_slug("  Café  Coffee -- Day! "), "cafe-coffee-day");
    }

    #[test]
    fn drops_non_latin_and_symbols() {
        assert_eq!(generate_slug("₹50L Investment"), "50l-investment");
        assert_eq!(generate_slug("!!!"), "");
    }
}
