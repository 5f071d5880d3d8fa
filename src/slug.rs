use chrono::Local;
use rand::random;

const STOPWORDS: &[&str] = &[
    "for", "with", "to", "in", "on", "at", "as", "is", "the", "a", "an", "and", "or", "but",
];

const BRANCH_WORD_CAP: usize = 6;
const BRANCH_FALLBACK: &str = "update";

/// Derive a branch name from free text: timestamp prefix plus up to six
/// stopword-filtered words, `update` when nothing survives.
pub fn generate_branch_name(text: &str) -> String {
    timestamped_name(text, BRANCH_FALLBACK)
}

/// Same pipeline without the timestamp. Returns an empty string when every
/// word is filtered out; callers supply their own fallback.
pub fn short_name(text: &str, max_words: usize) -> String {
    filtered_words(text, max_words).join("-")
}

pub fn timestamped_name(text: &str, fallback: &str) -> String {
    let words = short_name(text, BRANCH_WORD_CAP);
    let words = if words.is_empty() {
        fallback.to_string()
    } else {
        words
    };
    format!("{}-{}", timestamp_token(), words)
}

/// Append a random 4-hex-char tag for callers that need names unique within
/// the same minute.
pub fn with_unique_suffix(name: &str) -> String {
    let tag: u16 = random();
    format!("{name}-{tag:04x}")
}

fn filtered_words(text: &str, max_words: usize) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .take(max_words)
        .map(|word| word.to_string())
        .collect()
}

// ASCII allowlist: anything that is not an ASCII letter, digit, or space is
// dropped, so non-ASCII letters disappear entirely.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn timestamp_token() -> String {
    Local::now()
        .format("%Y%b%d-%H-%M")
        .to_string()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    // YYYYmonDD-HH-MM- is 16 chars; the word segment follows.
    fn word_segment(branch: &str) -> &str {
        &branch[16..]
    }

    fn assert_branch_shape(branch: &str) {
        let bytes = branch.as_bytes();
        assert!(branch.len() > 16, "branch too short: {branch}");
        assert!(bytes[..4].iter().all(|b| b.is_ascii_digit()));
        assert!(bytes[4..7].iter().all(|b| b.is_ascii_lowercase()));
        assert!(bytes[7..9].iter().all(|b| b.is_ascii_digit()));
        assert_eq!(bytes[9], b'-');
        assert!(bytes[10..12].iter().all(|b| b.is_ascii_digit()));
        assert_eq!(bytes[12], b'-');
        assert!(bytes[13..15].iter().all(|b| b.is_ascii_digit()));
        assert_eq!(bytes[15], b'-');
        assert!(branch
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn branch_name_has_timestamp_and_words() {
        let branch = generate_branch_name("Fix the auth bug");
        assert_branch_shape(&branch);
        assert_eq!(word_segment(&branch), "fix-auth-bug");
    }

    #[test]
    fn branch_name_is_never_empty() {
        for input in ["", "   ", "!!!", "the a an", "é ü ß"] {
            let branch = generate_branch_name(input);
            assert_branch_shape(&branch);
            assert!(!word_segment(&branch).is_empty());
        }
    }

    #[test]
    fn stopwords_are_filtered_case_insensitively() {
        let upper = generate_branch_name("The The The fix bug");
        let lower = generate_branch_name("the the the fix bug");
        assert_eq!(word_segment(&upper), "fix-bug");
        assert_eq!(word_segment(&lower), "fix-bug");
    }

    #[test]
    fn word_cap_keeps_first_six_survivors() {
        let branch =
            generate_branch_name("fix auth login issue database schema migration rollback");
        assert_eq!(
            word_segment(&branch),
            "fix-auth-login-issue-database-schema"
        );
    }

    #[test]
    fn all_stopwords_falls_back_to_update() {
        let branch = generate_branch_name("the a an");
        assert_eq!(word_segment(&branch), "update");
    }

    #[test]
    fn timestamped_name_uses_caller_fallback() {
        let name = timestamped_name("the a an", "worktree");
        assert_eq!(word_segment(&name), "worktree");
    }

    #[test]
    fn short_name_caps_words_and_skips_stopwords() {
        assert_eq!(short_name("Fix the Auth Bug In Login", 2), "fix-auth");
        assert_eq!(short_name("Fix the Auth Bug In Login", 3), "fix-auth-bug");
    }

    #[test]
    fn short_name_has_no_fallback() {
        assert_eq!(short_name("the a an", 3), "");
        assert_eq!(short_name("", 3), "");
    }

    #[test]
    fn digits_survive_filtering() {
        assert_eq!(short_name("bump to v2 api", 3), "bump-v2-api");
    }

    #[test]
    fn non_ascii_letters_are_dropped_by_the_allowlist() {
        let branch = generate_branch_name("café déjà vu");
        assert_eq!(word_segment(&branch), "caf-dj-vu");
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in ["Fix the Auth Bug!", "café déjà vu", "  mixed  UP 123 "] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn punctuation_is_stripped_not_separated() {
        // "won't" collapses to "wont": punctuation is removed, not turned
        // into a word boundary.
        assert_eq!(short_name("won't re-try", 3), "wont-retry");
    }

    #[test]
    fn unique_suffix_appends_four_hex_chars() {
        let name = with_unique_suffix("2026jan12-16-43-fix-bug");
        let (base, tag) = name.rsplit_once('-').unwrap();
        assert_eq!(base, "2026jan12-16-43-fix-bug");
        assert_eq!(tag.len(), 4);
        assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
