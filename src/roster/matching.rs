//! Best-effort matching of planning shift entries to roster recruiters.
//!
//! There is no relational integrity between stores, so the join is explicit
//! and documented: an exact crewcode match always wins; otherwise two names
//! match when their lowercase token overlap reaches min(2, smaller token
//! count). A single-token name therefore matches on that one token.

/// Lowercased whitespace tokens of a name.
fn tokens(name: &str) -> Vec<String> {
    name.split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}

/// Fuzzy name match on token overlap.
pub fn names_match(a: &str, b: &str) -> bool {
    let ta = tokens(a);
    let tb = tokens(b);
    if ta.is_empty() || tb.is_empty() {
        return false;
    }
    let required = ta.len().min(tb.len()).min(2);
    let overlap = ta.iter().filter(|t| tb.contains(t)).count();
    overlap >= required
}

/// Does a shift entry belong to this recruiter? Crewcode is authoritative
/// when both sides carry one; names are only the fallback.
pub fn entry_matches(
    recruiter_name: &str,
    recruiter_crewcode: &str,
    entry_name: &str,
    entry_crewcode: Option<&str>,
) -> bool {
    if let Some(code) = entry_crewcode {
        if !code.is_empty() && !recruiter_crewcode.is_empty() {
            return code == recruiter_crewcode;
        }
    }
    names_match(recruiter_name, entry_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_token_overlap_matches() {
        assert!(names_match("Jane Doe", "doe jane"));
        assert!(names_match("Jane Marie Doe", "Jane Doe"));
    }

    #[test]
    fn one_shared_token_is_not_enough_for_full_names() {
        assert!(!names_match("Jane Doe", "Jane Smith"));
    }

    #[test]
    fn single_token_names_match_on_that_token() {
        assert!(names_match("Jane", "Jane Doe"));
        assert!(!names_match("Jane", "John Doe"));
    }

    #[test]
    fn blank_names_never_match() {
        assert!(!names_match("", "Jane Doe"));
        assert!(!names_match("  ", ""));
    }

    #[test]
    fn crewcode_beats_name_both_ways() {
        // Same code, different name: match.
        assert!(entry_matches("Jane Doe", "12345", "J. D.", Some("12345")));
        // Different code, same name: the code is authoritative, no match.
        assert!(!entry_matches("Jane Doe", "12345", "Jane Doe", Some("99999")));
        // No code on the entry: fall back to the name.
        assert!(entry_matches("Jane Doe", "12345", "jane doe", None));
    }
}
