//! Tag summaries for report headers

use crate::types::Tag;

/// Key prefix reserved for tags the provider sets itself
pub const RESERVED_TAG_PREFIX: &str = "aws:";

/// Whether a tag belongs to the provider's reserved namespace
pub fn is_reserved(tag: &Tag) -> bool {
    tag.key.starts_with(RESERVED_TAG_PREFIX)
}

/// Format user tags as sorted, space-separated `key=value` pairs
pub fn format_tags(tags: &[Tag]) -> String {
    let mut pairs: Vec<String> = tags
        .iter()
        .filter(|tag| !is_reserved(tag))
        .map(|tag| format!("{}={}", tag.key, tag.value))
        .collect();
    pairs.sort();
    pairs.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Vec<Tag> {
        pairs.iter().map(|(k, v)| Tag::new(*k, *v)).collect()
    }

    #[test]
    fn test_reserved_tags_dropped() {
        let input = tags(&[("aws:createdBy", "x"), ("env", "prod"), ("team", "infra")]);
        assert_eq!(format_tags(&input), "env=prod team=infra");
    }

    #[test]
    fn test_sorted_regardless_of_input_order() {
        let forward = tags(&[("Name", "web-1"), ("env", "prod"), ("team", "infra")]);
        let reversed: Vec<Tag> = forward.iter().rev().cloned().collect();

        assert_eq!(format_tags(&forward), "Name=web-1 env=prod team=infra");
        assert_eq!(format_tags(&forward), format_tags(&reversed));
    }

    #[test]
    fn test_sorts_on_formatted_pair() {
        // '.' sorts before '='
        let input = tags(&[("a", "2"), ("a.b", "1")]);
        assert_eq!(format_tags(&input), "a.b=1 a=2");
    }

    #[test]
    fn test_only_reserved_tags() {
        let input = tags(&[
            ("aws:cloudformation:stack-name", "core"),
            ("aws:autoscaling:groupName", "asg"),
        ]);
        assert_eq!(format_tags(&input), "");
        assert!(input.iter().all(is_reserved));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let input = tags(&[("AWS:owner", "ops"), ("aws", "bare")]);
        assert_eq!(format_tags(&input), "AWS:owner=ops aws=bare");
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_tags(&[]), "");
    }
}
