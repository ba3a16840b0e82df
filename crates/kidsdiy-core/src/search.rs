// Client-side title search over an already-loaded list.

/// Items that carry a searchable title.
pub trait Titled {
    fn title(&self) -> &str;
}

impl Titled for String {
    fn title(&self) -> &str {
        self
    }
}

impl Titled for &str {
    fn title(&self) -> &str {
        self
    }
}

/// Case-insensitive substring match. An empty query keeps everything;
/// whitespace in the query is matched literally.
pub fn matches_title(title: &str, query: &str) -> bool {
    query.is_empty() || title.to_lowercase().contains(&query.to_lowercase())
}

/// Items whose title contains `query`, in their original order.
pub fn filter_by_title<'a, T: Titled>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| matches_title(item.title(), query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TITLES: [&str; 3] = ["Alpha", "beta", "Gamma"];

    fn titles<'a>(found: &[&&'a str]) -> Vec<&'a str> {
        found.iter().map(|t| **t).collect()
    }

    #[test]
    fn single_letter_matches_all_three() {
        assert_eq!(titles(&filter_by_title(&TITLES, "a")), vec!["Alpha", "beta", "Gamma"]);
    }

    #[test]
    fn prefix_matches_one() {
        assert_eq!(titles(&filter_by_title(&TITLES, "Gam")), vec!["Gamma"]);
        assert_eq!(titles(&filter_by_title(&TITLES, "GAM")), vec!["Gamma"]);
    }

    #[test]
    fn empty_query_keeps_everything_and_misses_are_empty() {
        assert_eq!(filter_by_title(&TITLES, "").len(), 3);
        assert!(filter_by_title(&TITLES, "delta").is_empty());
    }

    #[test]
    fn whitespace_is_part_of_the_query() {
        assert!(filter_by_title(&TITLES, " ").is_empty());
        assert!(filter_by_title(&TITLES, "a ").is_empty());
        assert_eq!(titles(&filter_by_title(&["Big rocket"], "g r")), vec!["Big rocket"]);
    }
}
