use std::cmp::Ordering;
use std::fmt;

use crate::models::Post;

/// Orders two strings the way a reader expects a list to be alphabetized:
/// case-insensitively first, then by code point so the order stays total.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

pub fn compare_by_title(a: &Post, b: &Post) -> Ordering {
    compare_text(&a.title, &b.title)
}

pub fn compare_by_body(a: &Post, b: &Post) -> Ordering {
    compare_text(&a.body, &b.body)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Title,
    Body,
}

impl SortKey {
    pub const ALL: [SortKey; 2] = [SortKey::Title, SortKey::Body];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Body => "body",
        }
    }

    pub fn comparator(self) -> fn(&Post, &Post) -> Ordering {
        match self {
            SortKey::Title => compare_by_title,
            SortKey::Body => compare_by_body,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable in-place sort; posts with equal keys keep their relative order.
pub fn sort_posts(posts: &mut [Post], key: SortKey) {
    posts.sort_by(key.comparator());
}

/// Posts whose title contains `query`, ignoring case. The input is left as is.
pub fn search_posts(posts: &[Post], query: &str) -> Vec<Post> {
    let needle = query.to_lowercase();
    posts
        .iter()
        .filter(|post| post.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn post(id: &str, title: &str, body: &str) -> Post {
        Post {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            image: String::new(),
        }
    }

    fn titles(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn sorts_by_title() {
        let mut posts = vec![post("1", "b", ""), post("2", "a", "")];
        sort_posts(&mut posts, SortKey::Title);
        assert_eq!(titles(&posts), vec!["a", "b"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut posts = vec![
            post("first", "same", "z"),
            post("x", "other", "m"),
            post("second", "same", "a"),
        ];
        sort_posts(&mut posts, SortKey::Title);
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "first", "second"]);
    }

    #[test]
    fn sorts_by_body_ignoring_case() {
        let mut posts = vec![
            post("1", "", "banana"),
            post("2", "", "Apple"),
            post("3", "", "cherry"),
        ];
        sort_posts(&mut posts, SortKey::Body);
        let bodies: Vec<&str> = posts.iter().map(|p| p.body.as_str()).collect();
        assert_eq!(bodies, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn comparison_is_total_across_case_variants() {
        assert_eq!(compare_text("a", "A"), "a".cmp("A"));
        assert_eq!(compare_text("Zed", "apple"), Ordering::Greater);
        assert_eq!(compare_text("same", "same"), Ordering::Equal);
    }

    #[test]
    fn search_matches_title_substrings_case_insensitively() {
        let posts = vec![
            post("1", "Category A", ""),
            post("2", "Dog", ""),
            post("3", "Concatenate", ""),
        ];
        let found = search_posts(&posts, "cat");
        assert_eq!(titles(&found), vec!["Category A", "Concatenate"]);
        assert_eq!(posts.len(), 3);
    }

    #[test]
    fn empty_query_matches_everything() {
        let posts = vec![post("1", "one", ""), post("2", "two", "")];
        assert_eq!(search_posts(&posts, "").len(), 2);
    }

    #[test]
    fn sort_keys_label_the_selector() {
        let labels: Vec<String> = SortKey::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["title", "body"]);
    }
}
