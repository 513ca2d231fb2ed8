// src/models/listing.rs

use serde::{Deserialize, Serialize};

use super::{post::Post, tag::Tag};

/// Sort mode of the listing screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Creation time, most recent first.
    #[default]
    Newest,
    /// Upvote count, highest first.
    Top,
}

impl SortMode {
    pub fn column(&self) -> &'static str {
        match self {
            SortMode::Newest => "created_at",
            SortMode::Top => "upvotes",
        }
    }
}

/// Exact-match tag filter; `All` lets every post through.
///
/// A name outside the tag set is kept as `Unknown` and matches no post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagFilter {
    #[default]
    All,
    Only(Tag),
    Unknown(String),
}

impl TagFilter {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "all" => TagFilter::All,
            other => match other.parse() {
                Ok(tag) => TagFilter::Only(tag),
                Err(_) => TagFilter::Unknown(other.to_string()),
            },
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Only(tag) => post.tag == Some(*tag),
            TagFilter::Unknown(_) => false,
        }
    }

    /// Name echoed back to the listing screen.
    pub fn label(&self) -> &str {
        match self {
            TagFilter::All => "all",
            TagFilter::Only(tag) => tag.as_str(),
            TagFilter::Unknown(name) => name,
        }
    }
}

/// Case-insensitive substring match on the title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleSearch {
    needle: String,
}

impl TitleSearch {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.needle.is_empty() || post.title.to_lowercase().contains(&self.needle)
    }
}

/// Both listing filters. They are independent predicates, so the order in
/// which they run never changes the result.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub search: TitleSearch,
    pub tag: TagFilter,
}

impl ListingFilter {
    pub fn matches(&self, post: &Post) -> bool {
        self.search.matches(post) && self.tag.matches(post)
    }

    /// Keeps the fetched order.
    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|post| self.matches(post)).collect()
    }
}

/// Query parameters of the listing screen.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    #[serde(default)]
    pub sort: SortMode,

    /// Title search.
    pub q: Option<String>,

    /// `all` or a tag name.
    pub tag: Option<String>,
}

impl ListingParams {
    pub fn filter(&self) -> ListingFilter {
        ListingFilter {
            search: TitleSearch::new(self.q.as_deref().unwrap_or_default()),
            tag: self.tag.as_deref().map(TagFilter::parse).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64, title: &str, tag: Option<Tag>) -> Post {
        Post {
            id,
            title: title.to_string(),
            content: None,
            image_url: None,
            tag,
            secret_key: None,
            upvotes: 0,
            created_at: None,
        }
    }

    fn sample() -> Vec<Post> {
        vec![
            post(1, "Testimony time", Some(Tag::Testimony)),
            post(2, "A question about Psalms", Some(Tag::Question)),
            post(3, "Morning TIME reflection", Some(Tag::Reflection)),
            post(4, "Untagged time", None),
        ]
    }

    fn ids(posts: &[&Post]) -> Vec<i64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn title_search_ignores_case() {
        let posts = sample();
        let search = TitleSearch::new("TiMe");
        let hits: Vec<_> = posts.iter().filter(|p| search.matches(p)).collect();
        assert_eq!(ids(&hits), vec![1, 3, 4]);
    }

    #[test]
    fn tag_filter_is_exact_and_skips_untagged() {
        let posts = sample();
        let filter = TagFilter::Only(Tag::Testimony);
        let hits: Vec<_> = posts.iter().filter(|p| filter.matches(p)).collect();
        assert_eq!(ids(&hits), vec![1]);
        assert!(!TagFilter::Only(Tag::Other).matches(&posts[3]));
    }

    #[test]
    fn filters_commute_and_are_idempotent() {
        let posts = sample();
        let search = TitleSearch::new("time");
        let tag = TagFilter::Only(Tag::Reflection);

        let text_then_tag: Vec<_> = posts
            .iter()
            .filter(|p| search.matches(p))
            .filter(|p| tag.matches(p))
            .collect();
        let tag_then_text: Vec<_> = posts
            .iter()
            .filter(|p| tag.matches(p))
            .filter(|p| search.matches(p))
            .collect();
        assert_eq!(ids(&text_then_tag), ids(&tag_then_text));

        let filter = ListingFilter { search, tag };
        let once = filter.apply(&posts);
        let owned: Vec<Post> = once.iter().map(|p| (*p).clone()).collect();
        let twice = filter.apply(&owned);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn params_parse_all_and_named_tags() {
        let params = ListingParams {
            tag: Some("all".to_string()),
            ..ListingParams::default()
        };
        assert_eq!(params.filter().tag, TagFilter::All);

        let params = ListingParams {
            tag: Some("Prayer Request".to_string()),
            ..ListingParams::default()
        };
        assert_eq!(params.filter().tag, TagFilter::Only(Tag::PrayerRequest));

        assert_eq!(ListingParams::default().filter().tag, TagFilter::All);
    }

    #[test]
    fn unknown_tag_matches_nothing() {
        let params = ListingParams {
            tag: Some("Tactics".to_string()),
            ..ListingParams::default()
        };
        let filter = params.filter();
        assert_eq!(filter.tag, TagFilter::Unknown("Tactics".to_string()));
        assert_eq!(filter.tag.label(), "Tactics");
        assert!(filter.apply(&sample()).is_empty());
    }

    #[test]
    fn sort_modes_map_to_columns() {
        assert_eq!(SortMode::default().column(), "created_at");
        assert_eq!(SortMode::Top.column(), "upvotes");
    }
}
