use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Returned when a title contains nothing that survives slugification.
pub const FALLBACK_SLUG: &str = "untitled-post";

pub const POST_EXTENSION: &str = "mdx";
pub const QUOTES_REF_SUFFIX: &str = "-quotes";
pub const PUBLIC_POST_PREFIX: &str = "/blog/";

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Whitespace pattern is valid"));
static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_-]+").expect("Slug character pattern is valid"));
static HYPHEN_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("Hyphen pattern is valid"));

/// Turns a post title into a lowercase identifier made of `[a-z0-9_]` words
/// joined by single hyphens.
///
/// Never returns an empty string: titles without any usable character map
/// to [`FALLBACK_SLUG`]. Dots and slashes are stripped, so the result is
/// always a single safe path component.
#[must_use]
pub fn generate_slug(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let hyphenated = WHITESPACE_RUNS.replace_all(&lowered, "-");
    let stripped = NON_SLUG_CHARS.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUNS.replace_all(&stripped, "-");
    let slug = collapsed.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_owned()
    } else {
        slug.to_owned()
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    #[must_use]
    pub fn from_title(title: &str) -> Self {
        Self(generate_slug(title))
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// `{slug}.mdx`
    #[must_use]
    pub fn post_filename(&self) -> String {
        format!("{}.{POST_EXTENSION}", self.0)
    }

    /// `/blog/{slug}`
    #[must_use]
    pub fn public_path(&self) -> String {
        format!("{PUBLIC_POST_PREFIX}{}", self.0)
    }

    /// `{slug}-quotes`, the stem of the companion quotes file.
    #[must_use]
    pub fn quotes_ref(&self) -> String {
        format!("{}{QUOTES_REF_SUFFIX}", self.0)
    }
}
