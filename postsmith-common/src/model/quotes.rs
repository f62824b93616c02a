use crate::{model::post::Quote, slug::Slug};
use serde::{Deserialize, Serialize};

pub const QUOTES_EXTENSION: &str = "yaml";

/// Contents of `bookQuotes/{slug}-quotes.yaml`.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotesDocument {
    pub book_slug: String,
    pub quotes: Vec<Quote>,
}

/// Serializes the quotes of a book note. Returns `None` when there is
/// nothing to write.
pub fn serialize_quotes(slug: &Slug, quotes: &[Quote]) -> Result<Option<String>, serde_yaml::Error> {
    if quotes.is_empty() {
        return Ok(None);
    }

    let document = QuotesDocument {
        book_slug: slug.get().to_owned(),
        quotes: quotes.to_vec(),
    };
    serde_yaml::to_string(&document).map(Some)
}
