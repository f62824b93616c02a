use crate::util::{deserialize_lenient_bool, deserialize_tag_set, non_blank};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::Display;
use thiserror::Error;

pub const ARTICLE_POST_TYPE: &str = "article";
pub const BOOK_NOTE_POST_TYPE: &str = "bookNote";

/// The body of `POST /api/create-post` as the authoring UI sends it.
///
/// Everything is optional at this level so that a missing required field
/// can be reported as such instead of as malformed JSON. A client supplied
/// `quotesRef` is ignored.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub title: Option<String>,
    pub pub_date: Option<String>,
    pub post_type: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tag_set")]
    pub tags: Vec<String>,
    pub series: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub draft: bool,
    pub body_content: Option<String>,
    pub book_title: Option<String>,
    pub book_author: Option<String>,
    pub book_cover_image_name: Option<String>,
    pub book_cover_alt: Option<String>,
    pub book_cover: Option<BookCover>,
    #[serde(default, deserialize_with = "deserialize_tag_set")]
    pub book_tags: Vec<String>,
    pub inline_quotes: Option<Vec<Quote>>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum PostType {
    Article,
    BookNote,
    /// Any other type the UI knows about, written through verbatim.
    Other(String),
}

impl PostType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PostType::Article => ARTICLE_POST_TYPE,
            PostType::BookNote => BOOK_NOTE_POST_TYPE,
            PostType::Other(other) => other,
        }
    }

    #[must_use]
    pub fn is_book_note(&self) -> bool {
        matches!(self, PostType::BookNote)
    }
}

impl From<String> for PostType {
    fn from(value: String) -> Self {
        match value.as_str() {
            ARTICLE_POST_TYPE => PostType::Article,
            BOOK_NOTE_POST_TYPE => PostType::BookNote,
            _ => PostType::Other(value),
        }
    }
}

impl Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PostType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCover {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_width: Option<u32>,
}

impl BookCover {
    /// The nested cover wins. Without it a cover is built from the flattened
    /// fields if at least one of them is set.
    #[must_use]
    pub fn resolve(
        nested: Option<BookCover>,
        image_name: Option<String>,
        alt: Option<String>,
    ) -> Option<Self> {
        if let Some(nested) = nested {
            return Some(BookCover {
                image_name: non_blank(nested.image_name),
                alt: non_blank(nested.alt),
                original_width: nested.original_width,
            });
        }

        let image_name = non_blank(image_name);
        let alt = non_blank(alt);
        (image_name.is_some() || alt.is_some()).then_some(BookCover {
            image_name,
            alt,
            original_width: None,
        })
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_source: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct BookDetails {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<BookCover>,
    pub tags: Vec<String>,
    pub quotes: Vec<Quote>,
}

/// A [`PostRequest`] whose required fields are present.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct NewPost {
    pub title: String,
    pub pub_date: String,
    pub post_type: PostType,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub series: Option<String>,
    pub draft: bool,
    pub body: String,
    /// Only set for book notes.
    pub book: Option<BookDetails>,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Missing required fields (title, pubDate, postType)")]
pub struct MissingFieldsError(pub Vec<&'static str>);

impl MissingFieldsError {
    #[must_use]
    pub fn missing(&self) -> &[&'static str] {
        &self.0
    }
}

impl TryFrom<PostRequest> for NewPost {
    type Error = MissingFieldsError;

    fn try_from(value: PostRequest) -> Result<Self, Self::Error> {
        let (title, pub_date, post_type) = match (
            non_blank(value.title),
            non_blank(value.pub_date),
            non_blank(value.post_type),
        ) {
            (Some(title), Some(pub_date), Some(post_type)) => (title, pub_date, post_type),
            (title, pub_date, post_type) => {
                let missing = [
                    ("title", title.is_none()),
                    ("pubDate", pub_date.is_none()),
                    ("postType", post_type.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, is_missing)| is_missing.then_some(field))
                .collect();
                return Err(MissingFieldsError(missing));
            }
        };

        let post_type = PostType::from(post_type.trim().to_owned());
        let book = post_type.is_book_note().then(|| BookDetails {
            title: non_blank(value.book_title),
            author: non_blank(value.book_author),
            cover: BookCover::resolve(
                value.book_cover,
                value.book_cover_image_name,
                value.book_cover_alt,
            ),
            tags: value.book_tags,
            quotes: value.inline_quotes.unwrap_or_default(),
        });

        Ok(Self {
            title,
            pub_date,
            post_type,
            description: non_blank(value.description),
            tags: value.tags,
            series: non_blank(value.series),
            draft: value.draft,
            body: value.body_content.unwrap_or_default(),
            book,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> PostRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn required_fields() {
        let err = NewPost::try_from(request(json!({ "title": "Only a title" }))).unwrap_err();
        assert_eq!(err.missing(), ["pubDate", "postType"]);
        assert!(err.to_string().contains("Missing required fields"));

        let err = NewPost::try_from(request(json!({
            "title": "   ",
            "pubDate": "2024-01-01",
            "postType": "article",
        })))
        .unwrap_err();
        assert_eq!(err.missing(), ["title"]);
    }

    #[test]
    fn article_ignores_book_fields() {
        let post = NewPost::try_from(request(json!({
            "title": "Hello World",
            "pubDate": "2023-10-26T10:00:00Z",
            "postType": "article",
            "description": "",
            "bookTitle": "Ignored",
            "quotesRef": "client-supplied",
            "inlineQuotes": [{ "text": "ignored" }],
        })))
        .unwrap();

        assert_eq!(post.post_type, PostType::Article);
        assert_eq!(post.description, None);
        assert_eq!(post.body, "");
        assert!(post.book.is_none());
    }

    #[test]
    fn unknown_post_type_passes_through() {
        let post = NewPost::try_from(request(json!({
            "title": "Weekly links",
            "pubDate": "2024-01-01",
            "postType": "linkRoundup",
        })))
        .unwrap();

        assert_eq!(post.post_type, PostType::Other("linkRoundup".to_owned()));
        assert_eq!(post.post_type.to_string(), "linkRoundup");
    }

    #[test]
    fn book_note_details() {
        let post = NewPost::try_from(request(json!({
            "title": "A Book",
            "pubDate": "2024-01-01",
            "postType": "bookNote",
            "bookTitle": "The Great Book",
            "bookTags": "fiction, classics",
            "inlineQuotes": [
                { "text": "First", "quoteAuthor": "Someone", "tags": ["b", "a", "b"] },
                { "text": "Second", "quoteSource": "Page 42" },
            ],
        })))
        .unwrap();

        let book = post.book.unwrap();
        assert_eq!(book.title.as_deref(), Some("The Great Book"));
        assert_eq!(book.tags, vec!["fiction", "classics"]);
        assert_eq!(book.quotes.len(), 2);
        assert_eq!(
            book.quotes[0].tags,
            Some(vec!["b".to_owned(), "a".to_owned(), "b".to_owned()])
        );
        assert_eq!(book.quotes[1].quote_source.as_deref(), Some("Page 42"));
    }

    #[test]
    fn quote_text_is_required() {
        let result = serde_json::from_value::<PostRequest>(json!({
            "inlineQuotes": [{ "quoteAuthor": "Nobody" }],
        }));
        assert!(result.is_err());
    }

    #[test]
    fn book_cover_precedence() {
        let nested = BookCover {
            image_name: Some("nested.jpg".to_owned()),
            alt: Some(String::new()),
            original_width: Some(300),
        };

        let resolved = BookCover::resolve(
            Some(nested),
            Some("flat.jpg".to_owned()),
            Some("Flat alt".to_owned()),
        )
        .unwrap();
        assert_eq!(resolved.image_name.as_deref(), Some("nested.jpg"));
        assert_eq!(resolved.alt, None);
        assert_eq!(resolved.original_width, Some(300));

        let synthesized = BookCover::resolve(None, None, Some("Flat alt".to_owned())).unwrap();
        assert_eq!(
            synthesized,
            BookCover {
                image_name: None,
                alt: Some("Flat alt".to_owned()),
                original_width: None,
            }
        );

        assert_eq!(BookCover::resolve(None, Some(String::new()), None), None);
    }
}
