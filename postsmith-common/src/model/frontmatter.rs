use crate::model::post::{BookCover, NewPost, PostType};
use serde::Serialize;
use std::ops::RangeInclusive;
use thiserror::Error;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

/// Written as `author` on every post; posts are single-author.
pub const DEFAULT_AUTHOR: &str = "Default Author";

/// Zone-less formats tried after RFC 3339, in order. Values are taken as UTC.
const LOCAL_DATE_TIME_FORMATS: [&[BorrowedFormatItem<'static>]; 3] = [
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
];
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const RFC_3339_YEARS: RangeInclusive<i32> = 0..=9999;

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Failed to parse pubDate '{0}'")]
pub struct InvalidDateError(String);

/// Parses a publication date.
///
/// Accepts an RFC 3339 timestamp, `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM` or a bare `YYYY-MM-DD`
/// (midnight). The first format that matches wins. Years outside
/// `0..=9999` are rejected since RFC 3339 cannot represent them.
pub fn parse_pub_date(input: &str) -> Result<OffsetDateTime, InvalidDateError> {
    let input = input.trim();

    parse_any_format(input)
        .filter(|date_time| RFC_3339_YEARS.contains(&date_time.year()))
        .ok_or_else(|| InvalidDateError(input.to_owned()))
}

fn parse_any_format(input: &str) -> Option<OffsetDateTime> {
    if let Ok(date_time) = OffsetDateTime::parse(input, &Rfc3339) {
        return Some(date_time);
    }

    for format in LOCAL_DATE_TIME_FORMATS {
        if let Ok(date_time) = PrimitiveDateTime::parse(input, format) {
            return Some(date_time.assume_utc());
        }
    }

    Date::parse(input, DATE_FORMAT)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// The YAML block at the top of a post. Field order is the order keys are
/// written in.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub pub_date: OffsetDateTime,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub post_type: PostType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    pub draft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_cover: Option<BookCover>,
    /// Only set once the quotes file for this post is known to be written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotes_ref: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub book_tags: Vec<String>,
}

impl Frontmatter {
    pub fn from_post(post: &NewPost, author: &str) -> Result<Self, InvalidDateError> {
        let pub_date = parse_pub_date(&post.pub_date)?;

        let mut frontmatter = Self {
            title: post.title.clone(),
            pub_date,
            author: author.to_owned(),
            description: post.description.clone(),
            post_type: post.post_type.clone(),
            tags: post.tags.clone(),
            series: post.series.clone(),
            draft: post.draft,
            book_title: None,
            book_author: None,
            book_cover: None,
            quotes_ref: None,
            book_tags: Vec::new(),
        };

        if let Some(book) = &post.book {
            frontmatter.book_title.clone_from(&book.title);
            frontmatter.book_author.clone_from(&book.author);
            frontmatter.book_cover.clone_from(&book.cover);
            frontmatter.book_tags.clone_from(&book.tags);
        }

        Ok(frontmatter)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::post::{BookDetails, Quote};
    use serde_yaml::{Mapping, Value};
    use time::macros::datetime;

    fn article() -> NewPost {
        NewPost {
            title: "Hello World".to_owned(),
            pub_date: "2023-10-26T10:00:00Z".to_owned(),
            post_type: PostType::Article,
            description: Some("A greeting".to_owned()),
            tags: vec!["rust".to_owned(), "web".to_owned()],
            series: None,
            draft: false,
            body: "Body".to_owned(),
            book: None,
        }
    }

    fn yaml_mapping(frontmatter: &Frontmatter) -> Mapping {
        let yaml = frontmatter.to_yaml().unwrap();
        serde_yaml::from_str::<Value>(&yaml)
            .unwrap()
            .as_mapping()
            .unwrap()
            .clone()
    }

    #[test]
    fn date_formats() {
        assert_eq!(
            parse_pub_date("2023-10-26T10:00:00Z").unwrap(),
            datetime!(2023-10-26 10:00 UTC)
        );
        assert_eq!(
            parse_pub_date("2023-10-26T10:00:00.5+02:00").unwrap(),
            datetime!(2023-10-26 10:00:00.5 +02:00)
        );
        assert_eq!(
            parse_pub_date("2023-10-26T10:00:00").unwrap(),
            datetime!(2023-10-26 10:00 UTC)
        );
        assert_eq!(
            parse_pub_date("2023-10-26 10:00:00").unwrap(),
            datetime!(2023-10-26 10:00 UTC)
        );
        assert_eq!(
            parse_pub_date("2023-10-26T10:00").unwrap(),
            datetime!(2023-10-26 10:00 UTC)
        );
        assert_eq!(
            parse_pub_date(" 2023-10-26 ").unwrap(),
            datetime!(2023-10-26 0:00 UTC)
        );
        assert_eq!(
            parse_pub_date("9999-12-31").unwrap(),
            datetime!(9999-12-31 0:00 UTC)
        );
    }

    #[test]
    fn invalid_dates() {
        let inputs = [
            "invalid-date-format",
            "",
            "2023-13-01",
            "26/10/2023",
            "2023-10-26T",
            "-0001-01-01",
            "-0001-01-01T10:00:00",
            "+10000-01-01",
        ];
        for input in inputs {
            assert_eq!(
                parse_pub_date(input),
                Err(InvalidDateError(input.trim().to_owned())),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn article_frontmatter() {
        let frontmatter = Frontmatter::from_post(&article(), DEFAULT_AUTHOR).unwrap();
        assert_eq!(frontmatter.pub_date, datetime!(2023-10-26 10:00 UTC));
        assert_eq!(frontmatter.quotes_ref, None);

        let mapping = yaml_mapping(&frontmatter);
        let keys: Vec<_> = mapping.keys().filter_map(Value::as_str).collect();
        assert_eq!(
            keys,
            ["title", "pubDate", "author", "description", "postType", "tags", "draft"]
        );
        assert_eq!(mapping["author"], Value::from(DEFAULT_AUTHOR));
        assert_eq!(mapping["postType"], Value::from("article"));
        assert_eq!(mapping["draft"], Value::from(false));
        assert_eq!(
            mapping["pubDate"].as_str().map(parse_pub_date),
            Some(Ok(datetime!(2023-10-26 10:00 UTC)))
        );
    }

    #[test]
    fn book_note_frontmatter() {
        let mut post = article();
        post.post_type = PostType::BookNote;
        post.book = Some(BookDetails {
            title: Some("The Great Book".to_owned()),
            author: Some("Famous Author".to_owned()),
            cover: Some(BookCover {
                image_name: Some("book-cover.jpg".to_owned()),
                alt: Some("Book cover".to_owned()),
                original_width: Some(300),
            }),
            tags: vec!["classics".to_owned()],
            quotes: vec![Quote {
                text: "A quote".to_owned(),
                ..Quote::default()
            }],
        });

        let mut frontmatter = Frontmatter::from_post(&post, "Someone Else").unwrap();
        assert_eq!(frontmatter.quotes_ref, None);
        frontmatter.quotes_ref = Some("hello-world-quotes".to_owned());

        let mapping = yaml_mapping(&frontmatter);
        assert_eq!(mapping["author"], Value::from("Someone Else"));
        assert_eq!(mapping["bookTitle"], Value::from("The Great Book"));
        assert_eq!(mapping["bookCover"]["imageName"], Value::from("book-cover.jpg"));
        assert_eq!(mapping["bookCover"]["originalWidth"], Value::from(300));
        assert_eq!(mapping["quotesRef"], Value::from("hello-world-quotes"));
        assert_eq!(mapping["bookTags"][0], Value::from("classics"));
    }

    #[test]
    fn invalid_date_fails_transform() {
        let mut post = article();
        post.pub_date = "yesterday".to_owned();
        assert!(Frontmatter::from_post(&post, DEFAULT_AUTHOR).is_err());
    }
}
