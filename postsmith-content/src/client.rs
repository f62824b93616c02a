use crate::store::{ContentStore, StagedFile, StorageError};
use postsmith_common::{
    document,
    model::{
        ModelValidationError,
        frontmatter::{DEFAULT_AUTHOR, Frontmatter},
        post::{NewPost, PostRequest, Quote},
        quotes::{QUOTES_EXTENSION, serialize_quotes},
    },
    slug::Slug,
};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

pub type Result<T, E = ContentError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Validation(#[from] ModelValidationError),
    #[error("File already exists: {filename}. Please use a different title.")]
    Conflict { filename: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Failed to serialize {document} to YAML: {source}")]
    Serialize {
        document: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
}

/// What the caller gets back for a created post.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPost {
    pub filename: String,
    pub path: String,
    pub new_slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotes_ref: Option<String>,
}

struct StagedQuotes {
    quotes_ref: String,
    file: StagedFile,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ContentClient {
    store: ContentStore,
    author: String,
}

impl ContentClient {
    #[must_use]
    pub fn new(store: ContentStore, author: impl Into<String>) -> Self {
        Self {
            store,
            author: author.into(),
        }
    }

    #[must_use]
    pub fn with_default_author(store: ContentStore) -> Self {
        Self::new(store, DEFAULT_AUTHOR)
    }

    /// Creates `blog/{slug}.mdx` and, for a book note with quotes,
    /// `bookQuotes/{slug}-quotes.yaml`.
    ///
    /// Blocks on file I/O. The post is never overwritten: a post that exists
    /// up front or appears before the final rename is a
    /// [`ContentError::Conflict`]. Either both files end up in place or
    /// neither does.
    pub fn create_post(&self, request: PostRequest) -> Result<CreatedPost> {
        let post = NewPost::try_from(request).map_err(ModelValidationError::from)?;

        let slug = Slug::from_title(&post.title);
        let filename = slug.post_filename();
        let post_path = self.store.post_path(&filename);

        if self.store.exists(&post_path)? {
            warn!(%filename, "Post already exists");
            return Err(ContentError::Conflict { filename });
        }

        let mut frontmatter =
            Frontmatter::from_post(&post, &self.author).map_err(ModelValidationError::from)?;

        let staged_quotes = match &post.book {
            Some(book) => self.stage_quotes(&slug, &book.quotes)?,
            None => None,
        };
        frontmatter.quotes_ref = staged_quotes
            .as_ref()
            .map(|staged| staged.quotes_ref.clone());

        let frontmatter_yaml = frontmatter
            .to_yaml()
            .map_err(|source| ContentError::Serialize {
                document: "frontmatter",
                source,
            })?;
        let content = document::assemble(&frontmatter_yaml, &post.body);

        self.store.ensure_posts_dir()?;
        let written_post = self
            .store
            .stage(post_path, &content)?
            .commit_new()
            .map_err(|err| {
                if err.is_already_exists() {
                    warn!(%filename, "Post was created concurrently");
                    ContentError::Conflict {
                        filename: filename.clone(),
                    }
                } else {
                    err.into()
                }
            })?;

        let quotes_ref = match staged_quotes {
            Some(StagedQuotes { quotes_ref, file }) => {
                self.commit_quotes(file, &written_post)?;
                Some(quotes_ref)
            }
            None => None,
        };

        info!(
            path = %written_post.display(),
            post_type = %post.post_type,
            "Created post"
        );

        Ok(CreatedPost {
            filename,
            path: slug.public_path(),
            new_slug: slug.into_inner(),
            title: post.title,
            quotes_ref,
        })
    }

    fn stage_quotes(&self, slug: &Slug, quotes: &[Quote]) -> Result<Option<StagedQuotes>> {
        self.store.ensure_quotes_dir()?;

        let Some(yaml) = serialize_quotes(slug, quotes).map_err(|source| {
            ContentError::Serialize {
                document: "quotes",
                source,
            }
        })?
        else {
            return Ok(None);
        };

        let quotes_ref = slug.quotes_ref();
        let target = self
            .store
            .quotes_path(&format!("{quotes_ref}.{QUOTES_EXTENSION}"));
        let file = self.store.stage(target, &yaml)?;

        Ok(Some(StagedQuotes { quotes_ref, file }))
    }

    /// A quotes file left over from an earlier failed attempt is replaced.
    /// If the quotes cannot be written the post is removed again.
    fn commit_quotes(&self, file: StagedFile, written_post: &Path) -> Result<()> {
        match file.commit() {
            Ok(path) => {
                info!(path = %path.display(), "Created quotes file");
                Ok(())
            }
            Err(err) => {
                if let Err(cleanup_err) = self.store.remove(written_post) {
                    error!(error = %cleanup_err, "Could not remove post after quotes failed");
                }
                Err(err.into())
            }
        }
    }
}
