//! Joining and splitting `---` delimited frontmatter documents.

pub const DELIMITER: &str = "---";

/// Builds `---\n{frontmatter}\n---\n\n{body}`. Whitespace around the
/// frontmatter is trimmed, the body is kept as is.
#[must_use]
pub fn assemble(frontmatter: &str, body: &str) -> String {
    format!("{DELIMITER}\n{}\n{DELIMITER}\n\n{body}", frontmatter.trim())
}

/// Inverse of [`assemble`]. Returns the frontmatter and the exact body, or
/// `None` if the delimiters are missing.
#[must_use]
pub fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(DELIMITER)?.strip_prefix('\n')?;
    let closing = format!("\n{DELIMITER}\n");

    let end = rest.find(&closing)?;
    let (frontmatter, after) = (&rest[..end], &rest[end + closing.len()..]);

    Some((frontmatter, after.strip_prefix('\n')?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_layout() {
        assert_eq!(
            assemble("title: Hello\ndraft: false\n", "Body text"),
            "---\ntitle: Hello\ndraft: false\n---\n\nBody text"
        );
        assert_eq!(assemble("\n  title: x  \n\n", ""), "---\ntitle: x\n---\n\n");
    }

    #[test]
    fn split_recovers_body() {
        let bodies = [
            "",
            "Plain body",
            "\n\nLeading newlines and trailing spaces  \n",
            "A body with its own\n---\nhorizontal rule\n---\n",
            "---\nstarts like frontmatter",
        ];

        for frontmatter in ["title: Hello\npostType: article\n", ""] {
            for body in bodies {
                let content = assemble(frontmatter, body);
                let (parsed_frontmatter, parsed_body) = split(&content).unwrap();
                assert_eq!(parsed_frontmatter, frontmatter.trim());
                assert_eq!(parsed_body, body);
            }
        }
    }

    #[test]
    fn split_without_delimiters() {
        assert_eq!(split("just text"), None);
        assert_eq!(split("---\ntitle: x\n"), None);
    }
}
