use serde::{
    Deserialize, Deserializer,
    de::{Error, Unexpected},
};

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsInput {
    List(Vec<String>),
    Joined(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagInput {
    Bool(bool),
    Text(String),
}

/// Trims every tag, drops empty ones and removes duplicates while keeping
/// the position of the first occurrence.
#[must_use]
pub fn tag_set<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !set.iter().any(|existing| existing == tag) {
            set.push(tag.to_owned());
        }
    }
    set
}

/// Accepts a list of tags or a single comma separated string.
pub fn deserialize_tag_set<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Option::<TagsInput>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(TagsInput::List(tags)) => tag_set(tags),
        Some(TagsInput::Joined(joined)) => tag_set(joined.split(',')),
    };
    Ok(tags)
}

/// Accepts `true`/`false` either as JSON booleans or as strings.
pub fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FlagInput>::deserialize(deserializer)? {
        None => Ok(false),
        Some(FlagInput::Bool(flag)) => Ok(flag),
        Some(FlagInput::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            _ => Err(Error::invalid_value(Unexpected::Str(&text), &"a boolean")),
        },
    }
}

/// Maps blank strings to `None`.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
