use unicode_segmentation::UnicodeSegmentation;

/// The name of the document store collection a new item belongs to, e.g. `treasure_hunts`.
#[derive(Debug, Clone)]
pub struct CollectionType(String);

impl CollectionType {
    /// Same constraints as `ItemId`: the value ends up in approval links and document paths, so it
    /// must be non-empty, reasonably sized and free of URL/HTML-hostile characters.
    pub fn parse(s: String) -> Result<CollectionType, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let is_too_long = s.graphemes(true).count() > 256;
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters = s.chars().any(|g| forbidden_characters.contains(&g));

        if is_empty_or_whitespace || is_too_long || contains_forbidden_characters {
            Err(format!("{s} is not a valid collection type."))
        } else {
            Ok(Self(s))
        }
    }

    /// Human-readable form used in the email copy: underscores become spaces, so
    /// `treasure_hunts` reads as "treasure hunts".
    pub fn display_name(&self) -> String {
        self.0.replace('_', " ")
    }
}

impl AsRef<str> for CollectionType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
