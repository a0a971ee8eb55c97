use unicode_segmentation::UnicodeSegmentation;

/// The identifier of a document awaiting review, as assigned by the upstream application.
///
/// We never generate these - we only embed them in approval links and document paths, so the
/// parsing rules are about keeping them safe to splice into URLs and HTML.
#[derive(Debug, Clone)]
pub struct ItemId(String);

impl ItemId {
    /// Returns an instance of `ItemId` if the input satisfies all our validation constraints on
    /// item identifiers. It returns an error message otherwise.
    pub fn parse(s: String) -> Result<ItemId, String> {
        // `.trim()` returns a view over the input `s` without trailing whitespace-like characters.
        // `.is_empty` checks if the view contains any character.
        let is_empty_or_whitespace = s.trim().is_empty();

        // A grapheme is defined by the Unicode standard as a "user-perceived" character: `a°` is a
        // single grapheme, but it is composed of two characters (`a` and `°`).
        //
        // `graphemes` returns an iterator over the graphemes in the input `s`. `true` specifies
        // that we want to use the extended grapheme definition set, the recommended one.
        let is_too_long = s.graphemes(true).count() > 256;

        // Iterate over all characters in the input `s` to check if any of them matches one of the
        // characters in the forbidden array.
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters = s.chars().any(|g| forbidden_characters.contains(&g));

        if is_empty_or_whitespace || is_too_long || contains_forbidden_characters {
            Err(format!("{s} is not a valid item id."))
        } else {
            Ok(Self(s))
        }
    }
}

/// The caller gets a shared reference to the inner string. This gives the caller **read-only**
/// access, they have no way to compromise our invariants!
impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
