//! Dataset identifier detection in free-text search queries.

/// Namespace of identifiers recognized in search queries.
pub const ATT_URN_PREFIX: &str = "urn:nbn:fi:att:";

const SCHEMES: [&str; 2] = ["http://", "https://"];
const RESOLVER_HOST: &str = "urn.fi/";

/// Extract the identifier token if `query` consists of exactly one.
///
/// Accepts a bare `urn:nbn:fi:att:<suffix>`, optionally prefixed by an
/// `http://` or `https://` scheme and an `urn.fi/` resolver host.
pub fn identifier_token(query: &str) -> Option<&str> {
    let mut rest = query.trim();
    if let Some(stripped) = SCHEMES.iter().find_map(|s| rest.strip_prefix(s)) {
        rest = stripped;
    }
    if let Some(stripped) = rest.strip_prefix(RESOLVER_HOST) {
        rest = stripped;
    }

    let suffix = rest.strip_prefix(ATT_URN_PREFIX)?;
    let valid = !suffix.is_empty()
        && !suffix.contains('/')
        && !suffix.chars().any(char::is_whitespace);
    valid.then_some(rest)
}

/// Rewrite a search query to a dataset identifier when it is one.
///
/// All or nothing: anything but a single identifier comes back unchanged,
/// surrounding whitespace included.
pub fn transform(query: &str) -> String {
    match identifier_token(query) {
        Some(token) => token.to_string(),
        None => query.to_string(),
    }
}
