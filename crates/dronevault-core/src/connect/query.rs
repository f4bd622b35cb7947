//! Filter expressions and endpoint URLs for the store API
//!
//! Every caller-supplied string that ends up in a request goes through here,
//! so names with quotes, backslashes or reserved URL characters cannot change
//! the meaning of a filter or the shape of a path.

use url::Url;

/// Build a `<field> eq "<value>"` filter expression
pub fn equals_filter(field: &str, value: &str) -> String {
    format!("{} eq \"{}\"", field, escape_filter_value(value))
}

/// Escape a string for use inside a double-quoted filter literal
pub fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Join path segments onto the API root, percent-encoding each one
///
/// A segment containing `/` stays a single segment.
pub fn endpoint(root: &Url, segments: &[&str]) -> Url {
    let mut url = root.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Endpoint with a `filter` query parameter
pub fn filtered_endpoint(root: &Url, segments: &[&str], filter: &str) -> Url {
    let mut url = endpoint(root, segments);
    url.query_pairs_mut().append_pair("filter", filter);
    url
}
