// Path and query parsing for the API routes

use percent_encoding::percent_decode_str;

/// Split a request path into decoded segments.
///
/// Leading and trailing slashes are trimmed first, so `/api/books/` yields
/// `["api", "books"]`. Returns `None` when a segment is empty, is `.` or `..`,
/// or decodes to something that could escape the content root.
pub fn split_segments(path: &str) -> Option<Vec<String>> {
    path.trim_matches('/').split('/').map(decode_segment).collect()
}

fn decode_segment(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    is_safe_segment(&decoded).then(|| decoded.into_owned())
}

/// A single path component that stays inside its parent directory
pub fn is_safe_segment(segment: &str) -> bool {
    !(segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0']))
}

/// First value of `name` in a raw query string, form-decoded
pub fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    query?
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| form_decode(key) == name)
        .map(|(_, value)| form_decode(value))
}

fn form_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segments() {
        assert_eq!(
            split_segments("/api/chapter/genesis/1").unwrap(),
            vec!["api", "chapter", "genesis", "1"]
        );
        assert_eq!(split_segments("/api/books/").unwrap(), vec!["api", "books"]);
        assert_eq!(
            split_segments("/api/chapters/1%20John").unwrap(),
            vec!["api", "chapters", "1 John"]
        );
    }

    #[test]
    fn test_split_segments_rejects_unsafe() {
        assert!(split_segments("/api/chapter//1").is_none());
        assert!(split_segments("/api/chapter/../1").is_none());
        assert!(split_segments("/api/chapter/%2E%2E/1").is_none());
        assert!(split_segments("/api/chapter/a%2Fb/1").is_none());
        assert!(split_segments("/api/chapter/%FF/1").is_none());
    }

    #[test]
    fn test_is_safe_segment() {
        assert!(is_safe_segment("eng"));
        assert!(is_safe_segment("1 John"));
        assert!(!is_safe_segment(""));
        assert!(!is_safe_segment(".."));
        assert!(!is_safe_segment("../eng"));
        assert!(!is_safe_segment("a\\b"));
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param(Some("lang=spa"), "lang"), Some("spa".to_string()));
        assert_eq!(
            query_param(Some("x=1&lang=spa&lang=fra"), "lang"),
            Some("spa".to_string())
        );
        assert_eq!(query_param(Some("lang="), "lang"), Some(String::new()));
        assert_eq!(query_param(Some("lang"), "lang"), Some(String::new()));
        assert_eq!(
            query_param(Some("lang=pt%2Dbr"), "lang"),
            Some("pt-br".to_string())
        );
        assert_eq!(query_param(Some("other=1"), "lang"), None);
        assert_eq!(query_param(None, "lang"), None);
    }
}
