//! Chapter document model and validation
//!
//! A chapter file is decoded only to prove it is well-formed; callers keep
//! serving the original bytes.

use serde::{Deserialize, Deserializer, Serialize};

/// A single verse of a chapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Verse {
    #[serde(deserialize_with = "null_as_default")]
    pub verse: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
}

/// Decoded content of one `{book}/{chapter}/{language}.json` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chapter {
    #[serde(deserialize_with = "null_as_default")]
    pub book: String,
    #[serde(deserialize_with = "null_as_default")]
    pub chapter: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "verses_or_empty")]
    pub verses: Vec<Verse>,
}

/// Missing and `null` fields both decode to the zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// `null` elements inside `verses` become empty verses.
fn verses_or_empty<'de, D>(deserializer: D) -> Result<Vec<Verse>, D::Error>
where
    D: Deserializer<'de>,
{
    let verses = Option::<Vec<Option<Verse>>>::deserialize(deserializer)?;
    Ok(verses
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Decode chapter bytes.
///
/// Permissive about absent fields, strict about syntax and value types.
/// A bare `null` document decodes to an empty chapter. Invalid UTF-8 is
/// replaced with U+FFFD and a repeated key keeps its last value.
pub fn decode(bytes: &[u8]) -> Result<Chapter, serde_json::Error> {
    let text = String::from_utf8_lossy(bytes);
    let value: serde_json::Value = serde_json::from_str(&text)?;
    Option::<Chapter>::deserialize(value).map(Option::unwrap_or_default)
}

/// Parse the leading integer of a directory name.
///
/// Accepts optional leading blanks (not newlines) and sign followed by at least
/// one digit; anything after the digits is ignored, so `"12abc"` yields 12.
pub fn parse_chapter_number(name: &str) -> Option<i64> {
    let trimmed = name.trim_start_matches(|c: char| c.is_whitespace() && c != '\n' && c != '\r');
    let sign_len = usize::from(matches!(trimmed.as_bytes().first(), Some(b'-' | b'+')));

    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }

    trimmed[..sign_len + digits_len].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_chapter() {
        let raw = br#"{"book":"genesis","chapter":1,"language":"eng","verses":[{"verse":1,"text":"In the beginning"}]}"#;
        let chapter = decode(raw).unwrap();
        assert_eq!(chapter.book, "genesis");
        assert_eq!(chapter.chapter, 1);
        assert_eq!(chapter.language, "eng");
        assert_eq!(
            chapter.verses,
            vec![Verse {
                verse: 1,
                text: "In the beginning".to_string()
            }]
        );
    }

    #[test]
    fn test_decode_missing_fields_default() {
        let chapter = decode(br#"{"book":"ruth"}"#).unwrap();
        assert_eq!(chapter.book, "ruth");
        assert_eq!(chapter.chapter, 0);
        assert!(chapter.language.is_empty());
        assert!(chapter.verses.is_empty());

        assert_eq!(decode(b"{}").unwrap(), Chapter::default());
        assert_eq!(decode(b"null").unwrap(), Chapter::default());
        assert_eq!(decode(br#"{"verses":null}"#).unwrap(), Chapter::default());
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let chapter = decode(br#"{"chapter":3,"translator":"someone"}"#).unwrap();
        assert_eq!(chapter.chapter, 3);
    }

    #[test]
    fn test_decode_repeated_key_keeps_last() {
        let chapter = decode(br#"{"book":"a","book":"b","chapter":1,"chapter":2}"#).unwrap();
        assert_eq!(chapter.book, "b");
        assert_eq!(chapter.chapter, 2);
    }

    #[test]
    fn test_decode_null_verse_elements() {
        let chapter = decode(br#"{"verses":[null,{"verse":1,"text":"x"}]}"#).unwrap();
        assert_eq!(
            chapter.verses,
            vec![
                Verse::default(),
                Verse {
                    verse: 1,
                    text: "x".to_string()
                }
            ]
        );
    }

    #[test]
    fn test_decode_replaces_invalid_utf8() {
        let mut raw = br#"{"book":"ruth","verses":[{"verse":1,"text":""#.to_vec();
        raw.extend_from_slice(&[0xFF, 0xFE]);
        raw.extend_from_slice(br#""}]}"#);
        let chapter = decode(&raw).unwrap();
        assert_eq!(chapter.book, "ruth");
        assert!(chapter.verses[0].text.chars().all(|c| c == '\u{FFFD}'));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode(b"").is_err());
        assert!(decode(b"{\"book\":").is_err());
        assert!(decode(b"[1,2,3]").is_err());
        assert!(decode(br#"{"chapter":"one"}"#).is_err());
        assert!(decode(br#"{"verses":"none"}"#).is_err());
    }

    #[test]
    fn test_parse_chapter_number() {
        assert_eq!(parse_chapter_number("1"), Some(1));
        assert_eq!(parse_chapter_number("150"), Some(150));
        assert_eq!(parse_chapter_number("12abc"), Some(12));
        assert_eq!(parse_chapter_number("  7"), Some(7));
        assert_eq!(parse_chapter_number("+4"), Some(4));
        assert_eq!(parse_chapter_number("-2"), Some(-2));
        assert_eq!(parse_chapter_number("foo"), None);
        assert_eq!(parse_chapter_number(""), None);
        assert_eq!(parse_chapter_number("-"), None);
        assert_eq!(parse_chapter_number("99999999999999999999"), None);
        assert_eq!(
            parse_chapter_number("-9223372036854775808"),
            Some(i64::MIN)
        );
        assert_eq!(parse_chapter_number("\t5"), Some(5));
        assert_eq!(parse_chapter_number("\n5"), None);
    }
}
