//! M3U8 line tokenizer
//!
//! Splits a playlist into classified lines and parses tag attribute lists.
//! The raw line text is kept next to its classification so that rewriters
//! can copy untouched lines byte for byte.

/// Classification of one playlist line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only line.
    Blank,
    /// `#EXT...` tag, `name` without the leading `#`.
    Tag {
        name: &'a str,
        value: Option<&'a str>,
    },
    /// Any other line starting with `#`.
    Comment(&'a str),
    /// A URI line.
    Uri(&'a str),
}

/// A playlist line with its raw text (line terminator excluded, a trailing
/// `\r` included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub raw: &'a str,
    pub kind: LineKind<'a>,
}

impl<'a> Line<'a> {
    /// Whether this is the tag `name`.
    pub fn is_tag(&self, tag: &str) -> bool {
        matches!(self.kind, LineKind::Tag { name, .. } if name == tag)
    }

    /// Value of this line if it is the tag `name`.
    pub fn tag_value(&self, tag: &str) -> Option<&'a str> {
        match self.kind {
            LineKind::Tag { name, value } if name == tag => Some(value.unwrap_or("")),
            _ => None,
        }
    }

    pub fn uri(&self) -> Option<&'a str> {
        match self.kind {
            LineKind::Uri(uri) => Some(uri),
            _ => None,
        }
    }
}

/// Tokenize playlist text into lines.
pub fn tokenize(text: &str) -> Vec<Line<'_>> {
    text.split('\n').map(classify).collect()
}

fn classify(raw: &str) -> Line<'_> {
    let trimmed = raw.trim();
    let kind = if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with("#EXT") {
        let tag = &trimmed[1..];
        match tag.split_once(':') {
            Some((name, value)) => LineKind::Tag {
                name,
                value: Some(value),
            },
            None => LineKind::Tag {
                name: tag,
                value: None,
            },
        }
    } else if let Some(comment) = trimmed.strip_prefix('#') {
        LineKind::Comment(comment)
    } else {
        LineKind::Uri(trimmed)
    };
    Line { raw, kind }
}

/// Parsed `NAME=value,NAME="quoted, value"` attribute list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    attributes: Vec<(String, String)>,
}

impl AttributeList {
    /// Parse an attribute list. Quoted values may contain commas; the quotes
    /// are removed from the stored value.
    pub fn parse(input: &str) -> Self {
        let mut attributes = Vec::new();
        let mut name = String::new();
        let mut value = String::new();
        let mut in_value = false;
        let mut in_quotes = false;

        for ch in input.chars() {
            match ch {
                '"' if in_value => in_quotes = !in_quotes,
                ',' if !in_quotes => {
                    push_attribute(&mut attributes, &mut name, &mut value);
                    in_value = false;
                }
                '=' if !in_value => in_value = true,
                _ if in_value => value.push(ch),
                _ => name.push(ch),
            }
        }
        push_attribute(&mut attributes, &mut name, &mut value);

        Self { attributes }
    }

    /// Look up an attribute by (case-sensitive) name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

fn push_attribute(attributes: &mut Vec<(String, String)>, name: &mut String, value: &mut String) {
    let n = name.trim();
    if !n.is_empty() {
        attributes.push((n.to_string(), value.trim().to_string()));
    }
    name.clear();
    value.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_kinds() {
        let text = "#EXTM3U\n#EXT-X-VERSION:3\n\n# comment\nvideo/index.m3u8\r\n";
        let lines = tokenize(text);
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0].kind,
            LineKind::Tag {
                name: "EXTM3U",
                value: None
            }
        );
        assert_eq!(lines[1].tag_value("EXT-X-VERSION"), Some("3"));
        assert_eq!(lines[2].kind, LineKind::Blank);
        assert_eq!(lines[3].kind, LineKind::Comment(" comment"));
        assert_eq!(lines[4].uri(), Some("video/index.m3u8"));
        assert_eq!(lines[4].raw, "video/index.m3u8\r");
        assert_eq!(lines[5].kind, LineKind::Blank);
    }

    #[test]
    fn test_extinf_value_keeps_title() {
        let lines = tokenize("#EXTINF:10.010,Intro");
        assert!(lines[0].is_tag("EXTINF"));
        assert_eq!(lines[0].tag_value("EXTINF"), Some("10.010,Intro"));
    }

    #[test]
    fn test_attribute_list_quoted_commas() {
        let attrs = AttributeList::parse(
            r#"BANDWIDTH=5500000,RESOLUTION=1920x1080,CODECS="avc1.640028,mp4a.40.2",SUBTITLES="subs""#,
        );
        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs.get("BANDWIDTH"), Some("5500000"));
        assert_eq!(attrs.get("CODECS"), Some("avc1.640028,mp4a.40.2"));
        assert_eq!(attrs.get("SUBTITLES"), Some("subs"));
        assert_eq!(attrs.get("AUDIO"), None);
    }

    #[test]
    fn test_attribute_list_uri_position_independent() {
        let attrs = AttributeList::parse(
            r#"URI="../subs/index.m3u8",TYPE=SUBTITLES,GROUP-ID="subs",NAME="English, CC""#,
        );
        assert_eq!(attrs.get("TYPE"), Some("SUBTITLES"));
        assert_eq!(attrs.get("URI"), Some("../subs/index.m3u8"));
        assert_eq!(attrs.get("NAME"), Some("English, CC"));
    }

    #[test]
    fn test_attribute_list_empty() {
        assert!(AttributeList::parse("").is_empty());
    }
}
