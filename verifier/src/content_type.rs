use encoding_rs::{Encoding, UTF_8};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Display;

lazy_static! {
    static ref MEDIA_TYPE_REGEX: Regex = Regex::new(
        r"^\s*(?P<type>[A-Za-z0-9!#$&^_.+\-]+)/(?P<subtype>[A-Za-z0-9!#$&^_.+\-]+)\s*(?:;(?P<parameters>.*))?$"
    )
    .unwrap();
    static ref CHARSET_REGEX: Regex =
        Regex::new(r#"(?i)(?:^|;)\s*charset\s*=\s*"?(?P<charset>[^";\s]+)"?"#).unwrap();
}

/// A parsed media type with the parts the comparison cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    base_type: String,
    charset: Option<String>,
}

impl ContentType {
    pub fn parse<S: AsRef<str>>(value: S) -> Option<Self> {
        let captures = MEDIA_TYPE_REGEX.captures(value.as_ref())?;
        let base_type = format!(
            "{}/{}",
            captures["type"].to_lowercase(),
            captures["subtype"].to_lowercase()
        );
        let charset = captures
            .name("parameters")
            .and_then(|parameters| CHARSET_REGEX.captures(parameters.as_str()))
            .map(|c| c["charset"].to_lowercase());

        Some(Self { base_type, charset })
    }

    pub fn text_plain() -> Self {
        Self {
            base_type: "text/plain".into(),
            charset: None,
        }
    }

    pub fn json() -> Self {
        Self {
            base_type: "application/json".into(),
            charset: None,
        }
    }

    /// The media type without parameters, lower-cased. Registry lookups use this.
    pub fn base_type(&self) -> &str {
        &self.base_type
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn is_json(&self) -> bool {
        let subtype = self.base_type.split('/').nth(1).unwrap_or("");

        subtype == "json"
            || subtype.ends_with("+json")
            || (self.base_type.starts_with("application/") && subtype.ends_with("json"))
    }

    /// Decodes body bytes with the declared charset. Unknown or missing
    /// charsets are read as UTF-8.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let encoding = self
            .charset
            .as_deref()
            .and_then(|charset| Encoding::for_label(charset.as_bytes()))
            .unwrap_or(UTF_8);

        encoding.decode_without_bom_handling(bytes).0.into_owned()
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.charset {
            Some(charset) => write!(f, "{}; charset={}", self.base_type, charset),
            None => write!(f, "{}", self.base_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base_type_and_charset() {
        let content_type = ContentType::parse("Application/JSON; charset=UTF-8").unwrap();

        assert_eq!(content_type.base_type(), "application/json");
        assert_eq!(content_type.charset(), Some("utf-8"));
        assert_eq!(content_type.to_string(), "application/json; charset=utf-8");
    }

    #[test]
    fn rejects_values_without_subtype() {
        assert!(ContentType::parse("json").is_none());
        assert!(ContentType::parse("").is_none());
    }

    #[test]
    fn recognises_json_variants() {
        for value in &[
            "application/json",
            "application/hal+json",
            "application/vnd.api+json; charset=utf-8",
            "text/json",
            "application/x-ndjson",
        ] {
            assert!(ContentType::parse(value).unwrap().is_json(), "{}", value);
        }

        for value in &["text/plain", "application/xml", "application/octet-stream"] {
            assert!(!ContentType::parse(value).unwrap().is_json(), "{}", value);
        }
    }

    #[test]
    fn decodes_with_the_declared_charset() {
        let latin1 = ContentType::parse("text/plain; charset=iso-8859-1").unwrap();
        assert_eq!(latin1.decode(b"caf\xe9"), "caf\u{e9}");

        let unknown = ContentType::parse("text/plain; charset=x-made-up").unwrap();
        assert_eq!(unknown.decode("caf\u{e9}".as_bytes()), "caf\u{e9}");
        assert_eq!(ContentType::text_plain().decode(b"caf\xe9"), "caf\u{fffd}");
    }
}
