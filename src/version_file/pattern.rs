//! Positional version patterns and the tokens they produce.
//!
//! Every pattern is written with nine named groups, in order:
//! `prefix`, `major`, `d1`, `minor`, `d2`, `patch`, `qualifier`, `fourth`,
//! `suffix`. A pattern covers a whole line so that dependency versions on
//! other lines are never touched.

use std::ops::Range;

use regex::{Captures, Regex};

/// A named, line-anchored version expression.
#[derive(Debug)]
pub struct VersionPattern {
    name: &'static str,
    regex: Regex,
}

impl VersionPattern {
    /// Compiles a pattern; `expression` must define the nine zone groups.
    pub fn new(name: &'static str, expression: &str) -> Result<Self, regex::Error> {
        Ok(VersionPattern {
            name,
            regex: Regex::new(expression)?,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The first token in `text`, if any.
    pub fn find<'t>(&self, text: &'t str) -> Option<VersionToken<'t>> {
        self.regex
            .captures(text)
            .and_then(|caps| VersionToken::from_captures(&caps))
    }

    /// All tokens in `text`, in order of appearance.
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<VersionToken<'t>> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| VersionToken::from_captures(&caps))
            .collect()
    }
}

/// A version token split into its nine zones.
///
/// `fourth` is `None` when the version has three numeric segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken<'t> {
    pub prefix: &'t str,
    pub major: &'t str,
    pub d1: &'t str,
    pub minor: &'t str,
    pub d2: &'t str,
    pub patch: &'t str,
    pub qualifier: &'t str,
    pub fourth: Option<&'t str>,
    pub suffix: &'t str,
    /// Byte range of the whole match in the searched text
    pub span: Range<usize>,
    /// Byte offset of `major` in the searched text
    pub version_start: usize,
}

impl<'t> VersionToken<'t> {
    fn from_captures(caps: &Captures<'t>) -> Option<Self> {
        let whole = caps.get(0)?;
        let zone = |name: &str| caps.name(name).map(|m| m.as_str());
        let major = caps.name("major")?;

        Some(VersionToken {
            prefix: zone("prefix")?,
            major: major.as_str(),
            d1: zone("d1")?,
            minor: zone("minor")?,
            d2: zone("d2")?,
            patch: zone("patch")?,
            qualifier: zone("qualifier")?,
            fourth: zone("fourth").filter(|digits| !digits.is_empty()),
            suffix: zone("suffix")?,
            span: whole.range(),
            version_start: major.start(),
        })
    }

    pub fn has_fourth(&self) -> bool {
        self.fourth.is_some()
    }

    /// Digits of the segment that holds the revision.
    pub fn revision_digits(&self) -> &'t str {
        self.fourth.unwrap_or(self.patch)
    }

    /// The matched line, unchanged.
    pub fn original(&self) -> String {
        self.render(self.patch, self.fourth.unwrap_or(""))
    }

    /// The matched line with `revision` in the fourth segment, or in the
    /// patch segment when there is no fourth.
    pub fn with_revision(&self, revision: i64) -> String {
        let revision = revision.to_string();
        match self.fourth {
            Some(_) => self.render(self.patch, &revision),
            None => self.render(&revision, ""),
        }
    }

    fn render(&self, patch: &str, fourth: &str) -> String {
        [
            self.prefix,
            self.major,
            self.d1,
            self.minor,
            self.d2,
            patch,
            self.qualifier,
            fourth,
            self.suffix,
        ]
        .concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_pattern() -> VersionPattern {
        VersionPattern::new(
            "test",
            r#"(?m)^(?P<prefix>[ \t]*"version":[ \t]*")(?P<major>[0-9]+)(?P<d1>\.)(?P<minor>[0-9]+)(?P<d2>\.)(?P<patch>[0-9]+)(?P<qualifier>[0-9A-Za-z_-]*\.?)(?P<fourth>[0-9]*)(?P<suffix>[0-9A-Za-z_-]*".*)$"#,
        )
        .unwrap()
    }

    #[test]
    fn test_three_segment_token() {
        let text = "{\n  \"version\": \"5.2.0\",\n}";
        let token = json_pattern().find(text).unwrap();
        assert_eq!(token.prefix, "  \"version\": \"");
        assert_eq!((token.major, token.minor, token.patch), ("5", "2", "0"));
        assert_eq!(token.qualifier, "");
        assert_eq!(token.fourth, None);
        assert_eq!(token.suffix, "\",");
        assert_eq!(token.revision_digits(), "0");
        assert_eq!(&text[token.span.clone()], token.original());
        assert_eq!(&text[token.version_start..token.version_start + 1], "5");
    }

    #[test]
    fn test_four_segment_token_with_qualifier() {
        let token = json_pattern()
            .find("\"version\": \"7.1.738-alpha.0\"")
            .unwrap();
        assert_eq!(token.patch, "738");
        assert_eq!(token.qualifier, "-alpha.");
        assert_eq!(token.fourth, Some("0"));
        assert_eq!(token.with_revision(2458), "\"version\": \"7.1.738-alpha.2458\"");
    }

    #[test]
    fn test_revision_goes_to_patch_without_fourth() {
        let token = json_pattern().find("\"version\": \"5.8.0-alpha\"").unwrap();
        assert_eq!(token.qualifier, "-alpha");
        assert_eq!(token.with_revision(1147), "\"version\": \"5.8.1147-alpha\"");
    }

    #[test]
    fn test_crlf_stays_in_suffix() {
        let text = "\"version\": \"1.2.3\",\r\n\"name\": \"x\"\r\n";
        let token = json_pattern().find(text).unwrap();
        assert_eq!(token.suffix, "\",\r");
        assert_eq!(token.with_revision(9), "\"version\": \"1.2.9\",\r");
    }

    #[test]
    fn test_find_all_in_order() {
        let text = "\"version\": \"1.0.0\"\n\"version\": \"2.0.0.4\"\n";
        let tokens = json_pattern().find_all(text);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].major, "1");
        assert_eq!(tokens[1].revision_digits(), "4");
    }
}
