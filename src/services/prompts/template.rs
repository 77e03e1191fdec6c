//! Template Parsing
//!
//! Templates use `{name}` placeholders; `{{` and `}}` stand for literal
//! braces. Bodies are parsed once when the store loads so that rendering
//! never meets a malformed template.

use quickprompt_core::{CoreError, CoreResult};
use regex::Regex;

use crate::models::prompt::PlaceholderContext;

/// Escaped braces, a `{placeholder}`, or a stray brace
const TOKEN_PATTERN: &str = r"\{\{|\}\}|\{([^{}]*)\}|[{}]";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A template body split into literal text and placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    name: String,
    segments: Vec<Segment>,
}

impl ParsedTemplate {
    /// Parse `body`, reporting brace errors against the template `name`
    pub fn parse(name: &str, body: &str) -> CoreResult<Self> {
        let tokens = Regex::new(TOKEN_PATTERN).map_err(|e| CoreError::parse(e.to_string()))?;
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in tokens.captures_iter(body) {
            let Some(token) = caps.get(0) else {
                continue;
            };
            literal.push_str(&body[last..token.start()]);
            last = token.end();

            match (token.as_str(), caps.get(1)) {
                ("{{", _) => literal.push('{'),
                ("}}", _) => literal.push('}'),
                (_, Some(placeholder)) => {
                    if placeholder.as_str().trim().is_empty() {
                        return Err(CoreError::parse(format!(
                            "template '{}': empty placeholder at offset {}",
                            name,
                            token.start()
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(placeholder.as_str().to_string()));
                }
                ("{", None) => {
                    return Err(CoreError::parse(format!(
                        "template '{}': unmatched '{{' at offset {}",
                        name,
                        token.start()
                    )));
                }
                _ => {
                    return Err(CoreError::parse(format!(
                        "template '{}': single '}}' at offset {}",
                        name,
                        token.start()
                    )));
                }
            }
        }
        literal.push_str(&body[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            name: name.to_string(),
            segments,
        })
    }

    /// Placeholder names in order of first use
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder. Fails on the first one the context
    /// does not provide.
    pub fn render(&self, context: &PlaceholderContext) -> CoreResult<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = context
                        .get(name)
                        .ok_or_else(|| CoreError::missing_placeholder(&self.name, name))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PlaceholderContext {
        PlaceholderContext::new()
            .with("clipboard", "bonjour")
            .with("date", "October 19, 2026")
    }

    #[test]
    fn test_render_placeholders() {
        let t = ParsedTemplate::parse("define", "Explain: {clipboard}").unwrap();
        assert_eq!(t.render(&ctx()).unwrap(), "Explain: bonjour");

        let t = ParsedTemplate::parse("fun fact", "Today is {date}. {date}!").unwrap();
        assert_eq!(t.placeholders(), vec!["date"]);
        assert_eq!(
            t.render(&ctx()).unwrap(),
            "Today is October 19, 2026. October 19, 2026!"
        );
    }

    #[test]
    fn test_escaped_braces() {
        let t = ParsedTemplate::parse("json", "Reply as {{\"word\": \"{clipboard}\"}}").unwrap();
        assert_eq!(t.placeholders(), vec!["clipboard"]);
        assert_eq!(t.render(&ctx()).unwrap(), "Reply as {\"word\": \"bonjour\"}");
    }

    #[test]
    fn test_no_placeholders() {
        let t = ParsedTemplate::parse("plain", "Just text").unwrap();
        assert!(t.placeholders().is_empty());
        assert_eq!(t.render(&PlaceholderContext::new()).unwrap(), "Just text");
    }

    #[test]
    fn test_missing_placeholder() {
        let t = ParsedTemplate::parse("define", "Explain: {clipboard} in {language}").unwrap();
        match t.render(&ctx()) {
            Err(CoreError::MissingPlaceholder {
                template,
                placeholder,
            }) => {
                assert_eq!(template, "define");
                assert_eq!(placeholder, "language");
            }
            other => panic!("expected MissingPlaceholder, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_braces() {
        assert!(matches!(
            ParsedTemplate::parse("a", "Explain {clipboard"),
            Err(CoreError::Parse(_))
        ));
        assert!(matches!(
            ParsedTemplate::parse("b", "Explain clipboard}"),
            Err(CoreError::Parse(_))
        ));
        assert!(matches!(
            ParsedTemplate::parse("c", "Explain {}"),
            Err(CoreError::Parse(_))
        ));
        assert!(matches!(
            ParsedTemplate::parse("d", "Explain {a{b}"),
            Err(CoreError::Parse(_))
        ));
        assert!(matches!(
            ParsedTemplate::parse("e", "Explain { }"),
            Err(CoreError::Parse(_))
        ));
    }

    #[test]
    fn test_error_offsets() {
        let err = ParsedTemplate::parse("a", "ab {x} }").unwrap_err();
        assert_eq!(err.to_string(), "Parse error: template 'a': single '}' at offset 7");

        let err = ParsedTemplate::parse("b", "é {x").unwrap_err();
        assert_eq!(err.to_string(), "Parse error: template 'b': unmatched '{' at offset 3");
    }

    #[test]
    fn test_nested_escapes() {
        let t = ParsedTemplate::parse("wrap", "{{{clipboard}}} and {{clipboard}}").unwrap();
        assert_eq!(t.placeholders(), vec!["clipboard"]);
        assert_eq!(t.render(&ctx()).unwrap(), "{bonjour} and {clipboard}");
    }
}
