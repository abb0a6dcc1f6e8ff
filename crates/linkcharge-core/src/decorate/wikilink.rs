//! Token source for plain markdown text.

use super::{SyntaxToken, TokenRoles, TokenSource};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static WIKILINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\]\n]+)\]\]").expect("wikilink regex"));

static CODE_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^```[\s\S]*?^```|`[^`\n]+`").expect("code block regex"));

/// Wikilink tokens of a markdown document.
///
/// `[[target#heading|alias]]` yields a link token over `target#heading`, a
/// pipe token and an alias token. Embeds (`![[...]]`) are tokenized the same
/// way. Links inside fenced blocks or inline code are skipped.
#[derive(Debug, Clone, Default)]
pub struct WikilinkTokens {
    tokens: Vec<SyntaxToken>,
}

impl WikilinkTokens {
    /// Tokenize `text`.
    pub fn new(text: &str) -> Self {
        let code: Vec<Range<usize>> = CODE_BLOCK_REGEX.find_iter(text).map(|m| m.range()).collect();
        let in_code = |offset: usize| code.iter().any(|r| r.contains(&offset));

        let mut tokens = Vec::new();
        for cap in WIKILINK_REGEX.captures_iter(text) {
            let (Some(whole), Some(inner)) = (cap.get(0), cap.get(2)) else {
                continue;
            };
            if in_code(whole.start()) {
                continue;
            }

            let start = inner.start();
            let (target_len, alias) = match inner.as_str().find('|') {
                Some(pipe) => (pipe, Some(pipe)),
                None => (inner.len(), None),
            };
            if target_len > 0 {
                tokens.push(SyntaxToken::new(TokenRoles::INTERNAL_LINK, start..start + target_len));
            }
            if let Some(pipe) = alias {
                let pipe_at = start + pipe;
                tokens.push(SyntaxToken::new(
                    TokenRoles::INTERNAL_LINK | TokenRoles::ALIAS_PIPE,
                    pipe_at..pipe_at + 1,
                ));
                if pipe_at + 1 < inner.end() {
                    tokens.push(SyntaxToken::new(
                        TokenRoles::INTERNAL_LINK | TokenRoles::ALIAS,
                        pipe_at + 1..inner.end(),
                    ));
                }
            }
        }
        Self { tokens }
    }

    /// Every token in document order.
    pub fn tokens(&self) -> &[SyntaxToken] {
        &self.tokens
    }
}

impl TokenSource for WikilinkTokens {
    fn tokens_in(&self, range: Range<usize>) -> Vec<SyntaxToken> {
        self.tokens
            .iter()
            .filter(|t| t.range.start < range.end && t.range.end > range.start)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slices<'a>(text: &'a str, tokens: &WikilinkTokens) -> Vec<(&'a str, TokenRoles)> {
        tokens
            .tokens()
            .iter()
            .map(|t| (&text[t.range.clone()], t.roles))
            .collect()
    }

    #[test]
    fn test_aliased_link_with_fragment() {
        let text = "go to [[B#section|Alias]].";
        let tokens = WikilinkTokens::new(text);
        assert_eq!(
            slices(text, &tokens),
            vec![
                ("B#section", TokenRoles::INTERNAL_LINK),
                ("|", TokenRoles::INTERNAL_LINK | TokenRoles::ALIAS_PIPE),
                ("Alias", TokenRoles::INTERNAL_LINK | TokenRoles::ALIAS),
            ]
        );
    }

    #[test]
    fn test_embed_is_tokenized() {
        let text = "![[diagram.png]]";
        let tokens = WikilinkTokens::new(text);
        assert_eq!(slices(text, &tokens), vec![("diagram.png", TokenRoles::INTERNAL_LINK)]);
    }

    #[test]
    fn test_code_is_skipped() {
        let text = "`[[Inline]]`\n```\n[[Fenced]]\n```\n[[Real]]";
        let tokens = WikilinkTokens::new(text);
        assert_eq!(slices(text, &tokens), vec![("Real", TokenRoles::INTERNAL_LINK)]);
    }

    #[test]
    fn test_tokens_in_filters_by_overlap() {
        let text = "[[A]] [[B]]";
        let tokens = WikilinkTokens::new(text);
        let found = tokens.tokens_in(6..11);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].range.clone()], "B");
    }
}
