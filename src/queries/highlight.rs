use std::fmt::Write;

use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use tracing::debug;
use tree_sitter::{Query, QueryCursor, StreamingIterator, Tree};

use super::HIGHLIGHTS_QUERY;

/// Highlight names, as they appear in `queries/highlights.scm`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capture {
    Comment,
    KeywordConditional,
    KeywordRepeat,
    KeywordImport,
    Boolean,
    Number,
    String,
    StringEscape,
    PunctuationSpecial,
    Operator,
    PunctuationBracket,
    PunctuationDelimiter,
    FunctionBuiltin,
    FunctionCall,
    VariableBuiltin,
    Property,
    Variable,
}

impl Capture {
    pub const ALL: [Self; 17] = [
        Self::Comment,
        Self::KeywordConditional,
        Self::KeywordRepeat,
        Self::KeywordImport,
        Self::Boolean,
        Self::Number,
        Self::String,
        Self::StringEscape,
        Self::PunctuationSpecial,
        Self::Operator,
        Self::PunctuationBracket,
        Self::PunctuationDelimiter,
        Self::FunctionBuiltin,
        Self::FunctionCall,
        Self::VariableBuiltin,
        Self::Property,
        Self::Variable,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::KeywordConditional => "keyword.conditional",
            Self::KeywordRepeat => "keyword.repeat",
            Self::KeywordImport => "keyword.import",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::StringEscape => "string.escape",
            Self::PunctuationSpecial => "punctuation.special",
            Self::Operator => "operator",
            Self::PunctuationBracket => "punctuation.bracket",
            Self::PunctuationDelimiter => "punctuation.delimiter",
            Self::FunctionBuiltin => "function.builtin",
            Self::FunctionCall => "function.call",
            Self::VariableBuiltin => "variable.builtin",
            Self::Property => "property",
            Self::Variable => "variable",
        }
    }

    /// The capture called `name` in the highlight query.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub capture: Capture,
}

/// Highlighted byte spans of `src`, in order and non-overlapping.
///
/// Captures are painted outermost first, so a nested node splits the span of
/// the node containing it. For one node, the last matching pattern in
/// `highlights.scm` wins.
pub fn highlight(tree: &Tree, src: &[u8]) -> Result<Vec<HighlightSpan>> {
    let query = Query::new(&tree.language(), HIGHLIGHTS_QUERY)?;
    let by_index: Vec<Option<Capture>> = query
        .capture_names()
        .iter()
        .map(|name| Capture::from_name(name))
        .collect();

    // (start, end, pattern, capture, node id)
    let mut hits = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), src);
    while let Some(m) = matches.next() {
        for cap in m.captures {
            let Some(capture) = by_index.get(cap.index as usize).copied().flatten() else {
                continue;
            };
            let node = cap.node;
            hits.push((
                node.start_byte(),
                node.end_byte(),
                m.pattern_index,
                capture,
                node.id(),
            ));
        }
    }
    hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)));

    // (capture, node id) per byte; the id keeps adjacent tokens apart
    let mut paint: Vec<Option<(Capture, usize)>> = vec![None; src.len()];
    for (start, end, _, capture, id) in hits {
        let end = end.min(src.len());
        let start = start.min(end);
        paint[start..end].fill(Some((capture, id)));
    }

    let mut spans: Vec<HighlightSpan> = Vec::new();
    let mut prev = None;
    for (i, cell) in paint.into_iter().enumerate() {
        match cell {
            Some(cell) if prev == Some(cell) => {
                if let Some(last) = spans.last_mut() {
                    last.end = i + 1;
                }
            }
            Some((capture, _)) => spans.push(HighlightSpan {
                start: i,
                end: i + 1,
                capture,
            }),
            None => {}
        }
        prev = cell;
    }
    debug!(spans = spans.len(), "highlighted");
    Ok(spans)
}

/// Terminal styles per capture. Captures without a style are printed plain.
#[derive(Clone)]
pub struct Theme {
    styles: [Option<Style>; Capture::ALL.len()],
}

impl Theme {
    /// A theme that styles nothing.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            styles: [None; Capture::ALL.len()],
        }
    }

    #[must_use]
    pub fn with(mut self, capture: Capture, style: Style) -> Self {
        self.styles[capture as usize] = Some(style);
        self
    }

    #[must_use]
    pub const fn style(&self, capture: Capture) -> Option<Style> {
        self.styles[capture as usize]
    }
}

impl Default for Theme {
    fn default() -> Self {
        let keyword = Style::new().magenta().bold();
        Self::plain()
            .with(Capture::Comment, Style::new().bright_black().italic())
            .with(Capture::KeywordConditional, keyword)
            .with(Capture::KeywordRepeat, keyword)
            .with(Capture::KeywordImport, keyword)
            .with(Capture::Boolean, Style::new().yellow())
            .with(Capture::Number, Style::new().yellow())
            .with(Capture::String, Style::new().green())
            .with(Capture::StringEscape, Style::new().cyan())
            .with(Capture::PunctuationSpecial, Style::new().cyan())
            .with(Capture::Operator, Style::new().bright_white())
            .with(Capture::FunctionBuiltin, Style::new().blue().bold())
            .with(Capture::FunctionCall, Style::new().blue())
            .with(Capture::VariableBuiltin, Style::new().red())
            .with(Capture::Property, Style::new().bright_cyan())
    }
}

/// `src` with every span wrapped in its theme style.
#[must_use]
pub fn render_ansi(src: &str, spans: &[HighlightSpan], theme: &Theme) -> String {
    let mut out = String::with_capacity(src.len() * 2);
    let mut pos = 0;
    for span in spans {
        let (Some(gap), Some(text)) = (src.get(pos..span.start), src.get(span.start..span.end))
        else {
            continue;
        };
        out.push_str(gap);
        match theme.style(span.capture) {
            Some(style) => {
                let _ = write!(out, "{}", text.style(style));
            }
            None => out.push_str(text),
        }
        pos = span.end;
    }
    out.push_str(src.get(pos..).unwrap_or_default());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn describe(src: &str) -> String {
        let tree = parse(src).unwrap();
        highlight(&tree, src.as_bytes())
            .unwrap()
            .iter()
            .map(|s| format!("{} {:?}", s.capture.name(), &src[s.start..s.end]))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn expansion_splits_string() {
        insta::assert_snapshot!(describe("if (x) {\n  y = \"a$b\"\n}"), @r#"
        keyword.conditional "if"
        punctuation.bracket "("
        variable "x"
        punctuation.bracket ")"
        punctuation.bracket "{"
        variable "y"
        operator "="
        string "\"a"
        punctuation.special "$"
        variable "b"
        string "\""
        punctuation.bracket "}"
        "#);
    }

    #[test]
    fn builtins_and_properties() {
        let out = describe("print(target_name, invoker.sources) # done");
        assert!(out.contains("function.builtin \"print\""));
        assert!(out.contains("variable.builtin \"target_name\""));
        assert!(out.contains("variable.builtin \"invoker\""));
        assert!(out.contains("property \"sources\""));
        assert!(out.contains("comment \"# done\""));
    }

    #[test]
    fn user_calls_and_literals() {
        let out = describe("my_template(\"x\") {\n  n = -1\n  b = true\n}");
        assert!(out.contains("function.call \"my_template\""));
        assert!(out.contains("number \"-1\""));
        assert!(out.contains("boolean \"true\""));
    }

    #[test]
    fn adjacent_tokens_stay_separate() {
        let out = describe("a = [[]]");
        assert_eq!(out.matches("punctuation.bracket").count(), 4);
    }

    #[test]
    fn plain_theme_renders_source_unchanged() {
        let src = "if (a) { b = \"c\" }\n";
        let tree = parse(src).unwrap();
        let spans = highlight(&tree, src.as_bytes()).unwrap();
        assert_eq!(render_ansi(src, &spans, &Theme::plain()), src);
        let colored = render_ansi(src, &spans, &Theme::default());
        assert!(colored.contains("\u{1b}["));
        assert_ne!(colored, src);
    }
}
