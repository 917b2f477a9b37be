//! Just enough markdown for AI responses in a terminal: `#` headings and
//! `**bold**` spans. Everything else is printed as-is.

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Heading { level: u8, text: String },
    Paragraph(Vec<Span>),
}

pub struct MarkdownLines {
    bold: Option<Regex>,
}

impl MarkdownLines {
    pub fn new() -> Self {
        Self {
            bold: Regex::new(r"\*\*.*?\*\*").ok(),
        }
    }

    pub fn parse(&self, content: &str) -> Vec<Line> {
        content.split('\n').map(|line| self.parse_line(line)).collect()
    }

    fn parse_line(&self, line: &str) -> Line {
        for (prefix, level) in [("###", 3), ("##", 2), ("#", 1)] {
            if let Some(rest) = line.strip_prefix(prefix) {
                return Line::Heading {
                    level,
                    text: rest.trim().to_string(),
                };
            }
        }
        Line::Paragraph(self.spans(line))
    }

    fn spans(&self, line: &str) -> Vec<Span> {
        let Some(bold) = &self.bold else {
            return vec![Span::Text(line.to_string())];
        };

        let mut spans = Vec::new();
        let mut last = 0;
        for m in bold.find_iter(line) {
            if m.start() > last {
                spans.push(Span::Text(line[last..m.start()].to_string()));
            }
            let inner = &m.as_str()[2..m.as_str().len() - 2];
            spans.push(Span::Bold(inner.to_string()));
            last = m.end();
        }
        if last < line.len() || spans.is_empty() {
            spans.push(Span::Text(line[last..].to_string()));
        }
        spans
    }

    /// ANSI-styled text for a terminal.
    pub fn to_terminal(&self, content: &str) -> String {
        self.parse(content)
            .into_iter()
            .map(|line| match line {
                Line::Heading { level: 1, text } => format!("\x1b[1;4m{}\x1b[0m", text.to_uppercase()),
                Line::Heading { level: 2, text } => format!("\x1b[7m {} \x1b[0m", text),
                Line::Heading { text, .. } => format!("\x1b[1m{}\x1b[0m", text),
                Line::Paragraph(spans) => spans
                    .into_iter()
                    .map(|span| match span {
                        Span::Text(t) => t,
                        Span::Bold(b) => format!("\x1b[1m{}\x1b[0m", b),
                    })
                    .collect(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for MarkdownLines {
    fn default() -> Self {
        Self::new()
    }
}
