//! RPL_ISUPPORT token rendering.

/// Conventional upper bound on tokens per 005 line.
pub const MAX_TOKENS_PER_LINE: usize = 13;

/// Collects `KEY` / `KEY=value` tokens and splits them into 005 lines.
#[derive(Debug, Clone, Default)]
pub struct IsupportBuilder {
    tokens: Vec<String>,
}

impl IsupportBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token; `None` renders a bare key.
    pub fn token(mut self, key: &str, value: Option<&str>) -> Self {
        self.tokens.push(match value {
            Some(v) => format!("{}={}", key, v),
            None => key.to_string(),
        });
        self
    }

    /// Number of tokens collected so far.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when no token has been added.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All tokens on one space-separated line.
    pub fn build(self) -> String {
        self.tokens.join(" ")
    }

    /// Tokens grouped into lines of at most `max_per_line` (minimum 1).
    pub fn build_lines(self, max_per_line: usize) -> Vec<String> {
        self.tokens
            .chunks(max_per_line.max(1))
            .map(|chunk| chunk.join(" "))
            .collect()
    }
}
