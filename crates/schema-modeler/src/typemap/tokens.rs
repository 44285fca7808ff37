//! Tokenizer for raw column type strings.
//!
//! `"DECIMAL(10, 2) UNSIGNED"` becomes base `decimal`, args `["10", "2"]`,
//! modifiers `["unsigned"]`. Argument splitting honours single and double
//! quotes, including SQL-style doubled quotes inside a literal.

/// A lower-cased raw type split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTokens {
    /// Leading type word, e.g. "varchar" or "longtext".
    pub base: String,

    /// Raw parenthesised arguments, trimmed, quotes preserved.
    pub args: Vec<String>,

    /// Whitespace-separated words after the base and arguments.
    pub modifiers: Vec<String>,
}

impl TypeTokens {
    /// Tokenize a raw type string.
    ///
    /// Returns `None` for strings without a leading type word or with an
    /// unterminated argument list.
    pub fn parse(raw: &str) -> Option<Self> {
        let input = raw.trim().to_lowercase();

        let base_len = input
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(input.len());
        if base_len == 0 {
            return None;
        }
        let mut base = input[..base_len].to_string();
        let mut rest = input[base_len..].trim_start();

        // SQL-standard two-word spelling of varchar.
        if base == "character" {
            if let Some(after) = rest.strip_prefix("varying") {
                if !after.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
                    base.push_str(" varying");
                    rest = after.trim_start();
                }
            }
        }

        let mut args = Vec::new();
        if let Some(inner) = rest.strip_prefix('(') {
            let (parsed, remainder) = split_args(inner)?;
            args = parsed;
            rest = remainder;
        }

        let modifiers = rest.split_whitespace().map(str::to_string).collect();

        Some(Self {
            base,
            args,
            modifiers,
        })
    }

    /// Raw argument at `idx`.
    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.args.get(idx).map(String::as_str)
    }

    /// Check for a trailing modifier word such as "unsigned".
    pub fn has_modifier(&self, word: &str) -> bool {
        self.modifiers.iter().any(|m| m == word)
    }
}

/// Split the body of an argument list (after the opening paren).
///
/// Returns the arguments and whatever follows the closing paren.
fn split_args(input: &str) -> Option<(Vec<String>, &str)> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 1usize;
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match quote {
            Some(q) if c == q => {
                current.push(c);
                // A doubled quote is an escaped quote inside the literal.
                if matches!(chars.peek(), Some((_, next)) if *next == q) {
                    chars.next();
                    current.push(q);
                } else {
                    quote = None;
                }
            }
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    current.push(c);
                }
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        let trimmed = current.trim();
                        if !trimmed.is_empty() || !args.is_empty() {
                            args.push(trimmed.to_string());
                        }
                        return Some((args, &input[idx + 1..]));
                    }
                    current.push(c);
                }
                ',' if depth == 1 => {
                    args.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }

    None
}

/// Strip one layer of matching quotes and collapse doubled quotes inside.
pub fn unquote(token: &str) -> String {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == last && (first == b'\'' || first == b'"') {
            let q = first as char;
            let inner = &token[1..token.len() - 1];
            let doubled: String = [q, q].iter().collect();
            return inner.replace(&doubled, &q.to_string());
        }
    }
    token.to_string()
}
