//! Type decoding: raw dialect type strings to normalized type descriptors.
//!
//! The decoder walks an ordered rule table and the first rule whose matcher
//! accepts the tokenized type wins; later rules are never consulted. Each
//! rule names the facets it extracts, so the result is always a typed
//! [`TypeDescriptor`] rather than a list of positional captures.
//!
//! ```
//! use schema_modeler::typemap::{decode, ColumnKind, Length};
//!
//! let desc = decode("decimal(10,2)");
//! assert_eq!(desc.kind, ColumnKind::Decimal);
//! assert_eq!(desc.precision, Some(Length::Number(10)));
//! assert_eq!(desc.scale, Some(Length::Number(2)));
//!
//! let desc = decode("LONGTEXT");
//! assert_eq!(desc.kind, ColumnKind::LongText);
//! assert_eq!(desc.length, Some(Length::Text("long".into())));
//! ```

mod kind;
mod rules;
mod tokens;

pub use kind::{ColumnKind, LanguageType};
pub use rules::{Facets, Matcher, TypeRule, MYSQL_RULES};
pub use tokens::{unquote, TypeTokens};

use serde::Serialize;
use tracing::warn;

/// Numeric facet of a type, or the raw text when it is not a number
/// (size tokens such as "long", or `max`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Length {
    Number(u32),
    Text(String),
}

impl Length {
    /// Parse a raw argument, keeping non-numeric tokens as text.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u32>() {
            Ok(n) => Length::Number(n),
            Err(_) => Length::Text(raw.trim().to_string()),
        }
    }
}

/// Decoded type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Normalized kind.
    pub kind: ColumnKind,

    /// Display width, string length, or size token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<Length>,

    /// Total digits of an exact numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<Length>,

    /// Fractional digits of an exact numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Length>,

    /// Fractional digits of an approximate numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<Length>,

    /// Literal values of an enum or set, in declaration order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_entries: Option<Vec<String>>,

    /// Only ever set to true; absent means signed or not applicable.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unsigned: bool,
}

impl TypeDescriptor {
    /// Descriptor with only a kind set.
    pub fn new(kind: ColumnKind) -> Self {
        Self {
            kind,
            length: None,
            precision: None,
            scale: None,
            decimals: None,
            enum_entries: None,
            unsigned: false,
        }
    }

    /// Descriptor used when no rule matches.
    pub fn fallback() -> Self {
        Self::new(ColumnKind::FALLBACK)
    }

    /// Language type hint for this kind.
    pub fn language_type(&self) -> LanguageType {
        self.kind.language_type()
    }

    /// ORM type hint for this kind.
    pub fn orm_type(&self) -> &'static str {
        self.kind.orm_type()
    }
}

/// Ordered, first-match-wins type rule table.
#[derive(Debug, Clone)]
pub struct TypeDecoder {
    rules: Vec<TypeRule>,
}

impl Default for TypeDecoder {
    /// Decoder over the MySQL-family rule table.
    fn default() -> Self {
        Self::new(MYSQL_RULES.to_vec())
    }
}

impl TypeDecoder {
    /// Create a decoder over a custom rule table, evaluated in order.
    pub fn new(rules: Vec<TypeRule>) -> Self {
        Self { rules }
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[TypeRule] {
        &self.rules
    }

    /// Decode a raw type string.
    ///
    /// Never fails: strings that no rule accepts decode to the fallback kind.
    pub fn decode(&self, raw: &str) -> TypeDescriptor {
        let Some(tokens) = TypeTokens::parse(raw) else {
            warn!("Malformed column type '{}', mapping to {}", raw, ColumnKind::FALLBACK);
            return TypeDescriptor::fallback();
        };

        match self.rules.iter().find(|rule| rule.matcher.matches(&tokens)) {
            Some(rule) => rule.extract(&tokens),
            None => {
                warn!("Unknown column type '{}', mapping to {}", raw, ColumnKind::FALLBACK);
                TypeDescriptor::fallback()
            }
        }
    }
}

/// Decode with the default rule table.
pub fn decode(raw: &str) -> TypeDescriptor {
    TypeDecoder::default().decode(raw)
}
