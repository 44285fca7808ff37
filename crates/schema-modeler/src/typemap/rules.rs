//! Type rules and the default MySQL-family rule table.

use super::kind::ColumnKind;
use super::tokens::{unquote, TypeTokens};
use super::{Length, TypeDescriptor};

/// Decides whether a rule applies to a tokenized type.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Base word equals one of the names.
    Base(&'static [&'static str]),

    /// Base word is a size prefix glued to a family name, e.g. "long" + "text".
    Sized {
        prefix: &'static str,
        suffix: &'static str,
    },

    /// Arbitrary predicate.
    Custom(fn(&TypeTokens) -> bool),
}

impl Matcher {
    pub fn matches(&self, tokens: &TypeTokens) -> bool {
        match self {
            Matcher::Base(names) => names.contains(&tokens.base.as_str()),
            Matcher::Sized { prefix, suffix } => {
                tokens.base.strip_prefix(*prefix) == Some(*suffix)
            }
            Matcher::Custom(pred) => pred(tokens),
        }
    }
}

/// Which facets a rule reads from the tokenized type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facets {
    /// Kind only.
    None,
    /// `(length)`.
    Length,
    /// `(length)` plus the `unsigned` modifier.
    Integer,
    /// `(precision, scale)`.
    PrecisionScale,
    /// `(length, decimals)`.
    LengthDecimals,
    /// Quoted literal list.
    Entries,
    /// Fixed textual size token taken from the type name.
    SizeToken(&'static str),
}

/// One entry of a decoder's rule table.
#[derive(Debug, Clone, Copy)]
pub struct TypeRule {
    pub kind: ColumnKind,
    pub matcher: Matcher,
    pub facets: Facets,
}

impl TypeRule {
    pub const fn new(kind: ColumnKind, matcher: Matcher, facets: Facets) -> Self {
        Self {
            kind,
            matcher,
            facets,
        }
    }

    /// Build the descriptor for tokens this rule matched.
    pub fn extract(&self, tokens: &TypeTokens) -> TypeDescriptor {
        let mut desc = TypeDescriptor::new(self.kind);

        match self.facets {
            Facets::None => {}
            Facets::Length => {
                desc.length = facet(tokens.arg(0));
            }
            Facets::Integer => {
                desc.length = facet(tokens.arg(0));
                desc.unsigned = tokens.has_modifier("unsigned");
            }
            Facets::PrecisionScale => {
                desc.precision = facet(tokens.arg(0));
                desc.scale = facet(tokens.arg(1));
            }
            Facets::LengthDecimals => {
                desc.length = facet(tokens.arg(0));
                desc.decimals = facet(tokens.arg(1));
            }
            Facets::Entries => {
                if !tokens.args.is_empty() {
                    desc.enum_entries = Some(tokens.args.iter().map(|a| unquote(a)).collect());
                }
            }
            Facets::SizeToken(token) => {
                desc.length = Some(Length::Text(token.to_string()));
            }
        }

        desc
    }
}

/// Numeric when possible, raw text otherwise; empty arguments stay unset.
fn facet(raw: Option<&str>) -> Option<Length> {
    raw.map(str::trim).filter(|r| !r.is_empty()).map(Length::parse)
}

const fn base(names: &'static [&'static str]) -> Matcher {
    Matcher::Base(names)
}

const fn sized(prefix: &'static str, suffix: &'static str) -> Matcher {
    Matcher::Sized { prefix, suffix }
}

/// MySQL/MariaDB rule table, in priority order.
pub static MYSQL_RULES: &[TypeRule] = &[
    TypeRule::new(ColumnKind::BigInt, base(&["bigint"]), Facets::Integer),
    TypeRule::new(ColumnKind::Binary, base(&["binary"]), Facets::Length),
    TypeRule::new(ColumnKind::Bit, base(&["bit"]), Facets::Length),
    TypeRule::new(ColumnKind::Blob, base(&["blob"]), Facets::None),
    TypeRule::new(ColumnKind::Bool, base(&["bool", "boolean"]), Facets::None),
    TypeRule::new(ColumnKind::Char, base(&["char", "character"]), Facets::Length),
    TypeRule::new(ColumnKind::Date, base(&["date"]), Facets::None),
    TypeRule::new(ColumnKind::DateTime, base(&["datetime"]), Facets::None),
    TypeRule::new(ColumnKind::Decimal, base(&["decimal", "dec", "fixed"]), Facets::PrecisionScale),
    TypeRule::new(ColumnKind::Double, base(&["double"]), Facets::LengthDecimals),
    TypeRule::new(ColumnKind::Enum, base(&["enum"]), Facets::Entries),
    TypeRule::new(ColumnKind::Float, base(&["float"]), Facets::LengthDecimals),
    TypeRule::new(ColumnKind::Geometry, base(&["geometry"]), Facets::None),
    TypeRule::new(ColumnKind::Int, base(&["int", "integer"]), Facets::Integer),
    TypeRule::new(ColumnKind::Json, base(&["json"]), Facets::None),
    TypeRule::new(ColumnKind::Jsonb, base(&["jsonb"]), Facets::None),
    TypeRule::new(ColumnKind::LongBlob, sized("long", "blob"), Facets::SizeToken("long")),
    TypeRule::new(ColumnKind::LongText, sized("long", "text"), Facets::SizeToken("long")),
    TypeRule::new(ColumnKind::MediumBlob, sized("medium", "blob"), Facets::SizeToken("medium")),
    TypeRule::new(ColumnKind::MediumText, sized("medium", "text"), Facets::SizeToken("medium")),
    TypeRule::new(ColumnKind::MediumInt, base(&["mediumint"]), Facets::Integer),
    TypeRule::new(ColumnKind::NText, base(&["ntext"]), Facets::None),
    TypeRule::new(ColumnKind::Numeric, base(&["numeric"]), Facets::PrecisionScale),
    TypeRule::new(ColumnKind::Real, base(&["real"]), Facets::LengthDecimals),
    TypeRule::new(ColumnKind::Set, base(&["set"]), Facets::Entries),
    TypeRule::new(ColumnKind::SmallInt, base(&["smallint"]), Facets::Integer),
    TypeRule::new(ColumnKind::Text, base(&["text"]), Facets::None),
    TypeRule::new(ColumnKind::Time, base(&["time"]), Facets::None),
    TypeRule::new(ColumnKind::Timestamp, base(&["timestamp"]), Facets::None),
    TypeRule::new(ColumnKind::TinyBlob, sized("tiny", "blob"), Facets::SizeToken("tiny")),
    TypeRule::new(ColumnKind::TinyText, sized("tiny", "text"), Facets::SizeToken("tiny")),
    TypeRule::new(ColumnKind::TinyInt, base(&["tinyint"]), Facets::Integer),
    TypeRule::new(ColumnKind::UniqueIdentifier, base(&["uniqueidentifier"]), Facets::None),
    TypeRule::new(ColumnKind::Uuid, base(&["uuid"]), Facets::None),
    TypeRule::new(ColumnKind::VarBinary, base(&["varbinary"]), Facets::Length),
    TypeRule::new(ColumnKind::VarChar, base(&["varchar", "character varying"]), Facets::Length),
    TypeRule::new(ColumnKind::Year, base(&["year"]), Facets::Length),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &str) -> TypeTokens {
        TypeTokens::parse(raw).unwrap()
    }

    #[test]
    fn test_sized_matcher() {
        let m = sized("long", "text");
        assert!(m.matches(&tokens("longtext")));
        assert!(!m.matches(&tokens("text")));
        assert!(!m.matches(&tokens("longblob")));
    }

    #[test]
    fn test_base_matcher_ignores_args() {
        let m = base(&["varchar"]);
        assert!(m.matches(&tokens("varchar(10)")));
        assert!(!m.matches(&tokens("varchar2")));
    }

    #[test]
    fn test_non_numeric_scale_is_kept_as_text() {
        let rule = TypeRule::new(ColumnKind::Decimal, base(&["decimal"]), Facets::PrecisionScale);
        let desc = rule.extract(&tokens("decimal(10,x)"));
        assert_eq!(desc.precision, Some(Length::Number(10)));
        assert_eq!(desc.scale, Some(Length::Text("x".into())));
    }

    #[test]
    fn test_empty_argument_is_unset() {
        let rule = TypeRule::new(ColumnKind::Decimal, base(&["decimal"]), Facets::PrecisionScale);
        let desc = rule.extract(&tokens("decimal(10,)"));
        assert_eq!(desc.precision, Some(Length::Number(10)));
        assert_eq!(desc.scale, None);
    }

    #[test]
    fn test_textual_length_is_kept() {
        let rule = TypeRule::new(ColumnKind::VarChar, base(&["varchar"]), Facets::Length);
        let desc = rule.extract(&tokens("varchar(max)"));
        assert_eq!(desc.length, Some(Length::Text("max".into())));
    }

    #[test]
    fn test_every_kind_has_a_rule() {
        for kind in ColumnKind::ALL {
            assert!(
                MYSQL_RULES.iter().any(|r| r.kind == kind),
                "no rule produces {}",
                kind
            );
        }
    }
}
