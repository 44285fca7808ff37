//! Normalized column kinds and their language/ORM type hints.

use serde::Serialize;

/// Dialect-neutral kind a raw type string decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    BigInt,
    Binary,
    Bit,
    Blob,
    Bool,
    Char,
    Date,
    DateTime,
    Decimal,
    Double,
    Enum,
    Float,
    Geometry,
    Int,
    Json,
    Jsonb,
    LongBlob,
    LongText,
    MediumBlob,
    MediumInt,
    MediumText,
    NText,
    Numeric,
    Real,
    Set,
    SmallInt,
    Text,
    Time,
    Timestamp,
    TinyBlob,
    TinyInt,
    TinyText,
    UniqueIdentifier,
    Uuid,
    VarBinary,
    VarChar,
    Year,
}

impl ColumnKind {
    /// Every kind, in name order.
    pub const ALL: [ColumnKind; 37] = [
        ColumnKind::BigInt,
        ColumnKind::Binary,
        ColumnKind::Bit,
        ColumnKind::Blob,
        ColumnKind::Bool,
        ColumnKind::Char,
        ColumnKind::Date,
        ColumnKind::DateTime,
        ColumnKind::Decimal,
        ColumnKind::Double,
        ColumnKind::Enum,
        ColumnKind::Float,
        ColumnKind::Geometry,
        ColumnKind::Int,
        ColumnKind::Json,
        ColumnKind::Jsonb,
        ColumnKind::LongBlob,
        ColumnKind::LongText,
        ColumnKind::MediumBlob,
        ColumnKind::MediumInt,
        ColumnKind::MediumText,
        ColumnKind::NText,
        ColumnKind::Numeric,
        ColumnKind::Real,
        ColumnKind::Set,
        ColumnKind::SmallInt,
        ColumnKind::Text,
        ColumnKind::Time,
        ColumnKind::Timestamp,
        ColumnKind::TinyBlob,
        ColumnKind::TinyInt,
        ColumnKind::TinyText,
        ColumnKind::UniqueIdentifier,
        ColumnKind::Uuid,
        ColumnKind::VarBinary,
        ColumnKind::VarChar,
        ColumnKind::Year,
    ];

    /// Kind produced when no rule matches.
    pub const FALLBACK: ColumnKind = ColumnKind::Int;

    /// Lower-case kind name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::BigInt => "bigint",
            ColumnKind::Binary => "binary",
            ColumnKind::Bit => "bit",
            ColumnKind::Blob => "blob",
            ColumnKind::Bool => "bool",
            ColumnKind::Char => "char",
            ColumnKind::Date => "date",
            ColumnKind::DateTime => "datetime",
            ColumnKind::Decimal => "decimal",
            ColumnKind::Double => "double",
            ColumnKind::Enum => "enum",
            ColumnKind::Float => "float",
            ColumnKind::Geometry => "geometry",
            ColumnKind::Int => "int",
            ColumnKind::Json => "json",
            ColumnKind::Jsonb => "jsonb",
            ColumnKind::LongBlob => "longblob",
            ColumnKind::LongText => "longtext",
            ColumnKind::MediumBlob => "mediumblob",
            ColumnKind::MediumInt => "mediumint",
            ColumnKind::MediumText => "mediumtext",
            ColumnKind::NText => "ntext",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Real => "real",
            ColumnKind::Set => "set",
            ColumnKind::SmallInt => "smallint",
            ColumnKind::Text => "text",
            ColumnKind::Time => "time",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::TinyBlob => "tinyblob",
            ColumnKind::TinyInt => "tinyint",
            ColumnKind::TinyText => "tinytext",
            ColumnKind::UniqueIdentifier => "uniqueidentifier",
            ColumnKind::Uuid => "uuid",
            ColumnKind::VarBinary => "varbinary",
            ColumnKind::VarChar => "varchar",
            ColumnKind::Year => "year",
        }
    }

    /// Language type hint for generated code.
    pub fn language_type(&self) -> LanguageType {
        self.hints().0
    }

    /// ORM type hint (Sequelize `DataTypes` naming).
    pub fn orm_type(&self) -> &'static str {
        self.hints().1
    }

    fn hints(&self) -> (LanguageType, &'static str) {
        use LanguageType::*;

        match self {
            // Integers
            ColumnKind::BigInt => (Number, "BIGINT"),
            ColumnKind::Int => (Number, "INTEGER"),
            ColumnKind::MediumInt => (Number, "MEDIUMINT"),
            ColumnKind::SmallInt => (Number, "SMALLINT"),
            ColumnKind::TinyInt => (Number, "TINYINT"),
            ColumnKind::Year => (Number, "INTEGER"),

            // Exact and approximate numerics
            ColumnKind::Decimal => (Number, "DECIMAL"),
            ColumnKind::Numeric => (Number, "NUMBER"),
            ColumnKind::Double => (Number, "DOUBLE"),
            ColumnKind::Float => (Number, "FLOAT"),
            ColumnKind::Real => (Number, "REAL"),

            // Boolean
            ColumnKind::Bit | ColumnKind::Bool => (Boolean, "BOOLEAN"),

            // Strings
            ColumnKind::Char => (String, "CHAR"),
            ColumnKind::VarChar => (String, "STRING"),
            ColumnKind::Text
            | ColumnKind::TinyText
            | ColumnKind::MediumText
            | ColumnKind::LongText
            | ColumnKind::NText => (String, "TEXT"),

            // Binary
            ColumnKind::Binary
            | ColumnKind::Blob
            | ColumnKind::TinyBlob
            | ColumnKind::MediumBlob
            | ColumnKind::LongBlob => (Json, "BLOB"),
            ColumnKind::VarBinary => (String, "BLOB"),

            // Date/time
            ColumnKind::Date => (Date, "DATEONLY"),
            ColumnKind::DateTime | ColumnKind::Timestamp => (Date, "DATE"),
            ColumnKind::Time => (String, "TIME"),

            // Enumerations
            ColumnKind::Enum | ColumnKind::Set => (StringList, "ENUM"),

            // Documents and identifiers
            ColumnKind::Json => (Json, "JSON"),
            ColumnKind::Jsonb => (Json, "JSONB"),
            ColumnKind::UniqueIdentifier | ColumnKind::Uuid => (String, "UUID"),
            ColumnKind::Geometry => (String, "GEOMETRY"),
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language-level type hint for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LanguageType {
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "string-list")]
    StringList,
}

impl LanguageType {
    /// Whether the hint is a date/time type.
    pub fn is_temporal(&self) -> bool {
        matches!(self, LanguageType::Date)
    }
}
