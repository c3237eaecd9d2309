//! Static model definitions: tables, fields, validation rules, relations.

/// Inclusive bounds used for string lengths and numeric ranges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: usize,
    pub max: usize,
}

pub const STRING_10: Range = Range { min: 0, max: 10 };
pub const STRING_20: Range = Range { min: 0, max: 20 };
pub const STRING_24: Range = Range { min: 0, max: 24 };
pub const STRING_30: Range = Range { min: 0, max: 30 };
pub const STRING_40: Range = Range { min: 0, max: 40 };
pub const STRING_60: Range = Range { min: 0, max: 60 };
pub const STRING_70: Range = Range { min: 0, max: 70 };
pub const STRING_80: Range = Range { min: 0, max: 80 };
pub const STRING_120: Range = Range { min: 0, max: 120 };
pub const STRING_160: Range = Range { min: 0, max: 160 };
pub const STRING_200: Range = Range { min: 0, max: 200 };
pub const STRING_220: Range = Range { min: 0, max: 220 };

/// Storage kind of a field. Drives validation, binding, DDL and row decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    /// Fixed-point number stored as NUMERIC(10,2).
    Decimal,
    Text,
    /// Stored as `YYYY-MM-DD HH:MM:SS` text.
    DateTime,
}

/// What an absent field becomes on create/replace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldDefault {
    Required,
    Null,
    EmptyText,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ValidationRule {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub max_digits: Option<u32>,
    pub decimal_places: Option<u32>,
}

impl ValidationRule {
    pub const NONE: ValidationRule = ValidationRule {
        min_length: None,
        max_length: None,
        minimum: None,
        maximum: None,
        max_digits: None,
        decimal_places: None,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldDef {
    /// API (JSON) name.
    pub name: &'static str,
    /// Database column name.
    pub column: &'static str,
    pub kind: FieldKind,
    /// Whether an explicit JSON null is accepted (and the column is nullable).
    pub nullable: bool,
    pub default: FieldDefault,
    pub rule: ValidationRule,
    pub references: Option<ForeignKey>,
}

impl FieldDef {
    /// Text field with a length range; defaults to "" like every Chinook string field.
    pub const fn text(name: &'static str, column: &'static str, range: Range) -> Self {
        FieldDef {
            name,
            column,
            kind: FieldKind::Text,
            nullable: false,
            default: FieldDefault::EmptyText,
            rule: ValidationRule {
                min_length: Some(range.min),
                max_length: Some(range.max),
                ..ValidationRule::NONE
            },
            references: None,
        }
    }

    pub const fn integer(name: &'static str, column: &'static str) -> Self {
        FieldDef {
            name,
            column,
            kind: FieldKind::Integer,
            nullable: false,
            default: FieldDefault::Required,
            rule: ValidationRule::NONE,
            references: None,
        }
    }

    /// Two-decimal-place money value, never negative.
    pub const fn decimal(name: &'static str, column: &'static str) -> Self {
        FieldDef {
            name,
            column,
            kind: FieldKind::Decimal,
            nullable: false,
            default: FieldDefault::Required,
            rule: ValidationRule {
                minimum: Some(0.0),
                decimal_places: Some(2),
                ..ValidationRule::NONE
            },
            references: None,
        }
    }

    pub const fn datetime(name: &'static str, column: &'static str) -> Self {
        FieldDef {
            name,
            column,
            kind: FieldKind::DateTime,
            nullable: false,
            default: FieldDefault::Required,
            rule: ValidationRule::NONE,
            references: None,
        }
    }

    /// Accepts null. Non-text fields also default to null when absent.
    pub const fn optional(self) -> Self {
        let default = match self.kind {
            FieldKind::Text => FieldDefault::EmptyText,
            _ => FieldDefault::Null,
        };
        FieldDef {
            nullable: true,
            default,
            ..self
        }
    }

    pub const fn non_negative(self) -> Self {
        FieldDef {
            rule: ValidationRule {
                minimum: Some(0.0),
                ..self.rule
            },
            ..self
        }
    }

    pub const fn at_most(self, maximum: f64, max_digits: u32) -> Self {
        FieldDef {
            rule: ValidationRule {
                maximum: Some(maximum),
                max_digits: Some(max_digits),
                ..self.rule
            },
            ..self
        }
    }

    pub const fn references(self, table: &'static str, column: &'static str) -> Self {
        FieldDef {
            references: Some(ForeignKey { table, column }),
            ..self
        }
    }

    /// SQLite declared type. Text columns keep the NVARCHAR(n) spelling of the Chinook schema
    /// so that full-text introspection picks them up.
    pub fn sql_type(&self) -> String {
        match self.kind {
            FieldKind::Integer => "INTEGER".into(),
            FieldKind::Decimal => "NUMERIC(10,2)".into(),
            FieldKind::DateTime => "DATETIME".into(),
            FieldKind::Text => match self.rule.max_length {
                Some(n) => format!("NVARCHAR({})", n),
                None => "TEXT".into(),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimaryKey {
    Single(&'static str),
    Composite(&'static [&'static str]),
}

#[derive(Clone, Copy, Debug)]
pub struct IndexDef {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Capability an entity exposes through the generic handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    List,
    Read,
    Update,
    Patch,
    Delete,
}

impl Operation {
    pub const ALL: &'static [Operation] = &[
        Operation::Create,
        Operation::List,
        Operation::Read,
        Operation::Update,
        Operation::Patch,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Patch => "patch",
            Operation::Delete => "delete",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct EntityDef {
    /// Singular display name used in error messages ("Artist").
    pub name: &'static str,
    pub table: &'static str,
    /// URL path segment; None for tables that are not routed (join tables).
    pub path: Option<&'static str>,
    pub primary_key: PrimaryKey,
    /// Non-key fields in declaration order.
    pub fields: &'static [FieldDef],
    pub indexes: &'static [IndexDef],
    pub operations: &'static [Operation],
}

impl EntityDef {
    /// Single-column primary key; composite keys have none.
    pub fn pk(&self) -> Option<&'static str> {
        match self.primary_key {
            PrimaryKey::Single(c) => Some(c),
            PrimaryKey::Composite(_) => None,
        }
    }

    pub fn allows(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.pk() == Some(column) || self.fields.iter().any(|f| f.column == column)
    }
}

/// How a child collection is tied to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    /// Child column holding the parent's key.
    ForeignKey(&'static str),
    /// Many-to-many through a join table.
    Through {
        table: &'static str,
        parent_column: &'static str,
        child_column: &'static str,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct RelationDef {
    /// Parent table name.
    pub parent: &'static str,
    /// Child table name.
    pub child: &'static str,
    /// Path segment under `/{parent}/{id}/`.
    pub segment: &'static str,
    pub link: Link,
}
