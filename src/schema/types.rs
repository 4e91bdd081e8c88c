/// Schema name every table is attached under
pub const NAMESPACE: &str = "retail";

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    /// Calendar date stored as `YYYY-MM-DD`
    Date,
    /// Naive timestamp stored as `YYYY-MM-DD HH:MM:SS`
    Timestamp,
}

impl ColumnType {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text | ColumnType::Date | ColumnType::Timestamp => "TEXT",
        }
    }
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
    pub unique: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
            unique: false,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
            unique: false,
        }
    }

    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }
}

/// How a table's primary key gets its value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyStrategy {
    /// The generator reads `MAX(key) + 1` and supplies the value itself.
    /// Only sound while a single generator writes to the store.
    NextMax,
    /// The store assigns the key on insert
    StoreAssigned,
    /// Rows are written by someone else; the generator only reads them
    External,
}

/// Foreign key reference
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub const fn new(
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table,
            references_column,
        }
    }
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    /// Primary key column; always the first entry of `columns`
    pub primary_key: &'static str,
    pub key_strategy: KeyStrategy,
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
}

impl TableSchema {
    /// Fully qualified name, e.g. `retail.orders`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", NAMESPACE, self.name)
    }

    /// Columns the generator binds on insert. A store-assigned key is left out.
    pub fn insert_columns(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|col| {
                !(self.key_strategy == KeyStrategy::StoreAssigned && col.name == self.primary_key)
            })
            .map(|col| col.name)
            .collect()
    }
}
