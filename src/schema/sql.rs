use super::types::{KeyStrategy, TableSchema, NAMESPACE};

/// Generate `CREATE TABLE IF NOT EXISTS` SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.qualified_name());
    let mut columns = Vec::new();

    for col in schema.columns {
        let is_key = col.name == schema.primary_key;
        let pk = if is_key { " PRIMARY KEY" } else { "" };
        // A store-assigned INTEGER PRIMARY KEY is the rowid alias, so leave it nullable
        let rowid_alias = is_key && schema.key_strategy == KeyStrategy::StoreAssigned;
        let null_constraint = if !col.nullable && !rowid_alias {
            " NOT NULL"
        } else {
            ""
        };
        let unique = if col.unique { " UNIQUE" } else { "" };

        columns.push(format!(
            "    {} {}{}{}{}",
            col.name,
            col.col_type.sql_type(),
            pk,
            null_constraint,
            unique
        ));
    }

    // Referenced tables resolve inside the same schema, so they stay unqualified
    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate `CREATE INDEX` statements for foreign key columns
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .foreign_keys
        .iter()
        .map(|fk| {
            format!(
                "CREATE INDEX IF NOT EXISTS {}.idx_{}_{} ON {}({})",
                NAMESPACE, schema.name, fk.column, schema.name, fk.column
            )
        })
        .collect()
}

/// Generate a positional INSERT over [`TableSchema::insert_columns`]
pub fn generate_insert(schema: &TableSchema) -> String {
    let columns = schema.insert_columns();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.qualified_name(),
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Query yielding the next generator-assigned key, `1` for an empty table
pub fn generate_next_id(schema: &TableSchema) -> String {
    format!(
        "SELECT COALESCE(MAX({}), 0) + 1 FROM {}",
        schema.primary_key,
        schema.qualified_name()
    )
}
