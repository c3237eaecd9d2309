//! Apply the model to the database: CREATE TABLE with keys and foreign keys, then indexes.
//! Tables are created in definition order, which lists referenced tables first.

use crate::config::{EntityDef, PrimaryKey, ResolvedModel};
use crate::error::AppError;
use crate::sql::quoted;
use sqlx::SqlitePool;

fn create_table(e: &EntityDef) -> String {
    let mut defs = Vec::new();
    if let PrimaryKey::Single(pk) = e.primary_key {
        defs.push(format!("{} INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL", quoted(pk)));
    }
    for f in e.fields {
        let mut def = format!("{} {}", quoted(f.column), f.sql_type());
        if !f.nullable {
            def.push_str(" NOT NULL");
        }
        defs.push(def);
    }
    if let PrimaryKey::Composite(cols) = e.primary_key {
        let cols: Vec<String> = cols.iter().map(|c| quoted(c)).collect();
        defs.push(format!(
            "CONSTRAINT {} PRIMARY KEY ({})",
            quoted(&format!("PK_{}", e.name)),
            cols.join(", ")
        ));
    }
    for f in e.fields {
        if let Some(fk) = f.references {
            defs.push(format!(
                "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE NO ACTION ON UPDATE NO ACTION",
                quoted(f.column),
                quoted(fk.table),
                quoted(fk.column)
            ));
        }
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        quoted(e.table),
        defs.join(",\n    ")
    )
}

/// DDL for every table, then every index. Idempotent (IF NOT EXISTS).
pub fn ddl_statements(model: &ResolvedModel) -> Vec<String> {
    let mut out: Vec<String> = model.entities.iter().map(|e| create_table(e)).collect();
    for e in &model.entities {
        for idx in e.indexes {
            let cols: Vec<String> = idx.columns.iter().map(|c| quoted(c)).collect();
            out.push(format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                quoted(idx.name),
                quoted(e.table),
                cols.join(", ")
            ));
        }
    }
    out
}

/// Create missing tables and indexes in one transaction.
pub async fn apply_migrations(pool: &SqlitePool, model: &ResolvedModel) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for sql in ddl_statements(model) {
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_precede_indexes() {
        let model = ResolvedModel::chinook().unwrap();
        let ddl = ddl_statements(&model);
        let tables = ddl.iter().filter(|s| s.starts_with("CREATE TABLE")).count();
        assert_eq!(tables, 11);
        let first_index = ddl.iter().position(|s| s.starts_with("CREATE INDEX")).unwrap();
        assert_eq!(first_index, tables);
        assert!(ddl.contains(&"CREATE INDEX IF NOT EXISTS \"IFK_TrackAlbumId\" ON \"tracks\" (\"AlbumId\")".to_string()));
    }

    #[test]
    fn track_table_declares_types_nullability_and_foreign_keys() {
        let model = ResolvedModel::chinook().unwrap();
        let sql = create_table(model.entity_by_table("tracks").unwrap());
        assert!(sql.contains("\"TrackId\" INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL"));
        assert!(sql.contains("\"Name\" NVARCHAR(200) NOT NULL"));
        assert!(sql.contains("\"Composer\" NVARCHAR(220),"));
        assert!(sql.contains("\"UnitPrice\" NUMERIC(10,2) NOT NULL"));
        assert!(sql.contains("FOREIGN KEY (\"MediaTypeId\") REFERENCES \"media_types\" (\"MediaTypeId\")"));
    }

    #[test]
    fn join_table_has_composite_key() {
        let model = ResolvedModel::chinook().unwrap();
        let sql = create_table(model.entity_by_table("playlist_track").unwrap());
        assert!(sql.contains("CONSTRAINT \"PK_PlaylistTrack\" PRIMARY KEY (\"PlaylistId\", \"TrackId\")"));
        assert!(!sql.contains("AUTOINCREMENT"));
    }
}
