use anyhow::Context;
use libris_kernel::Migration;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

const MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _libris_migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL,
        PRIMARY KEY (module, id)
    )
"#;

/// A migration recorded as applied.
#[derive(Debug, Clone, FromRow)]
pub struct AppliedMigration {
    pub module: String,
    pub id: String,
    pub applied_at: OffsetDateTime,
}

/// Apply every migration not yet recorded, in the order given.
///
/// Each migration runs in its own transaction together with its bookkeeping
/// row, so a failing script leaves neither partial schema nor a record.
/// Returns the number of migrations applied by this call.
pub async fn migrate(pool: &SqlitePool, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
    sqlx::query(MIGRATIONS_TABLE)
        .execute(pool)
        .await
        .context("failed to create migrations table")?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let already: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM _libris_migrations WHERE module = ? AND id = ?")
                .bind(module.as_str())
                .bind(migration.id)
                .fetch_optional(pool)
                .await?;

        if already.is_some() {
            tracing::debug!(target: "libris-db", %module, migration = migration.id, "already applied");
            continue;
        }

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration '{}/{}' failed", module, migration.id))?;
        sqlx::query("INSERT INTO _libris_migrations (module, id, applied_at) VALUES (?, ?, ?)")
            .bind(module.as_str())
            .bind(migration.id)
            .bind(OffsetDateTime::now_utc())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(target: "libris-db", %module, migration = migration.id, "applied migration");
        applied += 1;
    }

    Ok(applied)
}

/// List recorded migrations, oldest first.
pub async fn applied_migrations(pool: &SqlitePool) -> anyhow::Result<Vec<AppliedMigration>> {
    sqlx::query(MIGRATIONS_TABLE).execute(pool).await?;
    let rows = sqlx::query_as::<_, AppliedMigration>(
        "SELECT module, id, applied_at FROM _libris_migrations ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect;
    use libris_kernel::settings::DatabaseSettings;

    fn shelf_migrations() -> Vec<(String, Migration)> {
        vec![
            (
                "shelf".to_string(),
                Migration {
                    id: "001_init",
                    up: "CREATE TABLE shelf (id INTEGER PRIMARY KEY); CREATE INDEX shelf_id ON shelf (id);",
                },
            ),
            (
                "shelf".to_string(),
                Migration {
                    id: "002_label",
                    up: "ALTER TABLE shelf ADD COLUMN label TEXT;",
                },
            ),
        ]
    }

    #[tokio::test]
    async fn migrations_apply_once() {
        let pool = connect(&DatabaseSettings::in_memory()).await.unwrap();

        assert_eq!(migrate(&pool, &shelf_migrations()).await.unwrap(), 2);
        assert_eq!(migrate(&pool, &shelf_migrations()).await.unwrap(), 0);

        let applied = applied_migrations(&pool).await.unwrap();
        let ids: Vec<_> = applied.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["001_init", "002_label"]);

        sqlx::query("INSERT INTO shelf (id, label) VALUES (1, 'fiction')")
            .execute(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_migration_is_not_recorded() {
        let pool = connect(&DatabaseSettings::in_memory()).await.unwrap();
        let broken = vec![(
            "shelf".to_string(),
            Migration {
                id: "001_broken",
                up: "CREATE TABLE shelf (id INTEGER PRIMARY KEY); NOT SQL AT ALL;",
            },
        )];

        let err = migrate(&pool, &broken).await.unwrap_err();
        assert!(err.to_string().contains("shelf/001_broken"));
        assert!(applied_migrations(&pool).await.unwrap().is_empty());

        let table: Option<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE name = 'shelf'")
                .fetch_optional(&pool)
                .await
                .unwrap();
        assert!(table.is_none());
    }
}
