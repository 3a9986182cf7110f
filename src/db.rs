use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, warn};

use crate::model::staff::StaffStatus;

pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(3));

    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    setup_schema(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with the schema applied.
#[cfg(test)]
pub async fn init_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");
    setup_schema(&pool).await.expect("Failed to create schema");
    pool
}

async fn setup_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS colaboradores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            logado INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'ativo'
        )
        "#,
    )
    .execute(pool)
    .await?;

    ensure_status_column(pool).await?;
    reset_unknown_statuses(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            val TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

// Databases created before staff statuses existed lack the column.
async fn ensure_status_column(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let columns = sqlx::query_scalar::<_, String>(
        "SELECT name FROM pragma_table_info('colaboradores')",
    )
    .fetch_all(pool)
    .await?;

    if !columns.iter().any(|c| c == "status") {
        info!("Adding status column to colaboradores");
        sqlx::query("ALTER TABLE colaboradores ADD COLUMN status TEXT NOT NULL DEFAULT 'ativo'")
            .execute(pool)
            .await?;
    }

    Ok(())
}

// Older databases stored whatever status string the client sent; one such
// row would make every record fail to decode.
async fn reset_unknown_statuses(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statuses = sqlx::query_scalar::<_, String>("SELECT DISTINCT status FROM colaboradores")
        .fetch_all(pool)
        .await?;

    for status in statuses {
        if status.parse::<StaffStatus>().is_ok() {
            continue;
        }

        let result = sqlx::query("UPDATE colaboradores SET status = ? WHERE status = ?")
            .bind(StaffStatus::Active.as_ref())
            .bind(&status)
            .execute(pool)
            .await?;
        warn!(
            status = %status,
            rows = result.rows_affected(),
            "Unknown colaborador status reset to ativo"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StaffStore;

    #[actix_web::test]
    async fn legacy_table_gains_status_column() {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE colaboradores (id INTEGER PRIMARY KEY AUTOINCREMENT, nome TEXT NOT NULL, logado INTEGER NOT NULL DEFAULT 0)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO colaboradores (nome) VALUES ('Legacy')")
            .execute(&pool)
            .await
            .unwrap();

        setup_schema(&pool).await.unwrap();

        let status: String = sqlx::query_scalar("SELECT status FROM colaboradores WHERE nome = 'Legacy'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "ativo");
    }

    #[actix_web::test]
    async fn legacy_rows_with_unknown_status_stay_listable() {
        let pool = init_test_db().await;
        sqlx::query(
            "INSERT INTO colaboradores (nome, logado, status) VALUES ('Legacy', 1, 'Férias'), ('Current', 0, 'ferias')",
        )
        .execute(&pool)
        .await
        .unwrap();

        setup_schema(&pool).await.unwrap();

        let store = StaffStore::new(pool);
        let records = store.list(None).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Current");
        assert_eq!(records[0].status, StaffStatus::Vacation);
        assert_eq!(records[1].name, "Legacy");
        assert_eq!(records[1].status, StaffStatus::Active);
        assert!(records[1].checked_in);

        let checked_in = store.list_checked_in().await.unwrap();
        assert_eq!(checked_in.len(), 1);
    }

    #[actix_web::test]
    async fn schema_setup_is_repeatable() {
        let pool = init_test_db().await;
        setup_schema(&pool).await.unwrap();
    }
}
