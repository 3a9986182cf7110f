use sqlx::SqlitePool;
use tracing::debug;

use crate::model::staff::{StaffDraft, StaffRecord};

const SELECT_STAFF: &str = "SELECT id, nome, status, logado FROM colaboradores";

/// Staff records and the key/value `meta` table, backed by one shared pool.
#[derive(Clone)]
pub struct StaffStore {
    pool: SqlitePool,
}

impl StaffStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All records, newest first. `filter` is a case-insensitive substring
    /// matched against the name.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<StaffRecord>, sqlx::Error> {
        let sql = format!("{} ORDER BY id DESC", SELECT_STAFF);
        let records = sqlx::query_as::<_, StaffRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        // SQLite LIKE only folds ASCII; names carry accents.
        let needle = filter
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        Ok(match needle {
            Some(q) => records
                .into_iter()
                .filter(|r| r.name.to_lowercase().contains(&q))
                .collect(),
            None => records,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Option<StaffRecord>, sqlx::Error> {
        let sql = format!("{} WHERE id = ?", SELECT_STAFF);
        sqlx::query_as::<_, StaffRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create(&self, draft: &StaffDraft) -> Result<StaffRecord, sqlx::Error> {
        let result = sqlx::query("INSERT INTO colaboradores (nome, logado, status) VALUES (?, 0, ?)")
            .bind(&draft.name)
            .bind(draft.status.as_ref())
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        debug!(id, name = %draft.name, "Colaborador created");

        self.get(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Returns `None` when no record has this id.
    pub async fn update(
        &self,
        id: i64,
        draft: &StaffDraft,
    ) -> Result<Option<StaffRecord>, sqlx::Error> {
        let result = sqlx::query("UPDATE colaboradores SET nome = ?, status = ? WHERE id = ?")
            .bind(&draft.name)
            .bind(draft.status.as_ref())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Returns the number of rows removed (0 if already absent).
    pub async fn remove(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM colaboradores WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Returns the number of rows matched by `id` (0 or 1).
    pub async fn set_checked_in(&self, id: i64, checked_in: bool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE colaboradores SET logado = ? WHERE id = ?")
            .bind(checked_in)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Clears every flag and sets the ones in `ids` in a single UPDATE, so no
    /// reader sees the cleared intermediate state. Unknown ids match nothing.
    /// The ids travel as one JSON array, so their number is not bounded by
    /// SQLite's bind variable limit.
    pub async fn replace_checked_in(&self, ids: &[i64]) -> Result<(), sqlx::Error> {
        let ids_json = serde_json::to_string(ids)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        sqlx::query(
            "UPDATE colaboradores SET logado = (id IN (SELECT value FROM json_each(?)))",
        )
        .bind(ids_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn count_checked_in(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM colaboradores WHERE logado = 1")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn list_checked_in(&self) -> Result<Vec<StaffRecord>, sqlx::Error> {
        let sql = format!("{} WHERE logado = 1 ORDER BY id DESC", SELECT_STAFF);
        sqlx::query_as::<_, StaffRecord>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_meta(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        let value = sqlx::query_scalar::<_, Option<String>>("SELECT val FROM meta WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value.flatten())
    }

    pub async fn set_meta(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO meta (key, val) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET val = excluded.val",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;
    use crate::model::staff::StaffStatus;

    fn draft(name: &str, status: StaffStatus) -> StaffDraft {
        StaffDraft {
            name: name.to_string(),
            status,
        }
    }

    #[actix_web::test]
    async fn create_assigns_ids_and_defaults() {
        let store = StaffStore::new(init_test_db().await);

        let a = store.create(&draft("Ana", StaffStatus::Active)).await.unwrap();
        let b = store.create(&draft("Bruno", StaffStatus::Vacation)).await.unwrap();

        assert!(b.id > a.id);
        assert!(!a.checked_in);
        assert_eq!(b.status, StaffStatus::Vacation);
    }

    #[actix_web::test]
    async fn ids_are_not_reused_after_delete() {
        let store = StaffStore::new(init_test_db().await);

        let a = store.create(&draft("Ana", StaffStatus::Active)).await.unwrap();
        store.remove(a.id).await.unwrap();
        let b = store.create(&draft("Bia", StaffStatus::Active)).await.unwrap();

        assert!(b.id > a.id);
    }

    #[actix_web::test]
    async fn list_filters_case_insensitively_and_orders_desc() {
        let store = StaffStore::new(init_test_db().await);
        store.create(&draft("João Silva", StaffStatus::Active)).await.unwrap();
        store.create(&draft("Maria", StaffStatus::Active)).await.unwrap();
        store.create(&draft("ÁLVARO JOÃO", StaffStatus::Away)).await.unwrap();

        let all = store.list(None).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let joao = store.list(Some("joão")).await.unwrap();
        let names: Vec<&str> = joao.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ÁLVARO JOÃO", "João Silva"]);

        assert_eq!(store.list(Some("   ")).await.unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn update_and_remove_report_missing_rows() {
        let store = StaffStore::new(init_test_db().await);
        let a = store.create(&draft("Ana", StaffStatus::Active)).await.unwrap();

        let updated = store
            .update(a.id, &draft("Ana Paula", StaffStatus::DayOff))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ana Paula");
        assert_eq!(updated.status, StaffStatus::DayOff);

        assert!(store.update(999, &draft("X", StaffStatus::Active)).await.unwrap().is_none());

        assert_eq!(store.remove(a.id).await.unwrap(), 1);
        assert_eq!(store.remove(a.id).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn replace_checked_in_is_a_full_replace() {
        let store = StaffStore::new(init_test_db().await);
        for name in ["A", "B", "C"] {
            store.create(&draft(name, StaffStatus::Active)).await.unwrap();
        }

        store.replace_checked_in(&[1, 2]).await.unwrap();
        assert_eq!(store.count_checked_in().await.unwrap(), 2);

        store.replace_checked_in(&[3, 3, 42]).await.unwrap();
        let ids: Vec<i64> = store
            .list_checked_in()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![3]);

        store.replace_checked_in(&[]).await.unwrap();
        assert_eq!(store.count_checked_in().await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn replace_checked_in_accepts_more_ids_than_bind_variables() {
        let store = StaffStore::new(init_test_db().await);
        store.create(&draft("A", StaffStatus::Active)).await.unwrap();
        store.create(&draft("B", StaffStatus::Active)).await.unwrap();

        let ids: Vec<i64> = (2..=40_000).collect();
        store.replace_checked_in(&ids).await.unwrap();

        let checked: Vec<i64> = store
            .list_checked_in()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(checked, vec![2]);
    }

    #[actix_web::test]
    async fn meta_is_upserted() {
        let store = StaffStore::new(init_test_db().await);

        assert_eq!(store.get_meta("last_reset").await.unwrap(), None);
        store.set_meta("last_reset", "2025-01-01").await.unwrap();
        store.set_meta("last_reset", "2025-01-02").await.unwrap();
        assert_eq!(
            store.get_meta("last_reset").await.unwrap().as_deref(),
            Some("2025-01-02")
        );

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meta")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }
}
