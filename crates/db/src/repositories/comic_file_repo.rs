//! Repository for the `comic_files` table.
//!
//! Positions are kept at exactly `1..=N` per resource. Every write that can
//! disturb them (append, reorder, delete) locks the parent resource row and
//! recomputes positions inside one transaction; the unique constraint on
//! `(resource_id, position)` is deferred to commit so permutations succeed.

use shelfbot_core::types::{DbId, ResourceId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::comic_file::ComicFile;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, resource_id, file_id, position, storage_message_id, created_at";

pub struct ComicFileRepo;

impl ComicFileRepo {
    /// Append files to the end of a comic, in the given order.
    ///
    /// Returns the inserted rows, or `None` if the resource does not exist.
    pub async fn append(
        pool: &PgPool,
        resource_id: ResourceId,
        file_ids: &[String],
    ) -> Result<Option<Vec<ComicFile>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !Self::lock_resource(&mut tx, resource_id).await? {
            return Ok(None);
        }

        let last: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position), 0) FROM comic_files WHERE resource_id = $1",
        )
        .bind(resource_id)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO comic_files (resource_id, file_id, position)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let mut inserted = Vec::with_capacity(file_ids.len());
        for (offset, file_id) in (1..).zip(file_ids) {
            let row = sqlx::query_as::<_, ComicFile>(&query)
                .bind(resource_id)
                .bind(file_id)
                .bind(last + offset)
                .fetch_one(&mut *tx)
                .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        Ok(Some(inserted))
    }

    /// List a comic's files ordered by position.
    pub async fn list_by_resource(
        pool: &PgPool,
        resource_id: ResourceId,
    ) -> Result<Vec<ComicFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comic_files
             WHERE resource_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, ComicFile>(&query)
            .bind(resource_id)
            .fetch_all(pool)
            .await
    }

    /// Same as [`Self::list_by_resource`], inside an existing transaction.
    pub async fn list_by_resource_in(
        tx: &mut Transaction<'_, Postgres>,
        resource_id: ResourceId,
    ) -> Result<Vec<ComicFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comic_files
             WHERE resource_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, ComicFile>(&query)
            .bind(resource_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Count a comic's files.
    pub async fn count_by_resource(
        pool: &PgPool,
        resource_id: ResourceId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comic_files WHERE resource_id = $1")
            .bind(resource_id)
            .fetch_one(pool)
            .await
    }

    /// Rewrite positions so they follow `ordered_ids`.
    ///
    /// `ordered_ids` must name every file of the resource exactly once;
    /// otherwise nothing changes and `false` is returned.
    pub async fn reorder(
        pool: &PgPool,
        resource_id: ResourceId,
        ordered_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !Self::lock_resource(&mut tx, resource_id).await? {
            return Ok(false);
        }

        let mut current: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM comic_files WHERE resource_id = $1")
                .bind(resource_id)
                .fetch_all(&mut *tx)
                .await?;
        current.sort_unstable();
        let mut requested = ordered_ids.to_vec();
        requested.sort_unstable();
        if current != requested {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE comic_files AS c
             SET position = o.ord::int
             FROM unnest($2::bigint[]) WITH ORDINALITY AS o(id, ord)
             WHERE c.id = o.id AND c.resource_id = $1",
        )
        .bind(resource_id)
        .bind(ordered_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Delete one file and close the gap it leaves.
    ///
    /// Returns `true` if the file existed.
    pub async fn delete(
        pool: &PgPool,
        resource_id: ResourceId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !Self::lock_resource(&mut tx, resource_id).await? {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM comic_files WHERE id = $1 AND resource_id = $2")
            .bind(id)
            .bind(resource_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        Self::resequence_inner(&mut tx, resource_id).await?;

        tx.commit().await?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Take a row lock on the parent resource. Returns `false` if missing.
    async fn lock_resource(
        tx: &mut Transaction<'_, Postgres>,
        resource_id: ResourceId,
    ) -> Result<bool, sqlx::Error> {
        let locked: Option<ResourceId> =
            sqlx::query_scalar("SELECT id FROM resources WHERE id = $1 FOR UPDATE")
                .bind(resource_id)
                .fetch_optional(&mut **tx)
                .await?;
        Ok(locked.is_some())
    }

    /// Renumber positions to `1..=N`, keeping the current relative order.
    async fn resequence_inner(
        tx: &mut Transaction<'_, Postgres>,
        resource_id: ResourceId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE comic_files AS c
             SET position = r.rn::int
             FROM (
                 SELECT id, ROW_NUMBER() OVER (ORDER BY position) AS rn
                 FROM comic_files
                 WHERE resource_id = $1
             ) AS r
             WHERE c.id = r.id AND c.position <> r.rn",
        )
        .bind(resource_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
