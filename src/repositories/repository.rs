//! Generic async repository over one [`Entity`] table.

use std::marker::PhantomData;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::repositories::{Entity, Includes, Search};

/// Repository for the table behind `E`.
///
/// Holds only the pool handle; `AsyncDbPool` is `Arc`-backed, so cloning is
/// a reference count increment.
pub struct Repository<E> {
    pool: AsyncDbPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &AsyncDbPool {
        &self.pool
    }

    /// Lists every row ordered by id.
    pub async fn get_all(&self) -> AppResult<Vec<E>> {
        let mut conn = self.pool.get().await?;
        E::load_all(&mut conn)
            .await
            .map_err(|e| Self::db_error(e, "list"))
    }

    /// Finds a row by id.
    ///
    /// # Returns
    /// `Some(row)` if found, `None` otherwise
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<E>> {
        let mut conn = self.pool.get().await?;
        E::load_one(&mut conn, id)
            .await
            .map_err(|e| Self::db_error(e, "find"))
    }

    /// Like [`find_by_id`](Self::find_by_id) but a miss is `AppError::NotFound`.
    pub async fn get_by_id(&self, id: i32) -> AppResult<E> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(E::NAME, id))
    }

    /// Inserts `draft` and returns the stored row with its generated id.
    pub async fn add(&self, draft: &E::Draft) -> AppResult<E> {
        let mut conn = self.pool.get().await?;
        E::insert(&mut conn, draft)
            .await
            .map_err(|e| Self::db_error(e, "insert"))
    }

    /// Overwrites every draft column of row `id`, NULLs included.
    ///
    /// # Errors
    /// `NotFound` when no row has `id`
    pub async fn update(&self, id: i32, draft: &E::Draft) -> AppResult<E> {
        let mut conn = self.pool.get().await?;
        E::overwrite(&mut conn, id, draft)
            .await
            .map_err(|e| Self::db_error(e, "update"))?
            .ok_or_else(|| AppError::not_found(E::NAME, id))
    }

    /// Deletes row `id`.
    ///
    /// # Errors
    /// `NotFound` when nothing was deleted
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        let affected = E::remove(&mut conn, id)
            .await
            .map_err(|e| Self::db_error(e, "delete"))?;

        if affected == 0 {
            return Err(AppError::not_found(E::NAME, id));
        }
        Ok(())
    }

    /// Runs a filter strategy against this table.
    pub async fn search<S>(&self, strategy: &S) -> AppResult<Vec<E>>
    where
        S: Search<E> + ?Sized,
    {
        let mut conn = self.pool.get().await?;
        strategy
            .run(&mut conn)
            .await
            .map_err(|e| Self::db_error(e, "search"))
    }

    fn db_error(error: diesel::result::Error, verb: &str) -> AppError {
        DatabaseErrorConverter::convert_diesel_error(error, &format!("{verb} {}", E::NAME))
    }
}

impl<E: Includes> Repository<E> {
    /// Loads row `id` together with its related rows.
    pub async fn get_detailed(&self, id: i32) -> AppResult<E::Detailed> {
        let mut conn = self.pool.get().await?;
        let row = E::load_one(&mut conn, id)
            .await
            .map_err(|e| Self::db_error(e, "find"))?
            .ok_or_else(|| AppError::not_found(E::NAME, id))?;

        row.include(&mut conn)
            .await
            .map_err(|e| Self::db_error(e, "include"))
    }
}
