//! Link tables keyed by a composite `(owner, member)` primary key.

use std::marker::PhantomData;

use async_trait::async_trait;
use diesel::QueryResult;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{EventParticipant, NewEventParticipant};

/// A composite-key row linking an owner (e.g. an event) to a member.
#[async_trait]
pub trait Link: Sized + Send + Sync + 'static {
    const NAME: &'static str;

    fn member_id(&self) -> i32;

    /// Links for one owner, oldest first.
    async fn load_for(conn: &mut AsyncPgConnection, owner_id: i32) -> QueryResult<Vec<Self>>;

    /// `None` when the pair is already linked.
    async fn link(
        conn: &mut AsyncPgConnection,
        owner_id: i32,
        member_id: i32,
    ) -> QueryResult<Option<Self>>;

    async fn unlink(conn: &mut AsyncPgConnection, owner_id: i32, member_id: i32)
    -> QueryResult<usize>;
}

#[async_trait]
impl Link for EventParticipant {
    const NAME: &'static str = "event_participants";

    fn member_id(&self) -> i32 {
        self.user_id
    }

    async fn load_for(conn: &mut AsyncPgConnection, owner_id: i32) -> QueryResult<Vec<Self>> {
        use crate::schema::event_participants::dsl::*;

        event_participants
            .filter(event_id.eq(owner_id))
            .order((joined_at.asc(), user_id.asc()))
            .select(EventParticipant::as_select())
            .load(conn)
            .await
    }

    async fn link(
        conn: &mut AsyncPgConnection,
        owner_id: i32,
        member_id: i32,
    ) -> QueryResult<Option<Self>> {
        use crate::schema::event_participants::dsl::*;

        diesel::insert_into(event_participants)
            .values(&NewEventParticipant {
                event_id: owner_id,
                user_id: member_id,
            })
            .on_conflict_do_nothing()
            .returning(EventParticipant::as_returning())
            .get_result(conn)
            .await
            .optional()
    }

    async fn unlink(
        conn: &mut AsyncPgConnection,
        owner_id: i32,
        member_id: i32,
    ) -> QueryResult<usize> {
        use crate::schema::event_participants::dsl::*;

        diesel::delete(event_participants.find((owner_id, member_id)))
            .execute(conn)
            .await
    }
}

/// Repository over a [`Link`] table.
pub struct JoinRepository<L> {
    pool: AsyncDbPool,
    _link: PhantomData<fn() -> L>,
}

impl<L> Clone for JoinRepository<L> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _link: PhantomData,
        }
    }
}

impl<L: Link> JoinRepository<L> {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            pool,
            _link: PhantomData,
        }
    }

    pub async fn list(&self, owner_id: i32) -> AppResult<Vec<L>> {
        let mut conn = self.pool.get().await?;
        L::load_for(&mut conn, owner_id)
            .await
            .map_err(|e| Self::db_error(e, "list"))
    }

    pub async fn member_ids(&self, owner_id: i32) -> AppResult<Vec<i32>> {
        Ok(self
            .list(owner_id)
            .await?
            .iter()
            .map(Link::member_id)
            .collect())
    }

    /// Adds the pair. Linking twice is a `Duplicate` error.
    pub async fn add(&self, owner_id: i32, member_id: i32) -> AppResult<L> {
        let mut conn = self.pool.get().await?;
        L::link(&mut conn, owner_id, member_id)
            .await
            .map_err(|e| Self::db_error(e, "insert"))?
            .ok_or_else(|| AppError::Duplicate {
                entity: L::NAME.to_string(),
                field: "member".to_string(),
                value: format!("({owner_id}, {member_id})"),
            })
    }

    /// Removes the pair; `NotFound` when it was not linked.
    pub async fn remove(&self, owner_id: i32, member_id: i32) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        let affected = L::unlink(&mut conn, owner_id, member_id)
            .await
            .map_err(|e| Self::db_error(e, "delete"))?;

        if affected == 0 {
            return Err(AppError::NotFound {
                entity: L::NAME.to_string(),
                field: "member".to_string(),
                value: format!("({owner_id}, {member_id})"),
            });
        }
        Ok(())
    }

    fn db_error(error: diesel::result::Error, verb: &str) -> AppError {
        DatabaseErrorConverter::convert_diesel_error(error, &format!("{verb} {}", L::NAME))
    }
}
