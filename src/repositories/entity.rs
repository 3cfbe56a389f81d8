//! Per-table contracts used by the generic [`Repository`](super::Repository).
//!
//! Each row type implements [`Entity`] through [`impl_entity!`], which
//! expands the same five diesel statements against the row's own table.

use async_trait::async_trait;
use diesel::QueryResult;
use diesel_async::AsyncPgConnection;

/// A table with an `i32` primary key named `id`.
#[async_trait]
pub trait Entity: Sized + Send + Sync + 'static {
    /// Insert/overwrite payload; every column it names is written on update.
    type Draft: Send + Sync + 'static;

    /// Table name, used in error messages.
    const NAME: &'static str;

    fn id(&self) -> i32;

    /// All rows ordered by id.
    async fn load_all(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Self>>;

    async fn load_one(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<Option<Self>>;

    async fn insert(conn: &mut AsyncPgConnection, draft: &Self::Draft) -> QueryResult<Self>;

    /// `None` when no row has `id`.
    async fn overwrite(
        conn: &mut AsyncPgConnection,
        id: i32,
        draft: &Self::Draft,
    ) -> QueryResult<Option<Self>>;

    /// Number of deleted rows (0 or 1).
    async fn remove(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<usize>;
}

/// Eager-load hook: bundles a row with the rows it references or owns.
#[async_trait]
pub trait Includes: Entity {
    type Detailed: Send + 'static;

    async fn include(self, conn: &mut AsyncPgConnection) -> QueryResult<Self::Detailed>;
}

/// Filter strategy handed to [`Repository::search`](super::Repository::search).
#[async_trait]
pub trait Search<E: Entity>: Send + Sync {
    async fn run(&self, conn: &mut AsyncPgConnection) -> QueryResult<Vec<E>>;
}

/// Implements [`Entity`] for a row type backed by `crate::schema::$table`.
macro_rules! impl_entity {
    ($entity:ty, $draft:ty, $table:ident) => {
        #[async_trait::async_trait]
        impl $crate::repositories::Entity for $entity {
            type Draft = $draft;

            const NAME: &'static str = stringify!($table);

            fn id(&self) -> i32 {
                self.id
            }

            async fn load_all(
                conn: &mut diesel_async::AsyncPgConnection,
            ) -> diesel::QueryResult<Vec<Self>> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::schema::$table::dsl;

                dsl::$table
                    .order(dsl::id.asc())
                    .select(<$entity>::as_select())
                    .load(conn)
                    .await
            }

            async fn load_one(
                conn: &mut diesel_async::AsyncPgConnection,
                id: i32,
            ) -> diesel::QueryResult<Option<Self>> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::schema::$table::dsl;

                dsl::$table
                    .find(id)
                    .select(<$entity>::as_select())
                    .first(conn)
                    .await
                    .optional()
            }

            async fn insert(
                conn: &mut diesel_async::AsyncPgConnection,
                draft: &Self::Draft,
            ) -> diesel::QueryResult<Self> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::schema::$table::dsl;

                diesel::insert_into(dsl::$table)
                    .values(draft)
                    .returning(<$entity>::as_returning())
                    .get_result(conn)
                    .await
            }

            async fn overwrite(
                conn: &mut diesel_async::AsyncPgConnection,
                id: i32,
                draft: &Self::Draft,
            ) -> diesel::QueryResult<Option<Self>> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::schema::$table::dsl;

                diesel::update(dsl::$table.find(id))
                    .set(draft)
                    .returning(<$entity>::as_returning())
                    .get_result(conn)
                    .await
                    .optional()
            }

            async fn remove(
                conn: &mut diesel_async::AsyncPgConnection,
                id: i32,
            ) -> diesel::QueryResult<usize> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::schema::$table::dsl;

                diesel::delete(dsl::$table.find(id)).execute(conn).await
            }
        }
    };
}

/// [`Includes`] for rows without related data: the detailed view is the row.
macro_rules! impl_identity_includes {
    ($($entity:ty),+ $(,)?) => {
        $(
            #[async_trait::async_trait]
            impl $crate::repositories::Includes for $entity {
                type Detailed = $entity;

                async fn include(
                    self,
                    _conn: &mut diesel_async::AsyncPgConnection,
                ) -> diesel::QueryResult<Self::Detailed> {
                    Ok(self)
                }
            }
        )+
    };
}

pub(crate) use impl_entity;
pub(crate) use impl_identity_includes;
