//! Lookups on `users` that the generic repository does not cover.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::User;
use crate::repositories::Repository;

impl Repository<User> {
    /// Finds the user whose email, username or phone equals `identifier`.
    ///
    /// Matching is exact; when several columns of different users match, the
    /// lowest id wins.
    pub async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool().get().await?;

        users
            .filter(
                email
                    .eq(identifier)
                    .or(username.eq(identifier))
                    .or(phone.eq(identifier)),
            )
            .order(id.asc())
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find users by identifier"))
    }
}
