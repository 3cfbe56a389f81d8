use chrono::NaiveDate;
use diesel::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::discoveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Discovery {
    pub id: i32,
    pub discoverer_id: i32,
    pub name: String,
    pub body_type: String,
    pub description: String,
    pub discovered_on: NaiveDate,
    pub status: String,
    pub celestial_body_id: Option<i32>,
}

/// Submitter-editable columns; approval fills `status` and `celestial_body_id`.
#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::discoveries)]
pub struct NewDiscovery {
    pub discoverer_id: i32,
    pub name: String,
    pub body_type: String,
    pub description: String,
    pub discovered_on: NaiveDate,
}
