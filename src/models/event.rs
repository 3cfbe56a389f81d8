use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: NaiveDateTime,
    pub ends_at: Option<NaiveDateTime>,
    pub address_id: Option<i32>,
    pub celestial_body_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::events)]
#[diesel(treat_none_as_null = true)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub starts_at: NaiveDateTime,
    pub ends_at: Option<NaiveDateTime>,
    pub address_id: Option<i32>,
    pub celestial_body_id: Option<i32>,
}

/// Link row between an event and a participating user.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(Event))]
#[diesel(primary_key(event_id, user_id))]
#[diesel(table_name = crate::schema::event_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EventParticipant {
    pub event_id: i32,
    pub user_id: i32,
    pub joined_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = crate::schema::event_participants)]
pub struct NewEventParticipant {
    pub event_id: i32,
    pub user_id: i32,
}
