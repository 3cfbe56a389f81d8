//! Repository layer for data access operations.
//!
//! One generic [`Repository`] serves every id-keyed table; per-table query
//! details live behind the [`Entity`] trait. Composite-key link tables use
//! [`JoinRepository`].

mod entity;
mod includes;
mod join;
mod repository;
pub mod search;
mod tables;
mod users;

pub use entity::{Entity, Includes, Search};
pub use includes::{
    AddressDetail, ArticleDetail, CityDetail, EventDetail, PlanetDetail, StarDetail, WithBody,
};
pub use join::{JoinRepository, Link};
pub use repository::Repository;
