//! Catalog rows: the `celestial_bodies` base table and its specialisations.
//!
//! Every specialisation row points at exactly one celestial body through a
//! unique `celestial_body_id`.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::celestial_bodies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CelestialBody {
    pub id: i32,
    pub name: String,
    pub body_type: String,
    pub mass_kg: Option<BigDecimal>,
    pub radius_km: Option<BigDecimal>,
    pub distance_ly: Option<BigDecimal>,
    pub discovered_on: Option<NaiveDate>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::celestial_bodies)]
#[diesel(treat_none_as_null = true)]
pub struct NewCelestialBody {
    pub name: String,
    pub body_type: String,
    pub mass_kg: Option<BigDecimal>,
    pub radius_km: Option<BigDecimal>,
    pub distance_ly: Option<BigDecimal>,
    pub discovered_on: Option<NaiveDate>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(CelestialBody))]
#[diesel(table_name = crate::schema::stars)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Star {
    pub id: i32,
    pub celestial_body_id: i32,
    pub spectral_type: String,
    pub temperature_k: BigDecimal,
    pub luminosity_solar: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::stars)]
#[diesel(treat_none_as_null = true)]
pub struct NewStar {
    pub celestial_body_id: i32,
    pub spectral_type: String,
    pub temperature_k: BigDecimal,
    pub luminosity_solar: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(CelestialBody))]
#[diesel(belongs_to(Star))]
#[diesel(table_name = crate::schema::planets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Planet {
    pub id: i32,
    pub celestial_body_id: i32,
    pub star_id: Option<i32>,
    pub orbital_period_days: Option<BigDecimal>,
    pub is_habitable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::planets)]
#[diesel(treat_none_as_null = true)]
pub struct NewPlanet {
    pub celestial_body_id: i32,
    pub star_id: Option<i32>,
    pub orbital_period_days: Option<BigDecimal>,
    pub is_habitable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(CelestialBody))]
#[diesel(belongs_to(Planet))]
#[diesel(table_name = crate::schema::satellites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Satellite {
    pub id: i32,
    pub celestial_body_id: i32,
    pub planet_id: i32,
    pub orbital_period_days: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::satellites)]
#[diesel(treat_none_as_null = true)]
pub struct NewSatellite {
    pub celestial_body_id: i32,
    pub planet_id: i32,
    pub orbital_period_days: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(CelestialBody))]
#[diesel(table_name = crate::schema::asteroids)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Asteroid {
    pub id: i32,
    pub celestial_body_id: i32,
    pub composition: Option<String>,
    pub is_hazardous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::asteroids)]
#[diesel(treat_none_as_null = true)]
pub struct NewAsteroid {
    pub celestial_body_id: i32,
    pub composition: Option<String>,
    pub is_hazardous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(CelestialBody))]
#[diesel(table_name = crate::schema::comets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comet {
    pub id: i32,
    pub celestial_body_id: i32,
    pub orbital_period_years: Option<BigDecimal>,
    pub last_perihelion: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::comets)]
#[diesel(treat_none_as_null = true)]
pub struct NewComet {
    pub celestial_body_id: i32,
    pub orbital_period_years: Option<BigDecimal>,
    pub last_perihelion: Option<NaiveDate>,
}

pub const GALAXY: &str = "galaxy";
pub const QUASAR: &str = "quasar";

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(CelestialBody))]
#[diesel(table_name = crate::schema::galaxies_quasars)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GalaxyQuasar {
    pub id: i32,
    pub celestial_body_id: i32,
    /// `galaxy` or `quasar`
    pub kind: String,
    pub redshift: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::galaxies_quasars)]
#[diesel(treat_none_as_null = true)]
pub struct NewGalaxyQuasar {
    pub celestial_body_id: i32,
    pub kind: String,
    pub redshift: Option<BigDecimal>,
}
