use bigdecimal::BigDecimal;
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::{Validate, ValidationErrors};

use super::{check_range, comma_separated, contains_pattern, impl_search, into_result, non_blank};
use crate::models::{Asteroid, CelestialBody, Planet, Star};
use crate::schema::{asteroids, celestial_bodies, planets, stars};

/// Celestial bodies by name, type and distance, ordered by name.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CelestialBodySearch {
    /// Case-insensitive name substring
    pub name: Option<String>,

    /// Comma-separated body types, e.g. `star,planet`
    #[serde(default, rename = "body_type", deserialize_with = "comma_separated")]
    #[param(value_type = Option<String>)]
    pub body_types: Vec<String>,

    /// Inclusive lower bound in light years
    #[param(value_type = Option<String>, example = "4.2")]
    pub min_distance_ly: Option<BigDecimal>,

    /// Inclusive upper bound in light years
    #[param(value_type = Option<String>)]
    pub max_distance_ly: Option<BigDecimal>,
}

impl Validate for CelestialBodySearch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_range(
            &mut errors,
            self.min_distance_ly.as_ref(),
            self.max_distance_ly.as_ref(),
            "max_distance_ly",
        );
        into_result(errors)
    }
}

impl CelestialBodySearch {
    pub fn query(&self) -> celestial_bodies::BoxedQuery<'static, Pg> {
        let mut query = celestial_bodies::table.into_boxed();

        if let Some(name) = non_blank(&self.name) {
            query = query.filter(celestial_bodies::name.ilike(contains_pattern(name)));
        }
        if !self.body_types.is_empty() {
            query = query.filter(celestial_bodies::body_type.eq_any(self.body_types.clone()));
        }
        if let Some(min) = &self.min_distance_ly {
            query = query.filter(celestial_bodies::distance_ly.ge(min.clone()));
        }
        if let Some(max) = &self.max_distance_ly {
            query = query.filter(celestial_bodies::distance_ly.le(max.clone()));
        }

        query.order((celestial_bodies::name.asc(), celestial_bodies::id.asc()))
    }
}

impl_search!(CelestialBodySearch => CelestialBody);

/// Stars by spectral class and surface temperature.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StarSearch {
    /// Comma-separated spectral types, e.g. `G2V,K1V`
    #[serde(default, rename = "spectral_type", deserialize_with = "comma_separated")]
    #[param(value_type = Option<String>)]
    pub spectral_types: Vec<String>,

    #[param(value_type = Option<String>)]
    pub min_temperature_k: Option<BigDecimal>,

    #[param(value_type = Option<String>)]
    pub max_temperature_k: Option<BigDecimal>,
}

impl Validate for StarSearch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_range(
            &mut errors,
            self.min_temperature_k.as_ref(),
            self.max_temperature_k.as_ref(),
            "max_temperature_k",
        );
        into_result(errors)
    }
}

impl StarSearch {
    pub fn query(&self) -> stars::BoxedQuery<'static, Pg> {
        let mut query = stars::table.into_boxed();

        if !self.spectral_types.is_empty() {
            query = query.filter(stars::spectral_type.eq_any(self.spectral_types.clone()));
        }
        if let Some(min) = &self.min_temperature_k {
            query = query.filter(stars::temperature_k.ge(min.clone()));
        }
        if let Some(max) = &self.max_temperature_k {
            query = query.filter(stars::temperature_k.le(max.clone()));
        }

        query.order(stars::id.asc())
    }
}

impl_search!(StarSearch => Star);

#[derive(Debug, Clone, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct PlanetSearch {
    /// Host star id
    pub star_id: Option<i32>,
    pub habitable: Option<bool>,
}

impl PlanetSearch {
    pub fn query(&self) -> planets::BoxedQuery<'static, Pg> {
        let mut query = planets::table.into_boxed();

        if let Some(star_id) = self.star_id {
            query = query.filter(planets::star_id.eq(star_id));
        }
        if let Some(habitable) = self.habitable {
            query = query.filter(planets::is_habitable.eq(habitable));
        }

        query.order(planets::id.asc())
    }
}

impl_search!(PlanetSearch => Planet);

#[derive(Debug, Clone, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct AsteroidSearch {
    pub hazardous: Option<bool>,

    /// Case-insensitive composition substring
    pub composition: Option<String>,
}

impl AsteroidSearch {
    pub fn query(&self) -> asteroids::BoxedQuery<'static, Pg> {
        let mut query = asteroids::table.into_boxed();

        if let Some(hazardous) = self.hazardous {
            query = query.filter(asteroids::is_hazardous.eq(hazardous));
        }
        if let Some(composition) = non_blank(&self.composition) {
            query = query.filter(asteroids::composition.ilike(contains_pattern(composition)));
        }

        query.order(asteroids::id.asc())
    }
}

impl_search!(AsteroidSearch => Asteroid);
