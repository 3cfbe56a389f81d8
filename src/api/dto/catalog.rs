//! Catalog DTOs: celestial bodies and their specialisations.
//!
//! Decimal columns travel as JSON strings so no precision is lost.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{
    Asteroid, CelestialBody, Comet, GALAXY, GalaxyQuasar, NewAsteroid, NewCelestialBody, NewComet,
    NewGalaxyQuasar, NewPlanet, NewSatellite, NewStar, Planet, QUASAR, Satellite, Star,
};
use crate::repositories::{PlanetDetail, StarDetail, WithBody};

/// Rejects values PostgreSQL would overflow in a `NUMERIC(precision, scale)`
/// column: once rounded to `scale` places, the magnitude must stay below
/// `10^(precision - scale)`.
fn fits_numeric(value: &BigDecimal, precision: i64, scale: i64) -> Result<(), ValidationError> {
    let limit = BigDecimal::new(1.into(), scale - precision);
    if value.abs().round(scale) < limit {
        return Ok(());
    }
    Err(ValidationError::new("numeric_overflow").with_message(
        format!(
            "Must have at most {} digits before the decimal point",
            precision - scale
        )
        .into(),
    ))
}

macro_rules! numeric_column {
    ($($name:ident => ($precision:literal, $scale:literal)),* $(,)?) => {
        $(
            fn $name(value: &BigDecimal) -> Result<(), ValidationError> {
                fits_numeric(value, $precision, $scale)
            }
        )*
    };
}

numeric_column! {
    numeric_10_2 => (10, 2),
    numeric_10_6 => (10, 6),
    numeric_12_4 => (12, 4),
    numeric_14_4 => (14, 4),
    numeric_18_4 => (18, 4),
    numeric_18_6 => (18, 6),
    numeric_20_6 => (20, 6),
    numeric_40_4 => (40, 4),
}

// ============================================================================
// Celestial bodies
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CelestialBodyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Proxima Centauri")]
    pub name: String,
    #[validate(length(min = 1, max = 30, message = "Body type must be between 1 and 30 characters"))]
    #[schema(example = "star")]
    pub body_type: String,
    #[validate(custom(function = "numeric_40_4"))]
    #[schema(value_type = Option<String>, example = "2.446e29")]
    pub mass_kg: Option<BigDecimal>,
    #[validate(custom(function = "numeric_18_4"))]
    #[schema(value_type = Option<String>)]
    pub radius_km: Option<BigDecimal>,
    #[validate(custom(function = "numeric_20_6"))]
    #[schema(value_type = Option<String>, example = "4.2465")]
    pub distance_ly: Option<BigDecimal>,
    pub discovered_on: Option<NaiveDate>,
    pub description: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"), length(max = 500))]
    pub image_url: Option<String>,
}

impl From<CelestialBodyRequest> for NewCelestialBody {
    fn from(request: CelestialBodyRequest) -> Self {
        Self {
            name: request.name,
            body_type: request.body_type,
            mass_kg: request.mass_kg,
            radius_km: request.radius_km,
            distance_ly: request.distance_ly,
            discovered_on: request.discovered_on,
            description: request.description,
            image_url: request.image_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CelestialBodyResponse {
    pub id: i32,
    pub name: String,
    pub body_type: String,
    #[schema(value_type = Option<String>)]
    pub mass_kg: Option<BigDecimal>,
    #[schema(value_type = Option<String>)]
    pub radius_km: Option<BigDecimal>,
    #[schema(value_type = Option<String>)]
    pub distance_ly: Option<BigDecimal>,
    pub discovered_on: Option<NaiveDate>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<CelestialBody> for CelestialBodyResponse {
    fn from(body: CelestialBody) -> Self {
        Self {
            id: body.id,
            name: body.name,
            body_type: body.body_type,
            mass_kg: body.mass_kg,
            radius_km: body.radius_km,
            distance_ly: body.distance_ly,
            discovered_on: body.discovered_on,
            description: body.description,
            image_url: body.image_url,
        }
    }
}

/// A specialisation row with its celestial body nested under `body`.
#[derive(Debug, Serialize)]
pub struct WithBodyResponse<T> {
    #[serde(flatten)]
    pub item: T,
    pub body: CelestialBodyResponse,
}

impl<E, T: From<E>> From<WithBody<E>> for WithBodyResponse<T> {
    fn from(detail: WithBody<E>) -> Self {
        Self {
            item: T::from(detail.item),
            body: detail.body.into(),
        }
    }
}

// ============================================================================
// Stars
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct StarRequest {
    #[validate(range(min = 1, message = "celestial_body_id must be positive"))]
    pub celestial_body_id: i32,
    #[validate(length(min = 1, max = 10, message = "Spectral type must be between 1 and 10 characters"))]
    #[schema(example = "M5.5Ve")]
    pub spectral_type: String,
    #[validate(custom(function = "numeric_10_2"))]
    #[schema(value_type = String, example = "3042")]
    pub temperature_k: BigDecimal,
    #[validate(custom(function = "numeric_18_6"))]
    #[schema(value_type = Option<String>)]
    pub luminosity_solar: Option<BigDecimal>,
}

impl From<StarRequest> for NewStar {
    fn from(request: StarRequest) -> Self {
        Self {
            celestial_body_id: request.celestial_body_id,
            spectral_type: request.spectral_type,
            temperature_k: request.temperature_k,
            luminosity_solar: request.luminosity_solar,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StarResponse {
    pub id: i32,
    pub celestial_body_id: i32,
    pub spectral_type: String,
    #[schema(value_type = String)]
    pub temperature_k: BigDecimal,
    #[schema(value_type = Option<String>)]
    pub luminosity_solar: Option<BigDecimal>,
}

impl From<Star> for StarResponse {
    fn from(star: Star) -> Self {
        Self {
            id: star.id,
            celestial_body_id: star.celestial_body_id,
            spectral_type: star.spectral_type,
            temperature_k: star.temperature_k,
            luminosity_solar: star.luminosity_solar,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StarDetailResponse {
    #[serde(flatten)]
    pub star: StarResponse,
    pub body: CelestialBodyResponse,
    pub planets: Vec<PlanetResponse>,
}

impl From<StarDetail> for StarDetailResponse {
    fn from(detail: StarDetail) -> Self {
        Self {
            star: detail.star.into(),
            body: detail.body.into(),
            planets: detail.planets.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Planets
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PlanetRequest {
    #[validate(range(min = 1, message = "celestial_body_id must be positive"))]
    pub celestial_body_id: i32,
    /// Host star; rogue planets have none
    pub star_id: Option<i32>,
    #[validate(custom(function = "numeric_14_4"))]
    #[schema(value_type = Option<String>, example = "11.186")]
    pub orbital_period_days: Option<BigDecimal>,
    #[serde(default)]
    pub is_habitable: bool,
}

impl From<PlanetRequest> for NewPlanet {
    fn from(request: PlanetRequest) -> Self {
        Self {
            celestial_body_id: request.celestial_body_id,
            star_id: request.star_id,
            orbital_period_days: request.orbital_period_days,
            is_habitable: request.is_habitable,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanetResponse {
    pub id: i32,
    pub celestial_body_id: i32,
    pub star_id: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub orbital_period_days: Option<BigDecimal>,
    pub is_habitable: bool,
}

impl From<Planet> for PlanetResponse {
    fn from(planet: Planet) -> Self {
        Self {
            id: planet.id,
            celestial_body_id: planet.celestial_body_id,
            star_id: planet.star_id,
            orbital_period_days: planet.orbital_period_days,
            is_habitable: planet.is_habitable,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanetDetailResponse {
    #[serde(flatten)]
    pub planet: PlanetResponse,
    pub body: CelestialBodyResponse,
    pub star: Option<StarResponse>,
    pub satellites: Vec<SatelliteResponse>,
}

impl From<PlanetDetail> for PlanetDetailResponse {
    fn from(detail: PlanetDetail) -> Self {
        Self {
            planet: detail.planet.into(),
            body: detail.body.into(),
            star: detail.star.map(Into::into),
            satellites: detail.satellites.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Satellites
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SatelliteRequest {
    #[validate(range(min = 1, message = "celestial_body_id must be positive"))]
    pub celestial_body_id: i32,
    #[validate(range(min = 1, message = "planet_id must be positive"))]
    pub planet_id: i32,
    #[validate(custom(function = "numeric_14_4"))]
    #[schema(value_type = Option<String>)]
    pub orbital_period_days: Option<BigDecimal>,
}

impl From<SatelliteRequest> for NewSatellite {
    fn from(request: SatelliteRequest) -> Self {
        Self {
            celestial_body_id: request.celestial_body_id,
            planet_id: request.planet_id,
            orbital_period_days: request.orbital_period_days,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SatelliteResponse {
    pub id: i32,
    pub celestial_body_id: i32,
    pub planet_id: i32,
    #[schema(value_type = Option<String>)]
    pub orbital_period_days: Option<BigDecimal>,
}

impl From<Satellite> for SatelliteResponse {
    fn from(satellite: Satellite) -> Self {
        Self {
            id: satellite.id,
            celestial_body_id: satellite.celestial_body_id,
            planet_id: satellite.planet_id,
            orbital_period_days: satellite.orbital_period_days,
        }
    }
}

// ============================================================================
// Asteroids
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AsteroidRequest {
    #[validate(range(min = 1, message = "celestial_body_id must be positive"))]
    pub celestial_body_id: i32,
    #[validate(length(max = 50, message = "Composition must be at most 50 characters"))]
    #[schema(example = "carbonaceous")]
    pub composition: Option<String>,
    #[serde(default)]
    pub is_hazardous: bool,
}

impl From<AsteroidRequest> for NewAsteroid {
    fn from(request: AsteroidRequest) -> Self {
        Self {
            celestial_body_id: request.celestial_body_id,
            composition: request.composition,
            is_hazardous: request.is_hazardous,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AsteroidResponse {
    pub id: i32,
    pub celestial_body_id: i32,
    pub composition: Option<String>,
    pub is_hazardous: bool,
}

impl From<Asteroid> for AsteroidResponse {
    fn from(asteroid: Asteroid) -> Self {
        Self {
            id: asteroid.id,
            celestial_body_id: asteroid.celestial_body_id,
            composition: asteroid.composition,
            is_hazardous: asteroid.is_hazardous,
        }
    }
}

// ============================================================================
// Comets
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CometRequest {
    #[validate(range(min = 1, message = "celestial_body_id must be positive"))]
    pub celestial_body_id: i32,
    #[validate(custom(function = "numeric_12_4"))]
    #[schema(value_type = Option<String>, example = "75.32")]
    pub orbital_period_years: Option<BigDecimal>,
    pub last_perihelion: Option<NaiveDate>,
}

impl From<CometRequest> for NewComet {
    fn from(request: CometRequest) -> Self {
        Self {
            celestial_body_id: request.celestial_body_id,
            orbital_period_years: request.orbital_period_years,
            last_perihelion: request.last_perihelion,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CometResponse {
    pub id: i32,
    pub celestial_body_id: i32,
    #[schema(value_type = Option<String>)]
    pub orbital_period_years: Option<BigDecimal>,
    pub last_perihelion: Option<NaiveDate>,
}

impl From<Comet> for CometResponse {
    fn from(comet: Comet) -> Self {
        Self {
            id: comet.id,
            celestial_body_id: comet.celestial_body_id,
            orbital_period_years: comet.orbital_period_years,
            last_perihelion: comet.last_perihelion,
        }
    }
}

// ============================================================================
// Galaxies and quasars
// ============================================================================

fn validate_galaxy_kind(kind: &str) -> Result<(), ValidationError> {
    if kind == GALAXY || kind == QUASAR {
        Ok(())
    } else {
        let mut error = ValidationError::new("kind");
        error.message = Some("Kind must be 'galaxy' or 'quasar'".into());
        Err(error)
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GalaxyQuasarRequest {
    #[validate(range(min = 1, message = "celestial_body_id must be positive"))]
    pub celestial_body_id: i32,
    #[validate(custom(function = "validate_galaxy_kind"))]
    #[schema(example = "galaxy")]
    pub kind: String,
    #[validate(custom(function = "numeric_10_6"))]
    #[schema(value_type = Option<String>, example = "0.158339")]
    pub redshift: Option<BigDecimal>,
}

impl From<GalaxyQuasarRequest> for NewGalaxyQuasar {
    fn from(request: GalaxyQuasarRequest) -> Self {
        Self {
            celestial_body_id: request.celestial_body_id,
            kind: request.kind,
            redshift: request.redshift,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GalaxyQuasarResponse {
    pub id: i32,
    pub celestial_body_id: i32,
    pub kind: String,
    #[schema(value_type = Option<String>)]
    pub redshift: Option<BigDecimal>,
}

impl From<GalaxyQuasar> for GalaxyQuasarResponse {
    fn from(row: GalaxyQuasar) -> Self {
        Self {
            id: row.id,
            celestial_body_id: row.celestial_body_id,
            kind: row.kind,
            redshift: row.redshift,
        }
    }
}
