//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `catalog` - celestial bodies and their specialisations
//! - `content` - articles, comments, reports
//! - `community` - cities, addresses, events, discoveries
//! - `user`, `auth` - accounts and tokens
//! - `media`, `admin`, `health`, `error` - everything else

mod admin;
mod auth;
mod catalog;
mod community;
mod content;
mod error;
mod health;
mod media;
mod user;

pub use admin::{LogLevelRequest, LogLevelResponse};
pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use catalog::{
    AsteroidRequest, AsteroidResponse, CelestialBodyRequest, CelestialBodyResponse, CometRequest,
    CometResponse, GalaxyQuasarRequest, GalaxyQuasarResponse, PlanetDetailResponse, PlanetRequest,
    PlanetResponse, SatelliteRequest, SatelliteResponse, StarDetailResponse, StarRequest,
    StarResponse, WithBodyResponse,
};
pub use community::{
    AddressDetailResponse, AddressRequest, AddressResponse, ApprovedDiscoveryResponse,
    CityDetailResponse, CityRequest, CityResponse, DiscoveryRequest, DiscoveryResponse,
    EventDetailResponse, EventRequest, EventResponse, ParticipantResponse,
};
pub use content::{
    ArticleDetailResponse, ArticleRequest, ArticleResponse, CommentRequest, CommentResponse,
    ReportRequest, ReportResponse,
};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use media::{UploadForm, UploadQuery, UploadResponse};
pub use user::{UserProfileResponse, UserResponse};
