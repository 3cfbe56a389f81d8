//! Diesel row types (`X`) and their insert/overwrite drafts (`NewX`).

mod celestial;
mod content;
mod discovery;
mod event;
mod location;
mod user;

pub use celestial::{
    Asteroid, CelestialBody, Comet, GALAXY, GalaxyQuasar, NewAsteroid, NewCelestialBody, NewComet,
    NewGalaxyQuasar, NewPlanet, NewSatellite, NewStar, Planet, QUASAR, Satellite, Star,
};
pub use content::{
    Article, Comment, NewArticle, NewComment, NewReport, Report, ReportStatus, ReviewStatus,
};
pub use discovery::{Discovery, NewDiscovery};
pub use event::{Event, EventParticipant, NewEvent, NewEventParticipant};
pub use location::{Address, City, NewAddress, NewCity};
pub use user::{NewUser, ROLE_ADMIN, ROLE_USER, User};
