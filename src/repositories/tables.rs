//! [`Entity`](super::Entity) bindings for every id-keyed table.

use crate::models::{
    Address, Article, Asteroid, CelestialBody, City, Comet, Comment, Discovery, Event,
    GalaxyQuasar, NewAddress, NewArticle, NewAsteroid, NewCelestialBody, NewCity, NewComet,
    NewComment, NewDiscovery, NewEvent, NewGalaxyQuasar, NewPlanet, NewReport, NewSatellite,
    NewStar, NewUser, Planet, Report, Satellite, Star, User,
};
use crate::repositories::entity::{impl_entity, impl_identity_includes};

impl_entity!(City, NewCity, cities);
impl_entity!(Address, NewAddress, addresses);
impl_entity!(User, NewUser, users);
impl_entity!(CelestialBody, NewCelestialBody, celestial_bodies);
impl_entity!(Star, NewStar, stars);
impl_entity!(Planet, NewPlanet, planets);
impl_entity!(Satellite, NewSatellite, satellites);
impl_entity!(Asteroid, NewAsteroid, asteroids);
impl_entity!(Comet, NewComet, comets);
impl_entity!(GalaxyQuasar, NewGalaxyQuasar, galaxies_quasars);
impl_entity!(Article, NewArticle, articles);
impl_entity!(Comment, NewComment, comments);
impl_entity!(Report, NewReport, reports);
impl_entity!(Event, NewEvent, events);
impl_entity!(Discovery, NewDiscovery, discoveries);

impl_identity_includes!(User, CelestialBody, Comment, Report, Discovery);
