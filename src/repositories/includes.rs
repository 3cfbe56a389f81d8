//! Detailed views assembled by [`Includes`] implementations.
//!
//! Related rows are fetched with one query per relation; nothing is cached
//! on the entity itself.

use async_trait::async_trait;
use diesel::QueryResult;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::{
    Address, Article, Asteroid, CelestialBody, City, Comet, Comment, Event, EventParticipant,
    GalaxyQuasar, Planet, Satellite, Star, User,
};
use crate::repositories::{Includes, Link};
use crate::schema::{
    addresses, celestial_bodies, cities, comments, planets, satellites, stars, users,
};

/// A specialisation row with its parent celestial body.
#[derive(Debug, Clone, PartialEq)]
pub struct WithBody<T> {
    pub item: T,
    pub body: CelestialBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarDetail {
    pub star: Star,
    pub body: CelestialBody,
    pub planets: Vec<Planet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetDetail {
    pub planet: Planet,
    pub body: CelestialBody,
    pub star: Option<Star>,
    pub satellites: Vec<Satellite>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityDetail {
    pub city: City,
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddressDetail {
    pub address: Address,
    pub city: City,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDetail {
    pub article: Article,
    pub author: User,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDetail {
    pub event: Event,
    pub address: Option<Address>,
    pub participant_ids: Vec<i32>,
}

async fn load_body(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<CelestialBody> {
    celestial_bodies::table
        .find(id)
        .select(CelestialBody::as_select())
        .first(conn)
        .await
}

macro_rules! impl_with_body {
    ($($entity:ty),+ $(,)?) => {
        $(
            #[async_trait]
            impl Includes for $entity {
                type Detailed = WithBody<$entity>;

                async fn include(self, conn: &mut AsyncPgConnection) -> QueryResult<Self::Detailed> {
                    let body = load_body(conn, self.celestial_body_id).await?;
                    Ok(WithBody { item: self, body })
                }
            }
        )+
    };
}

impl_with_body!(Satellite, Asteroid, Comet, GalaxyQuasar);

#[async_trait]
impl Includes for Star {
    type Detailed = StarDetail;

    async fn include(self, conn: &mut AsyncPgConnection) -> QueryResult<StarDetail> {
        let body = load_body(conn, self.celestial_body_id).await?;
        let planets = Planet::belonging_to(&self)
            .order(planets::id.asc())
            .select(Planet::as_select())
            .load(conn)
            .await?;

        Ok(StarDetail {
            star: self,
            body,
            planets,
        })
    }
}

#[async_trait]
impl Includes for Planet {
    type Detailed = PlanetDetail;

    async fn include(self, conn: &mut AsyncPgConnection) -> QueryResult<PlanetDetail> {
        let body = load_body(conn, self.celestial_body_id).await?;
        let star = match self.star_id {
            Some(star_id) => stars::table
                .find(star_id)
                .select(Star::as_select())
                .first(conn)
                .await
                .optional()?,
            None => None,
        };
        let satellites = Satellite::belonging_to(&self)
            .order(satellites::id.asc())
            .select(Satellite::as_select())
            .load(conn)
            .await?;

        Ok(PlanetDetail {
            planet: self,
            body,
            star,
            satellites,
        })
    }
}

#[async_trait]
impl Includes for City {
    type Detailed = CityDetail;

    async fn include(self, conn: &mut AsyncPgConnection) -> QueryResult<CityDetail> {
        let addresses = Address::belonging_to(&self)
            .order(addresses::street.asc())
            .select(Address::as_select())
            .load(conn)
            .await?;

        Ok(CityDetail {
            city: self,
            addresses,
        })
    }
}

#[async_trait]
impl Includes for Address {
    type Detailed = AddressDetail;

    async fn include(self, conn: &mut AsyncPgConnection) -> QueryResult<AddressDetail> {
        let city = cities::table
            .find(self.city_id)
            .select(City::as_select())
            .first(conn)
            .await?;

        Ok(AddressDetail {
            address: self,
            city,
        })
    }
}

#[async_trait]
impl Includes for Article {
    type Detailed = ArticleDetail;

    async fn include(self, conn: &mut AsyncPgConnection) -> QueryResult<ArticleDetail> {
        let author = users::table
            .find(self.author_id)
            .select(User::as_select())
            .first(conn)
            .await?;
        let comments = Comment::belonging_to(&self)
            .order(comments::created_at.asc())
            .select(Comment::as_select())
            .load(conn)
            .await?;

        Ok(ArticleDetail {
            article: self,
            author,
            comments,
        })
    }
}

#[async_trait]
impl Includes for Event {
    type Detailed = EventDetail;

    async fn include(self, conn: &mut AsyncPgConnection) -> QueryResult<EventDetail> {
        let address = match self.address_id {
            Some(address_id) => addresses::table
                .find(address_id)
                .select(Address::as_select())
                .first(conn)
                .await
                .optional()?,
            None => None,
        };
        // Same join order as the participants endpoint.
        let participant_ids = EventParticipant::load_for(conn, self.id)
            .await?
            .iter()
            .map(Link::member_id)
            .collect();

        Ok(EventDetail {
            event: self,
            address,
            participant_ids,
        })
    }
}
