//! Repository and workflow tests against a real PostgreSQL database.
//!
//! Set `ASTRO_TEST_DATABASE_URL` to run them; without it every test returns
//! early. Rows are tagged with a random suffix so runs can share a database.

use astro_rs::config::{DatabaseConfig, JwtConfig};
use astro_rs::db::{AsyncDbPool, establish_async_connection_pool, run_pending_migrations};
use astro_rs::error::AppError;
use astro_rs::models::{
    Address, Article, CelestialBody, City, Comment, Discovery, Event, EventParticipant,
    NewAddress, NewArticle, NewCelestialBody, NewCity, NewComment, NewDiscovery, NewEvent,
    NewPlanet, NewSatellite, NewStar, Planet, ROLE_USER, Satellite, Star,
};
use astro_rs::repositories::{JoinRepository, Repository};
use astro_rs::services::{ApprovalService, AuthService, Registration};
use astro_rs::utils::jwt::validate_token;
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

const DATABASE_URL_ENV: &str = "ASTRO_TEST_DATABASE_URL";
const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

async fn test_pool() -> Option<AsyncDbPool> {
    let Ok(url) = std::env::var(DATABASE_URL_ENV) else {
        eprintln!("{DATABASE_URL_ENV} not set, skipping");
        return None;
    };

    run_pending_migrations(&url).await.unwrap();
    let config = DatabaseConfig {
        url,
        max_connections: 4,
        ..DatabaseConfig::default()
    };
    Some(establish_async_connection_pool(&config).await.unwrap())
}

fn tag() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

fn auth_service(pool: &AsyncDbPool) -> AuthService {
    AuthService::new(
        Repository::new(pool.clone()),
        JwtConfig {
            secret: JWT_SECRET.to_string(),
            expiration_hours: 1,
        },
    )
}

fn registration(tag: &str) -> Registration {
    Registration {
        username: format!("obs-{tag}"),
        email: format!("obs-{tag}@example.org"),
        phone: None,
        password: "correct horse battery".to_string(),
        address_id: None,
    }
}

#[tokio::test]
async fn get_all_returns_seeded_rows() {
    let Some(pool) = test_pool().await else { return };
    let cities = Repository::<City>::new(pool);
    let country = format!("Seedland {}", tag());

    let mut seeded = Vec::new();
    for name in ["Antofagasta", "Mauna Kea", "Paranal"] {
        let draft = NewCity {
            name: name.to_string(),
            country: country.clone(),
        };
        seeded.push(cities.add(&draft).await.unwrap());
    }

    let listed: Vec<City> = cities
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .filter(|city| city.country == country)
        .collect();

    assert_eq!(listed, seeded);
}

#[tokio::test]
async fn add_update_delete_round_trip() {
    let Some(pool) = test_pool().await else { return };
    let cities = Repository::<City>::new(pool);
    let country = format!("Chile {}", tag());

    let created = cities
        .add(&NewCity {
            name: "La Serena".to_string(),
            country: country.clone(),
        })
        .await
        .unwrap();
    assert_eq!(cities.get_by_id(created.id).await.unwrap(), created);

    let updated = cities
        .update(
            created.id,
            &NewCity {
                name: "Vicuña".to_string(),
                country,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(cities.get_by_id(created.id).await.unwrap().name, "Vicuña");

    cities.delete(created.id).await.unwrap();
    assert!(matches!(
        cities.get_by_id(created.id).await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        cities.delete(created.id).await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn update_of_missing_row_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    let cities = Repository::<City>::new(pool);

    let result = cities
        .update(
            i32::MAX,
            &NewCity {
                name: "Nowhere".to_string(),
                country: "None".to_string(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn login_issues_token_with_identity() {
    let Some(pool) = test_pool().await else { return };
    let auth = auth_service(&pool);
    let tag = tag();

    let registered = auth.register(registration(&tag)).await.unwrap();
    assert_eq!(registered.user.role, ROLE_USER);

    let session = auth
        .login(&format!("obs-{tag}@example.org"), "correct horse battery")
        .await
        .unwrap();
    let claims = validate_token(&session.token, JWT_SECRET).unwrap();
    assert_eq!(claims.sub, registered.user.id.to_string());
    assert_eq!(claims.email, format!("obs-{tag}@example.org"));
    assert_eq!(claims.role, ROLE_USER);

    // Username works as an identifier too.
    assert!(auth.login(&format!("obs-{tag}"), "correct horse battery").await.is_ok());
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let Some(pool) = test_pool().await else { return };
    let auth = auth_service(&pool);
    let tag = tag();
    auth.register(registration(&tag)).await.unwrap();

    let wrong_password = auth
        .login(&format!("obs-{tag}@example.org"), "incorrect")
        .await;
    let unknown = auth.login(&format!("ghost-{tag}@example.org"), "whatever").await;

    assert!(matches!(wrong_password, Err(AppError::Unauthorized { .. })));
    assert!(matches!(unknown, Err(AppError::Unauthorized { .. })));
}

#[tokio::test]
async fn duplicate_registration_is_conflict() {
    let Some(pool) = test_pool().await else { return };
    let auth = auth_service(&pool);
    let tag = tag();
    auth.register(registration(&tag)).await.unwrap();

    let again = auth.register(registration(&tag)).await;

    assert!(matches!(again, Err(AppError::Duplicate { .. })));
}

#[tokio::test]
async fn approving_discovery_creates_linked_body_once() {
    let Some(pool) = test_pool().await else { return };
    let tag = tag();
    let user = auth_service(&pool)
        .register(registration(&tag))
        .await
        .unwrap()
        .user;

    let discovery = Repository::<Discovery>::new(pool.clone())
        .add(&NewDiscovery {
            discoverer_id: user.id,
            name: format!("C/2026 {tag}"),
            body_type: "comet".to_string(),
            description: "Diffuse coma with a short ion tail".to_string(),
            discovered_on: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        })
        .await
        .unwrap();
    assert_eq!(discovery.status, "pending");

    let approvals = ApprovalService::new(pool);
    let approved = approvals.approve_discovery(discovery.id).await.unwrap();
    assert_eq!(approved.discovery.status, "approved");
    assert_eq!(approved.discovery.celestial_body_id, Some(approved.body.id));
    assert_eq!(approved.body.name, discovery.name);

    let second = approvals.approve_discovery(discovery.id).await;
    assert!(matches!(second, Err(AppError::UnprocessableContent { .. })));
}

#[tokio::test]
async fn joining_an_event_twice_is_duplicate() {
    let Some(pool) = test_pool().await else { return };
    let tag = tag();
    let user = auth_service(&pool)
        .register(registration(&tag))
        .await
        .unwrap()
        .user;
    let event = Repository::<Event>::new(pool.clone())
        .add(&NewEvent {
            title: format!("Perseids watch {tag}"),
            description: None,
            starts_at: Utc::now().naive_utc(),
            ends_at: None,
            address_id: None,
            celestial_body_id: None,
        })
        .await
        .unwrap();
    let participants = JoinRepository::<EventParticipant>::new(pool);

    participants.add(event.id, user.id).await.unwrap();
    assert_eq!(participants.member_ids(event.id).await.unwrap(), vec![user.id]);
    assert!(matches!(
        participants.add(event.id, user.id).await,
        Err(AppError::Duplicate { .. })
    ));

    participants.remove(event.id, user.id).await.unwrap();
    assert!(matches!(
        participants.remove(event.id, user.id).await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn event_detail_lists_participants_in_join_order() {
    let Some(pool) = test_pool().await else { return };
    let tag = tag();
    let auth = auth_service(&pool);
    let mut members = Vec::new();
    for n in 0..3 {
        let user = auth
            .register(registration(&format!("{tag}{n}")))
            .await
            .unwrap()
            .user;
        members.push(user.id);
    }
    let events = Repository::<Event>::new(pool.clone());
    let event = events
        .add(&NewEvent {
            title: format!("Geminids watch {tag}"),
            description: None,
            starts_at: Utc::now().naive_utc(),
            ends_at: None,
            address_id: None,
            celestial_body_id: None,
        })
        .await
        .unwrap();

    // Newest account first, so join order differs from id order.
    members.reverse();
    let participants = JoinRepository::<EventParticipant>::new(pool);
    for user_id in &members {
        participants.add(event.id, *user_id).await.unwrap();
    }

    let detail = events.get_detailed(event.id).await.unwrap();

    assert_eq!(detail.participant_ids, members);
    assert_eq!(participants.member_ids(event.id).await.unwrap(), members);
}

fn body(name: String, body_type: &str) -> NewCelestialBody {
    NewCelestialBody {
        name,
        body_type: body_type.to_string(),
        mass_kg: None,
        radius_km: Some(BigDecimal::from(695_700)),
        distance_ly: None,
        discovered_on: None,
        description: None,
        image_url: None,
    }
}

#[tokio::test]
async fn update_overwrites_nullable_columns_with_null() {
    let Some(pool) = test_pool().await else { return };
    let tag = tag();
    let city = Repository::<City>::new(pool.clone())
        .add(&NewCity {
            name: "Hilo".to_string(),
            country: format!("USA {tag}"),
        })
        .await
        .unwrap();
    let addresses = Repository::<Address>::new(pool.clone());

    let created = addresses
        .add(&NewAddress {
            street: "640 N A'ohoku Pl".to_string(),
            postal_code: Some("96720".to_string()),
            city_id: city.id,
        })
        .await
        .unwrap();
    addresses
        .update(
            created.id,
            &NewAddress {
                street: "640 N A'ohoku Pl".to_string(),
                postal_code: None,
                city_id: city.id,
            },
        )
        .await
        .unwrap();
    assert_eq!(addresses.get_by_id(created.id).await.unwrap().postal_code, None);

    let bodies = Repository::<CelestialBody>::new(pool);
    let sun = bodies.add(&body(format!("Sol {tag}"), "star")).await.unwrap();
    assert_eq!(sun.radius_km, Some(BigDecimal::from(695_700)));
    let cleared = bodies
        .update(
            sun.id,
            &NewCelestialBody {
                radius_km: None,
                ..body(format!("Sol {tag}"), "star")
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.radius_km, None);
    assert_eq!(bodies.get_by_id(sun.id).await.unwrap(), cleared);
}

#[tokio::test]
async fn star_detail_includes_body_and_planets() {
    let Some(pool) = test_pool().await else { return };
    let tag = tag();
    let bodies = Repository::<CelestialBody>::new(pool.clone());
    let star_body = bodies.add(&body(format!("Kepler-22 {tag}"), "star")).await.unwrap();
    let star = Repository::<Star>::new(pool.clone())
        .add(&NewStar {
            celestial_body_id: star_body.id,
            spectral_type: "G5V".to_string(),
            temperature_k: BigDecimal::from(5518),
            luminosity_solar: None,
        })
        .await
        .unwrap();

    let planets = Repository::<Planet>::new(pool.clone());
    let mut expected = Vec::new();
    for suffix in ["b", "c"] {
        let planet_body = bodies
            .add(&body(format!("Kepler-22{suffix} {tag}"), "planet"))
            .await
            .unwrap();
        let planet = planets
            .add(&NewPlanet {
                celestial_body_id: planet_body.id,
                star_id: Some(star.id),
                orbital_period_days: None,
                is_habitable: suffix == "b",
            })
            .await
            .unwrap();
        expected.push(planet);
    }

    let detail = Repository::<Star>::new(pool).get_detailed(star.id).await.unwrap();

    assert_eq!(detail.star, star);
    assert_eq!(detail.body, star_body);
    assert_eq!(detail.planets, expected);
}

#[tokio::test]
async fn planet_detail_lists_satellites_by_id() {
    let Some(pool) = test_pool().await else { return };
    let tag = tag();
    let bodies = Repository::<CelestialBody>::new(pool.clone());
    let planet_body = bodies.add(&body(format!("Mars {tag}"), "planet")).await.unwrap();
    let planet = Repository::<Planet>::new(pool.clone())
        .add(&NewPlanet {
            celestial_body_id: planet_body.id,
            star_id: None,
            orbital_period_days: Some(BigDecimal::from(687)),
            is_habitable: false,
        })
        .await
        .unwrap();

    let satellites = Repository::<Satellite>::new(pool.clone());
    let mut expected = Vec::new();
    for moon in ["Phobos", "Deimos"] {
        let moon_body = bodies
            .add(&body(format!("{moon} {tag}"), "satellite"))
            .await
            .unwrap();
        let satellite = satellites
            .add(&NewSatellite {
                celestial_body_id: moon_body.id,
                planet_id: planet.id,
                orbital_period_days: None,
            })
            .await
            .unwrap();
        expected.push(satellite);
    }

    let detail = Repository::<Planet>::new(pool)
        .get_detailed(planet.id)
        .await
        .unwrap();

    assert_eq!(detail.star, None);
    assert_eq!(detail.satellites, expected);
}

#[tokio::test]
async fn article_detail_includes_author_and_comments() {
    let Some(pool) = test_pool().await else { return };
    let tag = tag();
    let author = auth_service(&pool)
        .register(registration(&tag))
        .await
        .unwrap()
        .user;
    let article = Repository::<Article>::new(pool.clone())
        .add(&NewArticle {
            author_id: author.id,
            celestial_body_id: None,
            title: format!("Transit timing {tag}"),
            content: "Residuals suggest a third body.".to_string(),
            status: "pending".to_string(),
            published_at: None,
        })
        .await
        .unwrap();

    let comments = Repository::<Comment>::new(pool.clone());
    let mut expected = Vec::new();
    for text in ["Which baseline?", "TESS sectors 14-26"] {
        let comment = comments
            .add(&NewComment {
                article_id: article.id,
                author_id: author.id,
                content: text.to_string(),
            })
            .await
            .unwrap();
        expected.push(comment);
    }

    let detail = Repository::<Article>::new(pool)
        .get_detailed(article.id)
        .await
        .unwrap();

    assert_eq!(detail.article, article);
    assert_eq!(detail.author.id, author.id);
    assert_eq!(detail.comments, expected);
}

#[tokio::test]
async fn missing_row_has_no_detail() {
    let Some(pool) = test_pool().await else { return };

    let result = Repository::<Star>::new(pool).get_detailed(i32::MAX).await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn deleting_a_referenced_city_is_a_conflict() {
    let Some(pool) = test_pool().await else { return };
    let cities = Repository::<City>::new(pool.clone());
    let city = cities
        .add(&NewCity {
            name: "La Serena".to_string(),
            country: format!("Chile {}", tag()),
        })
        .await
        .unwrap();
    Repository::<Address>::new(pool)
        .add(&NewAddress {
            street: "Colina El Pino".to_string(),
            postal_code: None,
            city_id: city.id,
        })
        .await
        .unwrap();

    let result = cities.delete(city.id).await;

    match result {
        Err(AppError::StillReferenced {
            entity,
            referenced_by,
        }) => {
            assert_eq!(entity, "cities");
            assert_eq!(referenced_by, "addresses");
        }
        other => panic!("expected StillReferenced, got {other:?}"),
    }
    assert!(cities.get_by_id(city.id).await.is_ok());
}
