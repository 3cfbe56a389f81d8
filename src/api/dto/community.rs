//! Cities, addresses, events and discoveries.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{
    Address, City, Discovery, Event, EventParticipant, NewAddress, NewCity, NewEvent,
};
use crate::repositories::{AddressDetail, CityDetail, EventDetail};
use crate::services::ApprovedDiscovery;

use super::CelestialBodyResponse;

// ============================================================================
// Cities and addresses
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CityRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "La Serena")]
    pub name: String,
    #[validate(length(min = 2, max = 100, message = "Country must be between 2 and 100 characters"))]
    #[schema(example = "Chile")]
    pub country: String,
}

impl From<CityRequest> for NewCity {
    fn from(request: CityRequest) -> Self {
        Self {
            name: request.name,
            country: request.country,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CityResponse {
    pub id: i32,
    pub name: String,
    pub country: String,
}

impl From<City> for CityResponse {
    fn from(city: City) -> Self {
        Self {
            id: city.id,
            name: city.name,
            country: city.country,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CityDetailResponse {
    #[serde(flatten)]
    pub city: CityResponse,
    pub addresses: Vec<AddressResponse>,
}

impl From<CityDetail> for CityDetailResponse {
    fn from(detail: CityDetail) -> Self {
        Self {
            city: detail.city.into(),
            addresses: detail.addresses.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddressRequest {
    #[validate(length(min = 1, max = 200, message = "Street must be between 1 and 200 characters"))]
    pub street: String,
    #[validate(length(max = 20, message = "Postal code must be at most 20 characters"))]
    pub postal_code: Option<String>,
    #[validate(range(min = 1, message = "city_id must be positive"))]
    pub city_id: i32,
}

impl From<AddressRequest> for NewAddress {
    fn from(request: AddressRequest) -> Self {
        Self {
            street: request.street,
            postal_code: request.postal_code,
            city_id: request.city_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub id: i32,
    pub street: String,
    pub postal_code: Option<String>,
    pub city_id: i32,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            street: address.street,
            postal_code: address.postal_code,
            city_id: address.city_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddressDetailResponse {
    #[serde(flatten)]
    pub address: AddressResponse,
    pub city: CityResponse,
}

impl From<AddressDetail> for AddressDetailResponse {
    fn from(detail: AddressDetail) -> Self {
        Self {
            address: detail.address.into(),
            city: detail.city.into(),
        }
    }
}

// ============================================================================
// Events
// ============================================================================

fn validate_event_window(request: &EventRequest) -> Result<(), ValidationError> {
    match request.ends_at {
        Some(ends_at) if ends_at < request.starts_at => {
            let mut error = ValidationError::new("ends_at");
            error.message = Some("Event cannot end before it starts".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[validate(schema(function = "validate_event_window", skip_on_field_errors = false))]
pub struct EventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[schema(example = "Total lunar eclipse watch")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "2026-03-03T09:30:00")]
    pub starts_at: NaiveDateTime,
    pub ends_at: Option<NaiveDateTime>,
    pub address_id: Option<i32>,
    pub celestial_body_id: Option<i32>,
}

impl From<EventRequest> for NewEvent {
    fn from(request: EventRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            address_id: request.address_id,
            celestial_body_id: request.celestial_body_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: NaiveDateTime,
    pub ends_at: Option<NaiveDateTime>,
    pub address_id: Option<i32>,
    pub celestial_body_id: Option<i32>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            address_id: event.address_id,
            celestial_body_id: event.celestial_body_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub address: Option<AddressResponse>,
    pub participant_ids: Vec<i32>,
}

impl From<EventDetail> for EventDetailResponse {
    fn from(detail: EventDetail) -> Self {
        Self {
            event: detail.event.into(),
            address: detail.address.map(Into::into),
            participant_ids: detail.participant_ids,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantResponse {
    pub event_id: i32,
    pub user_id: i32,
    pub joined_at: NaiveDateTime,
}

impl From<EventParticipant> for ParticipantResponse {
    fn from(participant: EventParticipant) -> Self {
        Self {
            event_id: participant.event_id,
            user_id: participant.user_id,
            joined_at: participant.joined_at,
        }
    }
}

// ============================================================================
// Discoveries
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DiscoveryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "C/2026 A1")]
    pub name: String,
    #[validate(length(min = 1, max = 30, message = "Body type must be between 1 and 30 characters"))]
    #[schema(example = "comet")]
    pub body_type: String,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: String,
    pub discovered_on: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiscoveryResponse {
    pub id: i32,
    pub discoverer_id: i32,
    pub name: String,
    pub body_type: String,
    pub description: String,
    pub discovered_on: NaiveDate,
    /// `pending`, `approved` or `rejected`
    pub status: String,
    /// Catalog entry created on approval
    pub celestial_body_id: Option<i32>,
}

impl From<Discovery> for DiscoveryResponse {
    fn from(discovery: Discovery) -> Self {
        Self {
            id: discovery.id,
            discoverer_id: discovery.discoverer_id,
            name: discovery.name,
            body_type: discovery.body_type,
            description: discovery.description,
            discovered_on: discovery.discovered_on,
            status: discovery.status,
            celestial_body_id: discovery.celestial_body_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovedDiscoveryResponse {
    pub discovery: DiscoveryResponse,
    pub celestial_body: CelestialBodyResponse,
}

impl From<ApprovedDiscovery> for ApprovedDiscoveryResponse {
    fn from(approved: ApprovedDiscovery) -> Self {
        Self {
            discovery: approved.discovery.into(),
            celestial_body: approved.body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(starts_at: &str, ends_at: Option<&str>) -> EventRequest {
        EventRequest {
            title: "Meteor night".to_string(),
            description: None,
            starts_at: starts_at.parse().unwrap(),
            ends_at: ends_at.map(|s| s.parse().unwrap()),
            address_id: None,
            celestial_body_id: None,
        }
    }

    #[test]
    fn event_may_not_end_before_it_starts() {
        assert!(event("2026-08-12T22:00:00", Some("2026-08-13T03:00:00")).validate().is_ok());
        assert!(event("2026-08-12T22:00:00", None).validate().is_ok());
        assert!(event("2026-08-12T22:00:00", Some("2026-08-12T21:00:00")).validate().is_err());
    }

    #[test]
    fn city_detail_nests_addresses() {
        let detail = CityDetail {
            city: City {
                id: 1,
                name: "La Serena".to_string(),
                country: "Chile".to_string(),
            },
            addresses: vec![Address {
                id: 7,
                street: "Av. Juan Cisternas 1200".to_string(),
                postal_code: None,
                city_id: 1,
            }],
        };

        let json = serde_json::to_value(CityDetailResponse::from(detail)).unwrap();
        assert_eq!(json["name"], "La Serena");
        assert_eq!(json["addresses"][0]["id"], 7);
    }
}
