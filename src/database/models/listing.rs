use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserPublic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Studio,
    Townhouse,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Condo => "condo",
            PropertyType::Studio => "studio",
            PropertyType::Townhouse => "townhouse",
        }
    }
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apartment" => Ok(PropertyType::Apartment),
            "house" => Ok(PropertyType::House),
            "condo" => Ok(PropertyType::Condo),
            "studio" => Ok(PropertyType::Studio),
            "townhouse" => Ok(PropertyType::Townhouse),
            other => Err(format!("unknown property type: {}", other)),
        }
    }
}

/// Listing row as stored: location fields are flattened columns. The nested
/// `location` object clients see is reconstructed at the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: Option<String>,
    pub price: i64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: i32,
    pub property_type: PropertyType,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

/// API shape for a listing: nested location plus the owner's public contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPublic {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Location,
    pub price: i64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: i32,
    pub property_type: PropertyType,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub available: bool,
    pub landlord: UserPublic,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListingPublic {
    pub fn from_row(listing: Listing, landlord: UserPublic) -> Self {
        Self {
            id: listing.id,
            title: listing.title,
            description: listing.description,
            location: Location {
                address: listing.address,
                city: listing.city,
                state: listing.state,
                zip_code: listing.zip_code,
            },
            price: listing.price,
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            area: listing.area,
            property_type: listing.property_type,
            amenities: listing.amenities,
            images: listing.images,
            available: listing.available,
            landlord,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}

/// Compact listing projection embedded in appointment details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: Uuid,
    pub title: String,
    pub location: Location,
    pub price: i64,
    pub images: Vec<String>,
}

impl From<&Listing> for ListingSummary {
    fn from(l: &Listing) -> Self {
        Self {
            id: l.id,
            title: l.title.clone(),
            location: Location {
                address: l.address.clone(),
                city: l.city.clone(),
                state: l.state.clone(),
                zip_code: l.zip_code.clone(),
            },
            price: l.price,
            images: l.images.clone(),
        }
    }
}

/// Creation payload. Arrives with the nested location clients use.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub location: Location,
    pub price: i64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: i32,
    pub property_type: PropertyType,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Partial update; absent fields are left untouched. Ownership is immutable
/// and images are managed through the dedicated image routes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub price: Option<i64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<i32>,
    pub property_type: Option<PropertyType>,
    pub amenities: Option<Vec<String>>,
    pub available: Option<bool>,
}

/// Conjunctive search filter. Free-text fields match case-insensitively by
/// substring; `location` matches any of address/city/state and `search` any of
/// title/description/address/city.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilter {
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_bedrooms: Option<i32>,
    pub max_bedrooms: Option<i32>,
    pub property_type: Option<PropertyType>,
    pub available: Option<bool>,
    pub search: Option<String>,
}
