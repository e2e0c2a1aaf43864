use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub num_star: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOwner {
    pub region_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceProfile {
    pub user: ServiceOwner,
}

/// A service listing as returned by the catalog API. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: u64,
    pub category_id: u64,
    pub title: String,
    pub desc: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub rates: Vec<Rate>,
    pub profile: ServiceProfile,
}

impl Service {
    /// Mean of `rates[].num_star`; a service nobody rated scores 0.
    pub fn mean_rating(&self) -> f64 {
        if self.rates.is_empty() {
            return 0.0;
        }
        let total: u32 = self.rates.iter().map(|rate| u32::from(rate.num_star)).sum();
        f64::from(total) / self.rates.len() as f64
    }

    pub fn region_id(&self) -> u32 {
        self.profile.user.region_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

/// Fetched services and categories, the input of every discovery derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub services: Vec<Service>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Governorate {
    pub id: &'static str,
    pub name: &'static str,
}

pub const ALL_GOVERNORATES: &str = "all";

/// Region filter options. Ids match `profile.user.region_id` on services.
pub const GOVERNORATES: [Governorate; 15] = [
    Governorate { id: ALL_GOVERNORATES, name: "All governorates" },
    Governorate { id: "1", name: "Damascus" },
    Governorate { id: "2", name: "Aleppo" },
    Governorate { id: "3", name: "Homs" },
    Governorate { id: "4", name: "Hama" },
    Governorate { id: "5", name: "Latakia" },
    Governorate { id: "6", name: "Tartus" },
    Governorate { id: "7", name: "Deir ez-Zor" },
    Governorate { id: "8", name: "Raqqa" },
    Governorate { id: "9", name: "Al-Hasakah" },
    Governorate { id: "10", name: "Daraa" },
    Governorate { id: "11", name: "Idlib" },
    Governorate { id: "12", name: "As-Suwayda" },
    Governorate { id: "13", name: "Quneitra" },
    Governorate { id: "14", name: "Rif Dimashq" },
];

/// Governorate choices offered by the registration address step.
pub const REGISTRATION_GOVERNORATES: [Governorate; 14] = [
    Governorate { id: "damascus", name: "Damascus" },
    Governorate { id: "aleppo", name: "Aleppo" },
    Governorate { id: "homs", name: "Homs" },
    Governorate { id: "latakia", name: "Latakia" },
    Governorate { id: "hama", name: "Hama" },
    Governorate { id: "tartus", name: "Tartus" },
    Governorate { id: "daraa", name: "Daraa" },
    Governorate { id: "idlib", name: "Idlib" },
    Governorate { id: "alhasakah", name: "Al-Hasakah" },
    Governorate { id: "deirezzor", name: "Deir ez-Zor" },
    Governorate { id: "raqqa", name: "Raqqa" },
    Governorate { id: "suwayda", name: "As-Suwayda" },
    Governorate { id: "quneitra", name: "Quneitra" },
    Governorate { id: "damascusCountryside", name: "Rif Dimashq" },
];

pub fn find_governorate(id: &str) -> Option<&'static Governorate> {
    GOVERNORATES.iter().find(|gov| gov.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Provider,
    Customer,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Provider => "provider",
            UserType::Customer => "customer",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provider" => Ok(UserType::Provider),
            "customer" => Ok(UserType::Customer),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

/// Everything the registration wizard collects, across all three steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationFormData {
    pub user_type: Option<UserType>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// `data:` URL of the chosen avatar.
    pub profile_image: Option<String>,
    pub governorate: String,
    pub city: String,
    pub street: String,
    pub detailed_address: String,
}

impl RegistrationFormData {
    /// Avatar placeholder shown while no profile image is chosen.
    pub fn initials(&self) -> Option<String> {
        let first = self.first_name.chars().next()?;
        let last = self.last_name.chars().next()?;
        Some(format!("{}{}", first, last))
    }
}

/// A user record from the users API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub status: String,
    pub role_id: u64,
    pub region_id: u32,
    pub city: String,
    pub street: String,
    pub image: Option<String>,
    pub address: String,
    pub email: String,
    pub email_verified_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
