//! Catalog records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Moderator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Moderator => "moderator",
        }
    }
}

/// Lifecycle status shared by all record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
    Pending,
    Completed,
    Processing,
    Cancelled,
}

/// Registered member as listed in the users section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct Member {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: Status,
    /// Registration date
    pub created: NaiveDate,
}

impl Member {
    pub(crate) fn matches(&self, term: &str) -> bool {
        contains(&self.name, term) || contains(&self.email, term) || contains(self.role.as_str(), term)
    }
}

/// Member creation form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::InputObject))]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    /// Unit price in minor currency units
    pub price: u64,
    pub stock: u32,
    pub status: Status,
    /// Thumbnail url
    pub image: String,
}

impl Product {
    pub(crate) fn matches(&self, term: &str) -> bool {
        contains(&self.name, term) || contains(&self.category, term)
    }
}

/// Product creation form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::InputObject))]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: u64,
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct Order {
    /// Order number, eg. `ORD-001`
    pub id: String,
    pub customer: String,
    /// Ordered products summary
    pub products: String,
    pub total: u64,
    pub status: Status,
    pub date: NaiveDate,
}

impl Order {
    pub(crate) fn matches(&self, term: &str) -> bool {
        contains(&self.id, term) || contains(&self.customer, term) || contains(&self.products, term)
    }
}

/// Case-insensitive substring check, `term` is expected to be lowercase already
fn contains(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}
