use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A pet for sale
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub photo_urls: Vec<String>,
    pub price: Decimal,
    pub born_at: DateTime<Utc>,
    pub status: Status,
    pub tags: Option<Vec<Tag>>,
    pub litter_sizes: Vec<Vec<u32>>,
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Available,
    Pending,
    Sold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct NewPet {
    pub name: String,
    #[serde(default)]
    pub status: Option<Status>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error_code: i32,
    pub message: String,
    #[serde(skip)]
    pub source: Option<String>,
}
