//! Entity type discriminator and item status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which catalog a record belongs to.
///
/// The metadata tables are shared between catalogs; every query is scoped by
/// this discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Equipment,
    Consumables,
}

impl EntityType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equipment => "equipment",
            Self::Consumables => "consumables",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equipment" => Ok(Self::Equipment),
            "consumables" => Ok(Self::Consumables),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

/// Publication status of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Active,
    Discontinued,
    #[default]
    Draft,
}

impl ItemStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Discontinued => "discontinued",
            Self::Draft => "draft",
        }
    }
}
