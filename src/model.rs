use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// Budget bracket offered by the intake form. Each bracket maps to a single
/// representative amount on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetBracket {
    #[serde(rename = "economy")]
    Economy,
    #[serde(rename = "standard_1")]
    Standard1,
    #[serde(rename = "standard_2")]
    Standard2,
    #[serde(rename = "luxury")]
    Luxury,
}

impl BudgetBracket {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetBracket::Economy => "economy",
            BudgetBracket::Standard1 => "standard_1",
            BudgetBracket::Standard2 => "standard_2",
            BudgetBracket::Luxury => "luxury",
        }
    }

    /// Representative amount in rubles sent to the booking endpoint.
    pub fn amount(&self) -> u64 {
        match self {
            BudgetBracket::Economy => 100_000,
            BudgetBracket::Standard1 => 250_000,
            BudgetBracket::Standard2 => 500_000,
            BudgetBracket::Luxury => 1_000_000,
        }
    }
}

impl FromStr for BudgetBracket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "economy" => Ok(BudgetBracket::Economy),
            "standard_1" => Ok(BudgetBracket::Standard1),
            "standard_2" => Ok(BudgetBracket::Standard2),
            "luxury" => Ok(BudgetBracket::Luxury),
            other => Err(format!("unknown budget bracket: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRecord {
    pub id: i64,
    pub customer: Customer,
    #[serde(default)]
    pub description: String,
    #[serde(with = "date_only")]
    pub date_start: NaiveDate,
    #[serde(with = "date_only")]
    pub date_end: NaiveDate,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub adult_count: u32,
    #[serde(default)]
    pub children_count: u32,
    #[serde(default)]
    pub children_ages: Vec<u8>,
    #[serde(default)]
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourOffer {
    pub id: i64,
    pub title: String,
    pub hotel: String,
    pub price: i64,
    #[serde(default)]
    pub description: String,
    #[serde(with = "date_only")]
    pub start_date: NaiveDate,
    #[serde(with = "date_only")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Public catalog row returned by the web tour-offers endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub min_price: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompanyInfo {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    // Wire name as the backend spells it.
    #[serde(default, rename = "telagramm_link")]
    pub telegram_link: String,
    #[serde(default)]
    pub instagram_link: String,
    #[serde(default)]
    pub whatsapp_link: String,
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    pub total_count: u64,
}

/// (De)serialize `NaiveDate` from either a plain date or a datetime string;
/// the backend mixes both shapes for the same fields.
pub mod date_only {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(de)?;
        let date_part = raw.split('T').next().unwrap_or(&raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(serde::de::Error::custom)
    }
}
