use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format orders are rendered with on the wire and in the seed set.
pub const ORDER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const ACCEPTED_DATE_FORMATS: [&str; 3] = [ORDER_DATE_FORMAT, "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Raised when a query or config value names something that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Declared in lifecycle order, which is also the iteration order of status counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Preparing,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    fn ident(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Orders still moving through the kitchen or on the road.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Preparing | OrderStatus::OutForDelivery
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.label() == raw || status.ident() == raw)
            .ok_or_else(|| UnknownValue::new("order status", raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub pizza_type: String,
    pub quantity: u32,
    #[serde(with = "order_date")]
    pub order_date: NaiveDateTime,
    pub status: OrderStatus,
}

/// Parses the timestamp shapes the order feed is known to carry.
///
/// RFC 3339 values are normalized to UTC before the offset is dropped.
pub fn parse_order_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ACCEPTED_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|parsed| parsed.naive_utc())
        })
}

pub fn format_order_date(value: &NaiveDateTime) -> String {
    value.format(ORDER_DATE_FORMAT).to_string()
}

pub mod order_date {
    use chrono::NaiveDateTime;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_order_date(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_order_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid order date '{raw}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "customerName")]
    CustomerName,
    #[serde(rename = "orderDate")]
    OrderDate,
    #[serde(rename = "status")]
    Status,
}

impl SortField {
    pub fn name(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::CustomerName => "customerName",
            SortField::OrderDate => "orderDate",
            SortField::Status => "status",
        }
    }
}

impl FromStr for SortField {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "id" => Ok(SortField::Id),
            "customerName" | "customer_name" => Ok(SortField::CustomerName),
            "orderDate" | "order_date" => Ok(SortField::OrderDate),
            "status" => Ok(SortField::Status),
            _ => Err(UnknownValue::new("sort field", raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(UnknownValue::new("sort direction", raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn admits(self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.label(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw == "all" {
            return Ok(StatusFilter::All);
        }
        raw.parse::<OrderStatus>()
            .map(StatusFilter::Only)
            .map_err(|_| UnknownValue::new("status filter", raw))
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Badge style per status, supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusStyles(BTreeMap<OrderStatus, String>);

impl Default for StatusStyles {
    fn default() -> Self {
        Self(BTreeMap::from([
            (
                OrderStatus::Pending,
                "bg-yellow-100 text-yellow-800 border-yellow-200".to_string(),
            ),
            (
                OrderStatus::Preparing,
                "bg-blue-100 text-blue-800 border-blue-200".to_string(),
            ),
            (
                OrderStatus::OutForDelivery,
                "bg-orange-100 text-orange-800 border-orange-200".to_string(),
            ),
            (
                OrderStatus::Delivered,
                "bg-green-100 text-green-800 border-green-200".to_string(),
            ),
            (
                OrderStatus::Cancelled,
                "bg-red-100 text-red-800 border-red-200".to_string(),
            ),
        ]))
    }
}

impl StatusStyles {
    pub fn badge(&self, status: OrderStatus) -> &str {
        self.0.get(&status).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, status: OrderStatus, style: impl Into<String>) {
        self.0.insert(status, style.into());
    }

    /// Applies overrides keyed by status label or snake_case identifier.
    pub fn apply_overrides<'a>(
        &mut self,
        overrides: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), UnknownValue> {
        for (key, style) in overrides {
            let status = key.parse::<OrderStatus>()?;
            self.set(status, style);
        }
        Ok(())
    }
}
