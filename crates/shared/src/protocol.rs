use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Order, OrderId, OrderStatus, SortDirection, SortField, StatusFilter};

pub const LANDING_PATH: &str = "/";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const ORDERS_PATH: &str = "/dashboard/orders";
pub const SIGN_IN_PATH: &str = "/api/auth/signin";
pub const SIGN_OUT_PATH: &str = "/api/auth/signout";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRow {
    pub id: OrderId,
    pub customer_name: String,
    pub pizza_type: String,
    pub quantity: u32,
    #[serde(with = "crate::domain::order_date")]
    pub order_date: NaiveDateTime,
    pub status: OrderStatus,
    pub badge: String,
}

impl OrderRow {
    pub fn new(order: &Order, badge: impl Into<String>) -> Self {
        Self {
            id: order.id.clone(),
            customer_name: order.customer_name.clone(),
            pizza_type: order.pizza_type.clone(),
            quantity: order.quantity,
            order_date: order.order_date,
            status: order.status,
            badge: badge.into(),
        }
    }
}

/// Query parameters as they were applied, echoed back so a client can re-render its controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedQuery {
    pub search_term: String,
    pub status_filter: StatusFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersView {
    pub orders: Vec<OrderRow>,
    pub status_counts: BTreeMap<OrderStatus, usize>,
    pub shown: usize,
    pub total: usize,
    pub caption: String,
    pub query: AppliedQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub name: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub greeting: String,
    pub avatar_initial: String,
    pub avatar_url: Option<String>,
    pub stats: Vec<StatCard>,
    pub navigation: Vec<NavItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingView {
    pub title: String,
    pub sign_in_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundView {
    pub path: String,
    pub message: String,
    pub home_url: String,
}
