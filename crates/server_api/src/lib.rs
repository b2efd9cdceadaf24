pub mod identity;

use catalog::OrderCatalog;
use query::{run_query, QueryError, QueryState};
use serde::{Deserialize, Serialize};
use shared::{
    domain::StatusStyles,
    error::{ApiError, ApiException},
    protocol::{
        DashboardView, LandingView, NavItem, NotFoundView, OrderRow, OrdersView, SessionProfile,
        StatCard, DASHBOARD_PATH, ORDERS_PATH, SIGN_IN_PATH,
    },
};
use tracing::debug;

const FALLBACK_NAME: &str = "User";
const FALLBACK_INITIAL: &str = "U";

#[derive(Clone)]
pub struct ApiContext {
    pub catalog: OrderCatalog,
    pub styles: StatusStyles,
}

/// Raw orders-page parameters as they arrive in a query string.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OrdersQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl OrdersQuery {
    pub fn to_state(&self) -> Result<QueryState, QueryError> {
        QueryState::parse(
            self.search.as_deref(),
            self.status.as_deref(),
            self.sort.as_deref(),
            self.direction.as_deref(),
        )
    }
}

pub fn list_orders(ctx: &ApiContext, params: &OrdersQuery) -> Result<OrdersView, ApiError> {
    let state = params.to_state().map_err(validation)?;
    Ok(orders_view(ctx, &state))
}

pub fn orders_view(ctx: &ApiContext, state: &QueryState) -> OrdersView {
    let outcome = run_query(ctx.catalog.orders(), state);
    debug!(
        shown = outcome.shown(),
        total = outcome.total,
        sort = state.sort_field.name(),
        direction = state.sort_direction.name(),
        "orders query"
    );
    OrdersView {
        orders: outcome
            .orders
            .iter()
            .map(|order| OrderRow::new(order, ctx.styles.badge(order.status)))
            .collect(),
        shown: outcome.shown(),
        total: outcome.total,
        caption: outcome.caption(),
        status_counts: outcome.status_counts,
        query: state.applied(),
    }
}

pub fn dashboard_overview(
    ctx: &ApiContext,
    profile: Option<&SessionProfile>,
    current_path: &str,
) -> DashboardView {
    let name = profile.and_then(|profile| profile.name.as_deref());
    let orders = ctx.catalog.orders();
    let active = orders.iter().filter(|order| order.status.is_active()).count();
    let pizzas: u64 = orders.iter().map(|order| u64::from(order.quantity)).sum();

    DashboardView {
        greeting: format!("Hello, {}!", first_name(name)),
        avatar_initial: avatar_initial(name),
        avatar_url: profile.and_then(|profile| profile.image.clone()),
        stats: vec![
            StatCard {
                title: "Total Orders".into(),
                value: orders.len().to_string(),
                description: "All orders on record".into(),
            },
            StatCard {
                title: "Active Orders".into(),
                value: active.to_string(),
                description: "Pending, preparing or out for delivery".into(),
            },
            StatCard {
                title: "Pizzas Ordered".into(),
                value: pizzas.to_string(),
                description: "Across all orders".into(),
            },
        ],
        navigation: navigation(current_path),
    }
}

pub fn navigation(current_path: &str) -> Vec<NavItem> {
    [("Dashboard", DASHBOARD_PATH), ("Pizza Orders", ORDERS_PATH)]
        .into_iter()
        .map(|(name, href)| NavItem {
            name: name.into(),
            href: href.into(),
            active: current_path == href,
        })
        .collect()
}

pub fn landing() -> LandingView {
    LandingView {
        title: "Pizza Orders Dashboard".into(),
        sign_in_url: SIGN_IN_PATH.into(),
    }
}

pub fn not_found(path: &str, home_url: &str) -> NotFoundView {
    NotFoundView {
        path: path.into(),
        message: "The page you are looking for does not exist.".into(),
        home_url: home_url.into(),
    }
}

pub fn first_name(name: Option<&str>) -> &str {
    name.and_then(|name| name.split_whitespace().next())
        .unwrap_or(FALLBACK_NAME)
}

pub fn avatar_initial(name: Option<&str>) -> String {
    name.and_then(|name| name.trim().chars().next())
        .map(String::from)
        .unwrap_or_else(|| FALLBACK_INITIAL.to_string())
}

fn validation(error: QueryError) -> ApiError {
    match error {
        QueryError::Invalid(unknown) => ApiException::from(unknown).into(),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
