//! Search, filter and sort over an order collection.
//!
//! Everything here is a pure function of its inputs: the collection is never
//! mutated and each call recomputes the view from scratch.

use std::{cmp::Ordering, collections::BTreeMap};

use chrono::NaiveDateTime;
use shared::{
    domain::{Order, OrderStatus, SortDirection, SortField, StatusFilter, UnknownValue},
    protocol::AppliedQuery,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Invalid(#[from] UnknownValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_term: String,
    pub status_filter: StatusFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            status_filter: StatusFilter::All,
            sort_field: SortField::OrderDate,
            sort_direction: SortDirection::Desc,
        }
    }
}

impl QueryState {
    /// Builds a state from raw boundary parameters; absent values keep their defaults.
    pub fn parse(
        search: Option<&str>,
        status: Option<&str>,
        sort: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Self, QueryError> {
        let mut state = Self::default();
        if let Some(search) = search {
            state.search_term = search.to_string();
        }
        if let Some(status) = status {
            state.status_filter = status.parse()?;
        }
        if let Some(sort) = sort {
            state.sort_field = sort.parse()?;
        }
        if let Some(direction) = direction {
            state.sort_direction = direction.parse()?;
        }
        Ok(state)
    }

    /// Header-click semantics: same field flips direction, a new field starts ascending.
    pub fn sort_by(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.reversed();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }

    pub fn applied(&self) -> AppliedQuery {
        AppliedQuery {
            search_term: self.search_term.clone(),
            status_filter: self.status_filter,
            sort_field: self.sort_field,
            sort_direction: self.sort_direction,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryOutcome<'a> {
    pub orders: Vec<&'a Order>,
    pub status_counts: BTreeMap<OrderStatus, usize>,
    pub total: usize,
}

impl QueryOutcome<'_> {
    pub fn shown(&self) -> usize {
        self.orders.len()
    }

    pub fn caption(&self) -> String {
        if self.shown() == self.total {
            "All orders".to_string()
        } else {
            format!("Showing {} of {} orders", self.shown(), self.total)
        }
    }
}

pub fn run_query<'a>(orders: &'a [Order], state: &QueryState) -> QueryOutcome<'a> {
    let needle = state.search_term.to_lowercase();
    let mut keyed: Vec<(SortKey, &Order)> = orders
        .iter()
        .filter(|order| state.status_filter.admits(order.status))
        .filter(|order| matches_search(order, &needle))
        .map(|order| (SortKey::of(order, state.sort_field), order))
        .collect();

    // sort_by is stable, so equal keys keep collection order in both directions.
    keyed.sort_by(|(a, _), (b, _)| match state.sort_direction {
        SortDirection::Asc => a.cmp(b),
        SortDirection::Desc => b.cmp(a),
    });

    QueryOutcome {
        orders: keyed.into_iter().map(|(_, order)| order).collect(),
        status_counts: status_counts(orders),
        total: orders.len(),
    }
}

/// Counts over the whole collection, with every status present.
pub fn status_counts(orders: &[Order]) -> BTreeMap<OrderStatus, usize> {
    let mut counts: BTreeMap<OrderStatus, usize> =
        OrderStatus::ALL.into_iter().map(|status| (status, 0)).collect();
    for order in orders {
        *counts.entry(order.status).or_default() += 1;
    }
    counts
}

/// `needle` must already be lowercased.
fn matches_search(order: &Order, needle: &str) -> bool {
    needle.is_empty()
        || order.id.as_str().to_lowercase().contains(needle)
        || order.customer_name.to_lowercase().contains(needle)
        || order.pizza_type.to_lowercase().contains(needle)
}

pub fn compare_orders(a: &Order, b: &Order, field: SortField) -> Ordering {
    SortKey::of(a, field).cmp(&SortKey::of(b, field))
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Date(NaiveDateTime),
    Text(String),
}

impl SortKey {
    fn of(order: &Order, field: SortField) -> Self {
        match field {
            SortField::OrderDate => SortKey::Date(order.order_date),
            SortField::Id => SortKey::Text(order.id.as_str().to_lowercase()),
            SortField::CustomerName => SortKey::Text(order.customer_name.to_lowercase()),
            SortField::Status => SortKey::Text(order.status.label().to_lowercase()),
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
