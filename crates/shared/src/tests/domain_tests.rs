use crate::domain::*;
use crate::error::{ApiError, ApiException, ErrorCode};

#[test]
fn status_parses_from_label_and_identifier() {
    assert_eq!(
        "Out for Delivery".parse::<OrderStatus>().expect("label"),
        OrderStatus::OutForDelivery
    );
    assert_eq!(
        "out_for_delivery".parse::<OrderStatus>().expect("ident"),
        OrderStatus::OutForDelivery
    );
    assert!("out for delivery".parse::<OrderStatus>().is_err());
}

#[test]
fn status_serializes_by_label() {
    let json = serde_json::to_string(&OrderStatus::OutForDelivery).expect("json");
    assert_eq!(json, "\"Out for Delivery\"");
}

#[test]
fn active_statuses_exclude_terminal_ones() {
    let active: Vec<_> = OrderStatus::ALL
        .into_iter()
        .filter(|status| status.is_active())
        .collect();
    assert_eq!(
        active,
        vec![
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::OutForDelivery
        ]
    );
}

#[test]
fn status_filter_rejects_unknown_values() {
    assert_eq!("all".parse::<StatusFilter>().expect("all"), StatusFilter::All);
    assert_eq!(
        "Preparing".parse::<StatusFilter>().expect("preparing"),
        StatusFilter::Only(OrderStatus::Preparing)
    );
    let err = "Burnt".parse::<StatusFilter>().expect_err("unknown");
    assert_eq!(err.kind, "status filter");
    assert_eq!(err.value, "Burnt");
}

#[test]
fn sort_field_accepts_camel_and_snake_case() {
    assert_eq!(
        "customerName".parse::<SortField>().expect("camel"),
        SortField::CustomerName
    );
    assert_eq!(
        "order_date".parse::<SortField>().expect("snake"),
        SortField::OrderDate
    );
    assert!("pizzaType".parse::<SortField>().is_err());
    assert!("up".parse::<SortDirection>().is_err());
}

#[test]
fn order_dates_parse_in_known_shapes() {
    let plain = parse_order_date("2024-01-15 14:30").expect("plain");
    assert_eq!(format_order_date(&plain), "2024-01-15 14:30");

    let rfc = parse_order_date("2024-01-15T16:30:00+02:00").expect("rfc3339");
    assert_eq!(rfc, plain);

    assert!(parse_order_date("yesterday").is_none());
    assert!(parse_order_date("2024-02-30 10:00").is_none());
}

#[test]
fn order_round_trips_through_camel_case_json() {
    let raw = serde_json::json!({
        "id": "PZA001",
        "customerName": "John Doe",
        "pizzaType": "Margherita",
        "quantity": 2,
        "orderDate": "2024-01-15 14:30",
        "status": "Delivered"
    });
    let order: Order = serde_json::from_value(raw.clone()).expect("order");
    assert_eq!(order.id.as_str(), "PZA001");
    assert_eq!(serde_json::to_value(&order).expect("json"), raw);
}

#[test]
fn status_styles_default_and_override() {
    let mut styles = StatusStyles::default();
    assert!(styles.badge(OrderStatus::Cancelled).contains("red"));

    styles
        .apply_overrides([("Cancelled", "badge-muted")])
        .expect("override");
    assert_eq!(styles.badge(OrderStatus::Cancelled), "badge-muted");

    let err = styles
        .apply_overrides([("Lost", "x")])
        .expect_err("unknown status");
    assert_eq!(err.kind, "order status");
}

#[test]
fn unknown_values_become_validation_errors() {
    let err = "sideways".parse::<SortDirection>().expect_err("bad");
    let api: ApiError = ApiException::from(err).into();
    assert_eq!(api.code, ErrorCode::Validation);
    assert_eq!(api.message, "unknown sort direction 'sideways'");
}

#[test]
fn validation_error_serializes_with_snake_case_code() {
    let json = serde_json::to_value(ApiError::validation("bad query")).expect("json");
    assert_eq!(json["code"], "validation");
    assert_eq!(json["message"], "bad query");
}
