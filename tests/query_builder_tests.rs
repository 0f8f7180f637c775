//! Integration tests for query composition.
//!
//! These tests verify target rendering, parameter handling and the exact
//! request URIs produced for the catalog API.

use bestbuy_api::clients::encode_whitespace;
use bestbuy_api::{
    ApiKey, ApiVersion, QueryBuilder, QueryError, ResourceKind, ResourceTarget, ResponseFormat,
    Selector, TargetError, FORMAT_JSON, FORMAT_XML,
};
use serde_json::json;

const REMIX: &str = "http://api.remix.bestbuy.com/v1";

fn uri(builder: &QueryBuilder, key: &str) -> String {
    builder.build().unwrap().uri(REMIX, &ApiKey::new(key))
}

// ============================================================================
// Resource Targets
// ============================================================================

#[test]
fn test_identifier_targets_render_kind_id_and_format() {
    for (kind, kind_name) in [
        (ResourceKind::Products, "products"),
        (ResourceKind::Stores, "stores"),
    ] {
        for (format, format_name) in [(ResponseFormat::Xml, "xml"), (ResponseFormat::Json, "json")] {
            let target = ResourceTarget::new(kind, Selector::identifier("  42 "), format);
            assert_eq!(target.to_string(), format!("{kind_name}/42.{format_name}"));
        }
    }
}

#[test]
fn test_filter_targets_omit_format() {
    let target = ResourceTarget::new(
        ResourceKind::Products,
        Selector::filters(["name=bat*", "salePrice<=99.99"]),
        ResponseFormat::Json,
    );
    assert_eq!(target.to_string(), "products(name=bat*&salePrice<=99.99)");
}

#[test]
fn test_empty_selectors_render_bare_kind() {
    let empty_filters = ResourceTarget::filtered(ResourceKind::Stores, Vec::<String>::new());
    assert_eq!(empty_filters.to_string(), "stores");

    let empty_id = ResourceTarget::identified(ResourceKind::Products, "   ");
    assert_eq!(empty_id.to_string(), "products");
}

#[test]
fn test_parse_normalizes_kind_and_format() {
    let target = ResourceTarget::parse(" Products ", Selector::identifier(1), " JSON").unwrap();
    assert_eq!(target.kind(), ResourceKind::Products);
    assert_eq!(target.format(), ResponseFormat::Json);

    let target = ResourceTarget::parse("stores", Selector::identifier(1), FORMAT_XML).unwrap();
    assert_eq!(target.to_string(), "stores/1.xml");
    assert_eq!(FORMAT_JSON, "json");
}

#[test]
fn test_parse_rejects_unknown_names() {
    assert!(matches!(
        ResourceTarget::parse("categories", Selector::identifier(1), "xml"),
        Err(TargetError::InvalidKind { kind }) if kind == "categories"
    ));
    assert!(matches!(
        ResourceTarget::parse("products", Selector::identifier(1), "csv"),
        Err(TargetError::InvalidFormat { format }) if format == "csv"
    ));
}

#[test]
fn test_selector_from_dynamic_values() {
    assert_eq!(
        Selector::try_from(json!(" 1234 ")).unwrap(),
        Selector::Identifier("1234".to_string())
    );
    assert_eq!(
        Selector::try_from(json!(281)).unwrap(),
        Selector::Identifier("281".to_string())
    );
    assert_eq!(
        Selector::try_from(json!(["a=b", "c=d"])).unwrap(),
        Selector::Filters(vec!["a=b".to_string(), "c=d".to_string()])
    );

    for bad in [json!({"a": "b"}), json!(null), json!(true), json!([1, 2])] {
        assert!(matches!(
            Selector::try_from(bad),
            Err(TargetError::InvalidSelector { .. })
        ));
    }
}

#[test]
fn test_try_target_reports_unknown_kind_before_bad_selector() {
    let mut builder = QueryBuilder::new();
    let result = builder.try_target("warehouses", json!({"a": 1}), "xml");

    assert!(matches!(
        result,
        Err(QueryError::InvalidTarget(TargetError::InvalidKind { kind })) if kind == "warehouses"
    ));
    assert!(builder.targets().is_empty());
}

// ============================================================================
// URI Composition
// ============================================================================

#[test]
fn test_filtered_products_uri() {
    let mut builder = QueryBuilder::new();
    builder.products(["a=b"]);
    assert_eq!(uri(&builder, ""), format!("{REMIX}/products(a=b)?apiKey="));
}

#[test]
fn test_single_store_uri() {
    let mut builder = QueryBuilder::new();
    builder.store(123);
    assert_eq!(uri(&builder, ""), format!("{REMIX}/stores/123.xml?apiKey="));
}

#[test]
fn test_joined_targets_keep_insertion_order() {
    let mut builder = QueryBuilder::new();
    builder.stores(["area(11201,10)"]).product_as(1234, ResponseFormat::Json);
    assert_eq!(
        uri(&builder, "key"),
        format!("{REMIX}/stores(area(11201,10))+products/1234.json?apiKey=key")
    );
}

#[test]
fn test_retargeting_a_kind_replaces_it_in_place() {
    let mut builder = QueryBuilder::new();
    builder.products(["a=b"]).stores(["c=d"]).product(99);

    assert_eq!(builder.targets().len(), 2);
    assert_eq!(
        uri(&builder, "k"),
        format!("{REMIX}/products/99.xml+stores(c=d)?apiKey=k")
    );
}

#[test]
fn test_parameters_precede_api_key_and_are_literal() {
    let mut builder = QueryBuilder::new();
    builder
        .products(["type=HardGood"])
        .show(["sku", "name"])
        .sort("name.asc")
        .set_parameter("format", FORMAT_JSON)
        .set_parameter("apiKey", "ignored");

    assert_eq!(
        uri(&builder, "secret"),
        format!("{REMIX}/products(type=HardGood)?show=sku,name&sort=name.asc&format=json&apiKey=secret")
    );
}

#[test]
fn test_set_parameters_replaces_and_flattens() {
    let mut builder = QueryBuilder::new();
    builder.product(1).page(3).set_parameter("sort", "sku");

    builder.set_parameters([("show", vec!["sku", "name"]), ("facet", vec!["manufacturer"])]);

    assert_eq!(builder.parameter("page"), None);
    assert_eq!(builder.parameter("sort"), None);
    assert_eq!(builder.parameter("show"), Some("sku,name"));
    assert_eq!(
        uri(&builder, ""),
        format!("{REMIX}/products/1.xml?show=sku,name&facet=manufacturer&apiKey=")
    );
}

#[test]
fn test_build_is_repeatable_and_leaves_builder_alone() {
    let mut builder = QueryBuilder::new();
    builder.product(1).page_size(10);

    let first = builder.build().unwrap();
    let second = builder.build().unwrap();
    assert_eq!(first, second);
    assert_eq!(builder.parameter("pageSize"), Some("10"));
}

#[test]
fn test_build_without_target_fails() {
    let mut builder = QueryBuilder::new();
    builder.page(1);
    assert!(matches!(builder.build(), Err(QueryError::NoTarget)));
    assert_eq!(builder.parameter("page"), Some("1"));
}

#[test]
fn test_redacted_uri_masks_key() {
    let mut builder = QueryBuilder::new();
    builder.store(281);
    let query = builder.build().unwrap();

    let base = ApiVersion::BbyOpen.base_uri();
    assert_eq!(
        query.redacted_uri(base),
        "https://api.bestbuy.com/v1/stores/281.xml?apiKey=*****"
    );
}

#[test]
fn test_whitespace_is_encoded_at_dispatch_only() {
    let mut builder = QueryBuilder::new();
    builder.products(["name=ipad  air*"]);

    let raw = uri(&builder, "");
    assert!(raw.contains("name=ipad  air*"));
    assert_eq!(
        encode_whitespace(&raw),
        format!("{REMIX}/products(name=ipad%20air*)?apiKey=")
    );
}
