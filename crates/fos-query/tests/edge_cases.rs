//! Edge case tests for fos-query
//!
//! Stale references, empty selections, failure policies and malformed
//! locators.

use fos_dom::{Document, DomError, NodeId};
use fos_query::{Config, FailurePolicy, Handler, HostError, QueryError, Registry};

fn doc_with_items(count: usize) -> (Document, Vec<NodeId>) {
    let doc = Document::default();
    let body = doc.body().unwrap();
    let items = (0..count)
        .map(|_| {
            let item = doc.create_element("li");
            doc.add_class(item, "item").unwrap();
            doc.append_child(body, item).unwrap();
            item
        })
        .collect();
    (doc, items)
}

fn not_found(err: &HostError) -> Option<NodeId> {
    match err.as_dom() {
        Some(DomError::NotFound(node)) => Some(*node),
        _ => None,
    }
}

// ============================================================================
// STALE REFERENCES
// ============================================================================

#[test]
fn test_stale_node_locator_resolves_then_fails_on_use() {
    let doc = Document::default();
    let stale = NodeId::from_raw(50_000);
    let mut registry = Registry::new(doc);

    let wrapper = registry.acquire(stale).unwrap();
    assert_eq!(wrapper.nodes(), &[stale]);

    let err = wrapper.add_class("x").unwrap_err();
    let (operation, failures) = match err {
        QueryError::Partial { operation, failures } => (operation, failures),
        other => panic!("expected a partial failure, got {other:?}"),
    };
    assert_eq!(operation, "add_class");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 0);
    assert_eq!(not_found(&failures[0].error), Some(stale));
}

#[test]
fn test_none_locator_is_stored_as_is() {
    let mut registry = Registry::new(Document::default());
    let wrapper = registry.acquire(NodeId::NONE).unwrap();
    assert_eq!(wrapper.len(), 1);
    assert!(matches!(wrapper.attr("id"), Err(QueryError::Host(_))));
}

#[test]
fn test_removed_nodes_stay_in_selection() {
    let (doc, items) = doc_with_items(2);
    let mut registry = Registry::new(doc.clone());
    let wrapper = registry.acquire(".item").unwrap();

    wrapper.remove().unwrap();
    assert!(doc.query_selector_all(".item").unwrap().is_empty());
    assert_eq!(wrapper.nodes(), items.as_slice());

    // Detached nodes still accept primitives
    wrapper.add_class("detached").unwrap().remove().unwrap();
    assert!(doc.has_class(items[0], "detached").unwrap());
}

// ============================================================================
// FAILURE POLICIES
// ============================================================================

#[test]
fn test_isolate_processes_remaining_nodes() {
    let (doc, items) = doc_with_items(3);
    let mut registry = Registry::new(doc.clone());
    let wrapper = registry.acquire("li").unwrap();

    // Appending items[1] into itself is a hierarchy error; the other two
    // appends succeed and move it
    let err = wrapper.append(items[1]).unwrap_err();
    let (operation, failures) = match err {
        QueryError::Partial { operation, failures } => (operation, failures),
        other => panic!("expected a partial failure, got {other:?}"),
    };
    assert_eq!(operation, "append");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 1);
    assert_eq!(failures[0].node, items[1]);
    assert!(matches!(failures[0].error.as_dom(), Some(DomError::HierarchyRequest)));
    assert_eq!(doc.parent(items[1]), Some(items[2]));
}

#[test]
fn test_isolate_collects_every_failure() {
    let (doc, items) = doc_with_items(3);
    let mut registry = Registry::new(doc.clone());
    let wrapper = registry.acquire(".item").unwrap();

    let err = wrapper.set_attr("bad name", "x").unwrap_err();
    let failures = err.failures();
    assert_eq!(failures.len(), 3);
    let indices: Vec<usize> = failures.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(failures.iter().map(|f| f.node).collect::<Vec<_>>(), items);
}

#[test]
fn test_abort_stops_at_first_failure() {
    let (doc, items) = doc_with_items(3);
    let config = Config::default().with_failure_policy(FailurePolicy::Abort);
    let mut registry = Registry::with_config(doc.clone(), config.clone());
    assert_eq!(registry.config(), &config);
    let wrapper = registry.acquire("li").unwrap();

    let err = wrapper.append(items[1]).unwrap_err();
    let (operation, failure) = match err {
        QueryError::Aborted { operation, failure } => (operation, failure),
        other => panic!("expected an aborted pass, got {other:?}"),
    };
    assert_eq!(operation, "append");
    assert_eq!(failure.index, 1);
    assert!(matches!(failure.error.as_dom(), Some(DomError::HierarchyRequest)));

    // The pass never reached items[2]
    assert_eq!(doc.parent(items[1]), Some(items[0]));
    assert!(doc.children(items[2]).is_empty());
}

#[test]
fn test_abort_reports_invalid_token() {
    let (doc, _) = doc_with_items(2);
    let config = Config::default().with_failure_policy(FailurePolicy::Abort);
    let mut registry = Registry::with_config(doc, config);
    let err = registry.acquire("li").unwrap().add_class("").unwrap_err();
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].index, 0);
    assert!(matches!(err.failures()[0].error.as_dom(), Some(DomError::InvalidToken(_))));
}

// ============================================================================
// EMPTY SELECTIONS
// ============================================================================

#[test]
fn test_accessors_on_empty_selection() {
    let mut registry = Registry::new(Document::default());
    let wrapper = registry.acquire(".nothing").unwrap();
    assert!(wrapper.is_empty());

    assert!(matches!(wrapper.attr("id"), Err(QueryError::EmptySelection { operation: "attr" })));
    assert!(matches!(wrapper.text(), Err(QueryError::EmptySelection { operation: "text" })));
    assert!(matches!(wrapper.html(), Err(QueryError::EmptySelection { .. })));
    assert!(matches!(wrapper.css("color"), Err(QueryError::EmptySelection { .. })));
    assert!(matches!(wrapper.has_class("x"), Err(QueryError::EmptySelection { .. })));
    assert!(matches!(wrapper.closest("body"), Err(QueryError::EmptySelection { .. })));
    assert!(matches!(wrapper.data("x"), Err(QueryError::EmptySelection { .. })));
}

#[test]
fn test_on_empty_selection_attaches_nothing() {
    let mut registry = Registry::new(Document::default());
    let wrapper = registry.acquire(".nothing").unwrap();
    wrapper
        .on("click", Handler::direct(|_, _| {}))
        .unwrap()
        .trigger("click")
        .unwrap()
        .off("click")
        .unwrap();
    assert_eq!(wrapper.listener_count(), 0);
}

// ============================================================================
// MALFORMED INPUT
// ============================================================================

#[test]
fn test_malformed_locator_propagates_untranslated() {
    let mut registry = Registry::new(Document::default());
    let err = registry.acquire("ul >").unwrap_err();
    let host = match err {
        QueryError::Host(host) => host,
        other => panic!("expected a host error, got {other:?}"),
    };
    assert!(matches!(host.as_dom(), Some(DomError::InvalidSelector { selector, .. }) if selector == "ul >"));
    assert_eq!(registry.resolutions(), 0);
}

#[test]
fn test_invalid_data_key() {
    let (doc, _) = doc_with_items(1);
    let mut registry = Registry::new(doc);
    let wrapper = registry.acquire(".item").unwrap();
    let err = wrapper.set_data("user-id", "1").unwrap_err();
    assert!(matches!(err.failures()[0].error.as_dom(), Some(DomError::InvalidDataKey(_))));
    assert!(matches!(
        wrapper.data("user-id"),
        Err(QueryError::Host(HostError::Dom(DomError::InvalidDataKey(_))))
    ));
}

#[test]
fn test_data_key_without_markup_form_rejected() {
    let (doc, items) = doc_with_items(1);
    let mut registry = Registry::new(doc.clone());
    let wrapper = registry.acquire(".item").unwrap();

    let err = wrapper.set_data("foo bar=\"y\"", "x").unwrap_err();
    assert_eq!(err.failures().len(), 1);
    assert!(matches!(err.failures()[0].error.as_dom(), Some(DomError::InvalidDataKey(_))));
    assert!(!doc.has_attribute(items[0], "data-foo bar=\"y\"").unwrap());

    let body = registry.acquire("body").unwrap();
    assert_eq!(body.html().unwrap(), r#"<li class="item"></li>"#);
}

#[test]
fn test_css_values_with_separators() {
    let (doc, items) = doc_with_items(1);
    let mut registry = Registry::new(doc.clone());
    let wrapper = registry.acquire(".item").unwrap();

    wrapper.set_css("background", "url(a;b)").unwrap().set_css("content", "\";\"").unwrap();
    assert_eq!(wrapper.css("background").unwrap(), "url(a;b)");
    assert_eq!(wrapper.css("content").unwrap(), "\";\"");

    wrapper.hide().unwrap();
    assert_eq!(wrapper.css("background").unwrap(), "url(a;b)");
    assert_eq!(wrapper.css("display").unwrap(), "none");

    let err = wrapper.show().unwrap().set_css("color", "red; display: none").unwrap_err();
    assert!(matches!(
        err.failures()[0].error.as_dom(),
        Some(DomError::InvalidStyleValue { property, .. }) if property == "color"
    ));
    assert_eq!(wrapper.css("color").unwrap(), "");
    assert_eq!(wrapper.css("display").unwrap(), "");
    assert_eq!(
        doc.attribute(items[0], "style").unwrap().as_deref(),
        Some("background: url(a;b); content: \";\";")
    );
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_config_serde() {
    let config: Config = serde_json::from_str(r#"{"failure_policy":"abort"}"#).unwrap();
    assert_eq!(config.failure_policy, FailurePolicy::Abort);

    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.failure_policy, FailurePolicy::Isolate);

    let json = serde_json::to_string(&Config::default()).unwrap();
    assert_eq!(json, r#"{"failure_policy":"isolate"}"#);
}
