//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use crate::extract::JsonPathExtractor;
use crate::navigation::{LocationHistory, NavigateOptions};
use crate::query::{QueryClient, QueryRequest};
use crate::types::JsonValue;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

const LIST_QUERY: &str = "query List($page: Int) { list(page: $page) { data paginatorInfo { currentPage hasMorePages } } }";

// ============================================================================
// Fakes
// ============================================================================

fn payload(items: &[&str], page: u32, has_more: bool) -> JsonValue {
    json!({
        "list": {
            "data": items,
            "paginatorInfo": {"currentPage": page, "hasMorePages": has_more}
        }
    })
}

fn page_of(request: &QueryRequest, variable: &str) -> u32 {
    request
        .get(variable)
        .and_then(JsonValue::as_u64)
        .unwrap_or_default() as u32
}

/// Answers immediately from a fixed page table; unknown pages fail
struct ScriptedClient {
    pages: HashMap<u32, JsonValue>,
    page_variable: &'static str,
    requests: Mutex<Vec<QueryRequest>>,
}

impl ScriptedClient {
    fn new(pages: Vec<(u32, JsonValue)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            page_variable: "page",
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryClient for ScriptedClient {
    async fn execute(&self, request: &QueryRequest) -> Result<JsonValue> {
        self.requests.lock().unwrap().push(request.clone());
        let page = page_of(request, self.page_variable);
        self.pages
            .get(&page)
            .cloned()
            .ok_or_else(|| Error::http_status(500, format!("page {page} unavailable")))
    }
}

/// Holds every request until the test releases its page
struct GatedClient {
    gates: Mutex<HashMap<u32, oneshot::Receiver<Result<JsonValue>>>>,
    issued: Mutex<Vec<u32>>,
}

impl GatedClient {
    fn new(pages: &[u32]) -> (Arc<Self>, HashMap<u32, oneshot::Sender<Result<JsonValue>>>) {
        let mut senders = HashMap::new();
        let mut receivers = HashMap::new();
        for page in pages {
            let (tx, rx) = oneshot::channel();
            senders.insert(*page, tx);
            receivers.insert(*page, rx);
        }
        let client = Arc::new(Self {
            gates: Mutex::new(receivers),
            issued: Mutex::new(Vec::new()),
        });
        (client, senders)
    }

    async fn wait_for_requests(&self, count: usize) {
        while self.issued.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl QueryClient for GatedClient {
    async fn execute(&self, request: &QueryRequest) -> Result<JsonValue> {
        let page = page_of(request, "page");
        let gate = self.gates.lock().unwrap().remove(&page);
        self.issued.lock().unwrap().push(page);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(Error::query("gate dropped"))),
            None => Err(Error::query(format!("no gate for page {page}"))),
        }
    }
}

fn controller_with(
    client: Arc<dyn QueryClient>,
    history: &LocationHistory,
) -> PaginationControllerBuilder<String, JsonValue> {
    PaginationController::builder(client, LIST_QUERY)
        .extractor(JsonPathExtractor::<String>::new("list"))
        .navigator(history.clone())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

// ============================================================================
// Type Tests
// ============================================================================

#[test]
fn test_paginator_info_default() {
    let info = PaginatorInfo::default();
    assert_eq!(info.count, 0);
    assert_eq!(info.current_page, 1);
    assert_eq!(info.last_page, 1);
    assert!(!info.has_more_pages);
    assert_eq!(info.next_page(), None);
}

#[test]
fn test_paginator_info_wire_format() {
    let info = PaginatorInfo::new(2, true).with_per_page(10).with_total(35, 4);
    let wire = serde_json::to_value(&info).unwrap();

    assert_eq!(wire["currentPage"], 2);
    assert_eq!(wire["hasMorePages"], true);
    assert_eq!(wire["perPage"], 10);
    assert_eq!(wire["lastPage"], 4);
    assert_eq!(info.next_page(), Some(3));
}

#[test]
fn test_next_page_saturates_at_max_page() {
    let info: PaginatorInfo =
        serde_json::from_value(json!({"currentPage": u32::MAX, "hasMorePages": true})).unwrap();
    assert_eq!(info.current_page, u32::MAX);
    assert_eq!(info.next_page(), None);

    let info = PaginatorInfo::new(u32::MAX - 1, true);
    assert_eq!(info.next_page(), Some(u32::MAX));
}

#[test]
fn test_page_state_from_items_defaults() {
    let state = PageState::<String>::from_items(None);
    assert!(state.is_empty());
    assert_eq!(state.paginator_info, PaginatorInfo::default());

    let state = PageState::from_items(Some(PaginationItems {
        data: strings(&["a"]),
        paginator_info: None,
    }));
    assert_eq!(state.items, strings(&["a"]));
    assert_eq!(state.paginator_info, PaginatorInfo::default());
}

#[test]
fn test_page_state_append_replaces_info() {
    let mut state = PageState::new(strings(&["a", "b"]), PaginatorInfo::new(2, true));
    state.append(Some(PaginationItems::new(
        strings(&["c"]),
        PaginatorInfo::new(3, false),
    )));

    assert_eq!(state.items, strings(&["a", "b", "c"]));
    assert_eq!(state.paginator_info, PaginatorInfo::new(3, false));
    assert_eq!(state.len(), 3);
}

#[test]
fn test_navigation_intent_accessors() {
    let intent = NavigationIntent::load_more(4, "/list?page=4");
    assert_eq!(intent.page(), 4);
    assert_eq!(intent.url(), "/list?page=4");
    assert!(intent.is_append());
    assert!(!NavigationIntent::page_change(1, "/").is_append());
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_builder_requires_extractor() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let result = PaginationController::<String>::builder(client, LIST_QUERY).build();
    assert!(matches!(result, Err(Error::Config { .. })));
}

#[test]
fn test_builder_rejects_empty_page_variable() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let result = controller_with(client, &LocationHistory::new())
        .page_variable("")
        .build();
    assert!(matches!(result, Err(Error::Config { .. })));
}

#[test]
fn test_initial_state_defaults_when_absent() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let controller = controller_with(client, &LocationHistory::new())
        .build()
        .unwrap();

    assert!(controller.items().is_empty());
    assert_eq!(controller.paginator_info(), PaginatorInfo::default());
    assert_eq!(controller.snapshot(), PageState::default());
}

#[test]
fn test_initial_state_from_server_page() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let controller = controller_with(client, &LocationHistory::new())
        .initial(PaginationItems::new(
            strings(&["x", "y"]),
            PaginatorInfo::new(1, true),
        ))
        .build()
        .unwrap();

    assert_eq!(controller.items(), strings(&["x", "y"]));
    assert_eq!(controller.paginator_info(), PaginatorInfo::new(1, true));
    assert_eq!(controller.initial_state(), &controller.snapshot());
}

// ============================================================================
// Replace / Append Tests
// ============================================================================

#[tokio::test]
async fn test_go_to_page_replaces_state() {
    let client = Arc::new(ScriptedClient::new(vec![(
        2,
        payload(&["a", "b"], 2, true),
    )]));
    let history = LocationHistory::new();
    let controller = controller_with(client.clone(), &history)
        .build()
        .unwrap();

    controller.go_to_page(2, "/list?page=2").await.unwrap();

    assert_eq!(
        controller.snapshot(),
        PageState::new(strings(&["a", "b"]), PaginatorInfo::new(2, true))
    );
    assert_eq!(history.current(), Some("/list?page=2".to_string()));
    assert_eq!(history.published()[0].options, NavigateOptions::shallow());
    assert_eq!(history.scroll_resets(), 1);
    assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn test_go_to_page_discards_previous_items() {
    let client = Arc::new(ScriptedClient::new(vec![(5, payload(&["e"], 5, false))]));
    let controller = controller_with(client, &LocationHistory::new())
        .initial(PaginationItems::new(
            strings(&["a", "b", "c"]),
            PaginatorInfo::new(1, true),
        ))
        .build()
        .unwrap();

    controller.go_to_page(5, "/list?page=5").await.unwrap();

    assert_eq!(controller.items(), strings(&["e"]));
    assert_eq!(controller.paginator_info(), PaginatorInfo::new(5, false));
}

#[tokio::test]
async fn test_load_more_appends_in_order() {
    let client = Arc::new(ScriptedClient::new(vec![(
        3,
        payload(&["c", "d"], 3, false),
    )]));
    let history = LocationHistory::new();
    let controller = controller_with(client, &history).build().unwrap();
    controller.set_items(PageState::new(
        strings(&["a", "b"]),
        PaginatorInfo::new(2, true),
    ));

    controller.load_more(3, "/list?page=3").await.unwrap();

    assert_eq!(controller.items(), strings(&["a", "b", "c", "d"]));
    assert_eq!(controller.paginator_info().current_page, 3);
    assert!(!controller.paginator_info().has_more_pages);
    assert_eq!(history.current(), Some("/list?page=3".to_string()));
    assert_eq!(history.scroll_resets(), 0);
}

#[tokio::test]
async fn test_empty_extraction_applies_empty_page() {
    let client = Arc::new(ScriptedClient::new(vec![(2, json!({"other": {}}))]));
    let history = LocationHistory::new();
    let controller = controller_with(client, &history)
        .initial(PaginationItems::new(
            strings(&["a"]),
            PaginatorInfo::new(1, true),
        ))
        .build()
        .unwrap();

    controller.go_to_page(2, "/list?page=2").await.unwrap();

    assert!(controller.items().is_empty());
    assert_eq!(controller.paginator_info(), PaginatorInfo::default());
    assert_eq!(history.published().len(), 1);
}

#[tokio::test]
async fn test_empty_extraction_on_load_more_keeps_items() {
    let client = Arc::new(ScriptedClient::new(vec![(2, json!({}))]));
    let controller = controller_with(client, &LocationHistory::new())
        .initial(PaginationItems::new(
            strings(&["a"]),
            PaginatorInfo::new(1, true),
        ))
        .build()
        .unwrap();

    controller.load_more(2, "/list?page=2").await.unwrap();

    assert_eq!(controller.items(), strings(&["a"]));
    assert_eq!(controller.paginator_info(), PaginatorInfo::default());
}

#[tokio::test]
async fn test_navigate_dispatches_intent() {
    let client = Arc::new(ScriptedClient::new(vec![
        (1, payload(&["a"], 1, true)),
        (2, payload(&["b"], 2, false)),
    ]));
    let history = LocationHistory::new();
    let controller = controller_with(client, &history).build().unwrap();

    controller
        .navigate(NavigationIntent::page_change(1, "/list"))
        .await
        .unwrap();
    controller
        .navigate(NavigationIntent::load_more(2, "/list?page=2"))
        .await
        .unwrap();

    assert_eq!(controller.items(), strings(&["a", "b"]));
    assert_eq!(history.scroll_resets(), 1);
    assert_eq!(history.published().len(), 2);
}

// ============================================================================
// Request Tests
// ============================================================================

#[tokio::test]
async fn test_request_merges_base_variables() {
    let client = Arc::new(ScriptedClient::new(vec![(4, payload(&[], 4, false))]));
    let controller = controller_with(client.clone(), &LocationHistory::new())
        .variable("tag", "rust")
        .variable("page", 1)
        .build()
        .unwrap();

    controller.go_to_page(4, "/list?page=4").await.unwrap();

    let requests = client.requests();
    assert_eq!(requests[0].document, LIST_QUERY);
    assert_eq!(requests[0].get("tag"), Some(&json!("rust")));
    assert_eq!(requests[0].get("page"), Some(&json!(4)));
}

#[tokio::test]
async fn test_custom_page_variable() {
    let mut scripted = ScriptedClient::new(vec![(2, payload(&["b"], 2, false))]);
    scripted.page_variable = "pageNumber";
    let client = Arc::new(scripted);
    let controller = controller_with(client.clone(), &LocationHistory::new())
        .page_variable("pageNumber")
        .build()
        .unwrap();

    controller.go_to_page(2, "/list?page=2").await.unwrap();

    let request = &client.requests()[0];
    assert_eq!(request.get("pageNumber"), Some(&json!(2)));
    assert!(request.get("page").is_none());
    assert_eq!(controller.items(), strings(&["b"]));
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_rejection_leaves_state_untouched() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let history = LocationHistory::new();
    let controller = controller_with(client, &history)
        .initial(PaginationItems::new(
            strings(&["a", "b"]),
            PaginatorInfo::new(1, true),
        ))
        .build()
        .unwrap();
    let before = controller.snapshot();

    let err = controller.go_to_page(9, "/list?page=9").await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    assert!(controller.load_more(9, "/list?page=9").await.is_err());

    assert_eq!(controller.snapshot(), before);
    assert!(history.published().is_empty());
    assert_eq!(history.scroll_resets(), 0);
}

#[tokio::test]
async fn test_undecodable_payload_is_rejection() {
    #[derive(Debug, serde::Deserialize)]
    struct ListData {
        list: Vec<String>,
    }

    let client = Arc::new(ScriptedClient::new(vec![(2, payload(&["a"], 2, false))]));
    let controller = PaginationController::<String, ListData>::builder(client, LIST_QUERY)
        .extractor(|data: ListData| Some(PaginationItems::new(data.list, PaginatorInfo::default())))
        .build()
        .unwrap();

    let err = controller.go_to_page(2, "/list?page=2").await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(controller.items().is_empty());
}

#[tokio::test]
async fn test_typed_payload_with_closure_extractor() {
    #[derive(Debug, serde::Deserialize)]
    struct ListData {
        list: PaginationItems<String>,
    }

    let client = Arc::new(ScriptedClient::new(vec![(2, payload(&["a", "b"], 2, true))]));
    let controller = PaginationController::<String, ListData>::builder(client, LIST_QUERY)
        .extractor(|data: ListData| Some(data.list))
        .build()
        .unwrap();

    controller.go_to_page(2, "/list?page=2").await.unwrap();
    assert_eq!(controller.items(), strings(&["a", "b"]));
    assert_eq!(controller.paginator_info().current_page, 2);
}

// ============================================================================
// Side Effect Gating Tests
// ============================================================================

#[tokio::test]
async fn test_navigation_disabled_skips_side_effects() {
    let client = Arc::new(ScriptedClient::new(vec![
        (1, payload(&["a"], 1, true)),
        (2, payload(&["b"], 2, false)),
    ]));
    let history = LocationHistory::starting_at("/list");
    let controller = controller_with(client, &history)
        .navigate_on_page_ops(false)
        .build()
        .unwrap();

    controller.go_to_page(1, "/list?page=1").await.unwrap();
    controller.load_more(2, "/list?page=2").await.unwrap();

    assert_eq!(controller.items(), strings(&["a", "b"]));
    assert!(history.published().is_empty());
    assert_eq!(history.scroll_resets(), 0);
    assert_eq!(history.current(), Some("/list".to_string()));
}

// ============================================================================
// Reset Tests
// ============================================================================

#[tokio::test]
async fn test_reset_state_on_dependency_change() {
    let client = Arc::new(ScriptedClient::new(vec![(2, payload(&["c"], 2, false))]));
    let controller = controller_with(client, &LocationHistory::new())
        .initial(PaginationItems::new(
            strings(&["a", "b"]),
            PaginatorInfo::new(1, true),
        ))
        .dependencies(vec![json!("/posts"), json!({"tag": "rust"})])
        .build()
        .unwrap();

    controller.load_more(2, "/posts?page=2").await.unwrap();
    assert_eq!(controller.items().len(), 3);

    // Same keys: no reset
    assert!(!controller.reset_state(&[json!("/posts"), json!({"tag": "rust"})]));
    assert_eq!(controller.items().len(), 3);

    // Changed key: reset to initial
    assert!(controller.reset_state(&[json!("/posts"), json!({"tag": "go"})]));
    assert_eq!(controller.items(), strings(&["a", "b"]));
    assert_eq!(controller.paginator_info(), PaginatorInfo::new(1, true));
    assert_eq!(
        controller.dependencies(),
        vec![json!("/posts"), json!({"tag": "go"})]
    );

    // Shorter key sequence also counts as a change
    assert!(controller.reset_state(&[json!("/posts")]));
}

#[test]
fn test_set_items_overwrites_wholesale() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let controller = controller_with(client, &LocationHistory::new())
        .initial(PaginationItems::new(
            strings(&["a", "b"]),
            PaginatorInfo::new(1, true),
        ))
        .build()
        .unwrap();

    controller.set_items(PageState::new(strings(&["z"]), PaginatorInfo::new(7, false)));

    assert_eq!(controller.items(), strings(&["z"]));
    assert_eq!(controller.paginator_info(), PaginatorInfo::new(7, false));
    assert_eq!(controller.initial_state().items, strings(&["a", "b"]));
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test]
async fn test_last_resolved_wins() {
    let (client, mut gates) = GatedClient::new(&[1, 2]);
    let history = LocationHistory::new();
    let controller = controller_with(client.clone(), &history).build().unwrap();

    let first = controller.on_page_changed(1, "/list?page=1");
    let second = controller.on_page_changed(2, "/list?page=2");
    client.wait_for_requests(2).await;

    gates
        .remove(&2)
        .unwrap()
        .send(Ok(payload(&["b"], 2, false)))
        .unwrap();
    second.await.unwrap().unwrap();
    assert_eq!(controller.items(), strings(&["b"]));

    gates
        .remove(&1)
        .unwrap()
        .send(Ok(payload(&["a"], 1, true)))
        .unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(controller.items(), strings(&["a"]));
    assert_eq!(controller.paginator_info().current_page, 1);
    assert_eq!(history.current(), Some("/list?page=1".to_string()));
}

#[tokio::test]
async fn test_latest_issued_wins_discards_stale() {
    let (client, mut gates) = GatedClient::new(&[1, 2]);
    let history = LocationHistory::new();
    let controller = controller_with(client.clone(), &history)
        .concurrency(ConcurrencyPolicy::LatestIssuedWins)
        .build()
        .unwrap();

    let first = controller.on_page_changed(1, "/list?page=1");
    client.wait_for_requests(1).await;
    let second = controller.on_page_changed(2, "/list?page=2");
    client.wait_for_requests(2).await;

    gates
        .remove(&2)
        .unwrap()
        .send(Ok(payload(&["b"], 2, false)))
        .unwrap();
    second.await.unwrap().unwrap();

    gates
        .remove(&1)
        .unwrap()
        .send(Ok(payload(&["a"], 1, true)))
        .unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(controller.items(), strings(&["b"]));
    assert_eq!(history.published().len(), 1);
    assert_eq!(history.current(), Some("/list?page=2".to_string()));
}

#[tokio::test]
async fn test_pending_load_more_applies_after_reset() {
    let (client, mut gates) = GatedClient::new(&[3]);
    let controller = controller_with(client.clone(), &LocationHistory::new())
        .initial(PaginationItems::new(
            strings(&["i"]),
            PaginatorInfo::new(1, true),
        ))
        .dependencies(vec![json!("a")])
        .build()
        .unwrap();
    controller.set_items(PageState::new(
        strings(&["i", "x", "y"]),
        PaginatorInfo::new(2, true),
    ));

    let pending = controller.on_load_more(3, "/list?page=3");
    client.wait_for_requests(1).await;

    assert!(controller.reset_state(&[json!("b")]));
    assert_eq!(controller.items(), strings(&["i"]));

    gates
        .remove(&3)
        .unwrap()
        .send(Ok(payload(&["z"], 3, false)))
        .unwrap();
    pending.await.unwrap().unwrap();

    assert_eq!(controller.items(), strings(&["i", "z"]));
    assert_eq!(controller.paginator_info().current_page, 3);
}

#[tokio::test]
async fn test_pending_load_more_discarded_after_reset_with_guard() {
    let (client, mut gates) = GatedClient::new(&[3]);
    let controller = controller_with(client.clone(), &LocationHistory::new())
        .initial(PaginationItems::new(
            strings(&["i"]),
            PaginatorInfo::new(1, true),
        ))
        .dependencies(vec![json!("a")])
        .concurrency(ConcurrencyPolicy::LatestIssuedWins)
        .build()
        .unwrap();

    let pending = controller.on_load_more(3, "/list?page=3");
    client.wait_for_requests(1).await;
    assert!(controller.reset_state(&[json!("b")]));

    gates
        .remove(&3)
        .unwrap()
        .send(Ok(payload(&["z"], 3, false)))
        .unwrap();
    pending.await.unwrap().unwrap();

    assert_eq!(controller.items(), strings(&["i"]));
    assert_eq!(controller.paginator_info(), PaginatorInfo::new(1, true));
}

#[tokio::test]
async fn test_spawned_failure_is_returned() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let controller = controller_with(client, &LocationHistory::new())
        .build()
        .unwrap();

    let result = controller.on_load_more(2, "/list?page=2").await.unwrap();
    assert!(result.is_err());
    assert!(controller.items().is_empty());
}

#[tokio::test]
async fn test_concurrent_load_more_appends_in_resolution_order() {
    let (client, mut gates) = GatedClient::new(&[2, 3]);
    let controller = controller_with(client.clone(), &LocationHistory::new())
        .initial(PaginationItems::new(
            strings(&["a"]),
            PaginatorInfo::new(1, true),
        ))
        .build()
        .unwrap();

    let pending = vec![
        controller.on_load_more(2, "/list?page=2"),
        controller.on_load_more(3, "/list?page=3"),
    ];
    client.wait_for_requests(2).await;

    gates
        .remove(&3)
        .unwrap()
        .send(Ok(payload(&["c"], 3, false)))
        .unwrap();
    gates
        .remove(&2)
        .unwrap()
        .send(Ok(payload(&["b"], 2, true)))
        .unwrap();

    for result in futures::future::join_all(pending).await {
        result.unwrap().unwrap();
    }

    let items = controller.items();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0], "a");
    assert!(items.contains(&"b".to_string()));
    assert!(items.contains(&"c".to_string()));
}

#[tokio::test]
async fn test_latest_issued_wins_drops_older_even_if_newer_rejects() {
    let (client, mut gates) = GatedClient::new(&[1, 2]);
    let history = LocationHistory::new();
    let controller = controller_with(client.clone(), &history)
        .initial(PaginationItems::new(
            strings(&["i"]),
            PaginatorInfo::new(1, true),
        ))
        .concurrency(ConcurrencyPolicy::LatestIssuedWins)
        .build()
        .unwrap();

    let first = controller.on_page_changed(1, "/list?page=1");
    client.wait_for_requests(1).await;
    let second = controller.on_page_changed(2, "/list?page=2");
    client.wait_for_requests(2).await;

    gates
        .remove(&2)
        .unwrap()
        .send(Err(Error::http_status(500, "down")))
        .unwrap();
    assert!(second.await.unwrap().is_err());

    gates
        .remove(&1)
        .unwrap()
        .send(Ok(payload(&["a"], 1, true)))
        .unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(controller.items(), strings(&["i"]));
    assert!(history.published().is_empty());
}
