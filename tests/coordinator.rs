//! Tests for temp and final saves under the optimistic retry protocol.
mod common;
use common::*;
use flowchart::prelude::*;
use flowchart::store::FlowchartStatus;
use std::sync::Arc;
use std::time::{Duration, Instant};

const PNG: &[u8] = b"png";
const FIRST: &[u8] = b"first";

fn setup(attempts: u32) -> (Arc<InMemoryFlowchartStore>, SaveCoordinator<InMemoryFlowchartStore>, uuid::Uuid) {
    let store = Arc::new(InMemoryFlowchartStore::new());
    let id = store.create("Quarterly audit").expect("create flowchart");
    let config = CoordinatorConfig {
        retry: RetryPolicy::immediate(attempts),
    };
    let coordinator = SaveCoordinator::with_config(store.clone(), Resolver::default(), config);
    (store, coordinator, id)
}

fn request(id: uuid::Uuid, save_type: SaveType, flow: &Flow, image: Option<&[u8]>) -> SaveRequest {
    SaveRequest {
        flowchart_id: id,
        save_type,
        content: flow.to_json(),
        image: image.map(<[u8]>::to_vec),
    }
}

#[test]
fn test_final_save_persists_resolved_records() {
    let (store, coordinator, id) = setup(2);
    let flow = create_diamond_flow();

    let outcome = coordinator
        .save(&request(id, SaveType::Final, &flow, Some(PNG)))
        .expect("Save should succeed");
    assert_eq!(
        outcome,
        SaveOutcome {
            id,
            name: "Quarterly audit".to_string(),
            save_type: SaveType::Final,
        }
    );

    let stored = store.get(id).expect("store readable").expect("flowchart exists");
    assert_eq!(stored.target.status, FlowchartStatus::Final);
    assert_eq!(stored.target.revision, 1);
    assert_eq!(stored.target.draw_properties, flow.to_json());
    assert_eq!(stored.target.image.as_deref(), Some(PNG));
    assert_eq!(stored.units.len(), 2 + 4 + 4);
    assert_eq!(stored.node_configs.len(), 4);
    assert_eq!(stored.node_tasks.len(), 2);
    assert_eq!(store.write_attempts().expect("store readable"), 1);
}

#[test]
fn test_final_save_requires_image() {
    let (store, coordinator, id) = setup(2);
    let err = coordinator
        .save(&request(id, SaveType::Final, &create_simple_flow(), None))
        .unwrap_err();
    assert_eq!(err, SaveError::ImageRequired);
    assert_eq!(err.code(), "FlowchartImageRequired");
    assert_eq!(store.write_attempts().expect("store readable"), 0);
}

#[test]
fn test_final_save_rejects_invalid_flowchart_before_writing() {
    let (store, coordinator, id) = setup(2);
    let flow = create_simple_flow().node("D", "Detached", Some("S1"));
    let err = coordinator
        .save(&request(id, SaveType::Final, &flow, Some(PNG)))
        .unwrap_err();
    assert_eq!(err.code(), "NodeExistFree");
    assert!(!err.is_retryable());
    assert_eq!(store.write_attempts().expect("store readable"), 0);

    let stored = store.get(id).expect("store readable").expect("flowchart exists");
    assert_eq!(stored.target.revision, 0);
    assert!(stored.units.is_empty());
}

#[test]
fn test_temp_save_skips_validation() {
    let (store, coordinator, id) = setup(2);
    // Structurally invalid: the detached node would fail a final save.
    let flow = create_simple_flow().node("D", "Detached", Some("S1"));

    let outcome = coordinator
        .save(&request(id, SaveType::Temp, &flow, None))
        .expect("Save should succeed");
    assert_eq!(outcome.save_type, SaveType::Temp);

    let stored = store.get(id).expect("store readable").expect("flowchart exists");
    assert_eq!(stored.target.status, FlowchartStatus::Draft);
    assert_eq!(stored.target.draw_properties, flow.to_json());
    assert!(stored.units.is_empty());
}

#[test]
fn test_temp_save_accepts_unparseable_drafts() {
    let (store, coordinator, id) = setup(2);
    let request = SaveRequest {
        flowchart_id: id,
        save_type: SaveType::Temp,
        content: "[{\"id\": ".to_string(),
        image: None,
    };
    assert!(coordinator.save(&request).is_ok());
    let stored = store.get(id).expect("store readable").expect("flowchart exists");
    assert_eq!(stored.target.draw_properties, "[{\"id\": ");
}

#[test]
fn test_temp_save_keeps_image_when_none_is_sent() {
    let (store, coordinator, id) = setup(2);
    let flow = create_simple_flow();
    coordinator
        .save(&request(id, SaveType::Temp, &flow, Some(FIRST)))
        .expect("Save should succeed");
    coordinator
        .save(&request(id, SaveType::Temp, &flow, None))
        .expect("Save should succeed");

    let stored = store.get(id).expect("store readable").expect("flowchart exists");
    assert_eq!(stored.target.image.as_deref(), Some(FIRST));
    assert_eq!(stored.target.revision, 2);
}

#[test]
fn test_lost_guard_is_retried() {
    let (store, coordinator, id) = setup(2);
    store.interfere_with_next(1).expect("store writable");

    let outcome = coordinator
        .save(&request(id, SaveType::Final, &create_simple_flow(), Some(PNG)))
        .expect("Second attempt should succeed");
    assert_eq!(outcome.id, id);
    assert_eq!(store.write_attempts().expect("store readable"), 2);

    let stored = store.get(id).expect("store readable").expect("flowchart exists");
    // One revision from the simulated editor, one from this save.
    assert_eq!(stored.target.revision, 2);
    assert_eq!(stored.units.len(), 4);
}

#[test]
fn test_guard_lost_on_every_attempt() {
    let (store, coordinator, id) = setup(2);
    store.interfere_with_next(2).expect("store writable");

    let err = coordinator
        .save(&request(id, SaveType::Final, &create_simple_flow(), Some(PNG)))
        .unwrap_err();
    assert_eq!(err, SaveError::FlowchartAlreadyEdited(id.to_string()));
    assert_eq!(err.code(), "FlowchartAlreadyEdited");
    assert!(err.is_retryable());
    assert_eq!(store.write_attempts().expect("store readable"), 2);

    let stored = store.get(id).expect("store readable").expect("flowchart exists");
    assert!(stored.units.is_empty());
    assert_eq!(stored.target.status, FlowchartStatus::Draft);
}

#[test]
fn test_temp_save_uses_the_same_retry() {
    let (store, coordinator, id) = setup(2);
    store.interfere_with_next(2).expect("store writable");
    let err = coordinator
        .save(&request(id, SaveType::Temp, &create_simple_flow(), None))
        .unwrap_err();
    assert!(matches!(err, SaveError::FlowchartAlreadyEdited(_)));

    store.interfere_with_next(1).expect("store writable");
    assert!(
        coordinator
            .save(&request(id, SaveType::Temp, &create_simple_flow(), None))
            .is_ok()
    );
}

#[test]
fn test_attempts_are_configurable() {
    let (store, coordinator, id) = setup(3);
    store.interfere_with_next(2).expect("store writable");
    assert!(
        coordinator
            .save(&request(id, SaveType::Final, &create_simple_flow(), Some(PNG)))
            .is_ok()
    );
    assert_eq!(store.write_attempts().expect("store readable"), 3);
}

#[test]
fn test_storage_errors_are_not_retried() {
    let (store, coordinator, id) = setup(2);
    store
        .fail_next_write(StoreError::Backend("connection reset".to_string()))
        .expect("store writable");

    let err = coordinator
        .save(&request(id, SaveType::Final, &create_simple_flow(), Some(PNG)))
        .unwrap_err();
    assert_eq!(
        err,
        SaveError::Storage(StoreError::Backend("connection reset".to_string()))
    );
    assert_eq!(err.code(), "StorageError");
    assert_eq!(store.write_attempts().expect("store readable"), 1);
}

#[test]
fn test_unknown_flowchart() {
    let (_, coordinator, _) = setup(2);
    let missing = uuid::Uuid::new_v4();
    let err = coordinator
        .save(&request(missing, SaveType::Temp, &create_simple_flow(), None))
        .unwrap_err();
    assert_eq!(err.code(), "FlowchartNotFound");
}

#[test]
fn test_oversized_content_is_rejected_for_both_save_types() {
    let store = Arc::new(InMemoryFlowchartStore::new());
    let id = store.create("Tiny").expect("create flowchart");
    let resolver = Resolver::builder().with_max_content_bytes(8).build();
    let coordinator = SaveCoordinator::new(store.clone(), resolver);

    for save_type in [SaveType::Temp, SaveType::Final] {
        let err = coordinator
            .save(&request(id, save_type, &create_simple_flow(), Some(PNG)))
            .unwrap_err();
        assert_eq!(err.code(), "ContentTooLarge");
    }
    assert_eq!(store.write_attempts().expect("store readable"), 0);
}

#[test]
fn test_default_policy_backs_off_between_attempts() {
    let store = Arc::new(InMemoryFlowchartStore::new());
    let id = store.create("Slow").expect("create flowchart");
    let coordinator = SaveCoordinator::new(store.clone(), Resolver::default());
    store.interfere_with_next(1).expect("store writable");

    let started = Instant::now();
    coordinator
        .save(&request(id, SaveType::Temp, &create_simple_flow(), None))
        .expect("Second attempt should succeed");
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[test]
fn test_save_request_wire_format() {
    let id = uuid::Uuid::new_v4();
    let json = format!(
        r#"{{"flowchart_id":"{}","save_type":"final","content":"[]"}}"#,
        id
    );
    let request: SaveRequest = serde_json::from_str(&json).expect("valid request");
    assert_eq!(request.save_type, SaveType::Final);
    assert_eq!(request.image, None);
    assert_eq!(SaveType::Temp.to_string(), "temp");
}

#[test]
fn test_zero_attempts_still_writes_once() {
    let (store, coordinator, id) = setup(0);
    assert!(
        coordinator
            .save(&request(id, SaveType::Final, &create_simple_flow(), Some(PNG)))
            .is_ok()
    );
    assert_eq!(store.write_attempts().expect("store readable"), 1);

    store.interfere_with_next(1).expect("store writable");
    let err = coordinator
        .save(&request(id, SaveType::Temp, &create_simple_flow(), None))
        .unwrap_err();
    assert_eq!(err, SaveError::FlowchartAlreadyEdited(id.to_string()));
    assert_eq!(store.write_attempts().expect("store readable"), 2);
}
