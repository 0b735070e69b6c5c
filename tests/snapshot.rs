//! Immutable snapshots and the lock-wrapped engine

use std::sync::Arc;
use std::thread;

use bitacl::*;

fn setup() -> AclEngine {
    let mut acl = AclEngine::with_rights(RightRegistry::with_crud());
    acl.add_roles(&[("staff", None), ("intern", Some("staff"))]).unwrap();
    acl.add_resources(&[("wiki", None), ("payroll", Some("wiki"))]).unwrap();
    acl.allow(&["staff"], &["wiki"], READ | UPDATE).unwrap();
    acl.deny(&["intern"], &["payroll"], READ).unwrap();
    acl
}

#[test]
fn snapshot_is_frozen() {
    let mut acl = setup();
    let snap = acl.build();
    acl.allow(&["intern"], &["payroll"], READ).unwrap();

    assert!(!snap.is_allowed("intern", "payroll", READ).unwrap());
    assert!(acl.is_allowed("intern", "payroll", READ).unwrap());
    assert_eq!(snap.mask("staff", "payroll"), Some(READ | UPDATE));
    assert_eq!(snap.len(), 4);
}

#[test]
fn snapshot_covers_roles_without_resources() {
    let mut acl = AclEngine::new();
    acl.add_role("lonely", None).unwrap();
    let snap = acl.build();
    assert_eq!(snap.roles(), vec!["lonely"]);
    assert!(snap.is_empty());
    assert!(!snap.is_allowed("lonely", "anything", READ).unwrap());
    assert_eq!(snap.is_allowed("other", "anything", READ), Err(AclError::UnknownRole("other".into())));
}

#[test]
fn snapshot_shared_across_threads() {
    let snap = Arc::new(setup().build());
    let handles: Vec<_> = ["staff", "intern"]
        .into_iter()
        .map(|role| {
            let snap = Arc::clone(&snap);
            thread::spawn(move || snap.is_allowed(role, "payroll", READ).unwrap())
        })
        .collect();
    let answers: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(answers, vec![true, false]);
}

#[test]
fn snapshot_serializes_for_shipping() {
    let snap = setup().build();
    let json = serde_json::to_string(&snap).unwrap();
    let back: CompiledAcl = serde_json::from_str(&json).unwrap();
    assert_eq!(back.mask("intern", "payroll"), Some(UPDATE));
    assert_eq!(back, snap);
}

#[test]
fn shared_engine_compiles_once_then_reads() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let shared = Arc::new(SharedAcl::from(setup()));
    assert!(shared.is_allowed("intern", "wiki", UPDATE).unwrap());
    assert!(shared.read(|e| e.is_compiled()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                if i % 4 == 0 {
                    shared.write(|e| e.allow(&["intern"], &["wiki"], CREATE)).unwrap();
                }
                shared.is_allowed("staff", "payroll", READ).unwrap()
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap());
    }
    assert!(shared.is_allowed("intern", "wiki", CREATE).unwrap());
    assert!(!shared.is_allowed("staff", "wiki", CREATE).unwrap());

    let engine = Arc::try_unwrap(shared).unwrap().into_inner();
    assert_eq!(engine.role_names(), vec!["staff", "intern"]);
}
