//! Precedence between resource inheritance and role inheritance

use bitacl::*;

fn crud() -> AclEngine {
    AclEngine::with_rights(RightRegistry::with_crud())
}

#[test]
fn end_to_end_scenario() {
    let mut acl = crud();
    acl.add_roles(&[
        ("root", None),
        ("admin", Some("root")),
        ("dev", Some("admin")),
        ("edito", Some("admin")),
        ("guest", None),
    ])
    .unwrap();
    acl.add_resources(&[
        ("home", None),
        ("catalog", None),
        ("import", Some("catalog")),
        ("album", Some("catalog")),
        ("track", Some("album")),
    ])
    .unwrap();

    acl.allow(&["root"], &[], CREATE | READ | UPDATE | DELETE).unwrap();
    acl.deny(&["admin"], &[], DELETE).unwrap();
    acl.deny(&["dev", "edito"], &[], CREATE | UPDATE).unwrap();
    acl.allow(&["dev"], &["import"], CREATE | READ | UPDATE | DELETE).unwrap();

    assert!(acl.is_allowed("root", "track", 15).unwrap());
    assert!(!acl.is_allowed("admin", "home", 8).unwrap());
    assert!(acl.is_allowed("admin", "home", 7).unwrap());
    assert!(acl.is_allowed("dev", "import", 15).unwrap());
    assert!(acl.is_allowed("dev", "home", 2).unwrap());
    assert!(!acl.is_allowed("dev", "home", 1).unwrap());
    assert!(!acl.is_allowed("guest", "home", 1).unwrap());
}

#[test]
fn child_resource_denial_overrides_parent_grant() {
    let mut acl = crud();
    acl.add_role("x", None).unwrap();
    acl.add_resources(&[("a", None), ("b", Some("a"))]).unwrap();
    acl.allow(&["x"], &["a"], READ).unwrap();
    acl.deny(&["x"], &["b"], READ).unwrap();

    assert!(acl.is_allowed("x", "a", READ).unwrap());
    assert!(!acl.is_allowed("x", "b", READ).unwrap());
}

#[test]
fn child_role_denial_overrides_parent_grant() {
    let mut acl = crud();
    acl.add_roles(&[("parent", None), ("child", Some("parent"))]).unwrap();
    acl.add_resource("doc", None).unwrap();
    acl.allow(&["parent"], &["doc"], UPDATE).unwrap();
    acl.deny(&["child"], &["doc"], UPDATE).unwrap();

    assert!(!acl.is_allowed("child", "doc", UPDATE).unwrap());
    assert!(acl.is_allowed("parent", "doc", UPDATE).unwrap());
}

#[test]
fn ascendant_role_rule_here_beats_own_rule_upstream() {
    // the resource chain is folded first, so a rule at the child resource
    // for any role of the chain wins over the role's own rule further up
    let mut acl = crud();
    acl.add_roles(&[("parent", None), ("child", Some("parent"))]).unwrap();
    acl.add_resources(&[("a", None), ("b", Some("a"))]).unwrap();
    acl.allow(&["child"], &["a"], DELETE).unwrap();
    acl.deny(&["parent"], &["b"], DELETE).unwrap();

    assert!(acl.is_allowed("child", "a", DELETE).unwrap());
    assert!(!acl.is_allowed("child", "b", DELETE).unwrap());
}

#[test]
fn deep_chains_inherit_through_every_level() {
    let mut acl = crud();
    acl.add_roles(&[("r0", None), ("r1", Some("r0")), ("r2", Some("r1")), ("r3", Some("r2"))]).unwrap();
    acl.add_resources(&[("s0", None), ("s1", Some("s0")), ("s2", Some("s1")), ("s3", Some("s2"))]).unwrap();
    acl.allow(&["r0"], &["s0"], READ).unwrap();
    acl.allow(&["r2"], &["s2"], UPDATE).unwrap();

    assert_eq!(acl.effective_rights("r3", "s3").unwrap(), READ | UPDATE);
    assert_eq!(acl.effective_rights("r1", "s3").unwrap(), READ);
    assert_eq!(acl.effective_rights("r3", "s1").unwrap(), READ);
}

#[test]
fn sibling_roles_do_not_leak() {
    let mut acl = crud();
    acl.add_roles(&[("admin", None), ("dev", Some("admin")), ("edito", Some("admin"))]).unwrap();
    acl.add_resource("home", None).unwrap();
    acl.allow(&["dev"], &["home"], CREATE).unwrap();

    assert!(acl.is_allowed("dev", "home", CREATE).unwrap());
    assert!(!acl.is_allowed("edito", "home", CREATE).unwrap());
    assert!(!acl.is_allowed("admin", "home", CREATE).unwrap());
}

#[test]
fn multi_bit_mask_needs_every_bit() {
    let mut acl = crud();
    acl.add_role("user", None).unwrap();
    acl.add_resource("doc", None).unwrap();
    acl.allow(&["user"], &["doc"], CREATE | READ | UPDATE).unwrap();

    assert!(!acl.is_allowed("user", "doc", CRUD_ALL).unwrap());
    for bit in [CREATE, READ, UPDATE] {
        assert!(acl.is_allowed("user", "doc", bit).unwrap());
    }
    assert!(!acl.is_allowed("user", "doc", DELETE).unwrap());
}

#[test]
fn extended_resource_inherits_new_parent() {
    let mut acl = crud();
    acl.add_role("user", None).unwrap();
    acl.add_resources(&[("public", None), ("private", None), ("page", Some("private"))]).unwrap();
    acl.allow(&["user"], &["public"], READ).unwrap();
    assert!(!acl.is_allowed("user", "page", READ).unwrap());

    acl.extend_resource("page", Some("public")).unwrap();
    assert_eq!(acl.resource_ascendants("page").unwrap(), vec!["public"]);
    assert!(acl.is_allowed("user", "page", READ).unwrap());

    acl.extend_resource("page", None).unwrap();
    assert!(!acl.is_allowed("user", "page", READ).unwrap());
}
