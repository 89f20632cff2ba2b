//! Whole-pipeline invariant checks: structural properties that must hold
//! for any loaded bundle, exercised over the base modules plus a small
//! vendor corpus.
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use rmib_core::{
    Access, Definition, ImportClause, IndexItem, Language, Loader, Mib, ObjectTypeDef,
    OidComponent, OidExpr, Severity, SourceModule, Status, SyntaxExpr, TypeDef,
    ValueAssignmentDef,
};

fn oid_under(parent: &str, arc: u32) -> OidExpr {
    OidExpr::new(vec![OidComponent::Name(parent.to_owned()), OidComponent::Number(arc)])
}

/// A small but structurally varied vendor module: a subtree, a table, a
/// textual convention, and a deliberately dangling index reference.
fn corpus() -> Vec<SourceModule> {
    let mut m = SourceModule::new("ACME-MIB", Language::Smiv2);
    m.imports.push(ImportClause {
        symbols: vec![
            "OBJECT-TYPE".to_owned(),
            "enterprises".to_owned(),
            "Integer32".to_owned(),
        ],
        from: "SNMPv2-SMI".to_owned(),
        line: 1,
    });
    m.definitions.push(Definition::ValueAssignment(ValueAssignmentDef {
        name: "acme".to_owned(),
        line: 2,
        oid: oid_under("enterprises", 4444),
    }));
    m.definitions.push(Definition::TypeDef(TypeDef {
        name: "AcmeName".to_owned(),
        line: 3,
        syntax: SyntaxExpr::sized("OCTET STRING", vec![rmib_core::Range::new(0, 64)]),
        display_hint: Some("64a".to_owned()),
        status: Status::Current,
        description: None,
        reference: None,
        is_textual_convention: true,
    }));
    m.definitions.push(Definition::ObjectType(ObjectTypeDef {
        name: "acmeName".to_owned(),
        line: 4,
        syntax: SyntaxExpr::reference("AcmeName"),
        units: None,
        access: Access::ReadOnly,
        status: Status::Current,
        description: None,
        reference: None,
        indexes: Vec::new(),
        augments: None,
        defval: None,
        oid: oid_under("acme", 1),
    }));
    m.definitions.push(Definition::ObjectType(ObjectTypeDef {
        name: "acmeTable".to_owned(),
        line: 5,
        syntax: SyntaxExpr::SequenceOf { entry: "AcmeEntry".to_owned() },
        units: None,
        access: Access::NotAccessible,
        status: Status::Current,
        description: None,
        reference: None,
        indexes: Vec::new(),
        augments: None,
        defval: None,
        oid: oid_under("acme", 2),
    }));
    m.definitions.push(Definition::TypeDef(TypeDef {
        name: "AcmeEntry".to_owned(),
        line: 6,
        syntax: SyntaxExpr::Sequence,
        display_hint: None,
        status: Status::Current,
        description: None,
        reference: None,
        is_textual_convention: false,
    }));
    m.definitions.push(Definition::ObjectType(ObjectTypeDef {
        name: "acmeEntry".to_owned(),
        line: 7,
        syntax: SyntaxExpr::reference("AcmeEntry"),
        units: None,
        access: Access::NotAccessible,
        status: Status::Current,
        description: None,
        reference: None,
        indexes: vec![
            IndexItem { name: "acmeIndex".to_owned(), implied: false },
            IndexItem { name: "acmeMissing".to_owned(), implied: false },
        ],
        augments: None,
        defval: None,
        oid: oid_under("acmeTable", 1),
    }));
    m.definitions.push(Definition::ObjectType(ObjectTypeDef {
        name: "acmeIndex".to_owned(),
        line: 8,
        syntax: SyntaxExpr::reference("Integer32"),
        units: None,
        access: Access::NotAccessible,
        status: Status::Current,
        description: None,
        reference: None,
        indexes: Vec::new(),
        augments: None,
        defval: None,
        oid: oid_under("acmeEntry", 1),
    }));
    vec![m]
}

fn load() -> Mib {
    let mut loader = Loader::new();
    for m in corpus() {
        loader = loader.add_module(m);
    }
    loader.load().expect("load")
}

#[test]
fn every_parent_chain_terminates_at_the_root() {
    let mib = load();
    let limit = mib.node_count() + 1;
    for id in mib.subtree(mib.root()) {
        let mut cur = id;
        let mut steps = 0usize;
        while let Some(parent) = mib.node(cur).parent {
            cur = parent;
            steps += 1;
            assert!(steps <= limit, "parent chain too long at {:?}", mib.oid(id));
        }
        assert_eq!(cur, mib.root());
    }
}

#[test]
fn node_oid_roundtrips_through_lookup() {
    let mib = load();
    for id in mib.subtree(mib.root()) {
        let oid = mib.oid(id);
        assert_eq!(mib.node_by_oid(&oid), Some(id), "lookup of {oid}");
    }
}

#[test]
fn node_object_backlinks_agree() {
    let mib = load();
    for id in mib.subtree(mib.root()) {
        if let Some(object) = mib.node(id).object {
            assert_eq!(mib.object(object).node, id);
        }
        if let Some(notification) = mib.node(id).notification {
            assert_eq!(mib.notification(notification).node, id);
        }
    }
}

#[test]
fn longest_prefix_of_a_child_is_the_object_node() {
    let mib = load();
    for id in mib.object_ids() {
        let object = mib.object(id);
        let oid = mib.oid(object.node).child(99);
        assert_eq!(mib.longest_prefix_by_oid(&oid), Some(object.node));
    }
}

#[test]
fn type_parent_chains_terminate() {
    let mib = load();
    for start in mib.type_ids() {
        let mut visited = std::collections::HashSet::new();
        let mut cur = start;
        while let Some(parent) = mib.ty(cur).parent {
            assert!(visited.insert(cur), "cycle in the chain starting at {}", mib.ty(start).name);
            cur = parent;
        }
    }
}

#[test]
fn completeness_matches_the_unresolved_list() {
    let mib = load();
    // The corpus has a deliberately dangling index item.
    assert!(!mib.is_complete());
    assert_eq!(mib.is_complete(), mib.unresolved().is_empty());
    assert!(mib.unresolved().iter().any(|u| u.symbol == "acmeMissing"));
}

#[test]
fn has_errors_matches_the_severity_sweep() {
    let mib = load();
    let any_error = mib
        .diagnostics()
        .iter()
        .any(|d| d.severity.rank() <= Severity::Error.rank());
    assert_eq!(mib.has_errors(), any_error);
}

#[test]
fn emitted_codes_are_in_the_closed_set() {
    let mib = load();
    for d in mib.diagnostics() {
        assert!(rmib_core::ALL_CODES.contains(&d.code), "unknown code {}", d.code);
    }
}

#[test]
fn name_index_points_at_live_nodes() {
    let mib = load();
    let acme = mib.find_node("acme").expect("acme node");
    assert_eq!(mib.node(acme).name.as_deref(), Some("acme"));
    assert_eq!(mib.oid(acme).to_string(), "1.3.6.1.4.1.4444");
}
