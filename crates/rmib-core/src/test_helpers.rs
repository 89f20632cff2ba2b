//! Shared test helper functions for constructing lowered-module fixtures.
//!
//! This module is compiled only in test builds and provides common
//! builders for [`SourceModule`] definitions used across unit test modules
//! throughout `rmib-core`.
//!
//! Integration tests in `crates/rmib-core/tests/` define their own local
//! helpers because they link against the non-test library build where this
//! module is not available.
#![allow(clippy::expect_used)]

use crate::context::ResolverContext;
use crate::diag::DiagnosticConfig;
use crate::imports;
use crate::ir::{
    Access, Definition, ImportClause, IndexItem, Language, NotificationDef, ObjectTypeDef,
    OidComponent, OidExpr, SourceModule, Status, SyntaxExpr, ValueAssignmentDef,
};
use crate::oid_resolve;
use crate::registrar;
use crate::semantic;
use crate::type_resolve;

/// Runs the full pipeline (register, bind, OIDs, types, semantics) over
/// the given user modules and hands back the raw context.
pub fn run_pipeline(user: Vec<SourceModule>, config: DiagnosticConfig) -> ResolverContext {
    let mut ctx = ResolverContext::new(config, None);
    registrar::register(&mut ctx, user);
    imports::bind(&mut ctx);
    oid_resolve::run(&mut ctx);
    type_resolve::run(&mut ctx);
    semantic::run(&mut ctx);
    ctx
}

/// A `{ parent arc }` OID expression.
pub fn oid_under(parent: &str, arc: u32) -> OidExpr {
    OidExpr::new(vec![OidComponent::Name(parent.to_owned()), OidComponent::Number(arc)])
}

/// An SMIv2 module shell importing the usual suspects from `SNMPv2-SMI`.
pub fn smiv2_module(name: &str, symbols: &[&str]) -> SourceModule {
    let mut m = SourceModule::new(name, Language::Smiv2);
    m.imports.push(ImportClause {
        symbols: symbols.iter().map(|s| (*s).to_owned()).collect(),
        from: "SNMPv2-SMI".to_owned(),
        line: 1,
    });
    m
}

/// A value assignment `name ::= { parent arc }`.
pub fn value_assignment(name: &str, parent: &str, arc: u32) -> Definition {
    Definition::ValueAssignment(ValueAssignmentDef {
        name: name.to_owned(),
        line: 0,
        oid: oid_under(parent, arc),
    })
}

/// An `OBJECT-TYPE` with read-only access, current status, and no table
/// clauses.
pub fn scalar(name: &str, syntax: SyntaxExpr, parent: &str, arc: u32) -> ObjectTypeDef {
    ObjectTypeDef {
        name: name.to_owned(),
        line: 0,
        syntax,
        units: None,
        access: Access::ReadOnly,
        status: Status::Current,
        description: None,
        reference: None,
        indexes: Vec::new(),
        augments: None,
        defval: None,
        oid: oid_under(parent, arc),
    }
}

/// A table object: `SEQUENCE OF <entry>` syntax, not-accessible.
pub fn table(name: &str, entry: &str, parent: &str, arc: u32) -> ObjectTypeDef {
    let mut def = scalar(name, SyntaxExpr::SequenceOf { entry: entry.to_owned() }, parent, arc);
    def.access = Access::NotAccessible;
    def
}

/// A row object with the given `INDEX` items.
pub fn row(name: &str, entry_type: &str, indexes: &[&str], parent: &str, arc: u32) -> ObjectTypeDef {
    let mut def = scalar(name, SyntaxExpr::reference(entry_type), parent, arc);
    def.access = Access::NotAccessible;
    def.indexes = indexes
        .iter()
        .map(|i| IndexItem { name: (*i).to_owned(), implied: false })
        .collect();
    def
}

/// A row object that augments another row.
pub fn augmenting_row(
    name: &str,
    entry_type: &str,
    augments: &str,
    parent: &str,
    arc: u32,
) -> ObjectTypeDef {
    let mut def = scalar(name, SyntaxExpr::reference(entry_type), parent, arc);
    def.access = Access::NotAccessible;
    def.augments = Some(augments.to_owned());
    def
}

/// An SMIv2 `NOTIFICATION-TYPE`.
pub fn notification(name: &str, objects: &[&str], parent: &str, arc: u32) -> Definition {
    Definition::Notification(NotificationDef {
        name: name.to_owned(),
        line: 0,
        objects: objects.iter().map(|o| (*o).to_owned()).collect(),
        status: Status::Current,
        description: None,
        reference: None,
        oid: Some(oid_under(parent, arc)),
        trap: None,
    })
}

/// Builds the classic one-table module used across the semantic tests:
///
/// ```text
/// fooBase     ::= { enterprises 9999 }
/// fooTable    OBJECT-TYPE SYNTAX SEQUENCE OF FooEntry ::= { fooBase 1 }
/// fooEntry    OBJECT-TYPE INDEX { fooIndex }          ::= { fooTable 1 }
/// fooIndex    OBJECT-TYPE SYNTAX Integer32            ::= { fooEntry 1 }
/// fooDescr    OBJECT-TYPE SYNTAX OCTET STRING         ::= { fooEntry 2 }
/// ```
pub fn foo_table_module() -> SourceModule {
    let mut m = smiv2_module("FOO-MIB", &["enterprises", "Integer32", "OBJECT-TYPE"]);
    m.definitions.push(value_assignment("fooBase", "enterprises", 9999));
    m.definitions.push(Definition::TypeDef(crate::ir::TypeDef {
        name: "FooEntry".to_owned(),
        line: 0,
        syntax: SyntaxExpr::Sequence,
        display_hint: None,
        status: Status::Current,
        description: None,
        reference: None,
        is_textual_convention: false,
    }));
    m.definitions.push(Definition::ObjectType(table("fooTable", "FooEntry", "fooBase", 1)));
    m.definitions.push(Definition::ObjectType(row(
        "fooEntry",
        "FooEntry",
        &["fooIndex"],
        "fooTable",
        1,
    )));
    let mut index = scalar("fooIndex", SyntaxExpr::reference("Integer32"), "fooEntry", 1);
    index.access = Access::NotAccessible;
    m.definitions.push(Definition::ObjectType(index));
    m.definitions.push(Definition::ObjectType(scalar(
        "fooDescr",
        SyntaxExpr::reference("OCTET STRING"),
        "fooEntry",
        2,
    )));
    m
}
