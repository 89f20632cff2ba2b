//! End-to-end acceptance scenarios over a miniature IF-MIB corpus.
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use rmib_core::{
    Access, DefValExpr, Definition, ImportClause, IndexItem, Language, Loader, NamedValue,
    NodeKind, NotificationDef, ObjectTypeDef, OidComponent, OidExpr, Oid, Range, SourceModule,
    Status, StrictnessLevel, SyntaxExpr, TrapClause, TypeDef, ValueAssignmentDef, Code,
    ModuleIdentityDef,
};

// ---------------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------------

fn oid_under(parent: &str, arc: u32) -> OidExpr {
    OidExpr::new(vec![OidComponent::Name(parent.to_owned()), OidComponent::Number(arc)])
}

fn imports(module: &mut SourceModule, from: &str, symbols: &[&str]) {
    module.imports.push(ImportClause {
        symbols: symbols.iter().map(|s| (*s).to_owned()).collect(),
        from: from.to_owned(),
        line: 1,
    });
}

fn object(
    name: &str,
    syntax: SyntaxExpr,
    access: Access,
    parent: &str,
    arc: u32,
) -> ObjectTypeDef {
    ObjectTypeDef {
        name: name.to_owned(),
        line: 0,
        syntax,
        units: None,
        access,
        status: Status::Current,
        description: None,
        reference: None,
        indexes: Vec::new(),
        augments: None,
        defval: None,
        oid: oid_under(parent, arc),
    }
}

fn sequence_type(name: &str) -> Definition {
    Definition::TypeDef(TypeDef {
        name: name.to_owned(),
        line: 0,
        syntax: SyntaxExpr::Sequence,
        display_hint: None,
        status: Status::Current,
        description: None,
        reference: None,
        is_textual_convention: false,
    })
}

fn enums(items: &[(&str, i64)]) -> SyntaxExpr {
    SyntaxExpr::Enumerated {
        items: items.iter().map(|&(l, v)| NamedValue::new(l, v)).collect(),
    }
}

/// A miniature RFC 2863 IF-MIB: the interfaces group, ifTable with a
/// handful of columns, one group and one notification.
fn if_mib() -> SourceModule {
    let mut m = SourceModule::new("IF-MIB", Language::Smiv2);
    imports(
        &mut m,
        "SNMPv2-SMI",
        &[
            "MODULE-IDENTITY",
            "OBJECT-TYPE",
            "NOTIFICATION-TYPE",
            "mib-2",
            "Integer32",
            "Counter32",
            "Counter64",
            "Gauge32",
            "TimeTicks",
        ],
    );
    imports(&mut m, "SNMPv2-TC", &["DisplayString", "PhysAddress", "TruthValue"]);
    imports(&mut m, "SNMPv2-CONF", &["OBJECT-GROUP", "MODULE-COMPLIANCE"]);
    imports(&mut m, "IANAifType-MIB", &["IANAifType"]);

    m.definitions.push(Definition::ModuleIdentity(ModuleIdentityDef {
        name: "ifMIB".to_owned(),
        line: 10,
        last_updated: Some("200006140000Z".to_owned()),
        organization: Some("IETF Interfaces MIB Working Group".to_owned()),
        contact_info: None,
        description: Some("The MIB module to describe generic objects for network interface sub-layers.".to_owned()),
        revisions: vec![],
        oid: oid_under("mib-2", 31),
    }));
    m.definitions.push(Definition::ValueAssignment(ValueAssignmentDef {
        name: "ifMIBObjects".to_owned(),
        line: 12,
        oid: oid_under("ifMIB", 1),
    }));
    m.definitions.push(Definition::ValueAssignment(ValueAssignmentDef {
        name: "interfaces".to_owned(),
        line: 14,
        oid: oid_under("mib-2", 2),
    }));

    m.definitions.push(Definition::TypeDef(TypeDef {
        name: "InterfaceIndex".to_owned(),
        line: 20,
        syntax: SyntaxExpr::ranged("Integer32", vec![Range::new(1, 2_147_483_647)]),
        display_hint: Some("d".to_owned()),
        status: Status::Current,
        description: Some("A unique value for each interface.".to_owned()),
        reference: None,
        is_textual_convention: true,
    }));

    m.definitions.push(Definition::ObjectType(object(
        "ifNumber",
        SyntaxExpr::reference("Integer32"),
        Access::ReadOnly,
        "interfaces",
        1,
    )));
    m.definitions.push(Definition::ObjectType(object(
        "ifTable",
        SyntaxExpr::SequenceOf { entry: "IfEntry".to_owned() },
        Access::NotAccessible,
        "interfaces",
        2,
    )));
    m.definitions.push(sequence_type("IfEntry"));

    let mut entry = object(
        "ifEntry",
        SyntaxExpr::reference("IfEntry"),
        Access::NotAccessible,
        "ifTable",
        1,
    );
    entry.indexes = vec![IndexItem { name: "ifIndex".to_owned(), implied: false }];
    m.definitions.push(Definition::ObjectType(entry));

    let mut if_index = object(
        "ifIndex",
        SyntaxExpr::reference("InterfaceIndex"),
        Access::ReadOnly,
        "ifEntry",
        1,
    );
    if_index.description = Some("A unique value for each interface.".to_owned());
    m.definitions.push(Definition::ObjectType(if_index));

    m.definitions.push(Definition::ObjectType(object(
        "ifDescr",
        SyntaxExpr::sized("DisplayString", vec![Range::new(0, 255)]),
        Access::ReadOnly,
        "ifEntry",
        2,
    )));
    m.definitions.push(Definition::ObjectType(object(
        "ifType",
        SyntaxExpr::reference("IANAifType"),
        Access::ReadOnly,
        "ifEntry",
        3,
    )));
    m.definitions.push(Definition::ObjectType(object(
        "ifMtu",
        SyntaxExpr::reference("Integer32"),
        Access::ReadOnly,
        "ifEntry",
        4,
    )));
    m.definitions.push(Definition::ObjectType(object(
        "ifSpeed",
        SyntaxExpr::reference("Gauge32"),
        Access::ReadOnly,
        "ifEntry",
        5,
    )));
    m.definitions.push(Definition::ObjectType(object(
        "ifPhysAddress",
        SyntaxExpr::reference("PhysAddress"),
        Access::ReadOnly,
        "ifEntry",
        6,
    )));

    let mut admin = object(
        "ifAdminStatus",
        enums(&[("up", 1), ("down", 2), ("testing", 3)]),
        Access::ReadWrite,
        "ifEntry",
        7,
    );
    admin.defval = Some(DefValExpr::Name("up".to_owned()));
    m.definitions.push(Definition::ObjectType(admin));

    m.definitions.push(Definition::ObjectType(object(
        "ifOperStatus",
        enums(&[
            ("up", 1),
            ("down", 2),
            ("testing", 3),
            ("unknown", 4),
            ("dormant", 5),
            ("notPresent", 6),
            ("lowerLayerDown", 7),
        ]),
        Access::ReadOnly,
        "ifEntry",
        8,
    )));
    m.definitions.push(Definition::ObjectType(object(
        "ifLastChange",
        SyntaxExpr::reference("TimeTicks"),
        Access::ReadOnly,
        "ifEntry",
        9,
    )));
    m.definitions.push(Definition::ObjectType(object(
        "ifInOctets",
        SyntaxExpr::reference("Counter32"),
        Access::ReadOnly,
        "ifEntry",
        10,
    )));

    m.definitions.push(Definition::Notification(NotificationDef {
        name: "linkDown".to_owned(),
        line: 90,
        objects: vec!["ifIndex".to_owned(), "ifAdminStatus".to_owned(), "ifOperStatus".to_owned()],
        status: Status::Current,
        description: None,
        reference: None,
        oid: Some(oid_under("ifMIBObjects", 99)),
        trap: None,
    }));

    m
}

/// A tiny IANAifType-MIB with a few enum values.
fn ianaiftype_mib() -> SourceModule {
    let mut m = SourceModule::new("IANAifType-MIB", Language::Smiv2);
    imports(&mut m, "SNMPv2-TC", &["TEXTUAL-CONVENTION"]);
    m.definitions.push(Definition::TypeDef(TypeDef {
        name: "IANAifType".to_owned(),
        line: 5,
        syntax: enums(&[("other", 1), ("ethernetCsmacd", 6), ("softwareLoopback", 24)]),
        display_hint: None,
        status: Status::Current,
        description: None,
        reference: None,
        is_textual_convention: true,
    }));
    m
}

// ---------------------------------------------------------------------------
// Scenario 1: IF-MIB under normal strictness
// ---------------------------------------------------------------------------

#[test]
fn scenario_if_mib_loads_cleanly() {
    let mib = Loader::new()
        .add_module(if_mib())
        .add_module(ianaiftype_mib())
        .load()
        .expect("load");

    assert!(mib.module_count() >= 5);
    assert!(!mib.has_errors(), "diagnostics: {:?}", mib.diagnostics());

    let if_index = mib.find_object("ifIndex").expect("ifIndex");
    assert_eq!(mib.oid(mib.object(if_index).node).to_string(), "1.3.6.1.2.1.2.2.1.1");

    let if_entry = mib.find_object("ifEntry").expect("ifEntry");
    assert_eq!(mib.object(if_entry).kind, NodeKind::Row);

    let if_table = mib.find_object("ifTable").expect("ifTable");
    assert_eq!(mib.entry(if_table), Some(if_entry));
    assert_eq!(mib.row_of(if_index), Some(if_entry));

    // The effective display hint flows from the InterfaceIndex TC.
    assert_eq!(mib.object(if_index).display_hint.as_deref(), Some("d"));

    // The DEFVAL on ifAdminStatus interprets as the enum label.
    let admin = mib.find_object("ifAdminStatus").expect("ifAdminStatus");
    assert_eq!(mib.object(admin).defval.as_ref().map(|d| d.to_string()), Some("up".to_owned()));

    // Notification objects are back-linked.
    let link_down = mib.find_notification("linkDown").expect("linkDown");
    assert!(mib.notification(link_down).objects.iter().all(|o| o.object.is_some()));

    // Filtered collections see the table family.
    assert!(mib.tables().contains(&if_table));
    assert!(mib.rows().contains(&if_entry));
    assert!(mib.columns().contains(&if_index));
    let if_number = mib.find_object("ifNumber").expect("ifNumber");
    assert!(mib.scalars().contains(&if_number));
}

#[test]
fn scenario_module_scoped_and_oid_queries_agree() {
    let mib = Loader::new()
        .add_module(if_mib())
        .add_module(ianaiftype_mib())
        .load()
        .expect("load");

    let by_name = mib.find_object("ifIndex").expect("bare");
    let by_scope = mib.find_object("IF-MIB::ifIndex").expect("scoped");
    let by_oid = mib.find_object("1.3.6.1.2.1.2.2.1.1").expect("numeric");
    let by_dotted = mib.find_object(".1.3.6.1.2.1.2.2.1.1").expect("dot-leading");
    assert_eq!(by_name, by_scope);
    assert_eq!(by_name, by_oid);
    assert_eq!(by_name, by_dotted);
}

// ---------------------------------------------------------------------------
// Scenario 2: AUGMENTS inheritance
// ---------------------------------------------------------------------------

#[test]
fn scenario_augments_inherits_indexes() {
    let mut m = SourceModule::new("FOO-MIB", Language::Smiv2);
    imports(&mut m, "SNMPv2-SMI", &["OBJECT-TYPE", "enterprises", "Integer32"]);
    m.definitions.push(Definition::ValueAssignment(ValueAssignmentDef {
        name: "fooBase".to_owned(),
        line: 0,
        oid: oid_under("enterprises", 7777),
    }));
    m.definitions.push(Definition::ObjectType(object(
        "fooTable",
        SyntaxExpr::SequenceOf { entry: "FooEntry".to_owned() },
        Access::NotAccessible,
        "fooBase",
        1,
    )));
    m.definitions.push(sequence_type("FooEntry"));
    let mut foo_entry = object(
        "fooEntry",
        SyntaxExpr::reference("FooEntry"),
        Access::NotAccessible,
        "fooTable",
        1,
    );
    foo_entry.indexes = vec![IndexItem { name: "fooIndex".to_owned(), implied: false }];
    m.definitions.push(Definition::ObjectType(foo_entry));
    m.definitions.push(Definition::ObjectType(object(
        "fooIndex",
        SyntaxExpr::reference("Integer32"),
        Access::NotAccessible,
        "fooEntry",
        1,
    )));
    m.definitions.push(Definition::ObjectType(object(
        "fooXTable",
        SyntaxExpr::SequenceOf { entry: "FooXEntry".to_owned() },
        Access::NotAccessible,
        "fooBase",
        2,
    )));
    m.definitions.push(sequence_type("FooXEntry"));
    let mut x_entry = object(
        "fooXEntry",
        SyntaxExpr::reference("FooXEntry"),
        Access::NotAccessible,
        "fooXTable",
        1,
    );
    x_entry.augments = Some("fooEntry".to_owned());
    m.definitions.push(Definition::ObjectType(x_entry));

    let mib = Loader::new().add_module(m).load().expect("load");

    let x = mib.find_object("fooXEntry").expect("fooXEntry");
    let foo_index = mib.find_object("fooIndex").expect("fooIndex");
    let effective = mib.effective_indexes(x);
    assert_eq!(effective.len(), 1);
    assert_eq!(effective[0].object, Some(foo_index));
    assert_eq!(effective[0].label, "fooIndex");
}

// ---------------------------------------------------------------------------
// Scenarios 3 and 4: SMIv1 trap synthesis
// ---------------------------------------------------------------------------

#[test]
fn scenario_generic_trap_lands_under_snmp_traps() {
    let mut m = SourceModule::new("GEN-TRAP-MIB", Language::Smiv1);
    m.imports.push(ImportClause {
        symbols: vec!["TRAP-TYPE".to_owned()],
        from: "RFC-1215".to_owned(),
        line: 1,
    });
    m.definitions.push(Definition::Notification(NotificationDef {
        name: "coldStart".to_owned(),
        line: 4,
        objects: vec![],
        status: Status::Current,
        description: None,
        reference: None,
        oid: None,
        trap: Some(TrapClause { enterprise: "snmpTraps".to_owned(), number: 0 }),
    }));

    let mib = Loader::new()
        .add_module(m)
        .with_strictness(StrictnessLevel::Permissive)
        .load()
        .expect("load");

    let node = mib
        .node_by_oid(&"1.3.6.1.6.3.1.1.5.1".parse::<Oid>().unwrap())
        .expect("synthesized node");
    assert_eq!(mib.node(node).name.as_deref(), Some("coldStart"));
    assert_eq!(mib.node(node).kind, NodeKind::Notification);
}

#[test]
fn scenario_enterprise_trap_gets_the_zero_arc() {
    let mut m = SourceModule::new("CISCO-TRAP-MIB", Language::Smiv1);
    m.imports.push(ImportClause {
        symbols: vec!["enterprises".to_owned()],
        from: "RFC1155-SMI".to_owned(),
        line: 1,
    });
    m.definitions.push(Definition::ValueAssignment(ValueAssignmentDef {
        name: "cisco".to_owned(),
        line: 2,
        oid: oid_under("enterprises", 9),
    }));
    m.definitions.push(Definition::Notification(NotificationDef {
        name: "vendorTrap".to_owned(),
        line: 5,
        objects: vec![],
        status: Status::Current,
        description: None,
        reference: None,
        oid: None,
        trap: Some(TrapClause { enterprise: "cisco".to_owned(), number: 42 }),
    }));

    let mib = Loader::new().add_module(m).load().expect("load");
    let node = mib
        .node_by_oid(&"1.3.6.1.4.1.9.0.42".parse::<Oid>().unwrap())
        .expect("synthesized node");
    assert_eq!(mib.node(node).name.as_deref(), Some("vendorTrap"));
    let trap = mib.find_notification("vendorTrap").expect("notification record");
    let info = mib.notification(trap).trap_info.as_ref().expect("trap info");
    assert_eq!(info.enterprise, "cisco");
    assert_eq!(info.number, 42);
}

// ---------------------------------------------------------------------------
// Scenario 5: permissive vendor MIB
// ---------------------------------------------------------------------------

fn vendor_mib_without_imports() -> SourceModule {
    let mut m = SourceModule::new("VENDOR-MIB", Language::Smiv2);
    imports(&mut m, "SNMPv2-SMI", &["OBJECT-TYPE", "enterprises"]);
    m.definitions.push(Definition::ValueAssignment(ValueAssignmentDef {
        name: "vendorRoot".to_owned(),
        line: 2,
        oid: oid_under("enterprises", 5555),
    }));
    // Counter32 is used but never imported.
    m.definitions.push(Definition::ObjectType(object(
        "vendorPackets",
        SyntaxExpr::reference("Counter32"),
        Access::ReadOnly,
        "vendorRoot",
        1,
    )));
    m
}

#[test]
fn scenario_unimported_counter32_strict_vs_permissive() {
    let strict = Loader::new()
        .add_module(vendor_mib_without_imports())
        .with_strictness(StrictnessLevel::Strict)
        .load()
        .expect("strict load still completes");
    let obj = strict.find_object("vendorPackets").expect("object exists");
    assert!(strict.object(obj).type_id.is_none());
    assert!(strict.diagnostics().iter().any(|d| d.code == Code::TypeUnknown));

    let permissive = Loader::new()
        .add_module(vendor_mib_without_imports())
        .with_strictness(StrictnessLevel::Permissive)
        .load()
        .expect("permissive load");
    let obj = permissive.find_object("vendorPackets").expect("object exists");
    let ty = permissive.object(obj).type_id.expect("type resolved via fallback");
    assert_eq!(permissive.ty(ty).name, "Counter32");
    assert!(!permissive.has_errors());
}

// ---------------------------------------------------------------------------
// Scenario 6: duplicate OID node, SMIv2 wins
// ---------------------------------------------------------------------------

#[test]
fn scenario_duplicate_if_entry_prefers_smiv2() {
    // An RFC1213-style SMIv1 module defining ifTable at the same OIDs as
    // IF-MIB.
    let mut old = SourceModule::new("OLD-INTERFACES-MIB", Language::Smiv1);
    old.imports.push(ImportClause {
        symbols: vec!["mgmt".to_owned()],
        from: "RFC1155-SMI".to_owned(),
        line: 1,
    });
    old.definitions.push(Definition::ValueAssignment(ValueAssignmentDef {
        name: "mib-2".to_owned(),
        line: 2,
        oid: oid_under("mgmt", 1),
    }));
    old.definitions.push(Definition::ValueAssignment(ValueAssignmentDef {
        name: "interfaces".to_owned(),
        line: 3,
        oid: oid_under("mib-2", 2),
    }));
    old.definitions.push(Definition::ObjectType(object(
        "ifTable",
        SyntaxExpr::SequenceOf { entry: "IfEntry".to_owned() },
        Access::NotAccessible,
        "interfaces",
        2,
    )));
    old.definitions.push(sequence_type("IfEntry"));
    let mut old_entry = object(
        "ifEntry",
        SyntaxExpr::reference("IfEntry"),
        Access::NotAccessible,
        "ifTable",
        1,
    );
    old_entry.indexes = vec![IndexItem { name: "ifIndex".to_owned(), implied: false }];
    old.definitions.push(Definition::ObjectType(old_entry));
    old.definitions.push(Definition::ObjectType(object(
        "ifIndex",
        SyntaxExpr::ranged("INTEGER", vec![Range::new(1, 65535)]),
        Access::ReadOnly,
        "ifEntry",
        1,
    )));

    let mib = Loader::new()
        .add_module(old)
        .add_module(if_mib())
        .add_module(ianaiftype_mib())
        .load()
        .expect("load");

    let if_entry = mib.find_object("ifEntry").expect("ifEntry");
    let winner = mib.object(if_entry).module;
    assert_eq!(mib.module(winner).name, "IF-MIB");

    // The losing module still resolves through a scoped query.
    let old_entry = mib.find_object("OLD-INTERFACES-MIB::ifEntry").expect("scoped");
    assert_eq!(mib.module(mib.object(old_entry).module).name, "OLD-INTERFACES-MIB");
}
