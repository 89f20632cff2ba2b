//! Synthetic base modules and well-known SMI name tables.
//!
//! The well-known scaffolding modules (`SNMPv2-SMI`, `RFC1155-SMI`,
//! `SNMPv2-TC`, …) are synthesized here as ordinary [`SourceModule`]s and
//! fed through the same pipeline as user modules. Building them as IR
//! rather than as pre-resolved records keeps the resolver honest: the top
//! OID arcs, the application types and the standard textual conventions
//! take exactly the code path everything else takes.
use crate::ir::{
    Definition, ImportClause, Language, NamedValue, OidComponent, OidExpr, Range, SourceModule,
    Status, SyntaxExpr, TypeDef, ValueAssignmentDef,
};
use crate::types::BaseType;

// ---------------------------------------------------------------------------
// Name tables
// ---------------------------------------------------------------------------

/// The four ASN.1 primitives seeded on `SNMPv2-SMI`. These resolve there
/// regardless of imports — that much is RFC-compliant even in strict mode.
pub const PRIMITIVE_TYPE_NAMES: [&str; 4] =
    ["INTEGER", "OCTET STRING", "OBJECT IDENTIFIER", "BITS"];

/// SMIv2 application and base types that permissive mode resolves to
/// `SNMPv2-SMI` without an import.
pub const SMIV2_TYPE_FALLBACK: [&str; 8] = [
    "Integer32",
    "Counter32",
    "Counter64",
    "Gauge32",
    "Unsigned32",
    "TimeTicks",
    "IpAddress",
    "Opaque",
];

/// SMIv1 application types that permissive mode resolves to `RFC1155-SMI`.
pub const RFC1155_TYPE_FALLBACK: [&str; 3] = ["Counter", "Gauge", "NetworkAddress"];

/// The standard textual conventions that permissive mode resolves to
/// `SNMPv2-TC`.
pub const SNMPV2_TC_FALLBACK: [&str; 16] = [
    "DisplayString",
    "TruthValue",
    "PhysAddress",
    "MacAddress",
    "RowStatus",
    "TimeStamp",
    "TimeInterval",
    "DateAndTime",
    "StorageType",
    "TestAndIncr",
    "AutonomousType",
    "VariablePointer",
    "RowPointer",
    "InstancePointer",
    "TDomain",
    "TAddress",
];

/// Global OID root names that an unresolved parent component may fall back
/// to (permissive mode only); all of them live in `SNMPv2-SMI`.
pub const GLOBAL_OID_ROOTS: [&str; 15] = [
    "internet",
    "directory",
    "mgmt",
    "mib-2",
    "transmission",
    "experimental",
    "private",
    "enterprises",
    "security",
    "snmpV2",
    "snmpDomains",
    "snmpProxys",
    "snmpModules",
    "zeroDotZero",
    "snmp",
];

/// Type names accepted bare in an `INDEX` clause without resolving to an
/// object. `OBJECT IDENTIFIER` is deliberately absent.
pub const BARE_INDEX_TYPE_NAMES: [&str; 14] = [
    "INTEGER",
    "OCTET STRING",
    "BITS",
    "Integer32",
    "Counter",
    "Counter32",
    "Counter64",
    "Gauge",
    "Gauge32",
    "Unsigned32",
    "TimeTicks",
    "IpAddress",
    "NetworkAddress",
    "Opaque",
];

/// Names of the synthesized base modules, in registration order.
pub const BASE_MODULE_NAMES: [&str; 8] = [
    "SNMPv2-SMI",
    "RFC1155-SMI",
    "RFC-1212",
    "RFC-1215",
    "SNMPv2-TC",
    "SNMPv2-CONF",
    "SNMPv2-MIB",
    "RFC1213-MIB",
];

/// `true` when `name` is one of the synthesized base modules.
pub fn is_base_module_name(name: &str) -> bool {
    BASE_MODULE_NAMES.contains(&name)
}

/// The application-base tag for a type defined in a base module, when the
/// type's syntax alone does not carry it (`Counter32 ::= INTEGER (…)` reads
/// as an integer refinement; its tag is what makes it an application type).
pub fn application_base(module: &str, type_name: &str) -> Option<BaseType> {
    match (module, type_name) {
        ("SNMPv2-SMI", "Counter32") | ("RFC1155-SMI", "Counter") => Some(BaseType::Counter32),
        ("SNMPv2-SMI", "Counter64") => Some(BaseType::Counter64),
        ("SNMPv2-SMI", "Gauge32") | ("RFC1155-SMI", "Gauge") => Some(BaseType::Gauge32),
        ("SNMPv2-SMI", "Unsigned32") => Some(BaseType::Unsigned32),
        ("SNMPv2-SMI", "TimeTicks") | ("RFC1155-SMI", "TimeTicks") => Some(BaseType::TimeTicks),
        ("SNMPv2-SMI", "IpAddress")
        | ("RFC1155-SMI", "IpAddress")
        | ("RFC1155-SMI", "NetworkAddress") => Some(BaseType::IpAddress),
        ("SNMPv2-SMI", "Opaque") | ("RFC1155-SMI", "Opaque") => Some(BaseType::Opaque),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// IR builders
// ---------------------------------------------------------------------------

fn name(s: &str) -> OidComponent {
    OidComponent::Name(s.to_owned())
}

fn num(n: u32) -> OidComponent {
    OidComponent::Number(n)
}

fn named_num(s: &str, n: u32) -> OidComponent {
    OidComponent::NamedNumber { name: s.to_owned(), number: n }
}

/// `name ::= { parent arc }`
fn val(def_name: &str, parent: &str, arc: u32) -> Definition {
    Definition::ValueAssignment(ValueAssignmentDef {
        name: def_name.to_owned(),
        line: 0,
        oid: OidExpr::new(vec![name(parent), num(arc)]),
    })
}

/// A value assignment with an explicit component list.
fn val_components(def_name: &str, components: Vec<OidComponent>) -> Definition {
    Definition::ValueAssignment(ValueAssignmentDef {
        name: def_name.to_owned(),
        line: 0,
        oid: OidExpr::new(components),
    })
}

fn type_def(def_name: &str, syntax: SyntaxExpr) -> Definition {
    Definition::TypeDef(TypeDef {
        name: def_name.to_owned(),
        line: 0,
        syntax,
        display_hint: None,
        status: Status::Current,
        description: None,
        reference: None,
        is_textual_convention: false,
    })
}

fn tc_def(def_name: &str, syntax: SyntaxExpr, hint: Option<&str>) -> Definition {
    Definition::TypeDef(TypeDef {
        name: def_name.to_owned(),
        line: 0,
        syntax,
        display_hint: hint.map(str::to_owned),
        status: Status::Current,
        description: None,
        reference: None,
        is_textual_convention: true,
    })
}

fn enums(items: &[(&str, i64)]) -> SyntaxExpr {
    SyntaxExpr::Enumerated {
        items: items.iter().map(|&(l, v)| NamedValue::new(l, v)).collect(),
    }
}

const U32_MAX: i128 = 4_294_967_295;
const I32_MIN: i128 = -2_147_483_648;
const I32_MAX: i128 = 2_147_483_647;
const U64_MAX: i128 = 18_446_744_073_709_551_615;

// ---------------------------------------------------------------------------
// Module builders
// ---------------------------------------------------------------------------

fn snmpv2_smi() -> SourceModule {
    let mut m = SourceModule::new("SNMPv2-SMI", Language::Smiv2);
    m.macros = vec![
        "MODULE-IDENTITY".to_owned(),
        "OBJECT-IDENTITY".to_owned(),
        "OBJECT-TYPE".to_owned(),
        "NOTIFICATION-TYPE".to_owned(),
    ];
    m.definitions = vec![
        val_components("iso", vec![num(1)]),
        val("org", "iso", 3),
        val("dod", "org", 6),
        val("internet", "dod", 1),
        val("directory", "internet", 1),
        val("mgmt", "internet", 2),
        val("mib-2", "mgmt", 1),
        val("transmission", "mib-2", 10),
        val("snmp", "mib-2", 11),
        val("experimental", "internet", 3),
        val("private", "internet", 4),
        val("enterprises", "private", 1),
        val("security", "internet", 5),
        val("snmpV2", "internet", 6),
        val("snmpDomains", "snmpV2", 1),
        val("snmpProxys", "snmpV2", 2),
        val("snmpModules", "snmpV2", 3),
        val_components("zeroDotZero", vec![num(0), num(0)]),
        type_def("Integer32", SyntaxExpr::ranged("INTEGER", vec![Range::new(I32_MIN, I32_MAX)])),
        type_def("Counter32", SyntaxExpr::ranged("INTEGER", vec![Range::new(0, U32_MAX)])),
        type_def("Gauge32", SyntaxExpr::ranged("INTEGER", vec![Range::new(0, U32_MAX)])),
        type_def("Unsigned32", SyntaxExpr::ranged("INTEGER", vec![Range::new(0, U32_MAX)])),
        type_def("TimeTicks", SyntaxExpr::ranged("INTEGER", vec![Range::new(0, U32_MAX)])),
        type_def("IpAddress", SyntaxExpr::sized("OCTET STRING", vec![Range::point(4)])),
        type_def("Opaque", SyntaxExpr::reference("OCTET STRING")),
        type_def("Counter64", SyntaxExpr::ranged("INTEGER", vec![Range::new(0, U64_MAX)])),
    ];
    m
}

fn rfc1155_smi() -> SourceModule {
    let mut m = SourceModule::new("RFC1155-SMI", Language::Smiv1);
    m.macros = vec!["OBJECT-TYPE".to_owned()];
    m.definitions = vec![
        val_components(
            "internet",
            vec![name("iso"), named_num("org", 3), named_num("dod", 6), num(1)],
        ),
        val("directory", "internet", 1),
        val("mgmt", "internet", 2),
        val("experimental", "internet", 3),
        val("private", "internet", 4),
        val("enterprises", "private", 1),
        // NetworkAddress is a CHOICE of one alternative; lowering flattens
        // it to the alternative itself.
        type_def("NetworkAddress", SyntaxExpr::reference("IpAddress")),
        type_def("IpAddress", SyntaxExpr::sized("OCTET STRING", vec![Range::point(4)])),
        type_def("Counter", SyntaxExpr::ranged("INTEGER", vec![Range::new(0, U32_MAX)])),
        type_def("Gauge", SyntaxExpr::ranged("INTEGER", vec![Range::new(0, U32_MAX)])),
        type_def("TimeTicks", SyntaxExpr::ranged("INTEGER", vec![Range::new(0, U32_MAX)])),
        type_def("Opaque", SyntaxExpr::reference("OCTET STRING")),
    ];
    m
}

fn rfc_1212() -> SourceModule {
    let mut m = SourceModule::new("RFC-1212", Language::Smiv1);
    m.macros = vec!["OBJECT-TYPE".to_owned()];
    m
}

fn rfc_1215() -> SourceModule {
    let mut m = SourceModule::new("RFC-1215", Language::Smiv1);
    m.macros = vec!["TRAP-TYPE".to_owned()];
    m
}

fn snmpv2_tc() -> SourceModule {
    let mut m = SourceModule::new("SNMPv2-TC", Language::Smiv2);
    m.macros = vec!["TEXTUAL-CONVENTION".to_owned()];
    m.imports = vec![ImportClause {
        symbols: vec!["TimeTicks".to_owned()],
        from: "SNMPv2-SMI".to_owned(),
        line: 0,
    }];
    m.definitions = vec![
        tc_def(
            "DisplayString",
            SyntaxExpr::sized("OCTET STRING", vec![Range::new(0, 255)]),
            Some("255a"),
        ),
        tc_def("PhysAddress", SyntaxExpr::reference("OCTET STRING"), Some("1x:")),
        tc_def(
            "MacAddress",
            SyntaxExpr::sized("OCTET STRING", vec![Range::point(6)]),
            Some("1x:"),
        ),
        tc_def("TruthValue", enums(&[("true", 1), ("false", 2)]), None),
        tc_def("TestAndIncr", SyntaxExpr::ranged("INTEGER", vec![Range::new(0, I32_MAX)]), None),
        tc_def("AutonomousType", SyntaxExpr::reference("OBJECT IDENTIFIER"), None),
        tc_def("InstancePointer", SyntaxExpr::reference("OBJECT IDENTIFIER"), None),
        tc_def("VariablePointer", SyntaxExpr::reference("OBJECT IDENTIFIER"), None),
        tc_def("RowPointer", SyntaxExpr::reference("OBJECT IDENTIFIER"), None),
        tc_def(
            "RowStatus",
            enums(&[
                ("active", 1),
                ("notInService", 2),
                ("notReady", 3),
                ("createAndGo", 4),
                ("createAndWait", 5),
                ("destroy", 6),
            ]),
            None,
        ),
        tc_def("TimeStamp", SyntaxExpr::reference("TimeTicks"), None),
        tc_def("TimeInterval", SyntaxExpr::ranged("INTEGER", vec![Range::new(0, I32_MAX)]), None),
        tc_def(
            "DateAndTime",
            SyntaxExpr::sized("OCTET STRING", vec![Range::point(8), Range::point(11)]),
            Some("2d-1d-1d,1d:1d:1d.1d,1a1d:1d"),
        ),
        tc_def(
            "StorageType",
            enums(&[
                ("other", 1),
                ("volatile", 2),
                ("nonVolatile", 3),
                ("permanent", 4),
                ("readOnly", 5),
            ]),
            None,
        ),
        tc_def("TDomain", SyntaxExpr::reference("OBJECT IDENTIFIER"), None),
        tc_def("TAddress", SyntaxExpr::sized("OCTET STRING", vec![Range::new(1, 255)]), None),
    ];
    m
}

fn snmpv2_conf() -> SourceModule {
    let mut m = SourceModule::new("SNMPv2-CONF", Language::Smiv2);
    m.macros = vec![
        "OBJECT-GROUP".to_owned(),
        "NOTIFICATION-GROUP".to_owned(),
        "MODULE-COMPLIANCE".to_owned(),
        "AGENT-CAPABILITIES".to_owned(),
    ];
    m
}

fn snmpv2_mib() -> SourceModule {
    let mut m = SourceModule::new("SNMPv2-MIB", Language::Smiv2);
    m.imports = vec![ImportClause {
        symbols: vec!["snmpModules".to_owned()],
        from: "SNMPv2-SMI".to_owned(),
        line: 0,
    }];
    // Only the arcs that RFC 3584 trap synthesis and snmpTrapOID plumbing
    // need; the full SNMPv2-MIB object set belongs to a real corpus.
    m.definitions = vec![
        val("snmpMIB", "snmpModules", 1),
        val("snmpMIBObjects", "snmpMIB", 1),
        val("snmpTrap", "snmpMIBObjects", 4),
        val("snmpTrapOID", "snmpTrap", 1),
        val("snmpTrapEnterprise", "snmpTrap", 3),
        val("snmpTraps", "snmpMIBObjects", 5),
    ];
    m
}

fn rfc1213_mib() -> SourceModule {
    let mut m = SourceModule::new("RFC1213-MIB", Language::Smiv1);
    m.imports = vec![ImportClause {
        symbols: vec!["mgmt".to_owned()],
        from: "RFC1155-SMI".to_owned(),
        line: 0,
    }];
    m.definitions = vec![
        val("mib-2", "mgmt", 1),
        val("system", "mib-2", 1),
        val("interfaces", "mib-2", 2),
        val("at", "mib-2", 3),
        val("ip", "mib-2", 4),
        val("icmp", "mib-2", 5),
        val("tcp", "mib-2", 6),
        val("udp", "mib-2", 7),
        val("egp", "mib-2", 8),
        val("transmission", "mib-2", 10),
        val("snmp", "mib-2", 11),
        // v1 copies; the type resolver relinks them onto SNMPv2-TC.
        type_def("DisplayString", SyntaxExpr::sized("OCTET STRING", vec![Range::new(0, 255)])),
        type_def("PhysAddress", SyntaxExpr::reference("OCTET STRING")),
    ];
    m
}

/// Builds every synthesized base module, in registration order.
pub fn base_modules() -> Vec<SourceModule> {
    vec![
        snmpv2_smi(),
        rfc1155_smi(),
        rfc_1212(),
        rfc_1215(),
        snmpv2_tc(),
        snmpv2_conf(),
        snmpv2_mib(),
        rfc1213_mib(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_module_order_matches_names() {
        let modules = base_modules();
        let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, BASE_MODULE_NAMES);
    }

    #[test]
    fn every_base_module_name_is_recognized() {
        for name in BASE_MODULE_NAMES {
            assert!(is_base_module_name(name));
        }
        assert!(!is_base_module_name("IF-MIB"));
    }

    #[test]
    fn application_base_table() {
        assert_eq!(application_base("SNMPv2-SMI", "Counter64"), Some(BaseType::Counter64));
        assert_eq!(application_base("RFC1155-SMI", "Counter"), Some(BaseType::Counter32));
        assert_eq!(
            application_base("RFC1155-SMI", "NetworkAddress"),
            Some(BaseType::IpAddress)
        );
        assert_eq!(application_base("SNMPv2-SMI", "Integer32"), None);
        assert_eq!(application_base("IF-MIB", "Counter64"), None);
    }

    #[test]
    fn tc_module_covers_the_fallback_set() {
        let tc = snmpv2_tc();
        for name in SNMPV2_TC_FALLBACK {
            assert!(
                tc.definitions.iter().any(|d| d.name() == name),
                "missing TC {name}"
            );
        }
    }

    #[test]
    fn smi_module_covers_the_global_roots() {
        let smi = snmpv2_smi();
        for root in GLOBAL_OID_ROOTS {
            if root == "iso" {
                continue;
            }
            assert!(
                smi.definitions.iter().any(|d| d.name() == root),
                "missing global root {root}"
            );
        }
    }
}
