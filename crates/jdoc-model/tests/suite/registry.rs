use jdoc_model::{
    Argument, ClassKind, ClassPrototype, ClassRegistry, ConstructorPrototype, FieldPrototype,
    MemberAccess, MemberFlags, MethodPrototype, TypeRef,
};
use pretty_assertions::assert_eq;

fn model(package: &str, name: &str) -> jdoc_model::ClassModel {
    let mut proto = ClassPrototype::new(package, name, ClassKind::Regular, None, vec![]);
    proto.constructors.push(ConstructorPrototype {
        access: MemberAccess::Public,
        arguments: vec![Argument::new(TypeRef::new("int"), "size")],
        throws: vec![],
    });
    proto.methods.push(MethodPrototype {
        access: MemberAccess::Public,
        flags: MemberFlags::NONE,
        name: "size".to_string(),
        return_type: TypeRef::new("int"),
        arguments: vec![],
        throws: vec![],
    });
    proto.fields.push(FieldPrototype {
        access: MemberAccess::Public,
        flags: MemberFlags::STATIC_FINAL,
        name: "MAX".to_string(),
        ty: TypeRef::new("int"),
        value: Some("16".to_string()),
    });
    proto.freeze(None)
}

#[test]
fn simple_names_resolve_only_when_unambiguous() {
    let registry: ClassRegistry = [
        model("java.util", "List"),
        model("java.awt", "List"),
        model("java.util", "Vector"),
    ]
    .into_iter()
    .collect();

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.resolve_simple_name("Vector"), Some("java.util.Vector"));
    assert_eq!(registry.resolve_simple_name("List"), None);
    assert_eq!(registry.resolve_simple_name("Missing"), None);
    assert_eq!(
        registry.resolve_simple_name("java.awt.List"),
        Some("java.awt.List")
    );
}

#[test]
fn insert_replaces_existing_model() {
    let mut registry = ClassRegistry::new();
    assert!(registry.insert(model("p", "C")).is_none());
    assert!(registry.insert(model("p", "C")).is_some());
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("p.C"));
}

#[test]
fn identities_are_unique_across_classes_and_members() {
    let registry: ClassRegistry = [model("p", "A"), model("p", "B"), model("q", "A")]
        .into_iter()
        .collect();
    registry.check_identities().unwrap();

    let ids: Vec<_> = registry
        .get("p.A")
        .unwrap()
        .member_ids()
        .into_iter()
        .map(|(identity, _)| identity)
        .collect();
    assert_eq!(
        ids,
        vec![
            "p.A#<init> public (int)".to_string(),
            "p.A#size public [] int ()".to_string(),
            "p.A#MAX constant public [static final] int".to_string(),
        ]
    );
}

#[test]
fn registry_serializes_as_a_map_keyed_by_full_name() {
    let registry: ClassRegistry = [model("p", "C")].into_iter().collect();
    let json = serde_json::to_value(&registry).unwrap();

    let class = &json["p.C"];
    assert_eq!(class["kind"], "regular");
    assert_eq!(class["constants"][0]["name"], "MAX");
    assert_eq!(class["constants"][0]["value"], "16");
    assert_eq!(class["constants"][0]["type"], "int");
    assert_eq!(class["methods"][0]["return_type"], "int");
}
