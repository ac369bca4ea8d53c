use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use jdoc_model::{
    fold_models, Argument, ClassKind, ClassModel, ClassPrototype, FieldPrototype, MemberAccess,
    MemberFlags, MergeError, MethodPrototype, TypeRef,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn ty(name: &str) -> TypeRef {
    TypeRef::parse(name).unwrap()
}

fn method(name: &str, ret: &str, args: &[&str], throws: &[&str]) -> MethodPrototype {
    MethodPrototype {
        access: MemberAccess::Public,
        flags: MemberFlags::NONE,
        name: name.to_string(),
        return_type: ty(ret),
        arguments: args
            .iter()
            .enumerate()
            .map(|(idx, t)| Argument::new(ty(t), format!("arg{idx}")))
            .collect(),
        throws: throws.iter().map(|t| ty(t)).collect(),
    }
}

fn class(kind: ClassKind, parent: Option<&str>) -> ClassPrototype {
    let mut proto = ClassPrototype::new("p", "C", kind, parent.map(ty), vec![]);
    proto.fields.push(FieldPrototype {
        access: MemberAccess::Public,
        flags: MemberFlags::STATIC_FINAL,
        name: "LIMIT".to_string(),
        ty: ty("int"),
        value: None,
    });
    proto
}

fn field(name: &str) -> FieldPrototype {
    FieldPrototype {
        access: MemberAccess::Private,
        flags: MemberFlags::NONE,
        name: name.to_string(),
        ty: ty("int"),
        value: None,
    }
}

fn freeze(proto: ClassPrototype, source: &str) -> ClassModel {
    proto.freeze(Some(PathBuf::from(source)))
}

#[test]
fn throws_sets_are_unioned_for_the_same_method() {
    let mut a = class(ClassKind::Regular, None);
    a.methods.push(method("size", "int", &[], &[]));
    let mut b = class(ClassKind::Regular, None);
    b.methods.push(method("size", "int", &[], &["java.lang.IllegalStateException"]));

    let merged = freeze(a, "a.html").merge(&freeze(b, "b.html")).unwrap();
    assert_eq!(merged.methods().len(), 1);
    assert_eq!(
        merged.methods()[0].throws,
        BTreeSet::from([ty("java.lang.IllegalStateException")])
    );
    assert_eq!(
        merged.sources(),
        &[PathBuf::from("a.html"), PathBuf::from("b.html")]
    );
}

#[test]
fn repeated_members_on_one_page_collapse_when_frozen() {
    let mut proto = class(ClassKind::Regular, None);
    proto.fields.push(field("x"));
    proto.fields.push(field("x"));
    proto.methods.push(method("size", "int", &[], &[]));
    proto.methods.push(method("size", "int", &[], &["p.E"]));
    let model = freeze(proto, "a.html");

    assert_eq!(model.fields().len(), 1);
    assert_eq!(model.methods().len(), 1);
    assert_eq!(model.methods()[0].throws, BTreeSet::from([ty("p.E")]));
    assert_eq!(model.merge(&model).unwrap(), model);
}

#[test]
fn overloads_and_flag_differences_stay_separate() {
    let mut a = class(ClassKind::Regular, None);
    a.methods.push(method("append", "void", &["int"], &[]));
    let mut b = class(ClassKind::Regular, None);
    b.methods.push(method("append", "void", &["java.lang.String"], &[]));
    let mut static_append = method("append", "void", &["int"], &[]);
    static_append.flags = MemberFlags::STATIC;
    b.methods.push(static_append);

    let merged = freeze(a, "a").merge(&freeze(b, "b")).unwrap();
    assert_eq!(merged.methods().len(), 3);
}

#[test]
fn interface_and_class_conflict_is_reported() {
    let a = freeze(class(ClassKind::Interface, None), "a");
    let b = freeze(class(ClassKind::Regular, None), "b");
    let err = a.merge(&b).unwrap_err();
    assert_eq!(
        err,
        MergeError::InterfaceWithClass {
            class: "p.C".to_string(),
            left: ClassKind::Interface,
            right: ClassKind::Regular,
        }
    );
    // Order does not matter for the failure.
    assert!(b.merge(&a).is_err());
}

#[test]
fn abstract_and_concrete_conflict_is_reported() {
    let a = freeze(class(ClassKind::Abstract, None), "a");
    let b = freeze(class(ClassKind::Final, None), "b");
    assert!(matches!(
        a.merge(&b),
        Err(MergeError::AbstractWithConcrete { .. })
    ));
}

#[test]
fn final_and_regular_resolve_to_regular() {
    let a = freeze(class(ClassKind::Final, None), "a");
    let b = freeze(class(ClassKind::Regular, None), "b");
    assert_eq!(a.merge(&b).unwrap().kind(), ClassKind::Regular);
    assert_eq!(b.merge(&a).unwrap().kind(), ClassKind::Regular);
}

#[test]
fn parent_reconciliation() {
    let none = freeze(class(ClassKind::Regular, None), "a");
    let bar = freeze(class(ClassKind::Regular, Some("p.Bar")), "b");
    let baz = freeze(class(ClassKind::Regular, Some("p.Baz")), "c");

    assert_eq!(none.merge(&bar).unwrap().parent(), Some(&ty("p.Bar")));
    assert_eq!(bar.merge(&none).unwrap().parent(), Some(&ty("p.Bar")));
    assert!(matches!(
        bar.merge(&baz),
        Err(MergeError::ParentConflict { .. })
    ));
}

#[test]
fn constant_values_fill_gaps_from_later_sources() {
    let a = freeze(class(ClassKind::Regular, None), "a");
    let mut b = freeze(class(ClassKind::Regular, None), "b");
    b.fill_constants(&BTreeMap::from([("LIMIT".to_string(), "10".to_string())]))
        .unwrap();

    let merged = a.merge(&b).unwrap();
    assert_eq!(merged.constants().len(), 1);
    assert_eq!(merged.constant("LIMIT").unwrap().value.as_deref(), Some("10"));
}

#[test]
fn fold_keeps_last_good_model_on_conflict() {
    let a = freeze(class(ClassKind::Regular, None), "a");
    let b = freeze(class(ClassKind::Interface, None), "b");
    let mut c = class(ClassKind::Regular, None);
    c.methods.push(method("run", "void", &[], &[]));
    let c = freeze(c, "c");

    let outcome = fold_models([a, b, c]);
    assert_eq!(outcome.conflicts.len(), 1);
    let conflict = &outcome.conflicts[0];
    assert!(matches!(
        conflict.error,
        MergeError::InterfaceWithClass { .. }
    ));
    assert_eq!(conflict.kept_sources, vec![PathBuf::from("a")]);
    assert_eq!(conflict.rejected_sources, vec![PathBuf::from("b")]);
    let message = conflict.to_string();
    assert!(message.contains("kept a; rejected b"), "{message}");
    assert_eq!(outcome.merges, 1);
    let model = outcome.model.unwrap();
    assert_eq!(model.kind(), ClassKind::Regular);
    assert_eq!(model.methods().len(), 1);
    assert_eq!(model.sources(), &[PathBuf::from("a"), PathBuf::from("c")]);
}

fn arb_model(source: &'static str) -> impl Strategy<Value = ClassModel> {
    let kinds = prop_oneof![Just(ClassKind::Regular), Just(ClassKind::Final)];
    let methods = proptest::collection::vec(
        (
            prop::sample::select(vec!["get", "set", "size"]),
            prop::sample::select(vec!["int", "void"]),
            proptest::collection::vec(prop::sample::select(vec!["int", "p.Item"]), 0..2),
            proptest::collection::vec(
                prop::sample::select(vec!["java.io.IOException", "p.Failure"]),
                0..2,
            ),
        ),
        0..4,
    );
    let interfaces =
        proptest::collection::vec(prop::sample::select(vec!["p.A", "p.B", "p.C"]), 0..3);
    let fields = proptest::collection::vec(prop::sample::select(vec!["x", "y"]), 0..3);
    (kinds, methods, interfaces, fields).prop_map(move |(kind, methods, interfaces, fields)| {
        let mut proto = ClassPrototype::new(
            "p",
            "C",
            kind,
            None,
            interfaces.into_iter().map(ty).collect(),
        );
        for (name, ret, args, throws) in methods {
            proto.methods.push(method(name, ret, &args, &throws));
        }
        for name in fields {
            proto.fields.push(field(name));
        }
        proto.freeze(Some(PathBuf::from(source)))
    })
}

proptest! {
    #[test]
    fn merge_is_idempotent(a in arb_model("a")) {
        prop_assert_eq!(a.merge(&a).unwrap(), a);
    }

    #[test]
    fn merge_is_associative(
        a in arb_model("a"),
        b in arb_model("b"),
        c in arb_model("c"),
    ) {
        let left = a.merge(&b).unwrap().merge(&c).unwrap();
        let right = a.merge(&b.merge(&c).unwrap()).unwrap();
        prop_assert_eq!(left, right);
    }
}
