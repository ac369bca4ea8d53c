use jdoc_javadoc::{parse_constructor, parse_field, parse_method, tokenize_text};
use jdoc_model::{classify_field, ClassifiedField, FieldModel, MemberAccess, MemberFlags, TypeRef};
use proptest::prelude::*;

const PACKAGE: &str = "javax.microedition.lcdui";

fn access() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", "public ", "protected ", "private "])
}

fn modifiers() -> impl Strategy<Value = String> {
    prop::sample::subsequence(vec!["static", "abstract", "final", "synchronized"], 0..=4)
        .prop_map(|mods| mods.into_iter().map(|m| format!("{m} ")).collect())
}

fn type_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "int",
        "byte[]",
        "long[][]",
        "Item",
        "Image[]",
        "java.lang.String",
        "java.util.Vector",
    ])
}

fn arguments() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        (type_name(), prop::sample::select(vec!["a", "label", "x2"])),
        0..4,
    )
    .prop_map(|args| {
        args.into_iter()
            .map(|(ty, name)| format!("{ty} {name}"))
            .collect::<Vec<_>>()
            .join(", ")
    })
}

fn throws_clause() -> impl Strategy<Value = String> {
    prop::sample::subsequence(vec!["java.io.IOException", "MediaException"], 0..=2).prop_map(
        |throws| {
            if throws.is_empty() {
                String::new()
            } else {
                format!(" throws {}", throws.join(", "))
            }
        },
    )
}

proptest! {
    #[test]
    fn method_parse_print_parse(
        access in access(),
        mods in modifiers(),
        ret in prop_oneof![type_name(), Just("void")],
        name in prop::sample::select(vec!["run", "getItems", "set"]),
        args in arguments(),
        throws in throws_clause(),
    ) {
        let text = format!("{access}{mods}{ret} {name}({args}){throws}");
        let first = parse_method(&tokenize_text(&text), PACKAGE).unwrap().into_model();
        let printed = first.to_string();
        let second = parse_method(&tokenize_text(&printed), PACKAGE).unwrap().into_model();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn constructor_parse_print_parse(
        access in access(),
        args in arguments(),
        throws in throws_clause(),
    ) {
        let text = format!("{access}Gauge({args}){throws}");
        let first = parse_constructor(&tokenize_text(&text), PACKAGE).unwrap().into_model();
        let printed = first.display("Gauge").to_string();
        let second = parse_constructor(&tokenize_text(&printed), PACKAGE).unwrap().into_model();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn field_parse_print_parse(
        access in access(),
        mods in modifiers(),
        ty in type_name(),
        value in proptest::option::of(prop::sample::select(vec!["-2", "\"a, (b)\"", "0x7f"])),
    ) {
        let value = value.map(|v| format!(" = {v}")).unwrap_or_default();
        let text = format!("{access}{mods}{ty} LIMIT{value}");
        let first = parse_field(&tokenize_text(&text), PACKAGE).unwrap().classify();
        let printed = match &first {
            ClassifiedField::Field(field) => field.to_string(),
            ClassifiedField::Constant(constant) => constant.to_string(),
        };
        let second = parse_field(&tokenize_text(&printed), PACKAGE).unwrap().classify();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn classification_depends_only_on_flags_and_type(
        static_ in any::<bool>(),
        final_ in any::<bool>(),
        ty in type_name(),
        name in prop::sample::select(vec!["A", "B"]),
        public in any::<bool>(),
    ) {
        let mut flags = MemberFlags::NONE;
        if static_ {
            flags |= MemberFlags::STATIC;
        }
        if final_ {
            flags |= MemberFlags::FINAL;
        }
        let ty = TypeRef::parse(ty).unwrap();
        let access = if public { MemberAccess::Public } else { MemberAccess::Private };
        let field = |name: &str, access| FieldModel {
            access,
            flags,
            name: name.to_string(),
            ty: ty.clone(),
        };

        let is_constant = |classified: ClassifiedField| {
            matches!(classified, ClassifiedField::Constant(_))
        };
        let expected = static_ && final_ && ty.dims() == 0
            && matches!(ty.name(), "int" | "java.lang.String");
        prop_assert_eq!(is_constant(classify_field(field(name, access), None)), expected);
        prop_assert_eq!(
            is_constant(classify_field(field("OTHER", MemberAccess::Protected), Some("1".into()))),
            expected
        );
    }
}
