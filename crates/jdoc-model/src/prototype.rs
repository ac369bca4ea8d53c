use std::path::PathBuf;

use crate::class::ClassModel;
use crate::members::{
    classify_field, Argument, ClassifiedField, ConstructorModel, FieldModel, MethodModel,
};
use crate::types::{ClassKind, MemberAccess, MemberFlags, TypeRef};

/// A class under construction while a single page is being parsed.
///
/// Prototypes are filled in by the declaration parser and consumed exactly once by
/// [`ClassPrototype::freeze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPrototype {
    pub package: String,
    pub name: String,
    pub kind: ClassKind,
    pub parent: Option<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub constructors: Vec<ConstructorPrototype>,
    pub methods: Vec<MethodPrototype>,
    pub fields: Vec<FieldPrototype>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPrototype {
    pub access: MemberAccess,
    pub flags: MemberFlags,
    pub name: String,
    pub ty: TypeRef,
    /// Literal printed inline in the declaration (`= 42`), if any.
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructorPrototype {
    pub access: MemberAccess,
    pub arguments: Vec<Argument>,
    pub throws: Vec<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPrototype {
    pub access: MemberAccess,
    pub flags: MemberFlags,
    pub name: String,
    pub return_type: TypeRef,
    pub arguments: Vec<Argument>,
    pub throws: Vec<TypeRef>,
}

impl ClassPrototype {
    pub fn new(
        package: impl Into<String>,
        name: impl Into<String>,
        kind: ClassKind,
        parent: Option<TypeRef>,
        implements: Vec<TypeRef>,
    ) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            kind,
            parent,
            implements,
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// Convert into the immutable model. `source` is the page this prototype was read from.
    pub fn freeze(self, source: Option<PathBuf>) -> ClassModel {
        ClassModel::from_prototype(self, source)
    }
}

impl FieldPrototype {
    /// Freeze into either a regular field or a constant.
    pub fn classify(self) -> ClassifiedField {
        let field = FieldModel {
            access: self.access,
            flags: self.flags,
            name: self.name,
            ty: self.ty,
        };
        classify_field(field, self.value)
    }
}

impl ConstructorPrototype {
    pub fn into_model(self) -> ConstructorModel {
        ConstructorModel {
            access: self.access,
            arguments: self.arguments,
            throws: self.throws.into_iter().collect(),
        }
    }
}

impl MethodPrototype {
    pub fn into_model(self) -> MethodModel {
        MethodModel {
            access: self.access,
            flags: self.flags,
            name: self.name,
            return_type: self.return_type,
            arguments: self.arguments,
            throws: self.throws.into_iter().collect(),
        }
    }
}
