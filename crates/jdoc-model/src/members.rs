use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::identity::StableId;
use crate::types::{constant_type, ConstantType, MemberAccess, MemberFlags, TypeRef};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Argument {
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub name: String,
}

impl Argument {
    pub fn new(ty: TypeRef, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructorModel {
    pub access: MemberAccess,
    pub arguments: Vec<Argument>,
    pub throws: BTreeSet<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodModel {
    pub access: MemberAccess,
    pub flags: MemberFlags,
    pub name: String,
    pub return_type: TypeRef,
    pub arguments: Vec<Argument>,
    pub throws: BTreeSet<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldModel {
    pub access: MemberAccess,
    pub flags: MemberFlags,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// A `static final` field of a whitelisted type, optionally carrying its literal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantModel {
    #[serde(flatten)]
    pub field: FieldModel,
    pub constant_type: ConstantType,
    pub value: Option<String>,
}

impl ConstantModel {
    pub fn name(&self) -> &str {
        &self.field.name
    }

    pub fn identity(&self, owner: &str) -> String {
        self.field.identity_of_kind(owner, "constant")
    }

    pub fn stable_id(&self, owner: &str) -> StableId {
        StableId::of(&self.identity(owner))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedField {
    Field(FieldModel),
    Constant(ConstantModel),
}

/// Split a field declaration into a regular field or a constant. Every place that
/// separates the two goes through here.
pub fn classify_field(field: FieldModel, value: Option<String>) -> ClassifiedField {
    match constant_type(field.flags, &field.ty) {
        Some(constant_type) => ClassifiedField::Constant(ConstantModel {
            field,
            constant_type,
            value,
        }),
        None => ClassifiedField::Field(field),
    }
}

fn same_argument_types(left: &[Argument], right: &[Argument]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l.ty == r.ty)
}

fn argument_types(arguments: &[Argument]) -> String {
    arguments
        .iter()
        .map(|arg| arg.ty.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn flags_text(flags: MemberFlags) -> String {
    flags.keywords().collect::<Vec<_>>().join(" ")
}

fn write_modifiers(
    f: &mut fmt::Formatter<'_>,
    access: MemberAccess,
    flags: MemberFlags,
) -> fmt::Result {
    if let Some(keyword) = access.keyword() {
        write!(f, "{keyword} ")?;
    }
    for keyword in flags.keywords() {
        write!(f, "{keyword} ")?;
    }
    Ok(())
}

fn write_parameters(
    f: &mut fmt::Formatter<'_>,
    arguments: &[Argument],
    throws: &BTreeSet<TypeRef>,
) -> fmt::Result {
    f.write_str("(")?;
    for (idx, arg) in arguments.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{} {}", arg.ty, arg.name)?;
    }
    f.write_str(")")?;
    for (idx, ty) in throws.iter().enumerate() {
        let sep = if idx == 0 { " throws " } else { ", " };
        write!(f, "{sep}{ty}")?;
    }
    Ok(())
}

/// Shared shape of constructors and methods, used by the merger.
pub(crate) trait CodeMember: Clone {
    /// Same member modulo the throws clause.
    fn same_member(&self, other: &Self) -> bool;
    fn throws_mut(&mut self) -> &mut BTreeSet<TypeRef>;
    fn throws(&self) -> &BTreeSet<TypeRef>;
}

impl ConstructorModel {
    pub fn has_same_signature(&self, other: &ConstructorModel) -> bool {
        same_argument_types(&self.arguments, &other.arguments)
    }

    /// Canonical identity string: owner, access and argument types.
    pub fn identity(&self, owner: &str) -> String {
        let access = self.access.keyword().unwrap_or("package");
        format!("{owner}#<init> {access} ({})", argument_types(&self.arguments))
    }

    pub fn stable_id(&self, owner: &str) -> StableId {
        StableId::of(&self.identity(owner))
    }

    /// Print as a declaration of the class named `simple_name`.
    pub fn display<'a>(&'a self, simple_name: &'a str) -> impl fmt::Display + 'a {
        ConstructorDisplay {
            ctor: self,
            simple_name,
        }
    }
}

struct ConstructorDisplay<'a> {
    ctor: &'a ConstructorModel,
    simple_name: &'a str,
}

impl fmt::Display for ConstructorDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_modifiers(f, self.ctor.access, MemberFlags::NONE)?;
        f.write_str(self.simple_name)?;
        write_parameters(f, &self.ctor.arguments, &self.ctor.throws)
    }
}

impl CodeMember for ConstructorModel {
    fn same_member(&self, other: &Self) -> bool {
        self.access == other.access && self.has_same_signature(other)
    }

    fn throws_mut(&mut self) -> &mut BTreeSet<TypeRef> {
        &mut self.throws
    }

    fn throws(&self) -> &BTreeSet<TypeRef> {
        &self.throws
    }
}

impl MethodModel {
    /// Name, return type and argument types match.
    pub fn has_same_signature(&self, other: &MethodModel) -> bool {
        self.name == other.name
            && self.return_type == other.return_type
            && same_argument_types(&self.arguments, &other.arguments)
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.contains(MemberFlags::ABSTRACT)
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    pub fn identity(&self, owner: &str) -> String {
        let access = self.access.keyword().unwrap_or("package");
        format!(
            "{owner}#{} {access} [{}] {} ({})",
            self.name,
            flags_text(self.flags),
            self.return_type,
            argument_types(&self.arguments)
        )
    }

    pub fn stable_id(&self, owner: &str) -> StableId {
        StableId::of(&self.identity(owner))
    }
}

impl fmt::Display for MethodModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_modifiers(f, self.access, self.flags)?;
        write!(f, "{} {}", self.return_type, self.name)?;
        write_parameters(f, &self.arguments, &self.throws)
    }
}

impl CodeMember for MethodModel {
    fn same_member(&self, other: &Self) -> bool {
        self.access == other.access && self.flags == other.flags && self.has_same_signature(other)
    }

    fn throws_mut(&mut self) -> &mut BTreeSet<TypeRef> {
        &mut self.throws
    }

    fn throws(&self) -> &BTreeSet<TypeRef> {
        &self.throws
    }
}

impl FieldModel {
    pub fn is_constant(&self) -> bool {
        constant_type(self.flags, &self.ty).is_some()
    }

    pub fn identity(&self, owner: &str) -> String {
        self.identity_of_kind(owner, "field")
    }

    pub fn stable_id(&self, owner: &str) -> StableId {
        StableId::of(&self.identity(owner))
    }

    fn identity_of_kind(&self, owner: &str, kind: &str) -> String {
        let access = self.access.keyword().unwrap_or("package");
        format!(
            "{owner}#{} {kind} {access} [{}] {}",
            self.name,
            flags_text(self.flags),
            self.ty
        )
    }
}

impl fmt::Display for FieldModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_modifiers(f, self.access, self.flags)?;
        write!(f, "{} {}", self.ty, self.name)
    }
}

impl fmt::Display for ConstantModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field)?;
        if let Some(value) = &self.value {
            write!(f, " = {value}")?;
        }
        Ok(())
    }
}
