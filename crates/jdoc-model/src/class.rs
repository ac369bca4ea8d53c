use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{ModelError, Result};
use crate::identity::StableId;
use crate::members::{ClassifiedField, ConstantModel, ConstructorModel, FieldModel, MethodModel};
use crate::merge::{merge_code_members, merge_constants, union};
use crate::prototype::ClassPrototype;
use crate::types::{ClassKind, MemberFlags, TypeRef};

/// Frozen, queryable model of one class or interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassModel {
    pub(crate) package: String,
    pub(crate) name: String,
    pub(crate) kind: ClassKind,
    pub(crate) parent: Option<TypeRef>,
    pub(crate) implements: BTreeSet<TypeRef>,
    pub(crate) constructors: Vec<ConstructorModel>,
    pub(crate) methods: Vec<MethodModel>,
    pub(crate) fields: Vec<FieldModel>,
    pub(crate) constants: Vec<ConstantModel>,
    /// Pages this model was read from, in fold order.
    pub(crate) sources: Vec<PathBuf>,
}

impl ClassModel {
    pub(crate) fn from_prototype(proto: ClassPrototype, source: Option<PathBuf>) -> Self {
        let full_name = proto.full_name();
        let mut implements: BTreeSet<TypeRef> = proto.implements.into_iter().collect();
        let mut parent = proto.parent.filter(|parent| !parent.is_root());
        if proto.kind.is_interface() {
            // Interfaces only have superinterfaces.
            implements.extend(parent.take());
        }

        let mut fields = Vec::new();
        let mut constants = Vec::new();
        for field in proto.fields {
            match field.classify() {
                ClassifiedField::Field(field) => fields.push(field),
                ClassifiedField::Constant(constant) => constants.push(constant),
            }
        }
        let constructors: Vec<_> = proto
            .constructors
            .into_iter()
            .map(|ctor| ctor.into_model())
            .collect();
        let methods: Vec<_> = proto
            .methods
            .into_iter()
            .map(|method| method.into_model())
            .collect();

        // A page repeating a member is folded the same way two pages are, so a
        // frozen model merged with itself is unchanged.
        Self {
            package: proto.package,
            name: proto.name,
            kind: proto.kind,
            parent,
            implements,
            constructors: merge_code_members(&[], &constructors),
            methods: merge_code_members(&[], &methods),
            fields: union(&[], &fields),
            constants: merge_constants(&full_name, &[], &constants),
            sources: source.into_iter().collect(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn simple_name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// `None` when the parent is the implicit root type.
    pub fn parent(&self) -> Option<&TypeRef> {
        self.parent.as_ref()
    }

    pub fn implements(&self) -> &BTreeSet<TypeRef> {
        &self.implements
    }

    pub fn constructors(&self) -> &[ConstructorModel] {
        &self.constructors
    }

    pub fn methods(&self) -> &[MethodModel] {
        &self.methods
    }

    pub fn fields(&self) -> &[FieldModel] {
        &self.fields
    }

    pub fn constants(&self) -> &[ConstantModel] {
        &self.constants
    }

    pub fn constant(&self, name: &str) -> Option<&ConstantModel> {
        self.constants.iter().find(|c| c.name() == name)
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn is_interface(&self) -> bool {
        self.kind.is_interface()
    }

    /// An interface with a single method and no data members.
    pub fn is_functional_interface(&self) -> bool {
        self.is_interface()
            && self.fields.is_empty()
            && self.constants.is_empty()
            && self.methods.len() == 1
    }

    /// A class whose only members are `static final` fields of one shared type.
    pub fn is_class_enum(&self) -> bool {
        let Some(first) = self.fields.first() else {
            return false;
        };
        self.constants.is_empty()
            && self.constructors.is_empty()
            && self
                .fields
                .iter()
                .all(|f| f.ty == first.ty && f.flags == MemberFlags::STATIC_FINAL)
    }

    pub fn stable_id(&self) -> StableId {
        StableId::of(&self.full_name())
    }

    /// Identity string and id of every member, for cache keys and uniqueness checks.
    pub fn member_ids(&self) -> Vec<(String, StableId)> {
        let owner = self.full_name();
        let identities = self
            .constructors
            .iter()
            .map(|ctor| ctor.identity(&owner))
            .chain(self.methods.iter().map(|method| method.identity(&owner)))
            .chain(self.fields.iter().map(|field| field.identity(&owner)))
            .chain(self.constants.iter().map(|constant| constant.identity(&owner)));
        identities
            .map(|identity| {
                let id = StableId::of(&identity);
                (identity, id)
            })
            .collect()
    }

    /// Fill constant values from a constants table.
    ///
    /// Every matching constant is filled first; names without a matching constant are
    /// then reported together as [`ModelError::UnknownConstants`]. Call this only on a
    /// freshly frozen model, before it is registered or merged.
    pub fn fill_constants(&mut self, values: &BTreeMap<String, String>) -> Result<()> {
        let mut missing = Vec::new();
        for (name, value) in values {
            match self.constants.iter_mut().find(|c| c.field.name == *name) {
                Some(constant) => constant.value = Some(value.clone()),
                None => missing.push(name.clone()),
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ModelError::UnknownConstants {
                class: self.full_name(),
                names: missing,
            })
        }
    }
}

impl fmt::Display for ClassModel {
    /// Prints the body-free class header, e.g.
    /// `public class p.Foo extends p.Bar implements p.Baz, p.Qux`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "public {} {}", self.kind.keywords(), self.full_name())?;
        if let Some(parent) = &self.parent {
            write!(f, " extends {parent}")?;
        }
        let keyword = if self.is_interface() {
            "extends"
        } else {
            "implements"
        };
        for (idx, ty) in self.implements.iter().enumerate() {
            let sep = if idx == 0 { format!(" {keyword} ") } else { ", ".to_string() };
            write!(f, "{sep}{ty}")?;
        }
        Ok(())
    }
}
