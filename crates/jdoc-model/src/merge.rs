//! Reconciliation of several models describing the same class.
//!
//! Merging is a left fold: the accumulated model is the left operand and the newly
//! parsed one the right. Kind and parent conflicts are fatal for the class being
//! merged; everything else is combined.

use crate::class::ClassModel;
use crate::error::{MergeConflict, MergeError};
use crate::members::{CodeMember, ConstantModel};
use crate::types::{ClassKind, TypeRef};

impl ClassModel {
    /// Merge `other` into a new model. Neither input is modified.
    pub fn merge(&self, other: &ClassModel) -> Result<ClassModel, MergeError> {
        let class = self.full_name();
        let other_name = other.full_name();
        if class != other_name {
            return Err(MergeError::NameMismatch {
                left: class,
                right: other_name,
            });
        }

        let kind = merge_kind(&class, self.kind, other.kind)?;
        let parent = merge_parent(&class, self.parent.as_ref(), other.parent.as_ref())?;
        let constants = merge_constants(&class, &self.constants, &other.constants);

        Ok(ClassModel {
            package: self.package.clone(),
            name: self.name.clone(),
            kind,
            parent,
            implements: self.implements.union(&other.implements).cloned().collect(),
            constructors: merge_code_members(&self.constructors, &other.constructors),
            methods: merge_code_members(&self.methods, &other.methods),
            fields: union(&self.fields, &other.fields),
            constants,
            sources: union(&self.sources, &other.sources),
        })
    }
}

fn merge_kind(class: &str, left: ClassKind, right: ClassKind) -> Result<ClassKind, MergeError> {
    if left == right {
        return Ok(left);
    }
    if left == ClassKind::Interface || right == ClassKind::Interface {
        return Err(MergeError::InterfaceWithClass {
            class: class.to_string(),
            left,
            right,
        });
    }
    if left == ClassKind::Abstract || right == ClassKind::Abstract {
        return Err(MergeError::AbstractWithConcrete {
            class: class.to_string(),
            left,
            right,
        });
    }

    // Only Regular vs Final is left. One documentation set marking the type final is
    // treated as an implementation detail of that set.
    tracing::debug!(
        target: "jdoc.merge",
        class,
        ?left,
        ?right,
        "final/regular kind mismatch resolved to regular"
    );
    Ok(ClassKind::Regular)
}

fn merge_parent(
    class: &str,
    left: Option<&TypeRef>,
    right: Option<&TypeRef>,
) -> Result<Option<TypeRef>, MergeError> {
    match (left, right) {
        (Some(l), Some(r)) if l != r => Err(MergeError::ParentConflict {
            class: class.to_string(),
            left: l.clone(),
            right: r.clone(),
        }),
        (Some(parent), _) | (None, Some(parent)) => Ok(Some(parent.clone())),
        (None, None) => Ok(None),
    }
}

/// Order-preserving, duplicate-free union.
pub(crate) fn union<T: PartialEq + Clone>(left: &[T], right: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(left.len() + right.len());
    for item in left.iter().chain(right) {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Union by declaration. A value missing on the left is taken from the right;
/// differing values keep the left one.
pub(crate) fn merge_constants(class: &str, left: &[ConstantModel], right: &[ConstantModel]) -> Vec<ConstantModel> {
    let mut out: Vec<ConstantModel> = Vec::with_capacity(left.len() + right.len());
    for item in left.iter().chain(right) {
        match out.iter_mut().find(|c| c.field == item.field) {
            Some(existing) => match (&existing.value, &item.value) {
                (None, Some(_)) => existing.value = item.value.clone(),
                (Some(kept), Some(dropped)) if kept != dropped => {
                    tracing::warn!(
                        target: "jdoc.merge",
                        class,
                        constant = %existing.field.name,
                        kept = %kept,
                        dropped = %dropped,
                        "conflicting constant values; keeping the earlier one"
                    );
                }
                _ => {}
            },
            None => out.push(item.clone()),
        }
    }
    out
}

/// Signature-keyed multimap merge: a member matching an existing one (modulo throws)
/// widens that entry's throws set instead of being added as a new overload.
pub(crate) fn merge_code_members<T: CodeMember>(left: &[T], right: &[T]) -> Vec<T> {
    let mut out: Vec<T> = left.to_vec();
    for member in right {
        match out.iter_mut().find(|existing| existing.same_member(member)) {
            Some(existing) => {
                if existing.throws() != member.throws() {
                    existing.throws_mut().extend(member.throws().iter().cloned());
                }
            }
            None => out.push(member.clone()),
        }
    }
    out
}

/// Result of folding every model of one class.
#[derive(Debug)]
pub struct FoldOutcome {
    /// The last good accumulated model.
    pub model: Option<ClassModel>,
    pub merges: usize,
    pub conflicts: Vec<MergeConflict>,
}

/// Strict left fold of `models` (all sharing one fully qualified name) in the given
/// order. A conflicting model is skipped and the accumulated model kept.
pub fn fold_models<I>(models: I) -> FoldOutcome
where
    I: IntoIterator<Item = ClassModel>,
{
    let mut outcome = FoldOutcome {
        model: None,
        merges: 0,
        conflicts: Vec::new(),
    };
    for next in models {
        outcome.model = Some(match outcome.model.take() {
            None => next,
            Some(acc) => match acc.merge(&next) {
                Ok(merged) => {
                    outcome.merges += 1;
                    merged
                }
                Err(error) => {
                    outcome.conflicts.push(MergeConflict {
                        error,
                        kept_sources: acc.sources().to_vec(),
                        rejected_sources: next.sources().to_vec(),
                    });
                    acc
                }
            },
        });
    }
    outcome
}
