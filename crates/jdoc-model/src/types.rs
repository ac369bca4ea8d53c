use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ModelError, Result};

/// The implicit supertype of every class. A parent equal to this is stored as `None`.
pub const ROOT_TYPE: &str = "java.lang.Object";

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// `true` for Java primitive keywords and `void`.
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

/// A resolved type reference: a qualified name (or primitive keyword) plus an
/// array dimension count.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TypeRef {
    name: String,
    dims: u8,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dims: 0,
        }
    }

    pub fn array(name: impl Into<String>, dims: u8) -> Self {
        Self {
            name: name.into(),
            dims,
        }
    }

    /// Parse the printed form, e.g. `int`, `java.lang.String[]`, `byte[][]`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rest = text.trim();
        let mut dims: u8 = 0;
        while let Some(stripped) = rest.strip_suffix("[]") {
            rest = stripped.trim_end();
            dims = dims
                .checked_add(1)
                .ok_or_else(|| ModelError::InvalidTypeRef(text.to_string()))?;
        }

        let valid = !rest.is_empty()
            && !rest.starts_with('.')
            && !rest.ends_with('.')
            && rest
                .chars()
                .all(|c| c == '.' || c == '$' || c == '_' || c.is_alphanumeric());
        if !valid {
            return Err(ModelError::InvalidTypeRef(text.to_string()));
        }

        Ok(Self::array(rest, dims))
    }

    /// Element type name without array suffixes.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dims(&self) -> u8 {
        self.dims
    }

    pub fn is_array(&self) -> bool {
        self.dims > 0
    }

    pub fn is_primitive(&self) -> bool {
        self.dims == 0 && is_primitive(&self.name)
    }

    pub fn is_root(&self) -> bool {
        self.dims == 0 && self.name == ROOT_TYPE
    }

    pub fn package_name(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(p, _)| p)
    }

    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(_, s)| s)
            .unwrap_or(&self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for _ in 0..self.dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({self})")
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for TypeRef {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        TypeRef::parse(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Interface,
    Regular,
    Final,
    Abstract,
}

impl ClassKind {
    pub fn is_interface(self) -> bool {
        self == ClassKind::Interface
    }

    /// Declaration keywords, e.g. `abstract class`.
    pub fn keywords(self) -> &'static str {
        match self {
            ClassKind::Interface => "interface",
            ClassKind::Regular => "class",
            ClassKind::Final => "final class",
            ClassKind::Abstract => "abstract class",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberAccess {
    Public,
    Protected,
    #[default]
    PackagePrivate,
    Private,
}

impl MemberAccess {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(MemberAccess::Public),
            "protected" => Some(MemberAccess::Protected),
            "private" => Some(MemberAccess::Private),
            _ => None,
        }
    }

    /// `None` for package-private, which has no keyword.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            MemberAccess::Public => Some("public"),
            MemberAccess::Protected => Some("protected"),
            MemberAccess::PackagePrivate => None,
            MemberAccess::Private => Some("private"),
        }
    }
}

/// Combinable member modifiers tracked by the model.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberFlags(u8);

impl MemberFlags {
    pub const NONE: MemberFlags = MemberFlags(0);
    pub const STATIC: MemberFlags = MemberFlags(0x01);
    pub const ABSTRACT: MemberFlags = MemberFlags(0x02);
    pub const FINAL: MemberFlags = MemberFlags(0x04);
    pub const STATIC_FINAL: MemberFlags = MemberFlags(0x01 | 0x04);

    // Printing order.
    const KEYWORDS: [(MemberFlags, &'static str); 3] = [
        (MemberFlags::ABSTRACT, "abstract"),
        (MemberFlags::STATIC, "static"),
        (MemberFlags::FINAL, "final"),
    ];

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: MemberFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::KEYWORDS
            .iter()
            .find(|(_, kw)| *kw == keyword)
            .map(|(flag, _)| *flag)
    }

    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        Self::KEYWORDS
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, kw)| kw)
    }
}

impl BitOr for MemberFlags {
    type Output = MemberFlags;

    fn bitor(self, rhs: MemberFlags) -> MemberFlags {
        MemberFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for MemberFlags {
    fn bitor_assign(&mut self, rhs: MemberFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MemberFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("MemberFlags(none)");
        }
        let keywords: Vec<_> = self.keywords().collect();
        write!(f, "MemberFlags({})", keywords.join(" | "))
    }
}

impl Serialize for MemberFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.keywords())
    }
}

/// Types a compile-time constant may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantType {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Char,
    String,
}

/// The single constant classification predicate: a field is a constant iff it is
/// exactly `static final` and its type is a whitelisted scalar or `java.lang.String`.
pub fn constant_type(flags: MemberFlags, ty: &TypeRef) -> Option<ConstantType> {
    if flags != MemberFlags::STATIC_FINAL || ty.is_array() {
        return None;
    }
    match ty.name() {
        "byte" => Some(ConstantType::Byte),
        "short" => Some(ConstantType::Short),
        "int" => Some(ConstantType::Int),
        "long" => Some(ConstantType::Long),
        "float" => Some(ConstantType::Float),
        "double" => Some(ConstantType::Double),
        "boolean" => Some(ConstantType::Boolean),
        "char" => Some(ConstantType::Char),
        "java.lang.String" => Some(ConstantType::String),
        _ => None,
    }
}
