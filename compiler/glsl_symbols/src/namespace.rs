//! Identifier namespaces.

use std::fmt;

use bitflags::bitflags;

/// The three GLSL identifier namespaces.
///
/// A variable, a type and a function may share a spelling without
/// conflicting; the namespace is part of every symbol key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NameSpace {
    Variable,
    Type,
    Function,
}

impl NameSpace {
    /// Every namespace, in index order.
    pub const ALL: [NameSpace; 3] = [NameSpace::Variable, NameSpace::Type, NameSpace::Function];

    /// Dense index for per-namespace arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            NameSpace::Variable => 0,
            NameSpace::Type => 1,
            NameSpace::Function => 2,
        }
    }
}

impl fmt::Display for NameSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NameSpace::Variable => "variable",
            NameSpace::Type => "type",
            NameSpace::Function => "function",
        })
    }
}

bitflags! {
    /// A set of namespaces, for queries that span more than one.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct NameSpaceSet: u8 {
        const VARIABLE = 1 << 0;
        const TYPE = 1 << 1;
        const FUNCTION = 1 << 2;
    }
}

impl NameSpaceSet {
    /// Whether `namespace` is a member.
    #[inline]
    pub fn has(self, namespace: NameSpace) -> bool {
        self.contains(NameSpaceSet::from(namespace))
    }
}

impl From<NameSpace> for NameSpaceSet {
    fn from(namespace: NameSpace) -> Self {
        match namespace {
            NameSpace::Variable => NameSpaceSet::VARIABLE,
            NameSpace::Type => NameSpaceSet::TYPE,
            NameSpace::Function => NameSpaceSet::FUNCTION,
        }
    }
}
