//! Symbol bindings.

use glsl_ir::Name;

use crate::NameSpace;

/// One declaration binding.
///
/// `payload` is a handle, not the declaration itself. Whatever it refers to
/// is owned elsewhere and must outlive the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SymbolEntry<P> {
    pub name: Name,
    pub namespace: NameSpace,
    pub payload: P,
    /// Scope depth the entry was declared at; 0 is the outermost scope.
    pub depth: u32,
}

/// A payload tagged with the namespace it belongs to.
///
/// Each namespace carries its own payload type, so a type handle can never
/// be bound in the variable namespace by mistake.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Symbol<V, T, F> {
    Variable(V),
    Type(T),
    Function(F),
}

impl<V, T, F> Symbol<V, T, F> {
    #[inline]
    pub fn namespace(&self) -> NameSpace {
        match self {
            Symbol::Variable(_) => NameSpace::Variable,
            Symbol::Type(_) => NameSpace::Type,
            Symbol::Function(_) => NameSpace::Function,
        }
    }

    pub fn variable(self) -> Option<V> {
        match self {
            Symbol::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn ty(self) -> Option<T> {
        match self {
            Symbol::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn function(self) -> Option<F> {
        match self {
            Symbol::Function(f) => Some(f),
            _ => None,
        }
    }
}
