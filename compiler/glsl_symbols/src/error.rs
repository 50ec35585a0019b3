//! Symbol table errors.

use glsl_ir::{Name, StringLookup};

use crate::NameSpace;

/// Errors reported by the symbol table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// A declaration collided with one of the same name and namespace in
    /// the same scope. The table is unchanged; the caller reports it as a
    /// source-level "already declared" error.
    #[error("{namespace} {name:?} is already declared at scope depth {depth}")]
    Redeclaration {
        namespace: NameSpace,
        name: Name,
        depth: u32,
    },

    /// `pop_scope` was called with only the outermost scope left.
    ///
    /// This is a bug in the caller's scope bookkeeping, not in the source
    /// being compiled. Analysis of the unit must stop.
    #[error("scope underflow: cannot pop the outermost scope")]
    ScopeUnderflow,
}

impl SymbolError {
    /// Render the error with the identifier spelled out.
    pub fn describe(&self, names: &impl StringLookup) -> String {
        match self {
            SymbolError::Redeclaration {
                namespace, name, ..
            } => format!(
                "{namespace} `{}` is already declared in this scope",
                names.lookup(*name)
            ),
            SymbolError::ScopeUnderflow => self.to_string(),
        }
    }

    /// Whether this is an internal-consistency failure rather than an
    /// error in the compiled source.
    pub fn is_internal(&self) -> bool {
        matches!(self, SymbolError::ScopeUnderflow)
    }
}
