//! Scoped symbol table for the GLSL front end.
//!
//! The parser pushes a scope when it enters a block or function body,
//! declares names as it sees them, resolves identifiers innermost-first,
//! and pops the scope on exit, which hides every name the block declared.
//!
//! Variables, types and functions live in separate namespaces: a struct
//! `Light` and a variable `Light` never collide.
//!
//! ```text
//! let mut table = GlslSymbolTable::new();
//! table.add_type(foo, foo_type);           // depth 0
//! table.push_scope();
//! table.add_variable(foo, foo_var);        // different namespace, no conflict
//! table.get_type(foo);                     // Some(foo_type)
//! table.pop_scope()?;
//! table.get_variable(foo);                 // None
//! ```

mod entry;
mod error;
mod namespace;
mod scope;
mod table;

use std::sync::Once;

use glsl_ir::{FunctionId, TypeId, VariableId};

pub use entry::{Symbol, SymbolEntry};
pub use error::SymbolError;
pub use namespace::{NameSpace, NameSpaceSet};
pub use scope::{ScopeFrame, ScopeStack};
pub use table::SymbolTable;

/// Symbol table binding names to declarations in a [`glsl_ir::DeclArena`].
pub type GlslSymbolTable = SymbolTable<VariableId, TypeId, FunctionId>;

/// A namespace-tagged declaration handle.
pub type GlslSymbol = Symbol<VariableId, TypeId, FunctionId>;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Only installs a subscriber when `RUST_LOG`
/// is set, e.g. `RUST_LOG=glsl_symbols=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            // Another subscriber (e.g. the host compiler's) wins.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .try_init();
        }
    });
}
