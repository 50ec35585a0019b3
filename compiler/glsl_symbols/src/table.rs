//! Scoped symbol table over three independent namespaces.
//!
//! Each namespace keeps, per name, the list of live entries ordered by
//! ascending depth. The deepest entry is last, so lookup is a hash probe
//! plus `last()`, and leaving a scope pops exactly the entries it declared.

use glsl_ir::Name;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, error, trace};

use crate::{NameSpace, NameSpaceSet, ScopeStack, Symbol, SymbolEntry, SymbolError};

/// Live entries for one name, shallowest first.
///
/// Most names are declared once, a few are shadowed once.
type Shadows<P> = SmallVec<[SymbolEntry<P>; 2]>;

/// Visibility index for a single namespace.
#[derive(Clone, Debug)]
struct NamespaceIndex<P> {
    names: FxHashMap<Name, Shadows<P>>,
}

impl<P: Copy> NamespaceIndex<P> {
    fn with_capacity(capacity: usize) -> Self {
        NamespaceIndex {
            names: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    #[inline]
    fn innermost(&self, name: Name) -> Option<&SymbolEntry<P>> {
        self.names.get(&name).and_then(|shadows| shadows.last())
    }

    #[inline]
    fn outermost(&self, name: Name) -> Option<&SymbolEntry<P>> {
        self.names.get(&name).and_then(|shadows| shadows.first())
    }

    /// Append an entry at the current (deepest) depth.
    fn push(&mut self, entry: SymbolEntry<P>) {
        let shadows = self.names.entry(entry.name).or_default();
        debug_assert!(shadows.last().map_or(true, |last| last.depth < entry.depth));
        shadows.push(entry);
    }

    /// Insert a depth-0 entry beneath any shadowing declarations.
    fn push_outermost(&mut self, entry: SymbolEntry<P>) {
        let shadows = self.names.entry(entry.name).or_default();
        debug_assert!(shadows.first().map_or(true, |first| first.depth > 0));
        shadows.insert(0, entry);
    }

    /// Unlink the entry for `name` declared at `depth`, the deepest one.
    fn pop(&mut self, name: Name, depth: u32) {
        if let Some(shadows) = self.names.get_mut(&name) {
            let popped = shadows.pop();
            debug_assert_eq!(popped.map(|entry| entry.depth), Some(depth));
            if shadows.is_empty() {
                self.names.remove(&name);
            }
        }
    }

    fn len(&self) -> usize {
        self.names.values().map(SmallVec::len).sum()
    }
}

/// Lexically scoped symbol table with separate variable, type and function
/// namespaces.
///
/// `V`, `T` and `F` are the handle types bound in each namespace. The table
/// stores handles only; the declarations they refer to are owned elsewhere
/// and must outlive the table.
///
/// # Invariants
/// - At most one live entry per (name, namespace, depth).
/// - Lookup returns the deepest live entry, so inner declarations shadow
///   outer ones until their scope is popped.
/// - Namespaces never observe each other.
#[derive(Clone, Debug)]
pub struct SymbolTable<V, T, F> {
    scopes: ScopeStack,
    variables: NamespaceIndex<V>,
    types: NamespaceIndex<T>,
    functions: NamespaceIndex<F>,
}

impl<V: Copy, T: Copy, F: Copy> SymbolTable<V, T, F> {
    /// A table with only the outermost scope active.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Like `new`, pre-sizing each namespace index for `capacity` names.
    pub fn with_capacity(capacity: usize) -> Self {
        SymbolTable {
            scopes: ScopeStack::new(),
            variables: NamespaceIndex::with_capacity(capacity),
            types: NamespaceIndex::with_capacity(capacity),
            functions: NamespaceIndex::with_capacity(capacity),
        }
    }

    /// Depth of the active scope; 0 is the outermost scope.
    #[inline]
    pub fn current_depth(&self) -> u32 {
        self.scopes.current_depth()
    }

    /// Enter a block or function body.
    pub fn push_scope(&mut self) {
        self.scopes.push_scope();
        trace!(depth = self.current_depth(), "push scope");
    }

    /// Leave the current scope, hiding every symbol declared in it.
    ///
    /// Popping the outermost scope is a caller bug: it returns
    /// [`SymbolError::ScopeUnderflow`] and leaves the table as it was.
    pub fn pop_scope(&mut self) -> Result<(), SymbolError> {
        let frame = self.scopes.pop_scope().map_err(|err| {
            error!("pop_scope called on the outermost scope");
            err
        })?;
        let depth = frame.depth();
        for &(namespace, name) in frame.declared().iter().rev() {
            match namespace {
                NameSpace::Variable => self.variables.pop(name, depth),
                NameSpace::Type => self.types.pop(name, depth),
                NameSpace::Function => self.functions.pop(name, depth),
            }
        }
        trace!(depth, hidden = frame.declared().len(), "pop scope");
        Ok(())
    }

    /// Declare `name` in the current scope.
    ///
    /// Fails if the same name is already declared in the same namespace at
    /// this depth; the existing entry is kept and nothing changes.
    pub fn try_add(&mut self, name: Name, symbol: Symbol<V, T, F>) -> Result<(), SymbolError> {
        let depth = self.current_depth();
        let namespace = symbol.namespace();
        if self.scope_of(namespace, name) == Some(depth) {
            debug!(?name, %namespace, depth, "redeclaration rejected");
            return Err(SymbolError::Redeclaration {
                namespace,
                name,
                depth,
            });
        }
        match symbol {
            Symbol::Variable(v) => self.variables.push(entry(name, namespace, v, depth)),
            Symbol::Type(t) => self.types.push(entry(name, namespace, t, depth)),
            Symbol::Function(f) => self.functions.push(entry(name, namespace, f, depth)),
        }
        self.scopes.record(namespace, name);
        trace!(?name, %namespace, depth, "add symbol");
        Ok(())
    }

    /// Declare `name` in the current scope; false on redeclaration.
    pub fn add(&mut self, name: Name, symbol: Symbol<V, T, F>) -> bool {
        self.try_add(name, symbol).is_ok()
    }

    pub fn add_variable(&mut self, name: Name, variable: V) -> bool {
        self.add(name, Symbol::Variable(variable))
    }

    pub fn add_type(&mut self, name: Name, ty: T) -> bool {
        self.add(name, Symbol::Type(ty))
    }

    pub fn add_function(&mut self, name: Name, function: F) -> bool {
        self.add(name, Symbol::Function(function))
    }

    /// Declare `name` in the outermost scope, whatever the current depth.
    ///
    /// Used for built-ins discovered late (e.g. a built-in function first
    /// referenced inside a function body). Declarations in inner scopes
    /// that already shadow `name` keep shadowing it.
    pub fn try_add_global(
        &mut self,
        name: Name,
        symbol: Symbol<V, T, F>,
    ) -> Result<(), SymbolError> {
        let namespace = symbol.namespace();
        if self.outermost_depth(namespace, name) == Some(0) {
            debug!(?name, %namespace, "global redeclaration rejected");
            return Err(SymbolError::Redeclaration {
                namespace,
                name,
                depth: 0,
            });
        }
        match symbol {
            Symbol::Variable(v) => self.variables.push_outermost(entry(name, namespace, v, 0)),
            Symbol::Type(t) => self.types.push_outermost(entry(name, namespace, t, 0)),
            Symbol::Function(f) => self.functions.push_outermost(entry(name, namespace, f, 0)),
        }
        self.scopes.record_outermost(namespace, name);
        trace!(?name, %namespace, "add global symbol");
        Ok(())
    }

    pub fn add_global(&mut self, name: Name, symbol: Symbol<V, T, F>) -> bool {
        self.try_add_global(name, symbol).is_ok()
    }

    /// Resolve `name` in `namespace` to its innermost visible declaration.
    pub fn get(&self, namespace: NameSpace, name: Name) -> Option<Symbol<V, T, F>> {
        self.lookup(namespace, name).map(|entry| entry.payload)
    }

    /// Like `get`, returning the whole entry including its depth.
    pub fn lookup(&self, namespace: NameSpace, name: Name) -> Option<SymbolEntry<Symbol<V, T, F>>> {
        match namespace {
            NameSpace::Variable => self.variables.innermost(name).map(|e| tag(e, Symbol::Variable)),
            NameSpace::Type => self.types.innermost(name).map(|e| tag(e, Symbol::Type)),
            NameSpace::Function => self.functions.innermost(name).map(|e| tag(e, Symbol::Function)),
        }
    }

    #[inline]
    pub fn get_variable(&self, name: Name) -> Option<V> {
        self.variables.innermost(name).map(|entry| entry.payload)
    }

    #[inline]
    pub fn get_type(&self, name: Name) -> Option<T> {
        self.types.innermost(name).map(|entry| entry.payload)
    }

    #[inline]
    pub fn get_function(&self, name: Name) -> Option<F> {
        self.functions.innermost(name).map(|entry| entry.payload)
    }

    /// Depth of the declaration `name` resolves to in `namespace`.
    pub fn scope_of(&self, namespace: NameSpace, name: Name) -> Option<u32> {
        match namespace {
            NameSpace::Variable => self.variables.innermost(name).map(|e| e.depth),
            NameSpace::Type => self.types.innermost(name).map(|e| e.depth),
            NameSpace::Function => self.functions.innermost(name).map(|e| e.depth),
        }
    }

    fn outermost_depth(&self, namespace: NameSpace, name: Name) -> Option<u32> {
        match namespace {
            NameSpace::Variable => self.variables.outermost(name).map(|e| e.depth),
            NameSpace::Type => self.types.outermost(name).map(|e| e.depth),
            NameSpace::Function => self.functions.outermost(name).map(|e| e.depth),
        }
    }

    /// Whether `name` is declared in the current scope itself, in any
    /// namespace. A declaration merely visible from an enclosing scope
    /// does not count.
    pub fn declared_in_current_scope(&self, name: Name) -> bool {
        self.declared_in_current_scope_in(NameSpaceSet::all(), name)
    }

    /// Like `declared_in_current_scope`, restricted to `namespaces`.
    pub fn declared_in_current_scope_in(&self, namespaces: NameSpaceSet, name: Name) -> bool {
        // An entry at the current depth is always the deepest live one.
        let depth = self.current_depth();
        NameSpace::ALL
            .into_iter()
            .filter(|&namespace| namespaces.has(namespace))
            .any(|namespace| self.scope_of(namespace, name) == Some(depth))
    }

    /// Entries declared in the current scope, in declaration order.
    pub fn current_scope_symbols(
        &self,
    ) -> impl Iterator<Item = SymbolEntry<Symbol<V, T, F>>> + '_ {
        let depth = self.current_depth();
        self.scopes
            .current()
            .declared()
            .iter()
            .filter_map(move |&(namespace, name)| {
                self.lookup(namespace, name)
                    .filter(|entry| entry.depth == depth)
            })
    }

    /// Number of live entries across all namespaces and scopes.
    pub fn len(&self) -> usize {
        self.variables.len() + self.types.len() + self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Copy, T: Copy, F: Copy> Default for SymbolTable<V, T, F> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn entry<P>(name: Name, namespace: NameSpace, payload: P, depth: u32) -> SymbolEntry<P> {
    SymbolEntry {
        name,
        namespace,
        payload,
        depth,
    }
}

#[inline]
fn tag<P: Copy, S>(entry: &SymbolEntry<P>, wrap: impl FnOnce(P) -> S) -> SymbolEntry<S> {
    SymbolEntry {
        name: entry.name,
        namespace: entry.namespace,
        payload: wrap(entry.payload),
        depth: entry.depth,
    }
}

#[cfg(test)]
mod tests;
