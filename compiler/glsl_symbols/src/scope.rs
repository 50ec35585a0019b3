//! Scope stack.
//!
//! Tracks nesting depth and which symbols were declared at each depth, so
//! that leaving a block can unlink exactly those symbols in O(k).

use std::mem;

use glsl_ir::Name;

use crate::{NameSpace, SymbolError};

/// Declarations introduced at one nesting level, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeFrame {
    depth: u32,
    declared: Vec<(NameSpace, Name)>,
}

impl ScopeFrame {
    fn new(depth: u32) -> Self {
        ScopeFrame {
            depth,
            declared: Vec::new(),
        }
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Keys of the symbols declared in this frame, oldest first.
    #[inline]
    pub fn declared(&self) -> &[(NameSpace, Name)] {
        &self.declared
    }
}

/// Stack of scope frames with the innermost frame on top.
///
/// The outermost frame (depth 0) exists from construction and can never be
/// popped, so there is always a current frame.
#[derive(Clone, Debug)]
pub struct ScopeStack {
    current: ScopeFrame,
    /// Enclosing frames, outermost first.
    outer: Vec<ScopeFrame>,
}

impl ScopeStack {
    /// A stack holding only the outermost frame.
    pub fn new() -> Self {
        ScopeStack {
            current: ScopeFrame::new(0),
            outer: Vec::new(),
        }
    }

    /// Depth of the current frame.
    #[inline]
    pub fn current_depth(&self) -> u32 {
        self.current.depth
    }

    #[inline]
    pub fn current(&self) -> &ScopeFrame {
        &self.current
    }

    /// Enter a new, empty frame.
    pub fn push_scope(&mut self) {
        let inner = ScopeFrame::new(self.current.depth + 1);
        self.outer.push(mem::replace(&mut self.current, inner));
    }

    /// Leave the current frame and hand it back to the caller.
    ///
    /// Fails with [`SymbolError::ScopeUnderflow`] on the outermost frame,
    /// leaving the stack untouched.
    pub fn pop_scope(&mut self) -> Result<ScopeFrame, SymbolError> {
        let parent = self.outer.pop().ok_or(SymbolError::ScopeUnderflow)?;
        Ok(mem::replace(&mut self.current, parent))
    }

    /// Record a declaration in the current frame.
    pub fn record(&mut self, namespace: NameSpace, name: Name) {
        self.current.declared.push((namespace, name));
    }

    /// Record a declaration in the outermost frame.
    pub fn record_outermost(&mut self, namespace: NameSpace, name: Name) {
        let outermost = self.outer.first_mut().unwrap_or(&mut self.current);
        outermost.declared.push((namespace, name));
    }

    /// All frames, outermost first.
    pub fn frames(&self) -> impl Iterator<Item = &ScopeFrame> {
        self.outer.iter().chain(std::iter::once(&self.current))
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
