//! Declaration handles and the arena that owns the declarations.
//!
//! The symbol table never owns a declaration. It stores a `u32` handle and
//! the front end resolves that handle against a [`DeclArena`] that outlives
//! the table for the whole compilation unit.

use std::fmt;

use crate::Name;

macro_rules! define_id {
    ($(#[$meta:meta])* $id:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $id(u32);

        impl $id {
            /// Sentinel meaning "no declaration". Never stored in a symbol table.
            pub const INVALID: $id = $id(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                $id(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl fmt::Debug for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!(stringify!($id), "({})"), self.0)
                } else {
                    write!(f, concat!(stringify!($id), "::INVALID"))
                }
            }
        }

        impl Default for $id {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

define_id!(
    /// Handle to a [`Variable`] in a [`DeclArena`].
    VariableId
);
define_id!(
    /// Handle to a [`GlslType`] in a [`DeclArena`].
    TypeId
);
define_id!(
    /// Handle to a [`Function`] in a [`DeclArena`].
    FunctionId
);

/// Storage qualifier of a variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VariableMode {
    /// Ordinary local or global (`float x;`).
    Auto,
    Uniform,
    /// Shader input (`in`, `attribute`, fragment `varying`).
    In,
    /// Shader output (`out`, vertex `varying`).
    Out,
    /// Function parameter copied in and back out.
    InOut,
    /// Compiler-generated temporary.
    Temporary,
}

/// A variable declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: Name,
    pub ty: TypeId,
    pub mode: VariableMode,
}

/// Scalar kind underlying a GLSL type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BaseType {
    Void,
    Bool,
    Int,
    Float,
    Sampler,
    Struct,
}

/// A type declaration: a built-in like `vec3`/`mat4` or a user `struct`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlslType {
    pub name: Name,
    pub base: BaseType,
    /// 1 for scalars, 2..=4 for vectors and matrix columns.
    pub vector_elements: u8,
    /// 1 for everything but matrices.
    pub matrix_columns: u8,
}

impl GlslType {
    /// A scalar of `base`.
    pub fn scalar(name: Name, base: BaseType) -> Self {
        GlslType {
            name,
            base,
            vector_elements: 1,
            matrix_columns: 1,
        }
    }

    pub fn is_vector(&self) -> bool {
        self.vector_elements > 1 && self.matrix_columns == 1
    }

    pub fn is_matrix(&self) -> bool {
        self.matrix_columns > 1
    }
}

/// One overload of a function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSignature {
    pub return_type: TypeId,
    pub params: Vec<TypeId>,
}

/// A function declaration.
///
/// GLSL overloads share a single name in the function namespace, so every
/// overload hangs off the one `Function` the symbol table binds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: Name,
    pub signatures: Vec<FunctionSignature>,
}

impl Function {
    pub fn new(name: Name) -> Self {
        Function {
            name,
            signatures: Vec::new(),
        }
    }

    /// Add an overload. Returns false if an overload with the same
    /// parameter types already exists.
    pub fn add_signature(&mut self, signature: FunctionSignature) -> bool {
        if self.matching_signature(&signature.params).is_some() {
            return false;
        }
        self.signatures.push(signature);
        true
    }

    /// Find the overload whose parameter types are exactly `params`.
    pub fn matching_signature(&self, params: &[TypeId]) -> Option<&FunctionSignature> {
        self.signatures.iter().find(|sig| sig.params == params)
    }
}

/// Arena owning every declaration of a compilation unit.
///
/// Handles are dense indices; nothing is freed before the arena itself.
#[derive(Clone, Debug, Default)]
pub struct DeclArena {
    variables: Vec<Variable>,
    types: Vec<GlslType>,
    functions: Vec<Function>,
}

/// Convert an arena length to a handle index.
///
/// # Panics
/// Panics if the arena exceeds `u32::MAX - 1` entries.
#[inline]
fn to_u32(len: usize, what: &str) -> u32 {
    match u32::try_from(len) {
        Ok(index) if index != u32::MAX => index,
        _ => panic!("too many {what} in one compilation unit"),
    }
}

impl DeclArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_variable(&mut self, variable: Variable) -> VariableId {
        let id = VariableId::new(to_u32(self.variables.len(), "variables"));
        self.variables.push(variable);
        id
    }

    pub fn alloc_type(&mut self, ty: GlslType) -> TypeId {
        let id = TypeId::new(to_u32(self.types.len(), "types"));
        self.types.push(ty);
        id
    }

    pub fn alloc_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId::new(to_u32(self.functions.len(), "functions"));
        self.functions.push(function);
        id
    }

    #[inline]
    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    #[inline]
    pub fn ty(&self, id: TypeId) -> &GlslType {
        &self.types[id.index()]
    }

    #[inline]
    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    #[inline]
    pub fn function_mut(&mut self, id: FunctionId) -> &mut Function {
        &mut self.functions[id.index()]
    }

    /// Total number of declarations of every kind.
    pub fn len(&self) -> usize {
        self.variables.len() + self.types.len() + self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
