//! Sharded string interner for GLSL identifiers.
//!
//! Interning is O(1) amortized and `Name` equality is a `u32` compare, which
//! is what keeps symbol-table lookups cheap. Shards are guarded by
//! independent `RwLock`s so one interner can serve several compilation units
//! at once, even though each unit's symbol table is single-threaded.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Storage for one shard of interned strings.
struct InternShard {
    /// Spelling -> slot.
    map: FxHashMap<&'static str, u32>,
    /// Slot -> spelling.
    strings: Vec<&'static str>,
}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(128),
        }
    }
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// A shard ran out of 28-bit slot indices.
    ShardOverflow { shard_idx: usize, count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard_idx, count } => write!(
                f,
                "interner shard {shard_idx} is full: {count} identifiers, max is {}",
                Name::MAX_LOCAL
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Sharded string interner.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create an interner with GLSL keywords and built-in names pre-interned.
    pub fn new() -> Self {
        let interner = Self {
            shards: std::array::from_fn(|_| RwLock::new(InternShard::new())),
            total_count: AtomicUsize::new(0),
        };
        // The empty string must land on `Name::EMPTY` (shard 0, slot 0).
        {
            let mut shard = interner.shards[0].write();
            shard.map.insert("", 0);
            shard.strings.push("");
        }
        interner.total_count.store(1, Ordering::Relaxed);
        interner.pre_intern_builtins();
        interner
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Intern `s`, leaking it only when it is new.
    ///
    /// `make_static` is only called on the slow path, so callers holding an
    /// owned `String` can hand over its allocation instead of copying.
    fn intern_with(
        &self,
        s: &str,
        make_static: impl FnOnce() -> &'static str,
    ) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        if let Some(&local) = shard.read().map.get(s) {
            return Ok(Name::new(shard_u32, local));
        }

        let mut guard = shard.write();
        // Another writer may have won the race between the two locks.
        if let Some(&local) = guard.map.get(s) {
            return Ok(Name::new(shard_u32, local));
        }

        let count = guard.strings.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&local| local <= Name::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow { shard_idx, count })?;
        let leaked = make_static();
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);
        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_u32, local))
    }

    /// Try to intern a string, returning an error if its shard is full.
    #[inline]
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        self.intern_with(s, || &*Box::leak(s.to_owned().into_boxed_str()))
    }

    /// Intern a string.
    ///
    /// # Panics
    /// Panics if a shard overflows. Use `try_intern` to handle that case.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Intern an owned string, reusing its allocation when it is new.
    ///
    /// # Panics
    /// Panics if a shard overflows.
    pub fn intern_owned(&self, s: String) -> Name {
        if let Some(name) = self.get(&s) {
            return name;
        }
        let leaked: &'static str = Box::leak(s.into_boxed_str());
        self.intern_with(leaked, || leaked)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Find the `Name` of an already-interned spelling without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        let shard_idx = Self::shard_for(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_u32 = shard_idx as u32;
        let local = self.shards[shard_idx].read().map.get(s).copied()?;
        Some(Name::new(shard_u32, local))
    }

    /// Resolve a `Name` back to its spelling.
    pub fn lookup(&self, name: Name) -> &str {
        self.shards[name.shard()].read().strings[name.local()]
    }

    fn pre_intern_builtins(&self) {
        const BUILTINS: &[&str] = &[
            // Storage and control keywords
            "attribute",
            "const",
            "uniform",
            "varying",
            "in",
            "out",
            "inout",
            "centroid",
            "invariant",
            "struct",
            "if",
            "else",
            "for",
            "while",
            "do",
            "break",
            "continue",
            "return",
            "discard",
            // Built-in types
            "void",
            "bool",
            "int",
            "float",
            "vec2",
            "vec3",
            "vec4",
            "bvec2",
            "bvec3",
            "bvec4",
            "ivec2",
            "ivec3",
            "ivec4",
            "mat2",
            "mat3",
            "mat4",
            "sampler2D",
            "samplerCube",
            // Built-in variables
            "gl_Position",
            "gl_FragColor",
            "gl_FragCoord",
            // Entry point
            "main",
        ];

        for builtin in BUILTINS {
            self.intern(builtin);
        }
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Whether only the empty string has been interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read access to interned spellings.
///
/// Lets diagnostics render names without depending on the concrete
/// interner type.
pub trait StringLookup {
    /// Look up the spelling of an interned name.
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

/// Interner handle shared across compilation units.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl StringLookup for SharedInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}
