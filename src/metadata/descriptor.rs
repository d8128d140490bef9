//! Type descriptor interning and classification for DEX metadata.
//!
//! Every type in a DEX file is identified by a descriptor string following a fixed
//! grammar: `V` for void, one of `Z B S C I J F D` for the primitive scalars,
//! `L<fully/qualified/Name>;` for a class or interface, and a run of one or more
//! `[` prefixes for arrays of any of those. This module owns the canonical store
//! for these strings and the structural queries over them.
//!
//! # Key Components
//!
//! - [`DescriptorPool`]: Interning arena mapping descriptor text to canonical handles
//! - [`DexDescriptor`]: Cheap `Copy` handle whose equality is descriptor identity
//! - [`TypeCategory`]: Closed classification of a descriptor's structural shape
//!
//! # Interning
//!
//! Descriptors are interned exactly once per pool: two calls to [`DescriptorPool::intern`]
//! with the same text return the same handle, so equality tests never compare strings.
//! The grammar is validated at intern time, which makes every downstream classification
//! total - a handle that exists always decodes.
//!
//! # Thread Safety
//!
//! The pool is safe for concurrent interning and lookup. The backing store is
//! append-only and reads are lock-free; racing interns of the same text converge
//! on a single handle.
//!
//! # Examples
//!
//! ```rust
//! use dexscope::metadata::descriptor::{DescriptorPool, TypeCategory};
//!
//! let pool = DescriptorPool::new();
//! let matrix = pool.intern("[[I")?;
//!
//! assert_eq!(pool.category(matrix), TypeCategory::Array);
//! assert_eq!(pool.array_level(matrix), 2);
//!
//! let element = pool.array_element(matrix).unwrap();
//! assert_eq!(pool.name(element), "I");
//! # Ok::<(), dexscope::Error>(())
//! ```

use std::{fmt, sync::Arc};

use dashmap::DashMap;
use strum::{EnumCount, EnumIter};

use crate::{Error::Empty, Result};

/// A canonical handle to an interned type descriptor.
///
/// Handles are indices into the owning [`DescriptorPool`]. Because interning
/// guarantees one handle per distinct descriptor string, handle equality is
/// descriptor equality - no string comparison is ever needed. Handles are only
/// meaningful together with the pool that produced them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DexDescriptor(u32);

impl DexDescriptor {
    /// Returns the raw pool index of this handle
    #[must_use]
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DexDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DexDescriptor({})", self.0)
    }
}

/// Structural classification of a type descriptor.
///
/// The category is decided by the first character of the descriptor alone;
/// `[` unconditionally means [`TypeCategory::Array`] regardless of the element
/// type that follows. The enum is closed - every descriptor that passed intern
/// validation maps to exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter)]
pub enum TypeCategory {
    /// The `V` descriptor, only valid as a return type
    Void,
    /// The `Z` primitive
    Boolean,
    /// The `B` primitive
    Byte,
    /// The `S` primitive
    Short,
    /// The `C` primitive
    Char,
    /// The `I` primitive
    Int,
    /// The `J` primitive
    Long,
    /// The `F` primitive
    Float,
    /// The `D` primitive
    Double,
    /// An `L<name>;` class or interface reference
    Object,
    /// A `[`-prefixed array of any element type
    Array,
}

impl TypeCategory {
    /// Classify validated descriptor text by its first character.
    ///
    /// # Panics
    /// Panics if the text does not start with a recognized descriptor character.
    /// Descriptors are only constructed through validated interning, so this
    /// cannot happen for any handle obtained from a [`DescriptorPool`].
    pub(crate) fn from_descriptor(name: &str) -> Self {
        match name.as_bytes().first() {
            Some(b'V') => TypeCategory::Void,
            Some(b'Z') => TypeCategory::Boolean,
            Some(b'B') => TypeCategory::Byte,
            Some(b'S') => TypeCategory::Short,
            Some(b'C') => TypeCategory::Char,
            Some(b'I') => TypeCategory::Int,
            Some(b'J') => TypeCategory::Long,
            Some(b'F') => TypeCategory::Float,
            Some(b'D') => TypeCategory::Double,
            Some(b'L') => TypeCategory::Object,
            Some(b'[') => TypeCategory::Array,
            _ => unreachable!("descriptor {name:?} escaped intern validation"),
        }
    }

    /// The shorty code for this category.
    ///
    /// Shorties collapse the classification to the coarse register-slot shape:
    /// each primitive keeps its own code, while objects and arrays share `'L'`
    /// because both occupy a single reference slot.
    #[must_use]
    pub fn shorty(self) -> char {
        match self {
            TypeCategory::Void => 'V',
            TypeCategory::Boolean => 'Z',
            TypeCategory::Byte => 'B',
            TypeCategory::Short => 'S',
            TypeCategory::Char => 'C',
            TypeCategory::Int => 'I',
            TypeCategory::Long => 'J',
            TypeCategory::Float => 'F',
            TypeCategory::Double => 'D',
            TypeCategory::Object | TypeCategory::Array => 'L',
        }
    }

    /// Returns `true` for exactly the eight primitive scalar categories.
    ///
    /// Void, objects, and arrays are not primitive.
    #[must_use]
    pub fn is_primitive(self) -> bool {
        !matches!(
            self,
            TypeCategory::Void | TypeCategory::Object | TypeCategory::Array
        )
    }
}

/// Interning arena for type descriptors.
///
/// The pool owns every descriptor string for its lifetime and hands out
/// [`DexDescriptor`] handles in exchange. All structural queries (category,
/// shorty, array shape) go through the pool, which lets them dispatch on the
/// canonical text without re-validating it.
///
/// The well-known descriptors of the runtime (`Ljava/lang/Object;`, the scalar
/// codes, `Ljava/lang/String;`, ...) are interned at construction so their
/// handles are available without a fallible call.
///
/// # Thread Safety
///
/// Interning uses a concurrent map keyed by the descriptor text; racing interns
/// of the same string resolve to one handle and the loser's allocation is
/// dropped. The index-to-text store is append-only, so [`DescriptorPool::name`]
/// is lock-free and returns a reference that stays valid for the pool's lifetime.
pub struct DescriptorPool {
    /// Append-only store mapping handle indices to descriptor text
    names: boxcar::Vec<Arc<str>>,
    /// Canonical text to handle mapping, the interning table proper
    handles: DashMap<Arc<str>, DexDescriptor>,
    /// `Ljava/lang/Object;`, the root of every class hierarchy
    object: DexDescriptor,
    /// The `V` descriptor
    void: DexDescriptor,
    /// The `Z` descriptor
    boolean: DexDescriptor,
    /// The `I` descriptor
    int: DexDescriptor,
    /// The `J` descriptor
    long: DexDescriptor,
    /// The `D` descriptor
    double: DexDescriptor,
    /// `Ljava/lang/String;`
    string: DexDescriptor,
    /// `Ljava/lang/Class;`
    class: DexDescriptor,
    /// `Ljava/lang/Enum;`
    enumeration: DexDescriptor,
}

impl DescriptorPool {
    /// Create a new pool with the well-known runtime descriptors pre-interned.
    #[must_use]
    pub fn new() -> Self {
        let names = boxcar::Vec::new();
        let handles = DashMap::new();

        let intern = |text: &str| {
            let name: Arc<str> = Arc::from(text);
            #[allow(clippy::cast_possible_truncation)]
            let descriptor = DexDescriptor(names.push(name.clone()) as u32);
            handles.insert(name, descriptor);
            descriptor
        };

        let object = intern("Ljava/lang/Object;");
        let void = intern("V");
        let boolean = intern("Z");
        let int = intern("I");
        let long = intern("J");
        let double = intern("D");
        let string = intern("Ljava/lang/String;");
        let class = intern("Ljava/lang/Class;");
        let enumeration = intern("Ljava/lang/Enum;");

        DescriptorPool {
            names,
            handles,
            object,
            void,
            boolean,
            int,
            long,
            double,
            string,
            class,
            enumeration,
        }
    }

    /// Intern descriptor text and return its canonical handle.
    ///
    /// The same text always yields the same handle, so callers may compare
    /// handles instead of strings. Validation happens here and only here;
    /// every query on the returned handle is infallible.
    ///
    /// ## Arguments
    /// * `text` - The descriptor text to intern
    ///
    /// # Errors
    /// Returns [`Empty`](crate::Error::Empty) for an empty string and
    /// [`Malformed`](crate::Error::Malformed) for text that does not follow
    /// the descriptor grammar.
    pub fn intern(&self, text: &str) -> Result<DexDescriptor> {
        if text.is_empty() {
            return Err(Empty);
        }

        validate(text)?;
        Ok(self.intern_validated(text))
    }

    /// Look up the handle for descriptor text without interning it.
    ///
    /// Returns `None` if the text was never interned in this pool.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<DexDescriptor> {
        self.handles.get(text).map(|entry| *entry.value())
    }

    /// The canonical text of an interned descriptor.
    ///
    /// The returned reference stays valid for the lifetime of the pool.
    ///
    /// # Panics
    /// Panics if the handle was produced by a different pool.
    #[must_use]
    pub fn name(&self, descriptor: DexDescriptor) -> &str {
        self.names
            .get(descriptor.0 as usize)
            .expect("descriptor handle does not belong to this pool")
    }

    /// Number of distinct descriptors interned so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.count()
    }

    /// Returns `true` if the pool holds no descriptors.
    ///
    /// Never true in practice - the well-known descriptors are interned at
    /// construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.count() == 0
    }

    /// Classify a descriptor by its structural category
    #[must_use]
    pub fn category(&self, descriptor: DexDescriptor) -> TypeCategory {
        TypeCategory::from_descriptor(self.name(descriptor))
    }

    /// The shorty code of a descriptor.
    ///
    /// See [`TypeCategory::shorty`] for the collapse rules.
    #[must_use]
    pub fn shorty(&self, descriptor: DexDescriptor) -> char {
        self.category(descriptor).shorty()
    }

    /// Returns `true` for exactly the eight primitive scalar descriptors
    #[must_use]
    pub fn is_primitive(&self, descriptor: DexDescriptor) -> bool {
        self.category(descriptor).is_primitive()
    }

    /// Returns `true` if the descriptor denotes an array type
    #[must_use]
    pub fn is_array(&self, descriptor: DexDescriptor) -> bool {
        self.name(descriptor).starts_with('[')
    }

    /// Number of array dimensions, 0 for non-arrays
    #[must_use]
    pub fn array_level(&self, descriptor: DexDescriptor) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let level = self
            .name(descriptor)
            .bytes()
            .take_while(|&b| b == b'[')
            .count() as u32;
        level
    }

    /// The element descriptor of an array, with the full `[` run stripped.
    ///
    /// `[[I` yields the handle for `I`, not `[I`. Returns `None` when called
    /// on a non-array descriptor.
    #[must_use]
    pub fn array_element(&self, descriptor: DexDescriptor) -> Option<DexDescriptor> {
        let name = self.name(descriptor);
        if !name.starts_with('[') {
            return None;
        }
        Some(self.intern_validated(name.trim_start_matches('[')))
    }

    /// `Ljava/lang/Object;`, the implicit root of the class hierarchy
    #[must_use]
    pub fn object_type(&self) -> DexDescriptor {
        self.object
    }

    /// The `V` descriptor
    #[must_use]
    pub fn void_type(&self) -> DexDescriptor {
        self.void
    }

    /// The `Z` descriptor
    #[must_use]
    pub fn boolean_type(&self) -> DexDescriptor {
        self.boolean
    }

    /// The `I` descriptor
    #[must_use]
    pub fn int_type(&self) -> DexDescriptor {
        self.int
    }

    /// The `J` descriptor
    #[must_use]
    pub fn long_type(&self) -> DexDescriptor {
        self.long
    }

    /// The `D` descriptor
    #[must_use]
    pub fn double_type(&self) -> DexDescriptor {
        self.double
    }

    /// `Ljava/lang/String;`
    #[must_use]
    pub fn string_type(&self) -> DexDescriptor {
        self.string
    }

    /// `Ljava/lang/Class;`
    #[must_use]
    pub fn class_type(&self) -> DexDescriptor {
        self.class
    }

    /// `Ljava/lang/Enum;`
    #[must_use]
    pub fn enum_type(&self) -> DexDescriptor {
        self.enumeration
    }

    /// Intern text that already passed grammar validation.
    ///
    /// Also used for suffixes of validated descriptors (array element
    /// stripping) and the well-known literals, which are valid by construction.
    fn intern_validated(&self, text: &str) -> DexDescriptor {
        if let Some(existing) = self.handles.get(text) {
            return *existing.value();
        }

        let name: Arc<str> = Arc::from(text);
        let backing = name.clone();
        *self.handles.entry(name).or_insert_with(|| {
            #[allow(clippy::cast_possible_truncation)]
            let index = self.names.push(backing) as u32;
            DexDescriptor(index)
        })
    }
}

impl Default for DescriptorPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate descriptor text against the descriptor grammar.
///
/// A descriptor is a possibly empty run of `[` dimension markers followed by
/// exactly one element: `V`, a primitive scalar code, or `L<name>;`.
fn validate(text: &str) -> Result<()> {
    let element = text.trim_start_matches('[');
    if element.is_empty() {
        return Err(malformed_error!(
            "array descriptor '{}' has no element type",
            text
        ));
    }

    match element.as_bytes()[0] {
        b'V' | b'Z' | b'B' | b'S' | b'C' | b'I' | b'J' | b'F' | b'D' => {
            if element.len() == 1 {
                Ok(())
            } else {
                Err(malformed_error!(
                    "primitive descriptor '{}' has trailing characters",
                    text
                ))
            }
        }
        b'L' => {
            if element.len() > 2 && element.ends_with(';') {
                Ok(())
            } else {
                Err(malformed_error!(
                    "object descriptor '{}' is not of the form L<name>;",
                    text
                ))
            }
        }
        _ => Err(malformed_error!(
            "descriptor '{}' starts with an unrecognized character",
            text
        )),
    }
}
