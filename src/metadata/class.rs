//! Class, method, and field records for DEX metadata.
//!
//! These records are the consumed interface of the hierarchy index: an external
//! loader produces one [`DexClass`] per loaded class and feeds it to
//! [`TypeHierarchy::register`](crate::metadata::typesystem::TypeHierarchy::register).
//! The member lists are append-only shared vectors so a loader can populate them
//! from parallel workers while other records already hold a reference.
//!
//! # Key Components
//!
//! - [`DexClass`]: One loaded class with its descriptor, superclass, interfaces,
//!   flags, methods, and instance fields
//! - [`DexMethod`]: A declared method, split into the virtual and direct lists
//!   by its owner
//! - [`DexField`]: A declared instance field
//! - [`DexCode`]: Register frame shape of a method body
//! - [`passes_args_through`]: Checks whether an invoke forwards the enclosing
//!   frame's incoming arguments unchanged

use std::sync::{Arc, OnceLock};

use crate::metadata::{descriptor::DexDescriptor, flags::ClassAccessFlags};

/// Reference to a [`DexClass`]
pub type DexClassRc = Arc<DexClass>;
/// Reference to a [`DexMethod`]
pub type DexMethodRc = Arc<DexMethod>;
/// Reference to a [`DexField`]
pub type DexFieldRc = Arc<DexField>;
/// A shared append-only list of methods
pub type DexMethodList = Arc<boxcar::Vec<DexMethodRc>>;
/// A shared append-only list of fields
pub type DexFieldList = Arc<boxcar::Vec<DexFieldRc>>;
/// A shared append-only list of descriptors
pub type DescriptorList = Arc<boxcar::Vec<DexDescriptor>>;

/// Special method name of an instance constructor
const CONSTRUCTOR_NAME: &str = "<init>";
/// Special method name of a static initializer
const CLASS_INITIALIZER_NAME: &str = "<clinit>";

/// Represents one loaded class.
///
/// A class is created exactly once by the loading collaborator and registered
/// into the hierarchy index at most once; it is never unregistered. The
/// superclass descriptor is absent only for the root object type.
pub struct DexClass {
    /// This class's own interned type descriptor
    pub descriptor: DexDescriptor,
    /// Descriptor of the superclass, `None` only for the root object type
    pub superclass: Option<DexDescriptor>,
    /// Descriptors of the directly implemented interfaces, in declaration order
    pub interfaces: DescriptorList,
    /// Access and kind flags from the `access_flags` word
    pub access_flags: ClassAccessFlags,
    /// Methods dispatched through the vtable
    pub virtual_methods: DexMethodList,
    /// Direct and static methods, never dispatched virtually
    pub direct_methods: DexMethodList,
    /// Declared instance fields
    pub instance_fields: DexFieldList,
}

impl DexClass {
    /// Create a new class record with empty member lists.
    ///
    /// ## Arguments
    /// * `descriptor` - The class's own type descriptor
    /// * `superclass` - The superclass descriptor, `None` for the root object type
    /// * `access_flags` - The raw `access_flags` word
    #[must_use]
    pub fn new(
        descriptor: DexDescriptor,
        superclass: Option<DexDescriptor>,
        access_flags: u32,
    ) -> Self {
        DexClass {
            descriptor,
            superclass,
            interfaces: Arc::new(boxcar::Vec::new()),
            access_flags: ClassAccessFlags::from_access(access_flags),
            virtual_methods: Arc::new(boxcar::Vec::new()),
            direct_methods: Arc::new(boxcar::Vec::new()),
            instance_fields: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Returns `true` if this class is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.access_flags.is_interface()
    }

    /// Total number of declared methods, virtual and direct
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.virtual_methods.count() + self.direct_methods.count()
    }
}

/// A declared method.
///
/// Whether a method is virtual or direct is a property of the list its owning
/// class keeps it in, not of the record itself.
pub struct DexMethod {
    /// Method name as it appears in the string section
    pub name: Arc<str>,
    /// Raw method access flags word
    pub access_flags: u32,
    /// The method body's register frame, absent for abstract and native methods
    pub code: OnceLock<DexCode>,
}

impl DexMethod {
    /// Create a new method record without a body
    #[must_use]
    pub fn new(name: &str, access_flags: u32) -> Self {
        DexMethod {
            name: Arc::from(name),
            access_flags,
            code: OnceLock::new(),
        }
    }

    /// Returns `true` if this is an instance constructor (`<init>`)
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        &*self.name == CONSTRUCTOR_NAME
    }

    /// Returns `true` if this is a static class initializer (`<clinit>`)
    #[must_use]
    pub fn is_class_initializer(&self) -> bool {
        &*self.name == CLASS_INITIALIZER_NAME
    }
}

/// A declared instance field
pub struct DexField {
    /// Field name as it appears in the string section
    pub name: Arc<str>,
    /// Descriptor of the field's declared type
    pub descriptor: DexDescriptor,
}

impl DexField {
    /// Create a new field record
    #[must_use]
    pub fn new(name: &str, descriptor: DexDescriptor) -> Self {
        DexField {
            name: Arc::from(name),
            descriptor,
        }
    }
}

/// Register frame shape of a method body.
///
/// The last `ins_size` registers of the frame hold the incoming arguments,
/// so the first argument lives in register `registers_size - ins_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DexCode {
    /// Total number of registers in the frame
    pub registers_size: u16,
    /// Number of registers holding incoming arguments
    pub ins_size: u16,
}

/// A decoded invoke instruction, reduced to its source register list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeInstruction {
    /// Argument source registers in call order
    pub sources: Vec<u16>,
}

/// Check whether an invoke forwards all incoming arguments unchanged.
///
/// True iff the invoke passes exactly the enclosing frame's argument registers,
/// in order, starting at the first argument register. `ignore` trims that many
/// trailing arguments from the expectation, for call sites that drop a suffix
/// of the frame's arguments.
///
/// ## Arguments
/// * `invoke` - The invoke instruction to test
/// * `code` - The register frame of the enclosing method
/// * `ignore` - Number of trailing frame arguments the invoke is allowed to omit
#[must_use]
pub fn passes_args_through(invoke: &InvokeInstruction, code: &DexCode, ignore: u16) -> bool {
    let expected = usize::from(code.ins_size.saturating_sub(ignore));
    if invoke.sources.len() != expected {
        return false;
    }

    let first_argument = code.registers_size - code.ins_size;
    invoke
        .sources
        .iter()
        .enumerate()
        .all(|(position, &source)| {
            #[allow(clippy::cast_possible_truncation)]
            let offset = position as u16;
            source == first_argument + offset
        })
}
