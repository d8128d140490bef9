//! Class access flags and visibility handling for DEX metadata.
//!
//! DEX stores a class's visibility and kind in a single 4-byte `access_flags`
//! word. This module defines the bitflags for that word, the visibility mask,
//! and the visibility merge rule used when classes are combined.

use bitflags::bitflags;

/// Bitmask selecting only the visibility bits of an access flags word
pub const VISIBILITY_MASK: u32 = 0x0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Class access and property flags from the DEX `access_flags` word
    pub struct ClassAccessFlags: u32 {
        /// Visible everywhere
        const PUBLIC = 0x0001;
        /// Visible only to the defining class
        const PRIVATE = 0x0002;
        /// Visible to the package and subclasses
        const PROTECTED = 0x0004;
        /// Member is static
        const STATIC = 0x0008;
        /// No further derivation allowed
        const FINAL = 0x0010;
        /// Class is an interface
        const INTERFACE = 0x0200;
        /// Class cannot be instantiated directly
        const ABSTRACT = 0x0400;
        /// Not directly defined in source code
        const SYNTHETIC = 0x1000;
        /// Class is an annotation type
        const ANNOTATION = 0x2000;
        /// Class is an enumerated type
        const ENUM = 0x4000;
    }
}

impl ClassAccessFlags {
    /// Extract class flags from a raw access flags word
    #[must_use]
    pub fn from_access(flags: u32) -> Self {
        Self::from_bits_truncate(flags)
    }

    /// The visibility bits of this flags value, all other bits cleared
    #[must_use]
    pub fn visibility(self) -> Self {
        Self::from_bits_truncate(self.bits() & VISIBILITY_MASK)
    }

    /// Returns `true` if the interface bit is set
    #[must_use]
    pub fn is_interface(self) -> bool {
        self.contains(Self::INTERFACE)
    }
}

/// Merge two visibility words to the least restrictive of the pair.
///
/// Both inputs are masked to their visibility bits first. Public beats
/// everything; if either side is package-private (no visibility bits set) the
/// result is package-private, since widening past the package boundary would
/// change meaning; otherwise protected beats private.
///
/// # Examples
///
/// ```rust
/// use dexscope::metadata::flags::{merge_visibility, ClassAccessFlags};
///
/// let merged = merge_visibility(
///     ClassAccessFlags::PROTECTED.bits(),
///     ClassAccessFlags::PRIVATE.bits(),
/// );
/// assert_eq!(merged, ClassAccessFlags::PROTECTED);
/// ```
#[must_use]
pub fn merge_visibility(vis1: u32, vis2: u32) -> ClassAccessFlags {
    let vis1 = vis1 & VISIBILITY_MASK;
    let vis2 = vis2 & VISIBILITY_MASK;

    let public = ClassAccessFlags::PUBLIC.bits();
    let protected = ClassAccessFlags::PROTECTED.bits();

    if (vis1 & public) != 0 || (vis2 & public) != 0 {
        return ClassAccessFlags::PUBLIC;
    }
    if vis1 == 0 || vis2 == 0 {
        return ClassAccessFlags::empty();
    }
    if (vis1 & protected) != 0 || (vis2 & protected) != 0 {
        return ClassAccessFlags::PROTECTED;
    }
    ClassAccessFlags::PRIVATE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_public_wins() {
        assert_eq!(
            merge_visibility(
                ClassAccessFlags::PUBLIC.bits(),
                ClassAccessFlags::PRIVATE.bits()
            ),
            ClassAccessFlags::PUBLIC
        );
        assert_eq!(
            merge_visibility(
                ClassAccessFlags::PROTECTED.bits(),
                ClassAccessFlags::PUBLIC.bits()
            ),
            ClassAccessFlags::PUBLIC
        );
    }

    #[test]
    fn test_merge_package_private_sticks() {
        // Package-private on either side pins the result to package-private
        assert_eq!(
            merge_visibility(0, ClassAccessFlags::PROTECTED.bits()),
            ClassAccessFlags::empty()
        );
        assert_eq!(
            merge_visibility(ClassAccessFlags::PRIVATE.bits(), 0),
            ClassAccessFlags::empty()
        );
    }

    #[test]
    fn test_merge_protected_beats_private() {
        assert_eq!(
            merge_visibility(
                ClassAccessFlags::PROTECTED.bits(),
                ClassAccessFlags::PRIVATE.bits()
            ),
            ClassAccessFlags::PROTECTED
        );
    }

    #[test]
    fn test_merge_private_private() {
        assert_eq!(
            merge_visibility(
                ClassAccessFlags::PRIVATE.bits(),
                ClassAccessFlags::PRIVATE.bits()
            ),
            ClassAccessFlags::PRIVATE
        );
    }

    #[test]
    fn test_merge_masks_non_visibility_bits() {
        // Kind bits like INTERFACE or FINAL never leak into the result
        let vis1 = ClassAccessFlags::PUBLIC.bits() | ClassAccessFlags::INTERFACE.bits();
        let vis2 = ClassAccessFlags::PRIVATE.bits() | ClassAccessFlags::FINAL.bits();
        assert_eq!(merge_visibility(vis1, vis2), ClassAccessFlags::PUBLIC);
    }

    #[test]
    fn test_visibility_extraction() {
        let flags = ClassAccessFlags::from_access(0x0601); // PUBLIC | INTERFACE | ABSTRACT
        assert_eq!(flags.visibility(), ClassAccessFlags::PUBLIC);
        assert!(flags.is_interface());
    }
}
