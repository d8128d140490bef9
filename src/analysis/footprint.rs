//! Native memory footprint estimation for loaded classes.
//!
//! The runtime's class linker allocates vtables, method records, and field
//! records from its own native arena. This estimator predicts that cost per
//! class in abstract cost units, from the class's method and field counts and
//! its position relative to a handful of well-known heavyweight framework base
//! classes.
//!
//! The estimate is intentionally coarse. Framework classes like `View` or
//! `Activity` drag in vtables far larger than the default object vtable, so a
//! pattern table overrides the base cost for classes whose own name - or,
//! failing that, whose superclass's name - ends in one of the known suffixes.
//! The counts stay bug-compatible with the DalvikStatsTool numbers rather than
//! modelling the allocator precisely.

use regex::Regex;

use crate::{
    metadata::{class::DexClass, descriptor::DescriptorPool},
    Result,
};

/// Default vtable overhead of a plain object class
const OBJECT_VTABLE_COST: u32 = 48;
/// Cost of one declared method record
const METHOD_COST: u32 = 52;
/// Cost of one declared instance field record
const INSTANCE_FIELD_COST: u32 = 16;
/// Cost of one vtable dispatch slot
const VTABLE_SLOT_COST: u32 = 4;

/// A name pattern overriding the default vtable cost
struct PenaltyPattern {
    /// Pattern matched against the full descriptor text
    pattern: Regex,
    /// Replacement vtable cost when the pattern matches
    penalty: u32,
}

/// Estimates the native allocation cost of classes.
///
/// The penalty pattern table is compiled once at construction and reused for
/// every estimate; construct the estimator at analysis-pass start next to the
/// pool and hierarchy it works with. Patterns are tried in table order and the
/// first match wins. Matching is unanchored over the full descriptor text, so
/// the suffix patterns see the trailing `;` terminator.
///
/// # Examples
///
/// ```rust
/// use dexscope::analysis::footprint::FootprintEstimator;
/// use dexscope::metadata::{class::DexClass, descriptor::DescriptorPool};
///
/// let pool = DescriptorPool::new();
/// let estimator = FootprintEstimator::new()?;
///
/// let descriptor = pool.intern("Lcom/example/Widget;")?;
/// let class = DexClass::new(descriptor, Some(pool.object_type()), 0x1);
/// assert_eq!(estimator.estimate(&class, &pool), 48);
/// # Ok::<(), dexscope::Error>(())
/// ```
pub struct FootprintEstimator {
    /// Ordered penalty table, first match wins
    patterns: Vec<PenaltyPattern>,
}

impl FootprintEstimator {
    /// Create an estimator with the built-in penalty pattern table.
    ///
    /// # Errors
    /// Returns [`PatternError`](crate::Error::PatternError) if a penalty
    /// pattern fails to compile.
    pub fn new() -> Result<Self> {
        let table: [(&str, u32); 4] = [
            ("Layout;$", 1500),
            ("View;$", 1500),
            ("ViewGroup;$", 1800),
            ("Activity;$", 1500),
        ];

        let mut patterns = Vec::with_capacity(table.len());
        for (pattern, penalty) in table {
            patterns.push(PenaltyPattern {
                pattern: Regex::new(pattern)?,
                penalty,
            });
        }
        Ok(FootprintEstimator { patterns })
    }

    /// Estimate the native allocation cost of a class, in cost units.
    ///
    /// Non-interface classes pay a vtable overhead - the first matching penalty
    /// for the class's own name, else for the superclass's name, else the
    /// default - plus one dispatch slot per virtual method. All classes pay the
    /// per-method record cost for every declared method and the per-field
    /// record cost for every instance field.
    ///
    /// ## Arguments
    /// * `class` - The class to estimate
    /// * `pool` - The pool owning the class's descriptors
    #[must_use]
    pub fn estimate(&self, class: &DexClass, pool: &DescriptorPool) -> u32 {
        let mut units = 0;

        #[allow(clippy::cast_possible_truncation)]
        let virtual_count = class.virtual_methods.count() as u32;
        #[allow(clippy::cast_possible_truncation)]
        let direct_count = class.direct_methods.count() as u32;
        #[allow(clippy::cast_possible_truncation)]
        let field_count = class.instance_fields.count() as u32;

        if !class.is_interface() {
            let vtable_penalty = self
                .penalty_for(pool.name(class.descriptor))
                .or_else(|| {
                    class
                        .superclass
                        .and_then(|superclass| self.penalty_for(pool.name(superclass)))
                })
                .unwrap_or(OBJECT_VTABLE_COST);
            units += vtable_penalty;
            units += virtual_count * VTABLE_SLOT_COST;
        }

        units += (virtual_count + direct_count) * METHOD_COST;
        units += field_count * INSTANCE_FIELD_COST;
        units
    }

    /// First matching penalty for a descriptor name, in table order
    fn penalty_for(&self, name: &str) -> Option<u32> {
        self.patterns
            .iter()
            .find(|entry| entry.pattern.is_match(name))
            .map(|entry| entry.penalty)
    }
}
