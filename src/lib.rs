// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # dexscope
//!
//! A high-performance, cross-platform framework for analyzing Dalvik executable (DEX)
//! type metadata. Built in pure Rust, `dexscope` models the descriptor-based type
//! system of DEX bytecode and answers the structural questions optimization and
//! analysis passes ask about it, without requiring an Android runtime.
//!
//! ## Features
//!
//! - **🔤 Interned descriptors** - Canonical handles for descriptor strings; equality is identity
//! - **🌳 Class hierarchy index** - Incremental, thread-safe registration with lock-free queries
//! - **🔍 Cast resolution** - Assignability over superclasses and multi-level interface chains
//! - **📏 Footprint estimation** - Heuristic native allocation cost per class
//! - **🛡️ Memory safe** - Built in Rust with comprehensive error handling
//!
//! ## Quick Start
//!
//! Add `dexscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! dexscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use std::sync::Arc;
//! use dexscope::prelude::*;
//!
//! let pool = Arc::new(DescriptorPool::new());
//! let hierarchy = TypeHierarchy::new(pool.clone());
//!
//! let widget = pool.intern("Lcom/example/Widget;")?;
//! hierarchy.register(&Arc::new(DexClass::new(widget, Some(pool.object_type()), 0x1)))?;
//!
//! assert!(hierarchy.is_assignable(widget, pool.object_type()));
//! # Ok::<(), dexscope::Error>(())
//! ```
//!
//! ### Descriptor Queries
//!
//! ```rust
//! use dexscope::metadata::descriptor::{DescriptorPool, TypeCategory};
//!
//! let pool = DescriptorPool::new();
//! let matrix = pool.intern("[[I")?;
//!
//! assert_eq!(pool.category(matrix), TypeCategory::Array);
//! assert_eq!(pool.array_level(matrix), 2);
//! assert_eq!(pool.shorty(matrix), 'L');
//! # Ok::<(), dexscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `dexscope` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`metadata`] - Descriptor pool, class records, and the hierarchy index
//! - [`analysis`] - Footprint estimation and scope rebuilding passes
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ### Concurrency Model
//!
//! Hierarchy registration is the only mutating operation and is safe from
//! parallel workers; all queries are lock-free reads. Call sites that mix
//! registration and queries must separate the two phases with a join - the
//! index gives no snapshot consistency between a concurrent writer and reader,
//! only memory safety.

#[macro_use]
pub(crate) mod error;

pub mod analysis;
pub mod metadata;

/// This module provides a curated selection of the most frequently used types
/// for DEX type metadata analysis.
pub mod prelude;

/// `dexscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
///
/// # Examples
///
/// ```rust
/// use dexscope::{DescriptorPool, DexDescriptor, Result};
///
/// fn intern_both(pool: &DescriptorPool) -> Result<(DexDescriptor, DexDescriptor)> {
///     Ok((pool.intern("I")?, pool.intern("[I")?))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `dexscope` Error type
///
/// The main error type for all operations in this crate. Provides detailed error
/// information for descriptor interning, hierarchy registration, and analysis passes.
pub use error::Error;

/// Interning arena for type descriptors.
///
/// See [`metadata::descriptor::DescriptorPool`] for interning and structural queries.
pub use metadata::descriptor::DescriptorPool;

/// Canonical handle to an interned type descriptor.
pub use metadata::descriptor::DexDescriptor;

/// The class hierarchy index.
///
/// See [`metadata::typesystem::TypeHierarchy`] for registration, subclass
/// enumeration, and cast resolution.
pub use metadata::typesystem::TypeHierarchy;
