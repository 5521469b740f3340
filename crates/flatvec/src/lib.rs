//! Growable vector of fixed-size byte elements.
//!
//! [`Vector`] owns one contiguous, zero-initialised buffer of equally
//! sized slots. The element size is chosen at runtime and the container
//! never looks inside an element: ordering comes from caller comparators,
//! cleanup from an optional caller destructor. [`TypedVector`] layers
//! value-typed access on top for any [`Element`] type.
//!
//! # Architecture
//!
//! ```text
//! TypedVector<T: Element>   (encode / decode at the edges)
//! └── Vector                (positions, growth, destructor, search, sort)
//!     ├── SlotBuffer        (Vec<u8> carved into slots; shift / grow / permute)
//!     ├── Destructor        (optional Box<dyn FnMut(&mut [u8])>)
//!     └── VectorStats       (growth, destructor and byte-move counters)
//! ```
//!
//! # Growth
//!
//! A full vector doubles its capacity before the next insert. The live
//! prefix is copied byte-for-byte into the new buffer and the old buffer is
//! released. Relocation never calls the destructor: elements are required
//! to be relocatable as plain bytes.
//!
//! # Preconditions
//!
//! Positional operations panic on out-of-range positions, like slice
//! indexing. Each has a `try_*` twin that returns [`VectorError`] instead.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod metrics;
mod search;
pub mod typed;
pub mod vector;

// Public re-exports for the primary API surface.
pub use config::{DisposeScope, VectorConfig};
pub use error::VectorError;
pub use metrics::VectorStats;
pub use typed::{Element, TypedVector};
pub use vector::{Destructor, ElementBytes, Vector};
