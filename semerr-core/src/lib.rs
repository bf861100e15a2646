//! # semerr-core
//!
//! Core types shared by the semerr workspace.
//!
//! This crate provides:
//! - **Spans and mentions**: `Span`, `Mention` (a located slot/value realization)
//! - **Meaning representations**: `MeaningRepresentation`, a slot → value → count multiset
//! - **Offsets**: `SpanConverter` for byte → character offset mapping
//!
//! It has no regex or I/O dependencies; matching and scoring live in `semerr`.

#![warn(missing_docs)]

pub mod error;
pub mod mention;
pub mod mr;
pub mod offset;

pub use error::{Error, Result};
pub use mention::{Mention, Span};
pub use mr::{MeaningRepresentation, ValueCounts};
pub use offset::SpanConverter;
