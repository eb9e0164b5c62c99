// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// wandelwerk-core — Shared types and errors for the Wandelwerk conversion
// engine.
//
// Provides the error taxonomy, the closed operation enumeration, conversion
// options with their documented defaults, and byte-level format sniffing.

pub mod error;
pub mod options;
pub mod sniff;
pub mod types;

pub use error::ConvertError;
pub use options::ConversionOptions;
pub use types::*;
