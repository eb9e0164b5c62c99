// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — format transcoding and multi-image canvas compositing.

pub mod composite;
pub mod transcode;

pub use composite::{CanvasPlan, MergedOutput, composite};
pub use transcode::{Transcoded, transcode};
