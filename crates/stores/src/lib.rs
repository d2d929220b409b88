// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory implementations of the engine's store traits.
//!
//! The engine treats cards, tickets, staff and attendance as external
//! collaborators behind the traits in `amc-book`. This crate provides the
//! in-process implementations the server and tests run against. Writes are
//! serialized per store, and the conditional ticket create performs its
//! check and insert under one lock so concurrent bulk items cannot
//! double-book a milestone.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod credential;
mod memory;

pub use credential::StaticCredentialProvider;
pub use memory::MemoryStore;
