// The infra module contains the HTTP clients for the services under test.
// Each remote service gets its own submodule.

pub mod google_api;

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "firebase/mod.rs"]
pub mod firebase;

#[path = "sheets/mod.rs"]
pub mod sheets;
