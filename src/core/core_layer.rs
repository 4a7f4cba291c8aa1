// The core module holds the platform-agnostic pieces: the harness that
// sequences checks and the heuristics used to judge generated content.

#[path = "harness/mod.rs"]
pub mod harness;

#[path = "markers/content_markers.rs"]
pub mod markers;
