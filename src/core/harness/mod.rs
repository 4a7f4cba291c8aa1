pub mod harness_models;
pub mod harness_service;

pub use harness_models::{CheckOutcome, FailureReason, CheckError};
pub use harness_service::{Check, Harness};
