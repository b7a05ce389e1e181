// Manual review side of the candidate review pipeline:
// record management, queue navigation, resumable progress, HTTP handlers.

pub mod handlers;
pub mod progress;
pub mod queue;
pub mod records;
pub mod service;
