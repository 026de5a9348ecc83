pub mod diff;
pub mod extract;
pub mod pacing;
pub mod scoring;
