//! RTX Remix build downloader.
//!
//! Fetches the latest prebuilt binaries of the Remix runtime and bridge from
//! their GitHub repositories, merges them into a single tree, strips debug
//! files, and drops the result into a `remix/` directory with a manifest of
//! the build names it contains.

pub mod cli;
pub mod download;
pub mod error;
pub mod merge;
pub mod orchestration;
pub mod progress;
pub mod repos;
pub mod wizard;
