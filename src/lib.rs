#![doc = "rulebix-publish: inline manifest entry content and publish it to the Rulebix registry."]

//! The pipeline runs once per invocation, typically from CI:
//! configuration ([`load_config`]) → manifest ([`manifest`]) → entry content ([`content`])
//! → payload ([`payload`]) → submission ([`upload`]), orchestrated by [`publish`].

pub mod annotate;
pub mod cli;
pub mod content;
pub mod entry;
pub mod error;
pub mod load_config;
pub mod manifest;
pub mod payload;
pub mod publish;
pub mod upload;

pub use cli::{run, Cli, Commands};
pub use error::PublishError;
