//! Subcommand implementations

pub mod collect;
