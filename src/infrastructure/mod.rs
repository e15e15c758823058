//! Adapters behind the domain ports, plus the seed data they start from.

pub mod in_memory;
pub mod seed;
