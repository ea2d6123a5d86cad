//! Rules resolution and derived statistics for d20 character building.
//!
//! The [`rules`] modules are pure functions over explicit inputs. The
//! [`core_api`] facade wires them to a loaded [`character::Character`] and a
//! read-only [`catalog::Catalog`].

pub mod catalog;
pub mod character;
pub mod config;
pub mod core_api;
pub mod rules;
