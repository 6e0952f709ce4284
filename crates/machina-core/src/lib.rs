//! Machina Core Types and Definitions
//!
//! This crate provides the foundational types for the Machina state-diagram
//! compiler. It includes:
//!
//! - **Identifiers**: Hierarchical state identifiers ([`identifier::StateId`])
//! - **Scopes**: The composite-state scope stack ([`scope::ScopeStack`])
//! - **Store**: The state/transition store ([`db::StateDb`])
//! - **Events**: Structural ingestion events ([`event::StoreEvent`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)

pub mod db;
pub mod error;
pub mod event;
pub mod geometry;
pub mod identifier;
pub mod scope;
pub mod state;

pub use db::StateDb;
pub use error::CoreError;
pub use event::StoreEvent;
pub use identifier::StateId;
