//! tsexplode Core Types and Definitions
//!
//! This crate provides the foundational types shared by the tsexplode front
//! end and the flattening engine. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Documentation**: Parsed JSDoc comments ([`docs::DocComment`])
//! - **Type graph**: Declarations and type nodes ([`graph::TypeGraph`])
//! - **Provider**: The query interface the flattener consumes ([`provider::TypeGraphProvider`])

pub mod docs;
pub mod graph;
pub mod identifier;
pub mod provider;
