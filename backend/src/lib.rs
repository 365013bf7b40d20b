//! Discovery and progress engine for the City Explorer game.
//!
//! The crate is split hexagonally: [`domain`] holds the rules and ports,
//! [`outbound`] the in-memory and PostgreSQL adapters, and [`inbound`] the
//! actix-web handlers.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
