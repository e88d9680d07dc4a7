//! Domain building blocks for the todo service.
//!
//! Everything here is pure logic with no database or HTTP dependencies:
//! shared type aliases, the domain error, and the rules that decide whether
//! an incoming todo payload or list query is acceptable.

pub mod error;
pub mod list_query;
pub mod todo;
pub mod types;
