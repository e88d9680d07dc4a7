//! SQL repositories. Each repository is a zero-sized type with associated
//! async functions taking a `&PgPool`.

pub mod todo_repo;

pub use todo_repo::TodoRepo;
