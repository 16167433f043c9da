//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! This crate contains the entities, the repository ports, field validation
//! and the use-case services. It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::{DomainError, DomainResult, RepoError};
pub use pagination::{Page, PageRequest};
