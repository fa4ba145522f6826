//! Personal book catalog with JSON persistence, served over MCP (stdio).
//!
//! Layers: `domain` (Library aggregate) → `application` (LibraryService, report)
//! → `infra` (JSON file repository) → `interface` (MCP tools).

pub mod application;
pub mod domain;
pub mod infra;
pub mod interface;
