//! GraphQL schema → TypeScript type declarations.
//!
//! ```text
//! Document ──► SymbolTables ──► Folder (post-order) ──► Codegen ──► GeneratedOutput
//! ```
pub mod codegen;
pub mod config;
pub mod declaration;
pub mod error;
pub mod fold;
pub mod ir;
pub mod lower;
pub mod naming;
pub mod path_de;
pub mod resolve;
pub mod symbols;

pub use codegen::{Codegen, GeneratedOutput};
pub use config::{Config, RawConfig};
pub use error::CodegenError;
pub use ir::Document;
pub use naming::{BuiltinConvention, NamingConvention};
pub use symbols::{SymbolTables, TypeRegistry};
