//! Generates Java code that constructs the values of TTCN-3 templates.
//!
//! A front end resolves the types of a module into a [`SymbolTable`](model::SymbolTable)
//! with [`resolve_symbols`], then reports the nodes of the module to a
//! [`TemplateCompiler`]. The resulting [`ModuleTemplates`] are written by a
//! [`Language`](lang::Language) such as [`JavaLanguage`](lang::java::JavaLanguage).

pub mod ast;
pub mod util;
pub mod model;
pub mod lang;
pub mod template;
mod type_check;

#[cfg(not(target_arch = "wasm32"))]
mod file_output_handler;

#[cfg(not(target_arch = "wasm32"))]
pub use file_output_handler::FileOutputHandler;

mod memory_output_handler;
pub use memory_output_handler::MemoryOutputHandler;

pub use type_check::{resolve_symbols, TypeCheckError};
pub use template::{TemplateCompiler, ModuleTemplates, compile_module};
