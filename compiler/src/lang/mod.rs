//! Defines generator related code for output languages.

pub mod java;

use crate::template::ModuleTemplates;
use crate::type_check::TypeCheckError;
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::Path;

/// Error that could occur during generation.
#[derive(Debug)]
pub enum GeneratorError {
	TypeCheckError(TypeCheckError),
	IOError(io::Error),
	CustomError(String),
}

impl fmt::Display for GeneratorError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GeneratorError::TypeCheckError(err) => write!(f, "{}", err),
			GeneratorError::IOError(err) => write!(f, "{}", err),
			GeneratorError::CustomError(err) => write!(f, "{}", err),
		}
	}
}

impl std::error::Error for GeneratorError {}

impl From<io::Error> for GeneratorError {
	fn from(err: io::Error) -> Self {
		GeneratorError::IOError(err)
	}
}

impl From<String> for GeneratorError {
	fn from(str: String) -> Self {
		GeneratorError::CustomError(str)
	}
}

impl From<&str> for GeneratorError {
	fn from(str: &str) -> Self {
		GeneratorError::CustomError(str.to_string())
	}
}

impl From<TypeCheckError> for GeneratorError {
	fn from(error: TypeCheckError) -> Self {
		GeneratorError::TypeCheckError(error)
	}
}

/// Outputs files produced by the generator.
///
/// Allows for capturing the output without writing directly to the file system.
pub trait OutputHandler<'state> {
	type FileHandle : io::Write;
	fn create_file<P: AsRef<Path>>(&'state mut self, path: P) -> Result<Self::FileHandle, GeneratorError>;
}

/// Defines an output language for generated templates.
pub trait Language {

	/// An intermediate step for the language options.
	type OptionsBuilder;

	/// Finalized options.
	type Options;

	/// Gets an option builder with no options set.
	fn empty_options() -> Self::OptionsBuilder;

	/// Sets an option.
	fn add_option(builder: &mut Self::OptionsBuilder, name: &str, value: OsString) -> Result<(), GeneratorError>;

	/// Ensures that any required options have been set and finalizes the options.
	fn finalize_options(builder: Self::OptionsBuilder) -> Result<Self::Options, GeneratorError>;

	/// Generates the source file holding the templates of one module.
	fn generate<Output: for<'output> OutputHandler<'output>>(module: &ModuleTemplates, options: &Self::Options, output: &mut Output) -> Result<(), GeneratorError>;

}
