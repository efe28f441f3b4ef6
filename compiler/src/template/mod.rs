//! Translation of TTCN-3 template definitions into Java source code.
//!
//! The front end drives the translation by reporting every node of the tree twice: once
//! when it is entered ([`TemplateCompiler::process`]) and once when it is left
//! ([`TemplateCompiler::finish`]). Each kind of template syntax is consumed by its own
//! scope, a small automaton that stays on nodes it does not care about, descends into
//! a child scope for nested templates, and ascends with its result once its node closes.

mod scope;
mod value;
mod definition;
mod module_templates;
mod value_parser;
mod modification;
mod template_parser;
mod driver;
pub mod util;

#[cfg(test)]
mod tests;

pub(crate) use scope::{Scope, Step, skip, wait_for};
pub use value::{Value, ValueKind};
pub use definition::{DotPath, Field, Modification, Template, TemplateBuilder};
pub use module_templates::ModuleTemplates;
pub use driver::{TemplateCompiler, compile_module};

use crate::model::SymbolTable;
use log::{error, warn};
use std::fmt;

/// Error that aborts the translation of one template definition.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateError {
	UnknownBaseTemplate(String),
	UnknownType(String),
	UnknownField(String, String),
	UnknownAlternative(String, String),
	MultipleUnionAlternatives(String, String, String),
	MissingUnionAlternative(String),
	MissingType,
	MissingName,
	MalformedLiteral(String),
	UnresolvedReference(String),
	UnexpectedProduct(&'static str),
}

impl fmt::Display for TemplateError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TemplateError::UnknownBaseTemplate(name) => write!(f, "unknown base template {}", name),
			TemplateError::UnknownType(name) => write!(f, "unknown type {}", name),
			TemplateError::UnknownField(type_name, field) => write!(f, "type {} has no field {}", type_name, field),
			TemplateError::UnknownAlternative(type_name, alt) => write!(f, "union {} has no alternative {}", type_name, alt),
			TemplateError::MultipleUnionAlternatives(type_name, first, second) =>
				write!(f, "union {} template selects both {} and {}", type_name, first, second),
			TemplateError::MissingUnionAlternative(type_name) => write!(f, "union {} template selects no alternative", type_name),
			TemplateError::MissingType => write!(f, "missing type"),
			TemplateError::MissingName => write!(f, "missing template name"),
			TemplateError::MalformedLiteral(text) => write!(f, "malformed literal {}", text),
			TemplateError::UnresolvedReference(name) => write!(f, "unresolved reference {}", name),
			TemplateError::UnexpectedProduct(what) => write!(f, "unexpected {}", what),
		}
	}
}

impl std::error::Error for TemplateError {}

/// A problem found while translating a module.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
	/// The template was dropped.
	Error {
		template: Option<String>,
		error: TemplateError,
	},
	/// The template was generated with a placeholder.
	Warning {
		template: Option<String>,
		message: String,
	},
}

impl Diagnostic {
	pub fn is_error(&self) -> bool {
		match self {
			Diagnostic::Error { .. } => true,
			Diagnostic::Warning { .. } => false,
		}
	}

	pub fn template(&self) -> Option<&str> {
		match self {
			Diagnostic::Error { template, .. } | Diagnostic::Warning { template, .. } => template.as_deref(),
		}
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (severity, message) = match self {
			Diagnostic::Error { error, .. } => ("error", error.to_string()),
			Diagnostic::Warning { message, .. } => ("warning", message.clone()),
		};

		match self.template() {
			Some(template) => write!(f, "{} in template {}: {}", severity, template, message),
			None => write!(f, "{}: {}", severity, message),
		}
	}
}

/// What a scope hands to its parent when it ascends.
#[derive(Debug)]
pub(crate) enum Product {
	Value(Value),
	Parameters(Vec<Field>),
	Modifications(Vec<Modification>),
	Template(Template),
}

impl Product {
	pub fn describe(&self) -> &'static str {
		match self {
			Product::Value(_) => "value",
			Product::Parameters(_) => "formal parameter list",
			Product::Modifications(_) => "modification list",
			Product::Template(_) => "template definition",
		}
	}
}

/// State shared by the scopes of one module.
pub(crate) struct Context<'s> {
	pub(crate) symbols: &'s SymbolTable,
	pub(crate) templates: ModuleTemplates,

	/// Formal parameters of the template being translated.
	pub(crate) parameters: Vec<Field>,
	pub(crate) current: Option<String>,
}

impl <'s> Context<'s> {
	pub(crate) fn new(symbols: &'s SymbolTable) -> Self {
		Context {
			symbols: symbols,
			templates: ModuleTemplates::new(),
			parameters: Vec::new(),
			current: None,
		}
	}

	pub(crate) fn begin_template(&mut self) {
		self.current = None;
		self.parameters.clear();
	}

	pub(crate) fn warn(&mut self, message: String) {
		warn!("{}: {}", self.current.as_deref().unwrap_or("<unnamed>"), message);
		self.templates.report(Diagnostic::Warning {
			template: self.current.clone(),
			message: message,
		});
	}

	pub(crate) fn report_error(&mut self, err: TemplateError) {
		error!("{}: {}", self.current.as_deref().unwrap_or("<unnamed>"), err);
		self.templates.report(Diagnostic::Error {
			template: self.current.clone(),
			error: err,
		});
	}
}
