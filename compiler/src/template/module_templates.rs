use crate::lang::GeneratorError;
use crate::util::{for_sep, java_comment_escape, write_indent};
use super::{Diagnostic, Template};
use std::collections::HashMap;
use std::io::Write;

/// The templates of one module, in definition order.
pub struct ModuleTemplates {
	name: Option<String>,
	templates: Vec<Template>,
	index: HashMap<String, usize>,
	diagnostics: Vec<Diagnostic>,
}

impl ModuleTemplates {
	pub fn new() -> ModuleTemplates {
		ModuleTemplates {
			name: None,
			templates: Vec::new(),
			index: HashMap::new(),
			diagnostics: Vec::new(),
		}
	}

	/// Name of the module, if the tree had a module node.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub(crate) fn set_name(&mut self, name: &str) {
		self.name = Some(name.to_string());
	}

	/// Registers a template. A later template with the same name shadows the earlier one
	/// for [`find`](Self::find); both are rendered.
	pub fn add(&mut self, template: Template) {
		self.index.insert(template.name().to_string(), self.templates.len());
		self.templates.push(template);
	}

	pub fn find(&self, name: &str) -> Option<&Template> {
		self.index.get(name).map(|&index| &self.templates[index])
	}

	pub fn templates(&self) -> &[Template] {
		&self.templates
	}

	pub fn report(&mut self, diagnostic: Diagnostic) {
		self.diagnostics.push(diagnostic);
	}

	pub fn diagnostics(&self) -> &[Diagnostic] {
		&self.diagnostics
	}

	pub fn has_errors(&self) -> bool {
		self.diagnostics.iter().any(Diagnostic::is_error)
	}

	/// Writes one static method per template. Errors are written as comments first so a
	/// dropped template is still visible in the output.
	pub fn write_java_source<F: Write>(&self, f: &mut F, indent: usize) -> Result<(), GeneratorError> {
		for diagnostic in self.diagnostics.iter().filter(|d| d.is_error()) {
			write_indent(f, indent)?;
			writeln!(f, "// {}", java_comment_escape(&diagnostic.to_string()))?;
		}

		for template in &self.templates {
			write_template(f, template, indent)?;
		}

		Ok(())
	}

	pub fn java_source(&self) -> Result<String, GeneratorError> {
		let mut buffer = Vec::new();
		self.write_java_source(&mut buffer, 0)?;
		String::from_utf8(buffer).map_err(|_| GeneratorError::from("Generated code is not valid UTF-8"))
	}
}

fn write_template<F: Write>(f: &mut F, template: &Template, indent: usize) -> Result<(), GeneratorError> {
	let type_name = template.type_name();

	write_indent(f, indent)?;
	write!(f, "public static {} {}(", type_name, template.name())?;
	for_sep(f, template.parameters(), |f| write!(f, ", "),
		|f, param| write!(f, "{} {}", param.field_type, param.name))?;
	writeln!(f, ") {{")?;

	write_indent(f, indent + 1)?;
	write!(f, "{} value = ", type_name)?;
	match template.value() {
		Some(value) => value.write(f, indent + 1)?,
		None => write!(f, "/* Unexpected null value! */ null")?,
	}
	writeln!(f, ";")?;

	for modification in template.modifications() {
		write_indent(f, indent + 1)?;
		write!(f, "value{} = ", modification.path)?;
		modification.value.write(f, indent + 1)?;
		writeln!(f, ";")?;
	}

	write_indent(f, indent + 1)?;
	writeln!(f, "return value;")?;
	write_indent(f, indent)?;
	writeln!(f, "}}")?;

	Ok(())
}
