use super::{TemplateError, Value};
use std::fmt;

/// A typed name, such as a formal parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
	pub field_type: String,
	pub name: String,
}

/// A chain of field accesses. Displays as `.a.b`; the root path displays as nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DotPath {
	fields: Vec<String>,
}

impl DotPath {
	pub fn root() -> DotPath {
		DotPath::default()
	}

	pub fn child(&self, field: &str) -> DotPath {
		let mut fields = self.fields.clone();
		fields.push(field.to_string());
		DotPath {
			fields: fields,
		}
	}
}

impl fmt::Display for DotPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for field in &self.fields {
			write!(f, ".{}", field)?;
		}
		Ok(())
	}
}

/// Overrides the part of a base template's value found at `path`.
#[derive(Clone, Debug, PartialEq)]
pub struct Modification {
	pub path: DotPath,
	pub value: Value,
}

impl Modification {
	pub fn new(path: DotPath, value: Value) -> Modification {
		Modification {
			path: path,
			value: value,
		}
	}
}

/// A translated template definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
	name: String,
	type_name: String,
	value: Option<Value>,
	parameters: Vec<Field>,
	modifications: Vec<Modification>,
}

impl Template {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// `None` if the translation never produced a value.
	pub fn value(&self) -> Option<&Value> {
		self.value.as_ref()
	}

	pub fn parameters(&self) -> &[Field] {
		&self.parameters
	}

	pub fn modifications(&self) -> &[Modification] {
		&self.modifications
	}
}

/// Collects the parts of a template while its definition is traversed.
#[derive(Default)]
pub struct TemplateBuilder {
	pub name: Option<String>,
	pub type_name: Option<String>,
	pub value: Option<Value>,
	pub parameters: Vec<Field>,
	pub modifications: Vec<Modification>,
}

impl TemplateBuilder {
	pub fn new() -> TemplateBuilder {
		TemplateBuilder::default()
	}

	pub fn build(self) -> Result<Template, TemplateError> {
		Ok(Template {
			name: self.name.ok_or(TemplateError::MissingName)?,
			type_name: self.type_name.ok_or(TemplateError::MissingType)?,
			value: self.value,
			parameters: self.parameters,
			modifications: self.modifications,
		})
	}
}
