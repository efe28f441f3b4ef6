use crate::lang::GeneratorError;
use crate::util::{for_sep, java_comment_escape, write_indent};
use std::io::Write;

/// A generated expression together with the type it constructs.
#[derive(Clone, Debug, PartialEq)]
pub struct Value {
	type_name: String,
	kind: ValueKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
	/// `?`
	Any,
	/// `*`
	AnyOrOmit,
	Omit,
	Boolean(bool),
	/// Static field of the runtime class, e.g. `VERDICTTYPE.PASS` or `FLOAT.NOT_A_NUMBER`.
	Keyword(String),
	/// Constructor argument of a literal, already escaped for a Java string.
	Literal(String),
	/// Reference to a formal parameter of the enclosing template.
	Parameter(String),
	/// Reference to a module constant.
	Constant(String),
	EnumField(String),
	/// Record or set, in declaration order of the fields.
	NamedList(Vec<(String, Option<Value>)>),
	/// Record or set in value list notation. One slot per field.
	List(Vec<Option<Value>>),
	RecordOf(Vec<Value>),
	Union {
		alternative: String,
		value: Box<Value>,
	},
	/// Result of calling the generated method of a base template.
	BaseReference(String),
	/// A construct that is not supported. Rendered as `null` with a comment.
	Unknown(String),
}

enum Arg<'a> {
	Value(&'a Value),
	Unbound(String),
}

impl Value {
	pub fn new(type_name: &str, kind: ValueKind) -> Value {
		Value {
			type_name: type_name.to_string(),
			kind: kind,
		}
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn kind(&self) -> &ValueKind {
		&self.kind
	}

	/// The name of the class a union alternative is wrapped in.
	pub fn union_wrapper(alternative: &str, union_type: &str) -> String {
		format!("SC_{}_{}", alternative, union_type)
	}

	/// Writes the expression. Continuation lines of nested constructors are indented
	/// relative to `indent`, the indentation of the line the expression starts on.
	pub fn write<F: Write>(&self, f: &mut F, indent: usize) -> Result<(), GeneratorError> {
		let type_name = &self.type_name;
		match &self.kind {
			ValueKind::Any => write!(f, "{}.ANY", type_name)?,
			ValueKind::AnyOrOmit => write!(f, "{}.ANY_OR_OMIT", type_name)?,
			ValueKind::Omit => write!(f, "{}.OMIT", type_name)?,
			ValueKind::Boolean(true) => write!(f, "{}.TRUE", type_name)?,
			ValueKind::Boolean(false) => write!(f, "{}.FALSE", type_name)?,
			ValueKind::Keyword(field) => write!(f, "{}.{}", type_name, field)?,
			ValueKind::Literal(text) => write!(f, "new {}(\"{}\")", type_name, text)?,
			ValueKind::Parameter(name) => write!(f, "{}", name)?,
			ValueKind::Constant(name) => write!(f, "Constants.{}()", name)?,
			ValueKind::EnumField(name) => write!(f, "{}.{}", type_name, name)?,

			ValueKind::NamedList(fields) => {
				let args = fields.iter()
					.map(|(name, value)| match value {
						Some(value) => Arg::Value(value),
						None => Arg::Unbound(format!("field {}", name)),
					})
					.collect();
				write_constructor(f, type_name, args, indent)?
			},

			ValueKind::List(slots) => {
				let args = slots.iter()
					.enumerate()
					.map(|(index, value)| match value {
						Some(value) => Arg::Value(value),
						None => Arg::Unbound(format!("element {}", index)),
					})
					.collect();
				write_constructor(f, type_name, args, indent)?
			},

			ValueKind::RecordOf(elements) =>
				write_constructor(f, type_name, elements.iter().map(Arg::Value).collect(), indent)?,

			ValueKind::Union { alternative, value } => {
				write!(f, "new {}(", Value::union_wrapper(alternative, type_name))?;
				value.write(f, indent)?;
				write!(f, ")")?;
			},

			ValueKind::BaseReference(base) => write!(f, "({}) {}()", type_name, base)?,
			ValueKind::Unknown(description) => write!(f, "null /* unsupported template: {} */", java_comment_escape(description))?,
		}

		Ok(())
	}

	/// Renders the expression into a string.
	pub fn to_source(&self, indent: usize) -> Result<String, GeneratorError> {
		let mut buffer = Vec::new();
		self.write(&mut buffer, indent)?;
		String::from_utf8(buffer).map_err(|_| GeneratorError::from("Generated code is not valid UTF-8"))
	}
}

fn write_constructor<F: Write>(f: &mut F, type_name: &str, args: Vec<Arg>, indent: usize) -> Result<(), GeneratorError> {
	write!(f, "new {}(", type_name)?;
	if args.is_empty() {
		write!(f, ")")?;
		return Ok(());
	}

	writeln!(f)?;
	for_sep(f, args, |f| writeln!(f, ","), |f, arg| -> Result<(), GeneratorError> {
		write_indent(f, indent + 1)?;
		match arg {
			Arg::Value(value) => value.write(f, indent + 1),
			Arg::Unbound(what) => {
				write!(f, "null /* unbound {} */", what)?;
				Ok(())
			},
		}
	})?;
	writeln!(f)?;
	write_indent(f, indent)?;
	write!(f, ")")?;

	Ok(())
}
