use crate::ast::TypeRef;
use std::collections::{HashMap, HashSet};
use std::fmt;
use lazy_static::lazy_static;

lazy_static! {
	/// Built-in TTCN-3 types and the runtime classes they are generated as.
	pub static ref PRIMITIVE_TYPES: HashMap<&'static str, &'static str> = {
		let mut m = HashMap::new();
		m.insert("boolean", "BOOLEAN");
		m.insert("integer", "INTEGER");
		m.insert("float", "FLOAT");
		m.insert("bitstring", "BITSTRING");
		m.insert("hexstring", "HEXSTRING");
		m.insert("octetstring", "OCTETSTRING");
		m.insert("charstring", "CHARSTRING");
		m.insert("universal charstring", "UNIVERSAL_CHARSTRING");
		m.insert("verdicttype", "VERDICTTYPE");
		m
	};
}

/// A dot-separated package.
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub struct PackageName {
	pub package: Vec<String>,
}

impl PackageName {
	pub fn new() -> PackageName {
		PackageName {
			package: Vec::new(),
		}
	}

	pub fn from_str(pkg: &str) -> PackageName {
		PackageName {
			package:
				if pkg.is_empty() {
					Vec::new()
				}
				else {
					pkg.split(".").map(str::to_string).collect()
				},
		}
	}

	pub fn from_parts(parts: &[&str]) -> PackageName {
		PackageName {
			package: parts.iter().map(|x| String::from(*x)).collect::<Vec<_>>(),
		}
	}
}

impl fmt::Display for PackageName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.package.join("."))
	}
}

/// Interned handle of a type in a [`SymbolTable`].
///
/// Ids are only meaningful for the table that issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeId(usize);

/// A field of a record or set, or an alternative of a union.
#[derive(Clone, Debug)]
pub struct FieldInfo {
	pub name: String,
	pub field_type: TypeId,
}

/// The resolved structure of a type.
#[derive(Clone, Debug)]
pub enum TypeDefinition {
	Primitive,
	Record(Vec<FieldInfo>),
	Set(Vec<FieldInfo>),
	Union(Vec<FieldInfo>),
	RecordOf(TypeId),
	SetOf(TypeId),
	Enumerated(Vec<String>),
}

/// A named entry of the symbol table.
#[derive(Clone, Debug)]
pub struct TypeEntry {
	pub name: String,
	pub java_name: String,
	pub definition: TypeDefinition,
}

/// A type declaration before names are resolved.
#[derive(Clone, Debug)]
pub enum TypeDecl {
	Record(Vec<(String, TypeRef)>),
	Set(Vec<(String, TypeRef)>),
	Union(Vec<(String, TypeRef)>),
	RecordOf(TypeRef),
	SetOf(TypeRef),
	Enumerated(Vec<String>),
}

/// Collects the declarations of a module before they are resolved by
/// [`resolve_symbols`](crate::type_check::resolve_symbols).
pub struct SymbolTableBuilder {
	pub(crate) types: Vec<(String, TypeDecl)>,
	pub(crate) constants: HashSet<String>,
	names: HashSet<String>,
}

impl SymbolTableBuilder {
	pub fn new() -> Self {
		SymbolTableBuilder {
			types: Vec::new(),
			constants: HashSet::new(),
			names: HashSet::new(),
		}
	}

	/// Adds a type declaration.
	pub fn add_type(&mut self, name: &str, decl: TypeDecl) -> Result<(), String> {
		if self.names.insert(name.to_string()) {
			self.types.push((name.to_string(), decl));
			Ok(())
		}
		else {
			Err(name.to_string())
		}
	}

	/// Adds a module constant. Constants are generated as methods of the `Constants` class.
	pub fn add_constant(&mut self, name: &str) -> Result<(), String> {
		if self.names.insert(name.to_string()) {
			self.constants.insert(name.to_string());
			Ok(())
		}
		else {
			Err(name.to_string())
		}
	}
}

/// Read-only view of the types and constants of a module.
pub struct SymbolTable {
	entries: Vec<TypeEntry>,
	primitives: HashMap<String, TypeId>,
	names: HashMap<String, TypeId>,
	constants: HashSet<String>,
}

impl SymbolTable {

	/// Creates a table holding only the built-in types.
	pub(crate) fn with_primitives() -> Self {
		let mut table = SymbolTable {
			entries: Vec::new(),
			primitives: HashMap::new(),
			names: HashMap::new(),
			constants: HashSet::new(),
		};

		for (name, java_name) in PRIMITIVE_TYPES.iter() {
			let id = table.push(name, java_name, TypeDefinition::Primitive);
			table.primitives.insert(name.to_string(), id);
		}

		table
	}

	fn push(&mut self, name: &str, java_name: &str, definition: TypeDefinition) -> TypeId {
		let id = TypeId(self.entries.len());
		self.entries.push(TypeEntry {
			name: name.to_string(),
			java_name: java_name.to_string(),
			definition: definition,
		});
		id
	}

	/// Reserves an id for a named type. The definition is filled in by `define`.
	pub(crate) fn declare(&mut self, name: &str) -> TypeId {
		let id = self.push(name, name, TypeDefinition::Primitive);
		self.names.insert(name.to_string(), id);
		id
	}

	pub(crate) fn define(&mut self, id: TypeId, definition: TypeDefinition) {
		self.entries[id.0].definition = definition;
	}

	pub(crate) fn set_constants(&mut self, constants: HashSet<String>) {
		self.constants = constants;
	}

	/// Resolves a type reference.
	pub fn lookup(&self, t: &TypeRef) -> Option<TypeId> {
		match t {
			TypeRef::Primitive(name) => self.primitives.get(name).copied(),
			TypeRef::Reference(name) => self.names.get(name).copied(),
		}
	}

	/// Finds a named type.
	pub fn get_type(&self, name: &str) -> Option<TypeId> {
		self.names.get(name).copied()
	}

	pub fn entry(&self, id: TypeId) -> &TypeEntry {
		&self.entries[id.0]
	}

	pub fn definition(&self, id: TypeId) -> &TypeDefinition {
		&self.entry(id).definition
	}

	/// The name of the type in the generated code.
	pub fn java_name(&self, id: TypeId) -> &str {
		&self.entry(id).java_name
	}

	pub fn is_constant(&self, name: &str) -> bool {
		self.constants.contains(name)
	}

	/// Iterates over the named (non built-in) types.
	pub fn types<'a>(&'a self) -> impl Iterator<Item = (TypeId, &'a TypeEntry)> + 'a {
		self.entries.iter()
			.enumerate()
			.map(|(index, entry)| (TypeId(index), entry))
			.filter(move |(id, entry)| self.names.get(&entry.name) == Some(id))
	}
}
