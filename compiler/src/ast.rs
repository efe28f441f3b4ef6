//! The pre-parsed TTCN-3 tree consumed by the template back end.
//!
//! The front end owns parsing and semantic checking. It hands over a tree of [`Node`]s in
//! which every type reference has already been resolved to a name known to the
//! [`SymbolTable`](crate::model::SymbolTable).

use std::fmt;

/// Reference to a type as written in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
	/// A built-in type such as `integer` or `universal charstring`.
	Primitive(String),
	/// A user defined type.
	Reference(String),
}

impl TypeRef {
	pub fn name(&self) -> &str {
		match self {
			TypeRef::Primitive(name) | TypeRef::Reference(name) => name,
		}
	}
}

/// The class and payload of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
	Module(String),
	/// `template <Type> <name>(<params>) [modifies <base>] := <body>`
	TemplateDef,
	Type(TypeRef),
	Identifier(String),
	FormalParameterList,
	FormalParameter,
	/// The `modifies <base>` clause of a template definition.
	DerivedDef(String),
	/// A template body (`TTCN3Template`); its first child gives the shape.
	Template,
	SpecificValue,
	/// Literal token text, e.g. `42`, `"abc"`, `'0101'B`, `true`, `omit`.
	Literal(String),
	Reference(String),
	NamedTemplateList,
	NamedTemplate,
	ListOfTemplates,
	/// `?`
	AnyValue,
	/// `*`
	AnyOrOmit,
	/// Constructs the back end does not model, e.g. value ranges or complemented lists.
	Other(String),
}

/// Payload-free class of a [`NodeKind`], used to match nodes by class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeTag {
	Module,
	TemplateDef,
	Type,
	Identifier,
	FormalParameterList,
	FormalParameter,
	DerivedDef,
	Template,
	SpecificValue,
	Literal,
	Reference,
	NamedTemplateList,
	NamedTemplate,
	ListOfTemplates,
	AnyValue,
	AnyOrOmit,
	Other,
}

impl NodeKind {
	pub fn tag(&self) -> NodeTag {
		match self {
			NodeKind::Module(_) => NodeTag::Module,
			NodeKind::TemplateDef => NodeTag::TemplateDef,
			NodeKind::Type(_) => NodeTag::Type,
			NodeKind::Identifier(_) => NodeTag::Identifier,
			NodeKind::FormalParameterList => NodeTag::FormalParameterList,
			NodeKind::FormalParameter => NodeTag::FormalParameter,
			NodeKind::DerivedDef(_) => NodeTag::DerivedDef,
			NodeKind::Template => NodeTag::Template,
			NodeKind::SpecificValue => NodeTag::SpecificValue,
			NodeKind::Literal(_) => NodeTag::Literal,
			NodeKind::Reference(_) => NodeTag::Reference,
			NodeKind::NamedTemplateList => NodeTag::NamedTemplateList,
			NodeKind::NamedTemplate => NodeTag::NamedTemplate,
			NodeKind::ListOfTemplates => NodeTag::ListOfTemplates,
			NodeKind::AnyValue => NodeTag::AnyValue,
			NodeKind::AnyOrOmit => NodeTag::AnyOrOmit,
			NodeKind::Other(_) => NodeTag::Other,
		}
	}
}

impl fmt::Display for NodeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub kind: NodeKind,
	pub children: Vec<Node>,
}

impl Node {
	pub fn new(kind: NodeKind, children: Vec<Node>) -> Node {
		Node {
			kind: kind,
			children: children,
		}
	}

	pub fn leaf(kind: NodeKind) -> Node {
		Node::new(kind, Vec::new())
	}

	pub fn tag(&self) -> NodeTag {
		self.kind.tag()
	}

	pub fn is(&self, tag: NodeTag) -> bool {
		self.tag() == tag
	}

	/// The shape of a template body, i.e. the tag of its first child.
	pub fn shape(&self) -> Option<NodeTag> {
		self.children.first().map(Node::tag)
	}


	// Builders for assembling trees.

	pub fn module(name: &str, definitions: Vec<Node>) -> Node {
		Node::new(NodeKind::Module(name.to_string()), definitions)
	}

	pub fn template_def(type_ref: TypeRef, name: &str, parameters: Vec<(TypeRef, &str)>, base: Option<&str>, body: Node) -> Node {
		let mut children = vec!(Node::type_node(type_ref), Node::identifier(name));

		if !parameters.is_empty() {
			let params = parameters.into_iter()
				.map(|(t, name)| Node::new(NodeKind::FormalParameter, vec!(Node::type_node(t), Node::identifier(name))))
				.collect();
			children.push(Node::new(NodeKind::FormalParameterList, params));
		}

		if let Some(base) = base {
			children.push(Node::leaf(NodeKind::DerivedDef(base.to_string())));
		}

		children.push(body);
		Node::new(NodeKind::TemplateDef, children)
	}

	pub fn type_node(type_ref: TypeRef) -> Node {
		Node::leaf(NodeKind::Type(type_ref))
	}

	pub fn identifier(name: &str) -> Node {
		Node::leaf(NodeKind::Identifier(name.to_string()))
	}

	pub fn literal(text: &str) -> Node {
		Node::template(Node::new(NodeKind::SpecificValue, vec!(Node::leaf(NodeKind::Literal(text.to_string())))))
	}

	pub fn reference(name: &str) -> Node {
		Node::template(Node::new(NodeKind::SpecificValue, vec!(Node::leaf(NodeKind::Reference(name.to_string())))))
	}

	pub fn any_value() -> Node {
		Node::template(Node::leaf(NodeKind::AnyValue))
	}

	pub fn any_or_omit() -> Node {
		Node::template(Node::leaf(NodeKind::AnyOrOmit))
	}

	pub fn named_list(fields: Vec<(&str, Node)>) -> Node {
		let fields = fields.into_iter()
			.map(|(name, value)| Node::new(NodeKind::NamedTemplate, vec!(Node::identifier(name), value)))
			.collect();
		Node::template(Node::new(NodeKind::NamedTemplateList, fields))
	}

	pub fn list(elements: Vec<Node>) -> Node {
		Node::template(Node::new(NodeKind::ListOfTemplates, elements))
	}

	pub fn other(description: &str) -> Node {
		Node::template(Node::leaf(NodeKind::Other(description.to_string())))
	}

	fn template(shape: Node) -> Node {
		Node::new(NodeKind::Template, vec!(shape))
	}
}
