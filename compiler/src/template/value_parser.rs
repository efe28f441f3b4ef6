use crate::ast::{Node, NodeKind, NodeTag};
use crate::model::TypeId;
use super::{Context, Product, Scope, Step, TemplateError, Value, ValueKind, skip, wait_for};
use super::util;
use log::debug;

/// Chooses the scope that translates the template body `node` as a value of `type_id`.
///
/// `node` is the template node being entered; its first child gives the shape.
pub(crate) fn get_scope(ctx: &mut Context<'_>, type_id: TypeId, node: &Node) -> Box<dyn Scope> {
	let symbols = ctx.symbols;
	let type_name = util::get_type_name(symbols, type_id);
	debug!("{} template of type {}", node.shape().map_or("empty".to_string(), |shape| shape.to_string()), type_name);

	match node.shape() {
		Some(NodeTag::SpecificValue) => Box::new(SpecificValueParser::new(type_id)),

		Some(NodeTag::NamedTemplateList) if util::is_union(symbols, type_id) =>
			Box::new(UnionValueParser::new(ctx, type_id)),

		Some(NodeTag::NamedTemplateList) if util::is_structured(symbols, type_id) =>
			Box::new(NamedTemplateListParser::new(ctx, type_id)),

		Some(NodeTag::ListOfTemplates) => match util::element_type(symbols, type_id) {
			Some(element) => Box::new(RecordOfValueParser::new(type_name, element)),
			None if util::is_structured(symbols, type_id) => Box::new(TemplateListParser::new(ctx, type_id)),
			None => unknown(ctx, type_name, node),
		},

		Some(NodeTag::AnyValue) =>
			wait_for(NodeTag::Template, Product::Value(Value::new(&type_name, ValueKind::Any))),

		Some(NodeTag::AnyOrOmit) =>
			wait_for(NodeTag::Template, Product::Value(Value::new(&type_name, ValueKind::AnyOrOmit))),

		_ => unknown(ctx, type_name, node),
	}
}

fn unknown(ctx: &mut Context<'_>, type_name: String, node: &Node) -> Box<dyn Scope> {
	let description = match node.children.first() {
		Some(Node { kind: NodeKind::Other(description), .. }) => description.clone(),
		Some(shape) => shape.tag().to_string(),
		None => "empty template".to_string(),
	};

	ctx.warn(format!("unsupported template {} for type {}", description, type_name));
	Box::new(UnknownValueParser {
		type_name: type_name,
		description: description,
		level: 0,
	})
}


/// A literal or a reference.
struct SpecificValueParser {
	type_id: TypeId,
	value: Option<Value>,
}

impl SpecificValueParser {
	fn new(type_id: TypeId) -> Self {
		SpecificValueParser {
			type_id: type_id,
			value: None,
		}
	}
}

impl Scope for SpecificValueParser {
	fn process(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		match node.tag() {
			NodeTag::Literal | NodeTag::Reference => {
				self.value = Some(util::extract(ctx, self.type_id, node)?);
			},
			_ => {},
		}
		Ok(Step::Stay)
	}

	fn finish(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if !node.is(NodeTag::Template) {
			return Ok(Step::Stay);
		}

		let value = match self.value.take() {
			Some(value) => value,
			None => {
				let type_name = util::get_type_name(ctx.symbols, self.type_id);
				ctx.warn(format!("specific value of type {} has no literal", type_name));
				Value::new(&type_name, ValueKind::Unknown("empty specific value".to_string()))
			},
		};

		Ok(Step::Ascend(Some(Product::Value(value))))
	}

	fn name(&self) -> &'static str {
		"SpecificValueParser"
	}
}


/// `{ a := ..., b := ... }` for a record or set. Fields keep their declaration order.
struct NamedTemplateListParser {
	type_name: String,
	fields: Vec<(String, TypeId, Option<Value>)>,
	pending: Option<usize>,
}

impl NamedTemplateListParser {
	fn new(ctx: &Context<'_>, type_id: TypeId) -> Self {
		NamedTemplateListParser {
			type_name: util::get_type_name(ctx.symbols, type_id),
			fields: util::fields(ctx.symbols, type_id).iter()
				.map(|field| (field.name.clone(), field.field_type, None))
				.collect(),
			pending: None,
		}
	}
}

impl Scope for NamedTemplateListParser {
	fn process(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		match &node.kind {
			NodeKind::Identifier(name) => {
				let index = self.fields.iter()
					.position(|(field, _, _)| field == name)
					.ok_or_else(|| TemplateError::UnknownField(self.type_name.clone(), name.clone()))?;
				self.pending = Some(index);
				Ok(Step::Stay)
			},

			NodeKind::Template => match self.pending {
				Some(index) => Ok(Step::Descend(get_scope(ctx, self.fields[index].1, node))),
				None => {
					ctx.warn(format!("field template of {} without a field name", self.type_name));
					Ok(Step::Descend(skip(NodeTag::Template)))
				},
			},

			_ => Ok(Step::Stay),
		}
	}

	fn finish(&mut self, node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if !node.is(NodeTag::Template) {
			return Ok(Step::Stay);
		}

		let fields = self.fields.drain(..)
			.map(|(name, _, value)| (name, value))
			.collect();

		Ok(Step::Ascend(Some(Product::Value(Value::new(&self.type_name, ValueKind::NamedList(fields))))))
	}

	fn accept(&mut self, product: Product, ctx: &mut Context<'_>) -> Result<(), TemplateError> {
		match (product, self.pending.take()) {
			(Product::Value(value), Some(index)) => {
				let (name, _, slot) = &mut self.fields[index];
				if slot.is_some() {
					ctx.warn(format!("field {} of {} is given more than once", name, self.type_name));
				}
				*slot = Some(value);
				Ok(())
			},
			(product, _) => Err(TemplateError::UnexpectedProduct(product.describe())),
		}
	}

	fn name(&self) -> &'static str {
		"NamedTemplateListParser"
	}
}


/// `{ alt := ... }` for a union. Exactly one alternative may be chosen.
struct UnionValueParser {
	type_name: String,
	alternatives: Vec<(String, TypeId)>,
	chosen: Option<String>,
	value: Option<Value>,
}

impl UnionValueParser {
	fn new(ctx: &Context<'_>, type_id: TypeId) -> Self {
		UnionValueParser {
			type_name: util::get_type_name(ctx.symbols, type_id),
			alternatives: util::fields(ctx.symbols, type_id).iter()
				.map(|field| (field.name.clone(), field.field_type))
				.collect(),
			chosen: None,
			value: None,
		}
	}

	fn alternative_type(&self, name: &str) -> Option<TypeId> {
		self.alternatives.iter()
			.find(|(alternative, _)| alternative == name)
			.map(|(_, type_id)| *type_id)
	}
}

impl Scope for UnionValueParser {
	fn process(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		match &node.kind {
			NodeKind::Identifier(name) => {
				if let Some(first) = &self.chosen {
					return Err(TemplateError::MultipleUnionAlternatives(self.type_name.clone(), first.clone(), name.clone()));
				}

				if self.alternative_type(name).is_none() {
					return Err(TemplateError::UnknownAlternative(self.type_name.clone(), name.clone()));
				}

				self.chosen = Some(name.clone());
				Ok(Step::Stay)
			},

			NodeKind::Template => {
				let type_id = self.chosen.as_deref()
					.and_then(|name| self.alternative_type(name))
					.ok_or_else(|| TemplateError::MissingUnionAlternative(self.type_name.clone()))?;
				Ok(Step::Descend(get_scope(ctx, type_id, node)))
			},

			_ => Ok(Step::Stay),
		}
	}

	fn finish(&mut self, node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if !node.is(NodeTag::Template) {
			return Ok(Step::Stay);
		}

		match (self.chosen.take(), self.value.take()) {
			(Some(alternative), Some(value)) => {
				let union = ValueKind::Union {
					alternative: alternative,
					value: Box::new(value),
				};
				Ok(Step::Ascend(Some(Product::Value(Value::new(&self.type_name, union)))))
			},
			_ => Err(TemplateError::MissingUnionAlternative(self.type_name.clone())),
		}
	}

	fn accept(&mut self, product: Product, _ctx: &mut Context<'_>) -> Result<(), TemplateError> {
		match product {
			Product::Value(value) => {
				self.value = Some(value);
				Ok(())
			},
			product => Err(TemplateError::UnexpectedProduct(product.describe())),
		}
	}

	fn name(&self) -> &'static str {
		"UnionValueParser"
	}
}


/// `{ e0, e1, ... }` for a record of or set of.
struct RecordOfValueParser {
	type_name: String,
	element: TypeId,
	elements: Vec<Value>,
	seen_list: bool,
}

impl RecordOfValueParser {
	fn new(type_name: String, element: TypeId) -> Self {
		RecordOfValueParser {
			type_name: type_name,
			element: element,
			elements: Vec::new(),
			seen_list: false,
		}
	}
}

impl Scope for RecordOfValueParser {
	fn process(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		match node.tag() {
			NodeTag::ListOfTemplates if self.seen_list => {
				debug!("skipping repeated element list of {}", self.type_name);
				Ok(Step::Descend(skip(NodeTag::ListOfTemplates)))
			},
			NodeTag::ListOfTemplates => {
				self.seen_list = true;
				Ok(Step::Stay)
			},
			NodeTag::Template => Ok(Step::Descend(get_scope(ctx, self.element, node))),
			_ => Ok(Step::Stay),
		}
	}

	fn finish(&mut self, node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if !node.is(NodeTag::Template) {
			return Ok(Step::Stay);
		}

		let elements = std::mem::take(&mut self.elements);
		Ok(Step::Ascend(Some(Product::Value(Value::new(&self.type_name, ValueKind::RecordOf(elements))))))
	}

	fn accept(&mut self, product: Product, _ctx: &mut Context<'_>) -> Result<(), TemplateError> {
		match product {
			Product::Value(value) => {
				self.elements.push(value);
				Ok(())
			},
			product => Err(TemplateError::UnexpectedProduct(product.describe())),
		}
	}

	fn name(&self) -> &'static str {
		"RecordOfValueParser"
	}
}


/// `{ v0, v1, ... }` for a record or set: value list notation, one element per field.
struct TemplateListParser {
	type_name: String,
	slots: Vec<(TypeId, Option<Value>)>,
	next: usize,
	current: Option<usize>,
	seen_list: bool,
}

impl TemplateListParser {
	fn new(ctx: &Context<'_>, type_id: TypeId) -> Self {
		TemplateListParser {
			type_name: util::get_type_name(ctx.symbols, type_id),
			slots: util::fields(ctx.symbols, type_id).iter()
				.map(|field| (field.field_type, None))
				.collect(),
			next: 0,
			current: None,
			seen_list: false,
		}
	}
}

impl Scope for TemplateListParser {
	fn process(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		match node.tag() {
			NodeTag::ListOfTemplates if self.seen_list => {
				debug!("skipping repeated element list of {}", self.type_name);
				Ok(Step::Descend(skip(NodeTag::ListOfTemplates)))
			},
			NodeTag::ListOfTemplates => {
				self.seen_list = true;
				Ok(Step::Stay)
			},
			NodeTag::Template => {
				let index = self.next;
				self.next += 1;

				match self.slots.get(index) {
					Some((type_id, _)) => {
						let type_id = *type_id;
						self.current = Some(index);
						Ok(Step::Descend(get_scope(ctx, type_id, node)))
					},
					None => {
						ctx.warn(format!("element {} exceeds the {} fields of {}", index, self.slots.len(), self.type_name));
						Ok(Step::Descend(skip(NodeTag::Template)))
					},
				}
			},
			_ => Ok(Step::Stay),
		}
	}

	fn finish(&mut self, node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if !node.is(NodeTag::Template) {
			return Ok(Step::Stay);
		}

		let slots = self.slots.drain(..).map(|(_, value)| value).collect();
		Ok(Step::Ascend(Some(Product::Value(Value::new(&self.type_name, ValueKind::List(slots))))))
	}

	fn accept(&mut self, product: Product, _ctx: &mut Context<'_>) -> Result<(), TemplateError> {
		match (product, self.current.take()) {
			(Product::Value(value), Some(index)) => {
				self.slots[index].1 = Some(value);
				Ok(())
			},
			(product, _) => Err(TemplateError::UnexpectedProduct(product.describe())),
		}
	}

	fn name(&self) -> &'static str {
		"TemplateListParser"
	}
}


/// Consumes a construct that is not translated and yields a placeholder.
struct UnknownValueParser {
	type_name: String,
	description: String,
	level: usize,
}

impl Scope for UnknownValueParser {
	fn process(&mut self, node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if node.is(NodeTag::Template) {
			self.level += 1;
		}
		Ok(Step::Stay)
	}

	fn finish(&mut self, node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if !node.is(NodeTag::Template) {
			return Ok(Step::Stay);
		}

		if self.level > 0 {
			self.level -= 1;
			return Ok(Step::Stay);
		}

		let description = std::mem::take(&mut self.description);
		Ok(Step::Ascend(Some(Product::Value(Value::new(&self.type_name, ValueKind::Unknown(description))))))
	}

	fn name(&self) -> &'static str {
		"UnknownValueParser"
	}
}
