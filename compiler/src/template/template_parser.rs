use crate::ast::{Node, NodeKind, NodeTag};
use crate::model::TypeId;
use super::{Context, DotPath, Field, Modification, Product, Scope, Step, TemplateBuilder, TemplateError, Value, ValueKind, skip};
use super::{modification, util, value_parser};
use log::debug;

/// The bottom of the scope stack. Starts a [`TemplateParser`] for every template definition
/// and registers the templates it yields.
pub(crate) struct ModuleScope;

impl Scope for ModuleScope {
	fn process(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		match &node.kind {
			NodeKind::Module(name) => {
				ctx.templates.set_name(name);
				Ok(Step::Stay)
			},
			NodeKind::TemplateDef => {
				ctx.begin_template();
				Ok(Step::Descend(Box::new(TemplateParser::new())))
			},
			_ => Ok(Step::Stay),
		}
	}

	fn finish(&mut self, _node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		Ok(Step::Stay)
	}

	fn accept(&mut self, product: Product, ctx: &mut Context<'_>) -> Result<(), TemplateError> {
		match product {
			Product::Template(template) => {
				debug!("registered template {}", template.name());
				ctx.templates.add(template);
				Ok(())
			},
			product => Err(TemplateError::UnexpectedProduct(product.describe())),
		}
	}

	fn name(&self) -> &'static str {
		"ModuleScope"
	}
}


/// One template definition: type, name, formal parameters, base template and body.
struct TemplateParser {
	builder: TemplateBuilder,
	type_id: Option<TypeId>,
	modifying: bool,
}

impl TemplateParser {
	fn new() -> Self {
		TemplateParser {
			builder: TemplateBuilder::new(),
			type_id: None,
			modifying: false,
		}
	}
}

impl Scope for TemplateParser {
	fn process(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		match &node.kind {
			NodeKind::Type(type_ref) => {
				let type_id = util::get_type(ctx.symbols, type_ref)?;
				self.type_id = Some(type_id);
				self.builder.type_name = Some(util::get_type_name(ctx.symbols, type_id));
				Ok(Step::Descend(skip(NodeTag::Type)))
			},

			NodeKind::Identifier(name) => {
				self.builder.name = Some(name.clone());
				ctx.current = Some(name.clone());
				Ok(Step::Stay)
			},

			NodeKind::FormalParameterList => Ok(Step::Descend(Box::new(FormalParameterParser::new()))),

			NodeKind::DerivedDef(base) => {
				let type_name = self.builder.type_name.as_deref().ok_or(TemplateError::MissingType)?;
				if ctx.templates.find(base).is_none() {
					return Err(TemplateError::UnknownBaseTemplate(base.clone()));
				}

				self.builder.value = Some(Value::new(type_name, ValueKind::BaseReference(base.clone())));
				self.modifying = true;
				Ok(Step::Descend(skip(NodeTag::DerivedDef)))
			},

			NodeKind::Template => {
				let type_id = self.type_id.ok_or(TemplateError::MissingType)?;
				if self.modifying {
					Ok(Step::Descend(modification::get_scope(ctx, type_id, DotPath::root(), node)))
				}
				else {
					Ok(Step::Descend(value_parser::get_scope(ctx, type_id, node)))
				}
			},

			_ => Ok(Step::Stay),
		}
	}

	fn finish(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if !node.is(NodeTag::TemplateDef) {
			return Ok(Step::Stay);
		}

		let template = std::mem::take(&mut self.builder).build()?;
		ctx.parameters.clear();
		Ok(Step::Ascend(Some(Product::Template(template))))
	}

	fn accept(&mut self, product: Product, ctx: &mut Context<'_>) -> Result<(), TemplateError> {
		match product {
			Product::Parameters(parameters) => {
				ctx.parameters = parameters.clone();
				self.builder.parameters = parameters;
			},
			Product::Value(value) if self.modifying =>
				self.builder.modifications.push(Modification::new(DotPath::root(), value)),
			Product::Value(value) => self.builder.value = Some(value),
			Product::Modifications(modifications) => self.builder.modifications.extend(modifications),
			product => return Err(TemplateError::UnexpectedProduct(product.describe())),
		}

		Ok(())
	}

	fn name(&self) -> &'static str {
		"TemplateParser"
	}
}


/// `(Type a, Type b)`
struct FormalParameterParser {
	pending_type: Option<String>,
	parameters: Vec<Field>,
}

impl FormalParameterParser {
	fn new() -> Self {
		FormalParameterParser {
			pending_type: None,
			parameters: Vec::new(),
		}
	}
}

impl Scope for FormalParameterParser {
	fn process(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		match &node.kind {
			NodeKind::Type(type_ref) => {
				let type_id = util::get_type(ctx.symbols, type_ref)?;
				self.pending_type = Some(util::get_type_name(ctx.symbols, type_id));
				Ok(Step::Descend(skip(NodeTag::Type)))
			},

			NodeKind::Identifier(name) => {
				let field_type = self.pending_type.take().ok_or(TemplateError::MissingType)?;
				self.parameters.push(Field {
					field_type: field_type,
					name: name.clone(),
				});
				Ok(Step::Stay)
			},

			_ => Ok(Step::Stay),
		}
	}

	fn finish(&mut self, node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if node.is(NodeTag::FormalParameterList) {
			Ok(Step::Ascend(Some(Product::Parameters(std::mem::take(&mut self.parameters)))))
		}
		else {
			Ok(Step::Stay)
		}
	}

	fn name(&self) -> &'static str {
		"FormalParameterParser"
	}
}
