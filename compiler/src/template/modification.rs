use crate::ast::{Node, NodeKind, NodeTag};
use crate::model::TypeId;
use super::{Context, DotPath, Modification, Product, Scope, Step, TemplateError, skip};
use super::{util, value_parser};

/// Chooses the scope for the body of a modified template, or of a field within it.
///
/// Named lists of records and sets are split into one modification per field. Anything
/// else is translated as a value, which the parent records as a modification at `path`.
pub(crate) fn get_scope(ctx: &mut Context<'_>, type_id: TypeId, path: DotPath, node: &Node) -> Box<dyn Scope> {
	if node.shape() == Some(NodeTag::NamedTemplateList) && util::is_structured(ctx.symbols, type_id) {
		Box::new(ModificationListParser::new(ctx, type_id, path))
	}
	else {
		value_parser::get_scope(ctx, type_id, node)
	}
}

struct ModificationListParser {
	type_name: String,
	path: DotPath,
	fields: Vec<(String, TypeId)>,
	pending: Option<String>,
	modifications: Vec<Modification>,
}

impl ModificationListParser {
	fn new(ctx: &Context<'_>, type_id: TypeId, path: DotPath) -> Self {
		ModificationListParser {
			type_name: util::get_type_name(ctx.symbols, type_id),
			path: path,
			fields: util::fields(ctx.symbols, type_id).iter()
				.map(|field| (field.name.clone(), field.field_type))
				.collect(),
			pending: None,
			modifications: Vec::new(),
		}
	}
}

impl Scope for ModificationListParser {
	fn process(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		match &node.kind {
			NodeKind::Identifier(name) => {
				if !self.fields.iter().any(|(field, _)| field == name) {
					return Err(TemplateError::UnknownField(self.type_name.clone(), name.clone()));
				}
				self.pending = Some(name.clone());
				Ok(Step::Stay)
			},

			NodeKind::Template => {
				let field = self.pending.as_deref()
					.and_then(|name| self.fields.iter().find(|(field, _)| field == name));

				match field {
					Some((name, type_id)) => {
						let path = self.path.child(name);
						let type_id = *type_id;
						Ok(Step::Descend(get_scope(ctx, type_id, path, node)))
					},
					None => {
						ctx.warn(format!("field template of {} without a field name", self.type_name));
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

		let modifications = std::mem::take(&mut self.modifications);
		Ok(Step::Ascend(Some(Product::Modifications(modifications))))
	}

	fn accept(&mut self, product: Product, _ctx: &mut Context<'_>) -> Result<(), TemplateError> {
		match (product, self.pending.take()) {
			(Product::Value(value), Some(field)) => {
				self.modifications.push(Modification::new(self.path.child(&field), value));
				Ok(())
			},
			(Product::Modifications(modifications), _) => {
				self.modifications.extend(modifications);
				Ok(())
			},
			(product, _) => Err(TemplateError::UnexpectedProduct(product.describe())),
		}
	}

	fn name(&self) -> &'static str {
		"ModificationListParser"
	}
}
