use crate::ast::{Node, NodeTag};
use super::{Context, Product, TemplateError};

/// What the driver does after a scope has seen a node.
pub(crate) enum Step {
	/// Keep the current scope.
	Stay,
	/// Make a new scope current. It does not see the node that created it.
	Descend(Box<dyn Scope>),
	/// Return to the parent scope, handing it the product, if any.
	Ascend(Option<Product>),
}

/// One state of the push-down automaton that consumes the tree.
pub(crate) trait Scope {
	/// Called when entering `node`.
	fn process(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError>;

	/// Called when leaving `node`.
	fn finish(&mut self, node: &Node, ctx: &mut Context<'_>) -> Result<Step, TemplateError>;

	/// Receives the product of a child scope that ascended.
	fn accept(&mut self, product: Product, _ctx: &mut Context<'_>) -> Result<(), TemplateError> {
		Err(TemplateError::UnexpectedProduct(product.describe()))
	}

	fn name(&self) -> &'static str;
}

/// Ignores everything up to and including the close of the current `tag` node.
pub(crate) struct Skip {
	tag: NodeTag,
	level: usize,
}

pub(crate) fn skip(tag: NodeTag) -> Box<dyn Scope> {
	Box::new(Skip {
		tag: tag,
		level: 0,
	})
}

impl Scope for Skip {
	fn process(&mut self, node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if node.is(self.tag) {
			self.level += 1;
		}
		Ok(Step::Stay)
	}

	fn finish(&mut self, node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if node.is(self.tag) {
			if self.level == 0 {
				return Ok(Step::Ascend(None));
			}
			self.level -= 1;
		}
		Ok(Step::Stay)
	}

	fn name(&self) -> &'static str {
		"Skip"
	}
}

/// Deferred commit: ignores everything until the first close of a `tag` node, then
/// ascends with the stored product.
pub(crate) struct WaitFor {
	tag: NodeTag,
	commit: Option<Product>,
}

pub(crate) fn wait_for(tag: NodeTag, commit: Product) -> Box<dyn Scope> {
	Box::new(WaitFor {
		tag: tag,
		commit: Some(commit),
	})
}

impl Scope for WaitFor {
	fn process(&mut self, _node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		Ok(Step::Stay)
	}

	fn finish(&mut self, node: &Node, _ctx: &mut Context<'_>) -> Result<Step, TemplateError> {
		if node.is(self.tag) {
			Ok(Step::Ascend(self.commit.take()))
		}
		else {
			Ok(Step::Stay)
		}
	}

	fn name(&self) -> &'static str {
		"WaitFor"
	}
}
