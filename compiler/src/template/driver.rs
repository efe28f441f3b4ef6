use crate::ast::{Node, NodeTag};
use crate::model::SymbolTable;
use super::template_parser::ModuleScope;
use super::{Context, ModuleTemplates, Product, Scope, Step, TemplateError, skip};
use log::{debug, warn};

/// Translates the template definitions of one module.
///
/// The caller reports every node on entry ([`process`](Self::process)) and on exit
/// ([`finish`](Self::finish)), in depth-first order. Callers holding the whole tree can
/// use [`walk`](Self::walk) instead.
pub struct TemplateCompiler<'s> {
	context: Context<'s>,
	root: ModuleScope,
	stack: Vec<Box<dyn Scope>>,
}

impl <'s> TemplateCompiler<'s> {
	pub fn new(symbols: &'s SymbolTable) -> Self {
		TemplateCompiler {
			context: Context::new(symbols),
			root: ModuleScope,
			stack: Vec::new(),
		}
	}

	pub fn process(&mut self, node: &Node) {
		let step = match self.stack.last_mut() {
			Some(scope) => scope.process(node, &mut self.context),
			None => self.root.process(node, &mut self.context),
		};

		self.apply(step, node, false);
	}

	pub fn finish(&mut self, node: &Node) {
		let step = match self.stack.last_mut() {
			Some(scope) => scope.finish(node, &mut self.context),
			None => self.root.finish(node, &mut self.context),
		};

		self.apply(step, node, true);
	}

	/// Reports `node` and all of its descendants.
	pub fn walk(&mut self, node: &Node) {
		self.process(node);
		for child in &node.children {
			self.walk(child);
		}
		self.finish(node);
	}

	/// The translated templates along with the diagnostics of the module.
	pub fn into_templates(self) -> ModuleTemplates {
		if !self.stack.is_empty() {
			let scopes: Vec<&str> = self.stack.iter().map(|scope| scope.name()).collect();
			warn!("traversal ended inside {}", scopes.join(" > "));
		}

		self.context.templates
	}

	fn apply(&mut self, step: Result<Step, TemplateError>, node: &Node, leaving: bool) {
		let result = step.and_then(|step| match step {
			Step::Stay => Ok(()),
			Step::Descend(scope) => {
				debug!("enter {} at {}", scope.name(), node.tag());
				self.stack.push(scope);
				Ok(())
			},
			Step::Ascend(product) => self.ascend(product),
		});

		if let Err(err) = result {
			self.recover(err, node, leaving);
		}
	}

	fn ascend(&mut self, product: Option<Product>) -> Result<(), TemplateError> {
		match self.stack.pop() {
			Some(scope) => debug!("leave {}", scope.name()),
			None => return Ok(()),
		}

		let product = match product {
			Some(product) => product,
			None => return Ok(()),
		};

		match self.stack.last_mut() {
			Some(parent) => parent.accept(product, &mut self.context),
			None => self.root.accept(product, &mut self.context),
		}
	}

	/// Drops the template definition being translated and skips whatever is left of it.
	fn recover(&mut self, err: TemplateError, node: &Node, leaving: bool) {
		self.context.report_error(err);
		self.context.begin_template();

		let inside_definition = !self.stack.is_empty();
		self.stack.clear();

		if inside_definition && !(leaving && node.is(NodeTag::TemplateDef)) {
			self.stack.push(skip(NodeTag::TemplateDef));
		}
	}
}

/// Translates every template definition found in `module`.
pub fn compile_module(symbols: &SymbolTable, module: &Node) -> ModuleTemplates {
	let mut compiler = TemplateCompiler::new(symbols);
	compiler.walk(module);
	compiler.into_templates()
}
