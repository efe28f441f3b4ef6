use crate::ast::{Node, NodeKind, NodeTag, TypeRef};
use crate::model::{SymbolTable, SymbolTableBuilder, TypeDecl};
use crate::type_check::resolve_symbols;
use super::*;

fn named(name: &str) -> TypeRef {
    TypeRef::Reference(name.to_string())
}

fn primitive(name: &str) -> TypeRef {
    TypeRef::Primitive(name.to_string())
}

fn field(name: &str, t: TypeRef) -> (String, TypeRef) {
    (name.to_string(), t)
}

fn symbols() -> SymbolTable {
    let mut builder = SymbolTableBuilder::new();
    builder.add_type("Shape", TypeDecl::Record(vec!(
        field("a", primitive("integer")),
        field("b", primitive("charstring")),
        field("c", primitive("boolean")),
    ))).unwrap();
    builder.add_type("Choice", TypeDecl::Union(vec!(
        field("num", primitive("integer")),
        field("text", primitive("charstring")),
    ))).unwrap();
    builder.add_type("Numbers", TypeDecl::RecordOf(primitive("integer"))).unwrap();
    builder.add_type("Color", TypeDecl::Enumerated(vec!("red".to_string(), "green".to_string()))).unwrap();
    builder.add_type("Outer", TypeDecl::Set(vec!(
        field("inner", named("Shape")),
        field("color", named("Color")),
        field("choice", named("Choice")),
    ))).unwrap();
    builder.add_constant("greeting").unwrap();

    resolve_symbols(builder).unwrap()
}

fn compile(definitions: Vec<Node>) -> ModuleTemplates {
    compile_module(&symbols(), &Node::module("M", definitions))
}

fn template(t: TypeRef, name: &str, body: Node) -> Node {
    Node::template_def(t, name, Vec::new(), None, body)
}

fn derived(t: TypeRef, name: &str, base: &str, body: Node) -> Node {
    Node::template_def(t, name, Vec::new(), Some(base), body)
}

fn value_source(templates: &ModuleTemplates, name: &str) -> String {
    templates.find(name).unwrap().value().unwrap().to_source(0).unwrap()
}

fn errors(templates: &ModuleTemplates) -> Vec<TemplateError> {
    templates.diagnostics().iter()
        .filter_map(|diagnostic| match diagnostic {
            Diagnostic::Error { error, .. } => Some(error.clone()),
            Diagnostic::Warning { .. } => None,
        })
        .collect()
}

fn warnings(templates: &ModuleTemplates) -> usize {
    templates.diagnostics().iter().filter(|d| !d.is_error()).count()
}

#[test]
fn fields_in_declaration_order() {
    let templates = compile(vec!(
        template(named("Shape"), "t", Node::named_list(vec!(
            ("c", Node::literal("true")),
            ("a", Node::literal("1")),
            ("b", Node::literal("\"x\"")),
        ))),
    ));

    assert_eq!(templates.name(), Some("M"));
    assert_eq!(templates.java_source().unwrap(),
        "public static Shape t() {\n\
         \tShape value = new Shape(\n\
         \t\tnew INTEGER(\"1\"),\n\
         \t\tnew CHARSTRING(\"x\"),\n\
         \t\tBOOLEAN.TRUE\n\
         \t);\n\
         \treturn value;\n\
         }\n");
}

#[test]
fn union_alternative() {
    let templates = compile(vec!(
        template(named("Choice"), "u", Node::named_list(vec!(
            ("text", Node::literal("\"hi\"")),
        ))),
    ));

    assert!(templates.diagnostics().is_empty());
    assert_eq!(templates.find("u").unwrap().value().unwrap().type_name(), "Choice");
    assert_eq!(value_source(&templates, "u"), "new SC_text_Choice(new CHARSTRING(\"hi\"))");
}

#[test]
fn union_alternative_errors() {
    let templates = compile(vec!(
        template(named("Choice"), "both", Node::named_list(vec!(
            ("num", Node::literal("1")),
            ("text", Node::literal("\"a\"")),
        ))),
        template(named("Choice"), "wrong", Node::named_list(vec!(
            ("flag", Node::literal("true")),
        ))),
        template(named("Choice"), "none", Node::named_list(Vec::new())),
    ));

    assert!(templates.templates().is_empty());
    assert_eq!(errors(&templates), vec!(
        TemplateError::MultipleUnionAlternatives("Choice".to_string(), "num".to_string(), "text".to_string()),
        TemplateError::UnknownAlternative("Choice".to_string(), "flag".to_string()),
        TemplateError::MissingUnionAlternative("Choice".to_string()),
    ));
    assert_eq!(templates.diagnostics()[0].template(), Some("both"));
}

#[test]
fn wildcards_at_any_depth() {
    let templates = compile(vec!(
        template(named("Outer"), "w", Node::named_list(vec!(
            ("inner", Node::named_list(vec!(
                ("a", Node::any_value()),
                ("b", Node::any_or_omit()),
                ("c", Node::literal("omit")),
            ))),
            ("color", Node::any_value()),
        ))),
        template(primitive("integer"), "top", Node::any_or_omit()),
    ));

    assert_eq!(value_source(&templates, "w"),
        "new Outer(\n\
         \tnew Shape(\n\
         \t\tINTEGER.ANY,\n\
         \t\tCHARSTRING.ANY_OR_OMIT,\n\
         \t\tBOOLEAN.OMIT\n\
         \t),\n\
         \tColor.ANY,\n\
         \tnull /* unbound field choice */\n\
         )");
    assert_eq!(value_source(&templates, "top"), "INTEGER.ANY_OR_OMIT");
}

#[test]
fn modified_template() {
    let templates = compile(vec!(
        template(named("Shape"), "base", Node::named_list(vec!(
            ("a", Node::literal("1")),
            ("b", Node::literal("\"x\"")),
            ("c", Node::literal("false")),
        ))),
        derived(named("Shape"), "changed", "base", Node::named_list(vec!(
            ("a", Node::literal("5")),
        ))),
    ));

    assert!(templates.diagnostics().is_empty());

    let changed = templates.find("changed").unwrap();
    assert_eq!(changed.modifications().len(), 1);
    assert_eq!(changed.modifications()[0].path.to_string(), ".a");

    let source = templates.java_source().unwrap();
    assert!(source.ends_with(
        "public static Shape changed() {\n\
         \tShape value = (Shape) base();\n\
         \tvalue.a = new INTEGER(\"5\");\n\
         \treturn value;\n\
         }\n"));
}

#[test]
fn nested_modification_paths() {
    let templates = compile(vec!(
        template(named("Outer"), "base", Node::named_list(vec!(
            ("color", Node::reference("red")),
        ))),
        derived(named("Outer"), "changed", "base", Node::named_list(vec!(
            ("inner", Node::named_list(vec!(
                ("b", Node::literal("\"y\"")),
                ("a", Node::literal("7")),
            ))),
            ("choice", Node::named_list(vec!(
                ("num", Node::literal("2")),
            ))),
            ("color", Node::reference("green")),
        ))),
    ));

    let changed = templates.find("changed").unwrap();
    let paths: Vec<String> = changed.modifications().iter().map(|m| m.path.to_string()).collect();
    assert_eq!(paths, vec!(".inner.b", ".inner.a", ".choice", ".color"));

    let source = templates.java_source().unwrap();
    assert!(source.contains("\tvalue.inner.a = new INTEGER(\"7\");\n"));
    assert!(source.contains("\tvalue.choice = new SC_num_Choice(new INTEGER(\"2\"));\n"));
    assert!(source.contains("\tvalue.color = Color.green;\n"));
}

#[test]
fn whole_value_override() {
    let templates = compile(vec!(
        template(primitive("integer"), "one", Node::literal("1")),
        derived(primitive("integer"), "two", "one", Node::literal("2")),
    ));

    let source = templates.java_source().unwrap();
    assert!(source.contains("\tINTEGER value = (INTEGER) one();\n\tvalue = new INTEGER(\"2\");\n"));
}

#[test]
fn unknown_base_template_drops_only_that_template() {
    let templates = compile(vec!(
        derived(named("Shape"), "early", "later", Node::named_list(Vec::new())),
        template(named("Shape"), "later", Node::named_list(Vec::new())),
        derived(named("Shape"), "bad", "missing", Node::named_list(vec!(
            ("a", Node::literal("1")),
        ))),
        template(primitive("integer"), "good", Node::literal("3")),
    ));

    let names: Vec<&str> = templates.templates().iter().map(Template::name).collect();
    assert_eq!(names, vec!("later", "good"));
    assert_eq!(errors(&templates), vec!(
        TemplateError::UnknownBaseTemplate("later".to_string()),
        TemplateError::UnknownBaseTemplate("missing".to_string()),
    ));

    let source = templates.java_source().unwrap();
    assert!(source.starts_with(
        "// error in template early: unknown base template later\n\
         // error in template bad: unknown base template missing\n"));
    assert_eq!(value_source(&templates, "good"), "new INTEGER(\"3\")");
}

#[test]
fn record_of_arity() {
    let templates = compile(vec!(
        template(named("Numbers"), "none", Node::list(Vec::new())),
        template(named("Numbers"), "three", Node::list(vec!(
            Node::literal("1"),
            Node::any_value(),
            Node::literal("3"),
        ))),
    ));

    assert_eq!(value_source(&templates, "none"), "new Numbers()");
    assert_eq!(value_source(&templates, "three"),
        "new Numbers(\n\
         \tnew INTEGER(\"1\"),\n\
         \tINTEGER.ANY,\n\
         \tnew INTEGER(\"3\")\n\
         )");
}

#[test]
fn repeated_element_list_is_skipped() {
    let body = Node::new(NodeKind::Template, vec!(
        Node::new(NodeKind::ListOfTemplates, vec!(Node::literal("1"))),
        Node::new(NodeKind::ListOfTemplates, vec!(Node::literal("2"))),
    ));
    let templates = compile(vec!(template(named("Numbers"), "once", body)));

    assert_eq!(value_source(&templates, "once"), "new Numbers(\n\tnew INTEGER(\"1\")\n)");
}

#[test]
fn value_list_notation() {
    let templates = compile(vec!(
        template(named("Shape"), "short", Node::list(vec!(Node::literal("1")))),
        template(named("Shape"), "long", Node::list(vec!(
            Node::literal("1"),
            Node::literal("\"x\""),
            Node::literal("true"),
            Node::named_list(vec!(("a", Node::literal("4")))),
        ))),
    ));

    assert_eq!(value_source(&templates, "short"),
        "new Shape(\n\
         \tnew INTEGER(\"1\"),\n\
         \tnull /* unbound element 1 */,\n\
         \tnull /* unbound element 2 */\n\
         )");

    match templates.find("long").unwrap().value().unwrap().kind() {
        ValueKind::List(slots) => assert!(slots.len() == 3 && slots.iter().all(Option::is_some)),
        kind => panic!("unexpected {:?}", kind),
    }
    assert_eq!(warnings(&templates), 1);
    assert!(!templates.has_errors());
}

#[test]
fn registration_is_last_write_wins() {
    let templates = compile(vec!(
        template(primitive("integer"), "t", Node::literal("1")),
        template(primitive("integer"), "t", Node::literal("2")),
        derived(primitive("integer"), "d", "t", Node::literal("3")),
    ));

    assert_eq!(templates.templates().len(), 3);
    assert_eq!(value_source(&templates, "t"), "new INTEGER(\"2\")");
    assert_eq!(templates.find("t"), templates.templates().get(1));
}

#[test]
fn missing_value_is_marked() {
    let definition = Node::new(NodeKind::TemplateDef, vec!(
        Node::type_node(named("Shape")),
        Node::identifier("empty"),
    ));
    let templates = compile(vec!(definition));

    assert!(templates.find("empty").unwrap().value().is_none());
    assert!(templates.java_source().unwrap().contains("\tShape value = /* Unexpected null value! */ null;\n"));
}

#[test]
fn unsupported_shapes_become_placeholders() {
    let templates = compile(vec!(
        template(named("Shape"), "range", Node::named_list(vec!(
            ("a", Node::other("(1 .. 5)")),
        ))),
        template(primitive("integer"), "mismatch", Node::named_list(vec!(
            ("a", Node::literal("1")),
        ))),
    ));

    assert!(!templates.has_errors());
    assert_eq!(warnings(&templates), 2);
    assert_eq!(value_source(&templates, "range"),
        "new Shape(\n\
         \tnull /* unsupported template: (1 .. 5) */,\n\
         \tnull /* unbound field b */,\n\
         \tnull /* unbound field c */\n\
         )");
    assert_eq!(value_source(&templates, "mismatch"), "null /* unsupported template: NamedTemplateList */");
}

#[test]
fn references() {
    let parameterized = Node::template_def(named("Shape"), "withParam",
        vec!((primitive("integer"), "p"), (named("Color"), "q")), None,
        Node::named_list(vec!(
            ("a", Node::reference("p")),
            ("b", Node::reference("greeting")),
        )));

    let templates = compile(vec!(
        parameterized,
        template(named("Color"), "color", Node::reference("red")),
        template(primitive("integer"), "leaked", Node::reference("p")),
    ));

    let with_param = templates.find("withParam").unwrap();
    assert_eq!(with_param.parameters(), &[
        Field { field_type: "INTEGER".to_string(), name: "p".to_string() },
        Field { field_type: "Color".to_string(), name: "q".to_string() },
    ][..]);

    let source = templates.java_source().unwrap();
    assert!(source.contains("public static Shape withParam(INTEGER p, Color q) {\n"));
    assert_eq!(value_source(&templates, "withParam"),
        "new Shape(\n\
         \tp,\n\
         \tConstants.greeting(),\n\
         \tnull /* unbound field c */\n\
         )");
    assert_eq!(value_source(&templates, "color"), "Color.red");

    assert!(templates.find("leaked").is_none());
    assert_eq!(errors(&templates), vec!(TemplateError::UnresolvedReference("p".to_string())));
}

#[test]
fn malformed_literal_drops_template() {
    let templates = compile(vec!(
        template(named("Shape"), "bad", Node::named_list(vec!(
            ("a", Node::literal("'FFF'O")),
        ))),
    ));

    assert!(templates.templates().is_empty());
    assert_eq!(errors(&templates), vec!(TemplateError::MalformedLiteral("'FFF'O".to_string())));
}

#[test]
fn unknown_field_and_type() {
    let templates = compile(vec!(
        template(named("Shape"), "typo", Node::named_list(vec!(
            ("z", Node::literal("1")),
        ))),
        template(named("Nothing"), "untyped", Node::literal("1")),
        template(primitive("integer"), "fine", Node::literal("1")),
    ));

    assert_eq!(errors(&templates), vec!(
        TemplateError::UnknownField("Shape".to_string(), "z".to_string()),
        TemplateError::UnknownType("Nothing".to_string()),
    ));
    assert!(templates.find("fine").is_some());
}

#[test]
fn push_interface_matches_walk() {
    let symbols = symbols();
    let module = Node::module("M", vec!(
        template(primitive("boolean"), "yes", Node::literal("true")),
    ));

    let mut compiler = TemplateCompiler::new(&symbols);
    compiler.process(&module);
    for definition in &module.children {
        compiler.walk(definition);
    }
    compiler.finish(&module);

    let templates = compiler.into_templates();
    assert_eq!(value_source(&templates, "yes"), "BOOLEAN.TRUE");
}

#[test]
fn skip_counts_nested_nodes() {
    let symbols = symbols();
    let mut ctx = Context::new(&symbols);
    let template = Node::leaf(NodeKind::Template);
    let literal = Node::leaf(NodeKind::Literal("1".to_string()));

    let mut scope = skip(NodeTag::Template);
    assert!(matches!(scope.process(&template, &mut ctx), Ok(Step::Stay)));
    assert!(matches!(scope.finish(&literal, &mut ctx), Ok(Step::Stay)));
    assert!(matches!(scope.finish(&template, &mut ctx), Ok(Step::Stay)));
    assert!(matches!(scope.finish(&template, &mut ctx), Ok(Step::Ascend(None))));
}

#[test]
fn wait_for_commits_on_close() {
    let symbols = symbols();
    let mut ctx = Context::new(&symbols);
    let template = Node::leaf(NodeKind::Template);
    let any = Node::leaf(NodeKind::AnyValue);

    let mut scope = wait_for(NodeTag::Template, Product::Value(Value::new("INTEGER", ValueKind::Any)));
    assert!(matches!(scope.process(&any, &mut ctx), Ok(Step::Stay)));
    assert!(matches!(scope.finish(&any, &mut ctx), Ok(Step::Stay)));

    match scope.finish(&template, &mut ctx) {
        Ok(Step::Ascend(Some(Product::Value(value)))) => assert_eq!(value.to_source(0).unwrap(), "INTEGER.ANY"),
        _ => panic!("expected the committed value"),
    }
}

#[test]
fn repeated_value_list_is_skipped() {
    let body = Node::new(NodeKind::Template, vec!(
        Node::new(NodeKind::ListOfTemplates, vec!(Node::literal("1"), Node::literal("\"x\""))),
        Node::new(NodeKind::ListOfTemplates, vec!(Node::literal("5"))),
    ));
    let templates = compile(vec!(template(named("Shape"), "once", body)));

    assert!(templates.diagnostics().is_empty());
    assert_eq!(value_source(&templates, "once"),
        "new Shape(\n\
         \tnew INTEGER(\"1\"),\n\
         \tnew CHARSTRING(\"x\"),\n\
         \tnull /* unbound element 2 */\n\
         )");
}

#[test]
fn verdicts_and_special_floats() {
    let templates = compile(vec!(
        template(primitive("verdicttype"), "passed", Node::literal("pass")),
        template(primitive("verdicttype"), "failed", Node::reference("fail")),
        template(primitive("verdicttype"), "nothing", Node::literal("none")),
        template(primitive("float"), "huge", Node::literal("infinity")),
        template(primitive("float"), "tiny", Node::literal("-infinity")),
        template(primitive("float"), "nan", Node::reference("not_a_number")),
    ));

    assert!(templates.diagnostics().is_empty());
    assert_eq!(value_source(&templates, "passed"), "VERDICTTYPE.PASS");
    assert_eq!(value_source(&templates, "failed"), "VERDICTTYPE.FAIL");
    assert_eq!(value_source(&templates, "nothing"), "VERDICTTYPE.NONE");
    assert_eq!(value_source(&templates, "huge"), "FLOAT.PLUS_INFINITY");
    assert_eq!(value_source(&templates, "tiny"), "FLOAT.MINUS_INFINITY");
    assert_eq!(value_source(&templates, "nan"), "FLOAT.NOT_A_NUMBER");
}

#[test]
fn comments_stay_closed() {
    let templates = compile(vec!(
        template(primitive("charstring"), "pat", Node::other("pattern \"a*/b\"")),
        template(primitive("charstring"), "bad", Node::literal("\"open\nline")),
    ));

    assert_eq!(value_source(&templates, "pat"), "null /* unsupported template: pattern \"a* /b\" */");

    let source = templates.java_source().unwrap();
    assert!(source.starts_with("// error in template bad: malformed literal \"open\\nline\n"));
    assert!(!source.contains("\nline"));
    assert!(source.contains("\tCHARSTRING value = null /* unsupported template: pattern \"a* /b\" */;\n"));
}
