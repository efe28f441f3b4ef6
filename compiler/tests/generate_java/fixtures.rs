use ttcn3_codegen::ast::{Node, TypeRef};
use ttcn3_codegen::model::{SymbolTable, SymbolTableBuilder, TypeDecl};
use ttcn3_codegen::{resolve_symbols, TypeCheckError};

fn named(name: &str) -> TypeRef {
    TypeRef::Reference(name.to_string())
}

fn primitive(name: &str) -> TypeRef {
    TypeRef::Primitive(name.to_string())
}

/// Types of a small signalling protocol.
pub fn protocol_symbols() -> Result<SymbolTable, TypeCheckError> {
    let mut builder = SymbolTableBuilder::new();
    let declarations = vec!(
        ("Request", TypeDecl::Record(vec!(
            ("id".to_string(), primitive("integer")),
            ("method".to_string(), named("Method")),
            ("payload".to_string(), named("Payload")),
            ("tags".to_string(), named("Tags")),
        ))),
        ("Method", TypeDecl::Enumerated(vec!("get".to_string(), "put".to_string()))),
        ("Payload", TypeDecl::Union(vec!(
            ("raw".to_string(), primitive("octetstring")),
            ("text".to_string(), primitive("universal charstring")),
        ))),
        ("Tags", TypeDecl::RecordOf(primitive("charstring"))),
    );

    for (name, decl) in declarations {
        builder.add_type(name, decl).unwrap();
    }
    builder.add_constant("defaultId").unwrap();

    resolve_symbols(builder)
}

/// A module with a base request, a derived request and a broken definition in between.
pub fn protocol_module() -> Node {
    Node::module("Protocol", vec!(
        Node::template_def(named("Request"), "baseRequest", Vec::new(), None,
            Node::named_list(vec!(
                ("id", Node::reference("defaultId")),
                ("method", Node::reference("get")),
                ("payload", Node::named_list(vec!(("raw", Node::literal("'CAFE'O"))))),
                ("tags", Node::list(vec!(Node::literal("\"a\""), Node::any_value()))),
            ))),

        Node::template_def(named("Request"), "broken", Vec::new(), None,
            Node::named_list(vec!(("method", Node::reference("delete"))))),

        Node::template_def(named("Request"), "putRequest", Vec::new(), Some("baseRequest"),
            Node::named_list(vec!(
                ("id", Node::literal("7")),
                ("method", Node::reference("put")),
                ("tags", Node::any_or_omit()),
            ))),
    ))
}
