mod fixtures;

use ttcn3_codegen::{compile_module, lang, FileOutputHandler, MemoryOutputHandler};
use lang::{Language, GeneratorError};
use lang::java::JavaLanguage;
use ttcn3_codegen::model::PackageName;

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use tempdir::TempDir;

fn java_options(options: &[(&str, &str)]) -> Result<lang::java::JavaOptions, GeneratorError> {
    let mut builder = JavaLanguage::empty_options();
    for &(name, value) in options {
        JavaLanguage::add_option(&mut builder, name, OsString::from(value))?;
    }
    JavaLanguage::finalize_options(builder)
}

const EXPECTED_PUT_REQUEST: &str = "\tpublic static Request putRequest() {
\t\tRequest value = (Request) baseRequest();
\t\tvalue.id = new INTEGER(\"7\");
\t\tvalue.method = Method.put;
\t\tvalue.tags = Tags.ANY_OR_OMIT;
\t\treturn value;
\t}
";

#[test]
fn generate_in_memory() -> Result<(), GeneratorError> {
    let symbols = fixtures::protocol_symbols()?;
    let templates = compile_module(&symbols, &fixtures::protocol_module());
    assert!(templates.has_errors());

    let options = java_options(&[("out_dir", "gen"), ("package", "org.example.protocol"), ("class", "ProtocolTemplates")])?;
    assert_eq!(options.package, Some(PackageName::from_parts(&["org", "example", "protocol"])));

    let mut output = MemoryOutputHandler::new();
    JavaLanguage::generate(&templates, &options, &mut output)?;

    assert_eq!(output.files.len(), 1);
    let source = output.contents(Path::new("gen/org/example/protocol/ProtocolTemplates.java"))
        .ok_or("Missing generated file")?;

    assert!(source.starts_with("package org.example.protocol;\n\nimport ttcn3.runtime.*;\n\npublic class ProtocolTemplates {\n\n"));
    assert!(source.contains("\t// error in template broken: unresolved reference delete\n"));
    assert!(source.contains("\tpublic static Request baseRequest() {\n\t\tRequest value = new Request(\n\t\t\tConstants.defaultId(),\n\t\t\tMethod.get,\n"));
    assert!(source.contains("\t\t\tnew SC_raw_Payload(new OCTETSTRING(\"CAFE\")),\n"));
    assert!(source.contains("\t\t\tnew Tags(\n\t\t\t\tnew CHARSTRING(\"a\"),\n\t\t\t\tCHARSTRING.ANY\n\t\t\t)\n\t\t);\n"));
    assert!(source.contains(EXPECTED_PUT_REQUEST));
    assert!(!source.contains("broken("));
    assert!(source.ends_with("\t}\n}\n"));

    Ok(())
}

#[test]
fn package_defaults_to_module_name() -> Result<(), GeneratorError> {
    let symbols = fixtures::protocol_symbols()?;
    let templates = compile_module(&symbols, &fixtures::protocol_module());

    let options = java_options(&[("out_dir", "out"), ("runtime_package", "org.example.rt")])?;
    let mut output = MemoryOutputHandler::new();
    JavaLanguage::generate(&templates, &options, &mut output)?;

    let source = output.contents(Path::new("out/protocol/Templates.java"))
        .ok_or("Missing generated file")?;
    assert!(source.starts_with("package protocol;\n\nimport org.example.rt.*;\n"));

    Ok(())
}

#[test]
fn generate_to_file_system() -> Result<(), GeneratorError> {
    let dir = TempDir::new("ttcn3-codegen")?;
    let out_dir = dir.path().to_str().ok_or("Invalid temporary directory")?;

    let symbols = fixtures::protocol_symbols()?;
    let templates = compile_module(&symbols, &fixtures::protocol_module());

    let options = java_options(&[("out_dir", out_dir), ("package", "gen.protocol")])?;
    JavaLanguage::generate(&templates, &options, &mut FileOutputHandler {})?;

    let source = fs::read_to_string(dir.path().join("gen").join("protocol").join("Templates.java"))?;
    assert!(source.contains(EXPECTED_PUT_REQUEST));

    Ok(())
}

#[test]
fn invalid_options() {
    assert!(java_options(&[("package", "a.b")]).is_err());
    assert!(java_options(&[("out_dir", "a"), ("out_dir", "b")]).is_err());
    assert!(java_options(&[("out_dir", "a"), ("class", "9Templates")]).is_err());
    assert!(java_options(&[("out_dir", "a"), ("pkg:x", "y")]).is_err());
}
