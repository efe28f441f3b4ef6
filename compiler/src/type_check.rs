use crate::ast::TypeRef;
use crate::model::*;
use std::collections::HashSet;
use std::fmt;


#[derive(Debug, PartialEq)]
pub enum TypeCheckError {
    TypeNotDefined(String),
    DuplicateField(String, String),
    DuplicateEnumValue(String, String),
    EmptyUnion(String),
}

impl fmt::Display for TypeCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCheckError::TypeNotDefined(name) => write!(f, "Type not defined: {}", name),
            TypeCheckError::DuplicateField(type_name, field) => write!(f, "Duplicate field {} in type {}", field, type_name),
            TypeCheckError::DuplicateEnumValue(type_name, value) => write!(f, "Duplicate enumerated value {} in type {}", value, type_name),
            TypeCheckError::EmptyUnion(type_name) => write!(f, "Union {} has no alternatives", type_name),
        }
    }
}

impl std::error::Error for TypeCheckError {}

fn check_type(table: &SymbolTable, t: &TypeRef) -> Result<TypeId, TypeCheckError> {
    table.lookup(t).ok_or_else(|| TypeCheckError::TypeNotDefined(t.name().to_string()))
}

fn check_fields(table: &SymbolTable, type_name: &str, fields: &Vec<(String, TypeRef)>) -> Result<Vec<FieldInfo>, TypeCheckError> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for (field_name, field_type) in fields {
        if !seen.insert(field_name) {
            return Err(TypeCheckError::DuplicateField(type_name.to_string(), field_name.clone()));
        }

        resolved.push(FieldInfo {
            name: field_name.clone(),
            field_type: check_type(table, field_type)?,
        });
    }

    Ok(resolved)
}

fn check_decl(table: &SymbolTable, type_name: &str, decl: &TypeDecl) -> Result<TypeDefinition, TypeCheckError> {
    Ok(match decl {
        TypeDecl::Record(fields) => TypeDefinition::Record(check_fields(table, type_name, fields)?),
        TypeDecl::Set(fields) => TypeDefinition::Set(check_fields(table, type_name, fields)?),
        TypeDecl::Union(fields) if fields.is_empty() => return Err(TypeCheckError::EmptyUnion(type_name.to_string())),
        TypeDecl::Union(fields) => TypeDefinition::Union(check_fields(table, type_name, fields)?),
        TypeDecl::RecordOf(elem) => TypeDefinition::RecordOf(check_type(table, elem)?),
        TypeDecl::SetOf(elem) => TypeDefinition::SetOf(check_type(table, elem)?),
        TypeDecl::Enumerated(values) => {
            let mut seen = HashSet::new();
            for value in values {
                if !seen.insert(value) {
                    return Err(TypeCheckError::DuplicateEnumValue(type_name.to_string(), value.clone()));
                }
            }

            TypeDefinition::Enumerated(values.clone())
        },
    })
}

/// Resolves every declaration of the builder into an interned [`SymbolTable`].
///
/// Declarations may reference types declared after them.
pub fn resolve_symbols(builder: SymbolTableBuilder) -> Result<SymbolTable, TypeCheckError> {
    let mut table = SymbolTable::with_primitives();

    let ids: Vec<TypeId> = builder.types.iter()
        .map(|(name, _)| table.declare(name))
        .collect();

    for (id, (name, decl)) in ids.into_iter().zip(builder.types.iter()) {
        let definition = check_decl(&table, name, decl)?;
        table.define(id, definition);
    }

    table.set_constants(builder.constants);

    Ok(table)
}
