//! Type classification and literal extraction.

use crate::ast::{Node, NodeKind, TypeRef};
use crate::model::{FieldInfo, SymbolTable, TypeDefinition, TypeId};
use crate::util::java_string_escape;
use super::{Context, TemplateError, Value, ValueKind};

use num_bigint::BigInt;
use num_traits::Num;
use nom::{
	IResult,
	branch::alt,
	bytes::complete::{tag, take_while, take_while1},
	character::complete::{char, digit1, one_of},
	combinator::{all_consuming, map, map_res, opt, recognize, value},
	multi::many0,
	sequence::{delimited, pair, preceded, tuple},
};

/// Resolves a type reference of the tree.
pub fn get_type(symbols: &SymbolTable, t: &TypeRef) -> Result<TypeId, TemplateError> {
	symbols.lookup(t).ok_or_else(|| TemplateError::UnknownType(t.name().to_string()))
}

/// The name of a type in the generated code.
pub fn get_type_name(symbols: &SymbolTable, id: TypeId) -> String {
	symbols.java_name(id).to_string()
}

pub fn is_union(symbols: &SymbolTable, id: TypeId) -> bool {
	match symbols.definition(id) {
		TypeDefinition::Union(_) => true,
		_ => false,
	}
}

/// Record or set.
pub fn is_structured(symbols: &SymbolTable, id: TypeId) -> bool {
	match symbols.definition(id) {
		TypeDefinition::Record(_) | TypeDefinition::Set(_) => true,
		_ => false,
	}
}

/// Fields of a record or set, alternatives of a union.
pub fn fields(symbols: &SymbolTable, id: TypeId) -> &[FieldInfo] {
	match symbols.definition(id) {
		TypeDefinition::Record(fields) | TypeDefinition::Set(fields) | TypeDefinition::Union(fields) => fields,
		_ => &[],
	}
}

/// Element type of a record of or set of.
pub fn element_type(symbols: &SymbolTable, id: TypeId) -> Option<TypeId> {
	match symbols.definition(id) {
		TypeDefinition::RecordOf(elem) | TypeDefinition::SetOf(elem) => Some(*elem),
		_ => None,
	}
}


/// A literal token, before it is given a type.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Literal {
	Boolean(bool),
	Omit,
	/// Runtime field of a verdict, e.g. `PASS`.
	Verdict(&'static str),
	Integer(BigInt),
	Real(String),
	/// Runtime field of `infinity`, `-infinity` or `not_a_number`.
	SpecialFloat(&'static str),
	CharString(String),
	BitString(String),
	HexString(String),
	OctetString(String),
}

fn boolean(input: &str) -> IResult<&str, Literal> {
	alt((
		value(Literal::Boolean(true), tag("true")),
		value(Literal::Boolean(false), tag("false")),
	))(input)
}

fn omit(input: &str) -> IResult<&str, Literal> {
	value(Literal::Omit, tag("omit"))(input)
}

fn verdict(input: &str) -> IResult<&str, Literal> {
	alt((
		value(Literal::Verdict("PASS"), tag("pass")),
		value(Literal::Verdict("FAIL"), tag("fail")),
		value(Literal::Verdict("INCONC"), tag("inconc")),
		value(Literal::Verdict("NONE"), tag("none")),
		value(Literal::Verdict("ERROR"), tag("error")),
	))(input)
}

fn special_float(input: &str) -> IResult<&str, Literal> {
	alt((
		value(Literal::SpecialFloat("PLUS_INFINITY"), tag("infinity")),
		value(Literal::SpecialFloat("MINUS_INFINITY"), tag("-infinity")),
		value(Literal::SpecialFloat("NOT_A_NUMBER"), tag("not_a_number")),
	))(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
	recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

// Ex: 1.5, -0.25E-3, 2e10
fn real(input: &str) -> IResult<&str, Literal> {
	let fraction = recognize(pair(pair(char('.'), digit1), opt(exponent)));
	let number = recognize(tuple((opt(char('-')), digit1, alt((fraction, exponent)))));
	map(number, |text: &str| Literal::Real(text.to_string()))(input)
}

fn integer(input: &str) -> IResult<&str, Literal> {
	let number = recognize(pair(opt(char('-')), digit1));
	map(map_res(number, |text: &str| BigInt::from_str_radix(text, 10)), Literal::Integer)(input)
}

// Ex: "say ""hi"""
fn charstring(input: &str) -> IResult<&str, Literal> {
	let (input, _) = char('"')(input)?;
	let (input, parts) = many0(alt((
		preceded(char('"'), tag("\"")),
		take_while1(|c: char| c != '"'),
	)))(input)?;
	let (input, _) = char('"')(input)?;

	Ok((input, Literal::CharString(parts.concat())))
}

fn quoted_digits<'a>(suffix: &'static str, is_digit: fn(char) -> bool) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
	delimited(char('\''), take_while(is_digit), tag(suffix))
}

fn is_bit(c: char) -> bool {
	c == '0' || c == '1'
}

fn is_hex(c: char) -> bool {
	c.is_ascii_hexdigit()
}

fn bitstring(input: &str) -> IResult<&str, Literal> {
	map(quoted_digits("'B", is_bit), |digits: &str| Literal::BitString(digits.to_string()))(input)
}

fn hexstring(input: &str) -> IResult<&str, Literal> {
	map(quoted_digits("'H", is_hex), |digits: &str| Literal::HexString(digits.to_string()))(input)
}

fn octetstring(input: &str) -> IResult<&str, Literal> {
	map(quoted_digits("'O", is_hex), |digits: &str| Literal::OctetString(digits.to_string()))(input)
}

/// Parses the token text of a literal.
pub(crate) fn parse_literal(text: &str) -> Result<Literal, TemplateError> {
	let result = all_consuming(alt((
		boolean,
		omit,
		verdict,
		special_float,
		real,
		integer,
		charstring,
		bitstring,
		hexstring,
		octetstring,
	)))(text.trim());

	match result {
		Ok((_, Literal::OctetString(digits))) if digits.len() % 2 != 0 => Err(TemplateError::MalformedLiteral(text.to_string())),
		Ok((_, literal)) => Ok(literal),
		Err(_) => Err(TemplateError::MalformedLiteral(text.to_string())),
	}
}

fn literal_value(type_name: &str, literal: Literal) -> Value {
	let kind = match literal {
		Literal::Boolean(b) => ValueKind::Boolean(b),
		Literal::Omit => ValueKind::Omit,
		Literal::Verdict(field) | Literal::SpecialFloat(field) => ValueKind::Keyword(field.to_string()),
		Literal::Integer(n) => ValueKind::Literal(n.to_string()),
		Literal::Real(text) => ValueKind::Literal(text),
		Literal::CharString(text) => ValueKind::Literal(java_string_escape(&text)),
		Literal::BitString(digits) | Literal::HexString(digits) | Literal::OctetString(digits) => ValueKind::Literal(digits),
	};

	Value::new(type_name, kind)
}

fn reference_value(ctx: &Context<'_>, type_id: TypeId, type_name: &str, name: &str) -> Result<Value, TemplateError> {
	if ctx.parameters.iter().any(|param| param.name == name) {
		return Ok(Value::new(type_name, ValueKind::Parameter(name.to_string())));
	}

	if ctx.symbols.is_constant(name) {
		return Ok(Value::new(type_name, ValueKind::Constant(name.to_string())));
	}

	if let TypeDefinition::Enumerated(values) = ctx.symbols.definition(type_id) {
		if values.iter().any(|v| v == name) {
			return Ok(Value::new(type_name, ValueKind::EnumField(name.to_string())));
		}
	}

	// Front ends may hand keyword values such as `pass` over as references.
	match parse_literal(name) {
		Ok(literal @ Literal::Boolean(_)) | Ok(literal @ Literal::Omit) |
		Ok(literal @ Literal::Verdict(_)) | Ok(literal @ Literal::SpecialFloat(_)) => Ok(literal_value(type_name, literal)),
		_ => Err(TemplateError::UnresolvedReference(name.to_string())),
	}
}

/// Maps a literal or reference node to the expression constructing it as `type_id`.
pub(crate) fn extract(ctx: &Context<'_>, type_id: TypeId, node: &Node) -> Result<Value, TemplateError> {
	let type_name = get_type_name(ctx.symbols, type_id);
	match &node.kind {
		NodeKind::Literal(text) => Ok(literal_value(&type_name, parse_literal(text)?)),
		NodeKind::Reference(name) => reference_value(ctx, type_id, &type_name, name),
		kind => Ok(Value::new(&type_name, ValueKind::Unknown(format!("{:?}", kind.tag())))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_literals() {
		assert_eq!(parse_literal("true"), Ok(Literal::Boolean(true)));
		assert_eq!(parse_literal("false"), Ok(Literal::Boolean(false)));
		assert_eq!(parse_literal("omit"), Ok(Literal::Omit));
		assert_eq!(parse_literal("-42"), Ok(Literal::Integer(BigInt::from(-42))));
		assert_eq!(parse_literal("1.5E3"), Ok(Literal::Real("1.5E3".to_string())));
		assert_eq!(parse_literal("2e-1"), Ok(Literal::Real("2e-1".to_string())));
		assert_eq!(parse_literal("'0101'B"), Ok(Literal::BitString("0101".to_string())));
		assert_eq!(parse_literal("'0aF'H"), Ok(Literal::HexString("0aF".to_string())));
		assert_eq!(parse_literal("'FF00'O"), Ok(Literal::OctetString("FF00".to_string())));
		assert_eq!(parse_literal("\"\""), Ok(Literal::CharString(String::new())));
	}

	#[test]
	fn parses_keyword_literals() {
		assert_eq!(parse_literal("pass"), Ok(Literal::Verdict("PASS")));
		assert_eq!(parse_literal("fail"), Ok(Literal::Verdict("FAIL")));
		assert_eq!(parse_literal("inconc"), Ok(Literal::Verdict("INCONC")));
		assert_eq!(parse_literal("none"), Ok(Literal::Verdict("NONE")));
		assert_eq!(parse_literal("error"), Ok(Literal::Verdict("ERROR")));
		assert_eq!(parse_literal("infinity"), Ok(Literal::SpecialFloat("PLUS_INFINITY")));
		assert_eq!(parse_literal("-infinity"), Ok(Literal::SpecialFloat("MINUS_INFINITY")));
		assert_eq!(parse_literal("not_a_number"), Ok(Literal::SpecialFloat("NOT_A_NUMBER")));
		assert!(parse_literal("passed").is_err());
		assert!(parse_literal("-inf").is_err());
	}

	#[test]
	fn integers_are_unbounded() {
		let text = "123456789012345678901234567890";
		match parse_literal(text) {
			Ok(Literal::Integer(n)) => assert_eq!(n.to_string(), text),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn charstring_doubled_quotes() {
		assert_eq!(parse_literal("\"say \"\"hi\"\"\""), Ok(Literal::CharString("say \"hi\"".to_string())));

		let value = literal_value("CHARSTRING", parse_literal("\"a\"\"b\"").unwrap());
		assert_eq!(value.to_source(0).unwrap(), "new CHARSTRING(\"a\\\"b\")");
	}

	#[test]
	fn rejects_malformed_literals() {
		for text in &["'012'B", "'FFF'O", "'GG'H", "12abc", "\"open", "truth"] {
			assert_eq!(parse_literal(text), Err(TemplateError::MalformedLiteral(text.to_string())));
		}
	}
}
