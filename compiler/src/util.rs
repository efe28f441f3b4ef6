use crate::lang::GeneratorError;
use std::io::Write;

/// Calls `body` for each item, calling `sep` between consecutive items.
pub fn for_sep<F, I : IntoIterator, E1, E2>(f: &mut F, iter: I, mut sep: impl FnMut(&mut F) -> Result<(), E1>, mut body: impl FnMut(&mut F, I::Item) -> Result<(), E2>) -> Result<(), GeneratorError> where GeneratorError : From<E1> + From<E2> {
	let mut iter = iter.into_iter();
	if let Some(item) = iter.next() {
		body(f, item)?;
		for item in iter {
			sep(f)?;
			body(f, item)?;
		}
	}

	Ok(())
}

pub fn write_indent<F : Write>(f: &mut F, indent: usize) -> Result<(), GeneratorError> {
	for _ in 0..indent {
		write!(f, "\t")?;
	}

	Ok(())
}

/// Escapes a string for use inside a Java string literal.
pub fn java_string_escape(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for ch in value.chars() {
		match ch {
			'"' => escaped.push_str("\\\""),
			'\\' => escaped.push_str("\\\\"),
			'\n' => escaped.push_str("\\n"),
			'\r' => escaped.push_str("\\r"),
			'\t' => escaped.push_str("\\t"),
			ch => escaped.push(ch),
		}
	}
	escaped
}

/// Makes text safe to place inside a Java comment of either style.
///
/// Backslashes are doubled so that the text cannot form a unicode escape, which Java
/// translates even inside comments.
pub fn java_comment_escape(text: &str) -> String {
	text.replace('\\', "\\\\")
		.replace("*/", "* /")
		.replace('\r', "\\r")
		.replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn comment_escape() {
		assert_eq!(java_comment_escape("plain text"), "plain text");
		assert_eq!(java_comment_escape("a*/b"), "a* /b");
		assert_eq!(java_comment_escape("open\r\nline"), "open\\r\\nline");
		assert_eq!(java_comment_escape("a\\u000Ab"), "a\\\\u000Ab");
	}
}
