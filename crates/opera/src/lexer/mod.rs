use convert_case::Casing as _;

use crate::api::{
	context::Context,
	diagnostics::{Diagnostic, Error, LexError},
	span::Span,
};

/// The closed set of token kinds this language's surface syntax can produce. Unlike
/// most languages, user-defined operator *names* are not a fixed token kind of their own - any
/// identifier, including purely symbolic ones like `+` or `<->`, is tokenized as [`TokenKind::Ident`]
/// and only later classified as an operator name by the parser and resolver.
#[derive(strum_macros::EnumIter, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
	Include,
	Category,
	Num,
	Str,
	Ident,
	LBrace,
	RBrace,
	Comma,
	FormatF,
	FormatFx,
	FormatFy,
	FormatXf,
	FormatYf,
	FormatXfx,
	FormatXfy,
	FormatYfx,
}

impl std::fmt::Display for TokenKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", format!("{self:?}").to_case(convert_case::Case::Title))
	}
}

/// The keyword/format-tag lexeme table, shared between the comment-line heuristic below and the
/// main scanning loop. A static `phf` map gives us a zero-allocation lookup for the fixed set of
/// reserved words.
static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
	"include" => TokenKind::Include,
	"category" => TokenKind::Category,
	"class" => TokenKind::Category,
	"xfx" => TokenKind::FormatXfx,
	"xfy" => TokenKind::FormatXfy,
	"yfx" => TokenKind::FormatYfx,
	"fx" => TokenKind::FormatFx,
	"fy" => TokenKind::FormatFy,
	"xf" => TokenKind::FormatXf,
	"yf" => TokenKind::FormatYf,
	"f" => TokenKind::FormatF,
};

/// A token in Opera source code. Tokens compare by `(id, lexeme)` only; position
/// is carried exclusively for diagnostics.
#[derive(Debug, Clone)]
pub struct Token {
	pub id: TokenKind,
	pub lexeme: String,
	pub span: Span,
}

impl PartialEq for Token {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id && self.lexeme == other.lexeme
	}
}
impl Eq for Token {}

impl PartialOrd for Token {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}
impl Ord for Token {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.id.cmp(&other.id).then_with(|| self.lexeme.cmp(&other.lexeme))
	}
}

fn is_delimiter(c: Option<char>) -> bool {
	match c {
		None => true,
		Some(c) => c.is_whitespace() || c == '{' || c == '}' || c == ',',
	}
}

fn is_reserved_boundary(line: &str) -> Option<(TokenKind, usize)> {
	for (word, kind) in KEYWORDS.entries() {
		if let Some(rest) = line.strip_prefix(word) {
			if is_delimiter(rest.chars().next()) {
				return Some((*kind, word.len()));
			}
		}
	}
	None
}

/// Whether the line starting at column 0 with the given text should be dropped as a full-line
/// comment. Indented lines are exempt from this check entirely - only a line
/// whose very first character is non-whitespace is judged, and it's judged solely by whether it
/// opens a declaration.
fn line_is_comment(line: &str) -> bool {
	match line.chars().next() {
		None => false,
		Some(first) if first.is_whitespace() => false,
		_ => is_reserved_boundary(line).is_none(),
	}
}

fn is_control_and_not_whitespace(c: char) -> bool {
	c.is_control() && !c.is_whitespace()
}

/// Tokenizes Opera source code. Lexical errors (an unrecognized control character, or an
/// unterminated string) are pushed to `context` as diagnostics and tokenization continues past
/// them: a single bad character doesn't have to abort the whole file.
pub fn tokenize(source: &str, context: &mut Context) -> Vec<Token> {
	let mut tokens = Vec::new();
	let chars: Vec<char> = source.chars().collect();
	let mut index = 0;
	let mut line = 0usize;
	let mut column = 0usize;
	let mut at_line_start = true;

	while index < chars.len() {
		if at_line_start {
			let rest: String = chars[index..].iter().take_while(|c| **c != '\n').collect();
			if line_is_comment(&rest) {
				index += rest.chars().count();
				continue;
			}
			at_line_start = false;
		}

		let c = chars[index];

		if c == '\n' {
			index += 1;
			line += 1;
			column = 0;
			at_line_start = true;
			continue;
		}

		if c.is_whitespace() {
			index += 1;
			column += 1;
			continue;
		}

		let start_span = Span::new(line, column);

		match c {
			'{' => {
				tokens.push(Token { id: TokenKind::LBrace, lexeme: "{".to_owned(), span: start_span });
				index += 1;
				column += 1;
			},
			'}' => {
				tokens.push(Token { id: TokenKind::RBrace, lexeme: "}".to_owned(), span: start_span });
				index += 1;
				column += 1;
			},
			',' => {
				tokens.push(Token { id: TokenKind::Comma, lexeme: ",".to_owned(), span: start_span });
				index += 1;
				column += 1;
			},
			'"' => {
				let mut value = String::from("\"");
				index += 1;
				column += 1;
				let mut closed = false;
				while index < chars.len() {
					let current = chars[index];
					if current == '\\' && chars.get(index + 1) == Some(&'"') {
						value.push('\\');
						value.push('"');
						index += 2;
						column += 2;
						continue;
					}
					if current == '"' {
						value.push('"');
						index += 1;
						column += 1;
						closed = true;
						break;
					}
					if current == '\n' {
						break;
					}
					value.push(current);
					index += 1;
					column += 1;
				}
				if !closed {
					context.add_diagnostic(Diagnostic::new(start_span, Error::Lex(LexError::UnterminatedString)));
				}
				tokens.push(Token { id: TokenKind::Str, lexeme: value, span: start_span });
			},
			digit if digit.is_ascii_digit() => {
				let mut value = String::new();
				while index < chars.len() && chars[index].is_ascii_digit() {
					value.push(chars[index]);
					index += 1;
					column += 1;
				}
				tokens.push(Token { id: TokenKind::Num, lexeme: value, span: start_span });
			},
			other if is_control_and_not_whitespace(other) => {
				context.add_diagnostic(Diagnostic::new(start_span, Error::Lex(LexError::UnrecognizedCharacter(other))));
				index += 1;
				column += 1;
			},
			_ => {
				let rest: String = chars[index..].iter().collect();
				if let Some((kind, length)) = is_reserved_boundary(&rest) {
					let value: String = chars[index..index + length].iter().collect();
					tokens.push(Token { id: kind, lexeme: value, span: start_span });
					index += length;
					column += length;
				} else {
					let mut value = String::new();
					while index < chars.len() && !chars[index].is_whitespace() && chars[index] != '{' && chars[index] != '}' && chars[index] != ',' {
						value.push(chars[index]);
						index += 1;
						column += 1;
					}
					tokens.push(Token { id: TokenKind::Ident, lexeme: value, span: start_span });
				}
			},
		}
	}

	tokens
}

#[cfg(test)]
mod tests {
	use super::*;

	fn lex(source: &str) -> Vec<Token> {
		let mut context = Context::new(".");
		let tokens = tokenize(source, &mut context);
		assert!(context.diagnostics().is_empty(), "unexpected diagnostics: {:?}", context.diagnostics());
		tokens
	}

	#[test]
	fn tokenizes_simple_nullary_declaration() {
		let tokens = lex("f 0 main\n  42");
		let kinds: Vec<_> = tokens.iter().map(|t| t.id).collect();
		assert_eq!(kinds, vec![
			TokenKind::FormatF,
			TokenKind::Num,
			TokenKind::Ident,
			TokenKind::Num,
		]);
		assert_eq!(tokens[3].lexeme, "42");
	}

	#[test]
	fn drops_unindented_comment_lines() {
		let tokens = lex("this is a comment\nf 0 main\n  1");
		assert_eq!(tokens[0].id, TokenKind::FormatF);
	}

	#[test]
	fn keeps_indented_continuation_lines() {
		let tokens = lex("xfx 500 X plus Y\n  X");
		assert_eq!(tokens.last().unwrap().lexeme, "X");
	}

	#[test]
	fn symbolic_operator_names_tokenize_as_identifiers() {
		let tokens = lex("xfx 500 X + Y\n  X");
		assert!(tokens.iter().any(|t| t.id == TokenKind::Ident && t.lexeme == "+"));
	}

	#[test]
	fn unterminated_string_is_diagnosed() {
		let mut context = Context::new(".");
		let _ = tokenize("f 0 main\n  \"hi", &mut context);
		assert!(!context.diagnostics().is_empty());
	}
}
