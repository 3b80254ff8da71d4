// src/script/lexer.rs

//! Tokenizer for inline fragments.

use super::CompileError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    True,
    False,
    And,
    Or,
    Not,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    LParen,
    RParen,
    /// Statement separator: a newline or `;`.
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub line: usize,
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, CompileError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut i = 0;
    // Newlines inside parentheses do not end a statement.
    let mut depth = 0usize;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\n' => {
                if depth == 0 {
                    tokens.push(Spanned { token: Token::Newline, line });
                }
                line += 1;
                i += 1;
            }
            ';' => {
                tokens.push(Spanned { token: Token::Newline, line });
                i += 1;
            }
            c if c.is_whitespace() => i += 1,
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '0'..='9' | '.' if c != '.' || chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()) => {
                let (token, next) = lex_number(&chars, i, line)?;
                tokens.push(Spanned { token, line });
                i = next;
            }
            '\'' | '"' => {
                let (s, next) = lex_string(&chars, i, line)?;
                tokens.push(Spanned { token: Token::Str(s), line });
                i = next;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let token = match word.as_str() {
                    "True" | "true" => Token::True,
                    "False" | "false" => Token::False,
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    _ => Token::Ident(word),
                };
                tokens.push(Spanned { token, line });
            }
            _ => {
                let next = chars.get(i + 1).copied();
                let (token, width) = match (c, next) {
                    ('=', Some('=')) => (Token::EqEq, 2),
                    ('!', Some('=')) => (Token::NotEq, 2),
                    ('<', Some('=')) => (Token::Le, 2),
                    ('>', Some('=')) => (Token::Ge, 2),
                    ('/', Some('/')) => (Token::SlashSlash, 2),
                    ('=', _) => (Token::Assign, 1),
                    ('<', _) => (Token::Lt, 1),
                    ('>', _) => (Token::Gt, 1),
                    ('+', _) => (Token::Plus, 1),
                    ('-', _) => (Token::Minus, 1),
                    ('*', _) => (Token::Star, 1),
                    ('/', _) => (Token::Slash, 1),
                    ('%', _) => (Token::Percent, 1),
                    ('(', _) => {
                        depth += 1;
                        (Token::LParen, 1)
                    }
                    (')', _) => {
                        depth = depth.saturating_sub(1);
                        (Token::RParen, 1)
                    }
                    _ => {
                        return Err(CompileError::new(
                            line,
                            format!("unexpected character '{c}'"),
                        ));
                    }
                };
                tokens.push(Spanned { token, line });
                i += width;
            }
        }
    }

    tokens.push(Spanned { token: Token::Eof, line });
    Ok(tokens)
}

fn lex_number(chars: &[char], start: usize, line: usize) -> Result<(Token, usize), CompileError> {
    let mut i = start;
    let mut is_float = false;
    while i < chars.len() {
        match chars[i] {
            '0'..='9' | '_' => i += 1,
            '.' if !is_float => {
                is_float = true;
                i += 1;
            }
            'e' | 'E' if chars.get(i + 1).is_some_and(|n| n.is_ascii_digit() || *n == '-' || *n == '+') => {
                is_float = true;
                i += 2;
            }
            _ => break,
        }
    }

    let text: String = chars[start..i].iter().filter(|c| **c != '_').collect();
    let token = if is_float {
        text.parse::<f64>()
            .map(Token::Float)
            .map_err(|_| CompileError::new(line, format!("invalid number '{text}'")))?
    } else {
        text.parse::<i64>()
            .map(Token::Int)
            .map_err(|_| CompileError::new(line, format!("integer literal out of range '{text}'")))?
    };
    Ok((token, i))
}

fn lex_string(chars: &[char], start: usize, line: usize) -> Result<(String, usize), CompileError> {
    let quote = chars[start];
    let mut out = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            c if c == quote => return Ok((out, i + 1)),
            '\n' => break,
            '\\' => {
                let escaped = match chars.get(i + 1) {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some(other) => *other,
                    None => break,
                };
                out.push(escaped);
                i += 2;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    Err(CompileError::new(line, "unterminated string literal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        tokenize(src).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn lexes_assignment() {
        assert_eq!(
            kinds("a = b + 1.5"),
            vec![
                Token::Ident("a".into()),
                Token::Assign,
                Token::Ident("b".into()),
                Token::Plus,
                Token::Float(1.5),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn semicolons_and_comments_separate_statements() {
        assert_eq!(
            kinds("x=1; y=2 # note\n"),
            vec![
                Token::Ident("x".into()),
                Token::Assign,
                Token::Int(1),
                Token::Newline,
                Token::Ident("y".into()),
                Token::Assign,
                Token::Int(2),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn rejects_unknown_characters_with_line() {
        let err = tokenize("a = 1\nb = $").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains('$'));
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = tokenize("s = 'abc").unwrap_err();
        assert!(err.message.contains("unterminated"));
    }
}
