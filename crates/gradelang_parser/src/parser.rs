use gradelang_lexer::{LexedToken, Lexer, Token};

use crate::{
    error::{ParseError, Result, SyntaxError},
    expr::{Expression, ListItem},
    program::Program,
    value::Value,
};

/// A recursive-descent parser that turns GradeLang source text into a [`Program`]
///
/// ```text
/// program  := (category)* EOF
/// category := IDENTIFIER ':' expr
/// expr     := PERCENT | UDOUBLE | INTEGER
///           | IDENTIFIER ( '(' arglist ')' )?   // call or ref
///           | '{' listbody '}'
/// arglist  := (expr)*
/// listbody := (listitem)*
/// listitem := expr (':' expr)?
/// ```
pub struct Parser<'source> {
    source: &'source str,
    tokens: Vec<LexedToken>,
    position: usize,
}

impl<'source> Parser<'source> {
    /// Parses `source` into a [`Program`]
    pub fn parse(source: &'source str) -> Result<Program> {
        let mut parser = Self {
            source,
            tokens: Lexer::new(source).collect(),
            position: 0,
        };
        parser.parse_program()
    }

    fn peek(&self) -> LexedToken {
        self.tokens[self.position]
    }

    fn bump(&mut self) -> LexedToken {
        let token = self.peek();
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn slice(&self, token: LexedToken) -> &'source str {
        token.slice(self.source)
    }

    fn expect(&mut self, expected: Token, on_mismatch: SyntaxError) -> Result<LexedToken> {
        let token = self.peek();
        if token.token == expected {
            Ok(self.bump())
        } else {
            Err(ParseError::new(on_mismatch, token.start))
        }
    }

    fn parse_program(&mut self) -> Result<Program> {
        let mut program = Program::new();
        loop {
            let token = self.peek();
            match token.token {
                Token::EndOfFile => return Ok(program),
                Token::Identifier => {
                    let name = self.slice(token).to_string();
                    self.bump();
                    self.expect(Token::Colon, SyntaxError::ExpectedColonAfterCategoryName)?;
                    let expr = self.parse_expr()?;
                    program.insert(name, expr);
                }
                _ => return Err(ParseError::new(SyntaxError::ExpectedCategoryOrEof, token.start)),
            }
        }
    }

    fn parse_expr(&mut self) -> Result<Expression> {
        let token = self.peek();
        match token.token {
            Token::Percent => {
                self.bump();
                Ok(Expression::Constant(Value::Grade(decode_percent(
                    self.slice(token),
                ))))
            }
            Token::UDouble => {
                self.bump();
                Ok(Expression::Constant(Value::Grade(decode_udouble(
                    self.slice(token),
                ))))
            }
            Token::Integer => {
                self.bump();
                let n = decode_integer(self.slice(token))
                    .map_err(|kind| ParseError::new(kind, token.start))?;
                Ok(Expression::Constant(Value::Integer(n)))
            }
            Token::Identifier => {
                let name = self.slice(token).to_string();
                self.bump();
                if self.peek().token == Token::LParen {
                    self.bump();
                    let args = self.parse_arglist()?;
                    self.expect(Token::RParen, SyntaxError::ExpectedCloseParen)?;
                    Ok(Expression::OpCall(name, args))
                } else {
                    Ok(Expression::CategoryRef(name))
                }
            }
            Token::LBrace => {
                self.bump();
                let items = self.parse_listbody()?;
                self.expect(Token::RBrace, SyntaxError::ExpectedCloseBrace)?;
                Ok(Expression::ListLiteral(items))
            }
            Token::EndOfFile => Err(ParseError::new(SyntaxError::UnexpectedEof, token.start)),
            Token::Colon => Err(ParseError::new(SyntaxError::UnexpectedColon, token.start)),
            Token::Unknown => Err(ParseError::new(SyntaxError::UnknownToken, token.start)),
            Token::RParen | Token::RBrace | Token::LParen => {
                Err(ParseError::new(SyntaxError::ExpectedExpression, token.start))
            }
        }
    }

    fn parse_arglist(&mut self) -> Result<Vec<Expression>> {
        let mut args = Vec::new();
        loop {
            match self.peek().token {
                Token::RParen | Token::EndOfFile => return Ok(args),
                _ => args.push(self.parse_expr()?),
            }
        }
    }

    fn parse_listbody(&mut self) -> Result<Vec<ListItem>> {
        let mut items = Vec::new();
        loop {
            match self.peek().token {
                Token::RBrace | Token::EndOfFile => return Ok(items),
                _ => {
                    let value = self.parse_expr()?;
                    let weight = if self.peek().token == Token::Colon {
                        self.bump();
                        Some(self.parse_expr()?)
                    } else {
                        None
                    };
                    items.push(ListItem { value, weight });
                }
            }
        }
    }
}

fn decode_integer(text: &str) -> std::result::Result<u64, SyntaxError> {
    // the lexer only emits INTEGER for `[0-9]+`, so the only way this parse fails is the
    // literal's magnitude overflowing u64 (spec.md's INTEGER grammar has no bound on it)
    text.parse().map_err(|_| SyntaxError::IntegerOverflow)
}

fn decode_udouble(text: &str) -> f64 {
    text.parse().expect("lexer guarantees a well-formed udouble")
}

fn decode_percent(text: &str) -> f64 {
    let body = &text[..text.len() - 1]; // strip the trailing '%'
    let parsed: f64 = body.parse().expect("lexer guarantees a well-formed percent body");
    parsed / 100.0
}
