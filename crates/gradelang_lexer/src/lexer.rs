use std::str::CharIndices;

/// A single kind of lexical token recognized by the scanner
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Token {
    Integer,
    UDouble,
    Percent,
    Identifier,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Unknown,
    EndOfFile,
}

/// A token paired with the byte offset at which its text begins
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LexedToken {
    /// The recognized token kind
    pub token: Token,
    /// The byte offset of the first character belonging to the token
    pub start: usize,
    /// The byte offset one past the last character belonging to the token
    pub end: usize,
}

impl LexedToken {
    /// Returns the source slice covered by this token
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum NumberState {
    IntegerPart,
    FractionPart,
}

fn is_id_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '/'
}

fn is_id_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '/' || c == '.'
}

/// A deterministic finite-state scanner that turns GradeLang source text into a flat
/// sequence of tokens.
///
/// The lexer is an [`Iterator`] of [`LexedToken`]; whitespace and comments are consumed
/// internally and never appear in the emitted stream. The final token produced is always
/// [`Token::EndOfFile`], after which the iterator yields `None`.
pub struct GradeLexer<'a> {
    source: &'a str,
    chars: CharIndices<'a>,
    peeked: Option<(usize, char)>,
    emitted_eof: bool,
}

impl<'a> GradeLexer<'a> {
    /// Creates a lexer over the given source text
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.char_indices();
        let peeked = chars.next();
        Self {
            source,
            chars,
            peeked,
            emitted_eof: false,
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let current = self.peeked;
        self.peeked = self.chars.next();
        current
    }

    fn peek_char(&self) -> Option<char> {
        self.peeked.map(|(_, c)| c)
    }

    fn source_end(&self) -> usize {
        self.source.len()
    }

    // Skips whitespace and comments, returning the byte offset at which the next token
    // should start. An unterminated block comment rewinds to the byte offset of its
    // opening `/` rather than being silently swallowed.
    fn skip_trivia(&mut self) -> usize {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let slash_start = self.peeked.unwrap().0;
                    let mut lookahead = self.chars.clone();
                    match lookahead.next() {
                        Some((_, '/')) => {
                            self.bump();
                            self.bump();
                            while let Some(c) = self.peek_char() {
                                if c == '\n' {
                                    break;
                                }
                                self.bump();
                            }
                        }
                        Some((_, '*')) => {
                            self.bump();
                            self.bump();
                            if !self.consume_block_comment() {
                                // Unterminated: rewind to the opening `/` and let the
                                // parser reject the resulting token stream.
                                self.rewind_to(slash_start);
                                return slash_start;
                            }
                        }
                        _ => return slash_start,
                    }
                }
                _ => return self.peeked.map_or(self.source_end(), |(i, _)| i),
            }
        }
    }

    // Consumes up to and including the closing `*/`, returning false if input ran out first.
    fn consume_block_comment(&mut self) -> bool {
        let mut prev_star = false;
        loop {
            match self.bump() {
                Some((_, '*')) => prev_star = true,
                Some((_, '/')) if prev_star => return true,
                Some(_) => prev_star = false,
                None => return false,
            }
        }
    }

    // `CharIndices` built from the full source already carries absolute byte offsets, so
    // rewinding is just re-deriving it and stepping past every entry before `offset`.
    fn rewind_to(&mut self, offset: usize) {
        let mut chars = self.source.char_indices();
        while chars.clone().next().is_some_and(|(i, _)| i < offset) {
            chars.next();
        }
        self.chars = chars;
        self.peeked = self.chars.next();
    }

    fn single(&mut self, token: Token, start: usize) -> LexedToken {
        let (_, c) = self.bump().expect("caller already peeked a character");
        LexedToken {
            token,
            start,
            end: start + c.len_utf8(),
        }
    }

    fn dot_leads_number(&self) -> bool {
        let mut lookahead = self.chars.clone();
        lookahead.next().is_some_and(|(_, c)| c.is_ascii_digit())
    }

    fn scan_identifier(&mut self, start: usize) -> LexedToken {
        let mut end = start;
        while let Some(c) = self.peek_char() {
            if !is_id_continue(c) {
                break;
            }
            let (i, c) = self.bump().unwrap();
            end = i + c.len_utf8();
        }
        LexedToken {
            token: Token::Identifier,
            start,
            end,
        }
    }

    // Handles INTEGER, UDOUBLE and PERCENT, following the state machine in the component
    // design: IntegerPart -> (`.` -> FractionPart) -> (`%` -> emit PERCENT)
    fn scan_number(&mut self, start: usize, mut state: NumberState) -> LexedToken {
        let mut end = start;
        if state == NumberState::FractionPart {
            // leading-dot form: consume the `.` itself before the digits
            let (i, c) = self.bump().unwrap();
            end = i + c.len_utf8();
        }
        loop {
            match self.peek_char() {
                Some(c) if c.is_ascii_digit() => {
                    let (i, c) = self.bump().unwrap();
                    end = i + c.len_utf8();
                }
                Some('.') if state == NumberState::IntegerPart => {
                    let (i, c) = self.bump().unwrap();
                    end = i + c.len_utf8();
                    state = NumberState::FractionPart;
                }
                Some('%') => {
                    let (i, c) = self.bump().unwrap();
                    end = i + c.len_utf8();
                    return LexedToken {
                        token: Token::Percent,
                        start,
                        end,
                    };
                }
                _ => break,
            }
        }
        let token = match state {
            NumberState::IntegerPart => Token::Integer,
            NumberState::FractionPart => Token::UDouble,
        };
        LexedToken { token, start, end }
    }
}

impl Iterator for GradeLexer<'_> {
    type Item = LexedToken;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.skip_trivia();

        let Some(c) = self.peek_char() else {
            if self.emitted_eof {
                return None;
            }
            self.emitted_eof = true;
            return Some(LexedToken {
                token: Token::EndOfFile,
                start,
                end: start,
            });
        };

        match c {
            ':' => Some(self.single(Token::Colon, start)),
            '(' => Some(self.single(Token::LParen, start)),
            ')' => Some(self.single(Token::RParen, start)),
            '{' => Some(self.single(Token::LBrace, start)),
            '}' => Some(self.single(Token::RBrace, start)),
            c if is_id_start(c) => Some(self.scan_identifier(start)),
            c if c.is_ascii_digit() => Some(self.scan_number(start, NumberState::IntegerPart)),
            '.' if self.dot_leads_number() => {
                Some(self.scan_number(start, NumberState::FractionPart))
            }
            _ => Some(self.single(Token::Unknown, start)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<(Token, &str)> {
        GradeLexer::new(source)
            .map(|t| (t.token, t.slice(source)))
            .collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(tokens(""), vec![(Token::EndOfFile, "")]);
    }

    #[test]
    fn category_declaration() {
        assert_eq!(
            tokens("hw: 80%"),
            vec![
                (Token::Identifier, "hw"),
                (Token::Colon, ":"),
                (Token::Percent, "80%"),
                (Token::EndOfFile, ""),
            ]
        );
    }

    #[test]
    fn integer_vs_double() {
        assert_eq!(
            tokens("3 3.0 .5 3."),
            vec![
                (Token::Integer, "3"),
                (Token::UDouble, "3.0"),
                (Token::UDouble, ".5"),
                (Token::UDouble, "3."),
                (Token::EndOfFile, ""),
            ]
        );
    }

    #[test]
    fn bare_dot_is_unknown() {
        assert_eq!(
            tokens(". a"),
            vec![
                (Token::Unknown, "."),
                (Token::Identifier, "a"),
                (Token::EndOfFile, ""),
            ]
        );
    }

    #[test]
    fn percent_with_fractional_body() {
        assert_eq!(
            tokens("12.5%"),
            vec![(Token::Percent, "12.5%"), (Token::EndOfFile, "")]
        );
    }

    #[test]
    fn identifier_with_slash_and_dot() {
        assert_eq!(
            tokens("hw/1.2:"),
            vec![
                (Token::Identifier, "hw/1.2"),
                (Token::Colon, ":"),
                (Token::EndOfFile, ""),
            ]
        );
    }

    #[test]
    fn line_comment_to_eof() {
        assert_eq!(
            tokens("a // trailing comment, no newline"),
            vec![(Token::Identifier, "a"), (Token::EndOfFile, "")]
        );
    }

    #[test]
    fn block_comment_is_skipped() {
        assert_eq!(
            tokens("a /* skip this */ b"),
            vec![
                (Token::Identifier, "a"),
                (Token::Identifier, "b"),
                (Token::EndOfFile, ""),
            ]
        );
    }

    #[test]
    fn unterminated_block_comment_rewinds_to_opening_slash() {
        // The scanner must not swallow the rest of the input; it rewinds to the `/`
        // and emits it as the start of a new token (here, an identifier, since `/`
        // is also a valid identifier-start character).
        let toks = tokens("a /* never closed");
        assert_eq!(toks[0], (Token::Identifier, "a"));
        assert_eq!(toks[1].1.as_bytes()[0], b'/');
    }

    #[test]
    fn byte_offsets_are_non_decreasing() {
        let toks: Vec<_> = GradeLexer::new("foo: { 1 2:3 } // trailing\nbar: foo").collect();
        let mut last = 0;
        for t in &toks {
            assert!(t.start >= last, "offsets went backwards");
            last = t.start;
        }
        assert_eq!(toks.last().unwrap().token, Token::EndOfFile);
    }

    #[test]
    fn unknown_token_for_stray_character() {
        assert_eq!(
            tokens("a ; b"),
            vec![
                (Token::Identifier, "a"),
                (Token::Unknown, ";"),
                (Token::Identifier, "b"),
                (Token::EndOfFile, ""),
            ]
        );
    }
}
