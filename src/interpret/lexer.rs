//! Prompt lexer
//!
//! Splits a lower-cased prompt into words, integers and punctuation. Numbers
//! and unit suffixes are separate tokens (`150mm` is `150`, `mm`), which lets
//! the extraction rules match on whole words only.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    /// Integer value; any fractional part is truncated
    Number(u32),
    Punct(char),
}

/// Lower-case and tokenize a prompt
pub fn tokenize(prompt: &str) -> Vec<Token> {
    let lowered = prompt.to_lowercase();
    Lexer::new(&lowered).tokenize()
}

#[derive(Debug)]
struct Lexer<'a> {
    source: &'a str,
    index: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, index: 0 }
    }

    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance_char();
                continue;
            }

            if ch.is_alphabetic() {
                tokens.push(self.lex_word());
            } else if ch.is_ascii_digit() {
                tokens.push(self.lex_number());
            } else {
                self.advance_char();
                tokens.push(Token::Punct(ch));
            }
        }

        tokens
    }

    fn lex_word(&mut self) -> Token {
        let start = self.index;
        while self.peek_char().map(char::is_alphabetic).unwrap_or(false) {
            self.advance_char();
        }
        Token::Word(self.source[start..self.index].to_string())
    }

    fn lex_number(&mut self) -> Token {
        let mut value: u32 = 0;
        while let Some(digit) = self.peek_char().and_then(|ch| ch.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(digit);
            self.advance_char();
        }

        // "12.5mm" keeps 12; the fraction is consumed so it does not become a number of its own
        if self.peek_char() == Some('.')
            && self
                .peek_second_char()
                .map(|next| next.is_ascii_digit())
                .unwrap_or(false)
        {
            self.advance_char();
            while self
                .peek_char()
                .map(|ch| ch.is_ascii_digit())
                .unwrap_or(false)
            {
                self.advance_char();
            }
        }

        Token::Number(value)
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.index..].chars().next()
    }

    fn peek_second_char(&self) -> Option<char> {
        let mut chars = self.source[self.index..].chars();
        chars.next()?;
        chars.next()
    }

    fn advance_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.index += ch.len_utf8();
        Some(ch)
    }
}
