// ABOUTME: Parser module building heap-allocated S-expression trees from tokens

use crate::error::EvalError;
use crate::heap::{Heap, Ref};
use crate::tokenizer::{Token, Tokenizer};
use crate::value::{Pair, Value};

const QUOTE: &str = "quote";

/// A recursive-descent parser over a [`Tokenizer`], building heap-allocated
/// Pair trees. The parser never evaluates; it only constructs.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            tokenizer: Tokenizer::new(source),
        }
    }

    /// Reads exactly one expression, then requires end-of-stream.
    pub fn read(&mut self, heap: &mut Heap) -> Result<Ref, EvalError> {
        let expr = self.read_expr(heap)?;
        if !self.tokenizer.is_end()? {
            return Err(EvalError::syntax("extra input after expression"));
        }
        Ok(expr)
    }

    fn read_expr(&mut self, heap: &mut Heap) -> Result<Ref, EvalError> {
        let token = self
            .tokenizer
            .current()?
            .cloned()
            .ok_or_else(|| EvalError::syntax("unexpected end of input"))?;

        match token {
            Token::CloseParen => Err(EvalError::syntax("unmatched close paren")),
            Token::OpenParen => self.read_list(heap),
            Token::Integer(n) => {
                self.tokenizer.advance()?;
                Ok(Some(heap.allocate(Value::Number(n))))
            }
            Token::Ident(name) => {
                self.tokenizer.advance()?;
                Ok(Some(heap.allocate(Value::Symbol(name))))
            }
            Token::Quote => {
                self.tokenizer.advance()?;
                let inner = self.read_expr(heap)?;
                let quote_sym = heap.allocate(Value::Symbol(QUOTE.to_string()));
                let inner_cell = heap.allocate(Value::Pair(Pair {
                    car: inner,
                    cdr: None,
                }));
                Ok(Some(heap.allocate(Value::Pair(Pair {
                    car: Some(quote_sym),
                    cdr: Some(inner_cell),
                }))))
            }
            Token::Dot => Err(EvalError::syntax("unexpected '.'")),
        }
    }

    /// Consumes the leading `(` and reads elements until `)`.
    fn read_list(&mut self, heap: &mut Heap) -> Result<Ref, EvalError> {
        self.tokenizer.advance()?; // consume '('

        let mut head: Ref = None;
        let mut tail: Option<crate::heap::Handle> = None;

        loop {
            if self.tokenizer.is_end()? {
                return Err(EvalError::syntax("no matching close paren"));
            }
            let token = self.tokenizer.current()?.cloned().unwrap();

            match token {
                Token::CloseParen => {
                    self.tokenizer.advance()?;
                    return Ok(head);
                }
                Token::Dot => {
                    if tail.is_none() {
                        return Err(EvalError::syntax(
                            "improper list initialization without first element",
                        ));
                    }
                    self.tokenizer.advance()?;
                    if self.tokenizer.is_end()? {
                        return Err(EvalError::syntax(
                            "improper list initialization without second element",
                        ));
                    }
                    let terminator = self.read_expr(heap)?;
                    if self.tokenizer.is_end()? {
                        return Err(EvalError::syntax("no matching close paren"));
                    }
                    let closing = self.tokenizer.current()?.cloned().unwrap();
                    if closing != Token::CloseParen {
                        return Err(EvalError::syntax(
                            "expected close paren after dotted tail",
                        ));
                    }
                    self.tokenizer.advance()?;
                    if let Value::Pair(pair) = heap.get_mut(tail.unwrap()) {
                        pair.cdr = terminator;
                    }
                    return Ok(head);
                }
                _ => {
                    let element = self.read_expr(heap)?;
                    let cell = heap.allocate(Value::Pair(Pair {
                        car: element,
                        cdr: None,
                    }));
                    match tail {
                        None => {
                            head = Some(cell);
                            tail = Some(cell);
                        }
                        Some(last) => {
                            if let Value::Pair(pair) = heap.get_mut(last) {
                                pair.cdr = Some(cell);
                            }
                            tail = Some(cell);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::serialize;

    fn parse_and_serialize(source: &str) -> String {
        let mut heap = Heap::new();
        let mut parser = Parser::new(source);
        let expr = parser.read(&mut heap).unwrap();
        serialize(&heap, expr).unwrap()
    }

    #[test]
    fn parses_a_number() {
        assert_eq!(parse_and_serialize("42"), "42");
        assert_eq!(parse_and_serialize("-7"), "-7");
    }

    #[test]
    fn parses_a_symbol() {
        assert_eq!(parse_and_serialize("foo"), "foo");
    }

    #[test]
    fn parses_the_empty_list_as_nil() {
        assert_eq!(parse_and_serialize("()"), "()");
    }

    #[test]
    fn parses_a_proper_list() {
        assert_eq!(parse_and_serialize("(1 2 3)"), "(1 2 3)");
    }

    #[test]
    fn parses_nested_lists() {
        assert_eq!(parse_and_serialize("(1 (2 3) 4)"), "(1 (2 3) 4)");
    }

    #[test]
    fn parses_a_dotted_pair() {
        assert_eq!(parse_and_serialize("(1 . 2)"), "(1 . 2)");
    }

    #[test]
    fn parses_an_improper_list_with_multiple_elements() {
        assert_eq!(parse_and_serialize("(1 2 . 3)"), "(1 2 . 3)");
    }

    #[test]
    fn quote_sugar_expands_to_quote_form() {
        assert_eq!(parse_and_serialize("'x"), "(quote x)");
        assert_eq!(parse_and_serialize("'(1 2)"), "(quote (1 2))");
    }

    #[test]
    fn rejects_extra_input_after_top_level_expression() {
        let mut heap = Heap::new();
        let mut parser = Parser::new("1 2");
        assert!(parser.read(&mut heap).is_err());
    }

    #[test]
    fn rejects_unbalanced_open_paren() {
        let mut heap = Heap::new();
        let mut parser = Parser::new("(+ 1 2");
        assert!(parser.read(&mut heap).is_err());
    }

    #[test]
    fn rejects_unmatched_close_paren() {
        let mut heap = Heap::new();
        let mut parser = Parser::new(")");
        assert!(parser.read(&mut heap).is_err());
    }

    #[test]
    fn rejects_dot_without_preceding_element() {
        let mut heap = Heap::new();
        let mut parser = Parser::new("(. 1)");
        assert!(parser.read(&mut heap).is_err());
    }

    #[test]
    fn rejects_empty_source() {
        let mut heap = Heap::new();
        let mut parser = Parser::new("");
        assert!(parser.read(&mut heap).is_err());
    }
}
