//! Context-expression evaluation (§4.3): a tiny predicate language over a
//! `{string -> any}` context map, contributed at each dispatch by context
//! providers (`editorFocus`, `terminalFocus`, `vimMode`, ...). Every
//! context entry this dispatcher actually needs is boolean (focus flags,
//! mode flags), so `Context` stores `bool` rather than a fully dynamic
//! value type; `== "literal"` compares against the literal's truthiness.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Context(HashMap<String, bool>);

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.0.insert(key.into(), value);
    }

    pub fn is_truthy(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }
}

impl FromIterator<(String, bool)> for Context {
    fn from_iter<T: IntoIterator<Item = (String, bool)>>(iter: T) -> Self {
        Context(iter.into_iter().collect())
    }
}

/// A minimal recursive-descent parser/evaluator for the grammar:
/// `expr := or_expr`
/// `or_expr := and_expr ("||" and_expr)*`
/// `and_expr := unary ("&&" unary)*`
/// `unary := "!" unary | atom`
/// `atom := "(" expr ")" | ident "==" string-literal | ident`
#[derive(Debug, Clone)]
enum Expr {
    Ident(String),
    Eq(String, String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, ctx: &Context) -> bool {
        match self {
            Expr::Ident(name) => ctx.is_truthy(name),
            // Context values are modeled as booleans here (see module
            // doc); `== "literal"` compares against the literal's
            // truthiness, which covers the common `vimMode == "true"`/
            // `"false"` case the spec names.
            Expr::Eq(name, literal) => ctx.is_truthy(name) == (literal == "true"),
            Expr::Not(inner) => !inner.eval(ctx),
            Expr::And(a, b) => a.eval(ctx) && b.eval(ctx),
            Expr::Or(a, b) => a.eval(ctx) || b.eval(ctx),
        }
    }
}

struct Tokenizer<'a> {
    rest: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    StringLit(String),
    And,
    Or,
    Not,
    EqEq,
    LParen,
    RParen,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Tokenizer { rest: input }
    }

    fn next_token(&mut self) -> Option<Token> {
        self.rest = self.rest.trim_start();
        if self.rest.is_empty() {
            return None;
        }
        if let Some(stripped) = self.rest.strip_prefix("&&") {
            self.rest = stripped;
            return Some(Token::And);
        }
        if let Some(stripped) = self.rest.strip_prefix("||") {
            self.rest = stripped;
            return Some(Token::Or);
        }
        if let Some(stripped) = self.rest.strip_prefix("==") {
            self.rest = stripped;
            return Some(Token::EqEq);
        }
        if let Some(stripped) = self.rest.strip_prefix('!') {
            self.rest = stripped;
            return Some(Token::Not);
        }
        if let Some(stripped) = self.rest.strip_prefix('(') {
            self.rest = stripped;
            return Some(Token::LParen);
        }
        if let Some(stripped) = self.rest.strip_prefix(')') {
            self.rest = stripped;
            return Some(Token::RParen);
        }
        if let Some(stripped) = self.rest.strip_prefix('"') {
            let end = stripped.find('"')?;
            let literal = &stripped[..end];
            self.rest = &stripped[end + 1..];
            return Some(Token::StringLit(literal.to_string()));
        }
        let end = self
            .rest
            .find(|c: char| c.is_whitespace() || "!&|()\"".contains(c))
            .unwrap_or(self.rest.len());
        let (ident, remainder) = self.rest.split_at(end);
        self.rest = remainder;
        if ident.is_empty() {
            return None;
        }
        Some(Token::Ident(ident.to_string()))
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.advance();
            return Some(Expr::Not(Box::new(self.parse_unary()?)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Option<Expr> {
        match self.advance()? {
            Token::LParen => {
                let expr = self.parse_or()?;
                if !matches!(self.advance(), Some(Token::RParen)) {
                    return None;
                }
                Some(expr)
            }
            Token::Ident(name) => {
                if matches!(self.peek(), Some(Token::EqEq)) {
                    self.advance();
                    let Some(Token::StringLit(literal)) = self.advance() else {
                        return None;
                    };
                    Some(Expr::Eq(name, literal))
                } else {
                    Some(Expr::Ident(name))
                }
            }
            _ => None,
        }
    }
}

fn parse_expr(input: &str) -> Option<Expr> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token() {
        tokens.push(token);
    }
    if tokens.is_empty() {
        return None;
    }
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return None;
    }
    Some(expr)
}

/// Evaluate a `when` expression against a context. An expression that
/// fails to parse is treated as never-satisfied (fail closed), logged by
/// the caller rather than here to keep this function pure.
pub fn evaluate(expression: &str, ctx: &Context) -> bool {
    parse_expr(expression).map(|expr| expr.eval(ctx)).unwrap_or(false)
}

/// Whether a `when` expression could *ever* evaluate true — used by the
/// conflict resolver to decide if two context-gated shortcuts can
/// genuinely coexist on a truth table over the identifiers it mentions.
pub fn is_satisfiable(expression: Option<&str>) -> bool {
    match expression {
        None => true,
        Some(expr) => match parse_expr(expr) {
            Some(parsed) => satisfiable(&parsed),
            None => false,
        },
    }
}

fn collect_idents(expr: &Expr, out: &mut Vec<String>) {
    match expr {
        Expr::Ident(name) => out.push(name.clone()),
        Expr::Eq(name, _) => out.push(name.clone()),
        Expr::Not(inner) => collect_idents(inner, out),
        Expr::And(a, b) | Expr::Or(a, b) => {
            collect_idents(a, out);
            collect_idents(b, out);
        }
    }
}

fn satisfiable(expr: &Expr) -> bool {
    let mut idents = Vec::new();
    collect_idents(expr, &mut idents);
    idents.sort();
    idents.dedup();
    let n = idents.len().min(20);
    for mask in 0u32..(1u32 << n) {
        let mut ctx = Context::new();
        for (i, ident) in idents.iter().enumerate() {
            ctx.set(ident.clone(), (mask >> i) & 1 == 1);
        }
        if expr.eval(&ctx) {
            return true;
        }
    }
    n == 0 && expr.eval(&Context::new())
}

/// Whether two `when` expressions are simultaneously satisfiable — used by
/// the conflict resolver for "overlapping contexts".
pub fn contexts_overlap(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, _) | (_, None) => true,
        (Some(a), Some(b)) => {
            let combined = format!("({a}) && ({b})");
            match parse_expr(&combined) {
                Some(expr) => satisfiable(&expr),
                None => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_identifier_is_truthy_lookup() {
        let mut ctx = Context::new();
        ctx.set("editorFocus", true);
        assert!(evaluate("editorFocus", &ctx));
        assert!(!evaluate("terminalFocus", &ctx));
    }

    #[test]
    fn supports_and_or_not_and_equality() {
        let mut ctx = Context::new();
        ctx.set("editorFocus", true);
        ctx.set("vimMode", false);
        assert!(evaluate("editorFocus && !vimMode", &ctx));
        assert!(evaluate("terminalFocus || editorFocus", &ctx));
        assert!(!evaluate("editorFocus && terminalFocus", &ctx));
    }

    #[test]
    fn equality_against_string_literal() {
        let mut ctx = Context::new();
        ctx.set("vimMode", true);
        // only boolean truthiness is modeled; `== "true"` mirrors the bare
        // identifier for boolean-valued context entries.
        assert!(evaluate("vimMode == \"true\"", &ctx));
    }

    #[test]
    fn overlap_detection() {
        assert!(contexts_overlap(Some("editorFocus"), Some("editorFocus")));
        assert!(!contexts_overlap(
            Some("editorFocus"),
            Some("editorFocus && !editorFocus")
        ));
        assert!(contexts_overlap(None, Some("terminalFocus")));
    }
}
