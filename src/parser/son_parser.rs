// src/parser/son_parser.rs
//! The recursive-descent graph builder.
//!
//! There is no AST: each production constructs graph nodes directly and
//! immediately peepholes them, threading the current control node through
//! the scope's `$ctrl` slot and collecting every `return` into a single
//! Stop node. Errors abort the parse; the partially built graph goes away
//! with the dropped arena.
use crate::error::parse_error::ParseError;
use crate::lexer;
use crate::location::line_tracker::LineTracker;
use crate::location::source_span::SourceSpan;
use crate::printers::dot_printer;
use crate::son::graph::SonGraph;
use crate::son::node::{NodeId, NodeKind};
use crate::son::scope::{ARG0, CTRL};
use crate::son::types::{Int, Type};
use crate::son::verify::GraphVerifier;
use crate::tokens::token::Token;
use crate::tokens::token_kind::TokenKind;

/// The result of a successful parse: the graph, its Stop node, and any dot
/// snapshots taken by `#showGraph` statements.
#[derive(Debug)]
pub struct ParsedProgram {
    pub graph: SonGraph,
    pub stop: NodeId,
    pub dot_snapshots: Vec<String>,
}

impl ParsedProgram {
    #[must_use]
    pub const fn start(&self) -> NodeId {
        self.graph.start()
    }

    /// Prints the program's returns; a single return prints bare, several
    /// print as `Stop[ ... ]`.
    #[must_use]
    pub fn print(&self) -> String {
        self.graph.print(self.stop)
    }

    /// Runs the structural invariant checks, seeded from Start and Stop.
    pub fn verify(&self) -> Result<(), Vec<String>> {
        GraphVerifier::new(&self.graph).verify(&[self.graph.start(), self.stop])
    }
}

pub struct SonParser {
    tokens: Vec<Token>,
    current: usize,
    line_tracker: LineTracker,
    graph: SonGraph,
    /// The active scope node. Swapped out while parsing the arms of an if.
    scope: NodeId,
    stop: NodeId,
    /// Every live scope, for graph snapshots while a branch is in flight.
    x_scopes: Vec<NodeId>,
    dot_snapshots: Vec<String>,
}

impl SonParser {
    /// Lexes `source` eagerly and prepares a graph whose `arg` is an
    /// unconstrained integer.
    pub fn new(file_path: &str, source: &str) -> Result<Self, ParseError> {
        Self::with_arg(file_path, source, Type::Int(Int::Bot))
    }

    /// As [`SonParser::new`], but seeds the start argument with a given
    /// lattice type, e.g. a constant to specialize the parse.
    pub fn with_arg(file_path: &str, source: &str, arg: Type) -> Result<Self, ParseError> {
        let (tokens, line_tracker) = lexer::tokenize(file_path, source)?;
        let mut graph = SonGraph::new(arg);
        let scope = graph.new_scope();
        let stop = graph.new_stop();
        Ok(Self {
            tokens,
            current: 0,
            line_tracker,
            graph,
            scope,
            stop,
            x_scopes: Vec::new(),
            dot_snapshots: Vec::new(),
        })
    }

    /// Observation mode: build the graph without rewriting it.
    pub fn disable_peephole(&mut self) {
        self.graph.set_peephole_disabled(true);
    }

    #[must_use]
    pub const fn line_tracker(&self) -> &LineTracker {
        &self.line_tracker
    }

    /// Parses the whole program.
    pub fn parse(mut self) -> Result<ParsedProgram, ParseError> {
        self.x_scopes.push(self.scope);
        self.graph.scope_push(self.scope);
        let start = self.graph.start();
        let ctrl = self.graph.new_proj(start, 0, CTRL);
        let ctrl = self.graph.peephole(ctrl);
        self.graph.scope_define(self.scope, CTRL, ctrl);
        let arg = self.graph.new_proj(start, 1, ARG0);
        let arg = self.graph.peephole(arg);
        self.graph.scope_define(self.scope, ARG0, arg);

        self.parse_block()?;
        self.graph.scope_pop(self.scope);
        self.x_scopes.pop();

        if !self.is_at_end() {
            let token = self.peek();
            return Err(ParseError::Unexpected {
                found: token.kind.to_string(),
                span: token.span.clone(),
            });
        }
        let stop = self.stop;
        self.graph.peephole(stop);
        Ok(ParsedProgram { graph: self.graph, stop, dot_snapshots: self.dot_snapshots })
    }

    // ----- statements ------------------------------------------------------

    /// Statements until `}` or end of input. The braces themselves belong
    /// to the caller.
    fn parse_block(&mut self) -> Result<(), ParseError> {
        self.graph.scope_push(self.scope);
        while !self.check(&TokenKind::CloseBrace) && !self.is_at_end() {
            self.parse_statement()?;
        }
        self.graph.scope_pop(self.scope);
        Ok(())
    }

    fn parse_statement(&mut self) -> Result<(), ParseError> {
        if self.match_token(&TokenKind::KeywordReturn) {
            return self.parse_return();
        }
        if self.match_token(&TokenKind::KeywordInt) {
            return self.parse_decl();
        }
        if self.match_token(&TokenKind::OpenBrace) {
            self.parse_block()?;
            return self.expect(&TokenKind::CloseBrace, "}");
        }
        if self.match_token(&TokenKind::KeywordIf) {
            return self.parse_if();
        }
        if self.match_token(&TokenKind::ShowGraph) {
            self.snapshot_graph();
            return self.expect(&TokenKind::Semicolon, ";");
        }
        self.parse_expression_statement()
    }

    /// `if ( expression ) statement (else statement)?`
    ///
    /// The scope is cloned before the arms; each arm parses against its own
    /// copy with control retargeted to the matching If projection, and the
    /// two copies merge back into a Region afterwards.
    fn parse_if(&mut self) -> Result<(), ParseError> {
        self.expect(&TokenKind::OpenParen, "(")?;
        let pred = self.parse_expression()?;
        self.expect(&TokenKind::CloseParen, ")")?;

        let ctrl = self.graph.scope_ctrl(self.scope);
        let if_node = self.graph.new_if(ctrl, pred);
        let if_node = self.graph.peephole(if_node);
        let if_true = self.graph.new_proj(if_node, 0, "True");
        let if_true = self.graph.peephole(if_true);
        let if_false = self.graph.new_proj(if_node, 1, "False");
        let if_false = self.graph.peephole(if_false);

        // Arity snapshot: neither arm may add definitions that survive it
        let ndefs = self.graph.num_inputs(self.scope);
        let false_scope = self.graph.scope_dup(self.scope);
        self.x_scopes.push(false_scope);

        // True side
        self.graph.scope_set_ctrl(self.scope, Some(if_true));
        self.parse_statement()?;
        let true_scope = self.scope;

        // False side; without an else it keeps the pre-if bindings
        self.scope = false_scope;
        self.graph.scope_set_ctrl(self.scope, Some(if_false));
        if self.match_token(&TokenKind::KeywordElse) {
            self.parse_statement()?;
        }

        if self.graph.num_inputs(true_scope) != ndefs
            || self.graph.num_inputs(self.scope) != ndefs
        {
            return Err(ParseError::UnbalancedIfArms { span: self.peek().span.clone() });
        }

        let false_scope = self.scope;
        self.scope = true_scope;
        self.x_scopes.pop();
        self.graph.scope_merge(true_scope, false_scope);
        Ok(())
    }

    /// `return expression ;` — the Return joins Stop and the current
    /// control dies, so anything only reachable past this point unwinds.
    fn parse_return(&mut self) -> Result<(), ParseError> {
        let expr = self.parse_expression()?;
        self.expect(&TokenKind::Semicolon, ";")?;
        let ctrl = self.graph.scope_ctrl(self.scope);
        let ret = self.graph.new_return(ctrl, expr);
        let ret = self.graph.peephole(ret);
        self.graph.add_def(self.stop, Some(ret));
        self.graph.scope_set_ctrl(self.scope, None);
        Ok(())
    }

    /// `int name = expression ;`
    fn parse_decl(&mut self) -> Result<(), ParseError> {
        let (name, span) = self.require_identifier()?;
        self.expect(&TokenKind::Equal, "=")?;
        let expr = self.parse_expression()?;
        self.expect(&TokenKind::Semicolon, ";")?;
        if !self.graph.scope_define(self.scope, &name, expr) {
            return Err(ParseError::RedefinedName { name, span });
        }
        Ok(())
    }

    /// `name = expression ;`
    fn parse_expression_statement(&mut self) -> Result<(), ParseError> {
        let (name, span) = self.require_identifier()?;
        self.expect(&TokenKind::Equal, "=")?;
        let expr = self.parse_expression()?;
        self.expect(&TokenKind::Semicolon, ";")?;
        if self.graph.scope_update(self.scope, &name, expr).is_none() {
            return Err(ParseError::UndefinedName { name, span });
        }
        Ok(())
    }

    fn snapshot_graph(&mut self) {
        let dot = dot_printer::generate_dot(&self.graph, &self.x_scopes, self.line_tracker.source());
        self.dot_snapshots.push(dot);
    }

    // ----- expressions -----------------------------------------------------

    fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        self.parse_comparison()
    }

    /// `add (('==' | '!=' | '<' | '<=' | '>' | '>=') add)?`
    ///
    /// `a > b` and `a >= b` build `b < a` and `b <= a`; `!=` builds a
    /// negated `==`.
    fn parse_comparison(&mut self) -> Result<NodeId, ParseError> {
        let lhs = self.parse_addition()?;
        let node = if self.match_token(&TokenKind::EqualEqual) {
            let rhs = self.parse_addition()?;
            self.graph.new_binary(NodeKind::Eq, lhs, rhs)
        } else if self.match_token(&TokenKind::NotEqual) {
            let rhs = self.parse_addition()?;
            let eq = self.graph.new_binary(NodeKind::Eq, lhs, rhs);
            let eq = self.graph.peephole(eq);
            self.graph.new_unary(NodeKind::Not, eq)
        } else if self.match_token(&TokenKind::Less) {
            let rhs = self.parse_addition()?;
            self.graph.new_binary(NodeKind::Lt, lhs, rhs)
        } else if self.match_token(&TokenKind::LessEqual) {
            let rhs = self.parse_addition()?;
            self.graph.new_binary(NodeKind::Le, lhs, rhs)
        } else if self.match_token(&TokenKind::Greater) {
            let rhs = self.parse_addition()?;
            self.graph.new_binary(NodeKind::Lt, rhs, lhs)
        } else if self.match_token(&TokenKind::GreaterEqual) {
            let rhs = self.parse_addition()?;
            self.graph.new_binary(NodeKind::Le, rhs, lhs)
        } else {
            return Ok(lhs);
        };
        Ok(self.graph.peephole(node))
    }

    /// `mul (('+' | '-') mul)*`, left-associative
    fn parse_addition(&mut self) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_multiplication()?;
        loop {
            let kind = if self.match_token(&TokenKind::Plus) {
                NodeKind::Add
            } else if self.match_token(&TokenKind::Minus) {
                NodeKind::Sub
            } else {
                return Ok(lhs);
            };
            let rhs = self.parse_multiplication()?;
            let node = self.graph.new_binary(kind, lhs, rhs);
            lhs = self.graph.peephole(node);
        }
    }

    /// `unary (('*' | '/') unary)*`, left-associative
    fn parse_multiplication(&mut self) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let kind = if self.match_token(&TokenKind::Star) {
                NodeKind::Mul
            } else if self.match_token(&TokenKind::Slash) {
                NodeKind::Div
            } else {
                return Ok(lhs);
            };
            let rhs = self.parse_unary()?;
            let node = self.graph.new_binary(kind, lhs, rhs);
            lhs = self.graph.peephole(node);
        }
    }

    /// `'-' unary | primary` — the operand of unary minus is itself a
    /// unary, so `--12` is legal and folds to 12.
    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        if self.match_token(&TokenKind::Minus) {
            let expr = self.parse_unary()?;
            let node = self.graph.new_unary(NodeKind::Minus, expr);
            return Ok(self.graph.peephole(node));
        }
        self.parse_primary()
    }

    /// `NUM | IDENT | '(' expression ')' | 'true' | 'false'`
    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Integer(value) => {
                self.advance();
                let constant = self.graph.new_constant(Type::int(value));
                Ok(self.graph.peephole(constant))
            }
            TokenKind::KeywordTrue => {
                self.advance();
                let constant = self.graph.new_constant(Type::int(1));
                Ok(self.graph.peephole(constant))
            }
            TokenKind::KeywordFalse => {
                self.advance();
                let constant = self.graph.new_constant(Type::int(0));
                Ok(self.graph.peephole(constant))
            }
            TokenKind::OpenParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::CloseParen, ")")?;
                Ok(expr)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                self.graph
                    .scope_lookup(self.scope, &name)
                    .ok_or(ParseError::UndefinedName { name, span: token.span })
            }
            kind => Err(ParseError::Expected {
                expected: "an identifier or expression".to_owned(),
                found: kind.to_string(),
                span: token.span,
            }),
        }
    }

    // ----- token cursor ----------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<(), ParseError> {
        if self.match_token(kind) {
            return Ok(());
        }
        let token = self.peek();
        Err(ParseError::Expected {
            expected: expected.to_owned(),
            found: token.kind.to_string(),
            span: token.span.clone(),
        })
    }

    /// A plain identifier. Reserved keywords are called out by name; any
    /// other token is an ordinary syntax error.
    fn require_identifier(&mut self) -> Result<(String, SourceSpan), ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok((name, token.span))
            }
            kind if kind.is_keyword() => {
                Err(ParseError::ExpectedIdentifier { found: kind.to_string(), span: token.span })
            }
            kind => Err(ParseError::Expected {
                expected: "an identifier".to_owned(),
                found: kind.to_string(),
                span: token.span,
            }),
        }
    }
}
