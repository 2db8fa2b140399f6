//! Recursive descent parser producing the pseudocode AST.
//!
//! Statement dispatch is by leading keyword; block bodies run until their
//! matching `End` token. Expressions use a binding-power loop over the
//! precedence ladder `Or < And < equality < relational < additive <
//! multiplicative`, with unary and postfix productions below that. A bare `=`
//! outside `Set` parses as equality; `Set` itself consumes its first `=` as
//! the assignment operator. `^` has no production and surfaces as a syntax
//! error.

use crate::compiler::ast::{
    BinaryOp, Declarator, DisplayItem, Expr, Literal, Parameter, Program, Stmt, UnaryOp,
};
use crate::compiler::tokens::{Token, TokenKind};
use gaddis_core::DataType;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token '{found}'; expected {expected}")]
    Unexpected {
        found: String,
        expected: String,
        line: usize,
    },
    #[error("Invalid assignment target; expected a variable or array element")]
    InvalidAssignmentTarget { line: usize },
    #[error("Display cannot begin with Tap")]
    LeadingTap { line: usize },
    #[error("Constant '{name}' requires an initializer")]
    ConstantWithoutInitializer { name: String, line: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Unexpected { line, .. }
            | ParseError::InvalidAssignmentTarget { line }
            | ParseError::LeadingTap { line }
            | ParseError::ConstantWithoutInitializer { line, .. } => *line,
        }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    // ── Cursor helpers ──

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|k| self.check(k))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let found = if token.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            token.lexeme.clone()
        };
        ParseError::Unexpected {
            found,
            expected: expected.to_string(),
            line: token.line,
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<(String, usize), ParseError> {
        if let TokenKind::Identifier(name) = self.peek_kind() {
            let name = name.clone();
            let line = self.peek().line;
            self.advance();
            Ok((name, line))
        } else {
            Err(self.unexpected(expected))
        }
    }

    // ── Statements ──

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            TokenKind::Module => self.parse_module(),
            TokenKind::Function => self.parse_function(),
            TokenKind::Declare => self.parse_variable_declaration(false),
            TokenKind::Constant => self.parse_variable_declaration(true),
            TokenKind::Set => self.parse_set(),
            TokenKind::Display => self.parse_display(),
            TokenKind::Input => self.parse_input(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do(),
            TokenKind::For => self.parse_for(),
            TokenKind::Call => self.parse_call(),
            TokenKind::Return => self.parse_return(),
            _ => Err(self.unexpected("a statement")),
        }
    }

    /// Parse statements until one of `terminators` is next. The terminator
    /// itself is left for the caller to consume.
    fn parse_block(
        &mut self,
        terminators: &[TokenKind],
        expected: &str,
    ) -> Result<Vec<Stmt>, ParseError> {
        let mut body = Vec::new();
        while !self.check_any(terminators) {
            if self.check(&TokenKind::Eof) {
                return Err(self.unexpected(expected));
            }
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }

    fn parse_module(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::Module, "'Module'")?.line;
        let (name, _) = self.expect_identifier("a module name")?;
        let params = self.parse_parameters()?;
        let body = self.parse_block(&[TokenKind::EndModule], "'End Module'")?;
        self.expect(&TokenKind::EndModule, "'End Module'")?;
        Ok(Stmt::Module {
            name,
            params,
            body,
            line,
        })
    }

    fn parse_function(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::Function, "'Function'")?.line;
        let return_type = self
            .parse_type_keyword()
            .ok_or_else(|| self.unexpected("a return type"))?;
        let (name, _) = self.expect_identifier("a function name")?;
        let params = self.parse_parameters()?;
        let body = self.parse_block(&[TokenKind::EndFunction], "'End Function'")?;
        self.expect(&TokenKind::EndFunction, "'End Function'")?;
        Ok(Stmt::Function {
            name,
            return_type,
            params,
            body,
            line,
        })
    }

    fn parse_type_keyword(&mut self) -> Option<DataType> {
        let data_type = match self.peek_kind() {
            TokenKind::IntegerType => DataType::Integer,
            TokenKind::RealType => DataType::Real,
            TokenKind::StringType => DataType::String,
            _ => return None,
        };
        self.advance();
        Some(data_type)
    }

    fn parse_parameters(&mut self) -> Result<Vec<Parameter>, ParseError> {
        self.expect(&TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.parse_parameter()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;
        Ok(params)
    }

    /// `Ref` may come before or after the type keyword; a missing type means
    /// the parameter's type is resolved from the argument at call time.
    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        let mut is_reference = false;
        let mut data_type = DataType::Auto;
        loop {
            match self.peek_kind() {
                TokenKind::Ref if !is_reference => {
                    self.advance();
                    is_reference = true;
                }
                TokenKind::IntegerType | TokenKind::RealType | TokenKind::StringType
                    if data_type == DataType::Auto =>
                {
                    data_type = self.parse_type_keyword().unwrap_or(DataType::Auto);
                }
                _ => break,
            }
        }
        let (name, _) = self.expect_identifier("a parameter name")?;
        let mut is_array = false;
        if self.check(&TokenKind::LBracket) {
            self.advance();
            self.expect(&TokenKind::RBracket, "']'")?;
            is_array = true;
        }
        Ok(Parameter {
            name,
            data_type,
            is_reference,
            is_array,
        })
    }

    fn parse_variable_declaration(&mut self, is_constant: bool) -> Result<Stmt, ParseError> {
        let keyword = if is_constant { "'Constant'" } else { "'Declare'" };
        let line = self.advance().line;
        let data_type = self
            .parse_type_keyword()
            .ok_or_else(|| self.unexpected(&format!("a type after {}", keyword)))?;
        let mut declarators = Vec::new();
        loop {
            let (name, name_line) = self.expect_identifier("a variable name")?;
            let mut size = None;
            if self.check(&TokenKind::LBracket) {
                self.advance();
                size = Some(self.parse_expression()?);
                self.expect(&TokenKind::RBracket, "']'")?;
            }
            let mut initializer = None;
            if self.check(&TokenKind::Assign) {
                self.advance();
                if size.is_some() {
                    // Array initializer: every remaining comma-separated
                    // expression belongs to the value list.
                    let mut elements = vec![self.parse_expression()?];
                    while self.check(&TokenKind::Comma) {
                        self.advance();
                        elements.push(self.parse_expression()?);
                    }
                    initializer = Some(Expr::ArrayLiteral {
                        elements,
                        line: name_line,
                    });
                } else {
                    initializer = Some(self.parse_expression()?);
                }
            } else if is_constant {
                return Err(ParseError::ConstantWithoutInitializer {
                    name,
                    line: name_line,
                });
            }
            let is_array_init = size.is_some() && initializer.is_some();
            declarators.push(Declarator {
                name,
                size,
                initializer,
            });
            if is_array_init || !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(Stmt::VariableDeclaration {
            data_type,
            is_constant,
            declarators,
            line,
        })
    }

    fn parse_set(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::Set, "'Set'")?.line;
        let target = self.parse_postfix()?;
        if !matches!(target, Expr::Identifier { .. } | Expr::ArrayAccess { .. }) {
            return Err(ParseError::InvalidAssignmentTarget {
                line: target.line(),
            });
        }
        self.expect(&TokenKind::Assign, "'='")?;
        let value = self.parse_expression()?;
        Ok(Stmt::Assignment {
            target,
            value,
            line,
        })
    }

    fn parse_display(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::Display, "'Display'")?.line;
        if self.check(&TokenKind::Tap) {
            return Err(ParseError::LeadingTap {
                line: self.peek().line,
            });
        }
        let mut items = vec![DisplayItem::Expr(self.parse_expression()?)];
        while self.check(&TokenKind::Comma) {
            self.advance();
            if self.check(&TokenKind::Tap) {
                self.advance();
                items.push(DisplayItem::Tap);
            } else {
                items.push(DisplayItem::Expr(self.parse_expression()?));
            }
        }
        Ok(Stmt::Display { items, line })
    }

    fn parse_input(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::Input, "'Input'")?.line;
        let (name, _) = self.expect_identifier("a variable name")?;
        Ok(Stmt::Input { name, line })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::If, "'If'")?.line;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::Then, "'Then'")?;
        let then_body = self.parse_block(
            &[TokenKind::Else, TokenKind::EndIf],
            "'Else' or 'End If'",
        )?;
        let else_body = if self.check(&TokenKind::Else) {
            self.advance();
            if self.check(&TokenKind::If) {
                // `Else If` chains nest in place of the else block; the inner
                // If consumes the single shared `End If`.
                Some(vec![self.parse_if()?])
            } else {
                let body = self.parse_block(&[TokenKind::EndIf], "'End If'")?;
                self.expect(&TokenKind::EndIf, "'End If'")?;
                Some(body)
            }
        } else {
            self.expect(&TokenKind::EndIf, "'End If'")?;
            None
        };
        Ok(Stmt::If {
            condition,
            then_body,
            else_body,
            line,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::While, "'While'")?.line;
        let condition = self.parse_expression()?;
        let body = self.parse_block(&[TokenKind::EndWhile], "'End While'")?;
        self.expect(&TokenKind::EndWhile, "'End While'")?;
        Ok(Stmt::While {
            condition,
            body,
            line,
        })
    }

    fn parse_do(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::Do, "'Do'")?.line;
        let body = self.parse_block(
            &[TokenKind::While, TokenKind::Until],
            "'While' or 'Until'",
        )?;
        if self.check(&TokenKind::While) {
            self.advance();
            let condition = self.parse_expression()?;
            Ok(Stmt::DoWhile {
                body,
                condition,
                line,
            })
        } else {
            self.expect(&TokenKind::Until, "'While' or 'Until'")?;
            let condition = self.parse_expression()?;
            Ok(Stmt::DoUntil {
                body,
                condition,
                line,
            })
        }
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::For, "'For'")?.line;
        let (counter, _) = self.expect_identifier("a counter variable")?;
        self.expect(&TokenKind::Assign, "'='")?;
        let start = self.parse_expression()?;
        self.expect(&TokenKind::To, "'To'")?;
        let end = self.parse_expression()?;
        let body = self.parse_block(&[TokenKind::EndFor], "'End For'")?;
        self.expect(&TokenKind::EndFor, "'End For'")?;
        Ok(Stmt::For {
            counter,
            start,
            end,
            body,
            line,
        })
    }

    fn parse_call(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::Call, "'Call'")?.line;
        let (name, _) = self.expect_identifier("a module name")?;
        self.expect(&TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;
        Ok(Stmt::Call { name, args, line })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::Return, "'Return'")?.line;
        let value = self.parse_expression()?;
        Ok(Stmt::Return { value, line })
    }

    // ── Expressions ──

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let (op, l_bp, r_bp) = match self.peek_kind() {
                TokenKind::Or => (BinaryOp::Or, 1, 2),
                TokenKind::And => (BinaryOp::And, 3, 4),
                // A bare `=` in expression position is equality.
                TokenKind::Equal | TokenKind::Assign => (BinaryOp::Equal, 5, 6),
                TokenKind::NotEqual => (BinaryOp::NotEqual, 5, 6),
                TokenKind::Less => (BinaryOp::Less, 7, 8),
                TokenKind::LessEqual => (BinaryOp::LessEqual, 7, 8),
                TokenKind::Greater => (BinaryOp::Greater, 7, 8),
                TokenKind::GreaterEqual => (BinaryOp::GreaterEqual, 7, 8),
                TokenKind::Plus => (BinaryOp::Add, 9, 10),
                TokenKind::Minus => (BinaryOp::Subtract, 9, 10),
                TokenKind::Star => (BinaryOp::Multiply, 11, 12),
                TokenKind::Slash => (BinaryOp::Divide, 11, 12),
                TokenKind::Percent | TokenKind::Mod => (BinaryOp::Modulo, 11, 12),
                _ => break,
            };
            if l_bp < min_bp {
                break;
            }
            let line = self.advance().line;
            let rhs = self.parse_binary(r_bp)?;
            lhs = Expr::Binary {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
                line,
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let line = self.advance().line;
        let right = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            right: Box::new(right),
            line,
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    let line = self.advance().line;
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expression()?);
                            if self.check(&TokenKind::Comma) {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(&TokenKind::RParen, "')'")?;
                    expr = Expr::FunctionCall {
                        callee: Box::new(expr),
                        args,
                        line,
                    };
                }
                TokenKind::LBracket => {
                    let line = self.advance().line;
                    let index = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket, "']'")?;
                    expr = Expr::ArrayAccess {
                        array: Box::new(expr),
                        index: Box::new(index),
                        line,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Number(value) => {
                let token = self.advance();
                let literal = if token.lexeme.contains('.') {
                    Literal::Real(value)
                } else {
                    token
                        .lexeme
                        .parse::<i64>()
                        .map(Literal::Integer)
                        .unwrap_or(Literal::Real(value))
                };
                Ok(Expr::Literal {
                    value: literal,
                    line: token.line,
                })
            }
            TokenKind::String(text) => {
                let token = self.advance();
                Ok(Expr::Literal {
                    value: Literal::String(text),
                    line: token.line,
                })
            }
            TokenKind::Identifier(name) => {
                let token = self.advance();
                Ok(Expr::Identifier {
                    name,
                    line: token.line,
                })
            }
            TokenKind::LParen => {
                let line = self.advance().line;
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(Expr::Grouping {
                    inner: Box::new(inner),
                    line,
                })
            }
            _ => Err(self.unexpected("an expression")),
        }
    }
}

/// Parse a token stream into a program.
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}
