//! Abstract syntax tree for the pseudocode language.
//!
//! Expressions and statements are tagged sum types; every variant carries the
//! 1-based source line it started on. Evaluation is exhaustive pattern
//! matching over these enums; there is no dynamic dispatch.

use gaddis_core::DataType;
use serde::{Deserialize, Serialize};

/// A complete parsed program: the sequence of top-level statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    /// Whether any module declarations exist; if so, `main` is the sole
    /// entry point.
    pub fn has_modules(&self) -> bool {
        self.statements
            .iter()
            .any(|s| matches!(s, Stmt::Module { .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOp {
    /// Source spelling, used by diagnostics and the flowchart renderer.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "MOD",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

/// A literal as it appears in source. Numbers keep their Integer/Real split
/// from the lexeme (`2` vs `2.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Real(f64),
    String(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    Literal {
        value: Literal,
        line: usize,
    },
    Identifier {
        name: String,
        line: usize,
    },
    ArrayLiteral {
        elements: Vec<Expr>,
        line: usize,
    },
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
        line: usize,
    },
    Grouping {
        inner: Box<Expr>,
        line: usize,
    },
    Unary {
        op: UnaryOp,
        right: Box<Expr>,
        line: usize,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        line: usize,
    },
    FunctionCall {
        callee: Box<Expr>,
        args: Vec<Expr>,
        line: usize,
    },
}

impl Expr {
    pub fn line(&self) -> usize {
        match self {
            Expr::Literal { line, .. }
            | Expr::Identifier { line, .. }
            | Expr::ArrayLiteral { line, .. }
            | Expr::ArrayAccess { line, .. }
            | Expr::Grouping { line, .. }
            | Expr::Unary { line, .. }
            | Expr::Binary { line, .. }
            | Expr::FunctionCall { line, .. } => *line,
        }
    }
}

/// One name in a `Declare`/`Constant` list, with optional array size and
/// initializer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declarator {
    pub name: String,
    pub size: Option<Expr>,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub data_type: DataType,
    pub is_reference: bool,
    pub is_array: bool,
}

/// One item in a `Display` list: an expression, or the `Tap` spacer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DisplayItem {
    Expr(Expr),
    Tap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    VariableDeclaration {
        data_type: DataType,
        is_constant: bool,
        declarators: Vec<Declarator>,
        line: usize,
    },
    /// `Set lvalue = expr`; the target is an `Identifier` or `ArrayAccess`.
    Assignment {
        target: Expr,
        value: Expr,
        line: usize,
    },
    Display {
        items: Vec<DisplayItem>,
        line: usize,
    },
    Input {
        name: String,
        line: usize,
    },
    If {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
        line: usize,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        line: usize,
    },
    DoWhile {
        body: Vec<Stmt>,
        condition: Expr,
        line: usize,
    },
    DoUntil {
        body: Vec<Stmt>,
        condition: Expr,
        line: usize,
    },
    For {
        counter: String,
        start: Expr,
        end: Expr,
        body: Vec<Stmt>,
        line: usize,
    },
    Module {
        name: String,
        params: Vec<Parameter>,
        body: Vec<Stmt>,
        line: usize,
    },
    Function {
        name: String,
        return_type: DataType,
        params: Vec<Parameter>,
        body: Vec<Stmt>,
        line: usize,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        line: usize,
    },
    Return {
        value: Expr,
        line: usize,
    },
}

impl Stmt {
    pub fn line(&self) -> usize {
        match self {
            Stmt::VariableDeclaration { line, .. }
            | Stmt::Assignment { line, .. }
            | Stmt::Display { line, .. }
            | Stmt::Input { line, .. }
            | Stmt::If { line, .. }
            | Stmt::While { line, .. }
            | Stmt::DoWhile { line, .. }
            | Stmt::DoUntil { line, .. }
            | Stmt::For { line, .. }
            | Stmt::Module { line, .. }
            | Stmt::Function { line, .. }
            | Stmt::Call { line, .. }
            | Stmt::Return { line, .. } => *line,
        }
    }
}
