//! Tree-walking interpreter.
//!
//! Both execution modes share one walk: before every statement the
//! interpreter polls the host's stop flag and offers a step point to the
//! installed [`StepSink`]. Run mode installs the no-op sink; the debugger
//! installs a channel-backed sink that blocks until the driver pulls the
//! next step. Statements inside expression-level function calls never reach
//! the sink ("step over"); statements inside `Call`ed modules do.

pub mod builtins;

use crate::env::{EnvError, Environment, SlotRef};
use crate::host::Host;
use gaddis_compiler::compiler::ast::{
    BinaryOp, DisplayItem, Expr, Literal, Parameter, Program, Stmt, UnaryOp,
};
use gaddis_core::{DataType, RuntimeError, Value};
use std::collections::HashMap;
use std::rc::Rc;

const MAX_CALL_DEPTH: usize = 256;

/// Statement outcome: fall through, or unwind to the nearest call with a
/// return value. Return is control flow, not an error; it must never be
/// mistaken for a program fault.
pub(crate) enum Flow {
    Normal,
    Return(Value),
}

/// Observer offered a step point before every statement. Returning an error
/// aborts execution; the debugger uses this to surface cancellation.
pub(crate) trait StepSink {
    fn on_step(&mut self, line: usize, env: &Environment) -> Result<(), RuntimeError>;
}

/// Run mode: no pauses, no snapshots.
pub(crate) struct NoStep;

impl StepSink for NoStep {
    fn on_step(&mut self, _line: usize, _env: &Environment) -> Result<(), RuntimeError> {
        Ok(())
    }
}

enum Binding {
    Alias(String, SlotRef),
    Owned(String, DataType, Value),
}

pub(crate) struct Interpreter<'a> {
    program: &'a Program,
    host: &'a dyn Host,
    env: Environment,
    modules: HashMap<String, &'a Stmt>,
    functions: HashMap<String, &'a Stmt>,
    call_depth: usize,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(program: &'a Program, host: &'a dyn Host) -> Result<Self, RuntimeError> {
        let mut modules = HashMap::new();
        let mut functions = HashMap::new();
        for stmt in &program.statements {
            match stmt {
                Stmt::Module { name, line, .. } => {
                    if modules.insert(name.to_lowercase(), stmt).is_some() {
                        return Err(RuntimeError::DuplicateDeclaration {
                            name: name.clone(),
                            line: *line,
                        });
                    }
                }
                Stmt::Function { name, line, .. } => {
                    if functions.insert(name.to_lowercase(), stmt).is_some() {
                        return Err(RuntimeError::DuplicateDeclaration {
                            name: name.clone(),
                            line: *line,
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(Self {
            program,
            host,
            env: Environment::new(),
            modules,
            functions,
            call_depth: 0,
        })
    }

    /// Entry point. With modules present, top-level declarations populate the
    /// globals and then `main` runs; otherwise the top-level statements are
    /// the program.
    pub(crate) fn execute(&mut self, sink: &mut dyn StepSink) -> Result<(), RuntimeError> {
        if self.program.has_modules() {
            for stmt in &self.program.statements {
                if matches!(stmt, Stmt::VariableDeclaration { .. }) {
                    self.execute_stmt(stmt, sink)?;
                }
            }
            let main = self
                .modules
                .get("main")
                .copied()
                .ok_or(RuntimeError::MissingMain)?;
            let Stmt::Module {
                params, body, line, ..
            } = main
            else {
                return Err(RuntimeError::MissingMain);
            };
            self.invoke("main", params, &[], body, *line, sink)?;
        } else {
            for stmt in &self.program.statements {
                if matches!(stmt, Stmt::Function { .. }) {
                    continue;
                }
                if let Flow::Return(_) = self.execute_stmt(stmt, sink)? {
                    break;
                }
            }
        }
        Ok(())
    }

    fn check_stop(&self) -> Result<(), RuntimeError> {
        if self.host.should_stop() {
            Err(RuntimeError::Stopped)
        } else {
            Ok(())
        }
    }

    fn env_err(&self, err: EnvError, line: usize) -> RuntimeError {
        match err {
            EnvError::Undeclared(name) => RuntimeError::UndeclaredVariable { name, line },
            EnvError::Duplicate(name) => RuntimeError::DuplicateDeclaration { name, line },
            EnvError::ConstantAssignment(name) => RuntimeError::ConstantAssignment { name, line },
        }
    }

    // ── Statements ──

    fn execute_block(
        &mut self,
        stmts: &'a [Stmt],
        sink: &mut dyn StepSink,
    ) -> Result<Flow, RuntimeError> {
        for stmt in stmts {
            match self.execute_stmt(stmt, sink)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// A block body in its own nested scope (if-branches, loop bodies).
    fn execute_scoped_block(
        &mut self,
        stmts: &'a [Stmt],
        sink: &mut dyn StepSink,
    ) -> Result<Flow, RuntimeError> {
        self.env.push_scope();
        let result = self.execute_block(stmts, sink);
        self.env.pop_scope();
        result
    }

    fn execute_stmt(
        &mut self,
        stmt: &'a Stmt,
        sink: &mut dyn StepSink,
    ) -> Result<Flow, RuntimeError> {
        self.check_stop()?;
        sink.on_step(stmt.line(), &self.env)?;
        match stmt {
            Stmt::Module { .. } | Stmt::Function { .. } => Ok(Flow::Normal),

            Stmt::VariableDeclaration {
                data_type,
                is_constant,
                declarators,
                line,
            } => {
                for declarator in declarators {
                    let value = match &declarator.size {
                        Some(size_expr) => self.build_array(size_expr, &declarator.initializer)?,
                        None => match &declarator.initializer {
                            Some(init) => self.eval_expr(init)?,
                            None => Value::Null,
                        },
                    };
                    self.env
                        .define(&declarator.name, *is_constant, *data_type, value)
                        .map_err(|e| self.env_err(e, *line))?;
                }
                Ok(Flow::Normal)
            }

            Stmt::Assignment { target, value, .. } => {
                let value = self.eval_expr(value)?;
                self.assign_to(target, value)?;
                Ok(Flow::Normal)
            }

            Stmt::Display { items, .. } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        DisplayItem::Expr(expr) => values.push(self.eval_expr(expr)?),
                        DisplayItem::Tap => values.push(Value::String("    ".to_string())),
                    }
                }
                self.host.display(&values);
                Ok(Flow::Normal)
            }

            Stmt::Input { name, line } => {
                self.execute_input(name, *line)?;
                Ok(Flow::Normal)
            }

            Stmt::If {
                condition,
                then_body,
                else_body,
                ..
            } => {
                if self.eval_expr(condition)?.is_truthy() {
                    self.execute_scoped_block(then_body, sink)
                } else if let Some(body) = else_body {
                    self.execute_scoped_block(body, sink)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While {
                condition, body, ..
            } => {
                loop {
                    self.check_stop()?;
                    if !self.eval_expr(condition)?.is_truthy() {
                        break;
                    }
                    if let Flow::Return(v) = self.execute_scoped_block(body, sink)? {
                        return Ok(Flow::Return(v));
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::DoWhile {
                body, condition, ..
            } => {
                loop {
                    self.check_stop()?;
                    if let Flow::Return(v) = self.execute_scoped_block(body, sink)? {
                        return Ok(Flow::Return(v));
                    }
                    if !self.eval_expr(condition)?.is_truthy() {
                        break;
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::DoUntil {
                body, condition, ..
            } => {
                loop {
                    self.check_stop()?;
                    if let Flow::Return(v) = self.execute_scoped_block(body, sink)? {
                        return Ok(Flow::Return(v));
                    }
                    if self.eval_expr(condition)?.is_truthy() {
                        break;
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::For {
                counter,
                start,
                end,
                body,
                line,
            } => {
                let start_n = self.expect_number(start, "For start bound")?;
                let end_n = self.expect_number(end, "For end bound")?;
                self.env.push_scope();
                let result = self.run_for(counter, start_n, end_n, body, *line, sink);
                self.env.pop_scope();
                result
            }

            Stmt::Call { name, args, line } => {
                let module = self
                    .modules
                    .get(&name.to_lowercase())
                    .copied()
                    .ok_or_else(|| RuntimeError::UndeclaredModule {
                        name: name.clone(),
                        line: *line,
                    })?;
                let Stmt::Module { params, body, .. } = module else {
                    return Err(RuntimeError::UndeclaredModule {
                        name: name.clone(),
                        line: *line,
                    });
                };
                self.invoke(name, params, args, body, *line, sink)?;
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = self.eval_expr(value)?;
                Ok(Flow::Return(value))
            }
        }
    }

    fn build_array(
        &mut self,
        size_expr: &'a Expr,
        initializer: &'a Option<Expr>,
    ) -> Result<Value, RuntimeError> {
        let size_value = self.eval_expr(size_expr)?;
        let line = size_expr.line();
        let size = match integer_of(&size_value) {
            Some(n) if n >= 0 => n as usize,
            Some(_) => return Err(RuntimeError::NegativeSize { line }),
            None => {
                return Err(RuntimeError::type_mismatch(
                    "Array size must be an Integer",
                    line,
                ))
            }
        };
        let array = Value::new_array(size);
        if let Some(init) = initializer {
            let Expr::ArrayLiteral { elements, line } = init else {
                return Err(RuntimeError::type_mismatch(
                    "Array initializer must be a value list",
                    init.line(),
                ));
            };
            if elements.len() > size {
                return Err(RuntimeError::TooManyInitializers { size, line: *line });
            }
            let Value::Array(items) = &array else {
                return Err(RuntimeError::type_mismatch("Array allocation failed", *line));
            };
            let items = Rc::clone(items);
            for (i, element) in elements.iter().enumerate() {
                let value = self.eval_expr(element)?;
                items.borrow_mut()[i] = value;
            }
        }
        Ok(array)
    }

    fn assign_to(&mut self, target: &'a Expr, value: Value) -> Result<(), RuntimeError> {
        match target {
            Expr::Identifier { name, line } => self
                .env
                .assign(name, value)
                .map_err(|e| self.env_err(e, *line)),
            Expr::ArrayAccess { array, index, line } => {
                let array_value = self.eval_expr(array)?;
                let type_name = array_value.type_name();
                let Value::Array(items) = array_value else {
                    return Err(RuntimeError::type_mismatch(
                        format!("Cannot index into a {}", type_name),
                        *line,
                    ));
                };
                let len = items.borrow().len();
                let idx = self.array_index(index, len)?;
                items.borrow_mut()[idx] = value;
                Ok(())
            }
            other => Err(RuntimeError::type_mismatch(
                "Invalid assignment target",
                other.line(),
            )),
        }
    }

    /// Evaluate an index expression and bounds-check it against `len`.
    fn array_index(&mut self, index: &'a Expr, len: usize) -> Result<usize, RuntimeError> {
        let line = index.line();
        let value = self.eval_expr(index)?;
        let idx = integer_of(&value).ok_or_else(|| {
            RuntimeError::type_mismatch("Array index must be an Integer", line)
        })?;
        if idx < 0 || idx as usize >= len {
            return Err(RuntimeError::IndexOutOfBounds {
                index: idx,
                len,
                line,
            });
        }
        Ok(idx as usize)
    }

    fn execute_input(&mut self, name: &str, line: usize) -> Result<(), RuntimeError> {
        let slot = self
            .env
            .slot(name)
            .map_err(|e| self.env_err(e, line))?;
        let (data_type, display_name, is_constant) = {
            let slot = slot.borrow();
            (slot.data_type, slot.display_name.clone(), slot.is_constant)
        };
        if is_constant {
            return Err(RuntimeError::ConstantAssignment {
                name: display_name,
                line,
            });
        }
        let prompt = format!("Enter a value for {}: ", display_name);
        loop {
            self.check_stop()?;
            let Some(text) = self.host.input(&prompt) else {
                self.host
                    .display(&[Value::String("Input cancelled.".to_string())]);
                return Ok(());
            };
            self.check_stop()?;
            match parse_input(data_type, &text) {
                Some(value) => {
                    slot.borrow_mut().value = value;
                    return Ok(());
                }
                None => {
                    self.host.display(&[Value::String(format!(
                        "Invalid input. Please enter a valid {}.",
                        data_type
                    ))]);
                }
            }
        }
    }

    fn run_for(
        &mut self,
        counter: &str,
        start: f64,
        end: f64,
        body: &'a [Stmt],
        line: usize,
        sink: &mut dyn StepSink,
    ) -> Result<Flow, RuntimeError> {
        self.env
            .define(counter, false, DataType::Real, Value::Real(start))
            .map_err(|e| self.env_err(e, line))?;
        let slot = self.env.slot(counter).map_err(|e| self.env_err(e, line))?;
        loop {
            self.check_stop()?;
            let current = slot.borrow().value.as_number().ok_or_else(|| {
                RuntimeError::type_mismatch("For counter must be a number", line)
            })?;
            if current > end {
                break;
            }
            if let Flow::Return(v) = self.execute_scoped_block(body, sink)? {
                return Ok(Flow::Return(v));
            }
            let next = slot.borrow().value.as_number().ok_or_else(|| {
                RuntimeError::type_mismatch("For counter must be a number", line)
            })? + 1.0;
            slot.borrow_mut().value = Value::Real(next);
        }
        Ok(Flow::Normal)
    }

    // ── Calls ──

    /// Shared call machinery for modules and functions: arity check,
    /// parameter binding in the caller's environment, then the body in a
    /// fresh frame rooted at the globals. Returns the function's value, or
    /// `None` when the body fell off the end. Expression-level function
    /// calls pass the no-op sink here, which is what makes debug stepping
    /// "step over".
    fn invoke(
        &mut self,
        name: &str,
        params: &'a [Parameter],
        args: &'a [Expr],
        body: &'a [Stmt],
        line: usize,
        sink: &mut dyn StepSink,
    ) -> Result<Option<Value>, RuntimeError> {
        if params.len() != args.len() {
            return Err(RuntimeError::ArgumentCount {
                name: name.to_string(),
                expected: params.len(),
                found: args.len(),
                line,
            });
        }
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::RecursionLimit { line });
        }
        let mut bindings = Vec::with_capacity(params.len());
        for (param, arg) in params.iter().zip(args) {
            if param.is_reference {
                let Expr::Identifier {
                    name: arg_name,
                    line: arg_line,
                } = arg
                else {
                    return Err(RuntimeError::ReferenceArgument {
                        name: param.name.clone(),
                        line: arg.line(),
                    });
                };
                let slot = self
                    .env
                    .slot(arg_name)
                    .map_err(|e| self.env_err(e, *arg_line))?;
                bindings.push(Binding::Alias(param.name.clone(), slot));
            } else {
                let value = self.eval_expr(arg)?;
                let data_type = match param.data_type {
                    DataType::Auto => match arg {
                        Expr::Identifier { name, .. } => self
                            .env
                            .slot(name)
                            .map(|s| s.borrow().data_type)
                            .unwrap_or(DataType::Auto),
                        _ => DataType::Auto,
                    },
                    declared => declared,
                };
                bindings.push(Binding::Owned(param.name.clone(), data_type, value));
            }
        }
        self.env.push_frame();
        self.call_depth += 1;
        let result = self.run_invoked(bindings, body, line, sink);
        self.call_depth -= 1;
        self.env.pop_frame();
        result
    }

    fn run_invoked(
        &mut self,
        bindings: Vec<Binding>,
        body: &'a [Stmt],
        line: usize,
        sink: &mut dyn StepSink,
    ) -> Result<Option<Value>, RuntimeError> {
        for binding in bindings {
            match binding {
                Binding::Alias(name, slot) => self
                    .env
                    .define_alias(&name, slot)
                    .map_err(|e| self.env_err(e, line))?,
                Binding::Owned(name, data_type, value) => self
                    .env
                    .define(&name, false, data_type, value)
                    .map_err(|e| self.env_err(e, line))?,
            }
        }
        match self.execute_block(body, sink)? {
            Flow::Return(value) => Ok(Some(value)),
            Flow::Normal => Ok(None),
        }
    }

    // ── Expressions ──

    fn expect_number(&mut self, expr: &'a Expr, what: &str) -> Result<f64, RuntimeError> {
        let value = self.eval_expr(expr)?;
        value.as_number().ok_or_else(|| {
            RuntimeError::type_mismatch(
                format!("{} must be a number, not a {}", what, value.type_name()),
                expr.line(),
            )
        })
    }

    fn eval_expr(&mut self, expr: &'a Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal { value, .. } => Ok(match value {
                Literal::Integer(n) => Value::Integer(*n),
                Literal::Real(r) => Value::Real(*r),
                Literal::String(s) => Value::String(s.clone()),
            }),

            Expr::Identifier { name, line } => {
                self.env.get(name).map_err(|e| self.env_err(e, *line))
            }

            Expr::ArrayLiteral { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expr(element)?);
                }
                Ok(Value::array_from(values))
            }

            Expr::ArrayAccess { array, index, line } => {
                let array_value = self.eval_expr(array)?;
                let type_name = array_value.type_name();
                let Value::Array(items) = array_value else {
                    return Err(RuntimeError::type_mismatch(
                        format!("Cannot index into a {}", type_name),
                        *line,
                    ));
                };
                let len = items.borrow().len();
                let idx = self.array_index(index, len)?;
                let value = items.borrow()[idx].clone();
                Ok(value)
            }

            Expr::Grouping { inner, .. } => self.eval_expr(inner),

            Expr::Unary { op, right, line } => {
                let value = self.eval_expr(right)?;
                match op {
                    UnaryOp::Not => Ok(Value::from_bool(!value.is_truthy())),
                    UnaryOp::Negate => match value {
                        Value::Integer(n) => Ok(Value::Integer(n.wrapping_neg())),
                        Value::Real(r) => Ok(Value::Real(-r)),
                        other => Err(RuntimeError::type_mismatch(
                            format!("Operand of '-' must be a number, not a {}", other.type_name()),
                            *line,
                        )),
                    },
                }
            }

            Expr::Binary {
                left,
                op: BinaryOp::And,
                right,
                ..
            } => {
                if !self.eval_expr(left)?.is_truthy() {
                    return Ok(Value::from_bool(false));
                }
                let rhs = self.eval_expr(right)?;
                Ok(Value::from_bool(rhs.is_truthy()))
            }

            Expr::Binary {
                left,
                op: BinaryOp::Or,
                right,
                ..
            } => {
                if self.eval_expr(left)?.is_truthy() {
                    return Ok(Value::from_bool(true));
                }
                let rhs = self.eval_expr(right)?;
                Ok(Value::from_bool(rhs.is_truthy()))
            }

            Expr::Binary {
                left,
                op,
                right,
                line,
            } => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                apply_binary(*op, &lhs, &rhs, *line)
            }

            Expr::FunctionCall { callee, args, line } => {
                let Expr::Identifier { name, .. } = callee.as_ref() else {
                    return Err(RuntimeError::type_mismatch(
                        "Only named functions can be called",
                        *line,
                    ));
                };
                let folded = name.to_lowercase();
                if builtins::is_builtin(&folded) {
                    let mut values = Vec::with_capacity(args.len());
                    for arg in args {
                        values.push(self.eval_expr(arg)?);
                    }
                    return builtins::call(&folded, &values, *line);
                }
                let function = self
                    .functions
                    .get(&folded)
                    .copied()
                    .ok_or_else(|| RuntimeError::UndeclaredFunction {
                        name: name.clone(),
                        line: *line,
                    })?;
                let Stmt::Function { params, body, .. } = function else {
                    return Err(RuntimeError::UndeclaredFunction {
                        name: name.clone(),
                        line: *line,
                    });
                };
                match self.invoke(name, params, args, body, *line, &mut NoStep)? {
                    Some(value) => Ok(value),
                    None => Err(RuntimeError::MissingReturn {
                        name: name.clone(),
                        line: *line,
                    }),
                }
            }
        }
    }
}

/// Run a program to completion against `host`. Constructs a fresh global
/// environment; nothing is shared between runs.
pub fn run(program: &Program, host: &dyn Host) -> Result<(), RuntimeError> {
    let mut interpreter = Interpreter::new(program, host)?;
    interpreter.execute(&mut NoStep)
}

// ── Operator semantics ──

fn integer_of(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(n) => Some(*n),
        Value::Real(r) if r.fract() == 0.0 => Some(*r as i64),
        _ => None,
    }
}

fn numeric_pair(
    lhs: &Value,
    rhs: &Value,
    symbol: &str,
    line: usize,
) -> Result<(f64, f64), RuntimeError> {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(RuntimeError::type_mismatch(
            format!(
                "Operands of '{}' must be numbers, not {} and {}",
                symbol,
                lhs.type_name(),
                rhs.type_name()
            ),
            line,
        )),
    }
}

/// Integer×Integer stays Integer; any Real operand widens the result.
fn arithmetic(
    lhs: &Value,
    rhs: &Value,
    symbol: &str,
    line: usize,
    int_op: fn(i64, i64) -> i64,
    real_op: fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    if let (Value::Integer(a), Value::Integer(b)) = (lhs, rhs) {
        return Ok(Value::Integer(int_op(*a, *b)));
    }
    let (a, b) = numeric_pair(lhs, rhs, symbol, line)?;
    Ok(Value::Real(real_op(a, b)))
}

fn apply_binary(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    line: usize,
) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Add => match (lhs, rhs) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            _ => arithmetic(lhs, rhs, "+", line, i64::wrapping_add, |a, b| a + b),
        },
        BinaryOp::Subtract => arithmetic(lhs, rhs, "-", line, i64::wrapping_sub, |a, b| a - b),
        BinaryOp::Multiply => arithmetic(lhs, rhs, "*", line, i64::wrapping_mul, |a, b| a * b),
        BinaryOp::Divide => {
            let (a, b) = numeric_pair(lhs, rhs, "/", line)?;
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            Ok(Value::Real(a / b))
        }
        BinaryOp::Modulo => {
            let (a, b) = numeric_pair(lhs, rhs, "MOD", line)?;
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            if let (Value::Integer(x), Value::Integer(y)) = (lhs, rhs) {
                return Ok(Value::Integer(x.wrapping_rem(*y)));
            }
            Ok(Value::Real(a % b))
        }
        BinaryOp::Equal => Ok(Value::from_bool(lhs.loose_eq(rhs))),
        BinaryOp::NotEqual => Ok(Value::from_bool(!lhs.loose_eq(rhs))),
        BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
            let ordering = lhs.compare(rhs).ok_or_else(|| {
                RuntimeError::type_mismatch(
                    format!("Cannot compare {} and {}", lhs.type_name(), rhs.type_name()),
                    line,
                )
            })?;
            let result = match op {
                BinaryOp::Less => ordering.is_lt(),
                BinaryOp::LessEqual => ordering.is_le(),
                BinaryOp::Greater => ordering.is_gt(),
                _ => ordering.is_ge(),
            };
            Ok(Value::from_bool(result))
        }
        // Short-circuiting happens in eval; these arms only see both sides
        // already evaluated.
        BinaryOp::And => Ok(Value::from_bool(lhs.is_truthy() && rhs.is_truthy())),
        BinaryOp::Or => Ok(Value::from_bool(lhs.is_truthy() || rhs.is_truthy())),
    }
}

fn parse_input(data_type: DataType, text: &str) -> Option<Value> {
    match data_type {
        DataType::Integer => {
            if builtins::matches_integer(text) {
                text.parse::<i64>().ok().map(Value::Integer)
            } else {
                None
            }
        }
        DataType::Real => {
            if builtins::matches_real(text) {
                text.parse::<f64>().ok().map(Value::Real)
            } else {
                None
            }
        }
        DataType::String | DataType::Auto => Some(Value::String(text.to_string())),
    }
}
