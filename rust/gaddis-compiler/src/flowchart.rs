//! Flowchart extraction: walks the AST into a node/edge graph with
//! shape-typed nodes for the driver's graphical layout.
//!
//! Node kinds map to conventional flowchart shapes: `process` rectangles
//! (also used for near-zero-size dummy merge nodes that keep branch topology
//! intact), `io` parallelograms for Display/Input, and `decision` diamonds.
//! Width/height hints are advisory; geometry and routing belong to the
//! layout layer.

use crate::compiler::ast::{DisplayItem, Expr, Literal, Program, Stmt, UnaryOp};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Process,
    Io,
    Decision,
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub width_hint: f32,
    pub height_hint: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowchartGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// An open edge waiting for its target: source node plus a pending edge
/// label (`True`/`False` out of a decision). `None` means the branch has
/// terminated (a `Return`).
type Tail = Option<(String, Option<String>)>;

struct Builder {
    graph: FlowchartGraph,
    next_id: usize,
    current_subroutine_end: Option<String>,
}

impl Builder {
    fn new() -> Self {
        Self {
            graph: FlowchartGraph::default(),
            next_id: 0,
            current_subroutine_end: None,
        }
    }

    fn node(&mut self, kind: NodeKind, label: impl Into<String>) -> String {
        let label = label.into();
        let id = format!("n{}", self.next_id);
        self.next_id += 1;
        let (width_hint, height_hint) = size_hint(kind, &label);
        self.graph.nodes.push(Node {
            id: id.clone(),
            kind,
            label,
            width_hint,
            height_hint,
        });
        id
    }

    /// A dummy merge point: a process node with near-zero dimensions.
    fn merge_node(&mut self) -> String {
        let id = format!("n{}", self.next_id);
        self.next_id += 1;
        self.graph.nodes.push(Node {
            id: id.clone(),
            kind: NodeKind::Process,
            label: String::new(),
            width_hint: 0.1,
            height_hint: 0.1,
        });
        id
    }

    fn edge(&mut self, from: &str, to: &str, label: Option<String>) {
        self.graph.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
            label,
        });
    }

    fn link(&mut self, tail: Tail, to: &str) {
        if let Some((from, label)) = tail {
            self.edge(&from, to, label);
        }
    }

    fn chain(&mut self, tail: Tail, kind: NodeKind, label: String) -> Tail {
        let id = self.node(kind, label);
        self.link(tail, &id);
        Some((id, None))
    }

    fn subroutine(&mut self, start_label: String, end_label: String, body: &[Stmt]) {
        let start = self.node(NodeKind::Start, start_label);
        let end = self.node(NodeKind::End, end_label);
        let previous_end = self.current_subroutine_end.replace(end.clone());
        let tail = self.block(body, Some((start, None)));
        self.link(tail, &end);
        self.current_subroutine_end = previous_end;
    }

    fn block(&mut self, stmts: &[Stmt], mut tail: Tail) -> Tail {
        for stmt in stmts {
            tail = self.statement(stmt, tail);
        }
        tail
    }

    fn statement(&mut self, stmt: &Stmt, tail: Tail) -> Tail {
        match stmt {
            Stmt::Module { .. } | Stmt::Function { .. } => tail,
            Stmt::VariableDeclaration { .. } => {
                self.chain(tail, NodeKind::Process, render_stmt(stmt))
            }
            Stmt::Assignment { .. } | Stmt::Call { .. } => {
                self.chain(tail, NodeKind::Process, render_stmt(stmt))
            }
            Stmt::Display { .. } | Stmt::Input { .. } => {
                self.chain(tail, NodeKind::Io, render_stmt(stmt))
            }
            Stmt::Return { value, .. } => {
                let node = self.node(NodeKind::Process, format!("Return {}", render_expr(value)));
                self.link(tail, &node);
                if let Some(end) = self.current_subroutine_end.clone() {
                    self.edge(&node, &end, None);
                }
                None
            }
            Stmt::If {
                condition,
                then_body,
                else_body,
                ..
            } => {
                let decision = self.node(NodeKind::Decision, render_expr(condition));
                self.link(tail, &decision);
                let then_tail =
                    self.block(then_body, Some((decision.clone(), Some("True".into()))));
                let else_tail = match else_body {
                    Some(body) => self.block(body, Some((decision.clone(), Some("False".into())))),
                    None => Some((decision, Some("False".into()))),
                };
                let merge = self.merge_node();
                self.link(then_tail, &merge);
                self.link(else_tail, &merge);
                Some((merge, None))
            }
            Stmt::While {
                condition, body, ..
            } => {
                let decision = self.node(NodeKind::Decision, render_expr(condition));
                self.link(tail, &decision);
                let body_tail = self.block(body, Some((decision.clone(), Some("True".into()))));
                self.link(body_tail, &decision);
                Some((decision, Some("False".into())))
            }
            Stmt::DoWhile {
                body, condition, ..
            } => self.post_test_loop(tail, body, condition, true),
            Stmt::DoUntil {
                body, condition, ..
            } => self.post_test_loop(tail, body, condition, false),
            Stmt::For {
                counter,
                start,
                end,
                body,
                ..
            } => {
                let init = self.chain(
                    tail,
                    NodeKind::Process,
                    format!("Set {} = {}", counter, render_expr(start)),
                );
                let decision = self.node(
                    NodeKind::Decision,
                    format!("{} <= {}", counter, render_expr(end)),
                );
                self.link(init, &decision);
                let body_tail = self.block(body, Some((decision.clone(), Some("True".into()))));
                let increment = self.chain(
                    body_tail,
                    NodeKind::Process,
                    format!("Set {} = {} + 1", counter, counter),
                );
                self.link(increment, &decision);
                Some((decision, Some("False".into())))
            }
        }
    }

    /// Do-While / Do-Until: dummy loop head, body, trailing decision whose
    /// repeat edge goes back to the head.
    fn post_test_loop(
        &mut self,
        tail: Tail,
        body: &[Stmt],
        condition: &Expr,
        repeat_on_true: bool,
    ) -> Tail {
        let head = self.merge_node();
        self.link(tail, &head);
        let body_tail = self.block(body, Some((head.clone(), None)));
        let decision = self.node(NodeKind::Decision, render_expr(condition));
        self.link(body_tail, &decision);
        let (repeat, exit) = if repeat_on_true {
            ("True", "False")
        } else {
            ("False", "True")
        };
        self.edge(&decision, &head, Some(repeat.into()));
        Some((decision, Some(exit.into())))
    }
}

fn size_hint(kind: NodeKind, label: &str) -> (f32, f32) {
    let text = (label.chars().count() as f32) * 7.5;
    match kind {
        NodeKind::Start | NodeKind::End => (text + 40.0, 36.0),
        NodeKind::Process => (text + 30.0, 36.0),
        NodeKind::Io => (text + 44.0, 36.0),
        NodeKind::Decision => (text + 56.0, 52.0),
    }
}

/// Build the flowchart graph for a parsed program. Each module or function
/// becomes an independent Start→…→End subgraph; a script without any
/// subroutines becomes a single anonymous one.
pub fn build(program: &Program) -> FlowchartGraph {
    let mut builder = Builder::new();
    let has_subroutines = program
        .statements
        .iter()
        .any(|s| matches!(s, Stmt::Module { .. } | Stmt::Function { .. }));
    if has_subroutines {
        for stmt in &program.statements {
            match stmt {
                Stmt::Module { name, body, .. } => {
                    builder.subroutine(format!("Start {}", name), format!("End {}", name), body);
                }
                Stmt::Function { name, body, .. } => {
                    builder.subroutine(
                        format!("Start Function {}", name),
                        format!("End Function {}", name),
                        body,
                    );
                }
                _ => {}
            }
        }
    } else {
        builder.subroutine("Start".into(), "End".into(), &program.statements);
    }
    builder.graph
}

/// Compile `source` and extract its flowchart in one call.
pub fn generate(source: &str) -> Result<FlowchartGraph, crate::CompileError> {
    Ok(build(&crate::compile(source)?))
}

// ── Source rendering ──
//
// Labels mirror the source: infix operators, call syntax, bracketed array
// access.

fn render_literal(value: &Literal) -> String {
    match value {
        Literal::Integer(n) => n.to_string(),
        Literal::Real(r) => r.to_string(),
        Literal::String(s) => format!("\"{}\"", s),
    }
}

pub fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal { value, .. } => render_literal(value),
        Expr::Identifier { name, .. } => name.clone(),
        Expr::ArrayLiteral { elements, .. } => elements
            .iter()
            .map(render_expr)
            .collect::<Vec<_>>()
            .join(", "),
        Expr::ArrayAccess { array, index, .. } => {
            format!("{}[{}]", render_expr(array), render_expr(index))
        }
        Expr::Grouping { inner, .. } => format!("({})", render_expr(inner)),
        Expr::Unary { op, right, .. } => match op {
            UnaryOp::Negate => format!("-{}", render_expr(right)),
            UnaryOp::Not => format!("NOT {}", render_expr(right)),
        },
        Expr::Binary {
            left, op, right, ..
        } => format!(
            "{} {} {}",
            render_expr(left),
            op.symbol(),
            render_expr(right)
        ),
        Expr::FunctionCall { callee, args, .. } => {
            let rendered: Vec<String> = args.iter().map(render_expr).collect();
            format!("{}({})", render_expr(callee), rendered.join(", "))
        }
    }
}

fn render_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::VariableDeclaration {
            data_type,
            is_constant,
            declarators,
            ..
        } => {
            let keyword = if *is_constant { "Constant" } else { "Declare" };
            let rendered: Vec<String> = declarators
                .iter()
                .map(|d| {
                    let mut text = d.name.clone();
                    if let Some(size) = &d.size {
                        text.push_str(&format!("[{}]", render_expr(size)));
                    }
                    if let Some(init) = &d.initializer {
                        text.push_str(&format!(" = {}", render_expr(init)));
                    }
                    text
                })
                .collect();
            format!("{} {} {}", keyword, data_type, rendered.join(", "))
        }
        Stmt::Assignment { target, value, .. } => {
            format!("Set {} = {}", render_expr(target), render_expr(value))
        }
        Stmt::Display { items, .. } => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| match item {
                    DisplayItem::Expr(e) => render_expr(e),
                    DisplayItem::Tap => "Tap".to_string(),
                })
                .collect();
            format!("Display {}", rendered.join(", "))
        }
        Stmt::Input { name, .. } => format!("Input {}", name),
        Stmt::Call { name, args, .. } => {
            let rendered: Vec<String> = args.iter().map(render_expr).collect();
            format!("Call {}({})", name, rendered.join(", "))
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;

    fn graph_for(source: &str) -> FlowchartGraph {
        build(&compile(source).expect("source should compile"))
    }

    fn node<'g>(graph: &'g FlowchartGraph, label: &str) -> &'g Node {
        graph
            .nodes
            .iter()
            .find(|n| n.label == label)
            .unwrap_or_else(|| panic!("no node labeled '{}'", label))
    }

    fn has_edge(graph: &FlowchartGraph, from: &str, to: &str, label: Option<&str>) -> bool {
        graph
            .edges
            .iter()
            .any(|e| e.from == from && e.to == to && e.label.as_deref() == label)
    }

    #[test]
    fn hello_module_is_start_io_end() {
        let g = graph_for("Module main()\nDisplay \"Hello\"\nEnd Module");
        let start = node(&g, "Start main");
        let io = node(&g, "Display \"Hello\"");
        let end = node(&g, "End main");
        assert_eq!(io.kind, NodeKind::Io);
        assert!(has_edge(&g, &start.id, &io.id, None));
        assert!(has_edge(&g, &io.id, &end.id, None));
    }

    #[test]
    fn if_branches_merge_at_dummy_node() {
        let g = graph_for(
            "Module main()\nIf x > 0 Then\nDisplay 1\nElse\nDisplay 2\nEnd If\nEnd Module",
        );
        let decision = node(&g, "x > 0");
        assert_eq!(decision.kind, NodeKind::Decision);
        let merge = g
            .nodes
            .iter()
            .find(|n| n.label.is_empty() && n.width_hint < 1.0)
            .expect("dummy merge node");
        let one = node(&g, "Display 1");
        let two = node(&g, "Display 2");
        assert!(has_edge(&g, &decision.id, &one.id, Some("True")));
        assert!(has_edge(&g, &decision.id, &two.id, Some("False")));
        assert!(has_edge(&g, &one.id, &merge.id, None));
        assert!(has_edge(&g, &two.id, &merge.id, None));
    }

    #[test]
    fn if_without_else_takes_false_edge_from_decision() {
        let g = graph_for("Module main()\nIf x Then\nDisplay 1\nEnd If\nDisplay 2\nEnd Module");
        let decision = node(&g, "x");
        let merge = g
            .nodes
            .iter()
            .find(|n| n.label.is_empty() && n.width_hint < 1.0)
            .expect("dummy merge node");
        assert!(has_edge(&g, &decision.id, &merge.id, Some("False")));
    }

    #[test]
    fn while_loops_back_to_decision() {
        let g = graph_for("Module main()\nWhile x < 3\nSet x = x + 1\nEnd While\nEnd Module");
        let decision = node(&g, "x < 3");
        let body = node(&g, "Set x = x + 1");
        assert!(has_edge(&g, &decision.id, &body.id, Some("True")));
        assert!(has_edge(&g, &body.id, &decision.id, None));
        let end = node(&g, "End main");
        assert!(has_edge(&g, &decision.id, &end.id, Some("False")));
    }

    #[test]
    fn for_emits_init_decision_increment() {
        let g = graph_for("Module main()\nFor i = 1 To 5\nDisplay i\nEnd For\nEnd Module");
        let init = node(&g, "Set i = 1");
        let decision = node(&g, "i <= 5");
        let increment = node(&g, "Set i = i + 1");
        assert!(has_edge(&g, &init.id, &decision.id, None));
        assert!(has_edge(&g, &increment.id, &decision.id, None));
        assert!(has_edge(&g, &decision.id, &node(&g, "Display i").id, Some("True")));
    }

    #[test]
    fn do_until_repeats_on_false() {
        let g = graph_for("Module main()\nDo\nSet x = x + 1\nUntil x > 3\nEnd Module");
        let decision = node(&g, "x > 3");
        let head = g
            .nodes
            .iter()
            .find(|n| n.label.is_empty() && n.width_hint < 1.0)
            .expect("loop head dummy node");
        assert!(has_edge(&g, &decision.id, &head.id, Some("False")));
    }

    #[test]
    fn return_connects_to_function_end() {
        let g = graph_for("Function Integer f(Integer n)\nReturn n * 2\nEnd Function");
        let ret = node(&g, "Return n * 2");
        let end = node(&g, "End Function f");
        assert!(has_edge(&g, &ret.id, &end.id, None));
    }

    #[test]
    fn script_without_modules_gets_anonymous_subgraph() {
        let g = graph_for("Declare Integer x = 1\nDisplay x");
        assert!(g.nodes.iter().any(|n| n.label == "Start"));
        assert!(g.nodes.iter().any(|n| n.label == "End"));
        assert_eq!(node(&g, "Declare Integer x = 1").kind, NodeKind::Process);
    }

    #[test]
    fn labels_render_infix_source() {
        let g = graph_for("Module main()\nSet x = (a + b) * c[2]\nEnd Module");
        assert!(g.nodes.iter().any(|n| n.label == "Set x = (a + b) * c[2]"));
    }
}
