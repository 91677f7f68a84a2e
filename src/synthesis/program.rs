use std::fmt::{Display, Formatter};

use z3::Model;

use crate::error::HolepunchError;
use crate::examples::Example;
use crate::grammar::holes::{Domain, HoleRegistry};
use crate::grammar::{GrammarNode, Operator};
use crate::synthesis::vc::{SymValue, VcBuilder};

/// A concrete runtime value of the two term domains.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

/// A hole-free candidate: the solver model substituted into the sketch.
/// Every choice point has collapsed to the alternative whose guard the model
/// selected, and every hole carries its assigned constant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Program {
    Param(usize),
    Int(i64),
    Bool(bool),
    Op {
        op: Operator,
        args: Box<[Program; 2]>,
    },
}

impl Program {
    /// Reads every hole and guard out of `model`. A missing assignment, a
    /// constant outside `i64`, or a choice with no selected alternative is a
    /// [HolepunchError::ModelParsingError] — Z3 integers are unbounded, and a
    /// value this crate cannot represent must fail loudly rather than wrap.
    pub(crate) fn from_model(
        model: &Model,
        sketch: &GrammarNode,
        vc: &VcBuilder,
        holes: &HoleRegistry,
    ) -> Result<Self, HolepunchError> {
        match sketch {
            GrammarNode::Param(i) => Ok(Program::Param(*i)),
            GrammarNode::Hole(id) => match holes.domain_of(*id) {
                Domain::Int => {
                    let SymValue::Int(constant) = vc.hole_const(*id) else {
                        return Err(HolepunchError::SortMismatch);
                    };
                    model
                        .eval(constant, true)
                        .and_then(|v| v.as_i64())
                        .map(Program::Int)
                        .ok_or(HolepunchError::ModelParsingError)
                }
                Domain::Bool => {
                    let SymValue::Bool(constant) = vc.hole_const(*id) else {
                        return Err(HolepunchError::SortMismatch);
                    };
                    model
                        .eval(constant, true)
                        .and_then(|v| v.as_bool())
                        .map(Program::Bool)
                        .ok_or(HolepunchError::ModelParsingError)
                }
            },
            GrammarNode::Op { op, args } => {
                let lhs = Self::from_model(model, &args[0], vc, holes)?;
                let rhs = Self::from_model(model, &args[1], vc, holes)?;
                Ok(Program::Op {
                    op: *op,
                    args: Box::new([lhs, rhs]),
                })
            }
            GrammarNode::Choice {
                guards,
                alternatives,
            } => {
                let selected = guards.iter().position(|g| match vc.hole_const(*g) {
                    SymValue::Bool(b) => model
                        .eval(b, false)
                        .and_then(|b| b.as_bool())
                        .unwrap_or(false),
                    SymValue::Int(_) => false,
                });
                match selected {
                    Some(index) => Self::from_model(model, &alternatives[index], vc, holes),
                    None => Err(HolepunchError::ModelParsingError),
                }
            }
        }
    }

    /// Concrete denotation over one input row. Returns `None` for a
    /// hand-built ill-sorted term; programs produced by synthesis are
    /// well-sorted by construction.
    pub fn eval(&self, inputs: &[i64]) -> Option<Value> {
        match self {
            Program::Param(i) => inputs.get(*i).copied().map(Value::Int),
            Program::Int(v) => Some(Value::Int(*v)),
            Program::Bool(b) => Some(Value::Bool(*b)),
            Program::Op { op, args } => {
                let lhs = args[0].eval(inputs)?;
                let rhs = args[1].eval(inputs)?;
                match (op, lhs, rhs) {
                    (Operator::Lt, Value::Int(l), Value::Int(r)) => Some(Value::Bool(l < r)),
                    (Operator::Gt, Value::Int(l), Value::Int(r)) => Some(Value::Bool(l > r)),
                    (Operator::And, Value::Bool(l), Value::Bool(r)) => Some(Value::Bool(l && r)),
                    _ => None,
                }
            }
        }
    }

    /// Whether this program reproduces one labeled row exactly.
    pub fn satisfies(&self, example: &Example) -> bool {
        self.eval(example.inputs()) == Some(Value::Bool(example.output()))
    }

    /// Renders the program with the given parameter names. Parameters with
    /// no name fall back to a positional `x{i}`.
    pub fn display<'a>(&'a self, parameters: &'a [String]) -> ProgramDisplay<'a> {
        ProgramDisplay {
            program: self,
            parameters,
        }
    }
}

pub struct ProgramDisplay<'a> {
    program: &'a Program,
    parameters: &'a [String],
}

impl ProgramDisplay<'_> {
    fn fmt_node(&self, node: &Program, f: &mut Formatter<'_>) -> std::fmt::Result {
        match node {
            Program::Param(i) => match self.parameters.get(*i) {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "x{i}"),
            },
            Program::Int(v) => write!(f, "{v}"),
            Program::Bool(b) => write!(f, "{b}"),
            Program::Op { op, args } => {
                self.fmt_operand(&args[0], f)?;
                write!(f, " {} ", op.symbol())?;
                self.fmt_operand(&args[1], f)
            }
        }
    }

    fn fmt_operand(&self, node: &Program, f: &mut Formatter<'_>) -> std::fmt::Result {
        match node {
            Program::Op { .. } => {
                write!(f, "(")?;
                self.fmt_node(node, f)?;
                write!(f, ")")
            }
            _ => self.fmt_node(node, f),
        }
    }
}

impl Display for ProgramDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_node(self.program, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::examples::Example;
    use crate::grammar::Operator;
    use crate::synthesis::program::{Program, Value};

    fn reference_program() -> Program {
        // (flour > 50) and (water < 50)
        Program::Op {
            op: Operator::And,
            args: Box::new([
                Program::Op {
                    op: Operator::Gt,
                    args: Box::new([Program::Param(0), Program::Int(50)]),
                },
                Program::Op {
                    op: Operator::Lt,
                    args: Box::new([Program::Param(1), Program::Int(50)]),
                },
            ]),
        }
    }

    #[test]
    fn evaluates_the_reference_program() {
        let program = reference_program();
        assert_eq!(program.eval(&[70, 4]), Some(Value::Bool(true)));
        assert_eq!(program.eval(&[20, 450]), Some(Value::Bool(false)));
        assert!(program.satisfies(&Example::new(vec![72, 9], true)));
        assert!(!program.satisfies(&Example::new(vec![72, 9], false)));
    }

    #[test]
    fn renders_with_parameter_names() {
        let program = reference_program();
        let parameters = vec!["flour".to_string(), "water".to_string()];
        assert_eq!(
            program.display(&parameters).to_string(),
            "(flour > 50) and (water < 50)"
        );
        assert_eq!(
            program.display(&[]).to_string(),
            "(x0 > 50) and (x1 < 50)"
        );
    }

    #[test]
    fn ill_sorted_terms_do_not_evaluate() {
        let bad = Program::Op {
            op: Operator::And,
            args: Box::new([Program::Int(1), Program::Bool(true)]),
        };
        assert_eq!(bad.eval(&[]), None);
    }
}
