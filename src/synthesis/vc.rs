use z3::ast::{Ast, Bool, Int};
use z3::Context;

use crate::error::HolepunchError;
use crate::examples::ExampleSet;
use crate::grammar::holes::{Domain, HoleId, HoleRegistry};
use crate::grammar::{GrammarNode, Operator};

/// A symbolic term of one of the two hole domains.
#[derive(Clone, Debug)]
pub(crate) enum SymValue<'ctx> {
    Int(Int<'ctx>),
    Bool(Bool<'ctx>),
}

impl<'ctx> SymValue<'ctx> {
    fn expect_bool(self) -> Result<Bool<'ctx>, HolepunchError> {
        match self {
            SymValue::Bool(b) => Ok(b),
            SymValue::Int(_) => Err(HolepunchError::SortMismatch),
        }
    }

    fn expect_int(self) -> Result<Int<'ctx>, HolepunchError> {
        match self {
            SymValue::Int(i) => Ok(i),
            SymValue::Bool(_) => Err(HolepunchError::SortMismatch),
        }
    }
}

/// Lowers a sketch and the example store into one correctness formula.
///
/// Declares one Z3 constant per registered hole up front; the driver and the
/// substitution step address them through the same [HoleId]s, so hole
/// identity survives the round trip through the solver. Integer holes use
/// Z3's unbounded `Int` sort: no machine-word truncation happens in the
/// encoding.
pub struct VcBuilder<'ctx> {
    z3: &'ctx Context,
    consts: Vec<SymValue<'ctx>>,
}

impl<'ctx> VcBuilder<'ctx> {
    pub fn new(z3: &'ctx Context, holes: &HoleRegistry) -> Self {
        let consts = holes
            .iter()
            .map(|(id, domain)| match domain {
                Domain::Int => SymValue::Int(Int::new_const(z3, id.to_string())),
                Domain::Bool => SymValue::Bool(Bool::new_const(z3, id.to_string())),
            })
            .collect();
        Self { z3, consts }
    }

    pub(crate) fn hole_const(&self, id: HoleId) -> &SymValue<'ctx> {
        &self.consts[id.index()]
    }

    fn guard_bool(&self, id: HoleId) -> Result<&Bool<'ctx>, HolepunchError> {
        match self.hole_const(id) {
            SymValue::Bool(b) => Ok(b),
            SymValue::Int(_) => Err(HolepunchError::SortMismatch),
        }
    }

    /// Builds the verification condition: the candidate agrees with every
    /// stored row, and every choice point selects exactly one alternative.
    ///
    /// The universal quantification over example indices is realized by
    /// iterating the store itself, so the `0 <= i < N` range restriction
    /// holds by construction; no out-of-range row can be mentioned.
    pub fn build(
        &self,
        sketch: &GrammarNode,
        examples: &ExampleSet,
    ) -> Result<Bool<'ctx>, HolepunchError> {
        let mut clauses = Vec::with_capacity(examples.len());
        for example in examples.iter() {
            let inputs: Vec<Int<'ctx>> = example
                .inputs()
                .iter()
                .map(|v| Int::from_i64(self.z3, *v))
                .collect();
            let candidate = self.eval(sketch, &inputs)?.expect_bool()?;
            clauses.push(candidate._eq(&Bool::from_bool(self.z3, example.output())));
        }

        let mut guard_sets: Vec<&[HoleId]> = Vec::new();
        sketch.visit_choices(&mut |guards| guard_sets.push(guards));
        for guards in guard_sets {
            let bools = guards
                .iter()
                .map(|g| self.guard_bool(*g))
                .collect::<Result<Vec<_>, _>>()?;
            let weighted: Vec<(&Bool<'ctx>, i32)> = bools.into_iter().map(|b| (b, 1)).collect();
            clauses.push(Bool::pb_eq(self.z3, &weighted, 1));
        }

        let refs: Vec<&Bool<'ctx>> = clauses.iter().collect();
        Ok(Bool::and(self.z3, &refs))
    }

    /// Denotation of a node under one example row. A `Choice` becomes a
    /// guard-keyed nested if-then-else whose final alternative is the default
    /// branch; the one-hot constraint emitted in [build] makes the selected
    /// guard and the dominating branch agree.
    ///
    /// [build]: VcBuilder::build
    fn eval(
        &self,
        node: &GrammarNode,
        inputs: &[Int<'ctx>],
    ) -> Result<SymValue<'ctx>, HolepunchError> {
        match node {
            GrammarNode::Param(i) => Ok(SymValue::Int(inputs[*i].clone())),
            GrammarNode::Hole(id) => Ok(self.hole_const(*id).clone()),
            GrammarNode::Op { op, args } => {
                let lhs = self.eval(&args[0], inputs)?;
                let rhs = self.eval(&args[1], inputs)?;
                match op {
                    Operator::Lt => Ok(SymValue::Bool(lhs.expect_int()?.lt(&rhs.expect_int()?))),
                    Operator::Gt => Ok(SymValue::Bool(lhs.expect_int()?.gt(&rhs.expect_int()?))),
                    Operator::And => {
                        let lhs = lhs.expect_bool()?;
                        let rhs = rhs.expect_bool()?;
                        Ok(SymValue::Bool(Bool::and(self.z3, &[&lhs, &rhs])))
                    }
                }
            }
            GrammarNode::Choice {
                guards,
                alternatives,
            } => {
                let mut values = alternatives
                    .iter()
                    .map(|alternative| self.eval(alternative, inputs))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut acc = values.pop().ok_or(HolepunchError::SortMismatch)?;
                while let Some(value) = values.pop() {
                    let guard = self.guard_bool(guards[values.len()])?;
                    acc = Self::ite(guard, value, acc)?;
                }
                Ok(acc)
            }
        }
    }

    fn ite(
        guard: &Bool<'ctx>,
        then: SymValue<'ctx>,
        otherwise: SymValue<'ctx>,
    ) -> Result<SymValue<'ctx>, HolepunchError> {
        match (then, otherwise) {
            (SymValue::Int(t), SymValue::Int(e)) => Ok(SymValue::Int(guard.ite(&t, &e))),
            (SymValue::Bool(t), SymValue::Bool(e)) => Ok(SymValue::Bool(guard.ite(&t, &e))),
            _ => Err(HolepunchError::SortMismatch),
        }
    }
}
