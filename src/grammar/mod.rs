use serde::{Deserialize, Serialize};

use crate::grammar::holes::{Domain, HoleId, HoleRegistry};

pub mod holes;

/// The operator alphabet. Comparisons take integer operands; `and` takes
/// boolean operands. Every operator is binary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Operator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "and")]
    And,
}

impl Operator {
    pub fn operand_domain(&self) -> Domain {
        match self {
            Operator::Lt | Operator::Gt => Domain::Int,
            Operator::And => Domain::Bool,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::And => "and",
        }
    }
}

/// One node of a candidate sketch. A sketch is a runtime value: the grammar
/// factory below expands it once per attempt, threading every unknown through
/// a [HoleRegistry].
///
/// `Choice` pairs each alternative with a fresh boolean guard hole. The
/// condition builder lowers a choice to a guard-keyed nested if-then-else and
/// asserts that exactly one guard is true, so a model always selects a single
/// alternative's semantics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrammarNode {
    /// Reference to the candidate's i-th formal parameter.
    Param(usize),
    /// An unresolved constant of the registered domain.
    Hole(HoleId),
    Op {
        op: Operator,
        args: Box<[GrammarNode; 2]>,
    },
    Choice {
        guards: Vec<HoleId>,
        alternatives: Vec<GrammarNode>,
    },
}

impl GrammarNode {
    /// Walks the tree and yields every choice point's guard set.
    pub(crate) fn visit_choices<'a>(&'a self, f: &mut impl FnMut(&'a [HoleId])) {
        match self {
            GrammarNode::Param(_) | GrammarNode::Hole(_) => {}
            GrammarNode::Op { args, .. } => {
                for arg in args.iter() {
                    arg.visit_choices(f);
                }
            }
            GrammarNode::Choice {
                guards,
                alternatives,
            } => {
                f(guards);
                for alternative in alternatives {
                    alternative.visit_choices(f);
                }
            }
        }
    }
}

/// Expands the boolean expression grammar to `depth`, allocating every hole
/// out of `holes`. Construction is deterministic given the same parameter
/// count, operator set, and depth, so repeated attempts (e.g. after adding
/// examples) reuse an identical sketch.
///
/// At depth 0 only terminals and holes are generated; operator alternatives
/// appear from depth 1 up, recursing with a strictly smaller budget.
pub fn build_sketch(
    param_count: usize,
    operators: &[Operator],
    depth: u32,
    holes: &mut HoleRegistry,
) -> GrammarNode {
    bool_expr(param_count, operators, depth, holes)
}

fn bool_expr(
    param_count: usize,
    operators: &[Operator],
    depth: u32,
    holes: &mut HoleRegistry,
) -> GrammarNode {
    if depth == 0 {
        return GrammarNode::Hole(holes.fresh(Domain::Bool));
    }
    let mut alternatives = vec![GrammarNode::Hole(holes.fresh(Domain::Bool))];
    for op in operators {
        let args = match op.operand_domain() {
            Domain::Int => [int_atom(param_count, holes), int_atom(param_count, holes)],
            Domain::Bool => [
                bool_expr(param_count, operators, depth - 1, holes),
                bool_expr(param_count, operators, depth - 1, holes),
            ],
        };
        alternatives.push(GrammarNode::Op {
            op: *op,
            args: Box::new(args),
        });
    }
    choice(alternatives, holes)
}

/// An integer-sorted leaf: any parameter, or a fresh integer constant hole.
fn int_atom(param_count: usize, holes: &mut HoleRegistry) -> GrammarNode {
    let mut alternatives: Vec<GrammarNode> = (0..param_count).map(GrammarNode::Param).collect();
    alternatives.push(GrammarNode::Hole(holes.fresh(Domain::Int)));
    choice(alternatives, holes)
}

fn choice(mut alternatives: Vec<GrammarNode>, holes: &mut HoleRegistry) -> GrammarNode {
    if alternatives.len() == 1 {
        return alternatives.swap_remove(0);
    }
    let guards = alternatives
        .iter()
        .map(|_| holes.fresh(Domain::Bool))
        .collect();
    GrammarNode::Choice {
        guards,
        alternatives,
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::holes::{Domain, HoleRegistry};
    use crate::grammar::{build_sketch, GrammarNode, Operator};

    const OPS: [Operator; 3] = [Operator::Lt, Operator::Gt, Operator::And];

    #[test]
    fn depth_zero_is_a_lone_hole() {
        let mut holes = HoleRegistry::new();
        let sketch = build_sketch(2, &OPS, 0, &mut holes);
        match sketch {
            GrammarNode::Hole(id) => assert_eq!(holes.domain_of(id), Domain::Bool),
            other => panic!("expected a bare hole at depth 0, got {other:?}"),
        }
        assert_eq!(holes.len(), 1);
    }

    #[test]
    fn construction_is_deterministic() {
        let mut first_holes = HoleRegistry::new();
        let first = build_sketch(2, &OPS, 2, &mut first_holes);
        let mut second_holes = HoleRegistry::new();
        let second = build_sketch(2, &OPS, 2, &mut second_holes);
        assert_eq!(first, second);
        assert_eq!(first_holes.len(), second_holes.len());
    }

    #[test]
    fn every_choice_is_fully_guarded() {
        let mut holes = HoleRegistry::new();
        let sketch = build_sketch(2, &OPS, 2, &mut holes);
        let mut visited = 0;
        sketch.visit_choices(&mut |guards| {
            visited += 1;
            assert!(guards.len() > 1);
            for g in guards {
                assert_eq!(holes.domain_of(*g), Domain::Bool);
            }
        });
        assert!(visited > 0);
    }

    #[test]
    fn operator_set_controls_alternatives() {
        let mut holes = HoleRegistry::new();
        let sketch = build_sketch(2, &[Operator::Lt], 1, &mut holes);
        match sketch {
            GrammarNode::Choice { alternatives, .. } => {
                assert_eq!(alternatives.len(), 2);
                assert!(matches!(
                    alternatives[1],
                    GrammarNode::Op {
                        op: Operator::Lt,
                        ..
                    }
                ));
            }
            other => panic!("expected a guarded choice at depth 1, got {other:?}"),
        }
    }
}
