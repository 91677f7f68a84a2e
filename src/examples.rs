use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::config::error::HolepunchConfigError;

/// One labeled observation: a fixed-arity tuple of integer inputs and the
/// boolean output the synthesized program must reproduce on them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Example {
    inputs: Vec<i64>,
    output: bool,
}

impl Example {
    pub fn new(inputs: Vec<i64>, output: bool) -> Self {
        Self { inputs, output }
    }

    pub fn inputs(&self) -> &[i64] {
        &self.inputs
    }

    pub fn output(&self) -> bool {
        self.output
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }
}

impl Display for Example {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{input}")?;
        }
        write!(f, ") -> {}", self.output)
    }
}

/// The example store: populated once, read-only during a synthesis attempt.
/// All rows share one arity, enforced at construction and on every [push].
///
/// [push]: ExampleSet::push
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExampleSet {
    rows: Vec<Example>,
}

impl ExampleSet {
    pub fn new(rows: Vec<Example>) -> Result<Self, HolepunchConfigError> {
        let arity = rows
            .first()
            .map(Example::arity)
            .ok_or(HolepunchConfigError::EmptyExampleSet)?;
        for (row, example) in rows.iter().enumerate() {
            if example.arity() != arity {
                return Err(HolepunchConfigError::ArityMismatch {
                    expected: arity,
                    found: example.arity(),
                    row,
                });
            }
        }
        Ok(Self { rows })
    }

    pub fn push(&mut self, example: Example) -> Result<(), HolepunchConfigError> {
        if example.arity() != self.arity() {
            return Err(HolepunchConfigError::ArityMismatch {
                expected: self.arity(),
                found: example.arity(),
                row: self.rows.len(),
            });
        }
        self.rows.push(example);
        Ok(())
    }

    pub fn arity(&self) -> usize {
        self.rows[0].arity()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Example] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Example> {
        self.rows.iter()
    }
}
