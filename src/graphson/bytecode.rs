//! Traversal programs.
//!
//! A [`Bytecode`] program is two ordered instruction lists: source instructions
//! configure the traversal source (`withSack`, `withStrategies`), step
//! instructions are the traversal itself (`V`, `has`, `out`). Callers build the
//! program directly; order is preserved exactly on the wire.

use super::types::Value;

/// A single operation and its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Operation name
    pub operator: String,
    /// Arguments in call order
    pub arguments: Vec<Value>,
}

impl Instruction {
    /// Create a new instruction.
    pub fn new<I, V>(operator: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            operator: operator.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }
}

/// A traversal program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bytecode {
    /// Source instructions
    pub source_instructions: Vec<Instruction>,
    /// Step instructions
    pub step_instructions: Vec<Instruction>,
}

impl Bytecode {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source instruction.
    pub fn add_source<I, V>(&mut self, operator: impl Into<String>, arguments: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.source_instructions
            .push(Instruction::new(operator, arguments));
    }

    /// Append a step instruction.
    pub fn add_step<I, V>(&mut self, operator: impl Into<String>, arguments: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.step_instructions.push(Instruction::new(operator, arguments));
    }

    /// Builder form of [`add_source`](Self::add_source).
    pub fn with_source<I, V>(mut self, operator: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_source(operator, arguments);
        self
    }

    /// Builder form of [`add_step`](Self::add_step).
    pub fn with_step<I, V>(mut self, operator: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_step(operator, arguments);
        self
    }

    /// Check if the program has no instructions at all.
    pub fn is_empty(&self) -> bool {
        self.source_instructions.is_empty() && self.step_instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let bytecode = Bytecode::new()
            .with_source("withSack", [1i32])
            .with_step("V", Vec::<Value>::new())
            .with_step("has", ["person", "name", "marko"])
            .with_step("out", ["knows"]);

        assert_eq!(bytecode.source_instructions.len(), 1);
        let ops: Vec<_> = bytecode
            .step_instructions
            .iter()
            .map(|i| i.operator.as_str())
            .collect();
        assert_eq!(ops, ["V", "has", "out"]);
        assert_eq!(
            bytecode.step_instructions[1].arguments,
            vec![Value::from("person"), Value::from("name"), Value::from("marko")]
        );
    }

    #[test]
    fn test_is_empty() {
        let mut bytecode = Bytecode::new();
        assert!(bytecode.is_empty());
        bytecode.add_source("withComputer", Vec::<Value>::new());
        assert!(!bytecode.is_empty());
    }
}
