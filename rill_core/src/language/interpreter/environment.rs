use std::collections::HashMap;

use crate::language::error::Result;
use crate::language::token::Token;
use crate::runtime_error;

use super::value::Value;

#[derive(Debug, Clone)]
struct Binding {
    line: usize,
    value: Value,
}

/// One lexical scope frame, linked to its enclosing frame. Names resolve by
/// lexeme text, innermost frame first. A name may be defined at most once per
/// frame; shadowing the same name in a child frame is always legal.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Binding>,
    parent: Option<Box<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn with_parent(parent: Environment) -> Self {
        Environment {
            values: HashMap::new(),
            parent: Some(Box::new(parent)),
        }
    }

    /// Discards this frame and hands back the enclosing one. Only call on
    /// frames created with `with_parent`.
    pub fn into_parent(self) -> Environment {
        self.parent.map(|parent| *parent).unwrap_or_default()
    }

    pub fn define(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(existing) = self.values.get(&name.lexeme) {
            return runtime_error!(
                name,
                format!(
                    "Variable '{}' is already defined at line {}.",
                    name.lexeme, existing.line
                )
            );
        }

        self.values.insert(
            name.lexeme.clone(),
            Binding {
                line: name.line,
                value,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(binding) = self.values.get(&name.lexeme) {
            return Ok(binding.value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.get(name);
        }
        runtime_error!(name, format!("Undefined variable '{}'.", name.lexeme))
    }

    /// Mutates the nearest frame that already defines the name; assignment
    /// never creates a binding.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(binding) = self.values.get_mut(&name.lexeme) {
            binding.value = value;
            return Ok(());
        }
        if let Some(parent) = &mut self.parent {
            return parent.assign(name, value);
        }
        runtime_error!(name, format!("Undefined variable '{}'.", name.lexeme))
    }
}
