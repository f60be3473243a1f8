//! Prepared statement templates and the parameter shape they enforce

use batchline_core::{
    BatchError, Operation, ParamType, Result, TemplateHandle, Value, count_placeholders,
};
use uuid::Uuid;

/// A prepared template together with the shape every operation must match
#[derive(Debug, Clone)]
pub struct Template {
    handle: TemplateHandle,
    arity: usize,
    param_types: Option<Vec<ParamType>>,
}

impl Template {
    /// Build a template from a sink handle.
    ///
    /// The arity is the number of `?` placeholders in the handle's SQL. When
    /// `param_types` is given it must declare exactly one type per placeholder.
    pub fn new(handle: TemplateHandle, param_types: Option<Vec<ParamType>>) -> Result<Self> {
        let arity = count_placeholders(handle.sql());
        if let Some(types) = &param_types
            && types.len() != arity
        {
            return Err(BatchError::Configuration(format!(
                "template declares {} parameter type(s) but has {} placeholder(s)",
                types.len(),
                arity
            )));
        }

        Ok(Self {
            handle,
            arity,
            param_types,
        })
    }

    pub fn id(&self) -> Uuid {
        self.handle.id()
    }

    pub fn sql(&self) -> &str {
        self.handle.sql()
    }

    pub fn handle(&self) -> &TemplateHandle {
        &self.handle
    }

    /// Number of placeholders
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Declared placeholder types, if any
    pub fn param_types(&self) -> Option<&[ParamType]> {
        self.param_types.as_deref()
    }

    /// Build an operation bound to this template
    pub fn bind(&self, params: Vec<Value>) -> Operation {
        Operation::new(self.id(), params)
    }

    /// Check that `operation` matches this template's shape
    pub fn check(&self, operation: &Operation) -> Result<()> {
        if operation.template_id() != self.id() {
            return Err(BatchError::SchemaMismatch(format!(
                "operation belongs to template {} but batch template is {}",
                operation.template_id(),
                self.id()
            )));
        }

        if operation.arity() != self.arity {
            return Err(BatchError::SchemaMismatch(format!(
                "expected {} parameter(s), got {}",
                self.arity,
                operation.arity()
            )));
        }

        if let Some(types) = &self.param_types {
            for (index, (expected, value)) in types.iter().zip(operation.params()).enumerate() {
                if !expected.accepts(value) {
                    return Err(BatchError::SchemaMismatch(format!(
                        "parameter {} expects {}, got {}",
                        index + 1,
                        expected,
                        value.param_type()
                    )));
                }
            }
        }

        Ok(())
    }
}
