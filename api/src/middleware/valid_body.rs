//! JSON schema validation of request bodies

use async_trait::async_trait;
use jsonschema::Validator;
use serde_json::Value;

use tg_core::errors::{DomainError, DomainResult, SchemaViolation, ValidationError};

use crate::router::{Middleware, RequestContext};

/// Rejects bodies that do not satisfy a compiled schema
///
/// Failures carry every violation found, not only the first.
pub struct ValidBody {
    validator: Validator,
}

impl ValidBody {
    /// Compile `schema`; an invalid schema is a registration fault
    pub fn compile(schema: &Value) -> DomainResult<Self> {
        let validator = jsonschema::validator_for(schema).map_err(|e| DomainError::Internal {
            message: format!("Invalid body schema: {}", e),
        })?;
        Ok(Self { validator })
    }

    pub fn check(&self, body: &Value) -> DomainResult<()> {
        let errors: Vec<SchemaViolation> = self
            .validator
            .iter_errors(body)
            .map(|e| SchemaViolation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::InvalidBody { errors }.into())
        }
    }
}

#[async_trait(?Send)]
impl Middleware for ValidBody {
    async fn handle(&self, ctx: &mut RequestContext) -> DomainResult<()> {
        self.check(&ctx.body)
    }
}
