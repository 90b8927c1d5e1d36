//! Handler argument extraction

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use tg_core::errors::DomainResult;

use super::context::{FieldPath, RequestContext};

type ComputeFn = dyn Fn(&RequestContext) -> Value + Send + Sync;

/// How one positional handler argument is pulled out of a request
#[derive(Clone)]
pub enum ArgExtractor {
    FieldPath(FieldPath),
    Computed(Arc<ComputeFn>),
}

impl ArgExtractor {
    /// Extractor for a dotted request path such as `params.id`
    pub fn field(path: &str) -> DomainResult<Self> {
        Ok(ArgExtractor::FieldPath(FieldPath::parse(path)?))
    }

    /// Extractor for a dotted path relative to the request body
    pub fn body(path: &str) -> DomainResult<Self> {
        Ok(ArgExtractor::FieldPath(FieldPath::body(path)?))
    }

    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&RequestContext) -> Value + Send + Sync + 'static,
    {
        ArgExtractor::Computed(Arc::new(f))
    }

    pub fn extract(&self, ctx: &RequestContext) -> Value {
        match self {
            ArgExtractor::FieldPath(path) => ctx.lookup(path),
            ArgExtractor::Computed(f) => f(ctx),
        }
    }
}

impl fmt::Debug for ArgExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgExtractor::FieldPath(path) => f.debug_tuple("FieldPath").field(path).finish(),
            ArgExtractor::Computed(_) => f.write_str("Computed"),
        }
    }
}

/// Reusable computed extractors
pub mod arg_parsers {
    use serde_json::Value;

    use tg_core::errors::DomainResult;

    use super::ArgExtractor;
    use crate::router::context::FieldPath;

    /// De-duplicated integers from a separated string or an array at `path`
    ///
    /// Items that do not parse are dropped; a missing or non-list value
    /// yields `[]`. First occurrences keep their order.
    pub fn uniq_int_array(path: &str, sep: &str) -> DomainResult<ArgExtractor> {
        let field = FieldPath::parse(path)?;
        let sep = sep.to_string();

        Ok(ArgExtractor::computed(move |ctx| {
            let items: Vec<Value> = match ctx.lookup(&field) {
                Value::Array(items) => items,
                Value::String(s) => s.split(sep.as_str()).map(|i| Value::String(i.to_string())).collect(),
                _ => Vec::new(),
            };

            let mut ids: Vec<i64> = Vec::new();
            for id in items.iter().filter_map(parse_int) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            Value::from(ids)
        }))
    }

    fn parse_int(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::arg_parsers::uniq_int_array;
    use super::*;
    use actix_web::http::Method;
    use serde_json::json;

    #[test]
    fn test_uniq_int_array_from_string() {
        let ctx = RequestContext::new(Method::GET, "/items?ids=3,1,x,3,2");
        let extractor = uniq_int_array("query.ids", ",").unwrap();
        assert_eq!(extractor.extract(&ctx), json!([3, 1, 2]));
    }

    #[test]
    fn test_uniq_int_array_from_array() {
        let ctx = RequestContext::new(Method::POST, "/items").with_body(json!({ "ids": [1, "2", 1, null, 4.5] }));
        let extractor = uniq_int_array("body.ids", ",").unwrap();
        assert_eq!(extractor.extract(&ctx), json!([1, 2]));
    }

    #[test]
    fn test_uniq_int_array_from_repeated_query() {
        let ctx = RequestContext::new(Method::GET, "/items?ids=1&ids=2&ids=1");
        let extractor = uniq_int_array("query.ids", ",").unwrap();
        assert_eq!(extractor.extract(&ctx), json!([1, 2]));
    }

    #[test]
    fn test_uniq_int_array_missing() {
        let ctx = RequestContext::new(Method::GET, "/items");
        let extractor = uniq_int_array("query.ids", ",").unwrap();
        assert_eq!(extractor.extract(&ctx), json!([]));
    }

    #[test]
    fn test_computed_extractor() {
        let ctx = RequestContext::new(Method::DELETE, "/items/1");
        let extractor = ArgExtractor::computed(|ctx| json!(ctx.method.as_str()));
        assert_eq!(extractor.extract(&ctx), json!("DELETE"));
    }
}
