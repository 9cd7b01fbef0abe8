use serde_json::{Map, Value};
use serroute_schema::{BodySchema, ParseOutcome};

/// The handler bound to an endpoint.
///
/// Invoked with whatever the schema parse produced — a validated body or
/// a failure descriptor. The handler owns the distinction; triggering
/// never branches on the outcome.
pub type Handler = Box<dyn FnMut(ParseOutcome) + Send>;

/// A named command endpoint: a routing path, a body schema, and a handler.
///
/// `path` and `schema` are immutable after construction; the handler is
/// replaceable at runtime via [`Endpoint::set_handler`].
pub struct Endpoint {
    path: String,
    schema: BodySchema,
    handler: Handler,
}

impl Endpoint {
    /// Create an endpoint.
    ///
    /// The path is the routing key and the required line prefix, e.g.
    /// `/drive`.
    pub fn new(
        path: impl Into<String>,
        schema: BodySchema,
        handler: impl FnMut(ParseOutcome) + Send + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            schema,
            handler: Box::new(handler),
        }
    }

    /// The routing path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The declared body schema.
    pub fn schema(&self) -> &BodySchema {
        &self.schema
    }

    /// Validate and coerce a raw field map against this endpoint's schema.
    pub fn parse_body(&self, raw: &Map<String, Value>) -> ParseOutcome {
        self.schema.parse(raw)
    }

    /// Parse a query string, validate it, and invoke the handler with the
    /// outcome.
    ///
    /// Accepts the `key=value&key2=value2` form with or without a leading
    /// `?`. Values are percent-decoded; duplicate keys keep the last value.
    pub fn trigger(&mut self, query_string: &str) {
        let query = query_string.strip_prefix('?').unwrap_or(query_string);

        let mut raw = Map::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            raw.insert(key.into_owned(), Value::String(value.into_owned()));
        }

        let outcome = self.schema.parse(&raw);
        (self.handler)(outcome);
    }

    /// Replace the handler for subsequent triggers.
    pub fn set_handler(&mut self, handler: impl FnMut(ParseOutcome) + Send + 'static) {
        self.handler = Box::new(handler);
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("path", &self.path)
            .field("schema_fields", &self.schema.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;
    use serroute_schema::{FieldKind, FieldSpec, FieldValue};

    use super::*;

    fn capture() -> (Arc<Mutex<Vec<ParseOutcome>>>, impl FnMut(ParseOutcome) + Send) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |outcome| sink.lock().unwrap().push(outcome))
    }

    fn drive_schema() -> BodySchema {
        BodySchema::new()
            .field("x", FieldSpec::new(FieldKind::Number).required())
            .field("y", FieldSpec::new(FieldKind::Number).required())
    }

    #[test]
    fn trigger_parses_and_invokes_handler() {
        let (seen, handler) = capture();
        let mut endpoint = Endpoint::new("/drive", drive_schema(), handler);

        endpoint.trigger("?x=10&y=-5");

        let seen = seen.lock().unwrap();
        let body = seen[0].body().expect("valid query should produce a body");
        assert_eq!(body.get("x"), Some(&FieldValue::Number(10.0)));
        assert_eq!(body.get("y"), Some(&FieldValue::Number(-5.0)));
    }

    #[test]
    fn trigger_accepts_query_without_question_mark() {
        let (seen, handler) = capture();
        let mut endpoint = Endpoint::new("/drive", drive_schema(), handler);

        endpoint.trigger("x=1&y=2");
        assert!(seen.lock().unwrap()[0].is_valid());
    }

    #[test]
    fn trigger_passes_failure_to_handler_unbranched() {
        let (seen, handler) = capture();
        let mut endpoint = Endpoint::new("/drive", drive_schema(), handler);

        endpoint.trigger("?x=abc&y=2");

        let seen = seen.lock().unwrap();
        let failure = seen[0].failure().expect("bad number should fail");
        assert_eq!(failure.failed_fields, vec!["x".to_string()]);
    }

    #[test]
    fn trigger_percent_decodes_values() {
        let (seen, handler) = capture();
        let schema = BodySchema::new().field("msg", FieldSpec::new(FieldKind::String));
        let mut endpoint = Endpoint::new("/say", schema, handler);

        endpoint.trigger("?msg=hello%20world");

        let seen = seen.lock().unwrap();
        let body = seen[0].body().unwrap();
        assert_eq!(body.get("msg"), Some(&FieldValue::Text("hello world".into())));
    }

    #[test]
    fn duplicate_query_keys_keep_the_last_value() {
        let (seen, handler) = capture();
        let schema = BodySchema::new().field("n", FieldSpec::new(FieldKind::Number));
        let mut endpoint = Endpoint::new("/n", schema, handler);

        endpoint.trigger("?n=1&n=2");

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0].body().unwrap().get("n"),
            Some(&FieldValue::Number(2.0))
        );
    }

    #[test]
    fn set_handler_replaces_for_subsequent_triggers() {
        let (first_seen, first) = capture();
        let (second_seen, second) = capture();
        let mut endpoint = Endpoint::new("/drive", drive_schema(), first);

        endpoint.trigger("?x=1&y=1");
        endpoint.set_handler(second);
        endpoint.trigger("?x=2&y=2");

        assert_eq!(first_seen.lock().unwrap().len(), 1);
        assert_eq!(second_seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn parse_body_accepts_structured_values_directly() {
        let (_seen, handler) = capture();
        let schema = BodySchema::new()
            .field("tags", FieldSpec::new(FieldKind::Array))
            .field("meta", FieldSpec::new(FieldKind::Object));
        let endpoint = Endpoint::new("/cfg", schema, handler);

        let mut raw = Map::new();
        raw.insert("tags".into(), json!(["a", "b"]));
        raw.insert("meta".into(), json!({"k": 1}));

        let outcome = endpoint.parse_body(&raw);
        let body = outcome.body().unwrap();
        assert!(matches!(body.get("tags"), Some(FieldValue::List(_))));
        assert!(matches!(body.get("meta"), Some(FieldValue::Map(_))));
    }

    #[test]
    fn path_is_stable() {
        let (_seen, handler) = capture();
        let endpoint = Endpoint::new("/drive", drive_schema(), handler);
        assert_eq!(endpoint.path(), "/drive");
        assert_eq!(endpoint.schema().len(), 2);
    }
}
