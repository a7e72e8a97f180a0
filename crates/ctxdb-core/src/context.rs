use std::any::Any;

use serde::de::DeserializeOwned;

use crate::body::Body;
use crate::error::CoreError;
use crate::http::Request;
use crate::vars::ContextVars;

/// Request context exposed to handlers and middleware.
pub struct RequestContext {
    request: Request,
    vars: ContextVars,
}

impl RequestContext {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            vars: ContextVars::new(),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }

    pub fn body(&self) -> &Body {
        self.request.body()
    }

    pub fn vars(&self) -> &ContextVars {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut ContextVars {
        &mut self.vars
    }

    /// Bind a request-scoped variable. Returns `true` when an earlier value under `key` was
    /// replaced.
    pub fn set<K, T>(&mut self, key: K, value: T) -> bool
    where
        K: Into<String>,
        T: Any + Send + Sync,
    {
        self.vars.set(key, value)
    }

    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone,
    {
        self.vars.get(key)
    }

    pub fn json<T>(&self) -> Result<T, CoreError>
    where
        T: DeserializeOwned,
    {
        self.request
            .body()
            .to_json()
            .map_err(|err| CoreError::bad_request(format!("invalid JSON payload: {}", err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{request_builder, HeaderValue, Method, StatusCode};
    use serde::Deserialize;

    fn ctx(path: &str, body: Body) -> RequestContext {
        let request = request_builder()
            .method(Method::GET)
            .uri(path)
            .body(body)
            .expect("request");
        RequestContext::new(request)
    }

    #[test]
    fn vars_start_empty_and_accept_bindings() {
        let mut ctx = ctx("/", Body::empty());
        assert!(ctx.vars().is_empty());
        ctx.set("tenant", String::from("acme"));
        assert_eq!(ctx.get::<String>("tenant").as_deref(), Some("acme"));
        assert!(ctx.vars_mut().remove("tenant"));
        assert_eq!(ctx.get::<String>("tenant"), None);
    }

    #[test]
    fn json_deserialises_from_body() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Payload {
            name: String,
        }
        let ctx = ctx("/echo", Body::from(r#"{"name":"demo"}"#));
        let parsed: Payload = ctx.json().expect("json payload");
        assert_eq!(
            parsed,
            Payload {
                name: "demo".into()
            }
        );
    }

    #[test]
    fn invalid_json_returns_bad_request() {
        let ctx = ctx("/echo", Body::from("not json"));
        let err = ctx.json::<serde_json::Value>().expect_err("expected error");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().contains("invalid JSON payload"));
    }

    #[test]
    fn request_accessors_return_expected_values() {
        let mut ctx = ctx("/items/123", Body::from("payload"));
        ctx.request_mut()
            .headers_mut()
            .insert("x-test", HeaderValue::from_static("value"));
        assert_eq!(
            ctx.request()
                .headers()
                .get("x-test")
                .and_then(|v| v.to_str().ok()),
            Some("value")
        );
        assert_eq!(ctx.body().as_bytes(), b"payload");

        let request = ctx.into_request();
        assert_eq!(request.uri().path(), "/items/123");
    }
}
