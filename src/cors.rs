//! CORS at the HTTP boundary: preflight answers and the allow-origin header.

use crate::config::CorsConfig;
use crate::error::ConfigError;
use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_METHOD,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

#[derive(Clone, Debug)]
pub struct CorsPolicy {
    methods: Vec<Method>,
    allow_methods: HeaderValue,
    max_age: HeaderValue,
}

impl CorsPolicy {
    pub fn from_config(cfg: &CorsConfig) -> Result<Self, ConfigError> {
        let methods = cfg
            .methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.as_bytes())
                    .map_err(|_| ConfigError::Validation(format!("invalid CORS method: {}", m)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let listed = if methods.is_empty() {
            "GET, OPTIONS".to_string()
        } else {
            format!("{}, GET, OPTIONS", cfg.methods.join(","))
        };
        let allow_methods = HeaderValue::from_str(&listed)
            .map_err(|_| ConfigError::Validation(format!("invalid CORS method list: {}", listed)))?;
        Ok(CorsPolicy {
            methods,
            allow_methods,
            max_age: HeaderValue::from(cfg.max_age_secs),
        })
    }

    pub fn allows(&self, requested: &str) -> bool {
        self.methods.iter().any(|m| m.as_str() == requested)
    }

    /// Always 204. The CORS headers are only attached when the requested method is allowed.
    pub fn preflight(&self, request_headers: &HeaderMap) -> Response {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let requested = request_headers
            .get(ACCESS_CONTROL_REQUEST_METHOD)
            .and_then(|v| v.to_str().ok());
        if requested.is_some_and(|m| self.allows(m)) {
            let headers = response.headers_mut();
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
            headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
            headers.insert(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("X-Requested-With, Content-Type"),
            );
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
            headers.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        }
        response
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn cors(State(policy): State<CorsPolicy>, req: Request, next: Next) -> Response {
    if *req.method() == Method::OPTIONS {
        return policy.preflight(req.headers());
    }
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_method(m: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(ACCESS_CONTROL_REQUEST_METHOD, HeaderValue::from_str(m).unwrap());
        h
    }

    #[test]
    fn preflight_for_allowed_method_lists_everything() {
        let policy = CorsPolicy::from_config(&CorsConfig::default()).unwrap();
        let response = policy.preflight(&request_method("DELETE"));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let h = response.headers();
        assert_eq!(h[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(h[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(h[ACCESS_CONTROL_ALLOW_METHODS], "PATCH,DELETE,PUT, GET, OPTIONS");
        assert_eq!(h[ACCESS_CONTROL_MAX_AGE], "86400");
    }

    #[test]
    fn preflight_for_other_method_has_no_cors_headers() {
        let policy = CorsPolicy::from_config(&CorsConfig::default()).unwrap();
        let response = policy.preflight(&request_method("POST"));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

        let bare = policy.preflight(&HeaderMap::new());
        assert_eq!(bare.status(), StatusCode::NO_CONTENT);
        assert!(bare.headers().is_empty());
    }

    #[test]
    fn empty_allow_list_still_announces_get() {
        let cfg = CorsConfig {
            methods: Vec::new(),
            ..CorsConfig::default()
        };
        let policy = CorsPolicy::from_config(&cfg).unwrap();
        assert!(!policy.allows("PUT"));
        assert_eq!(policy.allow_methods, "GET, OPTIONS");
    }
}
