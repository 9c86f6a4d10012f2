//! Request and response types for the HTTP side of gocu
//!
//! This module contains the data types passed to and from the `HttpClient`,
//! plus the JSON formatting shared by request and response output.

mod client;

pub use client::{HttpClient, RequestError};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Supported HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = RequestError;

    /// Parses a method name case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            other => Err(RequestError::InvalidMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully resolved request, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    /// HTTP method
    pub method: Method,
    /// Target URL with placeholders already substituted
    pub url: String,
    /// Request body, empty for none
    pub data: String,
    /// Header name to value
    pub headers: BTreeMap<String, String>,
}

impl fmt::Display for RequestInfo {
    /// Request line, headers, then the formatted body
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.method, self.url)?;
        for (name, value) in &self.headers {
            writeln!(f, "{}: {}", name, value)?;
        }
        write!(f, "{}", prettify_json(&self.data))
    }
}

/// Response returned by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status line, e.g. `200 OK`
    pub status: String,
    /// Body, pretty-printed when it is JSON
    pub data: String,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.status)?;
        write!(f, "{}", self.data)
    }
}

/// Indents JSON text with two spaces, keeping key order.
///
/// Text that is not valid JSON is returned as is.
pub fn prettify_json(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Post".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("PATCH".parse::<Method>().unwrap(), Method::Patch);
        assert_eq!("delete".parse::<Method>().unwrap(), Method::Delete);
        assert_eq!("put".parse::<Method>().unwrap(), Method::Put);
    }

    #[test]
    fn test_method_parse_invalid() {
        let err = "options".parse::<Method>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid HTTP method received: OPTIONS");
    }

    #[test]
    fn test_prettify_json_indents_and_keeps_order() {
        let pretty = prettify_json(r#"{"z":1,"a":[true,null]}"#);
        assert_eq!(pretty, "{\n  \"z\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}");
    }

    #[test]
    fn test_prettify_json_passes_through_non_json() {
        assert_eq!(prettify_json("<html></html>"), "<html></html>");
        assert_eq!(prettify_json(""), "");
    }

    #[test]
    fn test_request_info_display() {
        let request = RequestInfo {
            method: Method::Post,
            url: "https://api.test/items".to_string(),
            data: r#"{"a":1}"#.to_string(),
            headers: BTreeMap::from([
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), "Bearer abc".to_string()),
            ]),
        };

        assert_eq!(
            request.to_string(),
            "POST https://api.test/items\n\
             Authorization: Bearer abc\n\
             Content-Type: application/json\n\
             {\n  \"a\": 1\n}"
        );
    }
}
