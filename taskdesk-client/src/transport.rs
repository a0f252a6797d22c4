use std::fmt;

use crate::api::Error;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        })
    }
}

/// A request to the REST collaborator, with `path` relative to its base URL
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Request {
        Request {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Request {
        Request::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Request {
        Request::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Request {
        Request::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Request {
        Request::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Request {
        Request::new(Method::Delete, path)
    }

    pub fn query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Request {
        self.query.extend(pairs);
        self
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Request {
        self.query.push((String::from(key), value.to_string()));
        self
    }

    pub fn json<T: serde::Serialize>(mut self, body: &T) -> Result<Request, Error> {
        let body = serde_json::to_value(body)
            .map_err(|e| Error::Validation(format!("serializing request body: {e}")))?;
        self.body = Some(body);
        Ok(self)
    }

    pub fn path_segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Carries requests to the REST collaborator and hands back the decoded JSON body
///
/// A success without a body comes back as `Value::Null`. Non-success responses
/// must be turned into the matching `Error`.
#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, req: Request) -> Result<serde_json::Value, Error>;
}

#[async_trait::async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for std::rc::Rc<T> {
    async fn send(&self, req: Request) -> Result<serde_json::Value, Error> {
        (**self).send(req).await
    }
}
