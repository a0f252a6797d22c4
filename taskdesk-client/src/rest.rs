use crate::{
    api::Error,
    transport::{Method, Request, Transport},
};

/// `Transport` over HTTP, native or in the browser
#[derive(Clone, Debug)]
pub struct RestTransport {
    client: reqwest::Client,
    base: String,
}

impl RestTransport {
    pub fn new(client: reqwest::Client, base: &str) -> RestTransport {
        RestTransport {
            client,
            base: String::from(base.trim_end_matches('/')),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for RestTransport {
    async fn send(&self, req: Request) -> Result<serde_json::Value, Error> {
        let url = self.url(&req.path);
        let builder = match req.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };
        let builder = builder.query(&req.query);
        let builder = match &req.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::Network(format!("{} {url}: {e}", req.method)))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("reading response of {url}: {e}")))?;

        if !status.is_success() {
            let err = Error::from_response(status, &body);
            tracing::debug!(?err, %status, %url, "server answered with an error");
            return Err(err);
        }
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&body)
            .map_err(|e| Error::MalformedResponse(format!("parsing response of {url}: {e}")))
    }
}
