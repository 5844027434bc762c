use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::{StoreError, TransportError};
use super::Store;
use crate::config::ClientConfig;
use crate::datatypes::{Column, Record, RecordPayload, Schema, TableDetails, TableList, Value};
use crate::{ClientError, ClientResult};

/// A `Store` reached over the HTTP/JSON API. Table names and record ids are
/// percent-encoded as single path segments.
pub struct HttpStore {
    client: Client,
    base: Url,
}

impl HttpStore {
    /// Creates a store client for the host and port in `config`. No request
    /// is sent until the first operation.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base = Url::parse(&config.base_url())
            .map_err(|e| TransportError::Request(format!("invalid store address: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(TransportError::from)?;

        Ok(HttpStore { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Builds the URL for `segments` under the base address.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::Request(format!("cannot use `{}` as a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "store request");
        Ok(self.client.request(method, url))
    }

    /// Sends the request and turns any non-2xx answer into a `StoreError`.
    fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().map_err(|e| {
            let err = TransportError::from(e);
            warn!("store request failed: {err}");
            err
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = refusal_message(response.text());
        warn!(status = status.as_u16(), "store refused request: {message}");
        Err(StoreError::Status {
            status: status.as_u16(),
            message,
        }
        .into())
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let body = self
            .send(request)?
            .text()
            .map_err(TransportError::from)?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

impl Store for HttpStore {
    fn health(&self) -> ClientResult<()> {
        self.send(self.request(Method::GET, &["health"])?)?;
        Ok(())
    }

    fn list_tables(&self) -> ClientResult<Vec<String>> {
        let list: TableList = self.send_json(self.request(Method::GET, &["api", "tables"])?)?;
        Ok(list.tables)
    }

    fn table_details(&self, table: &str) -> ClientResult<TableDetails> {
        self.send_json(self.request(Method::GET, &["api", "tables", table, "details"])?)
    }

    fn create_table(&self, table: &str, columns: &[Column]) -> ClientResult<()> {
        let schema = Schema::new(table, columns.to_vec());
        let request = self.request(Method::POST, &["api", "tables", table])?;
        self.send(request.json(&schema))?;
        Ok(())
    }

    fn delete_table(&self, table: &str) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, &["api", "tables", table])?)?;
        Ok(())
    }

    fn create_record(&self, table: &str, values: &[Value]) -> ClientResult<Record> {
        let payload = RecordPayload {
            values: values.to_vec(),
        };
        let request = self.request(Method::POST, &["api", "tables", table, "records"])?;
        self.send_json(request.json(&payload))
    }

    fn update_record(&self, table: &str, id: &str, values: &[Value]) -> ClientResult<Record> {
        let payload = RecordPayload {
            values: values.to_vec(),
        };
        let request = self.request(Method::PUT, &["api", "tables", table, "records", id])?;
        self.send_json(request.json(&payload))
    }

    fn delete_record(&self, table: &str, id: &str) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, &["api", "tables", table, "records", id])?)?;
        Ok(())
    }

    fn intersection(&self, table_a: &str, table_b: &str) -> ClientResult<Vec<Record>> {
        self.send_json(self.request(Method::GET, &["api", "intersection", table_a, table_b])?)
    }
}

/// The store's refusal body, verbatim. A body that cannot be read still
/// leaves a message saying why.
fn refusal_message<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}
