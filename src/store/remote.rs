//! Remote store backend.
//!
//! Talks to an Upstash-compatible REST endpoint: each operation is one
//! `POST <url>` whose JSON body is the command as an array
//! (`["SET", "key", "value", "NX", "EX", "60"]`), authenticated with a bearer
//! token. Replies are `{"result": ...}` or `{"error": "..."}`.
//!
//! Every value, strings included, is stored as its JSON text, so a read
//! returns the same JSON type that was written (`"123"` stays a string). Raw
//! text that is not JSON, such as a key written by another client, comes back
//! as a plain string; `INCR` counters come back as numbers.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use super::{KvStore, SetOptions};
use crate::config::StoreCredentials;
use crate::error_handling::StoreError;

#[derive(Debug, Deserialize)]
struct CommandReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// REST-backed [`KvStore`] implementation.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl RemoteStore {
    pub fn new(client: reqwest::Client, credentials: StoreCredentials) -> Self {
        Self {
            client,
            url: credentials.url.trim_end_matches('/').to_string(),
            token: credentials.token,
        }
    }

    async fn command(&self, args: Vec<Value>) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&args)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized(status.as_u16()));
        }

        let body = response.text().await?;
        let reply: CommandReply = serde_json::from_str(&body).map_err(|_| {
            StoreError::Protocol(format!("HTTP {} with non-JSON body", status.as_u16()))
        })?;

        if let Some(error) = reply.error {
            return Err(StoreError::Backend(error));
        }
        Ok(reply.result.unwrap_or(Value::Null))
    }
}

fn encode_value(value: &Value) -> String {
    value.to_string()
}

fn decode_value(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

#[async_trait]
impl KvStore for RemoteStore {
    fn backend_name(&self) -> &'static str {
        "remote"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self.command(vec!["GET".into(), key.into()]).await? {
            Value::Null => Ok(None),
            Value::String(raw) => Ok(Some(decode_value(raw))),
            other => Ok(Some(other)),
        }
    }

    async fn set(&self, key: &str, value: Value, options: SetOptions) -> Result<bool, StoreError> {
        let mut args: Vec<Value> = vec!["SET".into(), key.into(), encode_value(&value).into()];
        if options.if_absent {
            args.push("NX".into());
        }
        if let Some(secs) = options.expire_after_secs {
            args.push("EX".into());
            args.push(secs.to_string().into());
        }

        match self.command(args).await? {
            Value::Null => Ok(false),
            Value::String(s) if s == "OK" => Ok(true),
            other => Err(StoreError::Protocol(format!("SET replied {}", other))),
        }
    }

    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let reply = self.command(vec!["INCR".into(), key.into()]).await?;
        match &reply {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
        .ok_or_else(|| StoreError::Protocol(format!("INCR replied {}", reply)))
    }

    async fn list_keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        match self.command(vec!["KEYS".into(), pattern.into()]).await? {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()),
            Value::Null => Ok(Vec::new()),
            other => Err(StoreError::Protocol(format!("KEYS replied {}", other))),
        }
    }
}
