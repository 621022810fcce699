//! Request client for the answer-generation service.
//!
//! [`RequestClient`] is the only entry point callers need: `ask` and `chat`
//! post a question and return the generated answer, `check_health` probes
//! the service root. Every call runs its own retry loop against the shared,
//! immutable configuration.

use std::sync::Arc;

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::http::{
    HttpClient, HttpResponse, RequestError, RequestOptions, ReqwestTransport, Transport,
};

/// Text produced by the service, possibly containing lightweight markup.
pub type Answer = String;

pub const GENERATE_PATH: &str = "generate/";
pub const CHAT_PATH: &str = "chat/";
pub const HEALTH_PATH: &str = "";

#[derive(Debug, Serialize)]
struct QuestionBody<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnswerBody {
    response: String,
}

#[derive(Clone)]
pub struct RequestClient {
    http: HttpClient,
}

impl RequestClient {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config, transport)?,
        })
    }

    /// Builds a client that talks to the network through reqwest.
    pub fn from_config(config: Config) -> Result<Self> {
        Self::new(config, Arc::new(ReqwestTransport::with_defaults()?))
    }

    pub fn config(&self) -> &Config {
        self.http.config()
    }

    /// Asks the generation endpoint.
    #[tracing::instrument(skip(self, question))]
    pub async fn ask(&self, question: &str) -> Result<Answer, RequestError> {
        self.post_question(GENERATE_PATH, question).await
    }

    /// Asks the chat endpoint. Same contract as [`RequestClient::ask`].
    #[tracing::instrument(skip(self, question))]
    pub async fn chat(&self, question: &str) -> Result<Answer, RequestError> {
        self.post_question(CHAT_PATH, question).await
    }

    /// Returns `true` iff the service root answers with 2xx within the retry
    /// budget. Never fails.
    #[tracing::instrument(skip(self))]
    pub async fn check_health(&self) -> bool {
        match self
            .http
            .fetch_with_retry(HEALTH_PATH, &RequestOptions::get())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                debug!("Health check failed: {:?}", e);
                false
            }
        }
    }

    async fn post_question(&self, path: &str, question: &str) -> Result<Answer, RequestError> {
        let options = RequestOptions::post_json(&QuestionBody { question })
            .map_err(|e| RequestError::Malformed(format!("{:#}", e)))?;

        let response = self.http.fetch_with_retry(path, &options).await?;
        decode_answer(&response)
    }
}

/// Extracts the `response` field of a successful reply.
fn decode_answer(response: &HttpResponse) -> Result<Answer, RequestError> {
    let body: AnswerBody = serde_json::from_slice(&response.body).map_err(|e| {
        debug!("Failed to decode answer body: {}", e);
        RequestError::Malformed(e.to_string())
    })?;
    Ok(body.response)
}
