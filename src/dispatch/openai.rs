// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::options::RefineOption;

use super::{DispatchError, Dispatcher};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const MODEL: &str = "gpt-4o-mini";

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.3;

// Appended to every prompt template so the model answers with the rewrite
// alone instead of wrapping it in prose.
const OUTPUT_ONLY_SUFFIX: &str = "Return only the refined text without any additional commentary, \
                                  explanations, or formatting.";

/// Chat-completions client for the rewrite dispatch.
#[derive(Debug, Clone)]
pub struct OpenAiDispatcher {
    endpoint: String,
    credential: String,
    client: reqwest::Client,
}

impl OpenAiDispatcher {
    pub fn new(credential: impl Into<String>) -> Result<Self, DispatchError> {
        Self::with_endpoint(credential, DEFAULT_ENDPOINT)
    }

    /// Same client against a non-default endpoint, for proxies and tests.
    pub fn with_endpoint(
        credential: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, DispatchError> {
        let credential = credential.into();
        if credential.trim().is_empty() {
            return Err(DispatchError::MissingCredential);
        }
        Ok(Self {
            endpoint: endpoint.into(),
            credential,
            client: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl Dispatcher for OpenAiDispatcher {
    async fn refine(&self, text: &str, option: &RefineOption) -> Result<String, DispatchError> {
        let system = format!("{} {OUTPUT_ONLY_SUFFIX}", option.prompt_template);
        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        tracing::debug!(option = %option.id, chars = text.len(), "dispatching rewrite");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.credential)
            .json(&body)
            .send()
            .await
            .map_err(|source| DispatchError::Transport { source })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| "unspecified failure".to_owned());
            return Err(DispatchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|source| DispatchError::Transport { source })?;
        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(DispatchError::MalformedResponse {
                detail: "reply carried no choices",
            });
        };
        let refined = choice.message.content.trim().to_owned();
        if refined.is_empty() {
            return Err(DispatchError::MalformedResponse {
                detail: "reply content was empty",
            });
        }
        Ok(refined)
    }
}
