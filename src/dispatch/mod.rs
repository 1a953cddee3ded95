// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rewrite dispatch: the message contract between page and worker, the
//! dispatcher abstraction over the text-generation service, and the runtime
//! health probe guarding it.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::options::{find_option, RefineOption};

mod openai;

pub use openai::{OpenAiDispatcher, DEFAULT_ENDPOINT, MODEL};

pub const REFINE_ACTION: &str = "refineText";

/// A rewrite request as it travels between page and worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineRequest {
    pub action: SmolStr,
    pub text: String,
    pub option: SmolStr,
}

impl RefineRequest {
    pub fn new(text: impl Into<String>, option: impl Into<SmolStr>) -> Self {
        Self {
            action: SmolStr::new_static(REFINE_ACTION),
            text: text.into(),
            option: option.into(),
        }
    }
}

/// The worker's reply. Exactly one of `refined_text` and `error` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RefineResponse {
    pub fn ok(refined_text: impl Into<String>) -> Self {
        Self {
            success: true,
            refined_text: Some(refined_text.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            refined_text: None,
            error: Some(message.into()),
        }
    }

    /// Collapses the wire shape back into a result.
    pub fn into_result(self) -> Result<String, DispatchError> {
        if self.success {
            self.refined_text.ok_or(DispatchError::MalformedResponse {
                detail: "success reply without refined text",
            })
        } else {
            Err(DispatchError::Rejected {
                message: self
                    .error
                    .unwrap_or_else(|| "unspecified failure".to_owned()),
            })
        }
    }
}

#[derive(Debug)]
pub enum DispatchError {
    MissingCredential,
    Transport { source: reqwest::Error },
    Api { status: u16, message: String },
    MalformedResponse { detail: &'static str },
    Rejected { message: String },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "no api credential configured"),
            Self::Transport { source } => write!(f, "transport failure: {source}"),
            Self::Api { status, message } => {
                write!(f, "api rejected the request (status={status}): {message}")
            }
            Self::MalformedResponse { detail } => write!(f, "malformed api response: {detail}"),
            Self::Rejected { message } => write!(f, "refine rejected: {message}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport { source } => Some(source),
            _ => None,
        }
    }
}

/// Anything that can turn selected text plus a refine option into rewritten
/// text. The production implementation talks to OpenAI; tests script one.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn refine(&self, text: &str, option: &RefineOption) -> Result<String, DispatchError>;
}

/// Worker-side entry point: resolve the option id, dispatch, and wrap the
/// outcome back into the wire shape. Never panics on bad input; every failure
/// becomes a `success: false` reply.
pub async fn handle_request(
    dispatcher: &dyn Dispatcher,
    customs: &[RefineOption],
    request: &RefineRequest,
) -> RefineResponse {
    if request.action != REFINE_ACTION {
        return RefineResponse::failure(format!("unknown action: {}", request.action));
    }
    let Some(option) = find_option(&request.option, customs) else {
        return RefineResponse::failure(format!("unknown refine option: {}", request.option));
    };
    match dispatcher.refine(&request.text, &option).await {
        Ok(refined) => RefineResponse::ok(refined),
        Err(err) => {
            tracing::error!(option = %request.option, error = %err, "refine dispatch failed");
            RefineResponse::failure(err.to_string())
        }
    }
}

/// Whether the host runtime behind the dispatcher is still reachable. A page
/// outlives the worker it talks to; probing first turns the resulting limbo
/// into an explicit teardown signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeHealth {
    Alive,
    Invalidated,
}

pub trait HostRuntime {
    fn probe(&self) -> RuntimeHealth;
}

/// Probe for embedders whose runtime never goes away.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAlive;

impl HostRuntime for AlwaysAlive {
    fn probe(&self) -> RuntimeHealth {
        RuntimeHealth::Alive
    }
}

#[cfg(test)]
mod tests;
