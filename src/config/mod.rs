// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistent profile: API credential and user-defined prompts.
//!
//! A single JSON file holds the credential and the ordered custom prompt
//! list. Writes go through the CRUD surface here and publish the new prompt
//! list on a watch channel; the trigger controller subscribes so menu content
//! follows the store without polling.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tokio::sync::watch;

use crate::options::{is_builtin_id, RefineOption};

pub const DEFAULT_PROMPT_ICON: &str = "🎯";

/// A user-defined rewrite prompt as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPrompt {
    pub id: String,
    pub icon: String,
    pub name: String,
    pub prompt_template: String,
}

impl CustomPrompt {
    pub fn to_option(&self) -> RefineOption {
        RefineOption {
            id: SmolStr::new(&self.id),
            icon: SmolStr::new(&self.icon),
            label: self.name.clone(),
            prompt_template: self.prompt_template.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileFile {
    #[serde(default)]
    api_credential: Option<String>,
    #[serde(default)]
    custom_prompts: Vec<CustomPrompt>,
    #[serde(default)]
    next_prompt_id: u64,
}

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    InvalidCredential { reason: &'static str },
    EmptyField { field: &'static str },
    ReservedId { id: String },
    PromptNotFound { id: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "invalid profile json at {}: {source}", path.display())
            }
            Self::InvalidCredential { reason } => write!(f, "invalid credential: {reason}"),
            Self::EmptyField { field } => write!(f, "field must not be empty (field={field})"),
            Self::ReservedId { id } => write!(f, "id is reserved for a built-in option (id={id})"),
            Self::PromptNotFound { id } => write!(f, "custom prompt not found (id={id})"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// JSON-file-backed profile store with in-process change notifications.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    profile: ProfileFile,
    prompts_tx: watch::Sender<Vec<CustomPrompt>>,
}

impl ProfileStore {
    /// Loads the profile at `path`, initializing an empty one when the file
    /// does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let profile = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?,
            Err(source) if source.kind() == io::ErrorKind::NotFound => ProfileFile::default(),
            Err(source) => {
                return Err(StoreError::Io {
                    path,
                    source,
                })
            }
        };
        let (prompts_tx, _) = watch::channel(profile.custom_prompts.clone());
        Ok(Self {
            path,
            profile,
            prompts_tx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn api_credential(&self) -> Option<&str> {
        self.profile.api_credential.as_deref()
    }

    pub fn custom_prompts(&self) -> &[CustomPrompt] {
        &self.profile.custom_prompts
    }

    /// Custom prompts mapped into menu options, preserving stored order.
    pub fn custom_options(&self) -> Vec<RefineOption> {
        self.profile
            .custom_prompts
            .iter()
            .map(CustomPrompt::to_option)
            .collect()
    }

    /// Subscribes to prompt-list changes. The receiver observes the list as
    /// of subscription time immediately.
    pub fn subscribe_prompts(&self) -> watch::Receiver<Vec<CustomPrompt>> {
        self.prompts_tx.subscribe()
    }

    /// Stores the API credential. The value is trimmed and must carry the
    /// expected `sk-` prefix.
    pub fn set_credential(&mut self, raw: &str) -> Result<(), StoreError> {
        let credential = raw.trim();
        if credential.is_empty() {
            return Err(StoreError::InvalidCredential {
                reason: "credential is empty",
            });
        }
        if !credential.starts_with("sk-") {
            return Err(StoreError::InvalidCredential {
                reason: "credential must start with 'sk-'",
            });
        }
        self.profile.api_credential = Some(credential.to_owned());
        self.persist()
    }

    pub fn add_custom_prompt(
        &mut self,
        name: &str,
        prompt_template: &str,
    ) -> Result<CustomPrompt, StoreError> {
        let (name, prompt_template) = validated_fields(name, prompt_template)?;
        let id = format!("custom-{}", self.profile.next_prompt_id);
        self.profile.next_prompt_id += 1;
        let prompt = CustomPrompt {
            id,
            icon: DEFAULT_PROMPT_ICON.to_owned(),
            name,
            prompt_template,
        };
        self.profile.custom_prompts.push(prompt.clone());
        self.persist()?;
        self.publish();
        Ok(prompt)
    }

    pub fn update_custom_prompt(
        &mut self,
        id: &str,
        name: &str,
        prompt_template: &str,
    ) -> Result<(), StoreError> {
        if is_builtin_id(id) {
            return Err(StoreError::ReservedId { id: id.to_owned() });
        }
        let (name, prompt_template) = validated_fields(name, prompt_template)?;
        let Some(prompt) = self
            .profile
            .custom_prompts
            .iter_mut()
            .find(|prompt| prompt.id == id)
        else {
            return Err(StoreError::PromptNotFound { id: id.to_owned() });
        };
        prompt.name = name;
        prompt.prompt_template = prompt_template;
        self.persist()?;
        self.publish();
        Ok(())
    }

    pub fn delete_custom_prompt(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.profile.custom_prompts.len();
        self.profile.custom_prompts.retain(|prompt| prompt.id != id);
        if self.profile.custom_prompts.len() == before {
            return Err(StoreError::PromptNotFound { id: id.to_owned() });
        }
        self.persist()?;
        self.publish();
        Ok(())
    }

    fn persist(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(&self.profile).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, raw).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn publish(&self) {
        self.prompts_tx
            .send_replace(self.profile.custom_prompts.clone());
    }
}

fn validated_fields(
    name: &str,
    prompt_template: &str,
) -> Result<(String, String), StoreError> {
    let name = name.trim();
    let prompt_template = prompt_template.trim();
    if name.is_empty() {
        return Err(StoreError::EmptyField { field: "name" });
    }
    if prompt_template.is_empty() {
        return Err(StoreError::EmptyField { field: "promptTemplate" });
    }
    Ok((name.to_owned(), prompt_template.to_owned()))
}
