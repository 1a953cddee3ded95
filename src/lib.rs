// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Galatea — in-page text selection, refinement, and replacement.
//!
//! Select text on a page, pick a rewrite option from a floating trigger, send
//! the text through a rewrite dispatcher, and splice the result back where
//! the selection was. The page itself is modeled in [`dom`]; embedders supply
//! rendering through [`trigger::TriggerSurface`] and transport through
//! [`dispatch::Dispatcher`].

pub mod config;
pub mod dispatch;
pub mod dom;
pub mod options;
pub mod replace;
pub mod select;
pub mod trigger;
