// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Refine options and menu composition.
//!
//! Five built-in rewrite options in a fixed order, followed by whatever
//! user-defined prompts the configuration store currently holds. Built-in ids
//! are reserved.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// One rewrite the user can ask for: a menu entry plus the prompt template
/// sent to the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineOption {
    pub id: SmolStr,
    pub icon: SmolStr,
    pub label: String,
    pub prompt_template: String,
}

pub const BUILTIN_IDS: [&str; 5] = ["rephrase", "shorten", "elaborate", "formal", "grammar"];

/// The fixed built-in set, in menu order.
pub fn builtin_options() -> Vec<RefineOption> {
    vec![
        RefineOption {
            id: SmolStr::new_static("rephrase"),
            icon: SmolStr::new_static("🔄"),
            label: "Rephrase".to_owned(),
            prompt_template: "Rephrase the following text to make it clearer and more engaging \
                              while maintaining the same meaning:"
                .to_owned(),
        },
        RefineOption {
            id: SmolStr::new_static("shorten"),
            icon: SmolStr::new_static("✂️"),
            label: "Shorten".to_owned(),
            prompt_template: "Make the following text more concise and brief while keeping the \
                              key information:"
                .to_owned(),
        },
        RefineOption {
            id: SmolStr::new_static("elaborate"),
            icon: SmolStr::new_static("📝"),
            label: "Elaborate".to_owned(),
            prompt_template: "Expand and elaborate on the following text with more detail and \
                              explanation:"
                .to_owned(),
        },
        RefineOption {
            id: SmolStr::new_static("formal"),
            icon: SmolStr::new_static("👔"),
            label: "More formal".to_owned(),
            prompt_template: "Rewrite the following text in a more formal and professional tone:"
                .to_owned(),
        },
        RefineOption {
            id: SmolStr::new_static("grammar"),
            icon: SmolStr::new_static("✅"),
            label: "Fix grammar".to_owned(),
            prompt_template: "Correct the grammar and improve the clarity of the following text \
                              while maintaining its original meaning:"
                .to_owned(),
        },
    ]
}

pub fn is_builtin_id(id: &str) -> bool {
    BUILTIN_IDS.contains(&id)
}

/// A rendered menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Option(RefineOption),
    Separator,
}

/// The full menu: built-ins in their fixed order, then a separator, then the
/// user-defined options. No separator when there are no custom options.
pub fn menu_entries(customs: &[RefineOption]) -> Vec<MenuEntry> {
    let mut entries: Vec<MenuEntry> = builtin_options().into_iter().map(MenuEntry::Option).collect();
    if !customs.is_empty() {
        entries.push(MenuEntry::Separator);
        entries.extend(customs.iter().cloned().map(MenuEntry::Option));
    }
    entries
}

/// Resolves an option id against built-ins and the given custom set.
pub fn find_option(id: &str, customs: &[RefineOption]) -> Option<RefineOption> {
    builtin_options()
        .into_iter()
        .chain(customs.iter().cloned())
        .find(|option| option.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(id: &str, label: &str) -> RefineOption {
        RefineOption {
            id: SmolStr::new(id),
            icon: SmolStr::new_static("🎯"),
            label: label.to_owned(),
            prompt_template: "Do the thing:".to_owned(),
        }
    }

    #[test]
    fn builtins_keep_fixed_order() {
        let ids: Vec<_> = builtin_options().iter().map(|o| o.id.clone()).collect();
        assert_eq!(ids, BUILTIN_IDS.map(SmolStr::new_static).to_vec());
    }

    #[test]
    fn menu_orders_builtins_separator_then_customs() {
        let customs = vec![custom("p1", "Pirate voice")];
        let entries = menu_entries(&customs);

        assert_eq!(entries.len(), 7);
        for (entry, id) in entries.iter().zip(BUILTIN_IDS) {
            match entry {
                MenuEntry::Option(option) => assert_eq!(option.id, id),
                MenuEntry::Separator => panic!("separator before builtins end"),
            }
        }
        assert_eq!(entries[5], MenuEntry::Separator);
        match &entries[6] {
            MenuEntry::Option(option) => assert_eq!(option.id, "p1"),
            MenuEntry::Separator => panic!("expected custom option"),
        }
    }

    #[test]
    fn menu_without_customs_has_no_separator() {
        let entries = menu_entries(&[]);
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| matches!(e, MenuEntry::Option(_))));
    }

    #[test]
    fn find_option_prefers_builtin_then_custom() {
        let customs = vec![custom("p1", "Pirate voice")];
        assert_eq!(find_option("shorten", &customs).map(|o| o.label), Some("Shorten".to_owned()));
        assert_eq!(find_option("p1", &customs).map(|o| o.label), Some("Pirate voice".to_owned()));
        assert_eq!(find_option("missing", &customs), None);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let json = serde_json::to_value(custom("p1", "Pirate voice")).expect("serialize");
        assert_eq!(json["promptTemplate"], "Do the thing:");
        assert_eq!(json["label"], "Pirate voice");
    }
}
