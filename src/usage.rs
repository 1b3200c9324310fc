//! Usage Module
//!
//! Finds JSX call sites of components and the attribute names each one supplies.
//! Names come from a lightweight `identifier =` scan over the attribute list, so
//! an `=` inside an expression value (`{a => a}`) can report a stray name.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scanner::find_component_tags;

lazy_static! {
    static ref PROP_ASSIGN_RE: Regex = Regex::new(r"\b([a-zA-Z_][A-Za-z0-9_]*)\s*=").unwrap();
}

/// One JSX call site and the props it supplies, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub component: String,
    pub props: Vec<String>,
}

/// Attribute names assigned with `=` in a raw attribute list
pub fn supplied_prop_names(attrs: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PROP_ASSIGN_RE.captures_iter(attrs) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Every component call site in a document that supplies at least one prop
pub fn extract_usages(source: &str) -> Vec<Usage> {
    find_component_tags(source)
        .into_iter()
        .filter_map(|tag| {
            let props = supplied_prop_names(&tag.attribute_text());
            (!props.is_empty()).then(|| Usage {
                component: tag.name,
                props,
            })
        })
        .collect()
}
