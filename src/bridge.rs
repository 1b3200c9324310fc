//! Node Bridge
//!
//! N-API surface for an editor extension. The extension owns the save event and
//! the confirmation dialog, so syncs are exposed in two steps: `plan*` returns a
//! proposal (edit plus prompt text) and `resolve*` applies or drops it.

use napi_derive::napi;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::cache::SignatureCache;
use crate::config::SyncOptions;
use crate::edits::{LineIndex, WorkspaceEdit};
use crate::error::SyncError;
use crate::scanner::scan_attributes;
use crate::signature::extract_signatures;
use crate::sync::{DefinitionSyncPlan, PropSync, UsageSyncPlan};
use crate::usage::{extract_usages, Usage};
use crate::workspace::{Choice, FsWorkspace, Prompt, Workspace};

fn to_napi_error(e: SyncError) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn choice_from(apply: bool) -> Option<Choice> {
    if apply {
        Some(Choice::Apply)
    } else {
        Some(Choice::Cancel)
    }
}

fn prompt_json(prompt: &Prompt) -> Value {
    json!({
        "message": prompt.message,
        "applyLabel": prompt.apply_label,
        "cancelLabel": prompt.cancel_label,
    })
}

#[napi]
pub fn scan_attributes_native(attrs: String) -> Value {
    serde_json::to_value(scan_attributes(&attrs)).unwrap_or(Value::Null)
}

#[napi]
pub fn extract_signatures_native(source: String) -> Value {
    serde_json::to_value(extract_signatures(&source)).unwrap_or(Value::Null)
}

#[napi]
pub fn extract_usages_native(source: String) -> Value {
    serde_json::to_value(extract_usages(&source)).unwrap_or(Value::Null)
}

#[napi]
pub struct PropSyncSession {
    inner: PropSync<FsWorkspace, SignatureCache>,
}

#[napi]
impl PropSyncSession {
    #[napi(constructor)]
    pub fn new(root: String, options_json: Option<String>) -> napi::Result<Self> {
        let options = match options_json {
            Some(json) => SyncOptions::from_json(&json).map_err(to_napi_error)?,
            None => SyncOptions::default(),
        };
        let workspace = FsWorkspace::new(PathBuf::from(root), options.clone());
        Ok(Self {
            inner: PropSync::new(workspace, SignatureCache::new(), options),
        })
    }

    /// Record the signatures of a saved document and return the changes to
    /// push to usages. Call `usages_of` once those syncs are resolved.
    #[napi]
    pub fn observe_save(&mut self, path: String, language_id: String, text: String) -> Value {
        if !self.inner.options().handles_language(&language_id) {
            return json!([]);
        }
        let changes = self.inner.observe_signatures(&PathBuf::from(path), &text);
        serde_json::to_value(changes).unwrap_or(Value::Null)
    }

    /// First usage per component in the current text of `path`, to pull into
    /// definitions
    #[napi]
    pub fn usages_of(&self, path: String) -> napi::Result<Value> {
        let text = self
            .inner
            .workspace()
            .read(&PathBuf::from(path))
            .map_err(to_napi_error)?;

        let mut seen = HashSet::new();
        let usages: Vec<Usage> = extract_usages(&text)
            .into_iter()
            .filter(|u| !u.props.is_empty() && seen.insert(u.component.clone()))
            .collect();

        Ok(serde_json::to_value(usages)?)
    }

    #[napi]
    pub fn plan_usage_sync(
        &self,
        component: String,
        props: Vec<String>,
        removed: Vec<String>,
    ) -> napi::Result<Value> {
        let plan = self
            .inner
            .plan_usage_sync(&component, &props, &removed)
            .map_err(to_napi_error)?;
        match plan {
            Some(plan) => self.proposal(serde_json::to_value(&plan)?, &plan.prompt(), &plan.edit),
            None => Ok(Value::Null),
        }
    }

    #[napi]
    pub fn plan_definition_sync(&self, component: String, props: Vec<String>) -> napi::Result<Value> {
        let usage = Usage { component, props };
        let plan = self
            .inner
            .plan_definition_sync(&usage)
            .map_err(to_napi_error)?;
        match plan {
            Some(plan) => self.proposal(serde_json::to_value(&plan)?, &plan.prompt(), &plan.edit),
            None => Ok(Value::Null),
        }
    }

    #[napi]
    pub fn resolve_usage_plan(&mut self, plan_json: String, apply: bool) -> napi::Result<Value> {
        let plan: UsageSyncPlan = serde_json::from_str(&plan_json)?;
        let outcome = self
            .inner
            .resolve_usage_plan(&plan, choice_from(apply))
            .map_err(to_napi_error)?;
        Ok(serde_json::to_value(outcome)?)
    }

    #[napi]
    pub fn resolve_definition_plan(&mut self, plan_json: String, apply: bool) -> napi::Result<Value> {
        let plan: DefinitionSyncPlan = serde_json::from_str(&plan_json)?;
        let outcome = self
            .inner
            .resolve_definition_plan(&plan, choice_from(apply))
            .map_err(to_napi_error)?;
        Ok(serde_json::to_value(outcome)?)
    }

    /// Plan JSON plus prompt text and editor ranges for previewing the edit
    fn proposal(&self, plan: Value, prompt: &Prompt, edit: &WorkspaceEdit) -> napi::Result<Value> {
        let mut ranges = Vec::new();
        for (path, file_edit) in edit.files() {
            let source = self.inner.workspace().read(path).map_err(to_napi_error)?;
            let index = LineIndex::new(&source);
            for text_edit in &file_edit.edits {
                ranges.push(json!({
                    "path": path,
                    "start": index.position_at(text_edit.start),
                    "end": index.position_at(text_edit.end),
                    "newText": text_edit.new_text,
                }));
            }
        }

        Ok(json!({
            "plan": plan,
            "prompt": prompt_json(prompt),
            "ranges": ranges,
        }))
    }
}
