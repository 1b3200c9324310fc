//! # Prop Synchronization
//!
//! Reconciles component signatures with their JSX call sites in both directions.
//!
//! ## Directions
//!
//! 1. **Definition → Usages**: every call site gains a placeholder attribute for
//!    each declared prop it lacks and loses the attributes of props removed from
//!    the declaration since the previous save.
//! 2. **Usage → Definition**: props supplied at a call site but missing from the
//!    declaration are appended to its destructuring list, then propagated to
//!    every other call site. This direction only ever adds.
//!
//! ## Confirmation
//!
//! Nothing is written without an explicit [`Choice::Apply`]. Each direction
//! first builds a plan (`UsageSyncPlan`, `DefinitionSyncPlan`) and then resolves
//! it to [`Outcome::Applied`] or [`Outcome::Cancelled`]; a dismissed prompt
//! counts as cancel.
//!
//! Test files are never edit targets and never supply a definition.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::cache::{SignatureKey, SignatureStore};
use crate::config::SyncOptions;
use crate::discovery::is_test_file;
use crate::edits::WorkspaceEdit;
use crate::error::SyncResult;
use crate::scanner::{find_tags_named, TagMatch};
use crate::signature::{extract_signatures, find_declaration};
use crate::usage::{extract_usages, Usage};
use crate::workspace::{Choice, Prompt, Prompter, SavedDocument, Workspace};

// ═══════════════════════════════════════════════════════════════════════════════
// OUTCOMES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    /// Nothing needed updating; no prompt was shown
    Unchanged,
    Applied,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    DefinitionToUsages,
    UsageToDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEvent {
    pub component: String,
    pub direction: Direction,
    pub outcome: Outcome,
}

/// Every sync attempted during one trigger, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReport {
    pub events: Vec<SyncEvent>,
}

impl SaveReport {
    fn push(&mut self, component: &str, direction: Direction, outcome: Outcome) {
        self.events.push(SyncEvent {
            component: component.to_string(),
            direction,
            outcome,
        });
    }

    pub fn outcomes(&self, component: &str, direction: Direction) -> Vec<Outcome> {
        self.events
            .iter()
            .filter(|e| e.component == component && e.direction == direction)
            .map(|e| e.outcome)
            .collect()
    }

    pub fn applied_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.outcome == Outcome::Applied)
            .count()
    }
}

/// A signature observed in a saved document, with the props dropped since
/// the previous observation of the same declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureChange {
    pub component: String,
    pub props: Vec<String>,
    pub removed: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PLANS
// ═══════════════════════════════════════════════════════════════════════════════

/// Proposed call-site edits for one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSyncPlan {
    pub component: String,
    pub props: Vec<String>,
    pub removed: Vec<String>,
    pub edit: WorkspaceEdit,
}

impl UsageSyncPlan {
    pub fn prompt(&self) -> Prompt {
        Prompt {
            message: format!(
                "The props of <{} /> will be synced in its usages (adding and removing to match the definition). Apply the changes?",
                self.component
            ),
            apply_label: "Apply changes to usages".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }
}

/// Proposed extension of a declaration's destructuring list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSyncPlan {
    pub component: String,
    /// File holding the declaration
    pub file: PathBuf,
    pub definition_props: Vec<String>,
    pub union: Vec<String>,
    pub newly_added: Vec<String>,
    pub edit: WorkspaceEdit,
}

impl DefinitionSyncPlan {
    pub fn prompt(&self) -> Prompt {
        Prompt {
            message: format!(
                "New props detected in <{} />: {}. Update the definition and sync its usages?",
                self.component,
                self.newly_added.join(", ")
            ),
            apply_label: "Update definition and usages".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }
}

/// Definition props followed by usage props not yet declared, in usage order
pub fn merge_props(definition: &[String], usage: &[String]) -> Vec<String> {
    let mut union = definition.to_vec();
    for prop in usage {
        if !union.contains(prop) {
            union.push(prop.clone());
        }
    }
    union
}

/// Rebuild one opening tag so its attributes match `props`, dropping any in
/// `removed`. Returns None when the tag already matches.
pub fn reconcile_tag(
    tag: &TagMatch,
    props: &[String],
    removed: &[String],
    placeholder: &str,
) -> Option<String> {
    let existing: HashSet<&str> = tag.attribute_names().collect();

    let missing: Vec<&str> = props
        .iter()
        .map(String::as_str)
        .filter(|p| !existing.contains(p))
        .collect();
    let to_remove: HashSet<&str> = removed
        .iter()
        .map(String::as_str)
        .filter(|p| existing.contains(p))
        .collect();

    if missing.is_empty() && to_remove.is_empty() {
        return None;
    }

    let mut kept: Vec<&str> = tag
        .attributes
        .iter()
        .filter(|a| !matches!(a.name.as_deref(), Some(name) if to_remove.contains(name)))
        .map(|a| a.raw.as_str())
        .collect();

    // New attributes go before the whitespace that precedes `>` / `/>`
    let tail = match tag.attributes.last() {
        Some(last) if last.is_whitespace() => kept.pop(),
        _ => None,
    };

    let mut attrs = kept.concat();
    for prop in missing {
        attrs.push_str(&format!(" {}={}", prop, placeholder));
    }
    if let Some(tail) = tail {
        attrs.push_str(tail);
    }

    let close = if tag.self_closing { "/>" } else { ">" };
    Some(format!("<{}{}{}", tag.name, attrs, close))
}

// ═══════════════════════════════════════════════════════════════════════════════
// ORCHESTRATOR
// ═══════════════════════════════════════════════════════════════════════════════

pub struct PropSync<W, S> {
    workspace: W,
    store: S,
    options: SyncOptions,
}

impl<W: Workspace, S: SignatureStore> PropSync<W, S> {
    pub fn new(workspace: W, store: S, options: SyncOptions) -> Self {
        Self {
            workspace,
            store,
            options,
        }
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut W {
        &mut self.workspace
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Run one full save cycle: definitions in the saved document push to
    /// their usages, then usages in the saved document pull into definitions.
    pub fn handle_save(
        &mut self,
        doc: &SavedDocument,
        prompter: &mut dyn Prompter,
    ) -> SyncResult<SaveReport> {
        let mut report = SaveReport::default();

        if !self.options.handles_language(&doc.language_id) {
            tracing::debug!(
                "[PropSync] Ignoring save of {:?} ({})",
                doc.path,
                doc.language_id
            );
            return Ok(report);
        }

        for change in self.observe_signatures(&doc.path, &doc.text) {
            let outcome =
                self.sync_usages(&change.component, &change.props, &change.removed, prompter)?;
            report.push(&change.component, Direction::DefinitionToUsages, outcome);
        }

        // The definition pass may have rewritten call sites in this same file
        let current = match self.workspace.read(&doc.path) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("[PropSync] Using saved text of {:?}: {}", doc.path, e);
                doc.text.clone()
            }
        };

        let mut seen = HashSet::new();
        for usage in extract_usages(&current) {
            if usage.props.is_empty() || !seen.insert(usage.component.clone()) {
                continue;
            }
            self.run_definition_sync(&usage, prompter, &mut report)?;
        }

        Ok(report)
    }

    /// Record every signature declared in `source` and report what changed.
    /// Signatures without props are skipped and not recorded.
    pub fn observe_signatures(&mut self, path: &Path, source: &str) -> Vec<SignatureChange> {
        let mut changes = Vec::new();

        for signature in extract_signatures(source) {
            if signature.props.is_empty() {
                continue;
            }

            let key = SignatureKey::new(path, signature.name.as_str());
            let previous = self.store.get(&key).unwrap_or_default();
            let removed: Vec<String> = previous
                .into_iter()
                .filter(|p| !signature.props.contains(p))
                .collect();

            self.store.set(key, signature.props.clone());
            changes.push(SignatureChange {
                component: signature.name,
                props: signature.props,
                removed,
            });
        }

        changes
    }

    fn candidate_files(&self) -> SyncResult<Vec<PathBuf>> {
        let files = self.workspace.find_files()?;
        if !self.options.skip_test_files {
            return Ok(files);
        }
        let root = self.workspace.root_dir();
        Ok(files
            .into_iter()
            .filter(|path| {
                let relative = root
                    .and_then(|root| path.strip_prefix(root).ok())
                    .unwrap_or(path.as_path());
                let test = is_test_file(relative);
                if test {
                    tracing::trace!("[PropSync] Skipping test file {:?}", path);
                }
                !test
            })
            .collect())
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Definition → Usages
    // ───────────────────────────────────────────────────────────────────────────

    pub fn plan_usage_sync(
        &self,
        component: &str,
        props: &[String],
        removed: &[String],
    ) -> SyncResult<Option<UsageSyncPlan>> {
        let mut edit = WorkspaceEdit::new();

        for path in self.candidate_files()? {
            let source = self.workspace.read(&path)?;
            for tag in find_tags_named(&source, component) {
                if let Some(new_text) = reconcile_tag(&tag, props, removed, &self.options.placeholder)
                {
                    edit.replace(&path, &source, tag.start, tag.end, new_text);
                }
            }
        }

        if edit.is_empty() {
            return Ok(None);
        }

        tracing::info!(
            "[PropSync] <{} />: {} usage(s) to update in {} file(s)",
            component,
            edit.len(),
            edit.file_count()
        );

        Ok(Some(UsageSyncPlan {
            component: component.to_string(),
            props: props.to_vec(),
            removed: removed.to_vec(),
            edit,
        }))
    }

    pub fn resolve_usage_plan(
        &mut self,
        plan: &UsageSyncPlan,
        choice: Option<Choice>,
    ) -> SyncResult<Outcome> {
        if choice != Some(Choice::Apply) {
            tracing::debug!("[PropSync] Usage sync of <{} /> cancelled", plan.component);
            return Ok(Outcome::Cancelled);
        }

        self.workspace.apply(&plan.edit)?;
        Ok(Outcome::Applied)
    }

    /// Bring every call site of `component` in line with `props`
    pub fn sync_usages(
        &mut self,
        component: &str,
        props: &[String],
        removed: &[String],
        prompter: &mut dyn Prompter,
    ) -> SyncResult<Outcome> {
        let Some(plan) = self.plan_usage_sync(component, props, removed)? else {
            return Ok(Outcome::Unchanged);
        };

        let choice = prompter.confirm(&plan.prompt());
        let outcome = self.resolve_usage_plan(&plan, choice)?;
        if outcome == Outcome::Applied {
            prompter.notify(&format!("Props synced in the usages of <{} />.", component));
        }
        Ok(outcome)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Usage → Definition
    // ───────────────────────────────────────────────────────────────────────────

    pub fn plan_definition_sync(&self, usage: &Usage) -> SyncResult<Option<DefinitionSyncPlan>> {
        if usage.props.is_empty() {
            return Ok(None);
        }

        let mut found = None;
        for path in self.candidate_files()? {
            let source = self.workspace.read(&path)?;
            if let Some(decl) = find_declaration(&source, &usage.component) {
                found = Some((path, source, decl));
                break;
            }
        }

        let Some((file, source, decl)) = found else {
            tracing::debug!("[PropSync] No definition found for <{} />", usage.component);
            return Ok(None);
        };

        let union = merge_props(&decl.props, &usage.props);
        if union == decl.props {
            return Ok(None);
        }

        let newly_added: Vec<String> = usage
            .props
            .iter()
            .filter(|p| !decl.props.contains(p))
            .cloned()
            .collect();

        let mut edit = WorkspaceEdit::new();
        edit.replace(
            &file,
            &source,
            decl.props_start,
            decl.props_end,
            union.join(", "),
        );

        Ok(Some(DefinitionSyncPlan {
            component: usage.component.clone(),
            file,
            definition_props: decl.props,
            union,
            newly_added,
            edit,
        }))
    }

    /// Apply a definition plan and record the extended signature
    pub fn resolve_definition_plan(
        &mut self,
        plan: &DefinitionSyncPlan,
        choice: Option<Choice>,
    ) -> SyncResult<Outcome> {
        if choice != Some(Choice::Apply) {
            tracing::debug!(
                "[PropSync] Definition sync of <{} /> cancelled",
                plan.component
            );
            return Ok(Outcome::Cancelled);
        }

        self.workspace.apply(&plan.edit)?;
        self.store.set(
            SignatureKey::new(plan.file.as_path(), plan.component.as_str()),
            plan.union.clone(),
        );
        tracing::info!(
            "[PropSync] <{} /> definition now declares: {}",
            plan.component,
            plan.union.join(", ")
        );
        Ok(Outcome::Applied)
    }

    /// Pull the props of one call site into the component's definition, then
    /// propagate the result to every other call site
    pub fn sync_definition_from_usage(
        &mut self,
        usage: &Usage,
        prompter: &mut dyn Prompter,
    ) -> SyncResult<SaveReport> {
        let mut report = SaveReport::default();
        self.run_definition_sync(usage, prompter, &mut report)?;
        Ok(report)
    }

    fn run_definition_sync(
        &mut self,
        usage: &Usage,
        prompter: &mut dyn Prompter,
        report: &mut SaveReport,
    ) -> SyncResult<()> {
        let Some(plan) = self.plan_definition_sync(usage)? else {
            report.push(&usage.component, Direction::UsageToDefinition, Outcome::Unchanged);
            return Ok(());
        };

        let choice = prompter.confirm(&plan.prompt());
        let outcome = self.resolve_definition_plan(&plan, choice)?;
        report.push(&plan.component, Direction::UsageToDefinition, outcome);

        if outcome == Outcome::Applied {
            let propagated = self.sync_usages(&plan.component, &plan.union, &[], prompter)?;
            report.push(&plan.component, Direction::DefinitionToUsages, propagated);
        }

        Ok(())
    }
}
