//! # Prop Sync Native
//!
//! Keeps a component's declared props and the attributes supplied at its JSX
//! call sites consistent, working on source text with lexical scanning and
//! targeted replacements rather than a parser.
//!
//! ## Invariants
//!
//! 1. **Round-trip Scanning**: attribute records re-concatenate to their source,
//!    so untouched attributes are re-emitted byte for byte.
//! 2. **Ask Before Writing**: no edit lands without an explicit apply choice.
//!    Declining, dismissing or having nothing to change are all silent no-ops.
//! 3. **Additive Usage Path**: a call site can add props to a definition but
//!    never remove them. Removals only flow from a definition to its usages.
//! 4. **Test Files Are Read-Only**: files under `__tests__`/`tests`/`test` or
//!    named `*.test.*`/`*.spec.*` are never edit targets.
//! 5. **One Edit Per Sync**: every change of one sync is applied as a single
//!    multi-file edit, verified against the text it was planned on.
//!
//! ## Known Hazards
//!
//! Components with the same name in different files: the first declaring file
//! found wins when a usage pulls props into a definition. Interleaved saves
//! planning against the same text can both propose the same placeholder; the
//! second application is refused as stale by the bundled workspaces.

mod cache;
mod config;
mod discovery;
mod edits;
mod error;
mod scanner;
mod signature;
mod sync;
mod usage;
mod workspace;

#[cfg(feature = "napi")]
mod bridge;

#[cfg(test)]
mod scanner_tests;

pub use cache::{SignatureCache, SignatureKey, SignatureStore};
pub use config::{SyncOptions, DEFAULT_PLACEHOLDER};
pub use discovery::{find_source_files, is_test_file};
pub use edits::{apply_text_edits, fingerprint, FileEdit, LineIndex, Position, TextEdit, WorkspaceEdit};
pub use error::{SyncError, SyncResult};
pub use scanner::{
    find_component_tags, find_tags_named, is_component_tag, scan_attributes, AttributeRecord,
    TagMatch,
};
pub use signature::{
    derive_prop_names, extract_signatures, find_declaration, ComponentSignature, Declaration,
    DeclarationShape,
};
pub use sync::{
    merge_props, reconcile_tag, DefinitionSyncPlan, Direction, Outcome, PropSync, SaveReport,
    SignatureChange, SyncEvent, UsageSyncPlan,
};
pub use usage::{extract_usages, supplied_prop_names, Usage};
pub use workspace::{
    Choice, FsWorkspace, MemoryWorkspace, Prompt, Prompter, SavedDocument, Workspace,
};

#[cfg(feature = "napi")]
pub use bridge::{
    extract_signatures_native, extract_usages_native, scan_attributes_native, PropSyncSession,
};
