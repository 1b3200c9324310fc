//! Signature Module
//!
//! Extracts component signatures (ordered prop names) from declarations whose
//! sole parameter is an inline destructured object:
//!
//! ```text
//! export default function Name({ a, b = 1 }) {}
//! export function Name({ a, b }: Props) {}
//! function Name({ a }) {}
//! export const Name = ({ a, b }) => {}
//! let Name = ({ a }) => {}
//! ```

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

const EXPORT_PREFIX: &str = r"(?:export\s+default\s+|export\s+)?";
const ANY_COMPONENT_NAME: &str = r"(?P<name>[A-Z][A-Za-z0-9_]*)";
/// Destructured braces, an optional `: Type` annotation and the closing paren
const DESTRUCTURED_PARAM: &str = r"\s*\(\s*\{(?P<props>[^}]*)\}(?:\s*:[^)]*)?\s*\)";

lazy_static! {
    static ref FUNCTION_DECL_RE: Regex =
        Regex::new(&DeclarationShape::Function.pattern(ANY_COMPONENT_NAME)).unwrap();
    static ref ARROW_DECL_RE: Regex =
        Regex::new(&DeclarationShape::Arrow.pattern(ANY_COMPONENT_NAME)).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationShape {
    /// `function Name({ ... })`
    Function,
    /// `const Name = ({ ... }) =>`
    Arrow,
}

impl DeclarationShape {
    /// Lookup order when resolving a definition by name
    pub const ALL: [DeclarationShape; 2] = [DeclarationShape::Function, DeclarationShape::Arrow];

    fn pattern(self, name: &str) -> String {
        match self {
            DeclarationShape::Function => {
                format!(r"{}function\s+{}{}", EXPORT_PREFIX, name, DESTRUCTURED_PARAM)
            }
            DeclarationShape::Arrow => format!(
                r"{}(?:const|let)\s+{}\s*={}\s*=>",
                EXPORT_PREFIX, name, DESTRUCTURED_PARAM
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSignature {
    pub name: String,
    pub props: Vec<String>,
}

/// A component declaration located in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub component: String,
    pub shape: DeclarationShape,
    /// Byte range of the text between the destructuring braces
    pub props_start: usize,
    pub props_end: usize,
    pub raw_props: String,
    pub props: Vec<String>,
}

/// Derive prop names from the text between destructuring braces.
///
/// Shape-based only: `a = 1` → `a`, `b: string` → `b`, `c?: T` → `c`.
/// Rest elements are skipped; nested destructuring and computed keys are not
/// understood, and defaults containing commas split incorrectly.
pub fn derive_prop_names(raw: &str) -> Vec<String> {
    let mut props: Vec<String> = Vec::new();

    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() || entry.starts_with("...") {
            continue;
        }

        let name = entry.split('=').next().unwrap_or("");
        let name = name.split(':').next().unwrap_or("").trim_end();
        let name = name.strip_suffix('?').unwrap_or(name).trim();

        if !name.is_empty() && !props.iter().any(|p| p == name) {
            props.push(name.to_string());
        }
    }

    props
}

fn signature_from(caps: &Captures) -> Option<ComponentSignature> {
    let name = caps.name("name")?.as_str().to_string();
    let props = derive_prop_names(caps.name("props")?.as_str());
    Some(ComponentSignature { name, props })
}

/// Extract every component signature in a document.
///
/// Function declarations come first, then arrow bindings, each in source order.
pub fn extract_signatures(source: &str) -> Vec<ComponentSignature> {
    let mut signatures: Vec<ComponentSignature> = FUNCTION_DECL_RE
        .captures_iter(source)
        .filter_map(|caps| signature_from(&caps))
        .collect();

    signatures.extend(
        ARROW_DECL_RE
            .captures_iter(source)
            .filter_map(|caps| signature_from(&caps)),
    );

    signatures
}

/// Locate the declaration of one component, trying the function form first
pub fn find_declaration(source: &str, component: &str) -> Option<Declaration> {
    let escaped = regex::escape(component);

    for shape in DeclarationShape::ALL {
        let Ok(re) = Regex::new(&shape.pattern(&escaped)) else {
            continue;
        };
        if let Some(props) = re.captures(source).and_then(|caps| caps.name("props")) {
            return Some(Declaration {
                component: component.to_string(),
                shape,
                props_start: props.start(),
                props_end: props.end(),
                raw_props: props.as_str().to_string(),
                props: derive_prop_names(props.as_str()),
            });
        }
    }

    None
}
