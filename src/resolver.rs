//! `$ref` resolution against the `definitions` map.
//!
//! Only internal pointers of the form `#/definitions/<name>` are supported.
//! Cycle detection uses [`RefPath`], the chain of pointers currently being
//! inlined, threaded through the transformer's recursion.

use serde_json::Value;

use crate::error::ReferenceError;
use crate::types::Definitions;

/// Prefix of every supported `$ref`.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Chain of `$ref` pointers currently being expanded.
///
/// Immutable and stack-allocated: [`RefPath::push`] borrows the parent, so a
/// pointer leaves the chain when the recursive call that pushed it returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefPath<'a> {
    head: Option<(&'a str, &'a RefPath<'a>)>,
}

impl<'a> RefPath<'a> {
    /// An empty chain.
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// A chain extending this one with `pointer`.
    pub fn push<'b>(&'b self, pointer: &'b str) -> RefPath<'b> {
        RefPath {
            head: Some((pointer, self)),
        }
    }

    /// Whether `pointer` is already being expanded.
    pub fn contains(&self, pointer: &str) -> bool {
        self.iter().any(|p| p == pointer)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Pointers from the outermost to the innermost.
    pub fn to_vec(&self) -> Vec<String> {
        let mut chain: Vec<String> = self.iter().map(String::from).collect();
        chain.reverse();
        chain
    }

    // innermost first
    fn iter(&self) -> impl Iterator<Item = &'a str> {
        let mut current = self.head;
        std::iter::from_fn(move || {
            let (pointer, parent) = current?;
            current = parent.head;
            Some(pointer)
        })
    }
}

/// Build the pointer for a definition name, escaping per RFC 6901.
pub fn definition_pointer(name: &str) -> String {
    format!("{}{}", DEFINITIONS_PREFIX, escape_segment(name))
}

/// Escape one JSON Pointer segment (`~` to `~0`, `/` to `~1`).
pub(crate) fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Extract the definition name from a `#/definitions/<name>` pointer.
///
/// The name must be a single, non-empty pointer segment.
///
/// # Errors
///
/// Returns `ReferenceError::UnsupportedForm` for any other pointer.
pub fn parse_pointer(pointer: &str) -> Result<String, ReferenceError> {
    let unsupported = || ReferenceError::UnsupportedForm {
        pointer: pointer.to_string(),
    };

    let segment = pointer.strip_prefix(DEFINITIONS_PREFIX).ok_or_else(unsupported)?;
    if segment.is_empty() || segment.contains('/') {
        return Err(unsupported());
    }

    // Unescape JSON Pointer encoding (~1 = /, ~0 = ~)
    Ok(segment.replace("~1", "/").replace("~0", "~"))
}

/// Look up the definition a pointer refers to, without cycle tracking.
///
/// # Errors
///
/// Returns `ReferenceError::UnsupportedForm` or `ReferenceError::Unresolved`.
pub fn lookup<'d>(pointer: &str, definitions: &'d Definitions) -> Result<&'d Value, ReferenceError> {
    let name = parse_pointer(pointer)?;
    definitions
        .get(&name)
        .ok_or_else(|| ReferenceError::Unresolved {
            pointer: pointer.to_string(),
        })
}

/// Resolve a pointer for inlining.
///
/// Returns the target node untransformed. Fails if `pointer` is already in
/// `visiting`, reporting the chain with the repeated pointer appended.
///
/// # Errors
///
/// Returns `ReferenceError::UnsupportedForm`, `ReferenceError::Circular` or
/// `ReferenceError::Unresolved`, checked in that order.
pub fn resolve<'d>(
    pointer: &str,
    definitions: &'d Definitions,
    visiting: &RefPath<'_>,
) -> Result<&'d Value, ReferenceError> {
    parse_pointer(pointer)?;

    if visiting.contains(pointer) {
        let mut chain = visiting.to_vec();
        chain.push(pointer.to_string());
        return Err(ReferenceError::Circular { chain });
    }

    lookup(pointer, definitions)
}
