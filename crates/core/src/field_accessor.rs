//! Field paths and bulk content updates
//!
//! A [`FieldAccessor`] names a position inside a record, from the root down.
//! Its dotted path is what type info reports as `field_path`.
//!
//! Bulk updates through [`FieldAccessor::update_from_map`] only touch keys
//! the target already has. New keys in the source are ignored, so a record
//! never grows fields it was not constructed with.

use tracing::debug;

use crate::value::{Content, Value};

/// Path separator in `full_path_from_root`
pub const PATH_SEPARATOR: &str = ".";

/// A position inside a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessor {
    segments: Vec<String>,
}

impl FieldAccessor {
    /// Accessor for the record root, named `root_name`
    pub fn root(root_name: impl Into<String>) -> Self {
        Self {
            segments: vec![root_name.into()],
        }
    }

    /// Accessor for the child field `name`
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Name of the field this accessor points at
    pub fn field_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Accessor one level up, `None` at the root
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Whether this is the record root
    pub fn is_root(&self) -> bool {
        self.segments.len() <= 1
    }

    /// Dotted path from the root, root name included
    pub fn full_path_from_root(&self) -> String {
        self.segments.join(PATH_SEPARATOR)
    }

    /// Read the value this accessor points at inside `content`
    ///
    /// The root segment names the record itself and is skipped.
    pub fn get<'a>(&self, content: &'a Content) -> Option<&'a Value> {
        let mut path = self.segments.iter().skip(1);
        let mut current = content.get(path.next()?)?;
        for segment in path {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Update `target` from `source`, existing keys only.
    ///
    /// Where both sides hold an object the update recurses under the same
    /// rule; otherwise the target value is replaced. Returns the number of
    /// values written.
    pub fn update_from_map(target: &mut Content, source: &Content) -> usize {
        let mut written = 0;
        for (key, incoming) in source {
            let Some(existing) = target.get_mut(key) else {
                debug!(field = %key, "Ignoring key absent from record content");
                continue;
            };
            if let (Value::Object(nested_target), Value::Object(nested_source)) =
                (&mut *existing, incoming)
            {
                written += Self::update_from_map(nested_target, nested_source);
                continue;
            }
            *existing = incoming.clone();
            written += 1;
        }
        written
    }
}
