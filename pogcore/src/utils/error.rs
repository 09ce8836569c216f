use strum::{Display, EnumIs};
use thiserror::Error;

/// Coarse classification of [`PogError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
pub enum ErrorCategory {
    /// Root element, required element or required attribute is absent.
    Missing,
    /// Tag or attribute combination that the grammar does not allow.
    Format,
    /// An integer attribute could not be parsed.
    Numeric,
    /// Indices or identifiers are inconsistent with each other.
    Structure,
    /// The underlying source could not be read or is not well-formed markup.
    Source,
}

#[derive(Debug, Error, EnumIs)]
pub enum PogError {
    /// The markup tree has no root element, or the root is not `Proof_Obligations`.
    #[error("Proof_Obligations root element expected, found {found}.")]
    MissingRoot { found: String },

    /// A required child element is absent.
    #[error("Missing '{child}' element in '{parent}' tag.")]
    MissingElement { parent: String, child: String },

    /// A required attribute is absent.
    #[error("Missing '{attribute}' attribute in '{tag}' tag.")]
    MissingAttribute { tag: String, attribute: String },

    /// A tag that is not allowed at this position.
    #[error("Unexpected tag '{tag}' in {context}.")]
    UnexpectedTag { tag: String, context: String },

    /// An attribute holds a value the grammar does not allow.
    #[error("Expected '{attribute}' attribute with value '{expected}' in '{tag}' tag, found {found}.")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        expected: String,
        found: String,
    },

    /// An element carries an attribute that is forbidden in its context.
    #[error("Attribute '{attribute}' is not allowed on '{tag}' tag: {reason}.")]
    ForbiddenAttribute {
        tag: String,
        attribute: String,
        reason: String,
    },

    /// An element does not have the number of element children its production requires.
    #[error("Expected {expected} child element(s) in '{tag}' tag, found {found}.")]
    ChildCount {
        tag: String,
        expected: usize,
        found: usize,
    },

    /// An integer attribute could not be parsed.
    #[error("Integer expected for '{attribute}' attribute in '{tag}' tag, found '{value}'.")]
    InvalidInteger {
        tag: String,
        attribute: String,
        value: String,
    },

    /// A type table entry whose identifier does not match its position.
    #[error("Unexpected typref. Expecting '{expected}'. Found '{found}'.")]
    TypeIdMismatch { expected: usize, found: usize },

    /// An element that must appear at most once appears several times.
    #[error("Element '{tag}' must appear at most once in '{parent}' tag.")]
    DuplicateElement { tag: String, parent: String },

    /// A `typref` attribute points past the end of the type table.
    #[error("Type reference {typref} is out of range; the type table holds {len} entries.")]
    UnknownTypeRef { typref: usize, len: usize },

    /// The writer met a type that is not part of the document's type table.
    #[error("Type `{ty}` is not registered in the type table.")]
    UnregisteredType { ty: String },

    /// A `Ref_Hyp` index does not address a local hypothesis of its group.
    #[error(
        "Goal `{goal}` of group `{group}` references local hypothesis {index}, but the group only has {len}."
    )]
    LocalHypOutOfRange {
        group: String,
        goal: String,
        index: usize,
        len: usize,
    },

    /// The markup parser reported the document as malformed.
    #[error("Malformed markup in {source_name}: {message}")]
    Markup {
        source_name: String,
        message: String,
    },

    #[error("Failed to load file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write document: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    Config {
        source: toml::de::Error,
        file: String,
    },
}

impl PogError {
    /// Map this error onto its [`ErrorCategory`].
    pub fn category(&self) -> ErrorCategory {
        match self {
            PogError::MissingRoot { .. }
            | PogError::MissingElement { .. }
            | PogError::MissingAttribute { .. } => ErrorCategory::Missing,
            PogError::UnexpectedTag { .. }
            | PogError::InvalidAttribute { .. }
            | PogError::ForbiddenAttribute { .. }
            | PogError::ChildCount { .. } => ErrorCategory::Format,
            PogError::InvalidInteger { .. } => ErrorCategory::Numeric,
            PogError::TypeIdMismatch { .. }
            | PogError::DuplicateElement { .. }
            | PogError::UnknownTypeRef { .. }
            | PogError::UnregisteredType { .. }
            | PogError::LocalHypOutOfRange { .. } => ErrorCategory::Structure,
            PogError::Markup { .. }
            | PogError::Io { .. }
            | PogError::Output(_)
            | PogError::Config { .. } => ErrorCategory::Source,
        }
    }

    pub(crate) fn missing_element(parent: &str, child: &str) -> Self {
        PogError::MissingElement {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }

    pub(crate) fn missing_attribute(tag: &str, attribute: &str) -> Self {
        PogError::MissingAttribute {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn unexpected_tag(tag: &str, context: impl Into<String>) -> Self {
        PogError::UnexpectedTag {
            tag: tag.to_string(),
            context: context.into(),
        }
    }
}

pub type PogResult<T> = Result<T, PogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_tag_and_attribute() {
        let err = PogError::missing_attribute("Define", "name");
        assert_eq!(err.to_string(), "Missing 'name' attribute in 'Define' tag.");
        assert_eq!(err.category(), ErrorCategory::Missing);
    }

    #[test]
    fn type_id_mismatch_reports_expected_and_found() {
        let err = PogError::TypeIdMismatch {
            expected: 1,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "Unexpected typref. Expecting '1'. Found '3'."
        );
        assert!(err.category().is_structure());
    }
}
