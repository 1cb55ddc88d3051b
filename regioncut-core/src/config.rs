//! Label-set configuration threaded through labeling operations.
//!
//! Class order defines the column order of per-region confidence matrices,
//! and the optional background label drives island elimination.

use std::collections::HashMap;

use crate::{error::ConfigError, labeling::Label};

/// The set of class labels in use, plus an optional background designation.
///
/// # Examples
/// ```
/// use regioncut_core::{Label, LabelConfig};
///
/// let config = LabelConfig::new(
///     vec![Label::new(0), Label::new(1), Label::new(2)],
///     Some(Label::new(0)),
/// )?;
/// assert_eq!(config.class_count(), 3);
/// assert_eq!(config.class_index(Label::new(2)), Some(2));
/// assert!(config.is_background(Label::new(0)));
/// # Ok::<(), regioncut_core::ConfigError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelConfig {
    labels: Vec<Label>,
    index: HashMap<Label, usize>,
    background: Option<Label>,
}

impl LabelConfig {
    /// Validates and stores the class list.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoLabels`] for an empty list,
    /// [`ConfigError::DuplicateLabel`] when a label repeats, and
    /// [`ConfigError::UnknownBackground`] when `background` is not listed.
    pub fn new(labels: Vec<Label>, background: Option<Label>) -> Result<Self, ConfigError> {
        if labels.is_empty() {
            return Err(ConfigError::NoLabels);
        }
        let mut index = HashMap::with_capacity(labels.len());
        for (position, label) in labels.iter().copied().enumerate() {
            if index.insert(label, position).is_some() {
                return Err(ConfigError::DuplicateLabel { label });
            }
        }
        if let Some(label) = background {
            if !index.contains_key(&label) {
                return Err(ConfigError::UnknownBackground { label });
            }
        }
        Ok(Self {
            labels,
            index,
            background,
        })
    }

    /// Number of configured classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.labels.len()
    }

    /// Labels in class-index order.
    #[must_use]
    #[rustfmt::skip]
    pub fn labels(&self) -> &[Label] { &self.labels }

    /// Column of `label` in a confidence matrix.
    #[must_use]
    pub fn class_index(&self, label: Label) -> Option<usize> {
        self.index.get(&label).copied()
    }

    /// The configured background label, if any.
    #[must_use]
    #[rustfmt::skip]
    pub fn background(&self) -> Option<Label> { self.background }

    /// Whether `label` is the background label.
    #[must_use]
    pub fn is_background(&self, label: Label) -> bool {
        self.background == Some(label)
    }
}
