//! Wizard steps and the completed-step set.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One of the five fixed wizard steps.
///
/// Serialized as its step number (1-5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    /// Select the source video file
    Upload,
    /// Pick a background audio track
    Audio,
    /// Generate or edit title, description and tags
    Metadata,
    /// Review the combined result
    Preview,
    /// Authenticate and upload
    Publish,
}

impl Step {
    /// All steps in flow order.
    pub const ALL: [Step; 5] = [
        Step::Upload,
        Step::Audio,
        Step::Metadata,
        Step::Preview,
        Step::Publish,
    ];

    /// Step number in [1, 5].
    pub fn number(self) -> u8 {
        match self {
            Step::Upload => 1,
            Step::Audio => 2,
            Step::Metadata => 3,
            Step::Preview => 4,
            Step::Publish => 5,
        }
    }

    /// Parse a step number.
    pub fn from_number(n: u8) -> Result<Self, ModelError> {
        match n {
            1 => Ok(Step::Upload),
            2 => Ok(Step::Audio),
            3 => Ok(Step::Metadata),
            4 => Ok(Step::Preview),
            5 => Ok(Step::Publish),
            other => Err(ModelError::InvalidStep(other)),
        }
    }

    /// The step before this one, if any.
    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Upload => None,
            Step::Audio => Some(Step::Upload),
            Step::Metadata => Some(Step::Audio),
            Step::Preview => Some(Step::Metadata),
            Step::Publish => Some(Step::Preview),
        }
    }

    /// The step after this one, if any.
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Upload => Some(Step::Audio),
            Step::Audio => Some(Step::Metadata),
            Step::Metadata => Some(Step::Preview),
            Step::Preview => Some(Step::Publish),
            Step::Publish => None,
        }
    }

    /// Default display label for the step indicator.
    pub fn label(self) -> &'static str {
        match self {
            Step::Upload => "Upload Video",
            Step::Audio => "Select Audio",
            Step::Metadata => "Gen. Metadata",
            Step::Preview => "Preview",
            Step::Publish => "Publish",
        }
    }

    /// Check if this is the terminal step.
    pub fn is_terminal(self) -> bool {
        matches!(self, Step::Publish)
    }
}

impl Default for Step {
    fn default() -> Self {
        Step::Upload
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<u8> for Step {
    type Error = ModelError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Step::from_number(n)
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

/// Set of completed steps.
///
/// Insertion order is irrelevant; iteration is always in step order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepSet(BTreeSet<Step>);

impl StepSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, step: Step) -> bool {
        self.0.contains(&step)
    }

    /// Mark a step complete. Returns false if it already was.
    pub fn insert(&mut self, step: Step) -> bool {
        self.0.insert(step)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Step> + '_ {
        self.0.iter().copied()
    }

    /// Step numbers in ascending order.
    pub fn numbers(&self) -> Vec<u8> {
        self.iter().map(Step::number).collect()
    }

    /// True if every member's predecessor is also a member.
    pub fn is_in_order(&self) -> bool {
        self.iter()
            .all(|step| step.previous().map_or(true, |prev| self.contains(prev)))
    }
}

impl FromIterator<Step> for StepSet {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
