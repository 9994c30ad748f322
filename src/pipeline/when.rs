//! `when` constraints of a container
//!
//! Only the status part is evaluated at compile time; event and branch
//! filters are carried for the scheduler.

#![allow(clippy::must_use_candidate)]

use serde::{Deserialize, Serialize};

/// Status value selecting steps that run after successful steps
pub const STATUS_SUCCESS: &str = "success";
/// Status value selecting steps that run after a failed step
pub const STATUS_FAILURE: &str = "failure";

/// Include/exclude filter over string values.
///
/// Deserializes from a single string, a list of strings, or a map with
/// `include` and `exclude` lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "ListForm")]
pub struct ConstraintList {
    /// Values that select the step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    /// Values that deselect the step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListForm {
    Single(String),
    Many(Vec<String>),
    Full {
        #[serde(default)]
        include: Vec<String>,
        #[serde(default)]
        exclude: Vec<String>,
    },
}

impl From<ListForm> for ConstraintList {
    fn from(form: ListForm) -> Self {
        match form {
            ListForm::Single(value) => Self {
                include: vec![value],
                exclude: Vec::new(),
            },
            ListForm::Many(include) => Self {
                include,
                exclude: Vec::new(),
            },
            ListForm::Full { include, exclude } => Self { include, exclude },
        }
    }
}

impl ConstraintList {
    /// Creates a list including the given values
    pub fn including<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: values.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    /// Returns true if `value` is explicitly included
    pub fn includes(&self, value: &str) -> bool {
        self.include.iter().any(|v| v == value)
    }

    /// Returns true if neither list has entries
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// A single `when` constraint; all of its filters must hold
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraint {
    /// Status of prior steps
    #[serde(skip_serializing_if = "ConstraintList::is_empty")]
    pub status: ConstraintList,
    /// Pipeline event, e.g. `push` or `tag`
    #[serde(skip_serializing_if = "ConstraintList::is_empty")]
    pub event: ConstraintList,
    /// Branch name
    #[serde(skip_serializing_if = "ConstraintList::is_empty")]
    pub branch: ConstraintList,
}

/// The `when` block of a container: a step runs if any constraint holds
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "WhenForm", into = "Vec<Constraint>")]
pub struct When {
    /// Alternative constraints
    pub constraints: Vec<Constraint>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WhenForm {
    Many(Vec<Constraint>),
    Single(Constraint),
}

impl From<WhenForm> for When {
    fn from(form: WhenForm) -> Self {
        match form {
            WhenForm::Many(constraints) => Self { constraints },
            WhenForm::Single(constraint) => Self {
                constraints: vec![constraint],
            },
        }
    }
}

impl From<When> for Vec<Constraint> {
    fn from(when: When) -> Self {
        when.constraints
    }
}

impl When {
    /// Creates a `when` block from constraints
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }

    /// Returns true if the step runs while the pipeline is successful:
    /// there are no constraints, or some constraint leaves the status open
    /// or includes `success`.
    pub fn includes_status_success(&self) -> bool {
        self.constraints.is_empty()
            || self
                .constraints
                .iter()
                .any(|c| c.status.include.is_empty() || c.status.includes(STATUS_SUCCESS))
    }

    /// Returns true if some constraint includes the `failure` status
    pub fn includes_status_failure(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| c.status.includes(STATUS_FAILURE))
    }
}
