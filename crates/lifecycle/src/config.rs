//! Input validation: turns raw action inputs into a [`RunConfig`].
//!
//! Every applicable rule is evaluated and all violations are reported together.
//! A run never starts with an invalid config, so nothing downstream re-checks
//! these invariants.

use tracing::debug;

use crate::{ConfigError, ConfigViolation, MilestoneNumber, ProjectNumber, ProjectScope};

/// Inputs exactly as supplied by the caller, before splitting or parsing.
///
/// Empty strings mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub title: String,
    pub body: String,
    /// Comma-separated label list.
    pub labels: String,
    /// Comma-separated assignee list.
    pub assignees: String,
    pub project_scope: String,
    pub project: String,
    pub column: String,
    pub milestone: String,
    pub pinned: bool,
    pub close_previous: bool,
    pub rotate_assignees: bool,
    pub linked_comments: bool,
}

/// Feature switches for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    pub pinned: bool,
    pub close_previous: bool,
    pub rotate_assignees: bool,
    pub linked_comments: bool,
}

impl Features {
    /// Returns `true` if any enabled feature needs the previous issue.
    pub fn needs_previous_issue(self) -> bool {
        self.pinned || self.close_previous || self.rotate_assignees || self.linked_comments
    }
}

/// A project-board target: both halves are always present together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTarget {
    pub scope: ProjectScope,
    pub number: ProjectNumber,
    pub column: String,
}

/// The validated, normalized configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub title: String,
    /// Body template; may be empty.
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub project: Option<ProjectTarget>,
    pub milestone: Option<MilestoneNumber>,
    pub features: Features,
}

impl RunConfig {
    /// Validates `inputs`, returning every violated rule on failure.
    pub fn from_inputs(inputs: &RawInputs) -> Result<Self, ConfigError> {
        debug!(?inputs, "checking inputs");

        let mut violations = Vec::new();

        let title = inputs.title.trim();
        if title.is_empty() {
            violations.push(ConfigViolation::MissingTitle);
        }

        let labels = split_list(&inputs.labels);
        let assignees = split_list(&inputs.assignees);

        let features = Features {
            pinned: inputs.pinned,
            close_previous: inputs.close_previous,
            rotate_assignees: inputs.rotate_assignees,
            linked_comments: inputs.linked_comments,
        };
        let label_dependent = [
            ("pinned", features.pinned),
            ("close-previous", features.close_previous),
            ("linked-comments", features.linked_comments),
            ("rotate-assignees", features.rotate_assignees),
        ];
        for (feature, enabled) in label_dependent {
            if enabled && labels.is_empty() {
                violations.push(ConfigViolation::LabelsRequired { feature });
            }
        }
        if features.rotate_assignees && assignees.is_empty() {
            violations.push(ConfigViolation::AssigneesRequired);
        }

        let scope = match inputs.project_scope.trim() {
            "" => Some(ProjectScope::default()),
            raw => match raw.parse::<ProjectScope>() {
                Ok(scope) => Some(scope),
                Err(unknown) => {
                    violations.push(ConfigViolation::UnknownProjectScope(unknown));
                    None
                }
            },
        };

        let project_number = parse_number("project", &inputs.project, &mut violations);
        let column = inputs.column.trim();
        match (inputs.project.trim().is_empty(), column.is_empty()) {
            (false, true) => violations.push(ConfigViolation::ColumnRequired),
            (true, false) => violations.push(ConfigViolation::ProjectRequired),
            _ => {}
        }

        let milestone =
            parse_number("milestone", &inputs.milestone, &mut violations).map(MilestoneNumber::new);

        if !violations.is_empty() {
            return Err(ConfigError::new(violations));
        }

        let project = match (scope, project_number) {
            (Some(scope), Some(number)) => Some(ProjectTarget {
                scope,
                number: ProjectNumber::new(number),
                column: column.to_string(),
            }),
            _ => None,
        };

        Ok(Self {
            title: title.to_string(),
            body: inputs.body.clone(),
            labels,
            assignees,
            project,
            milestone,
            features,
        })
    }
}

/// Splits a comma-separated input, trimming entries and dropping empty ones.
///
/// `"a,  b, c"` becomes `["a", "b", "c"]`.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_number(
    input: &'static str,
    raw: &str,
    violations: &mut Vec<ConfigViolation>,
) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            violations.push(ConfigViolation::InvalidNumber {
                input,
                value: raw.to_string(),
            });
            None
        }
    }
}
