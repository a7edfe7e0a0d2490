//! Scenario replay.
//!
//! A scenario bundles a directory snapshot, the initial form values and a list
//! of intents. Replaying it yields the final form values, per-step outcomes and
//! the rendered view.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::engine::{AssignmentEngine, Intent};
use crate::errors::{AppError, ErrorDetails};
use crate::form::{FormStore, InMemoryForm};
use crate::i18n::Translator;
use crate::models::{DirectoryContext, FormValues, TeamMember};
use crate::router::TeamTabView;

/// Input document for a replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub context: DirectoryContext,
    #[serde(default)]
    pub members: Vec<TeamMember>,
    #[serde(default)]
    pub form: FormValues,
    #[serde(default)]
    pub intents: Vec<Intent>,
    /// Stop at the first rejected intent instead of continuing
    #[serde(default)]
    pub stop_on_error: bool,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Outcome of one intent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub index: usize,
    pub intent: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

/// Result of replaying a scenario.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub generated_at: String,
    pub submit_count: u32,
    pub revision_id: u64,
    pub values: FormValues,
    pub steps: Vec<StepOutcome>,
    pub view: TeamTabView,
}

impl ReplayReport {
    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| !s.ok).count()
    }
}

/// Apply every intent of the scenario in order.
pub fn replay(scenario: Scenario, text: &dyn Translator) -> ReplayReport {
    let mut engine = AssignmentEngine::new(
        InMemoryForm::new(scenario.form),
        &scenario.members,
        &scenario.context,
        text,
    );
    tracing::info!(
        "Replaying {} intents against {} assignable members",
        scenario.intents.len(),
        engine.pool().len()
    );

    let mut steps = Vec::with_capacity(scenario.intents.len());
    for (index, intent) in scenario.intents.into_iter().enumerate() {
        let name = intent.name().to_string();
        let outcome = match engine.apply(intent) {
            Ok(()) => StepOutcome {
                index,
                intent: name,
                ok: true,
                error: None,
            },
            Err(e) => StepOutcome {
                index,
                intent: name,
                ok: false,
                error: Some(e.details()),
            },
        };
        let stop = !outcome.ok && scenario.stop_on_error;
        steps.push(outcome);
        if stop {
            tracing::warn!("Stopping replay at step {}", index);
            break;
        }
    }

    let view = engine.render(text);
    let form = engine.into_form();
    ReplayReport {
        generated_at: Utc::now().to_rfc3339(),
        submit_count: form.submit_count(),
        revision_id: form.revision_id(),
        values: form.into_values(),
        steps,
        view,
    }
}

/// Load a scenario file and replay it.
pub fn replay_file(path: &Path, text: &dyn Translator) -> Result<ReplayReport, AppError> {
    let scenario = Scenario::load(path)?;
    Ok(replay(scenario, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::EnglishText;
    use crate::models::{Host, SchedulingStrategy};

    const SCENARIO: &str = r#"{
        "context": {"eventTypeSlug": "intro"},
        "members": [
            {"id": 1, "name": "Ann", "username": "ann", "email": "ann@example.com"},
            {"id": 2, "name": "Ben", "username": "ben", "email": "ben@example.com"}
        ],
        "form": {"schedulingType": "COLLECTIVE", "hosts": []},
        "intents": [
            {"type": "addHost", "branch": "fixed", "userId": 2},
            {"type": "addHost", "branch": "fixed", "userId": 9},
            {"type": "submit"}
        ]
    }"#;

    #[test]
    fn test_replay_collects_outcomes() {
        let report = replay(Scenario::from_json(SCENARIO).unwrap(), &EnglishText);

        assert_eq!(report.steps.len(), 3);
        assert!(report.steps[0].ok);
        assert_eq!(report.steps[1].error.as_ref().unwrap().code, "VALIDATION_ERROR");
        assert_eq!(report.failed_steps(), 1);
        assert_eq!(report.submit_count, 1);
        assert_eq!(report.values.hosts, vec![Host::new(2, true)]);
        assert_eq!(
            report.values.scheduling_type,
            Some(SchedulingStrategy::Collective)
        );
    }

    #[test]
    fn test_replay_stops_on_error() {
        let mut scenario = Scenario::from_json(SCENARIO).unwrap();
        scenario.stop_on_error = true;
        let report = replay(scenario, &EnglishText);
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.submit_count, 0);
    }

    #[test]
    fn test_malformed_scenario_is_bad_request() {
        let err = Scenario::from_json(r#"{"intents": [{"type": "teleport"}]}"#).unwrap_err();
        assert_eq!(err.error_code(), "BAD_REQUEST");
    }

    #[test]
    fn test_report_serializes_view() {
        let report = replay(Scenario::from_json(SCENARIO).unwrap(), &EnglishText);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["view"]["layout"], "hosts");
        assert_eq!(json["values"]["hosts"][0]["userId"], 2);
        assert!(json["generatedAt"].is_string());
    }
}
