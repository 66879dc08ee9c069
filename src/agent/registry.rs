use crate::agent::AgentError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Operations this side is willing to execute when a run pauses with
/// `requires_action`. Dispatch is by typed id, not by string comparison at
/// the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FunctionId {
    SubmitOnboardingData,
}

/// The runtime-side agent definitions have used both names for the same
/// submission operation; both resolve to the one handler.
pub const SUBMISSION_FUNCTION_ALIASES: &[&str] = &["submit_onboarding_data", "store_employee_data"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Map<String, Value>,
}

pub trait FunctionHandler {
    /// Execute one resolved call and return its tool output as a JSON string.
    fn handle(&mut self, id: FunctionId, call: &FunctionCall) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    aliases: BTreeMap<String, FunctionId>,
}

impl FunctionRegistry {
    pub fn with_defaults() -> Self {
        let mut aliases = BTreeMap::new();
        for name in SUBMISSION_FUNCTION_ALIASES {
            aliases.insert((*name).to_string(), FunctionId::SubmitOnboardingData);
        }
        Self { aliases }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> Result<FunctionId, AgentError> {
        self.aliases
            .get(name)
            .copied()
            .ok_or_else(|| AgentError::UnknownFunction {
                name: name.to_string(),
            })
    }
}
