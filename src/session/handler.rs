use crate::agent::{FunctionCall, FunctionHandler, FunctionId};
use crate::config::Settings;
use crate::identity::UserContext;
use crate::signature::SignatureArtifact;
use crate::submission::{submit, SubmissionPayload};

/// Local executor for the agent's `requires_action` tool calls. Borrows the
/// session's identity and live signature artifact for the duration of one
/// turn.
pub struct SubmissionHandler<'a> {
    settings: &'a Settings,
    user: &'a UserContext,
    signature: Option<&'a SignatureArtifact>,
}

impl<'a> SubmissionHandler<'a> {
    pub fn new(
        settings: &'a Settings,
        user: &'a UserContext,
        signature: Option<&'a SignatureArtifact>,
    ) -> Self {
        Self {
            settings,
            user,
            signature,
        }
    }
}

impl FunctionHandler for SubmissionHandler<'_> {
    fn handle(&mut self, id: FunctionId, call: &FunctionCall) -> String {
        match id {
            FunctionId::SubmitOnboardingData => {
                let payload =
                    SubmissionPayload::from_function_args(self.user, &call.args, self.signature);
                submit(self.settings, &payload).to_tool_output()
            }
        }
    }
}
