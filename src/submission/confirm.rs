/// Keyword-based confirmation detection. Inherently fuzzy: both halves must
/// agree. The agent's preceding message must read like a confirmation
/// request AND the user's latest message like an affirmation. A negation
/// keyword in the user's message vetoes the match ("yes, but the address is
/// wrong" must not submit).
pub const USER_CONFIRMATION_KEYWORDS: &[&str] = &[
    "yes",
    "correct",
    "confirm",
    "confirmed",
    "right",
    "ok",
    "okay",
    "proceed",
    "looks good",
    "sounds good",
    "that's right",
    "thats right",
];

pub const USER_NEGATION_KEYWORDS: &[&str] = &[
    "no",
    "not",
    "wrong",
    "incorrect",
    "change",
    "update",
    "fix",
    "edit",
];

pub const AGENT_CONFIRMATION_PROMPTS: &[&str] = &[
    "confirm",
    "correct",
    "review",
    "summary",
    "is this right",
    "look right",
    "verify",
];

/// Single words match on word boundaries so "no" does not fire inside
/// "now"; multi-word phrases match as substrings.
fn contains_keyword(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| {
        if keyword.contains(' ') || keyword.contains('\'') {
            text.contains(keyword)
        } else {
            text.split(|ch: char| !ch.is_ascii_alphanumeric())
                .any(|word| word == *keyword)
        }
    })
}

pub fn agent_requests_confirmation(agent_message: &str) -> bool {
    let lowered = agent_message.to_lowercase();
    AGENT_CONFIRMATION_PROMPTS
        .iter()
        .any(|prompt| lowered.contains(prompt))
}

pub fn detect_confirmation(agent_message: &str, user_message: &str) -> bool {
    if !agent_requests_confirmation(agent_message) {
        return false;
    }
    let lowered = user_message.to_lowercase();
    if contains_keyword(&lowered, USER_NEGATION_KEYWORDS) {
        return false;
    }
    contains_keyword(&lowered, USER_CONFIRMATION_KEYWORDS)
}

/// What to do with a user turn once confirmation has been evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundPlan {
    /// Confirmation with a required, still-missing signature: open the pad,
    /// issue no network call this cycle.
    OpenSignatureCapture,
    /// Confirmation with signature collection disabled: send the
    /// empty-signature submission directive instead of the user's text.
    SendDirective,
    /// Ordinary turn: forward the user's text as-is.
    SendUserText,
}

pub fn plan_user_turn(confirmed: bool, require_signature: bool, has_artifact: bool) -> OutboundPlan {
    if !confirmed {
        return OutboundPlan::SendUserText;
    }
    if require_signature {
        if has_artifact {
            OutboundPlan::SendUserText
        } else {
            OutboundPlan::OpenSignatureCapture
        }
    } else {
        OutboundPlan::SendDirective
    }
}
