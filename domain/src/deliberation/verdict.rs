//! Verdict values a persona can cast in a deliberation round.

use serde::{Deserialize, Serialize};

/// A persona's categorical recommendation for the proposal.
///
/// The declaration order is significant: it is the tie-break order used when
/// two verdicts carry exactly the same weighted score.
///
/// # Example
///
/// ```
/// use council_domain::Verdict;
///
/// let verdict: Verdict = "conditional go".parse().unwrap();
/// assert_eq!(verdict, Verdict::ConditionalGo);
/// assert_eq!(verdict.to_string(), "CONDITIONAL_GO");
/// assert!("MAYBE".parse::<Verdict>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Go ahead as proposed
    Proceed,
    /// Go ahead once the stated conditions are met
    ConditionalGo,
    /// Do not proceed
    Stop,
    /// No opinion either way
    Abstain,
    /// Hand the decision to someone with more authority
    Escalate,
}

impl Verdict {
    /// All verdicts, in tie-break order.
    pub const ALL: [Verdict; 5] = [
        Verdict::Proceed,
        Verdict::ConditionalGo,
        Verdict::Stop,
        Verdict::Abstain,
        Verdict::Escalate,
    ];

    /// The canonical uppercase token
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Proceed => "PROCEED",
            Verdict::ConditionalGo => "CONDITIONAL_GO",
            Verdict::Stop => "STOP",
            Verdict::Abstain => "ABSTAIN",
            Verdict::Escalate => "ESCALATE",
        }
    }

    /// Whether acting on this verdict means the proposed action goes ahead
    pub fn allows_action(&self) -> bool {
        matches!(self, Verdict::Proceed | Verdict::ConditionalGo)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    /// Tolerant parse: surrounding markdown/punctuation is ignored and spaces
    /// or hyphens are accepted in place of the underscore.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .trim_matches(|c: char| matches!(c, '*' | '_' | '`' | '"' | '\'' | '.' | '!' | '[' | ']'))
            .trim()
            .to_ascii_uppercase()
            .replace([' ', '-'], "_");

        match normalized.as_str() {
            "PROCEED" => Ok(Verdict::Proceed),
            "CONDITIONAL_GO" => Ok(Verdict::ConditionalGo),
            "STOP" => Ok(Verdict::Stop),
            "ABSTAIN" => Ok(Verdict::Abstain),
            "ESCALATE" => Ok(Verdict::Escalate),
            _ => Err(format!(
                "Unknown verdict: {}. Valid: PROCEED, CONDITIONAL_GO, STOP, ABSTAIN, ESCALATE",
                s.trim()
            )),
        }
    }
}
