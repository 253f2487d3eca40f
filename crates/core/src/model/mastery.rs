use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Wire name of the "m of n" mastery kind.
pub const M_OF_N: &str = "m_of_n";

/// Mastery kinds used elsewhere in the content ecosystem that carry no
/// progress law yet. They are recognised so that hosts get a precise error
/// instead of a silent fallback.
const RECOGNISED_WITHOUT_LAW: &[&str] = &["do_all"];
const STREAK_PREFIX: &str = "num_correct_in_a_row_";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MasteryModelError {
    #[error("required correct count (m) must be > 0")]
    ZeroRequired,

    #[error("window size n ({n}) must be >= required correct count m ({m})")]
    WindowTooSmall { m: u32, n: u32 },

    #[error("mastery model kind is missing")]
    MissingKind,

    #[error("mastery model `{kind}` is missing parameter `{param}`")]
    MissingParameter { kind: String, param: &'static str },

    #[error("mastery model `{0}` has no progress law")]
    UnsupportedKind(String),

    #[error("unknown mastery model kind `{0}`")]
    UnknownKind(String),
}

//
// ─── M OF N ────────────────────────────────────────────────────────────────────
//

/// "m correct out of a window of n" mastery policy.
///
/// Always valid once constructed: `m >= 1` and `n >= m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MofN {
    m: u32,
    n: u32,
}

impl MofN {
    /// # Errors
    ///
    /// Returns `MasteryModelError::ZeroRequired` if `m == 0` and
    /// `MasteryModelError::WindowTooSmall` if `n < m`.
    pub fn new(m: u32, n: u32) -> Result<Self, MasteryModelError> {
        if m == 0 {
            return Err(MasteryModelError::ZeroRequired);
        }
        if n < m {
            return Err(MasteryModelError::WindowTooSmall { m, n });
        }
        Ok(Self { m, n })
    }

    #[must_use]
    pub fn m(&self) -> u32 {
        self.m
    }

    #[must_use]
    pub fn n(&self) -> u32 {
        self.n
    }
}

//
// ─── MASTERY MODEL ─────────────────────────────────────────────────────────────
//

/// Closed set of mastery policies.
///
/// New kinds are added as variants so that every `match` over the model,
/// including the progress law, has to handle them explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MasteryModelDraft", into = "MasteryModelDraft")]
pub enum MasteryModel {
    MofN(MofN),
}

impl MasteryModel {
    /// Convenience constructor for [`MofN`].
    ///
    /// # Errors
    ///
    /// See [`MofN::new`].
    pub fn m_of_n(m: u32, n: u32) -> Result<Self, MasteryModelError> {
        MofN::new(m, n).map(Self::MofN)
    }

    /// Number of correct responses needed to reach mastery.
    #[must_use]
    pub fn required_correct(&self) -> u32 {
        match self {
            MasteryModel::MofN(model) => model.m(),
        }
    }

    /// Descriptive window size, if the model has one.
    #[must_use]
    pub fn window(&self) -> Option<u32> {
        match self {
            MasteryModel::MofN(model) => Some(model.n()),
        }
    }

    /// Wire name of the model kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            MasteryModel::MofN(_) => M_OF_N,
        }
    }
}

impl fmt::Display for MasteryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasteryModel::MofN(model) => write!(f, "{} of {}", model.m(), model.n()),
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated mastery model as hosts describe it on the wire:
/// `{ "type": "m_of_n", "m": 3, "n": 5 }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryModelDraft {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
}

impl MasteryModelDraft {
    #[must_use]
    pub fn m_of_n(m: u32, n: u32) -> Self {
        Self {
            kind: Some(M_OF_N.to_string()),
            m: Some(m),
            n: Some(n),
        }
    }

    /// True when the host supplied no model at all (`{}` or all fields blank).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.kind.as_deref().is_none_or(|k| k.trim().is_empty())
            && self.m.is_none()
            && self.n.is_none()
    }
}

fn is_recognised_without_law(kind: &str) -> bool {
    if RECOGNISED_WITHOUT_LAW.contains(&kind) {
        return true;
    }
    kind.strip_prefix(STREAK_PREFIX)
        .is_some_and(|k| !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()))
}

impl TryFrom<MasteryModelDraft> for MasteryModel {
    type Error = MasteryModelError;

    /// Validate the draft into a usable model.
    ///
    /// Fails if the kind is missing, unknown or has no progress law, if a
    /// parameter is missing, or if `m`/`n` are invalid.
    fn try_from(draft: MasteryModelDraft) -> Result<Self, Self::Error> {
        let kind = draft
            .kind
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(MasteryModelError::MissingKind)?;

        if kind == M_OF_N {
            let m = draft.m.ok_or_else(|| MasteryModelError::MissingParameter {
                kind: kind.clone(),
                param: "m",
            })?;
            let n = draft.n.ok_or_else(|| MasteryModelError::MissingParameter {
                kind: kind.clone(),
                param: "n",
            })?;
            return MasteryModel::m_of_n(m, n);
        }

        if is_recognised_without_law(&kind) {
            return Err(MasteryModelError::UnsupportedKind(kind));
        }
        Err(MasteryModelError::UnknownKind(kind))
    }
}

impl From<MasteryModel> for MasteryModelDraft {
    fn from(model: MasteryModel) -> Self {
        match model {
            MasteryModel::MofN(inner) => Self::m_of_n(inner.m(), inner.n()),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
