use serde::{Deserialize, Serialize};

/// Outcome of a lookup that never fails outright.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Live(T),
    Degraded { value: T, reason: String },
}

/// Where a piece of an analysis came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum Provenance {
    #[default]
    Live,
    Degraded { reason: String },
}

impl<T> Fetched<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Fetched::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Fetched::Live(value) | Fetched::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Fetched::Degraded { .. })
    }

    pub fn into_parts(self) -> (T, Provenance) {
        match self {
            Fetched::Live(value) => (value, Provenance::Live),
            Fetched::Degraded { value, reason } => (value, Provenance::Degraded { reason }),
        }
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }
}

impl Provenance {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Provenance::Degraded { .. })
    }
}
