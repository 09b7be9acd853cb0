//! Per-entity outcomes for multi-company requests.
//!
//! Comparison and benchmarking fan out one pipeline per company. Each one may
//! fail on its own; [`Batch`] keeps every outcome so callers can proceed with
//! the successes and report the failures as warnings.

use crate::error::FinError;

/// Result of one entity's pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome<T> {
    /// The identifier the pipeline ran for.
    pub entity: String,
    /// Payload or error.
    pub result: Result<T, FinError>,
}

/// Ordered collection of per-entity outcomes.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch<T> {
    outcomes: Vec<Outcome<T>>,
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }
}

impl<T> Batch<T> {
    /// Builds a batch from `(entity, result)` pairs, preserving order.
    pub fn from_results<I, S>(results: I) -> Self
    where
        I: IntoIterator<Item = (S, Result<T, FinError>)>,
        S: Into<String>,
    {
        Self {
            outcomes: results
                .into_iter()
                .map(|(entity, result)| Outcome {
                    entity: entity.into(),
                    result,
                })
                .collect(),
        }
    }

    /// Appends an outcome.
    pub fn push(&mut self, entity: impl Into<String>, result: Result<T, FinError>) {
        self.outcomes.push(Outcome {
            entity: entity.into(),
            result,
        });
    }

    /// All outcomes in insertion order.
    #[must_use]
    pub fn outcomes(&self) -> &[Outcome<T>] {
        &self.outcomes
    }

    /// Number of outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True when the batch holds no outcomes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Successful payloads with their entity.
    pub fn successes(&self) -> impl Iterator<Item = (&str, &T)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|v| (o.entity.as_str(), v)))
    }

    /// Failures with their entity.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FinError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.entity.as_str(), e)))
    }

    /// True when no entity succeeded.
    #[must_use]
    pub fn is_total_failure(&self) -> bool {
        self.successes().next().is_none()
    }

    /// One warning line per failure, e.g. `ZZZZ: Not found: ticker ZZZZ`.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.failures()
            .map(|(entity, err)| format!("{entity}: {err}"))
            .collect()
    }

    /// Consumes the batch into successes and failures.
    #[must_use]
    pub fn into_parts(self) -> (Vec<(String, T)>, Vec<(String, FinError)>) {
        let mut ok = Vec::new();
        let mut failed = Vec::new();
        for Outcome { entity, result } in self.outcomes {
            match result {
                Ok(value) => ok.push((entity, value)),
                Err(err) => failed.push((entity, err)),
            }
        }
        (ok, failed)
    }
}
