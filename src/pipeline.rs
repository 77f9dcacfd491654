//! Analysis pipeline: tokenize, resolve, assemble, aggregate.
//!
//! [`Pipeline`] runs one analysis. Lookups run concurrently up to the
//! configured cap and are reassembled in input order. [`AnalysisSession`] adds
//! the submit-again-to-replace behaviour: each submission gets a new
//! generation and cancellation token, and only the newest generation's result
//! is ever returned as `Ok`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::assembler::assemble;
use crate::errors::AnalyzeError;
use crate::models::{AnalysisResult, Ingredient};
use crate::safety::SafetySource;
use crate::tokenizer::tokenize;

pub struct Pipeline<S> {
    source: S,
    concurrency: usize,
}

impl<S: SafetySource> Pipeline<S> {
    /// `concurrency` caps in-flight lookups; zero is treated as one.
    pub fn new(source: S, concurrency: usize) -> Self {
        Pipeline {
            source,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn analyze(
        &self,
        raw: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, AnalyzeError> {
        self.analyze_with_progress(raw, cancel, |_| {}).await
    }

    /// Like [`Pipeline::analyze`], calling `on_resolved` as each lookup finishes.
    pub async fn analyze_with_progress<F>(
        &self,
        raw: &str,
        cancel: &CancellationToken,
        on_resolved: F,
    ) -> Result<AnalysisResult, AnalyzeError>
    where
        F: Fn(&str),
    {
        if raw.trim().is_empty() {
            return Err(AnalyzeError::EmptyInput);
        }

        let names = tokenize(raw);
        if names.is_empty() {
            return Err(AnalyzeError::NoIngredients);
        }
        debug!(
            count = names.len(),
            concurrency = self.concurrency,
            "Resolving ingredients"
        );

        let on_resolved = &on_resolved;
        let lookups = stream::iter(names.iter().map(String::as_str))
            .map(|name| async move {
                let data = self.source.resolve(name).await;
                on_resolved(name);
                assemble(name, data)
            })
            // `buffered` yields in input order regardless of completion order.
            .buffered(self.concurrency)
            .collect::<Vec<Ingredient>>();

        let ingredients = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Analysis cancelled, dropping in-flight lookups");
                return Err(AnalyzeError::Cancelled);
            }
            ingredients = lookups => ingredients,
        };

        let result = aggregate(ingredients)?;
        info!(
            ingredients = result.ingredients.len(),
            average = result.average_score,
            verdict = %result.verdict,
            "Analysis complete"
        );
        Ok(result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Analyzing,
}

#[derive(Default)]
struct SessionState {
    generation: u64,
    active: Option<CancellationToken>,
}

/// A pipeline plus the bookkeeping for "a new submission replaces the old one".
pub struct AnalysisSession<S> {
    pipeline: Pipeline<S>,
    state: Mutex<SessionState>,
}

impl<S: SafetySource> AnalysisSession<S> {
    pub fn new(pipeline: Pipeline<S>) -> Self {
        AnalysisSession {
            pipeline,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub async fn submit(&self, raw: &str) -> Result<AnalysisResult, AnalyzeError> {
        self.submit_with_progress(raw, |_| {}).await
    }

    /// Start a new analysis, cancelling any run still in flight.
    ///
    /// A run that was replaced returns [`AnalyzeError::Superseded`], even if
    /// its lookups had already finished. Dropping the returned future cancels
    /// the run and leaves the session idle.
    pub async fn submit_with_progress<F>(
        &self,
        raw: &str,
        on_resolved: F,
    ) -> Result<AnalysisResult, AnalyzeError>
    where
        F: Fn(&str),
    {
        let submission = self.begin();
        let outcome = self
            .pipeline
            .analyze_with_progress(raw, &submission.token, on_resolved)
            .await;
        submission.finish(outcome)
    }

    /// Cancel the in-flight run, if any. It returns [`AnalyzeError::Cancelled`].
    pub fn cancel(&self) {
        let mut state = lock_state(&self.state);
        if let Some(token) = state.active.take() {
            debug!(generation = state.generation, "Cancelling analysis");
            token.cancel();
        }
    }

    pub fn state(&self) -> PipelineState {
        if lock_state(&self.state).active.is_some() {
            PipelineState::Analyzing
        } else {
            PipelineState::Idle
        }
    }

    fn begin(&self) -> Submission<'_> {
        let mut state = lock_state(&self.state);
        if let Some(previous) = state.active.take() {
            debug!(generation = state.generation, "Superseding in-flight analysis");
            previous.cancel();
        }
        state.generation += 1;
        let token = CancellationToken::new();
        state.active = Some(token.clone());
        Submission {
            state: &self.state,
            generation: state.generation,
            token,
            released: false,
        }
    }
}

/// One generation's claim on the session. Releasing it, by `finish` or by
/// drop, clears the active run unless a newer submission has taken over.
struct Submission<'a> {
    state: &'a Mutex<SessionState>,
    generation: u64,
    token: CancellationToken,
    released: bool,
}

impl Submission<'_> {
    fn finish(
        mut self,
        outcome: Result<AnalysisResult, AnalyzeError>,
    ) -> Result<AnalysisResult, AnalyzeError> {
        if self.release() {
            outcome
        } else {
            Err(AnalyzeError::Superseded)
        }
    }

    /// Returns whether this submission was still the newest one.
    fn release(&mut self) -> bool {
        self.released = true;
        let mut state = lock_state(self.state);
        if state.generation != self.generation {
            return false;
        }
        state.active = None;
        true
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.token.cancel();
        if self.release() {
            debug!(generation = self.generation, "Analysis dropped before completion");
        }
    }
}

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
