//! Core traits and the consensus engine.
//!
//! The engine only knows a geometric problem through the [`Problem`] trait
//! and draws its samples through a [`Sampler`]. One run walks through the
//! states
//!
//! ```text
//! Initializing -> Sampling -> Evaluating -> Updating -> (repeat) -> Terminated
//! ```
//!
//! and owns nothing but its [`IterationState`] and its random source.

use std::time::Instant;

use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::error::ConsensusError;
use crate::samplers::UniformRandomSampler;
use crate::scoring::{InlierCountScoring, Score};
use crate::settings::RansacSettings;
use crate::termination::{RansacTermination, TerminationCriterion};
use crate::types::Residuals;
use crate::utils::UniformRandomGenerator;

/// A geometric estimation problem the engine can run on.
///
/// Implementations capture a read-only correspondence set at construction
/// and expose it only through indices in `[0, correspondence_count())`.
pub trait Problem {
    /// Hypothesis type produced from a sample.
    type Model: Clone;

    /// Number of correspondences needed to generate a hypothesis.
    fn sample_size(&self) -> usize;

    /// Size of the captured correspondence set.
    fn correspondence_count(&self) -> usize;

    /// Cheap degeneracy pre-check run before [`Problem::compute_models`].
    fn is_sample_good(&self, _sample: &[usize]) -> bool {
        true
    }

    /// Candidate models from a sample.
    ///
    /// An empty vector signals a degenerate sample, not an error.
    fn compute_models(&self, sample: &[usize]) -> Vec<Self::Model>;

    /// Reject models before scoring, e.g. ones with non-finite parameters.
    fn is_valid_model(&self, _model: &Self::Model) -> bool {
        true
    }

    /// One residual per correspondence; 0 means a perfect fit.
    fn compute_residuals(&self, model: &Self::Model) -> Residuals;

    /// Polish a model using only the given inliers.
    fn refine(&self, model: &Self::Model, _inliers: &[usize]) -> Self::Model {
        model.clone()
    }
}

/// Sampler responsible for drawing minimal samples.
pub trait Sampler {
    /// Fill `out_indices` with distinct indices in `[0, point_count)`.
    ///
    /// Returns `false` if no sample could be drawn; the engine counts that as
    /// a degenerate draw.
    fn sample(
        &self,
        rng: &mut UniformRandomGenerator,
        point_count: usize,
        out_indices: &mut [usize],
    ) -> bool;
}

/// A scored hypothesis together with its consensus set.
#[derive(Debug, Clone)]
pub struct Candidate<M> {
    pub model: M,
    pub score: Score,
    pub inliers: Vec<usize>,
}

/// Mutable state of one run.
#[derive(Debug, Clone)]
pub struct IterationState<M> {
    /// Iterations completed so far.
    pub iteration: usize,
    /// Current iteration budget. Only ever lowered during a run.
    pub max_iterations: usize,
    /// Best hypothesis accepted so far.
    pub best: Option<Candidate<M>>,
}

impl<M> IterationState<M> {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            iteration: 0,
            max_iterations,
            best: None,
        }
    }

    pub fn best_consensus_size(&self) -> usize {
        self.best.as_ref().map_or(0, |b| b.score.inlier_count)
    }

    pub fn best_score(&self) -> Option<Score> {
        self.best.as_ref().map(|b| b.score)
    }

    /// Offer a candidate; keeps it if it beats the current best.
    ///
    /// A candidate wins with a strictly larger consensus set, or an equal one
    /// with a smaller residual sum. Empty consensus sets are never accepted.
    pub fn propose(&mut self, candidate: Candidate<M>) -> bool {
        let better = match &self.best {
            None => candidate.score.inlier_count > 0,
            Some(best) => candidate.score.is_better_than(&best.score),
        };
        if better {
            self.best = Some(candidate);
        }
        better
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ok,
    NoConsensus,
    InsufficientData { required: usize, available: usize },
    DegenerateData { attempts: usize },
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Never entered the loop.
    NotStarted,
    /// The (adaptive) iteration budget was spent.
    MaxIterations,
    /// Every correspondence is an inlier.
    PerfectFit,
    /// The termination criterion asked for an immediate stop.
    Criterion,
    /// Caller-imposed iteration cap reached.
    IterationCap,
    /// Caller-imposed wall-clock budget reached.
    TimeBudget,
    /// Too many consecutive degenerate samples.
    DegenerateSamples,
}

/// Result of a consensus run.
///
/// Failed runs still carry the best hypothesis found before the failure, so
/// callers can tell "succeeded weakly" from "found nothing".
#[derive(Debug, Clone)]
pub struct ConsensusResult<M> {
    pub model: Option<M>,
    pub inliers: Vec<usize>,
    pub score: Option<Score>,
    pub iterations: usize,
    pub status: RunStatus,
    pub stop_reason: StopReason,
}

/// Successful estimate extracted from a [`ConsensusResult`].
#[derive(Debug, Clone)]
pub struct EstimationResult<M> {
    /// The estimated model.
    pub model: M,
    /// Indices of inlier correspondences.
    pub inliers: Vec<usize>,
    /// Score of the estimated model.
    pub score: Score,
    /// Number of iterations performed.
    pub iterations: usize,
}

impl<M> ConsensusResult<M> {
    fn failed(status: RunStatus) -> Self {
        Self {
            model: None,
            inliers: Vec::new(),
            score: None,
            iterations: 0,
            status,
            stop_reason: StopReason::NotStarted,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RunStatus::Ok
    }

    /// Convert into an estimate, mapping every non-`Ok` status to an error.
    pub fn into_result(self) -> Result<EstimationResult<M>, ConsensusError> {
        match (self.status, self.model, self.score) {
            (RunStatus::Ok, Some(model), Some(score)) => Ok(EstimationResult {
                model,
                inliers: self.inliers,
                score,
                iterations: self.iterations,
            }),
            (RunStatus::InsufficientData { required, available }, _, _) => {
                Err(ConsensusError::InsufficientData {
                    required,
                    available,
                })
            }
            (RunStatus::DegenerateData { attempts }, _, _) => {
                Err(ConsensusError::DegenerateData { attempts })
            }
            _ => Err(ConsensusError::NoConsensus {
                iterations: self.iterations,
            }),
        }
    }
}

/// Generic sample-consensus engine.
pub struct Ransac<P, Sa = UniformRandomSampler, T = RansacTermination>
where
    P: Problem,
    Sa: Sampler,
    T: TerminationCriterion,
{
    pub settings: RansacSettings,
    pub problem: P,
    pub sampler: Sa,
    pub termination: T,
    scoring: InlierCountScoring,
    rng: UniformRandomGenerator,
}

impl<P: Problem> Ransac<P> {
    /// Engine with uniform sampling and the standard adaptive termination.
    pub fn new(settings: RansacSettings, problem: P) -> Result<Self, ConsensusError> {
        let termination = RansacTermination::new(settings.confidence);
        Self::with_components(settings, problem, UniformRandomSampler, termination)
    }
}

impl<P, Sa, T> Ransac<P, Sa, T>
where
    P: Problem,
    Sa: Sampler,
    T: TerminationCriterion,
{
    /// Create an engine from its components. Settings are validated here.
    pub fn with_components(
        settings: RansacSettings,
        problem: P,
        sampler: Sa,
        termination: T,
    ) -> Result<Self, ConsensusError> {
        settings.validate()?;
        let rng = UniformRandomGenerator::from_optional_seed(settings.seed);
        let scoring = InlierCountScoring::new(settings.threshold);
        Ok(Self {
            settings,
            problem,
            sampler,
            termination,
            scoring,
            rng,
        })
    }

    /// Run the consensus loop on the calling thread.
    pub fn run(&mut self) -> ConsensusResult<P::Model> {
        let n = self.problem.correspondence_count();
        let k = self.problem.sample_size();
        if let Err(status) = check_data(n, k) {
            return ConsensusResult::failed(status);
        }

        let mut state = IterationState::new(self.settings.max_iterations);
        let mut sample = vec![0usize; k];
        let mut status = RunStatus::Ok;
        let started = Instant::now();

        let stop_reason = loop {
            if let Some(reason) = check_stop(&self.settings, &state, n, started) {
                break reason;
            }

            let models = match draw_hypotheses(
                &self.problem,
                &self.sampler,
                &mut self.rng,
                self.settings.max_degenerate_samples,
                &mut sample,
            ) {
                Ok(models) => models,
                Err(attempts) => {
                    warn!("giving up after {attempts} consecutive degenerate samples");
                    status = RunStatus::DegenerateData { attempts };
                    break StopReason::DegenerateSamples;
                }
            };
            state.iteration += 1;

            if let Some(candidate) = evaluate(&self.problem, &self.scoring, models, n) {
                if update(&mut self.termination, &mut state, candidate, n, k) {
                    break StopReason::Criterion;
                }
            }
        };

        self.finish(state, status, stop_reason)
    }

    fn finish(
        &self,
        state: IterationState<P::Model>,
        status: RunStatus,
        stop_reason: StopReason,
    ) -> ConsensusResult<P::Model> {
        let iterations = state.iteration;
        debug!("consensus loop stopped after {iterations} iterations: {stop_reason:?}");

        let Some(mut best) = state.best else {
            let status = match status {
                RunStatus::Ok => RunStatus::NoConsensus,
                other => other,
            };
            return ConsensusResult {
                iterations,
                stop_reason,
                ..ConsensusResult::failed(status)
            };
        };

        if self.settings.refine_result {
            best = self.refine(best);
        }

        ConsensusResult {
            model: Some(best.model),
            inliers: best.inliers,
            score: Some(best.score),
            iterations,
            status,
            stop_reason,
        }
    }

    /// Refine the best model over its consensus set and re-score it.
    ///
    /// The refined model is kept unless it is invalid or shrinks the
    /// consensus set.
    fn refine(&self, best: Candidate<P::Model>) -> Candidate<P::Model> {
        let refined = self.problem.refine(&best.model, &best.inliers);
        if !self.problem.is_valid_model(&refined) {
            warn!("refinement produced an invalid model, keeping the sampled one");
            return best;
        }

        let residuals = self.problem.compute_residuals(&refined);
        if residuals.len() != self.problem.correspondence_count() {
            return best;
        }
        let mut inliers = Vec::new();
        let score = self.scoring.score(&residuals, &mut inliers);
        if score.inlier_count < best.score.inlier_count {
            warn!(
                "refinement shrank the consensus set from {} to {}, keeping the sampled model",
                best.score.inlier_count, score.inlier_count
            );
            return best;
        }

        Candidate {
            model: refined,
            score,
            inliers,
        }
    }
}

impl<P, Sa, T> Ransac<P, Sa, T>
where
    P: Problem + Sync,
    P::Model: Send,
    Sa: Sampler + Sync,
    T: TerminationCriterion,
{
    /// Run iterations in batches on the rayon thread pool.
    ///
    /// Iteration `i` samples from its own generator derived from the run
    /// seed and `i`, and batch results are merged in iteration order, so a
    /// seeded run returns the same result regardless of the thread count.
    /// Each batch is sized from a snapshot of the adaptive budget taken
    /// before it is scheduled.
    pub fn run_parallel(&mut self) -> ConsensusResult<P::Model> {
        let n = self.problem.correspondence_count();
        let k = self.problem.sample_size();
        if let Err(status) = check_data(n, k) {
            return ConsensusResult::failed(status);
        }

        let base_seed = self
            .settings
            .seed
            .unwrap_or_else(|| self.rng.next_seed());
        let batch_limit = rayon::current_num_threads().max(1) * 4;
        let max_degenerate = self.settings.max_degenerate_samples;

        let mut state = IterationState::new(self.settings.max_iterations);
        let mut status = RunStatus::Ok;
        let started = Instant::now();

        let problem = &self.problem;
        let sampler = &self.sampler;
        let scoring = &self.scoring;

        let stop_reason = 'run: loop {
            if let Some(reason) = check_stop(&self.settings, &state, n, started) {
                break reason;
            }

            let mut budget = state.max_iterations;
            if let Some(cap) = self.settings.iteration_cap {
                budget = budget.min(cap);
            }
            let first = state.iteration;
            let batch = budget.saturating_sub(first).clamp(1, batch_limit);

            let outcomes: Vec<Result<Option<Candidate<P::Model>>, usize>> = (first
                ..first + batch)
                .into_par_iter()
                .map(|iteration| {
                    let mut rng = UniformRandomGenerator::for_iteration(base_seed, iteration);
                    let mut sample = vec![0usize; k];
                    let models =
                        draw_hypotheses(problem, sampler, &mut rng, max_degenerate, &mut sample)?;
                    Ok(evaluate(problem, scoring, models, n))
                })
                .collect();

            for outcome in outcomes {
                match outcome {
                    Err(attempts) => {
                        warn!("giving up after {attempts} consecutive degenerate samples");
                        status = RunStatus::DegenerateData { attempts };
                        break 'run StopReason::DegenerateSamples;
                    }
                    Ok(candidate) => {
                        state.iteration += 1;
                        if let Some(candidate) = candidate {
                            if update(&mut self.termination, &mut state, candidate, n, k) {
                                break 'run StopReason::Criterion;
                            }
                        }
                    }
                }
                if let Some(reason) = check_stop(&self.settings, &state, n, started) {
                    break 'run reason;
                }
            }
        };

        self.finish(state, status, stop_reason)
    }
}

fn check_data(n: usize, k: usize) -> Result<(), RunStatus> {
    if k == 0 || n < k {
        debug!("cannot run: {n} correspondences for a minimal sample of {k}");
        return Err(RunStatus::InsufficientData {
            required: k.max(1),
            available: n,
        });
    }
    Ok(())
}

fn check_stop<M>(
    settings: &RansacSettings,
    state: &IterationState<M>,
    n: usize,
    started: Instant,
) -> Option<StopReason> {
    if state.best_consensus_size() == n {
        return Some(StopReason::PerfectFit);
    }
    if state.iteration >= state.max_iterations {
        return Some(StopReason::MaxIterations);
    }
    if settings.iteration_cap.is_some_and(|cap| state.iteration >= cap) {
        return Some(StopReason::IterationCap);
    }
    if settings
        .time_budget
        .is_some_and(|budget| started.elapsed() >= budget)
    {
        return Some(StopReason::TimeBudget);
    }
    None
}

/// Sampling state: draw until the problem yields at least one model.
///
/// Returns the number of attempts on failure.
fn draw_hypotheses<P, Sa>(
    problem: &P,
    sampler: &Sa,
    rng: &mut UniformRandomGenerator,
    max_attempts: usize,
    sample: &mut [usize],
) -> Result<Vec<P::Model>, usize>
where
    P: Problem,
    Sa: Sampler,
{
    let n = problem.correspondence_count();
    for attempt in 1..=max_attempts {
        if !sampler.sample(rng, n, sample) {
            trace!("sampler could not draw a sample (attempt {attempt})");
            continue;
        }
        if !problem.is_sample_good(sample) {
            trace!("degenerate sample {sample:?} (attempt {attempt})");
            continue;
        }
        let models = problem.compute_models(sample);
        if models.is_empty() {
            trace!("no model from sample {sample:?} (attempt {attempt})");
            continue;
        }
        return Ok(models);
    }
    Err(max_attempts)
}

/// Evaluating state: score every model of one sample and keep the best.
fn evaluate<P: Problem>(
    problem: &P,
    scoring: &InlierCountScoring,
    models: Vec<P::Model>,
    n: usize,
) -> Option<Candidate<P::Model>> {
    let mut best: Option<Candidate<P::Model>> = None;
    let mut inliers = Vec::new();

    for model in models {
        if !problem.is_valid_model(&model) {
            continue;
        }
        let residuals = problem.compute_residuals(&model);
        if residuals.len() != n {
            warn!(
                "problem returned {} residuals for {n} correspondences, discarding model",
                residuals.len()
            );
            continue;
        }

        let score = scoring.score(&residuals, &mut inliers);
        let better = match &best {
            None => true,
            Some(b) => score.is_better_than(&b.score),
        };
        if better {
            best = Some(Candidate {
                model,
                score,
                inliers: std::mem::take(&mut inliers),
            });
        }
    }
    best
}

/// Updating state. Returns `true` if the termination criterion asks to stop.
fn update<M, T: TerminationCriterion>(
    termination: &mut T,
    state: &mut IterationState<M>,
    candidate: Candidate<M>,
    n: usize,
    k: usize,
) -> bool {
    if !state.propose(candidate) {
        return false;
    }
    let Some(score) = state.best_score() else {
        return false;
    };
    let stop = termination.check(&score, n, k, &mut state.max_iterations);
    debug!(
        "iteration {}: consensus {}/{n}, budget {}",
        state.iteration, score.inlier_count, state.max_iterations
    );
    stop
}
