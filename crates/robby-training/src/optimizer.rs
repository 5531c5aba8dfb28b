//! Greedy mutation-and-selection search over policy tables.
//!
//! # Algorithm
//!
//! Each generation:
//!
//! 1. **Mutate** - Candidate `i` (for `i` in `0..population_size`) is the current
//!    best policy after `i` random reassignments. Candidate 0 is an unmodified
//!    copy of the best policy; mutation counts are not cumulative.
//! 2. **Evaluate** - All candidates are scored in parallel on a fixed-size worker
//!    pool. The controlling thread waits for every result before continuing.
//! 3. **Select** - The candidate with the highest fitness becomes the new best.
//!    Ties go to the candidate with fewer mutations.
//!
//! Generations run strictly one after another; only evaluation within a
//! generation is parallel.
//!
//! # Elitism
//!
//! Because the unmodified best policy always competes, the search never replaces
//! the best policy with one that scored lower in the same generation. Fitness is
//! re-measured every generation, though, so the best fitness reported from one
//! generation to the next can go down through noise alone.
//!
//! # Failure
//!
//! If any evaluation fails, the whole generation is abandoned and the error is
//! returned; no default fitness is substituted.

use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use robby_policy::Policy;

use crate::{TrainingError, fitness::FitnessFunction, stats::FitnessStats};

/// Controls the size of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvolutionParams {
    /// Number of candidates per generation
    pub population_size: usize,
    /// Number of threads evaluating candidates
    pub worker_count: usize,
}

impl EvolutionParams {
    pub const DEFAULT_POPULATION_SIZE: usize = 10;
    pub const DEFAULT_WORKER_COUNT: usize = 8;
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: Self::DEFAULT_POPULATION_SIZE,
            worker_count: Self::DEFAULT_WORKER_COUNT,
        }
    }
}

/// A candidate policy paired with its measured fitness.
#[derive(Debug, Clone)]
struct Individual {
    policy: Policy,
    fitness: f64,
}

/// Outcome of one generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Zero-based number of the generation that produced this report.
    pub generation: usize,
    /// Population index (and mutation count) of the selected candidate.
    pub selected: usize,
    /// Fitness of the selected candidate.
    pub best_fitness: f64,
    /// Fitness of every candidate, in population order.
    pub candidate_fitness: Vec<f64>,
    /// Summary of `candidate_fitness`.
    pub stats: FitnessStats,
}

/// Hill-climbing search state: the best policy so far and the generation count.
#[derive(Debug)]
pub struct Optimizer<'a, F>
where
    F: FitnessFunction + ?Sized,
{
    fitness_fn: &'a F,
    params: EvolutionParams,
    pool: ThreadPool,
    best: Policy,
    best_fitness: Option<f64>,
    generation: usize,
}

impl<'a, F> Optimizer<'a, F>
where
    F: FitnessFunction + ?Sized,
{
    /// Creates an optimizer starting from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the population or the worker pool would be empty, or
    /// if the worker pool cannot be started.
    pub fn new(
        fitness_fn: &'a F,
        params: EvolutionParams,
        seed: Policy,
    ) -> Result<Self, TrainingError> {
        if params.population_size == 0 {
            return Err(TrainingError::EmptyPopulation);
        }
        if params.worker_count == 0 {
            return Err(TrainingError::NoWorkers);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(params.worker_count)
            .thread_name(|i| format!("robby-eval-{i}"))
            .build()?;
        Ok(Self {
            fitness_fn,
            params,
            pool,
            best: seed,
            best_fitness: None,
            generation: 0,
        })
    }

    #[must_use]
    pub fn best(&self) -> &Policy {
        &self.best
    }

    /// Fitness of the best policy as measured in the last generation, `None`
    /// before the first generation.
    #[must_use]
    pub fn best_fitness(&self) -> Option<f64> {
        self.best_fitness
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn into_best(self) -> Policy {
        self.best
    }

    /// Builds the candidates of the next generation from the current best policy.
    #[must_use]
    pub fn population(&self) -> Vec<Policy> {
        let mut rng = rand::rng();
        (0..self.params.population_size)
            .map(|mutations| self.best.mutate(mutations, &mut rng))
            .collect()
    }

    /// Runs one generation: mutate, evaluate in parallel, select.
    pub fn step(&mut self) -> Result<GenerationReport, TrainingError> {
        let individuals = self.evaluate_population(self.population())?;
        let candidate_fitness = individuals
            .iter()
            .map(|individual| individual.fitness)
            .collect::<Vec<_>>();
        let stats = FitnessStats::new(candidate_fitness.iter().copied())
            .ok_or(TrainingError::EmptyPopulation)?;
        let selected = select_best(&individuals).ok_or(TrainingError::EmptyPopulation)?;
        let Individual { policy, fitness } = individuals
            .into_iter()
            .nth(selected)
            .ok_or(TrainingError::EmptyPopulation)?;

        let report = GenerationReport {
            generation: self.generation,
            selected,
            best_fitness: fitness,
            candidate_fitness,
            stats,
        };
        log::info!(
            "generation #{}: best {:.4} (candidate {}), mean {:.4}, min {:.4}",
            report.generation,
            report.best_fitness,
            report.selected,
            report.stats.mean,
            report.stats.min,
        );
        for (i, fitness) in report.candidate_fitness.iter().enumerate() {
            log::debug!("  candidate {i:2}: {fitness:.4}");
        }

        self.best = policy;
        self.best_fitness = Some(fitness);
        self.generation += 1;
        Ok(report)
    }

    /// Runs `generations` generations, passing each report to `on_generation`.
    pub fn run<C>(&mut self, generations: usize, mut on_generation: C) -> Result<(), TrainingError>
    where
        C: FnMut(&GenerationReport),
    {
        for _ in 0..generations {
            let report = self.step()?;
            on_generation(&report);
        }
        Ok(())
    }

    fn evaluate_population(
        &self,
        candidates: Vec<Policy>,
    ) -> Result<Vec<Individual>, TrainingError> {
        let fitness_fn = self.fitness_fn;
        self.pool.install(|| {
            candidates
                .into_par_iter()
                .map(|policy| -> Result<Individual, TrainingError> {
                    let fitness = fitness_fn.evaluate(&policy)?;
                    Ok(Individual { policy, fitness })
                })
                .collect()
        })
    }
}

/// Index of the fittest individual; the lowest index wins ties.
fn select_best(individuals: &[Individual]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, ind) in individuals.iter().enumerate() {
        if best.is_none_or(|b| ind.fitness > individuals[b].fitness) {
            best = Some(i);
        }
    }
    best
}

/// Evolves `seed` for `generations` generations and returns the best policy.
pub fn evolve<F>(
    fitness_fn: &F,
    params: EvolutionParams,
    seed: Policy,
    generations: usize,
) -> Result<Policy, TrainingError>
where
    F: FitnessFunction + ?Sized,
{
    evolve_with(fitness_fn, params, seed, generations, |_| {})
}

/// Like [`evolve`], but passes each generation's report to `on_generation`.
pub fn evolve_with<F, C>(
    fitness_fn: &F,
    params: EvolutionParams,
    seed: Policy,
    generations: usize,
    on_generation: C,
) -> Result<Policy, TrainingError>
where
    F: FitnessFunction + ?Sized,
    C: FnMut(&GenerationReport),
{
    let mut optimizer = Optimizer::new(fitness_fn, params, seed)?;
    optimizer.run(generations, on_generation)?;
    Ok(optimizer.into_best())
}
