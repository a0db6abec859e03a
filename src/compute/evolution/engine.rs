//! The generational evolution step.

use log::debug;

use crate::compute::evolution::genome::{self, Genome};
use crate::compute::rng::RandomSource;
use crate::schema::{EvolutionConfigError, GeneticParams, check_rate};

/// Genetic algorithm over fixed-length weight chromosomes.
///
/// The engine owns its population between [`epoch`](Self::epoch) calls; the
/// caller owns the returned population while it assigns fitness, then hands it
/// back. There is exactly one writer at any time, enforced by that
/// request/response shape rather than by a lock.
pub struct GeneticAlgorithm<R: RandomSource> {
    population: Vec<Genome>,
    pop_size: usize,
    chromosome_length: usize,
    mutation_rate: f64,
    crossover_rate: f64,
    total_fitness: f64,
    best_fitness: f64,
    worst_fitness: f64,
    average_fitness: f64,
    fittest_genome: usize,
    generation: usize,
    rng: R,
}

impl<R: RandomSource> GeneticAlgorithm<R> {
    /// Create an algorithm with a random initial population.
    ///
    /// Every chromosome gets `num_weights` weights drawn as the difference of
    /// two uniform `[0, 1)` values; all fitness starts at 0.
    pub fn new(
        pop_size: usize,
        mutation_rate: f64,
        crossover_rate: f64,
        num_weights: usize,
        mut rng: R,
    ) -> Result<Self, EvolutionConfigError> {
        if pop_size == 0 {
            return Err(EvolutionConfigError::EmptyPopulation);
        }
        if num_weights == 0 {
            return Err(EvolutionConfigError::EmptyChromosome);
        }
        check_rate("mutation rate", mutation_rate)?;
        check_rate("crossover rate", crossover_rate)?;

        let population = (0..pop_size)
            .map(|_| Genome::random(num_weights, &mut rng))
            .collect();

        Ok(Self {
            population,
            pop_size,
            chromosome_length: num_weights,
            mutation_rate,
            crossover_rate,
            total_fitness: 0.0,
            best_fitness: 0.0,
            worst_fitness: f64::INFINITY,
            average_fitness: 0.0,
            fittest_genome: 0,
            generation: 0,
            rng,
        })
    }

    /// Run one generation.
    ///
    /// Adopts the fitness-scored `old_population`, recomputes the running
    /// statistics over it, carries elite copies forward, then fills the next
    /// generation with roulette-selected, crossed-over, mutated offspring.
    /// `params` becomes the engine's current rate set for this and later
    /// generations.
    ///
    /// Elitism is silently skipped for the generation when
    /// `num_elite * num_copies_elite` is odd; that is configuration shorthand
    /// for "no elitism", not an error. The returned population always has
    /// exactly `pop_size` genomes (offspring arrive in pairs, so an odd size
    /// is truncated by one). Offspring fitness is 0; elite copies keep theirs.
    pub fn epoch(&mut self, old_population: Vec<Genome>, params: &GeneticParams) -> Vec<Genome> {
        self.population = old_population;
        self.mutation_rate = params.mutation_rate;
        self.crossover_rate = params.crossover_rate;

        self.reset();

        // Stable sort: genomes with equal fitness keep their incoming order.
        self.population
            .sort_by(|a, b| a.fitness.total_cmp(&b.fitness));

        self.calculate_stats();

        debug!(
            "generation {}: best {:.4} (genome {}), worst {:.4}, avg {:.4}",
            self.generation,
            self.best_fitness,
            self.fittest_genome,
            self.worst_fitness,
            self.average_fitness
        );

        let mut new_population = Vec::with_capacity(self.pop_size + 1);

        if (params.num_elite * params.num_copies_elite) % 2 == 0 {
            self.grab_n_best(params.num_elite, params.num_copies_elite, &mut new_population);
        } else {
            debug!(
                "skipping elitism this generation: {} elites x {} copies is odd",
                params.num_elite, params.num_copies_elite
            );
        }

        while new_population.len() < self.pop_size {
            let mum_idx = self.select_index();
            let dad_idx = self.select_index();

            let (mut baby1, mut baby2) = genome::crossover(
                &self.population[mum_idx].weights,
                &self.population[dad_idx].weights,
                self.crossover_rate,
                &mut self.rng,
            );

            genome::mutate(
                &mut baby1,
                self.mutation_rate,
                params.max_perturbation,
                &mut self.rng,
            );
            genome::mutate(
                &mut baby2,
                self.mutation_rate,
                params.max_perturbation,
                &mut self.rng,
            );

            new_population.push(Genome::new(baby1));
            new_population.push(Genome::new(baby2));
        }

        new_population.truncate(self.pop_size);

        self.population = new_population;
        self.generation += 1;
        self.population.clone()
    }

    /// Fitness-proportionate selection over the sorted working population.
    ///
    /// Draws a slice in `[0, total_fitness)` and returns the first genome
    /// whose running fitness sum reaches it. With zero total fitness the
    /// slice is 0 and the first genome satisfies the comparison immediately;
    /// if float accumulation leaves the sum a hair short of the slice, the
    /// last genome scanned is returned.
    fn select_index(&mut self) -> usize {
        let slice = self.rng.next_f64() * self.total_fitness;

        let mut running = 0.0;
        for (i, genome) in self.population.iter().enumerate() {
            running += genome.fitness;
            if running >= slice {
                return i;
            }
        }

        self.population.len() - 1
    }

    /// Copy each of the `n_best` fittest genomes `num_copies` times onto the
    /// new population, best first, weights and fitness preserved.
    fn grab_n_best(&self, n_best: usize, num_copies: usize, out: &mut Vec<Genome>) {
        let n_best = n_best.min(self.population.len());
        for i in 0..n_best {
            let elite = &self.population[self.population.len() - 1 - i];
            for _ in 0..num_copies {
                out.push(elite.clone());
            }
        }
    }

    /// Recompute total, best, worst and average fitness over the population.
    ///
    /// The best scan starts from a 0 threshold: fitness is assumed
    /// non-negative, so a population scoring nothing leaves the best at 0 and
    /// the fittest index at 0.
    fn calculate_stats(&mut self) {
        self.total_fitness = 0.0;

        let mut highest = 0.0;
        let mut lowest = f64::INFINITY;

        for (i, genome) in self.population.iter().enumerate() {
            if genome.fitness > highest {
                highest = genome.fitness;
                self.fittest_genome = i;
                self.best_fitness = highest;
            }

            if genome.fitness < lowest {
                lowest = genome.fitness;
                self.worst_fitness = lowest;
            }

            self.total_fitness += genome.fitness;
        }

        self.average_fitness = self.total_fitness / self.pop_size as f64;
    }

    fn reset(&mut self) {
        self.total_fitness = 0.0;
        self.best_fitness = 0.0;
        self.worst_fitness = f64::INFINITY;
        self.average_fitness = 0.0;
        self.fittest_genome = 0;
    }

    /// The current internal population.
    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    /// Number of generations stepped so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Fixed chromosome length.
    pub fn chromosome_length(&self) -> usize {
        self.chromosome_length
    }

    /// Sum of fitness over the last scored population.
    pub fn total_fitness(&self) -> f64 {
        self.total_fitness
    }

    /// Best fitness of the last scored population (0 if nothing scored above
    /// the non-negative baseline).
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Worst fitness of the last scored population.
    pub fn worst_fitness(&self) -> f64 {
        self.worst_fitness
    }

    /// Average fitness of the last scored population.
    pub fn average_fitness(&self) -> f64 {
        self.average_fitness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::rng::WeightRng;
    use crate::compute::rng::testing::ScriptedSource;

    fn scored(weights: Vec<f64>, fitness: f64) -> Genome {
        Genome { weights, fitness }
    }

    /// Elitism disabled: a zero elite count has an even product, so the grab
    /// runs but copies nothing.
    fn no_elites(crossover_rate: f64, mutation_rate: f64) -> GeneticParams {
        GeneticParams {
            crossover_rate,
            mutation_rate,
            max_perturbation: 0.3,
            num_elite: 0,
            num_copies_elite: 0,
        }
    }

    #[test]
    fn test_constructor_builds_random_population() {
        let ga = GeneticAlgorithm::new(6, 0.1, 0.7, 10, WeightRng::new(1)).unwrap();

        assert_eq!(ga.population().len(), 6);
        assert_eq!(ga.chromosome_length(), 10);
        assert_eq!(ga.generation(), 0);
        for genome in ga.population() {
            assert_eq!(genome.weights.len(), 10);
            assert_eq!(genome.fitness, 0.0);
            assert!(genome.weights.iter().all(|w| *w > -1.0 && *w < 1.0));
        }
    }

    #[test]
    fn test_constructor_rejects_bad_parameters() {
        assert!(matches!(
            GeneticAlgorithm::new(0, 0.1, 0.7, 10, WeightRng::new(1)),
            Err(EvolutionConfigError::EmptyPopulation)
        ));
        assert!(matches!(
            GeneticAlgorithm::new(4, 0.1, 0.7, 0, WeightRng::new(1)),
            Err(EvolutionConfigError::EmptyChromosome)
        ));
        assert!(matches!(
            GeneticAlgorithm::new(4, -0.1, 0.7, 10, WeightRng::new(1)),
            Err(EvolutionConfigError::InvalidRate { .. })
        ));
        assert!(matches!(
            GeneticAlgorithm::new(4, 0.1, 1.7, 10, WeightRng::new(1)),
            Err(EvolutionConfigError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_elitism_copies_best_descending() {
        let mut ga = GeneticAlgorithm::new(4, 0.0, 0.0, 2, WeightRng::new(2)).unwrap();

        let population = vec![
            scored(vec![0.1, 0.1], 1.0),
            scored(vec![0.4, 0.4], 4.0),
            scored(vec![0.2, 0.2], 2.0),
            scored(vec![0.3, 0.3], 3.0),
        ];

        let params = GeneticParams {
            num_elite: 2,
            num_copies_elite: 2,
            ..no_elites(0.0, 0.0)
        };
        let next = ga.epoch(population, &params);

        // Two copies of the fittest, then two of the runner-up; weights and
        // fitness carried over unchanged.
        assert_eq!(next.len(), 4);
        assert_eq!(next[0].weights, vec![0.4, 0.4]);
        assert_eq!(next[0].fitness, 4.0);
        assert_eq!(next[1].weights, vec![0.4, 0.4]);
        assert_eq!(next[2].weights, vec![0.3, 0.3]);
        assert_eq!(next[2].fitness, 3.0);
        assert_eq!(next[3].weights, vec![0.3, 0.3]);
    }

    #[test]
    fn test_elitism_skipped_when_product_is_odd() {
        let mut ga = GeneticAlgorithm::new(4, 0.0, 0.0, 2, WeightRng::new(3)).unwrap();

        let population = vec![
            scored(vec![0.1, 0.1], 1.0),
            scored(vec![0.4, 0.4], 4.0),
            scored(vec![0.2, 0.2], 2.0),
            scored(vec![0.3, 0.3], 3.0),
        ];

        let params = GeneticParams {
            num_elite: 3,
            num_copies_elite: 1,
            ..no_elites(0.0, 0.0)
        };
        let next = ga.epoch(population, &params);

        // 3 * 1 is odd, so no elite copies survive: everything in the new
        // population is freshly bred offspring with fitness 0.
        assert_eq!(next.len(), 4);
        assert!(next.iter().all(|genome| genome.fitness == 0.0));
    }

    #[test]
    fn test_crossover_rate_zero_keeps_parent_weights() {
        let mut ga = GeneticAlgorithm::new(4, 0.0, 0.0, 2, WeightRng::new(4)).unwrap();

        let inputs = [
            vec![0.1, 0.1],
            vec![0.2, 0.2],
            vec![0.3, 0.3],
            vec![0.4, 0.4],
        ];
        let population = inputs
            .iter()
            .enumerate()
            .map(|(i, w)| scored(w.clone(), (i + 1) as f64))
            .collect();

        let next = ga.epoch(population, &no_elites(0.0, 0.0));

        assert_eq!(next.len(), 4);
        for genome in &next {
            assert!(inputs.contains(&genome.weights));
            assert_eq!(genome.fitness, 0.0);
        }
    }

    #[test]
    fn test_mutation_rate_one_changes_every_offspring_gene() {
        let mut ga = GeneticAlgorithm::new(4, 1.0, 0.0, 3, WeightRng::new(5)).unwrap();

        // All parents identical, so every offspring starts at 0.5 everywhere.
        let population = (0..4).map(|_| scored(vec![0.5; 3], 1.0)).collect();

        let params = GeneticParams {
            max_perturbation: 0.3,
            ..no_elites(0.0, 1.0)
        };
        let next = ga.epoch(population, &params);

        for genome in &next {
            assert!(genome.weights.iter().all(|gene| *gene != 0.5));
        }
    }

    #[test]
    fn test_roulette_with_zero_total_fitness_returns_first() {
        let mut ga = GeneticAlgorithm::new(3, 0.0, 0.0, 2, WeightRng::new(6)).unwrap();

        let population = vec![
            scored(vec![0.1, 0.1], 0.0),
            scored(vec![0.2, 0.2], 0.0),
            scored(vec![0.3, 0.3], 0.0),
        ];

        let next = ga.epoch(population, &no_elites(0.0, 0.0));

        // The zero slice is satisfied by the first genome of the (stably
        // sorted, so order-preserved) population; with crossover and mutation
        // off, every offspring is a copy of it.
        assert_eq!(next.len(), 3);
        for genome in &next {
            assert_eq!(genome.weights, vec![0.1, 0.1]);
        }
    }

    #[test]
    fn test_odd_population_is_truncated_to_size() {
        let mut ga = GeneticAlgorithm::new(5, 0.0, 0.7, 2, WeightRng::new(7)).unwrap();

        let population = (0..5)
            .map(|i| scored(vec![i as f64, i as f64], (i + 1) as f64))
            .collect();

        let next = ga.epoch(population, &no_elites(0.7, 0.0));
        assert_eq!(next.len(), 5);
        assert_eq!(ga.population().len(), 5);
    }

    #[test]
    fn test_best_tracking_keeps_zero_baseline() {
        let mut ga = GeneticAlgorithm::new(3, 0.0, 0.0, 2, WeightRng::new(8)).unwrap();

        let population = vec![
            scored(vec![0.1, 0.1], -1.0),
            scored(vec![0.2, 0.2], -3.0),
            scored(vec![0.3, 0.3], -2.0),
        ];

        ga.epoch(population, &no_elites(0.0, 0.0));

        // Nothing scored above the non-negative baseline, so best stays 0.
        assert_eq!(ga.best_fitness(), 0.0);
        assert_eq!(ga.worst_fitness(), -3.0);
        assert_eq!(ga.total_fitness(), -6.0);
        assert_eq!(ga.average_fitness(), -2.0);
    }

    #[test]
    fn test_sort_is_stable_for_equal_fitness() {
        let mut ga = GeneticAlgorithm::new(4, 0.0, 0.0, 2, WeightRng::new(9)).unwrap();

        let population = vec![
            scored(vec![0.1, 0.1], 1.0),
            scored(vec![0.2, 0.2], 1.0),
            scored(vec![0.3, 0.3], 1.0),
            scored(vec![0.4, 0.4], 1.0),
        ];

        // Full elitism copies the sorted tail back out; with all fitness
        // equal, a stable sort means the tail is just the incoming order
        // reversed.
        let params = GeneticParams {
            num_elite: 4,
            num_copies_elite: 1,
            ..no_elites(0.0, 0.0)
        };
        let next = ga.epoch(population, &params);

        assert_eq!(next[0].weights, vec![0.4, 0.4]);
        assert_eq!(next[1].weights, vec![0.3, 0.3]);
        assert_eq!(next[2].weights, vec![0.2, 0.2]);
        assert_eq!(next[3].weights, vec![0.1, 0.1]);
    }

    #[test]
    fn test_generation_counter_advances() {
        let mut ga = GeneticAlgorithm::new(2, 0.0, 0.0, 2, WeightRng::new(10)).unwrap();
        assert_eq!(ga.generation(), 0);

        let mut population = ga.population().to_vec();
        for expected in 1..=3 {
            population = ga.epoch(population, &no_elites(0.0, 0.0));
            assert_eq!(ga.generation(), expected);
        }
    }

    /// Hand-derivable epoch: every draw is scripted, so the offspring weights
    /// can be computed on paper and asserted literally.
    #[test]
    fn test_epoch_output_is_derivable_from_scripted_draws() {
        // Construction consumes two draws per weight: 4 genomes x 3 weights
        // x 2 = 24 draws (values irrelevant, the initial population is
        // replaced by the scored one below).
        let mut script = vec![0.5; 24];
        script.extend_from_slice(&[
            // Pair one: slices 0.05*10 = 0.5 -> genome 0, 0.95*10 = 9.5 ->
            // genome 3; gate 0.5 passes (rate 1.0); point 0.4*3 -> 1.
            0.05, 0.95, 0.5, 0.4, //
            0.9, 0.9, 0.9, 0.9, 0.9, 0.9, // mutation gates, rate 0
            // Pair two: slices 2.5 -> genome 1, 5.5 -> genome 2; gate 0.0;
            // point 0.7*3 -> 2.
            0.25, 0.55, 0.0, 0.7, //
            0.9, 0.9, 0.9, 0.9, 0.9, 0.9,
        ]);
        let rng = ScriptedSource::new(&script);

        let mut ga = GeneticAlgorithm::new(4, 0.0, 1.0, 3, rng).unwrap();

        let population = vec![
            scored(vec![1.0, 2.0, 3.0], 1.0),
            scored(vec![4.0, 5.0, 6.0], 2.0),
            scored(vec![7.0, 8.0, 9.0], 3.0),
            scored(vec![10.0, 11.0, 12.0], 4.0),
        ];

        let next = ga.epoch(population, &no_elites(1.0, 0.0));

        assert_eq!(next.len(), 4);
        assert_eq!(next[0].weights, vec![1.0, 11.0, 12.0]);
        assert_eq!(next[1].weights, vec![10.0, 2.0, 3.0]);
        assert_eq!(next[2].weights, vec![4.0, 5.0, 9.0]);
        assert_eq!(next[3].weights, vec![7.0, 8.0, 6.0]);
        assert!(next.iter().all(|genome| genome.fitness == 0.0));

        assert_eq!(ga.total_fitness(), 10.0);
        assert_eq!(ga.best_fitness(), 4.0);
        assert_eq!(ga.worst_fitness(), 1.0);
        assert_eq!(ga.average_fitness(), 2.5);
    }
}
