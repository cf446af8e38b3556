use paragen_core::{BenchmarkFunction, Candidate, FunctionIndividual, Population};

/// Builds a clean single-objective population whose primary fitness values
/// are exactly `values` (sphere of the square root).
pub fn scored_population(values: &[f64], n_parents: usize) -> Population<FunctionIndividual> {
    let candidates = values
        .iter()
        .map(|v| {
            let mut candidate = Candidate::new(FunctionIndividual::with_params(
                vec![v.abs().sqrt()],
                -1000.0..1000.0,
                1.0,
                BenchmarkFunction::Sphere,
            ));
            candidate.evaluate().unwrap();
            candidate
        })
        .collect::<Vec<_>>();

    let mut population = Population::new(candidates);
    population.set_sizes(values.len(), n_parents);
    population.mark_parents();
    population.mark_children();
    population
}

/// Builds a clean two-objective population over the parabola pair
/// f1 = x^2, f2 = (x - 1)^2 at the given x positions.
pub fn parabola_population(xs: &[f64], n_parents: usize) -> Population<FunctionIndividual> {
    let candidates = xs
        .iter()
        .map(|x| {
            let mut candidate = Candidate::new(FunctionIndividual::with_params(
                vec![*x],
                -10.0..10.0,
                0.5,
                BenchmarkFunction::TwoParabolas,
            ));
            candidate.evaluate().unwrap();
            candidate
        })
        .collect::<Vec<_>>();

    let mut population = Population::new(candidates);
    population.set_sizes(xs.len(), n_parents);
    population.mark_parents();
    population.mark_children();
    population
}

pub fn primary_values(population: &Population<FunctionIndividual>) -> Vec<f64> {
    population
        .iter()
        .map(|c| c.primary_fitness().unwrap())
        .collect()
}
