use paragen_engines::*;
use rstest::*;

fn scored_population(values: &[f64], n_parents: usize) -> Population<FunctionIndividual> {
    let candidates = values
        .iter()
        .map(|v| {
            let mut candidate = Candidate::new(FunctionIndividual::with_params(
                vec![*v],
                -100.0..100.0,
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

#[rstest]
#[case(SerializationMode::Text)]
#[case(SerializationMode::Binary)]
fn save_then_load_is_a_fixed_point(#[case] mode: SerializationMode) {
    let dir = tempfile::tempdir().unwrap();
    let population = scored_population(&[1.5, 2.5, 3.5, 4.5], 2);

    let config = CheckpointConfig::new(dir.path(), "parents.chk").with_mode(mode);
    let path = save_checkpoint(&population, &config, 7).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("7_"));
    assert!(name.ends_with("_parents.chk"));

    let mut restored = scored_population(&[9.0, 9.0, 9.0, 9.0], 2);
    let loaded = load_checkpoint(&path, mode, &mut restored).unwrap();
    assert_eq!(loaded, 2);

    for index in 0..2 {
        let original = population[index].score().unwrap();
        let restored_score = restored[index].score().unwrap();
        assert_eq!(original.as_ref().len(), restored_score.as_ref().len());
        for (a, b) in original.as_ref().iter().zip(restored_score.as_ref()) {
            // Bit-for-bit for binary, exact value equality either way.
            assert_eq!(a.to_bits(), b.to_bits());
        }
        assert_eq!(
            population[index].traits().is_parent(),
            restored[index].traits().is_parent()
        );
    }
}

#[test]
fn shortfall_is_appended_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let population = scored_population(&[1.0, 2.0, 3.0, 4.0], 3);

    let config = CheckpointConfig::new(dir.path(), "wide.chk");
    let path = save_checkpoint(&population, &config, 0).unwrap();

    // The target population is smaller than the parent set in the file.
    let mut restored = scored_population(&[5.0], 1);
    let loaded = load_checkpoint(&path, SerializationMode::Text, &mut restored).unwrap();

    assert_eq!(loaded, 3);
    assert_eq!(restored.len(), 3);
    assert_eq!(restored[2].individual().params(), population[2].individual().params());
}

#[test]
fn dirty_parent_at_checkpoint_time_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut population = scored_population(&[1.0, 2.0, 3.0], 2);
    population[1].adapt();

    let config = CheckpointConfig::new(dir.path(), "dirty.chk");
    assert!(save_checkpoint(&population, &config, 0).is_err());
}

#[test]
fn engine_writes_periodic_and_final_checkpoints() {
    random_provider::set_seed(71);
    let dir = tempfile::tempdir().unwrap();

    let seed = FunctionIndividual::new(2, -10.0..10.0, 1.0, BenchmarkFunction::Sphere);
    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(seed)
        .population_size(6)
        .n_parents(2)
        .max_iterations(6)
        .sorting_method(SortingMode::MuPlusLambda)
        .checkpoint(CheckpointConfig::new(dir.path(), "run.chk").with_every(2))
        .build()
        .unwrap();

    engine.optimize().unwrap();

    let files: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();

    assert!(!files.is_empty());
    assert!(files.iter().all(|name| name.ends_with("_run.chk")));
}
