mod utilities;

#[cfg(test)]
mod sort_tests {
    use crate::utilities::population_utils::*;
    use paragen_core::*;
    use paragen_selectors::*;
    use rstest::*;

    #[rstest]
    #[case(Optimize::Minimize, vec![1.0, 4.0, 9.0, 16.0, 25.0])]
    #[case(Optimize::Maximize, vec![25.0, 16.0, 9.0, 4.0, 1.0])]
    fn mu_plus_sorts_best_first(#[case] optimize: Optimize, #[case] expected: Vec<f64>) {
        let mut population = scored_population(&[9.0, 1.0, 25.0, 4.0, 16.0], 2);
        MuPlusLambda
            .sort(&mut population, &Objective::Single(optimize), false)
            .unwrap();

        assert_eq!(primary_values(&population), expected);
    }

    #[test]
    fn mu_comma_promotes_best_children_and_discards_parents() {
        // Parents hold the two best values, but µ,λ must not keep them.
        let mut population = scored_population(&[0.5, 0.75, 9.0, 4.0, 16.0, 1.0], 2);
        MuCommaLambda
            .sort(
                &mut population,
                &Objective::Single(Optimize::Minimize),
                false,
            )
            .unwrap();

        let values = primary_values(&population);
        assert_eq!(&values[..2], &[1.0, 4.0]);
        // The discarded parents sit where the best children came from.
        assert_eq!(&values[2..4], &[0.5, 0.75]);
    }

    #[test]
    fn mu_comma_first_iteration_degrades_to_mu_plus() {
        let mut population = scored_population(&[0.5, 0.75, 9.0, 4.0, 16.0, 1.0], 2);
        MuCommaLambda
            .sort(&mut population, &Objective::Single(Optimize::Minimize), true)
            .unwrap();

        assert_eq!(&primary_values(&population)[..2], &[0.5, 0.75]);
    }

    #[test]
    fn mu_retain_keeps_best_parent_when_children_are_worse() {
        let mut population = scored_population(&[1.0, 2.0, 9.0, 4.0, 16.0, 25.0], 2);
        MuOneRetain
            .sort(
                &mut population,
                &Objective::Single(Optimize::Minimize),
                false,
            )
            .unwrap();

        let values = primary_values(&population);
        assert_eq!(values[0], 1.0);
        assert_eq!(values[1], 4.0);
    }

    #[test]
    fn mu_retain_replaces_all_parents_when_a_child_is_better() {
        let mut population = scored_population(&[2.0, 3.0, 9.0, 0.5, 16.0, 4.0], 2);
        MuOneRetain
            .sort(
                &mut population,
                &Objective::Single(Optimize::Minimize),
                false,
            )
            .unwrap();

        let values = primary_values(&population);
        assert_eq!(&values[..2], &[0.5, 4.0]);
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn mu_retain_with_single_parent_degrades_to_mu_plus(#[case] first_iteration: bool) {
        let mut population = scored_population(&[9.0, 1.0, 4.0], 1);
        MuOneRetain
            .sort(
                &mut population,
                &Objective::Single(Optimize::Minimize),
                first_iteration,
            )
            .unwrap();

        assert_eq!(primary_values(&population), vec![1.0, 4.0, 9.0]);
    }

    #[test]
    fn dirty_candidate_at_selection_is_an_error() {
        let mut population = scored_population(&[1.0, 2.0, 3.0, 4.0], 2);
        population[3].adapt();

        let result = MuPlusLambda.sort(
            &mut population,
            &Objective::Single(Optimize::Minimize),
            false,
        );
        assert!(result.is_err());
    }

    #[rstest]
    #[case(4, 12)]
    #[case(3, 9)]
    fn pareto_parents_are_mutually_non_dominated(
        #[case] n_parents: usize,
        #[case] total: usize,
    ) {
        random_provider::set_seed(31);
        let objective = Objective::Multi(vec![Optimize::Minimize, Optimize::Minimize]);

        // Points inside [0, 1] lie on the front of the parabola pair, points
        // outside are dominated.
        let xs: Vec<f64> = (0..total)
            .map(|i| -0.5 + 2.0 * (i as f64) / (total as f64 - 1.0))
            .collect();
        let mut population = parabola_population(&xs, n_parents);

        ParetoMuPlus.sort(&mut population, &objective, false).unwrap();

        for i in 0..n_parents {
            for j in 0..n_parents {
                if i == j {
                    continue;
                }
                let a = population[i].score().unwrap().clone();
                let b = population[j].score().unwrap().clone();
                let strictly_dominates = objective.dominates(&a, &b) && !objective.dominates(&b, &a);
                assert!(
                    !strictly_dominates,
                    "parent {} strictly dominates parent {}",
                    i, j
                );
            }
        }
    }

    #[test]
    fn pareto_fills_short_front_with_best_scalarized() {
        random_provider::set_seed(5);
        let objective = Objective::Multi(vec![Optimize::Minimize, Optimize::Minimize]);

        // Only x = 0.5 lies in [0, 1]; every other point is dominated by it
        // or by a closer one, so the front is smaller than µ.
        let mut population = parabola_population(&[3.0, 0.5, 2.0, 1.5, 4.0, 5.0], 3);
        ParetoMuPlus.sort(&mut population, &objective, false).unwrap();

        let front_count = population
            .iter()
            .filter(|c| c.traits().is_on_pareto_front())
            .count();
        assert!(front_count < 3);

        // The front member leads and the fill slots are the best remaining
        // candidates by scalarized fitness.
        assert_eq!(population[0].individual().params(), &[0.5]);
        assert_eq!(population[1].individual().params(), &[1.5]);
        assert_eq!(population[2].individual().params(), &[2.0]);
    }

    #[test]
    fn pareto_mu_comma_excludes_previous_parents() {
        random_provider::set_seed(17);
        let objective = Objective::Multi(vec![Optimize::Minimize, Optimize::Minimize]);

        // Parents sit at perfect front positions, but enough children are on
        // the child-front that no fill-up from the tail happens. µ,λ pareto
        // must select from the children only.
        let mut population = parabola_population(&[0.4, 0.6, 0.3, 0.7, 2.5, 4.0], 2);
        ParetoMuComma.sort(&mut population, &objective, false).unwrap();

        let parents: Vec<f64> = (0..2)
            .map(|i| population[i].individual().params()[0])
            .collect();
        assert!(!parents.contains(&0.4));
        assert!(!parents.contains(&0.6));
    }

    #[test]
    fn pareto_single_criterion_falls_back_to_single_eval() {
        let mut population = scored_population(&[9.0, 1.0, 25.0, 4.0], 2);
        ParetoMuPlus
            .sort(
                &mut population,
                &Objective::Single(Optimize::Minimize),
                false,
            )
            .unwrap();

        assert_eq!(primary_values(&population), vec![1.0, 4.0, 9.0, 25.0]);
    }
}
