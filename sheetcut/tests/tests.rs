#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use float_cmp::approx_eq;
    use itertools::Itertools;
    use test_case::test_case;

    use sheetcut::config::{Algorithm, OptimizerConfig};
    use sheetcut::entities::{MaterialKind, Order, Stock, StockStatus};
    use sheetcut::error::CuttingError;
    use sheetcut::geometry::PieceShape;
    use sheetcut::geometry::collision::bbox_within;
    use sheetcut::geometry::overlaps;
    use sheetcut::geometry::primitives::Point;
    use sheetcut::io::export::export_solution;
    use sheetcut::io::ext_repr::ExtSolution;
    use sheetcut::io::import::{import_instance, read_json_instance};
    use sheetcut::oracle::{CuttingPattern, DemandProfile, ExactSolver, Infeasible, StockCapacity};
    use sheetcut::placement::PlacerKind;
    use sheetcut::result::{CuttingResult, FulfillmentStatus, UnfulfilledReason, Validity};
    use sheetcut::search::Termination;
    use sheetcut::util::Tolerance;
    use sheetcut::{Optimizer, optimize};

    fn init_logger() {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .is_test(true)
            .try_init();
    }

    fn config(algorithm: Algorithm) -> OptimizerConfig {
        let mut config = OptimizerConfig::default().with_algorithm(algorithm);
        config.max_computation_time = 600.0;
        config
    }

    fn load(instance_path: &str) -> (Vec<Stock>, Vec<Order>) {
        let ext_instance = read_json_instance(Path::new(instance_path)).unwrap();
        import_instance(&ext_instance).unwrap()
    }

    /// Containment, no-overlap and conservation of demand units
    fn assert_invariants(stocks: &[Stock], orders: &[Order], result: &CuttingResult) {
        let tol = Tolerance(1e-3);
        for p in result.placed_shapes() {
            let stock = &stocks[p.stock_idx()];
            assert!(
                bbox_within(&p.bbox(), &stock.bounds(), tol),
                "{:?} sticks out of stock '{}'",
                p.unit(),
                stock.id
            );
            assert_eq!(stock.status, StockStatus::Available);
            assert_eq!(stock.material, orders[p.order_idx()].material);
        }
        for (a, b) in result.placed_shapes().iter().tuple_combinations() {
            assert!(!overlaps(a, b, tol), "{:?} overlaps {:?}", a.unit(), b.unit());
        }
        for (order_idx, (order, fulfillment)) in
            orders.iter().zip(result.order_fulfillment()).enumerate()
        {
            let n_unfulfilled = result
                .unfulfilled()
                .iter()
                .filter(|u| u.unit.order_idx == order_idx)
                .count();
            assert_eq!(fulfillment.placed + n_unfulfilled, order.quantity);
            assert_eq!(fulfillment.requested, order.quantity);
        }
        assert!(result.efficiency() >= 0.0 && result.efficiency() <= 1.0 + 1e-9);
        assert_eq!(result.validity(), Validity::Valid);
    }

    fn assert_monotonic(history: &[f64]) {
        assert!(!history.is_empty());
        for (prev, next) in history.iter().tuple_windows() {
            assert!(next >= prev, "best fitness decreased: {prev} -> {next}");
        }
    }

    #[test_case("../assets/glass_shop.json", Algorithm::FirstFit; "glass_shop first fit")]
    #[test_case("../assets/glass_shop.json", Algorithm::BestFit; "glass_shop best fit")]
    #[test_case("../assets/glass_shop.json", Algorithm::BottomLeft; "glass_shop bottom left")]
    #[test_case("../assets/glass_shop.json", Algorithm::Genetic; "glass_shop genetic")]
    #[test_case("../assets/glass_shop.json", Algorithm::SimulatedAnnealing; "glass_shop annealing")]
    #[test_case("../assets/small_rects.json", Algorithm::FirstFit; "small_rects first fit")]
    #[test_case("../assets/small_rects.json", Algorithm::BestFit; "small_rects best fit")]
    #[test_case("../assets/small_rects.json", Algorithm::BottomLeft; "small_rects bottom left")]
    #[test_case("../assets/small_rects.json", Algorithm::Genetic; "small_rects genetic")]
    #[test_case("../assets/small_rects.json", Algorithm::SimulatedAnnealing; "small_rects annealing")]
    fn test_instance(instance_path: &str, algorithm: Algorithm) {
        init_logger();
        let (stocks, orders) = load(instance_path);
        let result = optimize(&stocks, &orders, &config(algorithm)).unwrap();

        assert_invariants(&stocks, &orders, &result);
        assert_eq!(result.algorithm(), algorithm);
        assert!(!result.placed_shapes().is_empty());
        match algorithm {
            Algorithm::Genetic | Algorithm::SimulatedAnnealing => {
                assert!(result.termination().is_some());
                assert_monotonic(&result.stats().best_history);
                assert_eq!(
                    result.stats().best_history.len(),
                    result.stats().generations + 1
                );
            }
            _ => assert!(result.termination().is_none()),
        }
    }

    #[test]
    fn glass_shop_reports_infeasible_and_material_matches() {
        init_logger();
        let (stocks, orders) = load("../assets/glass_shop.json");
        let result = optimize(&stocks, &orders, &config(Algorithm::BottomLeft)).unwrap();

        let infeasible = result
            .unfulfilled()
            .iter()
            .filter(|u| u.reason == UnfulfilledReason::InfeasibleInput)
            .collect_vec();
        assert_eq!(infeasible.len(), 1);
        assert_eq!(infeasible[0].order_id, "oversized-panel");

        //the reserved sheet is never used
        let reserved = result
            .stock_utilization()
            .iter()
            .find(|s| s.stock_id == "float-1200x800-b")
            .unwrap();
        assert!(!reserved.used);
        assert_eq!(reserved.cost, 0.0);

        //metal plates only land on the steel sheet
        let plates = result
            .placed_shapes()
            .iter()
            .filter(|p| orders[p.order_idx()].id == "base-plate")
            .collect_vec();
        assert_eq!(plates.len(), 3);
        assert!(plates.iter().all(|p| stocks[p.stock_idx()].id == "steel-800x800"));

        let expected_cost = result
            .stock_utilization()
            .iter()
            .filter(|s| s.used)
            .map(|s| stocks[s.stock_idx].unit_cost)
            .sum::<f64>();
        assert!(approx_eq!(f64, result.total_cost(), expected_cost, epsilon = 1e-9));
    }

    #[test]
    fn four_squares_fill_a_sheet() {
        init_logger();
        let stocks = [Stock::new("sheet", 1000.0, 1000.0)];
        let orders = [Order::new("square", PieceShape::rectangle(500.0, 500.0), 4)];
        let result = optimize(&stocks, &orders, &config(Algorithm::FirstFit)).unwrap();

        assert_invariants(&stocks, &orders, &result);
        assert_eq!(result.placed_shapes().len(), 4);
        assert!(result.unfulfilled().is_empty());
        assert!(approx_eq!(f64, result.efficiency(), 1.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, result.waste_area(), 0.0, epsilon = 1e-6));
        assert_eq!(
            result.order_fulfillment()[0].status,
            FulfillmentStatus::Fulfilled
        );
        let positions = result
            .placed_shapes()
            .iter()
            .map(|p| p.position())
            .collect_vec();
        assert_eq!(
            positions,
            vec![(0.0, 0.0), (500.0, 0.0), (0.0, 500.0), (500.0, 500.0)]
        );
    }

    #[test_case(Algorithm::FirstFit; "first fit")]
    #[test_case(Algorithm::BestFit; "best fit")]
    #[test_case(Algorithm::BottomLeft; "bottom left")]
    #[test_case(Algorithm::Genetic; "genetic")]
    #[test_case(Algorithm::SimulatedAnnealing; "annealing")]
    fn oversized_piece_is_infeasible(algorithm: Algorithm) {
        init_logger();
        let stocks = [Stock::new("sheet", 300.0, 300.0)];
        let orders = [Order::new("beam", PieceShape::rectangle(310.0, 100.0), 1)];
        let result = optimize(&stocks, &orders, &config(algorithm)).unwrap();

        assert!(result.placed_shapes().is_empty());
        assert_eq!(result.unfulfilled().len(), 1);
        assert_eq!(
            result.unfulfilled()[0].reason,
            UnfulfilledReason::InfeasibleInput
        );
        assert_eq!(result.n_stocks_used(), 0);
        assert_eq!(result.efficiency(), 0.0);
        assert_eq!(result.total_cost(), 0.0);
        assert_eq!(
            result.order_fulfillment()[0].status,
            FulfillmentStatus::Unfulfilled
        );
    }

    #[test_case(Algorithm::FirstFit; "first fit")]
    #[test_case(Algorithm::BestFit; "best fit")]
    #[test_case(Algorithm::BottomLeft; "bottom left")]
    #[test_case(Algorithm::Genetic; "genetic")]
    #[test_case(Algorithm::SimulatedAnnealing; "annealing")]
    fn five_squares_on_two_narrow_sheets(algorithm: Algorithm) {
        init_logger();
        let stocks = [
            Stock::new("left", 200.0, 100.0),
            Stock::new("right", 200.0, 100.0),
        ];
        let orders = [Order::new("square", PieceShape::rectangle(90.0, 90.0), 5)];
        let result = optimize(&stocks, &orders, &config(algorithm)).unwrap();

        assert_invariants(&stocks, &orders, &result);
        assert_eq!(result.placed_shapes().len(), 4);
        assert_eq!(result.unfulfilled().len(), 1);
        assert_eq!(result.unfulfilled()[0].reason, UnfulfilledReason::NoSpace);
        assert_eq!(result.n_stocks_used(), 2);
        assert!(approx_eq!(f64, result.efficiency(), 0.81, epsilon = 1e-9));
        assert!(approx_eq!(f64, result.fulfillment_rate(), 0.8, epsilon = 1e-9));
        assert_eq!(
            result.order_fulfillment()[0].status,
            FulfillmentStatus::PartiallyFulfilled
        );
    }

    #[test_case(Algorithm::FirstFit; "first fit")]
    #[test_case(Algorithm::BottomLeft; "bottom left")]
    fn rotation_never_decreases_efficiency(algorithm: Algorithm) {
        init_logger();
        let stocks = [Stock::new("strip", 250.0, 100.0)];
        let orders = [Order::new("brick", PieceShape::rectangle(100.0, 50.0), 5)];

        let mut fixed = config(algorithm);
        fixed.allow_rotation = false;
        let fixed = optimize(&stocks, &orders, &fixed).unwrap();
        let rotating = optimize(&stocks, &orders, &config(algorithm)).unwrap();

        assert_invariants(&stocks, &orders, &fixed);
        assert_invariants(&stocks, &orders, &rotating);
        assert!(approx_eq!(f64, fixed.efficiency(), 0.8, epsilon = 1e-9));
        assert!(approx_eq!(f64, rotating.efficiency(), 1.0, epsilon = 1e-9));
        assert!(fixed.placed_shapes().iter().all(|p| p.rotation() == 0.0));
        assert!(rotating.placed_shapes().iter().any(|p| p.rotation() == 90.0));
    }

    #[test]
    fn order_rotation_policy_overrides_global() {
        init_logger();
        let stocks = [Stock::new("strip", 250.0, 100.0)];
        let orders = [Order::new("brick", PieceShape::rectangle(100.0, 50.0), 5).with_rotation(false)];
        let result = optimize(&stocks, &orders, &config(Algorithm::FirstFit)).unwrap();
        assert_eq!(result.placed_shapes().len(), 4);
    }

    #[test_case(PlacerKind::FirstFit; "first fit")]
    #[test_case(PlacerKind::BestFit; "best fit")]
    #[test_case(PlacerKind::BottomLeft; "bottom left")]
    fn greedy_placers_are_deterministic(placer: PlacerKind) {
        init_logger();
        let algorithm = match placer {
            PlacerKind::FirstFit => Algorithm::FirstFit,
            PlacerKind::BestFit => Algorithm::BestFit,
            PlacerKind::BottomLeft => Algorithm::BottomLeft,
        };
        let (stocks, orders) = load("../assets/glass_shop.json");
        let mut config = config(algorithm);
        config.prng_seed = None;
        let first = optimize(&stocks, &orders, &config).unwrap();
        let second = optimize(&stocks, &orders, &config).unwrap();
        assert_eq!(first.placed_shapes(), second.placed_shapes());
        assert_eq!(first.unfulfilled(), second.unfulfilled());
    }

    #[test_case(Algorithm::Genetic; "genetic")]
    #[test_case(Algorithm::SimulatedAnnealing; "annealing")]
    fn seeded_search_is_reproducible(algorithm: Algorithm) {
        init_logger();
        let (stocks, orders) = load("../assets/small_rects.json");
        let mut config = config(algorithm);
        config.prng_seed = Some(42);
        let first = optimize(&stocks, &orders, &config).unwrap();
        let second = optimize(&stocks, &orders, &config).unwrap();
        assert_eq!(first.placed_shapes(), second.placed_shapes());
        assert_eq!(first.stats().best_history, second.stats().best_history);
        assert_eq!(first.termination(), second.termination());
    }

    #[test]
    fn genetic_stops_at_generation_limit() {
        init_logger();
        let (stocks, orders) = load("../assets/glass_shop.json");
        let mut config = config(Algorithm::Genetic);
        config.target_efficiency = None;
        config.genetic.max_generations = Some(3);
        config.genetic.patience = 100;
        let result = optimize(&stocks, &orders, &config).unwrap();
        assert_eq!(result.termination(), Some(Termination::GenerationLimit));
        assert_eq!(result.stats().generations, 3);
        assert_eq!(result.stats().best_history.len(), 4);
    }

    #[test_case(Algorithm::Genetic; "genetic")]
    #[test_case(Algorithm::SimulatedAnnealing; "annealing")]
    fn search_without_improvement_converges(algorithm: Algorithm) {
        init_logger();
        let stocks = [Stock::new("sheet", 100.0, 100.0)];
        let orders = [Order::new("square", PieceShape::rectangle(30.0, 30.0), 1)];
        let mut config = config(algorithm);
        config.target_efficiency = None;
        config.genetic.max_generations = Some(1000);
        config.genetic.patience = 2;
        config.annealing.initial_temperature = Some(1.0);
        config.annealing.final_temperature = Some(1e-6);
        config.annealing.max_iterations = Some(10_000);
        config.annealing.iterations_per_temperature = Some(5);
        config.annealing.patience = 2;

        let result = optimize(&stocks, &orders, &config).unwrap();
        assert_eq!(result.termination(), Some(Termination::Converged));
        assert_eq!(result.stats().generations, 2);
        assert_eq!(result.stats().best_history.len(), 3);
        assert_invariants(&stocks, &orders, &result);
    }

    #[test_case(Algorithm::Genetic; "genetic")]
    #[test_case(Algorithm::SimulatedAnnealing; "annealing")]
    fn exhausted_budget_keeps_best_so_far(algorithm: Algorithm) {
        init_logger();
        let stocks = (0..3)
            .map(|i| Stock::new(format!("sheet-{i}"), 1000.0, 600.0))
            .collect_vec();
        let orders = (0..40)
            .map(|i| {
                let shape = PieceShape::rectangle(
                    40.0 + (i * 37 % 200) as f64,
                    30.0 + (i * 53 % 150) as f64,
                );
                Order::new(format!("part-{i}"), shape, 1 + i % 3)
            })
            .collect_vec();
        let mut config = config(algorithm);
        config.target_efficiency = None;
        config.max_computation_time = 1e-6;

        let result = optimize(&stocks, &orders, &config).unwrap();
        assert_eq!(result.termination(), Some(Termination::TimeExpired));
        assert!(!result.placed_shapes().is_empty());
        assert_eq!(
            result.stats().best_history.len(),
            result.stats().generations + 1
        );
        assert_invariants(&stocks, &orders, &result);
    }

    #[test_case(Algorithm::FirstFit; "first fit")]
    #[test_case(Algorithm::BestFit; "best fit")]
    #[test_case(Algorithm::BottomLeft; "bottom left")]
    fn sliver_thinner_than_tolerance_is_placed(algorithm: Algorithm) {
        init_logger();
        let stocks = [Stock::new("sheet", 100.0, 100.0)];
        let orders = [Order::new("sliver", PieceShape::rectangle(0.0008, 50.0), 1)];
        let result = optimize(&stocks, &orders, &config(algorithm)).unwrap();
        assert!(result.unfulfilled().is_empty(), "{:?}", result.unfulfilled());
        assert_eq!(result.placed_shapes().len(), 1);
        assert_invariants(&stocks, &orders, &result);
    }

    #[test]
    fn full_sheet_reaches_target() {
        init_logger();
        let stocks = [Stock::new("sheet", 1000.0, 1000.0)];
        let orders = [Order::new("square", PieceShape::rectangle(500.0, 500.0), 4)];
        let result = optimize(&stocks, &orders, &config(Algorithm::Genetic)).unwrap();
        assert_eq!(result.termination(), Some(Termination::TargetReached));
        assert_eq!(result.stats().generations, 0);
    }

    #[test]
    fn circles_and_polygons_are_placed() {
        init_logger();
        let stocks = [Stock::new("sheet", 500.0, 500.0)];
        let triangle = PieceShape::polygon(vec![
            Point(0.0, 0.0),
            Point(100.0, 0.0),
            Point(50.0, 80.0),
        ]);
        let orders = [
            Order::new("disc", PieceShape::circle(60.0), 4),
            Order::new("triangle", triangle, 6),
        ];
        let result = optimize(&stocks, &orders, &config(Algorithm::BottomLeft)).unwrap();
        assert_invariants(&stocks, &orders, &result);
        assert_eq!(result.placed_shapes().len(), 10);
    }

    #[test_case(PieceShape::rectangle(0.0, 10.0); "zero width")]
    #[test_case(PieceShape::rectangle(10.0, -5.0); "negative height")]
    #[test_case(PieceShape::circle(f64::NAN); "nan radius")]
    #[test_case(PieceShape::polygon(vec![Point(0.0, 0.0), Point(10.0, 0.0)]); "two vertices")]
    #[test_case(PieceShape::polygon(vec![Point(0.0, 0.0), Point(5.0, 0.0), Point(10.0, 0.0)]); "collinear")]
    #[test_case(PieceShape::polygon(vec![Point(0.0, 0.0), Point(10.0, 0.0), Point(10.0, 10.0), Point(5.0, 2.0), Point(0.0, 10.0)]); "concave")]
    fn degenerate_shapes_are_rejected(shape: PieceShape) {
        init_logger();
        let stocks = [Stock::new("sheet", 100.0, 100.0)];
        let orders = [
            Order::new("fine", PieceShape::rectangle(10.0, 10.0), 1),
            Order::new("broken", shape, 1),
        ];
        let err = optimize(&stocks, &orders, &config(Algorithm::BottomLeft)).unwrap_err();
        match err {
            CuttingError::DegenerateGeometry { entity, id, .. } => {
                assert_eq!(entity, "order");
                assert_eq!(id, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn degenerate_stock_is_rejected() {
        let stocks = [Stock::new("flat", 100.0, 0.0)];
        let orders = [Order::new("square", PieceShape::rectangle(10.0, 10.0), 1)];
        let err = optimize(&stocks, &orders, &config(Algorithm::FirstFit)).unwrap_err();
        assert!(matches!(err, CuttingError::DegenerateGeometry { entity: "stock", .. }));
    }

    #[test]
    fn malformed_input_is_rejected() {
        let square = || Order::new("square", PieceShape::rectangle(10.0, 10.0), 1);
        let config = config(Algorithm::FirstFit);

        let no_stock = optimize(&[], &[square()], &config);
        assert!(matches!(no_stock, Err(CuttingError::InvalidInput(_))));

        let stocks = [Stock::new("sheet", 100.0, 100.0)];
        let no_orders = optimize(&stocks, &[], &config);
        assert!(matches!(no_orders, Err(CuttingError::InvalidInput(_))));

        let zero = [Order::new("none", PieceShape::rectangle(10.0, 10.0), 0)];
        let zero_quantity = optimize(&stocks, &zero, &config);
        assert!(matches!(zero_quantity, Err(CuttingError::InvalidInput(_))));

        let duplicate = optimize(&stocks, &[square(), square()], &config);
        assert!(matches!(duplicate, Err(CuttingError::InvalidInput(_))));
    }

    #[test]
    fn invalid_config_is_rejected_before_search() {
        let stocks = [Stock::new("sheet", 100.0, 100.0)];
        let orders = [Order::new("square", PieceShape::rectangle(10.0, 10.0), 1)];

        let mut no_time = config(Algorithm::Genetic);
        no_time.max_computation_time = 0.0;
        let mut no_tolerance = config(Algorithm::Genetic);
        no_tolerance.precision_tolerance = -1.0;
        let mut bad_target = config(Algorithm::Genetic);
        bad_target.target_efficiency = Some(1.5);
        let mut endless = config(Algorithm::Genetic);
        endless.max_computation_time = 1e20;

        for config in [no_time, no_tolerance, bad_target, endless] {
            let err = optimize(&stocks, &orders, &config).unwrap_err();
            assert!(matches!(err, CuttingError::InvalidConfig(_)), "{err}");
        }
    }

    #[test]
    fn unavailable_and_foreign_stock_is_skipped() {
        init_logger();
        let stocks = [
            Stock::new("reserved", 500.0, 500.0).with_status(StockStatus::Reserved),
            Stock::new("depleted", 500.0, 500.0).with_status(StockStatus::Depleted),
            Stock::new("wood", 500.0, 500.0).with_material(MaterialKind::Wood),
            Stock::new("glass", 500.0, 500.0).with_unit_cost(12.5),
        ];
        let orders = [
            Order::new("pane", PieceShape::rectangle(100.0, 100.0), 3),
            Order::new("board", PieceShape::rectangle(100.0, 100.0), 2)
                .with_material(MaterialKind::Wood),
            Order::new("plate", PieceShape::rectangle(100.0, 100.0), 1)
                .with_material(MaterialKind::Metal),
        ];
        let result = optimize(&stocks, &orders, &config(Algorithm::Genetic)).unwrap();

        assert_invariants(&stocks, &orders, &result);
        assert_eq!(result.placed_shapes().len(), 5);
        assert!(
            result
                .placed_shapes()
                .iter()
                .all(|p| stocks[p.stock_idx()].is_available())
        );
        assert_eq!(result.unfulfilled().len(), 1);
        assert_eq!(
            result.unfulfilled()[0].reason,
            UnfulfilledReason::InfeasibleInput
        );
        assert_eq!(result.n_stocks_used(), 2);
        assert!(approx_eq!(f64, result.total_cost(), 12.5, epsilon = 1e-9));
    }

    /// Puts every order on the first stock sheet that can hold it, counting its calls
    struct NaiveSolver {
        calls: Arc<AtomicUsize>,
    }

    impl ExactSolver for NaiveSolver {
        fn solve(
            &self,
            capacity: &[StockCapacity],
            demand: &[DemandProfile],
        ) -> Result<Vec<CuttingPattern>, Infeasible> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let stock = capacity.first().ok_or_else(|| Infeasible {
                reason: "no capacity".into(),
            })?;
            Ok(vec![CuttingPattern {
                stock_idx: stock.stock_idx,
                counts: demand.iter().map(|d| (d.order_idx, d.quantity)).collect(),
            }])
        }
    }

    struct RefusingSolver;

    impl ExactSolver for RefusingSolver {
        fn solve(
            &self,
            _capacity: &[StockCapacity],
            _demand: &[DemandProfile],
        ) -> Result<Vec<CuttingPattern>, Infeasible> {
            Err(Infeasible {
                reason: "refused".into(),
            })
        }
    }

    #[test]
    fn exact_solver_patterns_are_realized() {
        init_logger();
        let calls = Arc::new(AtomicUsize::new(0));
        let stocks = [
            Stock::new("first", 200.0, 100.0),
            Stock::new("second", 200.0, 100.0),
        ];
        let orders = [Order::new("square", PieceShape::rectangle(90.0, 90.0), 3)];
        let optimizer = Optimizer::new(config(Algorithm::Exact)).with_exact_solver(NaiveSolver {
            calls: calls.clone(),
        });
        let result = optimizer.optimize(&stocks, &orders).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.algorithm(), Algorithm::Exact);
        assert!(result.termination().is_none());
        assert_invariants(&stocks, &orders, &result);
        //the pattern asks for 3 squares on the first sheet, only 2 fit
        assert_eq!(result.placed_shapes().len(), 3);
        let per_stock = result
            .stock_utilization()
            .iter()
            .map(|s| s.n_placed)
            .collect_vec();
        assert_eq!(per_stock, vec![2, 1]);
    }

    #[test]
    fn exact_falls_back_to_genetic() {
        init_logger();
        let stocks = [Stock::new("sheet", 200.0, 100.0)];
        let orders = [Order::new("square", PieceShape::rectangle(90.0, 90.0), 2)];

        let without_solver = Optimizer::new(config(Algorithm::Exact))
            .optimize(&stocks, &orders)
            .unwrap();
        assert_eq!(without_solver.algorithm(), Algorithm::Genetic);
        assert!(without_solver.termination().is_some());

        let refused = Optimizer::new(config(Algorithm::Exact))
            .with_exact_solver(RefusingSolver)
            .optimize(&stocks, &orders)
            .unwrap();
        assert_eq!(refused.algorithm(), Algorithm::Genetic);
        assert_invariants(&stocks, &orders, &refused);
    }

    #[test]
    fn exact_is_skipped_for_large_problems() {
        init_logger();
        let calls = Arc::new(AtomicUsize::new(0));
        //3 units on 70 sheets exceed the complexity limit
        let stocks = (0..70)
            .map(|i| Stock::new(format!("sheet-{i}"), 100.0, 100.0))
            .collect_vec();
        let orders = [Order::new("square", PieceShape::rectangle(50.0, 50.0), 3)];
        let mut config = config(Algorithm::Exact);
        config.genetic.max_generations = Some(5);
        let result = Optimizer::new(config)
            .with_exact_solver(NaiveSolver {
                calls: calls.clone(),
            })
            .optimize(&stocks, &orders)
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.algorithm(), Algorithm::Genetic);
        assert_invariants(&stocks, &orders, &result);
        assert_eq!(result.n_stocks_used(), 1);
    }

    #[test]
    fn solution_survives_json() {
        init_logger();
        let (stocks, orders) = load("../assets/small_rects.json");
        let result = optimize(&stocks, &orders, &config(Algorithm::BottomLeft)).unwrap();

        let solution = export_solution(&result);
        assert_eq!(solution.layouts.len(), result.n_stocks_used());
        assert_eq!(
            solution
                .layouts
                .iter()
                .map(|l| l.placements.len())
                .sum::<usize>(),
            result.placed_shapes().len()
        );
        let json = serde_json::to_string(&solution).unwrap();
        let parsed: ExtSolution = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.algorithm, Algorithm::BottomLeft);
        for (parsed, exported) in parsed.layouts.iter().zip(solution.layouts.iter()) {
            assert_eq!(parsed.stock_id, exported.stock_id);
            assert_eq!(parsed.placements, exported.placements);
        }

        let json = serde_json::to_string(&result).unwrap();
        let parsed: CuttingResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.placed_shapes(), result.placed_shapes());
    }

    #[test]
    fn missing_instance_file_has_context() {
        let err = read_json_instance(Path::new("../assets/does_not_exist.json")).unwrap_err();
        assert!(format!("{err}").contains("does_not_exist.json"));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: OptimizerConfig = serde_json::from_str(
            r#"{ "algorithm": "simulated_annealing", "genetic": { "patience": 5 } }"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, Algorithm::SimulatedAnnealing);
        assert_eq!(config.genetic.patience, 5);
        assert_eq!(config.placer, PlacerKind::BottomLeft);
        assert!(config.validate().is_ok());
    }
}
