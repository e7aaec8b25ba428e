use starroute::optimize::{Optimizer, Route, RouteError};
use starroute::settings::OptimizerSettings;
use starroute_game::config::{HundredCoinEntry, UserConfig};
use starroute_game::{course_data, Catalog, StarIdx, ROUTE_STAR_COUNT};
use starroute_logic::analyze_dependencies;

fn set_times(config: &mut UserConfig, star_ids: &[String], time: f64) {
    for star_id in star_ids {
        config.times.insert(star_id.clone(), vec![time]);
    }
}

fn set_time(config: &mut UserConfig, star_id: &str, time: f64) {
    config.times.insert(star_id.to_string(), vec![time]);
}

fn set_hundred_coin(config: &mut UserConfig, combined_id: &str, base_id: &str, time: f64) {
    config.hundred_coin_times.insert(
        combined_id.to_string(),
        HundredCoinEntry {
            times: vec![time],
            combined_with: base_id.to_string(),
        },
    );
}

fn set_prerequisites(config: &mut UserConfig, dependant_id: &str, requirement_ids: &[&str]) {
    config.prerequisites.insert(
        dependant_id.to_string(),
        requirement_ids.iter().map(|r| r.to_string()).collect(),
    );
}

fn course_star_ids(course_id: &str) -> Vec<String> {
    course_data::course_table()
        .into_iter()
        .find(|course| course.id == course_id)
        .unwrap()
        .stars
        .into_iter()
        .map(|star| star.id)
        .collect()
}

/// Seventy star ids whose gates are all reachable while filling a route
/// bottom-up; includes the mandatory DDD1.
fn seventy_fillable_star_ids() -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for course_id in [
        "BOB", "WF", "JRB", "CCM", "HMC", "LLL", "SSL", "DDD", "SL", "WDW", "TTM",
    ] {
        ids.extend(course_star_ids(course_id));
    }
    ids.extend(["THI1", "THI2", "THI3", "THI4"].map(String::from));
    assert_eq!(ids.len(), 70);
    ids
}

fn run_optimizer(
    config: &UserConfig,
    settings: &OptimizerSettings,
) -> (Catalog, Result<Route, RouteError>) {
    let catalog = Catalog::build(
        config,
        &settings.excluded_course_ids,
        &settings.excluded_star_ids,
    )
    .unwrap();
    let dependency_data = analyze_dependencies(&catalog).unwrap();
    let result = Optimizer::new(&catalog, &dependency_data, settings).find_optimal_route();
    (catalog, result)
}

fn contains(catalog: &Catalog, route: &Route, star_id: &str) -> bool {
    let star_idx = catalog.star_isv.index_by_key[star_id];
    route.star_idxs.contains(&star_idx)
}

fn num_upper_level(catalog: &Catalog, route: &Route) -> usize {
    route
        .star_idxs
        .iter()
        .filter(|&&idx| catalog.stars[idx].location.is_upper_level())
        .count()
}

fn assert_route_invariants(catalog: &Catalog, route: &Route) {
    assert_eq!(route.star_idxs.len(), ROUTE_STAR_COUNT);

    let in_route = |idx: StarIdx| route.star_idxs.contains(&idx);
    for &star_idx in &route.star_idxs {
        // Closure: every requirement is covered by the requirement star or
        // its 100 coin alternative.
        for &req_idx in &catalog.requirements[star_idx] {
            let covered = in_route(req_idx)
                || catalog.stars[req_idx]
                    .alt_star_idx
                    .is_some_and(|alt_idx| in_route(alt_idx));
            assert!(
                covered,
                "route contains {} but not its requirement {}",
                catalog.stars[star_idx].id, catalog.stars[req_idx].id
            );
        }
        // Exclusivity: never both members of a pair.
        if let Some(alt_idx) = catalog.stars[star_idx].alt_star_idx {
            assert!(
                !in_route(alt_idx),
                "route contains both {} and {}",
                catalog.stars[star_idx].id,
                catalog.stars[alt_idx].id
            );
        }
    }

    // The mandatory star or its alternative is always present.
    let mandatory_idx = catalog.mandatory_star_idx;
    let mandatory_covered = in_route(mandatory_idx)
        || catalog.stars[mandatory_idx]
            .alt_star_idx
            .is_some_and(|alt_idx| in_route(alt_idx));
    assert!(mandatory_covered);
}

#[test]
fn test_all_zero_pool_sums_to_zero() {
    // Exactly 70 stars with zero-time records: the route takes all of
    // them for a total of zero.
    let mut config = UserConfig::default();
    let ids = seventy_fillable_star_ids();
    set_times(&mut config, &ids, 0.0);

    let settings = OptimizerSettings::default();
    let (catalog, result) = run_optimizer(&config, &settings);
    let route = result.unwrap();
    assert_route_invariants(&catalog, &route);
    assert_eq!(route.total_time, 0.0);
    for star_id in &ids {
        assert!(contains(&catalog, &route, star_id));
    }
}

#[test]
fn test_cheaper_exclusivity_member_wins() {
    // 69 zero-time stars plus a 10s/12s exclusivity pair: exactly one
    // pair member fits, and it is the cheaper one.
    let mut config = UserConfig::default();
    let mut ids = seventy_fillable_star_ids();
    ids.retain(|id| id != "THI4");
    set_times(&mut config, &ids, 0.0);
    set_time(&mut config, "TTC1", 10.0);
    set_hundred_coin(&mut config, "TTC_100", "TTC1", 12.0);

    let settings = OptimizerSettings::default();
    let (catalog, result) = run_optimizer(&config, &settings);
    let route = result.unwrap();
    assert_route_invariants(&catalog, &route);
    assert_eq!(route.total_time, 10.0);
    assert!(contains(&catalog, &route, "TTC1"));
    assert!(!contains(&catalog, &route, "TTC_100"));
}

#[test]
fn test_gated_fastest_star_is_deferred_not_dropped() {
    // BITDW (gate 8) is the only cheap star besides eight zero-time ones;
    // it must wait for the eighth pick but still make the route.
    let mut config = UserConfig::default();
    set_time(&mut config, "DDD1", 0.0);
    set_times(&mut config, &course_star_ids("BOB"), 0.0);
    set_time(&mut config, "WF1", 0.0);
    set_time(&mut config, "BITDW", 1.0);
    let mut expensive: Vec<String> = Vec::new();
    expensive.extend(["WF2", "WF3", "WF4", "WF5", "WF6"].map(String::from));
    for course_id in ["JRB", "CCM", "HMC", "LLL", "SSL"] {
        expensive.extend(course_star_ids(course_id));
    }
    expensive.extend(["DDD2", "DDD3", "DDD4", "DDD5", "DDD6"].map(String::from));
    for course_id in ["SL", "WDW", "TTM"] {
        expensive.extend(course_star_ids(course_id));
    }
    expensive.extend(["THI1", "THI2", "THI3"].map(String::from));
    assert_eq!(expensive.len(), 61);
    set_times(&mut config, &expensive, 100.0);

    let settings = OptimizerSettings::default();
    let (catalog, result) = run_optimizer(&config, &settings);
    let route = result.unwrap();
    assert_route_invariants(&catalog, &route);
    assert!(contains(&catalog, &route, "BITDW"));
    assert_eq!(route.total_time, 1.0 + 61.0 * 100.0);
}

#[test]
fn test_deferral_queue_releases_star_when_gate_met() {
    // BBH1 (gate 12) is scanned while only 7 stars are in the route; it
    // sits on the deferral queue until the count reaches 12.
    let mut config = UserConfig::default();
    set_time(&mut config, "DDD1", 0.0);
    set_times(&mut config, &course_star_ids("BOB"), 0.0);
    set_time(&mut config, "BBH1", 0.0);
    let mut expensive: Vec<String> = vec!["WF1".to_string(), "WF2".to_string(), "WF3".to_string()];
    for course_id in ["JRB", "CCM", "HMC", "LLL", "SSL"] {
        expensive.extend(course_star_ids(course_id));
    }
    expensive.extend(["DDD2", "DDD3", "DDD4", "DDD5", "DDD6"].map(String::from));
    for course_id in ["SL", "WDW", "TTM", "THI"] {
        expensive.extend(course_star_ids(course_id));
    }
    assert_eq!(expensive.len(), 62);
    set_times(&mut config, &expensive, 100.0);

    let settings = OptimizerSettings::default();
    let (catalog, result) = run_optimizer(&config, &settings);
    let route = result.unwrap();
    assert_route_invariants(&catalog, &route);
    assert!(contains(&catalog, &route, "BBH1"));
    assert_eq!(route.total_time, 62.0 * 100.0);
}

#[test]
fn test_upper_level_cap_limits_and_skips_indefinitely() {
    // Six cheap upstairs stars under a cap of 4: the four earliest take
    // the upper-level slots and the other two are dropped for good, even
    // though their gates are eventually met.
    let mut config = UserConfig::default();
    set_time(&mut config, "DDD1", 0.0);
    set_times(&mut config, &course_star_ids("SL"), 1.0);
    let non_upper: Vec<String> = course_data::course_table()
        .into_iter()
        .flat_map(|course| course.stars)
        .filter(|star| !star.location.is_upper_level() && star.id != "DDD1")
        .map(|star| star.id)
        .collect();
    assert_eq!(non_upper.len(), 66);
    set_times(&mut config, &non_upper, 10.0);

    let settings = OptimizerSettings {
        max_upper_level_stars: Some(4),
        ..Default::default()
    };
    let (catalog, result) = run_optimizer(&config, &settings);
    let route = result.unwrap();
    assert_route_invariants(&catalog, &route);
    assert_eq!(num_upper_level(&catalog, &route), 4);
    for star_id in ["SL1", "SL2", "SL3", "SL4"] {
        assert!(contains(&catalog, &route, star_id));
    }
    assert!(!contains(&catalog, &route, "SL5"));
    assert!(!contains(&catalog, &route, "SL6"));
    assert_eq!(route.total_time, 4.0 * 1.0 + 65.0 * 10.0);
}

#[test]
fn test_prerequisite_closure_forces_requirement_in() {
    // WF1 requires BOB1. The pool is tight enough that WF1 must be in the
    // route, which drags the expensive BOB1 in with it.
    let mut config = UserConfig::default();
    let mut ids = seventy_fillable_star_ids();
    ids.retain(|id| id != "BOB1" && id != "WF1");
    assert_eq!(ids.len(), 68);
    set_times(&mut config, &ids, 0.0);
    set_time(&mut config, "BOB1", 50.0);
    set_time(&mut config, "WF1", 0.0);
    set_prerequisites(&mut config, "WF1", &["BOB1"]);

    let settings = OptimizerSettings::default();
    let (catalog, result) = run_optimizer(&config, &settings);
    let route = result.unwrap();
    assert_route_invariants(&catalog, &route);
    assert!(contains(&catalog, &route, "BOB1"));
    assert!(contains(&catalog, &route, "WF1"));
    assert_eq!(route.total_time, 50.0);
}

#[test]
fn test_alternative_satisfies_requirement() {
    // BOB1 (50s) has a cheap 100 coin alternative (5s). Collecting the
    // alternative covers WF1's requirement on BOB1, so the optimal route
    // swaps the base star out.
    let mut config = UserConfig::default();
    let mut ids = seventy_fillable_star_ids();
    ids.retain(|id| id != "BOB1" && id != "WF1");
    set_times(&mut config, &ids, 0.0);
    set_time(&mut config, "BOB1", 50.0);
    set_time(&mut config, "WF1", 0.0);
    set_hundred_coin(&mut config, "BOB_100", "BOB1", 5.0);
    set_prerequisites(&mut config, "WF1", &["BOB1"]);

    let settings = OptimizerSettings::default();
    let (catalog, result) = run_optimizer(&config, &settings);
    let route = result.unwrap();
    assert_route_invariants(&catalog, &route);
    assert_eq!(route.total_time, 5.0);
    assert!(contains(&catalog, &route, "BOB_100"));
    assert!(!contains(&catalog, &route, "BOB1"));
    assert!(contains(&catalog, &route, "WF1"));
}

#[test]
fn test_prerequisite_cycle_is_fatal() {
    let mut config = UserConfig::default();
    set_time(&mut config, "DDD1", 0.0);
    set_time(&mut config, "BOB1", 1.0);
    set_time(&mut config, "WF1", 1.0);
    set_prerequisites(&mut config, "BOB1", &["WF1"]);
    set_prerequisites(&mut config, "WF1", &["BOB1"]);

    let catalog = Catalog::build(&config, &[], &[]).unwrap();
    assert!(analyze_dependencies(&catalog).is_err());
}

#[test]
fn test_excluding_requirement_course_can_break_feasibility() {
    // TTC1 requires CCM1. Excluding the CCM course removes both the
    // requirement and (by propagation) TTC1, dropping the pool below 70.
    let mut config = UserConfig::default();
    set_times(&mut config, &seventy_fillable_star_ids(), 0.0);
    set_time(&mut config, "TTC1", 10.0);
    set_prerequisites(&mut config, "TTC1", &["CCM1"]);

    let settings = OptimizerSettings {
        excluded_course_ids: vec!["CCM".to_string()],
        ..Default::default()
    };
    let (_, result) = run_optimizer(&config, &settings);
    assert!(matches!(result, Err(RouteError::Unattainable)));

    // With the course left in, the pool has one star of slack and the
    // route simply leaves the expensive TTC1 out.
    let settings = OptimizerSettings::default();
    let (catalog, result) = run_optimizer(&config, &settings);
    let route = result.unwrap();
    assert_route_invariants(&catalog, &route);
    assert_eq!(route.total_time, 0.0);
    assert!(!contains(&catalog, &route, "TTC1"));
}

#[test]
fn test_unattainable_with_small_pool() {
    let mut config = UserConfig::default();
    set_time(&mut config, "DDD1", 0.0);
    set_times(&mut config, &course_star_ids("BOB"), 1.0);
    set_times(&mut config, &course_star_ids("WF"), 1.0);

    let settings = OptimizerSettings::default();
    let (_, result) = run_optimizer(&config, &settings);
    assert!(matches!(result, Err(RouteError::Unattainable)));
}

#[test]
fn test_optimal_time_is_deterministic() {
    let mut config = UserConfig::default();
    let mut ids = seventy_fillable_star_ids();
    ids.retain(|id| id != "THI4");
    set_times(&mut config, &ids, 0.0);
    set_time(&mut config, "TTC1", 10.0);
    set_hundred_coin(&mut config, "TTC_100", "TTC1", 12.0);

    let settings = OptimizerSettings::default();
    let (_, first) = run_optimizer(&config, &settings);
    let (_, second) = run_optimizer(&config, &settings);
    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(first.total_time, second.total_time);
    assert_eq!(first.star_idxs, second.star_idxs);
}

#[test]
fn test_removing_a_star_never_improves_the_optimum() {
    let mut config = UserConfig::default();
    let mut time = 0.0;
    for course in course_data::course_table() {
        for star in &course.stars {
            if star.id == "DDD1" {
                continue;
            }
            time += 1.0;
            set_time(&mut config, &star.id, time);
        }
    }
    set_time(&mut config, "DDD1", 0.0);

    let settings = OptimizerSettings::default();
    let (_, result) = run_optimizer(&config, &settings);
    let baseline = result.unwrap();

    // Dropping the cheapest non-mandatory star forces a slower pick in.
    let mut reduced = config.clone();
    reduced.times.remove("BOB1");
    let (_, result) = run_optimizer(&reduced, &settings);
    let shrunk = result.unwrap();
    assert!(shrunk.total_time >= baseline.total_time);
}
