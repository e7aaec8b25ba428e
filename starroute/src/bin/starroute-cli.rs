use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use starroute::optimize::{Optimizer, Route};
use starroute::report::{format_route_time, summarize_route};
use starroute::settings::OptimizerSettings;
use starroute_game::config::UserConfig;
use starroute_game::{course_data, Catalog, StarCount, StarIdx, ROUTE_STAR_COUNT};
use starroute_logic::analyze_dependencies;
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    /// Config JSON file with star times and prerequisite declarations.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Course ids to keep out of the route.
    #[arg(long, value_name = "COURSE_ID", num_args = 0..)]
    exclude_course_ids: Vec<String>,

    /// Star ids to keep out of the route.
    #[arg(long, value_name = "STAR_ID", num_args = 0..)]
    exclude_star_ids: Vec<String>,

    /// Maximum number of stars from upstairs and tippy in the route.
    #[arg(long)]
    max_upper_level_stars: Option<StarCount>,

    /// Where to write the route summary JSON.
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long)]
    random_seed: Option<u64>,

    /// Generate times for every star instead of using recorded ones
    /// (development aid).
    #[arg(long)]
    fake_times: bool,

    /// Sample a random route with no optimization (development aid).
    #[arg(long)]
    fake_route: bool,
}

fn assign_fake_times(config: &mut UserConfig, rng: &mut StdRng) {
    for course in course_data::course_table() {
        for star in &course.stars {
            config
                .times
                .insert(star.id.clone(), vec![rng.gen_range(10.0..180.0)]);
        }
    }
    for entry in config.hundred_coin_times.values_mut() {
        entry.times = vec![rng.gen_range(60.0..300.0)];
    }
}

fn get_fake_route(catalog: &Catalog, rng: &mut StdRng) -> Result<Route> {
    let candidates: Vec<StarIdx> = (0..catalog.stars.len())
        .filter(|&idx| catalog.stars[idx].is_candidate())
        .collect();
    if candidates.len() < ROUTE_STAR_COUNT {
        bail!(
            "only {} stars have times; cannot sample a {}-star route",
            candidates.len(),
            ROUTE_STAR_COUNT
        );
    }
    let mut star_idxs: Vec<StarIdx> = candidates
        .choose_multiple(rng, ROUTE_STAR_COUNT)
        .copied()
        .collect();
    star_idxs.sort_unstable();
    let total_time = star_idxs
        .iter()
        .filter_map(|&idx| catalog.stars[idx].average_time)
        .sum();
    Ok(Route {
        star_idxs,
        total_time,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let root_seed = match args.random_seed {
        Some(seed) => seed,
        None => StdRng::from_entropy().next_u64(),
    };
    let mut rng = StdRng::seed_from_u64(root_seed);

    let mut config = UserConfig::load(&args.config)?;
    if args.fake_times {
        info!("Generating fake star times (seed {root_seed})");
        assign_fake_times(&mut config, &mut rng);
    }

    let settings = OptimizerSettings {
        excluded_course_ids: args.exclude_course_ids,
        excluded_star_ids: args.exclude_star_ids,
        max_upper_level_stars: args.max_upper_level_stars,
    };
    let catalog = Catalog::build(
        &config,
        &settings.excluded_course_ids,
        &settings.excluded_star_ids,
    )?;

    let route = if args.fake_route {
        info!("Sampling a random route (seed {root_seed}); no optimization");
        get_fake_route(&catalog, &mut rng)?
    } else {
        let dependency_data = analyze_dependencies(&catalog)?;
        let optimizer = Optimizer::new(&catalog, &dependency_data, &settings);
        info!("Finding optimal route; this usually takes a few seconds");
        optimizer.find_optimal_route()?
    };

    info!(
        "Route found: sum of star times = {}",
        format_route_time(route.total_time)
    );

    if let Some(output_path) = &args.output {
        let summary = summarize_route(&catalog, &route);
        let summary_str = serde_json::to_string_pretty(&summary)?;
        std::fs::write(output_path, summary_str)
            .with_context(|| format!("unable to write route summary to {}", output_path.display()))?;
        info!("Wrote route summary to {}", output_path.display());
    }

    Ok(())
}
