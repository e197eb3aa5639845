#![allow(non_snake_case)]
use calculus_explorer::Utils::logger::{init_logger, save_curves_to_csv};
use calculus_explorer::Utils::plots::{RenderOptions, render_scene};
use calculus_explorer::Utils::report::{catalog_table, replay_table, solution_table, trace_table};
use calculus_explorer::Utils::scene_config::SceneConfig;
use calculus_explorer::errors::{ConfigError, CoreError};
use calculus_explorer::numerical::explorer::CalculusExplorer;
use calculus_explorer::numerical::frame_clock::{
    FrameClock, REPLAY_DELAY_MS, SolverReplay, replay_schedule,
};
use calculus_explorer::numerical::scene::Scene;
use log::{error, info};
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "usage: calculus_explorer <scene-file> | --list";

fn run(path: &Path) -> Result<(), CoreError> {
    let config = SceneConfig::load(path)?;
    init_logger(&config.loglevel, None)?;
    info!("scene file {} loaded", path.display());

    let explorer =
        CalculusExplorer::with_registry(config.registry()).with_solver_config(config.solver);
    let params = config.scene_parameters();
    let scene = Scene::build(&params, explorer.registry())?;

    println!("{}", scene.title);
    println!("{}", solution_table(&scene.solution, config.user_estimate));
    println!("{}", trace_table(&scene.solution));
    let replay = SolverReplay::new(scene.solution.trace.clone(), REPLAY_DELAY_MS);
    let schedule = replay_schedule(&replay, &mut FrameClock::default());
    println!("{}", replay_table(&scene.solution, &schedule));

    let (a, b) = (config.interval.a(), config.interval.b());
    let crossings = explorer.mean_value_points(config.function, a, b)?;
    if crossings.len() > 1 {
        println!("f(x) = mean at every x in {:?}", crossings);
    }

    render_scene(&scene, &config.output_file, &RenderOptions::default())?;

    if let Some(csv_file) = &config.csv_file {
        let curve = explorer.sample_curve(config.function, a, b, config.step)?;
        let members = if config.family_constants.is_empty() {
            Vec::new()
        } else {
            explorer.sample_family(config.function, &config.family_constants, a, b, config.step)?
        };
        let mut columns = vec![("f".to_string(), &curve)];
        columns.extend(
            members
                .iter()
                .map(|m| (format!("F + {}", m.constant), &m.curve)),
        );
        save_curves_to_csv(&columns, csv_file)
            .map_err(|e| ConfigError::Io(format!("{}: {}", csv_file.display(), e)))?;
        info!("curves written to {}", csv_file.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [flag] if flag == "--list" => {
            println!("{}", catalog_table(&CalculusExplorer::new().list_functions()));
            ExitCode::SUCCESS
        }
        [path] => match run(Path::new(path)) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{}", e);
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("{}", USAGE);
            ExitCode::FAILURE
        }
    }
}
