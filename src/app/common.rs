use super::{app_helper::AppHelper, AuthorsCommand, Command, ProblemsCommand, SolveCommand};
use anyhow::{anyhow, Context, Result};
use abadoor::{
    aba::{ABAFramework, PreferredListener},
    asp::{BackdoorOracle, ExactBackdoorOracle, ExternalAspBackdoorOracle},
    io::InstanceReader,
    sat::{CadicalClosureOracleFactory, ClosureOracleFactory, DefaultClosureOracleFactory},
    utils::LabelType,
};
use clap::{Arg, ArgMatches};
use log::{info, warn};
use std::{
    cell::Cell,
    fs::{self, File},
    io::{BufReader, Read},
    path::PathBuf,
    rc::Rc,
    time::Instant,
};

pub(crate) fn create_app_helper() -> AppHelper<'static> {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let authors = option_env!("CARGO_PKG_AUTHORS").unwrap_or("unknown authors");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        authors,
        "Abadoor, a backdoor-based solver for the preferred semantics of flat ABA frameworks.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(AuthorsCommand::new(app_name, app_version, authors)),
        Box::new(ProblemsCommand::new()),
        Box::new(SolveCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app
}

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_args() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(false)
        .help("the input file that contains the ABA framework")
        .required(true)
}

pub(crate) const ARG_PROBLEM: &str = "PROBLEM";

pub(crate) fn problem_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_PROBLEM)
        .short("p")
        .empty_values(false)
        .multiple(false)
        .help("the problem to solve")
        .required(true)
}

pub(crate) const ARG_READER: &str = "READER";

pub(crate) fn reader_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_READER)
        .short("r")
        .long("reader")
        .empty_values(false)
        .multiple(false)
        .possible_values(&["iccma23"])
        .default_value("iccma23")
        .help("the input file format")
        .required(false)
}

const ARG_CLOSURE_ORACLE: &str = "CLOSURE_ORACLE";

pub(crate) fn closure_oracle_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_CLOSURE_ORACLE)
        .long("closure-oracle")
        .empty_values(false)
        .multiple(false)
        .possible_values(&["embedded", "cadical"])
        .default_value("embedded")
        .help("the oracle used to compute deductive closures")
        .required(false)
}

pub(crate) fn create_closure_oracle_factory(
    arg_matches: &ArgMatches<'_>,
) -> Rc<dyn ClosureOracleFactory> {
    match arg_matches.value_of(ARG_CLOSURE_ORACLE) {
        Some("cadical") => {
            info!("using CaDiCaL for closure computations");
            Rc::new(CadicalClosureOracleFactory)
        }
        _ => {
            info!("using the embedded unit propagator for closure computations");
            Rc::new(DefaultClosureOracleFactory)
        }
    }
}

const ARG_ASP_SOLVER: &str = "ASP_SOLVER";
const ARG_ASP_SOLVER_OPTIONS: &str = "ASP_SOLVER_OPTIONS";

pub(crate) fn asp_solver_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_ASP_SOLVER)
            .long("asp-solver")
            .empty_values(false)
            .multiple(false)
            .help("a path to an external ASP solver (like clingo) used to compute backdoors")
            .required(false),
        Arg::with_name(ARG_ASP_SOLVER_OPTIONS)
            .long("asp-solver-opt")
            .requires(ARG_ASP_SOLVER)
            .empty_values(false)
            .multiple(true)
            .number_of_values(1)
            .allow_hyphen_values(true)
            .help("an option to give to the external ASP solver")
            .required(false),
    ]
}

pub(crate) fn create_backdoor_oracle(
    arg_matches: &ArgMatches<'_>,
) -> Result<Box<dyn BackdoorOracle>> {
    let options = arg_matches
        .values_of(ARG_ASP_SOLVER_OPTIONS)
        .map(|v| v.map(|o| o.to_string()).collect::<Vec<String>>())
        .unwrap_or_default();
    match arg_matches.value_of(ARG_ASP_SOLVER) {
        Some(s) => {
            let path = canonicalize_file_path(s)?;
            let program = path
                .to_str()
                .ok_or_else(|| anyhow!("the path to the ASP solver is not valid UTF-8"))?
                .to_string();
            info!("using {:?} to compute backdoors", path);
            Ok(Box::new(ExternalAspBackdoorOracle::new(program, options)))
        }
        None => {
            info!("using the embedded exact search to compute backdoors");
            Ok(Box::<ExactBackdoorOracle>::default())
        }
    }
}

pub(crate) fn read_file_path<T>(
    file_path: &str,
    reader: &mut dyn InstanceReader<T>,
) -> Result<ABAFramework<T>>
where
    T: LabelType,
{
    reader.add_warning_handler(Box::new(|line, msg| {
        warn!("at line with index {}: {}", line, msg)
    }));
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut file_reader = BufReader::new(
        File::open(&canonicalized)
            .with_context(|| format!(r#"while opening file "{}""#, file_path))?,
    );
    let framework = reader.read(&mut file_reader as &mut dyn Read)?;
    info!(
        "the ABA framework has {} atom(s), {} assumption(s) and {} rule(s)",
        framework.n_atoms(),
        framework.n_assumptions(),
        framework.n_rules(),
    );
    Ok(framework)
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

/// Logs the steps of the preferred solver, with the time elapsed since the previous one.
pub(crate) struct PreferredLogger {
    last_step: Cell<Instant>,
}

impl Default for PreferredLogger {
    fn default() -> Self {
        Self {
            last_step: Cell::new(Instant::now()),
        }
    }
}

impl PreferredLogger {
    fn step_time(&self) -> std::time::Duration {
        let now = Instant::now();
        now.duration_since(self.last_step.replace(now))
    }
}

impl PreferredListener for PreferredLogger {
    fn grounded_computed(&self, n_assumptions: usize) {
        info!(
            "grounded set of size {} computed in {:?}",
            n_assumptions,
            self.step_time()
        );
    }

    fn framework_reduced(&self, n_atoms: usize, n_assumptions: usize, n_rules: usize) {
        info!(
            "reduced framework has {} atom(s), {} assumption(s) and {} rule(s) (computed in {:?})",
            n_atoms,
            n_assumptions,
            n_rules,
            self.step_time()
        );
    }

    fn backdoor_computed(&self, backdoor: &[String]) {
        info!(
            "backdoor of size {} computed in {:?}: {:?}",
            backdoor.len(),
            self.step_time(),
            backdoor
        );
    }

    fn extensions_computed(&self, n_extensions: usize) {
        info!(
            "{} preferred extension(s) computed in {:?}",
            n_extensions,
            self.step_time()
        );
    }
}
