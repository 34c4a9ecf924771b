use super::{
    cli_manager,
    command::Command,
    common::{self, PreferredLogger, ARG_INPUT, ARG_PROBLEM},
};
use abadoor::{
    aba::{PreferredSolver, Problem},
    io::{Iccma23ABAReader, Iccma23ABAWriter, ResponseWriter},
};
use anyhow::{anyhow, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use log::info;

const CMD_NAME: &str = "solve";

pub(crate) struct SolveCommand;

impl SolveCommand {
    pub(crate) fn new() -> Self {
        SolveCommand
    }
}

impl<'a> Command<'a> for SolveCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Solves a problem on an ABA framework")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::problem_arg())
            .arg(common::reader_arg())
            .arg(common::closure_oracle_arg())
            .args(&common::asp_solver_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let problem = Problem::read_problem_string(
            arg_matches
                .value_of(ARG_PROBLEM)
                .ok_or_else(|| anyhow!("missing problem"))?,
        )?;
        let file = arg_matches
            .value_of(ARG_INPUT)
            .ok_or_else(|| anyhow!("missing input file"))?;
        let oracle_factory = common::create_closure_oracle_factory(arg_matches);
        let mut reader = Iccma23ABAReader::new_with_oracle_factory(oracle_factory);
        let mut framework = common::read_file_path(file, &mut reader)?;
        let mut solver = PreferredSolver::new(common::create_backdoor_oracle(arg_matches)?);
        solver.add_listener(Box::<PreferredLogger>::default());
        let writer = Iccma23ABAWriter;
        let mut out = std::io::stdout();
        info!("solving problem {}", problem.as_ref());
        match problem {
            Problem::EnumeratePreferred => {
                let extensions = solver.enumerate(&mut framework)?;
                writer.write_extensions(&mut out, &extensions)
            }
            Problem::SinglePreferred => {
                let extensions = solver.enumerate(&mut framework)?;
                match extensions.first() {
                    Some(e) => writer.write_single_extension(&mut out, e),
                    None => ResponseWriter::<usize>::write_no_extension(&writer, &mut out),
                }
            }
            Problem::SingleGrounded => {
                let grounded = solver.grounded(&mut framework);
                writer.write_single_extension(&mut out, &grounded)
            }
            Problem::Backdoor => {
                let backdoor = solver.reduced_framework_backdoor(&mut framework)?;
                writer.write_backdoor(&mut out, &backdoor)
            }
        }
    }
}
