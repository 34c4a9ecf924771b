use super::{cli_manager::CliManager, command::Command};
use anyhow::Result;
use log::{error, info, LevelFilter};
use std::{ffi::OsString, sync::Once, time::Instant};

static LOGGER_INIT: Once = Once::new();

/// The entry point of the app: it owns the commands and dispatches the CLI arguments to them.
pub(crate) struct AppHelper<'a> {
    cli_manager: CliManager<'a>,
}

impl<'a> AppHelper<'a> {
    pub(crate) fn new(app_name: &'a str, version: &'a str, authors: &'a str, about: &'a str) -> Self {
        AppHelper {
            cli_manager: CliManager::new(app_name, version, authors, about),
        }
    }

    pub(crate) fn add_command(&mut self, command: Box<dyn Command<'a>>) {
        self.cli_manager.add_command(command);
    }

    /// Reads the CLI arguments from the environment and executes the selected command.
    ///
    /// If the command fails, the chain of errors is logged and the process exits with status 1.
    pub(crate) fn launch_app(self) {
        if let Err(e) = self.execute_app(std::env::args_os()) {
            error!("an error occurred: {}", e);
            e.chain()
                .skip(1)
                .for_each(|cause| error!("caused by: {}", cause));
            std::process::exit(1);
        }
    }

    fn execute_app<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let start = Instant::now();
        let result = self.cli_manager.parse_cli(args);
        if result.is_ok() {
            info!("exiting successfully after {:?}", start.elapsed());
        }
        result
    }
}

/// Sets up the logger, writing colored messages with a timestamp on the standard output.
///
/// Only the first call has an effect.
pub(crate) fn init_logger(level: LevelFilter) {
    LOGGER_INIT.call_once(|| {
        let colors = fern::colors::ColoredLevelConfig::new().info(fern::colors::Color::Cyan);
        fern::Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "c [{:5}] {} {}",
                    colors.color(record.level()),
                    chrono::Local::now().format("[%Y-%m-%d %H:%M:%S%.3f]"),
                    message
                ))
            })
            .level(level)
            .chain(std::io::stdout())
            .apply()
            .unwrap_or(());
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{App, Arg, ArgMatches, SubCommand};

    struct FailingCommand;

    impl<'a> Command<'a> for FailingCommand {
        fn name(&self) -> &str {
            "fail"
        }

        fn clap_subcommand(&self) -> App<'a, 'a> {
            SubCommand::with_name("fail").arg(Arg::with_name("really").long("really"))
        }

        fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
            if arg_matches.is_present("really") {
                Err(anyhow::anyhow!("failure"))
            } else {
                Ok(())
            }
        }
    }

    fn helper() -> AppHelper<'static> {
        let mut h = AppHelper::new("app", "0.0.0", "authors", "about");
        h.add_command(Box::new(FailingCommand));
        h
    }

    #[test]
    fn test_no_args() {
        assert!(helper().execute_app(Vec::<&str>::new()).is_err());
    }

    #[test]
    fn test_no_subcommand() {
        assert!(helper().execute_app(vec!["app"]).is_err());
    }

    #[test]
    fn test_command_ok() {
        helper().execute_app(vec!["app", "fail"]).unwrap();
    }

    #[test]
    fn test_command_err() {
        assert_eq!(
            "failure",
            helper()
                .execute_app(vec!["app", "fail", "--really"])
                .unwrap_err()
                .to_string()
        );
    }
}
