use super::{app_helper::init_logger, command::Command};
use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg};
use log::{info, LevelFilter};
use std::{ffi::OsString, str::FromStr};
use sysinfo::System;

const LOGGING_LEVEL_ARG: &str = "LOGGING_LEVEL";

/// The CLI argument used by all commands to set the minimal logging level.
pub(crate) fn logging_level_cli_arg<'a>() -> Arg<'a, 'a> {
    Arg::with_name(LOGGING_LEVEL_ARG)
        .long("logging-level")
        .multiple(false)
        .default_value("info")
        .possible_values(&["trace", "debug", "info", "warn", "error", "off"])
        .help("set the minimal logging level")
}

pub(crate) struct CliManager<'a> {
    app_name: &'a str,
    version: &'a str,
    authors: &'a str,
    about: &'a str,
    commands: Vec<Box<dyn Command<'a>>>,
}

impl<'a> CliManager<'a> {
    pub(crate) fn new(app_name: &'a str, version: &'a str, authors: &'a str, about: &'a str) -> Self {
        CliManager {
            app_name,
            version,
            authors,
            about,
            commands: vec![],
        }
    }

    pub(crate) fn add_command(&mut self, command: Box<dyn Command<'a>>) {
        self.commands.push(command);
    }

    fn build_app(&self) -> App<'a, 'a> {
        let app = App::new(self.app_name)
            .global_setting(AppSettings::DisableVersion)
            .global_setting(AppSettings::VersionlessSubcommands)
            .setting(AppSettings::SubcommandRequiredElseHelp)
            .version(self.version)
            .author(self.authors)
            .about(self.about);
        self.commands
            .iter()
            .fold(app, |app, c| app.subcommand(c.clap_subcommand()))
    }

    pub(crate) fn parse_cli<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match self.build_app().get_matches_from_safe(args) {
            Ok(matches) => {
                let (name, command_matches) = matches.subcommand();
                let command_matches =
                    command_matches.ok_or_else(|| anyhow!("no command was provided"))?;
                let command = self
                    .commands
                    .iter()
                    .find(|c| c.name() == name)
                    .ok_or_else(|| anyhow!(r#"unknown command "{}""#, name))?;
                let level = command_matches
                    .value_of(LOGGING_LEVEL_ARG)
                    .and_then(|l| LevelFilter::from_str(l).ok())
                    .unwrap_or(LevelFilter::Info);
                init_logger(level);
                info!("{} {}", self.app_name, self.version);
                log_system_info();
                command.execute(command_matches)
            }
            Err(clap::Error {
                kind: clap::ErrorKind::HelpDisplayed,
                message,
                ..
            }) => {
                init_logger(LevelFilter::Info);
                message.lines().for_each(|l| info!("{}", l));
                Ok(())
            }
            Err(e) => {
                init_logger(LevelFilter::Info);
                info!("{} {}", self.app_name, self.version);
                Err(anyhow!("{}", e.message))
            }
        }
    }
}

fn log_system_info() {
    info!("----------------------------------------");
    let sys = System::new_all();
    let unknown = || "[unknown]".to_string();
    info!("running on {}", System::host_name().unwrap_or_else(unknown));
    info!(
        "OS is {} {} with kernel {}",
        System::name().unwrap_or_else(unknown),
        System::os_version().unwrap_or_else(unknown),
        System::kernel_version().unwrap_or_else(unknown)
    );
    let mut cpu_brands = sys.cpus().iter().map(|c| c.brand()).collect::<Vec<&str>>();
    cpu_brands.sort_unstable();
    cpu_brands.dedup();
    info!(
        "physical core count: {} {:?}",
        sys.physical_core_count()
            .map(|n| n.to_string())
            .unwrap_or_else(unknown),
        cpu_brands
    );
    info!("total memory: {} MB", sys.total_memory() / (1 << 20));
    info!("----------------------------------------");
}
