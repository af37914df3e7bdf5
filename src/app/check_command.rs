use super::{cli_manager, command::Command, common};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use log::info;

const CMD_NAME: &str = "check";

pub(crate) struct CheckCommand;

impl CheckCommand {
    pub(crate) fn new() -> Self {
        CheckCommand
    }
}

impl<'a> Command<'a> for CheckCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks sample files for errors")
            .setting(AppSettings::DisableVersion)
            .arg(common::positives_arg())
            .arg(common::negatives_arg())
            .arg(common::delimiter_arg())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let samples = common::read_samples(arg_matches)?;
        for (kind, set) in [
            ("positive", &samples.positives),
            ("negative", &samples.negatives),
        ] {
            info!(
                "{} samples: {} sample(s), longest one has {} symbol(s)",
                kind,
                set.len(),
                set.max_length()
            );
        }
        println!(
            "{} positive sample(s), {} negative sample(s), {} symbol(s)",
            samples.positives.len(),
            samples.negatives.len(),
            samples.alphabet.len()
        );
        Ok(())
    }
}
