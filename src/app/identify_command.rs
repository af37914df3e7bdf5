use super::{cli_manager, command::Command, common};
use anyhow::Result;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use koala::{
    io::{ResponseWriter, TextWriter},
    solvers::{self, AutomatonIdentifier, KoaIdentificationSolver},
};
use log::{info, warn};
use std::{io, time::Instant};

const CMD_NAME: &str = "identify";

const ARG_PRINT_MODEL: &str = "PRINT_MODEL";

pub(crate) struct IdentifyCommand;

impl IdentifyCommand {
    pub(crate) fn new() -> Self {
        IdentifyCommand
    }
}

impl<'a> Command<'a> for IdentifyCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Searches for an automaton accepting the positive samples and rejecting the negative ones")
            .setting(AppSettings::DisableVersion)
            .arg(common::positives_arg())
            .arg(common::negatives_arg())
            .arg(common::slots_arg())
            .arg(common::delimiter_arg())
            .args(&common::external_sat_solver_args())
            .arg(
                Arg::with_name(ARG_PRINT_MODEL)
                    .long("print-model")
                    .takes_value(false)
                    .help("prints the value of each edge variable of the model")
                    .required(false),
            )
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let n_slots = common::read_n_slots(arg_matches)?;
        let samples = common::read_samples(arg_matches)?;
        let encoder = common::build_encoder(samples.alphabet, n_slots, &samples.positives)?;
        let mut solver =
            KoaIdentificationSolver::new_with_sat_solver_factory(common::create_sat_solver_factory(
                arg_matches,
            )?);
        let start_time = Instant::now();
        let automaton = solver.identify(&encoder, &samples.negatives)?;
        info!("identification problem solved in {:?}", start_time.elapsed());
        let writer = TextWriter;
        let mut out = io::stdout().lock();
        match automaton {
            None => ResponseWriter::<String>::write_no_automaton(&writer, &mut out),
            Some(a) => {
                info!("the automaton has {} edge(s)", a.n_edges());
                let n_misclassified =
                    solvers::check_witness(&a, &samples.positives, &samples.negatives)?;
                if n_misclassified > 0 {
                    warn!("{} sample(s) are misclassified by the automaton", n_misclassified);
                }
                writer.write_automaton(&mut out, &a)?;
                if arg_matches.is_present(ARG_PRINT_MODEL) {
                    writer.write_model(&mut out, encoder.variable_space(), &a)?;
                }
                Ok(())
            }
        }
    }
}
