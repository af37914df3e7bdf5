use super::{cli_manager, command::Command, common};
use anyhow::{Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use koala::{
    sat::{BufferedSatSolver, DimacsInstanceRead, SatSolver},
    solvers,
};
use log::{error, info};
use std::{cell::RefCell, fs, io::Read, rc::Rc, time::Instant};

const CMD_NAME: &str = "encode-to-sat";

const ARG_OUT: &str = "ARG_OUT";

pub(crate) struct EncodeToSatCommand;

impl EncodeToSatCommand {
    pub(crate) fn new() -> Self {
        EncodeToSatCommand
    }
}

impl<'a> Command<'a> for EncodeToSatCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Encodes an identification problem into a DIMACS CNF instance")
            .setting(AppSettings::DisableVersion)
            .arg(common::positives_arg())
            .arg(common::negatives_arg())
            .arg(common::slots_arg())
            .arg(common::delimiter_arg())
            .arg(
                Arg::with_name(ARG_OUT)
                    .short("o")
                    .long("output")
                    .empty_values(false)
                    .multiple(false)
                    .help("the output file for the encoding")
                    .required(false),
            )
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let n_slots = common::read_n_slots(arg_matches)?;
        let samples = common::read_samples(arg_matches)?;
        let encoder = common::build_encoder(samples.alphabet, n_slots, &samples.positives)?;
        let start_time = Instant::now();
        let formula = encoder.full_constraint(&samples.negatives)?;
        let instance = Rc::new(RefCell::new(Vec::new()));
        let mut solver = BufferedSatSolver::new(Box::new({
            let instance_cl = Rc::clone(&instance);
            move |mut r: DimacsInstanceRead| {
                if let Err(e) = r.read_to_end(&mut instance_cl.borrow_mut()) {
                    error!("while capturing the DIMACS instance: {}", e);
                }
                Box::new("s UNSATISFIABLE".as_bytes()) as Box<dyn Read>
            }
        }));
        solvers::encode(&formula, encoder.variable_space(), &mut solver);
        solver.solve();
        info!("problem encoded in {:?}", start_time.elapsed());
        let instance_content = String::from_utf8(instance.take())
            .context("while reading the generated DIMACS instance")?;
        if let Some(output_file) = arg_matches.value_of(ARG_OUT) {
            fs::write(output_file, instance_content)
                .with_context(|| format!(r#"while writing file "{}""#, output_file))?;
        } else {
            print!("{}", instance_content);
        }
        Ok(())
    }
}
