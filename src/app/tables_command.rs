use super::{cli_manager, command::Command, common};
use anyhow::{Context, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use koala::{
    encodings::{OccurrenceTableKind, Predecessor, TableKey, CANONICAL_SLOT},
    koa::{Alphabet, Position},
};
use std::io::{self, Write};
use strum::IntoEnumIterator;

const CMD_NAME: &str = "tables";

pub(crate) struct TablesCommand;

impl TablesCommand {
    pub(crate) fn new() -> Self {
        TablesCommand
    }
}

impl<'a> Command<'a> for TablesCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Prints the occurrence tables built from the positive samples")
            .setting(AppSettings::DisableVersion)
            .arg(common::positives_arg())
            .arg(common::slots_arg())
            .arg(common::delimiter_arg())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let n_slots = common::read_n_slots(arg_matches)?;
        let samples = common::read_samples(arg_matches)?;
        let encoder = common::build_encoder(samples.alphabet, n_slots, &samples.positives)?;
        let tables = encoder.occurrence_tables();
        let mut out = io::stdout().lock();
        let context = "while writing the occurrence tables";
        for kind in OccurrenceTableKind::iter() {
            writeln!(
                out,
                "table {}: {} occurrence(s), {} distinct entry(ies)",
                kind.as_ref(),
                tables.n_occurrences(kind),
                tables.n_entries(kind)
            )
            .context(context)?;
            for (key, n) in tables.entries(kind) {
                writeln!(out, "  {}: {}", key_name(encoder.alphabet(), key), n).context(context)?;
            }
        }
        out.flush().context(context)
    }
}

fn key_name(alphabet: &Alphabet<String>, key: TableKey) -> String {
    let name = |id| alphabet.position_name(Position::Symbol(id));
    match key {
        TableKey::Symbol(a) => name(a),
        TableKey::Pair(a, b) => format!("{} {}", name(a), name(b)),
        TableKey::Triple(a, b, c) => format!("{} {} {}", name(a), name(b), name(c)),
        TableKey::PairBeforeSink(p, b) => {
            let pred = match p {
                Predecessor::Source => "src".to_string(),
                Predecessor::Canonical(a) => format!("{}_{}", name(a), CANONICAL_SLOT),
                Predecessor::AnySlot(a) => name(a),
            };
            format!("{} {}", pred, name(b))
        }
    }
}
