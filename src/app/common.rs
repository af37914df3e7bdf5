use super::{
    app_helper::AppHelper, command::Command, AuthorsCommand, CheckCommand, EncodeToSatCommand,
    IdentifyCommand, TablesCommand,
};
use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches};
use koala::{
    encodings::KoaEncoder,
    io::{DelimitedSamplesReader, SamplesReader, DEFAULT_DELIMITER},
    koa::{Alphabet, SampleSet},
    sat::{
        DefaultSatSolverFactory, ExternalSatSolverFactory, SatSolverFactory, SolvingListener,
        SolvingResult,
    },
};
use log::{info, warn};
use std::{
    fs::{self, File},
    io::{BufReader, Read},
    path::PathBuf,
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
        "Koala, a SAT-based learner of k-occurrence automata.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(AuthorsCommand::new(app_name, app_version, authors)),
        Box::new(CheckCommand::new()),
        Box::new(EncodeToSatCommand::new()),
        Box::new(IdentifyCommand::new()),
        Box::new(TablesCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app
}

pub(crate) const ARG_POSITIVES: &str = "POSITIVES";
pub(crate) const ARG_NEGATIVES: &str = "NEGATIVES";

pub(crate) fn positives_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_POSITIVES)
        .short("p")
        .long("positives")
        .empty_values(false)
        .multiple(false)
        .help("the file containing the positive samples")
        .required(true)
}

pub(crate) fn negatives_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_NEGATIVES)
        .short("n")
        .long("negatives")
        .empty_values(false)
        .multiple(false)
        .help("the file containing the negative samples")
        .required(false)
}

pub(crate) const ARG_SLOTS: &str = "SLOTS";

pub(crate) fn slots_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_SLOTS)
        .short("k")
        .empty_values(false)
        .multiple(false)
        .help("the maximal number of slots per symbol")
        .required(true)
}

pub(crate) fn read_n_slots(arg_matches: &ArgMatches<'_>) -> Result<usize> {
    let str_k = arg_matches
        .value_of(ARG_SLOTS)
        .ok_or_else(|| anyhow!("missing number of slots"))?;
    let k = str_k
        .parse::<usize>()
        .with_context(|| format!(r#"invalid number of slots "{}""#, str_k))?;
    if k == 0 {
        return Err(anyhow!("configuration error: the number of slots must be positive"));
    }
    Ok(k)
}

const ARG_DELIMITER: &str = "DELIMITER";

pub(crate) fn delimiter_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_DELIMITER)
        .long("delimiter")
        .empty_values(false)
        .multiple(false)
        .default_value(DEFAULT_DELIMITER)
        .help("the symbol delimiter used in sample files")
        .required(false)
}

/// The positive and negative samples given by the user, with the alphabet they are built on.
pub(crate) struct Samples {
    pub(crate) alphabet: Alphabet<String>,
    pub(crate) positives: SampleSet<String>,
    pub(crate) negatives: SampleSet<String>,
}

pub(crate) fn read_samples(arg_matches: &ArgMatches<'_>) -> Result<Samples> {
    let start_time = Instant::now();
    let delimiter = arg_matches.value_of(ARG_DELIMITER).unwrap_or(DEFAULT_DELIMITER);
    let mut reader = DelimitedSamplesReader::new(delimiter);
    reader.add_warning_handler(Box::new(|line, msg| warn!("at line {}: {}", line, msg)));
    let read = |arg| -> Result<SampleSet<String>> {
        match arg_matches.value_of(arg) {
            Some(file_path) => read_file_path_with(file_path, &|r| reader.read(r)),
            None => Ok(SampleSet::default()),
        }
    };
    let positives = read(ARG_POSITIVES)?;
    let negatives = read(ARG_NEGATIVES)?;
    let mut labels = positives.symbols();
    labels.append(&mut negatives.symbols());
    labels.sort_unstable();
    labels.dedup();
    let alphabet = Alphabet::new_with_labels(&labels);
    info!(
        "read {} positive and {} negative sample(s) over {} symbol(s) in {:?}",
        positives.len(),
        negatives.len(),
        alphabet.len(),
        start_time.elapsed()
    );
    Ok(Samples {
        alphabet,
        positives,
        negatives,
    })
}

pub(crate) fn build_encoder(
    alphabet: Alphabet<String>,
    n_slots: usize,
    positives: &SampleSet<String>,
) -> Result<KoaEncoder<String>> {
    let start_time = Instant::now();
    let mut encoder = KoaEncoder::new(alphabet, n_slots)?;
    encoder.add_positive_samples(positives)?;
    info!(
        "aggregated {} positive sample(s) into the occurrence tables in {:?}",
        encoder.occurrence_tables().n_sentences(),
        start_time.elapsed()
    );
    Ok(encoder)
}

pub(crate) fn read_file_path_with<F, R>(file_path: &str, reader: &F) -> Result<R>
where
    F: Fn(&mut dyn Read) -> Result<R>,
{
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut file_reader = BufReader::new(
        File::open(&canonicalized)
            .with_context(|| format!(r#"while opening file "{}""#, file_path))?,
    );
    (reader)(&mut file_reader).with_context(|| format!(r#"while reading file "{}""#, file_path))
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

const ARG_EXTERNAL_SAT_SOLVER: &str = "EXTERNAL_SAT_SOLVER";
const ARG_EXTERNAL_SAT_SOLVER_OPTIONS: &str = "EXTERNAL_SAT_SOLVER_OPTIONS";

pub(crate) fn external_sat_solver_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER)
            .long("external-sat-solver")
            .empty_values(false)
            .multiple(false)
            .help("a path to an external SAT solver to replace the embedded one")
            .required(false),
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
            .long("external-sat-solver-opt")
            .requires(ARG_EXTERNAL_SAT_SOLVER)
            .empty_values(false)
            .multiple(true)
            .number_of_values(1)
            .allow_hyphen_values(true)
            .help("a option to give to the external SAT solver")
            .required(false),
    ]
}

pub(crate) fn create_sat_solver_factory(
    arg_matches: &ArgMatches<'_>,
) -> Result<Box<dyn SatSolverFactory>> {
    let external_solver_options = arg_matches
        .values_of(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
        .map(|v| v.map(|o| o.to_string()).collect::<Vec<String>>())
        .unwrap_or_default();
    if let Some(s) = arg_matches.value_of(ARG_EXTERNAL_SAT_SOLVER) {
        let path = canonicalize_file_path(s)?;
        info!("using {:?} as SAT solver", path);
        let str_path = path
            .to_str()
            .ok_or_else(|| anyhow!("the path {:?} is not valid UTF-8", path))?;
        let mut factory = ExternalSatSolverFactory::new(str_path.to_string(), external_solver_options);
        factory.add_solver_listener(Box::new(|| {
            Box::<SatSolvingLogger>::default() as Box<dyn SolvingListener>
        }));
        Ok(Box::new(factory))
    } else {
        info!("using the default SAT solver");
        Ok(Box::new(DefaultSatSolverFactory))
    }
}

#[derive(Default)]
struct SatSolvingLogger;

impl SolvingListener for SatSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_clauses: usize) {
        info!(
            "launching SAT solver on an instance with {} variables and {} clauses",
            n_vars, n_clauses
        );
    }

    fn solving_end(&self, result: &SolvingResult) {
        let r = match result {
            SolvingResult::Satisfiable(_) => "SAT",
            SolvingResult::Unsatisfiable => "UNSAT",
            SolvingResult::Unknown => "UNKNOWN",
        };
        info!("SAT solver ended with result {}", r);
    }
}
