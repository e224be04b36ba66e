//! pathsub CLI
//!
//! Usage:
//!   pathsub sub [OPTIONS] [TEMPLATE]
//!   pathsub get [OPTIONS] <PATH>
//!   pathsub case <KIND> <TEXT>
//!
//! Data files (`-d`, repeatable) are searched in the order given.
//! Set `RUST_LOG=pathsub=debug` to see lookups as they happen.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pathsub::{case, context, resolve, substitute, DataContext, Error, MutationMode, Path};

#[derive(Parser)]
#[command(name = "pathsub")]
#[command(about = "Dotted path lookup and {path} template substitution")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Substitute {path} placeholders in a template
    Sub {
        /// Template text (reads from stdin if not provided)
        template: Option<String>,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Look up a single dotted path
    Get {
        /// Dotted path, e.g. user.address.city
        path: String,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Apply a string case helper
    Case {
        /// Helper to apply
        kind: CaseKind,

        /// Input text
        text: String,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Data file (JSON or TOML); repeat to add fallback roots
    #[arg(short, long = "data")]
    data: Vec<PathBuf>,

    /// Create missing objects along each path
    #[arg(short, long, conflicts_with = "remove")]
    create: bool,

    /// Remove each found property from its data file
    #[arg(short, long)]
    remove: bool,

    /// Write modified data files back to disk
    #[arg(short, long)]
    write: bool,
}

impl DataArgs {
    fn mode(&self) -> MutationMode {
        if self.create {
            MutationMode::Create
        } else if self.remove {
            MutationMode::DeleteOnFind
        } else {
            MutationMode::None
        }
    }

    fn load(&self) -> Result<Vec<DataContext>, Error> {
        let mut contexts = Vec::with_capacity(self.data.len());
        for path in &self.data {
            contexts.push(DataContext::from_file(path)?);
        }
        Ok(contexts)
    }

    fn save(&self, contexts: &[DataContext]) -> Result<(), Error> {
        if !self.write {
            return Ok(());
        }
        for (path, ctx) in self.data.iter().zip(contexts) {
            ctx.save(path)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CaseKind {
    Capitalize,
    Underscore,
    Camelize,
    Classize,
    NiceName,
    Escape,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pathsub=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Sub { template, data } => run_sub(template, &data),
        Command::Get { path, data } => run_get(&path, &data),
        Command::Case { kind, text } => {
            println!("{}", apply_case(kind, &text));
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_sub(template: Option<String>, args: &DataArgs) -> Result<bool, Error> {
    let template = match template {
        Some(t) => t,
        None => {
            if io::stdin().is_terminal() {
                eprintln!("Error: no template given (pass it as an argument or on stdin)");
                return Ok(false);
            }
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut contexts = args.load()?;
    let result = substitute(&template, &mut context::root_list(&mut contexts), args.mode());
    args.save(&contexts)?;

    if result.is_extracted() {
        println!("{}", serde_json::to_string_pretty(&result.into_value())?);
    } else {
        print!("{}", result.text());
    }
    Ok(true)
}

fn run_get(source: &str, args: &DataArgs) -> Result<bool, Error> {
    let path = match Path::parse(source) {
        Ok(path) => path,
        Err(e) => {
            eprint!("{}", e.format(source, "<path>"));
            return Ok(false);
        }
    };

    let mut contexts = args.load()?;
    let found = resolve(&path, &mut context::root_list(&mut contexts), args.mode());
    args.save(&contexts)?;

    match found {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(true)
        }
        None => {
            println!("undefined");
            Ok(false)
        }
    }
}

fn apply_case(kind: CaseKind, text: &str) -> String {
    match kind {
        CaseKind::Capitalize => case::capitalize(text),
        CaseKind::Underscore => case::underscore(text),
        CaseKind::Camelize => case::camelize(text),
        CaseKind::Classize => case::classize(text),
        CaseKind::NiceName => case::nice_name(text),
        CaseKind::Escape => case::escape_html(text),
    }
}
