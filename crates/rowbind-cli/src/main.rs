mod statement;

use clap::{Parser, Subcommand, ValueEnum};
use rowbind_core::sql::StatementKind;
use statement::{Overrides, StatementError, StatementFile};
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rowbind",
    version,
    about = "Preview the SQL rowbind synthesizes for a record schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print synthesized statement text.
    Sql {
        #[arg(help = "JSON statement file (table, wrapper, filter, tag, excluded, record)")]
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = KindArg::All)]
        kind: KindArg,

        #[arg(long, help = "Override the table name")]
        table: Option<String>,

        #[arg(long, help = "Override the identifier wrapper (\"\" disables wrapping)")]
        wrapper: Option<String>,

        #[arg(long, help = "Override the filter column")]
        filter: Option<String>,

        #[arg(long, help = "Override the tag name")]
        tag: Option<String>,

        #[arg(long, help = "Excluded column; repeatable, replaces the file's list")]
        exclude: Vec<String>,
    },

    /// Print the type descriptor as JSON.
    Describe {
        #[arg(help = "JSON statement file")]
        file: PathBuf,

        #[arg(long, help = "Override the tag name")]
        tag: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Insert,
    Update,
    Select,
    Delete,
    All,
}

impl KindArg {
    fn kinds(self) -> Vec<StatementKind> {
        match self {
            Self::Insert => vec![StatementKind::Insert],
            Self::Update => vec![StatementKind::Update],
            Self::Select => vec![StatementKind::Select],
            Self::Delete => vec![StatementKind::Delete],
            Self::All => StatementKind::ALL.to_vec(),
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), StatementError> {
    match cli.command {
        Command::Sql {
            file,
            kind,
            table,
            wrapper,
            filter,
            tag,
            exclude,
        } => {
            let overrides = Overrides {
                table,
                wrapper,
                filter,
                tag,
                excluded: exclude,
            };
            let statements = StatementFile::load(&file)?.apply(overrides);
            let kinds = kind.kinds();
            let rendered = statements.render(&kinds)?;

            if let [(_, sql)] = rendered.as_slice() {
                println!("{sql}");
            } else {
                for (kind, sql) in rendered {
                    println!("-- {kind}");
                    println!("{sql}");
                }
            }
        }
        Command::Describe { file, tag } => {
            let statements = StatementFile::load(&file)?.apply(Overrides {
                tag,
                ..Overrides::default()
            });

            println!("{}", statements.describe()?);
        }
    }

    Ok(())
}

// Logs go to stderr so statement text on stdout stays pipeable.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
