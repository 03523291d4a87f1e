use crate::cli::{parse_secret_name, CliContext};
use crate::core::assembler::{self, CredentialSources};
use crate::core::export::{self, ExportFormat};
use crate::core::labels;
use crate::core::upsert;
use crate::store::file::FileStore;
use crate::store::logged::Logged;
use crate::store::Deadline;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Secret name
    #[arg(value_parser = parse_secret_name)]
    pub name: String,

    /// Basic authentication username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Basic authentication password
    #[arg(short, long)]
    pub password: Option<String>,

    /// TLS authentication cert file path
    #[arg(long, value_name = "PATH")]
    pub cert_file: Option<PathBuf>,

    /// TLS authentication key file path
    #[arg(long, value_name = "PATH")]
    pub key_file: Option<PathBuf>,

    /// TLS authentication CA file path
    #[arg(long, value_name = "PATH")]
    pub ca_file: Option<PathBuf>,

    /// Label(s) as key=value, repeatable or comma-separated
    #[arg(long, value_name = "KEY=VALUE", value_delimiter = ',')]
    pub label: Vec<String>,

    /// Print the secret document to stdout instead of storing it
    #[arg(long)]
    pub export: bool,

    /// Document format for --export (default: json, or config export_format)
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub export_format: Option<ExportFormat>,
}

/// Where an assembled record goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Export(ExportFormat),
    Apply,
}

impl OutputMode {
    fn select(export: bool, format: ExportFormat) -> Self {
        if export {
            OutputMode::Export(format)
        } else {
            OutputMode::Apply
        }
    }
}

pub fn run(ctx: &CliContext, args: CreateArgs) -> Result<()> {
    let labels = labels::parse_labels(&args.label)?;
    let sources = CredentialSources {
        username: args.username,
        password: args.password,
        cert_file: args.cert_file,
        key_file: args.key_file,
        ca_file: args.ca_file,
    };
    let record = assembler::assemble(&args.name, &ctx.namespace, labels, &sources)?;

    let format = args.export_format.unwrap_or(ctx.export_format);
    match OutputMode::select(args.export, format) {
        OutputMode::Export(format) => {
            let stdout = std::io::stdout();
            export::export(&record, format, &mut stdout.lock())?;
        }
        OutputMode::Apply => {
            let store = Logged::new(FileStore::new(ctx.paths.clone()));
            let deadline = Deadline::after(ctx.timeout);
            let outcome = upsert::upsert(&store, &record, deadline)?;
            println!(
                "secret '{}' {} in '{}' namespace",
                record.name(),
                outcome.verb(),
                record.namespace()
            );
        }
    }
    Ok(())
}
