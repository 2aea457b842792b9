use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "formgate",
    version,
    about = "Contact form gate: schema validation, honeypot filtering, and the site build around it"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the contact page over HTTP
    Serve(ServeArgs),
    /// Judge one submission given as FIELD=VALUE pairs
    Check(CheckArgs),
    /// Render a directory of markdown pages to HTML
    Build(BuildArgs),
    Version,
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Server config (YAML). FORMGATE_* variables override it.
    #[arg(long, env = "FORMGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address, overrides config and environment
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Contact schema (YAML or JSON); the embedded schema when omitted
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Skip the honeypot check
    #[arg(long)]
    pub no_honeypot: bool,

    /// Name of the honeypot field
    #[arg(long, default_value = "password")]
    pub honeypot_field: String,

    /// Submitted fields, e.g. message=hello password=
    #[arg(value_name = "FIELD=VALUE")]
    pub fields: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Site config (YAML); defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Source directory holding pages and assets
    pub src: PathBuf,

    /// Output directory
    pub out: PathBuf,
}
