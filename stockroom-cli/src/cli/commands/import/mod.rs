//! `stockroom import`

pub mod editor;
pub mod handler;

use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ImportArgs {
    /// Spreadsheet (.xlsx) with one item per row
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Parse the spreadsheet locally instead of uploading it for preview
    #[arg(long)]
    pub local: bool,

    /// Sheet to read with --local (default: the first sheet)
    #[arg(long, requires = "local")]
    pub sheet: Option<String>,

    /// Category (id or name) for rows that have none
    #[arg(long)]
    pub category: Option<String>,

    /// Location (id or name) for rows that have none
    #[arg(long)]
    pub location: Option<String>,

    /// Submit without the interactive editor
    #[arg(short, long)]
    pub yes: bool,

    /// Write an Excel report of the outcome to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}
