//! `stockroom catalog`

pub mod handler;

use clap::{Args, ValueEnum};

use crate::catalog::CatalogKind;

#[derive(Args)]
pub struct CatalogArgs {
    /// Which catalog to list
    #[arg(value_enum)]
    pub kind: CatalogArg,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogArg {
    Categories,
    Locations,
    Specs,
}

impl From<CatalogArg> for CatalogKind {
    fn from(arg: CatalogArg) -> Self {
        match arg {
            CatalogArg::Categories => CatalogKind::Categories,
            CatalogArg::Locations => CatalogKind::Locations,
            CatalogArg::Specs => CatalogKind::TechnicalSpecs,
        }
    }
}
