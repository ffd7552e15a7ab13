//! `stockroom auth`

pub mod handler;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in and store the session token
    Login {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Status,
}
