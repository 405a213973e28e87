mod connection;
mod show;
mod sync;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::{
    cli::{show::ShowArgs, sync::SyncArgs},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the hourly readings for a date range.
    #[clap(name = "show")]
    Show(Box<ShowArgs>),

    /// Download the missing days into the per-day CSV archive.
    #[clap(name = "sync")]
    Sync(Box<SyncArgs>),
}

impl Command {
    pub fn run(self) -> Result {
        match self {
            Self::Show(args) => args.run(),
            Self::Sync(args) => args.run(),
        }
    }
}

fn yesterday() -> Result<NaiveDate> {
    Local::now().date_naive().pred_opt().context("there is no yesterday")
}
