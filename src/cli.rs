//! Command-line surface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::color::FenceColor;
use crate::config::LaunchEffect;
use crate::constants::validation::{MAX_TINT, MIN_TINT};

#[derive(Parser)]
#[command(name = "desk-fences")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding options.json, fences.json and the event log
    /// (defaults to the executable's directory)
    #[arg(long, value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View or change the global fence options
    #[command(subcommand)]
    Options(OptionsCommand),

    /// Restyle every open fence from the saved options
    Apply,

    /// Edit a shortcut's icon or display name
    #[command(subcommand)]
    Shortcut(ShortcutCommand),
}

#[derive(Subcommand)]
pub enum OptionsCommand {
    /// Print the current options as JSON
    Show,

    /// Change options, save them and restyle open fences
    Set(OptionEdits),
}

#[derive(Args, Default)]
pub struct OptionEdits {
    /// Snap fences to screen edges and each other
    #[arg(long, value_name = "BOOL")]
    pub snap: Option<bool>,

    /// Fence opacity in percent
    #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(u8).range(MIN_TINT as i64..=MAX_TINT as i64))]
    pub tint: Option<u8>,

    /// Fence background colour (Gray, Black, White, Green, Purple, Yellow, Red, Blue)
    #[arg(long, value_name = "COLOR")]
    pub color: Option<FenceColor>,

    /// Append events to the log file
    #[arg(long, value_name = "BOOL")]
    pub log: Option<bool>,

    /// Launch shortcuts with a single click instead of a double click
    #[arg(long, value_name = "BOOL")]
    pub single_click: Option<bool>,

    /// Launch animation (Zoom, Bounce, FadeOut, SlideUp, Rotate, Agitate)
    #[arg(long, value_name = "EFFECT")]
    pub launch_effect: Option<LaunchEffect>,
}

#[derive(Subcommand)]
pub enum ShortcutCommand {
    /// Print the shortcut's icon and display name
    Show { path: PathBuf },

    /// Pick a new icon and/or display name
    Edit {
        path: PathBuf,

        /// Icon file; left unchanged if it does not exist
        #[arg(long, value_name = "FILE")]
        icon: Option<PathBuf>,

        /// Display name; blank means the file's base name
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
    },

    /// Point the icon back at the shortcut's target
    RestoreDefault { path: PathBuf },

    /// Change only the display name
    Rename { path: PathBuf, name: String },
}
