use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "unaccent")]
#[command(version)]
#[command(about = "Strip diacritics and unsafe characters from file and directory names")]
#[command(long_about = "A CLI tool that recursively renames files and directories to ASCII-safe names (e.g. Vietnamese 'Báo cáo.docx' becomes 'Bao cao.docx'), with a preview mode and a JSON backup that can restore the original names.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show the renames that would be made, without changing anything")]
    Preview {
        #[arg(help = "Target directory (defaults to current directory)")]
        target: Option<PathBuf>,

        #[arg(short = 's', long, env = "UNACCENT_REPLACE_SPACES", help = "Replace spaces with underscores")]
        replace_spaces: bool,
    },

    #[command(about = "Rename files and directories, saving a backup for restore")]
    Rename {
        #[arg(help = "Target directory (defaults to current directory)")]
        target: Option<PathBuf>,

        #[arg(short = 's', long, env = "UNACCENT_REPLACE_SPACES", help = "Replace spaces with underscores")]
        replace_spaces: bool,

        #[arg(long, help = "Do not write a rename_backup_*.json file")]
        no_backup: bool,

        #[arg(short, long, help = "Rename without asking for confirmation")]
        yes: bool,
    },

    #[command(about = "Restore original names from a backup file")]
    Restore {
        #[arg(help = "Backup file written by a previous rename")]
        backup_file: PathBuf,

        #[arg(short, long, help = "Restore without asking for confirmation")]
        yes: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
