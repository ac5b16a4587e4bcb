mod cli;
mod terminal;

use anyhow::Result;
use cli::{Cli, Commands};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use unaccent_core::{Ledger, SanitizeConfig};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    info!("Starting unaccent");

    match cli.command {
        Commands::Preview { target, replace_spaces } => {
            handle_preview_command(target, replace_spaces)?;
        }
        Commands::Rename {
            target,
            replace_spaces,
            no_backup,
            yes,
        } => {
            handle_rename_command(target, replace_spaces, !no_backup, yes)?;
        }
        Commands::Restore { backup_file, yes } => {
            handle_restore_command(backup_file, yes)?;
        }
    }

    info!("Unaccent completed successfully");
    Ok(())
}

fn handle_preview_command(target: Option<PathBuf>, replace_spaces: bool) -> Result<()> {
    let target_dir = resolve_target(target)?;
    let config = SanitizeConfig { replace_spaces };

    info!("Target directory: {:?}", target_dir);
    info!("Replace spaces: {}", replace_spaces);

    let result = unaccent_core::preview(
        &target_dir,
        config,
        &mut terminal::progress_reporter(),
        &mut terminal::print_line,
    )?;

    println!("\nPreview complete!");
    println!("  Entries visited: {}", result.visited);
    println!("  Pending renames: {}", result.changes);
    if result.failed > 0 {
        println!("  Problems: {}", result.failed);
    }

    Ok(())
}

fn handle_rename_command(
    target: Option<PathBuf>,
    replace_spaces: bool,
    backup: bool,
    yes: bool,
) -> Result<()> {
    let target_dir = resolve_target(target)?;
    let config = SanitizeConfig { replace_spaces };

    info!("Target directory: {:?}", target_dir);
    info!("Replace spaces: {}", replace_spaces);
    info!("Backup: {}", backup);

    if !backup {
        warn!("Backup disabled - these renames cannot be restored automatically");
    }

    let preview = unaccent_core::preview(
        &target_dir,
        config,
        &mut terminal::progress_reporter(),
        &mut terminal::print_line,
    )?;

    if preview.changes == 0 {
        println!("\n✨ Nothing to rename: every name is already clean.");
        return Ok(());
    }

    if !yes && !terminal::confirm_rename(&target_dir, preview.changes)? {
        println!("\n✋ Rename cancelled. Nothing was changed.");
        return Ok(());
    }

    println!("\n👉 Renaming in {}\n", target_dir.display());

    let outcome = unaccent_core::rename(
        &target_dir,
        config,
        backup,
        &mut terminal::progress_reporter(),
        &mut terminal::print_line,
    )?;

    println!("\nRename complete!");
    println!("  Entries visited: {}", outcome.walk.visited);
    println!("  Pending renames: {}", outcome.walk.changes);
    println!("  Renamed: {}", outcome.walk.renamed);
    if outcome.walk.failed > 0 {
        println!("  Failed: {}", outcome.walk.failed);
    }
    if let Some(backup_file) = &outcome.backup_file {
        println!("  💾 Backup: {}", backup_file.display());
    }
    if let Some(error) = outcome.backup_error {
        anyhow::bail!("Renames completed, but the backup could not be saved: {}", error);
    }

    Ok(())
}

fn handle_restore_command(backup_file: PathBuf, yes: bool) -> Result<()> {
    info!("Backup file: {:?}", backup_file);

    // Loading first means a malformed backup aborts before anything is touched.
    let ledger = Ledger::load(&backup_file)?;

    if ledger.is_empty() {
        println!("\n✨ The backup file records no renames.");
        return Ok(());
    }

    if !yes && !terminal::confirm_restore(&backup_file, ledger.len())? {
        println!("\n✋ Restore cancelled. Nothing was changed.");
        return Ok(());
    }

    println!("\n♻️  Restoring from {}\n", backup_file.display());

    let result = unaccent_core::restore::restore(
        &ledger,
        &mut terminal::progress_reporter(),
        &mut terminal::print_line,
    );

    println!("\nRestore complete!");
    println!("  Restored: {}", result.restored);
    println!("  Not found: {}", result.not_found);
    if result.invalid > 0 {
        println!("  Invalid records: {}", result.invalid);
    }
    if result.failed > 0 {
        println!("  Failed: {}", result.failed);
    }

    Ok(())
}

fn resolve_target(target: Option<PathBuf>) -> Result<PathBuf> {
    let target_dir = match target {
        Some(target) => std::path::absolute(target)?,
        None => std::env::current_dir()?,
    };

    if !target_dir.exists() {
        anyhow::bail!("Target directory does not exist: {:?}", target_dir);
    }

    if !target_dir.is_dir() {
        anyhow::bail!("Target must be a directory: {:?}", target_dir);
    }

    Ok(target_dir)
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact()
        )
        .with(filter)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_target_is_absolute() {
        let resolved = resolve_target(Some(PathBuf::from("."))).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.is_dir());

        assert!(resolve_target(None).unwrap().is_absolute());
    }

    #[test]
    fn test_resolve_target_rejects_missing_directory() {
        assert!(resolve_target(Some(PathBuf::from("definitely/not/here"))).is_err());
    }
}
