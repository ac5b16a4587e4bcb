use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

const BIN: &str = "unaccent";

fn main() -> Result<()> {
    let args = clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about("Install unaccent binary locally"))
        .subcommand(
            Command::new("run")
                .about("Build and run unaccent with arguments")
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(clap::Arg::new("args")
                    .help("Arguments to pass to unaccent")
                    .action(clap::ArgAction::Append)
                    .num_args(0..))
        )
        .subcommand(
            Command::new("test")
                .about("Test Operations")
                .subcommand(Command::new("all").about("Run all tests for the entire project"))
                .subcommand(Command::new("core").about("Run tests for unaccent-core"))
                .subcommand(Command::new("bin").about("Run tests for unaccent-bin"))
                .subcommand(Command::new("integration").about("Run rename/restore integration tests and CLI smoke checks"))
        )
        .get_matches();

    match args.subcommand() {
        Some(("install", _args)) => cargo(&["install", "--path", "crates/unaccent-bin"], "install unaccent"),
        Some(("run", args)) => handle_run_command(args),
        Some(("test", args)) => handle_test_commands(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn handle_run_command(args: &ArgMatches) -> Result<()> {
    let run_args: Vec<&str> = args
        .get_many::<String>("args")
        .map_or(Vec::new(), |vals| vals.map(String::as_str).collect());

    let mut command = vec!["run", "--bin", BIN, "--"];
    command.extend(run_args);
    cargo(&command, "run unaccent")
}

fn handle_test_commands(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("all", _args)) => test_all(),
        Some(("core", _args)) => test_core(),
        Some(("bin", _args)) => test_bin(),
        Some(("integration", _args)) => test_integration(),
        _ => {
            println!("Available test commands:");
            println!("  all          - Run all tests for the entire project");
            println!("  core         - Run tests for unaccent-core");
            println!("  bin          - Run tests for unaccent-bin");
            println!("  integration  - Run integration tests");
            Ok(())
        }
    }
}

fn test_all() -> Result<()> {
    let suites: [(&str, fn() -> Result<()>); 5] = [
        ("unaccent-core", test_core),
        ("unaccent-bin", test_bin),
        ("workspace", test_workspace),
        ("documentation", test_docs),
        ("integration", test_integration),
    ];

    let mut failed = Vec::new();
    for (name, suite) in suites {
        println!("🧪 Running {name} tests...");
        match suite() {
            Ok(()) => println!("✅ {name} tests passed\n"),
            Err(e) => {
                println!("❌ {name} tests failed: {e:?}\n");
                failed.push(name);
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("Test suite failed: {}", failed.join(", "));
    }
    println!("🎉 All tests passed successfully!");
    Ok(())
}

fn test_core() -> Result<()> {
    cargo(&["test", "--package", "unaccent-core"], "core tests")
}

fn test_bin() -> Result<()> {
    cargo(&["test", "--package", "unaccent-bin"], "binary tests")
}

fn test_workspace() -> Result<()> {
    cargo(&["test", "--workspace"], "workspace tests")
}

fn test_docs() -> Result<()> {
    // Only the core crate has a library target
    cargo(&["test", "--doc", "--package", "unaccent-core"], "documentation tests")
}

fn test_integration() -> Result<()> {
    cargo(
        &[
            "test", "--package", "unaccent-core",
            "--test", "rename_restore",
            "--test", "failure_paths",
            "--test", "relative_root",
        ],
        "rename/restore integration tests",
    )?;
    cargo(&["build", "--bin", BIN], "build unaccent binary")?;
    cargo(&["run", "--bin", BIN, "--", "--version"], "CLI version command")?;
    for subcommand in ["preview", "rename", "restore"] {
        cargo(&["run", "--bin", BIN, "--", subcommand, "--help"], "CLI help command")?;
    }
    Ok(())
}

fn cargo(args: &[&str], what: &str) -> Result<()> {
    let status = process::Command::new("cargo").args(args).status()?;

    if !status.success() {
        anyhow::bail!("Failed: {what}");
    }
    Ok(())
}
