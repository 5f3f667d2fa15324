use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for vscreen")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Run tests, optionally limited to some areas of the crate
    Test {
        #[arg(long, value_enum)]
        area: Vec<TestArea>,
    },
    /// Run benchmarks
    Bench,
    /// Run the demo window
    Demo {
        /// Asset root directory (overrides vscreen.toml)
        #[arg(long)]
        assets: Option<String>,
        /// Log filter passed through RUST_LOG
        #[arg(long, default_value = "info")]
        log: String,
        #[arg(long)]
        release: bool,
    },
}

/// Area of the crate with its unit test filter and integration suite
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TestArea {
    Bitmap,
    Resource,
    Screen,
    Raster,
}

impl TestArea {
    fn module(self) -> &'static str {
        match self {
            TestArea::Bitmap => "bitmap",
            TestArea::Resource => "resource",
            TestArea::Screen => "screen",
            TestArea::Raster => "raster",
        }
    }

    fn suite(self) -> Option<&'static str> {
        match self {
            TestArea::Bitmap => None,
            TestArea::Resource => Some("resource_tests"),
            TestArea::Screen => Some("screen_tests"),
            TestArea::Raster => Some("raster_tests"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy { fix } => run_clippy(fix),
        Commands::Test { area } => run_test(&area),
        Commands::Bench => execute_command(&mut cargo("bench")),
        Commands::Demo {
            assets,
            log,
            release,
        } => run_demo(assets.as_deref(), &log, release),
    }
}

/// A cargo command with the feature selection used everywhere
///
/// CI has no display server, so the window host is left out there.
fn cargo(subcommand: &str) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg(subcommand);
    if std::env::var("CI").is_ok() {
        cmd.arg("--no-default-features");
    } else {
        cmd.arg("--all-features");
    }
    cmd
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;
    run_task("Build", || execute_command(&mut cargo("build")), verbose)?;
    run_task("Test", || run_test(&[]), verbose)?;

    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );

    Ok(())
}

fn run_fmt(check: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("fmt").arg("--all");

    if check {
        cmd.arg("--").arg("--check");
    }

    execute_command(&mut cmd)
}

fn run_clippy(fix: bool) -> Result<()> {
    let mut cmd = cargo("clippy");
    cmd.arg("--all-targets");

    if fix {
        cmd.arg("--fix");
    } else {
        cmd.arg("--").arg("-D").arg("warnings");
    }

    execute_command(&mut cmd)
}

fn run_test(areas: &[TestArea]) -> Result<()> {
    if areas.is_empty() {
        return execute_command(&mut cargo("test"));
    }

    let mut failed = Vec::new();

    for &area in areas {
        println!("{} Running {} tests...", "→".blue(), area.module().bold());

        // Unit tests are filtered by module path; the integration suite runs whole
        let mut unit = cargo("test");
        unit.arg("--lib").arg(area.module());
        let mut result = execute_command(&mut unit);

        if let (Ok(()), Some(suite)) = (&result, area.suite()) {
            let mut integration = cargo("test");
            integration.arg("--test").arg(suite);
            result = execute_command(&mut integration);
        }

        match result {
            Ok(()) => println!("{} {} tests passed\n", "✓".green(), area.module()),
            Err(_) => {
                println!("{} {} tests failed\n", "✗".red(), area.module());
                failed.push(area.module());
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Tests failed in: {}", failed.join(", "))
    }
}

fn run_demo(assets: Option<&str>, log: &str, release: bool) -> Result<()> {
    println!("{}", "=== Demo ===".bold().blue());

    if let Some(assets) = assets {
        if Path::new(assets).is_dir() {
            println!("{} Assets: {}", "✓".green(), assets.cyan());
        } else {
            println!(
                "{} Asset directory not found: {} (error resources will stand in)",
                "⚠".yellow().bold(),
                assets.yellow()
            );
        }
    }
    println!("{} Log filter: {}\n", "→".blue(), log.bold());

    let mut cmd = Command::new("cargo");
    cmd.arg("run").arg("--bin").arg("vscreen-demo");
    if release {
        cmd.arg("--release");
    }
    cmd.env("RUST_LOG", log);
    if let Some(assets) = assets {
        cmd.env("VSCREEN_ASSETS", assets);
    }

    execute_command(&mut cmd)
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);

    let start = Instant::now();

    match task() {
        Ok(_) => {
            if verbose {
                println!("{} ({:.2}s)", "✓".green().bold(), start.elapsed().as_secs_f64());
            } else {
                println!("{}", "✓".green().bold());
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
