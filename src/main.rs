// ── caliper probe ─────────────────────────────────────────────────────────────
//
// Diagnostic binary: build the native provider, run every accessor query
// once, print the result.  Exits 1 with the rendered error on stderr when a
// query fails — the same failure a host application would see.
#![deny(unsafe_code)]

use std::io;

use clap::Parser;

use caliper::{DeviceInfo, PausePermission};

#[derive(Parser)]
#[command(name = "caliper", version, about = "Print device and display info for this host")]
struct Cli {
    /// Emit the report as pretty-printed JSON.
    #[arg(long)]
    json: bool,

    /// Enable debug logging (RUST_LOG overrides).
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("caliper: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> caliper::Result<()> {
    let provider = caliper::platform::native();
    let pause = PausePermission::default();
    let info = DeviceInfo::new(provider.as_ref(), &pause);
    let report = info.report()?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
        println!("{json}");
    } else {
        println!("model      {}", report.model);
        println!(
            "density    {:.1} dpi ({:.2}x)",
            report.density_dpi, report.density_ratio
        );
        println!(
            "rotation   {}° (code {})",
            report.rotation_degrees, report.rotation_code
        );
        println!("can pause  {}", report.can_pause);
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
