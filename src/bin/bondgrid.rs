use std::env;
use std::fs;

use anyhow::{bail, Context};

use bondgrid::bonds::types::{Bond, BondResults};
use bondgrid::bonds::vector3::Vec3;
use bondgrid::bonds::{BondBuilder, Settings};

/// One input atom: either an atomic number or an element symbol, plus coordinates.
#[derive(serde::Deserialize)]
struct AtomInput {
    #[serde(default)]
    atomic_number: Option<u8>,
    #[serde(default)]
    symbol: Option<String>,
    x: f64,
    y: f64,
    z: f64,
}

#[derive(serde::Serialize)]
struct Output<'a> {
    version: &'static str,
    atoms: usize,
    bonds: &'a [Bond],
    valence_counts: &'a [u32],
    elapsed_ms: u128,
}

fn init_logging() {
    let level = if cfg!(debug_assertions) { "info" } else { "warn" };
    // RUST_LOG, when set, takes precedence over the default filter
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(format!("bondgrid={level}"))).init();
}

fn option_value<'a>(args: &'a [String], flag: &str) -> anyhow::Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        None => Ok(None),
        Some(i) => match args.get(i + 1) {
            Some(v) => Ok(Some(v.as_str())),
            None => bail!("{flag} expects a path"),
        },
    }
}

fn read_atoms(builder: &mut BondBuilder, path: &str) -> anyhow::Result<()> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let atoms: Vec<AtomInput> = serde_json::from_str(&data).with_context(|| format!("parsing {path}"))?;
    for (i, a) in atoms.iter().enumerate() {
        let pos = Vec3::new(a.x, a.y, a.z);
        let added = match (a.atomic_number, a.symbol.as_deref()) {
            (Some(z), _) => builder.add_atom(z, pos),
            (None, Some(sym)) => builder.add_atom_by_symbol(sym, pos),
            (None, None) => bail!("atom {i}: needs `atomic_number` or `symbol`"),
        };
        added.with_context(|| format!("atom {i} in {path}"))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1].starts_with("--") {
        eprintln!("Usage: bondgrid <atoms.json> [--json] [--no-parallel] [--elements <table.json>] [--settings <settings.json>]");
        std::process::exit(1);
    }
    let input = &args[1];
    let json = args.iter().any(|a| a == "--json");
    let no_parallel = args.iter().any(|a| a == "--no-parallel");

    let mut builder = match option_value(&args, "--elements")? {
        Some(path) => BondBuilder::with_table_path(path).with_context(|| format!("loading element table {path}"))?,
        None => BondBuilder::new(),
    };
    if let Some(path) = option_value(&args, "--settings")? {
        *builder.settings_mut() = Settings::from_path(path).with_context(|| format!("loading settings {path}"))?;
    }
    if no_parallel { builder.settings_mut().enable_parallel = false; }

    read_atoms(&mut builder, input)?;

    let t0 = std::time::Instant::now();
    let results: BondResults = builder.build()?;
    let elapsed = t0.elapsed().as_millis();
    if json {
        let out = Output {
            version: env!("CARGO_PKG_VERSION"),
            atoms: results.n_atoms,
            bonds: &results.bonds,
            valence_counts: &results.valence_counts,
            elapsed_ms: elapsed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Atoms: {}", results.n_atoms);
        println!("Bonds: {}", results.n_bonds());
        for b in &results.bonds {
            println!("{} {} {}", b.from, b.to, b.order);
        }
        println!("Elapsed: {} ms", elapsed);
    }
    Ok(())
}
