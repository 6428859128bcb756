use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span};

use inventory_catalog::{CatalogReport, LoadedCatalog, load_catalog};
use inventory_cli::listing::OptionsListing;
use inventory_cli::replay::{ReplayOutcome, initial_state, replay};
use inventory_resolve::Chain;

use crate::cli::{ChainArgs, CheckArgs, OptionsArgs, ResolveArgs};

pub fn run_chains() -> Vec<Chain> {
    Chain::builtins()
}

pub fn run_options(args: &OptionsArgs) -> Result<OptionsListing> {
    let chain = builtin_chain(&args.chain)?;
    let loaded = open_catalog(&args.chain.catalog)?;
    let state = initial_state(&chain, &args.chain.state).context("parse --state")?;
    OptionsListing::build(&chain, &state, &loaded.catalog, &args.role)
        .with_context(|| format!("list options for {}", args.role))
}

pub fn run_resolve(args: &ResolveArgs) -> Result<ReplayOutcome> {
    let chain = Arc::new(builtin_chain(&args.chain)?);
    let loaded = open_catalog(&args.chain.catalog)?;
    let initial = initial_state(&chain, &args.chain.state).context("parse --state")?;
    replay(chain, &loaded.catalog, &initial, &args.edits).context("replay edits")
}

pub fn run_check(args: &CheckArgs) -> Result<CatalogReport> {
    let span = info_span!("check", catalog = %args.catalog.display());
    let _guard = span.enter();
    let loaded = open_catalog(&args.catalog)?;
    let report = CatalogReport::build(&loaded.catalog, loaded.sources);
    info!(
        dangling = report.dangling_count(),
        duplicates = report.duplicate_count(),
        "catalog checked"
    );
    Ok(report)
}

fn builtin_chain(args: &ChainArgs) -> Result<Chain> {
    Chain::builtin(&args.chain).ok_or_else(|| {
        let known: Vec<String> = Chain::builtins()
            .iter()
            .map(|chain| chain.name().to_string())
            .collect();
        anyhow!(
            "unknown chain {:?} (expected one of: {})",
            args.chain,
            known.join(", ")
        )
    })
}

fn open_catalog(path: &Path) -> Result<LoadedCatalog> {
    let loaded =
        load_catalog(path).with_context(|| format!("load catalog {}", path.display()))?;
    info!(
        catalog = %path.display(),
        files = loaded.sources.len(),
        "catalog loaded"
    );
    Ok(loaded)
}
