//! Rewrite every HTML document of a built site.
//!
//! Phases:
//! - **Load** - config, emitted svg assets
//! - **Collect** - `*.html` / `*.htm` documents
//! - **Inline** - parallel, one document per task, nothing written yet
//! - **Write** - only if every document succeeded, only changed files

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use rayon::prelude::*;

use super::Cli;
use crate::asset::{AssetResolver, AssetStore};
use crate::config::InlineConfig;
use crate::inline::{DocumentContext, inline_document};
use crate::logger::ProgressLine;
use crate::svg::{SvgOptimizer, UsvgOptimizer};
use crate::{debug, log};

/// Outcome of a site rewrite.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    /// HTML documents found.
    pub documents: usize,
    /// Documents whose markup changed.
    pub changed: Vec<PathBuf>,
}

/// Entry point for the `svginline` command.
pub fn run(cli: &Cli) -> Result<()> {
    let (config_path, required) = cli.config_path();
    let config = InlineConfig::load(&config_path, required)?;

    let summary = rewrite_site(&cli.dir, &config, &UsvgOptimizer, cli.dry)?;

    let verb = if cli.dry { "would rewrite" } else { "rewrote" };
    log!("inline"; "{} {} of {}", verb,
        plural_count(summary.changed.len(), "document"),
        summary.documents);
    Ok(())
}

/// Inline placeholders in every document under `dir`.
///
/// All documents are processed before anything is written; a single
/// failure leaves the whole directory untouched.
pub fn rewrite_site<O>(
    dir: &Path,
    config: &InlineConfig,
    optimizer: &O,
    dry: bool,
) -> Result<Summary>
where
    O: SvgOptimizer + ?Sized,
{
    if !dir.is_dir() {
        bail!("output directory `{}` does not exist", dir.display());
    }

    let assets = AssetStore::scan(dir, &config.placeholder.extension)?;
    debug!("assets"; "loaded {}", plural_count(assets.len(), "svg file"));

    let documents = collect_documents(dir);
    if documents.is_empty() {
        log!("inline"; "no html documents in {}", dir.display());
        return Ok(Summary::default());
    }

    let progress = ProgressLine::new("pages", documents.len());
    let results: Vec<_> = documents
        .par_iter()
        .map(|path| {
            let result = rewrite_document(dir, path, &assets, optimizer, config);
            progress.inc();
            (path, result)
        })
        .collect();
    progress.finish();

    let mut changed = Vec::new();
    let mut failures = 0;
    for (path, result) in results {
        match result {
            Ok(Some(markup)) => changed.push((path, markup)),
            Ok(None) => {}
            Err(e) => {
                failures += 1;
                log!("error"; "{:#}", e);
            }
        }
    }

    if failures > 0 {
        bail!(
            "{} failed, nothing was written",
            plural_count(failures, "document")
        );
    }

    if !dry {
        write_all(&changed)?;
    }

    Ok(Summary {
        documents: documents.len(),
        changed: changed.into_iter().map(|(path, _)| path.clone()).collect(),
    })
}

/// Rewrite one document, `None` if it has nothing to inline.
fn rewrite_document<R, O>(
    dir: &Path,
    path: &Path,
    assets: &R,
    optimizer: &O,
    config: &InlineConfig,
) -> Result<Option<String>>
where
    R: AssetResolver + ?Sized,
    O: SvgOptimizer + ?Sized,
{
    let markup =
        fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))?;

    let filename = path
        .strip_prefix(dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");
    let ctx = DocumentContext::new(filename, dir);

    let rewritten = inline_document(&ctx, markup.clone(), assets, optimizer, config)?;
    Ok((rewritten != markup).then_some(rewritten))
}

/// Write every document to a sibling temp file, then rename them into place.
///
/// A failed write removes the temp files already written and leaves every
/// document untouched.
fn write_all(documents: &[(&PathBuf, String)]) -> Result<()> {
    let mut staged = Vec::with_capacity(documents.len());
    for (path, markup) in documents {
        let temp = temp_path(path);
        if let Err(e) = fs::write(&temp, markup) {
            for (temp, _) in &staged {
                fs::remove_file(temp).ok();
            }
            fs::remove_file(&temp).ok();
            return Err(e).with_context(|| format!("failed to write `{}`", path.display()));
        }
        staged.push((temp, *path));
    }

    for (temp, path) in &staged {
        fs::rename(temp, path)
            .with_context(|| format!("failed to replace `{}`", path.display()))?;
    }
    Ok(())
}

/// `dir/index.html` -> `dir/.index.html.svginline`
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.svginline"))
}

/// All HTML documents under `dir`, sorted.
fn collect_documents(dir: &Path) -> Vec<PathBuf> {
    let mut documents: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm")
                })
        })
        .collect();
    documents.sort();
    documents
}

/// `plural_count(1, "file")` -> `"1 file"`, `plural_count(2, "file")` -> `"2 files"`
fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
