//! Cache management commands

use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::CacheStorage;
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::load_settings;
use crate::clock::SystemClock;
use crate::error::{CacheError, Result};
use crate::output::formatters::{format_epoch_local, format_size};
use crate::output::print_json;

/// Cache directory from settings (`--cache-dir`, env, config or default)
fn cache_dir(opts: &GlobalOptions) -> Result<PathBuf> {
    let settings = load_settings(opts)?;
    Ok(settings.cache_dir.ok_or(CacheError::NoHome)?)
}

fn open(opts: &GlobalOptions) -> Result<CacheStorage> {
    let settings = load_settings(opts)?;
    let dir = settings.cache_dir.ok_or(CacheError::NoHome)?;
    Ok(CacheStorage::open_at(
        &dir,
        settings.cache_ttl,
        Arc::new(SystemClock),
    )?)
}

/// Show cache status/statistics
pub fn status(opts: &GlobalOptions) -> Result<()> {
    let cache = open(opts)?;
    let stats = cache.stats()?;
    let path = cache.dir().display().to_string();

    match opts.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "total_entries": stats.total_entries,
            "valid_entries": stats.valid_entries,
            "expired_entries": stats.expired_entries,
            "total_size_bytes": stats.total_size_bytes,
            "total_size_human": format_size(stats.total_size_bytes),
            "oldest_entry_timestamp": stats.oldest_entry,
            "newest_entry_timestamp": stats.newest_entry,
            "path": path,
        })),
        _ => {
            println!("Cache Status");
            println!("────────────────────────────────────────");
            println!("Location:       {}", path);
            println!("Valid entries:  {}", stats.valid_entries);
            println!("Expired:        {}", stats.expired_entries);
            println!("Total size:     {}", format_size(stats.total_size_bytes));

            if let Some(oldest) = stats.oldest_entry {
                println!("Oldest entry:   {}", format_epoch_local(oldest));
            }
            if let Some(newest) = stats.newest_entry {
                println!("Newest entry:   {}", format_epoch_local(newest));
            }
            Ok(())
        }
    }
}

/// Clear all cache entries
pub fn clear(opts: &GlobalOptions) -> Result<()> {
    let cache = open(opts)?;
    let stats = cache.clear_all()?;

    match opts.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "entries_removed": stats.entries_removed,
            "success": true,
        })),
        _ => {
            if stats.entries_removed > 0 {
                println!("Cleared {} cache entries", stats.entries_removed);
            } else {
                println!("Cache was already empty");
            }
            Ok(())
        }
    }
}

/// Show cache path
pub fn path(opts: &GlobalOptions) -> Result<()> {
    println!("{}", cache_dir(opts)?.display());
    Ok(())
}
