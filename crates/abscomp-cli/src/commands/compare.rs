use std::io::IsTerminal;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use abscomp_core::config::{Config, ConfigManager};
use abscomp_core::export::{ConsoleReporter, ExportPaths, ReportExporter, SummaryOptions};
use abscomp_core::fetch::{FetchedLibrary, LibraryClient};
use abscomp_core::{LibraryComparator, LibrarySide, LibrarySnapshot, Normalizer, SnapshotBuilder};
use anyhow::{Context, anyhow};
use tracing::info;

use crate::commands::CompareOptions;

pub struct Compare;

impl Compare {
    pub fn execute(options: &CompareOptions) -> anyhow::Result<()> {
        let started = Instant::now();

        let loaded = ConfigManager::load(options.config_path)?;
        info!(path = %loaded.path.display(), "using configuration");
        let config = &loaded.config;

        let (fetched_a, fetched_b) = Self::fetch_both(config)?;

        let normalizer = config.normalizer();
        let snapshot_a = Self::snapshot(config, &normalizer, LibrarySide::A, &fetched_a);
        let snapshot_b = Self::snapshot(config, &normalizer, LibrarySide::B, &fetched_b);

        let outcome = LibraryComparator::new(config.differ()).compare(&snapshot_a, &snapshot_b);

        let summary_options = SummaryOptions {
            list_limit: options.list_limit,
            color: !options.no_color
                && std::env::var_os("NO_COLOR").is_none()
                && std::io::stdout().is_terminal(),
        };
        println!("{}", ConsoleReporter::generate_summary(&outcome, &summary_options));

        if options.writes_files() {
            let today = chrono::Local::now().date_naive();
            let exporter = ReportExporter::new(ExportPaths::new(options.output_dir, today));
            let mut written: Vec<PathBuf> = Vec::new();

            if options.json {
                written.push(exporter.write_json(&outcome.report)?);
            }
            if options.csv {
                written.extend(exporter.write_csv(&outcome.report)?);
            }
            if options.dump_libraries {
                written.extend(exporter.write_snapshot(&snapshot_a)?);
                written.extend(exporter.write_snapshot(&snapshot_b)?);
                written.extend(exporter.write_matched(&outcome.matched)?);
            }

            println!("Files written:");
            for path in &written {
                println!("  {}", path.display());
            }
        }

        println!("Completed in {:.2}s", started.elapsed().as_secs_f64());

        Ok(())
    }

    /// Fetch both libraries concurrently
    fn fetch_both(config: &Config) -> anyhow::Result<(FetchedLibrary, FetchedLibrary)> {
        let client_a = Self::client(config, LibrarySide::A)?;
        let client_b = Self::client(config, LibrarySide::B)?;

        thread::scope(|scope| {
            let handle_a = scope.spawn(|| client_a.fetch_items());
            let handle_b = scope.spawn(|| client_b.fetch_items());

            let fetched_a = handle_a
                .join()
                .map_err(|_| anyhow!("Fetch of library A panicked"))?
                .with_context(|| Self::fetch_failed(config, LibrarySide::A))?;
            let fetched_b = handle_b
                .join()
                .map_err(|_| anyhow!("Fetch of library B panicked"))?
                .with_context(|| Self::fetch_failed(config, LibrarySide::B))?;

            Ok((fetched_a, fetched_b))
        })
    }

    fn client(config: &Config, side: LibrarySide) -> anyhow::Result<LibraryClient> {
        LibraryClient::new(config.library(side), &config.fetch)
            .with_context(|| format!("Failed to set up client for library {side}"))
    }

    fn fetch_failed(config: &Config, side: LibrarySide) -> String {
        let library = config.library(side);
        format!("Failed to fetch library {side} ({}) from {}", library.library, library.url)
    }

    fn snapshot(
        config: &Config,
        normalizer: &Normalizer,
        side: LibrarySide,
        fetched: &FetchedLibrary,
    ) -> LibrarySnapshot {
        SnapshotBuilder::new(normalizer, side, config.library(side).library.trim())
            .fetched_at(fetched.fetched_at)
            .build(&fetched.items)
    }
}
