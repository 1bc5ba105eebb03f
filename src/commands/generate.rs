//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::generator::Generator;
use crate::Folio;

/// Quiet period before a burst of changes triggers a rebuild
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Generate the static site
pub async fn run(folio: &Folio) -> Result<()> {
    let start = Instant::now();

    let generator = Generator::new(folio)?;
    let report = generator.generate().await?;

    for error in &report.content_errors {
        tracing::warn!("Rendered fallback content: {}", error);
    }
    tracing::info!(
        "Generated {} pages and copied {} assets in {:.2}s",
        report.pages,
        report.assets,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Watch content, static files and config, regenerating once changes settle
pub async fn watch(folio: &Folio) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut debouncer = new_debouncer(DEBOUNCE, move |res: DebounceEventResult| {
        let _ = tx.send(res);
    })?;

    for dir in [&folio.content_dir, &folio.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }
    let config_path = folio.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    while let Some(result) = rx.recv().await {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        let changed: Vec<_> = events
            .iter()
            .filter(|e| is_relevant(&e.path, &folio.public_dir))
            .collect();
        if changed.is_empty() {
            continue;
        }
        for event in &changed {
            tracing::info!("File changed: {}", event.path.display());
        }

        // Pick up config edits too
        let result = match Folio::new(&folio.base_dir) {
            Ok(reloaded) => run(&reloaded).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::error!("Generation failed: {:#}", e);
        }
    }

    Ok(())
}

/// Whether a change at `path` affects the generated site
fn is_relevant(path: &Path, public_dir: &Path) -> bool {
    if path.starts_with(public_dir) {
        return false;
    }
    let name = path.to_string_lossy();
    !name.contains(".git") && !name.contains(".DS_Store") && !name.ends_with('~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_relevant() {
        let public = Path::new("/site/public");
        assert!(is_relevant(Path::new("/site/content/posts/a.md"), public));
        assert!(is_relevant(Path::new("/site/_config.yml"), public));
        assert!(!is_relevant(Path::new("/site/public/index.html"), public));
        assert!(!is_relevant(Path::new("/site/content/posts/a.md~"), public));
        assert!(!is_relevant(Path::new("/site/content/.git/HEAD"), public));
    }
}
