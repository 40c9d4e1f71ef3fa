use crate::{CaptureError, CapturedFrame};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Replays saved timeline screenshots in capture order.
///
/// Layout on disk is one directory per match, each holding the PNG pages of
/// that match. Matches are visited by directory name and pages by file name,
/// so `000.png, 001.png, ...` alternate remaining and elapsed views.
pub struct ScreenshotDir {
    pages: Vec<(String, usize, PathBuf, bool)>,
    next: usize,
}

impl ScreenshotDir {
    pub fn open(root: &Path) -> Result<Self> {
        let mut match_dirs = sorted_entries(root)?
            .into_iter()
            .filter(|p| p.is_dir())
            .collect::<Vec<_>>();
        match_dirs.sort();

        let mut pages = Vec::new();
        for dir in &match_dirs {
            let match_id = dir
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            let files = sorted_entries(dir)?
                .into_iter()
                .filter(|p| {
                    p.extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
                })
                .collect::<Vec<_>>();

            debug!("Match {}: {} page(s)", match_id, files.len());
            let count = files.len();
            for (i, path) in files.into_iter().enumerate() {
                pages.push((match_id.clone(), i, path, i + 1 == count));
            }
        }

        info!(
            "Screenshot replay: {} match(es), {} page(s) under {}",
            match_dirs.len(),
            pages.len(),
            root.display()
        );

        Ok(Self { pages, next: 0 })
    }
}

impl Iterator for ScreenshotDir {
    type Item = Result<CapturedFrame, CaptureError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (match_id, page_index, path, is_last) = self.pages.get(self.next)?.clone();
        self.next += 1;

        Some(match image::open(&path) {
            Ok(img) => Ok(CapturedFrame {
                match_id,
                page_index,
                frame: img.to_rgba8(),
                is_last,
            }),
            Err(source) => Err(CaptureError {
                match_id,
                page_index,
                is_last,
                path,
                source,
            }),
        })
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list {}", dir.display()))?;
    entries.sort();
    Ok(entries)
}
