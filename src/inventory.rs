use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{PageCategory, PageEntry};

/// Route Categorizer / Page Inventory
///
/// Offline administrative tool that walks the website's `app/` route tree and
/// classifies every page for audit purposes: orphaned pages, duplicated routes,
/// and routes that look like they should be gated. The report is advisory —
/// actual enforcement lives in the gate components, not here. The scan is a
/// plain synchronous traversal, invoked interactively by an operator.

/// Leaf filenames that constitute a page in the route tree.
const PAGE_FILENAMES: [&str; 2] = ["page.tsx", "page.ts"];

/// Path substrings denoting gated areas. Convention-based heuristic, not a
/// verified access-control audit.
const PROTECTED_PATHS: [&str; 6] = [
    "/clients/",
    "/team/",
    "/owner/",
    "/admin/",
    "/invest",
    "/investors",
];

/// scan_pages
///
/// Builds the full page inventory for the tree under `site_root/app`.
///
/// Route resolution: parenthesized route-group directories contribute no URL
/// segment; dynamic `[param]` directories are kept literally; the tree root is
/// `/`. Duplicate detection runs as a second pass after the walk: routes are
/// counted, then every entry whose resolved route occurs more than once is
/// flagged. Directory entries are visited in sorted order and the result is
/// sorted by route then file path, so two scans of an unchanged tree produce
/// identical output.
pub fn scan_pages(site_root: &Path) -> io::Result<Vec<PageEntry>> {
    let app_dir = site_root.join("app");
    let mut pages = Vec::new();

    scan_directory(&app_dir, "", site_root, &mut pages)?;

    // Second pass: mark ALL pages occupying a duplicated route string.
    let mut route_counts: HashMap<String, usize> = HashMap::new();
    for page in &pages {
        *route_counts.entry(page.route.clone()).or_insert(0) += 1;
    }
    for page in &mut pages {
        if route_counts.get(&page.route).copied().unwrap_or(0) > 1 {
            page.is_duplicate = true;
        }
    }

    pages.sort_by(|a, b| {
        a.route
            .cmp(&b.route)
            .then_with(|| a.file_path.cmp(&b.file_path))
    });
    Ok(pages)
}

fn scan_directory(
    dir: &Path,
    route: &str,
    site_root: &Path,
    pages: &mut Vec<PageEntry>,
) -> io::Result<()> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();

        if path.is_dir() {
            let next_route = if name.starts_with('(') && name.ends_with(')') {
                // Route group: organizational only, no URL segment.
                route.to_string()
            } else {
                // Plain and dynamic ([param]) segments both join the URL literally.
                format!("{}/{}", route, name)
            };
            scan_directory(&path, &next_route, site_root, pages)?;
        } else if PAGE_FILENAMES.contains(&name.as_str()) {
            let metadata = entry.metadata()?;
            let file_path = path
                .strip_prefix(site_root)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();
            let resolved_route = if route.is_empty() {
                "/".to_string()
            } else {
                route.to_string()
            };

            pages.push(PageEntry {
                title: extract_title(&path).unwrap_or_else(|| {
                    if route.is_empty() {
                        "Home".to_string()
                    } else {
                        resolved_route.clone()
                    }
                }),
                route: resolved_route,
                category: categorize_route(&file_path),
                last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
                file_size: Some(format_bytes(metadata.len())),
                is_protected: is_protected_route(&file_path),
                is_duplicate: false,
                file_path,
            });
        }
    }

    Ok(())
}

/// categorize_route
///
/// Ordered path predicates; the first match wins and `public` is the default.
pub fn categorize_route(file_path: &str) -> PageCategory {
    if file_path.contains("(public)/") {
        return PageCategory::Public;
    }
    if file_path.contains("(visual-test)/") {
        return PageCategory::VisualTest;
    }
    if file_path.contains("/clients/") {
        return PageCategory::ClientPortal;
    }
    if file_path.contains("/invest") {
        return PageCategory::Investor;
    }
    if file_path.contains("/investors") {
        return PageCategory::Investor;
    }
    if file_path.contains("/team/") {
        return PageCategory::Team;
    }
    if file_path.contains("/owner/") {
        return PageCategory::Team;
    }
    if file_path.contains("/partners/") {
        return PageCategory::Partner;
    }
    if file_path.contains("/partnerships/") {
        return PageCategory::Partner;
    }
    if file_path.contains("/admin/") {
        return PageCategory::Admin;
    }
    if file_path.contains("/api/") {
        return PageCategory::Api;
    }
    PageCategory::Public
}

/// is_protected_route
///
/// Whether the path falls in an area that is conventionally gated.
pub fn is_protected_route(file_path: &str) -> bool {
    PROTECTED_PATHS
        .iter()
        .any(|protected| file_path.contains(protected))
}

/// extract_title
///
/// Best-effort page title: a `title: '…'` metadata literal, else the first
/// `<h1>` text, else a `<title>` element. Unreadable files simply yield no title.
pub fn extract_title(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;

    quoted_value(&content, "title:")
        .or_else(|| tag_text(&content, "h1"))
        .or_else(|| tag_text(&content, "title"))
}

/// First single- or double-quoted string following `marker`.
fn quoted_value(content: &str, marker: &str) -> Option<String> {
    let start = content.find(marker)? + marker.len();
    let rest = content[start..].trim_start();
    let quote = rest.chars().next()?;
    if quote != '\'' && quote != '"' {
        return None;
    }
    let inner = &rest[1..];
    let end = inner.find(quote)?;
    let value = &inner[..end];
    (!value.is_empty()).then(|| value.to_string())
}

/// Text content of the first `<tag …>…</` occurrence, when it is plain text.
fn tag_text(content: &str, tag: &str) -> Option<String> {
    let open = format!("<{}", tag);
    let start = content.find(&open)?;
    let after = &content[start..];
    let gt = after.find('>')?;
    let inner = &after[gt + 1..];
    let end = inner.find("</")?;
    let text = inner[..end].trim();
    (!text.is_empty() && !text.contains('<')).then(|| text.to_string())
}

/// format_bytes
///
/// Human-readable file size with one decimal place, trailing `.0` dropped.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    const UNITS: [&str; 3] = ["B", "KB", "MB"];
    let exponent = (((bytes as f64).ln() / 1024f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[exponent])
    } else {
        format!("{:.1} {}", rounded, UNITS[exponent])
    }
}

// --- Operator Actions ---
//
// Destructive, operator-invoked administrative actions with no undo beyond
// manual file recovery. Deliberately not hardened against partial failure
// (no transactional move+log atomicity): they are manually supervised, and a
// hard filesystem error is surfaced directly rather than recovered from.

/// DeletionAction
///
/// Audit-log discriminator for the two destructive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionAction {
    Archive,
    Delete,
}

impl DeletionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionAction::Archive => "ARCHIVE",
            DeletionAction::Delete => "DELETE",
        }
    }
}

/// archive_page
///
/// Soft delete: moves the page file under the archive directory, preserving its
/// relative path so it can be restored by hand.
pub fn archive_page(site_root: &Path, file_path: &str, archive_dir: &str) -> io::Result<()> {
    let source = site_root.join(file_path);
    let target = site_root.join(archive_dir).join(file_path);

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::rename(source, target)
}

/// delete_page
///
/// Permanently removes the page file.
pub fn delete_page(site_root: &Path, file_path: &str) -> io::Result<()> {
    fs::remove_file(site_root.join(file_path))
}

/// log_deletion
///
/// Appends one audit line per destructive action:
/// `ISO8601_TIMESTAMP | ACTION | FILE_PATH`.
pub fn log_deletion(
    site_root: &Path,
    log_path: &str,
    file_path: &str,
    action: DeletionAction,
) -> io::Result<()> {
    let log_file = site_root.join(log_path);
    if let Some(log_dir) = log_file.parent() {
        fs::create_dir_all(log_dir)?;
    }

    let line = format!(
        "{} | {} | {}\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        action.as_str(),
        file_path
    );

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    file.write_all(line.as_bytes())
}
