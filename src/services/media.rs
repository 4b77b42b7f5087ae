use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::MediaConfig;

/// Public URL prefix the frontend proxies to the attachment directory
pub const PUBLIC_PREFIX: &str = "/assets/media/attachments/public/";

const IMAGE_EXTENSIONS: [&str; 4] = ["webp", "jpg", "jpeg", "png"];

/// Attachments live three directories deep, named after the first nine
/// characters of the hashed disk name: `abc/def/ghi/abcdefghi....ext`.
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    root: PathBuf,
    placeholder: PathBuf,
    placeholder_url: String,
}

/// A file found on disk, with its path relative to the attachment root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub relative: String,
}

impl MediaLibrary {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: config.root.clone(),
            placeholder: config.placeholder.clone(),
            placeholder_url: config.placeholder_url.clone(),
        }
    }

    pub fn placeholder(&self) -> &Path {
        &self.placeholder
    }

    pub fn placeholder_url(&self) -> &str {
        &self.placeholder_url
    }

    /// Public image URL for a menu item. Blocking: touches the filesystem.
    pub fn menu_image_url(&self, disk_name: Option<&str>, stored_name: Option<&str>) -> String {
        if let Some(relative) = disk_name.and_then(|d| self.by_disk_name(d)) {
            return format!("{}{}", PUBLIC_PREFIX, relative);
        }

        let stored = stored_name.map(str::trim).filter(|s| !s.is_empty() && *s != self.placeholder_url);
        if let Some(stored) = stored {
            let basename = Path::new(stored).file_name().and_then(|n| n.to_str());
            if let Some(found) = basename.and_then(|b| self.find_by_basename(b)) {
                return format!("{}{}", PUBLIC_PREFIX, found.relative);
            }
        }

        self.placeholder_url.clone()
    }

    /// Locate a requested image. Accepts a path relative to the attachment
    /// root (optionally carrying the public prefix) or a bare file name.
    pub fn locate(&self, requested: &str) -> Option<ResolvedFile> {
        let relative = sanitize(requested)?;
        let path = self.root.join(&relative);
        if path.is_file() {
            return Some(ResolvedFile {
                path,
                relative: to_slash(&relative),
            });
        }

        if relative.components().count() == 1 {
            return relative.to_str().and_then(|name| self.find_by_basename(name));
        }
        None
    }

    fn by_disk_name(&self, disk_name: &str) -> Option<String> {
        let disk_name = disk_name.trim();
        if disk_name.len() < 9 || !disk_name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        let (p1, p2, p3) = (&disk_name[0..3], &disk_name[3..6], &disk_name[6..9]);
        let dir = self.root.join(p1).join(p2).join(p3);

        IMAGE_EXTENSIONS.iter().find_map(|ext| {
            let file = format!("{}.{}", disk_name, ext);
            dir.join(&file)
                .is_file()
                .then(|| format!("{}/{}/{}/{}", p1, p2, p3, file))
        })
    }

    /// First `*/*/*/<name>` match under the root, in sorted order
    fn find_by_basename(&self, name: &str) -> Option<ResolvedFile> {
        let mut level = vec![self.root.clone()];
        for _ in 0..3 {
            level = level.iter().flat_map(|dir| sorted_subdirs(dir)).collect();
        }

        level.into_iter().find_map(|dir| {
            let path = dir.join(name);
            if !path.is_file() {
                return None;
            }
            let relative = path.strip_prefix(&self.root).ok().map(to_slash)?;
            Some(ResolvedFile { path, relative })
        })
    }
}

fn sorted_subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// Relative path with the public prefix removed; `None` for anything that
/// would leave the attachment root
fn sanitize(requested: &str) -> Option<PathBuf> {
    let trimmed = requested.trim().trim_start_matches('/');
    let trimmed = trimmed
        .strip_prefix(PUBLIC_PREFIX.trim_start_matches('/'))
        .unwrap_or(trimmed);
    if trimmed.is_empty() || trimmed.contains('\\') {
        return None;
    }

    let mut clean = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!clean.as_os_str().is_empty()).then_some(clean)
}

fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("webp") => "image/webp",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
