// src/project/reader.rs

use crate::errors::AppError;
use crate::models::Page;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Maximum allowed page size (10 MB).
const MAX_PAGE_SIZE: u64 = 10 * 1024 * 1024;

/// Reads all HTML pages under a project directory. Paths are stored
/// project-relative with forward slashes; `index.html` sorts first, the
/// rest alphabetically.
pub async fn read_pages(project_dir: &Path) -> Result<Vec<Page>, AppError> {
    let mut paths: Vec<PathBuf> = WalkDir::new(project_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_html(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    paths.sort();
    paths.sort_by_key(|path| relative_path(path, project_dir) != "index.html");

    let mut pages = Vec::new();
    for path in paths {
        let metadata = fs::metadata(&path).await?;
        if metadata.len() > MAX_PAGE_SIZE {
            return Err(AppError::InvalidInput(format!(
                "Page too large: {} (max {} bytes)",
                path.display(),
                MAX_PAGE_SIZE
            )));
        }
        let html = fs::read_to_string(&path).await?;
        pages.push(Page::new(relative_path(&path, project_dir), html));
    }

    Ok(pages)
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.eq_ignore_ascii_case("html"))
        .unwrap_or(false)
}

fn relative_path(path: &Path, project_dir: &Path) -> String {
    path.strip_prefix(project_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_html_pages_with_index_first() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("about.html"), "<html>about</html>").unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>home</html>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a page").unwrap();

        let pages = read_pages(dir.path()).await.unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].path, "index.html");
        assert_eq!(pages[0].html, "<html>home</html>");
        assert_eq!(pages[1].path, "about.html");
    }

    #[tokio::test]
    async fn nested_pages_keep_relative_paths() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("blog")).unwrap();
        std::fs::write(dir.path().join("blog/post.html"), "<html>post</html>").unwrap();

        let pages = read_pages(dir.path()).await.unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, "blog/post.html");
    }

    #[tokio::test]
    async fn empty_directory_yields_no_pages() {
        let dir = tempdir().unwrap();
        let pages = read_pages(dir.path()).await.unwrap();
        assert!(pages.is_empty());
    }
}
