// src/project/writer.rs

use crate::errors::AppError;
use crate::models::Page;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use toml;

/// Saves the page set. In `auto` mode pages are written into the project
/// directory in place, with originals backed up under `.rollback` so the
/// run can be undone; otherwise everything lands under
/// `<output_directory>/pages`.
pub async fn save_pages(
    pages: &[Page],
    project_dir: &Path,
    output_directory: &Path,
    auto: bool,
) -> Result<usize, AppError> {
    fs::create_dir_all(output_directory).await?;
    let rollback_dir = output_directory.join(".rollback");
    fs::create_dir_all(&rollback_dir).await?;

    let mut rollback_config = RollbackConfig {
        new_files: Vec::new(),
        rollback_files: Vec::new(),
    };
    let mut saved_pages = 0;

    for page in pages {
        let target = if auto {
            project_dir.join(&page.path)
        } else {
            output_directory.join("pages").join(&page.path)
        };

        if auto {
            if target.exists() {
                let original = fs::read_to_string(&target).await?;
                if original == page.html {
                    continue;
                }
                let backup_path = rollback_dir.join(page.path.replace('/', "__"));
                fs::write(&backup_path, &original).await?;
                rollback_config.rollback_files.push((
                    target.display().to_string(),
                    backup_path.display().to_string(),
                ));
            } else {
                rollback_config.new_files.push(target.display().to_string());
            }
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, page.html.as_bytes()).await?;
        saved_pages += 1;
    }

    if auto {
        let rollback_config_str =
            toml::to_string(&rollback_config).expect("Failed to serialize rollback config");
        fs::write(rollback_dir.join("rollback.toml"), rollback_config_str).await?;
    }

    Ok(saved_pages)
}

/// Rolls back changes made by the last in-place run.
pub async fn rollback_last_run(output_directory: &Path) -> Result<(), AppError> {
    let rollback_dir = output_directory.join(".rollback");
    if !rollback_dir.exists() {
        return Err(AppError::RollbackError(
            "No changes to rollback".to_string(),
        ));
    }

    let rollback_config_path = rollback_dir.join("rollback.toml");
    let rollback_config_str = fs::read_to_string(&rollback_config_path).await?;
    let rollback_config: RollbackConfig =
        toml::from_str(&rollback_config_str).map_err(AppError::from)?;

    for new_file in rollback_config.new_files {
        let path = Path::new(&new_file);
        if path.exists() {
            fs::remove_file(path).await?;
            println!("Deleted new file: {}", path.display());
        }
    }

    for (original_path, backup_path) in rollback_config.rollback_files {
        let original_path = Path::new(&original_path);
        let backup_path = Path::new(&backup_path);
        if backup_path.exists() {
            fs::copy(backup_path, original_path).await?;
            println!("Restored: {}", original_path.display());
        }
    }

    fs::remove_dir_all(rollback_dir).await?;

    Ok(())
}

/// Rollback bookkeeping for one in-place run.
#[derive(Serialize, Deserialize)]
struct RollbackConfig {
    new_files: Vec<String>,
    rollback_files: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn non_auto_writes_into_the_output_directory() {
        let project = tempdir().unwrap();
        let output = tempdir().unwrap();
        let pages = vec![Page::new("index.html", "<html>new</html>")];

        let saved = save_pages(&pages, project.path(), output.path(), false)
            .await
            .unwrap();
        assert_eq!(saved, 1);
        let written =
            std::fs::read_to_string(output.path().join("pages/index.html")).unwrap();
        assert_eq!(written, "<html>new</html>");
        assert!(!project.path().join("index.html").exists());
    }

    #[tokio::test]
    async fn auto_overwrites_in_place_and_rolls_back() {
        let project = tempdir().unwrap();
        let output = tempdir().unwrap();
        std::fs::write(project.path().join("index.html"), "<html>old</html>").unwrap();

        let pages = vec![
            Page::new("index.html", "<html>new</html>"),
            Page::new("about.html", "<html>about</html>"),
        ];
        let saved = save_pages(&pages, project.path(), output.path(), true)
            .await
            .unwrap();
        assert_eq!(saved, 2);
        assert_eq!(
            std::fs::read_to_string(project.path().join("index.html")).unwrap(),
            "<html>new</html>"
        );
        assert!(project.path().join("about.html").exists());

        rollback_last_run(output.path()).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(project.path().join("index.html")).unwrap(),
            "<html>old</html>"
        );
        assert!(!project.path().join("about.html").exists());
    }

    #[tokio::test]
    async fn unchanged_pages_are_not_rewritten_in_auto_mode() {
        let project = tempdir().unwrap();
        let output = tempdir().unwrap();
        std::fs::write(project.path().join("index.html"), "<html>same</html>").unwrap();

        let pages = vec![Page::new("index.html", "<html>same</html>")];
        let saved = save_pages(&pages, project.path(), output.path(), true)
            .await
            .unwrap();
        assert_eq!(saved, 0);
    }

    #[tokio::test]
    async fn rollback_without_a_run_is_an_error() {
        let output = tempdir().unwrap();
        let result = rollback_last_run(output.path()).await;
        assert!(matches!(result, Err(AppError::RollbackError(_))));
    }
}
