/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use docs_translate::file_utils::FileManager;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "page.md", "content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.md")));
    Ok(())
}

/// Test that find_markdown_files skips pruned directories and non-Markdown files
#[test]
fn test_find_markdown_files_withPrunedDirs_shouldSkipThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_docs_tree(root)?;
    common::create_test_file(root, "ja/index.md", "translated")?;
    common::create_test_file(root, "includes/ja/banner.md", "translated")?;

    let pruned = vec![root.join("ja"), root.join("includes").join("ja")];
    let files = FileManager::find_markdown_files(root, &pruned)?;
    let relative: Vec<PathBuf> = files
        .iter()
        .map(|f| FileManager::relative_path(root, f))
        .collect::<Result<_>>()?;

    assert_eq!(
        relative,
        vec![
            PathBuf::from("guide/intro.md"),
            PathBuf::from("includes/banner.md"),
            PathBuf::from("index.md"),
            PathBuf::from("ref/api.md"),
        ]
    );
    Ok(())
}

/// Test that a directory merely starting with a language code is still walked
#[test]
fn test_find_markdown_files_withLanguagePrefixDir_shouldNotPrune() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "java/setup.md", "# Java")?;

    let files = FileManager::find_markdown_files(root, &[root.join("ja")])?;
    assert_eq!(files, vec![root.join("java/setup.md")]);
    Ok(())
}

/// Test the timestamp comparison, equal times included
#[test]
fn test_is_up_to_date_shouldCompareModificationTimes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "a.md", "source")?;
    let output = common::create_test_file(temp_dir.path(), "ja/a.md", "output")?;

    common::set_mtime(&source, common::seconds_ago(100))?;
    common::set_mtime(&output, common::seconds_ago(200))?;
    assert!(!FileManager::is_up_to_date(&source, &output)?);

    common::set_mtime(&output, common::seconds_ago(50))?;
    assert!(FileManager::is_up_to_date(&source, &output)?);

    let same = common::seconds_ago(10);
    common::set_mtime(&source, same)?;
    common::set_mtime(&output, same)?;
    assert!(FileManager::is_up_to_date(&source, &output)?);

    assert!(!FileManager::is_up_to_date(&source, temp_dir.path().join("missing.md"))?);
    Ok(())
}

/// Test that write_to_file creates missing parent directories
#[test]
fn test_write_to_file_withMissingParents_shouldCreateThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("ja/deep/nested/page.md");

    FileManager::write_to_file(&target, "こんにちは")?;

    assert_eq!(fs::read_to_string(&target)?, "こんにちは");
    Ok(())
}

#[test]
fn test_slash_path_shouldJoinWithForwardSlashes() {
    let path: PathBuf = ["guide", "ref", "x.md"].iter().collect();
    assert_eq!(FileManager::slash_path(&path), "guide/ref/x.md");
}

#[test]
fn test_is_excluded_withSeveralPatterns_shouldMatchAny() {
    let patterns = vec!["ref/".to_string(), "drafts/".to_string()];
    assert!(FileManager::is_excluded(Path::new("drafts/todo.md"), &patterns));
    assert!(FileManager::is_excluded(Path::new("ref/api.md"), &patterns));
    assert!(!FileManager::is_excluded(Path::new("guide/intro.md"), &patterns));
}
