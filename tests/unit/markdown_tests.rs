/*!
 * Tests for code block protection and heading chunking
 */

use docs_translate::errors::DocumentError;
use docs_translate::translation::{extract_code_blocks, placeholder, Chunker};

#[test]
fn test_extract_withTwoBlocks_shouldNumberInOrder() {
    let source = "Intro\n```js\nconst a = 1;\n```\nMiddle\n~~~\nraw\n~~~\nEnd\n";
    let extracted = extract_code_blocks(source).unwrap();

    assert_eq!(extracted.text(), "Intro\nCODE_BLOCK_00\nMiddle\nCODE_BLOCK_01\nEnd");
    assert_eq!(extracted.code_blocks[1], "~~~\nraw\n~~~");
}

#[test]
fn test_extract_withUnterminatedFence_shouldReportOpeningLine() {
    let result = extract_code_blocks("# Title\n\n```python\nprint(1)\n");
    assert_eq!(
        result,
        Err(DocumentError::UnterminatedFence { line: 3, captured: 2 })
    );
}

#[test]
fn test_extract_withPlaceholderInProse_shouldReportCollision() {
    let result = extract_code_blocks("Text\nSee CODE_BLOCK_00 below\n");
    assert_eq!(
        result,
        Err(DocumentError::PlaceholderCollision {
            line: 2,
            token: "CODE_BLOCK_00".to_string()
        })
    );
}

#[test]
fn test_restore_withMoreThanHundredBlocks_shouldRestoreAll() {
    let mut source = String::new();
    for i in 0..120 {
        source.push_str(&format!("Para {}\n```\nblock {}\n```\n", i, i));
    }

    let extracted = extract_code_blocks(&source).unwrap();
    assert_eq!(extracted.code_blocks.len(), 120);
    assert!(extracted.text().contains(&placeholder(119)));
    assert_eq!(placeholder(119), "CODE_BLOCK_119");
    assert_eq!(extracted.restore(&extracted.text()).unwrap(), source);
}

#[test]
fn test_restore_withDuplicatedPlaceholder_shouldFail() {
    let extracted = extract_code_blocks("a\n```\nx\n```\n").unwrap();
    let result = extracted.restore("a\nCODE_BLOCK_00\nCODE_BLOCK_00");

    assert_eq!(
        result,
        Err(DocumentError::PlaceholderMismatch {
            missing: vec![],
            duplicated: vec![0],
            unknown: vec![],
            altered: vec![],
        })
    );
}

#[test]
fn test_restore_withInventedPlaceholder_shouldFail() {
    let extracted = extract_code_blocks("a\n```\nx\n```\n").unwrap();
    let result = extracted.restore("a\nCODE_BLOCK_00\nCODE_BLOCK_05");

    assert!(matches!(
        result,
        Err(DocumentError::PlaceholderMismatch { ref unknown, .. }) if unknown == &vec![5]
    ));
}

#[test]
fn test_restore_withOverflowingPlaceholderIndex_shouldFail() {
    let extracted = extract_code_blocks("a\n```\nx\n```\n").unwrap();
    let result = extracted.restore("a\nCODE_BLOCK_00\nCODE_BLOCK_99999999999999999999999");

    assert!(matches!(
        result,
        Err(DocumentError::PlaceholderMismatch { ref altered, .. })
            if altered == &vec!["CODE_BLOCK_99999999999999999999999".to_string()]
    ));
}

#[test]
fn test_restore_withTrailingNewlineInReply_shouldNotDoubleIt() {
    let extracted = extract_code_blocks("# Title\n```py\nprint(1)\n```\n").unwrap();
    let restored = extracted.restore("# タイトル\nCODE_BLOCK_00\n").unwrap();
    assert_eq!(restored, "# タイトル\n```py\nprint(1)\n```\n");
}

#[test]
fn test_restore_withReflowedPlaceholder_shouldStillRestore() {
    let extracted = extract_code_blocks("a\n```\nx\n```\n").unwrap();
    let restored = extracted.restore("訳 a\n  CODE_BLOCK_00").unwrap();
    assert_eq!(restored, "訳 a\n  ```\nx\n```\n");
}

#[test]
fn test_chunker_withHeadings_shouldSplitOnceMinimumReached() {
    let lines: Vec<String> = "# A\none\ntwo\n# B\nthree\n## C\nfour"
        .split('\n')
        .map(str::to_string)
        .collect();

    let chunks = Chunker::new(3).split(&lines);

    assert_eq!(
        chunks,
        vec![
            "# A\none\ntwo".to_string(),
            "# B\nthree\n## C\nfour".to_string(),
        ]
    );
    assert_eq!(chunks.join("\n"), lines.join("\n"));
}

#[test]
fn test_chunker_withHashInsideFence_shouldNotSplit() {
    let lines: Vec<String> = "# A\ntext\n```bash\n# comment\n```\n# B\nend"
        .split('\n')
        .map(str::to_string)
        .collect();

    let chunks = Chunker::new(1).split(&lines);

    assert_eq!(
        chunks,
        vec![
            "# A\ntext\n```bash\n# comment\n```".to_string(),
            "# B\nend".to_string(),
        ]
    );
}

#[test]
fn test_chunker_withEmptyDocument_shouldReturnNoChunks() {
    assert!(Chunker::new(5).split(&[]).is_empty());
    assert!(Chunker::disabled().split(&[]).is_empty());
}
