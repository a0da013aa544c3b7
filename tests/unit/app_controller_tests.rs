/*!
 * Tests for the controller: orchestration, checkpointing and resume
 */

use anyhow::Result;
use reqtrans::app_config::Config;
use reqtrans::app_controller::Controller;
use reqtrans::file_utils::FileManager;

use crate::common;
use crate::common::mock_translators::MockTranslator;

fn test_config(batch_size: usize) -> Config {
    Config {
        batch_size,
        ..Config::default()
    }
}

/// Test that a full run produces one output line per input line, in order
#[tokio::test]
async fn test_run_withWorkingTranslator_shouldProduceLineForLineOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_requirements(&temp_dir.path().to_path_buf(), "in.txt", 10)?;
    let output = temp_dir.path().join("out.txt");

    let controller = Controller::new(test_config(4))?;
    let translator = MockTranslator::working();
    controller
        .run_with_translator(&translator, &input, &output, false)
        .await?;

    let out_lines = FileManager::read_lines(&output)?;
    assert_eq!(out_lines.len(), 10);
    for (i, line) in out_lines.iter().enumerate() {
        assert_eq!(
            line,
            &format!("[vi] The system shall perform requirement {}.", i + 1)
        );
    }
    // 10 lines with batch_size 4 -> 3 batches
    assert_eq!(translator.call_count(), 3);

    Ok(())
}

/// Test that resume skips already-translated lines and keeps them unchanged
#[tokio::test]
async fn test_run_withResumeAndPartialOutput_shouldOnlyTranslateRemainder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_requirements(&dir, "in.txt", 10)?;
    let output = common::create_test_file(&dir, "out.txt", "done 1\ndone 2\ndone 3\ndone 4\n")?;

    let controller = Controller::new(test_config(3))?;
    let translator = MockTranslator::working();
    controller
        .run_with_translator(&translator, &input, &output, true)
        .await?;

    let out_lines = FileManager::read_lines(&output)?;
    assert_eq!(out_lines.len(), 10);

    // The existing prefix is trusted and untouched
    for i in 0..4 {
        assert_eq!(out_lines[i], format!("done {}", i + 1));
    }
    // Only lines 5-10 were sent for translation
    for i in 4..10 {
        assert_eq!(
            out_lines[i],
            format!("[vi] The system shall perform requirement {}.", i + 1)
        );
    }
    let received: Vec<String> = translator.received_batches().into_iter().flatten().collect();
    assert_eq!(received.len(), 6);
    assert_eq!(received[0], "The system shall perform requirement 5.");

    Ok(())
}

/// Test that resuming a completed run performs zero translation calls
/// and leaves the output file unchanged
#[tokio::test]
async fn test_run_withResumeOnCompleteOutput_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_requirements(&dir, "in.txt", 5)?;
    let output = common::create_test_file(&dir, "out.txt", "a\nb\nc\nd\ne\n")?;
    let before = FileManager::read_lines(&output)?;

    let controller = Controller::new(test_config(2))?;
    let translator = MockTranslator::working();
    controller
        .run_with_translator(&translator, &input, &output, true)
        .await?;

    assert_eq!(translator.call_count(), 0);
    assert_eq!(FileManager::read_lines(&output)?, before);

    Ok(())
}

/// Test that without the resume flag an existing output file is replaced
#[tokio::test]
async fn test_run_withoutResumeFlag_shouldTranslateFromScratch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_requirements(&dir, "in.txt", 4)?;
    let output = common::create_test_file(&dir, "out.txt", "stale 1\nstale 2\n")?;

    let controller = Controller::new(test_config(2))?;
    let translator = MockTranslator::working();
    controller
        .run_with_translator(&translator, &input, &output, false)
        .await?;

    let out_lines = FileManager::read_lines(&output)?;
    assert_eq!(out_lines.len(), 4);
    assert!(out_lines.iter().all(|l| l.starts_with("[vi] ")));
    assert_eq!(translator.call_count(), 2);

    Ok(())
}

/// Test that a batch failing through all retries aborts the run and leaves
/// the output at the last successful checkpoint
#[tokio::test]
async fn test_run_withFailingSecondBatch_shouldKeepFirstCheckpoint() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_requirements(&dir, "in.txt", 6)?;
    let output = temp_dir.path().join("out.txt");

    let controller = Controller::new(test_config(2))?;
    let translator = MockTranslator::fail_after(1);
    let result = controller
        .run_with_translator(&translator, &input, &output, false)
        .await;

    assert!(result.is_err());
    // Only the first batch was checkpointed; nothing partial from the second
    let out_lines = FileManager::read_lines(&output)?;
    assert_eq!(out_lines.len(), 2);

    Ok(())
}

/// Test that a persistent size mismatch exhausts the retry budget and aborts
#[tokio::test]
async fn test_run_withPersistentSizeMismatch_shouldExhaustRetriesAndAbort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_requirements(&dir, "in.txt", 3)?;
    let output = temp_dir.path().join("out.txt");

    let controller = Controller::new(test_config(3))?;
    let translator = MockTranslator::short_reply(2);
    let result = controller
        .run_with_translator(&translator, &input, &output, false)
        .await;

    assert!(result.is_err());
    let message = format!("{}", result.unwrap_err());
    assert!(message.contains("Batch size mismatch"), "got: {}", message);
    // Both attempts of the retry budget were spent
    assert_eq!(translator.attempt_count(), 2);
    // The failing batch was never persisted
    assert!(!output.exists());

    Ok(())
}

/// Test that an all-blank input round-trips as blank lines with no remote work
#[tokio::test]
async fn test_run_withAllBlankInput_shouldPassThroughBlanks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&dir, "in.txt", "\n   \n\n")?;
    let output = temp_dir.path().join("out.txt");

    let controller = Controller::new(test_config(120))?;
    // A translator that fails on any real remote work: the blank bypass
    // must keep it from ever being exercised
    let translator = MockTranslator::new(common::mock_translators::MockBehavior::Failing);
    controller
        .run_with_translator(&translator, &input, &output, false)
        .await?;

    let out_lines = FileManager::read_lines(&output)?;
    assert_eq!(out_lines, vec![String::new(), String::new(), String::new()]);

    Ok(())
}

/// Test that a missing input file aborts before any output is written
#[tokio::test]
async fn test_run_withMissingInput_shouldFailWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("missing.txt");
    let output = temp_dir.path().join("out.txt");

    let controller = Controller::new(test_config(2))?;
    let translator = MockTranslator::working();
    let result = controller
        .run_with_translator(&translator, &input, &output, false)
        .await;

    assert!(result.is_err());
    assert!(!output.exists());

    Ok(())
}

/// Test that an empty input file completes with no batches and no output file
#[tokio::test]
async fn test_run_withEmptyInput_shouldCompleteWithoutWork() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&dir, "in.txt", "")?;
    let output = temp_dir.path().join("out.txt");

    let controller = Controller::new(test_config(2))?;
    let translator = MockTranslator::working();
    controller
        .run_with_translator(&translator, &input, &output, false)
        .await?;

    assert_eq!(translator.call_count(), 0);
    assert!(!output.exists());

    Ok(())
}
