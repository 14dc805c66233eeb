mod common;

use common::*;
use img_compressor::{
    process, BatchConfig, BatchEvent, BatchOrchestrator, ExecutionMode, Logger, NullSink,
    TaskOutcome,
};
use std::fs;
use std::path::Path;

fn run(input: &Path, output: &Path, keep: bool, execution: ExecutionMode) -> Vec<BatchEvent> {
    let config = BatchConfig::new(input, output, 60, keep)
        .unwrap()
        .with_execution(execution);
    let mut events = Vec::new();
    BatchOrchestrator::new(config, Logger::silent())
        .run(&mut events)
        .unwrap();
    events
}

#[test]
fn test_scenario_mixed_tree() {
    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    let (a, b, c) = create_scenario_tree(&input);

    let mut logs = Vec::new();
    let mut warns = Vec::new();
    let mut errors = Vec::new();
    let processed = process(
        &input,
        &output,
        60,
        false,
        |m: &str| logs.push(m.to_string()),
        |m: &str| warns.push(m.to_string()),
        |m: &str| errors.push(m.to_string()),
    )
    .unwrap();

    assert_eq!(sorted(processed), sorted(vec![a.clone(), c.clone()]));

    // corrupt file: exactly one error, still on disk
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("b.jpg"));
    assert!(b.exists());
    assert!(warns.is_empty());

    assert!(is_valid_jpeg(&output.join("compressed_a.jpg")));
    assert!(is_valid_jpeg(&output.join("sub").join("compressed_c.jpg")));
    assert!(!output.join("compressed_b.jpg").exists());
    assert!(!a.exists());
    assert!(!c.exists());

    assert!(logs.iter().any(|m| m.starts_with("Removed original file")));
}

#[test]
fn test_rerun_with_keep_originals_skips_everything() {
    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    write_png(&input.join("one.png"), 40, 40);
    write_jpeg(&input.join("deep").join("two.jpg"), 40, 40);

    let first = run(&input, &output, true, ExecutionMode::default());
    let first_processed = first
        .iter()
        .filter(|e| matches!(e, BatchEvent::Outcome(o) if o.is_processed()))
        .count();
    assert_eq!(first_processed, 2);

    let before = fs::read(output.join("compressed_one.jpg")).unwrap();

    let second = run(&input, &output, true, ExecutionMode::default());
    let skipped: Vec<_> = second
        .iter()
        .filter_map(|e| match e {
            BatchEvent::Outcome(TaskOutcome::Skipped { reason, .. }) => Some(reason.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec!["destination already exists"; 2]);
    assert_eq!(
        second
            .iter()
            .filter(|e| matches!(e, BatchEvent::Skip { .. }))
            .count(),
        2
    );

    // prior output untouched
    assert_eq!(fs::read(output.join("compressed_one.jpg")).unwrap(), before);
}

#[test]
fn test_keep_originals_leaves_sources_byte_identical() {
    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    let source = input.join("photo.png");
    write_transparent_png(&source, 64, 64);
    let original_bytes = fs::read(&source).unwrap();

    let processed = process(&input, &output, 75, true, |_: &str| {}, |_: &str| {}, |_: &str| {})
        .unwrap();

    assert_eq!(processed.len(), 1);
    assert_eq!(fs::read(&source).unwrap(), original_bytes);
    assert!(is_valid_jpeg(&output.join("compressed_photo.jpg")));
}

#[test]
fn test_output_mirrors_input_structure() {
    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    write_png(&input.join("a").join("b").join("pic.png"), 30, 20);
    write_jpeg(&input.join("x").join("shot.JPG"), 30, 20);

    run(&input, &output, true, ExecutionMode::Sequential);

    let mirrored = output.join("a").join("b").join("compressed_pic.jpg");
    assert!(mirrored.is_file());
    assert!(is_valid_jpeg(&mirrored));
    assert!(output.join("x").join("compressed_shot.jpg").is_file());
}

#[test]
fn test_sequential_and_parallel_agree() {
    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("in");
    for i in 0..12 {
        write_png(&input.join(format!("dir{}", i % 3)).join(format!("img{}.png", i)), 24, 24);
    }
    write_corrupt(&input.join("dir1").join("bad.jpeg"));

    let collect = |output: &Path, execution: ExecutionMode| {
        let config = BatchConfig::new(&input, output, 50, true)
            .unwrap()
            .with_execution(execution);
        BatchOrchestrator::new(config, Logger::silent())
            .run(&mut NullSink)
            .unwrap()
    };

    let sequential = collect(temp_dir.path().join("seq").as_path(), ExecutionMode::Sequential);
    let parallel = collect(
        temp_dir.path().join("par").as_path(),
        ExecutionMode::Parallel { threads: Some(4) },
    );

    assert_eq!(sequential.processed.len(), 12);
    assert_eq!(sorted(sequential.processed), sorted(parallel.processed));
    assert_eq!(sequential.failed, 1);
    assert_eq!(parallel.failed, 1);
    assert_eq!(sequential.skipped, parallel.skipped);
}

#[test]
fn test_colliding_stems_produce_one_output() {
    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    write_png(&input.join("same.png"), 16, 16);
    write_jpeg(&input.join("same.jpg"), 16, 16);

    for (index, execution) in [
        ExecutionMode::Sequential,
        ExecutionMode::Parallel { threads: Some(2) },
    ]
    .into_iter()
    .enumerate()
    {
        let output = output.join(index.to_string());
        let config = BatchConfig::new(&input, &output, 60, true)
            .unwrap()
            .with_execution(execution);
        let result = BatchOrchestrator::new(config, Logger::silent())
            .run(&mut NullSink)
            .unwrap();

        assert_eq!(result.processed.len(), 1);
        assert_eq!(result.skipped, 1);
        assert!(is_valid_jpeg(&output.join("compressed_same.jpg")));
    }
}

#[test]
fn test_empty_input_returns_empty_result() {
    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("in");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("notes.txt"), "hi").unwrap();
    let output = temp_dir.path().join("out");

    let events = run(&input, &output, false, ExecutionMode::default());

    assert!(output.is_dir());
    assert!(events.iter().any(|e| matches!(e, BatchEvent::Started { total: 0 })));
    assert!(matches!(
        events.last(),
        Some(BatchEvent::Finished {
            processed: 0,
            skipped: 0,
            failed: 0
        })
    ));
}

#[test]
fn test_missing_input_directory_is_an_error() {
    let temp_dir = create_temp_directory();
    let result = process(
        temp_dir.path().join("nope"),
        temp_dir.path().join("out"),
        60,
        true,
        |_: &str| {},
        |_: &str| {},
        |_: &str| {},
    );

    assert!(result.is_err());
}

#[cfg(unix)]
#[test]
fn test_failed_deletion_keeps_processed_status() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("in");
    let locked = input.join("locked");
    let output = temp_dir.path().join("out");
    write_png(&locked.join("pic.png"), 20, 20);

    // read + execute only: files inside cannot be unlinked
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
    if fs::remove_file(locked.join("pic.png")).is_ok() {
        // running as root; permissions are not enforced
        return;
    }

    let mut errors = Vec::new();
    let processed = process(
        &input,
        &output,
        60,
        false,
        |_: &str| {},
        |_: &str| {},
        |m: &str| errors.push(m.to_string()),
    )
    .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(processed.len(), 1);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Failed to remove original file"));
    assert!(locked.join("pic.png").exists());
    assert!(is_valid_jpeg(&output.join("locked").join("compressed_pic.jpg")));
}
