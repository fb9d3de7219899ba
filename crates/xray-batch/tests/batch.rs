use std::path::{Path, PathBuf};
use std::time::Duration;

use xray_batch::{
    process_batch, process_single, sanitize_label, save_batch, save_results, BatchError, BatchTask,
};
use xray_enhance::{technique_labels, ORIGINAL_LABEL};
use xray_image::{Image, ImageSize};
use xray_io::png::write_image_png_mono8;

type TestResult = Result<(), Box<dyn std::error::Error>>;

// a synthetic radiograph: bright bone band over soft tissue with a vignette
fn write_phantom(path: &Path, width: usize, height: usize) -> TestResult {
    let data = (0..width * height)
        .map(|i| {
            let (x, y) = (i % width, i / width);
            let bone = if x > width / 3 && x < width / 2 {
                120
            } else {
                0
            };
            let tissue = 40 + (y * 60 / height.max(1));
            (bone + tissue + (i * 13) % 17).min(255) as u8
        })
        .collect();
    let image = Image::<u8, 1>::new(ImageSize { width, height }, data)?;
    write_image_png_mono8(path, &image)?;
    Ok(())
}

#[test]
fn process_single_runs_every_technique() -> TestResult {
    let tmp_dir = tempfile::tempdir()?;
    let path = tmp_dir.path().join("chest.png");
    write_phantom(&path, 48, 40)?;

    let result = process_single(&path).ok_or("chest.png should be processed")?;

    let mut expected = vec![ORIGINAL_LABEL.to_string()];
    expected.extend(technique_labels());
    assert_eq!(result.labels().collect::<Vec<_>>(), expected);

    for output in result.iter() {
        assert_eq!(output.image.size(), result.original().image.size());
        assert!(result.metrics(&output.label).is_some());
    }
    Ok(())
}

#[test]
fn process_single_skips_missing_and_corrupt_files() -> TestResult {
    let tmp_dir = tempfile::tempdir()?;
    assert!(process_single(tmp_dir.path().join("missing.png")).is_none());

    let corrupt = tmp_dir.path().join("corrupt.jpg");
    std::fs::write(&corrupt, b"\xff\xd8 truncated")?;
    assert!(process_single(&corrupt).is_none());
    Ok(())
}

#[test]
fn process_batch_drops_unreadable_paths() -> TestResult {
    let tmp_dir = tempfile::tempdir()?;
    let valid = tmp_dir.path().join("hand.png");
    write_phantom(&valid, 32, 32)?;
    let missing = tmp_dir.path().join("does-not-exist.png");

    let batch = process_batch(&[valid.clone(), missing]);

    assert_eq!(batch.len(), 1);
    let entry = batch.get("hand.png").ok_or("missing hand.png")?;
    assert_eq!(entry.path, valid);
    Ok(())
}

#[test]
fn process_batch_same_file_name_overwrites() -> TestResult {
    let tmp_dir = tempfile::tempdir()?;
    let first = tmp_dir.path().join("a").join("knee.png");
    let second = tmp_dir.path().join("b").join("knee.png");
    std::fs::create_dir_all(tmp_dir.path().join("a"))?;
    std::fs::create_dir_all(tmp_dir.path().join("b"))?;
    write_phantom(&first, 16, 16)?;
    write_phantom(&second, 24, 12)?;

    let batch = process_batch(&[first, second.clone()]);

    assert_eq!(batch.len(), 1);
    let entry = batch.get("knee.png").ok_or("missing knee.png")?;
    assert_eq!(entry.path, second);
    assert_eq!(entry.result.original().image.size().width, 24);
    Ok(())
}

#[test]
fn save_results_writes_one_file_per_label() -> TestResult {
    let tmp_dir = tempfile::tempdir()?;
    let path = tmp_dir.path().join("spine.png");
    write_phantom(&path, 40, 30)?;
    let result = process_single(&path).ok_or("spine.png should be processed")?;

    let output_dir = tmp_dir.path().join("out").join("nested");
    assert!(!output_dir.exists());

    let written = save_results(&result, &output_dir, "spine")?;
    assert_eq!(written, 8);

    let mut files: Vec<String> = std::fs::read_dir(&output_dir)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    files.sort();
    assert_eq!(files.len(), 8);

    for file in &files {
        let stem = file.strip_suffix(".png").ok_or("png suffix")?;
        let label = stem.strip_prefix("spine_").ok_or("name prefix")?;
        assert!(label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    for label in result.labels() {
        let file = output_dir.join(format!("spine_{}.png", sanitize_label(label)));
        let back = xray_io::png::read_image_png_mono8(&file)?;
        assert_eq!(Some(&back), result.image(label));
    }

    // saving again into the existing directory is fine
    assert_eq!(save_results(&result, &output_dir, "spine")?, 8);
    Ok(())
}

#[test]
fn save_results_reports_unwritable_directory() -> TestResult {
    let tmp_dir = tempfile::tempdir()?;
    let path = tmp_dir.path().join("skull.png");
    write_phantom(&path, 8, 8)?;
    let result = process_single(&path).ok_or("skull.png should be processed")?;

    // a regular file where the directory should go
    let blocker = tmp_dir.path().join("blocker");
    std::fs::write(&blocker, b"")?;

    let res = save_results(&result, &blocker, "skull");
    assert!(matches!(res, Err(BatchError::Save { .. })));
    Ok(())
}

#[test]
fn save_results_keeps_files_written_before_a_failure() -> TestResult {
    let tmp_dir = tempfile::tempdir()?;
    let path = tmp_dir.path().join("ankle.png");
    write_phantom(&path, 12, 12)?;
    let result = process_single(&path).ok_or("ankle.png not processed")?;

    // a directory sitting where the third output file goes
    let output_dir = tmp_dir.path().join("out");
    let blocked = output_dir.join("ankle_CLAHE__clip_2_0__grid_8x8_.png");
    std::fs::create_dir_all(&blocked)?;

    match save_results(&result, &output_dir, "ankle") {
        Err(BatchError::Save { path, .. }) => assert_eq!(path, blocked),
        other => panic!("expected a save error, got {other:?}"),
    }

    assert!(output_dir.join("ankle_original.png").is_file());
    assert!(output_dir.join("ankle_Histogram_Equalization.png").is_file());
    assert!(!output_dir.join("ankle_Median_Filter__5x5_.png").exists());
    Ok(())
}

#[test]
fn save_batch_writes_every_image() -> TestResult {
    let tmp_dir = tempfile::tempdir()?;
    let paths: Vec<PathBuf> = ["left.png", "right.png"]
        .iter()
        .map(|name| tmp_dir.path().join(name))
        .collect();
    for path in &paths {
        write_phantom(path, 20, 20)?;
    }

    let batch = process_batch(&paths);
    let output_dir = tmp_dir.path().join("results");
    assert_eq!(save_batch(&batch, &output_dir)?, 16);
    assert!(output_dir.join("left.png_original.png").exists());
    assert!(output_dir
        .join("right.png_Median_Filter__5x5_.png")
        .exists());
    Ok(())
}

#[test]
fn batch_task_delivers_the_batch() -> TestResult {
    let tmp_dir = tempfile::tempdir()?;
    let valid = tmp_dir.path().join("pelvis.png");
    write_phantom(&valid, 30, 20)?;
    let paths = vec![valid, tmp_dir.path().join("nope.png")];

    let expected = process_batch(&paths);
    let batch = BatchTask::spawn(paths).wait()?;
    assert_eq!(batch, expected);
    Ok(())
}

#[test]
fn batch_task_can_be_polled() -> TestResult {
    let tmp_dir = tempfile::tempdir()?;
    let path = tmp_dir.path().join("foot.png");
    write_phantom(&path, 16, 16)?;

    let mut task = BatchTask::spawn(vec![path]);
    let batch = loop {
        if let Some(res) = task.try_wait() {
            break res?;
        }
        std::thread::sleep(Duration::from_millis(5));
    };
    assert_eq!(batch.len(), 1);

    // the single completion message has been consumed
    assert!(matches!(
        task.try_wait(),
        Some(Err(BatchError::WorkerDisconnected))
    ));
    Ok(())
}
