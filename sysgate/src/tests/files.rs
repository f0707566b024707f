// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use crate::{files::COPY_CHUNK_SIZE, fs_test};

fs_test!(copies_across_chunks, |fs, log, scratch| {
    let contents: Vec<u8> = (0..COPY_CHUNK_SIZE * 2 + 123)
        .map(|i| (i % 251) as u8)
        .collect();
    std::fs::write(scratch.path("src"), &contents).unwrap();

    let src = scratch.c_path("src");
    let dst = scratch.c_path("dst");
    assert_eq!(fs.copy_file(&src, &dst), 0);
    assert_eq!(std::fs::read(scratch.path("dst")).unwrap(), contents);

    let lines = log.take();
    assert_eq!(
        lines.last().unwrap(),
        &format!(
            "[INFO][syscall-wrapper] File copied successfully: {} -> {}",
            src.to_string_lossy(),
            dst.to_string_lossy()
        )
    );
    assert_eq!(
        lines.iter().filter(|l| l.contains("close success")).count(),
        2
    );
});

fs_test!(copy_truncates_destination, |fs, _log, scratch| {
    std::fs::write(scratch.path("src"), b"short").unwrap();
    std::fs::write(scratch.path("dst"), b"a much longer previous body").unwrap();

    assert_eq!(fs.copy_file(&scratch.c_path("src"), &scratch.c_path("dst")), 0);
    assert_eq!(std::fs::read(scratch.path("dst")).unwrap(), b"short");
});

fs_test!(copy_empty_file, |fs, _log, scratch| {
    std::fs::write(scratch.path("src"), b"").unwrap();

    assert_eq!(fs.copy_file(&scratch.c_path("src"), &scratch.c_path("dst")), 0);
    assert_eq!(std::fs::metadata(scratch.path("dst")).unwrap().len(), 0);
});

fs_test!(copy_missing_source, |fs, log, scratch| {
    let src = scratch.c_path("nope");
    assert_eq!(fs.copy_file(&src, &scratch.c_path("dst")), -1);
    assert!(!scratch.path("dst").exists());

    let lines = log.take();
    assert_eq!(
        lines.last().unwrap(),
        &format!(
            "[ERROR][syscall-wrapper] Failed to open source file: {}",
            src.to_string_lossy()
        )
    );
});

fs_test!(copy_into_missing_directory, |fs, log, scratch| {
    std::fs::write(scratch.path("src"), b"data").unwrap();

    let dst = scratch.c_path("no/such/dir/dst");
    assert_eq!(fs.copy_file(&scratch.c_path("src"), &dst), -1);

    let lines = log.take();
    assert!(lines.contains(&format!(
        "[ERROR][syscall-wrapper] Failed to open destination file: {}",
        dst.to_string_lossy()
    )));
    // The source descriptor is still released.
    assert!(lines.last().unwrap().contains("close success"));
});

fs_test!(copy_write_failure_closes_both, |fs, log, scratch| {
    if !std::path::Path::new("/dev/full").exists() {
        return;
    }
    std::fs::write(scratch.path("src"), b"will not fit").unwrap();

    let dst = c"/dev/full";
    assert_eq!(fs.copy_file(&scratch.c_path("src"), dst), -1);

    let lines = log.take();
    assert!(lines.contains(&String::from(
        "[ERROR][syscall-wrapper] Failed to write to destination file: /dev/full"
    )));
    assert_eq!(
        lines.iter().filter(|l| l.contains("close success")).count(),
        2
    );
});

fs_test!(copy_read_failure, |fs, log, scratch| {
    // Opening a directory read-only works; reading from it fails with EISDIR.
    std::fs::create_dir(scratch.path("dir")).unwrap();

    let src = scratch.c_path("dir");
    assert_eq!(fs.copy_file(&src, &scratch.c_path("dst")), -1);

    let lines = log.take();
    assert_eq!(
        lines.last().unwrap(),
        &format!(
            "[ERROR][syscall-wrapper] Failed to read from source file: {}",
            src.to_string_lossy()
        )
    );
    assert_eq!(
        lines.iter().filter(|l| l.contains("close success")).count(),
        2
    );
});

fs_test!(exists_and_size, |fs, _log, scratch| {
    std::fs::write(scratch.path("five"), b"12345").unwrap();

    assert!(fs.file_exists(&scratch.c_path("five")));
    assert_eq!(fs.file_size(&scratch.c_path("five")), 5);

    assert!(!fs.file_exists(&scratch.c_path("absent")));
    assert_eq!(fs.file_size(&scratch.c_path("absent")), 0);

    assert!(fs.file_exists(c"/"));
});
