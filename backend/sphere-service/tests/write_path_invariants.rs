use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        if let Ok(read_dir) = fs::read_dir(&dir) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
                    files.push(path);
                }
            }
        }
    }
    files
}

fn src_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src")
}

#[test]
fn comment_delete_decrements_by_thread_size() {
    // Replies cascade away with their parent, so the fixed -1 decrement
    // would leave comment_count overstating the surviving rows. The
    // delete path must count the whole thread and subtract that.
    let source = fs::read_to_string(src_root().join("repository/comments.rs"))
        .expect("comments repository source");

    assert!(
        source.contains("WITH RECURSIVE"),
        "delete_comment must count the cascading reply tree"
    );
    assert!(
        source.contains("GREATEST(comment_count - $2, 0)"),
        "delete_comment must decrement by the counted thread size, clamped"
    );
    assert!(
        !source.contains("GREATEST(comment_count - 1, 0)"),
        "a fixed -1 decrement drifts the counter when replies cascade"
    );
}

#[test]
fn feed_refresh_never_fails_a_committed_write() {
    // Snapshot rebuilds run after the database write has committed; a
    // refresh failure is logged, never propagated with `?`, so a
    // durable write cannot surface as an error.
    let mut offenders = Vec::new();

    for file in collect_rs_files(&src_root()) {
        let source = fs::read_to_string(&file).unwrap_or_default();
        let mut search_from = 0;
        while let Some(pos) = source[search_from..].find(".refresh_for_post(") {
            let call_start = search_from + pos;
            let tail = &source[call_start..];
            if let Some(await_pos) = tail.find(".await") {
                let after = &tail[await_pos + ".await".len()..];
                if after.trim_start().starts_with('?') {
                    offenders.push(file.display().to_string());
                }
            }
            search_from = call_start + ".refresh_for_post(".len();
        }
    }

    assert!(
        offenders.is_empty(),
        "refresh_for_post call sites must log failures, not propagate them: {offenders:?}"
    );
}
