use std::{
    fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use engine::Timeline;

fn unique_temp_json_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("invitation_engine_test_timeline_{nanos}.json"))
}

#[test]
fn timeline_save_and_load_roundtrips_frames() {
    let mut timeline = Timeline::new();
    timeline.record(Duration::ZERO, 1u8);
    timeline.record(Duration::from_millis(1500), 2u8);
    timeline.record(Duration::from_millis(1600), 2u8);

    let out = unique_temp_json_path();
    timeline.save_json_file(&out).expect("save timeline json");

    let loaded = Timeline::<u8>::load_json_file(&out).expect("load timeline json");
    assert_eq!(loaded.frames(), timeline.frames());
    assert_eq!(loaded.state_at(Duration::from_millis(1550)), Some(&2));

    let _ = fs::remove_file(out);
}

#[test]
fn loading_garbage_reports_invalid_data() {
    let out = unique_temp_json_path();
    fs::write(&out, "not json").expect("write temp file");

    let err = Timeline::<u8>::load_json_file(&out).expect_err("garbage should not parse");
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);

    let _ = fs::remove_file(out);
}
