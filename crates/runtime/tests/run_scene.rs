use std::path::PathBuf;
use std::process::Command;

fn scene_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tumble-{}-{name}.json", std::process::id()));
    std::fs::write(&path, contents).expect("write scene file");
    path
}

fn final_scene(output: &std::process::Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "tumble failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is the final scene")
}

#[test]
fn demo_scene_runs_to_completion() {
    let output = Command::new(env!("CARGO_BIN_EXE_tumble"))
        .output()
        .expect("run tumble");
    let scene = final_scene(&output);
    assert_eq!(scene["bodies"].as_array().map(Vec::len), Some(7));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Simulation step 500 complete"));
}

#[test]
fn scene_file_is_loaded_and_stepped() {
    let path = scene_file(
        "drop",
        r#"{
            "config": { "shuffle_seed": 3 },
            "steps": 20,
            "scene": {
                "bodies": [
                    { "shape": "wall", "material": 2, "corners": [
                        { "x": -2.0, "y": 0.0, "z": -2.0 }, { "x": 2.0, "y": 0.0, "z": -2.0 },
                        { "x": 2.0, "y": 0.0, "z": 2.0 }, { "x": -2.0, "y": 0.0, "z": 2.0 } ] },
                    { "shape": "sphere", "material": 0, "radius": 0.5,
                      "center": { "x": 0.0, "y": 5.0, "z": 0.0 } }
                ]
            }
        }"#,
    );
    let output = Command::new(env!("CARGO_BIN_EXE_tumble"))
        .arg(&path)
        .output()
        .expect("run tumble");
    let _ = std::fs::remove_file(&path);
    let scene = final_scene(&output);
    let ball = &scene["bodies"][1];
    assert_eq!(ball["shape"], "sphere");
    let y = ball["center"]["y"].as_f64().expect("sphere centre");
    // 20 steps of free fall from y = 5
    assert!(y < 5.0 && y > 4.0, "y = {y}");
    assert!(ball["velocity"]["y"].as_f64().unwrap() < 0.0);
}

#[test]
fn broken_scene_file_fails() {
    let path = scene_file("broken", r#"{ "scene": { "bodies": [ { "shape": "cone" } ] } }"#);
    let output = Command::new(env!("CARGO_BIN_EXE_tumble"))
        .arg(&path)
        .output()
        .expect("run tumble");
    let _ = std::fs::remove_file(&path);
    assert!(!output.status.success());
}
