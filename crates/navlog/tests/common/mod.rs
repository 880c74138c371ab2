use std::path::{Path, PathBuf};

use navlog_telemetry::LOG_HEADER;

/// Write a session log with one row per `(type, label, value)`
pub fn write_session(dir: &Path, name: &str, rows: &[(&str, &str, &str)]) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let mut text = LOG_HEADER.join(",");
    for (i, (event_type, label, value)) in rows.iter().enumerate() {
        text.push_str(&format!(
            "\n2025-03-04T09:{:02}:{:02}.000000,{event_type},{label},{value}",
            i / 60,
            i % 60
        ));
    }
    text.push('\n');
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

/// A session with `tts_start_latency_ms` samples and optionally a prewarm marker
pub fn tts_session(dir: &Path, name: &str, prewarm: bool, latencies: &[u32]) -> PathBuf {
    let values: Vec<String> = latencies.iter().map(|v| v.to_string()).collect();
    let mut rows: Vec<(&str, &str, &str)> = Vec::new();
    if prewarm {
        rows.push(("tts_prewarm_ms", "", "48"));
    }
    for (i, v) in values.iter().enumerate() {
        let label = if i % 2 == 0 { "step_1" } else { "step_2" };
        rows.push(("tts_start_latency_ms", label, v));
    }
    write_session(dir, name, &rows)
}

/// Three realistic sessions: two OFF, one ON, with every latency metric
pub fn sample_logs(dir: &Path) -> Vec<PathBuf> {
    vec![
        write_session(
            dir,
            "run_20250304_090000.csv",
            &[
                ("cold_start_ms", "", "1320"),
                ("battery_start_pct", "", "88"),
                ("click_start_nav", "", ""),
                ("warm_start_ms", "", "410"),
                ("click_next", "step_1", ""),
                ("tts_start_latency_ms", "step_1", "212"),
                ("tts_done_ms", "step_1", "1900"),
                ("click_next", "step_2", ""),
                ("tts_start_latency_ms", "step_2", "198"),
                ("click_reroute", "", ""),
                ("reroute_latency_ms", "reroute", "320"),
                ("arrived", "", ""),
                ("battery_end_pct", "", "86"),
            ],
        ),
        write_session(
            dir,
            "run_20250304_100000.csv",
            &[
                ("cold_start_ms", "", "1280"),
                ("settings_contrast", "", "high"),
                ("warm_start_ms", "", "390"),
                ("tts_start_latency_ms", "step_1", "230"),
                ("tts_start_latency_ms", "step_2", "205"),
                ("reroute_latency_ms", "reroute", "305"),
            ],
        ),
        write_session(
            dir,
            "run_20250304_110000.csv",
            &[
                ("cold_start_ms", "", "1190"),
                ("tts_prewarm_ms", "", "57"),
                ("warm_start_ms", "", "380"),
                ("tts_start_latency_ms", "step_1", "96"),
                ("tts_start_latency_ms", "step_2", "104"),
                ("tts_start_latency_ms", "step_3", "110"),
                ("reroute_latency_ms", "reroute", "311"),
            ],
        ),
    ]
}
