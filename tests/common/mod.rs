#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use activity_predictor::{training, PredictionService, ServerConfig, TrainConfig};

pub const HEADER: &str = "heartbeat,position,activity,time_of_day,phone_status,surrounding_noise_level,\
companion_presence,is_in_safe_zone,location,panic_button_pressed,alert_triggered";

pub const ACTIVITIES: [&str; 4] = ["running", "sleeping", "trouble", "walking"];

/// Four well separated activity clusters, 30 rows each
pub fn dataset_csv() -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');

    for i in 0..30u32 {
        let j = f64::from(i % 6);
        // alternate 0/1 and True/False spellings
        let flag = |b: bool| -> &'static str {
            match (i % 2 == 0, b) {
                (true, true) => "1",
                (true, false) => "0",
                (false, true) => "True",
                (false, false) => "False",
            }
        };

        let rows = [
            (70.0 + j, "pocket", "walking", "morning", "locked", 28.0 + j, false, true, "park"),
            (140.0 + 2.0 * j, "hand", "running", "evening", "unlocked", 55.0 + 2.0 * j, true, true, "track"),
            (50.0 + j, "bag", "sleeping", "night", "locked", 3.0 + j, false, true, "home"),
            (130.0 + 5.0 * j, "hand", "trouble", "night", "in_call", 85.0 + 2.0 * j, false, false, "alley"),
        ];

        for (hb, position, activity, time, phone, noise, companion, safe, location) in rows {
            let panic = activity == "trouble";
            writeln!(
                csv,
                "{hb},{position},{activity},{time},{phone},{noise},{},{},{location},{},{}",
                flag(companion),
                flag(safe),
                flag(panic),
                flag(panic),
            )
            .unwrap();
        }
    }

    csv
}

pub fn write_dataset(dir: &Path) -> PathBuf {
    let path = dir.join("dataset.csv");
    fs::write(&path, dataset_csv()).unwrap();
    path
}

pub fn train_config(dir: &Path) -> TrainConfig {
    TrainConfig {
        dataset_path: dir.join("dataset.csv"),
        model_path: dir.join("model.json"),
        encoders_path: dir.join("label_encoders.json"),
        n_trees: 25,
        seed: 42,
        test_ratio: 0.2,
    }
}

/// Train on the synthetic dataset and load the resulting artifacts
pub fn trained_service(dir: &Path) -> (PredictionService, TrainConfig) {
    write_dataset(dir);
    let config = train_config(dir);
    training::run(&config).unwrap();

    let service = PredictionService::load(&config.model_path, &config.encoders_path).unwrap();
    (service, config)
}

pub fn server_config(dir: &Path) -> ServerConfig {
    let upload_dir = dir.join("uploaded_audios");
    fs::create_dir_all(&upload_dir).unwrap();

    ServerConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        model_path: dir.join("model.json"),
        encoders_path: dir.join("label_encoders.json"),
        upload_dir,
        max_upload_bytes: 1024 * 1024,
        environment: "test".to_string(),
    }
}

pub fn walking_request() -> serde_json::Value {
    serde_json::json!({
        "heartbeat": 72,
        "position": "pocket",
        "time_of_day": "morning",
        "phone_status": "locked",
        "surrounding_noise_level": 30,
        "companion_presence": 0,
        "is_in_safe_zone": 1
    })
}
