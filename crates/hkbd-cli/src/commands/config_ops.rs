use std::fs;

use hkbd_engine::settings;

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: suggest.max_suggestions={}, suggest.correction_mode={}, learning.promotion_threshold={}",
        s.suggest.max_suggestions, s.suggest.correction_mode, s.learning.promotion_threshold
    );
}
