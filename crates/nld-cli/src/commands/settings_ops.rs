use std::fs;
use std::process;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn settings_export() {
    print!("{}", nld_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        nld_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: trigger.phrase={:?}, trigger.trigger_happy={}, dates.locale={}, output.format={:?}",
        s.trigger.phrase, s.trigger.trigger_happy, s.dates.locale, s.output.format
    );
}
