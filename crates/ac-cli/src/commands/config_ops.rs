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
pub(crate) use die;

pub fn settings_export() {
    print!("{}", ac_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(ac_core::settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: keys.accept={}, keys.dismiss={}, policy.restricted_surfaces={}, announce.enabled={}",
        s.keys.accept.len(),
        s.keys.dismiss.len(),
        s.policy.restricted_surfaces.len(),
        s.announce.enabled
    );
}
