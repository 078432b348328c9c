//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `dbtypes` linkage and start its file logger.
//! - Inspect every date given as an argument, one `key=value` line each.

use dbtypes::{core_version, default_log_level, init_logging, parse_date, DateResult};
use log::{info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "DBTYPES_LOG_DIR";

fn main() -> ExitCode {
    println!("dbtypes version={}", core_version());

    let dir = log_dir();
    match dir.to_str().map(|dir| init_logging(default_log_level(), dir)) {
        Some(Ok(())) => println!("logging level={} dir={}", default_log_level(), dir.display()),
        Some(Err(err)) => eprintln!("logging disabled error={err}"),
        None => eprintln!("logging disabled error=log dir is not UTF-8"),
    }

    let mut status = ExitCode::SUCCESS;
    for arg in std::env::args().skip(1) {
        match describe(&arg) {
            Ok(line) => {
                info!("event=date_inspect module=cli status=ok");
                println!("{line}");
            }
            Err(err) => {
                warn!("event=date_inspect module=cli status=error error={err}");
                eprintln!("input={arg} error={err}");
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}

/// `$DBTYPES_LOG_DIR` when set to an absolute path, else `<tmp>/dbtypes-cli`.
fn log_dir() -> PathBuf {
    std::env::var_os(LOG_DIR_ENV)
        .map(PathBuf::from)
        .filter(|dir| dir.is_absolute())
        .unwrap_or_else(|| std::env::temp_dir().join("dbtypes-cli"))
}

fn describe(arg: &str) -> DateResult<String> {
    let date = parse_date(arg)?;
    let json = date.to_json()?;
    Ok(format!(
        "input={arg} date={date} json={json} days_in_month={} days_in_year={}",
        date.days_in_month(),
        date.days_in_year()
    ))
}

#[cfg(test)]
mod tests {
    use super::{describe, log_dir};
    use dbtypes::{default_log_level, init_logging, logging_status};

    #[test]
    fn describe_reports_calendar_facts() {
        assert_eq!(
            describe("2024-02-10").unwrap(),
            "input=2024-02-10 date=2024-02-10 json=\"2024-02-10\" days_in_month=29 days_in_year=366"
        );
        assert!(describe("10/02/2024").is_err());
    }

    #[test]
    fn default_log_dir_starts_the_library_logger() {
        let dir = log_dir();
        assert!(dir.is_absolute());

        let dir_text = dir.to_str().expect("log dir should be UTF-8");
        init_logging(default_log_level(), dir_text).expect("logging should start");

        let (level, active_dir) = logging_status().expect("logging should be active");
        assert_eq!(level, default_log_level());
        assert_eq!(active_dir, dir);
    }
}
