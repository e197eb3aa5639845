use crate::errors::ConfigError;
use crate::numerical::curve_sampler::SampledCurve;
use chrono::Local;
use csv::Writer;
use log::info;
use simplelog::*;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Maps `debug | info | warn | error | off` to a level filter.
pub fn parse_level(loglevel: &str) -> Result<LevelFilter, ConfigError> {
    match loglevel.trim().to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        other => Err(ConfigError::InvalidValue {
            key: "loglevel".to_string(),
            value: other.to_string(),
        }),
    }
}

/// File name of a timestamped log, e.g. `log_2024-05-01_12-00-00.txt`.
pub fn log_file_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("log_{}.txt", date_and_time)
}

/// Terminal logger plus, when `log_dir` is given, a timestamped log file inside it.
/// Returns `Ok(false)` when a logger was already installed.
pub fn init_logger(loglevel: &str, log_dir: Option<&Path>) -> Result<bool, ConfigError> {
    let log_option = parse_level(loglevel)?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(dir) = log_dir {
        let path: PathBuf = dir.join(log_file_name());
        let file = File::create(&path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        loggers.push(WriteLogger::new(log_option, Config::default(), file));
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => {
            info!("logging initialised at level {}", log_option);
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}

/// Writes curves sampled on one grid as columns `x, name1, name2, ...`. Shorter curves leave
/// empty cells, gaps are written as `NaN`.
pub fn save_curves_to_csv(curves: &[(String, &SampledCurve)], filename: &Path) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    // Prepare and write headers
    let mut headers = vec!["x".to_string()];
    headers.extend(curves.iter().map(|(name, _)| name.clone()));
    writer.write_record(&headers)?;

    let rows = curves.iter().map(|(_, c)| c.len()).max().unwrap_or(0);
    for i in 0..rows {
        let x = curves
            .iter()
            .find_map(|(_, c)| c.points().get(i))
            .map(|p| p.x.to_string())
            .unwrap_or_default();
        let mut row_data = vec![x];
        row_data.extend(curves.iter().map(|(_, c)| {
            c.points()
                .get(i)
                .map(|p| p.y.to_string())
                .unwrap_or_default()
        }));
        writer.write_record(&row_data)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::domain::MathPoint;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Ok(LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Ok(LevelFilter::Warn));
        assert!(matches!(
            parse_level("verbose"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_init_logger_twice() {
        let dir = tempdir().unwrap();
        // the first call may lose the race against another test, either way a logger is set
        let _ = init_logger("error", Some(dir.path())).unwrap();
        assert!(!init_logger("error", None).unwrap());
        assert!(init_logger("loud", None).is_err());
    }

    #[test]
    fn test_save_curves_to_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("curves.csv");
        let f = SampledCurve::from_points(vec![
            MathPoint::new(0.0, 1.0),
            MathPoint::new(0.5, f64::NAN),
        ]);
        let g = SampledCurve::from_points(vec![MathPoint::new(0.0, 2.0)]);
        save_curves_to_csv(&[("f".to_string(), &f), ("g".to_string(), &g)], &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["x,f,g", "0,1,2", "0.5,NaN,"]);
    }
}
