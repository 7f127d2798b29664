use chrono::DateTime;

#[macro_export]
macro_rules! unit {
  ($name:expr, $($tail:tt)*) => {
    {
      log::info!("={}==================================================",$name);
      let now = std::time::Instant::now();
      let value = $($tail)*;
      log::info!("Done  `{}` ({} ms)", $name, now.elapsed().as_millis());
      log::info!("");
      value
    }
  };
}

#[macro_export]
macro_rules! unit_short {
  ($name:expr, $($tail:tt)*) => {
    {
      log::info!("* {}",$name);
      let now = std::time::Instant::now();
      let value = $($tail)*;
      log::info!("Done  `{}` ({} ms)", $name, now.elapsed().as_millis());
      value
    }
  };
}

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format an epoch timestamp (seconds) as a UTC date, sub-second part truncated.
pub fn format_date(created_utc: f64) -> Option<String> {
    if !created_utc.is_finite() {
        return None;
    }
    let datetime = DateTime::from_timestamp(created_utc.floor() as i64, 0)?;
    Some(datetime.format(DATE_FORMAT).to_string())
}
