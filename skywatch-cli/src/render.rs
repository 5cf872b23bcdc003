use chrono::Local;
use skywatch_core::WeatherReport;
use std::fmt;

const NOT_RECOMMENDED: &str = "(Not recommended in current temperature)";

/// Plain-text weather card. The activity list is folded unless `expanded`.
pub struct Card<'a> {
    report: &'a WeatherReport,
    expanded: bool,
}

impl<'a> Card<'a> {
    pub fn new(report: &'a WeatherReport, expanded: bool) -> Self {
        Self { report, expanded }
    }
}

impl fmt::Display for Card<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;

        writeln!(f)?;
        writeln!(f, "{}  [{}]", r.location_name, r.icon)?;
        writeln!(f, "{:.0}°C  {}", r.temperature_c, r.description)?;
        writeln!(f)?;
        writeln!(f, "Wind Status: {}", r.wind_category)?;
        writeln!(f, "  {} m/s  {}", r.wind_speed_mps, r.wind_direction)?;
        writeln!(f, "Humidity: {}%", r.humidity_pct)?;
        writeln!(f, "Pressure: {:.0} hPa", r.pressure_hpa)?;
        writeln!(f, "Feels like: {:.0}°C", r.feels_like_c)?;
        let updated = r.observed_at.with_timezone(&Local).format("%H:%M");
        writeln!(f, "Updated {updated}")?;
        writeln!(f)?;

        let marker = if self.expanded { "v" } else { ">" };
        writeln!(f, "{marker} {}", r.activities.title)?;

        if self.expanded {
            for activity in &r.activities.activities {
                if activity.suitable {
                    writeln!(f, "    + {}", activity.name)?;
                } else {
                    writeln!(f, "    - {} {NOT_RECOMMENDED}", activity.name)?;
                }
            }
        }

        Ok(())
    }
}
