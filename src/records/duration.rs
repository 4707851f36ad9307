use crate::error::AttendanceResult;
use crate::records::time::TimeOfDay;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Working hours between a clock-in and a clock-out reading.
///
/// A clock-out earlier than the clock-in is read as a shift that crossed
/// midnight, so the result is always in `[0, 24)`. No rounding is applied.
pub fn working_hours(clock_in: TimeOfDay, clock_out: TimeOfDay) -> f64 {
    let mut delta = clock_out.minutes_since_midnight() - clock_in.minutes_since_midnight();
    if delta < 0.0 {
        delta += MINUTES_PER_DAY;
    }
    delta.max(0.0) / 60.0
}

/// Parse both readings and compute the hours between them
pub fn compute_working_hours(clock_in: &str, clock_out: &str) -> AttendanceResult<f64> {
    let clock_in: TimeOfDay = clock_in.parse()?;
    let clock_out: TimeOfDay = clock_out.parse()?;
    Ok(working_hours(clock_in, clock_out))
}
