use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

// match dates are local to the venue; no timezone is recorded
pub fn kickoff(match_date: &str, kick_off: Option<&str>) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(match_date, "%Y-%m-%d")
        .with_context(|| format!("bad match date {:?}", match_date))?;
    let time = match kick_off {
        Some(kick_off) => NaiveTime::parse_from_str(kick_off, "%H:%M:%S%.f")
            .with_context(|| format!("bad kick-off time {:?}", kick_off))?,
        None => NaiveTime::from_hms_opt(0, 0, 0).context("midnight out of range")?,
    };
    Ok(date.and_time(time))
}

#[cfg(test)]
#[test]
fn test_kickoff() {
    let date = NaiveDate::from_ymd_opt(2023, 8, 19).unwrap();
    let expected = date.and_hms_opt(15, 30, 0).unwrap();
    assert_eq!(kickoff("2023-08-19", Some("15:30:00.000")).unwrap(), expected);
    assert_eq!(kickoff("2023-08-19", Some("15:30:00")).unwrap(), expected);
    assert_eq!(
        kickoff("2023-08-19", None).unwrap(),
        date.and_hms_opt(0, 0, 0).unwrap()
    );
    assert!(kickoff("19/08/2023", None).is_err());
    assert!(kickoff("2023-08-19", Some("half three")).is_err());
}
