//! Weekly practice rotation.

use std::fmt;

use chrono::{Datelike, Local, Weekday};

/// Practice routine assigned to a day.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Routine {
    A,
    B,
    C,
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Routine::A => "A",
            Routine::B => "B",
            Routine::C => "C",
        };
        f.write_str(name)
    }
}

/// Sunday is left for free play.
pub fn routine_for(day: Weekday) -> Option<Routine> {
    match day {
        Weekday::Mon | Weekday::Thu => Some(Routine::A),
        Weekday::Tue | Weekday::Fri => Some(Routine::B),
        Weekday::Wed | Weekday::Sat => Some(Routine::C),
        Weekday::Sun => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDay {
    pub day: Weekday,
    pub routine: Option<Routine>,
    pub is_today: bool,
}

impl ScheduleDay {
    /// Three-letter label, e.g. `Mon`.
    pub fn label(&self) -> String {
        self.day.to_string()
    }
}

/// The week starting on Sunday, flagging `today`.
pub fn week(today: Weekday) -> [ScheduleDay; 7] {
    let mut day = Weekday::Sun;
    std::array::from_fn(|_| {
        let entry = ScheduleDay {
            day,
            routine: routine_for(day),
            is_today: day == today,
        };
        day = day.succ();
        entry
    })
}

/// Today's weekday and routine in local time.
pub fn today() -> (Weekday, Option<Routine>) {
    let day = Local::now().weekday();
    (day, routine_for(day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_repeats_twice_a_week() {
        assert_eq!(routine_for(Weekday::Mon), Some(Routine::A));
        assert_eq!(routine_for(Weekday::Tue), Some(Routine::B));
        assert_eq!(routine_for(Weekday::Wed), Some(Routine::C));
        assert_eq!(routine_for(Weekday::Thu), Some(Routine::A));
        assert_eq!(routine_for(Weekday::Fri), Some(Routine::B));
        assert_eq!(routine_for(Weekday::Sat), Some(Routine::C));
        assert_eq!(routine_for(Weekday::Sun), None);
    }

    #[test]
    fn week_starts_on_sunday_and_marks_today() {
        let days = week(Weekday::Wed);
        assert_eq!(days[0].day, Weekday::Sun);
        assert_eq!(days[6].day, Weekday::Sat);
        assert_eq!(days[0].label(), "Sun");

        let today: Vec<_> = days.iter().filter(|d| d.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].day, Weekday::Wed);
        assert_eq!(today[0].routine, Some(Routine::C));
    }
}
