use serde::{ser::SerializeMap, Serialize, Serializer};
use sqlx::FromRow;
use thiserror::Error;
use time::{OffsetDateTime, UtcOffset};

/// Caller-facing day index (0 = Sunday .. 6 = Saturday) to the internal
/// day number (1 = Sunday .. 7 = Saturday). Kept as a fixed table.
pub const DAY_NUMBERS: [u8; 7] = [1, 2, 3, 4, 5, 6, 7];

/// Day names indexed by `day_number - 1`.
pub const DAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeekdayError {
    #[error("week_number is required")]
    Missing,
    #[error("invalid week_number entry '{0}'")]
    Invalid(String),
}

/// Row shape the aggregator works on.
#[derive(Debug, Clone, FromRow)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub register_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedUser {
    pub name: String,
    pub email: String,
}

/// Parses `"0,3,6"` into internal day numbers, in request order, without duplicates.
pub fn parse_week_numbers(raw: Option<&str>) -> Result<Vec<u8>, WeekdayError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(WeekdayError::Missing)?;

    let mut days = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        let index: usize = entry
            .parse()
            .map_err(|_| WeekdayError::Invalid(entry.to_string()))?;
        let day = *DAY_NUMBERS
            .get(index)
            .ok_or_else(|| WeekdayError::Invalid(entry.to_string()))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

/// Day number (1 = Sunday .. 7 = Saturday) of a timestamp, evaluated in UTC.
pub fn day_number(at: OffsetDateTime) -> u8 {
    at.to_offset(UtcOffset::UTC).weekday().number_from_sunday()
}

pub fn day_name(day: u8) -> Option<&'static str> {
    DAY_NAMES.get(usize::from(day).checked_sub(1)?).copied()
}

/// Registrations bucketed per requested day. Serializes as a JSON object
/// keyed by day name, in the order the days were requested.
#[derive(Debug, Default)]
pub struct WeekdayListing {
    buckets: Vec<(u8, Vec<ListedUser>)>,
}

impl WeekdayListing {
    pub fn group<I>(days: &[u8], records: I) -> Self
    where
        I: IntoIterator<Item = Registration>,
    {
        let mut buckets: Vec<(u8, Vec<ListedUser>)> =
            days.iter().map(|&d| (d, Vec::new())).collect();

        for record in records {
            let day = day_number(record.register_at);
            if let Some((_, users)) = buckets.iter_mut().find(|(d, _)| *d == day) {
                users.push(ListedUser {
                    name: record.name,
                    email: record.email,
                });
            }
        }
        Self { buckets }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&[ListedUser]> {
        self.buckets
            .iter()
            .find(|(d, _)| day_name(*d) == Some(name))
            .map(|(_, users)| users.as_slice())
    }

    #[cfg(test)]
    pub fn day_names(&self) -> Vec<&'static str> {
        self.buckets.iter().filter_map(|(d, _)| day_name(*d)).collect()
    }
}

impl Serialize for WeekdayListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (day, users) in &self.buckets {
            if let Some(name) = day_name(*day) {
                map.serialize_entry(name, users)?;
            }
        }
        map.end()
    }
}
