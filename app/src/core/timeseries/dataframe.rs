use std::collections::BTreeMap;

use crate::core::time::{DailyTimeRange, DateTime, DateTimeRange};
use anyhow::ensure;

use super::DataPoint;

//Ordered by timestamp, one data point per timestamp (last one wins)
#[derive(Debug, Clone)]
pub struct DataFrame<T> {
    data: BTreeMap<DateTime, DataPoint<T>>,
}

impl<T> DataFrame<T> {
    pub fn new(values: impl IntoIterator<Item = DataPoint<T>>) -> anyhow::Result<Self> {
        let mut data = BTreeMap::new();
        for dp in values {
            data.insert(dp.timestamp, dp);
        }

        ensure!(!data.is_empty(), "data frames must not be empty");

        Ok(Self { data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn first(&self) -> &DataPoint<T> {
        self.data
            .first_key_value()
            .expect("Internal error: data frame should not be empty")
            .1
    }

    pub fn last(&self) -> &DataPoint<T> {
        self.data
            .last_key_value()
            .expect("Internal error: data frame should not be empty")
            .1
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataPoint<T>> {
        self.data.values()
    }

    pub fn within<'a>(&'a self, range: &'a DateTimeRange) -> impl Iterator<Item = &'a DataPoint<T>> + 'a {
        self.data
            .range(*range.start()..=*range.end())
            .map(|(_, dp)| dp)
    }
}

//Selection of data points by time of day, similar to a "between time" filter. Order is preserved.
pub fn between_time<'a, T: 'a>(
    data_points: impl IntoIterator<Item = &'a DataPoint<T>>,
    daily_range: &DailyTimeRange,
) -> Vec<&'a DataPoint<T>> {
    data_points
        .into_iter()
        .filter(|dp| daily_range.contains(dp.timestamp.time()))
        .collect()
}
