use time::OffsetDateTime;

use crate::domain::Reading;

/// Readings for a single source, kept sorted by timestamp.
///
/// Equal timestamps stay in arrival order: a new reading is always placed
/// after every existing reading with the same timestamp.
#[derive(Debug, Default)]
pub(crate) struct Series {
    readings: Vec<Reading>,
}

impl Series {
    pub(crate) fn push(&mut self, reading: Reading) {
        match self.readings.last() {
            Some(last) if reading.timestamp < last.timestamp => {
                let idx = self
                    .readings
                    .partition_point(|r| r.timestamp <= reading.timestamp);
                self.readings.insert(idx, reading);
            }
            _ => self.readings.push(reading),
        }
    }

    pub(crate) fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Readings with `from <= timestamp <= to`. A `None` bound is open.
    pub(crate) fn range(
        &self,
        from: Option<OffsetDateTime>,
        to: Option<OffsetDateTime>,
    ) -> &[Reading] {
        let start = match from {
            Some(from) => self.readings.partition_point(|r| r.timestamp < from),
            None => 0,
        };
        let end = match to {
            Some(to) => self.readings.partition_point(|r| r.timestamp <= to),
            None => self.readings.len(),
        };

        if start >= end {
            &[]
        } else {
            &self.readings[start..end]
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.readings.len()
    }
}
