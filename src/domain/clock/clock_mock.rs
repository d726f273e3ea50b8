use chrono::{DateTime, Utc};

use crate::domain::clock::clock::Clock;

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone)]
pub struct MockClock {
    pub time: DateTime<Utc>,
}

impl MockClock {
    pub fn new(time: DateTime<Utc>) -> MockClock {
        MockClock { time }
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}
