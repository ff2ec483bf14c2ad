//! Replaying adapter for the `Clock` port.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::Clock;

/// Replays recorded clock readings in order.
pub struct ReplayingClock {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClock {
    /// Creates a new replaying clock from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        let output = next_output(&self.replayer, "clock", "now");
        serde_json::from_value(output).expect("clock::now: failed to deserialize DateTime<Utc>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use serde_json::json;

    fn reading(seq: u64, ts: &str) -> Interaction {
        Interaction {
            seq,
            port: "clock".into(),
            method: "now".into(),
            input: json!(null),
            output: json!(ts),
        }
    }

    #[test]
    fn serves_readings_in_order() {
        let cassette = Cassette::new(
            "test",
            vec![reading(0, "2024-06-15T10:30:00Z"), reading(1, "2024-06-15T10:30:00.250Z")],
        );
        let clock = ReplayingClock::new(CassetteReplayer::new(&cassette));

        assert_eq!(clock.now_millis(), 1_718_447_400_000);
        assert_eq!(clock.now_millis(), 1_718_447_400_250);
    }
}
