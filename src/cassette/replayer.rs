//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Serves interactions from a loaded cassette in order, one queue per
/// `(port, method)` pair.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
    last_seq: HashMap<(String, String), u64>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues, last_seq: HashMap::new() }
    }

    /// Take the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair; the
    /// message lists what the cassette does contain.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());

        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };

        let Some(interaction) = queue.pop_front() else {
            panic!(
                "Cassette exhausted: every interaction for port={port:?} method={method:?} \
                 has been consumed. Last interaction was seq={}.",
                self.last_seq.get(&key).copied().unwrap_or_default()
            );
        };
        self.last_seq.insert(key, interaction.seq);
        interaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input: json!(null), output }
    }

    #[test]
    fn interleaved_ports_keep_independent_order() {
        let cassette = Cassette::new(
            "t",
            vec![
                interaction(0, "objects", "put", json!({"Ok": null})),
                interaction(1, "blobs", "delete", json!({"Err": "gone"})),
                interaction(2, "objects", "put", json!({"Err": "denied"})),
            ],
        );
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction("objects", "put").seq, 0);
        assert_eq!(replayer.next_interaction("objects", "put").seq, 2);
        assert_eq!(replayer.next_interaction("blobs", "delete").output, json!({"Err": "gone"}));
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_queue_panics() {
        let cassette = Cassette::new("t", vec![interaction(0, "mail", "send", json!({}))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("mail", "send");
        let _ = replayer.next_interaction("mail", "send");
    }

    #[test]
    #[should_panic(expected = "no interactions recorded")]
    fn unknown_port_panics() {
        let mut replayer = CassetteReplayer::new(&Cassette::new("t", vec![]));
        let _ = replayer.next_interaction("unknown", "method");
    }
}
