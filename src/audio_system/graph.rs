/// Synthesis graph
///
/// Owns every live voice and gain bus, plus the sample clock. Voices feed
/// buses, buses feed other buses, and the master bus feeds the device.
use std::collections::{BTreeMap, HashMap};

use super::voice::Voice;

/// Handle to a voice in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Handle to a gain bus in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusId(u64);

impl BusId {
    /// The master bus, present for the lifetime of the graph
    pub const MASTER: BusId = BusId(0);
}

// Bus chains are built by the engine and never deeper than two
const MAX_BUS_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Bus {
    gain: f32,
    /// `None` feeds the destination
    output: Option<BusId>,
}

#[derive(Debug)]
pub struct Graph {
    sample_rate: u32,
    frames: u64,
    next_id: u64,
    voices: BTreeMap<NodeId, Voice>,
    buses: HashMap<BusId, Bus>,
}

impl Graph {
    /// Create a graph with only the master bus, at unity gain
    pub fn new(sample_rate: u32) -> Self {
        let mut buses = HashMap::new();
        buses.insert(
            BusId::MASTER,
            Bus {
                gain: 1.0,
                output: None,
            },
        );
        Self {
            sample_rate: sample_rate.max(1),
            frames: 0,
            next_id: 1,
            voices: BTreeMap::new(),
            buses,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Clock position in seconds
    pub fn current_time(&self) -> f64 {
        self.frames as f64 / f64::from(self.sample_rate)
    }

    /// Add a bus at `gain` feeding `output`
    pub fn add_bus(&mut self, gain: f32, output: BusId) -> BusId {
        let id = BusId(self.allocate_id());
        self.buses.insert(
            id,
            Bus {
                gain,
                output: Some(output),
            },
        );
        id
    }

    /// Disconnect and drop a bus. The master bus cannot be removed.
    pub fn remove_bus(&mut self, id: BusId) -> bool {
        if id == BusId::MASTER {
            return false;
        }
        self.buses.remove(&id).is_some()
    }

    pub fn has_bus(&self, id: BusId) -> bool {
        self.buses.contains_key(&id)
    }

    pub fn set_bus_gain(&mut self, id: BusId, gain: f32) -> bool {
        match self.buses.get_mut(&id) {
            Some(bus) => {
                bus.gain = gain;
                true
            }
            None => false,
        }
    }

    pub fn bus_gain(&self, id: BusId) -> Option<f32> {
        self.buses.get(&id).map(|bus| bus.gain)
    }

    pub fn insert_voice(&mut self, voice: Voice) -> NodeId {
        let id = NodeId(self.allocate_id());
        self.voices.insert(id, voice);
        id
    }

    pub fn voice(&self, id: NodeId) -> Option<&Voice> {
        self.voices.get(&id)
    }

    pub fn contains_voice(&self, id: NodeId) -> bool {
        self.voices.contains_key(&id)
    }

    pub fn voice_ids(&self) -> Vec<NodeId> {
        self.voices.keys().copied().collect()
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Request a voice to stop at `when`.
    ///
    /// Returns `false` if the voice already finished and was released;
    /// that is not an error.
    pub fn stop_voice(&mut self, id: NodeId, when: f64) -> bool {
        match self.voices.get_mut(&id) {
            Some(voice) => {
                voice.stop_at(when);
                true
            }
            None => false,
        }
    }

    /// Remove a voice from the graph. Unknown ids return `false`.
    pub fn disconnect(&mut self, id: NodeId) -> bool {
        self.voices.remove(&id).is_some()
    }

    /// Mix every active voice into `out` (mono), advancing the clock one
    /// frame per sample. Voices past their stop time are released after
    /// the block.
    pub fn render(&mut self, out: &mut [f32]) {
        let gains: HashMap<BusId, f32> = self
            .buses
            .keys()
            .map(|&id| (id, self.chain_gain(id)))
            .collect();
        let dt = 1.0 / f64::from(self.sample_rate);

        for sample in out.iter_mut() {
            let time = self.current_time();
            let mut acc = 0.0f32;
            for voice in self.voices.values_mut() {
                let gain = gains.get(&voice.output()).copied().unwrap_or(0.0);
                acc += voice.render_sample(time, dt) * gain;
            }
            *sample = acc.clamp(-1.0, 1.0);
            self.frames += 1;
        }

        let now = self.current_time();
        let before = self.voices.len();
        self.voices.retain(|_, voice| !voice.is_finished(now));
        let released = before - self.voices.len();
        if released > 0 {
            tracing::trace!("Released {} finished voices at {:.3}s", released, now);
        }
    }

    /// Product of gains from `id` up to the destination. Zero if the chain
    /// is broken by a removed bus.
    fn chain_gain(&self, id: BusId) -> f32 {
        let mut gain = 1.0;
        let mut current = Some(id);
        for _ in 0..MAX_BUS_DEPTH {
            match current {
                None => return gain,
                Some(bus_id) => match self.buses.get(&bus_id) {
                    Some(bus) => {
                        gain *= bus.gain;
                        current = bus.output;
                    }
                    None => return 0.0,
                },
            }
        }
        0.0
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
