/// Age-keyed background music
///
/// Each pet age has a fixed four-note melody. A `MusicSession` keeps that
/// melody scheduled a fixed number of loops ahead of the clock, topping the
/// schedule up as the renderer advances, so it plays until stopped.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::effects::NoteFade;
use super::graph::{BusId, Graph, NodeId};
use super::voice::{Voice, Waveform};
use crate::error::AudioError;

/// Life stage of the pet, supplied by the game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetAge {
    Baby,
    Young,
    Adult,
    Elderly,
}

impl PetAge {
    pub const ALL: [PetAge; 4] = [PetAge::Baby, PetAge::Young, PetAge::Adult, PetAge::Elderly];

    pub fn as_str(&self) -> &'static str {
        match self {
            PetAge::Baby => "baby",
            PetAge::Young => "young",
            PetAge::Adult => "adult",
            PetAge::Elderly => "elderly",
        }
    }
}

impl fmt::Display for PetAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetAge {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PetAge::ALL
            .into_iter()
            .find(|age| age.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AudioError::UnknownAge(s.to_string()))
    }
}

/// Named pitches used by the melodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pitch {
    C4,
    D4,
    E4,
    F4,
    G4,
    A4,
    B4,
    C5,
    D5,
    E5,
    F5,
    G5,
    A5,
    B5,
}

impl Pitch {
    /// MIDI note number
    pub fn midi(&self) -> u8 {
        match self {
            Pitch::C4 => 60,
            Pitch::D4 => 62,
            Pitch::E4 => 64,
            Pitch::F4 => 65,
            Pitch::G4 => 67,
            Pitch::A4 => 69,
            Pitch::B4 => 71,
            Pitch::C5 => 72,
            Pitch::D5 => 74,
            Pitch::E5 => 76,
            Pitch::F5 => 77,
            Pitch::G5 => 79,
            Pitch::A5 => 81,
            Pitch::B5 => 83,
        }
    }

    /// Equal-temperament frequency in Hz (A4 = 440 Hz)
    pub fn frequency(&self) -> f32 {
        440.0 * 2f32.powf((f32::from(self.midi()) - 69.0) / 12.0)
    }
}

/// A four-note looping melody
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Melody {
    pub notes: [Pitch; 4],

    /// Seconds per note
    pub note_duration: f64,
}

impl Melody {
    pub fn for_age(age: PetAge) -> Self {
        match age {
            // playful
            PetAge::Baby => Self {
                notes: [Pitch::C5, Pitch::D5, Pitch::E5, Pitch::F5],
                note_duration: 0.6,
            },
            // energetic
            PetAge::Young => Self {
                notes: [Pitch::E5, Pitch::G5, Pitch::A5, Pitch::B5],
                note_duration: 0.8,
            },
            // balanced
            PetAge::Adult => Self {
                notes: [Pitch::G4, Pitch::A4, Pitch::B4, Pitch::C5],
                note_duration: 0.8,
            },
            // gentle
            PetAge::Elderly => Self {
                notes: [Pitch::C4, Pitch::D4, Pitch::E4, Pitch::F4],
                note_duration: 1.2,
            },
        }
    }

    /// Seconds for one pass through the melody
    pub fn length(&self) -> f64 {
        self.notes.len() as f64 * self.note_duration
    }
}

/// The currently playing background melody
#[derive(Debug)]
pub struct MusicSession {
    age: PetAge,
    bus: BusId,
    melody: Melody,
    fade: NoteFade,
    nodes: Vec<NodeId>,
    origin: f64,
    loops_scheduled: u64,
    lookahead_loops: u32,
}

impl MusicSession {
    /// Allocate a session bus at `gain` feeding master and schedule the
    /// first `lookahead_loops` passes of the melody starting now
    pub(crate) fn start(graph: &mut Graph, age: PetAge, gain: f32, lookahead_loops: u32) -> Self {
        let bus = graph.add_bus(gain, BusId::MASTER);
        let mut session = Self {
            age,
            bus,
            melody: Melody::for_age(age),
            fade: NoteFade::default(),
            nodes: Vec::new(),
            origin: graph.current_time(),
            loops_scheduled: 0,
            lookahead_loops: lookahead_loops.max(1),
        };
        session.top_up(graph);
        tracing::debug!(
            "Started {} music: {} loops, {} notes scheduled",
            age,
            session.loops_scheduled,
            session.nodes.len()
        );
        session
    }

    pub fn age(&self) -> PetAge {
        self.age
    }

    pub fn bus(&self) -> BusId {
        self.bus
    }

    pub fn melody(&self) -> &Melody {
        &self.melody
    }

    /// Voices currently retained by the session
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn loops_scheduled(&self) -> u64 {
        self.loops_scheduled
    }

    /// Context time up to which notes are scheduled
    pub fn scheduled_until(&self) -> f64 {
        self.loop_start(self.loops_scheduled)
    }

    /// Drop notes the graph already released and extend the schedule so it
    /// reaches `lookahead_loops` passes past the current time
    pub(crate) fn top_up(&mut self, graph: &mut Graph) {
        self.nodes.retain(|id| graph.contains_voice(*id));

        let horizon = graph.current_time() + f64::from(self.lookahead_loops) * self.melody.length();
        while self.scheduled_until() < horizon {
            self.schedule_loop(graph, self.loops_scheduled);
            self.loops_scheduled += 1;
        }
    }

    /// Stop and disconnect every retained voice, then release the bus
    pub(crate) fn teardown(self, graph: &mut Graph) {
        let now = graph.current_time();
        let mut released = 0usize;
        for id in &self.nodes {
            // Voices that already finished are gone from the graph
            if graph.stop_voice(*id, now) && graph.disconnect(*id) {
                released += 1;
            } else {
                tracing::trace!("Music voice {:?} already finished", id);
            }
        }
        graph.remove_bus(self.bus);
        tracing::debug!("Stopped {} music: released {} voices", self.age, released);
    }

    fn loop_start(&self, index: u64) -> f64 {
        self.origin + index as f64 * self.melody.length()
    }

    fn schedule_loop(&mut self, graph: &mut Graph, index: u64) {
        let loop_start = self.loop_start(index);
        let duration = self.melody.note_duration;

        for (i, pitch) in self.melody.notes.iter().enumerate() {
            let start = loop_start + i as f64 * duration;
            let mut voice = Voice::new(Waveform::Sine, start, start + duration, self.bus);
            voice.frequency_mut().set_value_at_time(pitch.frequency(), start);
            self.fade.apply(voice.envelope_mut(), start, duration);
            self.nodes.push(graph.insert_voice(voice));
        }
    }
}
