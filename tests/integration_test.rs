// Integration tests for the PixelPet audio engine
// These drive the full engine over an offline context, no audio device needed

use std::collections::HashSet;

use pixelpet_audio::audio_system::{
    AudioContext, AudioEngine, BusId, NodeId, PetAge, UnmutePolicy, Waveform,
};
use pixelpet_audio::config::EngineConfig;

// Low rate keeps rendering cheap
const SAMPLE_RATE: u32 = 4000;

fn offline_engine() -> AudioEngine {
    AudioEngine::from_context(AudioContext::offline(SAMPLE_RATE), EngineConfig::default())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// Voices added to the graph since `before`
fn new_voices(engine: &AudioEngine, before: &[NodeId]) -> Vec<NodeId> {
    let before: HashSet<NodeId> = before.iter().copied().collect();
    engine
        .context()
        .unwrap()
        .voice_ids()
        .into_iter()
        .filter(|id| !before.contains(id))
        .collect()
}

#[test]
fn test_set_volume_clamps() {
    let engine = offline_engine();
    for (input, expected) in [
        (0.0, 0.0),
        (0.5, 0.5),
        (1.0, 1.0),
        (1.7, 1.0),
        (-0.2, 0.0),
        (f32::MAX, 1.0),
        (f32::NEG_INFINITY, 0.0),
    ] {
        engine.set_volume(input);
        assert_eq!(engine.volume(), expected, "set_volume({})", input);
    }
}

#[test]
fn test_unmute_restores_default_level() {
    let engine = offline_engine();
    engine.set_volume(0.9);

    engine.set_muted(true);
    assert_eq!(engine.volume(), 0.0);

    // Not the 0.9 set before muting
    engine.set_muted(false);
    assert_eq!(engine.volume(), 0.3);
}

#[test]
fn test_unmute_restore_previous_policy() {
    let config = EngineConfig {
        unmute: UnmutePolicy::RestorePrevious,
        ..EngineConfig::default()
    };
    let engine = AudioEngine::from_context(AudioContext::offline(SAMPLE_RATE), config);
    engine.set_volume(0.9);
    engine.set_muted(true);
    engine.set_muted(false);
    assert_eq!(engine.volume(), 0.9);
}

#[test]
fn test_same_age_twice_is_noop() {
    let engine = offline_engine();
    engine.play_age_music(PetAge::Baby);
    let first = engine.music_nodes();
    let voices = engine.context().unwrap().voice_ids().len();
    assert_eq!(first.len(), 44);

    engine.play_age_music(PetAge::Baby);
    assert_eq!(engine.music_nodes(), first);
    assert_eq!(engine.context().unwrap().voice_ids().len(), voices);
    assert_eq!(engine.current_music(), Some(PetAge::Baby));
}

#[test]
fn test_age_change_swaps_every_node() {
    let engine = offline_engine();
    engine.play_age_music(PetAge::Baby);
    let baby_nodes = engine.music_nodes();
    let baby_bus = engine.music_bus().unwrap();

    engine.play_age_music(PetAge::Young);
    let young_nodes = engine.music_nodes();
    let context = engine.context().unwrap();

    assert_eq!(engine.current_music(), Some(PetAge::Young));
    assert!(!context.has_bus(baby_bus));
    assert!(baby_nodes.iter().all(|id| context.voice(*id).is_none()));
    assert!(baby_nodes.iter().all(|id| !young_nodes.contains(id)));
    assert_eq!(context.voice_ids().len(), young_nodes.len());

    let young_bus = engine.music_bus().unwrap();
    for id in &young_nodes {
        assert_eq!(context.voice(*id).unwrap().output(), young_bus);
    }
}

#[test]
fn test_stop_music_without_session() {
    let engine = offline_engine();
    engine.set_volume(0.6);
    let time = engine.context().unwrap().current_time();

    engine.stop_music();
    engine.stop_music();

    assert_eq!(engine.volume(), 0.6);
    assert_eq!(engine.context().unwrap().current_time(), time);
    assert_eq!(engine.current_music(), None);
}

#[test]
fn test_stop_then_same_age_starts_fresh() {
    let engine = offline_engine();
    engine.play_age_music(PetAge::Adult);
    let before = engine.music_nodes();

    engine.stop_music();
    assert_eq!(engine.current_music(), None);
    assert_eq!(engine.music_node_count(), 0);
    assert!(engine.context().unwrap().voice_ids().is_empty());

    engine.play_age_music(PetAge::Adult);
    let after = engine.music_nodes();
    assert_eq!(engine.current_music(), Some(PetAge::Adult));
    assert_eq!(after.len(), before.len());
    assert!(after.iter().all(|id| !before.contains(id)));
}

#[test]
fn test_stop_after_some_notes_finished() {
    let engine = offline_engine();
    engine.play_age_music(PetAge::Baby);
    // Let the first two notes finish and be released
    engine.context().unwrap().render(SAMPLE_RATE as usize * 13 / 10);

    engine.stop_music();
    assert!(engine.context().unwrap().voice_ids().is_empty());
}

#[test]
fn test_meow_schedule() {
    let engine = offline_engine();
    let context = engine.context().unwrap();
    context.render(SAMPLE_RATE as usize); // now = 1.0s
    let now = context.current_time();

    engine.play_meow();
    let ids = new_voices(&engine, &[]);
    assert_eq!(ids.len(), 1);

    let voice = context.voice(ids[0]).unwrap();
    assert_eq!(voice.waveform(), Waveform::Sine);
    assert_eq!(voice.output(), BusId::MASTER);
    assert!(close(voice.start_time(), now));
    assert!(close(voice.stop_time(), now + 0.3));
    assert!((voice.frequency().value_at(now) - 350.0).abs() < 1e-3);
    assert!((voice.frequency().value_at(now + 0.3) - 200.0).abs() < 1e-3);
    assert!((voice.envelope().value_at(now) - 0.2).abs() < 1e-6);
    let tail = voice.envelope().value_at(now + 0.3);
    assert!(tail > 0.0 && tail < 0.2);
}

#[test]
fn test_beep_schedule() {
    let engine = offline_engine();
    let now = engine.context().unwrap().current_time();
    engine.play_beep();

    let ids = new_voices(&engine, &[]);
    assert_eq!(ids.len(), 1);
    let voice = engine.context().unwrap().voice(ids[0]).unwrap();
    assert!(close(voice.start_time(), now));
    assert!(close(voice.stop_time(), now + 0.1));
    assert_eq!(voice.frequency().value_at(now + 0.05), 800.0);
    assert!((voice.envelope().value_at(now) - 0.1).abs() < 1e-6);
}

#[test]
fn test_death_sound_schedule() {
    let engine = offline_engine();
    let context = engine.context().unwrap();
    context.render(SAMPLE_RATE as usize / 2); // now = 0.5s
    let now = context.current_time();

    engine.play_death_sound();
    let mut voices: Vec<_> = new_voices(&engine, &[])
        .into_iter()
        .map(|id| context.voice(id).unwrap())
        .collect();
    voices.sort_by(|a, b| a.start_time().total_cmp(&b.start_time()));
    assert_eq!(voices.len(), 2);

    let (fall, glitch) = (&voices[0], &voices[1]);
    assert_eq!(fall.waveform(), Waveform::Sine);
    assert!(close(fall.start_time(), now));
    assert!(close(fall.stop_time(), now + 1.5));
    assert!((fall.frequency().value_at(now) - 800.0).abs() < 1e-3);
    assert!((fall.frequency().value_at(now + 1.5) - 100.0).abs() < 1e-3);
    assert!((fall.envelope().value_at(now) - 0.25).abs() < 1e-6);

    assert_eq!(glitch.waveform(), Waveform::Square);
    assert!(close(glitch.start_time(), now + 1.5));
    assert!(close(glitch.stop_time(), now + 2.0));
    assert!((glitch.frequency().value_at(now + 1.5) - 200.0).abs() < 1e-3);
    assert!((glitch.frequency().value_at(now + 2.0) - 50.0).abs() < 1e-3);
    assert!((glitch.envelope().value_at(now + 1.5) - 0.1).abs() < 1e-6);
    assert!((glitch.envelope().value_at(now + 2.0) - 0.001).abs() < 1e-6);
}

#[test]
fn test_effects_do_not_touch_music() {
    let engine = offline_engine();
    engine.play_age_music(PetAge::Elderly);
    let music = engine.music_nodes();

    engine.play_meow();
    engine.play_death_sound();

    assert_eq!(engine.music_nodes(), music);
    assert_eq!(engine.current_music(), Some(PetAge::Elderly));
    assert_eq!(
        engine.context().unwrap().voice_ids().len(),
        music.len() + 3
    );
}

#[test]
fn test_effects_release_themselves() {
    let engine = offline_engine();
    engine.play_meow();
    engine.play_beep();
    engine.play_death_sound();
    assert_eq!(engine.context().unwrap().voice_ids().len(), 4);

    engine.context().unwrap().render(SAMPLE_RATE as usize * 21 / 10);
    assert!(engine.context().unwrap().voice_ids().is_empty());
}

#[test]
fn test_music_keeps_playing_past_initial_window() {
    let config = EngineConfig {
        lookahead_loops: 2,
        ..EngineConfig::default()
    };
    let engine = AudioEngine::from_context(AudioContext::offline(SAMPLE_RATE), config);
    engine.play_age_music(PetAge::Baby);

    // Two loops of 2.4s were scheduled up front; render 11s in blocks, the
    // way the device pulls them
    let block = SAMPLE_RATE as usize / 10;
    let mut out = Vec::new();
    for _ in 0..110 {
        out.extend(engine.context().unwrap().render(block));
    }
    let now = engine.context().unwrap().current_time();
    assert!(close(now, 11.0));

    // 10.9s-11.0s sits on the plateau of the third note of the fifth loop
    let tail = &out[out.len() - block..];
    assert!(tail.iter().any(|s| s.abs() > 0.0), "melody went silent");

    let context = engine.context().unwrap();
    let latest_stop = engine
        .music_nodes()
        .iter()
        .filter_map(|id| context.voice(*id))
        .map(|v| v.stop_time())
        .fold(0.0, f64::max);
    assert!(latest_stop > now + 2.4);
}

#[test]
fn test_music_is_quiet_under_master() {
    let engine = offline_engine();
    engine.set_volume(1.0);
    engine.play_age_music(PetAge::Young);

    let out = engine.context().unwrap().render(SAMPLE_RATE as usize);
    let peak = out.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(peak > 0.0);
    assert!(peak <= 0.05 + 1e-6);
}

#[test]
fn test_mute_silences_output() {
    let engine = offline_engine();
    engine.play_age_music(PetAge::Adult);
    engine.play_meow();
    engine.set_muted(true);

    let out = engine.context().unwrap().render(SAMPLE_RATE as usize / 4);
    assert!(out.iter().all(|s| *s == 0.0));
}

#[test]
fn test_degraded_engine_is_noop() {
    let engine = AudioEngine::degraded(EngineConfig::default());

    engine.play_meow();
    engine.play_beep();
    engine.play_boop();
    engine.play_death_sound();
    engine.play_age_music(PetAge::Baby);
    engine.play_age_music(PetAge::Baby);
    engine.stop_music();
    engine.set_volume(0.8);
    engine.set_muted(true);
    engine.set_muted(false);

    assert_eq!(engine.volume(), 0.0);
    assert_eq!(engine.current_music(), None);
    assert_eq!(engine.music_node_count(), 0);
    assert!(engine.context().is_none());
}

#[test]
fn test_default_construction_never_panics() {
    // Either a device opened or the engine degraded; both are valid here
    let engine = AudioEngine::new();
    let volume = engine.volume();
    assert!(volume == 0.0 || volume == 0.3);
    engine.stop_music();
}

#[test]
fn test_independent_engines() {
    let a = offline_engine();
    let b = offline_engine();
    a.play_age_music(PetAge::Baby);
    a.set_volume(0.1);

    assert_eq!(b.current_music(), None);
    assert_eq!(b.volume(), 0.3);
}
