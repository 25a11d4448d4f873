use garden_core::*;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Resume,
    Trigger { notes: Vec<u8>, velocity: f32, duration: f32 },
    Sweep,
    Ramp { from: f32, to: f32 },
    Dispose,
}

// Records backend calls; the context state is scripted by the test.
#[derive(Clone)]
struct FakeSynth {
    calls: Rc<RefCell<Vec<Call>>>,
    state: Rc<RefCell<ContextState>>,
    time: Rc<RefCell<f64>>,
    resume_result: Result<ContextState, AudioError>,
    fail_dispose_after_first: bool,
    disposed: bool,
}

impl FakeSynth {
    fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            state: Rc::new(RefCell::new(ContextState::Suspended)),
            time: Rc::new(RefCell::new(0.0)),
            resume_result: Ok(ContextState::Running),
            fail_dispose_after_first: true,
            disposed: false,
        }
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }
}

impl SynthBackend for FakeSynth {
    fn context_state(&self) -> ContextState {
        *self.state.borrow()
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        self.calls.borrow_mut().push(Call::Resume);
        match &self.resume_result {
            Ok(next) => {
                *self.state.borrow_mut() = *next;
                Ok(())
            }
            Err(e) => Err(e.clone()),
        }
    }

    fn current_time(&self) -> f64 {
        *self.time.borrow()
    }

    fn trigger(
        &mut self,
        notes: &[Note],
        velocity: f32,
        duration_sec: f32,
        _envelope: &Envelope,
    ) -> Result<(), AudioError> {
        self.calls.borrow_mut().push(Call::Trigger {
            notes: notes.iter().map(|n| n.midi()).collect(),
            velocity,
            duration: duration_sec,
        });
        Ok(())
    }

    fn sweep_filter(&mut self, _base: f32, _peak: f32, _dur: f32) -> Result<(), AudioError> {
        self.calls.borrow_mut().push(Call::Sweep);
        Ok(())
    }

    fn ramp_master(&mut self, from: f32, to: f32, _dur: f32) -> Result<(), AudioError> {
        self.calls.borrow_mut().push(Call::Ramp { from, to });
        Ok(())
    }

    fn dispose(&mut self) -> Result<(), AudioError> {
        self.calls.borrow_mut().push(Call::Dispose);
        if self.disposed && self.fail_dispose_after_first {
            return Err(AudioError::Disposed);
        }
        self.disposed = true;
        Ok(())
    }
}

fn make_instrument(synth: FakeSynth) -> Instrument<FakeSynth> {
    Instrument::new(synth, InstrumentParams::default(), &SoundPreferences::default())
}

#[test]
fn first_play_starts_the_context_once() {
    let synth = FakeSynth::new();
    let mut inst = make_instrument(synth.clone());
    assert_eq!(inst.state(), EngineState::Uninitialized);

    inst.play_chord(&triad_for_index(0), Some(0.5)).unwrap();
    inst.play_note(PENTATONIC_SCALE[3], None).unwrap();
    assert_eq!(inst.state(), EngineState::Running);
    assert_eq!(synth.count(|c| *c == Call::Resume), 1);
    assert_eq!(synth.count(|c| matches!(c, Call::Trigger { .. })), 2);
    assert_eq!(synth.count(|c| *c == Call::Sweep), 1);
}

#[test]
fn resume_in_flight_is_not_reissued() {
    let mut synth = FakeSynth::new();
    synth.resume_result = Ok(ContextState::Resuming);
    let mut inst = make_instrument(synth.clone());

    assert_eq!(inst.ensure_started(), EngineState::Starting);
    assert_eq!(inst.ensure_started(), EngineState::Starting);
    // Notes requested while starting are handed to the backend to queue.
    inst.play_chord(&triad_for_index(1), None).unwrap();
    assert_eq!(synth.count(|c| *c == Call::Resume), 1);
    assert_eq!(synth.count(|c| matches!(c, Call::Trigger { .. })), 1);

    *synth.state.borrow_mut() = ContextState::Running;
    assert_eq!(inst.ensure_started(), EngineState::Running);
}

#[test]
fn failed_start_is_contained_and_retried_on_next_gesture() {
    let mut synth = FakeSynth::new();
    synth.resume_result = Err(AudioError::ResumeRejected("no gesture".into()));
    let mut inst = make_instrument(synth.clone());

    assert_eq!(
        inst.play_chord(&triad_for_index(0), None),
        Err(AudioError::NotRunning)
    );
    assert_eq!(inst.state(), EngineState::Failed);
    assert_eq!(synth.count(|c| matches!(c, Call::Trigger { .. })), 0);

    inst.backend_mut().resume_result = Ok(ContextState::Running);
    assert!(inst.play_chord(&triad_for_index(0), None).is_ok());
    assert_eq!(inst.state(), EngineState::Running);
}

#[test]
fn chord_uses_quarter_and_note_uses_eighth() {
    let synth = FakeSynth::new();
    let mut inst = make_instrument(synth.clone());
    inst.play_request(&ChordRequest::triad(4)).unwrap();
    inst.play_note(PENTATONIC_SCALE[0], Some(2.0)).unwrap();
    let calls = synth.calls.borrow();
    let triggers: Vec<&Call> = calls
        .iter()
        .filter(|c| matches!(c, Call::Trigger { .. }))
        .collect();
    assert_eq!(
        *triggers[0],
        Call::Trigger {
            notes: vec![69, 74, 60],
            velocity: 0.5,
            duration: 0.5
        }
    );
    assert_eq!(
        *triggers[1],
        Call::Trigger {
            notes: vec![60],
            velocity: 1.0,
            duration: 0.25
        }
    );
}

#[test]
fn empty_chord_is_a_no_op() {
    let synth = FakeSynth::new();
    let mut inst = make_instrument(synth.clone());
    assert!(inst.play_chord(&[], None).is_ok());
    assert_eq!(synth.count(|c| matches!(c, Call::Trigger { .. })), 0);
}

#[test]
fn muted_preferences_skip_triggering() {
    let synth = FakeSynth::new();
    let mut inst = make_instrument(synth.clone());
    inst.apply_preferences(&SoundPreferences {
        sound_enabled: false,
        sound_volume: 0.8,
    });
    *synth.time.borrow_mut() = 1.0;
    inst.play_chord(&triad_for_index(0), None).unwrap();
    assert_eq!(synth.count(|c| matches!(c, Call::Trigger { .. })), 0);
}

#[test]
fn muted_note_does_not_sweep_the_filter() {
    let synth = FakeSynth::new();
    let mut inst = make_instrument(synth.clone());
    inst.apply_preferences(&SoundPreferences {
        sound_enabled: false,
        sound_volume: 0.8,
    });
    inst.play_note(PENTATONIC_SCALE[2], None).unwrap();
    assert_eq!(synth.count(|c| matches!(c, Call::Trigger { .. })), 0);
    assert_eq!(synth.count(|c| *c == Call::Sweep), 0);

    inst.apply_preferences(&SoundPreferences::default());
    inst.play_note(PENTATONIC_SCALE[2], None).unwrap();
    assert_eq!(synth.count(|c| *c == Call::Sweep), 1);
}

#[test]
fn preference_changes_ramp_from_current_value() {
    let synth = FakeSynth::new();
    let mut inst = make_instrument(synth.clone());
    assert!((inst.target_gain() - 0.5).abs() < 1e-6);

    inst.apply_preferences(&SoundPreferences {
        sound_enabled: true,
        sound_volume: 1.0,
    });
    // Halfway through a 250ms ramp, retarget to silence.
    *synth.time.borrow_mut() = 0.125;
    inst.apply_preferences(&SoundPreferences {
        sound_enabled: false,
        sound_volume: 1.0,
    });
    let ramps: Vec<Call> = synth
        .calls
        .borrow()
        .iter()
        .filter(|c| matches!(c, Call::Ramp { .. }))
        .cloned()
        .collect();
    assert_eq!(ramps.len(), 2);
    assert_eq!(ramps[0], Call::Ramp { from: 0.5, to: 1.0 });
    match ramps[1] {
        Call::Ramp { from, to } => {
            assert!((from - 0.75).abs() < 1e-4, "from={from}");
            assert_eq!(to, 0.0);
        }
        _ => unreachable!(),
    }
}

#[test]
fn ramp_is_monotonic_and_bounded() {
    for &enabled in &[true, false] {
        for step in 0..=10 {
            let v = step as f32 / 10.0;
            for &start in &[0.0f32, 0.3, 1.0] {
                let mut ramp = GainRamp::new(start);
                let target = preference_target(enabled, v);
                ramp.retarget(target, 0.0);
                let mut prev = ramp.value_at(0.0);
                for i in 1..=40 {
                    let g = ramp.value_at(i as f64 * 0.01);
                    assert!((0.0..=1.0).contains(&g));
                    if target >= start {
                        assert!(g >= prev - 1e-6);
                    } else {
                        assert!(g <= prev + 1e-6);
                    }
                    prev = g;
                }
                assert!((ramp.value_at(1.0) - target).abs() < 1e-6);
            }
        }
    }
}

#[test]
fn master_level_never_leaves_unit_range() {
    let ramp = GainRamp::new(1.0);
    let breathing = Breathing::default();
    for i in 0..2000 {
        let g = master_level(&ramp, &breathing, i as f64 * 0.1);
        assert!((0.0..=1.0).contains(&g));
    }
}

#[test]
fn dispose_twice_is_safe() {
    let synth = FakeSynth::new();
    let mut inst = make_instrument(synth.clone());
    inst.play_chord(&triad_for_index(0), None).unwrap();
    inst.dispose();
    inst.dispose();
    assert_eq!(inst.state(), EngineState::Disposed);
    assert_eq!(synth.count(|c| *c == Call::Dispose), 1);
    assert_eq!(
        inst.play_note(PENTATONIC_SCALE[0], None),
        Err(AudioError::Disposed)
    );
    drop(inst);
    assert_eq!(synth.count(|c| *c == Call::Dispose), 1);
}

#[test]
fn backend_dispose_errors_are_swallowed() {
    let mut synth = FakeSynth::new();
    synth.disposed = true;
    let mut inst = make_instrument(synth.clone());
    inst.dispose();
    assert_eq!(inst.state(), EngineState::Disposed);
}
