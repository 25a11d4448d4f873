//! Instrument front-end over a pluggable synthesizer backend.
//!
//! [`Instrument`] owns the start-up lifecycle (audio contexts begin suspended
//! until a user gesture resumes them), the preference-driven master ramp and
//! teardown. The backend only knows how to make sound; the web frontend
//! implements it on top of WebAudio and tests substitute a recorder.

use crate::constants::{DEFAULT_BPM, DEFAULT_VELOCITY, VOLUME_RAMP_SEC};
use crate::gain::{Breathing, GainRamp};
use crate::music::{ChordRequest, Note, NoteLength};
use crate::prefs::SoundPreferences;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AudioError {
    #[error("audio context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("audio context resume rejected: {0}")]
    ResumeRejected(String),
    #[error("{node} creation failed: {detail}")]
    NodeCreation { node: &'static str, detail: String },
    #[error("audio engine is not running")]
    NotRunning,
    #[error("audio engine disposed")]
    Disposed,
}

/// State reported by the platform audio context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    /// A resume request is in flight.
    Resuming,
    Running,
    Closed,
}

/// Instrument lifecycle: `Uninitialized → Starting → Running`, with `Failed`
/// recoverable on the next gesture and `Disposed` terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Starting,
    Running,
    Failed,
    Disposed,
}

/// ADSR envelope applied to each oscillator voice (seconds / level).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.02,
            decay: 0.1,
            sustain: 0.3,
            release: 1.0,
        }
    }
}

/// Synth voicing and effect settings.
#[derive(Clone, Debug, PartialEq)]
pub struct InstrumentParams {
    pub bpm: f32,
    pub default_velocity: f32,
    pub envelope: Envelope,
    pub delay_time_sec: f32,
    pub delay_feedback: f32,
    pub reverb_decay_sec: f32,
    pub filter_hz: f32,
    pub filter_peak_hz: f32,
    pub filter_sweep_sec: f32,
    pub volume_ramp_sec: f32,
    pub breathing: Breathing,
}

impl Default for InstrumentParams {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            default_velocity: DEFAULT_VELOCITY,
            envelope: Envelope::default(),
            delay_time_sec: NoteLength::Eighth.seconds(DEFAULT_BPM),
            delay_feedback: 0.5,
            reverb_decay_sec: 2.5,
            filter_hz: 1000.0,
            filter_peak_hz: 3000.0,
            filter_sweep_sec: 0.2,
            volume_ramp_sec: VOLUME_RAMP_SEC,
            breathing: Breathing::default(),
        }
    }
}

/// Sound-producing half of the instrument.
pub trait SynthBackend {
    fn context_state(&self) -> ContextState;
    /// Ask the platform to start/resume audio. May complete asynchronously.
    fn resume(&mut self) -> Result<(), AudioError>;
    /// Current time on the audio clock, in seconds.
    fn current_time(&self) -> f64;
    fn trigger(
        &mut self,
        notes: &[Note],
        velocity: f32,
        duration_sec: f32,
        envelope: &Envelope,
    ) -> Result<(), AudioError>;
    /// Open the lowpass from `base_hz` to `peak_hz` and back within `duration_sec`.
    fn sweep_filter(&mut self, base_hz: f32, peak_hz: f32, duration_sec: f32)
        -> Result<(), AudioError>;
    /// Ramp the preference gain linearly from `from` to `to`.
    fn ramp_master(&mut self, from: f32, to: f32, duration_sec: f32) -> Result<(), AudioError>;
    /// Release every node. Must tolerate being called more than once.
    fn dispose(&mut self) -> Result<(), AudioError>;
}

pub struct Instrument<B: SynthBackend> {
    backend: B,
    params: InstrumentParams,
    state: EngineState,
    ramp: GainRamp,
}

impl<B: SynthBackend> Instrument<B> {
    pub fn new(backend: B, params: InstrumentParams, prefs: &SoundPreferences) -> Self {
        let ramp = GainRamp::new(prefs.effective_volume()).with_duration(params.volume_ramp_sec);
        Self {
            backend,
            params,
            state: EngineState::Uninitialized,
            ramp,
        }
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn params(&self) -> &InstrumentParams {
        &self.params
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Preference gain the master bus is heading to.
    pub fn target_gain(&self) -> f32 {
        self.ramp.target()
    }

    /// Preference gain at the backend's current time.
    pub fn current_gain(&self) -> f32 {
        self.ramp.value_at(self.backend.current_time())
    }

    /// Single entry point for starting audio. Safe to call on every gesture:
    /// a resume already in flight is not re-issued.
    pub fn ensure_started(&mut self) -> EngineState {
        match self.state {
            EngineState::Running | EngineState::Disposed => return self.state,
            EngineState::Starting => match self.backend.context_state() {
                ContextState::Running => {
                    self.state = EngineState::Running;
                    log::info!("[audio] context running");
                    return self.state;
                }
                ContextState::Resuming => return self.state,
                ContextState::Closed => {
                    self.state = EngineState::Failed;
                    log::warn!("[audio] context closed while starting");
                    return self.state;
                }
                ContextState::Suspended => {}
            },
            EngineState::Uninitialized | EngineState::Failed => {
                if self.backend.context_state() == ContextState::Running {
                    self.state = EngineState::Running;
                    return self.state;
                }
            }
        }

        match self.backend.resume() {
            Ok(()) => {
                self.state = if self.backend.context_state() == ContextState::Running {
                    EngineState::Running
                } else {
                    EngineState::Starting
                };
            }
            Err(e) => {
                log::error!("[audio] start failed: {}", e);
                self.state = EngineState::Failed;
            }
        }
        self.state
    }

    /// Play one note for an eighth and sweep the filter open and closed.
    pub fn play_note(&mut self, note: Note, velocity: Option<f32>) -> Result<(), AudioError> {
        let velocity = velocity.unwrap_or(self.params.default_velocity);
        if !self.play(&[note], velocity, NoteLength::Eighth)? {
            return Ok(());
        }
        self.backend.sweep_filter(
            self.params.filter_hz,
            self.params.filter_peak_hz,
            self.params.filter_sweep_sec,
        )
    }

    /// Play `notes` together for a quarter.
    pub fn play_chord(&mut self, notes: &[Note], velocity: Option<f32>) -> Result<(), AudioError> {
        let velocity = velocity.unwrap_or(self.params.default_velocity);
        self.play(notes, velocity, NoteLength::Quarter).map(|_| ())
    }

    pub fn play_request(&mut self, req: &ChordRequest) -> Result<(), AudioError> {
        self.play(&req.notes, req.velocity, req.length).map(|_| ())
    }

    // Ok(false) when nothing was triggered (no notes, or muted).
    fn play(
        &mut self,
        notes: &[Note],
        velocity: f32,
        length: NoteLength,
    ) -> Result<bool, AudioError> {
        match self.ensure_started() {
            EngineState::Disposed => return Err(AudioError::Disposed),
            EngineState::Failed | EngineState::Uninitialized => return Err(AudioError::NotRunning),
            // Starting: the backend schedules against the suspended clock and
            // the notes sound once the context resumes.
            EngineState::Starting | EngineState::Running => {}
        }
        if notes.is_empty() || self.ramp.target() <= 0.0 {
            return Ok(false);
        }
        let velocity = if velocity.is_finite() {
            velocity.clamp(0.0, 1.0)
        } else {
            self.params.default_velocity
        };
        let duration = length.seconds(self.params.bpm);
        self.backend
            .trigger(notes, velocity, duration, &self.params.envelope)?;
        Ok(true)
    }

    /// Follow a preference change with a smooth ramp on the master gain.
    pub fn apply_preferences(&mut self, prefs: &SoundPreferences) {
        if self.state == EngineState::Disposed {
            return;
        }
        let target = prefs.effective_volume();
        if (target - self.ramp.target()).abs() <= f32::EPSILON {
            return;
        }
        let now = self.backend.current_time();
        let from = self.ramp.retarget(target, now);
        if let Err(e) = self
            .backend
            .ramp_master(from, self.ramp.target(), self.ramp.duration())
        {
            log::warn!("[audio] master ramp failed: {}", e);
        }
    }

    /// Release the audio graph. Calling this again is a no-op.
    pub fn dispose(&mut self) {
        if self.state == EngineState::Disposed {
            return;
        }
        if let Err(e) = self.backend.dispose() {
            log::warn!("[audio] dispose: {}", e);
        }
        self.state = EngineState::Disposed;
        log::info!("[audio] disposed");
    }
}

impl<B: SynthBackend> Drop for Instrument<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
