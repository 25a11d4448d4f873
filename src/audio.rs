use garden_core::{
    AudioError, ContextState, Envelope, Instrument, InstrumentParams, Note, SoundPreferences,
    SynthBackend,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

// Per-voice peak before velocity; keeps a full triad below clipping
const VOICE_PEAK_GAIN: f32 = 0.28;
// Lead time so the first envelope point is never in the past
const SCHEDULE_LEAD_SEC: f64 = 0.005;
const DELAY_MAX_SEC: f64 = 2.0;

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &'static str,
) -> Result<web::GainNode, AudioError> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("[audio] {} GainNode error: {:?}", label, e);
            Err(AudioError::NodeCreation {
                node: label,
                detail: format!("{:?}", e),
            })
        }
    }
}

fn node_error(node: &'static str) -> impl Fn(wasm_bindgen::JsValue) -> AudioError {
    move |e| {
        log::error!("[audio] {} error: {:?}", node, e);
        AudioError::NodeCreation {
            node,
            detail: format!("{:?}", e),
        }
    }
}

/// Exponentially decaying noise, about -60dB at `decay_sec`. Seeded so each
/// channel gets its own deterministic tail.
pub fn fill_impulse(buf: &mut [f32], sample_rate: f32, decay_sec: f32, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let k = 6.9 / decay_sec.max(0.01);
    for (i, out) in buf.iter_mut().enumerate() {
        let n: f32 = rng.gen_range(-1.0..=1.0);
        let t = i as f32 / sample_rate;
        *out = n * (-t * k).exp();
    }
}

/// Effect chain: voices → delay → reverb → lowpass → master → breath →
/// destination, with a dry voices → lowpass path.
struct Graph {
    voice_bus: web::GainNode,
    delay: web::DelayNode,
    delay_feedback: web::GainNode,
    reverb: web::ConvolverNode,
    filter: web::BiquadFilterNode,
    master: web::GainNode,
    breath: web::GainNode,
    lfo: web::OscillatorNode,
    lfo_depth: web::GainNode,
}

impl Graph {
    fn build(
        ctx: &web::AudioContext,
        params: &InstrumentParams,
        initial_gain: f32,
    ) -> Result<Self, AudioError> {
        let voice_bus = create_gain(ctx, 1.0, "voice bus")?;

        let delay = ctx
            .create_delay_with_max_delay_time(DELAY_MAX_SEC)
            .map_err(node_error("DelayNode"))?;
        delay
            .delay_time()
            .set_value(params.delay_time_sec.clamp(0.0, DELAY_MAX_SEC as f32));
        let delay_feedback =
            create_gain(ctx, params.delay_feedback.clamp(0.0, 0.95), "delay feedback")?;

        let reverb = web::ConvolverNode::new(ctx).map_err(node_error("ConvolverNode"))?;
        reverb.set_normalize(true);
        let sr = ctx.sample_rate();
        let len = ((sr * params.reverb_decay_sec.max(0.1)) as u32).max(1);
        let ir = ctx.create_buffer(2, len, sr).map_err(node_error("AudioBuffer"))?;
        for ch in 0..2u32 {
            let mut buf = vec![0.0_f32; len as usize];
            let seed = 0x1234_ABCD_u64 + u64::from(ch);
            fill_impulse(&mut buf, sr, params.reverb_decay_sec, seed);
            _ = ir.copy_to_channel(&mut buf, ch as i32);
        }
        reverb.set_buffer(Some(&ir));

        let filter = web::BiquadFilterNode::new(ctx).map_err(node_error("BiquadFilterNode"))?;
        filter.set_type(web::BiquadFilterType::Lowpass);
        filter.frequency().set_value(params.filter_hz);

        let master = create_gain(ctx, initial_gain.clamp(0.0, 1.0), "master")?;

        // Breathing: breath.gain = center + lfo * amplitude, never above 1.
        let breath = create_gain(ctx, params.breathing.center(), "breath")?;
        let lfo = web::OscillatorNode::new(ctx).map_err(node_error("OscillatorNode"))?;
        lfo.set_type(web::OscillatorType::Sine);
        lfo.frequency().set_value(params.breathing.rate_hz);
        let lfo_depth = create_gain(ctx, params.breathing.amplitude(), "lfo depth")?;

        _ = voice_bus.connect_with_audio_node(&delay);
        _ = delay.connect_with_audio_node(&delay_feedback);
        _ = delay_feedback.connect_with_audio_node(&delay);
        _ = delay.connect_with_audio_node(&reverb);
        _ = reverb.connect_with_audio_node(&filter);
        _ = voice_bus.connect_with_audio_node(&filter);
        _ = filter.connect_with_audio_node(&master);
        _ = master.connect_with_audio_node(&breath);
        _ = breath.connect_with_audio_node(&ctx.destination());
        _ = lfo.connect_with_audio_node(&lfo_depth);
        _ = lfo_depth.connect_with_audio_param(&breath.gain());
        _ = lfo.start();

        Ok(Self {
            voice_bus,
            delay,
            delay_feedback,
            reverb,
            filter,
            master,
            breath,
            lfo,
            lfo_depth,
        })
    }

    fn disconnect_all(&self) {
        _ = self.lfo.stop();
        _ = self.lfo.disconnect();
        _ = self.lfo_depth.disconnect();
        _ = self.voice_bus.disconnect();
        _ = self.delay.disconnect();
        _ = self.delay_feedback.disconnect();
        _ = self.reverb.disconnect();
        _ = self.filter.disconnect();
        _ = self.master.disconnect();
        _ = self.breath.disconnect();
    }
}

/// WebAudio implementation of [`SynthBackend`].
pub struct WebSynth {
    ctx: web::AudioContext,
    graph: Option<Graph>,
    resuming: Rc<Cell<bool>>,
}

impl WebSynth {
    pub fn new(params: &InstrumentParams, initial_gain: f32) -> Result<Self, AudioError> {
        let ctx = web::AudioContext::new()
            .map_err(|e| AudioError::ContextUnavailable(format!("{:?}", e)))?;
        let graph = match Graph::build(&ctx, params, initial_gain) {
            Ok(g) => g,
            Err(e) => {
                _ = ctx.close();
                return Err(e);
            }
        };
        log::info!(
            "[audio] graph ready sr={} delay={:.3}s reverb={:.1}s",
            ctx.sample_rate(),
            params.delay_time_sec,
            params.reverb_decay_sec
        );
        Ok(Self {
            ctx,
            graph: Some(graph),
            resuming: Rc::new(Cell::new(false)),
        })
    }

    fn graph(&self) -> Result<&Graph, AudioError> {
        self.graph.as_ref().ok_or(AudioError::Disposed)
    }

    fn voice(
        &self,
        graph: &Graph,
        note: Note,
        peak: f32,
        t0: f64,
        duration: f64,
        env: &Envelope,
    ) -> Result<(), AudioError> {
        let osc = web::OscillatorNode::new(&self.ctx).map_err(node_error("OscillatorNode"))?;
        osc.set_type(web::OscillatorType::Triangle);
        osc.frequency().set_value(note.frequency_hz());
        let amp = create_gain(&self.ctx, 0.0, "voice")?;

        let attack_end = t0 + env.attack as f64;
        let decay_end = attack_end + env.decay as f64;
        let sustain = peak * env.sustain.clamp(0.0, 1.0);
        let release_start = (t0 + duration).max(attack_end);
        let release_end = release_start + env.release as f64;

        let g = amp.gain();
        _ = g.set_value_at_time(0.0, t0);
        _ = g.linear_ramp_to_value_at_time(peak, attack_end);
        if decay_end < release_start {
            _ = g.linear_ramp_to_value_at_time(sustain, decay_end);
            _ = g.set_value_at_time(sustain, release_start);
        }
        _ = g.linear_ramp_to_value_at_time(0.0, release_end);

        _ = osc.connect_with_audio_node(&amp);
        _ = amp.connect_with_audio_node(&graph.voice_bus);
        _ = osc.start_with_when(t0);
        _ = osc.stop_with_when(release_end + 0.05);
        Ok(())
    }
}

impl SynthBackend for WebSynth {
    fn context_state(&self) -> ContextState {
        if self.graph.is_none() {
            return ContextState::Closed;
        }
        match self.ctx.state() {
            web::AudioContextState::Running => ContextState::Running,
            web::AudioContextState::Closed => ContextState::Closed,
            _ if self.resuming.get() => ContextState::Resuming,
            _ => ContextState::Suspended,
        }
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        self.graph()?;
        let promise = self
            .ctx
            .resume()
            .map_err(|e| AudioError::ResumeRejected(format!("{:?}", e)))?;
        self.resuming.set(true);
        let resuming = self.resuming.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("[audio] resume rejected: {:?}", e);
            }
            resuming.set(false);
        });
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    fn trigger(
        &mut self,
        notes: &[Note],
        velocity: f32,
        duration_sec: f32,
        envelope: &Envelope,
    ) -> Result<(), AudioError> {
        let graph = self.graph()?;
        let t0 = self.ctx.current_time() + SCHEDULE_LEAD_SEC;
        let peak = VOICE_PEAK_GAIN * velocity.clamp(0.0, 1.0);
        for &note in notes {
            self.voice(graph, note, peak, t0, duration_sec as f64, envelope)?;
        }
        Ok(())
    }

    fn sweep_filter(
        &mut self,
        base_hz: f32,
        peak_hz: f32,
        duration_sec: f32,
    ) -> Result<(), AudioError> {
        let graph = self.graph()?;
        let now = self.ctx.current_time();
        let half = (duration_sec.max(0.0) * 0.5) as f64;
        let f = graph.filter.frequency();
        _ = f.cancel_scheduled_values(now);
        _ = f.set_value_at_time(base_hz, now);
        _ = f.linear_ramp_to_value_at_time(peak_hz, now + half);
        _ = f.linear_ramp_to_value_at_time(base_hz, now + half * 2.0);
        Ok(())
    }

    fn ramp_master(&mut self, from: f32, to: f32, duration_sec: f32) -> Result<(), AudioError> {
        let graph = self.graph()?;
        let now = self.ctx.current_time();
        let g = graph.master.gain();
        _ = g.cancel_scheduled_values(now);
        _ = g.set_value_at_time(from.clamp(0.0, 1.0), now);
        _ = g.linear_ramp_to_value_at_time(to.clamp(0.0, 1.0), now + duration_sec.max(0.0) as f64);
        Ok(())
    }

    fn dispose(&mut self) -> Result<(), AudioError> {
        let Some(graph) = self.graph.take() else {
            return Ok(());
        };
        graph.disconnect_all();
        self.ctx
            .close()
            .map(|_| ())
            .map_err(|e| AudioError::ContextUnavailable(format!("{:?}", e)))
    }
}

/// Instrument created on the first user gesture; browsers refuse to start
/// an `AudioContext` before one.
#[derive(Default)]
pub enum AudioSlot {
    #[default]
    Idle,
    Ready(Instrument<WebSynth>),
    Unavailable,
}

impl AudioSlot {
    pub fn instrument(&mut self, prefs: &SoundPreferences) -> Option<&mut Instrument<WebSynth>> {
        if let AudioSlot::Idle = self {
            let params = InstrumentParams::default();
            *self = match WebSynth::new(&params, prefs.effective_volume()) {
                Ok(synth) => AudioSlot::Ready(Instrument::new(synth, params, prefs)),
                Err(e) => {
                    log::error!("[audio] unavailable: {}", e);
                    AudioSlot::Unavailable
                }
            };
        }
        match self {
            AudioSlot::Ready(inst) => Some(inst),
            _ => None,
        }
    }

    /// The instrument if it already exists; never creates one.
    pub fn existing(&mut self) -> Option<&mut Instrument<WebSynth>> {
        match self {
            AudioSlot::Ready(inst) => Some(inst),
            _ => None,
        }
    }

    pub fn dispose(&mut self) {
        if let AudioSlot::Ready(inst) = self {
            inst.dispose();
        }
    }
}
