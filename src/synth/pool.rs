use crate::{
    synth::{
        message::{ClickMessage, MessageReceiver},
        voice::{ClickSpec, ClickVoice},
    },
    MAX_BLOCK_SIZE,
};

/// Polyphony limit. At 300 BPM a click lasts a quarter of the beat, so a
/// handful of voices covers any overlap.
pub const MAX_VOICES: usize = 8;
/// Clicks waiting for their start frame.
pub const MAX_PENDING: usize = 64;

#[derive(Debug, Clone, Copy)]
struct PendingClick {
    at_frame: u64,
    click: ClickSpec,
}

struct Slot {
    voice: ClickVoice,
    started_at: u64,
}

/// Fixed-size pool of click voices rendered frame-accurately.
///
/// Clicks are queued against an absolute frame counter. During `render`,
/// any click whose frame falls inside the block starts at that exact
/// offset, and clicks whose frame has already passed start at offset 0.
/// Nothing here allocates after construction.
pub struct VoicePool {
    voices: Vec<Option<Slot>>,
    pending: Vec<PendingClick>,
    temp_buffer: Vec<f32>,
    sample_rate: f32,
    next_seed: u64,
}

impl VoicePool {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: (0..MAX_VOICES).map(|_| None).collect(),
            pending: Vec::with_capacity(MAX_PENDING),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            sample_rate,
            next_seed: 0x5eed,
        }
    }

    /// Queue a click. Returns false if the pending queue is full.
    pub fn enqueue(&mut self, at_frame: u64, click: ClickSpec) -> bool {
        if self.pending.len() >= MAX_PENDING {
            return false;
        }
        self.pending.push(PendingClick { at_frame, click });
        true
    }

    /// Apply every message waiting in `rx`.
    pub fn drain<R: MessageReceiver>(&mut self, rx: &mut R) {
        while let Some(msg) = rx.pop() {
            match msg {
                ClickMessage::Schedule { at_frame, click } => {
                    self.enqueue(at_frame, click);
                }
                ClickMessage::Silence => self.silence(),
            }
        }
    }

    pub fn silence(&mut self) {
        self.pending.clear();
        self.voices.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn pending_clicks(&self) -> usize {
        self.pending.len()
    }

    /// Render one block whose first frame is `block_start`.
    ///
    /// Blocks longer than `MAX_BLOCK_SIZE` are rendered in chunks.
    pub fn render(&mut self, out: &mut [f32], block_start: u64) {
        let mut offset = 0;
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk, block_start + offset);
            offset += chunk.len() as u64;
        }
    }

    fn render_chunk(&mut self, out: &mut [f32], block_start: u64) {
        out.fill(0.0);
        let block_end = block_start + out.len() as u64;

        // Voices already sounding play from the top of the block
        for slot in self.voices.iter_mut() {
            if let Some(active) = slot {
                active.voice.render(out);
                if !active.voice.is_active() {
                    *slot = None;
                }
            }
        }

        let mut i = 0;
        while i < self.pending.len() {
            let PendingClick { at_frame, click } = self.pending[i];
            if at_frame >= block_end {
                i += 1;
                continue;
            }
            self.pending.swap_remove(i);

            let start = at_frame.saturating_sub(block_start) as usize;
            let seed = self.next_seed;
            self.next_seed = self.next_seed.wrapping_add(1);

            let mut voice = ClickVoice::new(click, self.sample_rate, seed);
            let tail = &mut self.temp_buffer[..out.len() - start];
            tail.fill(0.0);
            voice.render(tail);
            for (o, v) in out[start..].iter_mut().zip(tail.iter()) {
                *o += v;
            }

            if voice.is_active() {
                let idx = self.allocate_slot();
                self.voices[idx] = Some(Slot {
                    voice,
                    started_at: at_frame,
                });
            }
        }
    }

    fn allocate_slot(&self) -> usize {
        if let Some(idx) = self.voices.iter().position(|slot| slot.is_none()) {
            return idx;
        }

        // Pool is full: steal the oldest voice
        self.voices
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|s| (idx, s.started_at)))
            .min_by_key(|(_, started)| *started)
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    }
}
