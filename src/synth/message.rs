#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::synth::voice::ClickSpec;

/// Control messages sent from the scheduling thread to the audio callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ClickMessage {
    /// Start a click at an absolute output frame.
    Schedule { at_frame: u64, click: ClickSpec },
    /// Drop pending clicks and cut every sounding voice.
    Silence,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ClickMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ClickMessage> {
    fn pop(&mut self) -> Option<ClickMessage> {
        Consumer::pop(self).ok()
    }
}
