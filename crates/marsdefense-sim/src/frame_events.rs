use marsdefense_core::events::{AudioEvent, CombatEvent};

/// Events raised during one frame, drained into the snapshot.
#[derive(Debug, Clone, Default)]
pub struct FrameEvents {
    pub combat: Vec<CombatEvent>,
    pub audio: Vec<AudioEvent>,
}

impl FrameEvents {
    pub fn combat(&mut self, event: CombatEvent) {
        self.combat.push(event);
    }

    pub fn audio(&mut self, event: AudioEvent) {
        self.audio.push(event);
    }

    /// Take everything raised so far, leaving the buffers empty.
    pub fn drain(&mut self) -> (Vec<CombatEvent>, Vec<AudioEvent>) {
        (
            std::mem::take(&mut self.combat),
            std::mem::take(&mut self.audio),
        )
    }
}
