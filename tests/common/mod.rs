// Shared fakes for the host-side tests: a recording sample player and a
// recording drawing surface.

#![allow(dead_code)]

use etudio_core::{
    Envelope, InstrumentError, NoteId, OutputState, SamplePlayer, Surface, VoiceId, VoiceRequest,
};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

/// One voice the fake player was asked to start.
#[derive(Clone, Debug, PartialEq)]
pub struct StartedVoice {
    pub id: VoiceId,
    pub note: NoteId,
    pub sample_ref: String,
    pub hold_sec: f64,
    pub envelope: Envelope,
}

#[derive(Debug)]
pub struct PlayerLog {
    pub state: OutputState,
    pub unlock_fails: bool,
    /// When false, an unlock leaves a resume in flight and the output stays
    /// suspended until the test settles it, as a browser does.
    pub resume_settles: bool,
    pub resume_pending: bool,
    pub start_fails: bool,
    pub unlock_calls: usize,
    pub resume_requests: usize,
    pub started: Vec<StartedVoice>,
    pub master_gain: Option<f32>,
    pub dispose_calls: usize,
}

impl Default for PlayerLog {
    fn default() -> Self {
        Self {
            state: OutputState::Running,
            unlock_fails: false,
            resume_settles: true,
            resume_pending: false,
            start_fails: false,
            unlock_calls: 0,
            resume_requests: 0,
            started: Vec::new(),
            master_gain: None,
            dispose_calls: 0,
        }
    }
}

/// Records every call; the test keeps a second handle to the log.
pub struct FakePlayer {
    pub log: Rc<RefCell<PlayerLog>>,
    next_voice: VoiceId,
}

impl FakePlayer {
    pub fn new() -> (Self, Rc<RefCell<PlayerLog>>) {
        Self::with_state(OutputState::Running)
    }

    pub fn with_state(state: OutputState) -> (Self, Rc<RefCell<PlayerLog>>) {
        let log = Rc::new(RefCell::new(PlayerLog {
            state,
            ..PlayerLog::default()
        }));
        (
            Self {
                log: log.clone(),
                next_voice: 0,
            },
            log,
        )
    }
}

impl SamplePlayer for FakePlayer {
    fn output_state(&self) -> OutputState {
        self.log.borrow().state
    }

    fn unlock(&mut self) -> Result<(), InstrumentError> {
        let mut log = self.log.borrow_mut();
        log.unlock_calls += 1;
        if log.unlock_fails {
            return Err(InstrumentError::Unlock("gesture required".into()));
        }
        if log.resume_settles {
            log.state = OutputState::Running;
        } else if !log.resume_pending {
            log.resume_pending = true;
            log.resume_requests += 1;
        }
        Ok(())
    }

    fn start_voice(&mut self, request: &VoiceRequest<'_>) -> Result<VoiceId, InstrumentError> {
        let mut log = self.log.borrow_mut();
        if log.start_fails {
            return Err(InstrumentError::Playback("boom".into()));
        }
        if log.state == OutputState::Suspended && !log.resume_pending {
            return Err(InstrumentError::Unlock("no resume pending".into()));
        }
        self.next_voice += 1;
        log.started.push(StartedVoice {
            id: self.next_voice,
            note: request.note,
            sample_ref: request.sample_ref.to_string(),
            hold_sec: request.hold_sec,
            envelope: request.envelope,
        });
        Ok(self.next_voice)
    }

    fn set_master_gain(&mut self, gain: f32) {
        self.log.borrow_mut().master_gain = Some(gain);
    }

    fn dispose(&mut self) {
        let mut log = self.log.borrow_mut();
        log.dispose_calls += 1;
        log.state = OutputState::Closed;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Resize(u32, u32),
    Clear,
    Glyph(char, Vec2),
}

/// In-memory surface recording every operation.
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<SurfaceOp>,
    /// Fail every draw after this many glyphs.
    pub fail_after: Option<usize>,
    drawn: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            fail_after: None,
            drawn: 0,
        }
    }

    pub fn glyphs(&self) -> Vec<Vec2> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Glyph(_, at) => Some(*at),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), InstrumentError> {
        self.width = width;
        self.height = height;
        self.ops.push(SurfaceOp::Resize(width, height));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), InstrumentError> {
        self.ops.push(SurfaceOp::Clear);
        Ok(())
    }

    fn draw_glyph(
        &mut self,
        glyph: char,
        at: Vec2,
        _size: f32,
        _rotation: f32,
    ) -> Result<(), InstrumentError> {
        if self.fail_after.is_some_and(|n| self.drawn >= n) {
            return Err(InstrumentError::Surface("context lost".into()));
        }
        self.drawn += 1;
        self.ops.push(SurfaceOp::Glyph(glyph, at));
        Ok(())
    }
}
