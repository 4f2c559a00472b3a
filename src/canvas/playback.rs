//! Command log and VCR-style playback
//!
//! Every painting action is a [`DrawCommand`]. Live input executes a command
//! and appends it to the log; playback clears the image and re-executes the
//! log from the start. Commands cannot be undone, so seeking backwards restarts
//! from a blank canvas.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::Canvas;
use crate::command::DrawCommand;
use crate::core::contracts::CommandBuffer;
use crate::drw::{self, DrwHeader};
use crate::primitives::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackState {
    /// Live input is executed and appended
    #[default]
    Recording,
    /// `update_playback` advances the cursor
    Playing,
    /// Cursor is held; can be resumed
    Paused,
    /// No cursor
    Stopped,
}

/// Ordered command history with a playback cursor
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Vec<DrawCommand>,
    /// Index of the next command to replay
    cursor: Option<usize>,
    state: PlaybackState,
    speed: usize,
}

impl CommandLog {
    pub fn new(speed: usize) -> Self {
        Self {
            speed: speed.max(1),
            ..Self::default()
        }
    }

    /// Drop all commands and return to recording.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.cursor = None;
        self.state = PlaybackState::Recording;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn speed(&self) -> usize {
        self.speed
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// True when there is nothing left to replay
    pub fn is_done(&self) -> bool {
        self.cursor.map_or(true, |c| c >= self.commands.len())
    }

    /// Next command to replay, advancing the cursor
    fn advance(&mut self) -> Option<DrawCommand> {
        let cursor = self.cursor?;
        let cmd = *self.commands.get(cursor)?;
        self.cursor = Some(cursor + 1);
        Some(cmd)
    }
}

impl Canvas {
    /// Execute one command, appending it to the log when `record` is set.
    ///
    /// Draw positions are scaled by the canvas size, SizeChange sizes by the
    /// canvas width.
    pub fn play_command(&mut self, cmd: DrawCommand, record: bool) {
        tracing::trace!("[Playback] {:?} record={}", cmd, record);

        match cmd {
            DrawCommand::Draw { pos, pressure } => {
                let forced = !record && self.config.playback.force_idle_stamps;
                let px = Pos::new(pos.x * self.width as f32, pos.y * self.height as f32);
                self.stroke_to(px, pressure as i32, forced);
            }
            DrawCommand::DrawEnd { .. } => self.end_stroke(),
            DrawCommand::ColorChange {
                color,
                flip_x,
                flip_y,
            } => {
                if flip_x || flip_y {
                    self.flip(flip_x, flip_y);
                } else {
                    self.brush.color = color;
                }
            }
            DrawCommand::SizeChange {
                control,
                kind,
                size,
                opacity,
            } => {
                self.brush.size = ((size * self.width as f32).round() as i32).max(2);
                self.brush.control = control;
                self.brush.kind = kind;
                if opacity > 0.0 {
                    self.brush.opacity = opacity.min(1.0);
                }
            }
        }

        if record {
            self.log.commands.push(cmd);
            self.modified = true;
        }
    }

    /// Execute and record a live command.
    ///
    /// Live input during playback discards everything after what is on
    /// screen and returns to recording. The first command of an empty log is
    /// preceded by the current brush so replay starts from the same state.
    pub fn record(&mut self, cmd: DrawCommand) {
        self.enter_recording();
        if self.log.is_empty() {
            tracing::debug!("[Playback] empty log, recording current brush first");
            let brush = self.brush;
            self.push_brush(&brush);
        }
        self.play_command(cmd, true);
    }

    fn enter_recording(&mut self) {
        match self.log.state {
            PlaybackState::Playing | PlaybackState::Paused => {
                let keep = self.log.cursor.unwrap_or(0).min(self.log.len());
                tracing::debug!(
                    "[Playback] live input at {} of {}, truncating",
                    keep,
                    self.log.len()
                );
                self.log.commands.truncate(keep);
                self.log.cursor = None;
                self.log.state = PlaybackState::Recording;
            }
            PlaybackState::Stopped => self.log.state = PlaybackState::Recording,
            PlaybackState::Recording => {}
        }
    }

    /// Live stroke sample at `pos` in canvas pixels.
    pub fn draw(&mut self, pos: Pos, pressure: u8) {
        let normalized = if self.width == 0 || self.height == 0 {
            Pos::default()
        } else {
            Pos::new(pos.x / self.width as f32, pos.y / self.height as f32)
        };
        self.draw_normalized(normalized, pressure);
    }

    /// Live stroke sample at `pos` in [0, 1] canvas units.
    pub fn draw_normalized(&mut self, pos: Pos, pressure: u8) {
        self.record(DrawCommand::draw(pos, pressure));
    }

    /// Pen lifted. Nothing is recorded outside a stroke.
    pub fn end_draw(&mut self, pressure: u8) {
        if self.stroke.active {
            self.record(DrawCommand::draw_end(pressure));
        }
    }

    /// Make `brush` current by recording a ColorChange and a SizeChange.
    pub fn record_brush(&mut self, brush: &crate::brush::Brush) {
        self.enter_recording();
        self.push_brush(brush);
    }

    fn push_brush(&mut self, brush: &crate::brush::Brush) {
        let size = if self.width == 0 {
            0.0
        } else {
            brush.size as f32 / self.width as f32
        };
        self.play_command(DrawCommand::color_change(brush.color), true);
        self.play_command(
            DrawCommand::size_change(brush.control, brush.kind, size, brush.opacity),
            true,
        );
    }

    pub fn commands(&self) -> &[DrawCommand] {
        self.log.commands()
    }

    pub fn command_log(&self) -> &CommandLog {
        &self.log
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.log.state
    }

    /// Replace the log wholesale; used by file loading.
    pub(crate) fn replace_log(&mut self, header: DrwHeader, commands: Vec<DrawCommand>) {
        self.log.commands = commands;
        self.log.cursor = None;
        self.log.state = PlaybackState::Stopped;
        self.header = header;
        self.modified = false;
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.log.state != state {
            tracing::debug!("[Playback] {:?} -> {:?}", self.log.state, state);
            self.log.state = state;
        }
    }

    fn step(&mut self) -> bool {
        match self.log.advance() {
            Some(cmd) => {
                self.play_command(cmd, false);
                true
            }
            None => false,
        }
    }

    pub fn start_playback(&mut self) {
        self.end_stroke();
        self.clear_image();
        self.log.cursor = Some(0);
        self.set_state(PlaybackState::Playing);
    }

    pub fn pause_playback(&mut self) {
        if self.log.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
        }
    }

    pub fn resume_playback(&mut self) {
        if self.log.state == PlaybackState::Paused {
            self.set_state(PlaybackState::Playing);
        }
    }

    pub fn stop_playback(&mut self) {
        self.end_stroke();
        self.log.cursor = None;
        self.set_state(PlaybackState::Stopped);
    }

    /// Advance by the playback speed while playing.
    pub fn update_playback(&mut self) {
        if self.log.state != PlaybackState::Playing {
            return;
        }
        for _ in 0..self.log.speed {
            if !self.step() {
                break;
            }
        }
    }

    /// Replay until the cursor reaches `pos` or the log ends.
    pub fn playback_to(&mut self, pos: usize) {
        while self.log.cursor.is_some_and(|c| c < pos) && self.step() {}
    }

    /// Replay at most one command towards `pos`.
    pub fn playback_step_to(&mut self, pos: usize) {
        if self.log.cursor.is_some_and(|c| c < pos) {
            self.step();
        }
    }

    /// Like [`Canvas::playback_to`] but yields once `budget` has elapsed.
    /// At least one command is executed per call.
    pub fn playback_to_timed(&mut self, pos: usize, budget: Duration) {
        let deadline = Instant::now() + budget;
        let mut executed = 0usize;
        while self.log.cursor.is_some_and(|c| c < pos) {
            if executed > 0 && Instant::now() >= deadline {
                break;
            }
            if !self.step() {
                break;
            }
            executed += 1;
        }
        if executed > 0 {
            tracing::trace!("[Playback] timed step ran {} commands", executed);
        }
    }

    /// Replay until the current stroke has ended.
    pub fn playback_finish_stroke(&mut self) {
        while self.stroke.active && self.step() {}
    }

    /// Replay everything that is left.
    pub fn finish_playback(&mut self) {
        while self.step() {}
    }

    /// Re-execute `commands[from..to]` without moving the cursor.
    pub fn play_range(&mut self, from: usize, to: usize) {
        let to = to.min(self.log.len());
        for i in from..to {
            let cmd = self.log.commands[i];
            self.play_command(cmd, false);
        }
    }

    /// Keep the commands up to and including the cursor; everything when stopped is dropped.
    pub fn truncate_at_playback(&mut self) {
        let keep = self.log.cursor.map_or(0, |c| c + 1).min(self.log.len());
        self.log.commands.truncate(keep);
    }

    pub fn playback_done(&self) -> bool {
        self.log.is_done()
    }

    pub fn playback_len(&self) -> usize {
        self.log.len()
    }

    pub fn playback_pos(&self) -> Option<usize> {
        self.log.cursor
    }

    pub fn set_playback_speed(&mut self, speed: usize) {
        self.log.speed = speed.max(1);
    }

    /// Move the cursor to `pos`, restarting from blank when it lies behind.
    ///
    /// Returns true once the cursor has arrived; otherwise call again.
    pub fn seek(&mut self, pos: usize, budget: Duration) -> bool {
        let pos = pos.min(self.log.len());
        if self.log.cursor.map_or(true, |c| c > pos) {
            let paused = self.log.state == PlaybackState::Paused;
            self.start_playback();
            if paused {
                self.set_state(PlaybackState::Paused);
            }
        }
        self.playback_to_timed(pos, budget);
        self.log.cursor == Some(pos)
    }

    /// Encode up to `count` commands starting at `start`.
    pub fn send_commands(&self, start: usize, count: usize) -> CommandBuffer {
        let start = start.min(self.log.len());
        let end = start.saturating_add(count).min(self.log.len());
        CommandBuffer::from_words(drw::encode_words(&self.log.commands[start..end]))
    }

    /// Overwrite the log from `start` with the commands in `buffer`.
    pub fn receive_commands(&mut self, buffer: &CommandBuffer, start: usize) {
        let len = self.log.len();
        if start > len {
            tracing::warn!(
                "[Playback] received commands at {} past the log end {}",
                start,
                len
            );
        }
        let start = start.min(len);
        self.log.commands.truncate(start);
        self.log
            .commands
            .extend(drw::decode_words(buffer.words()));
        self.modified = true;
    }

    /// Adopt commands agreed by the session host.
    ///
    /// Local raster changes since the last agreed state are discarded, the
    /// received commands replayed over the shared image, and the brush that
    /// was active before is recorded again.
    pub fn reconcile(&mut self, buffer: &CommandBuffer, start: usize) {
        self.end_stroke();
        let saved = self.brush;
        self.receive_commands(buffer, start);
        self.restore_shared_image();
        let len = self.log.len();
        self.play_range(start.min(len), len);
        self.save_shared_image();
        self.record_brush(&saved);
        tracing::debug!(
            "[Playback] reconciled {} commands at {}",
            buffer.len(),
            start
        );
    }
}
