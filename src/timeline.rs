//! Loop region and named sections over a media timeline.
//!
//! All positions are plain seconds supplied by the caller; the timeline
//! never owns a player. Operations that should move the playhead return the
//! target time instead of seeking themselves.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest loop the editor allows (seconds).
pub const MIN_LOOP_LENGTH: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopRegion {
    pub start: f64,
    pub end: f64,
}

impl LoopRegion {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragHandle {
    Start,
    End,
}

/// A saved loop region.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: Uuid,
    pub name: String,
    pub start_time: f64,
    pub end_time: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mastered: bool,
}

impl Section {
    pub fn region(&self) -> LoopRegion {
        LoopRegion {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    /// Media length in seconds, 0 while unknown
    duration: f64,
    loop_start: Option<f64>,
    loop_end: Option<f64>,
    looping: bool,
    drag: Option<DragHandle>,
    /// Set after a loop-back seek until playback is seen inside the loop
    seek_pending: bool,
    sections: Vec<Section>,
    active_section: Option<Uuid>,
}

impl Timeline {
    pub fn new(duration: f64) -> Self {
        let mut timeline = Self::default();
        timeline.set_duration(duration);
        timeline
    }

    pub fn with_sections(duration: f64, sections: Vec<Section>) -> Self {
        Self {
            sections,
            ..Self::new(duration)
        }
    }

    /// Ignored unless finite and positive.
    pub fn set_duration(&mut self, duration: f64) {
        if duration.is_finite() && duration > 0.0 {
            self.duration = duration;
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Map a pointer position over a track of `width` starting at `left`.
    pub fn time_at(&self, pointer_x: f64, left: f64, width: f64) -> f64 {
        if self.duration <= 0.0 || width <= 0.0 {
            return 0.0;
        }
        ((pointer_x - left) / width * self.duration).clamp(0.0, self.duration)
    }

    pub fn loop_region(&self) -> Option<LoopRegion> {
        Some(LoopRegion {
            start: self.loop_start?,
            end: self.loop_end?,
        })
    }

    /// Start mark without an end yet.
    pub fn loop_start(&self) -> Option<f64> {
        self.loop_start
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn dragging(&self) -> Option<DragHandle> {
        self.drag
    }

    pub fn begin_drag(&mut self, handle: DragHandle) {
        self.drag = Some(handle);
    }

    /// Move the grabbed handle to `t`, keeping the loop inside the media and
    /// at least `MIN_LOOP_LENGTH` long. Does nothing without a grabbed handle.
    pub fn drag_to(&mut self, t: f64) {
        if !t.is_finite() {
            return;
        }
        let t = self.clamp_to_media(t);
        match self.drag {
            Some(DragHandle::Start) => {
                let limit = self.loop_end.unwrap_or(self.duration) - MIN_LOOP_LENGTH;
                self.loop_start = Some(t.min(limit).max(0.0));
            }
            Some(DragHandle::End) => {
                let (start, end) = self.close_loop(self.loop_start.unwrap_or(0.0), t);
                if self.loop_start.is_some() {
                    self.loop_start = Some(start);
                }
                self.loop_end = Some(end);
            }
            None => {}
        }
    }

    /// Release the handle. Releasing the start handle returns a seek to the
    /// new loop start.
    pub fn end_drag(&mut self) -> Option<f64> {
        match self.drag.take()? {
            DragHandle::Start => Some(self.loop_start.unwrap_or(0.0)),
            DragHandle::End => None,
        }
    }

    /// Begin a new loop at `t`, discarding the previous one.
    pub fn mark_start(&mut self, t: f64) {
        if !t.is_finite() {
            return;
        }
        self.loop_start = Some(self.clamp_to_media(t));
        self.loop_end = None;
        self.looping = false;
        self.seek_pending = false;
        self.active_section = None;
    }

    /// Close the loop at `t` and enable looping. Needs a start mark.
    pub fn mark_end(&mut self, t: f64) -> Option<LoopRegion> {
        let start = self.loop_start?;
        if !t.is_finite() {
            return None;
        }
        let (start, end) = self.close_loop(start, self.clamp_to_media(t));
        self.loop_start = Some(start);
        self.loop_end = Some(end);
        self.looping = true;
        self.active_section = None;
        self.loop_region()
    }

    pub fn clear_loop(&mut self) {
        self.loop_start = None;
        self.loop_end = None;
        self.looping = false;
        self.seek_pending = false;
        self.drag = None;
        self.active_section = None;
    }

    /// Only takes effect while a complete region exists.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping && self.loop_region().is_some();
    }

    pub fn set_start_seconds(&mut self, seconds: f64) {
        let Some(region) = self.loop_region() else {
            return;
        };
        if !seconds.is_finite() {
            return;
        }
        let bounded = self.bound(seconds).max(0.0);
        self.loop_start = Some(bounded.min(region.end - MIN_LOOP_LENGTH));
    }

    pub fn set_end_seconds(&mut self, seconds: f64) {
        let Some(region) = self.loop_region() else {
            return;
        };
        if !seconds.is_finite() {
            return;
        }
        let (start, end) = self.close_loop(region.start, self.clamp_to_media(seconds));
        self.loop_start = Some(start);
        self.loop_end = Some(end);
    }

    fn bound(&self, seconds: f64) -> f64 {
        if self.duration > 0.0 {
            seconds.min(self.duration)
        } else {
            seconds
        }
    }

    fn clamp_to_media(&self, seconds: f64) -> f64 {
        self.bound(seconds).max(0.0)
    }

    /// End a loop begun at `start` near `t`. The end stays inside the media;
    /// when that leaves less than `MIN_LOOP_LENGTH`, the start moves back.
    fn close_loop(&self, start: f64, t: f64) -> (f64, f64) {
        let end = self.bound(t.max(start + MIN_LOOP_LENGTH));
        let start = start.min(end - MIN_LOOP_LENGTH).max(0.0);
        (start, end)
    }

    /// Feed the playhead position. Returns a seek target once each time
    /// playback crosses the loop end while looping.
    pub fn on_time_update(&mut self, current: f64) -> Option<f64> {
        let region = self.loop_region().filter(|_| self.looping)?;
        if current < region.end {
            self.seek_pending = false;
            return None;
        }
        if self.seek_pending {
            return None;
        }
        self.seek_pending = true;
        Some(region.start)
    }

    /// Playhead moved by `delta`, clamped to the media. `None` while the
    /// duration is unknown.
    pub fn seek_by(&self, current: f64, delta: f64) -> Option<f64> {
        if self.duration <= 0.0 {
            return None;
        }
        Some((current + delta).clamp(0.0, self.duration))
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn active_section(&self) -> Option<&Section> {
        let id = self.active_section?;
        self.sections.iter().find(|section| section.id == id)
    }

    /// Save the current loop. Updates the active section (keeping its name
    /// when `name` is blank) or adds a new one, which needs a name.
    pub fn save_section(&mut self, name: &str) -> Option<Uuid> {
        let region = self.loop_region()?;
        let name = name.trim();

        if let Some(id) = self.active_section {
            if let Some(section) = self.sections.iter_mut().find(|s| s.id == id) {
                if !name.is_empty() {
                    section.name = name.to_string();
                }
                section.start_time = region.start;
                section.end_time = region.end;
                return Some(id);
            }
        }

        if name.is_empty() {
            return None;
        }
        let section = Section {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_time: region.start,
            end_time: region.end,
            mastered: false,
        };
        let id = section.id;
        tracing::debug!(%id, name, "section saved");
        self.sections.push(section);
        self.active_section = Some(id);
        Some(id)
    }

    /// Load a section as the loop and return where to seek.
    pub fn activate_section(&mut self, id: Uuid) -> Option<f64> {
        let region = self.sections.iter().find(|s| s.id == id)?.region();
        self.loop_start = Some(region.start);
        self.loop_end = Some(region.end);
        self.looping = true;
        self.seek_pending = false;
        self.active_section = Some(id);
        Some(region.start)
    }

    pub fn delete_section(&mut self, id: Uuid) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != id);
        if self.active_section == Some(id) {
            self.clear_loop();
        }
        self.sections.len() != before
    }

    pub fn set_mastered(&mut self, id: Uuid, mastered: bool) -> bool {
        match self.sections.iter_mut().find(|s| s.id == id) {
            Some(section) => {
                section.mastered = mastered;
                true
            }
            None => false,
        }
    }
}

/// `m:ss`
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
