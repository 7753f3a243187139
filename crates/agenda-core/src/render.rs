//! Render contexts handed to the template renderer.
//!
//! Each renderer invocation receives an immutable [`RenderContext`]: the
//! normalized event (absent for the empty-state invocation) and the loop
//! position, shaped like a Liquid `forloop` object.

use serde::Serialize;

use crate::event::AgendaEvent;

/// Name reported in [`ForLoop::name`].
pub const LOOP_NAME: &str = "ical";

/// Loop position metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForLoop {
    pub name: &'static str,
    /// Number of events in the list.
    pub length: usize,
    /// 1-based position.
    pub index: usize,
    /// 0-based position.
    pub index0: usize,
    /// Items left including this one.
    pub rindex: usize,
    /// Items left after this one; `-1` for the empty-state invocation.
    pub rindex0: i64,
    pub first: bool,
    pub last: bool,
}

impl ForLoop {
    /// Position of item `index0` in a list of `length` items.
    pub fn at(index0: usize, length: usize) -> Self {
        let rindex = length.saturating_sub(index0);
        Self {
            name: LOOP_NAME,
            length,
            index: index0 + 1,
            index0,
            rindex,
            rindex0: rindex as i64 - 1,
            first: index0 == 0,
            last: index0 + 1 == length,
        }
    }

    /// The single position used when there is nothing to list.
    pub fn empty() -> Self {
        Self {
            name: LOOP_NAME,
            length: 0,
            index: 1,
            index0: 0,
            rindex: 0,
            rindex0: -1,
            first: true,
            last: true,
        }
    }
}

/// Variables bound for one renderer invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<AgendaEvent>,
    pub forloop: ForLoop,
}

impl RenderContext {
    /// Binds an event at `index0` of a list of `length` events.
    pub fn for_event(event: AgendaEvent, index0: usize, length: usize) -> Self {
        Self {
            event: Some(event),
            forloop: ForLoop::at(index0, length),
        }
    }

    /// The empty-state binding: no event, `first` and `last` both set.
    pub fn empty() -> Self {
        Self {
            event: None,
            forloop: ForLoop::empty(),
        }
    }

    /// Returns true for the empty-state binding.
    pub fn is_empty(&self) -> bool {
        self.event.is_none()
    }
}

/// The next-stage renderer: turns one binding into output text.
///
/// Closures `FnMut(&RenderContext) -> String` implement it.
pub trait Renderer {
    fn render(&mut self, context: &RenderContext) -> String;
}

impl<F> Renderer for F
where
    F: FnMut(&RenderContext) -> String,
{
    fn render(&mut self, context: &RenderContext) -> String {
        self(context)
    }
}

/// Builds one context per event.
///
/// An empty list yields exactly one [`RenderContext::empty`].
pub fn render_contexts(events: Vec<AgendaEvent>) -> Vec<RenderContext> {
    let length = events.len();
    if length == 0 {
        return vec![RenderContext::empty()];
    }
    events
        .into_iter()
        .enumerate()
        .map(|(index0, event)| RenderContext::for_event(event, index0, length))
        .collect()
}

/// Invokes the renderer for every context and concatenates its output.
pub fn render_all<R: Renderer + ?Sized>(events: Vec<AgendaEvent>, renderer: &mut R) -> String {
    render_contexts(events)
        .iter()
        .map(|context| renderer.render(context))
        .collect()
}
