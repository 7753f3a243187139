//! Built-in renderers for the command line.

use agenda_core::{RenderContext, Renderer};

use crate::cli::OutputFormat;

/// Line printed for an empty agenda.
pub const NO_EVENTS_TEXT: &str = "No upcoming events";

/// One line per event: start, title, then venue and organizer when known.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&mut self, context: &RenderContext) -> String {
        let Some(event) = &context.event else {
            return format!("{}\n", NO_EVENTS_TEXT);
        };

        let mut line = format!("{}  {}", event.begins_on, event.title);
        if let Some(location) = &event.location {
            line.push_str(&format!(" @ {}", location));
        }
        if let Some(organizer) = &event.organizer {
            line.push_str(&format!(" ({})", organizer));
        }
        line.push('\n');
        line
    }
}

/// One JSON render context per line.
///
/// The first serialization failure is kept and reported by [`JsonRenderer::finish`].
#[derive(Debug, Default)]
pub struct JsonRenderer {
    error: Option<serde_json::Error>,
}

impl JsonRenderer {
    /// Returns the first serialization error, if any.
    pub fn finish(self) -> Result<(), serde_json::Error> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Renderer for JsonRenderer {
    fn render(&mut self, context: &RenderContext) -> String {
        match serde_json::to_string(context) {
            Ok(json) => json + "\n",
            Err(e) => {
                self.error.get_or_insert(e);
                String::new()
            }
        }
    }
}

/// Renderer for an output format.
pub enum FormatRenderer {
    Text(TextRenderer),
    Json(JsonRenderer),
}

impl FormatRenderer {
    pub fn new(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text(TextRenderer),
            OutputFormat::Json => Self::Json(JsonRenderer::default()),
        }
    }

    /// Reports deferred errors.
    pub fn finish(self) -> Result<(), serde_json::Error> {
        match self {
            Self::Text(_) => Ok(()),
            Self::Json(json) => json.finish(),
        }
    }
}

impl Renderer for FormatRenderer {
    fn render(&mut self, context: &RenderContext) -> String {
        match self {
            Self::Text(r) => r.render(context),
            Self::Json(r) => r.render(context),
        }
    }
}
