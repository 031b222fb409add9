//! Component system for the filebody TUI.
//!
//! This module defines the Component trait that every view implements.
//! Components are self-contained UI elements that handle their own events
//! and rendering while integrating with the application through a consistent
//! interface.

use crossterm::event::{KeyEvent, MouseEvent};
use filebody_types::{Effect, Msg};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::App;

/// A trait representing a UI component with its own behavior.
///
/// Components handle localized events, update the state they are bound to in
/// [`App`], and render themselves into a provided `Rect`. Side effects are never
/// performed directly; they are reported back as [`Effect`]s which the command
/// layer executes.
///
/// # Component Lifecycle
///
/// 1. **Routing**: `on_route_enter()` runs when the component becomes visible
/// 2. **Event Handling**: `handle_message()`, `handle_key_events()` and `handle_mouse_events()`
/// 3. **Rendering**: `render()` draws the component into the provided frame area
/// 4. **Teardown**: `on_route_exit()` runs when the component is hidden
pub(crate) trait Component {
    /// Handle an application message the component cares about.
    ///
    /// Messages are consumed; components ignore the ones that are not
    /// relevant to them.
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events routed to this component.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should be side-effect free except for frame drawing,
    /// cursor placement and caching the hit-test rectangles they drew.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the footer while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Splits `area` into the regions this component renders into.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }

    /// Called when the component becomes visible.
    fn on_route_enter(&mut self, _app: &mut App) -> Vec<Effect> {
        Vec::new()
    }

    /// Called when the component is hidden.
    fn on_route_exit(&mut self, _app: &mut App) -> Vec<Effect> {
        Vec::new()
    }
}
