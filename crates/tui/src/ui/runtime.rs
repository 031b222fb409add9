//! Terminal setup and the event loop driving the editor.
//!
//! Input is read on a blocking task and forwarded over a channel. The loop
//! selects over input, a ticker, finished background reads and Ctrl-C.
//! Effects queue up and run on the next tick; the ticker runs at 50 ms while
//! anything is queued or in flight and backs off to 5 s otherwise. Events the
//! editor deferred are flushed on every iteration.
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use filebody_types::{Effect, ExecOutcome, Msg};
use futures_util::{StreamExt, stream::FuturesUnordered};
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    RunOptions,
    app::App,
    cmd,
    ui::{
        components::{
            Component,
            payload_editor::{EditorSummary, PayloadListeners},
        },
        main_component::MainView,
    },
};

/// Spawn a dedicated input thread that forwards `crossterm` events over a
/// Tokio channel.
async fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_event: Option<Instant> = Some(Instant::now());

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if event::poll(sixteen_ms).is_ok_and(|ready| ready) {
                match event::read() {
                    Ok(event) => {
                        // Throttle mouse moves events to once per 16 ms.
                        let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                        let should_send = !is_mouse_move || last_mouse_event.is_some_and(|last| last.elapsed() >= sixteen_ms);
                        if is_mouse_move && should_send {
                            last_mouse_event = Some(Instant::now());
                        }

                        if should_send && let Err(e) = sender.send(event).await {
                            warn!("Failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read event: {}", e);
                        break;
                    }
                }
            } else if sender.is_closed() {
                break;
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = FocusBuilder::rebuild_for(app, Some(old_focus));
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Entry point for the TUI runtime: sets up the terminal, spawns the input
/// producer, runs the async event loop, and performs cleanup on exit.
pub async fn run_app(options: RunOptions, listeners: PayloadListeners) -> Result<EditorSummary> {
    let initial_value = options.initial_value.clone();
    let print_value = options.print_value;
    let mut app = App::new(options, listeners);
    let mut main_view = MainView::default();

    let mut effects: Vec<Effect> = Vec::with_capacity(5);
    if let Some(text) = initial_value.as_deref() {
        effects.extend(app.inject_value(text));
    }

    let mut input_receiver = spawn_input_thread().await;
    let mut terminal = setup_terminal()?;
    let loop_result = event_loop(&mut terminal, &mut app, &mut main_view, &mut input_receiver, effects).await;
    cleanup_terminal(&mut terminal)?;
    loop_result?;

    let summary = app.editor.summary(print_value);
    info!(has_file = summary.has_file, "file payload editor closed");
    Ok(summary)
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    main_view: &mut MainView,
    input_receiver: &mut mpsc::Receiver<Event>,
    mut effects: Vec<Effect>,
) -> Result<()> {
    let mut pending_execs: FuturesUnordered<JoinHandle<ExecOutcome>> = FuturesUnordered::new();

    // Ticking strategy: fast while work is queued, very slow when idle.
    let fast_interval = Duration::from_millis(50);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(terminal, app, main_view)?;

    loop {
        // Notifications deferred by the editor are released one turn later.
        effects.extend(app.editor.take_deferred_events());

        let needs_animation = app.executing || !effects.is_empty();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }
        let needs_render = tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                if let Event::Key(key_event) = event
                    && key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break;
                }
                effects.extend(handle_input_event(app, main_view, event));
                true
            }

            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(app, Msg::Tick));
                let had_work = !effects.is_empty();
                if had_work {
                    // move effects out of their Vec to avoid processing new effects while processing current ones
                    let mut effects_to_process = Vec::with_capacity(effects.len());
                    effects_to_process.append(&mut effects);

                    if effects_to_process.contains(&Effect::Quit) {
                        debug!("quit requested");
                        break;
                    }
                    handle_navigation_effects(app, main_view, &mut effects_to_process, &mut effects);
                    process_effects(app, effects_to_process, &mut pending_execs).await;
                }
                needs_animation || had_work
            }

            Some(joined) = pending_execs.next(), if !pending_execs.is_empty() => {
                let outcome = joined.unwrap_or_else(|error| ExecOutcome::Log(format!("Background task failed: {error}")));
                let msg = match outcome {
                    ExecOutcome::Message(msg) => msg,
                    other => Msg::ExecCompleted(Box::new(other)),
                };
                effects.extend(main_view.handle_message(app, msg));
                app.executing = !pending_execs.is_empty();
                true
            }

            _ = signal::ctrl_c() => { break; }
        };

        if needs_render {
            render(terminal, app, main_view)?;
        }
    }
    Ok(())
}

fn handle_navigation_effects(app: &mut App, main_view: &mut MainView, effects: &mut Vec<Effect>, queued_effects: &mut Vec<Effect>) {
    let navigation_effects = effects
        .extract_if(0.., |effect| matches!(effect, Effect::ShowModal(_) | Effect::CloseModal))
        .collect::<Vec<Effect>>();

    for effect in navigation_effects {
        match effect {
            Effect::ShowModal(modal) => {
                if let Some((mut view, _)) = main_view.modal_view.take() {
                    queued_effects.extend(view.on_route_exit(app));
                }
                main_view.set_open_modal_kind(app, Some(modal));
                if let Some((view, _)) = main_view.modal_view.as_mut() {
                    queued_effects.extend(view.on_route_enter(app));
                }
            }
            Effect::CloseModal => {
                if let Some((mut view, _)) = main_view.modal_view.take() {
                    queued_effects.extend(view.on_route_exit(app));
                }
                main_view.set_open_modal_kind(app, None);
            }
            _ => {}
        }
    }
}

async fn process_effects(app: &mut App, effects: Vec<Effect>, pending_execs: &mut FuturesUnordered<JoinHandle<ExecOutcome>>) {
    if effects.is_empty() {
        return;
    }

    let command_batch = cmd::run_from_effects(app, effects).await;
    pending_execs.extend(command_batch.pending);
    app.executing = !pending_execs.is_empty();
}

#[cfg(test)]
mod tests {
    use filebody_types::Modal;

    use super::*;

    #[test]
    fn navigation_effects_are_extracted() {
        let mut app = App::new(RunOptions::default(), PayloadListeners::new());
        let mut main_view = MainView::default();
        let mut effects = vec![Effect::ShowModal(Modal::FilePicker), Effect::Quit];
        let mut queued = Vec::new();

        handle_navigation_effects(&mut app, &mut main_view, &mut effects, &mut queued);

        assert_eq!(effects, vec![Effect::Quit]);
        assert!(main_view.modal_view.is_some());
        assert_eq!(app.open_modal_kind, Some(Modal::FilePicker));
    }

    #[test]
    fn closing_the_modal_drops_the_picker() {
        let mut app = App::new(RunOptions::default(), PayloadListeners::new());
        let mut main_view = MainView::default();
        let mut queued = Vec::new();
        handle_navigation_effects(&mut app, &mut main_view, &mut vec![Effect::ShowModal(Modal::FilePicker)], &mut queued);

        handle_navigation_effects(&mut app, &mut main_view, &mut vec![Effect::CloseModal], &mut queued);

        assert!(main_view.modal_view.is_none());
        assert!(app.file_picker.is_none());
    }
}
