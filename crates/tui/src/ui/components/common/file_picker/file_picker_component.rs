//! Modal for browsing local files and choosing one as the request body.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use filebody_types::{DirectoryEntry, Effect, ExecOutcome, Msg};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use tracing::debug;

use super::state::{Commit, FilePickerState};
use crate::{
    app::App,
    ui::{
        components::Component,
        theme::{
            Theme,
            theme_helpers::{ButtonRenderOptions, block, build_hint_spans, render_button},
        },
    },
};

/// Regions resolved on the last render, used for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default)]
struct PickerAreas {
    path_input: Rect,
    path_input_inner: Rect,
    info: Rect,
    list: Rect,
    preview: Rect,
    error: Rect,
    cancel: Rect,
    confirm: Rect,
}

/// Controller and renderer for the file picker modal.
#[derive(Debug, Clone, Default)]
pub struct FilePickerModal {
    areas: PickerAreas,
}

impl FilePickerModal {
    fn render_path_input(&mut self, frame: &mut Frame, picker: &FilePickerState, theme: &dyn Theme) {
        let area = self.areas.path_input;
        let is_focused = picker.f_path_input.get();
        let input_block = block(theme, Some("Path"), is_focused);
        let inner = input_block.inner(area);
        let input = picker.path_input();

        let paragraph = Paragraph::new(input.input().to_string())
            .style(theme.text_primary_style())
            .block(input_block);
        frame.render_widget(paragraph, area);
        if is_focused {
            frame.set_cursor_position((inner.x.saturating_add(input.cursor_columns() as u16), inner.y));
        }
        self.areas.path_input_inner = inner;
    }

    fn render_info(&self, frame: &mut Frame, picker: &FilePickerState, theme: &dyn Theme) {
        let line = Line::from(vec![
            Span::styled("In: ", theme.text_muted_style()),
            Span::styled(picker.cur_dir().display().to_string(), theme.text_secondary_style()),
            Span::styled(" · Accepts: ", theme.text_muted_style()),
            Span::styled(picker.filter().describe(), theme.text_secondary_style()),
        ]);
        frame.render_widget(Paragraph::new(line), self.areas.info);
    }

    fn render_list(&self, frame: &mut Frame, picker: &mut FilePickerState, theme: &dyn Theme) {
        let list_block = Block::new()
            .borders(Borders::LEFT)
            .border_style(theme.border_style(picker.f_list.get()));
        let Some(entries) = picker.entries() else {
            frame.render_widget(
                Paragraph::new("Loading…").style(theme.text_muted_style()).block(list_block),
                self.areas.list,
            );
            return;
        };

        let hovered = picker.hovered();
        let items: Vec<ListItem> = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let item = ListItem::new(entry_label(picker, entry)).style(entry_style(picker, entry, theme));
                if hovered == Some(idx) {
                    item.style(theme.selection_style().add_modifier(Modifier::BOLD))
                } else {
                    item
                }
            })
            .collect();

        let list = List::new(items).block(list_block).highlight_style(theme.selection_style());
        frame.render_stateful_widget(list, self.areas.list, picker.list_state_mut());
    }

    fn render_preview(&self, frame: &mut Frame, picker: &FilePickerState, theme: &dyn Theme) {
        let area = self.areas.preview;
        let preview_block = Block::new()
            .borders(Borders::LEFT)
            .border_style(theme.border_style(picker.f_preview.get()));
        let paragraph = match picker.visible_preview(area.height) {
            Some(text) => Paragraph::new(text).style(theme.text_primary_style()),
            None => Paragraph::new("No preview available").style(theme.status_info()),
        };
        frame.render_widget(paragraph.block(preview_block), area);
    }

    fn render_footer(&self, frame: &mut Frame, picker: &FilePickerState, theme: &dyn Theme) {
        if let Some(error) = picker.error() {
            frame.render_widget(Paragraph::new(error).style(theme.status_error()), self.areas.error);
        }
        let cancel = ButtonRenderOptions::new(true, picker.f_cancel.get(), false, Borders::ALL, false);
        render_button(frame, self.areas.cancel, "Cancel", theme, cancel);
        let confirm = ButtonRenderOptions::new(picker.can_commit(), picker.f_confirm.get(), false, Borders::ALL, false);
        render_button(frame, self.areas.confirm, "Open", theme, confirm);
    }

    fn commit(&self, app: &mut App) -> Vec<Effect> {
        let Some(commit) = app.file_picker.as_mut().and_then(FilePickerState::commit) else {
            return Vec::new();
        };
        match commit {
            Commit::OpenDirectory(dir) => open_directory(app, dir),
            Commit::ChooseFile(path) => choose_file(app, path),
        }
    }

    fn handle_path_input_key(&self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(picker) = app.file_picker.as_mut() else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Enter => return self.commit(app),
            KeyCode::Char(character)
                if !character.is_control() && (key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) =>
            {
                picker.edit_path(|input| input.insert_char(character));
            }
            KeyCode::Backspace => picker.edit_path(|input| input.backspace()),
            KeyCode::Delete => picker.edit_path(|input| input.delete()),
            KeyCode::Left => picker.edit_path(|input| input.move_left()),
            KeyCode::Right => picker.edit_path(|input| input.move_right()),
            _ => {}
        }
        Vec::new()
    }

    fn handle_list_key(&self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(picker) = app.file_picker.as_mut() else {
            return Vec::new();
        };
        let highlighted = match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => return self.commit(app),
            KeyCode::Backspace => {
                return picker
                    .open_parent()
                    .map(|dir| vec![Effect::ListDirectoryContents(dir)])
                    .unwrap_or_default();
            }
            KeyCode::Down => picker.select_next(),
            KeyCode::Up => picker.select_previous(),
            _ => None,
        };
        preview_request(highlighted)
    }

    fn handle_click(&self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let Some(picker) = app.file_picker.as_mut() else {
            return Vec::new();
        };
        let pos = Position::new(mouse.column, mouse.row);

        if self.areas.list.contains(pos) {
            app.focus.focus(&picker.f_list);
            let idx = (pos.y - self.areas.list.y) as usize + picker.list_offset();
            return match picker.select(Some(idx)).cloned() {
                Some(entry) if entry.is_directory => open_directory(app, entry.path),
                entry => preview_request(entry.as_ref()),
            };
        }
        if self.areas.path_input.contains(pos) {
            let column = mouse.column.saturating_sub(self.areas.path_input_inner.x);
            picker.edit_path(|input| input.set_cursor(input.cursor_index_for_column(column)));
            app.focus.focus(&picker.f_path_input);
            return Vec::new();
        }
        if self.areas.cancel.contains(pos) {
            return vec![Effect::CloseModal];
        }
        if self.areas.confirm.contains(pos) {
            return self.commit(app);
        }
        Vec::new()
    }
}

fn entry_label(picker: &FilePickerState, entry: &DirectoryEntry) -> String {
    if picker.is_parent_entry(entry) {
        return "/..".to_string();
    }
    let name = entry
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.path.display().to_string());
    if entry.is_directory { format!("/{name}") } else { name }
}

fn entry_style(picker: &FilePickerState, entry: &DirectoryEntry, theme: &dyn Theme) -> Style {
    if entry.is_directory {
        theme.accent_primary_style()
    } else if picker.is_selectable(entry) {
        theme.text_primary_style()
    } else {
        theme.text_muted_style().add_modifier(Modifier::DIM)
    }
}

fn preview_request(entry: Option<&DirectoryEntry>) -> Vec<Effect> {
    match entry {
        Some(entry) if !entry.is_directory => vec![Effect::ReadFilePreview(entry.path.clone())],
        _ => Vec::new(),
    }
}

fn open_directory(app: &mut App, dir: PathBuf) -> Vec<Effect> {
    match app.file_picker.as_mut() {
        Some(picker) => vec![Effect::ListDirectoryContents(picker.open_dir(dir))],
        None => Vec::new(),
    }
}

/// Closes the picker and hands `path` to the editor unless it is already the
/// current selection.
fn choose_file(app: &App, path: PathBuf) -> Vec<Effect> {
    if app.editor.accepts_picker_selection(&path) {
        vec![Effect::CloseModal, Effect::ResolveChosenFile(path)]
    } else {
        debug!(path = %path.display(), "picker selection unchanged");
        vec![Effect::CloseModal]
    }
}

impl Component for FilePickerModal {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let (Msg::ExecCompleted(outcome), Some(picker)) = (msg, app.file_picker.as_mut()) else {
            return Vec::new();
        };
        match *outcome {
            ExecOutcome::FilePreview { path, contents } => picker.apply_preview(path, contents),
            ExecOutcome::DirectoryContents { root_path, entries } => {
                if picker.apply_listing(&root_path, entries) {
                    return preview_request(picker.selected_entry());
                }
                debug!(dir = %root_path.display(), "dropping listing for a directory no longer shown");
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(picker) = app.file_picker.as_mut() else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc => return vec![Effect::CloseModal],
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            _ if picker.f_path_input.get() => return self.handle_path_input_key(app, key),
            _ if picker.f_list.get() => return self.handle_list_key(app, key),
            KeyCode::Down if picker.f_preview.get() => picker.scroll_preview(1, self.areas.preview.height),
            KeyCode::Up if picker.f_preview.get() => picker.scroll_preview(-1, self.areas.preview.height),
            KeyCode::Enter | KeyCode::Char(' ') if picker.f_confirm.get() => return self.commit(app),
            KeyCode::Enter | KeyCode::Char(' ') if picker.f_cancel.get() => return vec![Effect::CloseModal],
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let Some(picker) = app.file_picker.as_mut() else {
            return Vec::new();
        };
        let pos = Position::new(mouse.column, mouse.row);
        let over_list = self.areas.list.contains(pos);
        let over_preview = self.areas.preview.contains(pos);

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Up(MouseButton::Left) => {
                let idx = over_list.then(|| (pos.y - self.areas.list.y) as usize + picker.list_offset());
                picker.set_hovered(idx);
            }
            MouseEventKind::ScrollDown if over_list => picker.list_state_mut().scroll_down_by(1),
            MouseEventKind::ScrollUp if over_list => picker.list_state_mut().scroll_up_by(1),
            MouseEventKind::ScrollDown if over_preview => picker.scroll_preview(1, self.areas.preview.height),
            MouseEventKind::ScrollUp if over_preview => picker.scroll_preview(-1, self.areas.preview.height),
            MouseEventKind::Down(MouseButton::Left) => return self.handle_click(app, mouse),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let outer = block(theme, Some("Choose a file"), true);
        let regions = self.get_preferred_layout(app, outer.inner(rect));
        frame.render_widget(outer, rect);
        self.areas = PickerAreas {
            path_input: regions[0],
            path_input_inner: Rect::default(),
            info: regions[1],
            list: regions[2],
            preview: regions[3],
            error: regions[4],
            cancel: regions[5],
            confirm: regions[6],
        };

        let Some(picker) = app.file_picker.as_mut() else {
            return;
        };
        self.render_path_input(frame, picker, theme);
        self.render_info(frame, picker, theme);
        self.render_list(frame, picker, theme);
        self.render_preview(frame, picker, theme);
        self.render_footer(frame, picker, theme);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let Some(picker) = app.file_picker.as_ref() else {
            return Vec::new();
        };
        let mut hints = vec![(" Esc", " Cancel"), (" Tab", " Next field")];
        if picker.f_list.get() {
            hints.extend([(" ↑/↓", " Navigate"), (" Backspace", " Parent"), (" Enter", " Open")]);
        } else if picker.f_path_input.get() {
            hints.push((" Enter", " Open path"));
        } else if picker.f_preview.get() {
            hints.push((" ↑/↓", " Scroll"));
        }
        build_hint_spans(&*app.ctx.theme, &hints)
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let rows = Layout::vertical([
            Constraint::Length(3), // path input
            Constraint::Length(1), // directory and filter
            Constraint::Min(5),    // list and preview
            Constraint::Length(3), // error and buttons
        ])
        .split(area);
        let body = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).split(rows[2]);
        let footer = Layout::horizontal([
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(1),
            Constraint::Length(10),
        ])
        .split(rows[3]);
        // pin the error message to the button baseline
        let error = Rect {
            y: footer[0].y + footer[0].height.saturating_sub(2),
            height: footer[0].height.min(1),
            ..footer[0]
        };

        vec![rows[0], rows[1], body[0], body[1], error, footer[1], footer[3]]
    }

    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        app.file_picker
            .as_ref()
            .map(|picker| vec![Effect::ListDirectoryContents(picker.cur_dir().to_path_buf())])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use filebody_types::FileHandle;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::{RunOptions, ui::components::payload_editor::PayloadListeners};

    fn app_with_picker() -> App {
        let mut app = App::new(RunOptions::default(), PayloadListeners::new());
        let mut picker = FilePickerState::new(Some(PathBuf::from("/data")), Vec::new());
        picker.apply_listing(
            Path::new("/data"),
            vec![
                DirectoryEntry {
                    path: PathBuf::from("/"),
                    is_directory: true,
                },
                DirectoryEntry {
                    path: PathBuf::from("/data/a.txt"),
                    is_directory: false,
                },
            ],
        );
        picker.select_next();
        app.file_picker = Some(picker);
        app
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn confirming_a_file_resolves_it() {
        let mut app = app_with_picker();
        let modal = FilePickerModal::default();

        let effects = modal.commit(&mut app);

        assert_eq!(
            effects,
            vec![Effect::CloseModal, Effect::ResolveChosenFile(PathBuf::from("/data/a.txt"))]
        );
    }

    #[test]
    fn confirming_the_current_selection_only_closes() {
        let mut app = app_with_picker();
        let path = PathBuf::from("/data/a.txt");
        app.editor
            .on_file_chosen(Some(FileHandle::on_disk(path, Some("a.txt".into()), None, 1)));
        let modal = FilePickerModal::default();

        assert_eq!(modal.commit(&mut app), vec![Effect::CloseModal]);
    }

    #[test]
    fn confirming_a_directory_lists_it() {
        let mut app = app_with_picker();
        if let Some(picker) = app.file_picker.as_mut() {
            picker.select(Some(0));
        }
        let modal = FilePickerModal::default();

        let effects = modal.commit(&mut app);

        assert_eq!(effects, vec![Effect::ListDirectoryContents(PathBuf::from("/"))]);
        assert_eq!(app.file_picker.as_ref().map(|p| p.cur_dir()), Some(Path::new("/")));
    }

    #[test]
    fn listing_for_another_directory_is_ignored() {
        let mut app = app_with_picker();
        let mut modal = FilePickerModal::default();
        let outcome = ExecOutcome::DirectoryContents {
            root_path: PathBuf::from("/elsewhere"),
            entries: Vec::new(),
        };

        let effects = modal.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome)));

        assert!(effects.is_empty());
        assert!(app.file_picker.as_ref().is_some_and(|p| p.selected_entry().is_some()));
    }

    #[test]
    fn escape_closes_the_picker() {
        let mut app = app_with_picker();
        let mut modal = FilePickerModal::default();

        assert_eq!(modal.handle_key_events(&mut app, press(KeyCode::Esc)), vec![Effect::CloseModal]);
    }

    #[test]
    fn renders_entries_and_filter() {
        let mut app = app_with_picker();
        let mut modal = FilePickerModal::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();

        terminal.draw(|frame| modal.render(frame, frame.area(), &mut app)).unwrap();

        let rendered: String = terminal.backend().buffer().content.iter().map(|cell| cell.symbol()).collect();
        assert!(rendered.contains("/.."));
        assert!(rendered.contains("a.txt"));
        assert!(rendered.contains("any file"));
    }
}
