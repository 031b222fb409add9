//! State container for the file picker modal.

use std::path::{Path, PathBuf};

use dirs_next::home_dir;
use filebody_types::DirectoryEntry;
use filebody_util::expand_tilde;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::ListState};

use crate::ui::components::common::TextInputState;

/// Extensions the picker offers; an empty filter accepts every file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter(Vec<String>);

impl ExtensionFilter {
    /// Normalizes to lowercase without the leading dot and drops blanks.
    pub fn new(extensions: impl IntoIterator<Item = String>) -> Self {
        Self(
            extensions
                .into_iter()
                .map(|extension| extension.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|extension| !extension.is_empty())
                .collect(),
        )
    }

    pub fn accepts(&self, path: &Path) -> bool {
        if self.0.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| self.0.iter().any(|allowed| allowed.eq_ignore_ascii_case(extension)))
    }

    /// Human readable summary, e.g. `.png, .jpg`.
    pub fn describe(&self) -> String {
        if self.0.is_empty() {
            return "any file".to_string();
        }
        self.0.iter().map(|extension| format!(".{extension}")).collect::<Vec<_>>().join(", ")
    }
}

/// What confirming the picker leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// Navigate into a directory
    OpenDirectory(PathBuf),
    /// Hand a file to the editor
    ChooseFile(PathBuf),
}

#[derive(Debug, Clone, Default)]
struct Preview {
    text: String,
    /// Byte range of every line in `text`
    lines: Vec<(usize, usize)>,
    scroll: u16,
}

impl Preview {
    fn new(text: String) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                lines.push((start, idx));
                start = idx + 1;
            }
        }
        if start < text.len() {
            lines.push((start, text.len()));
        }
        Self {
            text,
            lines,
            scroll: 0,
        }
    }

    fn visible(&self, height: u16) -> Option<&str> {
        let first = self.scroll as usize;
        let (start, _) = *self.lines.get(first)?;
        let last = (first + height.max(1) as usize).min(self.lines.len()) - 1;
        let (_, end) = *self.lines.get(last)?;
        self.text.get(start..end)
    }
}

/// UI state backing the file picker modal.
///
/// Tracks the directory being browsed, the highlighted entry and its preview,
/// and the typed path. Entries whose extension the filter rejects are shown
/// but cannot be selected.
#[derive(Debug, Clone, Default)]
pub struct FilePickerState {
    cur_dir: PathBuf,
    /// `None` until the listing for `cur_dir` arrives
    entries: Option<Vec<DirectoryEntry>>,
    filter: ExtensionFilter,
    list_state: ListState,
    hovered: Option<usize>,
    preview: Option<Preview>,
    path_input: TextInputState,
    error: Option<String>,

    container_focus: FocusFlag,
    pub f_path_input: FocusFlag,
    pub f_list: FocusFlag,
    pub f_preview: FocusFlag,
    pub f_cancel: FocusFlag,
    pub f_confirm: FocusFlag,
}

impl FilePickerState {
    /// Builds a picker that opens in `start_dir` (home, then the working
    /// directory, when `None`).
    pub fn new(start_dir: Option<PathBuf>, allowed_extensions: Vec<String>) -> Self {
        Self {
            cur_dir: start_dir.or_else(home_dir).unwrap_or_else(|| PathBuf::from(".")),
            filter: ExtensionFilter::new(allowed_extensions),
            container_focus: FocusFlag::new().with_name("filepicker"),
            f_path_input: FocusFlag::new().with_name("filepicker.path_input"),
            f_list: FocusFlag::new().with_name("filepicker.list"),
            f_preview: FocusFlag::new().with_name("filepicker.preview"),
            f_cancel: FocusFlag::new().with_name("filepicker.cancel"),
            f_confirm: FocusFlag::new().with_name("filepicker.confirm"),
            ..Default::default()
        }
    }

    pub fn cur_dir(&self) -> &Path {
        &self.cur_dir
    }

    pub fn filter(&self) -> &ExtensionFilter {
        &self.filter
    }

    /// Switches to `dir` and returns it so the caller can request its listing.
    pub fn open_dir(&mut self, dir: PathBuf) -> PathBuf {
        self.cur_dir = dir.clone();
        self.entries = None;
        self.select(None);
        dir
    }

    /// Opens the parent of the current directory; `None` at the filesystem root.
    pub fn open_parent(&mut self) -> Option<PathBuf> {
        let parent = self.cur_dir.parent()?.to_path_buf();
        Some(self.open_dir(parent))
    }

    /// Stores a listing. Listings for a directory the user already left are
    /// dropped and `false` is returned.
    pub fn apply_listing(&mut self, root: &Path, entries: Vec<DirectoryEntry>) -> bool {
        if root != self.cur_dir {
            return false;
        }
        self.entries = Some(entries);
        self.select(None);
        self.select_next();
        true
    }

    pub fn entries(&self) -> Option<&[DirectoryEntry]> {
        self.entries.as_deref()
    }

    /// Whether `entry` is the `..` row pointing at the parent directory.
    pub fn is_parent_entry(&self, entry: &DirectoryEntry) -> bool {
        self.cur_dir.parent() == Some(entry.path.as_path())
    }

    pub fn is_selectable(&self, entry: &DirectoryEntry) -> bool {
        entry.is_directory || self.filter.accepts(&entry.path)
    }

    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.entries.as_ref()?.get(self.list_state.selected()?)
    }

    /// Highlights the entry at `idx` when it is selectable and returns it.
    ///
    /// Any selection change discards the preview and the typed path.
    pub fn select(&mut self, idx: Option<usize>) -> Option<&DirectoryEntry> {
        self.preview = None;
        self.error = None;
        let Some(idx) = idx else {
            self.list_state.select(None);
            return None;
        };
        if !self.is_selectable_idx(idx) {
            return None;
        }
        self.list_state.select(Some(idx));
        self.path_input.clear();
        self.selected_entry()
    }

    /// Moves to the next selectable entry, wrapping around.
    pub fn select_next(&mut self) -> Option<&DirectoryEntry> {
        let len = self.entries.as_ref().map_or(0, Vec::len);
        let start = self.list_state.selected().map_or(0, |idx| idx + 1);
        let idx = (start..start + len).map(|i| i % len).find(|i| self.is_selectable_idx(*i))?;
        self.select(Some(idx))
    }

    /// Moves to the previous selectable entry, wrapping around.
    pub fn select_previous(&mut self) -> Option<&DirectoryEntry> {
        let len = self.entries.as_ref().map_or(0, Vec::len);
        let end = self.list_state.selected().unwrap_or(len) + len;
        let idx = (end - len..end).rev().map(|i| i % len).find(|i| self.is_selectable_idx(*i))?;
        self.select(Some(idx))
    }

    fn is_selectable_idx(&self, idx: usize) -> bool {
        self.entries
            .as_ref()
            .and_then(|entries| entries.get(idx))
            .is_some_and(|entry| self.is_selectable(entry))
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    pub fn list_offset(&self) -> usize {
        self.list_state.offset()
    }

    pub fn set_hovered(&mut self, idx: Option<usize>) {
        self.hovered = idx;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn path_input(&self) -> &TextInputState {
        &self.path_input
    }

    /// Edits the typed path; a non-empty path replaces the list selection.
    pub fn edit_path(&mut self, edit: impl FnOnce(&mut TextInputState)) {
        edit(&mut self.path_input);
        self.error = None;
        if !self.path_input.is_empty() {
            self.list_state.select(None);
            self.preview = None;
        }
    }

    /// The typed path with `~` expanded.
    pub fn typed_path(&self) -> Option<PathBuf> {
        let input = self.path_input.input().trim();
        (!input.is_empty()).then(|| expand_tilde(input))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether confirming would do anything.
    pub fn can_commit(&self) -> bool {
        self.selected_entry().is_some() || self.typed_path().is_some_and(|path| path.exists())
    }

    /// Decides what confirming does. A rejected typed path leaves an error
    /// for the view and returns `None`.
    pub fn commit(&mut self) -> Option<Commit> {
        if let Some(entry) = self.selected_entry() {
            return Some(if entry.is_directory {
                Commit::OpenDirectory(entry.path.clone())
            } else {
                Commit::ChooseFile(entry.path.clone())
            });
        }

        let path = self.typed_path()?;
        let rejection = if path.is_dir() {
            return Some(Commit::OpenDirectory(path));
        } else if !path.exists() {
            "No such file or directory"
        } else if !self.filter.accepts(&path) {
            "File type not accepted"
        } else {
            return Some(Commit::ChooseFile(path));
        };
        self.error = Some(rejection.to_string());
        None
    }

    /// Stores preview text if `path` is still the highlighted entry.
    pub fn apply_preview(&mut self, path: PathBuf, text: String) {
        if self.selected_entry().is_some_and(|entry| entry.path == path) {
            self.preview = Some(Preview::new(text));
        }
    }

    pub fn has_preview(&self) -> bool {
        self.preview.is_some()
    }

    /// Preview text visible in a viewport of `height` rows.
    pub fn visible_preview(&self, height: u16) -> Option<&str> {
        self.preview.as_ref()?.visible(height)
    }

    pub fn scroll_preview(&mut self, delta: i16, viewport: u16) {
        let Some(preview) = self.preview.as_mut() else {
            return;
        };
        let line_count = u16::try_from(preview.lines.len()).unwrap_or(u16::MAX);
        let max_scroll = line_count.saturating_sub(viewport);
        preview.scroll = preview.scroll.saturating_add_signed(delta).min(max_scroll);
    }
}

impl HasFocus for FilePickerState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_path_input);
        builder.leaf_widget(&self.f_list);
        if self.has_preview() {
            builder.leaf_widget(&self.f_preview);
        }
        builder.leaf_widget(&self.f_cancel);
        builder.leaf_widget(&self.f_confirm);
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
