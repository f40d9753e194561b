//! Application state and command dispatch.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::column::{ListContext, ListOptions};
use crate::config::{Config, expand_tilde};
use crate::console::Console;
use crate::key::{Action, Key};
use crate::marks::MarkSet;
use crate::overlay;
use crate::shadow::{AvfsShadow, NoShadow, ShadowFs};
use crate::sort::SortState;
use crate::stack::{Activation, NavStack};
use crate::tabs::TabManager;

/// Environment variable holding the newline-joined marks for shell commands.
pub const MARKED_ENV: &str = "COLFM_MARKED";

/// Whether the main loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
}

/// All browser state: tabs, marks, listing options and view toggles.
pub struct Browser {
    config: Config,
    favorites: Vec<(PathBuf, String)>,
    tabs: TabManager,
    marks: MarkSet,
    options: ListOptions,
    sidebar: bool,
    /// The stack hidden while the selection view is shown.
    saved_stack: Option<NavStack>,
    shadow: Box<dyn ShadowFs>,
    /// One-shot status line text.
    message: Option<String>,
}

impl Browser {
    /// Build the browser with one tab opened at `start`.
    pub fn new(config: Config, start: &Path, marks: MarkSet) -> Self {
        let options = ListOptions {
            dotfiles: config.show_hidden,
            backups: config.show_backups,
            sort: SortState::new(config.sort, config.reverse),
        };
        let favorites = config.resolved_favorites();
        let shadow: Box<dyn ShadowFs> = match &config.avfs {
            Some(root) => Box::new(AvfsShadow::new(expand_tilde(root))),
            None => Box::new(NoShadow),
        };
        let initial = NavStack::open(
            start,
            &ListContext {
                options,
                favorites: &favorites,
                marks: &marks,
            },
            None,
        );
        tracing::info!(start = %start.display(), "browser ready");
        Self {
            sidebar: config.sidebar,
            config,
            favorites,
            tabs: TabManager::new(initial),
            marks,
            options,
            saved_stack: None,
            shadow,
            message: None,
        }
    }

    /// Replace the shadow filesystem collaborator.
    pub fn with_shadow(mut self, shadow: impl ShadowFs + 'static) -> Self {
        self.shadow = Box::new(shadow);
        self
    }

    fn parts(&mut self) -> (ListContext<'_>, &mut TabManager, &mut Option<NavStack>) {
        let ctx = ListContext {
            options: self.options,
            favorites: &self.favorites,
            marks: &self.marks,
        };
        (ctx, &mut self.tabs, &mut self.saved_stack)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    /// The live navigation stack.
    pub fn stack(&self) -> &NavStack {
        self.tabs.current()
    }

    pub fn stack_mut(&mut self) -> &mut NavStack {
        self.tabs.current_mut()
    }

    pub fn marks(&self) -> &MarkSet {
        &self.marks
    }

    pub fn options(&self) -> ListOptions {
        self.options
    }

    pub fn in_selection_view(&self) -> bool {
        self.saved_stack.is_some()
    }

    /// The sidebar is hidden while the selection view is up.
    pub fn sidebar_visible(&self) -> bool {
        self.sidebar && !self.in_selection_view()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Directory for new files and external commands.
    pub fn working_directory(&self) -> Option<&Path> {
        self.stack()
            .working_directory()
            .or_else(|| self.saved_stack.as_ref()?.working_directory())
    }

    /// Main loop: draw, read a key, dispatch, until quit.
    pub fn run(&mut self, console: &mut dyn Console) -> io::Result<()> {
        loop {
            console.draw(self, self.message.as_deref())?;
            let key = console.read_key()?;
            self.message = None;
            if self.handle_key(key, console)? == Step::Quit {
                return Ok(());
            }
        }
    }

    pub fn handle_key(&mut self, key: Key, console: &mut dyn Console) -> io::Result<Step> {
        match Action::from_key(key) {
            Some(action) => self.handle(action, console),
            None => Ok(Step::Continue),
        }
    }

    pub fn handle(&mut self, action: Action, console: &mut dyn Console) -> io::Result<Step> {
        let half_page = (console.size().1 / 2).max(1) as isize;
        match action {
            Action::Activate => self.activate(console),
            Action::Leave => {
                self.leave();
            }
            Action::LineDown => self.stack_mut().active_mut().move_cursor(1),
            Action::LineUp => self.stack_mut().active_mut().move_cursor(-1),
            Action::HalfPageDown => self.stack_mut().active_mut().move_cursor(half_page),
            Action::HalfPageUp => self.stack_mut().active_mut().move_cursor(-half_page),
            Action::First => self.stack_mut().active_mut().first(),
            Action::Last => self.stack_mut().active_mut().last(),
            Action::ToggleDotfiles => {
                self.options.dotfiles = !self.options.dotfiles;
                self.refresh_all();
            }
            Action::ToggleBackups => {
                self.options.backups = !self.options.backups;
                self.refresh_all();
            }
            Action::ToggleSidebar => self.sidebar = !self.sidebar,
            Action::ToggleSelectionView => self.toggle_selection_view(),
            Action::CycleSort => self.set_sort(SortState {
                key: self.options.sort.key.next(),
                ..self.options.sort
            }),
            Action::ToggleReverse => self.set_sort(SortState {
                reverse: !self.options.sort.reverse,
                ..self.options.sort
            }),
            Action::Search => {
                overlay::search(self, console)?;
            }
            Action::Select => {
                overlay::select(self, console)?;
            }
            Action::ToggleMark => self.toggle_mark(),
            Action::ClearMarks => self.replace_marks(MarkSet::new()),
            Action::OpenTab => self.open_tab(),
            Action::CloseTab => self.close_tab(),
            Action::NextTab => self.switch_tab(1),
            Action::PrevTab => self.switch_tab(-1),
            Action::Shell => self.shell(console)?,
            Action::Mkdir => self.mkdir(console)?,
            Action::GoTo => self.go_to_prompt(console)?,
            Action::CopyMarks => self.copy_marks(console),
            Action::MoveMarks => self.move_marks(console),
            Action::DeleteMarks => self.delete_marks(console)?,
            Action::Refresh => self.refresh_all(),
            Action::Quit => return Ok(Step::Quit),
        }
        Ok(Step::Continue)
    }

    /// Descend into the selected entry, or show it in the viewer.
    pub fn activate(&mut self, console: &mut dyn Console) {
        let ctx = ListContext {
            options: self.options,
            favorites: &self.favorites,
            marks: &self.marks,
        };
        let outcome = self.tabs.current_mut().activate(&ctx, self.shadow.as_ref());
        if let Activation::View(path) = outcome {
            self.view(&path, console);
        }
    }

    /// Descend only if the selection is a directory.
    pub fn descend_selected(&mut self) -> bool {
        if !self.stack().active().selected().is_dir() {
            return false;
        }
        let (ctx, tabs, _) = self.parts();
        tabs.current_mut().activate(&ctx, &NoShadow) == Activation::Descended
    }

    pub fn leave(&mut self) -> bool {
        self.stack_mut().leave()
    }

    fn view(&mut self, path: &Path, console: &mut dyn Console) {
        let mut words = self.config.viewer.split_whitespace();
        let Some(program) = words.next() else {
            self.set_message("no viewer configured");
            return;
        };
        let mut command = Command::new(program);
        command.args(words).arg(path);
        self.run_external(console, command, "viewer");
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.options.sort = sort;
        tracing::debug!(sort = %sort.label(), "sort changed");
        self.refresh_all();
    }

    /// Re-list every column in every tab.
    pub fn refresh_all(&mut self) {
        let (ctx, tabs, saved) = self.parts();
        for stack in tabs.tabs_mut() {
            stack.refresh(&ctx);
        }
        if let Some(saved) = saved {
            saved.refresh(&ctx);
        }
    }

    pub fn toggle_mark(&mut self) {
        let Some(path) = self.stack().active().selected().path().map(Path::to_path_buf) else {
            return;
        };
        self.marks.toggle(&path);
        self.refresh_selection();
    }

    /// Swap in a whole new mark set.
    pub fn replace_marks(&mut self, marks: MarkSet) {
        self.marks = marks;
        self.refresh_selection();
    }

    fn refresh_selection(&mut self) {
        let (ctx, tabs, _) = self.parts();
        tabs.current_mut().refresh_selection(&ctx);
    }

    pub fn toggle_selection_view(&mut self) {
        if !self.exit_selection_view() {
            self.enter_selection_view();
        }
    }

    /// Replace the live stack with a single column listing the marks.
    pub fn enter_selection_view(&mut self) {
        if self.saved_stack.is_some() {
            return;
        }
        let (ctx, tabs, saved) = self.parts();
        let selection = NavStack::selection(&ctx);
        *saved = Some(std::mem::replace(tabs.current_mut(), selection));
    }

    /// Put back the stack saved by [`Self::enter_selection_view`].
    pub fn exit_selection_view(&mut self) -> bool {
        let Some(saved) = self.saved_stack.take() else {
            return false;
        };
        *self.tabs.current_mut() = saved;
        true
    }

    pub fn open_tab(&mut self) {
        self.exit_selection_view();
        let (ctx, tabs, _) = self.parts();
        if !tabs.open_child_tab(&ctx) {
            self.set_message("not a directory");
        }
    }

    pub fn close_tab(&mut self) {
        self.exit_selection_view();
        self.tabs.close();
    }

    pub fn switch_tab(&mut self, delta: isize) {
        self.exit_selection_view();
        self.tabs.switch(delta);
    }

    /// Rebuild the live stack at `path`. Relative paths resolve against the
    /// working directory.
    pub fn go_to(&mut self, path: &Path) -> bool {
        let target = match self.working_directory() {
            Some(cwd) if path.is_relative() => cwd.join(path),
            _ => path.to_path_buf(),
        };
        let Ok(target) = target.canonicalize() else {
            self.set_message(format!("{}: not found", target.display()));
            return false;
        };
        self.exit_selection_view();
        let (ctx, tabs, _) = self.parts();
        let stack = NavStack::open(&target, &ctx, Some(tabs.current()));
        *tabs.current_mut() = stack;
        tracing::info!(path = %target.display(), "go to");
        true
    }

    fn go_to_prompt(&mut self, console: &mut dyn Console) -> io::Result<()> {
        let initial = self
            .working_directory()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        if let Some(text) = overlay::prompt(self, console, "Go to: ", &initial)? {
            let text = text.trim();
            if !text.is_empty() {
                self.go_to(&expand_tilde(text));
            }
        }
        Ok(())
    }

    fn shell(&mut self, console: &mut dyn Console) -> io::Result<()> {
        let Some(line) = overlay::prompt(self, console, "!", "")? else {
            return Ok(());
        };
        if line.trim().is_empty() {
            return Ok(());
        }
        let mut command = Command::new(self.config.shell());
        command
            .arg("-c")
            .arg(&line)
            .env(MARKED_ENV, self.marks.serialize());
        if let Some(cwd) = self.working_directory() {
            command.current_dir(cwd);
        }
        self.run_external(console, command, "command");
        self.refresh_all();
        Ok(())
    }

    fn mkdir(&mut self, console: &mut dyn Console) -> io::Result<()> {
        let Some(name) = overlay::prompt(self, console, "mkdir: ", "")? else {
            return Ok(());
        };
        let name = name.trim();
        let Some(cwd) = self.working_directory().map(Path::to_path_buf) else {
            self.set_message("no directory here");
            return Ok(());
        };
        if name.is_empty() {
            return Ok(());
        }
        let mut command = Command::new("mkdir");
        command.arg("-p").arg("--").arg(name).current_dir(&cwd);
        let created = self.run_external(console, command, "mkdir");
        self.refresh_all();
        if created && self.stack().directory() == Some(cwd.as_path()) {
            self.stack_mut().active_mut().select_by_name(name);
        }
        Ok(())
    }

    fn marked_paths(&self) -> Vec<OsString> {
        self.marks.iter().map(|p| p.as_os_str().to_owned()).collect()
    }

    /// `cp -r` every marked path into the working directory.
    pub fn copy_marks(&mut self, console: &mut dyn Console) {
        let Some((paths, dest)) = self.bulk_target() else {
            return;
        };
        let mut command = Command::new("cp");
        command.arg("-r").arg("--").args(paths).arg(dest);
        self.run_external(console, command, "cp");
        self.refresh_all();
    }

    /// `mv` every marked path into the working directory. The marks are
    /// cleared on success.
    pub fn move_marks(&mut self, console: &mut dyn Console) {
        let Some((paths, dest)) = self.bulk_target() else {
            return;
        };
        let mut command = Command::new("mv");
        command.arg("--").args(paths).arg(dest);
        if self.run_external(console, command, "mv") {
            self.marks.clear();
        }
        self.refresh_all();
    }

    /// `rm -rf` every marked path after confirmation. The marks are cleared
    /// on success.
    pub fn delete_marks(&mut self, console: &mut dyn Console) -> io::Result<()> {
        if self.marks.is_empty() {
            self.set_message("nothing marked");
            return Ok(());
        }
        let question = format!("Delete {} marked?", self.marks.len());
        if !overlay::confirm(self, console, &question)? {
            return Ok(());
        }
        let mut command = Command::new("rm");
        command.arg("-rf").arg("--").args(self.marked_paths());
        if self.run_external(console, command, "rm") {
            self.marks.clear();
        }
        self.refresh_all();
        Ok(())
    }

    fn bulk_target(&mut self) -> Option<(Vec<OsString>, PathBuf)> {
        if self.marks.is_empty() {
            self.set_message("nothing marked");
            return None;
        }
        let Some(dest) = self.working_directory().map(Path::to_path_buf) else {
            self.set_message("no directory here");
            return None;
        };
        Some((self.marked_paths(), dest))
    }

    /// Run `command` in the foreground. Failures end up on the status line.
    fn run_external(&mut self, console: &mut dyn Console, mut command: Command, what: &str) -> bool {
        tracing::info!(program = ?command.get_program(), "running {what}");
        match console.run_foreground(&mut command) {
            Ok(status) if status.success() => true,
            Ok(status) => {
                tracing::warn!(%status, "{what} failed");
                self.set_message(format!("{what}: {status}"));
                false
            }
            Err(e) => {
                tracing::warn!("{what} could not start: {e}");
                self.set_message(format!("{what}: {e}"));
                false
            }
        }
    }
}
