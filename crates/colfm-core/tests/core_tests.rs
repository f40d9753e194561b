use colfm_core::{
    Action, AvfsShadow, Browser, Config, Console, Entry, Key, MARKED_ENV, MarkSet, SortKey, SortState,
    Source, Step,
};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tempfile::TempDir;

/// A command the browser asked to run.
#[derive(Debug, Clone)]
struct Recorded {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    marked: Option<String>,
}

/// Plays back queued keys and records everything else.
struct ScriptedConsole {
    keys: VecDeque<Key>,
    commands: Vec<Recorded>,
    statuses: Vec<Option<String>>,
    exit_code: i32,
}

impl ScriptedConsole {
    fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            commands: Vec::new(),
            statuses: Vec::new(),
            exit_code: 0,
        }
    }

    fn typed(text: &str) -> Vec<Key> {
        text.chars().map(Key::Char).collect()
    }
}

impl Console for ScriptedConsole {
    fn read_key(&mut self) -> io::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn draw(&mut self, _browser: &Browser, status: Option<&str>) -> io::Result<()> {
        self.statuses.push(status.map(str::to_string));
        Ok(())
    }

    fn run_foreground(&mut self, command: &mut Command) -> io::Result<ExitStatus> {
        let marked = command
            .get_envs()
            .find(|(k, _)| *k == MARKED_ENV)
            .and_then(|(_, v)| v.map(|v| v.to_string_lossy().into_owned()));
        self.commands.push(Recorded {
            program: command.get_program().to_string_lossy().into_owned(),
            args: command
                .get_args()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
            cwd: command.get_current_dir().map(Path::to_path_buf),
            marked,
        });
        Ok(ExitStatus::from_raw(self.exit_code << 8))
    }

    fn size(&self) -> (u16, u16) {
        (100, 24)
    }
}

/// `d/` with `a.txt`, `b.txt` and `sub/`.
fn fixture() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("d");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), "alpha").unwrap();
    fs::write(root.join("b.txt"), "bravo bravo").unwrap();
    let root = root.canonicalize().unwrap();
    (temp, root)
}

fn config() -> Config {
    Config {
        shell: Some("/bin/sh".to_string()),
        ..Config::default()
    }
}

fn browser(root: &Path) -> Browser {
    Browser::new(config(), root, MarkSet::new())
}

fn labels(browser: &Browser) -> Vec<String> {
    browser
        .stack()
        .active()
        .entries()
        .iter()
        .map(|e| e.format(200, false).trim_end().to_string())
        .collect()
}

fn names(browser: &Browser) -> Vec<String> {
    browser
        .stack()
        .active()
        .entries()
        .iter()
        .map(|e| e.name().to_string())
        .collect()
}

fn run_keys(browser: &mut Browser, keys: Vec<Key>) -> ScriptedConsole {
    let mut console = ScriptedConsole::new(keys);
    browser.run(&mut console).unwrap();
    console
}

#[test]
fn test_open_lists_directories_first() {
    let (_temp, root) = fixture();
    let browser = browser(&root);
    assert_eq!(browser.stack().directory(), Some(root.as_path()));
    assert_eq!(labels(&browser), vec!["sub/", "a.txt", "b.txt"]);
}

#[test]
fn test_descending_into_empty_directory_shows_placeholder() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);
    browser.handle(Action::Activate, &mut console).unwrap();

    assert_eq!(browser.stack().directory(), Some(root.join("sub").as_path()));
    let entries = browser.stack().active().entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].is_placeholder());
    assert_eq!(entries[0].ls_l(), "-- empty --");
}

#[test]
fn test_leave_undoes_activate() {
    let (_temp, root) = fixture();
    fs::create_dir(root.join("zed")).unwrap();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);
    let depth = browser.stack().columns().len();

    browser.handle(Action::LineDown, &mut console).unwrap();
    assert_eq!(browser.stack().active().selected().name(), "zed");
    browser.handle(Action::Activate, &mut console).unwrap();
    assert_eq!(browser.stack().directory(), Some(root.join("zed").as_path()));

    browser.handle(Action::Leave, &mut console).unwrap();
    assert_eq!(browser.stack().columns().len(), depth);
    assert_eq!(browser.stack().active().cursor(), 1);
    assert_eq!(browser.stack().active().selected().name(), "zed");
}

#[test]
fn test_activate_archive_with_shadow_mount() {
    let (_temp, root) = fixture();
    let mount = TempDir::new().unwrap();
    let avfs = AvfsShadow::new(mount.path());
    let shadow = avfs.shadow_path(&root.join("a.txt"));
    fs::create_dir_all(shadow.join("member")).unwrap();

    let mut browser =
        Browser::new(config(), &root.join("a.txt"), MarkSet::new()).with_shadow(avfs);
    let mut console = ScriptedConsole::new([]);
    assert_eq!(browser.stack().active().selected().name(), "a.txt");

    browser.handle(Action::Activate, &mut console).unwrap();
    assert!(console.commands.is_empty());
    assert_eq!(browser.stack().directory(), Some(shadow.as_path()));
    assert_eq!(names(&browser), vec!["member"]);
}

#[test]
fn test_six_sort_cycles_restore_order() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);
    let before = names(&browser);

    for _ in 0..6 {
        browser.handle(Action::CycleSort, &mut console).unwrap();
    }
    assert_eq!(browser.options().sort.key, SortKey::Name);
    assert_eq!(names(&browser), before);
}

#[test]
fn test_sort_is_idempotent() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    browser.set_sort(SortState::new(SortKey::Size, true));
    let first = names(&browser);
    browser.set_sort(SortState::new(SortKey::Size, true));
    assert_eq!(names(&browser), first);
    assert_eq!(first, vec!["b.txt", "a.txt", "sub"]);
}

#[test]
fn test_search_skips_to_next_match() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut keys = vec![Key::Char('/'), Key::Char('b'), Key::Enter];
    keys.push(Key::Char('q'));
    let console = run_keys(&mut browser, keys);

    assert_eq!(browser.stack().active().cursor(), 2);
    assert!(
        console
            .statuses
            .iter()
            .any(|s| s.as_deref() == Some("I-Search: b"))
    );
}

#[test]
fn test_search_cancel_restores_anchor() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    browser.stack_mut().active_mut().set_cursor(1);
    let keys = vec![Key::Char('/'), Key::Char('b'), Key::Esc, Key::Char('q')];
    run_keys(&mut browser, keys);
    assert_eq!(browser.stack().active().cursor(), 1);
}

#[test]
fn test_search_slash_descends_into_match() {
    let (_temp, root) = fixture();
    fs::write(root.join("sub/inner"), "").unwrap();
    let mut browser = browser(&root);
    let mut keys = vec![Key::Char('/')];
    keys.extend(ScriptedConsole::typed("su/"));
    keys.extend([Key::Enter, Key::Char('q')]);
    run_keys(&mut browser, keys);

    assert_eq!(browser.stack().directory(), Some(root.join("sub").as_path()));
    assert_eq!(names(&browser), vec!["inner"]);
}

#[test]
fn test_search_dotdot_ascends() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut keys = vec![Key::Char('/')];
    keys.extend(ScriptedConsole::typed(".."));
    keys.extend([Key::Esc, Key::Char('q')]);
    run_keys(&mut browser, keys);

    assert_eq!(browser.stack().directory(), root.parent());
    assert_eq!(browser.stack().active().selected().name(), "d");
}

#[test]
fn test_search_ends_on_navigation_key() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let keys = vec![Key::Char('/'), Key::Char('a'), Key::Down, Key::Char('q')];
    run_keys(&mut browser, keys);
    assert_eq!(browser.stack().active().selected().name(), "a.txt");
}

#[test]
fn test_select_marks_matches_and_cancel_restores() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut keys = vec![Key::Char('%')];
    keys.extend(ScriptedConsole::typed("txt"));
    keys.extend([Key::Enter, Key::Char('q')]);
    run_keys(&mut browser, keys);
    assert_eq!(browser.marks().len(), 2);
    assert!(browser.marks().contains(&root.join("a.txt")));

    let mut keys = vec![Key::Char('%')];
    keys.extend(ScriptedConsole::typed("sub"));
    keys.extend([Key::Ctrl('g'), Key::Char('q')]);
    run_keys(&mut browser, keys);
    assert_eq!(browser.marks().len(), 2);
    assert!(!browser.marks().contains(&root.join("sub")));
}

#[test]
fn test_select_erased_buffer_restores_prior_marks() {
    let (_temp, root) = fixture();
    let marks: MarkSet = [root.join("b.txt")].into_iter().collect();
    let mut browser = Browser::new(config(), &root, marks);
    let keys = vec![
        Key::Char('%'),
        Key::Char('a'),
        Key::Backspace,
        Key::Enter,
        Key::Char('q'),
    ];
    run_keys(&mut browser, keys);
    assert_eq!(
        browser.marks().iter().collect::<Vec<_>>(),
        vec![root.join("b.txt").as_path()]
    );
}

#[test]
fn test_select_invalid_pattern_keeps_marks() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut keys = vec![Key::Char('%')];
    keys.extend(ScriptedConsole::typed("a.t["));
    keys.extend([Key::Enter, Key::Char('q')]);
    run_keys(&mut browser, keys);
    assert_eq!(
        browser.marks().iter().collect::<Vec<_>>(),
        vec![root.join("a.txt").as_path()]
    );
}

#[test]
fn test_toggle_mark_twice_is_identity() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let keys = vec![Key::Char('j'), Key::Char('m'), Key::Char(' '), Key::Char('q')];
    run_keys(&mut browser, keys);
    assert!(browser.marks().is_empty());
}

#[test]
fn test_selection_view_round_trip() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);
    browser.stack_mut().active_mut().set_cursor(2);
    browser.handle(Action::ToggleMark, &mut console).unwrap();
    let depth = browser.stack().columns().len();

    browser.handle(Action::ToggleSelectionView, &mut console).unwrap();
    assert!(browser.in_selection_view());
    assert_eq!(browser.stack().columns().len(), 1);
    assert_eq!(browser.stack().active().source(), &Source::Selection);
    let label = browser.stack().active().selected().format(200, false);
    assert_eq!(label.trim_end(), root.join("b.txt").display().to_string());

    browser.handle(Action::ToggleSelectionView, &mut console).unwrap();
    assert!(!browser.in_selection_view());
    assert_eq!(browser.stack().columns().len(), depth);
    assert_eq!(browser.stack().active().cursor(), 2);
}

#[test]
fn test_sidebar_hidden_in_selection_view() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);
    browser.handle(Action::ToggleSidebar, &mut console).unwrap();
    assert!(browser.sidebar_visible());
    browser.enter_selection_view();
    assert!(!browser.sidebar_visible());
    browser.exit_selection_view();
    assert!(browser.sidebar_visible());
}

#[test]
fn test_selection_column_follows_marks() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    browser.enter_selection_view();
    assert!(browser.stack().active().selected().is_placeholder());

    browser.replace_marks([root.join("a.txt")].into_iter().collect());
    let entries = browser.stack().active().entries();
    assert_eq!(entries.len(), 1);
    assert!(matches!(entries[0], Entry::Favorite(_)));
}

#[test]
fn test_tabs_are_independent() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let keys = vec![Key::Char('t'), Key::Char('h'), Key::Tab, Key::Char('q')];
    run_keys(&mut browser, keys);

    assert_eq!(browser.tabs().len(), 2);
    assert_eq!(browser.tabs().current_index(), 0);
    assert_eq!(browser.stack().directory(), Some(root.as_path()));
    assert_eq!(browser.tabs().tabs()[1].directory(), Some(root.as_path()));

    let mut console = ScriptedConsole::new([]);
    browser.handle(Action::CloseTab, &mut console).unwrap();
    browser.handle(Action::CloseTab, &mut console).unwrap();
    assert_eq!(browser.tabs().len(), 1);
}

#[test]
fn test_switching_tabs_leaves_selection_view() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);
    browser.handle(Action::OpenTab, &mut console).unwrap();
    browser.enter_selection_view();
    browser.handle(Action::PrevTab, &mut console).unwrap();
    assert!(!browser.in_selection_view());
    assert_eq!(
        browser.tabs().tabs()[1].directory(),
        Some(root.join("sub").as_path())
    );
}

#[test]
fn test_activating_file_runs_viewer() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);
    browser.stack_mut().active_mut().select_by_name("a.txt");
    browser.handle(Action::Activate, &mut console).unwrap();

    assert_eq!(console.commands.len(), 1);
    assert_eq!(console.commands[0].program, "less");
    assert_eq!(
        console.commands[0].args,
        vec![root.join("a.txt").display().to_string()]
    );
    assert_eq!(browser.stack().directory(), Some(root.as_path()));
}

#[test]
fn test_failed_viewer_reports_status() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);
    console.exit_code = 2;
    browser.stack_mut().active_mut().select_by_name("b.txt");
    browser.handle(Action::Activate, &mut console).unwrap();
    assert!(browser.message().is_some_and(|m| m.starts_with("viewer:")));
}

#[test]
fn test_shell_command_sees_marks() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    browser.replace_marks([root.join("a.txt"), root.join("b.txt")].into_iter().collect());
    let mut keys = vec![Key::Char('!')];
    keys.extend(ScriptedConsole::typed("ls"));
    keys.extend([Key::Enter, Key::Char('q')]);
    let console = run_keys(&mut browser, keys);

    let command = &console.commands[0];
    assert_eq!(command.program, "/bin/sh");
    assert_eq!(command.args, vec!["-c", "ls"]);
    assert_eq!(command.cwd.as_deref(), Some(root.as_path()));
    let expected = format!(
        "{}\n{}\n",
        root.join("a.txt").display(),
        root.join("b.txt").display()
    );
    assert_eq!(command.marked.as_deref(), Some(expected.as_str()));
}

#[test]
fn test_cancelled_prompt_runs_nothing() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let keys = vec![Key::Char('!'), Key::Char('x'), Key::Esc, Key::Char('q')];
    let console = run_keys(&mut browser, keys);
    assert!(console.commands.is_empty());
}

#[test]
fn test_delete_requires_confirmation() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    browser.replace_marks([root.join("a.txt")].into_iter().collect());

    let keys = vec![Key::Char('D'), Key::Char('n'), Key::Enter, Key::Char('q')];
    let console = run_keys(&mut browser, keys);
    assert!(console.commands.is_empty());
    assert_eq!(browser.marks().len(), 1);

    let keys = vec![Key::Char('D'), Key::Char('y'), Key::Enter, Key::Char('q')];
    let console = run_keys(&mut browser, keys);
    assert_eq!(console.commands[0].program, "rm");
    assert_eq!(
        console.commands[0].args,
        vec![
            "-rf".to_string(),
            "--".to_string(),
            root.join("a.txt").display().to_string()
        ]
    );
    assert!(browser.marks().is_empty());
}

#[test]
fn test_move_keeps_marks_on_failure() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    browser.replace_marks([root.join("a.txt")].into_iter().collect());
    let mut console = ScriptedConsole::new([]);
    console.exit_code = 1;
    browser.handle(Action::MoveMarks, &mut console).unwrap();

    assert_eq!(console.commands[0].program, "mv");
    assert_eq!(console.commands[0].args.last().map(String::as_str), root.to_str());
    assert_eq!(browser.marks().len(), 1);
    assert!(browser.message().is_some());

    console.exit_code = 0;
    browser.handle(Action::MoveMarks, &mut console).unwrap();
    assert!(browser.marks().is_empty());
}

#[test]
fn test_copy_with_nothing_marked() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);
    browser.handle(Action::CopyMarks, &mut console).unwrap();
    assert!(console.commands.is_empty());
    assert_eq!(browser.message(), Some("nothing marked"));
}

#[test]
fn test_mkdir_runs_in_working_directory() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut keys = vec![Key::Char('+')];
    keys.extend(ScriptedConsole::typed("new"));
    keys.extend([Key::Enter, Key::Char('q')]);
    let console = run_keys(&mut browser, keys);

    assert_eq!(console.commands[0].program, "mkdir");
    assert_eq!(console.commands[0].args, vec!["-p", "--", "new"]);
    assert_eq!(console.commands[0].cwd.as_deref(), Some(root.as_path()));
}

#[test]
fn test_go_to_relative_and_hidden() {
    let (_temp, root) = fixture();
    fs::create_dir(root.join(".cache")).unwrap();
    let mut browser = browser(&root);

    assert!(browser.go_to(Path::new(".cache")));
    assert_eq!(browser.stack().directory(), Some(root.join(".cache").as_path()));

    assert!(!browser.go_to(Path::new("/definitely/not/here")));
    assert_eq!(browser.stack().directory(), Some(root.join(".cache").as_path()));
    assert!(browser.message().is_some());
}

#[test]
fn test_go_to_prompt() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root.join("sub"));
    let mut keys = vec![Key::Char(':'), Key::Ctrl('u')];
    keys.extend(ScriptedConsole::typed(&root.display().to_string()));
    keys.extend([Key::Enter, Key::Char('q')]);
    run_keys(&mut browser, keys);
    assert_eq!(browser.stack().directory(), Some(root.as_path()));
}

#[test]
fn test_dotfile_toggle_refreshes_all_tabs() {
    let (_temp, root) = fixture();
    fs::write(root.join(".hidden"), "").unwrap();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);
    browser.handle(Action::OpenTab, &mut console).unwrap();
    browser.handle(Action::ToggleDotfiles, &mut console).unwrap();

    let first = browser.tabs().tabs()[0].active();
    assert!(first.entries().iter().any(|e| e.name() == ".hidden"));
}

#[test]
fn test_half_page_and_ends() {
    let temp = TempDir::new().unwrap();
    for i in 0..40 {
        fs::write(temp.path().join(format!("f{i:02}")), "").unwrap();
    }
    let root = temp.path().canonicalize().unwrap();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);

    browser.handle(Action::HalfPageDown, &mut console).unwrap();
    assert_eq!(browser.stack().active().cursor(), 12);
    browser.handle(Action::Last, &mut console).unwrap();
    assert_eq!(browser.stack().active().cursor(), 39);
    browser.handle(Action::LineDown, &mut console).unwrap();
    assert_eq!(browser.stack().active().cursor(), 39);
    browser.handle(Action::HalfPageUp, &mut console).unwrap();
    assert_eq!(browser.stack().active().cursor(), 27);
    browser.handle(Action::First, &mut console).unwrap();
    assert_eq!(browser.stack().active().cursor(), 0);
}

#[test]
fn test_quit_step() {
    let (_temp, root) = fixture();
    let mut browser = browser(&root);
    let mut console = ScriptedConsole::new([]);
    assert_eq!(browser.handle(Action::Quit, &mut console).unwrap(), Step::Quit);
    assert_eq!(
        browser.handle_key(Key::Char('z'), &mut console).unwrap(),
        Step::Continue
    );
}
