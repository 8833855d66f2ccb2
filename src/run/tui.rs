use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::db::Database;
use crate::store::Store;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

/// Event poll tick; also the resolution of the search debouncer.
const TICK: Duration = Duration::from_millis(50);

pub(crate) fn as_tui(db: &mut Database) -> Result<()> {
    let mut app = App::new();
    app.load_view_modes(db)?;
    app.refresh_all(db)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app, db);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    db: &mut Database,
) -> Result<()> {
    // The view-model lives in a store; handlers mutate through update() and
    // the loop only redraws when a subscriber saw the change.
    let mut store = Store::new(app);
    let dirty = Rc::new(Cell::new(true));
    let redraw_flag = Rc::clone(&dirty);
    store.subscribe(move |_| redraw_flag.set(true));

    while store.state().running {
        // 1 tab + 1 status + 1 cmd + 2 borders + 1 header
        let content_height = terminal.size()?.height.saturating_sub(6) as usize;
        let visible = content_height.max(1);
        if store.state().visible_rows != visible {
            store.update(|app| app.visible_rows = visible);
        }

        if dirty.replace(false) {
            terminal.draw(|f| crate::ui::render::render(f, store.state()))?;
        }

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) => {
                    store.update(|app| -> Result<()> {
                        if app.show_help {
                            app.show_help = false;
                            return Ok(());
                        }
                        match app.input_mode {
                            InputMode::Normal => handle_normal_input(key, app, db),
                            InputMode::Command => handle_command_input(key, app, db),
                            InputMode::Search => handle_search_input(key, app, db),
                            InputMode::Editing => handle_editing_input(key, app, db),
                            InputMode::Confirm => handle_confirm_input(key, app, db),
                        }
                    })?;
                }
                Event::Resize(_, _) => dirty.set(true),
                _ => {}
            }
        } else if store.state().search_debounce.is_pending() {
            // Quiet tick: run the deferred search once the window elapses
            let now = Instant::now();
            store.update(|app| -> Result<()> {
                if app.search_debounce.ready(now) {
                    app.transaction_index = 0;
                    app.transaction_scroll = 0;
                    app.refresh_transactions(db)?;
                }
                Ok(())
            })?;
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, db, Screen::Dashboard)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Accounts)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Transactions)?,
        KeyCode::Char('4') => switch_screen(app, db, Screen::Categories)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, db, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Enter => handle_enter(app, db)?,
        KeyCode::Esc => handle_escape(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('v') => {
            app.toggle_view_mode(db)?;
        }
        KeyCode::Char('H') => {
            commands::handle_command("prev-range", app, db)?;
        }
        KeyCode::Char('L') => {
            commands::handle_command("next-range", app, db)?;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('D') if app.screen == Screen::Transactions => {
            commands::handle_command("delete-txn", app, db)?;
        }
        KeyCode::Char('D') if app.screen == Screen::Accounts => {
            commands::handle_command("delete-account", app, db)?;
        }
        KeyCode::Char('D') if app.screen == Screen::Categories => {
            commands::handle_command("delete-category", app, db)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.screen = Screen::Transactions;
            app.search_debounce.cancel();
            app.refresh_transactions(db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.search_debounce.cancel();
            app.refresh_transactions(db)?;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.screen = Screen::Transactions;
            app.search_debounce.mark(Instant::now());
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.screen = Screen::Transactions;
            app.search_debounce.mark(Instant::now());
        }
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let new_name = app.command_input.clone();
            if !new_name.is_empty() {
                commands::handle_command(&format!("rename {new_name}"), app, db)?;
            }
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                match action {
                    PendingAction::DeleteTransaction { id, description } => {
                        db.delete_transaction(id)?;
                        app.refresh_dashboard(db)?;
                        if app.transaction_index > 0
                            && app.transaction_index >= app.transactions.len()
                        {
                            app.transaction_index = app.transactions.len().saturating_sub(1);
                        }
                        app.set_status(format!("Deleted: {description}"));
                    }
                    PendingAction::DeleteAccount { id, name } => {
                        db.delete_account(id)?;
                        if app.transaction_filter_account == Some(id) {
                            app.transaction_filter_account = None;
                        }
                        app.refresh_dashboard(db)?;
                        if app.account_index >= app.accounts.len() {
                            app.account_index = app.accounts.len().saturating_sub(1);
                        }
                        app.set_status(format!("Deleted account: {name}"));
                    }
                    PendingAction::DeleteCategory { id, name } => {
                        db.delete_category(id)?;
                        if app.transaction_filter_category == Some(id) {
                            app.transaction_filter_category = None;
                        }
                        app.refresh_categories(db)?;
                        app.refresh_transactions(db)?;
                        if app.category_index >= app.categories.len() {
                            app.category_index = app.categories.len().saturating_sub(1);
                        }
                        app.set_status(format!("Deleted category: {name}"));
                    }
                }
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Dashboard => app.refresh_dashboard(db)?,
        Screen::Accounts => app.refresh_accounts(db)?,
        Screen::Transactions => app.refresh_transactions(db)?,
        Screen::Categories => app.refresh_categories(db)?,
    }
    app.set_status(format!("{screen}"));
    Ok(())
}

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Accounts => scroll_down(
            &mut app.account_index,
            &mut app.account_scroll,
            app.accounts.len(),
            page,
        ),
        Screen::Transactions => scroll_down(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            app.transactions.len(),
            page,
        ),
        Screen::Categories => scroll_down(
            &mut app.category_index,
            &mut app.category_scroll,
            app.categories.len(),
            page,
        ),
        Screen::Dashboard => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Accounts => scroll_up(&mut app.account_index, &mut app.account_scroll),
        Screen::Transactions => scroll_up(&mut app.transaction_index, &mut app.transaction_scroll),
        Screen::Categories => scroll_up(&mut app.category_index, &mut app.category_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Accounts => scroll_to_top(&mut app.account_index, &mut app.account_scroll),
        Screen::Transactions => {
            scroll_to_top(&mut app.transaction_index, &mut app.transaction_scroll)
        }
        Screen::Categories => scroll_to_top(&mut app.category_index, &mut app.category_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Accounts => scroll_to_bottom(
            &mut app.account_index,
            &mut app.account_scroll,
            app.accounts.len(),
            page,
        ),
        Screen::Transactions => scroll_to_bottom(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            app.transactions.len(),
            page,
        ),
        Screen::Categories => scroll_to_bottom(
            &mut app.category_index,
            &mut app.category_scroll,
            app.categories.len(),
            page,
        ),
        Screen::Dashboard => {}
    }
}

/// Enter on an account drills into its transactions.
fn handle_enter(app: &mut App, db: &mut Database) -> Result<()> {
    if app.screen == Screen::Accounts {
        if let Some(account) = app.accounts.get(app.account_index) {
            let account_id = account.id;
            let account_name = account.name.clone();
            app.transaction_filter_account = account_id;
            app.transaction_index = 0;
            app.transaction_scroll = 0;
            app.screen = Screen::Transactions;
            app.refresh_transactions(db)?;
            app.set_status(format!("Filtered by: {account_name}"));
        }
    }
    Ok(())
}

fn handle_escape(app: &mut App) {
    match app.screen {
        Screen::Transactions if app.transaction_filter_account.is_some() => {
            app.transaction_filter_account = None;
            app.set_status("Account filter cleared");
        }
        Screen::Transactions if app.transaction_filter_category.is_some() => {
            app.transaction_filter_category = None;
            app.set_status("Category filter cleared");
        }
        _ => {
            app.status_message.clear();
            app.search_input.clear();
        }
    }
}
