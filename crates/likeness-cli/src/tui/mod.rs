use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use likeness_core::{CatalogStore, MatchResult};
use likeness_images::{ImageResolution, ResolverChain};
use ratatui::prelude::*;

pub mod character_list;
pub mod match_view;

/// Which view the TUI is currently displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    CharacterList,
    Match,
}

/// Something the event loop must do outside of key handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Reveal the match for the character at this catalog index.
    Reveal(usize),
}

/// A one-line message under the character list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Busy(String),
    Error(String),
}

/// A revealed match, with images for both sides.
#[derive(Debug)]
pub struct Reveal {
    pub query_name: String,
    pub result: MatchResult,
    pub query_image: ImageResolution,
    pub match_image: ImageResolution,
}

/// Application state for the reveal TUI.
#[derive(Debug)]
pub struct App {
    pub view: View,
    pub names: Vec<String>,
    pub selected: usize,
    pub list_offset: usize, // First visible character in the list
    pub reveal: Option<Reveal>,
    pub notice: Option<Notice>,
    pub should_quit: bool,
}

impl App {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            view: View::CharacterList,
            names,
            selected: 0,
            list_offset: 0,
            reveal: None,
            notice: None,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> Option<Action> {
        match self.view {
            View::CharacterList => self.handle_list_key(key),
            View::Match => {
                self.handle_match_key(key);
                None
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyCode) -> Option<Action> {
        // Assume reasonable viewport height (will be refined in render)
        const VIEWPORT_HEIGHT: usize = 20;

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < self.names.len() {
                    self.selected += 1;
                    if self.selected >= self.list_offset + VIEWPORT_HEIGHT {
                        self.list_offset = self.selected + 1 - VIEWPORT_HEIGHT;
                    }
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                    if self.selected < self.list_offset {
                        self.list_offset = self.selected;
                    }
                }
            }
            KeyCode::Enter => {
                if self.selected < self.names.len() {
                    return Some(Action::Reveal(self.selected));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_match_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') => {
                self.view = View::CharacterList;
            }
            _ => {}
        }
    }

    /// Show a finished reveal, or the error that prevented it.
    fn finish_reveal(&mut self, outcome: likeness_core::Result<Reveal>) {
        match outcome {
            Ok(reveal) => {
                self.reveal = Some(reveal);
                self.notice = None;
                self.view = View::Match;
            }
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }
}

/// Match the character at `index` and resolve images for both sides.
async fn reveal(
    store: &CatalogStore,
    chain: &ResolverChain,
    index: usize,
) -> likeness_core::Result<Reveal> {
    let result = store.best_match(index)?;
    let query_name = store
        .catalog()
        .get(index)
        .map(|r| r.name.clone())
        .unwrap_or_default();

    let (query_image, match_image) =
        tokio::join!(chain.resolve(&query_name), chain.resolve(&result.match_name));

    Ok(Reveal {
        query_name,
        result,
        query_image,
        match_image,
    })
}

/// Run the reveal TUI.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub async fn run_tui(store: &CatalogStore, chain: &ResolverChain) -> Result<()> {
    let app = App::new(store.catalog().names().map(str::to_string).collect());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the event loop, capturing any error so we can restore the terminal
    let result = run_event_loop(&mut terminal, app, store, chain).await;

    // Restore terminal regardless of success or failure
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn draw(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &App) -> Result<()> {
    terminal.draw(|frame| match app.view {
        View::CharacterList => character_list::render(frame, app),
        View::Match => match_view::render(frame, app),
    })?;
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    store: &CatalogStore,
    chain: &ResolverChain,
) -> Result<()> {
    loop {
        draw(terminal, &app)?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if let Some(Action::Reveal(index)) = app.handle_key(key.code) {
                    app.notice = Some(Notice::Busy("Revealing match...".to_string()));
                    draw(terminal, &app)?;

                    let outcome = reveal(store, chain, index).await;
                    app.finish_reveal(outcome);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use likeness_core::{Catalog, VectorMatrix};

    fn app(count: usize) -> App {
        App::new((0..count).map(|i| format!("Character {i}")).collect())
    }

    #[test]
    fn test_navigation_scrolls_viewport() {
        let mut app = app(30);
        for _ in 0..25 {
            assert_eq!(app.handle_key(KeyCode::Down), None);
        }
        assert_eq!(app.selected, 25);
        assert_eq!(app.list_offset, 6);

        for _ in 0..25 {
            app.handle_key(KeyCode::Char('k'));
        }
        assert_eq!(app.selected, 0);
        assert_eq!(app.list_offset, 0);
    }

    #[test]
    fn test_navigation_stops_at_ends() {
        let mut app = app(2);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected, 0);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_enter_requests_reveal() {
        let mut app = app(3);
        app.handle_key(KeyCode::Char('j'));
        assert_eq!(app.handle_key(KeyCode::Enter), Some(Action::Reveal(1)));
        assert_eq!(app.view, View::CharacterList);
    }

    #[test]
    fn test_enter_on_empty_list_does_nothing() {
        let mut app = app(0);
        assert_eq!(app.handle_key(KeyCode::Enter), None);
    }

    #[test]
    fn test_quit_and_back() {
        let mut app = app(3);
        app.view = View::Match;
        app.handle_key(KeyCode::Char('b'));
        assert_eq!(app.view, View::CharacterList);
        assert!(!app.should_quit);
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_reveal_switches_view() {
        let store = CatalogStore::from_parts(
            Catalog::from_names(["Jon", "Daenerys", "Tyrion"]).unwrap(),
            VectorMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![-1.0, 0.0]])
                .unwrap(),
        )
        .unwrap();
        let chain = ResolverChain::new();

        let mut app = App::new(store.catalog().names().map(str::to_string).collect());
        app.finish_reveal(reveal(&store, &chain, 0).await);

        assert_eq!(app.view, View::Match);
        let shown = app.reveal.as_ref().unwrap();
        assert_eq!(shown.query_name, "Jon");
        assert_eq!(shown.result.match_name, "Daenerys");
        assert!(!shown.match_image.is_available());
    }

    #[tokio::test]
    async fn test_reveal_error_stays_on_list() {
        let store = CatalogStore::from_parts(
            Catalog::from_names(["Hodor"]).unwrap(),
            VectorMatrix::from_rows(vec![vec![1.0]]).unwrap(),
        )
        .unwrap();
        let chain = ResolverChain::new();

        let mut app = App::new(vec!["Hodor".to_string()]);
        app.finish_reveal(reveal(&store, &chain, 0).await);

        assert_eq!(app.view, View::CharacterList);
        assert!(matches!(app.notice, Some(Notice::Error(_))));
    }
}
