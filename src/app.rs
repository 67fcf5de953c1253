use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::query::CatalogQuery;
use crate::ui::renderfns::{draw_footer, draw_header};
use crate::ui::view::{View, ViewAction, ViewContext};
use crate::ui::views::HomeView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::info;

const TICK_RATE: Duration = Duration::from_millis(250);

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Catalog loading, shared by every view
  query: CatalogQuery,

  /// Application configuration
  config: Config,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, query: CatalogQuery) -> Self {
    let root = {
      let ctx = ViewContext {
        query: &query,
        ui: &config.ui,
      };
      HomeView::new(&ctx)
    };

    Self {
      view_stack: vec![Box::new(root)],
      query,
      config,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let result = self.event_loop().await;

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    self.query.cancel();
    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(TICK_RATE);

    self.query.start();
    self.tick();

    while !self.should_quit {
      terminal.draw(|frame| self.draw(frame))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }

    info!("exiting");
    Ok(())
  }

  /// Commit finished loads, then let the top view catch up
  fn tick(&mut self) {
    self.query.poll();
    let ctx = ViewContext {
      query: &self.query,
      ui: &self.config.ui,
    };
    if let Some(view) = self.view_stack.last_mut() {
      view.tick(&ctx);
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let ctx = ViewContext {
      query: &self.query,
      ui: &self.config.ui,
    };
    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key, &ctx),
      None => ViewAction::None,
    };
    self.apply(action);
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
          // The view underneath may have missed ticks
          self.tick();
        } else {
          self.should_quit = true;
        }
      }
      ViewAction::Refresh => {
        info!("manual refresh");
        self.query.refresh();
      }
      ViewAction::Quit => self.should_quit = true,
    }
  }

  fn draw(&mut self, frame: &mut Frame) {
    let [header_area, content_area, footer_area] = Layout::vertical([
      Constraint::Length(1),
      Constraint::Min(1),
      Constraint::Length(1),
    ])
    .areas(frame.area());

    let breadcrumb = self.breadcrumb();
    let ctx = ViewContext {
      query: &self.query,
      ui: &self.config.ui,
    };
    let Some(view) = self.view_stack.last_mut() else {
      return;
    };

    draw_header(
      frame,
      header_area,
      self.config.display_title(),
      self.query.state(),
      self.query.last_refreshed(),
      &view.shortcuts(),
    );
    view.render(frame, content_area, &ctx);
    draw_footer(frame, footer_area, &breadcrumb);
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }
}
