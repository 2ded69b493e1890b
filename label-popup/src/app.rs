//! Interactive popup
//!
//! Terminal event loop. Prints run on a spawned task and report back over a
//! channel so the popup keeps redrawing while DYMO Connect is busy.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use label_printer::{MAX_COPIES, PrintOutcome, PrintProgress, PrintResult};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tui_input::backend::crossterm::EventHandler;
use tui_logger::{TuiWidgetEvent, TuiWidgetState};

use crate::commands::build_workflow;
use crate::config::Cli;
use crate::controller::PopupController;
use crate::state::{Focus, PopupState};
use crate::ui;

/// Messages from a running print
#[derive(Debug)]
enum PrintEvent {
    Progress(PrintProgress),
    Finished(PrintResult<PrintOutcome>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct App {
    pub state: PopupState,
    pub logger_state: TuiWidgetState,
    controller: PopupController,
    events_tx: mpsc::UnboundedSender<PrintEvent>,
    events_rx: mpsc::UnboundedReceiver<PrintEvent>,
}

impl App {
    fn new(controller: PopupController) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut state = PopupState::new();
        controller.init(&mut state);
        Self {
            state,
            logger_state: TuiWidgetState::new(),
            controller,
            events_tx,
            events_rx,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Flow::Exit;
        }

        match key.code {
            KeyCode::Esc if self.state.is_add_form_open() => {
                self.controller.cancel_new_category(&mut self.state);
                return Flow::Continue;
            }
            KeyCode::Esc => return Flow::Exit,
            KeyCode::Tab => {
                self.state.focus_next();
                return Flow::Continue;
            }
            KeyCode::BackTab => {
                self.state.focus_prev();
                return Flow::Continue;
            }
            KeyCode::PageUp => {
                self.logger_state.transition(TuiWidgetEvent::PrevPageKey);
                return Flow::Continue;
            }
            KeyCode::PageDown => {
                self.logger_state.transition(TuiWidgetEvent::NextPageKey);
                return Flow::Continue;
            }
            _ => {}
        }

        match self.state.focus() {
            Focus::Category => match key.code {
                KeyCode::Up => {
                    self.state.select_prev();
                    self.controller.on_category_changed(&mut self.state);
                }
                KeyCode::Down => {
                    self.state.select_next();
                    self.controller.on_category_changed(&mut self.state);
                }
                KeyCode::Enter => {
                    self.controller.on_category_changed(&mut self.state);
                    if !self.state.is_add_form_open() {
                        self.state.set_focus(Focus::Sku);
                    }
                }
                _ => {}
            },
            Focus::NewCategory => match key.code {
                KeyCode::Enter => self.controller.save_new_category(&mut self.state),
                _ => {
                    self.state.new_category.handle_event(&Event::Key(key));
                }
            },
            Focus::Sku => match key.code {
                KeyCode::Enter => self.start_print(),
                _ => {
                    self.state.sku.handle_event(&Event::Key(key));
                }
            },
            Focus::Copies => match key.code {
                KeyCode::Enter => self.start_print(),
                KeyCode::Up => self.state.step_copies(1, MAX_COPIES),
                KeyCode::Down => self.state.step_copies(-1, MAX_COPIES),
                KeyCode::Char(c) if !c.is_ascii_digit() => {}
                _ => {
                    self.state.copies.handle_event(&Event::Key(key));
                }
            },
            Focus::Print => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.start_print();
                }
            }
        }
        Flow::Continue
    }

    fn start_print(&mut self) {
        let Some(request) = self.controller.prepare_print(&mut self.state) else {
            return;
        };

        let workflow = self.controller.workflow();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let result = workflow
                .print_with_progress(&request, move |progress| {
                    let _ = progress_tx.send(PrintEvent::Progress(progress));
                })
                .await;
            let _ = tx.send(PrintEvent::Finished(result));
        });
    }

    fn drain_print_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                PrintEvent::Progress(progress) => {
                    self.controller.apply_progress(&mut self.state, progress)
                }
                PrintEvent::Finished(result) => {
                    self.controller.apply_result(&mut self.state, result)
                }
            }
        }
    }
}

/// Open the popup and run until the user leaves
pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let workflow = Arc::new(build_workflow(cli)?);
    let store = cli.store();
    tracing::debug!(path = %store.path().display(), "Label type store");
    let controller = PopupController::new(workflow, Box::new(store));
    let mut app = App::new(controller);

    tracing::info!(base_url = %cli.base_url, "Label popup ready");
    tracing::info!("Tab to move, Enter to print, Esc to quit");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let timeout = Duration::from_millis(100);
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
            && app.handle_key(key) == Flow::Exit
        {
            return Ok(());
        }

        app.drain_print_events();
        app.state.tick(Instant::now());

        // Let spawned print tasks make progress between frames
        tokio::task::yield_now().await;
    }
}
