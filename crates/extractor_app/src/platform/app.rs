use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use extractor_core::{update, AppState, Msg};
use extractor_logging::{extractor_debug, extractor_error, extractor_info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::config;
use super::effects::EffectRunner;
use super::logging;
use super::ui::commands::{self, Command, CommandError, HELP};
use super::ui::render;

const PROMPT: &str = "extractor> ";

/// Everything the main loop reacts to.
pub enum AppEvent {
    /// Engine results and timer fires, already mapped to reducer messages.
    Msg(Msg),
    Input(Command),
    BadInput(CommandError),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let (config, problem) = config::load();
    logging::initialize(config.log, config.level_filter());
    if let Some(problem) = &problem {
        config::report(problem);
    }
    extractor_info!("Starting extractor_app api_url={}", config.api_url);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::start(&config, event_tx.clone()).context("failed to start engine")?;
    spawn_input_reader(event_tx);

    let mut app = App {
        state: AppState::with_timings(config.timings()),
        runner,
    };

    println!("{HELP}");
    app.dispatch(Msg::Started);
    app.render();

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(msg) | AppEvent::Input(Command::Msg(msg)) => app.dispatch(msg),
            AppEvent::Input(Command::Key(key)) => {
                let selection = app.state.schema().selection();
                app.dispatch(Msg::SchemaKeyPressed { key, selection });
            }
            AppEvent::Input(Command::Show) => app.render(),
            AppEvent::Input(Command::Help) => println!("{HELP}"),
            AppEvent::BadInput(err) => eprintln!("{err}"),
            AppEvent::Input(Command::Quit) | AppEvent::InputClosed => break,
        }
        if app.state.consume_dirty() {
            app.render();
        }
    }

    extractor_info!("extractor_app exiting");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        extractor_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
    }

    fn render(&mut self) {
        self.state.consume_dirty();
        print!("{}", render::render(&self.state.view()));
    }
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(err) => {
                extractor_error!("Failed to create line editor: {}", err);
                let _ = event_tx.send(AppEvent::InputClosed);
                return;
            }
        };

        loop {
            let Some(line) = accept_line(editor.readline(PROMPT)) else {
                break;
            };
            let event = match commands::parse(&line) {
                Ok(Some(command)) => {
                    let _ = editor.add_history_entry(line.as_str());
                    AppEvent::Input(command)
                }
                Ok(None) => continue,
                Err(err) => AppEvent::BadInput(err),
            };
            if event_tx.send(event).is_err() {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

/// Ctrl+C, Ctrl+D and read errors all end the session.
fn accept_line(read: Result<String, ReadlineError>) -> Option<String> {
    match read {
        Ok(line) => Some(line),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
        Err(err) => {
            extractor_error!("Failed to read input: {}", err);
            None
        }
    }
}
