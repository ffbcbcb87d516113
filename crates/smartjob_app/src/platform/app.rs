use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use smartjob_core::{
    update, AppState, AppViewModel, CredentialStore, Effect, Msg, Password, SelectedFile,
};
use smartjob_engine::{ensure_state_dir, ClientSettings};
use smartjob_logging::{smartjob_debug, smartjob_info, smartjob_warn};

use super::cli::{Cli, Command};
use super::effects::EffectRunner;
use super::logging;
use super::persistence::FileCredentialStore;
use super::shell::{self, ShellCommand, HELP_TEXT};
use super::ui;

const SESSION_NOT_SAVED_TEXT: &str =
    "Warning: could not save the session; you will need to log in again next time.";

/// Everything the controller loop reacts to.
pub(crate) enum AppEvent {
    Core(Msg),
    Input(String),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.verbose, &cli.state_dir);
    ensure_state_dir(&cli.state_dir)
        .with_context(|| format!("state directory {:?}", cli.state_dir))?;
    smartjob_info!(
        "smartjob starting; api_url={} state_dir={:?}",
        cli.api_url,
        cli.state_dir
    );

    let settings = ClientSettings {
        base_url: cli.api_url.clone(),
        request_timeout: cli.request_timeout_secs.map(Duration::from_secs),
        ..ClientSettings::default()
    };

    let (tx, rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(settings, tx.clone())
        .with_context(|| format!("backend url {}", cli.api_url))?;
    if matches!(cli.command, Command::Shell) {
        spawn_stdin_reader(tx);
    } else {
        // One-shot commands stop waiting once the engine drops its sender.
        drop(tx);
    }

    let store = FileCredentialStore::new(cli.state_dir.clone());
    let mut controller = Controller::new(store, runner, rx, io::stdout());

    match cli.command {
        Command::Status => controller.status()?,
        Command::Login { username, password } => {
            controller.login(username, password)?;
            controller.run_until_settled()?;
        }
        Command::Logout => controller.logout()?,
        Command::Upload { path, mime } => {
            controller.upload(Some(&path), mime.as_deref())?;
            controller.run_until_settled()?;
        }
        Command::Feedback { rating, comment } => {
            controller.form.rating = rating;
            controller.form.comment = comment;
            controller.send_feedback()?;
            controller.run_until_settled()?;
        }
        Command::Shell => controller.run_shell()?,
    }

    smartjob_info!("smartjob exiting");
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(AppEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

/// Feedback inputs held by the host until submitted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct FeedbackForm {
    pub rating: Option<u8>,
    pub comment: String,
}

/// Drives the state machine: dispatches messages, executes effects and
/// prints the sections that changed.
pub(crate) struct Controller<S: CredentialStore, W: Write> {
    state: AppState,
    store: S,
    runner: EffectRunner,
    inbox: mpsc::Receiver<AppEvent>,
    form: FeedbackForm,
    shown: AppViewModel,
    session_unsaved: bool,
    out: W,
}

impl<S: CredentialStore, W: Write> Controller<S, W> {
    pub(crate) fn new(
        store: S,
        runner: EffectRunner,
        inbox: mpsc::Receiver<AppEvent>,
        out: W,
    ) -> Self {
        let restored = store.load();
        smartjob_info!(
            "Stored session {}",
            if restored.is_some() { "found" } else { "absent" }
        );
        let mut controller = Self {
            state: AppState::new(),
            store,
            runner,
            inbox,
            form: FeedbackForm::default(),
            shown: AppViewModel::default(),
            session_unsaved: false,
            out,
        };
        controller.apply(Msg::CredentialRestored(restored));
        controller.shown = controller.state.view();
        controller
    }

    pub(crate) fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        if self.apply(msg) {
            self.render()?;
        }
        if std::mem::take(&mut self.session_unsaved) {
            writeln!(self.out, "[session] {SESSION_NOT_SAVED_TEXT}")?;
        }
        Ok(())
    }

    /// Runs one update step; returns whether the state changed.
    fn apply(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let dirty = state.consume_dirty();
        self.state = state;
        for effect in effects {
            self.execute(effect);
        }
        dirty
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::PersistCredential(credential) => {
                if !self.store.save(&credential) {
                    smartjob_warn!("Session kept in memory only");
                    self.session_unsaved = true;
                }
            }
            Effect::ClearCredential => self.store.clear(),
            Effect::ResetFeedbackForm => self.form = FeedbackForm::default(),
            network => self.runner.run(network),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let view = self.state.view();
        ui::render::render_changes(&self.shown, &view, &mut self.out)?;
        self.shown = view;
        Ok(())
    }

    /// Block until no backend call is outstanding.
    pub(crate) fn run_until_settled(&mut self) -> io::Result<()> {
        while self.state.has_pending_work() {
            match self.inbox.recv() {
                Ok(AppEvent::Core(msg)) => self.dispatch(msg)?,
                Ok(AppEvent::Input(_)) | Ok(AppEvent::InputClosed) => {}
                Err(_) => {
                    smartjob_warn!("Engine stopped before outstanding calls settled");
                    break;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn status(&mut self) -> io::Result<()> {
        let view = self.state.view();
        ui::render::render_full(&view, &mut self.out)
    }

    pub(crate) fn login(&mut self, username: String, password: String) -> io::Result<()> {
        self.dispatch(Msg::LoginSubmitted {
            username,
            password: Password::new(password),
        })
    }

    pub(crate) fn logout(&mut self) -> io::Result<()> {
        self.dispatch(Msg::LogoutClicked)
    }

    /// `None` reports "no file picked" to the state machine.
    pub(crate) fn upload(&mut self, path: Option<&Path>, mime: Option<&str>) -> io::Result<()> {
        let file = match path {
            None => None,
            Some(path) => match read_selected_file(path, mime) {
                Ok(file) => Some(file),
                Err(err) => {
                    smartjob_warn!("Could not read {:?}: {}", path, err);
                    writeln!(self.out, "[upload] Could not read {}: {err}", path.display())?;
                    return Ok(());
                }
            },
        };
        self.dispatch(Msg::UploadSubmitted(file))
    }

    pub(crate) fn send_feedback(&mut self) -> io::Result<()> {
        self.dispatch(Msg::FeedbackSubmitted {
            rating: self.form.rating,
            comment: self.form.comment.clone(),
        })
    }

    pub(crate) fn run_shell(&mut self) -> io::Result<()> {
        writeln!(self.out, "Type 'help' for commands.")?;
        self.prompt()?;
        while let Ok(event) = self.inbox.recv() {
            match event {
                AppEvent::Core(msg) => self.dispatch(msg)?,
                AppEvent::Input(line) => {
                    match shell::parse(&line) {
                        Ok(ShellCommand::Quit) => return Ok(()),
                        Ok(command) => self.run_shell_command(command)?,
                        Err(message) => writeln!(self.out, "{message}")?,
                    }
                    self.prompt()?;
                }
                AppEvent::InputClosed => {
                    smartjob_debug!("Input closed; waiting for outstanding calls");
                    return self.run_until_settled();
                }
            }
        }
        Ok(())
    }

    fn run_shell_command(&mut self, command: ShellCommand) -> io::Result<()> {
        match command {
            ShellCommand::Login { username, password } => self.login(username, password),
            ShellCommand::Logout => self.logout(),
            ShellCommand::Status => self.status(),
            ShellCommand::Upload { path, mime } => self.upload(path.as_deref(), mime.as_deref()),
            ShellCommand::Rate(rating) => {
                self.form.rating = Some(rating);
                Ok(())
            }
            ShellCommand::Comment(comment) => {
                self.form.comment = comment;
                Ok(())
            }
            ShellCommand::Send => self.send_feedback(),
            ShellCommand::Feedback { rating, comment } => {
                self.form.rating = Some(rating);
                if let Some(comment) = comment {
                    self.form.comment = comment;
                }
                self.send_feedback()
            }
            ShellCommand::Help => writeln!(self.out, "{HELP_TEXT}"),
            ShellCommand::Quit | ShellCommand::Empty => Ok(()),
        }
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }
}

fn read_selected_file(path: &Path, mime: Option<&str>) -> io::Result<SelectedFile> {
    let bytes = fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = mime.unwrap_or_else(|| shell::guess_mime(path));
    Ok(SelectedFile::new(name, mime_type, bytes))
}
