//! Console adapter
//!
//! A line-oriented front end over the scoreboard. Each line is one command;
//! the trigger keys `1`-`8` record stats and are inert until a match starts.
//! Reset and saving an import both ask for a `y/N` confirmation on the next
//! line.
//!
//! Import reads run in the background: the console keeps taking commands
//! while a file is being read, and a read that lands after a newer import has
//! already been delivered is dropped.

mod command;
pub mod keymap;

use std::io;
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

use crate::persistence::{read_import_file, ImportError, ImportTicket, KeyValueStore};
use crate::scoreboard::{ImportOutcome, Scoreboard};
use crate::types::{StatKind, Team};
use crate::utils::{clock, now};

pub use command::Command;

/// Result type for console I/O
pub type ConsoleResult<T> = std::io::Result<T>;

const HELP: &str = "\
Commands:
  start A, B, C, D   start a match (team 1: A+B, team 2: C+D)
  1 / 2              player 1 winner / unforced error
  3 / 4              player 2 winner / unforced error
  5 / 6              player 3 winner / unforced error
  7 / 8              player 4 winner / unforced error
  summary            player and team totals
  chart              score progression, one row per point
  export             write the match to a dated file
  import <path>      load a match file (read in the background)
  reset              discard the match
  quit               leave (the match is already saved)
";

/// A finished background read for `import <path>`
type ImportRead = (PathBuf, ImportTicket, io::Result<Vec<u8>>);

/// Next thing the loop has to react to
enum Input {
    Line(Option<String>),
    Read(Result<ImportRead, JoinError>),
}

/// Interactive console over a scoreboard
pub struct Console<S: KeyValueStore, R, W> {
    board: Scoreboard<S>,
    reader: R,
    writer: W,
    export_dir: PathBuf,
    domain: String,
    /// Import reads still in flight
    reads: JoinSet<ImportRead>,
    /// Partial input left by a line read that lost a race with an import
    line_buf: String,
}

impl<S, R, W> Console<S, R, W>
where
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(board: Scoreboard<S>, reader: R, writer: W) -> Self {
        Self {
            board,
            reader,
            writer,
            export_dir: PathBuf::from("."),
            domain: crate::config::DEFAULT_DOMAIN.to_string(),
            reads: JoinSet::new(),
            line_buf: String::new(),
        }
    }

    /// Set where exports go and how they are named
    pub fn with_export(mut self, export_dir: impl Into<PathBuf>, domain: impl Into<String>) -> Self {
        self.export_dir = export_dir.into();
        self.domain = domain.into();
        self
    }

    pub fn board(&self) -> &Scoreboard<S> {
        &self.board
    }

    /// Give back the scoreboard and writer
    pub fn into_parts(self) -> (Scoreboard<S>, W) {
        (self.board, self.writer)
    }

    /// Run until `quit` or end of input
    pub async fn run(&mut self) -> ConsoleResult<()> {
        if self.board.is_started() {
            self.write_summary().await?;
        } else {
            self.send("No match in progress. Type 'start A, B, C, D' or 'help'.\n")
                .await?;
        }

        loop {
            let line = match self.next_input().await? {
                Input::Read(read) => {
                    self.finish_import(read).await?;
                    continue;
                }
                Input::Line(Some(line)) => line,
                Input::Line(None) => {
                    // Input closed; let reads already requested land first
                    while let Some(read) = self.reads.join_next().await {
                        self.finish_import(read).await?;
                    }
                    break;
                }
            };

            match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.handle(command).await?,
                Ok(None) => {}
                Err(message) => self.send(&format!("{}\n", message)).await?,
            }
        }

        self.writer.flush().await
    }

    /// Wait for a line or a finished import read, whichever comes first
    async fn next_input(&mut self) -> ConsoleResult<Input> {
        if self.reads.is_empty() {
            let line = read_line(&mut self.reader, &mut self.line_buf).await?;
            return Ok(Input::Line(line));
        }

        tokio::select! {
            biased;
            Some(read) = self.reads.join_next() => Ok(Input::Read(read)),
            line = read_line(&mut self.reader, &mut self.line_buf) => Ok(Input::Line(line?)),
        }
    }

    async fn handle(&mut self, command: Command) -> ConsoleResult<()> {
        debug!(?command, "console command");
        match command {
            Command::Start(names) => self.handle_start(&names).await,
            Command::Stat { player_index, kind } => self.handle_stat(player_index, kind).await,
            Command::Summary => self.write_summary().await,
            Command::Chart => self.write_chart().await,
            Command::Export => self.handle_export().await,
            Command::Import(path) => self.handle_import(path).await,
            Command::Reset => self.handle_reset().await,
            Command::Help => self.send(HELP).await,
            Command::Quit => Ok(()),
        }
    }

    async fn handle_start(&mut self, names: &[String]) -> ConsoleResult<()> {
        match self.board.start(names) {
            Ok(()) => self.write_summary().await,
            Err(e) => self.send(&format!("Cannot start: {}\n", e)).await,
        }
    }

    async fn handle_stat(&mut self, player_index: usize, kind: StatKind) -> ConsoleResult<()> {
        match self.board.record(player_index, kind) {
            Ok(Some(event)) => {
                let player = &self.board.state().players[event.player_index];
                let line = format!(
                    "#{} {} {} {} -> {} ({})\n",
                    event.sequence_number,
                    clock(event.occurred_at),
                    player.name,
                    kind.label(),
                    player.score,
                    format_team_line(&self.board)
                );
                self.send(&line).await
            }
            // Trigger keys are inert before the match starts
            Ok(None) => Ok(()),
            Err(e) => {
                warn!(error = %e, "stat rejected");
                self.send(&format!("Ignored: {}\n", e)).await
            }
        }
    }

    async fn handle_export(&mut self) -> ConsoleResult<()> {
        let result = self
            .board
            .export_to_dir(&self.export_dir, &self.domain, now());
        match result {
            Ok(path) => self.send(&format!("Exported to {}\n", path.display())).await,
            Err(e) => self.send(&format!("Export failed: {}\n", e)).await,
        }
    }

    async fn handle_import(&mut self, path: PathBuf) -> ConsoleResult<()> {
        let pending = read_import_file(self.board.begin_import(), &path);
        debug!(path = %path.display(), token = pending.ticket.token(), "import read started");

        self.reads.spawn(async move {
            let (ticket, result) = pending.wait().await;
            (path, ticket, result)
        });
        Ok(())
    }

    async fn finish_import(&mut self, read: Result<ImportRead, JoinError>) -> ConsoleResult<()> {
        let (path, ticket, result) = match read {
            Ok(read) => read,
            Err(e) => {
                warn!(error = %e, "import read task failed");
                return self.send("Import failed: file read was interrupted\n").await;
            }
        };

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                return self
                    .send(&format!("Cannot read {}: {}\n", path.display(), e))
                    .await
            }
        };

        match self.board.complete_import(ticket, &bytes) {
            Ok(ImportOutcome::Applied) => {
                self.write_summary().await?;
                if self.confirm("Save imported match? [y/N] ").await? {
                    match self.board.confirm_import() {
                        Ok(_) => self.send("Imported match saved.\n").await,
                        Err(e) => self.send(&format!("Save failed: {}\n", e)).await,
                    }
                } else {
                    self.board.decline_import();
                    self.send("Imported match not saved.\n").await
                }
            }
            Ok(ImportOutcome::Stale) => {
                self.send(&format!(
                    "Skipped {}: a newer import was already loaded.\n",
                    path.display()
                ))
                .await
            }
            Err(ImportError::ParseFailure(reason)) => {
                self.send(&format!("Import failed: file is not valid JSON ({})\n", reason))
                    .await
            }
            Err(ImportError::InvalidFormat(reason)) => {
                self.send(&format!("Import failed: not a match file ({})\n", reason))
                    .await
            }
        }
    }

    async fn handle_reset(&mut self) -> ConsoleResult<()> {
        if self.confirm("Reset the match? All stats will be lost. [y/N] ").await? {
            self.board.reset();
            self.send("Match reset.\n").await
        } else {
            self.send("Reset cancelled.\n").await
        }
    }

    async fn write_summary(&mut self) -> ConsoleResult<()> {
        let text = format_summary(&self.board);
        self.send(&text).await
    }

    async fn write_chart(&mut self) -> ConsoleResult<()> {
        let names: Vec<String> = self
            .board
            .state()
            .players
            .iter()
            .map(|p| p.name.clone())
            .collect();

        let mut out = String::new();
        for row in self.board.chart() {
            out.push_str(&row.to_json(&names).to_string());
            out.push('\n');
        }
        self.send(&out).await
    }

    /// Ask a yes/no question on the next line; anything but y/yes is no
    async fn confirm(&mut self, prompt: &str) -> ConsoleResult<bool> {
        self.send(prompt).await?;
        let answer = read_line(&mut self.reader, &mut self.line_buf)
            .await?
            .unwrap_or_default();
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    async fn send(&mut self, text: &str) -> ConsoleResult<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await
    }
}

/// Read one line, `None` at end of input
///
/// Bytes from a read cancelled mid-line stay in `buf` and are completed by
/// the next call.
async fn read_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut String,
) -> ConsoleResult<Option<String>> {
    let read = reader.read_line(buf).await?;
    if read == 0 && buf.is_empty() {
        return Ok(None);
    }
    Ok(Some(std::mem::take(buf)))
}

fn format_team_line<S: KeyValueStore>(board: &Scoreboard<S>) -> String {
    Team::ALL
        .iter()
        .map(|&team| format!("{} {}", team, board.team_stats(team).score))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Player and team totals as a small table
pub fn format_summary<S: KeyValueStore>(board: &Scoreboard<S>) -> String {
    let state = board.state();
    if !state.started {
        return "No match in progress.\n".to_string();
    }

    let mut out = format!("{:<16}{:>5}{:>5}{:>7}\n", "Player", "W", "UE", "Score");
    for (i, player) in state.players.iter().enumerate() {
        let keys = match (
            keymap::key_for(i, StatKind::Winner),
            keymap::key_for(i, StatKind::UnforcedError),
        ) {
            (Some(w), Some(ue)) => format!("[{}/{}] ", w, ue),
            _ => String::new(),
        };
        out.push_str(&format!(
            "{:<16}{:>5}{:>5}{:>7}\n",
            format!("{}{}", keys, player.name),
            player.winners,
            player.unforced_errors,
            player.score
        ));
    }
    for team in Team::ALL {
        let stats = board.team_stats(team);
        out.push_str(&format!(
            "{:<16}{:>5}{:>5}{:>7}\n",
            team.to_string(),
            stats.winners,
            stats.unforced_errors,
            stats.score
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, PersistenceGateway};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, BufReader, DuplexStream};

    type LiveConsole = Console<MemoryStore, BufReader<DuplexStream>, DuplexStream>;

    /// Test side of a console wired to in-memory pipes
    struct Session {
        input: DuplexStream,
        output: DuplexStream,
        seen: String,
        cursor: usize,
    }

    impl Session {
        async fn send(&mut self, text: &str) {
            self.input.write_all(text.as_bytes()).await.unwrap();
        }

        /// Wait until `needle` shows up in output not yet matched
        async fn expect(&mut self, needle: &str) {
            let wait = async {
                loop {
                    if let Some(pos) = self.seen[self.cursor..].find(needle) {
                        self.cursor += pos + needle.len();
                        return;
                    }
                    let mut chunk = [0u8; 1024];
                    let n = self.output.read(&mut chunk).await.unwrap();
                    assert!(n > 0, "console closed before printing {:?}", needle);
                    self.seen.push_str(&String::from_utf8_lossy(&chunk[..n]));
                }
            };
            if tokio::time::timeout(Duration::from_secs(5), wait).await.is_err() {
                panic!("timed out waiting for {:?}; output so far:\n{}", needle, self.seen);
            }
        }
    }

    fn interactive() -> (LiveConsole, Session) {
        let (input, console_in) = tokio::io::duplex(4096);
        let (console_out, output) = tokio::io::duplex(64 * 1024);
        let board = Scoreboard::new(PersistenceGateway::new(MemoryStore::new()));
        let console = Console::new(board, BufReader::new(console_in), console_out);
        let session = Session {
            input,
            output,
            seen: String::new(),
            cursor: 0,
        };
        (console, session)
    }

    /// A named pipe: reading it blocks until a writer shows up
    #[cfg(unix)]
    fn make_fifo(path: &std::path::Path) {
        let status = std::process::Command::new("mkfifo").arg(path).status().unwrap();
        assert!(status.success());
    }

    #[cfg(unix)]
    async fn feed_fifo(path: PathBuf, bytes: Vec<u8>) {
        tokio::task::spawn_blocking(move || std::fs::write(path, bytes))
            .await
            .unwrap()
            .unwrap();
    }

    async fn run_script(script: &str) -> (Scoreboard<MemoryStore>, String) {
        let board = Scoreboard::new(PersistenceGateway::new(MemoryStore::new()));
        let mut console = Console::new(board, script.as_bytes(), Vec::new());
        console.run().await.unwrap();
        let (board, out) = console.into_parts();
        (board, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_keys_inert_before_start() {
        let (board, _) = run_script("1\n2\n8\n").await;
        assert!(board.state().is_empty());
    }

    #[tokio::test]
    async fn test_scripted_match() {
        let (board, out) = run_script("start A, B, C, D\n1\n6\nsummary\n").await;

        assert_eq!(board.state().event_count(), 2);
        assert_eq!(board.state().players[0].score, 2);
        assert_eq!(board.state().players[2].score, -1);
        assert!(out.contains("Team 1"));
        assert!(out.contains("#2"));
    }

    #[tokio::test]
    async fn test_reset_requires_yes() {
        let (board, out) = run_script("start A, B, C, D\n1\nreset\nn\n").await;
        assert_eq!(board.state().event_count(), 1);
        assert!(out.contains("Reset cancelled."));

        let (board, _) = run_script("start A, B, C, D\n1\nreset\ny\n").await;
        assert!(board.state().is_empty());
    }

    #[tokio::test]
    async fn test_empty_name_refused() {
        let (board, out) = run_script("start A, , C, D\n").await;
        assert!(!board.is_started());
        assert!(out.contains("Cannot start"));
    }

    #[tokio::test]
    async fn test_chart_rows() {
        let (_, out) = run_script("start A, B, C, D\n1\n6\nchart\n").await;
        let rows: Vec<serde_json::Value> = out
            .lines()
            .filter(|l| l.starts_with('{'))
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2]["point"], 2);
        assert_eq!(rows[2]["C"], -1);
    }

    #[tokio::test]
    async fn test_export_then_import() {
        let dir = tempfile::TempDir::new().unwrap();

        let board = Scoreboard::new(PersistenceGateway::new(MemoryStore::new()));
        let mut console = Console::new(board, "start A, B, C, D\n3\nexport\n".as_bytes(), Vec::new())
            .with_export(dir.path(), "padel");
        console.run().await.unwrap();
        let (source, _) = console.into_parts();

        let file = std::fs::read_dir(dir.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();

        let (mut console, mut session) = interactive();
        let (result, ()) = tokio::join!(console.run(), async {
            session.send(&format!("import {}\n", file.display())).await;
            session.expect("Save imported match? [y/N] ").await;
            session.send("y\n").await;
            session.expect("Imported match saved.").await;
            session.send("quit\n").await;
        });
        result.unwrap();
        let (target, _) = console.into_parts();

        assert_eq!(target.state(), source.state());
        assert!(target.gateway().has_saved_state().unwrap());
    }

    #[tokio::test]
    async fn test_import_at_end_of_input_is_not_saved() {
        let source_dir = tempfile::TempDir::new().unwrap();
        let mut source = Scoreboard::new(PersistenceGateway::new(MemoryStore::new()));
        source.start(&["A", "B", "C", "D"]).unwrap();
        let file = source
            .export_to_dir(source_dir.path(), "padel", now())
            .unwrap();

        let (board, out) = run_script(&format!("import {}\n", file.display())).await;

        assert_eq!(board.state(), source.state());
        assert!(out.contains("Imported match not saved."));
        assert!(!board.gateway().has_saved_state().unwrap());
    }

    #[tokio::test]
    async fn test_import_bad_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();

        let (board, out) = run_script(&format!("import {}\n", path.display())).await;

        assert!(board.state().is_empty());
        assert!(out.contains("not valid JSON"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_commands_run_while_import_is_pending() {
        let dir = tempfile::TempDir::new().unwrap();
        let fifo = dir.path().join("pending.json");
        make_fifo(&fifo);

        let (mut console, mut session) = interactive();
        let (result, ()) = tokio::join!(console.run(), async {
            session
                .send(&format!("import {}\nstart A, B, C, D\n1\n", fifo.display()))
                .await;
            session.expect("#1 ").await;

            feed_fifo(fifo.clone(), b"not json".to_vec()).await;
            session.expect("not valid JSON").await;
            session.send("quit\n").await;
        });
        result.unwrap();
        let (board, _) = console.into_parts();

        assert!(board.is_started());
        assert_eq!(board.state().event_count(), 1);
        assert_eq!(board.state().players[0].score, 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_newer_import_overtakes_older_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let fifo = dir.path().join("older.json");
        make_fifo(&fifo);

        let mut older = Scoreboard::new(PersistenceGateway::new(MemoryStore::new()));
        older.start(&["Old", "B", "C", "D"]).unwrap();
        let older_bytes = older.export(now()).unwrap();

        let mut newer = Scoreboard::new(PersistenceGateway::new(MemoryStore::new()));
        newer.start(&["New", "B", "C", "D"]).unwrap();
        newer.record(1, StatKind::Winner).unwrap();
        let newer_file = newer.export_to_dir(dir.path(), "newer", now()).unwrap();

        let (mut console, mut session) = interactive();
        let (result, ()) = tokio::join!(console.run(), async {
            session
                .send(&format!(
                    "import {}\nimport {}\n",
                    fifo.display(),
                    newer_file.display()
                ))
                .await;
            session.expect("Save imported match? [y/N] ").await;
            session.send("y\n").await;
            session.expect("Imported match saved.").await;

            feed_fifo(fifo.clone(), older_bytes).await;
            session.expect("a newer import was already loaded").await;
            session.send("quit\n").await;
        });
        result.unwrap();
        let (board, _) = console.into_parts();

        assert_eq!(board.state(), newer.state());
        assert_eq!(&board.gateway().load().unwrap(), newer.state());
    }
}
