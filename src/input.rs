use crate::prompt;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

/// One read from the user.
#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    Text(String),
    /// Ctrl-C while the line editor was reading.
    Interrupted,
    Eof,
}

/// Reads lines with rustyline on a terminal, or straight from stdin otherwise.
pub enum LineReader {
    Editor {
        editor: DefaultEditor,
        history: Option<PathBuf>,
    },
    Plain {
        emit_prompt: bool,
    },
}

impl LineReader {
    pub fn new(emit_prompt: bool) -> Self {
        if emit_prompt && io::stdin().is_terminal() {
            match DefaultEditor::new() {
                Ok(mut editor) => {
                    let history = dirs_next::home_dir().map(|home| home.join(".ssi_history"));
                    if let Some(path) = &history {
                        if let Err(err) = editor.load_history(path) {
                            let missing = matches!(&err, ReadlineError::Io(e) if e.kind() == io::ErrorKind::NotFound);
                            if !missing {
                                tracing::warn!(%err, "failed to load history");
                            }
                        }
                    }
                    return LineReader::Editor { editor, history };
                }
                Err(err) => tracing::warn!(%err, "line editor unavailable, reading stdin directly"),
            }
        }
        LineReader::Plain { emit_prompt }
    }

    /// True when rustyline owns the terminal.
    pub fn is_editor(&self) -> bool {
        matches!(self, LineReader::Editor { .. })
    }

    pub fn read_line(&mut self) -> io::Result<Line> {
        match self {
            LineReader::Editor { editor, .. } => match editor.readline(&prompt::render()) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        if let Err(err) = editor.add_history_entry(line.as_str()) {
                            tracing::warn!(%err, "failed to add history entry");
                        }
                    }
                    Ok(Line::Text(line))
                }
                Err(ReadlineError::Interrupted) => Ok(Line::Interrupted),
                Err(ReadlineError::Eof) => Ok(Line::Eof),
                Err(ReadlineError::Io(err)) => Err(err),
                Err(err) => Err(io::Error::new(io::ErrorKind::Other, err.to_string())),
            },
            LineReader::Plain { emit_prompt } => {
                if *emit_prompt {
                    let mut stdout = io::stdout();
                    write!(stdout, "{}", prompt::render())?;
                    stdout.flush()?;
                }
                let mut line = String::new();
                match io::stdin().lock().read_line(&mut line)? {
                    0 => Ok(Line::Eof),
                    _ => Ok(Line::Text(line)),
                }
            }
        }
    }

    pub fn save_history(&mut self) {
        if let LineReader::Editor {
            editor,
            history: Some(path),
        } = self
        {
            if let Err(err) = editor.save_history(path.as_path()) {
                tracing::warn!(%err, "failed to save history");
            }
        }
    }
}
