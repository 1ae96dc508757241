//! Read-eval-print loop over an editing session.

use mp4label_core::annotation::{to_text, NOT_TUTORIAL_MARKER};
use mp4label_core::timestamp;
use mp4label_session::{Action, SessionHandle, SessionSnapshot};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::command::{Command, HELP};

/// Read commands from `input` until EOF or `quit`, writing replies to
/// `output`. Pending edits are flushed before returning.
pub async fn run<R, W>(session: &SessionHandle, input: R, mut output: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let reply = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(session, command).await,
            Err(e) => format!("{e}\n"),
        };
        output.write_all(reply.as_bytes()).await?;
        output.flush().await?;
    }

    if let Err(e) = session.dispatch(Action::Flush).await {
        tracing::warn!(error = %e, "Final flush failed");
    }
    Ok(())
}

/// Run one command and render the reply.
pub async fn execute(session: &SessionHandle, command: Command) -> String {
    match command {
        Command::Act(action) => {
            let show_after = matches!(action, Action::OpenVideo { .. } | Action::Delete);
            match session.dispatch(action).await {
                Ok(snapshot) if show_after => render(&snapshot),
                Ok(snapshot) => status_line(&snapshot),
                Err(e) => format!("error: {e}\n"),
            }
        }
        Command::Seek { index } => match session.snapshot().await {
            Ok(snapshot) => seek_line(&snapshot, index),
            Err(e) => format!("error: {e}\n"),
        },
        Command::Show => match session.snapshot().await {
            Ok(snapshot) => render(&snapshot),
            Err(e) => format!("error: {e}\n"),
        },
        Command::Status => match session.snapshot().await {
            Ok(snapshot) => format!("{}\n", snapshot.state),
            Err(e) => format!("error: {e}\n"),
        },
        Command::Help => format!("{HELP}\n"),
        Command::Quit => String::new(),
    }
}

/// Header line followed by the annotation, with `>` marking the selected
/// step. Continuation lines of multi-line fields are indented.
pub fn render(snapshot: &SessionSnapshot) -> String {
    let (Some(filename), Some(document)) = (&snapshot.filename, &snapshot.document) else {
        return "No video open\n".to_string();
    };

    let mut out = format!("[{filename}] {}\n", snapshot.state.label());
    if !document.is_tutorial {
        push_block(&mut out, NOT_TUTORIAL_MARKER, false);
        return out;
    }

    if !document.title.is_empty() {
        push_block(&mut out, &document.title, false);
        out.push('\n');
    }
    for (index, step) in document.steps.iter().enumerate() {
        let text = format!("{}) {} {}", step.number, step.timestamp, step.description);
        push_block(&mut out, &text, snapshot.selection == Some(index));
    }

    if let Some(reference) = &snapshot.reference {
        out.push_str("-- model suggestion --\n");
        out.push_str(&to_text(reference));
    }
    out
}

fn push_block(out: &mut String, text: &str, selected: bool) {
    for (i, line) in text.split('\n').enumerate() {
        out.push_str(if selected && i == 0 { "> " } else { "  " });
        out.push_str(line);
        out.push('\n');
    }
}

fn status_line(snapshot: &SessionSnapshot) -> String {
    let label = snapshot.state.label();
    if label.is_empty() {
        String::new()
    } else {
        format!("{label}\n")
    }
}

fn seek_line(snapshot: &SessionSnapshot, index: usize) -> String {
    let Some(step) = snapshot
        .document
        .as_ref()
        .and_then(|doc| doc.steps.get(index))
    else {
        return format!("error: no step {}\n", index + 1);
    };
    match timestamp::seek_target(&step.timestamp) {
        Some(seconds) => format!("seek {seconds:.3}s\n"),
        None => format!("error: step {} has no valid timestamp\n", index + 1),
    }
}
