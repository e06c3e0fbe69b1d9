use std::io::{self, Write};

use clipper_core::{AppViewModel, NoticeKind, Phase};

const BAR_WIDTH: usize = 20;
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// One printable rendition of the view model, split into independently
/// refreshed sections. Hidden panels are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub status: String,
    pub progress: Option<String>,
    pub result: Option<Vec<String>>,
    pub download: Option<String>,
    pub notice: Option<String>,
}

pub fn frame(view: &AppViewModel) -> Frame {
    let phase_label = match view.phase {
        Phase::Idle => "Idle",
        Phase::Submitting => "Submitting",
        Phase::Polling => "Processing",
        Phase::Completed => "Completed",
        Phase::Failed => "Failed",
    };
    let mut status = format!("[{}] {}", phase_label, view.submit_label);
    if let Some(process_id) = &view.process_id {
        status.push_str(&format!(" | job {}", process_id));
    }
    if view.source_invalid {
        status.push_str(" | source invalid");
    }

    let progress = view
        .progress
        .as_ref()
        .map(|progress| format!("{} {}", bar(progress.percent), progress.text));

    let result = view.result.as_ref().map(|result| {
        result
            .facts
            .iter()
            .map(|fact| format!("  {}: {}", fact.label, fact.value))
            .collect()
    });

    let download = view.result.as_ref().map(|_| {
        if view.download.enabled {
            format!("{} (type 'download')", view.download.label)
        } else {
            view.download.label.to_string()
        }
    });

    let notice = view.notice.as_ref().map(|notice| match notice.kind {
        NoticeKind::Error => format!("✖ {}", notice.text),
        NoticeKind::Success => format!("✔ {}", notice.text),
    });

    Frame {
        status,
        progress,
        result,
        download,
        notice,
    }
}

fn bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// Writes frames to a terminal, printing only sections that changed since
/// the previous frame.
pub struct TerminalRenderer<W: Write> {
    out: W,
    last: Option<Frame>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        let next = frame(view);
        let previous = self.last.take().unwrap_or_default();

        if next.status != previous.status {
            writeln!(self.out, "{}", next.status)?;
        }
        if next.progress != previous.progress {
            if let Some(progress) = &next.progress {
                writeln!(self.out, "{}", progress)?;
            }
        }
        if next.result != previous.result {
            if let Some(lines) = &next.result {
                writeln!(self.out, "Result:")?;
                for line in lines {
                    writeln!(self.out, "{}", line)?;
                }
            }
        }
        if next.download != previous.download {
            if let Some(download) = &next.download {
                writeln!(self.out, "{}", download)?;
            }
        }
        if next.notice != previous.notice {
            if let Some(notice) = &next.notice {
                writeln!(self.out, "{}", notice)?;
            }
        }

        self.out.flush()?;
        self.last = Some(next);
        Ok(())
    }

    /// Clears the screen; the next render prints every visible section.
    pub fn scroll_to_top(&mut self) -> io::Result<()> {
        self.last = None;
        write!(self.out, "{}", CLEAR_SCREEN)?;
        self.out.flush()
    }

    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
