use {
    log::debug,
    stcex_client::Clipboard,
    std::{
        io::Write,
        process::{Command, Stdio},
    },
};

/// Clipboard helpers tried in order; the first one that runs wins.
const HELPERS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// The desktop clipboard, reached through the platform's copy utility.
#[derive(Debug, Default)]
pub struct SystemClipboard;

fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<(), String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| format!("{program}: {err}"))?;
    child
        .stdin
        .take()
        .ok_or_else(|| format!("{program}: stdin unavailable"))?
        .write_all(text.as_bytes())
        .map_err(|err| format!("{program}: {err}"))?;
    let status = child.wait().map_err(|err| format!("{program}: {err}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("{program} exited with {status}"))
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), String> {
        let mut failures = vec![];
        for (program, args) in HELPERS {
            match pipe_to(program, args, text) {
                Ok(()) => {
                    debug!("copied with {program}");
                    return Ok(());
                }
                Err(err) => failures.push(err),
            }
        }
        Err(failures.join("; "))
    }
}
