//! User-facing console lines, separate from the tracing log stream.
//! Prefixes are colored only when the target stream is a TTY.

use owo_colors::{OwoColorize, Style};

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn emit(stream: Stream, tag: &str, style: Style, msg: &str) {
    let tty = match stream {
        Stream::Stdout => atty::is(atty::Stream::Stdout),
        Stream::Stderr => atty::is(atty::Stream::Stderr),
    };
    let line = if tty {
        format!("{} {}", tag.style(style), msg)
    } else {
        format!("{tag} {msg}")
    };
    match stream {
        Stream::Stdout => println!("{line}"),
        Stream::Stderr => eprintln!("{line}"),
    }
}

pub fn print_info(msg: &str) {
    emit(Stream::Stdout, "info:", Style::new().cyan().bold(), msg);
}

pub fn print_warn(msg: &str) {
    emit(Stream::Stderr, "warn:", Style::new().yellow().bold(), msg);
}

pub fn print_error(msg: &str) {
    emit(Stream::Stderr, "error:", Style::new().red().bold(), msg);
}

pub fn print_success(msg: &str) {
    emit(Stream::Stdout, "ok:", Style::new().green().bold(), msg);
}
